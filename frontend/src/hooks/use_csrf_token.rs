use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use crate::api::fetch_csrf_token;

#[derive(Clone, Debug, PartialEq)]
pub enum CsrfToken {
    Pending,
    Ready(String),
    Failed,
}

impl CsrfToken {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            CsrfToken::Ready(token) => Some(token.as_str()),
            _ => None,
        }
    }
}

/// Fetches the anti-forgery token once per mount.
#[hook]
pub fn use_csrf_token() -> UseStateHandle<CsrfToken> {
    let token = use_state(|| CsrfToken::Pending);

    {
        let token = token.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_csrf_token().await {
                    Ok(value) => token.set(CsrfToken::Ready(value)),
                    Err(e) => {
                        log::error!("Failed to fetch CSRF token: {}", e);
                        token.set(CsrfToken::Failed);
                    }
                }
            });
            || ()
        });
    }

    token
}
