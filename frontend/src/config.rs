use web_sys::window;

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            // Same origin: the dev server and the production host both proxy /api
            let protocol = window.location().protocol().unwrap_or_else(|_| "http:".to_string());
            return format!("{}//{}", protocol, host);
        }
    }

    // Default to the local dev server
    "http://127.0.0.1:3000".to_string()
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", get_api_base_url(), path)
}

/// Pages outside the wheel that the outcome panel hands off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOff {
    Share,
    Feedback,
}

impl HandOff {
    pub fn path(self) -> &'static str {
        match self {
            HandOff::Share => "/share",
            HandOff::Feedback => "/feedback",
        }
    }

    pub fn url(self) -> String {
        format!("{}{}", get_api_base_url(), self.path())
    }
}

pub fn hand_off(target: HandOff) {
    let url = target.url();
    if let Some(window) = window() {
        if let Err(e) = window.location().set_href(&url) {
            log::error!("Failed to navigate to {}: {:?}", url, e);
        }
    }
}
