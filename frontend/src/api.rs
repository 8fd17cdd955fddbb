use std::fmt;
use std::future::Future;
use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use shared::constants::*;
use shared::shared_wheel_game::*;
use shared::spin_flow::SpinFailure;
use crate::config::api_url;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Network(String),
    Timeout,
    Status { status: u16, message: Option<String> },
    /// 2xx answer that reported `success: false`.
    Rejected { message: Option<String> },
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Timeout => write!(f, "Request timed out after {} ms", REQUEST_TIMEOUT_MS),
            ApiError::Status { status, message } => match message {
                Some(msg) => write!(f, "Error status {}: {}", status, msg),
                None => write!(f, "Error status {}", status),
            },
            ApiError::Rejected { message } => {
                write!(f, "Request rejected: {}", message.as_deref().unwrap_or("no reason given"))
            }
            ApiError::Decode(e) => write!(f, "Error parsing response: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for SpinFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { message, .. } => SpinFailure::Server { message },
            ApiError::Rejected { message } => SpinFailure::Rejected { message },
            ApiError::Network(_) | ApiError::Timeout | ApiError::Decode(_) => SpinFailure::Transport,
        }
    }
}

async fn with_timeout<T, F>(request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let timer = TimeoutFuture::new(REQUEST_TIMEOUT_MS);
    pin_mut!(request);
    pin_mut!(timer);
    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(ApiError::Timeout),
    }
}

// Non-2xx answers may carry `{ "error": "..." }`; anything else is ignored.
async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|msg| !msg.is_empty());
    ApiError::Status { status, message }
}

pub async fn fetch_csrf_token() -> Result<String, ApiError> {
    with_timeout(async {
        let response = Request::get(&api_url(CSRF_TOKEN_ENDPOINT))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(status_error(response).await);
        }

        let body = response
            .json::<CsrfTokenResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.csrf_token)
    })
    .await
}

/// Segment table for a place, already normalized for drawing.
pub async fn fetch_wheel_data(place_id: &str, csrf_token: &str) -> Result<Vec<Segment>, ApiError> {
    let encoded: String = js_sys::encode_uri_component(place_id).into();
    let url = format!("{}?placeId={}", api_url(WHEEL_DATA_ENDPOINT), encoded);

    with_timeout(async {
        let response = Request::get(&url)
            .header(CSRF_HEADER, csrf_token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(status_error(response).await);
        }

        // Decode leniently: a malformed table still yields a drawable wheel
        let data = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(normalize_segments(&data))
    })
    .await
}

pub async fn spin_wheel(place_id: &str, csrf_token: &str) -> Result<SpinResult, ApiError> {
    let spin_req = WheelSpinRequest {
        place_id: place_id.to_string(),
    };

    with_timeout(async {
        let response = Request::post(&api_url(SPIN_WHEEL_ENDPOINT))
            .header("Content-Type", "application/json")
            .header(CSRF_HEADER, csrf_token)
            .json(&spin_req)
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(status_error(response).await);
        }

        let spin_resp = response
            .json::<WheelSpinResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if !spin_resp.success {
            return Err(ApiError::Rejected { message: spin_resp.error.filter(|m| !m.is_empty()) });
        }

        Ok(SpinResult::from(spin_resp))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::spin_flow::{SpinContext, SpinFlow};

    fn user_message(err: ApiError) -> String {
        let segments = default_segments();
        let mut flow = SpinFlow::new();
        let ctx = SpinContext {
            coins: 1,
            segments: &segments,
            loading: false,
            csrf_token: Some("token"),
            place_id: Some("place-1"),
        };
        let _ = flow.request_spin(&ctx);
        flow.on_spin_response(Err(SpinFailure::from(err)), &segments);
        flow.outcome().message.clone()
    }

    #[test]
    fn test_failure_mapping() {
        assert_eq!(SpinFailure::from(ApiError::Timeout), SpinFailure::Transport);
        assert_eq!(SpinFailure::from(ApiError::Network("reset".into())), SpinFailure::Transport);
        assert_eq!(SpinFailure::from(ApiError::Decode("eof".into())), SpinFailure::Transport);
        assert_eq!(
            SpinFailure::from(ApiError::Status { status: 500, message: Some("Rate limit exceeded".into()) }),
            SpinFailure::Server { message: Some("Rate limit exceeded".into()) }
        );
        assert_eq!(
            SpinFailure::from(ApiError::Rejected { message: None }),
            SpinFailure::Rejected { message: None }
        );
    }

    #[test]
    fn test_timeout_reads_as_connection_error() {
        assert_eq!(user_message(ApiError::Timeout), CONNECTION_ERROR);
        assert_eq!(user_message(ApiError::Status { status: 502, message: None }), SPIN_FAILED_ERROR);
        assert_eq!(user_message(ApiError::Rejected { message: None }), SPIN_REJECTED_ERROR);
    }

    #[test]
    fn test_timeout_display_names_the_limit() {
        assert_eq!(ApiError::Timeout.to_string(), "Request timed out after 10000 ms");
    }
}
