//! Route handlers.

use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use crate::protocol::models::{
    EndpointIndex, IssueRequest, IssueResponse, KeyListing, ListResponse, RelayResponse,
    StatusResponse, VerifyRequest, VerifyResponse,
};
use crate::registry::ValidationOutcome;
use crate::relay::{Channel, RelayPayload};
use crate::GatewayError;

/// Service name reported by discovery.
pub const SERVICE_NAME: &str = "keyrelay";

/// Path of the verification route.
pub const VERIFY_PATH: &str = "/webhook/verify";

/// Path of the issuance route.
pub const GENERATE_KEY_PATH: &str = "/webhook/generate-key";

/// Path of the listing route.
pub const LIST_KEYS_PATH: &str = "/webhook/keys";

const EMPTY_OBJECT: &[u8] = b"{}";

/// Path of a channel's relay route.
pub fn relay_path(channel: Channel) -> String {
    format!("/webhook/discord/{}", channel.slug())
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

/// Parse a JSON request body; a blank body means "all defaults".
///
/// Content-Type is not checked.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, GatewayError> {
    if is_blank(body) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidArgument(format!("malformed request body: {}", e)))
}

/// Read a request body as a form when declared so, as JSON otherwise.
async fn read_body<T>(request: Request) -> Result<T, GatewayError>
where
    T: DeserializeOwned + Default + Send,
{
    if is_form(request.headers()) {
        let Form(value) = Form::<T>::from_request(request, &())
            .await
            .map_err(|e| GatewayError::InvalidArgument(e.body_text()))?;
        return Ok(value);
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(|e| GatewayError::InvalidArgument(e.body_text()))?;
    parse_body(&body)
}

/// `POST /webhook/verify`
pub async fn verify_key(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<VerifyResponse>, ApiError> {
    let request: VerifyRequest = read_body(request).await.map_err(ApiError::verify)?;

    info!(
        key = request.key.as_deref().unwrap_or(""),
        user_id = ?request.user_id,
        hwid = ?request.hwid,
        "Key verification request"
    );

    let outcome = state
        .registry
        .validate(request.key.as_deref())
        .map_err(ApiError::verify)?;

    match &outcome {
        ValidationOutcome::Valid(grant) => {
            info!(tier = %grant.tier, lifetime = grant.is_lifetime, "Key valid")
        }
        ValidationOutcome::Invalid(reason) => info!(%reason, "Key rejected"),
    }

    Ok(Json(outcome.into()))
}

/// `POST /webhook/generate-key`
pub async fn generate_key(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<IssueResponse>, ApiError> {
    let request: IssueRequest = read_body(request).await.map_err(ApiError::issue)?;

    let issued = state
        .registry
        .issue(&request.tier, request.duration)
        .map_err(ApiError::issue)?;

    Ok(Json(issued.into()))
}

/// `GET /webhook/keys`
pub async fn list_keys(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let views = state.registry.list().map_err(ApiError::list)?;
    Ok(Json(ListResponse {
        keys: views.into_iter().map(KeyListing::from).collect(),
    }))
}

/// `POST /webhook/discord/<channel>`
///
/// An unconfigured channel fails before the body is looked at. A blank
/// body is sent as `{}`; anything else is forwarded byte for byte once it
/// is known to be JSON.
pub async fn relay_notification(
    state: AppState,
    channel: Channel,
    body: Bytes,
) -> Result<Json<RelayResponse>, ApiError> {
    if !state.relay.is_configured(channel) {
        return Err(ApiError::relay(GatewayError::Configuration { channel }));
    }

    info!(%channel, bytes = body.len(), "Forwarding notification");

    let body = if is_blank(&body) {
        Bytes::from_static(EMPTY_OBJECT)
    } else {
        body
    };
    let payload = RelayPayload::from_json_bytes(body).map_err(ApiError::relay)?;
    state
        .relay
        .forward(channel, payload)
        .await
        .map_err(ApiError::relay)?;

    Ok(Json(RelayResponse { success: true }))
}

/// `GET /`
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointIndex {
            verify: VERIFY_PATH.to_string(),
            key_tracking: relay_path(Channel::KeyTracking),
            developer_activity: relay_path(Channel::DeveloperActivity),
            all_activity: relay_path(Channel::AllActivity),
            generate_key: GENERATE_KEY_PATH.to_string(),
            list_keys: LIST_KEYS_PATH.to_string(),
        },
    })
}

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_blank_uses_defaults() {
        let request: IssueRequest = parse_body(b"").unwrap();
        assert_eq!(request.tier, "BASIC");
        let request: VerifyRequest = parse_body(b"  \n").unwrap();
        assert!(request.key.is_none());
    }

    #[test]
    fn test_parse_body_rejects_wrong_types() {
        let result = parse_body::<VerifyRequest>(br#"{"key": ["a"]}"#);
        assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
        let result = parse_body::<IssueRequest>(br#"{"duration": "eleven"}"#);
        assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
    }

    #[test]
    fn test_is_form() {
        let mut headers = HeaderMap::new();
        assert!(!is_form(&headers));
        headers.insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=utf-8".parse().unwrap(),
        );
        assert!(is_form(&headers));
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_form(&headers));
    }

    #[test]
    fn test_relay_paths() {
        assert_eq!(relay_path(Channel::KeyTracking), "/webhook/discord/key-tracking");
        assert_eq!(
            relay_path(Channel::DeveloperActivity),
            "/webhook/discord/developer-activity"
        );
    }
}
