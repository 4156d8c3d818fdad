//! Waiting-webhook entry point.
//!
//! Serves `/<prefix>/{execution_id}` and `/<prefix>/{execution_id}/{suffix}`
//! for every method. Every response carries CORS headers. Preflights are
//! answered here with the waiting node's allowed methods; everything else is
//! resolved by `WaitingWebhooks`.

use std::collections::{BTreeMap, HashMap};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use waypost_core::cors::{apply_cors_headers, CorsHeaders, CorsPolicyConfig};
use waypost_types::webhook::{HttpMethod, WaitingWebhookRequest, WebhookResponse};

use crate::http::cors::{copy_headers, cors_request};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WaitingPath {
    pub execution_id: String,
    #[serde(default)]
    pub suffix: Option<String>,
}

/// ANY /<prefix>/{execution_id}[/{suffix}]
pub async fn handle_waiting_webhook(
    State(state): State<AppState>,
    Path(params): Path<WaitingPath>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let Ok(method) = method.as_str().parse::<HttpMethod>() else {
        return AppError::MethodNotAllowed(format!("method {method} is not supported")).into_response();
    };

    let webhook_path = match &params.suffix {
        Some(suffix) => format!("{}/{suffix}", params.execution_id),
        None => params.execution_id.clone(),
    };

    let allowed_methods = state.waiting_webhooks.get_webhook_methods(&webhook_path).await;
    let cors_req = cors_request(method, &headers);
    let requested_method = cors_req.requested_method();
    let origin_policy = state
        .waiting_webhooks
        .find_access_control_options(&webhook_path, requested_method.unwrap_or(method));
    let mut cors = CorsHeaders::new();
    apply_cors_headers(
        &cors_req,
        &mut cors,
        &CorsPolicyConfig {
            allowed_methods: &allowed_methods,
            origin_policy: Some(&origin_policy),
            is_preflight: cors_req.is_preflight(),
            requested_method,
        },
    );

    if method == HttpMethod::Options {
        let mut response = StatusCode::NO_CONTENT.into_response();
        copy_headers(&cors, response.headers_mut());
        return response;
    }

    let mut request = WaitingWebhookRequest::new(method, uri.path(), params.execution_id);
    request.suffix = params.suffix;
    request.headers = lowercase_headers(&headers);
    request.query = query;
    request.body = parse_body(&body);

    let mut response = match state.waiting_webhooks.execute_webhook(request).await {
        Ok(resumed) => into_http_response(resumed),
        Err(e) => AppError::from(e).into_response(),
    };
    copy_headers(&cors, response.headers_mut());
    response
}

fn lowercase_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

/// JSON when the body parses, a string otherwise, null when empty.
fn parse_body(body: &Bytes) -> serde_json::Value {
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn into_http_response(resumed: WebhookResponse) -> Response {
    let status = StatusCode::from_u16(resumed.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = match resumed.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    };
    for (name, value) in resumed.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => tracing::debug!(header = %name, "dropping invalid response header from engine"),
        }
    }
    response
}
