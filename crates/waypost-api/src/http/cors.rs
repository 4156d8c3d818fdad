//! Bridge between the CORS policy and axum responses.

use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use waypost_core::cors::{apply_fallback_cors_headers, CorsHeaders, CorsRequest, HeaderSink};
use waypost_types::webhook::HttpMethod;

/// Methods advertised on JSON API routes.
const API_METHODS: &[HttpMethod] = &[HttpMethod::Get, HttpMethod::Post];

/// [`HeaderSink`] over an axum header map.
pub struct ResponseHeaders<'a>(pub &'a mut HeaderMap);

impl HeaderSink for ResponseHeaders<'_> {
    fn set_header(&mut self, name: &'static str, value: String) {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                self.0.insert(HeaderName::from_static(name), value);
            }
            Err(_) => tracing::debug!(header = name, "dropping CORS header with invalid value"),
        }
    }
}

/// Copy computed CORS headers onto a response.
pub fn copy_headers(cors: &CorsHeaders, headers: &mut HeaderMap) {
    let mut sink = ResponseHeaders(headers);
    for (name, value) in cors.iter() {
        sink.set_header(name, value.to_string());
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// CORS-relevant view of request headers.
pub fn cors_request(method: HttpMethod, headers: &HeaderMap) -> CorsRequest<'_> {
    CorsRequest {
        method,
        origin: header_str(headers, &ORIGIN),
        request_method: header_str(headers, &ACCESS_CONTROL_REQUEST_METHOD),
        request_headers: header_str(headers, &ACCESS_CONTROL_REQUEST_HEADERS),
    }
}

/// Fallback-mode CORS for routes without an origin policy.
///
/// Preflights are answered with 204 without reaching the route.
pub async fn fallback_cors(req: Request, next: Next) -> Response {
    let Ok(method) = req.method().as_str().parse::<HttpMethod>() else {
        return next.run(req).await;
    };
    let mut cors = CorsHeaders::new();
    let cors_req = cors_request(method, req.headers());
    apply_fallback_cors_headers(&cors_req, &mut cors, Some(API_METHODS));

    let mut response = if cors_req.is_preflight() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    copy_headers(&cors, response.headers_mut());
    response
}
