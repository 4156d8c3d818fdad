//! CORS header sets for preflight and actual requests.
//!
//! Per request there are two paths: `OPTIONS` is a preflight (headers are
//! computed and the caller answers 204), every other method is an actual
//! request (headers are computed and the handler runs). Nothing is kept
//! between requests.

use waypost_types::webhook::{AccessControlOptions, HttpMethod};

use super::origin::determine_allowed_origin;

pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
pub const ALLOW_METHODS: &str = "access-control-allow-methods";
pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
pub const MAX_AGE: &str = "access-control-max-age";

/// Seconds a browser may cache a preflight answer.
pub const PREFLIGHT_MAX_AGE_SECS: u32 = 300;

/// Anything response headers can be written into.
pub trait HeaderSink {
    fn set_header(&mut self, name: &'static str, value: String);
}

/// The request headers CORS decisions depend on.
#[derive(Debug, Clone, Copy)]
pub struct CorsRequest<'a> {
    pub method: HttpMethod,
    pub origin: Option<&'a str>,
    /// `Access-Control-Request-Method`
    pub request_method: Option<&'a str>,
    /// `Access-Control-Request-Headers`
    pub request_headers: Option<&'a str>,
}

impl CorsRequest<'_> {
    pub fn is_preflight(&self) -> bool {
        self.method == HttpMethod::Options
    }

    /// The method the browser intends to use: the announced one for a
    /// preflight, the actual one otherwise.
    pub fn requested_method(&self) -> Option<HttpMethod> {
        if self.is_preflight() {
            self.request_method.and_then(|m| m.parse().ok())
        } else {
            Some(self.method)
        }
    }
}

/// Per-route CORS configuration for one request.
#[derive(Debug, Clone, Copy)]
pub struct CorsPolicyConfig<'a> {
    pub allowed_methods: &'a [HttpMethod],
    pub origin_policy: Option<&'a AccessControlOptions>,
    pub is_preflight: bool,
    /// `None` (a preflight without a usable request method) disables
    /// `origin_policy`.
    pub requested_method: Option<HttpMethod>,
}

/// Write the CORS headers for a request into `res`.
pub fn apply_cors_headers(req: &CorsRequest<'_>, res: &mut impl HeaderSink, config: &CorsPolicyConfig<'_>) {
    if !config.allowed_methods.is_empty() {
        let methods: Vec<&str> = config.allowed_methods.iter().map(HttpMethod::as_str).collect();
        res.set_header(ALLOW_METHODS, format!("OPTIONS, {}", methods.join(", ")));
    }

    // A preflight that names no method has no route policy to look up.
    let policy = config
        .requested_method
        .and(config.origin_policy)
        .and_then(|options| options.allowed_origins.as_deref());
    res.set_header(ALLOW_ORIGIN, determine_allowed_origin(policy, req.origin));

    if config.is_preflight {
        res.set_header(MAX_AGE, PREFLIGHT_MAX_AGE_SECS.to_string());
        if let Some(requested) = req.request_headers.filter(|h| !h.is_empty()) {
            res.set_header(ALLOW_HEADERS, requested.to_string());
        }
    }
}

/// CORS headers for routes whose webhook manager has no origin policy.
///
/// Keeps preflight working on those routes instead of failing silently.
pub fn apply_fallback_cors_headers(
    req: &CorsRequest<'_>,
    res: &mut impl HeaderSink,
    allowed_methods: Option<&[HttpMethod]>,
) {
    let config = CorsPolicyConfig {
        allowed_methods: allowed_methods.unwrap_or(&[]),
        origin_policy: None,
        is_preflight: req.is_preflight(),
        requested_method: req.requested_method(),
    };
    apply_cors_headers(req, res, &config);
}

/// Ordered header list; the HTTP layer copies it onto the real response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsHeaders(Vec<(&'static str, String)>);

impl CorsHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl HeaderSink for CorsHeaders {
    fn set_header(&mut self, name: &'static str, value: String) {
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }
}
