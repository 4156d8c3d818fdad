//! CORS header computation shared by every webhook entry point.
//!
//! - `origin` -- Origin normalization and `Access-Control-Allow-Origin` choice
//! - `policy` -- full header sets for preflight and actual requests

pub mod origin;
pub mod policy;

pub use origin::{determine_allowed_origin, is_null_origin, normalize_origin};
pub use policy::{
    apply_cors_headers, apply_fallback_cors_headers, CorsHeaders, CorsPolicyConfig, CorsRequest,
    HeaderSink,
};
