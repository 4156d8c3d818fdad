//! Host-bound resume tokens.
//!
//! A resume URL carries a token computed over `<host><path>`. The query
//! string is not part of the signed data. Binding the host means a URL
//! issued for one public hostname is rejected when replayed against another.

use waypost_types::webhook::WaitingWebhookRequest;

/// Query parameter that carries the resume token.
pub const WAITING_TOKEN_QUERY_PARAM: &str = "signature";

/// Signs and verifies resume URLs with a server-held secret.
pub trait UrlSigner: Send + Sync {
    /// Hex token for `data`.
    fn sign(&self, data: &str) -> String;

    /// Constant-time check of `token` against `data`.
    fn verify(&self, data: &str, token: &str) -> bool;
}

/// The host the client addressed.
///
/// `X-Forwarded-Host` wins over `Host` so tokens survive a reverse proxy.
/// A comma-separated forwarded list yields its first (client-facing) entry.
/// Ports are kept verbatim.
pub fn effective_host(req: &WaitingWebhookRequest) -> Option<&str> {
    let forwarded = req
        .header("x-forwarded-host")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|host| !host.is_empty());

    forwarded.or_else(|| req.header("host").map(str::trim).filter(|host| !host.is_empty()))
}

/// The string a resume token is computed over.
pub fn url_for_signing(host: &str, path: &str) -> String {
    format!("{host}{path}")
}

/// Split `scheme://host[:port][/path]` into its three parts.
///
/// The returned path has no trailing slash and is empty for a bare host.
pub fn split_base_url(base_url: &str) -> Option<(&str, &str, &str)> {
    let (scheme, rest) = base_url.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    let (host, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    if host.is_empty() {
        return None;
    }
    Some((scheme, host, path.trim_end_matches('/')))
}
