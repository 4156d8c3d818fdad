//! Origin header helpers.

/// Policy value that allows any origin.
pub const ANY_ORIGIN: &str = "*";

/// Origin sent by browsers for opaque contexts such as `file://` pages.
const NULL_ORIGIN: &str = "null";

/// Map the literal `"null"` origin to `None`; anything else passes through.
pub fn normalize_origin(origin: Option<&str>) -> Option<&str> {
    origin.filter(|o| *o != NULL_ORIGIN)
}

/// True for a missing, empty, or `"null"` origin.
pub fn is_null_origin(origin: Option<&str>) -> bool {
    match origin {
        None => true,
        Some(o) => o.is_empty() || o == NULL_ORIGIN,
    }
}

/// Decide the `Access-Control-Allow-Origin` value.
///
/// - `*` policy: `*` for a null-ish origin, otherwise the origin is echoed.
/// - comma-separated allow-list: a listed origin is echoed; anything else gets
///   the first listed origin, so a preflight never fails outright but an
///   unlisted origin is never granted either.
/// - no policy: echo the origin when present, else `*`.
pub fn determine_allowed_origin(policy: Option<&str>, request_origin: Option<&str>) -> String {
    let allow_list: Vec<&str> = match policy {
        Some(ANY_ORIGIN) => {
            return if is_null_origin(request_origin) {
                ANY_ORIGIN.to_string()
            } else {
                request_origin.unwrap_or(ANY_ORIGIN).to_string()
            };
        }
        Some(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect(),
        None => Vec::new(),
    };

    match allow_list.first() {
        Some(first) => {
            let requested = normalize_origin(request_origin);
            match requested {
                Some(origin) if allow_list.contains(&origin) => origin.to_string(),
                _ => (*first).to_string(),
            }
        }
        None => match request_origin.filter(|o| !o.is_empty()) {
            Some(origin) => origin.to_string(),
            None => ANY_ORIGIN.to_string(),
        },
    }
}
