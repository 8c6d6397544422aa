//! Content-type resolution for uploaded objects

/// Used when neither the origin nor the key's extension says anything
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Pick the content type to store with the object.
///
/// The origin's `Content-Type` header wins; otherwise the key's extension is
/// looked up, and failing that the generic binary type is used.
pub fn resolve(header: Option<&str>, key: &str) -> String {
    if let Some(declared) = header.map(str::trim).filter(|h| !h.is_empty()) {
        return declared.to_string();
    }

    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}
