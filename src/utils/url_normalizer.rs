//! URL validation and normalization.
//!
//! Submitted URLs may omit the scheme (`example.com`); `https://` is assumed.
//! The result is a canonical absolute HTTP(S) URL.

use url::Url;

/// Longest URL accepted for shortening.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Scheme**: added as `https://` when the input has none; only HTTP and HTTPS are kept
/// 2. **Host**: required, converted to lowercase
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: removed
/// 5. **Root path**: a lone `/` without a query is dropped, so `example.com`
///    becomes `https://example.com`
/// 6. **Query and path**: preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError`] describing the first rule the input breaks.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();

    url.set_host(Some(&host)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    let mut normalized = url.to_string();
    if url.path() == "/" && url.query().is_none() && normalized.ends_with('/') {
        normalized.pop();
    }

    Ok(normalized)
}

/// Returns true when the input starts with an explicit `scheme://`.
fn has_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(pos) => {
            let scheme = &input[..pos];
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
