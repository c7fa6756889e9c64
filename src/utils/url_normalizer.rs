//! Destination URL validation and redirect target normalization.
//!
//! URLs are stored exactly as submitted. A bare domain such as `example.com`
//! is accepted and `https://` is assumed when redirecting.

use url::{Host, Url};

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a valid host")]
    MissingHost,

    #[error("URLs with embedded credentials are not allowed")]
    Credentials,
}

/// Returns true if the input carries an explicit `http://` or `https://` prefix.
fn has_http_scheme(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Validates a destination URL.
///
/// # Rules
///
/// 1. **Whitespace**: the URL must be non-empty and contain no whitespace or
///    control characters
/// 2. **Protocol**: when present, must be `http` or `https`
/// 3. **Scheme-less input**: parsed as `https://{input}`; the host must contain a
///    dot, be `localhost`, or be an IP address
/// 4. **Credentials**: `user:pass@` is rejected
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and other non-web schemes.
///
/// # Errors
///
/// See [`UrlValidationError`].
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/path").is_ok());
/// assert!(validate_url("example.com").is_ok());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::InvalidFormat(
            "URL must not contain whitespace".to_string(),
        ));
    }

    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "URL must not contain control characters".to_string(),
        ));
    }

    let url = if has_http_scheme(input) {
        Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?
    } else {
        // `localhost:3000` parses with scheme "localhost", so only treat the
        // input as foreign-scheme when the remainder is not a port.
        if let Ok(parsed) = Url::parse(input)
            && !looks_like_host_with_port(input)
        {
            tracing::debug!(scheme = parsed.scheme(), "Rejected non-http URL scheme");
            return Err(UrlValidationError::UnsupportedProtocol);
        }

        let url = Url::parse(&format!("https://{input}"))
            .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

        let plausible_host = match url.host() {
            Some(Host::Domain(domain)) => domain.contains('.') || domain == "localhost",
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
            None => false,
        };
        if !plausible_host {
            return Err(UrlValidationError::MissingHost);
        }

        url
    };

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::Credentials);
    }

    Ok(())
}

/// Matches `host:port` and `host:port/path` forms.
fn looks_like_host_with_port(input: &str) -> bool {
    let Some((_, rest)) = input.split_once(':') else {
        return false;
    };
    let port = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
}

/// Returns the URL a redirect should point to.
///
/// Stored URLs without an `http://`/`https://` prefix get `https://` prepended.
/// ASCII targets are otherwise returned verbatim. Non-ASCII targets are
/// re-serialized through [`Url`] (IDNA host, percent-encoded path) so they fit
/// in a `Location` header.
pub fn redirect_target(original_url: &str) -> String {
    let target = if has_http_scheme(original_url) {
        original_url.to_string()
    } else {
        format!("https://{original_url}")
    };

    if target.is_ascii() {
        return target;
    }

    match Url::parse(&target) {
        Ok(url) => url.into(),
        Err(_) => target,
    }
}
