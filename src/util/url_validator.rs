use thiserror::Error;
use url::Url;

/// Errors that can occur when validating a link before handing it to the OS.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates an article link before opening it in the system browser.
///
/// Article URLs come straight from third-party feeds. Passing a `file://` or
/// custom-scheme URL to the OS opener could launch arbitrary handlers, so only
/// `http`/`https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use toadman::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://news.ycombinator.com/item?id=1").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// assert!(validate_url_for_open("").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
