//! Common validation utilities.

use validator::{ValidateUrl, ValidationError};

/// Validates that a string contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a URL is absolute and uses http or https.
///
/// Used for base URLs that other values get appended to, so no query string
/// or fragment is allowed.
pub fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    let http_scheme = url.starts_with("https://") || url.starts_with("http://");

    if !http_scheme || !url.validate_url() {
        let mut err = ValidationError::new("base_url_scheme");
        err.message = Some("Base URL must be an absolute http(s) URL".into());
        return Err(err);
    }

    if url.contains('?') || url.contains('#') {
        let mut err = ValidationError::new("base_url_suffix");
        err.message = Some("Base URL must not contain a query or fragment".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("u1").is_ok());
        assert!(validate_not_blank("  padded  ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }

    #[test]
    fn test_validate_not_blank_error_message() {
        let err = validate_not_blank("").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Value must not be blank");
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://dl.example.app/invite/").is_ok());
        assert!(validate_base_url("http://localhost:8080/r/").is_ok());
        assert!(validate_base_url("https://example.com").is_ok());
    }

    #[test]
    fn test_validate_base_url_rejects_bad_scheme() {
        assert!(validate_base_url("ftp://example.com/").is_err());
        assert!(validate_base_url("example.com/invite/").is_err());
        assert!(validate_base_url("https://").is_err());
        assert!(validate_base_url("").is_err());
    }

    #[test]
    fn test_validate_base_url_rejects_malformed_urls() {
        for url in [
            "http://:80/",
            "https://[::1/",
            "https://exa%zzmple.com/",
            "https://exa mple.com/",
        ] {
            let err = validate_base_url(url).unwrap_err();
            assert_eq!(err.code, "base_url_scheme", "accepted {url}");
        }
        assert!(validate_base_url("https://[::1]:8443/r/").is_ok());
    }

    #[test]
    fn test_validate_base_url_rejects_query_and_fragment() {
        let err = validate_base_url("https://example.com/?code=").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Base URL must not contain a query or fragment"
        );
        assert!(validate_base_url("https://example.com/#x").is_err());
    }
}
