use email_address::EmailAddress;
use url::Url;

use crate::error::{Error, Result};

/// Check the base URL and return it ready for endpoint concatenation.
///
/// Accepts absolute `http`/`https` URLs with a host. Query strings and
/// fragments are rejected since endpoint paths are appended to the URL text.
/// The normalized serialization is returned (percent-encoded path, punycode
/// host), with trailing slashes stripped; any path prefix is kept.
pub fn base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|_| Error::invalid("Base URL is not valid"))?;

    let usable = matches!(parsed.scheme(), "http" | "https")
        && parsed.host_str().is_some_and(|h| !h.is_empty())
        && parsed.query().is_none()
        && parsed.fragment().is_none();
    if !usable {
        return Err(Error::invalid("Base URL is not valid"));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// The key must contain something other than whitespace.
pub fn api_key(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("API key should not be empty"));
    }
    Ok(trimmed.to_string())
}

pub fn email(raw: &str) -> Result<()> {
    if EmailAddress::is_valid(raw) {
        Ok(())
    } else {
        Err(Error::invalid("Provided email is not valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(result: Result<impl std::fmt::Debug>, message: &str) {
        match result {
            Err(Error::InvalidInput(m)) => assert_eq!(m, message),
            other => panic!("expected InvalidInput({message:?}), got {other:?}"),
        }
    }

    // -- base URL --

    #[test]
    fn base_url_accepts_plain_host() {
        assert_eq!(
            base_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn base_url_keeps_path_prefix_and_strips_trailing_slash() {
        assert_eq!(
            base_url("http://repo.local:8081/artifactory/").unwrap(),
            "http://repo.local:8081/artifactory"
        );
        assert_eq!(base_url("  https://example.com//  ").unwrap(), "https://example.com");
    }

    #[test]
    fn base_url_returns_normalized_form() {
        assert_eq!(base_url("http:\\\\127.0.0.1:9").unwrap(), "http://127.0.0.1:9");
        assert_eq!(
            base_url("http://127.0.0.1:9/my repo").unwrap(),
            "http://127.0.0.1:9/my%20repo"
        );
        assert_eq!(
            base_url("http://bücher.invalid").unwrap(),
            "http://xn--bcher-kva.invalid"
        );
        assert_eq!(
            base_url("HTTPS://Example.COM/Artifactory/").unwrap(),
            "https://example.com/Artifactory"
        );
    }

    #[test]
    fn base_url_rejects_malformed() {
        for raw in [
            "",
            "   ",
            "example.com",
            "not a url",
            "://missing-scheme",
            "https://",
            "ftp://example.com",
            "mailto:someone@example.com",
            "file:///etc/passwd",
            "https://example.com?x=1",
            "https://example.com#top",
        ] {
            assert_invalid(base_url(raw), "Base URL is not valid");
        }
    }

    // -- API key --

    #[test]
    fn api_key_trims_whitespace() {
        assert_eq!(api_key("  abc123\n").unwrap(), "abc123");
    }

    #[test]
    fn api_key_rejects_blank() {
        for raw in ["", " ", "\t\n", "   \r\n  "] {
            assert_invalid(api_key(raw), "API key should not be empty");
        }
    }

    // -- email --

    #[test]
    fn email_accepts_valid_addresses() {
        for raw in ["alice@example.com", "bob.smith+ci@sub.example.org"] {
            assert!(email(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn email_rejects_invalid_addresses() {
        for raw in ["not-an-email", "", "@example.com", "alice@", "a b@example.com"] {
            assert_invalid(email(raw), "Provided email is not valid");
        }
    }
}
