//! HMAC-SHA256 request signature.
//!
//! The signed text is the concatenation of the final URL, the API key, the
//! platform, the device identifier and (when the endpoint opts in) the
//! parameter string. It is base64-encoded, then keyed with the API key.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::endpoint::HttpMethod;
use crate::error::{Error, ErrorKind, Result};
use crate::request::TransportRequest;

type HmacSha256 = Hmac<Sha256>;

/// Everything the signature covers.
#[derive(Debug, Clone, Copy)]
pub struct SignatureInput<'a> {
    pub url: &'a str,
    pub api_key: &'a str,
    pub platform: &'a str,
    pub device_id: &'a str,
    pub parameters: Option<&'a str>,
}

impl<'a> SignatureInput<'a> {
    /// The clear text before base64 and HMAC.
    pub fn clear_text(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.url,
            self.api_key,
            self.platform,
            self.device_id,
            self.parameters.unwrap_or("")
        )
    }
}

/// Compute the lowercase hex signature for the given input.
pub fn sign(input: &SignatureInput<'_>) -> Result<String> {
    let encoded = STANDARD.encode(input.clear_text());

    let mut mac = HmacSha256::new_from_slice(input.api_key.as_bytes())
        .map_err(|e| Error::new(ErrorKind::Signature(e.to_string())))?;
    mac.update(encoded.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// The parameter string a request's signature may cover.
///
/// Query string for GET and DELETE, UTF-8 body text otherwise. Empty when
/// there is nothing to sign.
pub fn parameter_string(method: HttpMethod, request: &TransportRequest) -> String {
    if method.uses_query_parameters() {
        let url = request.url().as_str();
        url.split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default()
    } else {
        request.body_text().map(str::to_string).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn input<'a>(parameters: Option<&'a str>) -> SignatureInput<'a> {
        SignatureInput {
            url: "https://api.example.com/posts?page=2&style=5",
            api_key: "secret-key",
            platform: "ios",
            device_id: "device-1",
            parameters,
        }
    }

    #[test]
    fn test_clear_text_concatenation() {
        assert_eq!(
            input(None).clear_text(),
            "https://api.example.com/posts?page=2&style=5secret-keyiosdevice-1"
        );
        assert_eq!(
            input(Some("page=2&style=5")).clear_text(),
            "https://api.example.com/posts?page=2&style=5secret-keyiosdevice-1page=2&style=5"
        );
    }

    #[test]
    fn test_signature_matches_manual_computation() {
        let input = input(None);
        let encoded = STANDARD.encode(input.clear_text());
        let mut mac = HmacSha256::new_from_slice(b"secret-key").unwrap();
        mac.update(encoded.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(sign(&input).unwrap(), expected);
    }

    #[test]
    fn test_signature_shape_and_determinism() {
        let a = sign(&input(None)).unwrap();
        let b = sign(&input(None)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_signature_depends_on_parameters() {
        assert_ne!(
            sign(&input(None)).unwrap(),
            sign(&input(Some("page=2&style=5"))).unwrap()
        );
    }

    #[test]
    fn test_known_vector() {
        // base64("") is "", so this is HMAC-SHA256 of "" under an empty key.
        let input = SignatureInput {
            url: "",
            api_key: "",
            platform: "",
            device_id: "",
            parameters: None,
        };
        assert_eq!(
            sign(&input).unwrap(),
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }

    #[test]
    fn test_parameter_string_by_method() {
        let mut req = TransportRequest::new(
            HttpMethod::Get,
            Url::parse("https://api.example.com/posts?page=2&style=5").unwrap(),
        );
        assert_eq!(parameter_string(HttpMethod::Get, &req), "page=2&style=5");
        assert_eq!(parameter_string(HttpMethod::Delete, &req), "page=2&style=5");

        req.set_body(r#"{"page":1}"#);
        assert_eq!(parameter_string(HttpMethod::Post, &req), r#"{"page":1}"#);

        let bare = TransportRequest::new(
            HttpMethod::Post,
            Url::parse("https://api.example.com/search").unwrap(),
        );
        assert_eq!(parameter_string(HttpMethod::Post, &bare), "");
        assert_eq!(parameter_string(HttpMethod::Get, &bare), "");
    }
}
