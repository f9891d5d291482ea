//! Inline binary payloads encoded as base64 data URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    NotBase64(String),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotBase64(message) => write!(f, "payload is not valid base64: {message}"),
        }
    }
}

impl Error for PayloadError {}

/// Encodes `bytes` as `data:<mime>;base64,<payload>`.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Decodes a data URL produced by [`encode_data_url`].
///
/// Bare base64 without the `data:` header is accepted too.
pub fn decode_data_url(value: &str) -> Result<Vec<u8>, PayloadError> {
    let encoded = match value.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default(),
        None => value,
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(|err| PayloadError::NotBase64(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_mime_and_payload() {
        let url = encode_data_url("text/plain", b"hi");
        assert_eq!(url, "data:text/plain;base64,aGk=");
        assert_eq!(decode_data_url(&url).unwrap(), b"hi");
        assert_eq!(decode_data_url("aGk=").unwrap(), b"hi");
    }

    #[test]
    fn garbage_payload_is_an_error() {
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }
}
