//! Base64 data URIs used to ship audio inside JSON payloads

use std::fmt;

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::errors::DomainError;

/// MIME type assumed when a payload carries bare base64 without a header
const FALLBACK_MIME: &str = "application/octet-stream";

/// Standard alphabet; encodes with padding, decodes with or without it
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded `data:<mime>;base64,<payload>` value
///
/// Parsing accepts either a full data URI or a bare base64 string (some
/// clients strip the header before sending). Formatting always produces the
/// full URI.
#[derive(Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: Option<String>,
    data: Vec<u8>,
}

impl DataUri {
    /// Wrap raw bytes with a MIME type
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            data,
        }
    }

    /// Parse a data URI (or bare base64) into its bytes
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDataUri` when the header is malformed,
    /// the URI is not base64-encoded, or the payload is not valid base64.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();

        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    DomainError::InvalidDataUri("missing ',' after data URI header".to_string())
                })?;

                let mut params = header.split(';');
                let mime = params.next().unwrap_or_default().trim();
                if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                    return Err(DomainError::InvalidDataUri(
                        "only base64-encoded data URIs are supported".to_string(),
                    ));
                }

                let mime = (!mime.is_empty()).then(|| mime.to_string());
                (mime, payload)
            },
            None => (None, input),
        };

        let data = BASE64
            .decode(payload.trim())
            .map_err(|e| DomainError::InvalidDataUri(format!("invalid base64 payload: {e}")))?;

        Ok(Self { mime_type, data })
    }

    /// MIME type declared in the header, if any
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Decoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the decoded bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Whether the decoded payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data:{};base64,{}",
            self.mime_type.as_deref().unwrap_or(FALLBACK_MIME),
            BASE64.encode(&self.data)
        )
    }
}

// Audio payloads can be megabytes; keep Debug output readable.
impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_audio_bytes() {
        let uri = DataUri::new("audio/mp3", vec![0x01, 0x02]);
        assert_eq!(uri.to_string(), "data:audio/mp3;base64,AQI=");
    }

    #[test]
    fn parses_full_data_uri() {
        let uri = DataUri::parse("data:audio/webm;base64,AQID").unwrap();
        assert_eq!(uri.mime_type(), Some("audio/webm"));
        assert_eq!(uri.data(), &[1, 2, 3]);
    }

    #[test]
    fn parses_codec_parameters() {
        let uri = DataUri::parse("data:audio/webm;codecs=opus;base64,AQID").unwrap();
        assert_eq!(uri.mime_type(), Some("audio/webm"));
        assert_eq!(uri.into_data(), vec![1, 2, 3]);
    }

    #[test]
    fn parses_bare_base64() {
        let uri = DataUri::parse("AQID").unwrap();
        assert_eq!(uri.mime_type(), None);
        assert_eq!(uri.data(), &[1, 2, 3]);
    }

    #[test]
    fn parses_unpadded_payload() {
        let uri = DataUri::parse("data:audio/webm;base64,AQI").unwrap();
        assert_eq!(uri.data(), &[1, 2]);

        let padded = DataUri::parse("data:audio/webm;base64,AQI=").unwrap();
        assert_eq!(padded.data(), uri.data());
    }

    #[test]
    fn empty_payload_decodes_to_empty_bytes() {
        let uri = DataUri::parse("data:audio/webm;base64,").unwrap();
        assert!(uri.is_empty());
    }

    #[test]
    fn rejects_missing_comma() {
        let result = DataUri::parse("data:audio/webm;base64");
        assert!(matches!(result, Err(DomainError::InvalidDataUri(_))));
    }

    #[test]
    fn rejects_non_base64_uri() {
        let result = DataUri::parse("data:text/plain,hello");
        assert!(matches!(result, Err(DomainError::InvalidDataUri(_))));
    }

    #[test]
    fn rejects_invalid_payload() {
        let result = DataUri::parse("data:audio/webm;base64,@@@");
        assert!(matches!(result, Err(DomainError::InvalidDataUri(_))));
    }

    #[test]
    fn missing_mime_formats_as_octet_stream() {
        let uri = DataUri::parse("AQI=").unwrap();
        assert_eq!(uri.to_string(), "data:application/octet-stream;base64,AQI=");
    }

    #[test]
    fn debug_hides_payload() {
        let uri = DataUri::new("audio/mp3", vec![0u8; 1024]);
        let debug = format!("{uri:?}");
        assert!(debug.contains("len: 1024"));
        assert!(!debug.contains("AAAA"));
    }
}
