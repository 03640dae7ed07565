//! Encoding of the submission list as a remote file payload.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use super::{RemoteError, RemoteFile, RemoteResult};
use crate::models::Record;

/// The remote representation: the full record list plus its version token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub records: Vec<Record>,
    pub version_token: String,
}

/// Serialize records as pretty JSON, then base64.
pub fn encode_document(records: &[Record]) -> RemoteResult<String> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|error| RemoteError::Encode(error.to_string()))?;
    Ok(BASE64_STANDARD.encode(json))
}

/// Decode a fetched file into its record list.
///
/// The contents API wraps base64 payloads across lines, so whitespace is
/// dropped before decoding.
pub fn decode_document(file: &RemoteFile) -> RemoteResult<RemoteDocument> {
    let compact: String = file
        .content
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    let bytes = BASE64_STANDARD
        .decode(compact)
        .map_err(|error| RemoteError::InvalidPayload(format!("content is not base64: {error}")))?;
    let records = serde_json::from_slice::<Vec<Record>>(&bytes).map_err(|error| {
        RemoteError::InvalidPayload(format!("content is not a record list: {error}"))
    })?;

    Ok(RemoteDocument {
        records,
        version_token: file.sha.clone(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("Ash Ketchum", "Pikachu", "3/7/2024, 9:05:01 PM"),
            Record::new("Misty Waterflower", "Starmie", "3/6/2024, 8:00:00 AM"),
        ]
    }

    #[test]
    fn encoded_payload_is_pretty_json() {
        let encoded = encode_document(&sample()).unwrap();
        let json = String::from_utf8(BASE64_STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(json.starts_with("[\n  {\n    \"name\": \"Ash Ketchum\""));
    }

    #[test]
    fn decode_accepts_line_wrapped_payload() {
        let encoded = encode_document(&sample()).unwrap();
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        let document = decode_document(&RemoteFile {
            content: wrapped,
            sha: "abc123".to_string(),
        })
        .unwrap();
        assert_eq!(document.records, sample());
        assert_eq!(document.version_token, "abc123");
    }

    #[test]
    fn decode_rejects_non_base64_content() {
        let err = decode_document(&RemoteFile {
            content: "not base64!".to_string(),
            sha: "abc".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidPayload(message) if message.contains("base64")));
    }

    #[test]
    fn decode_rejects_non_list_json() {
        let err = decode_document(&RemoteFile {
            content: BASE64_STANDARD.encode(r#"{"name":"Ash"}"#),
            sha: "abc".to_string(),
        })
        .unwrap_err();
        assert!(
            matches!(err, RemoteError::InvalidPayload(message) if message.contains("record list"))
        );
    }
}
