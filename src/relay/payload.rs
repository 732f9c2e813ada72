//! Opaque relay payloads.

use crate::GatewayError;
use bytes::Bytes;

/// A JSON document forwarded without interpretation.
///
/// Construction only checks that the bytes are well-formed JSON; the relay
/// never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayPayload(Bytes);

impl RelayPayload {
    /// Wrap raw request bytes.
    ///
    /// # Errors
    /// * `InvalidArgument` - the bytes are not a JSON document
    pub fn from_json_bytes(bytes: Bytes) -> Result<Self, GatewayError> {
        serde_json::from_slice::<serde::de::IgnoredAny>(&bytes).map_err(|e| {
            GatewayError::InvalidArgument(format!("payload is not valid JSON: {}", e))
        })?;
        Ok(Self(bytes))
    }

    /// Serialize a JSON value into a payload.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, GatewayError> {
        serde_json::to_vec(value)
            .map(|v| Self(Bytes::from(v)))
            .map_err(|e| GatewayError::Internal(format!("failed to serialize payload: {}", e)))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no bytes (never true for a constructed payload).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the underlying bytes.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_any_json_document() {
        for doc in [&b"{}"[..], b"[]", b"{\"embeds\":[{\"title\":\"x\"}]}", b"42", b"\"text\""] {
            let payload = RelayPayload::from_json_bytes(Bytes::copy_from_slice(doc)).unwrap();
            assert_eq!(payload.as_bytes(), doc);
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        for doc in [&b""[..], b"{", b"not json", b"{} trailing"] {
            let result = RelayPayload::from_json_bytes(Bytes::copy_from_slice(doc));
            assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_from_value() {
        let payload = RelayPayload::from_value(&serde_json::json!({"content": "hello"})).unwrap();
        assert_eq!(payload.as_bytes(), br#"{"content":"hello"}"#);
        assert_eq!(payload.len(), 19);
        assert!(!payload.is_empty());
    }
}
