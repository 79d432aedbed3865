//! Success envelope returned by mutating operations

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Outcome of a successful mutating call.
///
/// Serializes as `{"status": "success", "http_status": .., "message": ..}`,
/// the counterpart of [`ApiFailure`](crate::ApiFailure).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope<T = String> {
    /// Status code the provider answered with
    pub http_status: u16,
    /// Confirmation text or the structured payload the provider returned
    pub message: T,
}

impl<T> Envelope<T> {
    /// Create a new success envelope
    pub fn new(http_status: u16, message: T) -> Self {
        Self {
            http_status,
            message,
        }
    }

    /// Always `"success"`
    pub fn status(&self) -> &'static str {
        "success"
    }

    /// Consume the envelope, keeping only its payload
    pub fn into_message(self) -> T {
        self.message
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 3)?;
        state.serialize_field("status", self.status())?;
        state.serialize_field("http_status", &self.http_status)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_status_tag() {
        let envelope = Envelope::new(201, json!({"Id": 7}));

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": "success", "http_status": 201, "message": {"Id": 7}})
        );
    }
}
