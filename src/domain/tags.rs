//! Storage encoding for post tags.
//!
//! Tags live in a single text column as a JSON array of strings. Decoding must
//! give back the exact ordered list that was encoded.

use super::error::DomainError;

pub fn encode_tags(tags: &[String]) -> Result<String, DomainError> {
    serde_json::to_string(tags)
        .map_err(|err| DomainError::invariant(format!("failed to encode tags: {err}")))
}

pub fn decode_tags(raw: &str) -> Result<Vec<String>, DomainError> {
    serde_json::from_str(raw)
        .map_err(|err| DomainError::invariant(format!("stored tags are not a JSON list: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_preserves_order() {
        let tags = vec![
            "TypeScript".to_string(),
            "CI/CD".to_string(),
            "REST API".to_string(),
            "Next.js".to_string(),
        ];
        let encoded = encode_tags(&tags).expect("encode");
        assert_eq!(encoded, r#"["TypeScript","CI/CD","REST API","Next.js"]"#);
        assert_eq!(decode_tags(&encoded).expect("decode"), tags);
    }

    #[test]
    fn decode_handles_escaped_quotes() {
        let tags = vec![r#"say "hi""#.to_string()];
        let encoded = encode_tags(&tags).expect("encode");
        assert_eq!(decode_tags(&encoded).expect("decode"), tags);
    }

    #[test]
    fn decode_rejects_non_list_payload() {
        assert!(matches!(
            decode_tags("not json"),
            Err(DomainError::Invariant { .. })
        ));
        assert!(decode_tags(r#"{"a":1}"#).is_err());
    }
}
