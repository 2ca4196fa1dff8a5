//! Human-facing grievance reference IDs: `GR-` followed by 8 uppercase hex
//! digits taken from a random UUID.

use uuid::Uuid;

use crate::shared::validation::REFERENCE_ID_REGEX;

pub fn generate_reference_id() -> String {
    let id = Uuid::new_v4();
    format!("GR-{}", hex::encode_upper(&id.as_bytes()[..4]))
}

pub fn is_valid_reference_id(candidate: &str) -> bool {
    REFERENCE_ID_REGEX.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_match_format() {
        for _ in 0..100 {
            let id = generate_reference_id();
            assert!(is_valid_reference_id(&id), "bad reference id {}", id);
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..500).map(|_| generate_reference_id()).collect();
        // 32 bits of randomness; a collision in 500 draws is vanishingly unlikely
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(!is_valid_reference_id("gr-1a2b3c4d"));
        assert!(!is_valid_reference_id("GR-1A2B"));
        assert!(!is_valid_reference_id("1A2B3C4D"));
        assert!(!is_valid_reference_id("GR-1A2B3C4D/../x"));
    }
}
