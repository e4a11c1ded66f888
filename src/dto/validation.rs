use validator::ValidationError;

/// Upper bound accepted for identity-provider ids.
const MAX_PLAYER_ID_LENGTH: usize = 128;

/// Validate an opaque identity-provider id: non-empty, bounded, and free of
/// whitespace so it can be embedded in document queries verbatim.
pub fn validate_player_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("player_id_empty"));
    }
    if value.len() > MAX_PLAYER_ID_LENGTH {
        return Err(ValidationError::new("player_id_too_long"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("player_id_whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_provider_ids() {
        assert!(validate_player_id("firebase:aBc123-XYZ_9").is_ok());
    }

    #[test]
    fn rejects_empty_whitespace_and_oversized_ids() {
        assert!(validate_player_id("").is_err());
        assert!(validate_player_id("two words").is_err());
        assert!(validate_player_id(&"x".repeat(200)).is_err());
    }
}
