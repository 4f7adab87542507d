use thiserror::Error;

pub const MIN_FIELD_LEN: usize = 2;

/// Driver identity carried from the welcome screen to the entry screen.
///
/// The name doubles as the spreadsheet tab title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSession {
    name: String,
    vehicle_id: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Username must be at least 2 characters.")]
    NameTooShort,
    #[error("Car number must be at least 2 characters.")]
    VehicleIdTooShort,
}

impl DriverSession {
    /// Validates both fields, reporting every failing one.
    pub fn new(name: &str, vehicle_id: &str) -> Result<Self, Vec<SessionError>> {
        let name = name.trim();
        let vehicle_id = vehicle_id.trim();

        let mut errors = Vec::new();
        if name.chars().count() < MIN_FIELD_LEN {
            errors.push(SessionError::NameTooShort);
        }
        if vehicle_id.chars().count() < MIN_FIELD_LEN {
            errors.push(SessionError::VehicleIdTooShort);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: name.to_owned(),
            vehicle_id: vehicle_id.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn tab_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_session_is_trimmed() {
        let session = DriverSession::new("  Ivanov ", " A123BC").unwrap();
        assert_eq!(session.name(), "Ivanov");
        assert_eq!(session.vehicle_id(), "A123BC");
        assert_eq!(session.tab_name(), "Ivanov");
    }

    #[test]
    fn test_short_fields_are_all_reported() {
        let errors = DriverSession::new(" I ", "").unwrap_err();
        assert_eq!(
            errors,
            vec![SessionError::NameTooShort, SessionError::VehicleIdTooShort]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Two Cyrillic letters are four bytes but still only two characters.
        assert!(DriverSession::new("Ян", "АВ").is_ok());
        assert_eq!(
            DriverSession::new("Я", "АВ").unwrap_err(),
            vec![SessionError::NameTooShort]
        );
    }
}
