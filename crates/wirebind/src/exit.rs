use std::fmt;

use wirebind::entity::EntityError;

// Exit codes follow sysexits-style ranges.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn entity_error(context: &str, err: EntityError) -> CliError {
    match err {
        EntityError::Truncated { .. }
        | EntityError::BufferTooSmall { .. }
        | EntityError::LengthOverflow { .. }
        | EntityError::MessageTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_map_to_data_invalid() {
        let err = entity_error(
            "decode",
            EntityError::Truncated {
                member: "id".to_string(),
                needed: 8,
                available: 3,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode: input truncated at member `id`"));
    }

    #[test]
    fn accessor_gaps_are_internal() {
        let err = entity_error(
            "encode",
            EntityError::SizeMismatch {
                member: "name".to_string(),
                measured: 4,
                written: 3,
            },
        );
        assert_eq!(err.code, INTERNAL);
    }
}
