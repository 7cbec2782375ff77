use crate::operation::OperationKind;

/// Errors raised while adding operations to a codec registry.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An operation with the same value type, kind and name is already registered.
    #[error("duplicate {kind} operation `{name}` for {value_type}")]
    Duplicate {
        value_type: &'static str,
        kind: OperationKind,
        name: String,
    },
}

/// A codec operation could not be resolved for a value type.
///
/// Always raised while binding, never while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecResolutionError {
    /// No operation of the requested kind (and name, if given) exists.
    #[error("no {kind} operation {} for {value_type}", describe_name(.name))]
    NotFound {
        value_type: &'static str,
        kind: OperationKind,
        name: Option<String>,
    },

    /// Resolution by shape found more than one candidate.
    #[error("ambiguous {kind} operation for {value_type}: candidates {}", .candidates.join(", "))]
    Ambiguous {
        value_type: &'static str,
        kind: OperationKind,
        candidates: Vec<String>,
    },

    /// The named operation exists, but only with a different calling shape.
    #[error("operation `{name}` for {value_type} is not a {expected} operation (found {})", describe_kinds(.found))]
    ShapeMismatch {
        value_type: &'static str,
        name: String,
        expected: OperationKind,
        found: Vec<OperationKind>,
    },

    /// The operation is registered under the right kind but with a different signature.
    #[error("operation `{name}` for {value_type} does not have the {kind} signature {}", .kind.signature())]
    SignatureMismatch {
        value_type: &'static str,
        name: String,
        kind: OperationKind,
    },
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("named `{name}`"),
        None => "matching by shape".to_string(),
    }
}

fn describe_kinds(kinds: &[OperationKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_operation() {
        let err = CodecResolutionError::NotFound {
            value_type: "i32",
            kind: OperationKind::Write,
            name: Some("GetBytes".to_string()),
        };
        assert_eq!(err.to_string(), "no write operation named `GetBytes` for i32");

        let err = CodecResolutionError::NotFound {
            value_type: "i32",
            kind: OperationKind::ReadBounded,
            name: None,
        };
        assert_eq!(
            err.to_string(),
            "no read_bounded operation matching by shape for i32"
        );
    }

    #[test]
    fn shape_mismatch_lists_found_kinds() {
        let err = CodecResolutionError::ShapeMismatch {
            value_type: "u64",
            name: "GetByteCount".to_string(),
            expected: OperationKind::Write,
            found: vec![OperationKind::SizeOf],
        };
        assert!(err.to_string().contains("found size_of"));
    }
}
