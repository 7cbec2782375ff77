use wirebind_codec::CodecResolutionError;

/// A getter or setter could not be bound for a member.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The member has no readable accessor.
    #[error("member `{member}` of {host} is not readable")]
    NotReadable { host: &'static str, member: String },

    /// The member has no writable accessor.
    #[error("member `{member}` of {host} is not writable")]
    NotWritable { host: &'static str, member: String },

    /// The member's declared value type differs from the requested one.
    #[error("member `{member}` of {host} is declared as {declared}, not {requested}")]
    TypeMismatch {
        host: &'static str,
        member: String,
        declared: &'static str,
        requested: &'static str,
    },

    /// Two members of one host type share a name.
    #[error("member `{member}` is declared more than once on {host}")]
    DuplicateMember { host: &'static str, member: String },
}

/// Compilation of a member's accessor set failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Member access could not be bound.
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),

    /// A codec operation could not be resolved for the member.
    #[error("codec resolution failed for member `{member}` of {host}: {source}")]
    Codec {
        host: &'static str,
        member: String,
        source: CodecResolutionError,
    },
}

impl CompileError {
    pub fn binding(&self) -> Option<&BindingError> {
        match self {
            CompileError::Binding(err) => Some(err),
            CompileError::Codec { .. } => None,
        }
    }

    pub fn codec(&self) -> Option<&CodecResolutionError> {
        match self {
            CompileError::Codec { source, .. } => Some(source),
            CompileError::Binding(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
