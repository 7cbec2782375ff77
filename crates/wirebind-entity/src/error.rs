use wirebind_accessor::CompileError;
use wirebind_codec::OperationKind;

/// Errors that can occur while registering, serializing or deserializing an entity.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// The host type could not be compiled.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// The output buffer cannot hold the encoded message.
    #[error("buffer too small: need {needed} bytes, {available} available")]
    BufferTooSmall { needed: usize, available: usize },

    /// The encoded message exceeds the configured maximum.
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// The input ended before a member could be decoded.
    #[error("input truncated at member `{member}`: need {needed} bytes, {available} available")]
    Truncated {
        member: String,
        needed: usize,
        available: usize,
    },

    /// A prefixed member is longer than its length prefix can carry.
    #[error("member `{member}` is {len} bytes, prefix allows at most {max}")]
    LengthOverflow {
        member: String,
        len: usize,
        max: usize,
    },

    /// A codec wrote a different number of bytes than it measured.
    #[error("member `{member}` measured {measured} bytes but wrote {written}")]
    SizeMismatch {
        member: String,
        measured: usize,
        written: usize,
    },

    /// The member's compiled set lacks an operation the serializer needs.
    #[error("member `{member}` has no {kind} accessor")]
    MissingAccessor { member: String, kind: OperationKind },
}

pub type Result<T> = std::result::Result<T, EntityError>;
