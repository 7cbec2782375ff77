/// Default maximum encoded message size: 16 MiB.
pub const DEFAULT_MAX_MESSAGE: usize = 16 * 1024 * 1024;

/// Width of the length written before each prefixed member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPrefix {
    U16,
    #[default]
    U32,
}

impl LengthPrefix {
    /// Bytes the prefix occupies on the wire.
    pub fn width(self) -> usize {
        match self {
            LengthPrefix::U16 => 2,
            LengthPrefix::U32 => 4,
        }
    }

    /// Largest member length the prefix can carry.
    pub fn max_len(self) -> usize {
        match self {
            LengthPrefix::U16 => u16::MAX as usize,
            LengthPrefix::U32 => u32::MAX as usize,
        }
    }
}

/// Configuration for the entity serializer.
#[derive(Debug, Clone)]
pub struct EntityConfig {
    /// Length prefix for prefixed members. Default: `U32`.
    pub length_prefix: LengthPrefix,
    /// Maximum encoded message size in bytes. Default: 16 MiB.
    pub max_message_size: usize,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            length_prefix: LengthPrefix::default(),
            max_message_size: DEFAULT_MAX_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_widths_and_limits() {
        assert_eq!(LengthPrefix::U16.width(), 2);
        assert_eq!(LengthPrefix::U32.width(), 4);
        assert_eq!(LengthPrefix::U16.max_len(), 65_535);
        assert_eq!(LengthPrefix::default(), LengthPrefix::U32);
    }

    #[test]
    fn default_config() {
        let config = EntityConfig::default();
        assert_eq!(config.length_prefix, LengthPrefix::U32);
        assert_eq!(config.max_message_size, DEFAULT_MAX_MESSAGE);
    }
}
