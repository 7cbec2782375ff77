/// Byte order used by the default fixed-width codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Controls which default codecs a registry is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Byte order for fixed-width integer and float codecs.
    pub byte_order: ByteOrder,
    /// When true, also register LEB128 variable-length codecs for `u16`, `u32` and `u64`.
    pub varint: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            varint: false,
        }
    }
}
