//! Decode options.

/// Conventional bound on a device path, in bytes.
pub const DEFAULT_PATH_LIMIT: usize = 128;

/// Options applied to every message decoded by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of bytes of the `device` attribute kept in the header.
    /// Longer paths are truncated.
    pub path_limit: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            path_limit: DEFAULT_PATH_LIMIT,
        }
    }

    pub fn with_path_limit(mut self, path_limit: usize) -> Self {
        self.path_limit = path_limit;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
