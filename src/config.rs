use crate::error::HuffError;

/// Size of the chunks moved between the bit buffers and the underlying streams.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

#[derive(Debug, Clone)]
pub struct HuffConfig {
    pub buffer_size: usize,
    pub progress: bool,
}

impl Default for HuffConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress: false,
        }
    }
}

impl HuffConfig {
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn validate(&self) -> Result<(), HuffError> {
        if self.buffer_size == 0 {
            return Err(HuffError::ConfigError("buffer size must be at least 1 byte".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HuffConfig::default();
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert!(!config.progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = HuffConfig::default().with_buffer_size(0);
        assert!(matches!(config.validate(), Err(HuffError::ConfigError(_))));
    }
}
