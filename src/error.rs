use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Corrupt stream header: {0}")]
	CorruptHeader(String),

	#[error("Unable to decompress: bit stream ended before the end-of-stream marker")]
	TruncatedStream,

	#[error("Corrupt stream body: {0}")]
	CorruptBody(String),

	#[error("Compression failed: {0}")]
	CompressionError(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),
}

pub type Result<T> = std::result::Result<T, HuffError>;
