use thiserror::Error;

/// Errors raised while loading artifacts or running inference.
#[derive(Debug, Error)]
pub enum ModelError {
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("malformed vocabulary metadata: {0}")]
	Metadata(#[from] serde_json::Error),

	#[error("malformed model weights: {0}")]
	Weights(#[from] postcard::Error),

	#[error("invalid vocabulary: {0}")]
	Vocabulary(String),

	#[error("shape mismatch: {0}")]
	Shape(String),

	#[error("inference failed: {0}")]
	Inference(String),
}

/// Errors raised while decoding or storing an uploaded image.
#[derive(Debug, Error)]
pub enum ImageError {
	#[error("Invalid image data")]
	InvalidData,

	#[error("invalid base64 payload: {0}")]
	Base64(#[from] base64::DecodeError),

	#[error("malformed counter file: {0}")]
	Counter(String),

	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
}
