pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Transport, HTTP status, or body decoding failure.
	#[error("Gazetteer request failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Invalid gazetteer configuration: {message}")]
	InvalidConfig { message: String },
	#[error("Invalid gazetteer response: {message}")]
	InvalidResponse { message: String },
}
