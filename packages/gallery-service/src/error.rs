pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query shape: {message}")]
	InvalidQueryShape { message: String },
	#[error("Distance query around {origin:?} has no resolved coordinates.")]
	MissingGeoData { origin: String },
	#[error("No place matches {place:?}.")]
	GeoResolutionNotFound { place: String },
	#[error("Row ordering violation: {message}")]
	RowOrderingViolation { message: String },
	#[error("Unsupported query node: {kind}.")]
	UnsupportedNode { kind: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<gallery_domain::Error> for Error {
	fn from(err: gallery_domain::Error) -> Self {
		match err {
			gallery_domain::Error::InvalidQueryShape { message } =>
				Self::InvalidQueryShape { message },
		}
	}
}

impl From<gallery_storage::Error> for Error {
	fn from(err: gallery_storage::Error) -> Self {
		match err {
			gallery_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<gallery_providers::Error> for Error {
	fn from(err: gallery_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
