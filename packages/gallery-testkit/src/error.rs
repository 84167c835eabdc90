pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("GALLERY_PG_DSN is not a valid Postgres DSN: {source}")]
	InvalidDsn { source: sqlx::Error },
	#[error("No admin database (postgres, template1) accepted a connection: {source}")]
	NoAdminDatabase { source: sqlx::Error },
	#[error("Runtime error: {0}")]
	Runtime(#[from] std::io::Error),

	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
