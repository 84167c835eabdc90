//! Throwaway PostgreSQL databases for integration tests.
//!
//! Tests are skipped unless `GALLERY_PG_DSN` points at a server whose user may create databases.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use gallery_config::Postgres;

const DSN_VAR: &str = "GALLERY_PG_DSN";

pub fn env_dsn() -> Option<String> {
	env::var(DSN_VAR).ok()
}

/// A uniquely named database on the `GALLERY_PG_DSN` server.
///
/// Call [`TestDatabase::cleanup`] at the end of a test; dropping an uncleaned handle drops the
/// database from a helper thread.
pub struct TestDatabase {
	name: String,
	options: PgConnectOptions,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base =
			PgConnectOptions::from_str(base_dsn).map_err(|source| Error::InvalidDsn { source })?;
		let (admin, mut conn) = connect_admin(&base).await?;
		let name = format!("gallery_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let options = base.database(&name);

		Ok(Self { name, options, admin, dropped: false })
	}

	pub fn dsn(&self) -> String {
		self.options.to_url_lossy().to_string()
	}

	/// Storage settings pointing at this database.
	pub fn postgres_config(&self) -> Postgres {
		Postgres { dsn: self.dsn(), pool_max_conns: 2 }
	}

	/// Runs `statements` in order on a fresh connection. The schema must already exist.
	pub async fn seed(&self, statements: &[&str]) -> Result<()> {
		let mut conn = PgConnection::connect_with(&self.options).await?;

		for statement in statements {
			conn.execute(*statement).await?;
		}

		conn.close().await?;

		Ok(())
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// The caller may be inside a runtime, so the drop runs on its own thread and runtime.
		let handle = thread::spawn(move || -> Result<()> {
			let runtime = Builder::new_current_thread().enable_all().build()?;

			runtime.block_on(drop_database(&name, &admin))
		});

		match handle.join() {
			Ok(Err(err)) => eprintln!("Failed to drop test database: {err}."),
			Err(_) => eprintln!("Test database cleanup thread panicked."),
			Ok(Ok(())) => {},
		}
	}
}

async fn connect_admin(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let postgres = base.clone().database("postgres");

	match PgConnection::connect_with(&postgres).await {
		Ok(conn) => Ok((postgres, conn)),
		Err(_) => {
			let template = base.clone().database("template1");
			let conn = PgConnection::connect_with(&template)
				.await
				.map_err(|source| Error::NoAdminDatabase { source })?;

			Ok((template, conn))
		},
	}
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin).await?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str()).await?;

	Ok(())
}
