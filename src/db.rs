use std::str::FromStr;

use sqlx::{
	migrate::Migrator,
	sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::Database;

/// Migrations embedded from `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the database file, creating it if it does not exist yet.
pub async fn connect(url: &str) -> Result<Database, sqlx::Error> {
	let options = SqliteConnectOptions::from_str(url)?
		.create_if_missing(true)
		.foreign_keys(true);

	SqlitePoolOptions::new()
		.max_connections(5)
		.connect_with(options)
		.await
}
