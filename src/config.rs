use std::net::IpAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db";
const DEFAULT_PORT: u16 = 2682;
const DEFAULT_LOG_FILTER: &str = "blogboard=debug,tower_http=info";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("HOST must be an ip address, got {0:?}")]
	InvalidHost(String),
	#[error("PORT must be a number, got {0:?}")]
	InvalidPort(String),
}

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	pub log_filter: String,
	/// When set, spans are also exported to this OTLP collector.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let host = match lookup("HOST") {
			Some(host) => host.parse().map_err(|_| Error::InvalidHost(host))?,
			None => IpAddr::from([127, 0, 0, 1]),
		};

		let port = match lookup("PORT") {
			Some(port) => port.parse().map_err(|_| Error::InvalidPort(port))?,
			None => DEFAULT_PORT,
		};

		Ok(Self {
			database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
			host,
			port,
			log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|url| !url.is_empty()),
		})
	}
}
