#![warn(clippy::pedantic)]

mod config;
mod db;
mod error;
mod extract;
mod flash;
mod route;
mod session;
#[cfg(test)]
mod test;
mod trace;
mod view;

use std::sync::Arc;

use anyhow::Context;
use argon2::Argon2;
use axum::{http::Request, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type Database = sqlx::SqlitePool;
pub type AppState = State;

/// The shared application state.
///
/// This contains all shared dependencies that handlers need to access:
/// the database connection pool, the password hasher and the compiled templates.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub templates: view::Templates,
}

impl State {
	pub fn new(database: Database) -> Result<Self, tera::Error> {
		Ok(Self {
			database,
			hasher: Argon2::default(),
			templates: Arc::new(view::templates()?),
		})
	}
}

/// Builds the router with every route and the HTTP middleware.
pub fn app(state: State) -> Router {
	route::routes()
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
						let request_id = req
							.headers()
							.get("x-request-id")
							.and_then(|value| value.to_str().ok())
							.unwrap_or_default();

						tracing::info_span!(
							"http_request",
							method = %req.method(),
							uri = %req.uri(),
							request_id,
						)
					}),
				)
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(error) = tokio::signal::ctrl_c().await {
			tracing::error!(%error, "failed to listen for ctrl-c");
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(error) => tracing::error!(%error, "failed to listen for SIGTERM"),
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenvy::dotenv().ok();

	let config = config::Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let database = db::connect(&config.database_url)
		.await
		.context("failed to connect to database")?;

	db::MIGRATOR
		.run(&database)
		.await
		.context("failed to run migrations")?;

	let state = State::new(database).context("failed to compile templates")?;

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.context("failed to bind to port")?;

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, app(state))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}
