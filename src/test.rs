//! Helpers shared by the HTTP tests of every route group.

pub use axum::http::StatusCode;
pub use axum_test::{TestResponse, TestServer};
use sqlx::ConnectOptions;

pub use crate::Database;

/// Serves the full router against `database`, keeping cookies between requests
/// like a browser would.
pub fn app(database: Database) -> TestServer {
	let state = crate::State::new(database).expect("templates should compile");
	let mut server = TestServer::new(crate::app(state)).expect("failed to start test server");

	server.do_save_cookies();
	server
}

/// Opens a connection to the same database outside of the pool, to see what
/// other connections see.
pub async fn connection(pool: &Database) -> sqlx::SqliteConnection {
	pool.connect_options()
		.connect()
		.await
		.expect("failed to open connection")
}

pub async fn register(app: &TestServer, username: &str, email: &str, password: &str) -> TestResponse {
	app.post("/register")
		.form(&[
			("username", username),
			("email", email),
			("password", password),
		])
		.await
}

pub async fn login(app: &TestServer, email: &str, password: &str) -> TestResponse {
	app.post("/login")
		.form(&[("email", email), ("password", password)])
		.await
}

pub async fn create(app: &TestServer, title: &str, intro: &str, text: &str) -> TestResponse {
	app.post("/create")
		.form(&[("title", title), ("intro", intro), ("text", text)])
		.await
}

/// The target of a redirect response.
pub fn location(response: &TestResponse) -> String {
	response
		.headers()
		.get("location")
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_string()
}

/// Every `Set-Cookie` header of a response.
pub fn set_cookies(response: &TestResponse) -> Vec<String> {
	response
		.headers()
		.get_all("set-cookie")
		.iter()
		.filter_map(|value| value.to_str().ok())
		.map(str::to_string)
		.collect()
}
