use axum::{
	body::Body,
	http::{Response, StatusCode},
	routing::get,
	Router,
};
use tera::Context;

use crate::{error::AppError, view::Page, AppState};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(front))
		.route("/about", get(about))
}

/// The landing page.
async fn front(page: Page) -> Result<Response<Body>, AppError> {
	page.render("front.html", Context::new())
}

async fn about(page: Page) -> Result<Response<Body>, AppError> {
	page.render("about.html", Context::new())
}

/// Fallback for paths that match no route.
pub async fn not_found(page: Page) -> Result<Response<Body>, AppError> {
	page.status(StatusCode::NOT_FOUND)
		.render("not_found.html", Context::new())
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_static_pages(pool: Database) {
		let app = app(pool);

		assert_eq!(app.get("/").await.status_code(), StatusCode::OK);
		assert_eq!(app.get("/about").await.status_code(), StatusCode::OK);
	}

	#[sqlx::test]
	async fn test_unknown_path(pool: Database) {
		let app = app(pool);

		let response = app.get("/nowhere").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert!(response.text().contains("Page not found"));
	}

	#[sqlx::test]
	async fn test_layout_shows_current_user(pool: Database) {
		let app = app(pool);

		assert!(app.get("/").await.text().contains("href=\"/login\""));

		register(&app, "john", "john@smith.com", "hunter2hunter").await;
		login(&app, "john@smith.com", "hunter2hunter").await;

		let text = app.get("/about").await.text();

		assert!(text.contains("john"));
		assert!(text.contains("href=\"/logout\""));
	}
}
