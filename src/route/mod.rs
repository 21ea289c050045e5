use axum::Router;

use crate::AppState;

pub mod article;
pub mod auth;
pub mod model;
pub mod page;

pub fn routes() -> Router<AppState> {
	Router::new()
		.merge(page::routes())
		.merge(auth::routes())
		.merge(article::routes())
		.fallback(page::not_found)
}
