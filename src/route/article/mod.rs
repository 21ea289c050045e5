use axum::{http::StatusCode, routing::get, Router};

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("article {0} not found")]
	UnknownArticle(i64),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/history", get(list_articles))
		.route("/history/:id", get(get_article))
		.route("/history/:id/delete", get(delete_article))
		.route(
			"/history/:id/update",
			get(update_article_form).post(update_article),
		)
		.route("/create", get(create_article_form).post(create_article))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownArticle(..) => StatusCode::NOT_FOUND,
		}
	}
}

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	use super::model::Article;

	async fn articles(pool: &Database) -> Vec<Article> {
		sqlx::query_as::<_, Article>("SELECT * FROM article ORDER BY id")
			.fetch_all(pool)
			.await
			.unwrap()
	}

	#[sqlx::test]
	async fn test_create_then_list(pool: Database) {
		let app = app(pool);

		let response = create(&app, "Older headline", "The first intro", "Body one").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(location(&response), "/");

		create(&app, "Newer headline", "The second intro", "Body two").await;

		let response = app.get("/history").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let text = response.text();
		let newer = text.find("Newer headline").unwrap();
		let older = text.find("Older headline").unwrap();

		assert!(newer < older, "newest article should be listed first");
	}

	#[sqlx::test]
	async fn test_created_articles_are_visible_to_other_connections(pool: Database) {
		let app = app(pool.clone());
		let mut conn = connection(&pool).await;

		for i in 1..=20 {
			let response = create(&app, &format!("Headline {i}"), "Intro", "Text").await;

			assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

			let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM article")
				.fetch_one(&mut conn)
				.await
				.unwrap();

			assert_eq!(count, i);
			assert!(app
				.get("/history")
				.await
				.text()
				.contains(&format!("Headline {i}")));
		}
	}

	#[sqlx::test]
	async fn test_detail(pool: Database) {
		let app = app(pool.clone());

		create(&app, "Title", "Intro", "A body of <b>text</b>").await;

		let id = articles(&pool).await[0].id;
		let response = app.get(&format!("/history/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert!(response.text().contains("A body of &lt;b&gt;text"));
	}

	#[sqlx::test]
	async fn test_missing_detail_renders_without_article(pool: Database) {
		let app = app(pool);

		let response = app.get("/history/404").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert!(response.text().contains("Article not found"));
	}

	#[sqlx::test]
	async fn test_update_changes_only_content(pool: Database) {
		let app = app(pool.clone());

		create(&app, "Old title", "Old intro", "Old text").await;
		create(&app, "Untouched", "Untouched intro", "Untouched text").await;

		let before = articles(&pool).await;
		let id = before[0].id;

		let response = app
			.post(&format!("/history/{id}/update"))
			.form(&[
				("title", "New title"),
				("intro", "New intro"),
				("text", "New text"),
			])
			.await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(location(&response), "/");

		let after = articles(&pool).await;

		assert_eq!(after.len(), 2);
		assert_eq!(after[0].id, id);
		assert_eq!(after[0].date, before[0].date);
		assert_eq!(after[0].title, "New title");
		assert_eq!(after[0].intro, "New intro");
		assert_eq!(after[0].text, "New text");
		assert_eq!(after[1].title, "Untouched");
		assert_eq!(after[1].text, "Untouched text");
	}

	#[sqlx::test]
	async fn test_update_form(pool: Database) {
		let app = app(pool.clone());

		create(&app, "Editable", "Intro", "Text").await;

		let id = articles(&pool).await[0].id;
		let response = app.get(&format!("/history/{id}/update")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert!(response.text().contains("Editable"));

		let response = app.get("/history/999/update").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_update_missing_article(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/history/999/update")
			.form(&[("title", "a"), ("intro", "b"), ("text", "c")])
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.text(), "article 999 not found");

		let response = app
			.post("/history/999/update")
			.form(&[("title", ""), ("intro", "b"), ("text", "c")])
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_unparseable_ids_are_not_found(pool: Database) {
		let app = app(pool);

		for path in [
			"/history/abc",
			"/history/99999999999999999999999",
			"/history/99999999999999999999999/update",
			"/history/abc/delete",
		] {
			let response = app.get(path).await;

			assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{path}");
			assert_eq!(response.text(), "Page not found");
		}
	}

	#[sqlx::test]
	async fn test_delete(pool: Database) {
		let app = app(pool.clone());

		create(&app, "Doomed", "Intro", "Text").await;

		let id = articles(&pool).await[0].id;
		let response = app.get(&format!("/history/{id}/delete")).await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(location(&response), "/history");
		assert!(articles(&pool).await.is_empty());

		let response = app.get(&format!("/history/{id}/delete")).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_delete_missing_article(pool: Database) {
		let app = app(pool);

		let response = app.get("/history/12345/delete").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_invalid_article_is_rejected(pool: Database) {
		let app = app(pool.clone());

		let response = create(&app, "", "Intro", "Text").await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(response.text().contains("title"));

		let response = create(&app, &"x".repeat(101), "Intro", "Text").await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(articles(&pool).await.is_empty());
	}

	#[sqlx::test]
	async fn test_anonymous_visitors_may_edit(pool: Database) {
		let app = app(pool);

		let response = app.get("/create").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let response = create(&app, "Anyone", "Can post", "Here").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
	}
}
