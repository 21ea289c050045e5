use axum::{
	body::Body,
	extract::{FromRequest, Request, State},
	http::Response,
	response::{IntoResponse, Redirect},
};
use tera::Context;

use crate::{
	extract::{Form, Path},
	view::Page,
	Database,
};

use super::{model, Error, RouteError};

/// Returns every article, newest first.
pub async fn list_articles(
	State(database): State<Database>,
	page: Page,
) -> Result<Response<Body>, RouteError> {
	let articles = sqlx::query_as::<_, model::Article>(
		r#"
			SELECT * FROM article
			ORDER BY date DESC, id DESC
		"#,
	)
	.fetch_all(&database)
	.await?;

	let mut context = Context::new();
	context.insert("articles", &articles);

	Ok(page.render("history.html", context)?)
}

/// Returns a single article by its unique id.
/// A missing article renders the page without one.
pub async fn get_article(
	State(database): State<Database>,
	page: Page,
	Path(path): Path<model::IdInput>,
) -> Result<Response<Body>, RouteError> {
	let article = sqlx::query_as::<_, model::Article>("SELECT * FROM article WHERE id = ?")
		.bind(path.id)
		.fetch_optional(&database)
		.await?;

	let mut context = Context::new();
	context.insert("article", &article);

	Ok(page.render("history_detail.html", context)?)
}

/// Shows the form for a new article.
pub async fn create_article_form(page: Page) -> Result<Response<Body>, RouteError> {
	Ok(page.render("create.html", Context::new())?)
}

/// Creates a new article dated now.
pub async fn create_article(
	State(database): State<Database>,
	Form(input): Form<model::ArticleForm>,
) -> Result<impl IntoResponse, RouteError> {
	let id = sqlx::query(
		r#"
			INSERT INTO article (title, intro, text, date)
			VALUES (?, ?, ?, ?)
		"#,
	)
	.bind(&input.title)
	.bind(&input.intro)
	.bind(&input.text)
	.bind(chrono::Utc::now())
	.execute(&database)
	.await?
	.last_insert_rowid();

	tracing::debug!(id, "created article");

	Ok(Redirect::to("/"))
}

/// Shows the form for editing an existing article.
pub async fn update_article_form(
	State(database): State<Database>,
	page: Page,
	Path(path): Path<model::IdInput>,
) -> Result<Response<Body>, RouteError> {
	let article = sqlx::query_as::<_, model::Article>("SELECT * FROM article WHERE id = ?")
		.bind(path.id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownArticle(path.id))?;

	let mut context = Context::new();
	context.insert("article", &article);

	Ok(page.render("post_update.html", context)?)
}

/// Replaces the title, intro and text of an existing article.
/// Its id and date are left as they were.
///
/// The article must exist before the submitted form is read, so a missing
/// article is a 404 whatever the body contains.
pub async fn update_article(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	request: Request,
) -> Result<impl IntoResponse, RouteError> {
	sqlx::query_scalar::<_, i64>("SELECT id FROM article WHERE id = ?")
		.bind(path.id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownArticle(path.id))?;

	let Form(input) = Form::<model::ArticleForm>::from_request(request, &()).await?;

	let status = sqlx::query(
		r#"
			UPDATE article
			SET title = ?, intro = ?, text = ?
			WHERE id = ?
		"#,
	)
	.bind(&input.title)
	.bind(&input.intro)
	.bind(&input.text)
	.bind(path.id)
	.execute(&database)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownArticle(path.id).into());
	}

	tracing::debug!(id = path.id, "updated article");

	Ok(Redirect::to("/"))
}

/// Deletes an existing article by its unique id.
pub async fn delete_article(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoResponse, RouteError> {
	let status = sqlx::query("DELETE FROM article WHERE id = ?")
		.bind(path.id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownArticle(path.id).into());
	}

	tracing::debug!(id = path.id, "deleted article");

	Ok(Redirect::to("/history"))
}
