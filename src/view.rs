use std::{convert::Infallible, sync::Arc};

use axum::{
	body::Body,
	extract::{FromRef, FromRequestParts},
	http::{request, Response, StatusCode},
	response::{Html, IntoResponse},
};
use tera::{Context, Tera};

use crate::{
	error::AppError,
	extract::Session,
	flash::{self, Flashes},
	route::auth,
	Database,
};

pub type Templates = Arc<Tera>;

/// Compiles the templates embedded from `./templates`.
pub fn templates() -> Result<Tera, tera::Error> {
	let mut tera = Tera::default();

	tera.add_raw_templates(vec![
		("base.html", include_str!("../templates/base.html")),
		("front.html", include_str!("../templates/front.html")),
		("about.html", include_str!("../templates/about.html")),
		("register.html", include_str!("../templates/register.html")),
		("login.html", include_str!("../templates/login.html")),
		("profile.html", include_str!("../templates/profile.html")),
		("history.html", include_str!("../templates/history.html")),
		(
			"history_detail.html",
			include_str!("../templates/history_detail.html"),
		),
		("create.html", include_str!("../templates/create.html")),
		("post_update.html", include_str!("../templates/post_update.html")),
		("not_found.html", include_str!("../templates/not_found.html")),
	])?;

	Ok(tera)
}

/// Everything a handler needs to render an HTML page.
///
/// Every page sees `current_user` (the logged in user, if any) and
/// `messages` (pending flash messages, consumed by rendering).
///
/// ```rust
/// async fn route(page: Page) -> Result<Response, AppError> {
///   page.render("about.html", Context::new())
/// }
/// ```
pub struct Page {
	templates: Templates,
	user: Option<auth::model::User>,
	flashes: Flashes,
	status: StatusCode,
}

impl Page {
	#[must_use]
	pub fn status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	/// Adds a message that is shown on this page, rather than the next one.
	pub fn flash(&mut self, level: flash::Level, content: impl Into<String>) {
		self.flashes.push(level, content);
	}

	/// Gives up rendering, keeping the pending messages for the next page.
	pub fn into_flashes(self) -> Flashes {
		self.flashes
	}

	pub fn render(mut self, template: &str, mut context: Context) -> Result<Response<Body>, AppError> {
		context.insert("current_user", &self.user);
		context.insert("messages", &self.flashes.take());

		let body = self.templates.render(template, &context)?;

		Ok((self.status, self.flashes, Html(body)).into_response())
	}
}

/// The user of a valid session, if any.
///
/// A page still renders when the session cannot be loaded, so storage
/// failures are logged here and the visitor is shown as logged out.
fn signed_in_user(session: Result<Session, auth::RouteError>) -> Option<auth::model::User> {
	match session {
		Ok(session) => Some(session.user),
		Err(auth::RouteError::App(error)) => {
			tracing::error!(%error, "failed to load session");
			None
		}
		Err(auth::RouteError::Route(..)) => None,
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Page
where
	Database: FromRef<S>,
	Templates: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let user = signed_in_user(Session::from_request_parts(parts, state).await);

		let flashes = Flashes::from_headers(&parts.headers);

		Ok(Self {
			templates: Templates::from_ref(state),
			user,
			flashes,
			status: StatusCode::OK,
		})
	}
}
