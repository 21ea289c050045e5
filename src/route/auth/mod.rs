use axum::{http::StatusCode, routing::get, Router};

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("password hashing error")]
	PasswordHash(#[from] argon2::password_hash::Error),
	#[error("Please log in to access this page.")]
	NoSessionCookie,
	#[error("Your session has expired, please log in again.")]
	InvalidSessionCookie,
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/register", get(register_form).post(register))
		.route("/login", get(login_form).post(login))
		.route("/logout", get(logout))
		.route("/profile", get(profile))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::NoSessionCookie | Self::InvalidSessionCookie => StatusCode::UNAUTHORIZED,
			Self::PasswordHash(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn redirect(&self) -> Option<&'static str> {
		match self {
			Self::NoSessionCookie | Self::InvalidSessionCookie => Some("/login"),
			_ => None,
		}
	}
}

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		if let Error::PasswordHash(ref e) = error {
			tracing::error!(error = %e, "password hashing failed");
		}

		Self::Route(error)
	}
}
