use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::{IntoResponse, Redirect},
};

use crate::flash;

/// Body of every response for a failure the client cannot act on.
pub const GENERIC_MESSAGE: &str = "There is an error";

/// Body of a response for a path that does not name a resource.
pub const NOT_FOUND_MESSAGE: &str = "Page not found";

/// Error type shared by every route.
///
/// The Display trait is not sent to the client for database or template
/// errors, so it can show sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("form error: {0}")]
	Form(#[from] rejection::FormRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("template error: {0}")]
	Template(#[from] tera::Error),
}

/// Formats validation errors as `field: message` lines, sorted by field.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
	let mut messages = errors
		.field_errors()
		.into_iter()
		.flat_map(|(field, errors)| {
			errors.iter().map(move |error| {
				format!(
					"{field}: {}",
					error.message.as_ref().unwrap_or(&error.code)
				)
			})
		})
		.collect::<Vec<_>>();

	messages.sort();
	messages
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => (
				StatusCode::UNPROCESSABLE_ENTITY,
				validation_messages(&errors).join("\n"),
			)
				.into_response(),
			Self::Form(rejection) => rejection.into_response(),
			// a path segment that does not parse names no resource
			Self::Path(rejection) => {
				tracing::debug!(%rejection, "rejected path");

				(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
			}
			Self::Database(error) => {
				tracing::error!(%error, "database error");

				(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE).into_response()
			}
			Self::Template(error) => {
				tracing::error!(?error, "template error");

				(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE).into_response()
			}
		}
	}
}

/// The shape of an error specific to a group of routes.
///
/// Its Display output is presented to the client, so it should not
/// contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	/// A page to send the client to instead of showing the error.
	/// The error message is flashed on that page.
	fn redirect(&self) -> Option<&'static str> {
		None
	}
}

/// Either a route-specific error or a shared [`AppError`].
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T: ErrorShape> {
	#[error(transparent)]
	App(AppError),
	#[error(transparent)]
	Route(T),
}

impl<T: ErrorShape> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T: ErrorShape> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T: ErrorShape> From<tera::Error> for RouteError<T> {
	fn from(error: tera::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => match error.redirect() {
				Some(to) => {
					let flashes = flash::Flashes::default().with(flash::Level::Info, error.to_string());

					(flashes, Redirect::to(to)).into_response()
				}
				None => (error.status(), error.to_string()).into_response(),
			},
		}
	}
}

#[cfg(test)]
mod test {
	use validator::Validate;

	#[derive(Validate)]
	struct Input {
		#[validate(length(min = 1, message = "must not be empty"))]
		name: String,
		#[validate(length(max = 3))]
		code: String,
	}

	#[test]
	fn test_validation_messages() {
		let input = Input {
			name: String::new(),
			code: "abcd".into(),
		};

		let errors = input.validate().unwrap_err();

		assert_eq!(
			super::validation_messages(&errors),
			vec!["code: length".to_string(), "name: must not be empty".to_string()]
		);
	}
}
