mod session;

pub use session::Session;

use axum::{
	extract::{FromRequest, FromRequestParts, Request},
	http::{header, request, HeaderMap},
};
use serde::de;

use crate::error::AppError;

/// Extractor that deserializes a url-encoded form body and validates it.
///
/// T must implement [`serde::de::DeserializeOwned`] and [`validator::Validate`]
/// in order to be used in an extractor.
///
/// ```rust
/// async fn route(Form(article): Form<ArticleForm>) {
///   // ...
/// }
/// ```
pub struct Form<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Form<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::Form::<T>::from_request(req, state).await?.0;

		result.validate().map_err(Self::Rejection::Validation)?;
		Ok(Self(result))
	}
}

/// Extractor that deserializes a path parameter and validates it.
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + validator::Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await?
			.0;

		result.validate().map_err(Self::Rejection::Validation)?;
		Ok(Self(result))
	}
}

/// Finds a cookie by name across every `Cookie` header, percent-decoding its value.
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<cookie::Cookie<'static>> {
	headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| cookie::Cookie::split_parse_encoded(value.to_owned()))
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == name)
}

#[cfg(test)]
mod test {
	use axum::http::{header, HeaderMap, HeaderValue};

	#[test]
	fn test_cookie_lookup_spans_headers() {
		let mut headers = HeaderMap::new();

		headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
		headers.append(
			header::COOKIE,
			HeaderValue::from_static("flash=hello%20world; session=abc"),
		);

		assert_eq!(
			super::cookie(&headers, "flash").unwrap().value(),
			"hello world"
		);
		assert_eq!(super::cookie(&headers, "session").unwrap().value(), "abc");
		assert!(super::cookie(&headers, "missing").is_none());
	}
}
