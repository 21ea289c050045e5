//! One-shot notifications carried between requests in a cookie.
//!
//! Handlers push messages before redirecting, and the next rendered page
//! shows them and clears the cookie.

use std::convert::Infallible;

use axum::{
	extract::FromRequestParts,
	http::{header, request, HeaderMap, HeaderValue},
	response::{IntoResponseParts, ResponseParts},
};
use serde::{Deserialize, Serialize};

use crate::extract;

pub const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Success,
	Info,
	Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub level: Level,
	pub content: String,
}

/// The pending flash messages of a request.
///
/// As a response part, it writes the messages back to the cookie if they
/// changed, or clears the cookie once they have all been taken.
#[derive(Debug, Default)]
pub struct Flashes {
	messages: Vec<Message>,
	changed: bool,
}

impl Flashes {
	/// Reads the messages left by previous responses.
	pub fn from_headers(headers: &HeaderMap) -> Self {
		extract::cookie(headers, COOKIE_NAME)
			.map(|cookie| Self::decode(cookie.value()))
			.unwrap_or_default()
	}

	fn decode(value: &str) -> Self {
		Self {
			messages: serde_json::from_str(value).unwrap_or_default(),
			changed: false,
		}
	}

	pub fn push(&mut self, level: Level, content: impl Into<String>) {
		self.messages.push(Message {
			level,
			content: content.into(),
		});
		self.changed = true;
	}

	#[must_use]
	pub fn with(mut self, level: Level, content: impl Into<String>) -> Self {
		self.push(level, content);
		self
	}

	/// Removes and returns every pending message.
	pub fn take(&mut self) -> Vec<Message> {
		if !self.messages.is_empty() {
			self.changed = true;
		}

		std::mem::take(&mut self.messages)
	}

	fn cookie(&self) -> Option<cookie::Cookie<'static>> {
		if !self.changed {
			return None;
		}

		if self.messages.is_empty() {
			return Some(
				cookie::Cookie::build(COOKIE_NAME)
					.path("/")
					.max_age(cookie::time::Duration::ZERO)
					.into(),
			);
		}

		let value = serde_json::to_string(&self.messages).ok()?;

		Some(
			cookie::Cookie::build((COOKIE_NAME, value))
				.path("/")
				.http_only(true)
				.same_site(cookie::SameSite::Lax)
				.into(),
		)
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Flashes
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		Ok(Self::from_headers(&parts.headers))
	}
}

impl IntoResponseParts for Flashes {
	type Error = Infallible;

	fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
		if let Some(cookie) = self.cookie() {
			if let Ok(value) = HeaderValue::from_str(&cookie.encoded().to_string()) {
				res.headers_mut().append(header::SET_COOKIE, value);
			}
		}

		Ok(res)
	}
}
