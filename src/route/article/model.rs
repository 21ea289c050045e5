pub use crate::route::model::IdInput;

use chrono::{DateTime, Utc};
use macros::model;
use serde::Serialize;

/// A single blog post.
#[model]
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Article {
	/// The unique identifier of the article.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The title of the article.
	#[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
	pub title: String,
	/// A short summary shown in the article list.
	#[validate(length(min = 1, max = 300, message = "must be between 1 and 300 characters"))]
	pub intro: String,
	/// The full body of the article.
	#[validate(length(min = 1, message = "must not be empty"))]
	pub text: String,
	/// The creation time of the article.
	#[serde(skip_deserializing)]
	pub date: DateTime<Utc>,
}
