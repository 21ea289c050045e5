use macros::model;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single user.
#[model]
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The username that is displayed to the public.
	#[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
	pub username: String,
	/// The email address used for logging in.
	#[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
	pub email: String,
	/// The password, only ever stored as an Argon2 hash.
	#[serde(skip_serializing)]
	#[validate(length(min = 1, message = "must not be empty"))]
	pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
	#[validate(length(min = 1, message = "must not be empty"))]
	pub email: String,
	#[validate(length(min = 1, message = "must not be empty"))]
	pub password: String,
}
