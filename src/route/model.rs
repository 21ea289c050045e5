use serde::Deserialize;
use validator::Validate;

/// A numeric id taken from the path, such as `/history/:id`.
#[derive(Debug, Deserialize, Validate)]
pub struct IdInput {
	pub id: i64,
}
