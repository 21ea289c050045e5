mod model;

use proc_macro::TokenStream;

/// Creates a new struct `XForm` for the model, holding the fields a client submits.
///
/// Fields with `#[serde(skip_deserializing)]` or `#[serde(skip)]` are assigned by the
/// server and left out. All other fields are copied with their attributes, except for
/// `#[sqlx(..)]`. The `#[validate(..)]` rules are moved from the model onto the form,
/// which derives [`serde::Deserialize`] and [`validator::Validate`].
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
