use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

/// Whether the field is marked `#[serde(skip_deserializing)]` or `#[serde(skip)]`.
fn is_server_assigned(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}

/// Removes `#[validate(..)]` from the model itself, since only the form derives `Validate`.
fn strip_validation(input: &mut syn::DeriveInput) {
	let syn::Data::Struct(ref mut data) = input.data else {
		return;
	};

	for field in &mut data.fields {
		field.attrs.retain(|attr| !attr.path().is_ident("validate"));
	}
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = input.vis.clone();
	let generics = &receiver.generics;
	let form_ident = format_ident!("{}Form", ident);
	let form_doc = format!("Submitted fields of [`{ident}`].");

	let fields = receiver.data.take_struct().expect("expected struct");
	let form_fields = fields
		.iter()
		.filter(|field| !is_server_assigned(&field.attrs))
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;
			let ty = &field.ty;
			let vis = &field.vis;
			let attrs = field
				.attrs
				.iter()
				.filter(|attr| !attr.path().is_ident("sqlx"));

			Some(quote! {
				#(#attrs)*
				#vis #ident: #ty,
			})
		})
		.collect::<Vec<_>>();

	strip_validation(&mut input);

	quote! {
		#input

		#[doc = #form_doc]
		#[derive(Debug, ::serde::Deserialize, ::validator::Validate)]
		#vis struct #form_ident #generics {
			#(
				#form_fields
			)*
		}
	}
	.into()
}
