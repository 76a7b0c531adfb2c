//! Procedural macros for construkt.
//!
//! This crate provides `#[derive(Construct)]`, which generates the type
//! descriptor the construction pipeline uses in place of runtime reflection.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod construct;

/// Derives a `Construct` implementation for a struct or field-less enum.
///
/// # Attributes
///
/// ## Struct-level attributes
///
/// - `#[construct(default)]` - Adds a public zero-argument constructor backed by
///   `Default`, and uses `Default` as the placeholder for omitted parameters
/// - `#[construct(constructor = "pub fn new(name: String, #[annotate(Max(8))] code: String) -> Self")]` -
///   Declares a constructor; repeatable, declaration order breaks ties.
///   Constructors without `pub` are never selected.
///
/// ## Field-level attributes
///
/// - `#[construct(skip)]` - The field is not a member
/// - `#[construct(annotate = Expr)]` - Attaches an annotation value; repeatable
///
/// `pub` fields are public members; every other field is a restricted member,
/// populated only when the registry constructs private members.
///
/// Enums must only have unit variants; each variant is one choice and the
/// first variant is the placeholder.
///
/// # Example
///
/// ```ignore
/// use construkt::Construct;
///
/// #[derive(Construct)]
/// #[construct(constructor = "pub fn new(email: String) -> Self")]
/// pub struct Account {
///     pub email: String,
///     pub display_name: String,
///     #[construct(skip)]
///     pub cache: Vec<u8>,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl construkt::Construct for Account {
///     fn describe() -> construkt::TypeDescriptor {
///         construkt::TypeDescriptor::new(construkt::Shape::Object(construkt::ObjectShape {
///             constructors: vec![construkt::Constructor {
///                 name: "new",
///                 visibility: construkt::Visibility::Public,
///                 parameters: vec![/* email: String */],
///                 invoke: |arguments| { /* Account::new(email) */ },
///             }],
///             members: vec![/* email, display_name */],
///         }))
///     }
///
///     // from_value / into_value
/// }
/// ```
#[proc_macro_derive(Construct, attributes(construct))]
pub fn derive_construct(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	construct::derive_construct_impl(input)
		.unwrap_or_else(|err| err.to_compile_error())
		.into()
}
