//! Parsing of `#[construct(...)]` attributes

use syn::parse::ParseStream;
use syn::{Attribute, Expr, FnArg, Ident, LitStr, Pat, Result, Signature, Type, Visibility};

/// Struct-level configuration.
#[derive(Default)]
pub(crate) struct StructAttrs {
	pub(crate) default: bool,
	pub(crate) constructors: Vec<ConstructorAttr>,
}

/// A constructor declared with `constructor = "..."`.
pub(crate) struct ConstructorAttr {
	pub(crate) public: bool,
	pub(crate) name: Ident,
	pub(crate) parameters: Vec<ParameterAttr>,
}

pub(crate) struct ParameterAttr {
	pub(crate) name: Ident,
	pub(crate) ty: Type,
	pub(crate) annotations: Vec<Expr>,
}

/// Field-level configuration.
#[derive(Default)]
pub(crate) struct FieldAttrs {
	pub(crate) skip: bool,
	pub(crate) annotations: Vec<Expr>,
}

impl StructAttrs {
	pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
		let mut parsed = Self::default();

		for attr in attrs {
			if !attr.path().is_ident("construct") {
				continue;
			}

			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("default") {
					parsed.default = true;
					Ok(())
				} else if meta.path.is_ident("constructor") {
					let value: LitStr = meta.value()?.parse()?;
					parsed.constructors.push(ConstructorAttr::parse(&value)?);
					Ok(())
				} else {
					Err(meta.error("unsupported construct attribute"))
				}
			})?;
		}

		Ok(parsed)
	}
}

impl ConstructorAttr {
	fn parse(value: &LitStr) -> Result<Self> {
		let (visibility, signature) = value.parse_with(|input: ParseStream| {
			let visibility: Visibility = input.parse()?;
			let signature: Signature = input.parse()?;
			Ok((visibility, signature))
		})?;

		if signature.receiver().is_some() {
			return Err(syn::Error::new(
				value.span(),
				"constructors cannot take `self`",
			));
		}

		let parameters = signature
			.inputs
			.into_iter()
			.map(|input| match input {
				FnArg::Typed(typed) => ParameterAttr::parse(typed.attrs, *typed.pat, *typed.ty, value),
				FnArg::Receiver(_) => Err(syn::Error::new(value.span(), "unexpected receiver")),
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(Self {
			public: matches!(visibility, Visibility::Public(_)),
			name: signature.ident,
			parameters,
		})
	}
}

impl ParameterAttr {
	fn parse(attrs: Vec<Attribute>, pat: Pat, ty: Type, source: &LitStr) -> Result<Self> {
		let Pat::Ident(pat) = pat else {
			return Err(syn::Error::new(
				source.span(),
				"constructor parameters must be plain identifiers",
			));
		};

		let mut annotations = Vec::new();
		for attr in attrs {
			if !attr.path().is_ident("annotate") {
				return Err(syn::Error::new(
					source.span(),
					"only #[annotate(...)] is supported on constructor parameters",
				));
			}
			annotations.push(attr.parse_args::<Expr>()?);
		}

		Ok(Self {
			name: pat.ident,
			ty,
			annotations,
		})
	}
}

impl FieldAttrs {
	pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
		let mut parsed = Self::default();

		for attr in attrs {
			if !attr.path().is_ident("construct") {
				continue;
			}

			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("skip") {
					parsed.skip = true;
					Ok(())
				} else if meta.path.is_ident("annotate") {
					let value: Expr = meta.value()?.parse()?;
					parsed.annotations.push(value);
					Ok(())
				} else {
					Err(meta.error("unsupported construct field attribute"))
				}
			})?;
		}

		Ok(parsed)
	}
}
