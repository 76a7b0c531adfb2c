//! Implementation of `#[derive(Construct)]`

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, FieldsNamed, Ident, Result};

use crate::attrs::{ConstructorAttr, FieldAttrs, StructAttrs};

pub(crate) fn derive_construct_impl(input: DeriveInput) -> Result<TokenStream> {
	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"Construct cannot be derived for generic types; implement it by hand",
		));
	}

	let name = &input.ident;
	let describe = match &input.data {
		Data::Struct(data) => {
			let attrs = StructAttrs::from_attrs(&input.attrs)?;
			match &data.fields {
				Fields::Named(fields) => describe_object(name, &attrs, Some(fields))?,
				Fields::Unit => describe_object(name, &attrs, None)?,
				Fields::Unnamed(_) => {
					return Err(syn::Error::new_spanned(
						name,
						"Construct can only be derived for structs with named fields",
					));
				}
			}
		}
		Data::Enum(data) => describe_choice(name, data)?,
		Data::Union(_) => {
			return Err(syn::Error::new_spanned(
				name,
				"Construct cannot be derived for unions",
			));
		}
	};

	Ok(quote! {
		impl ::construkt::Construct for #name {
			fn describe() -> ::construkt::TypeDescriptor {
				#describe
			}

			fn from_value(
				value: ::construkt::Value,
			) -> ::std::option::Option<::std::boxed::Box<Self>> {
				value.downcast::<Self>().ok()
			}

			fn into_value(boxed: ::std::boxed::Box<Self>) -> ::construkt::Value {
				boxed
			}
		}
	})
}

fn describe_object(
	name: &Ident,
	attrs: &StructAttrs,
	fields: Option<&FieldsNamed>,
) -> Result<TokenStream> {
	let mut constructors = Vec::new();
	if attrs.default {
		constructors.push(quote! {
			::construkt::Constructor {
				name: "default",
				visibility: ::construkt::Visibility::Public,
				parameters: ::std::vec::Vec::new(),
				invoke: |_| {
					::std::result::Result::Ok(::construkt::__private::into_value(
						<#name as ::std::default::Default>::default(),
					))
				},
			}
		});
	}
	constructors.extend(attrs.constructors.iter().map(|constructor| describe_constructor(name, constructor)));
	if fields.is_none() && constructors.is_empty() {
		constructors.push(quote! {
			::construkt::Constructor {
				name: "unit",
				visibility: ::construkt::Visibility::Public,
				parameters: ::std::vec::Vec::new(),
				invoke: |_| ::std::result::Result::Ok(::construkt::__private::into_value(#name)),
			}
		});
	}

	let mut members = Vec::new();
	for field in fields.into_iter().flat_map(|fields| fields.named.iter()) {
		let field_attrs = FieldAttrs::from_attrs(&field.attrs)?;
		if field_attrs.skip {
			continue;
		}
		let Some(ident) = &field.ident else {
			continue;
		};
		let ty = &field.ty;
		let member_name = ident.to_string();
		let visibility = if matches!(field.vis, syn::Visibility::Public(_)) {
			quote!(::construkt::Visibility::Public)
		} else {
			quote!(::construkt::Visibility::Restricted)
		};
		let annotations = &field_attrs.annotations;
		members.push(quote! {
			::construkt::MemberInfo {
				name: #member_name,
				ty: ::construkt::TypeInfo::of::<#ty>(),
				visibility: #visibility,
				annotations: ::std::vec![#(::construkt::Annotation::new(#annotations)),*],
				assign: |target, value| {
					::construkt::__private::target::<#name>(target)?.#ident =
						::construkt::__private::unpack_sized::<#ty>(value)?;
					::std::result::Result::Ok(())
				},
			}
		});
	}

	let placeholder = attrs.default.then(|| {
		quote! {
			.with_placeholder(::construkt::__private::default_placeholder::<#name>)
		}
	});

	Ok(quote! {
		::construkt::TypeDescriptor::new(::construkt::Shape::Object(::construkt::ObjectShape {
			constructors: ::std::vec![#(#constructors),*],
			members: ::std::vec![#(#members),*],
		}))
		#placeholder
	})
}

fn describe_constructor(name: &Ident, constructor: &ConstructorAttr) -> TokenStream {
	let function = &constructor.name;
	let function_name = function.to_string();
	let visibility = if constructor.public {
		quote!(::construkt::Visibility::Public)
	} else {
		quote!(::construkt::Visibility::Restricted)
	};

	let parameters = constructor.parameters.iter().map(|parameter| {
		let parameter_name = parameter.name.to_string();
		let ty = &parameter.ty;
		let annotations = &parameter.annotations;
		quote! {
			::construkt::ParameterInfo {
				name: #parameter_name,
				ty: ::construkt::TypeInfo::of::<#ty>(),
				annotations: ::std::vec![#(::construkt::Annotation::new(#annotations)),*],
			}
		}
	});

	let arguments = constructor.parameters.iter().map(|parameter| {
		let ty = &parameter.ty;
		quote! {
			::construkt::__private::argument::<#ty>(&mut arguments)?
		}
	});

	quote! {
		::construkt::Constructor {
			name: #function_name,
			visibility: #visibility,
			parameters: ::std::vec![#(#parameters),*],
			invoke: |arguments| {
				#[allow(unused_mut, unused_variables)]
				let mut arguments = arguments.into_iter();
				::std::result::Result::Ok(::construkt::__private::into_value(
					#name::#function(#(#arguments),*),
				))
			},
		}
	}
}

fn describe_choice(name: &Ident, data: &DataEnum) -> Result<TokenStream> {
	let mut variants = Vec::with_capacity(data.variants.len());
	for variant in &data.variants {
		if !matches!(variant.fields, Fields::Unit) {
			return Err(syn::Error::new_spanned(
				variant,
				"Construct can only be derived for enums whose variants have no fields",
			));
		}
		variants.push(&variant.ident);
	}
	let Some((first, _)) = variants.split_first() else {
		return Err(syn::Error::new_spanned(
			name,
			"Construct cannot be derived for enums without variants",
		));
	};

	let count = variants.len();
	let arms = variants.iter().enumerate().map(|(index, variant)| {
		if index + 1 == count {
			quote!(_ => ::construkt::__private::into_value(#name::#variant))
		} else {
			quote!(#index => ::construkt::__private::into_value(#name::#variant))
		}
	});

	Ok(quote! {
		::construkt::TypeDescriptor::new(::construkt::Shape::Choice(::construkt::ChoiceShape {
			variants: #count,
			select: |index| match index {
				#(#arms,)*
			},
		}))
		.with_placeholder(|| ::std::option::Option::Some(::construkt::__private::into_value(#name::#first)))
	})
}
