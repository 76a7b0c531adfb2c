//! # Construkt
//!
//! Object-graph synthesis for test fixtures.
//!
//! Given a type, construkt produces a fully populated instance, including every
//! transitive dependency, without the caller writing field-by-field values.
//!
//! ## Core Concepts
//!
//! - **Descriptors**: every constructible type implements [`Construct`], usually
//!   through `#[derive(Construct)]`, and describes its constructors, members,
//!   elements or inner type
//! - **Blueprints**: match-and-construct units evaluated in order by the
//!   [`Pipeline`]; the first blueprint that matches a request builds it
//! - **Registry**: the configuration composing custom blueprints, substitutions,
//!   scoped instances and scalar policies
//! - **Omission**: a blueprint may intentionally skip a value; members keep
//!   their initial value and constructor parameters receive a placeholder
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use construkt::{Construct, Construkt, Registry};
//!
//! #[derive(Debug, Default, Construct)]
//! #[construct(default)]
//! struct Settings {
//!     pub region: String,
//! }
//!
//! #[derive(Debug, Construct)]
//! #[construct(constructor = "pub fn new(settings: Arc<Settings>) -> Self")]
//! struct Service {
//!     pub name: String,
//!     pub settings: Arc<Settings>,
//!     pub tags: Vec<String>,
//! }
//!
//! impl Service {
//!     fn new(settings: Arc<Settings>) -> Self {
//!         Self {
//!             name: String::new(),
//!             settings,
//!             tags: Vec::new(),
//!         }
//!     }
//! }
//!
//! let shared = Arc::new(Settings::default());
//! let mut registry = Registry::new();
//! registry.use_instance(Arc::clone(&shared));
//!
//! let service: Service = Construkt::with_registry(registry).construct().unwrap();
//! assert!(service.name.starts_with("name-"));
//! assert!(Arc::ptr_eq(&service.settings, &shared));
//! // collection members are left unset
//! assert!(service.tags.is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! - `macros` (default) - `#[derive(Construct)]`
//!
//! ## Recursion
//!
//! Self-referential and mutually referential graphs are cut by a per-type
//! recursion guard: once a type reappears on the current construction path
//! more often than the recursion limit, the value is omitted, or construction
//! fails with [`ConstructError::RecursionLimitExceeded`] when
//! [`Registry::throw_on_recursion`] is enabled.

extern crate self as construkt;

pub mod blueprint;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod facade;
mod impls;
pub mod pipeline;
pub mod policy;
pub mod registry;
pub mod settings;

pub use blueprint::{Blueprint, Built};
pub use context::{ConstructionContext, Origin};
pub use descriptor::{
	Annotation, ChoiceShape, Construct, Constructor, MemberInfo, ObjectShape, ParameterInfo,
	SequenceShape, Shape, TypeDescriptor, TypeInfo, Upcast, Value, Visibility, WrapperKind,
	WrapperShape, unpack,
};
pub use error::{ConstructError, ConstructResult};
pub use facade::Construkt;
pub use pipeline::Pipeline;
pub use policy::{ConstructorStrategy, MemberStrategy, Policies};
pub use registry::Registry;
pub use settings::PolicySettings;

#[cfg(feature = "macros")]
pub use construkt_macros::Construct;

/// Support functions for `#[derive(Construct)]`. Not public API.
#[doc(hidden)]
pub mod __private {
	use std::any::Any;

	use crate::descriptor::{Construct, Value, unpack};
	use crate::error::{ConstructError, ConstructResult};

	pub use crate::descriptor::default_placeholder;

	pub fn into_value<T: Any>(value: T) -> Value {
		Box::new(value)
	}

	pub fn unpack_sized<T: Construct>(value: Value) -> ConstructResult<T> {
		unpack::<T>(value).map(|boxed| *boxed)
	}

	/// Takes the next constructor argument.
	pub fn argument<T: Construct>(arguments: &mut impl Iterator<Item = Value>) -> ConstructResult<T> {
		let value = arguments
			.next()
			.ok_or_else(ConstructError::type_mismatch::<T>)?;
		unpack_sized(value)
	}

	/// Views the object a member is assigned on.
	pub fn target<T: Any>(target: &mut dyn Any) -> ConstructResult<&mut T> {
		target
			.downcast_mut::<T>()
			.ok_or_else(ConstructError::type_mismatch::<T>)
	}
}
