//! Contract-to-implementation substitution

use std::sync::Arc;

use super::{Blueprint, Built, TypeMap};
use crate::context::ConstructionContext;
use crate::descriptor::{Construct, TypeInfo, Upcast, Value, unpack};
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

/// A registered implementation for one contract type.
#[derive(Clone, Copy)]
pub struct Substitution {
	implementation: TypeInfo,
	convert: fn(Value) -> ConstructResult<Value>,
}

impl Substitution {
	/// Substitution of contract `C` by implementation `I`.
	pub fn new<C: ?Sized + Upcast<I>, I: Construct>() -> Self {
		Self {
			implementation: TypeInfo::of::<I>(),
			convert: upcast_value::<C, I>,
		}
	}

	pub fn implementation(&self) -> TypeInfo {
		self.implementation
	}

	/// Converts a constructed implementation into the contract.
	pub fn convert(&self, implementation: Value) -> ConstructResult<Value> {
		(self.convert)(implementation)
	}
}

impl std::fmt::Debug for Substitution {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Substitution")
			.field("implementation", &self.implementation)
			.finish_non_exhaustive()
	}
}

fn upcast_value<C: ?Sized + Upcast<I>, I: Construct>(value: Value) -> ConstructResult<Value> {
	let implementation = unpack::<I>(value)?;
	Ok(C::into_value(C::upcast(*implementation)))
}

/// Redirects requests for a registered contract to its implementation.
///
/// The implementation is built for the same slot and with the same ancestry
/// as the contract request.
pub struct SubstitutionBlueprint {
	map: Arc<TypeMap>,
}

impl SubstitutionBlueprint {
	pub fn new(map: Arc<TypeMap>) -> Self {
		Self { map }
	}
}

impl Blueprint for SubstitutionBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		self.map.contains_key(&context.request().id())
	}

	fn construct(&self, context: &ConstructionContext, pipeline: &Pipeline) -> ConstructResult<Built> {
		let Some(substitution) = self.map.get(&context.request().id()) else {
			return Ok(Built::Omitted);
		};
		tracing::trace!(
			contract = %context.request(),
			implementation = %substitution.implementation,
			"substituting"
		);
		match pipeline.send(&context.redirect(substitution.implementation))? {
			Built::Value(value) => substitution.convert(value).map(Built::Value),
			Built::Omitted => Ok(Built::Omitted),
		}
	}
}
