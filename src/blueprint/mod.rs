//! Construction blueprints
//!
//! A blueprint is one link of the chain of responsibility: it declares which
//! requests it [`matches`](Blueprint::matches) and builds values for them,
//! calling back into the [`Pipeline`] for every nested value it needs.
//!
//! Built-in blueprints, in evaluation order:
//!
//! 1. [`SubstitutionBlueprint`] - redirects registered contracts to implementations
//! 2. Leaf blueprints - primitives, strings, identifiers, time values
//! 3. [`SequenceMemberOmission`] - leaves growable collection members unset
//! 4. [`SequenceBlueprint`] - builds collections and arrays
//! 5. [`WrapperBlueprint`] - `Option`, `Box`, `Arc`, `Rc`
//! 6. [`ChoiceBlueprint`] - field-less enums
//! 7. [`ObjectBlueprint`] - constructor plus members

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ConstructionContext;
use crate::descriptor::Value;
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

mod convention;
mod leaf;
mod object;
mod scoped;
mod sequence;
mod substitution;
mod wrapper;

pub use convention::{
	MemberAnnotationBlueprint, MemberConvention, MemberValueBlueprint, OmitMemberBlueprint,
	ParameterAnnotationBlueprint, TypeValueBlueprint,
};
pub use leaf::{ChoiceBlueprint, LeafBlueprint, leaf_blueprints};
pub use object::ObjectBlueprint;
pub use scoped::ScopedBlueprint;
pub use sequence::{SequenceBlueprint, SequenceMemberOmission};
pub use substitution::{Substitution, SubstitutionBlueprint};
pub use wrapper::WrapperBlueprint;

/// Outcome of a blueprint.
pub enum Built {
	Value(Value),
	/// Intentionally skipped: members stay at their initial value and
	/// constructor parameters receive their type's placeholder.
	Omitted,
}

impl Built {
	pub fn of<T: Any>(value: T) -> Self {
		Built::Value(Box::new(value))
	}

	pub fn is_omitted(&self) -> bool {
		matches!(self, Built::Omitted)
	}

	pub fn into_value(self) -> Option<Value> {
		match self {
			Built::Value(value) => Some(value),
			Built::Omitted => None,
		}
	}
}

impl std::fmt::Debug for Built {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Built::Value(_) => f.write_str("Built::Value(..)"),
			Built::Omitted => f.write_str("Built::Omitted"),
		}
	}
}

/// A match-and-construct unit for one category of requests.
pub trait Blueprint: Send + Sync {
	fn matches(&self, context: &ConstructionContext) -> bool;

	fn construct(&self, context: &ConstructionContext, pipeline: &Pipeline)
	-> ConstructResult<Built>;

	/// Name used in trace output.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// Substitution map keyed by the contract type.
pub type TypeMap = HashMap<std::any::TypeId, Substitution>;

/// The built-in blueprints, evaluated after every caller-registered one.
pub fn default_blueprints(type_map: Arc<TypeMap>) -> Vec<Arc<dyn Blueprint>> {
	let mut blueprints: Vec<Arc<dyn Blueprint>> =
		vec![Arc::new(SubstitutionBlueprint::new(type_map))];
	blueprints.extend(leaf_blueprints());
	blueprints.push(Arc::new(SequenceMemberOmission));
	blueprints.push(Arc::new(SequenceBlueprint));
	blueprints.push(Arc::new(WrapperBlueprint));
	blueprints.push(Arc::new(ChoiceBlueprint));
	blueprints.push(Arc::new(ObjectBlueprint));
	blueprints
}
