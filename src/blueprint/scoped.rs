use std::sync::Arc;

use super::{Blueprint, Built};
use crate::context::ConstructionContext;
use crate::descriptor::{Construct, TypeInfo, Value};
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

/// Answers every request for one exact type with a registered instance.
///
/// Each answer is a clone of the instance; register an `Arc<T>` to share a
/// single allocation between all consumers.
pub struct ScopedBlueprint {
	ty: TypeInfo,
	supply: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl ScopedBlueprint {
	pub fn new<T: Construct + Clone + Send + Sync>(instance: T) -> Self {
		Self {
			ty: TypeInfo::of::<T>(),
			supply: Arc::new(move || Box::new(instance.clone())),
		}
	}

	pub fn ty(&self) -> TypeInfo {
		self.ty
	}
}

impl Blueprint for ScopedBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.request() == self.ty
	}

	fn construct(&self, _context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		Ok(Built::Value((self.supply)()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::unpack;
	use rstest::rstest;

	#[rstest]
	fn test_every_answer_shares_the_instance() {
		// Arrange
		let shared = Arc::new("config".to_string());
		let blueprint = ScopedBlueprint::new(Arc::clone(&shared));
		let context = ConstructionContext::of::<Arc<String>>();
		let pipeline = Pipeline::default();

		// Act
		let first = blueprint.construct(&context, &pipeline).unwrap().into_value().unwrap();
		let second = blueprint.construct(&context, &pipeline).unwrap().into_value().unwrap();

		// Assert
		let first = unpack::<Arc<String>>(first).unwrap();
		let second = unpack::<Arc<String>>(second).unwrap();
		assert!(Arc::ptr_eq(&first, &shared));
		assert!(Arc::ptr_eq(&first, &second));
	}

	#[rstest]
	fn test_matches_exact_type_only() {
		let blueprint = ScopedBlueprint::new(7u32);
		assert!(blueprint.matches(&ConstructionContext::of::<u32>()));
		assert!(!blueprint.matches(&ConstructionContext::of::<Option<u32>>()));
	}
}
