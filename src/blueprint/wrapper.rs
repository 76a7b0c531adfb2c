use super::{Blueprint, Built};
use crate::context::ConstructionContext;
use crate::descriptor::Shape;
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

/// Builds `Option`, `Box`, `Arc` and `Rc` by constructing the inner type.
///
/// The inner request keeps the slot of the wrapper, so an `Option<String>`
/// member named `label` still produces `"label-<n>"`. An omitted inner value
/// omits the wrapper.
pub struct WrapperBlueprint;

impl Blueprint for WrapperBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		matches!(context.descriptor().shape(), Shape::Wrapper(_))
	}

	fn construct(&self, context: &ConstructionContext, pipeline: &Pipeline) -> ConstructResult<Built> {
		let Shape::Wrapper(wrapper) = context.descriptor().into_shape() else {
			return Ok(Built::Omitted);
		};
		match pipeline.send(&context.redirect(wrapper.inner))? {
			Built::Value(inner) => (wrapper.wrap)(inner).map(Built::Value),
			Built::Omitted => Ok(Built::Omitted),
		}
	}
}
