//! Collection blueprints

use super::{Blueprint, Built};
use crate::context::ConstructionContext;
use crate::descriptor::Shape;
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

/// Leaves growable collection members unset.
///
/// Collections filled through constructor parameters are still built;
/// fixed-size arrays are always built.
pub struct SequenceMemberOmission;

impl Blueprint for SequenceMemberOmission {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.fills_member()
			&& matches!(context.descriptor().shape(), Shape::Sequence(sequence) if sequence.is_growable())
	}

	fn construct(&self, context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		tracing::trace!(
			member = context.slot_name().unwrap_or_default(),
			"leaving collection member unset"
		);
		Ok(Built::Omitted)
	}
}

/// Builds sequences element by element.
///
/// Growable collections receive `enumerable_count` elements; arrays receive
/// exactly their length. When any element is omitted the whole collection is
/// omitted, since a partially filled collection cannot be represented.
pub struct SequenceBlueprint;

impl Blueprint for SequenceBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		matches!(context.descriptor().shape(), Shape::Sequence(_))
	}

	fn construct(&self, context: &ConstructionContext, pipeline: &Pipeline) -> ConstructResult<Built> {
		let Shape::Sequence(sequence) = context.descriptor().into_shape() else {
			return Ok(Built::Omitted);
		};
		let count = sequence
			.fixed_len
			.unwrap_or(pipeline.policies().enumerable_count);

		let mut elements = Vec::with_capacity(count);
		for _ in 0..count {
			match pipeline.send(&context.element(sequence.element))? {
				Built::Value(value) => elements.push(value),
				Built::Omitted => return Ok(Built::Omitted),
			}
		}
		(sequence.collect)(elements).map(Built::Value)
	}
}
