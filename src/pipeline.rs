//! Chain-of-responsibility dispatcher
//!
//! The pipeline is the single recursion point of construction: every blueprint
//! obtains nested values by sending a new [`ConstructionContext`] back through
//! the same pipeline, so built-in and caller-registered blueprints compose
//! uniformly.

use std::sync::Arc;

use crate::blueprint::{Blueprint, Built};
use crate::context::ConstructionContext;
use crate::error::{ConstructError, ConstructResult};
use crate::policy::Policies;
use crate::registry::Registry;

/// An ordered, immutable snapshot of blueprints plus the effective policies.
///
/// Built by [`Registry::pipeline`] for each top-level construction.
#[derive(Clone)]
pub struct Pipeline {
	blueprints: Arc<[Arc<dyn Blueprint>]>,
	policies: Policies,
}

impl Pipeline {
	pub fn new(blueprints: Vec<Arc<dyn Blueprint>>, policies: Policies) -> Self {
		Self {
			blueprints: blueprints.into(),
			policies,
		}
	}

	pub fn policies(&self) -> &Policies {
		&self.policies
	}

	pub fn blueprints(&self) -> &[Arc<dyn Blueprint>] {
		&self.blueprints
	}

	/// Constructs the value described by `context`.
	///
	/// Before dispatching, the recursion guard counts how often the requested
	/// type already occurs in the ancestry. Past the recursion limit the value
	/// is omitted, or construction fails when throw-on-recursion is enabled.
	/// Otherwise the first blueprint whose `matches` accepts the context
	/// builds the value.
	///
	/// # Errors
	///
	/// - [`ConstructError::RecursionLimitExceeded`] when the guard trips and
	///   throw-on-recursion is enabled
	/// - [`ConstructError::UnregisteredAbstraction`] when nothing matches an
	///   abstract type
	/// - [`ConstructError::NoMatchingStrategy`] when nothing matches any other type
	/// - any error raised by the matching blueprint or a nested request
	pub fn send(&self, context: &ConstructionContext) -> ConstructResult<Built> {
		let request = context.request();

		if context.occurrences(request) > self.policies.recursion_limit {
			if self.policies.throw_on_recursion {
				return Err(ConstructError::RecursionLimitExceeded {
					type_name: request.short_name(),
					path: context.path(),
				});
			}
			tracing::debug!(
				request = %request,
				path = %context.path(),
				"recursion limit reached, omitting value"
			);
			return Ok(Built::Omitted);
		}

		let Some(blueprint) = self
			.blueprints
			.iter()
			.find(|blueprint| blueprint.matches(context))
		else {
			let type_name = request.short_name();
			return Err(if context.descriptor().is_abstract() {
				ConstructError::UnregisteredAbstraction { type_name }
			} else {
				ConstructError::NoMatchingStrategy { type_name }
			});
		};

		tracing::trace!(
			request = %request,
			blueprint = blueprint.name(),
			depth = context.depth(),
			"dispatching"
		);
		blueprint.construct(context, self)
	}
}

impl Default for Pipeline {
	/// Pipeline of the built-in blueprints with default policies.
	fn default() -> Self {
		Registry::default().pipeline()
	}
}

impl std::fmt::Debug for Pipeline {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Pipeline")
			.field(
				"blueprints",
				&self.blueprints.iter().map(|blueprint| blueprint.name()).collect::<Vec<_>>(),
			)
			.field("policies", &self.policies)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Construct;
	use crate::descriptor::{TypeInfo, unpack};
	use rstest::rstest;

	trait Storage {}

	crate::abstraction!(dyn Storage);

	#[derive(Debug, Default, Construct)]
	#[construct(default)]
	struct Node {
		pub label: String,
		pub next: Option<Box<Node>>,
	}

	struct Fixed;

	impl Blueprint for Fixed {
		fn matches(&self, context: &ConstructionContext) -> bool {
			context.request().is::<u16>()
		}

		fn construct(&self, _context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
			Ok(Built::of(42u16))
		}
	}

	#[rstest]
	fn test_first_matching_blueprint_wins() {
		// Arrange
		let mut blueprints: Vec<Arc<dyn Blueprint>> = vec![Arc::new(Fixed)];
		blueprints.extend(Pipeline::default().blueprints().iter().cloned());
		let pipeline = Pipeline::new(blueprints, Policies::default());

		// Act
		let built = pipeline.send(&ConstructionContext::of::<u16>()).unwrap();

		// Assert
		assert_eq!(*unpack::<u16>(built.into_value().unwrap()).unwrap(), 42);
	}

	#[rstest]
	fn test_guard_omits_reentrant_type() {
		// Arrange
		let context = ConstructionContext::of::<Node>()
			.descend(TypeInfo::of::<Node>(), None);

		// Act
		let built = Pipeline::default().send(&context).unwrap();

		// Assert
		assert!(built.is_omitted());
	}

	#[rstest]
	fn test_guard_allows_reentry_up_to_limit() {
		// Arrange
		let policies = Policies {
			recursion_limit: 1,
			..Policies::default()
		};
		let pipeline = Pipeline::new(Pipeline::default().blueprints().to_vec(), policies);

		// Act
		let built = pipeline.send(&ConstructionContext::of::<Node>()).unwrap();

		// Assert
		let node = unpack::<Node>(built.into_value().unwrap()).unwrap();
		let child = node.next.expect("one level of recursion is allowed");
		assert!(child.label.starts_with("label-"));
		assert!(child.next.is_none());
	}

	#[rstest]
	fn test_guard_throws_with_path() {
		// Arrange
		let policies = Policies {
			throw_on_recursion: true,
			..Policies::default()
		};
		let pipeline = Pipeline::new(Pipeline::default().blueprints().to_vec(), policies);

		// Act
		let result = pipeline.send(&ConstructionContext::of::<Node>());

		// Assert
		match result {
			Err(ConstructError::RecursionLimitExceeded { type_name, path }) => {
				assert_eq!(type_name, "Node");
				assert_eq!(path, "Node -> Node");
			}
			other => panic!("expected recursion error, got {other:?}"),
		}
	}

	#[rstest]
	fn test_unmatched_abstraction_is_reported_by_name() {
		let result = Pipeline::default().send(&ConstructionContext::of::<dyn Storage>());

		assert!(matches!(
			result,
			Err(ConstructError::UnregisteredAbstraction { type_name }) if type_name == "dyn Storage"
		));
	}
}
