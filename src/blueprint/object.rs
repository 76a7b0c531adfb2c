//! Default object builder: constructor plus settable members

use super::{Blueprint, Built};
use crate::context::{ConstructionContext, Origin};
use crate::descriptor::Shape;
use crate::error::{ConstructError, ConstructResult};
use crate::pipeline::Pipeline;

/// Builds any object type with at least one public constructor.
///
/// 1. Selects a public constructor per the constructor policy.
/// 2. Requests every parameter through the pipeline; omitted parameters
///    receive the placeholder value of their declared type.
/// 3. Invokes the constructor.
/// 4. Requests every member selected by the member policy that is not
///    already filled by a parameter of the same name and type, and assigns
///    the value unless it was omitted.
pub struct ObjectBlueprint;

impl Blueprint for ObjectBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		match context.descriptor().shape() {
			Shape::Object(object) => object.public_constructors().next().is_some(),
			_ => false,
		}
	}

	fn construct(&self, context: &ConstructionContext, pipeline: &Pipeline) -> ConstructResult<Built> {
		let request = context.request();
		let Shape::Object(object) = context.descriptor().into_shape() else {
			return Err(ConstructError::NoMatchingStrategy {
				type_name: request.short_name(),
			});
		};
		let policies = pipeline.policies();
		let constructor = policies.constructor.select(&object.constructors).ok_or_else(|| {
			ConstructError::NoMatchingStrategy {
				type_name: request.short_name(),
			}
		})?;

		let mut arguments = Vec::with_capacity(constructor.arity());
		for parameter in &constructor.parameters {
			let child = context.descend(parameter.ty, Some(Origin::Parameter(parameter.clone())));
			let argument = match pipeline.send(&child)? {
				Built::Value(value) => value,
				Built::Omitted => parameter.ty.describe().placeholder().ok_or_else(|| {
					ConstructError::Unfillable {
						parameter: parameter.name.to_string(),
						type_name: parameter.ty.short_name(),
					}
				})?,
			};
			arguments.push(argument);
		}
		let mut instance = (constructor.invoke)(arguments)?;

		for member in policies.members.select(&object.members) {
			if constructor.satisfies(member) {
				continue;
			}
			let child = context.descend(member.ty, Some(Origin::Member(member.clone())));
			if let Built::Value(value) = pipeline.send(&child)? {
				(member.assign)(instance.as_mut(), value)?;
			}
		}

		Ok(Built::Value(instance))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::unpack;
	use crate::registry::Registry;
	use crate::Construct;
	use rstest::rstest;

	#[derive(Debug, Default, Construct)]
	#[construct(default)]
	struct Person {
		pub name: String,
		pub age: i32,
		secret: Option<String>,
	}

	#[derive(Debug, Construct)]
	#[construct(constructor = "pub fn with_name(name: String) -> Self")]
	#[construct(constructor = "pub fn new(name: String, age: u8) -> Self")]
	#[construct(constructor = "pub fn full(name: String, age: u8) -> Self")]
	struct Account {
		pub name: String,
		pub age: u8,
		pub nickname: String,
		#[construct(skip)]
		pub via: &'static str,
	}

	impl Account {
		fn with_name(name: String) -> Self {
			Self {
				name,
				age: 0,
				nickname: String::new(),
				via: "with_name",
			}
		}

		fn new(name: String, age: u8) -> Self {
			Self {
				name,
				age,
				nickname: String::new(),
				via: "new",
			}
		}

		fn full(name: String, age: u8) -> Self {
			Self {
				name,
				age,
				nickname: String::new(),
				via: "full",
			}
		}
	}

	#[derive(Debug, Construct)]
	#[construct(constructor = "fn hidden() -> Self")]
	struct Sealed {
		pub value: u32,
	}

	impl Sealed {
		fn hidden() -> Self {
			Self { value: 0 }
		}
	}

	fn build<T: Construct>(registry: &Registry) -> ConstructResult<T> {
		let pipeline = registry.pipeline();
		let value = ObjectBlueprint
			.construct(&ConstructionContext::of::<T>(), &pipeline)?
			.into_value()
			.expect("object blueprint never omits");
		Ok(*unpack::<T>(value)?)
	}

	#[rstest]
	fn test_builds_public_members() {
		// Act
		let person: Person = build(&Registry::new()).unwrap();

		// Assert
		assert!(person.name.starts_with("name-"));
		assert_ne!(person.age, 0);
		assert!(person.secret.is_none());
	}

	#[rstest]
	fn test_restricted_members_built_when_enabled() {
		// Arrange
		let mut registry = Registry::new();
		registry.construct_private_members();

		// Act
		let person: Person = build(&registry).unwrap();

		// Assert
		assert!(person.secret.is_some_and(|secret| secret.starts_with("secret-")));
	}

	#[rstest]
	fn test_greedy_picks_first_widest_constructor() {
		let account: Account = build(&Registry::new()).unwrap();

		assert_eq!(account.via, "new");
		assert_ne!(account.age, 0);
		// `name` is filled by the constructor, `nickname` only as a member
		assert!(account.nickname.starts_with("nickname-"));
	}

	#[rstest]
	fn test_modest_picks_narrowest_constructor() {
		// Arrange
		let mut registry = Registry::new();
		registry.use_modest_constructor();

		// Act
		let account: Account = build(&registry).unwrap();

		// Assert
		assert_eq!(account.via, "with_name");
		assert!(account.name.starts_with("name-"));
	}

	#[rstest]
	fn test_type_without_public_constructor_does_not_match() {
		let context = ConstructionContext::of::<Sealed>();
		assert!(!ObjectBlueprint.matches(&context));
		assert!(ObjectBlueprint.matches(&ConstructionContext::of::<Person>()));
	}
}
