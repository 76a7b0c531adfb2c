//! Caller-configured conventions over members, parameters and types
//!
//! These blueprints back the convention operations of
//! [`Registry`](crate::Registry): omission rules, member value factories,
//! annotation-driven values and exact-type factories.

use std::any::Any;
use std::sync::Arc;

use super::{Blueprint, Built};
use crate::context::ConstructionContext;
use crate::descriptor::{Construct, MemberInfo, TypeInfo};
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

/// Predicate over member descriptors.
pub type MemberConvention = Arc<dyn Fn(&MemberInfo) -> bool + Send + Sync>;

/// Omits members whose declared type is one of `types` and that satisfy the
/// convention.
pub struct OmitMemberBlueprint {
	convention: MemberConvention,
	types: Vec<TypeInfo>,
}

impl OmitMemberBlueprint {
	pub fn new(convention: MemberConvention, types: Vec<TypeInfo>) -> Self {
		Self { convention, types }
	}
}

impl Blueprint for OmitMemberBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context
			.member()
			.is_some_and(|member| self.types.contains(&member.ty) && (self.convention)(member))
	}

	fn construct(&self, context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		tracing::trace!(member = context.slot_name().unwrap_or_default(), "omitting member");
		Ok(Built::Omitted)
	}
}

/// Fills members of type `T` that satisfy the convention from a factory.
pub struct MemberValueBlueprint<T> {
	convention: MemberConvention,
	factory: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T: Construct> MemberValueBlueprint<T> {
	pub fn new(convention: MemberConvention, factory: Arc<dyn Fn() -> T + Send + Sync>) -> Self {
		Self {
			convention,
			factory,
		}
	}
}

impl<T: Construct> Blueprint for MemberValueBlueprint<T> {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.request().is::<T>() && context.member().is_some_and(|member| (self.convention)(member))
	}

	fn construct(&self, _context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		Ok(Built::of((self.factory)()))
	}
}

/// Derives values of type `V` for members annotated with an `A`.
pub struct MemberAnnotationBlueprint<A, V> {
	value: Arc<dyn Fn(&A) -> V + Send + Sync>,
}

impl<A: Any, V: Construct> MemberAnnotationBlueprint<A, V> {
	pub fn new(value: Arc<dyn Fn(&A) -> V + Send + Sync>) -> Self {
		Self { value }
	}
}

impl<A: Any, V: Construct> Blueprint for MemberAnnotationBlueprint<A, V> {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.request().is::<V>()
			&& context
				.member()
				.is_some_and(|member| member.annotation::<A>().is_some())
	}

	fn construct(&self, context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		match context.member().and_then(|member| member.annotation::<A>()) {
			Some(annotation) => Ok(Built::of((self.value)(annotation))),
			None => Ok(Built::Omitted),
		}
	}
}

/// Derives values of type `V` for constructor parameters annotated with an `A`.
pub struct ParameterAnnotationBlueprint<A, V> {
	value: Arc<dyn Fn(&A) -> V + Send + Sync>,
}

impl<A: Any, V: Construct> ParameterAnnotationBlueprint<A, V> {
	pub fn new(value: Arc<dyn Fn(&A) -> V + Send + Sync>) -> Self {
		Self { value }
	}
}

impl<A: Any, V: Construct> Blueprint for ParameterAnnotationBlueprint<A, V> {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.request().is::<V>()
			&& context
				.parameter()
				.is_some_and(|parameter| parameter.annotation::<A>().is_some())
	}

	fn construct(&self, context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		match context
			.parameter()
			.and_then(|parameter| parameter.annotation::<A>())
		{
			Some(annotation) => Ok(Built::of((self.value)(annotation))),
			None => Ok(Built::Omitted),
		}
	}
}

/// Builds every request for exactly `T` from a factory.
pub struct TypeValueBlueprint<T> {
	factory: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T: Construct> TypeValueBlueprint<T> {
	pub fn new(factory: Arc<dyn Fn() -> T + Send + Sync>) -> Self {
		Self { factory }
	}
}

impl<T: Construct> Blueprint for TypeValueBlueprint<T> {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.request().is::<T>()
	}

	fn construct(&self, _context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		Ok(Built::of((self.factory)()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::Origin;
	use crate::descriptor::{Annotation, ParameterInfo, Visibility, unpack};
	use rstest::rstest;

	struct MaxLength(usize);

	fn member<T: Construct>(name: &'static str, annotations: Vec<Annotation>) -> ConstructionContext {
		let member = MemberInfo {
			name,
			ty: TypeInfo::of::<T>(),
			visibility: Visibility::Public,
			annotations,
			assign: |_, _| Ok(()),
		};
		ConstructionContext::of::<u8>().descend(member.ty, Some(Origin::Member(member)))
	}

	#[rstest]
	#[case::matching(member::<u32>("owner_id", Vec::new()), true)]
	#[case::wrong_name(member::<u32>("owner", Vec::new()), false)]
	#[case::wrong_type(member::<String>("owner_id", Vec::new()), false)]
	#[case::not_a_member(ConstructionContext::of::<u32>(), false)]
	fn test_omission_requires_convention_and_type(
		#[case] context: ConstructionContext,
		#[case] expected: bool,
	) {
		// Arrange
		let blueprint = OmitMemberBlueprint::new(
			Arc::new(|member: &MemberInfo| member.name.ends_with("_id")),
			vec![TypeInfo::of::<u32>()],
		);

		// Act & Assert
		assert_eq!(blueprint.matches(&context), expected);
	}

	#[rstest]
	fn test_member_value_uses_factory() {
		// Arrange
		let blueprint = MemberValueBlueprint::<String>::new(
			Arc::new(|member: &MemberInfo| member.name == "email"),
			Arc::new(|| "user@example.com".to_string()),
		);
		let context = member::<String>("email", Vec::new());

		// Act
		let built = blueprint.construct(&context, &Pipeline::default()).unwrap();

		// Assert
		assert!(blueprint.matches(&context));
		assert!(!blueprint.matches(&member::<String>("name", Vec::new())));
		let value = unpack::<String>(built.into_value().unwrap()).unwrap();
		assert_eq!(*value, "user@example.com");
	}

	#[rstest]
	fn test_member_annotation_drives_value() {
		// Arrange
		let blueprint = MemberAnnotationBlueprint::<MaxLength, String>::new(Arc::new(|max: &MaxLength| {
			"x".repeat(max.0)
		}));
		let context = member::<String>("code", vec![Annotation::new(MaxLength(4))]);

		// Act
		let built = blueprint.construct(&context, &Pipeline::default()).unwrap();

		// Assert
		assert!(!blueprint.matches(&member::<String>("code", Vec::new())));
		assert_eq!(*unpack::<String>(built.into_value().unwrap()).unwrap(), "xxxx");
	}

	#[rstest]
	fn test_parameter_annotation_ignores_members() {
		let blueprint =
			ParameterAnnotationBlueprint::<MaxLength, usize>::new(Arc::new(|max: &MaxLength| max.0));
		let parameter = ConstructionContext::for_parameter(ParameterInfo {
			name: "limit",
			ty: TypeInfo::of::<usize>(),
			annotations: vec![Annotation::new(MaxLength(9))],
		});

		assert!(blueprint.matches(&parameter));
		assert!(!blueprint.matches(&member::<usize>("limit", vec![Annotation::new(MaxLength(9))])));
		let built = blueprint.construct(&parameter, &Pipeline::default()).unwrap();
		assert_eq!(*unpack::<usize>(built.into_value().unwrap()).unwrap(), 9);
	}
}
