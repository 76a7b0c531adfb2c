//! Registry: the composition root of construction policies
//!
//! A [`Registry`] collects everything that customizes construction:
//!
//! - caller-registered blueprints, evaluated before the built-in ones with the
//!   most recently registered first
//! - scoped instances, evaluated before everything else
//! - the substitution map from contract types to implementations
//! - scalar policies (constructor and member selection, collection size,
//!   recursion limit, throw-on-recursion)
//!
//! Registries are configuration-time objects. Each construction takes an
//! immutable [`Pipeline`] snapshot, so a registry can be reused and shared
//! across threads once it is assembled.

use std::any::Any;
use std::sync::Arc;

use crate::blueprint::{
	Blueprint, MemberAnnotationBlueprint, MemberConvention, MemberValueBlueprint,
	OmitMemberBlueprint, ParameterAnnotationBlueprint, ScopedBlueprint, Substitution, TypeMap,
	TypeValueBlueprint, default_blueprints,
};
use crate::descriptor::{Construct, MemberInfo, TypeInfo, Upcast};
use crate::error::{ConstructError, ConstructResult};
use crate::pipeline::Pipeline;
use crate::policy::{
	ConstructorStrategy, DEFAULT_ENUMERABLE_COUNT, DEFAULT_RECURSION_LIMIT, MemberStrategy, Policies,
};

/// Integer types recognized by [`Registry::omit_ids`], plus their `Option` forms.
macro_rules! id_types {
	($($ty:ty),* $(,)?) => {
		vec![$(TypeInfo::of::<$ty>(), TypeInfo::of::<Option<$ty>>()),*]
	};
}

/// Mutable configuration of a construction.
///
/// Scalar policies are stored as "set or unset" so that [`merge`](Self::merge)
/// only overwrites what the other registry explicitly configured.
///
/// # Examples
///
/// ```
/// use construkt::{Construkt, Registry};
///
/// let mut registry = Registry::new();
/// registry.use_modest_constructor().enumerable_count(5).unwrap();
///
/// let numbers: Vec<u32> = Construkt::with_registry(registry).construct().unwrap();
/// assert_eq!(numbers.len(), 5);
/// ```
#[derive(Clone, Default)]
pub struct Registry {
	scoped: Vec<Arc<dyn Blueprint>>,
	custom: Vec<Arc<dyn Blueprint>>,
	type_map: TypeMap,
	constructor: Option<ConstructorStrategy>,
	members: Option<MemberStrategy>,
	enumerable_count: Option<usize>,
	recursion_limit: Option<usize>,
	throw_on_recursion: Option<bool>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a custom blueprint, evaluated before all built-in blueprints and
	/// before every custom blueprint added earlier.
	pub fn add_blueprint(&mut self, blueprint: impl Blueprint + 'static) -> &mut Self {
		self.custom.push(Arc::new(blueprint));
		self
	}

	/// Adds several custom blueprints; the last one has the highest priority.
	pub fn add_blueprints<I>(&mut self, blueprints: I) -> &mut Self
	where
		I: IntoIterator<Item = Arc<dyn Blueprint>>,
	{
		self.custom.extend(blueprints);
		self
	}

	/// Substitutes every request for contract `C` with implementation `I`.
	///
	/// A later registration for the same contract replaces the earlier one.
	pub fn register<C, I>(&mut self) -> &mut Self
	where
		C: ?Sized + Upcast<I>,
		I: Construct,
	{
		self.type_map
			.insert(TypeInfo::of::<C>().id(), Substitution::new::<C, I>());
		self
	}

	/// Answers every request for `T` with a clone of `instance`.
	///
	/// Scoped instances take precedence over every other blueprint and the
	/// most recent registration for a type wins. Register an `Arc<T>` to
	/// share one allocation across the whole graph.
	pub fn use_instance<T>(&mut self, instance: T) -> &mut Self
	where
		T: Construct + Clone + Send + Sync,
	{
		self.scoped.push(Arc::new(ScopedBlueprint::new(instance)));
		self
	}

	/// Derives values of type `V` for members annotated with an `A`.
	pub fn add_member_annotation<A, V, F>(&mut self, value: F) -> &mut Self
	where
		A: Any,
		V: Construct,
		F: Fn(&A) -> V + Send + Sync + 'static,
	{
		self.add_blueprint(MemberAnnotationBlueprint::<A, V>::new(Arc::new(value)))
	}

	/// Derives values of type `V` for constructor parameters annotated with an `A`.
	pub fn add_parameter_annotation<A, V, F>(&mut self, value: F) -> &mut Self
	where
		A: Any,
		V: Construct,
		F: Fn(&A) -> V + Send + Sync + 'static,
	{
		self.add_blueprint(ParameterAnnotationBlueprint::<A, V>::new(Arc::new(value)))
	}

	pub fn use_modest_constructor(&mut self) -> &mut Self {
		self.constructor = Some(ConstructorStrategy::Modest);
		self
	}

	pub fn use_greedy_constructor(&mut self) -> &mut Self {
		self.constructor = Some(ConstructorStrategy::Greedy);
		self
	}

	/// Populates public members only (the default).
	pub fn omit_private_members(&mut self) -> &mut Self {
		self.members = Some(MemberStrategy::PublicOnly);
		self
	}

	/// Populates restricted members as well.
	pub fn construct_private_members(&mut self) -> &mut Self {
		self.members = Some(MemberStrategy::All);
		self
	}

	/// Omits integer members named `id` or ending in `_id`.
	pub fn omit_ids(&mut self) -> &mut Self {
		let types = id_types!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
		self.omit_members(
			|member: &MemberInfo| member.name == "id" || member.name.ends_with("_id"),
			&types,
		)
	}

	/// Omits members whose declared type is one of `types` and that satisfy
	/// `convention`.
	pub fn omit_members<F>(&mut self, convention: F, types: &[TypeInfo]) -> &mut Self
	where
		F: Fn(&MemberInfo) -> bool + Send + Sync + 'static,
	{
		let convention: MemberConvention = Arc::new(convention);
		self.add_blueprint(OmitMemberBlueprint::new(convention, types.to_vec()))
	}

	/// Omits every member declared with type `T`.
	pub fn omit_members_of<T: ?Sized + Construct>(&mut self) -> &mut Self {
		self.omit_members(|_| true, &[TypeInfo::of::<T>()])
	}

	/// Fills members of type `T` that satisfy `convention` from `factory`
	/// instead of constructing them.
	pub fn construct_member_using<T, C, F>(&mut self, convention: C, factory: F) -> &mut Self
	where
		T: Construct,
		C: Fn(&MemberInfo) -> bool + Send + Sync + 'static,
		F: Fn() -> T + Send + Sync + 'static,
	{
		self.add_blueprint(MemberValueBlueprint::new(Arc::new(convention), Arc::new(factory)))
	}

	/// Builds every request for exactly `T` with `factory`.
	pub fn construct_type_using<T, F>(&mut self, factory: F) -> &mut Self
	where
		T: Construct,
		F: Fn() -> T + Send + Sync + 'static,
	{
		self.add_blueprint(TypeValueBlueprint::new(Arc::new(factory)))
	}

	/// Sets the number of elements in constructed growable collections.
	///
	/// # Errors
	///
	/// Returns [`ConstructError::InvalidArgument`] if `count` is negative.
	pub fn enumerable_count(&mut self, count: i64) -> ConstructResult<&mut Self> {
		self.enumerable_count = Some(non_negative("enumerable count", count)?);
		Ok(self)
	}

	/// Sets how many times a type may reappear on one construction path.
	///
	/// # Errors
	///
	/// Returns [`ConstructError::InvalidArgument`] if `limit` is negative.
	pub fn recursion_limit(&mut self, limit: i64) -> ConstructResult<&mut Self> {
		self.recursion_limit = Some(non_negative("recursion limit", limit)?);
		Ok(self)
	}

	/// Fails construction instead of omitting values past the recursion limit.
	pub fn throw_on_recursion(&mut self, throw: bool) -> &mut Self {
		self.throw_on_recursion = Some(throw);
		self
	}

	/// Merges `other` into this registry.
	///
	/// Blueprints and scoped instances of `other` are appended, so they take
	/// precedence; substitutions of `other` replace those for the same
	/// contract; scalar policies are taken from `other` only where it set them.
	pub fn merge(&mut self, other: Registry) -> &mut Self {
		self.scoped.extend(other.scoped);
		self.custom.extend(other.custom);
		self.type_map.extend(other.type_map);
		self.constructor = other.constructor.or(self.constructor);
		self.members = other.members.or(self.members);
		self.enumerable_count = other.enumerable_count.or(self.enumerable_count);
		self.recursion_limit = other.recursion_limit.or(self.recursion_limit);
		self.throw_on_recursion = other.throw_on_recursion.or(self.throw_on_recursion);
		self
	}

	/// Effective policies, with defaults for every unset value.
	pub fn policies(&self) -> Policies {
		Policies {
			constructor: self.constructor.unwrap_or_default(),
			members: self.members.unwrap_or_default(),
			enumerable_count: self.enumerable_count.unwrap_or(DEFAULT_ENUMERABLE_COUNT),
			recursion_limit: self.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT),
			throw_on_recursion: self.throw_on_recursion.unwrap_or(false),
		}
	}

	/// The ordered blueprint list: scoped instances, custom blueprints (both
	/// most recent first), then the built-in blueprints.
	pub fn blueprints(&self) -> Vec<Arc<dyn Blueprint>> {
		self.scoped
			.iter()
			.rev()
			.chain(self.custom.iter().rev())
			.cloned()
			.chain(default_blueprints(Arc::new(self.type_map.clone())))
			.collect()
	}

	/// Snapshots this registry into a pipeline.
	pub fn pipeline(&self) -> Pipeline {
		Pipeline::new(self.blueprints(), self.policies())
	}
}

fn non_negative(what: &str, value: i64) -> ConstructResult<usize> {
	usize::try_from(value)
		.map_err(|_| ConstructError::InvalidArgument(format!("{what} must be non-negative, got {value}")))
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("scoped", &self.scoped.len())
			.field("custom", &self.custom.len())
			.field("substitutions", &self.type_map.len())
			.field("policies", &self.policies())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::blueprint::Built;
	use crate::context::ConstructionContext;
	use crate::descriptor::unpack;
	use rstest::rstest;

	fn first_match(registry: &Registry, context: &ConstructionContext) -> u32 {
		let pipeline = registry.pipeline();
		let built = pipeline.send(context).unwrap();
		*unpack::<u32>(built.into_value().unwrap()).unwrap()
	}

	#[rstest]
	#[case::zero(0, true)]
	#[case::positive(12, true)]
	#[case::negative(-1, false)]
	fn test_counts_must_be_non_negative(#[case] value: i64, #[case] accepted: bool) {
		// Arrange
		let mut registry = Registry::new();

		// Act
		let count = registry.enumerable_count(value).map(|_| ());
		let limit = registry.recursion_limit(value).map(|_| ());

		// Assert
		assert_eq!(count.is_ok(), accepted);
		assert_eq!(limit.is_ok(), accepted);
		if !accepted {
			assert!(matches!(count, Err(ConstructError::InvalidArgument(_))));
			assert!(matches!(limit, Err(ConstructError::InvalidArgument(_))));
			assert_eq!(registry.policies(), Policies::default());
		}
	}

	#[rstest]
	fn test_merge_only_overwrites_set_scalars() {
		// Arrange
		let mut base = Registry::new();
		base.use_modest_constructor()
			.throw_on_recursion(true)
			.recursion_limit(2)
			.unwrap();
		let mut other = Registry::new();
		other.enumerable_count(7).unwrap();

		// Act
		base.merge(other);

		// Assert
		let policies = base.policies();
		assert_eq!(policies.constructor, ConstructorStrategy::Modest);
		assert_eq!(policies.recursion_limit, 2);
		assert!(policies.throw_on_recursion);
		assert_eq!(policies.enumerable_count, 7);
	}

	#[rstest]
	fn test_merge_overwrites_set_flags() {
		let mut base = Registry::new();
		base.throw_on_recursion(true);
		let mut other = Registry::new();
		other.throw_on_recursion(false);

		base.merge(other);

		assert!(!base.policies().throw_on_recursion);
	}

	#[rstest]
	fn test_latest_scoped_instance_wins_over_custom_blueprints() {
		// Arrange
		let mut registry = Registry::new();
		registry
			.construct_type_using(|| 1u32)
			.use_instance(2u32)
			.use_instance(3u32)
			.construct_type_using(|| 4u32);

		// Act
		let value = first_match(&registry, &ConstructionContext::of::<u32>());

		// Assert
		assert_eq!(value, 3);
	}

	#[rstest]
	fn test_latest_custom_blueprint_wins() {
		let mut registry = Registry::new();
		registry.construct_type_using(|| 1u32);
		let mut other = Registry::new();
		other.construct_type_using(|| 2u32);

		registry.merge(other);

		assert_eq!(first_match(&registry, &ConstructionContext::of::<u32>()), 2);
	}

	#[rstest]
	fn test_blueprint_order_ends_with_defaults() {
		// Arrange
		let mut registry = Registry::new();
		registry.use_instance(5u8).omit_ids();
		let defaults = Registry::new().blueprints().len();

		// Act
		let blueprints = registry.blueprints();

		// Assert
		assert_eq!(blueprints.len(), defaults + 2);
		assert!(blueprints[0].name().ends_with("ScopedBlueprint"));
		assert!(blueprints[1].name().ends_with("OmitMemberBlueprint"));
		let omitted = blueprints[1]
			.construct(&ConstructionContext::of::<u32>(), &registry.pipeline())
			.unwrap();
		assert!(matches!(omitted, Built::Omitted));
	}
}
