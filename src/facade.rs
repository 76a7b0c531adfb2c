//! Top-level construction entry point

use crate::blueprint::Blueprint;
use crate::context::ConstructionContext;
use crate::descriptor::{Construct, ParameterInfo, TypeInfo, Value, unpack};
use crate::error::{ConstructError, ConstructResult};
use crate::pipeline::Pipeline;
use crate::registry::Registry;

/// Synthesizes fully populated values from a [`Registry`].
///
/// # Examples
///
/// ```
/// use construkt::{Construct, Construkt};
///
/// #[derive(Debug, Default, Construct)]
/// #[construct(default)]
/// struct Customer {
///     pub name: String,
///     pub visits: u32,
/// }
///
/// let construkt = Construkt::new();
/// let customer: Customer = construkt.construct().unwrap();
/// assert!(customer.name.starts_with("name-"));
/// assert_ne!(customer.visits, 0);
///
/// let customers: Vec<Customer> = construkt.construct_many_of(2).unwrap();
/// assert_eq!(customers.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Construkt {
	registry: Registry,
}

impl Construkt {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_registry(registry: Registry) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Constructs one `T`.
	///
	/// # Errors
	///
	/// Fails when any value in the graph cannot be constructed; no partially
	/// built value is returned.
	pub fn construct<T: Construct>(&self) -> ConstructResult<T> {
		let pipeline = self.registry.pipeline();
		construct_root(&pipeline, ConstructionContext::of::<T>())
	}

	/// Constructs one `T` and applies `hard_codes` to it.
	pub fn construct_with<T, F>(&self, hard_codes: F) -> ConstructResult<T>
	where
		T: Construct,
		F: FnOnce(&mut T),
	{
		let mut value = self.construct::<T>()?;
		hard_codes(&mut value);
		Ok(value)
	}

	/// Constructs a value of a type known only at runtime.
	pub fn construct_type(&self, ty: TypeInfo) -> ConstructResult<Value> {
		let pipeline = self.registry.pipeline();
		send_root(&pipeline, ConstructionContext::new(ty))
	}

	/// Constructs a value for one constructor parameter, honoring its name and
	/// annotations.
	pub fn construct_parameter(&self, parameter: ParameterInfo) -> ConstructResult<Value> {
		let pipeline = self.registry.pipeline();
		send_root(&pipeline, ConstructionContext::for_parameter(parameter))
	}

	/// Constructs as many values as the enumerable count policy specifies.
	pub fn construct_many<T: Construct>(&self) -> ConstructResult<Vec<T>> {
		let count = self.registry.policies().enumerable_count;
		self.many(count, |_| {})
	}

	/// Constructs exactly `count` values.
	///
	/// # Errors
	///
	/// Returns [`ConstructError::InvalidArgument`] if `count` is negative.
	pub fn construct_many_of<T: Construct>(&self, count: i64) -> ConstructResult<Vec<T>> {
		self.many(checked_count(count)?, |_| {})
	}

	/// Constructs exactly `count` values and applies `hard_codes` to each.
	pub fn construct_many_with<T, F>(&self, count: i64, hard_codes: F) -> ConstructResult<Vec<T>>
	where
		T: Construct,
		F: FnMut(&mut T),
	{
		self.many(checked_count(count)?, hard_codes)
	}

	fn many<T, F>(&self, count: usize, mut hard_codes: F) -> ConstructResult<Vec<T>>
	where
		T: Construct,
		F: FnMut(&mut T),
	{
		let pipeline = self.registry.pipeline();
		(0..count)
			.map(|_| {
				let mut value = construct_root::<T>(&pipeline, ConstructionContext::of::<T>())?;
				hard_codes(&mut value);
				Ok(value)
			})
			.collect()
	}

	/// Merges `registry` into the current configuration.
	pub fn apply(&mut self, registry: Registry) -> &mut Self {
		self.registry.merge(registry);
		self
	}

	pub fn apply_blueprint(&mut self, blueprint: impl Blueprint + 'static) -> &mut Self {
		self.registry.add_blueprint(blueprint);
		self
	}

	pub fn apply_blueprints<I>(&mut self, blueprints: I) -> &mut Self
	where
		I: IntoIterator<Item = std::sync::Arc<dyn Blueprint>>,
	{
		self.registry.add_blueprints(blueprints);
		self
	}

	/// Configures a fresh registry and merges it into the current one.
	///
	/// Nothing is applied when `configure` fails.
	pub fn configure<F>(&mut self, configure: F) -> ConstructResult<&mut Self>
	where
		F: FnOnce(&mut Registry) -> ConstructResult<()>,
	{
		let mut registry = Registry::new();
		configure(&mut registry)?;
		Ok(self.apply(registry))
	}
}

impl From<Registry> for Construkt {
	fn from(registry: Registry) -> Self {
		Self::with_registry(registry)
	}
}

fn checked_count(count: i64) -> ConstructResult<usize> {
	usize::try_from(count).map_err(|_| {
		ConstructError::InvalidArgument(format!("count must be non-negative, got {count}"))
	})
}

fn send_root(pipeline: &Pipeline, context: ConstructionContext) -> ConstructResult<Value> {
	let request = context.request();
	tracing::debug!(request = %request, "constructing");
	pipeline
		.send(&context)?
		.into_value()
		.ok_or_else(|| ConstructError::OmittedRoot {
			type_name: request.short_name(),
		})
}

fn construct_root<T: Construct>(pipeline: &Pipeline, context: ConstructionContext) -> ConstructResult<T> {
	let value = send_root(pipeline, context)?;
	Ok(*unpack::<T>(value)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Construct;
	use rstest::rstest;

	#[derive(Debug, Default, Construct)]
	#[construct(default)]
	struct Order {
		pub reference: String,
		pub quantity: u16,
	}

	#[rstest]
	fn test_construct_with_applies_hard_codes() {
		let order: Order = Construkt::new()
			.construct_with(|order: &mut Order| order.quantity = 1)
			.unwrap();

		assert_eq!(order.quantity, 1);
		assert!(order.reference.starts_with("reference-"));
	}

	#[rstest]
	fn test_construct_type_returns_erased_value() {
		let value = Construkt::new()
			.construct_type(TypeInfo::of::<Order>())
			.unwrap();

		assert!(value.downcast_ref::<Order>().is_some());
	}

	#[rstest]
	fn test_construct_parameter_uses_parameter_name() {
		// Arrange
		let parameter = ParameterInfo {
			name: "title",
			ty: TypeInfo::of::<String>(),
			annotations: Vec::new(),
		};

		// Act
		let value = Construkt::new().construct_parameter(parameter).unwrap();

		// Assert
		assert!(unpack::<String>(value).unwrap().starts_with("title-"));
	}

	#[rstest]
	fn test_construct_many_follows_policy() {
		// Arrange
		let mut construkt = Construkt::new();
		construkt
			.configure(|registry| registry.enumerable_count(4).map(|_| ()))
			.unwrap();

		// Act
		let orders: Vec<Order> = construkt.construct_many().unwrap();
		let fixed: Vec<Order> = construkt
			.construct_many_with(2, |order: &mut Order| order.quantity = 7)
			.unwrap();

		// Assert
		assert_eq!(orders.len(), 4);
		assert_eq!(fixed.len(), 2);
		assert!(fixed.iter().all(|order| order.quantity == 7));
	}

	#[rstest]
	fn test_failed_configuration_is_not_applied() {
		let mut construkt = Construkt::new();

		let result = construkt.configure(|registry| {
			registry.use_modest_constructor();
			registry.recursion_limit(-1).map(|_| ())
		});

		assert!(matches!(result, Err(ConstructError::InvalidArgument(_))));
		assert_eq!(construkt.registry().policies(), crate::Policies::default());
	}

	struct OmitBytes;

	impl Blueprint for OmitBytes {
		fn matches(&self, context: &ConstructionContext) -> bool {
			context.request().is::<u8>()
		}

		fn construct(
			&self,
			_context: &ConstructionContext,
			_pipeline: &Pipeline,
		) -> ConstructResult<crate::Built> {
			Ok(crate::Built::Omitted)
		}
	}

	#[rstest]
	fn test_omitted_root_is_an_error() {
		// Arrange
		let mut construkt = Construkt::new();
		construkt.apply_blueprint(OmitBytes);

		// Act
		let result = construkt.construct::<u8>();

		// Assert
		assert!(matches!(
			result,
			Err(ConstructError::OmittedRoot { type_name }) if type_name == "u8"
		));
	}
}
