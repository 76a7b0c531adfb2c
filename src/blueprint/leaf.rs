//! Leaf blueprints for primitive and well-known types

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use fake::Fake;
use rand::Rng;
use rand::distributions::Alphanumeric;
use uuid::Uuid;

use super::{Blueprint, Built};
use crate::context::ConstructionContext;
use crate::descriptor::Shape;
use crate::error::ConstructResult;
use crate::pipeline::Pipeline;

/// Generates values of exactly one type.
pub struct LeafBlueprint<T> {
	generate: fn(&ConstructionContext) -> T,
}

impl<T: Any> LeafBlueprint<T> {
	pub fn new(generate: fn(&ConstructionContext) -> T) -> Self {
		Self { generate }
	}
}

impl<T: Any> Blueprint for LeafBlueprint<T> {
	fn matches(&self, context: &ConstructionContext) -> bool {
		context.request().is::<T>()
	}

	fn construct(&self, context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		Ok(Built::of((self.generate)(context)))
	}
}

/// `"<slot name>-<n>"` when filling a named parameter or member, `"String-<n>"` otherwise.
fn string(context: &ConstructionContext) -> String {
	let suffix: u32 = rand::thread_rng().gen_range(1..10_000);
	match context.slot_name() {
		Some(name) => format!("{name}-{suffix}"),
		None => format!("String-{suffix}"),
	}
}

fn character(_: &ConstructionContext) -> char {
	rand::thread_rng().sample(Alphanumeric) as char
}

fn boolean(_: &ConstructionContext) -> bool {
	rand::thread_rng().gen_bool(0.5)
}

fn uuid(_: &ConstructionContext) -> Uuid {
	Uuid::new_v4()
}

fn duration(_: &ConstructionContext) -> Duration {
	Duration::from_secs(rand::thread_rng().gen_range(1..=86_400))
}

fn date_time(_: &ConstructionContext) -> DateTime<Utc> {
	fake::faker::chrono::en::DateTime().fake()
}

fn date(_: &ConstructionContext) -> NaiveDate {
	fake::faker::chrono::en::Date().fake()
}

macro_rules! numbers {
	($blueprints:ident; $($ty:ty => $range:expr),* $(,)?) => {
		$(
			$blueprints.push(Arc::new(LeafBlueprint::<$ty>::new(|_| {
				rand::thread_rng().gen_range($range)
			})));
		)*
	};
}

/// Blueprints for every leaf type with a built-in `Construct` implementation.
///
/// Numbers are never zero and strings never empty.
pub fn leaf_blueprints() -> Vec<Arc<dyn Blueprint>> {
	let mut blueprints: Vec<Arc<dyn Blueprint>> = vec![
		Arc::new(LeafBlueprint::<String>::new(string)),
		Arc::new(LeafBlueprint::<char>::new(character)),
		Arc::new(LeafBlueprint::<bool>::new(boolean)),
		Arc::new(LeafBlueprint::<Uuid>::new(uuid)),
		Arc::new(LeafBlueprint::<Duration>::new(duration)),
		Arc::new(LeafBlueprint::<DateTime<Utc>>::new(date_time)),
		Arc::new(LeafBlueprint::<NaiveDate>::new(date)),
	];
	numbers!(blueprints;
		i8 => 1..=100,
		u8 => 1..=200,
		i16 => 1..=10_000,
		u16 => 1..=10_000,
		i32 => 1..=10_000,
		u32 => 1..=10_000,
		i64 => 1..=10_000,
		u64 => 1..=10_000,
		i128 => 1..=10_000,
		u128 => 1..=10_000,
		isize => 1..=10_000,
		usize => 1..=10_000,
		f32 => 1.0..10_000.0,
		f64 => 1.0..10_000.0,
	);
	blueprints
}

/// Picks a random variant of a field-less enum.
pub struct ChoiceBlueprint;

impl Blueprint for ChoiceBlueprint {
	fn matches(&self, context: &ConstructionContext) -> bool {
		matches!(context.descriptor().shape(), Shape::Choice(choice) if choice.variants > 0)
	}

	fn construct(&self, context: &ConstructionContext, _pipeline: &Pipeline) -> ConstructResult<Built> {
		let Shape::Choice(choice) = context.descriptor().into_shape() else {
			return Ok(Built::Omitted);
		};
		let index = rand::thread_rng().gen_range(0..choice.variants);
		Ok(Built::Value((choice.select)(index)))
	}
}
