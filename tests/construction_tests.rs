//! Graph construction tests
//!
//! These tests verify that:
//! 1. Every settable member of a constructed graph receives a non-default value
//! 2. Constructor parameters and members are resolved recursively
//! 3. Collection members are left unset while collection parameters are built
//! 4. Types without a usable constructor fail with a descriptive error

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use construkt::{Construct, ConstructError, Construkt, Registry, TypeInfo};
use rstest::rstest;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Construct)]
enum Status {
	Active,
	Suspended,
	Closed,
}

#[derive(Debug, Default, Construct)]
#[construct(default)]
struct Address {
	pub street: String,
	pub number: u16,
}

#[derive(Debug, Construct)]
#[construct(constructor = "pub fn new(id: Uuid, address: Address) -> Self")]
struct Customer {
	pub id: Uuid,
	pub name: String,
	pub address: Address,
	pub nickname: Option<String>,
	pub status: Status,
	pub balance: f64,
	pub scores: [u8; 2],
	pub orders: Vec<String>,
	pub since: DateTime<Utc>,
	pub birthday: NaiveDate,
	pub session: Duration,
	pub verified: bool,
	notes: String,
}

impl Customer {
	fn new(id: Uuid, address: Address) -> Self {
		Self {
			id,
			name: String::new(),
			address,
			nickname: None,
			status: Status::Active,
			balance: 0.0,
			scores: [0; 2],
			orders: Vec::new(),
			since: DateTime::<Utc>::default(),
			birthday: NaiveDate::default(),
			session: Duration::ZERO,
			verified: false,
			notes: String::new(),
		}
	}
}

#[derive(Debug, Construct)]
#[construct(constructor = "pub fn new(lines: Vec<u32>) -> Self")]
struct Invoice {
	pub lines: Vec<u32>,
}

impl Invoice {
	fn new(lines: Vec<u32>) -> Self {
		Self { lines }
	}
}

#[derive(Debug, Construct)]
#[construct(constructor = "pub(crate) fn internal() -> Self")]
struct Sealed {
	pub value: u32,
}

impl Sealed {
	fn internal() -> Self {
		Self { value: 0 }
	}
}

#[derive(Debug, Construct)]
struct Unbuildable {
	pub value: u32,
}

#[derive(Debug, Construct)]
struct Marker;

#[rstest]
fn test_members_are_populated_with_non_default_values() {
	// Act
	let customer: Customer = Construkt::new().construct().unwrap();

	// Assert
	assert_ne!(customer.id, Uuid::nil());
	assert!(customer.name.starts_with("name-"));
	assert!(customer.address.street.starts_with("street-"));
	assert_ne!(customer.address.number, 0);
	assert!(customer.nickname.is_some_and(|nickname| nickname.starts_with("nickname-")));
	assert_ne!(customer.balance, 0.0);
	assert!(customer.scores.iter().all(|score| *score != 0));
	assert_ne!(customer.session, Duration::ZERO);
	assert_ne!(customer.birthday, NaiveDate::default());
	// restricted members are left alone by default
	assert!(customer.notes.is_empty());
}

#[rstest]
fn test_collection_members_are_left_unset() {
	let customer: Customer = Construkt::new().construct().unwrap();

	assert!(customer.orders.is_empty());
}

#[rstest]
fn test_collection_parameters_are_built() {
	let invoice: Invoice = Construkt::new().construct().unwrap();

	assert_eq!(invoice.lines.len(), 3);
}

#[rstest]
fn test_custom_blueprint_overrides_collection_member_omission() {
	// Arrange
	let mut registry = Registry::new();
	registry.construct_type_using(|| vec!["first".to_string()]);

	// Act
	let customer: Customer = Construkt::with_registry(registry).construct().unwrap();

	// Assert
	assert_eq!(customer.orders, vec!["first".to_string()]);
}

#[rstest]
fn test_restricted_members_are_built_when_enabled() {
	// Arrange
	let mut registry = Registry::new();
	registry.construct_private_members();

	// Act
	let customer: Customer = Construkt::with_registry(registry).construct().unwrap();

	// Assert
	assert!(customer.notes.starts_with("notes-"));
}

#[rstest]
fn test_choice_picks_every_variant_eventually() {
	// Act
	let statuses: Vec<Status> = Construkt::new().construct_many_of(200).unwrap();

	// Assert
	let distinct: HashSet<Status> = statuses.into_iter().collect();
	assert!(distinct.len() > 1);
}

#[rstest]
fn test_unit_struct_is_constructible() {
	let marker: Marker = Construkt::new().construct().unwrap();

	assert!(matches!(marker, Marker));
}

#[rstest]
#[case::restricted_constructor(TypeInfo::of::<Sealed>(), "Sealed")]
#[case::no_constructor(TypeInfo::of::<Unbuildable>(), "Unbuildable")]
fn test_type_without_public_constructor_fails(#[case] ty: TypeInfo, #[case] expected: &str) {
	// Act
	let result = Construkt::new().construct_type(ty);

	// Assert
	match result {
		Err(ConstructError::NoMatchingStrategy { type_name }) => assert_eq!(type_name, expected),
		other => panic!("expected NoMatchingStrategy, got {:?}", other.map(|_| ())),
	}
}

#[rstest]
fn test_failure_deep_in_graph_aborts_construction() {
	// Arrange
	#[derive(Debug, Default, Construct)]
	#[construct(default)]
	struct Holder {
		pub inner: Option<Sealed>,
	}

	// Act
	let result = Construkt::new().construct::<Holder>();

	// Assert
	assert!(matches!(result, Err(ConstructError::NoMatchingStrategy { .. })));
}
