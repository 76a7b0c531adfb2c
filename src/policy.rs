//! Scalar construction policies

use serde::Deserialize;

use crate::descriptor::{Constructor, MemberInfo, Visibility};

/// Default number of elements in a constructed collection.
pub const DEFAULT_ENUMERABLE_COUNT: usize = 3;

/// Default number of times a type may reappear on one construction path.
pub const DEFAULT_RECURSION_LIMIT: usize = 0;

/// Which public constructor the object builder invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructorStrategy {
	/// The constructor with the most parameters.
	#[default]
	Greedy,
	/// The constructor with the fewest parameters.
	Modest,
}

impl ConstructorStrategy {
	/// Selects among the public constructors; ties go to the first declared.
	pub fn select<'a>(&self, constructors: &'a [Constructor]) -> Option<&'a Constructor> {
		let mut selected: Option<&Constructor> = None;
		for constructor in constructors
			.iter()
			.filter(|constructor| constructor.visibility == Visibility::Public)
		{
			let better = match selected {
				None => true,
				Some(current) => match self {
					ConstructorStrategy::Greedy => constructor.arity() > current.arity(),
					ConstructorStrategy::Modest => constructor.arity() < current.arity(),
				},
			};
			if better {
				selected = Some(constructor);
			}
		}
		selected
	}
}

/// Which members the object builder populates after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MemberStrategy {
	/// Only publicly settable members.
	#[default]
	#[serde(rename = "public")]
	PublicOnly,
	/// Every settable member, including restricted ones.
	#[serde(rename = "all")]
	All,
}

impl MemberStrategy {
	pub fn select(self, members: &[MemberInfo]) -> impl Iterator<Item = &MemberInfo> {
		members.iter().filter(move |member| match self {
			MemberStrategy::PublicOnly => member.visibility == Visibility::Public,
			MemberStrategy::All => true,
		})
	}
}

/// Effective policy values for one top-level construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policies {
	pub constructor: ConstructorStrategy,
	pub members: MemberStrategy,
	pub enumerable_count: usize,
	pub recursion_limit: usize,
	pub throw_on_recursion: bool,
}

impl Default for Policies {
	fn default() -> Self {
		Self {
			constructor: ConstructorStrategy::default(),
			members: MemberStrategy::default(),
			enumerable_count: DEFAULT_ENUMERABLE_COUNT,
			recursion_limit: DEFAULT_RECURSION_LIMIT,
			throw_on_recursion: false,
		}
	}
}
