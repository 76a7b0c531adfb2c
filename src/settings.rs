//! Declarative policy settings
//!
//! Scalar policies can be kept in a TOML document instead of being set in
//! code:
//!
//! ```toml
//! constructor = "modest"
//! members = "all"
//! enumerable_count = 5
//! recursion_limit = 1
//! throw_on_recursion = true
//! ```
//!
//! Every key is optional; unset keys leave the registry untouched.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConstructError, ConstructResult};
use crate::policy::{ConstructorStrategy, MemberStrategy};
use crate::registry::Registry;

/// Scalar policy values loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySettings {
	#[serde(default)]
	pub constructor: Option<ConstructorStrategy>,
	#[serde(default)]
	pub members: Option<MemberStrategy>,
	#[serde(default)]
	pub enumerable_count: Option<i64>,
	#[serde(default)]
	pub recursion_limit: Option<i64>,
	#[serde(default)]
	pub throw_on_recursion: Option<bool>,
}

impl PolicySettings {
	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns [`ConstructError::Configuration`] if the file cannot be read or parsed.
	pub fn from_file(path: impl AsRef<Path>) -> ConstructResult<Self> {
		let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
			ConstructError::Configuration(format!("{}: {}", path.as_ref().display(), e))
		})?;

		Self::from_toml_str(&content)
	}

	/// Parse settings from a TOML string.
	pub fn from_toml_str(content: &str) -> ConstructResult<Self> {
		toml::from_str(content).map_err(|e| ConstructError::Configuration(e.to_string()))
	}

	/// Applies every set value to `registry`.
	///
	/// # Errors
	///
	/// Returns [`ConstructError::InvalidArgument`] for negative counts; the
	/// registry is left unchanged in that case.
	pub fn apply_to(&self, registry: &mut Registry) -> ConstructResult<()> {
		let mut updated = registry.clone();
		match self.constructor {
			Some(ConstructorStrategy::Greedy) => {
				updated.use_greedy_constructor();
			}
			Some(ConstructorStrategy::Modest) => {
				updated.use_modest_constructor();
			}
			None => {}
		}
		match self.members {
			Some(MemberStrategy::PublicOnly) => {
				updated.omit_private_members();
			}
			Some(MemberStrategy::All) => {
				updated.construct_private_members();
			}
			None => {}
		}
		if let Some(count) = self.enumerable_count {
			updated.enumerable_count(count)?;
		}
		if let Some(limit) = self.recursion_limit {
			updated.recursion_limit(limit)?;
		}
		if let Some(throw) = self.throw_on_recursion {
			updated.throw_on_recursion(throw);
		}
		*registry = updated;
		Ok(())
	}
}

impl Registry {
	/// Creates a registry configured from `settings`.
	pub fn from_settings(settings: &PolicySettings) -> ConstructResult<Self> {
		let mut registry = Registry::new();
		settings.apply_to(&mut registry)?;
		Ok(registry)
	}
}
