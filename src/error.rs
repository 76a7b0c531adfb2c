//! Error types for object-graph construction.
//!
//! Every error is fatal to the enclosing top-level construction: a failure in a
//! nested request propagates through all recursive frames and no partially
//! built graph is returned. Omission is not an error and never surfaces here.

use thiserror::Error;

/// Errors that can occur while configuring or running a construction.
#[derive(Debug, Error)]
pub enum ConstructError {
	/// A caller supplied an invalid configuration value, such as a negative count.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// An abstract type was requested without a substitution or scoped instance.
	#[error(
		"Cannot construct the abstraction {type_name}. Register a substitution or a scoped instance for it."
	)]
	UnregisteredAbstraction {
		/// Name of the abstract type
		type_name: String,
	},

	/// A type re-entered its own construction more often than the recursion limit allows.
	#[error("Recursion limit exceeded while constructing {type_name}\n  Path: {path}")]
	RecursionLimitExceeded {
		/// Name of the recursive type
		type_name: String,
		/// Construction path (format: A -> B -> A)
		path: String,
	},

	/// No blueprint in the pipeline accepted the request.
	#[error("No blueprint can construct {type_name}")]
	NoMatchingStrategy {
		/// Name of the unresolved type
		type_name: String,
	},

	/// A blueprint produced a value of a different type than the one requested.
	#[error("Constructed value is not of the expected type {expected}")]
	TypeMismatch {
		/// Name of the expected type
		expected: String,
	},

	/// A constructor parameter was omitted and its type has no placeholder value.
	#[error("Parameter `{parameter}` of type {type_name} was omitted and has no placeholder value")]
	Unfillable {
		/// Parameter name
		parameter: String,
		/// Declared parameter type
		type_name: String,
	},

	/// A blueprint omitted the value requested at the top level.
	#[error("The requested value of type {type_name} was omitted")]
	OmittedRoot {
		/// Name of the requested type
		type_name: String,
	},

	/// Declarative policy settings could not be loaded.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl ConstructError {
	/// Creates a [`ConstructError::TypeMismatch`] for the type `T`.
	pub fn type_mismatch<T: ?Sized>() -> Self {
		Self::TypeMismatch {
			expected: std::any::type_name::<T>().to_string(),
		}
	}
}

/// Result type alias for construction operations.
pub type ConstructResult<T> = Result<T, ConstructError>;
