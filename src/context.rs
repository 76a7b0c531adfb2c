//! Construction context for one request

use crate::descriptor::{Construct, MemberInfo, ParameterInfo, TypeDescriptor, TypeInfo};

/// The slot a requested value will fill.
#[derive(Debug, Clone)]
pub enum Origin {
	Parameter(ParameterInfo),
	Member(MemberInfo),
}

impl Origin {
	pub fn name(&self) -> &'static str {
		match self {
			Origin::Parameter(parameter) => parameter.name,
			Origin::Member(member) => member.name,
		}
	}

	/// Declared type of the slot.
	pub fn declared_type(&self) -> TypeInfo {
		match self {
			Origin::Parameter(parameter) => parameter.ty,
			Origin::Member(member) => member.ty,
		}
	}
}

/// Immutable description of one construction request.
///
/// The ancestry lists the object types under construction on the current call
/// path, ending with the immediate parent. Descending creates a new context
/// with an extended ancestry; sibling requests never observe each other.
#[derive(Debug, Clone)]
pub struct ConstructionContext {
	request: TypeInfo,
	origin: Option<Origin>,
	ancestry: Vec<TypeInfo>,
}

impl ConstructionContext {
	/// Creates a root context for `request`.
	pub fn new(request: TypeInfo) -> Self {
		Self {
			request,
			origin: None,
			ancestry: Vec::new(),
		}
	}

	pub fn of<T: ?Sized + Construct>() -> Self {
		Self::new(TypeInfo::of::<T>())
	}

	/// Creates a root context filling a single constructor parameter.
	pub fn for_parameter(parameter: ParameterInfo) -> Self {
		Self {
			request: parameter.ty,
			origin: Some(Origin::Parameter(parameter)),
			ancestry: Vec::new(),
		}
	}

	pub fn request(&self) -> TypeInfo {
		self.request
	}

	pub fn descriptor(&self) -> TypeDescriptor {
		self.request.describe()
	}

	pub fn origin(&self) -> Option<&Origin> {
		self.origin.as_ref()
	}

	/// The member being filled, when the request is for its declared type.
	pub fn member(&self) -> Option<&MemberInfo> {
		match &self.origin {
			Some(Origin::Member(member)) if member.ty == self.request => Some(member),
			_ => None,
		}
	}

	/// The parameter being filled, when the request is for its declared type.
	pub fn parameter(&self) -> Option<&ParameterInfo> {
		match &self.origin {
			Some(Origin::Parameter(parameter)) if parameter.ty == self.request => Some(parameter),
			_ => None,
		}
	}

	/// Whether the request fills a member, at any wrapper depth.
	pub fn fills_member(&self) -> bool {
		matches!(self.origin, Some(Origin::Member(_)))
	}

	/// Name of the parameter or member being filled, at any wrapper depth.
	pub fn slot_name(&self) -> Option<&'static str> {
		self.origin.as_ref().map(Origin::name)
	}

	pub fn ancestry(&self) -> &[TypeInfo] {
		&self.ancestry
	}

	pub fn depth(&self) -> usize {
		self.ancestry.len()
	}

	/// Number of times `ty` is already under construction on this path.
	pub fn occurrences(&self, ty: TypeInfo) -> usize {
		self.ancestry.iter().filter(|ancestor| **ancestor == ty).count()
	}

	/// Construction path from the root to this request (format: A -> B -> A).
	pub fn path(&self) -> String {
		self.ancestry
			.iter()
			.chain(std::iter::once(&self.request))
			.map(TypeInfo::short_name)
			.collect::<Vec<_>>()
			.join(" -> ")
	}

	/// Requests a dependency of the current type, which becomes its parent.
	pub fn descend(&self, request: TypeInfo, origin: Option<Origin>) -> Self {
		let mut ancestry = Vec::with_capacity(self.ancestry.len() + 1);
		ancestry.extend_from_slice(&self.ancestry);
		ancestry.push(self.request);
		Self {
			request,
			origin,
			ancestry,
		}
	}

	/// Requests another type for the same slot (wrappers and substitutions).
	pub fn redirect(&self, request: TypeInfo) -> Self {
		Self {
			request,
			origin: self.origin.clone(),
			ancestry: self.ancestry.clone(),
		}
	}

	/// Requests one element of a collection.
	pub fn element(&self, request: TypeInfo) -> Self {
		Self {
			request,
			origin: None,
			ancestry: self.ancestry.clone(),
		}
	}
}
