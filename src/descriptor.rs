//! Type descriptors
//!
//! Rust has no runtime reflection, so every constructible type describes itself
//! through the [`Construct`] trait. A [`TypeDescriptor`] lists what the pipeline
//! needs to build a value: the constructors and members of an object, the
//! element type of a sequence, the inner type of a wrapper, or nothing at all
//! for leaf and abstract types.
//!
//! Descriptors are usually generated with `#[derive(Construct)]`; the builder
//! types in this module are public so they can also be written by hand.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{ConstructError, ConstructResult};

/// A type-erased constructed value.
pub type Value = Box<dyn Any>;

/// Types that can be synthesized by the pipeline.
///
/// `Self` may be unsized: trait objects declared with [`abstraction!`](crate::abstraction)
/// implement this trait so that `Box<dyn Trait>` and `Arc<dyn Trait>` resolve
/// through substitutions.
pub trait Construct: 'static {
	/// Describes how values of this type are built.
	fn describe() -> TypeDescriptor;

	/// Recovers an owned value from its type-erased form.
	fn from_value(value: Value) -> Option<Box<Self>>;

	/// Erases an owned value.
	fn into_value(boxed: Box<Self>) -> Value;
}

/// Conversion of an implementation into an abstract contract type.
///
/// Substitutions registered with [`Registry::register`](crate::Registry::register)
/// use this to turn the constructed implementation into the contract.
pub trait Upcast<I>: Construct {
	/// Converts the implementation into the contract.
	fn upcast(implementation: I) -> Box<Self>;
}

/// Recovers a concrete value of type `T` from a type-erased value.
pub fn unpack<T: ?Sized + Construct>(value: Value) -> ConstructResult<Box<T>> {
	T::from_value(value).ok_or_else(ConstructError::type_mismatch::<T>)
}

/// Lightweight handle identifying a constructible type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
	id: TypeId,
	name: &'static str,
	describe: fn() -> TypeDescriptor,
}

impl TypeInfo {
	/// Returns the handle for `T`.
	///
	/// # Examples
	///
	/// ```
	/// use construkt::TypeInfo;
	///
	/// let info = TypeInfo::of::<Vec<u32>>();
	/// assert!(info.is::<Vec<u32>>());
	/// assert_eq!(info.short_name(), "Vec<u32>");
	/// ```
	pub fn of<T: ?Sized + Construct>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
			describe: T::describe,
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Fully qualified type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Type name with every module path stripped.
	pub fn short_name(&self) -> String {
		let mut out = String::with_capacity(self.name.len());
		let mut segment = String::new();
		for ch in self.name.chars() {
			if ch.is_alphanumeric() || ch == '_' || ch == ':' {
				segment.push(ch);
				continue;
			}
			out.push_str(last_path_segment(&segment));
			segment.clear();
			out.push(ch);
		}
		out.push_str(last_path_segment(&segment));
		out
	}

	/// Builds the descriptor of this type.
	pub fn describe(&self) -> TypeDescriptor {
		(self.describe)()
	}

	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.id == TypeId::of::<T>()
	}
}

fn last_path_segment(segment: &str) -> &str {
	segment.rsplit("::").next().unwrap_or(segment)
}

impl PartialEq for TypeInfo {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl fmt::Display for TypeInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.short_name())
	}
}

/// Structural description of one type.
pub struct TypeDescriptor {
	shape: Shape,
	placeholder: fn() -> Option<Value>,
}

impl TypeDescriptor {
	/// Creates a descriptor without a placeholder value.
	pub fn new(shape: Shape) -> Self {
		Self {
			shape,
			placeholder: no_placeholder,
		}
	}

	/// Sets the function producing the default-for-type value used when a
	/// constructor parameter of this type is omitted.
	pub fn with_placeholder(mut self, placeholder: fn() -> Option<Value>) -> Self {
		self.placeholder = placeholder;
		self
	}

	pub fn shape(&self) -> &Shape {
		&self.shape
	}

	pub fn into_shape(self) -> Shape {
		self.shape
	}

	pub fn placeholder(&self) -> Option<Value> {
		(self.placeholder)()
	}

	pub fn is_abstract(&self) -> bool {
		matches!(self.shape, Shape::Abstract)
	}
}

impl fmt::Debug for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDescriptor")
			.field("shape", &self.shape)
			.finish_non_exhaustive()
	}
}

fn no_placeholder() -> Option<Value> {
	None
}

/// Placeholder function for types implementing [`Default`].
pub fn default_placeholder<T: Default + Any>() -> Option<Value> {
	Some(Box::new(T::default()))
}

/// The category of a type, which decides the blueprint that builds it.
#[derive(Debug)]
pub enum Shape {
	/// Primitive or well-known value generated by a leaf blueprint.
	Leaf,
	/// Built from a constructor and settable members.
	Object(ObjectShape),
	/// Sequence or array of independently built elements.
	Sequence(SequenceShape),
	/// Transparent wrapper around another type (`Option`, `Box`, `Arc`, `Rc`).
	Wrapper(WrapperShape),
	/// One of a fixed set of unit variants.
	Choice(ChoiceShape),
	/// Trait object that can only be built through a substitution.
	Abstract,
}

/// Constructors and members of an object type.
#[derive(Debug, Default)]
pub struct ObjectShape {
	pub constructors: Vec<Constructor>,
	pub members: Vec<MemberInfo>,
}

impl ObjectShape {
	pub fn public_constructors(&self) -> impl Iterator<Item = &Constructor> {
		self.constructors
			.iter()
			.filter(|constructor| constructor.visibility == Visibility::Public)
	}
}

/// Element type of a sequence and how to assemble it.
pub struct SequenceShape {
	pub element: TypeInfo,
	/// Exact length for fixed-size arrays; `None` for growable collections.
	pub fixed_len: Option<usize>,
	pub collect: fn(Vec<Value>) -> ConstructResult<Value>,
}

impl SequenceShape {
	/// Growable collections are omitted when encountered as members.
	pub fn is_growable(&self) -> bool {
		self.fixed_len.is_none()
	}
}

impl fmt::Debug for SequenceShape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SequenceShape")
			.field("element", &self.element)
			.field("fixed_len", &self.fixed_len)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
	Optional,
	Pointer,
}

/// Inner type of a wrapper and how to wrap a constructed inner value.
pub struct WrapperShape {
	pub kind: WrapperKind,
	pub inner: TypeInfo,
	pub wrap: fn(Value) -> ConstructResult<Value>,
}

impl fmt::Debug for WrapperShape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WrapperShape")
			.field("kind", &self.kind)
			.field("inner", &self.inner)
			.finish_non_exhaustive()
	}
}

/// Variants of a field-less enum.
pub struct ChoiceShape {
	pub variants: usize,
	pub select: fn(usize) -> Value,
}

impl fmt::Debug for ChoiceShape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChoiceShape")
			.field("variants", &self.variants)
			.finish_non_exhaustive()
	}
}

/// Accessibility of a constructor or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
	Public,
	Restricted,
}

/// A constructor of an object type.
pub struct Constructor {
	pub name: &'static str,
	pub visibility: Visibility,
	pub parameters: Vec<ParameterInfo>,
	/// Receives one argument per parameter, in declaration order.
	pub invoke: fn(Vec<Value>) -> ConstructResult<Value>,
}

impl Constructor {
	pub fn arity(&self) -> usize {
		self.parameters.len()
	}

	/// Whether a parameter fills the same slot as `member`.
	pub fn satisfies(&self, member: &MemberInfo) -> bool {
		self.parameters
			.iter()
			.any(|parameter| parameter.name == member.name && parameter.ty == member.ty)
	}
}

impl fmt::Debug for Constructor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Constructor")
			.field("name", &self.name)
			.field("visibility", &self.visibility)
			.field("parameters", &self.parameters)
			.finish_non_exhaustive()
	}
}

/// A constructor parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
	pub name: &'static str,
	pub ty: TypeInfo,
	pub annotations: Vec<Annotation>,
}

impl ParameterInfo {
	pub fn annotation<A: Any>(&self) -> Option<&A> {
		find_annotation(&self.annotations)
	}
}

/// A settable member (field) of an object type.
#[derive(Clone)]
pub struct MemberInfo {
	pub name: &'static str,
	pub ty: TypeInfo,
	pub visibility: Visibility,
	pub annotations: Vec<Annotation>,
	/// Stores a constructed value into the member of the target object.
	pub assign: fn(&mut dyn Any, Value) -> ConstructResult<()>,
}

impl MemberInfo {
	pub fn annotation<A: Any>(&self) -> Option<&A> {
		find_annotation(&self.annotations)
	}
}

impl fmt::Debug for MemberInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemberInfo")
			.field("name", &self.name)
			.field("ty", &self.ty)
			.field("visibility", &self.visibility)
			.field("annotations", &self.annotations)
			.finish_non_exhaustive()
	}
}

/// Metadata value attached to a parameter or member.
#[derive(Clone)]
pub struct Annotation(Arc<dyn Any + Send + Sync>);

impl Annotation {
	pub fn new<A: Any + Send + Sync>(annotation: A) -> Self {
		Self(Arc::new(annotation))
	}

	pub fn downcast_ref<A: Any>(&self) -> Option<&A> {
		(*self.0).downcast_ref::<A>()
	}
}

impl fmt::Debug for Annotation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Annotation(..)")
	}
}

fn find_annotation<A: Any>(annotations: &[Annotation]) -> Option<&A> {
	annotations
		.iter()
		.find_map(|annotation| annotation.downcast_ref::<A>())
}

/// Declares a trait object as an abstract type.
///
/// The trait object gets a [`Construct`] implementation with an abstract shape,
/// and every implementor of the trait can be registered as its substitution.
///
/// # Example
///
/// ```
/// use construkt::{Construkt, Registry, abstraction};
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default, construkt::Construct)]
/// #[construct(default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// abstraction!(dyn Greeter);
///
/// let mut registry = Registry::new();
/// registry.register::<dyn Greeter, English>();
///
/// let greeter: Box<dyn Greeter> = Construkt::with_registry(registry).construct().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[macro_export]
macro_rules! abstraction {
	(dyn $contract:path) => {
		impl $crate::Construct for dyn $contract {
			fn describe() -> $crate::TypeDescriptor {
				$crate::TypeDescriptor::new($crate::Shape::Abstract)
			}

			fn from_value(
				value: $crate::Value,
			) -> ::std::option::Option<::std::boxed::Box<Self>> {
				value
					.downcast::<::std::boxed::Box<dyn $contract>>()
					.ok()
					.map(|boxed| *boxed)
			}

			fn into_value(boxed: ::std::boxed::Box<Self>) -> $crate::Value {
				::std::boxed::Box::new(boxed)
			}
		}

		impl<T: $contract + 'static> $crate::Upcast<T> for dyn $contract {
			fn upcast(implementation: T) -> ::std::boxed::Box<Self> {
				::std::boxed::Box::new(implementation)
			}
		}
	};
}
