//! `Construct` implementations for standard and well-known types.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::descriptor::{
	Construct, SequenceShape, Shape, TypeDescriptor, TypeInfo, Value, WrapperKind, WrapperShape,
	default_placeholder, unpack,
};
use crate::error::{ConstructError, ConstructResult};

macro_rules! sized_conversions {
	() => {
		fn from_value(value: Value) -> Option<Box<Self>> {
			value.downcast::<Self>().ok()
		}

		fn into_value(boxed: Box<Self>) -> Value {
			boxed
		}
	};
}

macro_rules! leaf {
	($($ty:ty),* $(,)?) => {
		$(
			impl Construct for $ty {
				fn describe() -> TypeDescriptor {
					TypeDescriptor::new(Shape::Leaf).with_placeholder(default_placeholder::<$ty>)
				}

				sized_conversions!();
			}
		)*
	};
}

leaf!(
	bool,
	char,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	f32,
	f64,
	String,
	Uuid,
	Duration,
	DateTime<Utc>,
	NaiveDate,
);

impl<T: Construct> Construct for Option<T> {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::new(Shape::Wrapper(WrapperShape {
			kind: WrapperKind::Optional,
			inner: TypeInfo::of::<T>(),
			wrap: wrap_option::<T>,
		}))
		.with_placeholder(|| Some(Box::new(None::<T>)))
	}

	sized_conversions!();
}

fn wrap_option<T: Construct>(value: Value) -> ConstructResult<Value> {
	let inner = unpack::<T>(value)?;
	Ok(Box::new(Some(*inner)))
}

macro_rules! pointer {
	($pointer:ident, $wrap:ident, $placeholder:ident) => {
		impl<T: ?Sized + Construct> Construct for $pointer<T> {
			fn describe() -> TypeDescriptor {
				TypeDescriptor::new(Shape::Wrapper(WrapperShape {
					kind: WrapperKind::Pointer,
					inner: TypeInfo::of::<T>(),
					wrap: $wrap::<T>,
				}))
				.with_placeholder($placeholder::<T>)
			}

			sized_conversions!();
		}

		fn $wrap<T: ?Sized + Construct>(value: Value) -> ConstructResult<Value> {
			let inner = unpack::<T>(value)?;
			Ok(Box::new($pointer::<T>::from(inner)))
		}

		fn $placeholder<T: ?Sized + Construct>() -> Option<Value> {
			let inner = T::describe().placeholder()?;
			let inner = T::from_value(inner)?;
			Some(Box::new($pointer::<T>::from(inner)))
		}
	};
}

pointer!(Box, wrap_box, box_placeholder);
pointer!(Arc, wrap_arc, arc_placeholder);
pointer!(Rc, wrap_rc, rc_placeholder);

macro_rules! sequence {
	($collection:ident<T $(: $($bound:path),+)?>, $collect:ident) => {
		impl<T: Construct $($(+ $bound)+)?> Construct for $collection<T> {
			fn describe() -> TypeDescriptor {
				TypeDescriptor::new(Shape::Sequence(SequenceShape {
					element: TypeInfo::of::<T>(),
					fixed_len: None,
					collect: $collect::<T>,
				}))
				.with_placeholder(default_placeholder::<$collection<T>>)
			}

			sized_conversions!();
		}

		fn $collect<T: Construct $($(+ $bound)+)?>(elements: Vec<Value>) -> ConstructResult<Value> {
			let collection = elements
				.into_iter()
				.map(|element| unpack::<T>(element).map(|boxed| *boxed))
				.collect::<ConstructResult<$collection<T>>>()?;
			Ok(Box::new(collection))
		}
	};
}

sequence!(Vec<T>, collect_vec);
sequence!(VecDeque<T>, collect_vec_deque);
sequence!(HashSet<T: Eq, Hash>, collect_hash_set);
sequence!(BTreeSet<T: Ord>, collect_btree_set);

impl<T: Construct, const N: usize> Construct for [T; N] {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::new(Shape::Sequence(SequenceShape {
			element: TypeInfo::of::<T>(),
			fixed_len: Some(N),
			collect: collect_array::<T, N>,
		}))
	}

	sized_conversions!();
}

fn collect_array<T: Construct, const N: usize>(elements: Vec<Value>) -> ConstructResult<Value> {
	let elements = elements
		.into_iter()
		.map(|element| unpack::<T>(element).map(|boxed| *boxed))
		.collect::<ConstructResult<Vec<T>>>()?;
	let array: [T; N] = elements
		.try_into()
		.map_err(|_| ConstructError::type_mismatch::<[T; N]>())?;
	Ok(Box::new(array))
}
