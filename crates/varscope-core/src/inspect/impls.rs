//! [`Inspect`] implementations for standard library types.
//!
//! References and owning smart pointers are `ptr`. `Option` is transparent
//! when `Some` and a nil pointer when `None`. Interior-mutability wrappers are
//! transparent while their contents can be read without blocking, and
//! `unknown` otherwise.

use crate::inspect::{Field, Inspect, Shape, Visit};
use crate::node::Node;
use std::any::Any;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{mpsc, Arc, Mutex, RwLock, TryLockError};
use std::time::{Duration, Instant, SystemTime};

const BORROWED: &str = "<mutably borrowed>";
const LOCKED: &str = "<locked>";

macro_rules! signed {
    ($($t:ty),*) => {$(
        impl Inspect for $t {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Int(i64::from(*self)))
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($t:ty),*) => {$(
        impl Inspect for $t {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Uint(u64::from(*self)))
            }
        }
    )*};
}

signed!(i8, i16, i32, i64);
unsigned!(u8, u16, u32, u64);

impl Inspect for isize {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match i64::try_from(*self) {
            Ok(i) => visit(Shape::Int(i)),
            Err(_) => visit(Shape::Unknown(self.to_string())),
        }
    }
}

impl Inspect for usize {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match u64::try_from(*self) {
            Ok(u) => visit(Shape::Uint(u)),
            Err(_) => visit(Shape::Unknown(self.to_string())),
        }
    }
}

impl Inspect for i128 {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match i64::try_from(*self) {
            Ok(i) => visit(Shape::Int(i)),
            Err(_) => visit(Shape::Unknown(self.to_string())),
        }
    }
}

impl Inspect for u128 {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match u64::try_from(*self) {
            Ok(u) => visit(Shape::Uint(u)),
            Err(_) => visit(Shape::Unknown(self.to_string())),
        }
    }
}

impl Inspect for f32 {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Float(f64::from(*self)))
    }
}

impl Inspect for f64 {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Float(*self))
    }
}

impl Inspect for bool {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Bool(*self))
    }
}

impl Inspect for char {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        let mut buf = [0u8; 4];
        visit(Shape::Str(self.encode_utf8(&mut buf)))
    }
}

impl Inspect for String {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(self))
    }
}

// String slices are text, not references to text.
impl Inspect for &str {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(self))
    }
}

impl Inspect for Box<str> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(self))
    }
}

impl Inspect for Cow<'_, str> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(self))
    }
}

impl Inspect for PathBuf {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(&self.to_string_lossy()))
    }
}

impl Inspect for &Path {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(&self.to_string_lossy()))
    }
}

impl Inspect for OsString {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(&self.to_string_lossy()))
    }
}

impl Inspect for &OsStr {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Str(&self.to_string_lossy()))
    }
}

impl Inspect for () {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Record(Vec::new()))
    }
}

macro_rules! tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Inspect),+> Inspect for ($($name,)+) {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Record(vec![
                    $(Field::readable(stringify!($idx), &self.$idx),)+
                ]))
            }
        }
    };
}

tuple!(A: 0);
tuple!(A: 0, B: 1);
tuple!(A: 0, B: 1, C: 2);
tuple!(A: 0, B: 1, C: 2, D: 3);

// ---- references and smart pointers ----

impl<T: Inspect> Inspect for &T {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Pointer(Some(*self)))
    }
}

impl<T: Inspect> Inspect for &mut T {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Pointer(Some(&**self)))
    }
}

impl Inspect for &dyn Inspect {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Pointer(Some(*self)))
    }
}

macro_rules! owning_pointer {
    ($($ptr:ident),*) => {$(
        impl<T: Inspect> Inspect for $ptr<T> {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Pointer(Some(&**self)))
            }
        }

        impl Inspect for $ptr<dyn Inspect> {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Pointer(Some(&**self)))
            }
        }
    )*};
}

owning_pointer!(Box, Rc, Arc);

impl<T: Inspect> Inspect for std::rc::Weak<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match self.upgrade() {
            Some(strong) => visit(Shape::Pointer(Some(&*strong))),
            None => visit(Shape::Pointer(None)),
        }
    }
}

impl<T: Inspect> Inspect for std::sync::Weak<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match self.upgrade() {
            Some(strong) => visit(Shape::Pointer(Some(&*strong))),
            None => visit(Shape::Pointer(None)),
        }
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match self {
            Some(value) => value.describe(visit),
            None => visit(Shape::Pointer(None)),
        }
    }
}

impl<T: ?Sized> Inspect for *const T {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::UnsafePointer(self.cast::<()>() as usize))
    }
}

impl<T: ?Sized> Inspect for *mut T {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::UnsafePointer(self.cast::<()>() as usize))
    }
}

// ---- interior mutability ----

impl<T: Copy + Inspect> Inspect for Cell<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        let copy = self.get();
        visit(Shape::Detached(&copy))
    }
}

impl<T: Inspect> Inspect for RefCell<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match self.try_borrow() {
            Ok(inner) => (*inner).describe(visit),
            Err(_) => visit(Shape::Unknown(BORROWED.to_string())),
        }
    }
}

impl<T: Inspect> Inspect for Mutex<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match self.try_lock() {
            Ok(inner) => (*inner).describe(visit),
            Err(TryLockError::Poisoned(poisoned)) => (**poisoned.get_ref()).describe(visit),
            Err(TryLockError::WouldBlock) => visit(Shape::Unknown(LOCKED.to_string())),
        }
    }
}

impl<T: Inspect> Inspect for RwLock<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        match self.try_read() {
            Ok(inner) => (*inner).describe(visit),
            Err(TryLockError::Poisoned(poisoned)) => (**poisoned.get_ref()).describe(visit),
            Err(TryLockError::WouldBlock) => visit(Shape::Unknown(LOCKED.to_string())),
        }
    }
}

// ---- sequences ----

fn elements<'a, T: Inspect + 'a>(items: impl Iterator<Item = &'a T>) -> Vec<&'a dyn Inspect> {
    items.map(|item| item as &dyn Inspect).collect()
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Array(elements(self.iter())))
    }
}

impl<T: Inspect> Inspect for &[T] {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Slice {
            elements: elements(self.iter()),
            capacity: self.len(),
        })
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Slice {
            elements: elements(self.iter()),
            capacity: self.capacity(),
        })
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Slice {
            elements: elements(self.iter()),
            capacity: self.capacity(),
        })
    }
}

impl<T: Inspect, S> Inspect for HashSet<T, S> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Slice {
            elements: elements(self.iter()),
            capacity: self.capacity(),
        })
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Slice {
            elements: elements(self.iter()),
            capacity: self.len(),
        })
    }
}

// ---- associative collections ----

impl<K: Inspect, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Inspect, v as &dyn Inspect))
                .collect(),
        ))
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Inspect, v as &dyn Inspect))
                .collect(),
        ))
    }
}

// ---- opaque values ----

macro_rules! function_pointer {
    ($($arg:ident),*) => {
        impl<R $(, $arg)*> Inspect for fn($($arg),*) -> R {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Function)
            }
        }
    };
}

function_pointer!();
function_pointer!(A);
function_pointer!(A, B);
function_pointer!(A, B, C);

impl<T> Inspect for mpsc::Sender<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Channel)
    }
}

impl<T> Inspect for mpsc::SyncSender<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Channel)
    }
}

impl<T> Inspect for mpsc::Receiver<T> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Channel)
    }
}

impl Inspect for Box<dyn Any> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Dynamic)
    }
}

impl Inspect for Box<dyn Any + Send> {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Dynamic)
    }
}

impl Inspect for &dyn Any {
    fn describe(&self, visit: &mut Visit<'_>) -> Node {
        visit(Shape::Dynamic)
    }
}

macro_rules! debug_text {
    ($($t:ty),*) => {$(
        impl Inspect for $t {
            fn describe(&self, visit: &mut Visit<'_>) -> Node {
                visit(Shape::Unknown(format!("{:?}", self)))
            }
        }
    )*};
}

debug_text!(Duration, Instant, SystemTime);

#[cfg(test)]
mod tests {
    use crate::inspect::inspect;
    use crate::node::{Metatype, NodeValue, NULL_PLACEHOLDER};
    use std::collections::HashMap;

    #[test]
    fn test_str_slice_is_string_not_pointer() {
        let node = inspect("s", &"héllo", 5);
        assert_eq!(node.metatype, Some(Metatype::String));
        assert_eq!(node.length, Some(6));
    }

    #[test]
    fn test_none_is_null_pointer() {
        let missing: Option<Box<i32>> = None;
        let node = inspect("missing", &missing, 5);
        assert_eq!(node.metatype, Some(Metatype::Ptr));
        assert_eq!(node.value.as_text(), Some(NULL_PLACEHOLDER));
    }

    #[test]
    fn test_some_is_transparent() {
        let node = inspect("some", &Some(3u16), 5);
        assert_eq!(node.metatype, Some(Metatype::Uint));
        assert_eq!(node.value, NodeValue::Uint(3));
    }

    #[test]
    fn test_wide_integers_fall_back_to_text() {
        let node = inspect("big", &u128::MAX, 5);
        assert_eq!(node.metatype, Some(Metatype::Unknown));
        assert_eq!(node.value.as_text(), Some(u128::MAX.to_string().as_str()));

        let small = inspect("small", &-5i128, 5);
        assert_eq!(small.value, NodeValue::Int(-5));
    }

    #[test]
    fn test_mutably_borrowed_refcell_is_unknown() {
        let cell = std::cell::RefCell::new(1i32);
        let _guard = cell.borrow_mut();
        let node = inspect("cell", &cell, 5);
        assert_eq!(node.metatype, Some(Metatype::Unknown));
    }

    #[test]
    fn test_map_records_length() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), vec![1i32]);
        let node = inspect("m", &map, 5);
        assert_eq!(node.metatype, Some(Metatype::Map));
        assert_eq!(node.length, Some(1));
        let NodeValue::Pairs(pairs) = &node.value else {
            panic!("expected pairs");
        };
        assert!(pairs[0].key.address.is_none());
        assert!(pairs[0].value.address.is_some());
    }

    #[test]
    fn test_channel_and_function_placeholders() {
        let (tx, _rx) = std::sync::mpsc::channel::<i32>();
        assert_eq!(inspect("tx", &tx, 5).metatype, Some(Metatype::Chan));

        fn double(x: i32) -> i32 {
            x * 2
        }
        let f: fn(i32) -> i32 = double;
        assert_eq!(inspect("f", &f, 5).metatype, Some(Metatype::Function));
    }

    #[test]
    fn test_raw_pointer_is_hex() {
        let x = 1u8;
        let ptr: *const u8 = &x;
        let node = inspect("p", &ptr, 5);
        assert_eq!(node.metatype, Some(Metatype::UnsafePtr));
        assert!(node.value.as_text().unwrap().starts_with("0x"));
    }
}
