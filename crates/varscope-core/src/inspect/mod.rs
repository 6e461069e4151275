//! Runtime value introspection.
//!
//! A value takes part in snapshots by implementing [`Inspect`]: it reports
//! its type name and describes its [`Shape`] to the walker. The walker in
//! [`walker`] turns those descriptions into a bounded, cycle-safe
//! [`Node`](crate::node::Node) tree.
//!
//! ## Entry point
//!
//! ```
//! use varscope_core::inspect::inspect;
//! use varscope_core::node::Metatype;
//!
//! let tree = inspect("xs", &vec![1, 2, 3], 5);
//! assert_eq!(tree.metatype, Some(Metatype::Slice));
//! ```
//!
//! ## Describing a value
//!
//! `describe` hands the shape to a continuation instead of returning it, so
//! an implementation can hold a borrow guard (a `RefCell` borrow, a mutex
//! lock) for exactly as long as the walker needs the borrowed children.

pub mod impls;
pub mod walker;

use crate::node::Node;
use std::borrow::Cow;
use std::fmt;

pub use walker::{inspect, Introspector};

/// Continuation that receives a value's shape and returns the finished node.
pub type Visit<'v> = dyn FnMut(Shape<'_>) -> Node + 'v;

/// Capability to expose a value's structure at runtime.
pub trait Inspect {
    /// Concrete type name recorded on the node.
    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Describe this value's shape by calling `visit` exactly once and
    /// returning what it returns.
    fn describe(&self, visit: &mut Visit<'_>) -> Node;
}

/// Kind of a value together with the borrowed parts the walker descends into.
pub enum Shape<'a> {
    /// Untyped nil.
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    /// A complex number; recorded only as a placeholder.
    Complex,
    /// A raw address that must not be followed.
    UnsafePointer(usize),
    /// A copy of the owner's contents, such as the value read out of a `Cell`.
    /// It is described in the owner's place, but nothing beneath it gets a
    /// storage address until a pointer leads back into real storage.
    Detached(&'a dyn Inspect),
    /// A reference; `None` for a nil reference.
    Pointer(Option<&'a dyn Inspect>),
    /// Fixed-size sequence; capacity equals length.
    Array(Vec<&'a dyn Inspect>),
    /// Growable sequence with its spare capacity.
    Slice {
        elements: Vec<&'a dyn Inspect>,
        capacity: usize,
    },
    /// Associative collection in iteration order.
    Map(Vec<(&'a dyn Inspect, &'a dyn Inspect)>),
    /// Record with named fields in declaration order.
    Record(Vec<Field<'a>>),
    Function,
    Channel,
    /// A dynamically typed value whose contents are not inspectable.
    Dynamic,
    /// Anything else, rendered as text.
    Unknown(String),
}

/// One record field as described by its owner.
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    /// `None` when the owner does not expose the field's contents.
    pub value: Option<&'a dyn Inspect>,
}

impl<'a> Field<'a> {
    pub fn readable(name: impl Into<Cow<'a, str>>, value: &'a dyn Inspect) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn unreadable(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// Storage address of a value, used to recognise repeated references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    /// Identity of the value behind `value`.
    pub fn of(value: &dyn Inspect) -> Self {
        Identity(value as *const dyn Inspect as *const () as usize)
    }

    pub fn address(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Implement [`Inspect`] for a struct by listing its fields.
///
/// Fields listed under `hidden` are reported as unreadable and appear in the
/// snapshot as `"#UNEXPORTED#"`.
///
/// ```
/// use varscope_core::inspect_record;
///
/// struct Account {
///     owner: String,
///     balance: i64,
///     pin: u16,
/// }
///
/// inspect_record!(Account { owner, balance } hidden { pin });
/// ```
#[macro_export]
macro_rules! inspect_record {
    ($ty:ty { $($field:ident),* $(,)? } $(hidden { $($hidden:ident),* $(,)? })?) => {
        impl $crate::inspect::Inspect for $ty {
            fn describe(
                &self,
                visit: &mut $crate::inspect::Visit<'_>,
            ) -> $crate::node::Node {
                visit($crate::inspect::Shape::Record(vec![
                    $( $crate::inspect::Field::readable(stringify!($field), &self.$field), )*
                    $($( $crate::inspect::Field::unreadable(stringify!($hidden)), )*)?
                ]))
            }
        }
    };
}
