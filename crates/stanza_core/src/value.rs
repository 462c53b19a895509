//! Dynamic property values
//!
//! Construction-time overrides arrive as [`PropValue`]s tagged with a
//! [`PropKind`]. Once a class has validated them against its schema, the
//! values are moved into typed struct fields through [`FromPropValue`].

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Type tag of a property value or declaration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    /// Declaration accepts any value
    Any,
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Callback,
    /// Opaque host object (event streams, models)
    Object,
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropKind::Any => "any",
            PropKind::Null => "null",
            PropKind::Bool => "bool",
            PropKind::Int => "int",
            PropKind::Float => "float",
            PropKind::Str => "str",
            PropKind::List => "list",
            PropKind::Map => "map",
            PropKind::Callback => "callback",
            PropKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Shared callback property, e.g. an `on_change` handler
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&PropValue)>);

impl Callback {
    pub fn new(f: impl Fn(&PropValue) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, value: impl Into<PropValue>) {
        (self.0)(&value.into())
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// A property value as supplied at construction
#[derive(Clone, Default)]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PropValue>),
    Map(IndexMap<String, PropValue>),
    Callback(Callback),
    Object(Rc<dyn Any>),
}

impl PropValue {
    /// Wrap an arbitrary value as an opaque object property
    pub fn object<T: Any>(value: T) -> Self {
        PropValue::Object(Rc::new(value))
    }

    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::Null => PropKind::Null,
            PropValue::Bool(_) => PropKind::Bool,
            PropValue::Int(_) => PropKind::Int,
            PropValue::Float(_) => PropKind::Float,
            PropValue::Str(_) => PropKind::Str,
            PropValue::List(_) => PropKind::List,
            PropValue::Map(_) => PropKind::Map,
            PropValue::Callback(_) => PropKind::Callback,
            PropValue::Object(_) => PropKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("Null"),
            PropValue::Bool(b) => write!(f, "Bool({b})"),
            PropValue::Int(i) => write!(f, "Int({i})"),
            PropValue::Float(x) => write!(f, "Float({x})"),
            PropValue::Str(s) => write!(f, "Str({s:?})"),
            PropValue::List(items) => f.debug_tuple("List").field(items).finish(),
            PropValue::Map(map) => f.debug_tuple("Map").field(map).finish(),
            PropValue::Callback(cb) => cb.fmt(f),
            PropValue::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::List(a), PropValue::List(b)) => a == b,
            (PropValue::Map(a), PropValue::Map(b)) => a == b,
            (PropValue::Callback(a), PropValue::Callback(b)) => a.ptr_eq(b),
            (PropValue::Object(a), PropValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("null"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Int(i) => write!(f, "{i}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Str(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions into PropValue
// ─────────────────────────────────────────────────────────────────────────────

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
    fn from(items: Vec<T>) -> Self {
        PropValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, PropValue>> for PropValue {
    fn from(map: IndexMap<String, PropValue>) -> Self {
        PropValue::Map(map)
    }
}

impl From<Callback> for PropValue {
    fn from(callback: Callback) -> Self {
        PropValue::Callback(callback)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Typed view of a [`PropValue`]
///
/// Extraction never coerces: an `Int` does not become a `Float`.
pub trait FromPropValue: Sized {
    /// Kind reported when extraction fails
    const KIND: PropKind;

    /// Convert, handing the value back unchanged on mismatch
    fn from_prop(value: PropValue) -> Result<Self, PropValue>;
}

impl FromPropValue for PropValue {
    const KIND: PropKind = PropKind::Any;

    fn from_prop(value: PropValue) -> Result<Self, PropValue> {
        Ok(value)
    }
}

macro_rules! impl_from_prop {
    ($ty:ty, $kind:ident) => {
        impl FromPropValue for $ty {
            const KIND: PropKind = PropKind::$kind;

            fn from_prop(value: PropValue) -> Result<Self, PropValue> {
                match value {
                    PropValue::$kind(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

impl_from_prop!(bool, Bool);
impl_from_prop!(i64, Int);
impl_from_prop!(f64, Float);
impl_from_prop!(String, Str);
impl_from_prop!(Vec<PropValue>, List);
impl_from_prop!(IndexMap<String, PropValue>, Map);
impl_from_prop!(Callback, Callback);

impl FromPropValue for i32 {
    const KIND: PropKind = PropKind::Int;

    fn from_prop(value: PropValue) -> Result<Self, PropValue> {
        match value {
            PropValue::Int(i) => i32::try_from(i).map_err(|_| PropValue::Int(i)),
            other => Err(other),
        }
    }
}

impl<T: FromPropValue> FromPropValue for Option<T> {
    const KIND: PropKind = T::KIND;

    fn from_prop(value: PropValue) -> Result<Self, PropValue> {
        match value {
            PropValue::Null => Ok(None),
            other => T::from_prop(other).map(Some),
        }
    }
}
