//! Declared component properties
//!
//! A component class declares its properties as a static table of
//! [`PropDecl`]s. The class schema is the base declarations, then every
//! inherited table, then the class's own table, merged in order; a later
//! declaration with the same name replaces the earlier one in place.
//!
//! ```ignore
//! const PROPS: &'static [PropDecl] = &[
//!     PropDecl::new("value", PropKind::Str, || "Hello World".into()),
//!     PropDecl::required("model", PropKind::Object),
//!     PropDecl::optional("on_change", PropKind::Callback),
//! ];
//! ```
//!
//! Schemas are merged once per type and cached for the life of the process.

use std::any::{Any, TypeId};
use std::rc::Rc;
use std::sync::{LazyLock, Mutex};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::error::{ComponentError, Result};
use crate::value::{FromPropValue, PropKind, PropValue};

/// Default for a declared property
#[derive(Clone, Copy)]
pub enum PropDefault {
    /// Must be supplied at construction
    Required,
    /// Defaults to [`PropValue::Null`]
    Null,
    /// Factory producing a fresh default for every instance
    Value(fn() -> PropValue),
}

impl std::fmt::Debug for PropDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropDefault::Required => f.write_str("Required"),
            PropDefault::Null => f.write_str("Null"),
            PropDefault::Value(factory) => write!(f, "Value({:?})", factory()),
        }
    }
}

/// A (name, type, default) triple
#[derive(Clone, Copy, Debug)]
pub struct PropDecl {
    pub name: &'static str,
    pub kind: PropKind,
    /// Whether `Null` is an acceptable value
    pub nullable: bool,
    pub default: PropDefault,
}

impl PropDecl {
    /// Property with a default produced by `default` for each instance
    pub const fn new(name: &'static str, kind: PropKind, default: fn() -> PropValue) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            default: PropDefault::Value(default),
        }
    }

    /// Property that must be supplied at construction
    pub const fn required(name: &'static str, kind: PropKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            default: PropDefault::Required,
        }
    }

    /// Nullable property defaulting to `Null`
    pub const fn optional(name: &'static str, kind: PropKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
            default: PropDefault::Null,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.default, PropDefault::Required)
    }

    /// Whether `value` satisfies this declaration
    pub fn accepts(&self, value: &PropValue) -> bool {
        match value {
            PropValue::Null => self.nullable || self.kind == PropKind::Any,
            other => self.kind == PropKind::Any || self.kind == other.kind(),
        }
    }

    fn default_value(&self) -> Option<PropValue> {
        match self.default {
            PropDefault::Required => None,
            PropDefault::Null => Some(PropValue::Null),
            PropDefault::Value(factory) => Some(factory()),
        }
    }
}

/// Properties every component inherits; applied to the root container
pub const BASE_PROPS: &[PropDecl] = &[
    PropDecl::optional("name", PropKind::Str),
    PropDecl::optional("style", PropKind::Map),
    PropDecl::optional("width", PropKind::Int),
    PropDecl::optional("height", PropKind::Int),
    PropDecl::optional("style_type_name_override", PropKind::Str),
];

/// The merged, ordered property declarations of one component class
#[derive(Debug)]
pub struct PropSchema {
    class: &'static str,
    decls: Vec<PropDecl>,
}

impl PropSchema {
    /// Merge declaration tables in order; later tables win on name clashes
    /// while keeping the original position
    pub fn merge(class: &'static str, tables: &[&[PropDecl]]) -> Self {
        let mut decls: Vec<PropDecl> = Vec::new();
        for table in tables {
            for decl in table.iter() {
                match decls.iter_mut().find(|existing| existing.name == decl.name) {
                    Some(existing) => *existing = *decl,
                    None => decls.push(*decl),
                }
            }
        }
        Self { class, decls }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn decls(&self) -> &[PropDecl] {
        &self.decls
    }

    pub fn get(&self, name: &str) -> Option<&PropDecl> {
        self.decls.iter().find(|decl| decl.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decls.iter().map(|decl| decl.name)
    }

    /// Validate overrides against the schema and fill in defaults
    pub fn resolve(&self, overrides: PropOverrides) -> Result<Props> {
        let mut overrides = overrides.values;

        for (key, value) in &overrides {
            let Some(decl) = self.get(key) else {
                return Err(ComponentError::UnknownProperty {
                    class: self.class,
                    property: key.clone(),
                });
            };
            if !decl.accepts(value) {
                return Err(ComponentError::PropertyTypeMismatch {
                    class: self.class,
                    property: key.clone(),
                    expected: decl.kind,
                    found: value.kind(),
                });
            }
        }

        let mut values = IndexMap::with_capacity(self.decls.len());
        for decl in &self.decls {
            let value = match overrides.shift_remove(decl.name) {
                Some(value) => value,
                None => decl.default_value().ok_or_else(|| {
                    ComponentError::MissingRequiredProperty {
                        class: self.class,
                        property: decl.name.to_string(),
                    }
                })?,
            };
            values.insert(decl.name, value);
        }

        Ok(Props {
            class: self.class,
            values,
        })
    }
}

/// Process-wide cache of merged schemas, keyed by component type
static SCHEMA_REGISTRY: LazyLock<Mutex<FxHashMap<TypeId, &'static PropSchema>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// Get the merged schema for type `T`, building it on first use
pub fn schema_for<T: 'static>(class: &'static str, tables: &[&[PropDecl]]) -> &'static PropSchema {
    let mut registry = SCHEMA_REGISTRY
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *registry
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Box::leak(Box::new(PropSchema::merge(class, tables))))
}

/// Construction-time property overrides, in insertion order
#[derive(Clone, Debug, Default)]
pub struct PropOverrides {
    values: IndexMap<String, PropValue>,
}

impl PropOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for PropOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (name, value) in iter {
            overrides.set(name, value);
        }
        overrides
    }
}

/// Build [`PropOverrides`] from `name => value` pairs
///
/// ```ignore
/// let overrides = props! { "value" => "Hi", "width" => 120 };
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::props::PropOverrides::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::props::PropOverrides::new()$(.with($name, $value))+
    };
}

/// Resolved property values of one instance, in declaration order
///
/// Every declared property is present. Classes move values out into their
/// own typed fields with [`Props::take`].
#[derive(Debug)]
pub struct Props {
    class: &'static str,
    values: IndexMap<&'static str, PropValue>,
}

impl Props {
    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Move a property out as a typed value
    pub fn take<T: FromPropValue>(&mut self, name: &str) -> Result<T> {
        let value = self.take_raw(name)?;
        T::from_prop(value).map_err(|found| ComponentError::PropertyTypeMismatch {
            class: self.class,
            property: name.to_string(),
            expected: T::KIND,
            found: found.kind(),
        })
    }

    /// Move an opaque object property out, downcast to `T`
    pub fn take_object<T: Any>(&mut self, name: &str) -> Result<Rc<T>> {
        let value = self.take_raw(name)?;
        let found = value.kind();
        match value {
            PropValue::Object(object) => {
                object
                    .downcast::<T>()
                    .map_err(|_| ComponentError::PropertyTypeMismatch {
                        class: self.class,
                        property: name.to_string(),
                        expected: PropKind::Object,
                        found: PropKind::Object,
                    })
            }
            _ => Err(ComponentError::PropertyTypeMismatch {
                class: self.class,
                property: name.to_string(),
                expected: PropKind::Object,
                found,
            }),
        }
    }

    fn take_raw(&mut self, name: &str) -> Result<PropValue> {
        match self.values.get_mut(name) {
            Some(slot) => Ok(std::mem::take(slot)),
            None => Err(ComponentError::UnknownProperty {
                class: self.class,
                property: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL_PROPS: &[PropDecl] = &[
        PropDecl::new("value", PropKind::Str, || "Hello World".into()),
        PropDecl::new("tags", PropKind::List, || PropValue::List(Vec::new())),
    ];

    const FANCY_PROPS: &[PropDecl] = &[
        PropDecl::new("value", PropKind::Str, || "Fancy".into()),
        PropDecl::required("accent", PropKind::Str),
    ];

    fn label_schema() -> PropSchema {
        PropSchema::merge("Label", &[BASE_PROPS, LABEL_PROPS])
    }

    #[test]
    fn test_defaults_applied() {
        let mut props = label_schema().resolve(PropOverrides::new()).unwrap();
        assert_eq!(props.take::<String>("value").unwrap(), "Hello World");
        assert_eq!(props.take::<Option<i64>>("width").unwrap(), None);
    }

    #[test]
    fn test_override_wins() {
        let mut props = label_schema()
            .resolve(crate::props! { "value" => "Hi", "width" => 40 })
            .unwrap();
        assert_eq!(props.take::<String>("value").unwrap(), "Hi");
        assert_eq!(props.take::<Option<i64>>("width").unwrap(), Some(40));
    }

    #[test]
    fn test_unknown_override_rejected() {
        let err = label_schema()
            .resolve(crate::props! { "valeu" => "typo" })
            .unwrap_err();
        assert_eq!(
            err,
            ComponentError::UnknownProperty {
                class: "Label",
                property: "valeu".into(),
            }
        );
    }

    #[test]
    fn test_missing_required_rejected() {
        let schema = PropSchema::merge("Fancy", &[BASE_PROPS, LABEL_PROPS, FANCY_PROPS]);
        let err = schema.resolve(PropOverrides::new()).unwrap_err();
        assert_eq!(
            err,
            ComponentError::MissingRequiredProperty {
                class: "Fancy",
                property: "accent".into(),
            }
        );
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let err = label_schema()
            .resolve(crate::props! { "value" => 12 })
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::PropertyTypeMismatch {
                expected: PropKind::Str,
                found: PropKind::Int,
                ..
            }
        ));

        // nullable declarations accept Null, others do not
        assert!(label_schema()
            .resolve(crate::props! { "width" => PropValue::Null })
            .is_ok());
        assert!(label_schema()
            .resolve(crate::props! { "value" => PropValue::Null })
            .is_err());
    }

    #[test]
    fn test_redeclaration_keeps_position() {
        let schema = PropSchema::merge("Fancy", &[BASE_PROPS, LABEL_PROPS, FANCY_PROPS]);
        let names: Vec<_> = schema.names().collect();
        assert_eq!(
            names,
            vec![
                "name",
                "style",
                "width",
                "height",
                "style_type_name_override",
                "value",
                "tags",
                "accent",
            ]
        );

        let mut props = schema.resolve(crate::props! { "accent" => "red" }).unwrap();
        assert_eq!(props.take::<String>("value").unwrap(), "Fancy");
    }

    #[test]
    fn test_mutable_defaults_not_shared() {
        let schema = label_schema();
        let mut a = schema.resolve(PropOverrides::new()).unwrap();
        let mut b = schema.resolve(PropOverrides::new()).unwrap();

        let mut tags_a = a.take::<Vec<PropValue>>("tags").unwrap();
        tags_a.push("x".into());
        let tags_b = b.take::<Vec<PropValue>>("tags").unwrap();

        assert_eq!(tags_a.len(), 1);
        assert!(tags_b.is_empty());
    }

    #[test]
    fn test_take_object_downcasts() {
        const MODEL_PROPS: &[PropDecl] = &[PropDecl::required("model", PropKind::Object)];
        let schema = PropSchema::merge("Viewer", &[MODEL_PROPS]);

        let mut props = schema
            .resolve(crate::props! { "model" => PropValue::object(41u32) })
            .unwrap();
        assert_eq!(*props.take_object::<u32>("model").unwrap(), 41);

        let mut props = schema
            .resolve(crate::props! { "model" => PropValue::object("nope") })
            .unwrap();
        assert!(props.take_object::<u32>("model").is_err());
    }

    #[test]
    fn test_registry_caches_per_type() {
        struct Marker;
        let first = schema_for::<Marker>("Marker", &[BASE_PROPS]);
        let second = schema_for::<Marker>("Marker", &[BASE_PROPS, LABEL_PROPS]);
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.decls().len(), BASE_PROPS.len());
    }
}
