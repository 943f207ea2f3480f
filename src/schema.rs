//! Declarative field descriptors and schemas.
//!
//! This module provides:
//! - `FieldKind`: the semantic kind of a wire field
//! - `Binding`: how a decoded value is written into a target record
//! - `FieldDescriptor` / `Schema`: ordered, named field sets
//! - `RecordArray`: binding of an array of objects through a nested schema
//!
//! Bindings are plain `fn` pointers, so a schema is immutable data that can be
//! shared between threads once built.

use crate::deserializer;
use crate::error::{Result, Rtcm2Error};
use serde_json::Value;

/// Semantic kind of a field, as seen on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Check,
    Boolean,
    Integer,
    UInteger,
    Real,
    String,
    Array,
}

impl FieldKind {
    /// Human-readable name used in type mismatch errors.
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Check => "string literal",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::UInteger => "unsigned integer",
            FieldKind::Real => "number",
            FieldKind::String => "string",
            FieldKind::Array => "array",
        }
    }
}

/// Binds an array of JSON objects into a fixed-capacity sequence of `T`.
pub trait ArrayBinder<T>: Send + Sync {
    /// Maximum number of elements the target can hold.
    fn capacity(&self) -> usize;

    /// Name of the element schema.
    fn element_schema(&self) -> &'static str;

    /// Decodes `items` into `target`, returning the number of bound elements.
    fn bind(&self, field: &'static str, items: &[Value], target: &mut T) -> Result<usize>;
}

/// Array of records decoded with a nested schema.
pub struct RecordArray<T: 'static, E: 'static> {
    pub schema: &'static Schema<E>,
    pub capacity: usize,
    pub slots: fn(&mut T) -> &mut Vec<E>,
    pub count: fn(&mut T, usize),
}

impl<T: 'static, E: Default + 'static> ArrayBinder<T> for RecordArray<T, E> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn element_schema(&self) -> &'static str {
        self.schema.name()
    }

    fn bind(&self, field: &'static str, items: &[Value], target: &mut T) -> Result<usize> {
        if items.len() > self.capacity {
            return Err(Rtcm2Error::ArrayOverflow {
                field,
                capacity: self.capacity,
                found: items.len(),
            });
        }

        let slots = (self.slots)(target);
        slots.clear();
        slots.reserve(items.len());

        for item in items {
            let object = item.as_object().ok_or(Rtcm2Error::TypeMismatch {
                field,
                expected: "array of objects",
            })?;
            let mut element = E::default();
            deserializer::apply_object(self.schema, object, &mut element)?;
            slots.push(element);
        }

        let bound = slots.len();
        (self.count)(target, bound);
        Ok(bound)
    }
}

/// Where and how a field's value lands in the target record.
pub enum Binding<T> {
    /// Value must equal the literal; nothing is stored.
    Check(&'static str),
    Boolean {
        set: fn(&mut T, bool),
        default: Option<bool>,
    },
    Integer {
        set: fn(&mut T, i32),
        default: Option<i32>,
    },
    UInteger {
        set: fn(&mut T, u32),
        default: Option<u32>,
    },
    Real {
        set: fn(&mut T, f64),
        default: Option<f64>,
    },
    String {
        set: fn(&mut T, String),
        max_len: Option<usize>,
        default: Option<&'static str>,
    },
    /// Array of plain strings; absent means empty.
    StringArray {
        set: fn(&mut T, Vec<String>),
        capacity: usize,
    },
    /// Array of objects decoded through a nested schema; absent means empty.
    RecordArray(Box<dyn ArrayBinder<T>>),
}

impl<T> Binding<T> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Binding::Check(_) => FieldKind::Check,
            Binding::Boolean { .. } => FieldKind::Boolean,
            Binding::Integer { .. } => FieldKind::Integer,
            Binding::UInteger { .. } => FieldKind::UInteger,
            Binding::Real { .. } => FieldKind::Real,
            Binding::String { .. } => FieldKind::String,
            Binding::StringArray { .. } | Binding::RecordArray(_) => FieldKind::Array,
        }
    }
}

/// One named field of a schema.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub binding: Binding<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn kind(&self) -> FieldKind {
        self.binding.kind()
    }

    /// True when absence of the field is an error.
    pub fn is_required(&self) -> bool {
        match &self.binding {
            Binding::Check(_) => true,
            Binding::Boolean { default, .. } => default.is_none(),
            Binding::Integer { default, .. } => default.is_none(),
            Binding::UInteger { default, .. } => default.is_none(),
            Binding::Real { default, .. } => default.is_none(),
            Binding::String { default, .. } => default.is_none(),
            Binding::StringArray { .. } | Binding::RecordArray(_) => false,
        }
    }

    /// Name of the nested element schema, for arrays of records.
    pub fn nested_schema(&self) -> Option<&'static str> {
        match &self.binding {
            Binding::RecordArray(binder) => Some(binder.element_schema()),
            _ => None,
        }
    }
}

/// An ordered set of field descriptors describing one record layout.
pub struct Schema<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> Schema<T> {
    /// Starts building a schema named `name`.
    pub fn builder(name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Looks up a field by wire name, returning its position and descriptor.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDescriptor<T>)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// True when the schema's leading field names are exactly `names`.
    pub fn starts_with(&self, names: &[&str]) -> bool {
        self.fields.len() >= names.len()
            && self.fields.iter().zip(names).all(|(f, n)| f.name == *n)
    }

    /// Checks structural invariants: unique names and bounded arrays.
    pub fn validate(&self) -> Result<()> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Rtcm2Error::Schema(format!(
                    "Duplicate field '{}' in schema '{}'",
                    field.name, self.name
                )));
            }

            let capacity = match &field.binding {
                Binding::StringArray { capacity, .. } => Some(*capacity),
                Binding::RecordArray(binder) => Some(binder.capacity()),
                _ => None,
            };
            if capacity == Some(0) {
                return Err(Rtcm2Error::Schema(format!(
                    "Array field '{}' in schema '{}' has zero capacity",
                    field.name, self.name
                )));
            }
        }
        Ok(())
    }
}

/// Incremental, declarative construction of a `Schema`.
pub struct SchemaBuilder<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn push(mut self, name: &'static str, binding: Binding<T>) -> Self {
        self.fields.push(FieldDescriptor { name, binding });
        self
    }

    pub fn check(self, name: &'static str, literal: &'static str) -> Self {
        self.push(name, Binding::Check(literal))
    }

    pub fn boolean(self, name: &'static str, default: Option<bool>, set: fn(&mut T, bool)) -> Self {
        self.push(name, Binding::Boolean { set, default })
    }

    pub fn integer(self, name: &'static str, default: Option<i32>, set: fn(&mut T, i32)) -> Self {
        self.push(name, Binding::Integer { set, default })
    }

    pub fn uinteger(self, name: &'static str, default: Option<u32>, set: fn(&mut T, u32)) -> Self {
        self.push(name, Binding::UInteger { set, default })
    }

    pub fn real(self, name: &'static str, default: Option<f64>, set: fn(&mut T, f64)) -> Self {
        self.push(name, Binding::Real { set, default })
    }

    pub fn string(
        self,
        name: &'static str,
        max_len: Option<usize>,
        default: Option<&'static str>,
        set: fn(&mut T, String),
    ) -> Self {
        self.push(
            name,
            Binding::String {
                set,
                max_len,
                default,
            },
        )
    }

    pub fn string_array(
        self,
        name: &'static str,
        capacity: usize,
        set: fn(&mut T, Vec<String>),
    ) -> Self {
        self.push(name, Binding::StringArray { set, capacity })
    }

    pub fn record_array<E: Default + 'static>(
        self,
        name: &'static str,
        schema: &'static Schema<E>,
        capacity: usize,
        slots: fn(&mut T) -> &mut Vec<E>,
        count: fn(&mut T, usize),
    ) -> Self {
        let binder = RecordArray {
            schema,
            capacity,
            slots,
            count,
        };
        self.push(name, Binding::RecordArray(Box::new(binder)))
    }

    pub fn build(self) -> Schema<T> {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Point {
        x: f64,
        label: String,
    }

    #[test]
    fn test_builder_preserves_order_and_kinds() {
        let schema = Schema::<Point>::builder("point")
            .check("class", "POINT")
            .real("x", Some(f64::NAN), |p, v| p.x = v)
            .string("label", Some(4), None, |p, v| p.label = v)
            .build();

        assert_eq!(schema.name(), "point");
        let kinds: Vec<FieldKind> = schema.fields().iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![FieldKind::Check, FieldKind::Real, FieldKind::String]
        );
        assert!(schema.starts_with(&["class", "x"]));
        assert!(!schema.starts_with(&["x"]));

        let (pos, field) = schema.field("label").unwrap();
        assert_eq!(pos, 2);
        assert!(field.is_required());
        assert!(!schema.field("x").unwrap().1.is_required());

        let mut point = Point::default();
        if let Binding::Real { set, .. } = &schema.fields()[1].binding {
            set(&mut point, 2.5);
        }
        assert_eq!(point.x, 2.5);
        assert!(point.label.is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let schema = Schema::<Point>::builder("dup")
            .real("x", None, |p, v| p.x = v)
            .real("x", None, |p, v| p.x = v)
            .build();

        match schema.validate() {
            Err(Rtcm2Error::Schema(msg)) => assert!(msg.contains("Duplicate field 'x'")),
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let schema = Schema::<Point>::builder("empty")
            .string_array("tags", 0, |_, _| {})
            .build();
        assert!(schema.validate().is_err());
    }
}
