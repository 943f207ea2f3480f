//! Generic schema-driven JSON deserializer.
//!
//! Executes a `Schema` against JSON text and writes every field, or its
//! default, into a caller-supplied target. Tokenizing is delegated to
//! `serde_json`'s streaming reader, which also reports where the object ends
//! so callers can keep scanning a larger buffer.

use crate::error::{Result, Rtcm2Error};
use crate::schema::{Binding, FieldDescriptor, Schema};
use crate::types::truncate_to;
use serde_json::{Map, Value};

/// Decodes the first JSON object in `text` into `target`.
///
/// Returns the cursor: the byte offset just past the consumed object. On
/// error the target may have been partially written and must be discarded.
pub fn decode_object<T>(text: &str, schema: &Schema<T>, target: &mut T) -> Result<usize> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();

    let value = match stream.next() {
        Some(value) => value?,
        None => return Err(Rtcm2Error::Syntax("no JSON value in input".to_string())),
    };
    let cursor = stream.byte_offset();

    let object = value
        .as_object()
        .ok_or_else(|| Rtcm2Error::Syntax("expected a JSON object".to_string()))?;

    apply_object(schema, object, target)?;
    Ok(cursor)
}

/// Walks one parsed object against `schema`.
///
/// Attributes are bound in input order; afterwards each descriptor that was
/// not seen takes its default, or fails as missing.
pub(crate) fn apply_object<T>(
    schema: &Schema<T>,
    object: &Map<String, Value>,
    target: &mut T,
) -> Result<()> {
    let mut seen = vec![false; schema.fields().len()];

    for (key, value) in object {
        let (index, field) = schema
            .field(key)
            .ok_or_else(|| Rtcm2Error::UnknownAttribute(key.clone()))?;
        bind_value(field, value, target)?;
        seen[index] = true;
    }

    for (field, _) in schema
        .fields()
        .iter()
        .zip(seen)
        .filter(|(_, seen)| !seen)
    {
        apply_default(field, target)?;
    }

    Ok(())
}

fn mismatch<T>(field: &FieldDescriptor<T>) -> Rtcm2Error {
    Rtcm2Error::TypeMismatch {
        field: field.name,
        expected: field.kind().describe(),
    }
}

/// Converts one JSON value according to the field's binding and stores it.
fn bind_value<T>(field: &FieldDescriptor<T>, value: &Value, target: &mut T) -> Result<()> {
    match &field.binding {
        Binding::Check(literal) => {
            let found = value.as_str().ok_or_else(|| mismatch(field))?;
            if found != *literal {
                return Err(Rtcm2Error::CheckFailed {
                    field: field.name,
                    expected: *literal,
                    found: found.to_string(),
                });
            }
        }
        Binding::Boolean { set, .. } => {
            let v = value.as_bool().ok_or_else(|| mismatch(field))?;
            set(target, v);
        }
        Binding::Integer { set, .. } => {
            let v = value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| mismatch(field))?;
            set(target, v);
        }
        Binding::UInteger { set, .. } => {
            let v = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| mismatch(field))?;
            set(target, v);
        }
        Binding::Real { set, .. } => {
            let v = value.as_f64().ok_or_else(|| mismatch(field))?;
            set(target, v);
        }
        Binding::String { set, max_len, .. } => {
            let v = value.as_str().ok_or_else(|| mismatch(field))?.to_string();
            let v = match max_len {
                Some(limit) => truncate_to(v, *limit),
                None => v,
            };
            set(target, v);
        }
        Binding::StringArray { set, capacity } => {
            let items = value.as_array().ok_or_else(|| mismatch(field))?;
            if items.len() > *capacity {
                return Err(Rtcm2Error::ArrayOverflow {
                    field: field.name,
                    capacity: *capacity,
                    found: items.len(),
                });
            }
            let strings = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or(Rtcm2Error::TypeMismatch {
                            field: field.name,
                            expected: "array of strings",
                        })
                })
                .collect::<Result<Vec<String>>>()?;
            set(target, strings);
        }
        Binding::RecordArray(binder) => {
            let items = value.as_array().ok_or_else(|| mismatch(field))?;
            binder.bind(field.name, items, target)?;
        }
    }
    Ok(())
}

/// Stores the default for an absent field.
fn apply_default<T>(field: &FieldDescriptor<T>, target: &mut T) -> Result<()> {
    let missing = || Rtcm2Error::MissingField(field.name);

    match &field.binding {
        Binding::Check(_) => return Err(missing()),
        Binding::Boolean { set, default } => set(target, default.ok_or_else(missing)?),
        Binding::Integer { set, default } => set(target, default.ok_or_else(missing)?),
        Binding::UInteger { set, default } => set(target, default.ok_or_else(missing)?),
        Binding::Real { set, default } => set(target, default.ok_or_else(missing)?),
        Binding::String { set, default, .. } => {
            set(target, default.ok_or_else(missing)?.to_string())
        }
        Binding::StringArray { set, .. } => set(target, Vec::new()),
        Binding::RecordArray(binder) => {
            binder.bind(field.name, &[], target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Fix {
        mode: u32,
        offset: i32,
        alt: f64,
        ok: bool,
        tag: String,
        points: Vec<Point>,
        npoints: usize,
        notes: Vec<String>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: f64,
        y: f64,
    }

    lazy_static::lazy_static! {
        static ref POINT: Schema<Point> = Schema::<Point>::builder("point")
            .real("x", None, |p, v| p.x = v)
            .real("y", Some(0.0), |p, v| p.y = v)
            .build();
        static ref FIX: Schema<Fix> = Schema::<Fix>::builder("fix")
            .check("class", "FIX")
            .uinteger("mode", None, |f, v| f.mode = v)
            .integer("offset", Some(-1), |f, v| f.offset = v)
            .real("alt", Some(f64::NAN), |f, v| f.alt = v)
            .boolean("ok", Some(false), |f, v| f.ok = v)
            .string("tag", Some(3), Some(""), |f, v| f.tag = v)
            .record_array("points", &*POINT, 2, |f| &mut f.points, |f, n| f.npoints = n)
            .string_array("notes", 2, |f, v| f.notes = v)
            .build();
    }

    fn decode(text: &str) -> Result<(Fix, usize)> {
        let mut fix = Fix::default();
        let cursor = decode_object(text, &FIX, &mut fix)?;
        Ok((fix, cursor))
    }

    #[test]
    fn test_fields_and_defaults() {
        let (fix, cursor) = decode(r#"{"class":"FIX","mode":3}"#).unwrap();

        assert_eq!(fix.mode, 3);
        assert_eq!(fix.offset, -1);
        assert!(fix.alt.is_nan());
        assert!(!fix.ok);
        assert_eq!(fix.npoints, 0);
        assert!(fix.points.is_empty());
        assert_eq!(cursor, 24);
    }

    #[test]
    fn test_nested_records_preserve_order() {
        let text = r#"{"class":"FIX","mode":2,"points":[{"x":1.5,"y":2},{"x":-3}]}"#;
        let (fix, _) = decode(text).unwrap();

        assert_eq!(fix.npoints, 2);
        assert_eq!(
            fix.points,
            vec![Point { x: 1.5, y: 2.0 }, Point { x: -3.0, y: 0.0 }]
        );
    }

    #[test]
    fn test_array_overflow_is_an_error() {
        let text = r#"{"class":"FIX","mode":2,"points":[{"x":1},{"x":2},{"x":3}]}"#;
        match decode(text) {
            Err(Rtcm2Error::ArrayOverflow {
                field,
                capacity,
                found,
            }) => {
                assert_eq!(field, "points");
                assert_eq!(capacity, 2);
                assert_eq!(found, 3);
            }
            other => panic!("Expected ArrayOverflow, got {:?}", other),
        }

        let text = r#"{"class":"FIX","mode":2,"notes":["a","b","c"]}"#;
        assert!(matches!(
            decode(text),
            Err(Rtcm2Error::ArrayOverflow { field: "notes", .. })
        ));
    }

    #[test]
    fn test_missing_required_field() {
        assert!(matches!(
            decode(r#"{"class":"FIX"}"#),
            Err(Rtcm2Error::MissingField("mode"))
        ));
        assert!(matches!(
            decode(r#"{"class":"FIX","mode":1,"points":[{"y":1}]}"#),
            Err(Rtcm2Error::MissingField("x"))
        ));
        assert!(matches!(
            decode(r#"{"mode":1}"#),
            Err(Rtcm2Error::MissingField("class"))
        ));
    }

    #[test]
    fn test_type_mismatches() {
        let cases = [
            r#"{"class":"FIX","mode":-1}"#,
            r#"{"class":"FIX","mode":1.5}"#,
            r#"{"class":"FIX","mode":"1"}"#,
            r#"{"class":"FIX","mode":4294967296}"#,
            r#"{"class":"FIX","mode":1,"offset":3000000000}"#,
            r#"{"class":"FIX","mode":1,"ok":1}"#,
            r#"{"class":"FIX","mode":1,"alt":null}"#,
            r#"{"class":"FIX","mode":1,"points":{}}"#,
            r#"{"class":"FIX","mode":1,"points":[1]}"#,
            r#"{"class":"FIX","mode":1,"notes":[1]}"#,
            r#"{"class":7,"mode":1}"#,
        ];
        for text in cases {
            match decode(text) {
                Err(Rtcm2Error::TypeMismatch { .. }) => {}
                other => panic!("Expected TypeMismatch for {}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_check_literal_and_unknown_attribute() {
        assert!(matches!(
            decode(r#"{"class":"TPV","mode":1}"#),
            Err(Rtcm2Error::CheckFailed { field: "class", .. })
        ));
        match decode(r#"{"class":"FIX","mode":1,"speed":2}"#) {
            Err(Rtcm2Error::UnknownAttribute(name)) => assert_eq!(name, "speed"),
            other => panic!("Expected UnknownAttribute, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_errors() {
        for text in ["", "   ", "[1,2]", "{\"class\":", "42"] {
            match decode(text) {
                Err(Rtcm2Error::Syntax(_)) => {}
                other => panic!("Expected Syntax for {:?}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_bounded_string_truncates() {
        let (fix, _) = decode(r#"{"class":"FIX","mode":1,"tag":"ABCDEF"}"#).unwrap();
        assert_eq!(fix.tag, "ABC");
    }

    #[test]
    fn test_cursor_leaves_trailing_text() {
        let first = r#"{"class":"FIX","mode":1}"#;
        let text = format!("{}\n{}", first, r#"{"class":"FIX","mode":2}"#);

        let (fix, cursor) = decode(&text).unwrap();
        assert_eq!(fix.mode, 1);
        assert_eq!(cursor, first.len());

        let (fix, _) = decode(&text[cursor..]).unwrap();
        assert_eq!(fix.mode, 2);
    }
}
