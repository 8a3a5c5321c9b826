//! Conversion between [`crate::value::Value`] and `rmpv`'s order-preserving
//! `Value` tree, plus the small field-extraction helpers every body codec in
//! [`crate::catalogue`] is built from.
//!
//! `rmpv::Value::Map` is a `Vec<(Value, Value)>`: it preserves wire encounter
//! order, which is exactly what the envelope codec needs to enforce "`type`
//! read before `body`" without hand-rolling a streaming marker reader.

use std::collections::BTreeMap;

use crate::error::{DecodeError, EncodeError};
use crate::value::Value;

/// Convert a decoded `rmpv::Value` into our closed [`Value`] shape.
///
/// Any msgpack ext type, or a map with a non-string key, is rejected: those
/// shapes are outside the set the redesign note fixes for `meta` and for
/// free-form body subfields.
pub fn from_rmpv(v: rmpv::Value, field: &'static str) -> Result<Value, DecodeError> {
    match v {
        rmpv::Value::Nil => Ok(Value::Nil),
        rmpv::Value::Boolean(b) => Ok(Value::Bool(b)),
        rmpv::Value::Integer(i) => i
            .as_i64()
            .map(Value::Int)
            .ok_or(DecodeError::FieldTypeMismatch {
                field,
                expected: "integer",
            }),
        rmpv::Value::F32(f) => Ok(Value::Float(f as f64)),
        rmpv::Value::F64(f) => Ok(Value::Float(f)),
        rmpv::Value::String(s) => s.into_str().map(Value::Str).ok_or(DecodeError::FieldTypeMismatch {
            field,
            expected: "utf-8 string",
        }),
        rmpv::Value::Binary(b) => Ok(Value::Bin(b)),
        rmpv::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_rmpv(item, field)?);
            }
            Ok(Value::Array(out))
        }
        rmpv::Value::Map(entries) => {
            let mut out = BTreeMap::new();
            for (k, v) in entries {
                let key = k.as_str().ok_or(DecodeError::FieldTypeMismatch {
                    field,
                    expected: "string-keyed map",
                })?;
                out.insert(key.to_owned(), from_rmpv(v, field)?);
            }
            Ok(Value::Map(out))
        }
        rmpv::Value::Ext(_, _) => Err(DecodeError::FieldTypeMismatch {
            field,
            expected: "non-ext value",
        }),
    }
}

/// Convert our [`Value`] into the `rmpv` tree for writing.
pub fn to_rmpv(v: &Value) -> rmpv::Value {
    match v {
        Value::Nil => rmpv::Value::Nil,
        Value::Bool(b) => rmpv::Value::Boolean(*b),
        Value::Int(i) => rmpv::Value::Integer((*i).into()),
        Value::Float(f) => rmpv::Value::F64(*f),
        Value::Str(s) => rmpv::Value::String(s.clone().into()),
        Value::Bin(b) => rmpv::Value::Binary(b.clone()),
        Value::Array(items) => rmpv::Value::Array(items.iter().map(to_rmpv).collect()),
        Value::Map(m) => rmpv::Value::Map(
            m.iter()
                .map(|(k, v)| (rmpv::Value::String(k.clone().into()), to_rmpv(v)))
                .collect(),
        ),
    }
}

/// Ordered field list for a fixed-arity body, as assembled by an encoder.
///
/// A `None` value is written as `Value::Nil`, preserving field-count
/// stability for optional fields per the encoding contract.
pub type FieldList<'a> = Vec<(&'static str, Value)>;

/// Build the `rmpv::Value::Map` for a body from its ordered field list.
pub fn encode_fields(fields: FieldList<'_>) -> rmpv::Value {
    rmpv::Value::Map(
        fields
            .into_iter()
            .map(|(k, v)| (rmpv::Value::String(k.into()), to_rmpv(&v)))
            .collect(),
    )
}

/// A body decoded down to a lookup table, with its wire arity recorded for
/// the "arity ≥ fixed field count" check each body performs before pulling
/// typed fields out.
pub struct FieldTable {
    arity: usize,
    fields: BTreeMap<String, Value>,
}

impl FieldTable {
    pub fn from_rmpv_map(entries: Vec<(rmpv::Value, rmpv::Value)>, context: &'static str) -> Result<Self, DecodeError> {
        let arity = entries.len();
        let mut fields = BTreeMap::new();
        for (k, v) in entries {
            let key = k.as_str().ok_or(DecodeError::FieldTypeMismatch {
                field: context,
                expected: "string-keyed map",
            })?;
            fields.insert(key.to_owned(), from_rmpv(v, context)?);
        }
        Ok(FieldTable { arity, fields })
    }

    /// Reject if the wire arity fell short of the catalogue's fixed field
    /// count for this body type.
    pub fn require_arity(&self, expected: usize, type_name: &'static str) -> Result<(), DecodeError> {
        if self.arity < expected {
            return Err(DecodeError::MalformedEnvelope(format!(
                "{type_name} body has {} fields, expected at least {expected}",
                self.arity
            )));
        }
        Ok(())
    }

    fn get(&self, field: &'static str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_nil())
    }

    pub fn required_str(&self, field: &'static str) -> Result<String, DecodeError> {
        self.get(field)
            .ok_or(DecodeError::MissingRequiredField(field))?
            .as_str()
            .map(str::to_owned)
            .ok_or(DecodeError::FieldTypeMismatch { field, expected: "string" })
    }

    pub fn optional_str(&self, field: &'static str) -> Result<Option<String>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_owned()))
                .ok_or(DecodeError::FieldTypeMismatch { field, expected: "string" }),
        }
    }

    pub fn required_bool(&self, field: &'static str) -> Result<bool, DecodeError> {
        match self.get(field) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "bool" }),
            None => Err(DecodeError::MissingRequiredField(field)),
        }
    }

    pub fn optional_bool(&self, field: &'static str) -> Result<Option<bool>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "bool" }),
        }
    }

    pub fn required_i64(&self, field: &'static str) -> Result<i64, DecodeError> {
        self.get(field)
            .ok_or(DecodeError::MissingRequiredField(field))?
            .as_i64()
            .ok_or(DecodeError::FieldTypeMismatch { field, expected: "integer" })
    }

    pub fn optional_i64(&self, field: &'static str) -> Result<Option<i64>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v.as_i64().map(Some).ok_or(DecodeError::FieldTypeMismatch {
                field,
                expected: "integer",
            }),
        }
    }

    fn to_i32(field: &'static str, i: i64) -> Result<i32, DecodeError> {
        i32::try_from(i).map_err(|_| DecodeError::IntegerOutOfRange { field, value: i })
    }

    pub fn required_i32(&self, field: &'static str) -> Result<i32, DecodeError> {
        Self::to_i32(field, self.required_i64(field)?)
    }

    pub fn optional_i32(&self, field: &'static str) -> Result<Option<i32>, DecodeError> {
        self.optional_i64(field)?.map(|i| Self::to_i32(field, i)).transpose()
    }

    pub fn required_f32(&self, field: &'static str) -> Result<f32, DecodeError> {
        match self.get(field) {
            Some(Value::Float(f)) => Ok(*f as f32),
            Some(Value::Int(i)) => Ok(*i as f32),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "float" }),
            None => Err(DecodeError::MissingRequiredField(field)),
        }
    }

    pub fn optional_f32(&self, field: &'static str) -> Result<Option<f32>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f as f32)),
            Some(Value::Int(i)) => Ok(Some(*i as f32)),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "float" }),
        }
    }

    pub fn required_bin(&self, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        match self.get(field) {
            Some(Value::Bin(b)) => Ok(b.clone()),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "binary" }),
            None => Err(DecodeError::MissingRequiredField(field)),
        }
    }

    pub fn optional_bin(&self, field: &'static str) -> Result<Option<Vec<u8>>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bin(b)) => Ok(Some(b.clone())),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "binary" }),
        }
    }

    pub fn required_value(&self, field: &'static str) -> Result<Value, DecodeError> {
        self.get(field).cloned().ok_or(DecodeError::MissingRequiredField(field))
    }

    pub fn optional_value(&self, field: &'static str) -> Result<Option<Value>, DecodeError> {
        Ok(self.get(field).cloned())
    }

    pub fn required_str_array(&self, field: &'static str) -> Result<Vec<String>, DecodeError> {
        match self.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_owned).ok_or(DecodeError::FieldTypeMismatch {
                    field,
                    expected: "string",
                }))
                .collect(),
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "array" }),
            None => Err(DecodeError::MissingRequiredField(field)),
        }
    }

    pub fn optional_str_array(&self, field: &'static str) -> Result<Option<Vec<String>>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for v in items {
                    out.push(v.as_str().map(str::to_owned).ok_or(DecodeError::FieldTypeMismatch {
                        field,
                        expected: "string",
                    })?);
                }
                Ok(Some(out))
            }
            Some(_) => Err(DecodeError::FieldTypeMismatch { field, expected: "array" }),
        }
    }
}

/// Serialise an `rmpv::Value` through the msgpack writer, mapping I/O
/// failures into [`EncodeError::Io`].
pub fn write_value(out: &mut Vec<u8>, v: &rmpv::Value) -> Result<(), EncodeError> {
    rmpv::encode::write_value(out, v).map_err(|e| EncodeError::Io(e.to_string()))
}

/// Parse one `rmpv::Value` off the front of `bytes`, mapping failures into
/// [`DecodeError::MalformedEnvelope`].
pub fn read_value(mut bytes: &[u8]) -> Result<rmpv::Value, DecodeError> {
    rmpv::decode::read_value(&mut bytes).map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))
}
