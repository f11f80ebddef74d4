//! Dynamic element values for cast and type-filter operators.
//!
//! A `Seq<Value>` carries mixed element types; `cast::<T>()` and
//! `of_type::<T>()` narrow it to a typed sequence through [`FromValue`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Value {
    /// Stable tag name, reported in `TypeMismatch` errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Bin(_) => "bin",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Conversion out of a dynamic [`Value`].
///
/// Exact tag matches always succeed; lossless widening (`i32 -> i64`,
/// `f32 -> f64`) is accepted as well. Everything else is a `TypeMismatch`.
pub trait FromValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T: FromValue>(value: &Value) -> SeqError {
    SeqError::TypeMismatch {
        expected: T::TYPE_NAME,
        found: value.type_name(),
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I32(i) => Ok(i),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(i) => Ok(i),
            Value::I32(i) => Ok(i as i64),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F32(f) => Ok(f),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(f) => Ok(f),
            Value::F32(f) => Ok(f as f64),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "str";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Vec<u8> {
    const TYPE_NAME: &'static str = "bin";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bin(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value!(bool => Bool, i32 => I32, i64 => I64, f32 => F32, f64 => F64, String => Str, Vec<u8> => Bin);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
