// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Value conversion contract and the standard coercion rules

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use super::schema::ObjectModel;
use super::types::TypeInfo;
use super::value::Value;

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Errors that can occur during value conversion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// No conversion exists between the two types
    #[error("no conversion from {from} to {to}")]
    IncompatibleTypes {
        /// Source type
        from: String,
        /// Target type
        to: String,
    },

    /// The value format is invalid for the target type
    #[error("invalid format '{value}' for type {target_type}")]
    InvalidFormat {
        /// Offending value
        value: String,
        /// Target type
        target_type: String,
    },
}

/// Coerces values to a requested type
pub trait ValueConverter: Send + Sync {
    /// Convert `value` to `target`, or report that no conversion exists
    fn convert(&self, value: Value, target: &TypeInfo) -> ConversionResult<Value>;
}

/// Standard coercions between primitive values
///
/// `Null` converts to `Null` for every target and `Any` accepts everything.
/// Object targets require an instance of the same class, or of a subclass
/// when the converter was built with an [`ObjectModel`].
#[derive(Debug, Default, Clone)]
pub struct StandardConverter {
    model: Option<Arc<ObjectModel>>,
}

impl StandardConverter {
    /// Converter without class hierarchy knowledge
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter that accepts subclasses known to `model`
    pub fn with_model(model: Arc<ObjectModel>) -> Self {
        Self { model: Some(model) }
    }

    fn incompatible(value: &Value, target: &str) -> ConversionError {
        ConversionError::IncompatibleTypes {
            from: value.type_name(),
            to: target.to_string(),
        }
    }

    fn invalid(value: &str, target: &str) -> ConversionError {
        ConversionError::InvalidFormat {
            value: value.to_string(),
            target_type: target.to_string(),
        }
    }

    /// Coerce value to boolean
    pub fn to_boolean(value: Value) -> ConversionResult<Value> {
        match value {
            Value::Boolean(b) => Ok(Value::Boolean(b)),
            Value::Integer(i) => Ok(Value::Boolean(i != 0)),
            Value::Decimal(d) => Ok(Value::Boolean(!d.is_zero())),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Ok(Value::Boolean(true)),
                "false" | "f" | "no" | "n" | "0" => Ok(Value::Boolean(false)),
                _ => Err(Self::invalid(&s, "Boolean")),
            },
            other => Err(Self::incompatible(&other, "Boolean")),
        }
    }

    /// Coerce value to integer
    pub fn to_integer(value: Value) -> ConversionResult<Value> {
        match value {
            Value::Integer(i) => Ok(Value::Integer(i)),
            Value::Decimal(d) => {
                if d.fract().is_zero() {
                    d.to_i64()
                        .map(Value::Integer)
                        .ok_or_else(|| Self::invalid(&d.to_string(), "Integer"))
                } else {
                    Err(Self::invalid(&d.to_string(), "Integer"))
                }
            }
            Value::Boolean(b) => Ok(Value::Integer(i64::from(b))),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Self::invalid(&s, "Integer")),
            other => Err(Self::incompatible(&other, "Integer")),
        }
    }

    /// Coerce value to decimal
    pub fn to_decimal(value: Value) -> ConversionResult<Value> {
        match value {
            Value::Decimal(d) => Ok(Value::Decimal(d)),
            Value::Integer(i) => Ok(Value::Decimal(Decimal::from(i))),
            Value::Boolean(b) => Ok(Value::Decimal(if b { Decimal::ONE } else { Decimal::ZERO })),
            Value::String(s) => Decimal::from_str(s.trim())
                .map(Value::Decimal)
                .map_err(|_| Self::invalid(&s, "Decimal")),
            other => Err(Self::incompatible(&other, "Decimal")),
        }
    }

    /// Coerce value to string
    pub fn to_string_value(value: Value) -> ConversionResult<Value> {
        match value {
            Value::String(s) => Ok(Value::String(s)),
            scalar @ (Value::Boolean(_)
            | Value::Integer(_)
            | Value::Decimal(_)
            | Value::Date(_)
            | Value::DateTime(_)
            | Value::Time(_)) => Ok(Value::String(scalar.to_string())),
            other => Err(Self::incompatible(&other, "String")),
        }
    }

    /// Coerce value to date
    pub fn to_date(value: Value) -> ConversionResult<Value> {
        match value {
            Value::Date(d) => Ok(Value::Date(d)),
            Value::DateTime(dt) => Ok(Value::Date(dt.date_naive())),
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| Self::invalid(&s, "Date")),
            other => Err(Self::incompatible(&other, "Date")),
        }
    }

    /// Coerce value to datetime
    pub fn to_datetime(value: Value) -> ConversionResult<Value> {
        match value {
            Value::DateTime(dt) => Ok(Value::DateTime(dt)),
            Value::Date(d) => {
                let utc = FixedOffset::east_opt(0).ok_or_else(|| Self::invalid("+00:00", "DateTime"))?;
                d.and_hms_opt(0, 0, 0)
                    .and_then(|naive| naive.and_local_timezone(utc).single())
                    .map(Value::DateTime)
                    .ok_or_else(|| Self::invalid(&d.to_string(), "DateTime"))
            }
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(Value::DateTime)
                .map_err(|_| Self::invalid(&s, "DateTime")),
            other => Err(Self::incompatible(&other, "DateTime")),
        }
    }

    /// Coerce value to time
    pub fn to_time(value: Value) -> ConversionResult<Value> {
        match value {
            Value::Time(t) => Ok(Value::Time(t)),
            Value::String(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f"))
                .map(Value::Time)
                .map_err(|_| Self::invalid(&s, "Time")),
            other => Err(Self::incompatible(&other, "Time")),
        }
    }

    fn to_object(&self, value: Value, class: &str) -> ConversionResult<Value> {
        let accepted = match &value {
            Value::Object(obj) => {
                let actual = obj.class();
                &*actual == class
                    || self
                        .model
                        .as_ref()
                        .is_some_and(|model| model.is_subclass_of(&actual, class))
            }
            _ => false,
        };

        if accepted {
            Ok(value)
        } else {
            Err(Self::incompatible(&value, class))
        }
    }
}

impl ValueConverter for StandardConverter {
    fn convert(&self, value: Value, target: &TypeInfo) -> ConversionResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match target {
            TypeInfo::Any => Ok(value),
            TypeInfo::Boolean => Self::to_boolean(value),
            TypeInfo::Integer => Self::to_integer(value),
            TypeInfo::Decimal => Self::to_decimal(value),
            TypeInfo::String => Self::to_string_value(value),
            TypeInfo::Date => Self::to_date(value),
            TypeInfo::DateTime => Self::to_datetime(value),
            TypeInfo::Time => Self::to_time(value),
            TypeInfo::List(_) => match value {
                Value::List(_) => Ok(value),
                other => Err(Self::incompatible(&other, &target.type_name())),
            },
            TypeInfo::Map(_) => match value {
                Value::Map(_) => Ok(value),
                other => Err(Self::incompatible(&other, &target.type_name())),
            },
            TypeInfo::Object(class) => self.to_object(value, class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::Object;

    #[test]
    fn test_string_to_integer() {
        let converter = StandardConverter::new();
        assert_eq!(
            converter.convert(Value::from("42"), &TypeInfo::Integer),
            Ok(Value::Integer(42))
        );
        assert!(matches!(
            converter.convert(Value::from("4.2"), &TypeInfo::Integer),
            Err(ConversionError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_string_to_date_rejects_numbers() {
        let converter = StandardConverter::new();
        assert!(converter.convert(Value::from("42"), &TypeInfo::Date).is_err());
        assert_eq!(
            converter.convert(Value::from("2024-02-29"), &TypeInfo::Date),
            Ok(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
    }

    #[test]
    fn test_null_converts_to_anything() {
        let converter = StandardConverter::new();
        assert_eq!(
            converter.convert(Value::Null, &TypeInfo::Time),
            Ok(Value::Null)
        );
    }

    #[test]
    fn test_scalars_to_string() {
        let converter = StandardConverter::new();
        assert_eq!(
            converter.convert(Value::Integer(7), &TypeInfo::String),
            Ok(Value::from("7"))
        );
        assert_eq!(
            converter.convert(Value::Boolean(true), &TypeInfo::String),
            Ok(Value::from("true"))
        );
    }

    #[test]
    fn test_object_class_check() {
        let converter = StandardConverter::new();
        let address = Value::object(Object::new("Address"));

        assert!(
            converter
                .convert(address.clone(), &TypeInfo::object("Address"))
                .is_ok()
        );
        assert!(matches!(
            converter.convert(address, &TypeInfo::object("Person")),
            Err(ConversionError::IncompatibleTypes { .. })
        ));
    }
}
