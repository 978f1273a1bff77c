//! JSON conversion for records.
//!
//! Records cross process boundaries as JSON objects; integers survive the
//! round trip exactly, floats map to JSON numbers.

use crate::core::{OrmError, Record, Result, Value};
use serde_json::{Map, Number};

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
    }
}

pub fn value_from_json(value: &serde_json::Value) -> Result<Value> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(OrmError::TypeMismatch(format!(
                    "JSON number {n} does not fit a storage type"
                )))
            }
        }
        serde_json::Value::String(s) => Ok(Value::text(s.clone())),
        other => Err(OrmError::TypeMismatch(format!(
            "JSON {} cannot become a field value",
            match other {
                serde_json::Value::Array(_) => "array",
                _ => "object",
            }
        ))),
    }
}

pub fn record_to_json(record: &Record) -> serde_json::Value {
    let mut object = Map::new();
    for (field, value) in record {
        object.insert(field.clone(), value_to_json(value));
    }
    serde_json::Value::Object(object)
}

pub fn record_from_json(json: &serde_json::Value) -> Result<Record> {
    let object = json.as_object().ok_or_else(|| {
        OrmError::TypeMismatch("a record must be a JSON object".to_string())
    })?;
    let mut record = Record::new();
    for (field, value) in object {
        record.insert(field.clone(), value_from_json(value)?);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_json() {
        let mut record = Record::new();
        record.insert("id".into(), Value::Integer(2));
        record.insert("content".into(), Value::text("content 2"));
        record.insert("archived".into(), Value::Boolean(false));
        record.insert("note".into(), Value::Null);

        let json = record_to_json(&record);
        assert_eq!(json["id"], serde_json::json!(2));
        assert_eq!(record_from_json(&json).unwrap(), record);
    }

    #[test]
    fn nested_json_is_rejected() {
        let json = serde_json::json!({"content": {"nested": true}});
        let err = record_from_json(&json).unwrap_err();
        assert!(matches!(err, OrmError::TypeMismatch(_)));
    }
}
