use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::{format_value, KeyValue, RuntimeError, Value};

impl Value {
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Unit,
            JsonValue::Bool(value) => Value::Bool(*value),
            JsonValue::Number(number) => match number.as_i64() {
                Some(value) => Value::Int(value),
                None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(text) => Value::Text(text.clone()),
            JsonValue::Array(items) => Value::list(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(fields) => Value::map(
                fields
                    .iter()
                    .map(|(key, value)| (KeyValue::Text(key.clone()), Value::from_json(value))),
            ),
        }
    }

    pub fn to_json(&self) -> Result<JsonValue, RuntimeError> {
        match self {
            Value::Unit => Ok(JsonValue::Null),
            Value::Bool(value) => Ok(JsonValue::Bool(*value)),
            Value::Int(value) => Ok(JsonValue::Number((*value).into())),
            Value::Float(value) => Number::from_f64(*value)
                .map(JsonValue::Number)
                .ok_or_else(|| RuntimeError::type_mismatch("to_json", "a finite Float", self)),
            Value::Text(text) => Ok(JsonValue::String(text.clone())),
            Value::List(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Value::Tuple(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Value::Map(map) => {
                let mut fields = JsonMap::new();
                for (key, value) in map.iter() {
                    let name = match key {
                        KeyValue::Text(text) => text.clone(),
                        other => format_value(&other.to_value()),
                    };
                    fields.insert(name, value.to_json()?);
                }
                Ok(JsonValue::Object(fields))
            }
            other => Err(RuntimeError::type_mismatch("to_json", "plain data", other)),
        }
    }
}
