// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Conversions between DynamoDB items and JSON documents.
//!
//! Items are stored and copied as DynamoDB attribute values. JSON is only
//! produced for response bodies, where sets become arrays and binary values
//! become base64 strings. Numbers that JSON cannot carry exactly are refused
//! rather than rounded.

use crate::error::{MockExamError, Result};
use crate::store::Record;
use rusoto_dynamodb::AttributeValue;
use serde_json::{Map, Number, Value};

/// Significant decimal digits an `f64` always round-trips.
const EXACT_FLOAT_DIGITS: usize = 15;

/// Converts a DynamoDB item to a JSON object.
pub fn record_to_json(record: Record) -> Result<Map<String, Value>> {
    record
        .into_iter()
        .map(|(name, value)| attribute_to_json(value).map(|v| (name, v)))
        .collect()
}

/// Converts a JSON object to a DynamoDB item.
pub fn json_to_record(object: Map<String, Value>) -> Result<Record> {
    object
        .into_iter()
        .map(|(name, value)| json_to_attribute(value).map(|v| (name, v)))
        .collect()
}

/// Converts a single attribute value to JSON.
pub fn attribute_to_json(value: AttributeValue) -> Result<Value> {
    if let Some(s) = value.s {
        return Ok(Value::String(s));
    }
    if let Some(n) = value.n {
        return parse_number(&n);
    }
    if let Some(b) = value.bool {
        return Ok(Value::Bool(b));
    }
    if let Some(true) = value.null {
        return Ok(Value::Null);
    }
    if let Some(l) = value.l {
        return l
            .into_iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array);
    }
    if let Some(m) = value.m {
        return record_to_json(m).map(Value::Object);
    }
    if let Some(ss) = value.ss {
        return Ok(Value::Array(ss.into_iter().map(Value::String).collect()));
    }
    if let Some(ns) = value.ns {
        return ns
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array);
    }
    if let Some(b) = value.b {
        return Ok(Value::String(base64::encode(&b)));
    }
    if let Some(bs) = value.bs {
        return Ok(Value::Array(
            bs.iter().map(|b| Value::String(base64::encode(b))).collect(),
        ));
    }
    Err(MockExamError::Serialization(
        "attribute value has no type descriptor".to_owned(),
    ))
}

/// Converts a JSON value to a single attribute value.
pub fn json_to_attribute(value: Value) -> Result<AttributeValue> {
    Ok(match value {
        Value::Null => AttributeValue {
            null: Some(true),
            ..Default::default()
        },
        Value::Bool(b) => AttributeValue {
            bool: Some(b),
            ..Default::default()
        },
        Value::Number(n) => AttributeValue {
            n: Some(n.to_string()),
            ..Default::default()
        },
        Value::String(s) => AttributeValue {
            s: Some(s),
            ..Default::default()
        },
        Value::Array(l) => AttributeValue {
            l: Some(
                l.into_iter()
                    .map(json_to_attribute)
                    .collect::<Result<Vec<_>>>()?,
            ),
            ..Default::default()
        },
        Value::Object(m) => AttributeValue {
            m: Some(json_to_record(m)?),
            ..Default::default()
        },
    })
}

fn parse_number(n: &str) -> Result<Value> {
    let n = n.trim();
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Value::from(u));
    }
    let f = n
        .parse::<f64>()
        .map_err(|e| MockExamError::Serialization(format!("number {:?}: {}", n, e)))?;
    if significant_digits(n) > EXACT_FLOAT_DIGITS {
        return Err(MockExamError::Serialization(format!(
            "number {} cannot be represented exactly in JSON",
            n
        )));
    }
    Number::from_f64(f).map(Value::Number).ok_or_else(|| {
        MockExamError::Serialization(format!("number {} is not finite", n))
    })
}

fn significant_digits(n: &str) -> usize {
    let mantissa = n.split(|c: char| c == 'e' || c == 'E').next().unwrap_or_default();
    let digits = mantissa
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::string_attribute as s;
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn question_record_to_json() -> Result<()> {
        let mut options = Record::new();
        options.insert("a".to_owned(), s("Paris"));
        options.insert("b".to_owned(), s("Rome"));

        let mut record = Record::new();
        record.insert("text".to_owned(), s("Which city is the capital of France?"));
        record.insert(
            "points".to_owned(),
            AttributeValue {
                n: Some("2.5".to_owned()),
                ..Default::default()
            },
        );
        record.insert(
            "options".to_owned(),
            AttributeValue {
                m: Some(options),
                ..Default::default()
            },
        );
        record.insert(
            "tags".to_owned(),
            AttributeValue {
                ss: Some(vec!["geo".to_owned(), "easy".to_owned()]),
                ..Default::default()
            },
        );
        record.insert(
            "audio".to_owned(),
            AttributeValue {
                null: Some(true),
                ..Default::default()
            },
        );
        record.insert(
            "timed".to_owned(),
            AttributeValue {
                bool: Some(false),
                ..Default::default()
            },
        );

        assert_eq!(
            Value::Object(record_to_json(record)?),
            json!({
                "text": "Which city is the capital of France?",
                "points": 2.5,
                "options": { "a": "Paris", "b": "Rome" },
                "tags": ["geo", "easy"],
                "audio": null,
                "timed": false,
            })
        );
        Ok(())
    }

    #[test]
    fn numbers() -> Result<()> {
        let n = |v: &str| AttributeValue {
            n: Some(v.to_owned()),
            ..Default::default()
        };
        assert_eq!(json!(-7), attribute_to_json(n("-7"))?);
        assert_eq!(
            json!(u64::MAX),
            attribute_to_json(n("18446744073709551615"))?
        );
        assert_eq!(json!(0.001), attribute_to_json(n("1e-3"))?);
        assert_eq!(json!(120.5), attribute_to_json(n("120.50000"))?);

        for unsafe_number in ["12345678901234567890123", "3.14159265358979323846", "1e400"] {
            assert!(matches!(
                attribute_to_json(n(unsafe_number)),
                Err(MockExamError::Serialization(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn index_list_to_json() -> Result<()> {
        let index = AttributeValue {
            l: Some(vec![s("q1"), s("q2"), s("q3")]),
            ..Default::default()
        };
        assert_eq!(json!(["q1", "q2", "q3"]), attribute_to_json(index)?);

        let numbers = AttributeValue {
            ns: Some(vec!["1".to_owned(), " 42 ".to_owned()]),
            ..Default::default()
        };
        assert_eq!(json!([1, 42]), attribute_to_json(numbers)?);
        Ok(())
    }

    #[test]
    fn binary_as_base64() -> Result<()> {
        let value = AttributeValue {
            b: Some(Bytes::from_static(b"hello")),
            ..Default::default()
        };
        assert_eq!(json!("aGVsbG8="), attribute_to_json(value)?);
        Ok(())
    }

    #[test]
    fn invalid_attribute_values() {
        assert!(matches!(
            attribute_to_json(AttributeValue::default()),
            Err(MockExamError::Serialization(_))
        ));
        assert!(matches!(
            attribute_to_json(AttributeValue {
                n: Some("twelve".to_owned()),
                ..Default::default()
            }),
            Err(MockExamError::Serialization(_))
        ));
    }

    #[test]
    fn json_to_item() -> Result<()> {
        let object = json!({
            "PK": "reading",
            "SK": "q1",
            "text": "Describe a place you visited.",
            "duration": 120,
            "cues": ["where", "when"],
            "meta": { "level": null },
        });
        let record = match object {
            Value::Object(m) => json_to_record(m)?,
            _ => unreachable!(),
        };

        assert_eq!(Some(&s("reading")), record.get("PK"));
        assert_eq!(Some("120"), record["duration"].n.as_deref());
        assert_eq!(2, record["cues"].l.as_ref().unwrap().len());
        assert_eq!(
            Some(true),
            record["meta"].m.as_ref().unwrap()["level"].null
        );
        Ok(())
    }
}
