//! Accessors for the loosely-shaped rule documents.
//!
//! Rule files are parsed into a generic `serde_yaml::Value` tree since every
//! field is optional. The helpers here read the handful of known fields:
//! `Core.Id`, `Rule Type`, `Check`, and `Operations`.
//!
//! `parse_document` loads text into that tree. Unlike `serde_yaml::Value`'s
//! own `Deserialize`, a repeated mapping key does not fail the load; the last
//! occurrence wins.

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Sequence, Value};
use std::fmt;

pub const UNKNOWN_RULE_TYPE: &str = "Unknown";

/// Shape of a document's `Check` field.
#[derive(Debug, Clone, Copy)]
pub enum CheckSection<'a> {
    /// Mapping of named lists of check items.
    Grouped(&'a Mapping),
    /// Flat list of check items.
    Flat(&'a Sequence),
    /// Absent, or any other value; yields no items.
    Other,
}

impl<'a> CheckSection<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Mapping(m)) => CheckSection::Grouped(m),
            Some(Value::Sequence(s)) => CheckSection::Flat(s),
            _ => CheckSection::Other,
        }
    }

    /// Check items in document order. Non-list values of a grouped section are ignored.
    pub fn items(self) -> Vec<&'a Value> {
        match self {
            CheckSection::Grouped(m) => m
                .values()
                .filter_map(Value::as_sequence)
                .flatten()
                .collect(),
            CheckSection::Flat(s) => s.iter().collect(),
            CheckSection::Other => Vec::new(),
        }
    }
}

/// Render a scalar as text. Nulls and collections yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(t) => scalar_text(&t.value),
        _ => None,
    }
}

/// Like `scalar_text`, but falsy scalars (`''`, `0`, `false`) count as absent.
pub fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Bool(false) => None,
        Value::Tagged(t) => truthy_text(&t.value),
        other => scalar_text(other),
    }
}

/// `Core.Id`, if the document is a mapping carrying a truthy identifier.
pub fn core_id(doc: &Value) -> Option<String> {
    doc.get("Core")?.get("Id").and_then(truthy_text)
}

/// `Rule Type`, falling back to `Unknown` when missing, null, or not a scalar.
/// An empty string is kept as is.
pub fn rule_type(doc: &Value) -> String {
    doc.get("Rule Type")
        .and_then(scalar_text)
        .unwrap_or_else(|| UNKNOWN_RULE_TYPE.to_string())
}

pub fn check_section(doc: &Value) -> CheckSection<'_> {
    CheckSection::classify(doc.get("Check"))
}

/// Items of `Operations`; empty when absent or not a list.
pub fn operations(doc: &Value) -> &[Value] {
    match doc.get("Operations") {
        Some(Value::Sequence(s)) => s.as_slice(),
        _ => &[],
    }
}

/// The `operator` of a check/operation item. Items that are not mappings have none.
pub fn item_operator(item: &Value) -> Option<String> {
    item.as_mapping()?.get("operator").and_then(truthy_text)
}

/// Parse one YAML document into a `Value`, keeping the last of any repeated key.
pub fn parse_document(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str::<LastWins>(text).map(|v| v.0)
}

struct LastWins(Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LastWinsVisitor)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = LastWins;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<LastWins, E> {
        Ok(LastWins(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LastWins, E> {
        Ok(LastWins(Value::Number(Number::from(v))))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LastWins, E> {
        Ok(LastWins(Value::Number(Number::from(v))))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LastWins, E> {
        Ok(LastWins(Value::Number(Number::from(v))))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LastWins, E> {
        Ok(LastWins(Value::String(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<LastWins, E> {
        Ok(LastWins(Value::String(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<LastWins, E> {
        Ok(LastWins(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<LastWins, E> {
        Ok(LastWins(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<LastWins, D::Error> {
        LastWins::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LastWins, A::Error> {
        let mut items = Sequence::new();
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(LastWins(Value::Sequence(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LastWins, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((LastWins(k), LastWins(v))) = map.next_entry()? {
            mapping.insert(k, v);
        }
        Ok(LastWins(Value::Mapping(mapping)))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<LastWins, A::Error> {
        let (tag, contents): (String, _) = data.variant()?;
        let LastWins(value) = contents.newtype_variant()?;
        if tag.trim_start_matches('!').is_empty() {
            return Ok(LastWins(value));
        }
        Ok(LastWins(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        }))))
    }
}
