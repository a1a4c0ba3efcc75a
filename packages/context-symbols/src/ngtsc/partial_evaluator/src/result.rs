// Result Types
//
// Value trees produced by partial evaluation.

use super::dynamic::{DynamicReason, DynamicValue};
use crate::ngtsc::imports::Reference;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use ts::Expression;

/// A deferred type reference: `forwardRef(() => expression)` seen from `context_file`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRef {
    pub expression: Expression,
    pub context_file: String,
}

impl Serialize for ForwardRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("forwardRef", &self.expression.to_string())?;
        map.end()
    }
}

/// Statically evaluated metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Array(Vec<MetadataValue>),
    Object(IndexMap<String, MetadataValue>),
    Reference(Reference),
    ForwardRef(ForwardRef),
    Unresolvable(DynamicValue),
}

impl MetadataValue {
    pub fn unresolvable(reason: DynamicReason, detail: impl Into<String>) -> Self {
        MetadataValue::Unresolvable(DynamicValue::new(reason, detail))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[MetadataValue]> {
        match self {
            MetadataValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, MetadataValue>> {
        match self {
            MetadataValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            MetadataValue::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&MetadataValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn is_unresolvable(&self) -> bool {
        matches!(self, MetadataValue::Unresolvable(_))
    }

    /// Every unresolvable leaf of this tree, depth first.
    pub fn unresolvable_leaves(&self) -> Vec<&DynamicValue> {
        let mut out = Vec::new();
        self.collect_unresolvable(&mut out);
        out
    }

    fn collect_unresolvable<'v>(&'v self, out: &mut Vec<&'v DynamicValue>) {
        match self {
            MetadataValue::Unresolvable(dynamic) => out.push(dynamic),
            MetadataValue::Array(items) => items.iter().for_each(|item| item.collect_unresolvable(out)),
            MetadataValue::Object(map) => map.values().for_each(|item| item.collect_unresolvable(out)),
            _ => {}
        }
    }

    /// Nested arrays flattened into one sequence, in order.
    pub fn flatten(&self) -> Vec<&MetadataValue> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'v>(&'v self, out: &mut Vec<&'v MetadataValue>) {
        match self {
            MetadataValue::Array(items) => items.iter().for_each(|item| item.flatten_into(out)),
            other => out.push(other),
        }
    }

    /// JavaScript truthiness of a literal value; `None` for non-literals.
    pub fn is_truthy(&self) -> Option<bool> {
        match self {
            MetadataValue::String(s) => Some(!s.is_empty()),
            MetadataValue::Number(n) => Some(*n != 0.0 && !n.is_nan()),
            MetadataValue::Boolean(b) => Some(*b),
            MetadataValue::Null => Some(false),
            MetadataValue::Array(_) | MetadataValue::Object(_) | MetadataValue::Reference(_) => {
                Some(true)
            }
            MetadataValue::ForwardRef(_) | MetadataValue::Unresolvable(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<Reference> for MetadataValue {
    fn from(value: Reference) -> Self {
        MetadataValue::Reference(value)
    }
}
