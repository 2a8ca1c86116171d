//! Schema derivation from sample payloads.

use super::{union_fields, StructureNode};
use serde_json::{Map, Value};

pub(super) fn derive_nodes(sample: &Map<String, Value>) -> Vec<StructureNode> {
    sample
        .iter()
        .map(|(key, value)| match value {
            Value::Array(items) => StructureNode::each(key.as_str(), derive_nodes(&union_fields(items))),
            Value::Object(fields) => StructureNode::nested(key.as_str(), derive_nodes(fields)),
            _ => StructureNode::key(key.as_str()),
        })
        .collect()
}
