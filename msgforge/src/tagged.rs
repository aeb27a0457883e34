//! The tagged wire encoding.
//!
//! A tagged payload is a self-describing JSON envelope:
//!
//! ```json
//! {"$type": "Point", "fields": {"1": 1.5, "2": -2.0}}
//! ```
//!
//! Field keys are the stringified wire tag when the field declares one, and
//! the field name otherwise. Decoding accepts both keys for every field;
//! when a payload carries both the numeric-tag key and the name key for the
//! same logical field, the numeric-tag value wins. This is what makes a
//! field rename wire-compatible as long as its tag is preserved.

use crate::descriptor::{FieldSpec, MessageDescriptor};
use crate::error::DecodeError;
use crate::value::Value;

/// Key of the envelope's type discriminator.
pub const TYPE_KEY: &str = "$type";

/// Key of the envelope's field map.
pub const FIELDS_KEY: &str = "fields";

/// A decoded tagged envelope, not yet interpreted against a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEnvelope {
    /// The declared type id.
    pub type_id: String,

    /// Raw field map, keyed by wire tag or field name.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl TaggedEnvelope {
    /// Fetch the raw value for a field, honoring tag precedence: the
    /// numeric-tag key is consulted first, the field name second.
    pub fn field_value(&self, spec: &FieldSpec) -> Option<&serde_json::Value> {
        if let Some(tag) = spec.tag {
            if let Some(value) = self.fields.get(&tag.to_string()) {
                return Some(value);
            }
        }
        self.fields.get(spec.name)
    }
}

/// Encode a field map into the tagged envelope text.
///
/// `values` pairs each field spec with its current value; absent optional
/// fields are simply omitted by the caller.
pub fn encode(desc: &MessageDescriptor, values: &[(&FieldSpec, Value)]) -> String {
    let mut fields = serde_json::Map::new();
    for (spec, value) in values {
        fields.insert(spec.wire_key(), value.to_json());
    }

    let mut envelope = serde_json::Map::new();
    envelope.insert(
        TYPE_KEY.to_string(),
        serde_json::Value::String(desc.type_id.to_string()),
    );
    envelope.insert(FIELDS_KEY.to_string(), serde_json::Value::Object(fields));

    // A JSON object of strings and already-valid values cannot fail to
    // serialize.
    serde_json::to_string(&serde_json::Value::Object(envelope)).expect("envelope serialization")
}

/// Decode envelope text without interpreting the field map.
pub fn decode(text: &str) -> Result<TaggedEnvelope, DecodeError> {
    let json: serde_json::Value = serde_json::from_str(text)?;

    let object = match json {
        serde_json::Value::Object(object) => object,
        _ => return Err(DecodeError::MissingTypeId),
    };

    let type_id = match object.get(TYPE_KEY) {
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => return Err(DecodeError::MissingTypeId),
    };

    let fields = match object.get(FIELDS_KEY) {
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(DecodeError::wrong_type(FIELDS_KEY, "object"));
        }
        None => serde_json::Map::new(),
    };

    Ok(TaggedEnvelope { type_id, fields })
}

/// Decode envelope text and check the type id against a descriptor.
pub fn decode_for(desc: &MessageDescriptor, text: &str) -> Result<TaggedEnvelope, DecodeError> {
    let envelope = decode(text)?;
    if envelope.type_id != desc.type_id {
        return Err(DecodeError::type_mismatch(desc.type_id, envelope.type_id));
    }
    Ok(envelope)
}

/// Peek at the type id of envelope text without a full field decode.
///
/// Returns `None` for payloads that are not tagged envelopes; used by
/// `is_instance` checks and union discrimination.
pub fn peek_type_id(text: &str) -> Option<String> {
    decode(text).ok().map(|envelope| envelope.type_id)
}
