//! The contract implemented by every generated message type.

use crate::descriptor::MessageDescriptor;
use crate::error::{DecodeError, ValidationIssues};
use crate::value::Value;

/// Behavior shared by all generated message types.
///
/// Generated types are immutable value objects: construction validates,
/// every setter produces a new instance, and the per-type default instance
/// is created once behind a `OnceLock` (first caller wins, safe under
/// concurrent first use).
pub trait Message: Clone + std::fmt::Debug + PartialEq {
    /// Declared type name.
    const TYPE_NAME: &'static str;

    /// Content-addressed schema hash, `"sha256:<hex>"`.
    const TYPE_HASH: &'static str;

    /// Wire-level descriptor.
    fn descriptor() -> &'static MessageDescriptor;

    /// The cached default/empty instance.
    fn default_instance() -> &'static Self
    where
        Self: Sized + 'static;

    /// Encode into the tagged wire form.
    fn serialize(&self) -> String;

    /// Decode from the tagged wire form.
    fn deserialize(text: &str) -> Result<Self, DecodeError>
    where
        Self: Sized;

    /// Structural hash, cached after first computation.
    fn hash_code(&self) -> u64;

    /// Whether the wire text is a payload of this type.
    fn is_instance(text: &str) -> bool
    where
        Self: Sized,
    {
        crate::tagged::peek_type_id(text).as_deref() == Some(Self::descriptor().type_id)
    }

    /// Validate an untyped value against this type's schema, collecting
    /// every violation instead of failing on the first.
    fn validate_all(data: &Value) -> ValidationIssues
    where
        Self: Sized;
}

/// Additional contract for compact-capable types.
pub trait CompactMessage: Message {
    /// Render the single logical value as the compact payload.
    fn to_compact(&self) -> String;

    /// Parse a standalone compact payload.
    fn from_compact(text: &str) -> Result<Self, DecodeError>
    where
        Self: Sized;

    /// Render with the discriminator prefix for embedded contexts.
    fn to_compact_embedded(&self) -> String {
        crate::compact::encode_embedded(Self::descriptor().type_id, &self.to_compact())
    }

    /// Parse an embedded compact payload, checking the discriminator.
    fn from_compact_embedded(text: &str) -> Result<Self, DecodeError>
    where
        Self: Sized,
    {
        let (type_id, payload) = crate::compact::decode_embedded(text)?;
        if type_id != Self::descriptor().type_id {
            return Err(DecodeError::type_mismatch(Self::descriptor().type_id, type_id));
        }
        Self::from_compact(payload)
    }
}
