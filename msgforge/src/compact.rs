//! The compact wire encoding.
//!
//! A compact-capable type reduces to one logical value; its payload is that
//! value's canonical string rendering. Standing alone, the payload is the
//! bare string. Embedded inside a union or tagged context, the payload
//! carries a `<type-id>~` discriminator prefix so decoding can select the
//! concrete type without structural parsing. Type ids cannot contain `~`,
//! so the discriminator is everything before the first `~`.

use crate::error::DecodeError;

/// Separator between the discriminator prefix and the payload.
pub const DISCRIMINATOR: char = '~';

/// Encode a standalone compact payload.
pub fn encode(payload: &str) -> String {
    payload.to_string()
}

/// Encode a compact payload for an embedded (union or tagged) context.
pub fn encode_embedded(type_id: &str, payload: &str) -> String {
    debug_assert!(
        !type_id.contains(DISCRIMINATOR),
        "type ids cannot contain the discriminator separator"
    );
    format!("{}{}{}", type_id, DISCRIMINATOR, payload)
}

/// Decode a standalone compact payload.
pub fn decode(text: &str) -> &str {
    text
}

/// Split an embedded compact payload into discriminator and payload.
pub fn decode_embedded(text: &str) -> Result<(&str, &str), DecodeError> {
    match text.split_once(DISCRIMINATOR) {
        Some((type_id, payload)) => Ok((type_id, payload)),
        None => Err(DecodeError::MissingDiscriminator),
    }
}

/// Read the discriminator of an embedded payload, if one is present.
pub fn peek_discriminator(text: &str) -> Option<&str> {
    text.split_once(DISCRIMINATOR).map(|(type_id, _)| type_id)
}
