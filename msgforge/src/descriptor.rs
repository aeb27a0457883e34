//! Message descriptors consumed by the wire codecs.
//!
//! Generated code exposes one static [`MessageDescriptor`] per type. The
//! descriptor carries exactly the wire-relevant facts: the type id used in
//! envelopes and compact discriminators, the compact flag, and the ordered
//! field specs with their optional wire tags.

/// Wire-level description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name (unique within the type).
    pub name: &'static str,

    /// Wire tag, when declared. Positive and unique within the type.
    pub tag: Option<u32>,

    /// Whether the field may be absent from a payload.
    pub optional: bool,

    /// Whether the field admits an explicit null.
    pub nullable: bool,
}

impl FieldSpec {
    /// The key this field is written under in the tagged encoding: the
    /// stringified wire tag when one is declared, the field name otherwise.
    pub fn wire_key(&self) -> String {
        match self.tag {
            Some(tag) => tag.to_string(),
            None => self.name.to_string(),
        }
    }
}

/// Wire-level description of one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageDescriptor {
    /// Declared type name.
    pub type_name: &'static str,

    /// Identifier used in wire envelopes and compact discriminators.
    /// Equals `type_name` unless the schema declared an explicit override.
    pub type_id: &'static str,

    /// Content-addressed schema-version hash, `"sha256:<hex>"`.
    pub type_hash: &'static str,

    /// Whether the type uses the compact encoding.
    pub compact: bool,

    /// Fields in declaration order.
    pub fields: &'static [FieldSpec],
}

impl MessageDescriptor {
    /// Look up a field spec by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec {
            name: "x",
            tag: Some(1),
            optional: false,
            nullable: false,
        },
        FieldSpec {
            name: "label",
            tag: None,
            optional: true,
            nullable: false,
        },
    ];

    const DESC: MessageDescriptor = MessageDescriptor {
        type_name: "Point",
        type_id: "Point",
        type_hash: "sha256:0000",
        compact: false,
        fields: FIELDS,
    };

    #[test]
    fn test_wire_key_prefers_tag() {
        assert_eq!(FIELDS[0].wire_key(), "1");
        assert_eq!(FIELDS[1].wire_key(), "label");
    }

    #[test]
    fn test_field_lookup() {
        assert!(DESC.field("x").is_some());
        assert!(DESC.field("missing").is_none());
    }
}
