//! Content-addressed type hashing.
//!
//! The hash folds exactly the wire-relevant facts of a schema, in a fixed
//! order: type name, wrapper kind, compact flag, then every field in
//! declared order as (name, wire tag or an explicit untagged marker,
//! canonical type-shape). Nested and union members contribute their names,
//! never their bodies. Nothing else — comments, whitespace, sibling
//! declaration order, file paths — is an input, so two schemas hash equal
//! if and only if they are wire-equivalent.

use sha2::{Digest, Sha256};

use crate::ir::{FieldDescriptor, WrapperKind};

/// Hash algorithm prefix in the rendered form.
pub const ALGORITHM: &str = "sha256";

/// Compute the content hash for a schema's wire-relevant facts.
///
/// Rendered as `"sha256:<64 lowercase hex>"`.
pub fn compute(
    name: &str,
    wrapper: &WrapperKind,
    compact: bool,
    fields: &[FieldDescriptor],
) -> String {
    let mut hasher = Sha256::new();

    feed(&mut hasher, "name", name);
    feed(&mut hasher, "wrapper", &wrapper.canonical());
    feed(&mut hasher, "compact", if compact { "true" } else { "false" });

    for field in fields {
        feed(&mut hasher, "field", &field.name);
        match field.tag {
            Some(tag) => feed(&mut hasher, "tag", &tag.to_string()),
            None => feed(&mut hasher, "tag", "untagged"),
        }
        feed(&mut hasher, "shape", &field.shape.canonical());
    }

    let digest = hasher.finalize();
    let mut rendered = String::with_capacity(ALGORITHM.len() + 1 + digest.len() * 2);
    rendered.push_str(ALGORITHM);
    rendered.push(':');
    for byte in digest {
        use std::fmt::Write;
        write!(rendered, "{:02x}", byte).expect("writing to a String");
    }
    rendered
}

/// Feed one labeled component, length-prefixed so adjacent components can
/// never collide by concatenation.
fn feed(hasher: &mut Sha256, label: &str, value: &str) {
    hasher.update(label.as_bytes());
    hasher.update(b"\0");
    hasher.update(value.len().to_le_bytes());
    hasher.update(value.as_bytes());
}
