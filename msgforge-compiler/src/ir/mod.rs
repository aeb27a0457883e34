//! Canonical intermediate representation.
//!
//! Both front ends — the schema-file parser and the annotation scanner —
//! lower their input into the types defined here. Everything downstream
//! (validator resolution, type hashing, code generation) reads this model
//! and nothing else, which is what makes the two front ends interchangeable.

mod field;
mod schema;
mod shape;

pub use field::{FieldDescriptor, ValidatorArg, ValidatorRef};
pub use schema::{CanonicalSchema, ExtendInfo, TypeParameter, WrapperKind};
pub use shape::{MapKeyKind, PrimitiveKind, TypeShape};
