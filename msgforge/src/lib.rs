//! # msgforge
//!
//! Runtime support for message types generated by `msgforge-compiler`.
//!
//! Generated code is deliberately thin: the behavioral contract of every
//! generated type — the dynamic value model, both wire codecs, validation
//! error shapes, and the no-op-preserving copy-on-write collection
//! operations — lives here, implemented once and tested directly.
//!
//! ## Wire encodings
//!
//! The **tagged** form is a self-describing JSON envelope carrying the type
//! id and a field map keyed by wire tag (falling back to field name); on
//! decode, tag keys take precedence over name keys, which makes field
//! renames wire-compatible as long as tags are preserved. The **compact**
//! form renders a single-value type as one string, with a `<type-id>~`
//! discriminator prefix when embedded in a union or tagged context.
//!
//! ## Immutability
//!
//! Generated types hold their storage behind an `Arc`; setters and
//! collection mutators return new instances and hand back a structurally
//! shared clone (same `Arc`) whenever an operation would not change
//! observable content.

pub mod collections;
pub mod compact;
pub mod descriptor;
pub mod error;
pub mod message;
pub mod pattern;
pub mod registry;
pub mod tagged;
pub mod value;

pub use descriptor::{FieldSpec, MessageDescriptor};
pub use error::{DecodeError, ValidationError, ValidationIssues};
pub use message::{CompactMessage, Message};
pub use registry::{TypeEntry, TypeRegistry};
pub use tagged::TaggedEnvelope;
pub use value::{MapKey, Value};
