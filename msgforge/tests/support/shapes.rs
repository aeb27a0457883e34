// Generated by msgforge. Do not edit manually.
//
// Source schema:
//
//   @compact
//   message Circle {
//     1: radius: number @min(0)
//   }
//
//   @compact
//   message Square {
//     1: side: number @min(0)
//   }
//
//   message Drawing {
//     1: name: string
//     2: shape: Circle | Square
//   }

use std::sync::{Arc, OnceLock};

use msgforge::{
    compact, tagged, CompactMessage, DecodeError, FieldSpec, Message, MessageDescriptor,
    ValidationError, ValidationIssues, Value,
};

// =============================================================================
// Circle
// =============================================================================

const CIRCLE_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "radius",
    tag: Some(1),
    optional: false,
    nullable: false,
}];

static CIRCLE_DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    type_name: "Circle",
    type_id: "Circle",
    type_hash: "sha256:7f21c64a0d8e5b3f9a1c2d4e6f8a0b2c4d6e8f0a1b3c5d7e9f1a3b5c7d9e0f2a",
    compact: true,
    fields: CIRCLE_FIELDS,
};

/// Construction properties for [`Circle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircleProps {
    pub radius: f64,
}

#[derive(Debug)]
struct CircleInner {
    radius: f64,
    hash_cell: OnceLock<u64>,
}

/// Immutable message type `Circle`.
#[derive(Debug, Clone)]
pub struct Circle {
    inner: Arc<CircleInner>,
}

impl Circle {
    /// Declared type name.
    pub const TYPE_NAME: &'static str = "Circle";

    /// Content-addressed schema hash.
    pub const TYPE_HASH: &'static str = CIRCLE_DESCRIPTOR.type_hash;

    fn from_parts(radius: f64) -> Self {
        Self {
            inner: Arc::new(CircleInner {
                radius,
                hash_cell: OnceLock::new(),
            }),
        }
    }

    fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether two instances share storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn check_radius(value: f64) -> Result<(), ValidationError> {
        if !(value >= 0_f64) {
            return Err(ValidationError::new(
                "radius",
                "must be at least 0",
                value.to_string(),
                "range.min",
            ));
        }
        Ok(())
    }

    /// Construct a validated instance.
    pub fn construct(props: CircleProps) -> Result<Self, ValidationError> {
        Self::check_radius(props.radius)?;
        Ok(Self::from_parts(props.radius))
    }

    /// Construct without running field validation.
    pub fn construct_unchecked(props: CircleProps) -> Self {
        Self::from_parts(props.radius)
    }

    /// The cached default instance.
    pub fn default_instance() -> &'static Self {
        static INSTANCE: OnceLock<Circle> = OnceLock::new();
        INSTANCE.get_or_init(|| Self::construct_unchecked(CircleProps::default()))
    }

    /// Field `radius`.
    pub fn radius(&self) -> f64 {
        self.inner.radius
    }

    /// Replace `radius`, returning a new instance.
    pub fn set_radius(&self, value: f64) -> Result<Self, ValidationError> {
        if value == self.inner.radius {
            return Ok(self.share());
        }
        Self::check_radius(value)?;
        Ok(Self::from_parts(value))
    }

    /// Structural equality with another instance.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Structural hash, computed once per instance.
    pub fn hash_code(&self) -> u64 {
        *self.inner.hash_cell.get_or_init(|| {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            Self::TYPE_NAME.hash(&mut hasher);
            self.inner.radius.to_bits().hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Encode into the tagged wire form.
    pub fn serialize(&self) -> String {
        let values: Vec<(&FieldSpec, Value)> =
            vec![(&CIRCLE_FIELDS[0], Value::Float(self.inner.radius))];
        tagged::encode(&CIRCLE_DESCRIPTOR, &values)
    }

    /// Decode from the tagged wire form.
    pub fn deserialize(text: &str) -> Result<Self, DecodeError> {
        let envelope = tagged::decode_for(&CIRCLE_DESCRIPTOR, text)?;

        let radius = match envelope.field_value(&CIRCLE_FIELDS[0]) {
            Some(raw) => raw
                .as_f64()
                .ok_or_else(|| DecodeError::wrong_type("radius", "number"))?,
            None => return Err(DecodeError::missing_field("radius")),
        };

        Self::construct(CircleProps { radius }).map_err(DecodeError::from)
    }

    /// Whether the wire text is a `Circle` payload (tagged or embedded
    /// compact).
    pub fn is_instance(text: &str) -> bool {
        compact::peek_discriminator(text) == Some(CIRCLE_DESCRIPTOR.type_id)
            || tagged::peek_type_id(text).as_deref() == Some(CIRCLE_DESCRIPTOR.type_id)
    }

    /// Validate an untyped value against the schema.
    pub fn validate_all(data: &Value) -> ValidationIssues {
        let mut issues = ValidationIssues::new();
        let entries = match data {
            Value::Map(entries) => entries,
            other => {
                issues.push(ValidationError::new(
                    "$root",
                    "expected a field map",
                    other.render(),
                    "shape.map",
                ));
                return issues;
            }
        };

        match entries.get(&msgforge::MapKey::Str("radius".to_string())) {
            Some(Value::Float(value)) => {
                if let Err(err) = Self::check_radius(*value) {
                    issues.push(err);
                }
            }
            Some(Value::Int(value)) => {
                if let Err(err) = Self::check_radius(*value as f64) {
                    issues.push(err);
                }
            }
            Some(other) => issues.push(ValidationError::new(
                "radius",
                "expected a number",
                other.render(),
                "shape.number",
            )),
            None => issues.push(ValidationError::new(
                "radius",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        issues
    }
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.radius == other.inner.radius
    }
}

impl std::hash::Hash for Circle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl Message for Circle {
    const TYPE_NAME: &'static str = "Circle";
    const TYPE_HASH: &'static str = CIRCLE_DESCRIPTOR.type_hash;

    fn descriptor() -> &'static MessageDescriptor {
        &CIRCLE_DESCRIPTOR
    }

    fn default_instance() -> &'static Self {
        Circle::default_instance()
    }

    fn serialize(&self) -> String {
        Circle::serialize(self)
    }

    fn deserialize(text: &str) -> Result<Self, DecodeError> {
        Circle::deserialize(text)
    }

    fn hash_code(&self) -> u64 {
        Circle::hash_code(self)
    }

    fn validate_all(data: &Value) -> ValidationIssues {
        Circle::validate_all(data)
    }
}

impl CompactMessage for Circle {
    fn to_compact(&self) -> String {
        self.inner.radius.to_string()
    }

    fn from_compact(text: &str) -> Result<Self, DecodeError> {
        let radius: f64 = text
            .parse()
            .map_err(|_| DecodeError::wrong_type("radius", "number"))?;
        Self::construct(CircleProps { radius }).map_err(DecodeError::from)
    }
}

// =============================================================================
// Square
// =============================================================================

const SQUARE_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "side",
    tag: Some(1),
    optional: false,
    nullable: false,
}];

static SQUARE_DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    type_name: "Square",
    type_id: "Square",
    type_hash: "sha256:9a4e1b7c3d5f0a2b4c6d8e0f2a4b6c8d0e2f4a6b8c0d2e4f6a8b0c2d4e6f8a1c",
    compact: true,
    fields: SQUARE_FIELDS,
};

/// Construction properties for [`Square`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquareProps {
    pub side: f64,
}

#[derive(Debug)]
struct SquareInner {
    side: f64,
    hash_cell: OnceLock<u64>,
}

/// Immutable message type `Square`.
#[derive(Debug, Clone)]
pub struct Square {
    inner: Arc<SquareInner>,
}

impl Square {
    /// Declared type name.
    pub const TYPE_NAME: &'static str = "Square";

    /// Content-addressed schema hash.
    pub const TYPE_HASH: &'static str = SQUARE_DESCRIPTOR.type_hash;

    fn from_parts(side: f64) -> Self {
        Self {
            inner: Arc::new(SquareInner {
                side,
                hash_cell: OnceLock::new(),
            }),
        }
    }

    fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether two instances share storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn check_side(value: f64) -> Result<(), ValidationError> {
        if !(value >= 0_f64) {
            return Err(ValidationError::new(
                "side",
                "must be at least 0",
                value.to_string(),
                "range.min",
            ));
        }
        Ok(())
    }

    /// Construct a validated instance.
    pub fn construct(props: SquareProps) -> Result<Self, ValidationError> {
        Self::check_side(props.side)?;
        Ok(Self::from_parts(props.side))
    }

    /// Construct without running field validation.
    pub fn construct_unchecked(props: SquareProps) -> Self {
        Self::from_parts(props.side)
    }

    /// The cached default instance.
    pub fn default_instance() -> &'static Self {
        static INSTANCE: OnceLock<Square> = OnceLock::new();
        INSTANCE.get_or_init(|| Self::construct_unchecked(SquareProps::default()))
    }

    /// Field `side`.
    pub fn side(&self) -> f64 {
        self.inner.side
    }

    /// Replace `side`, returning a new instance.
    pub fn set_side(&self, value: f64) -> Result<Self, ValidationError> {
        if value == self.inner.side {
            return Ok(self.share());
        }
        Self::check_side(value)?;
        Ok(Self::from_parts(value))
    }

    /// Structural equality with another instance.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Structural hash, computed once per instance.
    pub fn hash_code(&self) -> u64 {
        *self.inner.hash_cell.get_or_init(|| {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            Self::TYPE_NAME.hash(&mut hasher);
            self.inner.side.to_bits().hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Encode into the tagged wire form.
    pub fn serialize(&self) -> String {
        let values: Vec<(&FieldSpec, Value)> =
            vec![(&SQUARE_FIELDS[0], Value::Float(self.inner.side))];
        tagged::encode(&SQUARE_DESCRIPTOR, &values)
    }

    /// Decode from the tagged wire form.
    pub fn deserialize(text: &str) -> Result<Self, DecodeError> {
        let envelope = tagged::decode_for(&SQUARE_DESCRIPTOR, text)?;

        let side = match envelope.field_value(&SQUARE_FIELDS[0]) {
            Some(raw) => raw
                .as_f64()
                .ok_or_else(|| DecodeError::wrong_type("side", "number"))?,
            None => return Err(DecodeError::missing_field("side")),
        };

        Self::construct(SquareProps { side }).map_err(DecodeError::from)
    }

    /// Whether the wire text is a `Square` payload (tagged or embedded
    /// compact).
    pub fn is_instance(text: &str) -> bool {
        compact::peek_discriminator(text) == Some(SQUARE_DESCRIPTOR.type_id)
            || tagged::peek_type_id(text).as_deref() == Some(SQUARE_DESCRIPTOR.type_id)
    }

    /// Validate an untyped value against the schema.
    pub fn validate_all(data: &Value) -> ValidationIssues {
        let mut issues = ValidationIssues::new();
        let entries = match data {
            Value::Map(entries) => entries,
            other => {
                issues.push(ValidationError::new(
                    "$root",
                    "expected a field map",
                    other.render(),
                    "shape.map",
                ));
                return issues;
            }
        };

        match entries.get(&msgforge::MapKey::Str("side".to_string())) {
            Some(Value::Float(value)) => {
                if let Err(err) = Self::check_side(*value) {
                    issues.push(err);
                }
            }
            Some(Value::Int(value)) => {
                if let Err(err) = Self::check_side(*value as f64) {
                    issues.push(err);
                }
            }
            Some(other) => issues.push(ValidationError::new(
                "side",
                "expected a number",
                other.render(),
                "shape.number",
            )),
            None => issues.push(ValidationError::new(
                "side",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        issues
    }
}

impl PartialEq for Square {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.side == other.inner.side
    }
}

impl std::hash::Hash for Square {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl Message for Square {
    const TYPE_NAME: &'static str = "Square";
    const TYPE_HASH: &'static str = SQUARE_DESCRIPTOR.type_hash;

    fn descriptor() -> &'static MessageDescriptor {
        &SQUARE_DESCRIPTOR
    }

    fn default_instance() -> &'static Self {
        Square::default_instance()
    }

    fn serialize(&self) -> String {
        Square::serialize(self)
    }

    fn deserialize(text: &str) -> Result<Self, DecodeError> {
        Square::deserialize(text)
    }

    fn hash_code(&self) -> u64 {
        Square::hash_code(self)
    }

    fn validate_all(data: &Value) -> ValidationIssues {
        Square::validate_all(data)
    }
}

impl CompactMessage for Square {
    fn to_compact(&self) -> String {
        self.inner.side.to_string()
    }

    fn from_compact(text: &str) -> Result<Self, DecodeError> {
        let side: f64 = text
            .parse()
            .map_err(|_| DecodeError::wrong_type("side", "number"))?;
        Self::construct(SquareProps { side }).map_err(DecodeError::from)
    }
}

// =============================================================================
// Drawing
// =============================================================================

/// Union field `Drawing.shape`: one of the declared member types, selected
/// at decode time by a first-match type guard.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingShape {
    Circle(Circle),
    Square(Square),
}

impl DrawingShape {
    fn to_value(&self) -> Value {
        match self {
            DrawingShape::Circle(inner) => Value::Str(inner.to_compact_embedded()),
            DrawingShape::Square(inner) => Value::Str(inner.to_compact_embedded()),
        }
    }

    fn from_json(raw: &serde_json::Value) -> Result<Self, DecodeError> {
        if let Some(text) = raw.as_str() {
            if Circle::is_instance(text) {
                return Circle::from_compact_embedded(text).map(DrawingShape::Circle);
            }
            if Square::is_instance(text) {
                return Square::from_compact_embedded(text).map(DrawingShape::Square);
            }
        }
        if raw.is_object() {
            let text = raw.to_string();
            if Circle::is_instance(&text) {
                return Circle::deserialize(&text).map(DrawingShape::Circle);
            }
            if Square::is_instance(&text) {
                return Square::deserialize(&text).map(DrawingShape::Square);
            }
        }
        Err(DecodeError::UnmatchedUnion {
            field: "shape".to_string(),
        })
    }
}

const DRAWING_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        tag: Some(1),
        optional: false,
        nullable: false,
    },
    FieldSpec {
        name: "shape",
        tag: Some(2),
        optional: false,
        nullable: false,
    },
];

static DRAWING_DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    type_name: "Drawing",
    type_id: "Drawing",
    type_hash: "sha256:1c8d5e2f9a0b3c6d7e4f1a8b5c2d9e0f3a6b7c4d1e8f5a2b9c0d3e6f7a4b1c8d",
    compact: false,
    fields: DRAWING_FIELDS,
};

/// Construction properties for [`Drawing`].
#[derive(Debug, Clone)]
pub struct DrawingProps {
    pub name: String,
    pub shape: DrawingShape,
}

#[derive(Debug)]
struct DrawingInner {
    name: String,
    shape: DrawingShape,
    hash_cell: OnceLock<u64>,
}

/// Immutable message type `Drawing`.
#[derive(Debug, Clone)]
pub struct Drawing {
    inner: Arc<DrawingInner>,
}

impl Drawing {
    /// Declared type name.
    pub const TYPE_NAME: &'static str = "Drawing";

    /// Content-addressed schema hash.
    pub const TYPE_HASH: &'static str = DRAWING_DESCRIPTOR.type_hash;

    fn from_parts(name: String, shape: DrawingShape) -> Self {
        Self {
            inner: Arc::new(DrawingInner {
                name,
                shape,
                hash_cell: OnceLock::new(),
            }),
        }
    }

    fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether two instances share storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Construct a validated instance.
    pub fn construct(props: DrawingProps) -> Result<Self, ValidationError> {
        Ok(Self::from_parts(props.name, props.shape))
    }

    /// Construct without running field validation.
    pub fn construct_unchecked(props: DrawingProps) -> Self {
        Self::from_parts(props.name, props.shape)
    }

    /// Field `name`.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Field `shape`.
    pub fn shape(&self) -> &DrawingShape {
        &self.inner.shape
    }

    /// Replace `name`, returning a new instance.
    pub fn set_name(&self, value: String) -> Result<Self, ValidationError> {
        if value == self.inner.name {
            return Ok(self.share());
        }
        Ok(Self::from_parts(value, self.inner.shape.clone()))
    }

    /// Replace `shape`, returning a new instance.
    pub fn set_shape(&self, value: DrawingShape) -> Result<Self, ValidationError> {
        if value == self.inner.shape {
            return Ok(self.share());
        }
        Ok(Self::from_parts(self.inner.name.clone(), value))
    }

    /// Structural equality with another instance.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Structural hash, computed once per instance.
    pub fn hash_code(&self) -> u64 {
        *self.inner.hash_cell.get_or_init(|| {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            Self::TYPE_NAME.hash(&mut hasher);
            self.inner.name.hash(&mut hasher);
            match &self.inner.shape {
                DrawingShape::Circle(inner) => {
                    0_u8.hash(&mut hasher);
                    inner.hash_code().hash(&mut hasher);
                }
                DrawingShape::Square(inner) => {
                    1_u8.hash(&mut hasher);
                    inner.hash_code().hash(&mut hasher);
                }
            }
            hasher.finish()
        })
    }

    /// Encode into the tagged wire form.
    pub fn serialize(&self) -> String {
        let values: Vec<(&FieldSpec, Value)> = vec![
            (&DRAWING_FIELDS[0], Value::Str(self.inner.name.clone())),
            (&DRAWING_FIELDS[1], self.inner.shape.to_value()),
        ];
        tagged::encode(&DRAWING_DESCRIPTOR, &values)
    }

    /// Decode from the tagged wire form.
    pub fn deserialize(text: &str) -> Result<Self, DecodeError> {
        let envelope = tagged::decode_for(&DRAWING_DESCRIPTOR, text)?;

        let name = match envelope.field_value(&DRAWING_FIELDS[0]) {
            Some(raw) => raw
                .as_str()
                .ok_or_else(|| DecodeError::wrong_type("name", "string"))?
                .to_string(),
            None => return Err(DecodeError::missing_field("name")),
        };
        let shape = match envelope.field_value(&DRAWING_FIELDS[1]) {
            Some(raw) => DrawingShape::from_json(raw)?,
            None => return Err(DecodeError::missing_field("shape")),
        };

        Self::construct(DrawingProps { name, shape }).map_err(DecodeError::from)
    }

    /// Whether the wire text is a `Drawing` payload.
    pub fn is_instance(text: &str) -> bool {
        tagged::peek_type_id(text).as_deref() == Some(DRAWING_DESCRIPTOR.type_id)
    }
}

impl PartialEq for Drawing {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.name == other.inner.name && self.inner.shape == other.inner.shape
    }
}

impl std::hash::Hash for Drawing {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl Drawing {
    /// The cached default instance. A union field defaults to the default
    /// instance of its first declared member.
    pub fn default_instance() -> &'static Self {
        static INSTANCE: OnceLock<Drawing> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            Self::construct_unchecked(DrawingProps {
                name: String::new(),
                shape: DrawingShape::Circle(Circle::default_instance().clone()),
            })
        })
    }

    /// Validate an untyped value against the schema.
    pub fn validate_all(data: &Value) -> ValidationIssues {
        let mut issues = ValidationIssues::new();
        let entries = match data {
            Value::Map(entries) => entries,
            other => {
                issues.push(ValidationError::new(
                    "$root",
                    "expected a field map",
                    other.render(),
                    "shape.map",
                ));
                return issues;
            }
        };

        match entries.get(&msgforge::MapKey::Str("name".to_string())) {
            Some(Value::Str(_)) => {}
            Some(other) => issues.push(ValidationError::new(
                "name",
                "expected a string",
                other.render(),
                "shape.string",
            )),
            None => issues.push(ValidationError::new(
                "name",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        match entries.get(&msgforge::MapKey::Str("shape".to_string())) {
            Some(Value::Str(text)) if Circle::is_instance(text) || Square::is_instance(text) => {}
            Some(other) => issues.push(ValidationError::new(
                "shape",
                "value matched no union member",
                other.render(),
                "union.unmatched",
            )),
            None => issues.push(ValidationError::new(
                "shape",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        issues
    }
}

impl Message for Drawing {
    const TYPE_NAME: &'static str = "Drawing";
    const TYPE_HASH: &'static str = DRAWING_DESCRIPTOR.type_hash;

    fn descriptor() -> &'static MessageDescriptor {
        &DRAWING_DESCRIPTOR
    }

    fn default_instance() -> &'static Self {
        Drawing::default_instance()
    }

    fn serialize(&self) -> String {
        Drawing::serialize(self)
    }

    fn deserialize(text: &str) -> Result<Self, DecodeError> {
        Drawing::deserialize(text)
    }

    fn hash_code(&self) -> u64 {
        Drawing::hash_code(self)
    }

    fn validate_all(data: &Value) -> ValidationIssues {
        Drawing::validate_all(data)
    }
}
