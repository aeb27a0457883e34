// Generated by msgforge. Do not edit manually.
//
// Source schema:
//
//   message Point {
//     1: x: number
//     2: y: number @min(0)
//     3: tags: string[]
//   }

use std::sync::{Arc, OnceLock};

use msgforge::{
    collections, tagged, DecodeError, FieldSpec, MapKey, Message, MessageDescriptor,
    ValidationError, ValidationIssues, Value,
};

const POINT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "x",
        tag: Some(1),
        optional: false,
        nullable: false,
    },
    FieldSpec {
        name: "y",
        tag: Some(2),
        optional: false,
        nullable: false,
    },
    FieldSpec {
        name: "tags",
        tag: Some(3),
        optional: false,
        nullable: false,
    },
];

static POINT_DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    type_name: "Point",
    type_id: "Point",
    type_hash: "sha256:5bc2b9cd9e1b2f3c8a6d7e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b",
    compact: false,
    fields: POINT_FIELDS,
};

/// Construction properties for [`Point`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointProps {
    pub x: f64,
    pub y: f64,
    pub tags: Vec<String>,
}

/// Partial update for [`Point`]. `None` is the skip sentinel: that field
/// keeps its current value.
#[derive(Debug, Clone, Default)]
pub struct PointUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug)]
struct PointInner {
    x: f64,
    y: f64,
    tags: Vec<String>,
    hash_cell: OnceLock<u64>,
}

/// Immutable message type `Point`.
#[derive(Debug, Clone)]
pub struct Point {
    inner: Arc<PointInner>,
}

impl Point {
    /// Declared type name.
    pub const TYPE_NAME: &'static str = "Point";

    /// Content-addressed schema hash.
    pub const TYPE_HASH: &'static str = POINT_DESCRIPTOR.type_hash;

    fn from_parts(x: f64, y: f64, tags: Vec<String>) -> Self {
        Self {
            inner: Arc::new(PointInner {
                x,
                y,
                tags,
                hash_cell: OnceLock::new(),
            }),
        }
    }

    fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether two instances share storage (a no-op setter result shares
    /// storage with its receiver).
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn check_x(value: f64) -> Result<(), ValidationError> {
        let _ = value;
        Ok(())
    }

    fn check_y(value: f64) -> Result<(), ValidationError> {
        if !(value >= 0_f64) {
            return Err(ValidationError::new(
                "y",
                "must be at least 0",
                value.to_string(),
                "range.min",
            ));
        }
        Ok(())
    }

    fn check_tags(value: &[String]) -> Result<(), ValidationError> {
        let _ = value;
        Ok(())
    }

    /// Construct a validated instance.
    pub fn construct(props: PointProps) -> Result<Self, ValidationError> {
        Self::check_x(props.x)?;
        Self::check_y(props.y)?;
        Self::check_tags(&props.tags)?;
        Ok(Self::from_parts(props.x, props.y, props.tags))
    }

    /// Construct without running field validation.
    pub fn construct_unchecked(props: PointProps) -> Self {
        Self::from_parts(props.x, props.y, props.tags)
    }

    /// The cached default instance.
    pub fn default_instance() -> &'static Self {
        static INSTANCE: OnceLock<Point> = OnceLock::new();
        INSTANCE.get_or_init(|| Self::construct_unchecked(PointProps::default()))
    }

    /// Field `x`.
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    /// Field `y`.
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    /// Field `tags`.
    pub fn tags(&self) -> &[String] {
        &self.inner.tags
    }

    /// Replace `x`, returning a new instance. A value equal to the current
    /// one returns a structurally shared clone.
    pub fn set_x(&self, value: f64) -> Result<Self, ValidationError> {
        if value == self.inner.x {
            return Ok(self.share());
        }
        Self::check_x(value)?;
        Ok(Self::from_parts(value, self.inner.y, self.inner.tags.clone()))
    }

    /// Replace `y`, returning a new instance. A value equal to the current
    /// one returns a structurally shared clone.
    pub fn set_y(&self, value: f64) -> Result<Self, ValidationError> {
        if value == self.inner.y {
            return Ok(self.share());
        }
        Self::check_y(value)?;
        Ok(Self::from_parts(self.inner.x, value, self.inner.tags.clone()))
    }

    /// Replace `tags`, returning a new instance. A value equal to the
    /// current one returns a structurally shared clone.
    pub fn set_tags(&self, value: Vec<String>) -> Result<Self, ValidationError> {
        if value == self.inner.tags {
            return Ok(self.share());
        }
        Self::check_tags(&value)?;
        Ok(Self::from_parts(self.inner.x, self.inner.y, value))
    }

    /// Apply a partial update; `None` keys are skipped.
    pub fn update(&self, updates: PointUpdate) -> Result<Self, ValidationError> {
        let mut next = self.share();
        if let Some(value) = updates.x {
            next = next.set_x(value)?;
        }
        if let Some(value) = updates.y {
            next = next.set_y(value)?;
        }
        if let Some(value) = updates.tags {
            next = next.set_tags(value)?;
        }
        Ok(next)
    }

    fn with_tags(&self, tags: Option<Vec<String>>) -> Self {
        match tags {
            Some(tags) => Self::from_parts(self.inner.x, self.inner.y, tags),
            None => self.share(),
        }
    }

    /// Append to `tags`.
    pub fn push_tags(&self, value: String) -> Self {
        self.with_tags(collections::array_push(&self.inner.tags, value))
    }

    /// Drop the last element of `tags`.
    pub fn pop_tags(&self) -> Self {
        self.with_tags(collections::array_pop(&self.inner.tags))
    }

    /// Drop the first element of `tags`.
    pub fn shift_tags(&self) -> Self {
        self.with_tags(collections::array_shift(&self.inner.tags))
    }

    /// Prepend to `tags`.
    pub fn unshift_tags(&self, value: String) -> Self {
        self.with_tags(collections::array_unshift(&self.inner.tags, value))
    }

    /// Splice `tags`.
    pub fn splice_tags(&self, start: usize, delete_count: usize, insert: &[String]) -> Self {
        self.with_tags(collections::array_splice(
            &self.inner.tags,
            start,
            delete_count,
            insert,
        ))
    }

    /// Sort `tags` by a comparator.
    pub fn sort_tags_by<F>(&self, compare: F) -> Self
    where
        F: FnMut(&String, &String) -> std::cmp::Ordering,
    {
        self.with_tags(collections::array_sort_by(&self.inner.tags, compare))
    }

    /// Reverse `tags`.
    pub fn reverse_tags(&self) -> Self {
        self.with_tags(collections::array_reverse(&self.inner.tags))
    }

    /// Fill a range of `tags` with a value.
    pub fn fill_tags(&self, value: &String, start: usize, end: usize) -> Self {
        self.with_tags(collections::array_fill(&self.inner.tags, value, start, end))
    }

    /// Copy a range of `tags` within itself.
    pub fn copy_within_tags(&self, dest: usize, src_start: usize, src_end: usize) -> Self {
        self.with_tags(collections::array_copy_within(
            &self.inner.tags,
            dest,
            src_start,
            src_end,
        ))
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
            self.inner.x.to_bits().hash(&mut hasher);
            self.inner.y.to_bits().hash(&mut hasher);
            self.inner.tags.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Encode into the tagged wire form.
    pub fn serialize(&self) -> String {
        let values: Vec<(&FieldSpec, Value)> = vec![
            (&POINT_FIELDS[0], Value::Float(self.inner.x)),
            (&POINT_FIELDS[1], Value::Float(self.inner.y)),
            (
                &POINT_FIELDS[2],
                Value::Array(
                    self.inner
                        .tags
                        .iter()
                        .map(|item| Value::Str(item.clone()))
                        .collect(),
                ),
            ),
        ];
        tagged::encode(&POINT_DESCRIPTOR, &values)
    }

    /// Decode from the tagged wire form.
    pub fn deserialize(text: &str) -> Result<Self, DecodeError> {
        let envelope = tagged::decode_for(&POINT_DESCRIPTOR, text)?;

        let x = match envelope.field_value(&POINT_FIELDS[0]) {
            Some(raw) => raw
                .as_f64()
                .ok_or_else(|| DecodeError::wrong_type("x", "number"))?,
            None => return Err(DecodeError::missing_field("x")),
        };
        let y = match envelope.field_value(&POINT_FIELDS[1]) {
            Some(raw) => raw
                .as_f64()
                .ok_or_else(|| DecodeError::wrong_type("y", "number"))?,
            None => return Err(DecodeError::missing_field("y")),
        };
        let tags = match envelope.field_value(&POINT_FIELDS[2]) {
            Some(raw) => {
                let items = raw
                    .as_array()
                    .ok_or_else(|| DecodeError::wrong_type("tags", "array"))?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(
                        item.as_str()
                            .ok_or_else(|| DecodeError::wrong_type("tags", "string"))?
                            .to_string(),
                    );
                }
                out
            }
            None => return Err(DecodeError::missing_field("tags")),
        };

        Self::construct(PointProps { x, y, tags }).map_err(DecodeError::from)
    }

    /// Whether the wire text is a `Point` payload.
    pub fn is_instance(text: &str) -> bool {
        tagged::peek_type_id(text).as_deref() == Some(POINT_DESCRIPTOR.type_id)
    }

    /// Validate an untyped value against the schema, collecting every
    /// violation.
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

        match entries.get(&MapKey::Str("x".to_string())) {
            Some(Value::Float(_)) | Some(Value::Int(_)) => {}
            Some(other) => issues.push(ValidationError::new(
                "x",
                "expected a number",
                other.render(),
                "shape.number",
            )),
            None => issues.push(ValidationError::new(
                "x",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        match entries.get(&MapKey::Str("y".to_string())) {
            Some(Value::Float(value)) => {
                if let Err(err) = Self::check_y(*value) {
                    issues.push(err);
                }
            }
            Some(Value::Int(value)) => {
                if let Err(err) = Self::check_y(*value as f64) {
                    issues.push(err);
                }
            }
            Some(other) => issues.push(ValidationError::new(
                "y",
                "expected a number",
                other.render(),
                "shape.number",
            )),
            None => issues.push(ValidationError::new(
                "y",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        match entries.get(&MapKey::Str("tags".to_string())) {
            Some(Value::Array(items)) => {
                for item in items {
                    if !matches!(item, Value::Str(_)) {
                        issues.push(ValidationError::new(
                            "tags",
                            "expected string elements",
                            item.render(),
                            "shape.string",
                        ));
                    }
                }
            }
            Some(other) => issues.push(ValidationError::new(
                "tags",
                "expected an array",
                other.render(),
                "shape.array",
            )),
            None => issues.push(ValidationError::new(
                "tags",
                "missing required field",
                "nothing",
                "field.missing",
            )),
        }

        issues
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.x == other.inner.x
            && self.inner.y == other.inner.y
            && self.inner.tags == other.inner.tags
    }
}

impl std::hash::Hash for Point {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl Message for Point {
    const TYPE_NAME: &'static str = "Point";
    const TYPE_HASH: &'static str = POINT_DESCRIPTOR.type_hash;

    fn descriptor() -> &'static MessageDescriptor {
        &POINT_DESCRIPTOR
    }

    fn default_instance() -> &'static Self {
        Point::default_instance()
    }

    fn serialize(&self) -> String {
        Point::serialize(self)
    }

    fn deserialize(text: &str) -> Result<Self, DecodeError> {
        Point::deserialize(text)
    }

    fn hash_code(&self) -> u64 {
        Point::hash_code(self)
    }

    fn validate_all(data: &Value) -> ValidationIssues {
        Point::validate_all(data)
    }
}
