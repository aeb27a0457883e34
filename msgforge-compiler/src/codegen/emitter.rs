//! Per-type Rust emission.
//!
//! Every generated type follows one template: a props struct, a partial
//! update struct, an `Arc`-shared inner, validated construction, cached
//! default instance and hash, copy-producing setters with structural
//! sharing on no-ops, wire codecs, and (for compact types) the compact
//! codec. Extendable types are emitted under `<Name>Base` with the public
//! name reserved for the user-authored extension.

use std::fmt::Write;

use crate::codegen::types::{
    accessor, const_prefix, is_copy, is_defaultable, map_key_type, method_name, primitive_type,
    storage_type, union_enum_name,
};
use crate::codegen::GeneratedItem;
use crate::ir::{CanonicalSchema, FieldDescriptor, MapKeyKind, PrimitiveKind, TypeShape};
use crate::resolver::{Check, FieldRules, ResolvedSchema};

/// Emit one type into `out`, returning its item record.
pub fn emit_type(
    schema: &CanonicalSchema,
    rules: &ResolvedSchema,
    out: &mut String,
) -> GeneratedItem {
    let emitter = TypeEmitter::new(schema, rules);
    emitter.emit(out);

    GeneratedItem {
        name: schema.name.clone(),
        rust_name: emitter.rust_name.clone(),
        extend_path: schema.extend.as_ref().map(|e| e.path.clone()),
        type_hash: schema.hash.clone(),
    }
}

struct FieldCtx<'a> {
    descriptor: &'a FieldDescriptor,
    rules: Option<&'a FieldRules>,
    index: usize,
    method: String,
    storage: String,
    full_storage: String,
    wraps_option: bool,
    copy: bool,
}

impl FieldCtx<'_> {
    fn checks(&self) -> &[Check] {
        self.rules.map(|r| r.checks.as_slice()).unwrap_or(&[])
    }

    fn float_context(&self) -> bool {
        self.rules.map(|r| r.float_context).unwrap_or(false)
    }

    fn has_check_fn(&self) -> bool {
        matches!(
            self.descriptor.shape,
            TypeShape::Primitive(_)
                | TypeShape::Brand { .. }
                | TypeShape::Array(_)
                | TypeShape::Map { .. }
                | TypeShape::Set(_)
        )
    }
}

struct TypeEmitter<'a> {
    schema: &'a CanonicalSchema,
    rust_name: String,
    prefix: String,
    fields: Vec<FieldCtx<'a>>,
    generic: bool,
    generics_decl: String,
    generics_use: String,
}

impl<'a> TypeEmitter<'a> {
    fn new(schema: &'a CanonicalSchema, rules: &'a ResolvedSchema) -> Self {
        let rust_name = match &schema.extend {
            Some(_) => format!("{}Base", schema.name),
            None => schema.name.clone(),
        };
        let prefix = const_prefix(&rust_name);

        let fields = schema
            .fields
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let storage = storage_type(&descriptor.shape, &rust_name, &descriptor.name);
                let wraps_option = descriptor.optional || descriptor.nullable;
                let full_storage = if wraps_option {
                    format!("Option<{}>", storage)
                } else {
                    storage.clone()
                };
                FieldCtx {
                    descriptor,
                    rules: rules.field(&descriptor.name),
                    index,
                    method: method_name(&descriptor.name),
                    storage,
                    full_storage,
                    wraps_option,
                    copy: is_copy(&descriptor.shape),
                }
            })
            .collect();

        let generic = schema.is_generic();
        let generics_decl = if generic {
            let params: Vec<String> = schema
                .type_params
                .iter()
                .map(|p| format!("{}: Message + 'static", p.name))
                .collect();
            format!("<{}>", params.join(", "))
        } else {
            String::new()
        };
        let generics_use = if generic {
            let params: Vec<&str> = schema.type_params.iter().map(|p| p.name.as_str()).collect();
            format!("<{}>", params.join(", "))
        } else {
            String::new()
        };

        Self {
            schema,
            rust_name,
            prefix,
            fields,
            generic,
            generics_decl,
            generics_use,
        }
    }

    fn emit(&self, out: &mut String) {
        self.emit_header_comment(out);
        self.emit_descriptor(out);
        self.emit_union_enums(out);
        self.emit_props(out);
        self.emit_update(out);
        self.emit_inner(out);
        self.emit_struct(out);
        self.emit_impl(out);
        self.emit_trait_impls(out);
    }

    fn emit_header_comment(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "// =============================================================================\n// {}\n// =============================================================================\n",
            self.schema.name
        );
        if let Some(extend) = &self.schema.extend {
            let _ = writeln!(
                out,
                "// Extendable: the public `{}` is authored at `{}` and wraps this base.\n// Every generated member below is public so the extension can reach it.\n",
                self.schema.name, extend.path
            );
        }
    }

    fn emit_descriptor(&self, out: &mut String) {
        let _ = writeln!(out, "const {}_FIELDS: &[FieldSpec] = &[", self.prefix);
        for field in &self.fields {
            let tag = match field.descriptor.tag {
                Some(tag) => format!("Some({})", tag),
                None => "None".to_string(),
            };
            let _ = writeln!(
                out,
                "    FieldSpec {{\n        name: {:?},\n        tag: {},\n        optional: {},\n        nullable: {},\n    }},",
                field.descriptor.name, tag, field.descriptor.optional, field.descriptor.nullable
            );
        }
        let _ = writeln!(out, "];\n");

        let _ = writeln!(
            out,
            "static {prefix}_DESCRIPTOR: MessageDescriptor = MessageDescriptor {{\n    type_name: {name:?},\n    type_id: {id:?},\n    type_hash: {hash:?},\n    compact: {compact},\n    fields: {prefix}_FIELDS,\n}};\n",
            prefix = self.prefix,
            name = self.schema.name,
            id = self.schema.wire_type_id(),
            hash = self.schema.hash,
            compact = self.schema.compact,
        );
    }

    fn emit_union_enums(&self, out: &mut String) {
        for field in &self.fields {
            let TypeShape::Union(_) = &field.descriptor.shape else {
                continue;
            };
            let Some(rules) = field.rules else { continue };
            let Some(guards) = &rules.union else { continue };
            let enum_name = union_enum_name(&self.rust_name, &field.descriptor.name);

            let _ = writeln!(
                out,
                "/// Union field `{}.{}`: one of the declared member types, selected\n/// at decode time by a first-match type guard.\n#[derive(Debug, Clone, PartialEq)]\npub enum {} {{",
                self.schema.name, field.descriptor.name, enum_name
            );
            for guard in guards {
                let _ = writeln!(out, "    {member}({member}),", member = guard.member);
            }
            let _ = writeln!(out, "}}\n");

            let _ = writeln!(out, "impl {} {{", enum_name);
            let _ = writeln!(out, "    fn to_value(&self) -> Value {{\n        match self {{");
            for guard in guards {
                if guard.compact {
                    let _ = writeln!(
                        out,
                        "            {}::{}(inner) => Value::Str(inner.to_compact_embedded()),",
                        enum_name, guard.member
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "            {}::{}(inner) => Value::from_json(\n                &serde_json::from_str::<serde_json::Value>(&inner.serialize())\n                    .expect(\"generated envelope is valid JSON\"),\n            ),",
                        enum_name, guard.member
                    );
                }
            }
            let _ = writeln!(out, "        }}\n    }}\n");

            let _ = writeln!(
                out,
                "    fn from_json(raw: &serde_json::Value) -> Result<Self, DecodeError> {{"
            );
            if guards.iter().any(|g| g.compact) {
                let _ = writeln!(out, "        if let Some(text) = raw.as_str() {{");
                for guard in guards.iter().filter(|g| g.compact) {
                    let _ = writeln!(
                        out,
                        "            if {member}::is_instance(text) {{\n                return {member}::from_compact_embedded(text).map(Self::{member});\n            }}",
                        member = guard.member
                    );
                }
                let _ = writeln!(out, "        }}");
            }
            let _ = writeln!(out, "        if raw.is_object() {{\n            let text = raw.to_string();");
            for guard in guards {
                let _ = writeln!(
                    out,
                    "            if {member}::is_instance(&text) {{\n                return {member}::deserialize(&text).map(Self::{member});\n            }}",
                    member = guard.member
                );
            }
            let _ = writeln!(
                out,
                "        }}\n        Err(DecodeError::UnmatchedUnion {{\n            field: {:?}.to_string(),\n        }})\n    }}\n}}\n",
                field.descriptor.name
            );
        }
    }

    fn emit_props(&self, out: &mut String) {
        let all_defaultable = self.props_defaultable();
        let derives = if all_defaultable {
            "#[derive(Debug, Clone, Default, PartialEq)]"
        } else {
            "#[derive(Debug, Clone)]"
        };

        let _ = writeln!(
            out,
            "/// Construction properties for [`{}`].\n{}\npub struct {}Props{} {{",
            self.rust_name, derives, self.rust_name, self.generics_decl
        );
        for field in &self.fields {
            let _ = writeln!(out, "    pub {}: {},", field.method, field.full_storage);
        }
        let _ = writeln!(out, "}}\n");
    }

    fn props_defaultable(&self) -> bool {
        self.fields
            .iter()
            .all(|f| f.wraps_option || is_defaultable(&f.descriptor.shape))
    }

    fn emit_update(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "/// Partial update for [`{rust}`]. `None` is the skip sentinel: that field\n/// keeps its current value.\n#[derive(Debug, Clone, Default)]\npub struct {rust}Update{generics} {{",
            rust = self.rust_name,
            generics = self.generics_decl
        );
        for field in &self.fields {
            let _ = writeln!(out, "    pub {}: Option<{}>,", field.method, field.full_storage);
        }
        let _ = writeln!(out, "}}\n");
    }

    fn emit_inner(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "#[derive(Debug)]\nstruct {}Inner{} {{",
            self.rust_name, self.generics_decl
        );
        for field in &self.fields {
            let _ = writeln!(out, "    {}: {},", field.method, field.full_storage);
        }
        let _ = writeln!(out, "    hash_cell: OnceLock<u64>,\n}}\n");
    }

    fn emit_struct(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "/// Immutable message type `{}`.\n#[derive(Debug, Clone)]\npub struct {}{} {{\n    inner: Arc<{}Inner{}>,\n}}\n",
            self.schema.name, self.rust_name, self.generics_decl, self.rust_name, self.generics_use
        );
    }

    fn field_param_list(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}: {}", f.method, f.full_storage))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn emit_impl(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "impl{} {}{} {{",
            self.generics_decl, self.rust_name, self.generics_use
        );

        let _ = writeln!(
            out,
            "    /// Declared type name.\n    pub const TYPE_NAME: &'static str = {:?};\n\n    /// Content-addressed schema hash.\n    pub const TYPE_HASH: &'static str = {:?};\n",
            self.schema.name, self.schema.hash
        );

        // from_parts / share / shares_storage
        let _ = writeln!(
            out,
            "    fn from_parts({}) -> Self {{\n        Self {{\n            inner: Arc::new({}Inner {{",
            self.field_param_list(),
            self.rust_name
        );
        for field in &self.fields {
            let _ = writeln!(out, "                {},", field.method);
        }
        let _ = writeln!(
            out,
            "                hash_cell: OnceLock::new(),\n            }}),\n        }}\n    }}\n"
        );

        let _ = writeln!(
            out,
            "    fn share(&self) -> Self {{\n        Self {{\n            inner: Arc::clone(&self.inner),\n        }}\n    }}\n\n    /// Whether two instances share storage (a no-op setter result shares\n    /// storage with its receiver).\n    pub fn shares_storage(&self, other: &Self) -> bool {{\n        Arc::ptr_eq(&self.inner, &other.inner)\n    }}\n"
        );

        self.emit_check_fns(out);
        self.emit_construct(out);
        self.emit_default_instance(out);
        self.emit_accessors(out);
        self.emit_setters(out);
        self.emit_bulk_update(out);
        self.emit_collection_mutators(out);
        self.emit_equality(out);
        self.emit_serialize(out);
        self.emit_deserialize(out);
        self.emit_is_instance(out);
        if !self.generic {
            self.emit_validate_all(out);
            self.emit_register(out);
        }

        let _ = writeln!(out, "}}\n");
    }

    fn check_param(&self, field: &FieldCtx) -> (String, String) {
        // (parameter type, rendering expression for errors)
        match &field.descriptor.shape {
            TypeShape::Primitive(PrimitiveKind::String | PrimitiveKind::Decimal)
            | TypeShape::Brand {
                base: PrimitiveKind::String | PrimitiveKind::Decimal,
                ..
            } => ("&str".to_string(), "value.to_string()".to_string()),
            TypeShape::Array(element) => (
                format!("&[{}]", storage_type(element, &self.rust_name, &field.descriptor.name)),
                "format!(\"{} items\", value.len())".to_string(),
            ),
            TypeShape::Map { .. } | TypeShape::Set(_) => (
                format!("&{}", field.storage),
                "format!(\"{} items\", value.len())".to_string(),
            ),
            _ => (field.storage.clone(), "value.to_string()".to_string()),
        }
    }

    fn emit_check_fns(&self, out: &mut String) {
        for field in &self.fields {
            if !field.has_check_fn() {
                continue;
            }
            let (param, render) = self.check_param(field);
            let _ = writeln!(
                out,
                "    fn check_{}(value: {}) -> Result<(), ValidationError> {{",
                field.method, param
            );
            if field.checks().is_empty() {
                let _ = writeln!(out, "        let _ = value;");
            } else {
                for check in field.checks() {
                    let condition = check.condition.render("value", field.float_context());
                    let _ = writeln!(
                        out,
                        "        if !({condition}) {{\n            return Err(ValidationError::new(\n                {field:?},\n                {message:?},\n                {render},\n                {code:?},\n            ));\n        }}",
                        condition = condition,
                        field = field.descriptor.name,
                        message = check.message,
                        render = render,
                        code = check.code,
                    );
                }
            }
            let _ = writeln!(out, "        Ok(())\n    }}\n");
        }
    }

    fn emit_construct(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Construct a validated instance.\n    pub fn construct(props: {}Props{}) -> Result<Self, ValidationError> {{",
            self.rust_name, self.generics_use
        );
        for field in &self.fields {
            if !field.has_check_fn() {
                continue;
            }
            if field.wraps_option {
                if field.copy {
                    let _ = writeln!(
                        out,
                        "        if let Some(inner_value) = props.{m} {{\n            Self::check_{m}(inner_value)?;\n        }}",
                        m = field.method
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "        if let Some(inner_value) = &props.{m} {{\n            Self::check_{m}(inner_value)?;\n        }}",
                        m = field.method
                    );
                }
            } else if field.copy {
                let _ = writeln!(out, "        Self::check_{m}(props.{m})?;", m = field.method);
            } else {
                let _ = writeln!(out, "        Self::check_{m}(&props.{m})?;", m = field.method);
            }
        }
        let args: Vec<String> = self.fields.iter().map(|f| format!("props.{}", f.method)).collect();
        let _ = writeln!(out, "        Ok(Self::from_parts({}))\n    }}\n", args.join(", "));

        let _ = writeln!(
            out,
            "    /// Construct without running field validation.\n    pub fn construct_unchecked(props: {rust}Props{gen}) -> Self {{\n        Self::from_parts({args})\n    }}\n",
            rust = self.rust_name,
            gen = self.generics_use,
            args = args.join(", ")
        );
    }

    fn emit_default_instance(&self, out: &mut String) {
        if self.generic {
            // A per-instantiation singleton needs a per-type static, which
            // generic items cannot declare; instantiating code caches its
            // own concrete defaults.
            return;
        }

        let _ = writeln!(
            out,
            "    /// The cached default instance.\n    pub fn default_instance() -> &'static Self {{\n        static INSTANCE: OnceLock<{rust}> = OnceLock::new();",
            rust = self.rust_name
        );
        if self.props_defaultable() {
            let _ = writeln!(
                out,
                "        INSTANCE.get_or_init(|| Self::construct_unchecked({}Props::default()))\n    }}\n",
                self.rust_name
            );
        } else {
            let _ = writeln!(
                out,
                "        INSTANCE.get_or_init(|| {{\n            Self::construct_unchecked({}Props {{",
                self.rust_name
            );
            for field in &self.fields {
                let default_expr = self.default_field_expr(field);
                let _ = writeln!(out, "                {}: {},", field.method, default_expr);
            }
            let _ = writeln!(out, "            }})\n        }})\n    }}\n");
        }
    }

    /// A union field defaults to the default instance of its first
    /// declared member.
    fn default_field_expr(&self, field: &FieldCtx) -> String {
        if field.wraps_option {
            return "None".to_string();
        }
        match &field.descriptor.shape {
            TypeShape::Nested(name) => format!("{}::default_instance().clone()", name),
            TypeShape::Union(_) => {
                let enum_name = union_enum_name(&self.rust_name, &field.descriptor.name);
                let first = field
                    .rules
                    .and_then(|r| r.union.as_ref())
                    .and_then(|g| g.first())
                    .map(|g| g.member.clone())
                    .unwrap_or_default();
                format!("{enum_name}::{first}({first}::default_instance().clone())")
            }
            _ => "Default::default()".to_string(),
        }
    }

    fn emit_accessors(&self, out: &mut String) {
        for field in &self.fields {
            let expr = format!("self.inner.{}", field.method);
            let (ret, body) = if field.wraps_option {
                self.optional_accessor(field, &expr)
            } else {
                accessor(
                    &field.descriptor.shape,
                    &self.rust_name,
                    &field.descriptor.name,
                    &expr,
                )
            };
            let _ = writeln!(
                out,
                "    /// Field `{}`.\n    pub fn {}(&self) -> {} {{\n        {}\n    }}\n",
                field.descriptor.name, field.method, ret, body
            );
        }
    }

    fn optional_accessor(&self, field: &FieldCtx, expr: &str) -> (String, String) {
        if field.copy {
            return (format!("Option<{}>", field.storage), expr.to_string());
        }
        match &field.descriptor.shape {
            TypeShape::Primitive(PrimitiveKind::String | PrimitiveKind::Decimal)
            | TypeShape::Brand {
                base: PrimitiveKind::String | PrimitiveKind::Decimal,
                ..
            } => ("Option<&str>".to_string(), format!("{}.as_deref()", expr)),
            TypeShape::Array(element) => (
                format!(
                    "Option<&[{}]>",
                    storage_type(element, &self.rust_name, &field.descriptor.name)
                ),
                format!("{}.as_deref()", expr),
            ),
            _ => (
                format!("Option<&{}>", field.storage),
                format!("{}.as_ref()", expr),
            ),
        }
    }

    fn clone_args_except(&self, replaced: &FieldCtx, replacement: &str) -> String {
        self.fields
            .iter()
            .map(|f| {
                if f.index == replaced.index {
                    replacement.to_string()
                } else if f.copy {
                    format!("self.inner.{}", f.method)
                } else {
                    format!("self.inner.{}.clone()", f.method)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn emit_setters(&self, out: &mut String) {
        for field in &self.fields {
            let _ = writeln!(
                out,
                "    /// Replace `{name}`, returning a new instance. A value equal to the\n    /// current one returns a structurally shared clone.\n    pub fn set_{m}(&self, value: {ty}) -> Result<Self, ValidationError> {{\n        if value == self.inner.{m} {{\n            return Ok(self.share());\n        }}",
                name = field.descriptor.name,
                m = field.method,
                ty = field.full_storage
            );
            if field.has_check_fn() {
                if field.wraps_option {
                    if field.copy {
                        let _ = writeln!(
                            out,
                            "        if let Some(inner_value) = value {{\n            Self::check_{}(inner_value)?;\n        }}",
                            field.method
                        );
                    } else {
                        let _ = writeln!(
                            out,
                            "        if let Some(inner_value) = &value {{\n            Self::check_{}(inner_value)?;\n        }}",
                            field.method
                        );
                    }
                } else if field.copy {
                    let _ = writeln!(out, "        Self::check_{}(value)?;", field.method);
                } else {
                    let _ = writeln!(out, "        Self::check_{}(&value)?;", field.method);
                }
            }
            let _ = writeln!(
                out,
                "        Ok(Self::from_parts({}))\n    }}\n",
                self.clone_args_except(field, "value")
            );
        }
    }

    fn emit_bulk_update(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Apply a partial update; `None` keys are skipped.\n    pub fn update(&self, updates: {rust}Update{gen}) -> Result<Self, ValidationError> {{\n        let mut next = self.share();",
            rust = self.rust_name,
            gen = self.generics_use
        );
        for field in &self.fields {
            let _ = writeln!(
                out,
                "        if let Some(value) = updates.{m} {{\n            next = next.set_{m}(value)?;\n        }}",
                m = field.method
            );
        }
        let _ = writeln!(out, "        Ok(next)\n    }}\n");
    }

    fn emit_collection_mutators(&self, out: &mut String) {
        for field in &self.fields {
            if field.wraps_option {
                continue;
            }
            match &field.descriptor.shape {
                TypeShape::Array(element) => self.emit_array_mutators(out, field, element),
                TypeShape::Map { key, value } => self.emit_map_mutators(out, field, *key, value),
                TypeShape::Set(element) => self.emit_set_mutators(out, field, element),
                _ => {}
            }
        }
    }

    fn emit_with_helper(&self, out: &mut String, field: &FieldCtx) {
        let _ = writeln!(
            out,
            "    fn with_{m}(&self, {m}: Option<{ty}>) -> Self {{\n        match {m} {{\n            Some({m}) => Self::from_parts({args}),\n            None => self.share(),\n        }}\n    }}\n",
            m = field.method,
            ty = field.storage,
            args = self.clone_args_except(field, &field.method)
        );
    }

    fn emit_array_mutators(&self, out: &mut String, field: &FieldCtx, element: &TypeShape) {
        let elem = storage_type(element, &self.rust_name, &field.descriptor.name);
        let m = &field.method;
        self.emit_with_helper(out, field);

        let _ = writeln!(
            out,
            "    /// Append to `{name}`.\n    pub fn push_{m}(&self, value: {elem}) -> Self {{\n        self.with_{m}(collections::array_push(&self.inner.{m}, value))\n    }}\n\n    /// Drop the last element of `{name}`.\n    pub fn pop_{m}(&self) -> Self {{\n        self.with_{m}(collections::array_pop(&self.inner.{m}))\n    }}\n\n    /// Drop the first element of `{name}`.\n    pub fn shift_{m}(&self) -> Self {{\n        self.with_{m}(collections::array_shift(&self.inner.{m}))\n    }}\n\n    /// Prepend to `{name}`.\n    pub fn unshift_{m}(&self, value: {elem}) -> Self {{\n        self.with_{m}(collections::array_unshift(&self.inner.{m}, value))\n    }}\n\n    /// Splice `{name}`.\n    pub fn splice_{m}(&self, start: usize, delete_count: usize, insert: &[{elem}]) -> Self {{\n        self.with_{m}(collections::array_splice(\n            &self.inner.{m},\n            start,\n            delete_count,\n            insert,\n        ))\n    }}\n\n    /// Sort `{name}` by a comparator.\n    pub fn sort_{m}_by<F>(&self, compare: F) -> Self\n    where\n        F: FnMut(&{elem}, &{elem}) -> std::cmp::Ordering,\n    {{\n        self.with_{m}(collections::array_sort_by(&self.inner.{m}, compare))\n    }}\n\n    /// Reverse `{name}`.\n    pub fn reverse_{m}(&self) -> Self {{\n        self.with_{m}(collections::array_reverse(&self.inner.{m}))\n    }}\n\n    /// Fill a range of `{name}` with a value.\n    pub fn fill_{m}(&self, value: &{elem}, start: usize, end: usize) -> Self {{\n        self.with_{m}(collections::array_fill(&self.inner.{m}, value, start, end))\n    }}\n\n    /// Copy a range of `{name}` within itself.\n    pub fn copy_within_{m}(&self, dest: usize, src_start: usize, src_end: usize) -> Self {{\n        self.with_{m}(collections::array_copy_within(\n            &self.inner.{m},\n            dest,\n            src_start,\n            src_end,\n        ))\n    }}\n",
            name = field.descriptor.name,
            m = m,
            elem = elem
        );
    }

    fn emit_map_mutators(
        &self,
        out: &mut String,
        field: &FieldCtx,
        key: MapKeyKind,
        value: &TypeShape,
    ) {
        let key_ty = map_key_type(key);
        let value_ty = storage_type(value, &self.rust_name, &field.descriptor.name);
        let m = &field.method;
        self.emit_with_helper(out, field);

        let _ = writeln!(
            out,
            "    /// Insert or replace an entry of `{name}`.\n    pub fn insert_{m}(&self, key: {key}, value: {val}) -> Self {{\n        self.with_{m}(collections::map_insert(&self.inner.{m}, key, value))\n    }}\n\n    /// Remove an entry of `{name}`.\n    pub fn remove_{m}(&self, key: &{key}) -> Self {{\n        self.with_{m}(collections::map_remove(&self.inner.{m}, key))\n    }}\n\n    /// Remove every entry of `{name}`.\n    pub fn clear_{m}(&self) -> Self {{\n        self.with_{m}(collections::map_clear(&self.inner.{m}))\n    }}\n\n    /// Keep only entries of `{name}` matching the predicate.\n    pub fn retain_{m}<F>(&self, keep: F) -> Self\n    where\n        F: FnMut(&{key}, &{val}) -> bool,\n    {{\n        self.with_{m}(collections::map_retain(&self.inner.{m}, keep))\n    }}\n\n    /// Transform every value of `{name}`.\n    pub fn map_{m}_values<F>(&self, transform: F) -> Self\n    where\n        F: FnMut(&{key}, &{val}) -> {val},\n    {{\n        self.with_{m}(collections::map_values(&self.inner.{m}, transform))\n    }}\n\n    /// Merge entries into `{name}`, the argument winning on conflicts.\n    pub fn merge_{m}(&self, other: &BTreeMap<{key}, {val}>) -> Self {{\n        self.with_{m}(collections::map_merge(&self.inner.{m}, other))\n    }}\n\n    /// Transform the value of `{name}` under a key, when present.\n    pub fn update_{m}<F>(&self, key: &{key}, transform: F) -> Self\n    where\n        F: FnOnce(&{val}) -> {val},\n    {{\n        self.with_{m}(collections::map_update(&self.inner.{m}, key, transform))\n    }}\n",
            name = field.descriptor.name,
            m = m,
            key = key_ty,
            val = value_ty
        );
    }

    fn emit_set_mutators(&self, out: &mut String, field: &FieldCtx, element: &TypeShape) {
        let elem = storage_type(element, &self.rust_name, &field.descriptor.name);
        let m = &field.method;
        self.emit_with_helper(out, field);

        let _ = writeln!(
            out,
            "    /// Insert a member into `{name}`.\n    pub fn insert_{m}(&self, value: {elem}) -> Self {{\n        self.with_{m}(collections::set_insert(&self.inner.{m}, value))\n    }}\n\n    /// Remove a member of `{name}`.\n    pub fn remove_{m}(&self, value: &{elem}) -> Self {{\n        self.with_{m}(collections::set_remove(&self.inner.{m}, value))\n    }}\n\n    /// Remove every member of `{name}`.\n    pub fn clear_{m}(&self) -> Self {{\n        self.with_{m}(collections::set_clear(&self.inner.{m}))\n    }}\n\n    /// Keep only members of `{name}` matching the predicate.\n    pub fn retain_{m}<F>(&self, keep: F) -> Self\n    where\n        F: FnMut(&{elem}) -> bool,\n    {{\n        self.with_{m}(collections::set_retain(&self.inner.{m}, keep))\n    }}\n\n    /// Transform every member of `{name}`.\n    pub fn map_{m}<F>(&self, transform: F) -> Self\n    where\n        F: FnMut(&{elem}) -> {elem},\n    {{\n        self.with_{m}(collections::set_map(&self.inner.{m}, transform))\n    }}\n\n    /// Add every member of the argument to `{name}`.\n    pub fn merge_{m}(&self, other: &BTreeSet<{elem}>) -> Self {{\n        self.with_{m}(collections::set_merge(&self.inner.{m}, other))\n    }}\n",
            name = field.descriptor.name,
            m = m,
            elem = elem
        );
    }

    fn emit_equality(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Structural equality with another instance.\n    pub fn equals(&self, other: &Self) -> bool {{\n        self == other\n    }}\n"
        );

        let _ = writeln!(
            out,
            "    /// Structural hash, computed once per instance.\n    pub fn hash_code(&self) -> u64 {{\n        *self.inner.hash_cell.get_or_init(|| {{\n            use std::hash::{{Hash, Hasher}};\n            let mut hasher = std::collections::hash_map::DefaultHasher::new();\n            Self::TYPE_NAME.hash(&mut hasher);"
        );
        for field in &self.fields {
            self.emit_hash_stmt(out, field);
        }
        let _ = writeln!(out, "            hasher.finish()\n        }})\n    }}\n");
    }

    fn emit_hash_stmt(&self, out: &mut String, field: &FieldCtx) {
        let expr = format!("self.inner.{}", field.method);
        if field.wraps_option {
            let _ = writeln!(
                out,
                "            match &{expr} {{\n                Some(value) => {{\n                    1_u8.hash(&mut hasher);\n                    {stmt}\n                }}\n                None => 0_u8.hash(&mut hasher),\n            }}",
                expr = expr,
                stmt = self.hash_value_stmt(&field.descriptor.shape, "value", field, true)
            );
        } else {
            let _ = writeln!(
                out,
                "            {}",
                self.hash_value_stmt(&field.descriptor.shape, &expr, field, false)
            );
        }
    }

    fn hash_value_stmt(
        &self,
        shape: &TypeShape,
        expr: &str,
        field: &FieldCtx,
        borrowed: bool,
    ) -> String {
        let deref = if borrowed { "*" } else { "" };
        match shape {
            TypeShape::Primitive(PrimitiveKind::Number)
            | TypeShape::Brand {
                base: PrimitiveKind::Number,
                ..
            } => format!("({}{}).to_bits().hash(&mut hasher);", deref, expr),
            TypeShape::Array(element)
                if matches!(**element, TypeShape::Primitive(PrimitiveKind::Number)) =>
            {
                format!(
                    "for item in {}.iter() {{\n                item.to_bits().hash(&mut hasher);\n            }}",
                    expr
                )
            }
            TypeShape::Map { value, .. }
                if matches!(**value, TypeShape::Primitive(PrimitiveKind::Number)) =>
            {
                format!(
                    "for (key, value) in {}.iter() {{\n                key.hash(&mut hasher);\n                value.to_bits().hash(&mut hasher);\n            }}",
                    expr
                )
            }
            TypeShape::Nested(_) | TypeShape::GenericParam(_) => {
                format!("{}.hash_code().hash(&mut hasher);", expr)
            }
            TypeShape::Union(_) => {
                let enum_name = union_enum_name(&self.rust_name, &field.descriptor.name);
                let guards = field
                    .rules
                    .and_then(|r| r.union.as_ref())
                    .map(|g| g.as_slice())
                    .unwrap_or(&[]);
                let mut arms = String::new();
                for (index, guard) in guards.iter().enumerate() {
                    let _ = write!(
                        arms,
                        "\n                {}::{}(inner) => {{\n                    {}_u8.hash(&mut hasher);\n                    inner.hash_code().hash(&mut hasher);\n                }}",
                        enum_name, guard.member, index
                    );
                }
                format!("match &{} {{{}\n            }}", expr, arms)
            }
            _ => format!("{}.hash(&mut hasher);", expr),
        }
    }

    fn emit_serialize(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Encode into the tagged wire form.\n    pub fn serialize(&self) -> String {{\n        let mut values: Vec<(&FieldSpec, Value)> = Vec::new();"
        );
        for field in &self.fields {
            let spec = format!("&{}_FIELDS[{}]", self.prefix, field.index);
            if field.wraps_option {
                let inner = self.to_value_expr(&field.descriptor.shape, "value", field, true);
                if field.descriptor.optional {
                    let _ = writeln!(
                        out,
                        "        if let Some(value) = &self.inner.{m} {{\n            values.push(({spec}, {inner}));\n        }}",
                        m = field.method,
                        spec = spec,
                        inner = inner
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "        match &self.inner.{m} {{\n            Some(value) => values.push(({spec}, {inner})),\n            None => values.push(({spec}, Value::Null)),\n        }}",
                        m = field.method,
                        spec = spec,
                        inner = inner
                    );
                }
            } else {
                let expr = format!("self.inner.{}", field.method);
                let value = self.to_value_expr(&field.descriptor.shape, &expr, field, false);
                let _ = writeln!(out, "        values.push(({}, {}));", spec, value);
            }
        }
        let _ = writeln!(
            out,
            "        tagged::encode(&{}_DESCRIPTOR, &values)\n    }}\n",
            self.prefix
        );
    }

    fn to_value_expr(
        &self,
        shape: &TypeShape,
        expr: &str,
        field: &FieldCtx,
        borrowed: bool,
    ) -> String {
        let deref = if borrowed { "*" } else { "" };
        match shape {
            TypeShape::Primitive(PrimitiveKind::Number)
            | TypeShape::Brand {
                base: PrimitiveKind::Number,
                ..
            } => format!("Value::Float({}{})", deref, expr),
            TypeShape::Primitive(PrimitiveKind::Int)
            | TypeShape::Brand {
                base: PrimitiveKind::Int,
                ..
            } => format!("Value::Int({}{})", deref, expr),
            TypeShape::Primitive(PrimitiveKind::Bool)
            | TypeShape::Brand {
                base: PrimitiveKind::Bool,
                ..
            } => format!("Value::Bool({}{})", deref, expr),
            TypeShape::Primitive(PrimitiveKind::String)
            | TypeShape::Brand {
                base: PrimitiveKind::String,
                ..
            } => format!("Value::Str({}.clone())", expr),
            TypeShape::Primitive(PrimitiveKind::Decimal)
            | TypeShape::Brand {
                base: PrimitiveKind::Decimal,
                ..
            } => format!("Value::Decimal({}.clone())", expr),
            TypeShape::Array(element) | TypeShape::Set(element) => {
                let item = self.to_value_expr(element, "item", field, true);
                format!(
                    "Value::Array({}.iter().map(|item| {}).collect())",
                    expr, item
                )
            }
            TypeShape::Map { key, value } => {
                let key_expr = match key {
                    MapKeyKind::String => "MapKey::Str(key.clone())",
                    MapKeyKind::Int => "MapKey::Int(*key)",
                    MapKeyKind::Bool => "MapKey::Bool(*key)",
                };
                let value_expr = self.to_value_expr(value, "value", field, true);
                format!(
                    "Value::Map({}.iter().map(|(key, value)| ({}, {})).collect())",
                    expr, key_expr, value_expr
                )
            }
            TypeShape::Nested(_) | TypeShape::GenericParam(_) => format!(
                "Value::from_json(\n                &serde_json::from_str::<serde_json::Value>(&{}.serialize())\n                    .expect(\"generated envelope is valid JSON\"),\n            )",
                expr
            ),
            TypeShape::Union(_) => format!("{}.to_value()", expr),
        }
    }

    fn emit_deserialize(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Decode from the tagged wire form.\n    pub fn deserialize(text: &str) -> Result<Self, DecodeError> {{\n        let envelope = tagged::decode_for(&{}_DESCRIPTOR, text)?;\n",
            self.prefix
        );
        for field in &self.fields {
            let spec = format!("&{}_FIELDS[{}]", self.prefix, field.index);
            let decode = self.decode_expr(&field.descriptor.shape, "raw", &field.descriptor.name, 0);
            if field.wraps_option {
                let null_arm = if field.descriptor.nullable {
                    "Some(raw) if raw.is_null() => None,".to_string()
                } else {
                    format!(
                        "Some(raw) if raw.is_null() => {{\n                return Err(DecodeError::wrong_type({:?}, \"non-null value\"));\n            }}",
                        field.descriptor.name
                    )
                };
                let none_arm = if field.descriptor.optional {
                    "None => None,".to_string()
                } else {
                    format!(
                        "None => return Err(DecodeError::missing_field({:?})),",
                        field.descriptor.name
                    )
                };
                let _ = writeln!(
                    out,
                    "        let {m} = match envelope.field_value({spec}) {{\n            {null_arm}\n            Some(raw) => Some({decode}),\n            {none_arm}\n        }};",
                    m = field.method,
                    spec = spec,
                    null_arm = null_arm,
                    decode = decode,
                    none_arm = none_arm
                );
            } else {
                let _ = writeln!(
                    out,
                    "        let {m} = match envelope.field_value({spec}) {{\n            Some(raw) => {decode},\n            None => return Err(DecodeError::missing_field({name:?})),\n        }};",
                    m = field.method,
                    spec = spec,
                    decode = decode,
                    name = field.descriptor.name
                );
            }
        }
        let args: Vec<String> = self.fields.iter().map(|f| f.method.clone()).collect();
        let _ = writeln!(
            out,
            "\n        Self::construct({rust}Props {{ {args} }}).map_err(DecodeError::from)\n    }}\n",
            rust = self.rust_name,
            args = args.join(", ")
        );
    }

    fn decode_expr(&self, shape: &TypeShape, raw: &str, field_name: &str, depth: usize) -> String {
        match shape {
            TypeShape::Primitive(PrimitiveKind::Number)
            | TypeShape::Brand {
                base: PrimitiveKind::Number,
                ..
            } => format!(
                "{raw}.as_f64()\n                .ok_or_else(|| DecodeError::wrong_type({name:?}, \"number\"))?",
                raw = raw,
                name = field_name
            ),
            TypeShape::Primitive(PrimitiveKind::Int)
            | TypeShape::Brand {
                base: PrimitiveKind::Int,
                ..
            } => format!(
                "{raw}.as_i64()\n                .ok_or_else(|| DecodeError::wrong_type({name:?}, \"integer\"))?",
                raw = raw,
                name = field_name
            ),
            TypeShape::Primitive(PrimitiveKind::Bool)
            | TypeShape::Brand {
                base: PrimitiveKind::Bool,
                ..
            } => format!(
                "{raw}.as_bool()\n                .ok_or_else(|| DecodeError::wrong_type({name:?}, \"boolean\"))?",
                raw = raw,
                name = field_name
            ),
            TypeShape::Primitive(PrimitiveKind::String | PrimitiveKind::Decimal)
            | TypeShape::Brand {
                base: PrimitiveKind::String | PrimitiveKind::Decimal,
                ..
            } => format!(
                "{raw}.as_str()\n                .ok_or_else(|| DecodeError::wrong_type({name:?}, \"string\"))?\n                .to_string()",
                raw = raw,
                name = field_name
            ),
            TypeShape::Array(element) => {
                let item = format!("item{}", depth);
                let inner = self.decode_expr(element, &item, field_name, depth + 1);
                format!(
                    "{{\n                let items = {raw}.as_array()\n                    .ok_or_else(|| DecodeError::wrong_type({name:?}, \"array\"))?;\n                let mut out = Vec::with_capacity(items.len());\n                for {item} in items {{\n                    out.push({inner});\n                }}\n                out\n            }}",
                    raw = raw,
                    name = field_name,
                    item = item,
                    inner = inner
                )
            }
            TypeShape::Set(element) => {
                let item = format!("item{}", depth);
                let inner = self.decode_expr(element, &item, field_name, depth + 1);
                format!(
                    "{{\n                let items = {raw}.as_array()\n                    .ok_or_else(|| DecodeError::wrong_type({name:?}, \"array\"))?;\n                let mut out = BTreeSet::new();\n                for {item} in items {{\n                    out.insert({inner});\n                }}\n                out\n            }}",
                    raw = raw,
                    name = field_name,
                    item = item,
                    inner = inner
                )
            }
            TypeShape::Map { key, value } => {
                let item = format!("item{}", depth);
                let inner = self.decode_expr(value, &item, field_name, depth + 1);
                let key_expr = match key {
                    MapKeyKind::String => "key.clone()".to_string(),
                    MapKeyKind::Int => format!(
                        "key.parse::<i64>()\n                        .map_err(|_| DecodeError::wrong_type({:?}, \"integer key\"))?",
                        field_name
                    ),
                    MapKeyKind::Bool => format!(
                        "key.parse::<bool>()\n                        .map_err(|_| DecodeError::wrong_type({:?}, \"boolean key\"))?",
                        field_name
                    ),
                };
                format!(
                    "{{\n                let object = {raw}.as_object()\n                    .ok_or_else(|| DecodeError::wrong_type({name:?}, \"object\"))?;\n                let mut out = BTreeMap::new();\n                for (key, {item}) in object {{\n                    out.insert({key_expr}, {inner});\n                }}\n                out\n            }}",
                    raw = raw,
                    name = field_name,
                    item = item,
                    key_expr = key_expr,
                    inner = inner
                )
            }
            TypeShape::Nested(name) => {
                format!("{}::deserialize(&{}.to_string())?", name, raw)
            }
            TypeShape::GenericParam(name) => {
                format!("{}::deserialize(&{}.to_string())?", name, raw)
            }
            TypeShape::Union(_) => {
                let enum_name = union_enum_name(&self.rust_name, field_name);
                format!("{}::from_json({})?", enum_name, raw)
            }
        }
    }

    fn emit_is_instance(&self, out: &mut String) {
        if self.schema.compact {
            let _ = writeln!(
                out,
                "    /// Whether the wire text is a `{name}` payload (tagged or embedded\n    /// compact).\n    pub fn is_instance(text: &str) -> bool {{\n        compact::peek_discriminator(text) == Some({prefix}_DESCRIPTOR.type_id)\n            || tagged::peek_type_id(text).as_deref() == Some({prefix}_DESCRIPTOR.type_id)\n    }}\n",
                name = self.schema.name,
                prefix = self.prefix
            );
        } else {
            let _ = writeln!(
                out,
                "    /// Whether the wire text is a `{name}` payload.\n    pub fn is_instance(text: &str) -> bool {{\n        tagged::peek_type_id(text).as_deref() == Some({prefix}_DESCRIPTOR.type_id)\n    }}\n",
                name = self.schema.name,
                prefix = self.prefix
            );
        }
    }

    fn emit_validate_all(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Validate an untyped value against the schema, collecting every\n    /// violation.\n    pub fn validate_all(data: &Value) -> ValidationIssues {{\n        let mut issues = ValidationIssues::new();\n        let entries = match data {{\n            Value::Map(entries) => entries,\n            other => {{\n                issues.push(ValidationError::new(\n                    \"$root\",\n                    \"expected a field map\",\n                    other.render(),\n                    \"shape.map\",\n                ));\n                return issues;\n            }}\n        }};\n"
        );

        for field in &self.fields {
            self.emit_validate_field(out, field);
        }

        let _ = writeln!(out, "        issues\n    }}\n");
    }

    fn emit_validate_field(&self, out: &mut String, field: &FieldCtx) {
        let name = &field.descriptor.name;
        let _ = writeln!(
            out,
            "        match entries.get(&MapKey::Str({:?}.to_string())) {{",
            name
        );

        if field.descriptor.nullable {
            let _ = writeln!(out, "            Some(Value::Null) => {{}}");
        }

        let check_call = |value_expr: &str| -> String {
            if field.checks().is_empty() || !field.has_check_fn() {
                String::new()
            } else {
                format!(
                    " {{\n                if let Err(err) = Self::check_{}({}) {{\n                    issues.push(err);\n                }}\n            }}",
                    field.method, value_expr
                )
            }
        };

        match &field.descriptor.shape {
            TypeShape::Primitive(PrimitiveKind::Number)
            | TypeShape::Brand {
                base: PrimitiveKind::Number,
                ..
            } => {
                let with_checks = !field.checks().is_empty();
                if with_checks {
                    let _ = writeln!(
                        out,
                        "            Some(Value::Float(value)) =>{}",
                        check_call("*value")
                    );
                    let _ = writeln!(
                        out,
                        "            Some(Value::Int(value)) =>{}",
                        check_call("*value as f64")
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "            Some(Value::Float(_)) | Some(Value::Int(_)) => {{}}"
                    );
                }
                self.emit_validate_tail(out, field, "a number", "shape.number");
            }
            TypeShape::Primitive(PrimitiveKind::Int)
            | TypeShape::Brand {
                base: PrimitiveKind::Int,
                ..
            } => {
                if field.checks().is_empty() {
                    let _ = writeln!(out, "            Some(Value::Int(_)) => {{}}");
                } else {
                    let _ = writeln!(
                        out,
                        "            Some(Value::Int(value)) =>{}",
                        check_call("*value")
                    );
                }
                self.emit_validate_tail(out, field, "an integer", "shape.int");
            }
            TypeShape::Primitive(PrimitiveKind::Bool)
            | TypeShape::Brand {
                base: PrimitiveKind::Bool,
                ..
            } => {
                let _ = writeln!(out, "            Some(Value::Bool(_)) => {{}}");
                self.emit_validate_tail(out, field, "a boolean", "shape.bool");
            }
            TypeShape::Primitive(PrimitiveKind::String | PrimitiveKind::Decimal)
            | TypeShape::Brand {
                base: PrimitiveKind::String | PrimitiveKind::Decimal,
                ..
            } => {
                if field.checks().is_empty() {
                    let _ = writeln!(out, "            Some(Value::Str(_)) => {{}}");
                } else {
                    let _ = writeln!(
                        out,
                        "            Some(Value::Str(value)) =>{}",
                        check_call("value")
                    );
                }
                self.emit_validate_tail(out, field, "a string", "shape.string");
            }
            TypeShape::Array(element) => {
                match element_pattern(element) {
                    Some((pattern, expected)) => {
                        let _ = writeln!(
                            out,
                            "            Some(Value::Array(items)) => {{\n                for item in items {{\n                    if !matches!(item, {pattern}) {{\n                        issues.push(ValidationError::new(\n                            {name:?},\n                            \"expected {expected} elements\",\n                            item.render(),\n                            \"shape.element\",\n                        ));\n                    }}\n                }}\n            }}",
                            pattern = pattern,
                            name = name,
                            expected = expected
                        );
                    }
                    None => {
                        let _ = writeln!(out, "            Some(Value::Array(_)) => {{}}");
                    }
                }
                self.emit_validate_tail(out, field, "an array", "shape.array");
            }
            TypeShape::Set(_) => {
                let _ = writeln!(
                    out,
                    "            Some(Value::Set(_)) | Some(Value::Array(_)) => {{}}"
                );
                self.emit_validate_tail(out, field, "a set", "shape.set");
            }
            TypeShape::Map { .. } | TypeShape::Nested(_) => {
                let _ = writeln!(out, "            Some(Value::Map(_)) => {{}}");
                self.emit_validate_tail(out, field, "a field map", "shape.map");
            }
            TypeShape::Union(_) => {
                let guards = field
                    .rules
                    .and_then(|r| r.union.as_ref())
                    .map(|g| g.as_slice())
                    .unwrap_or(&[]);
                let guard_expr: Vec<String> = guards
                    .iter()
                    .map(|g| format!("{}::is_instance(text)", g.member))
                    .collect();
                let _ = writeln!(
                    out,
                    "            Some(Value::Str(text)) if {} => {{}}\n            Some(Value::Map(_)) => {{}}",
                    guard_expr.join(" || ")
                );
                let _ = writeln!(
                    out,
                    "            Some(other) => issues.push(ValidationError::new(\n                {name:?},\n                \"value matched no union member\",\n                other.render(),\n                \"union.unmatched\",\n            )),",
                    name = name
                );
                self.emit_validate_missing(out, field);
            }
            TypeShape::GenericParam(_) => {
                let _ = writeln!(out, "            Some(_) => {{}}");
                self.emit_validate_missing(out, field);
            }
        }

        let _ = writeln!(out, "        }}\n");
    }

    fn emit_validate_tail(&self, out: &mut String, field: &FieldCtx, expected: &str, code: &str) {
        let _ = writeln!(
            out,
            "            Some(other) => issues.push(ValidationError::new(\n                {name:?},\n                \"expected {expected}\",\n                other.render(),\n                {code:?},\n            )),",
            name = field.descriptor.name,
            expected = expected,
            code = code
        );
        self.emit_validate_missing(out, field);
    }

    fn emit_validate_missing(&self, out: &mut String, field: &FieldCtx) {
        if field.descriptor.optional {
            let _ = writeln!(out, "            None => {{}}");
        } else {
            let _ = writeln!(
                out,
                "            None => issues.push(ValidationError::new(\n                {name:?},\n                \"missing required field\",\n                \"nothing\",\n                \"field.missing\",\n            )),",
                name = field.descriptor.name
            );
        }
    }

    fn emit_register(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "    /// Register this type's capabilities for dynamic dispatch.\n    pub fn register(registry: &mut msgforge::TypeRegistry) -> Result<(), msgforge::registry::DuplicateTypeId> {{\n        registry.register(msgforge::TypeEntry {{\n            type_name: Self::TYPE_NAME,\n            type_id: {prefix}_DESCRIPTOR.type_id,\n            type_hash: Self::TYPE_HASH,\n            compact: {compact},\n            is_instance: Self::is_instance,\n        }})\n    }}\n",
            prefix = self.prefix,
            compact = self.schema.compact
        );
    }

    fn emit_trait_impls(&self, out: &mut String) {
        // PartialEq
        let _ = writeln!(
            out,
            "impl{gen} PartialEq for {rust}{use_} {{\n    fn eq(&self, other: &Self) -> bool {{\n        if Arc::ptr_eq(&self.inner, &other.inner) {{\n            return true;\n        }}",
            gen = self.generics_decl,
            rust = self.rust_name,
            use_ = self.generics_use
        );
        let comparisons: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("self.inner.{m} == other.inner.{m}", m = f.method))
            .collect();
        if comparisons.is_empty() {
            let _ = writeln!(out, "        true\n    }}\n}}\n");
        } else {
            let _ = writeln!(out, "        {}\n    }}\n}}\n", comparisons.join("\n            && "));
        }

        // Hash
        let _ = writeln!(
            out,
            "impl{gen} std::hash::Hash for {rust}{use_} {{\n    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {{\n        state.write_u64(self.hash_code());\n    }}\n}}\n",
            gen = self.generics_decl,
            rust = self.rust_name,
            use_ = self.generics_use
        );

        if self.generic {
            return;
        }

        // Message
        let _ = writeln!(
            out,
            "impl Message for {rust} {{\n    const TYPE_NAME: &'static str = {name:?};\n    const TYPE_HASH: &'static str = {hash:?};\n\n    fn descriptor() -> &'static MessageDescriptor {{\n        &{prefix}_DESCRIPTOR\n    }}\n\n    fn default_instance() -> &'static Self {{\n        {rust}::default_instance()\n    }}\n\n    fn serialize(&self) -> String {{\n        {rust}::serialize(self)\n    }}\n\n    fn deserialize(text: &str) -> Result<Self, DecodeError> {{\n        {rust}::deserialize(text)\n    }}\n\n    fn hash_code(&self) -> u64 {{\n        {rust}::hash_code(self)\n    }}\n\n    fn validate_all(data: &Value) -> ValidationIssues {{\n        {rust}::validate_all(data)\n    }}\n}}\n",
            rust = self.rust_name,
            name = self.schema.name,
            hash = self.schema.hash,
            prefix = self.prefix
        );

        if self.schema.compact {
            self.emit_compact_impl(out);
        }
    }

    fn emit_compact_impl(&self, out: &mut String) {
        // Sealing guarantees exactly one scalar field.
        let field = &self.fields[0];
        let base = match &field.descriptor.shape {
            TypeShape::Primitive(kind) | TypeShape::Brand { base: kind, .. } => *kind,
            _ => return,
        };

        let to_compact = match base {
            PrimitiveKind::String | PrimitiveKind::Decimal => {
                format!("self.inner.{}.clone()", field.method)
            }
            _ => format!("self.inner.{}.to_string()", field.method),
        };

        let from_compact = match base {
            PrimitiveKind::String | PrimitiveKind::Decimal => format!(
                "Self::construct({rust}Props {{ {m}: text.to_string() }}).map_err(DecodeError::from)",
                rust = self.rust_name,
                m = field.method
            ),
            _ => format!(
                "let {m}: {ty} = text\n            .parse()\n            .map_err(|_| DecodeError::wrong_type({name:?}, {expected:?}))?;\n        Self::construct({rust}Props {{ {m} }}).map_err(DecodeError::from)",
                m = field.method,
                ty = primitive_type(base),
                name = field.descriptor.name,
                expected = match base {
                    PrimitiveKind::Number => "number",
                    PrimitiveKind::Int => "integer",
                    PrimitiveKind::Bool => "boolean",
                    _ => "value",
                },
                rust = self.rust_name
            ),
        };

        let _ = writeln!(
            out,
            "impl CompactMessage for {rust} {{\n    fn to_compact(&self) -> String {{\n        {to_compact}\n    }}\n\n    fn from_compact(text: &str) -> Result<Self, DecodeError> {{\n        {from_compact}\n    }}\n}}\n",
            rust = self.rust_name,
            to_compact = to_compact,
            from_compact = from_compact
        );
    }
}

/// The `matches!` pattern for primitive array elements, with a human name.
fn element_pattern(element: &TypeShape) -> Option<(&'static str, &'static str)> {
    match element {
        TypeShape::Primitive(PrimitiveKind::String) => Some(("Value::Str(_)", "string")),
        TypeShape::Primitive(PrimitiveKind::Number) => {
            Some(("Value::Float(_) | Value::Int(_)", "number"))
        }
        TypeShape::Primitive(PrimitiveKind::Int) => Some(("Value::Int(_)", "integer")),
        TypeShape::Primitive(PrimitiveKind::Bool) => Some(("Value::Bool(_)", "boolean")),
        TypeShape::Primitive(PrimitiveKind::Decimal) => {
            Some(("Value::Decimal(_) | Value::Str(_)", "decimal"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ValidatorArg, ValidatorRef, WrapperKind};
    use crate::registry::{DeclaredType, TypeNameRegistry};
    use crate::resolver::{resolve, BrandRegistry, ResolveMode, ValidatorRegistry};

    fn emit(schema: &CanonicalSchema) -> String {
        let mut types = TypeNameRegistry::new();
        for name in ["Point", "Circle", "Square", "Drawing", "Entity"] {
            types.register(DeclaredType {
                name: name.to_string(),
                wrapper: WrapperKind::Plain,
                compact: name == "Circle" || name == "Square",
            });
        }
        let (rules, diagnostics) = resolve(
            schema,
            &ValidatorRegistry::with_builtins(),
            &BrandRegistry::new(),
            &types,
            ResolveMode::Strict,
        );
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.items());
        let mut out = String::new();
        emit_type(schema, &rules.unwrap(), &mut out);
        out
    }

    fn point_schema() -> CanonicalSchema {
        let fields = vec![
            FieldDescriptor::new("x", TypeShape::Primitive(PrimitiveKind::Number)).with_tag(1),
            FieldDescriptor::new("y", TypeShape::Primitive(PrimitiveKind::Number))
                .with_tag(2)
                .with_validators(vec![ValidatorRef::new("min", vec![ValidatorArg::Int(0)])]),
            FieldDescriptor::new(
                "tags",
                TypeShape::array(TypeShape::Primitive(PrimitiveKind::String)),
            )
            .with_tag(3),
        ];
        let hash = crate::hash::compute("Point", &WrapperKind::Plain, false, &fields);
        CanonicalSchema {
            name: "Point".to_string(),
            fields,
            type_params: vec![],
            wrapper: WrapperKind::Plain,
            compact: false,
            type_id: None,
            extend: None,
            hash,
        }
    }

    #[test]
    fn test_emits_full_contract_surface() {
        let code = emit(&point_schema());

        for needle in [
            "pub struct Point {",
            "pub struct PointProps {",
            "pub struct PointUpdate {",
            "pub fn construct(props: PointProps) -> Result<Self, ValidationError>",
            "pub fn construct_unchecked(props: PointProps) -> Self",
            "pub fn default_instance() -> &'static Self",
            "pub fn set_x(&self, value: f64) -> Result<Self, ValidationError>",
            "pub fn push_tags(&self, value: String) -> Self",
            "pub fn pop_tags(&self) -> Self",
            "pub fn splice_tags(",
            "pub fn copy_within_tags(",
            "pub fn equals(&self, other: &Self) -> bool",
            "pub fn hash_code(&self) -> u64",
            "pub fn serialize(&self) -> String",
            "pub fn deserialize(text: &str) -> Result<Self, DecodeError>",
            "pub fn is_instance(text: &str) -> bool",
            "pub fn validate_all(data: &Value) -> ValidationIssues",
            "impl Message for Point {",
            "impl PartialEq for Point {",
        ] {
            assert!(code.contains(needle), "missing `{}` in:\n{}", needle, code);
        }
    }

    #[test]
    fn test_emitted_validator_condition() {
        let code = emit(&point_schema());
        assert!(code.contains("if !(value >= 0_f64)"));
        assert!(code.contains("\"range.min\""));
    }

    #[test]
    fn test_no_op_paths_share_storage() {
        let code = emit(&point_schema());
        assert!(code.contains("if value == self.inner.x {\n            return Ok(self.share());"));
        assert!(code.contains("None => self.share(),"));
    }

    #[test]
    fn test_descriptor_carries_hash_and_tags() {
        let schema = point_schema();
        let code = emit(&schema);
        assert!(code.contains(&format!("type_hash: {:?}", schema.hash)));
        assert!(code.contains("tag: Some(1)"));
    }

    #[test]
    fn test_union_field_emits_closed_enum() {
        let fields = vec![
            FieldDescriptor::new("name", TypeShape::Primitive(PrimitiveKind::String)).with_tag(1),
            FieldDescriptor::new(
                "shape",
                TypeShape::Union(vec!["Circle".to_string(), "Square".to_string()]),
            )
            .with_tag(2),
        ];
        let hash = crate::hash::compute("Drawing", &WrapperKind::Plain, false, &fields);
        let schema = CanonicalSchema {
            name: "Drawing".to_string(),
            fields,
            type_params: vec![],
            wrapper: WrapperKind::Plain,
            compact: false,
            type_id: None,
            extend: None,
            hash,
        };
        let code = emit(&schema);

        assert!(code.contains("pub enum DrawingShape {"));
        assert!(code.contains("Circle(Circle),"));
        assert!(code.contains("from_compact_embedded(text).map(Self::Circle)"));
        assert!(code.contains("DecodeError::UnmatchedUnion"));
    }

    #[test]
    fn test_compact_type_emits_compact_impl() {
        let fields = vec![
            FieldDescriptor::new("radius", TypeShape::Primitive(PrimitiveKind::Number)).with_tag(1)
        ];
        let hash = crate::hash::compute("Circle", &WrapperKind::Plain, true, &fields);
        let schema = CanonicalSchema {
            name: "Circle".to_string(),
            fields,
            type_params: vec![],
            wrapper: WrapperKind::Plain,
            compact: true,
            type_id: None,
            extend: None,
            hash,
        };
        let code = emit(&schema);

        assert!(code.contains("impl CompactMessage for Circle {"));
        assert!(code.contains("compact::peek_discriminator(text)"));
    }

    #[test]
    fn test_extendable_type_uses_base_name() {
        let fields = vec![
            FieldDescriptor::new("id", TypeShape::Primitive(PrimitiveKind::String)).with_tag(1)
        ];
        let hash = crate::hash::compute("Widget", &WrapperKind::Plain, false, &fields);
        let schema = CanonicalSchema {
            name: "Widget".to_string(),
            fields,
            type_params: vec![],
            wrapper: WrapperKind::Plain,
            compact: false,
            type_id: None,
            extend: Some(crate::ir::ExtendInfo::new("src/widget_ext.rs")),
            hash,
        };
        let code = emit(&schema);

        // The base implementation has a distinct internal name; the wire
        // identity keeps the declared name.
        assert!(code.contains("pub struct WidgetBase {"));
        assert!(!code.contains("pub struct Widget {"));
        assert!(code.contains("type_name: \"Widget\""));
        assert!(code.contains("src/widget_ext.rs"));
        assert!(code.contains("impl Message for WidgetBase {"));
    }

    #[test]
    fn test_optional_field_decode_and_serialize() {
        let fields = vec![
            FieldDescriptor::new("name", TypeShape::Primitive(PrimitiveKind::String)).with_tag(1),
            FieldDescriptor::new("note", TypeShape::Primitive(PrimitiveKind::String))
                .with_tag(2)
                .with_optional(true),
        ];
        let hash = crate::hash::compute("Entity", &WrapperKind::Plain, false, &fields);
        let schema = CanonicalSchema {
            name: "Entity".to_string(),
            fields,
            type_params: vec![],
            wrapper: WrapperKind::Plain,
            compact: false,
            type_id: None,
            extend: None,
            hash,
        };
        let code = emit(&schema);

        assert!(code.contains("pub note: Option<String>,"));
        assert!(code.contains("if let Some(value) = &self.inner.note {"));
        assert!(code.contains("None => None,"));
        assert!(code.contains("pub fn note(&self) -> Option<&str> {"));
    }
}
