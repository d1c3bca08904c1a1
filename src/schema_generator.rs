use crate::model::{Model, ModelProperties, ModelProperty};
use crate::type_resolver::{is_primitive_type, FieldDef, FieldType, TypeKind, TypeMapping, TypeResolver};
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Builds Swagger 1.2 models from the struct definitions referenced by operations.
///
/// Field types are collapsed through the same [`TypeMapping`] as annotation tokens, so a
/// `NullString` field documents as `string` just like a `NullString` parameter.
pub struct SchemaGenerator {
    type_resolver: TypeResolver,
    type_mapping: TypeMapping,
    /// Models generated so far, `None` for names without a struct definition
    cache: HashMap<String, Option<Model>>,
}

impl SchemaGenerator {
    pub fn new(type_resolver: TypeResolver, type_mapping: TypeMapping) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            type_resolver,
            type_mapping,
            cache: HashMap::new(),
        }
    }

    /// Models for `type_names` and every model they reference, keyed by model id.
    ///
    /// Names that are primitives or have no struct definition in the sources are skipped.
    pub fn collect_models<'n>(&mut self, type_names: impl IntoIterator<Item = &'n str>) -> BTreeMap<String, Model> {
        let mut collected = BTreeMap::new();
        let mut pending: Vec<String> = type_names.into_iter().map(str::to_string).collect();

        while let Some(name) = pending.pop() {
            if collected.contains_key(&name) || is_primitive_type(&name) {
                continue;
            }
            if let Some(model) = self.generate_model(&name) {
                pending.extend(model_references(&model));
                collected.insert(name, model);
            }
        }

        collected
    }

    /// Generate the model for one struct, without following references.
    pub fn generate_model(&mut self, type_name: &str) -> Option<Model> {
        if let Some(cached) = self.cache.get(type_name) {
            return cached.clone();
        }

        // Placeholder guards against a struct flattening itself
        self.cache.insert(type_name.to_string(), None);

        let model = match self.type_resolver.resolve_type(type_name).map(|resolved| resolved.kind) {
            Some(TypeKind::Struct(fields)) => Some(self.struct_model(type_name, &fields)),
            Some(TypeKind::Enum(_)) | None => None,
        };

        self.cache.insert(type_name.to_string(), model.clone());
        model
    }

    fn struct_model(&mut self, type_name: &str, fields: &[FieldDef]) -> Model {
        debug!("Generating model for struct: {}", type_name);
        let mut model = Model {
            id: type_name.to_string(),
            required: Vec::new(),
            properties: ModelProperties::new(),
        };

        for field in fields.iter().filter(|f| !f.serde_attrs.skip) {
            if field.serde_attrs.flatten {
                if let FieldType::Named(inner) = &field.ty {
                    if let Some(flattened) = self.generate_model(inner) {
                        model.required.extend(flattened.required);
                        model.properties.extend(flattened.properties);
                    }
                }
                continue;
            }

            let name = field.serde_attrs.rename.clone().unwrap_or_else(|| field.name.clone());
            let mut property = self.property_for(&field.ty);
            property.description = field.doc.clone();

            if !matches!(field.ty, FieldType::Option(_)) {
                model.required.push(name.clone());
            }
            model.properties.insert(name, property);
        }

        model
    }

    fn property_for(&mut self, ty: &FieldType) -> ModelProperty {
        match ty {
            FieldType::Option(inner) => self.property_for(inner),
            FieldType::Vec(inner) => ModelProperty {
                property_type: Some("array".to_string()),
                items: Some(Box::new(self.property_for(inner))),
                ..ModelProperty::default()
            },
            FieldType::Named(name) => {
                let name = self.type_mapping.resolve(name).to_string();
                if let Some((property_type, format)) = primitive_property(&name) {
                    return ModelProperty {
                        property_type: Some(property_type.to_string()),
                        format: format.map(str::to_string),
                        ..ModelProperty::default()
                    };
                }
                match self.type_resolver.resolve_type(&name).map(|resolved| resolved.kind) {
                    Some(TypeKind::Enum(variants)) => ModelProperty {
                        property_type: Some("string".to_string()),
                        enum_values: Some(variants),
                        ..ModelProperty::default()
                    },
                    _ => ModelProperty {
                        reference: Some(name),
                        ..ModelProperty::default()
                    },
                }
            }
            FieldType::Unsupported => ModelProperty {
                property_type: Some("object".to_string()),
                ..ModelProperty::default()
            },
        }
    }
}

/// Swagger type and format of a primitive name, `None` for everything else.
fn primitive_property(name: &str) -> Option<(&'static str, Option<&'static str>)> {
    let mapped = match name {
        "String" | "str" | "char" | "string" | "Uuid" => ("string", None),
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" | "int" => ("integer", Some("int32")),
        "i64" | "i128" | "isize" | "u64" | "u128" | "usize" | "long" => ("integer", Some("int64")),
        "integer" => ("integer", None),
        "f32" | "float" => ("number", Some("float")),
        "f64" | "double" => ("number", Some("double")),
        "number" => ("number", None),
        "bool" | "boolean" => ("boolean", None),
        "NaiveDate" | "date" => ("string", Some("date")),
        "DateTime" | "NaiveDateTime" | "dateTime" => ("string", Some("date-time")),
        _ => return None,
    };
    Some(mapped)
}

/// Names of the models a model points at through `$ref`, directly or via array items.
fn model_references(model: &Model) -> Vec<String> {
    fn walk(property: &ModelProperty, refs: &mut HashSet<String>) {
        if let Some(reference) = &property.reference {
            refs.insert(reference.clone());
        }
        if let Some(items) = &property.items {
            walk(items, refs);
        }
    }

    let mut refs = HashSet::new();
    for property in model.properties.values() {
        walk(property, &mut refs);
    }
    let mut refs: Vec<String> = refs.into_iter().collect();
    refs.sort();
    refs
}
