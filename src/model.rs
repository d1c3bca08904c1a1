//! Swagger 1.2 documentation model.
//!
//! These types are what the extractor produces, what the [`crate::spec_builder`] aggregates
//! and what the [`crate::codegen`] serializes. Field order in every struct is the order the
//! fields appear in the emitted JSON, so reordering fields changes generated output.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

/// Swagger version written into every document
pub const SWAGGER_VERSION: &str = "1.2";

/// Top-level document enumerating every resource and the global API metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    pub api_version: String,
    pub swagger_version: String,
    pub base_path: String,
    #[serde(default)]
    pub apis: Vec<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ApiInfo>,
}

/// One entry of the resource listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReference {
    /// Lookup path of the resource, always `"/" + key`
    pub path: String,
    #[serde(default)]
    pub description: String,
}

impl ResourceReference {
    pub fn new(key: &str, description: String) -> Self {
        Self {
            path: format!("/{}", key),
            description,
        }
    }

    /// The resource key this reference points at.
    pub fn name(&self) -> &str {
        self.path.trim_matches('/')
    }
}

/// General API metadata parsed from the main file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub terms_of_service_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license_url: String,
}

impl ApiInfo {
    pub fn is_empty(&self) -> bool {
        *self == ApiInfo::default()
    }
}

/// Detailed document for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeclaration {
    pub api_version: String,
    pub swagger_version: String,
    pub base_path: String,
    pub resource_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub apis: Vec<Api>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub models: BTreeMap<String, Model>,
}

impl ApiDeclaration {
    pub fn new(api_version: &str, base_path: &str, resource_key: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            swagger_version: SWAGGER_VERSION.to_string(),
            base_path: base_path.to_string(),
            resource_path: format!("/{}", resource_key),
            produces: Vec::new(),
            consumes: Vec::new(),
            apis: Vec::new(),
            models: BTreeMap::new(),
        }
    }

    /// Appends an operation to the `Api` entry of its path, creating the entry on first use.
    pub fn add_operation(&mut self, operation: Operation) {
        match self.apis.iter_mut().find(|api| api.path == operation.path) {
            Some(api) => api.operations.push(operation),
            None => self.apis.push(Api {
                path: operation.path.clone(),
                description: operation.summary.clone(),
                operations: vec![operation],
            }),
        }
    }

    /// All operations in discovery order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.apis.iter().flat_map(|api| api.operations.iter())
    }

    pub fn operation_count(&self) -> usize {
        self.apis.iter().map(|api| api.operations.len()).sum()
    }
}

/// All operations sharing one path template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Api {
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// HTTP methods accepted by `@Router`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn parse(method: &str) -> Option<Self> {
        match method.trim().to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub method: HttpMethod,
    pub path: String,
    pub nickname: String,
    /// Resolved success response type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    /// Element type when the success response is an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub response_messages: Vec<ResponseMessage>,
}

impl Operation {
    pub fn new(method: HttpMethod, path: String, nickname: String) -> Self {
        Self {
            method,
            path,
            nickname,
            response_type: None,
            items: None,
            summary: String::new(),
            notes: String::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            parameters: Vec::new(),
            response_messages: Vec::new(),
        }
    }

    /// Every type name this operation refers to, in declaration order.
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        if let Some(items) = &self.items {
            types.push(&items.item_type);
        } else if let Some(response_type) = &self.response_type {
            types.push(response_type);
        }
        types.extend(self.parameters.iter().map(|p| p.data_type.as_str()));
        types.extend(
            self.response_messages
                .iter()
                .filter_map(|m| m.response_model.as_deref()),
        );
        types
    }
}

/// `items` object of an array response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type")]
    pub item_type: String,
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
    Header,
    Form,
}

impl ParameterLocation {
    pub fn parse(location: &str) -> Option<Self> {
        match location.to_lowercase().as_str() {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "body" => Some(ParameterLocation::Body),
            "header" => Some(ParameterLocation::Header),
            "form" | "formdata" => Some(ParameterLocation::Form),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub param_type: ParameterLocation,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub required: bool,
    #[serde(default)]
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_model: Option<String>,
}

/// A data model derived from a Rust struct or enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: ModelProperties,
}

/// Model properties in struct field order, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelProperties {
    entries: Vec<(String, ModelProperty)>,
}

impl ModelProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property; an existing property of the same name is replaced in place.
    pub fn insert(&mut self, name: String, property: ModelProperty) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = property,
            None => self.entries.push((name, property)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelProperty> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, property)| property)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(name, _)| name)
    }

    pub fn values(&self) -> impl Iterator<Item = &ModelProperty> {
        self.entries.iter().map(|(_, property)| property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModelProperty)> {
        self.entries.iter().map(|(name, property)| (name, property))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<(String, ModelProperty)> for ModelProperties {
    fn extend<I: IntoIterator<Item = (String, ModelProperty)>>(&mut self, iter: I) {
        for (name, property) in iter {
            self.insert(name, property);
        }
    }
}

impl IntoIterator for ModelProperties {
    type Item = (String, ModelProperty);
    type IntoIter = std::vec::IntoIter<(String, ModelProperty)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, ModelProperty)> for ModelProperties {
    fn from_iter<I: IntoIterator<Item = (String, ModelProperty)>>(iter: I) -> Self {
        let mut properties = ModelProperties::new();
        properties.extend(iter);
        properties
    }
}

impl Index<&str> for ModelProperties {
    type Output = ModelProperty;

    fn index(&self, name: &str) -> &ModelProperty {
        match self.get(name) {
            Some(property) => property,
            None => panic!("no property named {}", name),
        }
    }
}

impl Serialize for ModelProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, property) in &self.entries {
            map.serialize_entry(name, property)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ModelProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = ModelProperties;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of model properties")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ModelProperties, A::Error> {
                let mut properties = ModelProperties::new();
                while let Some((name, property)) = access.next_entry::<String, ModelProperty>()? {
                    properties.insert(name, property);
                }
                Ok(properties)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelProperty {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ModelProperty>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
