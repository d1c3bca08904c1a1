use crate::extractor::general::GeneralInfo;
use crate::model::{ApiDeclaration, Operation, ResourceListing, ResourceReference, SWAGGER_VERSION};
use crate::schema_generator::SchemaGenerator;
use log::debug;
use std::collections::HashMap;

/// Default API version when neither the configuration nor the main file declares one
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// Aggregates extracted operations into per-resource API declarations.
///
/// Resources are kept in the order they were first seen, which is the order the resource
/// listing presents them in.
pub struct SpecBuilder {
    base_path: String,
    api_version: String,
    general_info: GeneralInfo,
    /// Resource keys in discovery order
    resource_order: Vec<String>,
    declarations: HashMap<String, ApiDeclaration>,
}

impl SpecBuilder {
    pub fn new(base_path: impl Into<String>, api_version: impl Into<String>) -> Self {
        debug!("Initializing SpecBuilder");
        Self {
            base_path: base_path.into(),
            api_version: api_version.into(),
            general_info: GeneralInfo::default(),
            resource_order: Vec::new(),
            declarations: HashMap::new(),
        }
    }

    /// Apply the general API info from the main file.
    ///
    /// The main file's version and base path only fill in values the builder was created
    /// without; explicit configuration wins.
    pub fn set_general_info(&mut self, general_info: GeneralInfo) {
        if self.base_path.is_empty() {
            if let Some(base_path) = &general_info.base_path {
                self.base_path = base_path.clone();
            }
        }
        if self.api_version.is_empty() {
            self.api_version = general_info
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        }
        for declaration in self.declarations.values_mut() {
            declaration.base_path = self.base_path.clone();
            declaration.api_version = self.api_version.clone();
        }
        self.general_info = general_info;
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn api_version(&self) -> &str {
        if self.api_version.is_empty() {
            DEFAULT_API_VERSION
        } else {
            &self.api_version
        }
    }

    /// Add an operation to the declaration of `resource_key`, creating it on first use.
    pub fn add_operation(&mut self, resource_key: &str, operation: Operation) {
        debug!("Adding {} {} to resource {}", operation.method, operation.path, resource_key);

        if !self.declarations.contains_key(resource_key) {
            self.resource_order.push(resource_key.to_string());
            let declaration = ApiDeclaration::new(self.api_version(), &self.base_path, resource_key);
            self.declarations.insert(resource_key.to_string(), declaration);
        }

        if let Some(declaration) = self.declarations.get_mut(resource_key) {
            for mime in &operation.produces {
                if !declaration.produces.contains(mime) {
                    declaration.produces.push(mime.clone());
                }
            }
            for mime in &operation.consumes {
                if !declaration.consumes.contains(mime) {
                    declaration.consumes.push(mime.clone());
                }
            }
            declaration.add_operation(operation);
        }
    }

    /// Fill each declaration's `models` from the types its operations reference.
    pub fn attach_models(&mut self, schema_gen: &mut SchemaGenerator) {
        for key in &self.resource_order {
            if let Some(declaration) = self.declarations.get_mut(key) {
                let type_names: Vec<String> = declaration
                    .operations()
                    .flat_map(|op| op.referenced_types())
                    .map(str::to_string)
                    .collect();
                declaration.models = schema_gen.collect_models(type_names.iter().map(String::as_str));
                debug!("Resource {} references {} models", key, declaration.models.len());
            }
        }
    }

    /// Resource keys that have at least one operation, in discovery order.
    pub fn resource_keys(&self) -> Vec<&str> {
        self.resource_order
            .iter()
            .filter(|key| self.declarations.get(*key).is_some_and(|d| d.operation_count() > 0))
            .map(String::as_str)
            .collect()
    }

    pub fn build_resource_listing(&self) -> ResourceListing {
        let apis = self
            .resource_keys()
            .into_iter()
            .map(|key| {
                let description = match self.general_info.sub_api_description(key) {
                    Some(description) => description.to_string(),
                    None => self
                        .declarations
                        .get(key)
                        .and_then(|d| d.operations().next())
                        .map(|op| op.summary.clone())
                        .unwrap_or_default(),
                };
                ResourceReference::new(key, description)
            })
            .collect();

        let info = Some(self.general_info.info.clone()).filter(|info| !info.is_empty());

        ResourceListing {
            api_version: self.api_version().to_string(),
            swagger_version: SWAGGER_VERSION.to_string(),
            base_path: self.base_path.clone(),
            apis,
            info,
        }
    }

    /// The declaration of one resource; `None` for unknown or empty resources.
    pub fn build_api_declaration(&self, resource_key: &str) -> Option<ApiDeclaration> {
        self.declarations
            .get(resource_key)
            .filter(|declaration| declaration.operation_count() > 0)
            .cloned()
    }

    /// Every listed resource with its declaration, in discovery order.
    pub fn build_api_declarations(&self) -> Vec<(String, ApiDeclaration)> {
        self.resource_keys()
            .into_iter()
            .filter_map(|key| Some((key.to_string(), self.build_api_declaration(key)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::general::SubApi;
    use crate::model::{ApiInfo, HttpMethod};
    use crate::parser::ParsedFile;
    use crate::type_resolver::{TypeMapping, TypeResolver};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn operation(method: HttpMethod, path: &str, summary: &str) -> Operation {
        let mut op = Operation::new(method, path.to_string(), "op".to_string());
        op.summary = summary.to_string();
        op
    }

    #[test]
    fn test_listing_preserves_discovery_order() {
        let mut builder = SpecBuilder::new("http://localhost:8080", "1.0");
        builder.add_operation("users", operation(HttpMethod::Get, "/users", "List users"));
        builder.add_operation("orders", operation(HttpMethod::Get, "/orders", "List orders"));
        builder.add_operation("users", operation(HttpMethod::Post, "/users", "Create user"));

        let listing = builder.build_resource_listing();

        let names: Vec<&str> = listing.apis.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["users", "orders"]);
        assert_eq!(listing.apis[0].path, "/users");
        assert_eq!(listing.apis[0].description, "List users");
        assert_eq!(listing.swagger_version, "1.2");
        assert_eq!(listing.info, None);
    }

    #[test]
    fn test_every_listed_resource_has_a_declaration() {
        let mut builder = SpecBuilder::new("", "1.0");
        builder.add_operation("users", operation(HttpMethod::Get, "/users", "List"));
        builder.add_operation("orders", operation(HttpMethod::Delete, "/orders/{id}", "Delete"));

        for reference in builder.build_resource_listing().apis {
            let declaration = builder.build_api_declaration(reference.name()).unwrap();
            assert!(declaration.operation_count() > 0);
            assert_eq!(declaration.resource_path, reference.path);
        }
        assert!(builder.build_api_declaration("missing").is_none());
    }

    #[test]
    fn test_general_info_fills_defaults_and_descriptions() {
        let mut builder = SpecBuilder::new("", "");
        builder.add_operation("orders", operation(HttpMethod::Get, "/orders", "List orders"));
        builder.set_general_info(GeneralInfo {
            api_version: Some("3.0".to_string()),
            base_path: Some("https://shop.example.com".to_string()),
            info: ApiInfo {
                title: "Shop".to_string(),
                ..ApiInfo::default()
            },
            sub_apis: vec![SubApi {
                resource_key: "orders".to_string(),
                description: "Order management".to_string(),
            }],
        });

        let listing = builder.build_resource_listing();
        assert_eq!(listing.api_version, "3.0");
        assert_eq!(listing.base_path, "https://shop.example.com");
        assert_eq!(listing.apis[0].description, "Order management");
        assert_eq!(listing.info.unwrap().title, "Shop");

        let declaration = builder.build_api_declaration("orders").unwrap();
        assert_eq!(declaration.base_path, "https://shop.example.com");
        assert_eq!(declaration.api_version, "3.0");
    }

    #[test]
    fn test_explicit_base_path_wins_over_general_info() {
        let mut builder = SpecBuilder::new("http://configured", "2.0");
        builder.set_general_info(GeneralInfo {
            api_version: Some("9.9".to_string()),
            base_path: Some("http://from-main".to_string()),
            ..GeneralInfo::default()
        });

        let listing = builder.build_resource_listing();
        assert_eq!(listing.base_path, "http://configured");
        assert_eq!(listing.api_version, "2.0");
    }

    #[test]
    fn test_produces_and_consumes_are_merged() {
        let mut builder = SpecBuilder::new("", "1.0");
        let mut first = operation(HttpMethod::Get, "/orders", "List");
        first.produces = vec!["application/json".to_string()];
        let mut second = operation(HttpMethod::Post, "/orders", "Create");
        second.produces = vec!["application/json".to_string(), "application/xml".to_string()];
        second.consumes = vec!["application/json".to_string()];
        builder.add_operation("orders", first);
        builder.add_operation("orders", second);

        let declaration = builder.build_api_declaration("orders").unwrap();
        assert_eq!(declaration.produces, vec!["application/json", "application/xml"]);
        assert_eq!(declaration.consumes, vec!["application/json"]);
        assert_eq!(declaration.apis.len(), 1);
        assert_eq!(declaration.apis[0].operations.len(), 2);
    }

    #[test]
    fn test_attach_models() {
        let parsed = ParsedFile {
            path: PathBuf::from("models.rs"),
            syntax_tree: syn::parse_file("pub struct Order { pub id: u64, pub note: NullString }").unwrap(),
        };
        let mut schema_gen = SchemaGenerator::new(TypeResolver::new(vec![parsed]), TypeMapping::default());
        let mut builder = SpecBuilder::new("", "1.0");
        let mut op = operation(HttpMethod::Get, "/orders/{id}", "Get");
        op.response_type = Some("Order".to_string());
        builder.add_operation("orders", op);

        builder.attach_models(&mut schema_gen);

        let declaration = builder.build_api_declaration("orders").unwrap();
        assert_eq!(declaration.models.len(), 1);
        assert_eq!(
            declaration.models["Order"].properties["note"].property_type.as_deref(),
            Some("string")
        );
    }
}
