//! Annotation extraction: turns the doc comment block of a handler function into an
//! [`Operation`].
//!
//! Which functions are looked at is decided by a [`CandidatePredicate`] supplied by the
//! caller. The default admits every function; [`receiver_matches`] restricts extraction to
//! methods of `impl` blocks whose self type matches a pattern.
//!
//! # Example
//!
//! ```no_run
//! use swagger_from_source::extractor::{all_functions, AnnotationExtractor};
//! use swagger_from_source::parser::AstParser;
//! use swagger_from_source::type_resolver::TypeMapping;
//! use std::path::Path;
//!
//! let parsed = AstParser::parse_file(Path::new("src/api/orders.rs")).unwrap();
//! let mapping = TypeMapping::default();
//! let extractor = AnnotationExtractor::new(&mapping);
//! let operations = extractor.extract_operations(&[parsed], &all_functions());
//! println!("Found {} operations", operations.len());
//! ```

pub mod annotation;
pub mod general;

use crate::model::{HttpMethod, Items, Operation, Parameter, ResponseMessage};
use crate::parser::{for_each_candidate_function, HandlerFn, ParsedFile};
use crate::type_resolver::{is_primitive_type, TypeMapping};
use annotation::{parse_line, Directive, ResponseSpec};
use log::{debug, warn};
use regex::Regex;

/// Decides whether a discovered function is a candidate API endpoint.
pub type CandidatePredicate = Box<dyn Fn(&HandlerFn) -> bool>;

/// Admit every function.
pub fn all_functions() -> CandidatePredicate {
    Box::new(|_| true)
}

/// Admit only methods whose enclosing `impl` self type matches `pattern`.
pub fn receiver_matches(pattern: Regex) -> CandidatePredicate {
    Box::new(move |function| {
        function
            .receiver
            .as_deref()
            .is_some_and(|receiver| pattern.is_match(receiver))
    })
}

/// An operation together with the resource it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedOperation {
    pub resource_key: String,
    pub operation: Operation,
}

/// Parses annotation blocks, normalizing every type token through a [`TypeMapping`].
pub struct AnnotationExtractor<'a> {
    type_mapping: &'a TypeMapping,
}

impl<'a> AnnotationExtractor<'a> {
    pub fn new(type_mapping: &'a TypeMapping) -> Self {
        Self { type_mapping }
    }

    /// Extract operations from every candidate function, in discovery order.
    pub fn extract_operations(
        &self,
        parsed_files: &[ParsedFile],
        is_candidate: &dyn Fn(&HandlerFn) -> bool,
    ) -> Vec<ExtractedOperation> {
        let mut operations = Vec::new();
        for_each_candidate_function(parsed_files, is_candidate, |function| {
            if let Some(extracted) = self.extract(function) {
                operations.push(extracted);
            }
        });
        debug!("Extracted {} operations", operations.len());
        operations
    }

    /// Extract the operation declared by one function's doc block.
    ///
    /// Returns `None` when the block has no annotations, or when it has annotations but no
    /// usable `@Router` line. Malformed lines are logged and skipped.
    pub fn extract(&self, function: &HandlerFn) -> Option<ExtractedOperation> {
        let mut draft = OperationDraft::default();
        let mut annotated = false;

        for line in &function.doc_lines {
            match parse_line(line) {
                Ok(Some(directive)) => {
                    annotated = true;
                    draft.apply(directive);
                }
                Ok(None) => {}
                Err(e) => {
                    annotated = true;
                    warn!("{} ({}): skipping annotation: {}", function.name, function.file.display(), e);
                }
            }
        }

        if !annotated {
            return None;
        }

        let Some((path, method)) = draft.router.take() else {
            warn!(
                "{} ({}): annotated but has no valid @Router line, skipping",
                function.name,
                function.file.display()
            );
            return None;
        };

        let resource_key = match draft.resource.take() {
            Some(resource) if !resource.is_empty() => resource,
            _ => match path.split('/').find(|segment| !segment.trim().is_empty()) {
                Some(segment) => segment.to_string(),
                None => {
                    warn!(
                        "{} ({}): cannot derive a resource from path {}, add @Resource",
                        function.name,
                        function.file.display(),
                        path
                    );
                    return None;
                }
            },
        };

        let operation = draft.build(function, path, method, self.type_mapping);
        debug!("{} -> {} {} [{}]", function.name, operation.method, operation.path, resource_key);

        Some(ExtractedOperation {
            resource_key,
            operation,
        })
    }
}

/// Directives collected from one block before they are assembled into an `Operation`.
#[derive(Default)]
struct OperationDraft {
    router: Option<(String, HttpMethod)>,
    resource: Option<String>,
    nickname: Option<String>,
    summary: String,
    notes: Vec<String>,
    params: Vec<annotation::ParamSpec>,
    success: Option<ResponseSpec>,
    responses: Vec<ResponseSpec>,
    consumes: Vec<String>,
    produces: Vec<String>,
}

impl OperationDraft {
    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Router { path, method } => self.router = Some((path, method)),
            Directive::Resource(resource) => self.resource = Some(resource),
            Directive::Title(nickname) => self.nickname = Some(nickname),
            Directive::Summary(summary) => self.summary = summary,
            Directive::Notes(notes) => self.notes.push(notes),
            Directive::Param(param) => self.params.push(param),
            Directive::Success(success) => {
                self.responses.push(success.clone());
                self.success = Some(success);
            }
            Directive::Failure(failure) => self.responses.push(failure),
            Directive::Accept(types) => self.consumes.extend(types),
            Directive::Produce(types) => self.produces.extend(types),
        }
    }

    fn build(self, function: &HandlerFn, path: String, method: HttpMethod, mapping: &TypeMapping) -> Operation {
        let nickname = self.nickname.unwrap_or_else(|| function.name.clone());
        let mut operation = Operation::new(method, path, nickname);

        operation.summary = self.summary;
        operation.notes = self.notes.join("\n");
        operation.consumes = self.consumes;
        operation.produces = self.produces;

        if let Some(success) = &self.success {
            let resolved = success.type_name.as_deref().map(|t| mapping.resolve(t).to_string());
            if success.is_array {
                operation.response_type = Some("array".to_string());
                operation.items = resolved.map(|item_type| Items { item_type });
            } else {
                operation.response_type = resolved;
            }
        }

        operation.parameters = self
            .params
            .into_iter()
            .map(|param| Parameter {
                param_type: param.location,
                name: param.name,
                description: param.description,
                data_type: mapping.resolve(&param.type_name).to_string(),
                required: param.required,
                allow_multiple: false,
            })
            .collect();

        operation.response_messages = self
            .responses
            .into_iter()
            .map(|response| {
                let response_model = response
                    .type_name
                    .as_deref()
                    .map(|t| mapping.resolve(t))
                    .filter(|t| !is_primitive_type(t))
                    .map(str::to_string);
                ResponseMessage {
                    code: response.code,
                    message: response.message,
                    response_model,
                }
            })
            .collect();

        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterLocation;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn handler(name: &str, receiver: Option<&str>, doc: &str) -> HandlerFn {
        HandlerFn {
            name: name.to_string(),
            receiver: receiver.map(str::to_string),
            doc_lines: doc.lines().map(|l| l.trim().to_string()).collect(),
            file: PathBuf::from("orders.rs"),
        }
    }

    #[test]
    fn test_path_param_and_wrapper_response() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler(
            "get_order_note",
            None,
            r#"@Router /orders/{id}/note [get]
               @Param id path int true "Order ID"
               @Success 200 {object} NullString "The note""#,
        );

        let extracted = extractor.extract(&function).unwrap();

        assert_eq!(extracted.resource_key, "orders");
        assert_eq!(extracted.operation.parameters.len(), 1);
        assert_eq!(extracted.operation.parameters[0].param_type, ParameterLocation::Path);
        assert_eq!(extracted.operation.response_type.as_deref(), Some("string"));
        assert_eq!(extracted.operation.nickname, "get_order_note");
        assert_eq!(extracted.operation.response_messages[0].response_model, None);
    }

    #[test]
    fn test_escaped_quote_keeps_param() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler(
            "search_orders",
            None,
            r#"@Router /orders/search [get]
               @Param q query string true "Free text, e.g. \"red shoes\"""#,
        );

        let extracted = extractor.extract(&function).unwrap();

        assert_eq!(extracted.operation.parameters.len(), 1);
        assert_eq!(extracted.operation.parameters[0].description, r#"Free text, e.g. "red shoes""#);
    }

    #[test]
    fn test_unannotated_function_yields_nothing() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler("helper", None, "Computes a checksum.\nNothing else.");

        assert_eq!(extractor.extract(&function), None);
    }

    #[test]
    fn test_annotated_without_router_yields_nothing() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler("orphan", None, "@Title orphan\n@Success 200 {object} Order");

        assert_eq!(extractor.extract(&function), None);
    }

    #[test]
    fn test_malformed_param_is_skipped_and_order_is_kept() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler(
            "search",
            None,
            r#"@Param q query string true "Search term"
               @Param broken
               @Router /search [get]
               @Param limit query NullInt64 false "Max results"
               @Failure 400 "Bad query"
               @Failure 500 {object} ApiError "Server error""#,
        );

        let operation = extractor.extract(&function).unwrap().operation;

        let names: Vec<&str> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["q", "limit"]);
        assert_eq!(operation.parameters[1].data_type, "int");
        let codes: Vec<u16> = operation.response_messages.iter().map(|m| m.code).collect();
        assert_eq!(codes, vec![400, 500]);
        assert_eq!(operation.response_messages[1].response_model.as_deref(), Some("ApiError"));
    }

    #[test]
    fn test_array_response_and_forced_resource() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler(
            "list",
            Some("OrderController"),
            r#"@Title listOrders
               @Summary List orders
               @Notes Paginated.
               @Notes Newest first.
               @Resource store
               @Produce json
               @Router /v1/orders [get]
               @Success 200 {array} Order "Orders""#,
        );

        let extracted = extractor.extract(&function).unwrap();
        let operation = &extracted.operation;

        assert_eq!(extracted.resource_key, "store");
        assert_eq!(operation.nickname, "listOrders");
        assert_eq!(operation.summary, "List orders");
        assert_eq!(operation.notes, "Paginated.\nNewest first.");
        assert_eq!(operation.produces, vec!["application/json"]);
        assert_eq!(operation.response_type.as_deref(), Some("array"));
        assert_eq!(operation.items.as_ref().unwrap().item_type, "Order");
        assert_eq!(operation.response_messages[0].response_model.as_deref(), Some("Order"));
    }

    #[test]
    fn test_root_path_without_resource_is_skipped() {
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler("index", None, "@Router / [get]");

        assert_eq!(extractor.extract(&function), None);
    }

    #[test]
    fn test_registered_wrapper_resolves_in_params_and_responses() {
        let mapping = TypeMapping::default().with("Money", "float");
        let extractor = AnnotationExtractor::new(&mapping);
        let function = handler(
            "total",
            None,
            r#"@Router /orders/{id}/total [get]
               @Param currency query Money false "Currency"
               @Success 200 {object} Money"#,
        );

        let operation = extractor.extract(&function).unwrap().operation;

        assert_eq!(operation.parameters[0].data_type, "float");
        assert_eq!(operation.response_type.as_deref(), Some("float"));
    }

    #[test]
    fn test_receiver_predicate() {
        let predicate = receiver_matches(Regex::new("Controller$").unwrap());

        assert!(predicate(&handler("get", Some("OrderController"), "")));
        assert!(!predicate(&handler("get", Some("OrderRepository"), "")));
        assert!(!predicate(&handler("get", None, "")));
        assert!(all_functions()(&handler("get", None, "")));
    }

    #[test]
    fn test_extract_operations_over_files() {
        let code = r#"
            /// @Router /users [get]
            /// @Success 200 {array} User
            pub fn list_users() {}

            /// Internal helper, not an endpoint.
            fn helper() {}

            impl OrderController {
                /// @Router /orders [post]
                /// @Param body body Order true "New order"
                pub fn create(&self) {}
            }
        "#;
        let parsed = ParsedFile {
            path: PathBuf::from("api.rs"),
            syntax_tree: syn::parse_file(code).unwrap(),
        };
        let mapping = TypeMapping::default();
        let extractor = AnnotationExtractor::new(&mapping);

        let all = extractor.extract_operations(std::slice::from_ref(&parsed), &all_functions());
        let keys: Vec<&str> = all.iter().map(|o| o.resource_key.as_str()).collect();
        assert_eq!(keys, vec!["users", "orders"]);

        let filtered = extractor.extract_operations(&[parsed], &receiver_matches(Regex::new("Controller").unwrap()));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].operation.method, HttpMethod::Post);
    }
}
