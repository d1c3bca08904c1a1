//! Emits the embeddable documentation module.
//!
//! The module is built as a token stream with `quote`, parsed back into a `syn::File` and
//! pretty-printed with `prettyplease`. JSON documents are embedded as ordinary string
//! literals, so quotes, backslashes, backticks or `#` inside descriptions can never break
//! out of the literal.

use crate::model::{ApiDeclaration, ResourceListing};
use crate::serializer::to_indented_json;
use anyhow::{bail, Context, Result};
use log::debug;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeMap;

/// Name of the generated constant holding the resource listing
pub const LISTING_CONST: &str = "SWAGGER_RESOURCE_LISTING";
/// Name of the generated constant holding the per-resource declarations
pub const DESCRIPTIONS_CONST: &str = "SWAGGER_API_DESCRIPTIONS";
/// Name of the generated request handler
pub const HANDLER_FN: &str = "swagger_api_handler";

/// Serialized documentation, ready to be embedded or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocs {
    /// Body served for the listing lookup
    pub listing_json: String,
    /// Body served per resource key, sorted by key
    pub declarations_json: BTreeMap<String, String>,
}

/// Serialize the listing and every declaration.
///
/// # Errors
///
/// Fails if a document cannot be serialized, or if the listing names a resource that has
/// no declaration, since the generated server would then advertise a dead link.
pub fn generate(listing: &ResourceListing, declarations: &[(String, ApiDeclaration)]) -> Result<GeneratedDocs> {
    let listing_json = to_indented_json(listing).context("Can not serialize resource listing")?;

    let mut declarations_json = BTreeMap::new();
    for (key, declaration) in declarations {
        let json = to_indented_json(declaration)
            .with_context(|| format!("Can not serialize API declaration for resource {}", key))?;
        declarations_json.insert(key.clone(), json);
    }

    for reference in &listing.apis {
        if !declarations_json.contains_key(reference.name()) {
            bail!("Resource {} is listed but has no API declaration", reference.name());
        }
    }

    debug!("Serialized listing and {} API declarations", declarations_json.len());
    Ok(GeneratedDocs {
        listing_json,
        declarations_json,
    })
}

/// Render the Rust module that embeds `docs` and serves them over `http` types.
///
/// The module exposes `SWAGGER_RESOURCE_LISTING`, `SWAGGER_API_DESCRIPTIONS`,
/// `swagger_api_description(resource)` and `swagger_api_handler(prefix, &request)`.
pub fn render_module(docs: &GeneratedDocs) -> Result<String> {
    let listing = &docs.listing_json;
    let keys = docs.declarations_json.keys();
    let bodies = docs.declarations_json.values();

    let tokens: TokenStream = quote! {
        #![doc = " This file is generated automatically by swagger-from-source. Do not edit it manually."]
        #![allow(dead_code)]

        use ::http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
        use ::http::{Request, Response, StatusCode};

        /// Resource listing served at the handler prefix.
        pub const SWAGGER_RESOURCE_LISTING: &str = #listing;

        /// API declaration of each resource, sorted by resource key.
        pub const SWAGGER_API_DESCRIPTIONS: &[(&str, &str)] = &[#((#keys, #bodies)),*];

        /// API declaration of `resource`, if it exists.
        pub fn swagger_api_description(resource: &str) -> Option<&'static str> {
            SWAGGER_API_DESCRIPTIONS
                .iter()
                .find(|(key, _)| *key == resource)
                .map(|(_, json)| *json)
        }

        /// Serves the listing at `prefix` and each resource's declaration at `prefix/<resource>`.
        pub fn swagger_api_handler<B>(prefix: &str, request: &Request<B>) -> Response<String> {
            let path = request.uri().path();
            let resource = path.strip_prefix(prefix).unwrap_or(path).trim_matches('/');

            let body = if resource.is_empty() {
                Some(SWAGGER_RESOURCE_LISTING)
            } else {
                swagger_api_description(resource)
            };

            let mut response = Response::new(body.unwrap_or_default().to_owned());
            if body.is_none() {
                *response.status_mut() = StatusCode::NOT_FOUND;
            }

            let headers = response.headers_mut();
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
            if body.is_some() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            response
        }
    };

    let file: syn::File = syn::parse2(tokens).context("Generated documentation module is not valid Rust")?;
    Ok(prettyplease::unparse(&file))
}
