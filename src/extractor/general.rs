//! General API metadata, read from the inner doc comments of the main file.
//!
//! ```text
//! //! @APIVersion 1.0.0
//! //! @APITitle Shop API
//! //! @APIDescription Orders and customers.
//! //! @BasePath https://shop.example.com/api
//! //! @SubApi Order management [/orders]
//! ```

use crate::model::ApiInfo;
use crate::parser::{doc_lines, inner_doc_lines, AstParser};
use anyhow::Result;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static GENERAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(\w+)(?:\s+(.*))?$").unwrap());

static SUB_API_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)\s*\[([^\]]+)\]$").unwrap());

/// Metadata applying to the whole API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralInfo {
    pub api_version: Option<String>,
    pub base_path: Option<String>,
    pub info: ApiInfo,
    /// Resource descriptions declared with `@SubApi`, in declaration order
    pub sub_apis: Vec<SubApi>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubApi {
    pub resource_key: String,
    pub description: String,
}

impl GeneralInfo {
    pub fn sub_api_description(&self, resource_key: &str) -> Option<&str> {
        self.sub_apis
            .iter()
            .find(|sub_api| sub_api.resource_key == resource_key)
            .map(|sub_api| sub_api.description.as_str())
    }

    /// Interpret general-info annotation lines. Unknown lines are ignored.
    pub fn from_lines<'l>(lines: impl IntoIterator<Item = &'l str>) -> Self {
        let mut general = GeneralInfo::default();

        for line in lines {
            let Some(captures) = GENERAL_REGEX.captures(line.trim()) else {
                continue;
            };
            let value = captures.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default();

            match captures[1].to_lowercase().as_str() {
                "apiversion" => general.api_version = Some(value),
                "apititle" => general.info.title = value,
                "apidescription" => general.info.description = value,
                "basepath" => general.base_path = Some(value),
                "contact" => general.info.contact = value,
                "termsofserviceurl" => general.info.terms_of_service_url = value,
                "license" => general.info.license = value,
                "licenseurl" => general.info.license_url = value,
                "subapi" => match SUB_API_REGEX.captures(&value) {
                    Some(sub_api) => general.sub_apis.push(SubApi {
                        resource_key: sub_api[2].trim().trim_matches('/').to_string(),
                        description: sub_api[1].to_string(),
                    }),
                    None => warn!("Malformed @SubApi annotation, expected `<description> [<path>]`: {}", value),
                },
                _ => {}
            }
        }

        general
    }
}

/// Parse the general API info of `path`.
///
/// Annotations are read from the file's inner doc comments and from the outer doc comments
/// of its `main` function. A missing file yields defaults with a warning.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn parse_general_info(path: &Path) -> Result<GeneralInfo> {
    if !path.exists() {
        warn!("Main API file {} not found, using default API info", path.display());
        return Ok(GeneralInfo::default());
    }

    let parsed = AstParser::parse_file(path)?;
    let mut lines = inner_doc_lines(&parsed.syntax_tree.attrs);
    for item in &parsed.syntax_tree.items {
        if let syn::Item::Fn(item_fn) = item {
            if item_fn.sig.ident == "main" {
                lines.extend(doc_lines(&item_fn.attrs));
            }
        }
    }

    let general = GeneralInfo::from_lines(lines.iter().map(String::as_str));
    debug!("General API info from {}: {:?}", path.display(), general);
    Ok(general)
}
