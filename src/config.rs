use crate::extractor::{all_functions, receiver_matches, CandidatePredicate};
use crate::type_resolver::TypeMapping;
use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Embeddable Rust module with the documents and an `http` handler
    #[default]
    Rust,
    /// Listing and declarations as one JSON document
    Json,
    /// Listing and declarations as one YAML document
    Yaml,
}

/// Everything one generation run depends on.
///
/// Each run owns its configuration, so independent runs never share a type mapping or a
/// candidate filter.
pub struct GeneratorConfig {
    /// Base URL of the documented API; empty lets the main file's `@BasePath` decide
    pub base_path: String,
    /// API version; empty lets the main file's `@APIVersion` decide
    pub api_version: String,
    pub type_mapping: TypeMapping,
    pub is_candidate: CandidatePredicate,
    pub output_format: OutputFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            api_version: String::new(),
            type_mapping: TypeMapping::default(),
            is_candidate: all_functions(),
            output_format: OutputFormat::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn type_mapping(mut self, type_mapping: TypeMapping) -> Self {
        self.type_mapping = type_mapping;
        self
    }

    pub fn candidate_predicate(mut self, is_candidate: CandidatePredicate) -> Self {
        self.is_candidate = is_candidate;
        self
    }

    /// Only document methods of `impl` blocks whose self type matches `pattern`.
    pub fn controller_pattern(self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).with_context(|| format!("Invalid controller pattern: {}", pattern))?;
        Ok(self.candidate_predicate(receiver_matches(regex)))
    }

    pub fn output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }
}

/// Parse a `Wrapper=primitive` type mapping argument.
pub fn parse_type_mapping_entry(entry: &str) -> Result<(String, String), String> {
    match entry.split_once('=') {
        Some((wrapper, primitive)) if !wrapper.trim().is_empty() && !primitive.trim().is_empty() => {
            Ok((wrapper.trim().to_string(), primitive.trim().to_string()))
        }
        _ => Err(format!("expected `Wrapper=primitive`, got `{}`", entry)),
    }
}
