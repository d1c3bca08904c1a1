//! One generation run: scan, parse, extract, aggregate, attach models.

use crate::codegen::{self, GeneratedDocs};
use crate::config::{GeneratorConfig, OutputFormat};
use crate::extractor::general::parse_general_info;
use crate::extractor::AnnotationExtractor;
use crate::model::{ApiDeclaration, ResourceListing};
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::schema_generator::SchemaGenerator;
use crate::serializer::{serialize_json, serialize_yaml, SpecBundle};
use crate::spec_builder::SpecBuilder;
use crate::type_resolver::TypeResolver;
use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Where the sources of a run live.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    /// Directory holding the annotated handlers
    pub api_package: PathBuf,
    /// File carrying the general API info
    pub main_api_file: PathBuf,
    /// Generated file inside the package, excluded from scanning
    pub output: Option<PathBuf>,
}

impl SourceLayout {
    /// Layout with the main file at `<api_package>/main.rs`.
    pub fn new(api_package: impl Into<PathBuf>) -> Self {
        let api_package = api_package.into();
        Self {
            main_api_file: api_package.join("main.rs"),
            api_package,
            output: None,
        }
    }

    pub fn main_api_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.main_api_file = path.into();
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub operations: usize,
    pub resources: usize,
}

/// The documentation produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSpec {
    pub resource_listing: ResourceListing,
    /// Declarations in resource listing order
    pub api_declarations: Vec<(String, ApiDeclaration)>,
    pub summary: RunSummary,
}

impl GeneratedSpec {
    pub fn api_declaration(&self, resource_key: &str) -> Option<&ApiDeclaration> {
        self.api_declarations
            .iter()
            .find(|(key, _)| key == resource_key)
            .map(|(_, declaration)| declaration)
    }

    pub fn to_bundle(&self) -> SpecBundle {
        SpecBundle {
            resource_listing: self.resource_listing.clone(),
            api_declarations: self.api_declarations.iter().cloned().collect(),
        }
    }

    pub fn to_docs(&self) -> Result<GeneratedDocs> {
        codegen::generate(&self.resource_listing, &self.api_declarations)
    }

    /// Render the whole documentation set in `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Rust => codegen::render_module(&self.to_docs()?),
            OutputFormat::Json => serialize_json(&self.to_bundle()),
            OutputFormat::Yaml => serialize_yaml(&self.to_bundle()),
        }
    }
}

/// Runs generation for one configuration.
pub struct Pipeline {
    config: GeneratorConfig,
}

impl Pipeline {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the documentation model for the sources in `layout`.
    ///
    /// Files that fail to parse and malformed annotations are logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails if the package cannot be scanned or the main file cannot be read or parsed.
    pub fn run(&self, layout: &SourceLayout) -> Result<GeneratedSpec> {
        info!("Scanning API package {}", layout.api_package.display());
        let mut scanner = FileScanner::new(layout.api_package.clone());
        if let Some(output) = &layout.output {
            scanner = scanner.exclude(output);
        }
        let scan_result = scanner.scan()?;
        for warning in &scan_result.warnings {
            warn!("{}", warning);
        }
        info!("Found {} Rust files", scan_result.rust_files.len());

        let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        info!("Successfully parsed {} files", parsed_files.len());

        let general_info = parse_general_info(&layout.main_api_file)?;

        let extractor = AnnotationExtractor::new(&self.config.type_mapping);
        let operations = extractor.extract_operations(&parsed_files, &*self.config.is_candidate);
        if operations.is_empty() {
            warn!("No annotated operations found in {}", layout.api_package.display());
        }

        let mut builder = SpecBuilder::new(self.config.base_path.clone(), self.config.api_version.clone());
        builder.set_general_info(general_info);
        let operation_count = operations.len();
        for extracted in operations {
            builder.add_operation(&extracted.resource_key, extracted.operation);
        }

        let files_parsed = parsed_files.len();
        let mut schema_gen = SchemaGenerator::new(TypeResolver::new(parsed_files), self.config.type_mapping.clone());
        builder.attach_models(&mut schema_gen);

        let resource_listing = builder.build_resource_listing();
        let api_declarations = builder.build_api_declarations();
        let summary = RunSummary {
            files_scanned: scan_result.rust_files.len(),
            files_parsed,
            operations: operation_count,
            resources: api_declarations.len(),
        };
        debug!("Run summary: {:?}", summary);

        Ok(GeneratedSpec {
            resource_listing,
            api_declarations,
            summary,
        })
    }
}

/// Convenience for a single run over `api_package` with its default main file.
pub fn generate_from_package(config: GeneratorConfig, api_package: &Path) -> Result<GeneratedSpec> {
    Pipeline::new(config).run(&SourceLayout::new(api_package))
}
