use crate::config::{parse_type_mapping_entry, GeneratorConfig, OutputFormat};
use crate::pipeline::{Pipeline, SourceLayout};
use crate::serializer::write_to_file;
use crate::type_resolver::TypeMapping;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// Environment variable naming the source root when `--root` is not given
pub const SOURCE_ROOT_ENV: &str = "SWAGGER_SOURCE_ROOT";

/// Swagger documentation generator - builds Swagger 1.2 docs from annotated handler comments
#[derive(Parser, Debug)]
#[command(name = "swagger-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory with the API handlers, relative to the source root
    #[arg(long = "api-package", value_name = "PKG")]
    pub api_package: String,

    /// Base URL of the documented web service
    #[arg(long = "base-path", value_name = "URL")]
    pub base_path: String,

    /// File with the general API annotations, relative to the source root [default: <PKG>/main.rs]
    #[arg(long = "main-api-file", value_name = "FILE")]
    pub main_api_file: Option<PathBuf>,

    /// Output file path
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "./swagger_spec.rs")]
    pub output_path: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "rust")]
    pub output_format: OutputFormat,

    /// Only document methods of impl blocks whose type name matches this regex
    #[arg(long = "controller-pattern", value_name = "REGEX")]
    pub controller_pattern: Option<String>,

    /// API version, overriding @APIVersion of the main file
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Additional wrapper type mapping, e.g. `Money=double` (repeatable)
    #[arg(long = "type-mapping", value_name = "WRAPPER=PRIMITIVE", value_parser = parse_type_mapping_entry)]
    pub type_mappings: Vec<(String, String)>,

    /// Source root the package and main file are resolved against
    #[arg(long = "root", value_name = "DIR", env = SOURCE_ROOT_ENV)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    fn source_root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .with_context(|| format!("Please set the {} environment variable or pass --root", SOURCE_ROOT_ENV))
    }

    /// Package and main file resolved against the source root.
    pub fn source_layout(&self) -> Result<SourceLayout> {
        let root = self.source_root()?;
        let layout = SourceLayout::new(root.join(&self.api_package)).output(self.output_path.clone());
        Ok(match &self.main_api_file {
            Some(main_api_file) => layout.main_api_file(root.join(main_api_file)),
            None => layout,
        })
    }

    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut type_mapping = TypeMapping::default();
        for (wrapper, primitive) in &self.type_mappings {
            type_mapping.register(wrapper.clone(), primitive.clone());
        }

        let mut config = GeneratorConfig::new(self.base_path.clone())
            .type_mapping(type_mapping)
            .output_format(self.output_format);
        if let Some(api_version) = &self.api_version {
            config = config.api_version(api_version.clone());
        }
        if let Some(pattern) = &self.controller_pattern {
            config = config.controller_pattern(pattern)?;
        }
        Ok(config)
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.api_package.trim().is_empty() {
        bail!("The API package must not be empty");
    }
    if args.base_path.trim().is_empty() {
        bail!("The base path must not be empty");
    }

    let root = args.source_root()?;
    info!("Source root: {}", root.display());
    info!("API package: {}", args.api_package);
    info!("Output format: {:?}", args.output_format);
    info!("Output file: {}", args.output_path.display());
    if let Some(pattern) = &args.controller_pattern {
        info!("Controller pattern: {}", pattern);
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let layout = args.source_layout()?;
    let config = args.generator_config()?;
    let output_format = config.output_format;

    info!("Starting documentation generation...");
    let spec = Pipeline::new(config).run(&layout)?;

    info!("Rendering {:?} output...", output_format);
    let content = spec.render(output_format)?;

    info!("Writing output to: {}", args.output_path.display());
    write_to_file(&content, &args.output_path)?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", spec.summary.files_scanned);
    info!("  - Files parsed: {}", spec.summary.files_parsed);
    info!("  - Operations found: {}", spec.summary.operations);
    info!("  - Resources: {}", spec.summary.resources);

    Ok(())
}
