//! Swagger 1.2 documentation from annotated Rust handlers.
//!
//! Handler functions carry their API description in doc comments:
//!
//! ```text
//! /// @Title getOrder
//! /// @Summary Fetch one order
//! /// @Param id path u64 true "Order id"
//! /// @Success 200 {object} Order
//! /// @Failure 404 "Order not found"
//! /// @Router /orders/{id} [get]
//! pub async fn get_order(...) { ... }
//! ```
//!
//! The generator collects those blocks into a resource listing plus one API declaration per
//! resource, and emits a Rust module that embeds the documents and serves them.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Walks the API package for Rust files, in sorted order
//! 2. [`parser`] - Parses files with `syn` and visits candidate functions
//! 3. [`extractor`] - Turns annotation blocks into operations, and reads general API info
//! 4. [`type_resolver`] - Wrapper type mapping and struct/enum lookup
//! 5. [`schema_generator`] - Builds models for referenced structs
//! 6. [`spec_builder`] - Groups operations into declarations and builds the listing
//! 7. [`serializer`] / [`codegen`] - JSON, YAML and Rust module output
//! 8. [`docs_server`] - Serves generated documents in-process
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_source::config::{GeneratorConfig, OutputFormat};
//! use swagger_from_source::pipeline::{Pipeline, SourceLayout};
//! use swagger_from_source::serializer::write_to_file;
//! use std::path::Path;
//!
//! let config = GeneratorConfig::new("https://shop.example.com").api_version("1.0.0");
//! let layout = SourceLayout::new("src/api").output("src/api_docs.rs");
//!
//! let spec = Pipeline::new(config).run(&layout).unwrap();
//! let module = spec.render(OutputFormat::Rust).unwrap();
//! write_to_file(&module, Path::new("src/api_docs.rs")).unwrap();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod codegen;
pub mod config;
pub mod docs_server;
pub mod error;
pub mod extractor;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod spec_builder;
pub mod type_resolver;
