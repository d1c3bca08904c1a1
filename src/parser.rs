use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use syn::visit::{self, Visit};

/// AST parser for Rust source files, backed by `syn`.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/handlers.rs")).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single Rust source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Rust syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses multiple files, continuing past failures.
    ///
    /// A file with syntax errors only loses its own annotations; the rest of the package is
    /// still documented. Failures are logged as warnings and returned in place.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).map_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// A function discovered in the source tree together with its doc comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFn {
    /// The function identifier
    pub name: String,
    /// Self type of the enclosing `impl` block, if any
    pub receiver: Option<String>,
    /// Doc comment lines, trimmed, in source order
    pub doc_lines: Vec<String>,
    /// File the function was found in
    pub file: PathBuf,
}

/// Visits every function for which `predicate` holds, in file order and then source order.
///
/// Free functions, methods of inherent and trait `impl` blocks and functions inside inline
/// modules are all visited. Functions nested in other function bodies are not.
pub fn for_each_candidate_function<P, V>(files: &[ParsedFile], predicate: P, mut visit: V)
where
    P: Fn(&HandlerFn) -> bool,
    V: FnMut(&HandlerFn),
{
    for parsed_file in files {
        let mut collector = FunctionCollector {
            file: &parsed_file.path,
            current_impl: None,
            functions: Vec::new(),
        };
        collector.visit_file(&parsed_file.syntax_tree);

        debug!(
            "Found {} functions in {}",
            collector.functions.len(),
            parsed_file.path.display()
        );

        for function in collector.functions.iter().filter(|f| predicate(f)) {
            visit(function);
        }
    }
}

struct FunctionCollector<'a> {
    file: &'a Path,
    current_impl: Option<String>,
    functions: Vec<HandlerFn>,
}

impl FunctionCollector<'_> {
    fn record(&mut self, ident: &syn::Ident, attrs: &[syn::Attribute]) {
        self.functions.push(HandlerFn {
            name: ident.to_string(),
            receiver: self.current_impl.clone(),
            doc_lines: doc_lines(attrs),
            file: self.file.to_path_buf(),
        });
    }
}

impl<'ast> Visit<'ast> for FunctionCollector<'_> {
    fn visit_item_fn(&mut self, item_fn: &'ast syn::ItemFn) {
        self.record(&item_fn.sig.ident, &item_fn.attrs);
    }

    fn visit_item_impl(&mut self, item_impl: &'ast syn::ItemImpl) {
        let previous = self.current_impl.replace(type_name(&item_impl.self_ty).unwrap_or_default());
        visit::visit_item_impl(self, item_impl);
        self.current_impl = previous;
    }

    fn visit_impl_item_fn(&mut self, impl_fn: &'ast syn::ImplItemFn) {
        self.record(&impl_fn.sig.ident, &impl_fn.attrs);
    }

    fn visit_item_trait(&mut self, _item_trait: &'ast syn::ItemTrait) {
        // Trait declarations carry no handlers, only their impls do
    }
}

/// Last path segment of a type, looking through references (`&mut Foo<T>` is `Foo`).
fn type_name(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(type_path) => type_path.path.segments.last().map(|s| s.ident.to_string()),
        syn::Type::Reference(reference) => type_name(&reference.elem),
        syn::Type::Paren(paren) => type_name(&paren.elem),
        _ => None,
    }
}

/// Outer doc comment lines (`///` and `/** */`) of an item.
pub fn doc_lines(attrs: &[syn::Attribute]) -> Vec<String> {
    collect_doc_lines(attrs, false)
}

/// Inner doc comment lines (`//!` and `/*! */`), as found at the top of a file.
pub fn inner_doc_lines(attrs: &[syn::Attribute]) -> Vec<String> {
    collect_doc_lines(attrs, true)
}

fn collect_doc_lines(attrs: &[syn::Attribute], inner: bool) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter(|attr| matches!(attr.style, syn::AttrStyle::Inner(_)) == inner)
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text), ..
                    }),
                ..
            }) => Some(text.value()),
            _ => None,
        })
        .flat_map(|text| {
            // Block comments keep their leading `*` gutters
            text.lines()
                .map(|line| line.trim().trim_start_matches("* ").trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
