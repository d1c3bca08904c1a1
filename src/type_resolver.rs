use crate::parser::ParsedFile;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Wrapper type name to primitive Swagger type.
///
/// Wrapper types serialize as a plain scalar, and the Swagger type vocabulary has no notion
/// of them, so every parameter and response type is collapsed through this table before it
/// is stored. Unknown names pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    entries: BTreeMap<String, String>,
}

impl TypeMapping {
    /// An empty table
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a wrapper type; a later registration for the same name replaces the earlier one.
    pub fn register(&mut self, wrapper: impl Into<String>, primitive: impl Into<String>) -> &mut Self {
        let wrapper = wrapper.into();
        let primitive = primitive.into();
        debug!("Registering type mapping {} -> {}", wrapper, primitive);
        self.entries.insert(wrapper, primitive);
        self
    }

    pub fn with(mut self, wrapper: impl Into<String>, primitive: impl Into<String>) -> Self {
        self.register(wrapper, primitive);
        self
    }

    /// Resolve a type token.
    ///
    /// Exact match first; a path-qualified token (`sql::NullString`) falls back to its last
    /// segment.
    pub fn resolve<'a>(&'a self, type_name: &'a str) -> &'a str {
        if let Some(primitive) = self.entries.get(type_name) {
            return primitive;
        }
        let last_segment = type_name.rsplit("::").next().unwrap_or(type_name);
        match self.entries.get(last_segment) {
            Some(primitive) => primitive,
            None => type_name,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeMapping {
    /// The nullable scalar wrappers
    fn default() -> Self {
        Self::empty()
            .with("NullString", "string")
            .with("NullInt64", "int")
            .with("NullFloat64", "float")
            .with("NullBool", "bool")
    }
}

/// Whether a (resolved) type name is a Swagger scalar or a Rust primitive,
/// i.e. something that never gets a model of its own.
pub fn is_primitive_type(type_name: &str) -> bool {
    matches!(
        type_name,
        "string" | "int" | "integer" | "long" | "float" | "double" | "number" | "bool" | "boolean"
            | "byte" | "date" | "dateTime" | "array" | "object" | "void"
            | "String" | "str" | "char"
            | "i8" | "i16" | "i32" | "i64" | "i128" | "isize"
            | "u8" | "u16" | "u32" | "u64" | "u128" | "usize"
            | "f32" | "f64"
    )
}

/// Looks up struct and enum definitions across the parsed source files.
pub struct TypeResolver {
    parsed_files: Vec<ParsedFile>,
    /// Cache of resolved types to avoid redundant parsing
    type_cache: HashMap<String, ResolvedType>,
}

#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub name: String,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Struct(Vec<FieldDef>),
    /// Variant names of an enum
    Enum(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    pub doc: Option<String>,
    pub serde_attrs: SerdeAttributes,
}

/// Shape of a field type, reduced to what the model generator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Named(String),
    Option(Box<FieldType>),
    Vec(Box<FieldType>),
    Unsupported,
}

impl FieldType {
    pub fn from_syn(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => {
                let Some(segment) = type_path.path.segments.last() else {
                    return FieldType::Unsupported;
                };
                let name = segment.ident.to_string();
                let inner = match &segment.arguments {
                    syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
                        syn::GenericArgument::Type(inner) => Some(FieldType::from_syn(inner)),
                        _ => None,
                    }),
                    _ => None,
                };
                match (name.as_str(), inner) {
                    ("Option", Some(inner)) => FieldType::Option(Box::new(inner)),
                    ("Vec" | "HashSet" | "BTreeSet" | "VecDeque", Some(inner)) => FieldType::Vec(Box::new(inner)),
                    ("Box" | "Arc" | "Rc", Some(inner)) => inner,
                    _ => FieldType::Named(name),
                }
            }
            syn::Type::Reference(reference) => FieldType::from_syn(&reference.elem),
            syn::Type::Slice(slice) => FieldType::Vec(Box::new(FieldType::from_syn(&slice.elem))),
            syn::Type::Array(array) => FieldType::Vec(Box::new(FieldType::from_syn(&array.elem))),
            _ => FieldType::Unsupported,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

impl TypeResolver {
    pub fn new(parsed_files: Vec<ParsedFile>) -> Self {
        debug!("Initializing TypeResolver with {} files", parsed_files.len());
        Self {
            parsed_files,
            type_cache: HashMap::new(),
        }
    }

    /// Find a struct definition by name, looking into inline modules too.
    pub fn find_struct_definition(&self, name: &str) -> Option<&syn::ItemStruct> {
        self.parsed_files.iter().find_map(|parsed_file| {
            find_item(&parsed_file.syntax_tree.items, &|item| match item {
                syn::Item::Struct(item_struct) if item_struct.ident == name => Some(item_struct),
                _ => None,
            })
        })
    }

    pub fn find_enum_definition(&self, name: &str) -> Option<&syn::ItemEnum> {
        self.parsed_files.iter().find_map(|parsed_file| {
            find_item(&parsed_file.syntax_tree.items, &|item| match item {
                syn::Item::Enum(item_enum) if item_enum.ident == name => Some(item_enum),
                _ => None,
            })
        })
    }

    /// Resolve a user-defined type by name; `None` when no definition exists in the sources.
    pub fn resolve_type(&mut self, type_name: &str) -> Option<ResolvedType> {
        if let Some(cached) = self.type_cache.get(type_name) {
            return Some(cached.clone());
        }

        let resolved = if let Some(item_struct) = self.find_struct_definition(type_name) {
            Some(ResolvedType {
                name: type_name.to_string(),
                kind: TypeKind::Struct(parse_struct_fields(item_struct)),
            })
        } else if let Some(item_enum) = self.find_enum_definition(type_name) {
            Some(ResolvedType {
                name: type_name.to_string(),
                kind: TypeKind::Enum(item_enum.variants.iter().map(|v| v.ident.to_string()).collect()),
            })
        } else {
            debug!("No definition found for type: {}", type_name);
            None
        };

        if let Some(resolved) = &resolved {
            self.type_cache.insert(type_name.to_string(), resolved.clone());
        }

        resolved
    }
}

fn find_item<'a, T, F>(items: &'a [syn::Item], matcher: &F) -> Option<T>
where
    F: Fn(&'a syn::Item) -> Option<T>,
{
    for item in items {
        if let Some(found) = matcher(item) {
            return Some(found);
        }
        if let syn::Item::Mod(item_mod) = item {
            if let Some((_, nested)) = &item_mod.content {
                if let Some(found) = find_item(nested, matcher) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn parse_struct_fields(item_struct: &syn::ItemStruct) -> Vec<FieldDef> {
    let syn::Fields::Named(named_fields) = &item_struct.fields else {
        return Vec::new();
    };

    named_fields
        .named
        .iter()
        .filter_map(|field| {
            let name = field.ident.as_ref()?.to_string();
            let doc = crate::parser::doc_lines(&field.attrs).join(" ");
            Some(FieldDef {
                name,
                ty: FieldType::from_syn(&field.ty),
                doc: if doc.is_empty() { None } else { Some(doc) },
                serde_attrs: parse_serde_attributes(&field.attrs),
            })
        })
        .collect()
}

fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                serde_attrs.rename = Some(value.value());
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                serde_attrs.skip = true;
            } else if meta.path.is_ident("flatten") {
                serde_attrs.flatten = true;
            } else if meta.input.peek(syn::Token![=]) {
                // Consume the value of attributes we do not interpret
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        });
        if let Err(e) = result {
            debug!("Ignoring unparsable serde attribute: {}", e);
        }
    }

    serde_attrs
}
