//! Derived, read-only view over one indexed resource.

use std::borrow::Cow;
use std::cell::OnceCell;

use crate::config::StyleguideConfig;
use crate::index::{RecordKind, ResourceRecord};
use crate::params::{parse_params, ParamMap};
use crate::predicates::{
    declared_class_of, included_class_of, is_declared_resource_type, is_legacy_lookup_call,
    is_legacy_validate_call, is_lookup_call, module_of, normalize_name,
};
use crate::token::{TokenRef, TokenStream};

/// Architectural layer a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A class in the profile module.
    Profile,
    /// A class in the role module.
    Role,
    /// Any other class.
    PlainClass,
    /// A defined type, whatever its module.
    DefinedType,
    /// A node block.
    Node,
}

/// Queries over a [`ResourceRecord`] and the stream it was cut from.
#[derive(Debug)]
pub struct Resource<'a> {
    stream: &'a TokenStream,
    record: &'a ResourceRecord,
    config: &'a StyleguideConfig,
    params: OnceCell<ParamMap>,
}

impl<'a> Resource<'a> {
    /// Wraps a record.
    #[must_use]
    pub fn new(
        stream: &'a TokenStream,
        record: &'a ResourceRecord,
        config: &'a StyleguideConfig,
    ) -> Self {
        Self {
            stream,
            record,
            config,
            params: OnceCell::new(),
        }
    }

    /// The wrapped record.
    #[must_use]
    pub fn record(&self) -> &'a ResourceRecord {
        self.record
    }

    /// The stream the record indexes into.
    #[must_use]
    pub fn stream(&self) -> &'a TokenStream {
        self.stream
    }

    /// Returns true for classes.
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.record.kind, RecordKind::Class { .. })
    }

    /// Returns true for defined types.
    #[must_use]
    pub fn is_define(&self) -> bool {
        matches!(self.record.kind, RecordKind::DefinedType { .. })
    }

    /// Returns true for node blocks.
    #[must_use]
    pub fn is_node(&self) -> bool {
        matches!(self.record.kind, RecordKind::Node { .. })
    }

    /// Label used in messages: `class`, `defined type` or `node`.
    #[must_use]
    pub fn type_label(&self) -> &'static str {
        match self.record.kind {
            RecordKind::Class { .. } => "class",
            RecordKind::DefinedType { .. } => "defined type",
            RecordKind::Node { .. } => "node",
        }
    }

    /// Normalised name for classes and defines; the joined titles for nodes.
    #[must_use]
    pub fn name(&self) -> Cow<'a, str> {
        match self.record.name_token().and_then(|i| self.stream.get(i)) {
            Some(token) => Cow::Borrowed(normalize_name(token.text())),
            None => Cow::Owned(self.title()),
        }
    }

    /// Node title literals joined by `, `; empty for classes and defines.
    #[must_use]
    pub fn title(&self) -> String {
        self.title_tokens()
            .iter()
            .map(|t| t.text())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Node title tokens; empty for classes and defines.
    #[must_use]
    pub fn title_tokens(&self) -> Vec<TokenRef<'a>> {
        match &self.record.kind {
            RecordKind::Node { titles } => {
                titles.iter().filter_map(|i| self.stream.get(*i)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// First `::` segment of the normalised name.
    #[must_use]
    pub fn module_name(&self) -> Cow<'a, str> {
        match self.name() {
            Cow::Borrowed(name) => Cow::Borrowed(module_of(name)),
            Cow::Owned(name) => Cow::Owned(module_of(&name).to_string()),
        }
    }

    /// A class living in the profile module.
    #[must_use]
    pub fn is_profile(&self) -> bool {
        self.is_class() && self.module_name() == self.config.profile_module
    }

    /// A class living in the role module.
    #[must_use]
    pub fn is_role(&self) -> bool {
        self.is_class() && self.module_name() == self.config.role_module
    }

    /// Which rule set applies to this resource.
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self.record.kind {
            RecordKind::Class { .. } if self.is_profile() => Classification::Profile,
            RecordKind::Class { .. } if self.is_role() => Classification::Role,
            RecordKind::Class { .. } => Classification::PlainClass,
            RecordKind::DefinedType { .. } => Classification::DefinedType,
            RecordKind::Node { .. } => Classification::Node,
        }
    }

    /// Every token of the declaration, formatting included.
    pub fn tokens(&self) -> impl Iterator<Item = TokenRef<'a>> + 'a {
        let stream = self.stream;
        self.record.tokens().filter_map(move |i| stream.get(i))
    }

    /// Parsed parameter list, computed on first use.
    pub fn params(&self) -> &ParamMap {
        self.params.get_or_init(|| match self.record.param_tokens() {
            Some(range) => parse_params(self.stream, range),
            None => ParamMap::default(),
        })
    }

    fn select(&self, pred: fn(TokenRef<'a>) -> bool) -> Vec<TokenRef<'a>> {
        self.tokens().filter(|t| pred(*t)).collect()
    }

    /// Calls to `lookup`.
    #[must_use]
    pub fn lookup_calls(&self) -> Vec<TokenRef<'a>> {
        self.select(is_lookup_call)
    }

    /// Calls to the deprecated `hiera*` functions.
    #[must_use]
    pub fn legacy_lookup_calls(&self) -> Vec<TokenRef<'a>> {
        self.select(is_legacy_lookup_call)
    }

    /// Calls to the legacy `validate_*` functions.
    #[must_use]
    pub fn legacy_validate_calls(&self) -> Vec<TokenRef<'a>> {
        self.select(is_legacy_validate_call)
    }

    /// Tokens naming classes pulled in by `include`/`require`/`contain`.
    #[must_use]
    pub fn included_classes(&self) -> Vec<TokenRef<'a>> {
        self.tokens().filter_map(included_class_of).collect()
    }

    /// Tokens naming classes declared resource-like.
    #[must_use]
    pub fn declared_classes(&self) -> Vec<TokenRef<'a>> {
        self.tokens().filter_map(declared_class_of).collect()
    }

    /// Resource type tokens of every resource declaration.
    #[must_use]
    pub fn declared_resources(&self) -> Vec<TokenRef<'a>> {
        self.select(is_declared_resource_type)
    }

    /// Declarations of the given resource type.
    #[must_use]
    pub fn find_resources(&self, type_name: &str) -> Vec<TokenRef<'a>> {
        let type_name = normalize_name(type_name);
        self.tokens()
            .filter(|t| is_declared_resource_type(*t) && normalize_name(t.text()) == type_name)
            .collect()
    }
}
