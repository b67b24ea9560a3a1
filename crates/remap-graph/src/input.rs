//! The JSON input contract.
//!
//! The host toolchain hands the mapping compiler one document per pass: an
//! enumeration of type descriptors with their attached mapping directives.
//! The document types here mirror the data model one-to-one; loading is a
//! straight deserialization plus normalization into a [`TypeGraph`].
//!
//! Malformed documents are loader errors, not diagnostics: a document that
//! does not parse never reaches analysis.

use crate::descriptor::{
    GenericParam, MemberDescriptor, Mutability, TypeDescriptor, TypeKind, TypeRef, Visibility,
};
use crate::directives::{DerivedTypePair, DirectiveFlags, HookSet, MappingDirective};
use crate::graph::{TypeGraph, TypeGraphBuilder};
use remap_common::NamingStrategy;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid type graph document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),
}

#[derive(Debug, Deserialize)]
pub struct GraphDocument {
    pub types: Vec<TypeDocument>,
}

#[derive(Debug, Deserialize)]
pub struct TypeDocument {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub assembly: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<String>,
    /// Open for generated member injection unless declared otherwise.
    #[serde(default = "default_true")]
    pub extensible: bool,
    #[serde(default)]
    pub generic_params: Vec<GenericParamDocument>,
    #[serde(default)]
    pub members: Vec<MemberDocument>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub mappings: Vec<DirectiveDocument>,
}

#[derive(Debug, Deserialize)]
pub struct GenericParamDocument {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemberDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub rename: Option<String>,
    #[serde(default)]
    pub ignore: bool,
}

#[derive(Debug, Deserialize)]
pub struct DirectiveDocument {
    /// Qualified name of the mapping target.
    pub target: String,
    #[serde(default)]
    pub flags: Vec<FlagDocument>,
    #[serde(default)]
    pub strategy: NamingStrategy,
    #[serde(default)]
    pub hooks: HookDocument,
    #[serde(default)]
    pub derived: Vec<DerivedDocument>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FlagDocument {
    Bidirectional,
    Flattening,
    Projection,
    UpdateTarget,
    IncludePrivate,
}

impl FlagDocument {
    fn bit(self) -> DirectiveFlags {
        match self {
            FlagDocument::Bidirectional => DirectiveFlags::BIDIRECTIONAL,
            FlagDocument::Flattening => DirectiveFlags::FLATTENING,
            FlagDocument::Projection => DirectiveFlags::PROJECTION,
            FlagDocument::UpdateTarget => DirectiveFlags::UPDATE_TARGET,
            FlagDocument::IncludePrivate => DirectiveFlags::INCLUDE_PRIVATE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HookDocument {
    #[serde(default)]
    pub before_map: Option<String>,
    #[serde(default)]
    pub after_map: Option<String>,
    #[serde(default)]
    pub factory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DerivedDocument {
    pub source: String,
    pub target: String,
}

fn default_true() -> bool {
    true
}

impl GraphDocument {
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Normalize the document into an immutable graph. Directive extraction
    /// happens here: per-type directive annotations become flat records with
    /// the declaring type as their source.
    pub fn into_graph(self) -> Result<TypeGraph, LoadError> {
        let mut builder = TypeGraphBuilder::new();
        let mut seen = FxHashSet::default();

        for doc in self.types {
            let mut descriptor = TypeDescriptor::new(doc.kind, doc.name);
            descriptor.namespace = doc.namespace;
            descriptor.assembly = doc.assembly;
            descriptor.base = doc.base;
            descriptor.extensible = doc.extensible;
            descriptor.generic_params = doc
                .generic_params
                .into_iter()
                .map(|p| GenericParam {
                    name: p.name,
                    constraint: p.constraint,
                })
                .collect();
            descriptor.members = doc
                .members
                .into_iter()
                .map(|m| MemberDescriptor {
                    name: m.name,
                    ty: m.ty,
                    mutability: m.mutability,
                    nullable: m.nullable,
                    required: m.required,
                    visibility: m.visibility,
                    rename: m.rename,
                    ignore: m.ignore,
                })
                .collect();
            descriptor.values = doc.values;

            let qualified = descriptor.qualified_name();
            if !seen.insert(qualified.clone()) {
                return Err(LoadError::DuplicateType(qualified));
            }

            for mapping in doc.mappings {
                let mut flags = DirectiveFlags::empty();
                for flag in &mapping.flags {
                    flags |= flag.bit();
                }
                builder.add_directive(MappingDirective {
                    source: qualified.clone(),
                    target: mapping.target,
                    flags,
                    hooks: HookSet {
                        before_map: mapping.hooks.before_map,
                        after_map: mapping.hooks.after_map,
                        factory: mapping.hooks.factory,
                    },
                    strategy: mapping.strategy,
                    derived: mapping
                        .derived
                        .into_iter()
                        .map(|d| DerivedTypePair {
                            source: d.source,
                            target: d.target,
                        })
                        .collect(),
                });
            }

            builder.add_type(descriptor);
        }

        Ok(builder.build())
    }
}
