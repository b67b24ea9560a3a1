//! Type and member descriptors.
//!
//! A `TypeDescriptor` is an immutable snapshot of one type in the target
//! program: identity, shape kind, ordered members, generic parameters, base
//! type, and (for enums) the declared values in declaration order. Member
//! types are `TypeRef`s: a closed set of scalar kinds plus named graph
//! types, generic parameters, and collections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a type in the graph's type table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Record,
    Struct,
    Enum,
}

impl TypeKind {
    /// Class-like shapes can carry object mappings; enums carry value mappings.
    pub fn is_class_like(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Record | TypeKind::Struct)
    }
}

/// Whether a member can be assigned after construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    #[default]
    Settable,
    /// Satisfiable only at construction (init-only / positional record member).
    ConstructorOnly,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A member's declared type.
///
/// Scalars are a closed set; everything else is a named graph type, a
/// generic parameter of the declaring type, or a collection of either.
/// Nullability is a member attribute, not part of the `TypeRef`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Bool,
    I32,
    I64,
    F64,
    String,
    Uuid,
    Timestamp,
    /// A type declared in the graph, by qualified name.
    Named(String),
    /// A generic parameter of the declaring type.
    Param(String),
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
}

impl TypeRef {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeRef::Bool
                | TypeRef::I32
                | TypeRef::I64
                | TypeRef::F64
                | TypeRef::String
                | TypeRef::Uuid
                | TypeRef::Timestamp
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, TypeRef::List(_) | TypeRef::Set(_))
    }

    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(elem) | TypeRef::Set(elem) => Some(elem),
            _ => None,
        }
    }

    /// Whether a by-value copy of this ref is cheap in emitted code.
    /// `String`, named types, and collections need `.clone()`.
    pub fn is_copy(&self) -> bool {
        matches!(
            self,
            TypeRef::Bool | TypeRef::I32 | TypeRef::I64 | TypeRef::F64 | TypeRef::Uuid | TypeRef::Timestamp
        )
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Bool => write!(f, "bool"),
            TypeRef::I32 => write!(f, "i32"),
            TypeRef::I64 => write!(f, "i64"),
            TypeRef::F64 => write!(f, "f64"),
            TypeRef::String => write!(f, "string"),
            TypeRef::Uuid => write!(f, "uuid"),
            TypeRef::Timestamp => write!(f, "timestamp"),
            TypeRef::Named(name) | TypeRef::Param(name) => write!(f, "{name}"),
            TypeRef::List(elem) => write!(f, "list<{elem}>"),
            TypeRef::Set(elem) => write!(f, "set<{elem}>"),
        }
    }
}

impl serde::Serialize for TypeRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for TypeRef {
    type Err = String;

    /// Parse the textual form used by the input contract: scalar keywords,
    /// `list<...>` / `set<...>`, and anything else as a named type. Names
    /// matching a generic parameter of the declaring type are rewritten to
    /// `Param` at graph-build time, not here.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix("list<") {
            let inner = inner
                .strip_suffix('>')
                .ok_or_else(|| format!("unterminated collection type '{text}'"))?;
            return Ok(TypeRef::List(Box::new(inner.parse()?)));
        }
        if let Some(inner) = text.strip_prefix("set<") {
            let inner = inner
                .strip_suffix('>')
                .ok_or_else(|| format!("unterminated collection type '{text}'"))?;
            return Ok(TypeRef::Set(Box::new(inner.parse()?)));
        }
        Ok(match text {
            "bool" => TypeRef::Bool,
            "i32" => TypeRef::I32,
            "i64" => TypeRef::I64,
            "f64" => TypeRef::F64,
            "string" => TypeRef::String,
            "uuid" => TypeRef::Uuid,
            "timestamp" => TypeRef::Timestamp,
            "" => return Err("empty type reference".to_string()),
            name => TypeRef::Named(name.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A generic parameter with its constraint carried verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenericParam {
    pub name: String,
    /// Constraint text preserved into emitted signatures, e.g. `Clone`.
    pub constraint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub ty: TypeRef,
    pub mutability: Mutability,
    pub nullable: bool,
    pub required: bool,
    pub visibility: Visibility,
    /// Explicit rename directive: the target member this member maps to.
    pub rename: Option<String>,
    /// Ignore directive: never participates in matching.
    pub ignore: bool,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            mutability: Mutability::Settable,
            nullable: false,
            required: false,
            visibility: Visibility::Public,
            rename: None,
            ignore: false,
        }
    }

    pub fn constructor_only(mut self) -> Self {
        self.mutability = Mutability::ConstructorOnly;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn renamed_to(mut self, target: impl Into<String>) -> Self {
        self.rename = Some(target.into());
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub namespace: String,
    pub assembly: String,
    pub kind: TypeKind,
    pub members: Vec<MemberDescriptor>,
    pub generic_params: Vec<GenericParam>,
    /// Qualified name of the base type, if any.
    pub base: Option<String>,
    /// Whether the type is declared open for generated member injection.
    pub extensible: bool,
    /// Enum values in declaration order. Empty for class-like types.
    pub values: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            assembly: String::new(),
            kind,
            members: Vec::new(),
            generic_params: Vec::new(),
            base: None,
            extensible: true,
            values: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, name)
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Record, name)
    }

    pub fn an_enum(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Enum, name)
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn sealed(mut self) -> Self {
        self.extensible = false;
        self
    }

    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn generic(mut self, name: impl Into<String>, constraint: Option<&str>) -> Self {
        self.generic_params.push(GenericParam {
            name: name.into(),
            constraint: constraint.map(str::to_string),
        });
        self
    }

    /// `namespace.Name`, or the bare name when the namespace is empty.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn is_class_like(&self) -> bool {
        self.kind.is_class_like()
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    pub fn member_named(&self, name: &str) -> Option<(usize, &MemberDescriptor)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name)
    }
}
