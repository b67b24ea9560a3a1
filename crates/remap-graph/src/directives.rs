//! Mapping directives.
//!
//! Directives are the declarative configuration attached to types in the
//! target program: map this type to that one, with which options, hooks,
//! and naming strategy. The extractor normalizes them into plain records;
//! analysis consumes them as data.

use bitflags::bitflags;
use remap_common::NamingStrategy;
use serde::Serialize;

bitflags! {
    /// Option flags on a mapping directive.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirectiveFlags: u8 {
        /// Also generate the reverse routine.
        const BIDIRECTIONAL = 1 << 0;
        /// Enable one-level nested member flattening during matching.
        const FLATTENING = 1 << 1;
        /// Also generate a side-effect-free projection routine.
        const PROJECTION = 1 << 2;
        /// Also generate an in-place update routine.
        const UPDATE_TARGET = 1 << 3;
        /// Let private source members participate in matching.
        const INCLUDE_PRIVATE = 1 << 4;
    }
}

impl Serialize for DirectiveFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

/// Optional user hook routine names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct HookSet {
    /// Invoked with the untouched source before member copying; its failure
    /// aborts the mapping.
    pub before_map: Option<String>,
    /// Invoked with source and fully-populated target after copying.
    pub after_map: Option<String>,
    /// Replaces default construction of the target instance.
    pub factory: Option<String>,
}

impl HookSet {
    pub fn is_empty(&self) -> bool {
        self.before_map.is_none() && self.after_map.is_none() && self.factory.is_none()
    }
}

/// One (source derived type, target derived type) pair attached to a base
/// mapping. Each pair must have its own direct mapping declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DerivedTypePair {
    pub source: String,
    pub target: String,
}

/// A normalized mapping directive: one declared (source, target) mapping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MappingDirective {
    /// Qualified name of the source type.
    pub source: String,
    /// Qualified name of the target type.
    pub target: String,
    pub flags: DirectiveFlags,
    pub hooks: HookSet,
    pub strategy: NamingStrategy,
    /// Derived-type pairs, in declaration order.
    pub derived: Vec<DerivedTypePair>,
}

impl MappingDirective {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            flags: DirectiveFlags::empty(),
            hooks: HookSet::default(),
            strategy: NamingStrategy::Identity,
            derived: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: DirectiveFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_strategy(mut self, strategy: NamingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_hooks(mut self, hooks: HookSet) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_derived(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.derived.push(DerivedTypePair {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    pub fn bidirectional(&self) -> bool {
        self.flags.contains(DirectiveFlags::BIDIRECTIONAL)
    }

    pub fn flattening(&self) -> bool {
        self.flags.contains(DirectiveFlags::FLATTENING)
    }

    pub fn projection(&self) -> bool {
        self.flags.contains(DirectiveFlags::PROJECTION)
    }

    pub fn update_target(&self) -> bool {
        self.flags.contains(DirectiveFlags::UPDATE_TARGET)
    }

    pub fn include_private(&self) -> bool {
        self.flags.contains(DirectiveFlags::INCLUDE_PRIVATE)
    }
}
