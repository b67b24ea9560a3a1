//! Diagnostics for the mapping compiler.
//!
//! Every problem the analysis detects becomes a [`Diagnostic`] attached to
//! the pass; nothing is thrown past the compiler's boundary. Each diagnostic
//! carries a stable code namespaced by category (object-mapping codes render
//! as `OM1xxx`, enum-mapping codes as `EM2xxx`), a severity, a message with
//! the offending member/type names substituted, and an anchor naming the
//! type (and member, where applicable) the problem is about.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

/// Stable diagnostic codes.
///
/// Codes are never renumbered; retired codes are not reused. The thousands
/// digit selects the namespace: 1xxx is object mapping, 2xxx is enum mapping.
pub mod codes {
    pub const MAPPING_TARGET_MUST_BE_CLASS_LIKE: u32 = 1001;
    pub const MAPPING_TARGET_NOT_EXTENSIBLE: u32 = 1002;
    pub const REQUIRED_MEMBER_NOT_COVERED: u32 = 1003;
    pub const DUPLICATE_MAPPING_DIRECTIVE: u32 = 1004;
    pub const TARGET_MEMBER_MAPPED_TWICE: u32 = 1005;
    pub const PROJECTION_NOT_SUPPORTED: u32 = 1006;
    pub const DERIVED_PAIR_NOT_MAPPED: u32 = 1007;
    pub const TARGET_MEMBER_NOT_MAPPED: u32 = 1008;
    pub const MEMBER_TYPES_NOT_CONVERTIBLE: u32 = 1009;
    pub const FACTORY_SKIPS_CONSTRUCTOR_MEMBER: u32 = 1010;
    pub const UNKNOWN_TYPE_IN_DIRECTIVE: u32 = 1011;

    pub const ENUM_TARGET_MUST_BE_ENUM: u32 = 2001;
    pub const ENUM_VALUE_NOT_MAPPED: u32 = 2002;
}

/// Message templates. Placeholders are positional: `{0}`, `{1}`, ...
pub mod messages {
    pub const MAPPING_TARGET_MUST_BE_CLASS_LIKE: &str =
        "Mapping target '{0}' must be a class, record, or struct.";
    pub const MAPPING_TARGET_NOT_EXTENSIBLE: &str =
        "Mapping target '{0}' is not declared open for generated members.";
    pub const REQUIRED_MEMBER_NOT_COVERED: &str =
        "Required member '{0}' on '{1}' has no mapping from '{2}'.";
    pub const DUPLICATE_MAPPING_DIRECTIVE: &str =
        "Duplicate mapping directive from '{0}' to '{1}'.";
    pub const TARGET_MEMBER_MAPPED_TWICE: &str =
        "Target member '{0}' on '{1}' is bound by more than one mapping.";
    pub const PROJECTION_NOT_SUPPORTED: &str =
        "Projection from '{0}' to '{1}' is not expressible as a pure member selection.";
    pub const DERIVED_PAIR_NOT_MAPPED: &str =
        "Derived mapping from '{0}' to '{1}' has no direct mapping declaration.";
    pub const TARGET_MEMBER_NOT_MAPPED: &str =
        "Target member '{0}' on '{1}' has no corresponding member on '{2}'.";
    pub const MEMBER_TYPES_NOT_CONVERTIBLE: &str =
        "Member '{0}' cannot be converted from '{1}' to '{2}'.";
    pub const FACTORY_SKIPS_CONSTRUCTOR_MEMBER: &str =
        "Member '{0}' on '{1}' is constructor-only and cannot be populated through a factory.";
    pub const UNKNOWN_TYPE_IN_DIRECTIVE: &str =
        "Mapping directive references unknown type '{0}'.";

    pub const ENUM_TARGET_MUST_BE_ENUM: &str =
        "Enum mapping from '{0}' must target an enum, but '{1}' is not one.";
    pub const ENUM_VALUE_NOT_MAPPED: &str =
        "Enum value '{0}' of '{1}' has no corresponding value on '{2}'.";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Qualified name of the type the diagnostic is anchored to.
    pub anchor_type: String,
    /// Member name when the diagnostic concerns a single member.
    pub anchor_member: Option<String>,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(code: u32, anchor_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            anchor_type: anchor_type.into(),
            anchor_member: None,
            message_text: message.into(),
        }
    }

    pub fn warning(code: u32, anchor_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            anchor_type: anchor_type.into(),
            anchor_member: None,
            message_text: message.into(),
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.anchor_member = Some(member.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// The namespaced identifier, e.g. `OM1003` or `EM2002`.
    pub fn formatted_code(&self) -> String {
        let prefix = if self.code >= 2000 { "EM" } else { "OM" };
        format!("{prefix}{}", self.code)
    }
}

/// Substitute positional `{N}` placeholders in a message template.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
