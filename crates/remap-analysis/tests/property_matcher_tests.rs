//! Property matcher behavior: precedence, strategies, flattening,
//! classification, and nullability.

use remap_analysis::{ContainerKind, MappingKind, UnmatchedReason, match_members};
use remap_common::NamingStrategy;
use remap_graph::{MemberDescriptor, TypeDescriptor, TypeGraph, TypeGraphBuilder, TypeRef};

fn graph_of(types: Vec<TypeDescriptor>) -> TypeGraph {
    let mut builder = TypeGraphBuilder::new();
    for t in types {
        builder.add_type(t);
    }
    builder.build()
}

fn pair(graph: &TypeGraph, source: &str, target: &str) -> (remap_graph::TypeId, remap_graph::TypeId) {
    (
        graph.type_named(source).unwrap(),
        graph.type_named(target).unwrap(),
    )
}

#[test]
fn identical_members_map_directly_without_conversion() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Id", TypeRef::Uuid))
            .member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Id", TypeRef::Uuid))
            .member(MemberDescriptor::new("Name", TypeRef::String)),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    assert_eq!(outcome.mappings.len(), 2);
    assert!(outcome.unmatched.is_empty());
    for mapping in &outcome.mappings {
        assert!(!mapping.kind.requires_conversion());
        assert!(matches!(mapping.kind, MappingKind::Direct { .. }));
        assert!(!mapping.is_flattened());
    }
}

#[test]
fn lower_first_binds_camel_case_but_not_snake_case() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("FirstName", TypeRef::String)),
        TypeDescriptor::class("CamelDto")
            .member(MemberDescriptor::new("firstName", TypeRef::String)),
        TypeDescriptor::class("SnakeDto")
            .member(MemberDescriptor::new("first_name", TypeRef::String)),
    ]);
    let (source, camel) = pair(&graph, "User", "CamelDto");
    let outcome = match_members(&graph, source, camel, NamingStrategy::LowerFirst, false, false);
    assert_eq!(outcome.mappings.len(), 1);
    assert!(outcome.unmatched.is_empty());

    let (source, snake) = pair(&graph, "User", "SnakeDto");
    let outcome = match_members(&graph, source, snake, NamingStrategy::LowerFirst, false, false);
    assert!(outcome.mappings.is_empty());
    assert_eq!(outcome.unmatched.len(), 1);
    assert_eq!(outcome.unmatched[0].reason, UnmatchedReason::NoCandidate);
}

#[test]
fn flattening_binds_nested_member_only_when_enabled() {
    let types = vec![
        TypeDescriptor::class("Address").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Address", TypeRef::Named("Address".into()))),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("AddressCity", TypeRef::String)),
    ];
    let graph = graph_of(types);
    let (source, target) = pair(&graph, "User", "UserDto");

    let flattened = match_members(&graph, source, target, NamingStrategy::Identity, true, false);
    assert_eq!(flattened.mappings.len(), 1);
    let mapping = &flattened.mappings[0];
    assert!(mapping.is_flattened());
    assert_eq!(mapping.source_path.as_slice(), [0, 0]);

    let plain = match_members(&graph, source, target, NamingStrategy::Identity, false, false);
    assert!(plain.mappings.is_empty());
    assert_eq!(plain.unmatched.len(), 1);
}

#[test]
fn rename_directive_overrides_name_heuristics() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("DisplayName", TypeRef::String).renamed_to("Name"))
            .member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("UserDto").member(MemberDescriptor::new("Name", TypeRef::String)),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    assert_eq!(outcome.mappings.len(), 1);
    // Bound to DisplayName (index 0) through the directive, not to the
    // name-identical member.
    assert_eq!(outcome.mappings[0].source_path.as_slice(), [0]);
    assert!(outcome.mappings[0].via_directive);
}

#[test]
fn ignored_members_never_participate() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Name", TypeRef::String).ignored())
            .member(MemberDescriptor::new("Age", TypeRef::I32)),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Name", TypeRef::String))
            .member(MemberDescriptor::new("Age", TypeRef::I32))
            .member(MemberDescriptor::new("Internal", TypeRef::String).ignored()),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    // Target `Name` finds no candidate (source member ignored); target
    // `Internal` is skipped outright rather than reported unmatched.
    assert_eq!(outcome.mappings.len(), 1);
    assert_eq!(outcome.unmatched.len(), 1);
    assert_eq!(outcome.unmatched[0].target_member, 0);
}

#[test]
fn private_members_require_include_private() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Secret", TypeRef::String).private()),
        TypeDescriptor::class("UserDto").member(MemberDescriptor::new("Secret", TypeRef::String)),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");

    let hidden = match_members(&graph, source, target, NamingStrategy::Identity, false, false);
    assert!(hidden.mappings.is_empty());

    let included = match_members(&graph, source, target, NamingStrategy::Identity, false, true);
    assert_eq!(included.mappings.len(), 1);
}

#[test]
fn collections_map_element_wise_preserving_target_container() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new(
                "Tags",
                TypeRef::List(Box::new(TypeRef::String)),
            )),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new(
                "Tags",
                TypeRef::Set(Box::new(TypeRef::String)),
            )),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    assert_eq!(outcome.mappings.len(), 1);
    let MappingKind::Collection { container, element } = &outcome.mappings[0].kind else {
        panic!("expected collection mapping");
    };
    assert_eq!(*container, ContainerKind::Set);
    assert!(matches!(**element, MappingKind::Direct { .. }));
    assert!(outcome.mappings[0].kind.is_collection());
}

#[test]
fn nested_and_enum_members_delegate_to_pair_mappings() {
    let graph = graph_of(vec![
        TypeDescriptor::an_enum("Status").value("None").value("Active"),
        TypeDescriptor::an_enum("ApiStatus").value("Unknown").value("Active"),
        TypeDescriptor::class("Address").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("ApiAddress").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Status", TypeRef::Named("Status".into())))
            .member(MemberDescriptor::new("Address", TypeRef::Named("Address".into()))),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Status", TypeRef::Named("ApiStatus".into())))
            .member(MemberDescriptor::new("Address", TypeRef::Named("ApiAddress".into()))),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    assert_eq!(outcome.mappings.len(), 2);
    assert!(outcome.mappings[0].kind.has_enum_mapping());
    assert!(outcome.mappings[1].kind.is_nested());
}

#[test]
fn builtin_conversions_and_unconvertible_members() {
    let graph = graph_of(vec![
        TypeDescriptor::class("Event")
            .member(MemberDescriptor::new("Id", TypeRef::Uuid))
            .member(MemberDescriptor::new("At", TypeRef::Timestamp))
            .member(MemberDescriptor::new("Count", TypeRef::I32))
            .member(MemberDescriptor::new("Payload", TypeRef::String)),
        TypeDescriptor::class("EventDto")
            .member(MemberDescriptor::new("Id", TypeRef::String))
            .member(MemberDescriptor::new("At", TypeRef::String))
            .member(MemberDescriptor::new("Count", TypeRef::I64))
            .member(MemberDescriptor::new("Payload", TypeRef::I32)),
    ]);
    let (source, target) = pair(&graph, "Event", "EventDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    assert_eq!(outcome.mappings.len(), 3);
    assert!(outcome.mappings.iter().all(|m| m.kind.requires_conversion()));

    // string -> i32 has no builtin conversion.
    assert_eq!(outcome.unmatched.len(), 1);
    assert!(matches!(
        outcome.unmatched[0].reason,
        UnmatchedReason::NotConvertible { source_member: 3 }
    ));
}

#[test]
fn nullability_rules() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Nickname", TypeRef::String).nullable())
            .member(MemberDescriptor::new("Name", TypeRef::String))
            .member(MemberDescriptor::new("Motto", TypeRef::String).nullable()),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Nickname", TypeRef::String))
            .member(MemberDescriptor::new("Name", TypeRef::String).nullable())
            .member(MemberDescriptor::new("Motto", TypeRef::String).nullable()),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, false, false);

    // Optional source into required target is unconvertible.
    assert_eq!(outcome.unmatched.len(), 1);
    assert_eq!(outcome.unmatched[0].target_member, 0);

    let name = outcome.mappings.iter().find(|m| m.target_member == 1).unwrap();
    assert!(name.wrap_some);
    assert!(!name.through_option);

    let motto = outcome.mappings.iter().find(|m| m.target_member == 2).unwrap();
    assert!(motto.through_option);
    assert!(!motto.wrap_some);
}

#[test]
fn flattening_tie_breaks_by_source_declaration_order() {
    // Both `Home.City` and `Work.City` concatenate to a name matching
    // `HomeCity` is unambiguous, but `City` via two parents is not; the
    // first declared parent wins for e.g. a target named `WorkCity` only
    // through the `Work` member.
    let graph = graph_of(vec![
        TypeDescriptor::class("Address").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Home", TypeRef::Named("Address".into())))
            .member(MemberDescriptor::new("Work", TypeRef::Named("Address".into()))),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("HomeCity", TypeRef::String))
            .member(MemberDescriptor::new("WorkCity", TypeRef::String)),
    ]);
    let (source, target) = pair(&graph, "User", "UserDto");
    let outcome = match_members(&graph, source, target, NamingStrategy::Identity, true, false);

    assert_eq!(outcome.mappings.len(), 2);
    assert_eq!(outcome.mappings[0].source_path.as_slice(), [0, 0]);
    assert_eq!(outcome.mappings[1].source_path.as_slice(), [1, 0]);
}

#[test]
fn underscore_strategy_flattens_with_separators() {
    let graph = graph_of(vec![
        TypeDescriptor::class("Address").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Address", TypeRef::Named("Address".into()))),
        TypeDescriptor::class("Row").member(MemberDescriptor::new("address_city", TypeRef::String)),
    ]);
    let (source, target) = pair(&graph, "User", "Row");
    let outcome = match_members(&graph, source, target, NamingStrategy::Underscore, true, false);

    assert_eq!(outcome.mappings.len(), 1);
    assert!(outcome.mappings[0].is_flattened());
}
