//! Tests for symbol graph edges, pairing rules and cache invalidation

use crate::{SymbolArena, SymbolFlags, SymbolId, SymbolKind, SymbolLink, SymbolLinkKind};

fn interface(arena: &mut SymbolArena, name: &str) -> SymbolId {
    arena.alloc(name, SymbolKind::Interface, SymbolFlags::empty())
}

fn field(arena: &mut SymbolArena, name: &str) -> SymbolId {
    arena.alloc(name, SymbolKind::Field, SymbolFlags::empty())
}

#[test]
fn test_add_link_records_both_endpoints() {
    let mut arena = SymbolArena::new();
    let var = arena.alloc("x", SymbolKind::Variable, SymbolFlags::empty());
    let ty = interface(&mut arena, "T");

    assert!(arena.add_outgoing_link(var, ty, SymbolLinkKind::TypedAs).unwrap());

    let link = SymbolLink::new(var, ty, SymbolLinkKind::TypedAs);
    assert_eq!(arena.get(var).unwrap().outgoing(), &[link]);
    assert_eq!(arena.get(ty).unwrap().incoming(), &[link]);
}

#[test]
fn test_duplicate_link_is_noop() {
    let mut arena = SymbolArena::new();
    let var = arena.alloc("x", SymbolKind::Variable, SymbolFlags::empty());
    let ty = interface(&mut arena, "T");

    assert!(arena.add_outgoing_link(var, ty, SymbolLinkKind::TypedAs).unwrap());
    assert!(!arena.add_outgoing_link(var, ty, SymbolLinkKind::TypedAs).unwrap());
    assert_eq!(arena.get(var).unwrap().outgoing().len(), 1);
    assert_eq!(arena.get(ty).unwrap().incoming().len(), 1);
}

#[test]
fn test_membership_adds_contained_by() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");

    arena
        .add_outgoing_link(iface, x, SymbolLinkKind::PublicProperty)
        .unwrap();

    let contained: Vec<SymbolId> = arena
        .get(x)
        .unwrap()
        .targets(SymbolLinkKind::ContainedBy)
        .collect();
    assert_eq!(contained, vec![iface]);
    assert_eq!(arena.get_container(x), Some(iface));
    assert_eq!(arena.get_children(iface), vec![x]);
}

#[test]
fn test_removing_membership_removes_contained_by() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");
    arena
        .add_outgoing_link(iface, x, SymbolLinkKind::PublicProperty)
        .unwrap();

    assert!(arena.remove_link(iface, x, SymbolLinkKind::PublicProperty));

    assert!(arena.get(x).unwrap().outgoing().is_empty());
    assert!(arena.get(x).unwrap().incoming().is_empty());
    assert!(arena.get(iface).unwrap().outgoing().is_empty());
    assert!(arena.get(iface).unwrap().incoming().is_empty());
    assert!(arena.get_members(iface).is_empty());
}

#[test]
fn test_removing_contained_by_removes_membership() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");
    arena
        .add_outgoing_link(iface, x, SymbolLinkKind::PrivateProperty)
        .unwrap();

    assert!(arena.remove_link(x, iface, SymbolLinkKind::ContainedBy));

    assert!(arena.get(iface).unwrap().outgoing().is_empty());
    assert_eq!(arena.get_container(x), None);
}

#[test]
fn test_remove_missing_link_returns_false() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");
    assert!(!arena.remove_link(iface, x, SymbolLinkKind::PublicProperty));
}

#[test]
fn test_set_single_link_replaces_previous_target() {
    let mut arena = SymbolArena::new();
    let var = arena.alloc("x", SymbolKind::Variable, SymbolFlags::empty());
    let a = interface(&mut arena, "A");
    let b = interface(&mut arena, "B");

    arena.set_single_link(var, a, SymbolLinkKind::TypedAs).unwrap();
    assert_eq!(arena.get_type(var), Some(a));

    arena.set_single_link(var, b, SymbolLinkKind::TypedAs).unwrap();
    assert_eq!(arena.get_type(var), Some(b));
    assert!(arena.get(a).unwrap().incoming().is_empty());
    assert_eq!(arena.get(var).unwrap().outgoing().len(), 1);
}

#[test]
fn test_invalidate_keeps_edges_and_clears_resolved() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");
    arena
        .add_outgoing_link(iface, x, SymbolLinkKind::PublicProperty)
        .unwrap();
    arena.set_resolved(iface, true);
    assert_eq!(arena.get_members(iface), &[x]);

    arena.invalidate(iface);

    assert!(!arena.get(iface).unwrap().is_resolved());
    assert_eq!(arena.get(iface).unwrap().outgoing().len(), 1);
    assert_eq!(arena.get_members(iface), &[x]);
}

#[test]
fn test_invalidate_skips_well_known() {
    let mut arena = SymbolArena::new();
    let any = arena.alloc("any", SymbolKind::Primitive, SymbolFlags::WELL_KNOWN);
    arena.set_resolved(any, true);
    arena.invalidate(any);
    assert!(arena.get(any).unwrap().is_resolved());
}

#[test]
fn test_member_cache_sees_new_edges() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");
    let y = field(&mut arena, "y");
    arena
        .add_outgoing_link(iface, x, SymbolLinkKind::PublicProperty)
        .unwrap();
    assert_eq!(arena.get_members(iface), &[x]);

    arena
        .add_outgoing_link(iface, y, SymbolLinkKind::PublicProperty)
        .unwrap();
    assert_eq!(arena.get_members(iface), &[x, y]);
    assert_eq!(arena.get_public_members(iface), &[x, y]);
}

#[test]
fn test_set_instance_type_only_once() {
    let mut arena = SymbolArena::new();
    let class = arena.alloc("C", SymbolKind::Class, SymbolFlags::empty());
    let first = arena.alloc("C", SymbolKind::InstanceType, SymbolFlags::empty());
    let second = arena.alloc("C", SymbolKind::InstanceType, SymbolFlags::empty());

    arena.set_instance_type(class, first).unwrap();
    assert_eq!(
        arena.set_instance_type(class, second),
        Err(crate::BindError::DuplicateInstanceType { class })
    );
    assert_eq!(arena.get_instance_type(class), Some(first));
    assert_eq!(arena.get_class_of_instance(first), Some(class));
    assert_eq!(arena.get_container(first), Some(class));
    assert_eq!(arena.get_type(class), Some(first));
}

#[test]
fn test_call_signatures_put_definition_last() {
    let mut arena = SymbolArena::new();
    let f = arena.alloc("f", SymbolKind::Function, SymbolFlags::empty());
    let definition = arena.alloc("f", SymbolKind::Signature, SymbolFlags::DEFINITION);
    let overload_a = arena.alloc("f", SymbolKind::Signature, SymbolFlags::empty());
    let overload_b = arena.alloc("f", SymbolKind::Signature, SymbolFlags::empty());
    for sig in [definition, overload_a, overload_b] {
        arena
            .add_outgoing_link(f, sig, SymbolLinkKind::CallSignature)
            .unwrap();
    }

    assert_eq!(
        arena.get_call_signatures(f),
        &[overload_a, overload_b, definition]
    );
    assert_eq!(arena.get_definition_signature(f), Some(definition));
    assert_eq!(arena.get_container(definition), Some(f));
}

#[test]
fn test_parameters_and_return_type() {
    let mut arena = SymbolArena::new();
    let sig = arena.alloc("f", SymbolKind::Signature, SymbolFlags::empty());
    let a = arena.alloc("a", SymbolKind::Parameter, SymbolFlags::empty());
    let b = arena.alloc("b", SymbolKind::Parameter, SymbolFlags::OPTIONAL);
    let ret = interface(&mut arena, "R");
    arena.add_outgoing_link(sig, a, SymbolLinkKind::Parameter).unwrap();
    arena.add_outgoing_link(sig, b, SymbolLinkKind::Parameter).unwrap();
    arena.set_single_link(sig, ret, SymbolLinkKind::ReturnType).unwrap();

    assert_eq!(arena.get_parameters(sig), &[a, b]);
    assert_eq!(arena.get_return_type(sig), Some(ret));
    assert_eq!(arena.get_container(b), Some(sig));
}

#[test]
fn test_find_member_walks_heritage_and_survives_cycles() {
    let mut arena = SymbolArena::new();
    let a = interface(&mut arena, "A");
    let b = interface(&mut arena, "B");
    let x = field(&mut arena, "x");
    arena.add_outgoing_link(a, x, SymbolLinkKind::PublicProperty).unwrap();
    arena.add_outgoing_link(b, a, SymbolLinkKind::Extends).unwrap();
    arena.add_outgoing_link(a, b, SymbolLinkKind::Extends).unwrap();

    assert_eq!(arena.find_member(b, "x"), Some(x));
    assert_eq!(arena.find_own_member(b, "x"), None);
    assert_eq!(arena.find_member(b, "missing"), None);
    assert!(arena.extends_transitively(b, a));
}

#[test]
fn test_get_all_members_shadows_by_name() {
    let mut arena = SymbolArena::new();
    let base = interface(&mut arena, "Base");
    let derived = interface(&mut arena, "Derived");
    let base_x = field(&mut arena, "x");
    let base_y = field(&mut arena, "y");
    let derived_x = field(&mut arena, "x");
    arena.add_outgoing_link(base, base_x, SymbolLinkKind::PublicProperty).unwrap();
    arena.add_outgoing_link(base, base_y, SymbolLinkKind::PublicProperty).unwrap();
    arena
        .add_outgoing_link(derived, derived_x, SymbolLinkKind::PublicProperty)
        .unwrap();
    arena.add_outgoing_link(derived, base, SymbolLinkKind::Extends).unwrap();

    assert_eq!(arena.get_all_members(derived), vec![derived_x, base_y]);
}

#[test]
fn test_heritage_lists_skip_error_targets() {
    let mut arena = SymbolArena::new();
    let error = arena.alloc("error", SymbolKind::Error, SymbolFlags::empty());
    let base = interface(&mut arena, "Base");
    let derived = interface(&mut arena, "Derived");
    arena.add_outgoing_link(derived, error, SymbolLinkKind::Extends).unwrap();
    arena.add_outgoing_link(derived, base, SymbolLinkKind::Extends).unwrap();
    arena.add_outgoing_link(derived, error, SymbolLinkKind::Implements).unwrap();

    assert_eq!(arena.get_extended_types(derived), &[base]);
    assert!(arena.get_implemented_types(derived).is_empty());
    assert_eq!(arena.get_dependents(error), vec![derived]);
}

#[test]
fn test_array_specializations_found_from_element() {
    let mut arena = SymbolArena::new();
    let t = interface(&mut arena, "T");
    let array = arena.alloc("T[]", SymbolKind::Array, SymbolFlags::SYNTHESIZED);
    arena.add_outgoing_link(array, t, SymbolLinkKind::ArrayOf).unwrap();

    assert_eq!(arena.get_array_specializations(t), vec![array]);
    assert_eq!(arena.get_array_element_type(array), Some(t));
}

#[test]
fn test_dependents_exclude_containment() {
    let mut arena = SymbolArena::new();
    let module = arena.alloc("M", SymbolKind::Module, SymbolFlags::empty());
    let t = interface(&mut arena, "T");
    let var = arena.alloc("v", SymbolKind::Variable, SymbolFlags::empty());
    arena.add_outgoing_link(var, module, SymbolLinkKind::ContainedBy).unwrap();
    arena.add_outgoing_link(var, t, SymbolLinkKind::TypedAs).unwrap();

    assert!(arena.get_dependents(module).is_empty());
    assert_eq!(arena.get_dependents(t), vec![var]);
}

#[test]
fn test_unlink_all_removes_every_edge() {
    let mut arena = SymbolArena::new();
    let iface = interface(&mut arena, "I");
    let x = field(&mut arena, "x");
    let t = interface(&mut arena, "T");
    arena.add_outgoing_link(iface, x, SymbolLinkKind::PublicProperty).unwrap();
    arena.add_outgoing_link(x, t, SymbolLinkKind::TypedAs).unwrap();

    arena.unlink_all(x);

    for id in [iface, x, t] {
        let sym = arena.get(id).unwrap();
        assert!(sym.outgoing().is_empty(), "{} keeps outgoing edges", sym.name);
        assert!(sym.incoming().is_empty(), "{} keeps incoming edges", sym.name);
    }
}
