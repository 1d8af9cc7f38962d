//! Tests for lazy name and type resolution

use crate::{BinderOptions, Meaning, Session, SymbolFlags, SymbolId, SymbolKind, SymbolLinkKind};
use tsb_common::diagnostic_codes;
use tsb_syntax::{ModifierFlags, NodeIndex, TreeBuilder};

fn bind_with(options: BinderOptions, builder: TreeBuilder, root: NodeIndex) -> Session {
    let (arena, root) = builder.finish(root);
    let mut session = Session::with_options(options);
    session.add_unit("a.ts", arena, root).unwrap();
    session
}

fn bind(builder: TreeBuilder, root: NodeIndex) -> Session {
    bind_with(BinderOptions::default(), builder, root)
}

fn global(session: &Session, name: &str) -> SymbolId {
    session.chain().global_symbols(name)[0]
}

fn child(session: &Session, parent: SymbolId, name: &str) -> SymbolId {
    session
        .symbols()
        .get_children(parent)
        .into_iter()
        .find(|&id| session.symbols().name(id) == name)
        .unwrap()
}

fn resolved_type(session: &mut Session, symbol: SymbolId) -> SymbolId {
    session.resolver().resolve_symbol(symbol).unwrap();
    session.symbols().get_type(symbol).unwrap()
}

fn count_code(session: &Session, code: u32) -> usize {
    session.diagnostics().iter().filter(|d| d.code == code).count()
}

#[test]
fn test_enclosing_module_is_searched_before_globals() {
    let mut b = TreeBuilder::new("a.ts");
    let global_t = b.interface("T", ModifierFlags::empty(), vec![], vec![]);
    let num = b.number_type();
    let global_x = b.var("x", ModifierFlags::empty(), num);
    let num2 = b.number_type();
    let f = b.method_signature("f", ModifierFlags::empty(), vec![], num2);
    let inner_t = b.interface("T", ModifierFlags::empty(), vec![], vec![f]);
    let t_ref = b.type_ref("T");
    let inner_x = b.var("y", ModifierFlags::empty(), t_ref);
    let module = b.module("M", ModifierFlags::empty(), vec![inner_t, inner_x]);
    let root = b.source_file(vec![global_t, global_x, module]);
    let mut session = bind(b, root);

    let m = global(&session, "M");
    let m_t = child(&session, m, "T");
    let y = child(&session, m, "y");
    assert_ne!(m_t, global(&session, "T"));

    assert_eq!(resolved_type(&mut session, y), m_t);
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_global_table_is_the_fallback() {
    let mut b = TreeBuilder::new("a.ts");
    let t = b.interface("T", ModifierFlags::empty(), vec![], vec![]);
    let t_ref = b.type_ref("T");
    let y = b.var("y", ModifierFlags::empty(), t_ref);
    let module = b.module("M", ModifierFlags::empty(), vec![y]);
    let root = b.source_file(vec![t, module]);
    let mut session = bind(b, root);

    let m = global(&session, "M");
    let y = child(&session, m, "y");
    let t = global(&session, "T");
    assert_eq!(resolved_type(&mut session, y), t);
}

#[test]
fn test_qualified_reference_uses_exported_members() {
    let mut b = TreeBuilder::new("a.ts");
    let exported = b.interface("B", ModifierFlags::EXPORT, vec![], vec![]);
    let hidden = b.interface("H", ModifierFlags::empty(), vec![], vec![]);
    let module = b.module("A", ModifierFlags::empty(), vec![exported, hidden]);
    let b_ref = b.type_ref("A.B");
    let z = b.var("z", ModifierFlags::empty(), b_ref);
    let h_ref = b.type_ref("A.H");
    let w = b.var("w", ModifierFlags::empty(), h_ref);
    let root = b.source_file(vec![module, z, w]);
    let mut session = bind(b, root);

    let a = global(&session, "A");
    let a_b = child(&session, a, "B");
    let z = global(&session, "z");
    let w = global(&session, "w");
    assert_eq!(resolved_type(&mut session, z), a_b);
    assert_eq!(resolved_type(&mut session, w), session.well_known().error);
    assert_eq!(count_code(&session, diagnostic_codes::CANNOT_FIND_NAME), 1);
}

#[test]
fn test_unresolved_type_yields_error_and_continues() {
    let mut b = TreeBuilder::new("a.ts");
    let missing = b.type_ref("Missing");
    let u = b.var("u", ModifierFlags::empty(), missing);
    let num = b.number_type();
    let n = b.var("n", ModifierFlags::empty(), num);
    let root = b.source_file(vec![u, n]);
    let mut session = bind(b, root);

    let u = global(&session, "u");
    let n = global(&session, "n");
    assert_eq!(resolved_type(&mut session, u), session.well_known().error);
    assert_eq!(resolved_type(&mut session, n), session.well_known().number);

    let diags = session.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::CANNOT_FIND_NAME);
    assert_eq!(diags[0].file, "a.ts");
    assert!(diags[0].message_text.contains("'Missing'"));
}

#[test]
fn test_missing_annotation_is_any() {
    let mut b = TreeBuilder::new("a.ts");
    let v = b.var("v", ModifierFlags::empty(), NodeIndex::NONE);
    let root = b.source_file(vec![v]);
    let mut session = bind(b, root);

    let v = global(&session, "v");
    assert_eq!(resolved_type(&mut session, v), session.well_known().any);
}

#[test]
fn test_array_specialization_is_shared() {
    let mut b = TreeBuilder::new("a.ts");
    let t = b.interface("T", ModifierFlags::empty(), vec![], vec![]);
    let t_ref = b.type_ref("T");
    let arr1 = b.array_type(t_ref);
    let a = b.var("a", ModifierFlags::empty(), arr1);
    let t_ref2 = b.type_ref("T");
    let arr2 = b.array_type(t_ref2);
    let c = b.var("c", ModifierFlags::empty(), arr2);
    let root = b.source_file(vec![t, a, c]);
    let mut session = bind(b, root);

    let t = global(&session, "T");
    let a = global(&session, "a");
    let c = global(&session, "c");
    let a_ty = resolved_type(&mut session, a);
    let c_ty = resolved_type(&mut session, c);
    assert_eq!(a_ty, c_ty);

    let symbols = session.symbols();
    assert_eq!(symbols.kind(a_ty), Some(SymbolKind::Array));
    assert_eq!(symbols.name(a_ty), "T[]");
    assert_eq!(symbols.get_array_element_type(a_ty), Some(t));
    assert_eq!(symbols.get_array_specializations(t), vec![a_ty]);
    assert!(session.validate_symbol_graph().is_empty());
}

#[test]
fn test_nested_arrays_specialize_each_level() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let inner = b.array_type(num);
    let outer = b.array_type(inner);
    let grid = b.var("grid", ModifierFlags::empty(), outer);
    let root = b.source_file(vec![grid]);
    let mut session = bind(b, root);

    let grid = global(&session, "grid");
    let ty = resolved_type(&mut session, grid);
    let symbols = session.symbols();
    assert_eq!(symbols.name(ty), "number[][]");
    let element = symbols.get_array_element_type(ty).unwrap();
    assert_eq!(symbols.get_array_element_type(element), Some(session.well_known().number));
}

#[test]
fn test_function_type_synthesizes_signature() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let a = b.param("a", num);
    let untyped = b.param("b", NodeIndex::NONE);
    let str_ty = b.string_type();
    let fn_ty = b.function_type(vec![a, untyped], str_ty);
    let f = b.var("f", ModifierFlags::empty(), fn_ty);
    let root = b.source_file(vec![f]);
    let mut session = bind(b, root);

    let f = global(&session, "f");
    let ty = resolved_type(&mut session, f);
    let symbols = session.symbols();
    let wk = session.well_known();
    assert_eq!(symbols.kind(ty), Some(SymbolKind::Function));
    assert!(symbols.get(ty).unwrap().has_flag(SymbolFlags::SYNTHESIZED));
    let sigs = symbols.get_call_signatures(ty);
    assert_eq!(sigs.len(), 1);
    let params = symbols.get_parameters(sigs[0]);
    assert_eq!(params.len(), 2);
    assert_eq!(symbols.get_type(params[0]), Some(wk.number));
    assert_eq!(symbols.get_type(params[1]), Some(wk.any));
    assert_eq!(symbols.get_return_type(sigs[0]), Some(wk.string));
}

#[test]
fn test_constructor_type_synthesizes_construct_signature() {
    let mut b = TreeBuilder::new("a.ts");
    let t = b.interface("T", ModifierFlags::empty(), vec![], vec![]);
    let t_ref = b.type_ref("T");
    let ctor_ty = b.constructor_type(vec![], t_ref);
    let factory = b.var("factory", ModifierFlags::empty(), ctor_ty);
    let root = b.source_file(vec![t, factory]);
    let mut session = bind(b, root);

    let t = global(&session, "T");
    let factory = global(&session, "factory");
    let ty = resolved_type(&mut session, factory);
    let symbols = session.symbols();
    assert_eq!(symbols.kind(ty), Some(SymbolKind::TypeLiteral));
    let ctors = symbols.get_construct_signatures(ty);
    assert_eq!(ctors.len(), 1);
    assert_eq!(symbols.get_return_type(ctors[0]), Some(t));
}

#[test]
fn test_type_literal_members() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let x = b.property_signature("x", ModifierFlags::OPTIONAL, num);
    let void = b.void_type();
    let m = b.method_signature("m", ModifierFlags::empty(), vec![], void);
    let str_ty = b.string_type();
    let key = b.param("key", str_ty);
    let any = b.any_type();
    let index = b.index_signature(key, any);
    let literal = b.type_literal(vec![x, m, index]);
    let p = b.var("p", ModifierFlags::empty(), literal);
    let root = b.source_file(vec![p]);
    let mut session = bind(b, root);

    let p = global(&session, "p");
    let ty = resolved_type(&mut session, p);
    let symbols = session.symbols();
    assert_eq!(symbols.kind(ty), Some(SymbolKind::TypeLiteral));
    let members = symbols.get_public_members(ty);
    assert_eq!(members.len(), 2);
    let x = members[0];
    assert_eq!(symbols.name(x), "x");
    assert!(symbols.get(x).unwrap().has_flag(SymbolFlags::OPTIONAL));
    assert_eq!(symbols.get_type(x), Some(session.well_known().number));
    assert_eq!(symbols.kind(members[1]), Some(SymbolKind::Method));
    assert_eq!(symbols.get_call_signatures(members[1]).len(), 1);
    assert_eq!(symbols.get_index_signatures(ty).len(), 1);
    assert!(session.validate_symbol_graph().is_empty());
}

#[test]
fn test_class_reference_denotes_instance_side() {
    let mut b = TreeBuilder::new("a.ts");
    let class = b.class("C", ModifierFlags::empty(), vec![], vec![], vec![]);
    let c_ref = b.type_ref("C");
    let c = b.var("c", ModifierFlags::empty(), c_ref);
    let root = b.source_file(vec![class, c]);
    let mut session = bind(b, root);

    let class = session
        .chain()
        .global_symbols("C")
        .into_iter()
        .find(|&id| session.symbols().kind(id) == Some(SymbolKind::Class))
        .unwrap();
    let c = global(&session, "c");
    let instance = session.symbols().get_instance_type(class).unwrap();
    assert_eq!(resolved_type(&mut session, c), instance);
}

#[test]
fn test_class_extends_links_instance_sides() {
    let mut b = TreeBuilder::new("a.ts");
    let void = b.void_type();
    let foo = b.method("foo", ModifierFlags::empty(), vec![], void, Some(vec![]));
    let a = b.class("A", ModifierFlags::empty(), vec![], vec![], vec![foo]);
    let a_ref = b.type_ref("A");
    let b_class = b.class("B", ModifierFlags::empty(), vec![a_ref], vec![], vec![]);
    let root = b.source_file(vec![a, b_class]);
    let mut session = bind(b, root);

    let a = global(&session, "A");
    let b_sym = global(&session, "B");
    session.resolver().resolve_symbol(b_sym).unwrap();

    let symbols = session.symbols();
    let a_instance = symbols.get_instance_type(a).unwrap();
    let b_instance = symbols.get_instance_type(b_sym).unwrap();
    assert_eq!(symbols.get_extended_types(b_instance), &[a_instance]);
    assert!(symbols.get_extended_types(a_instance).is_empty());

    let foo = symbols.find_member(b_sym, "foo").unwrap();
    assert_eq!(symbols.get_container(foo), Some(a_instance));
    assert!(symbols.find_own_member(b_sym, "foo").is_none());
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_resolving_instance_side_resolves_class() {
    let mut b = TreeBuilder::new("a.ts");
    let a = b.class("A", ModifierFlags::empty(), vec![], vec![], vec![]);
    let a_ref = b.type_ref("A");
    let b_class = b.class("B", ModifierFlags::empty(), vec![a_ref], vec![], vec![]);
    let root = b.source_file(vec![a, b_class]);
    let mut session = bind(b, root);

    let b_sym = global(&session, "B");
    let b_instance = session.symbols().get_instance_type(b_sym).unwrap();
    session.resolver().resolve_symbol(b_instance).unwrap();
    assert!(session.symbols().get(b_sym).unwrap().is_resolved());
    assert_eq!(session.symbols().get_extended_types(b_instance).len(), 1);
}

#[test]
fn test_implements_links_interface() {
    let mut b = TreeBuilder::new("a.ts");
    let iface = b.interface("I", ModifierFlags::empty(), vec![], vec![]);
    let i_ref = b.type_ref("I");
    let class = b.class("C", ModifierFlags::empty(), vec![], vec![i_ref], vec![]);
    let root = b.source_file(vec![iface, class]);
    let mut session = bind(b, root);

    let i = global(&session, "I");
    let c = global(&session, "C");
    session.resolver().resolve_symbol(c).unwrap();
    let instance = session.symbols().get_instance_type(c).unwrap();
    assert_eq!(session.symbols().get_implemented_types(instance), &[i]);
}

#[test]
fn test_interface_heritage_cycle_is_reported_once() {
    let mut b = TreeBuilder::new("a.ts");
    let b_ref = b.type_ref("B");
    let a = b.interface("A", ModifierFlags::empty(), vec![b_ref], vec![]);
    let a_ref = b.type_ref("A");
    let b_iface = b.interface("B", ModifierFlags::empty(), vec![a_ref], vec![]);
    let root = b.source_file(vec![a, b_iface]);
    let mut session = bind(b, root);

    let a = global(&session, "A");
    let b_sym = global(&session, "B");
    session.resolver().resolve_symbol(a).unwrap();
    session.resolver().resolve_symbol(b_sym).unwrap();

    assert_eq!(
        count_code(&session, diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE),
        1
    );
    let symbols = session.symbols();
    let edges = symbols.get_extended_types(a).len() + symbols.get_extended_types(b_sym).len();
    assert_eq!(edges, 1);
    assert_eq!(symbols.find_member(a, "nothing"), None);
}

#[test]
fn test_class_extending_itself_is_a_cycle() {
    let mut b = TreeBuilder::new("a.ts");
    let a_ref = b.type_ref("A");
    let a = b.class("A", ModifierFlags::empty(), vec![a_ref], vec![], vec![]);
    let root = b.source_file(vec![a]);
    let mut session = bind(b, root);

    let a = global(&session, "A");
    session.resolver().resolve_symbol(a).unwrap();
    let instance = session.symbols().get_instance_type(a).unwrap();
    assert!(session.symbols().get_extended_types(instance).is_empty());
    let diag = &session.diagnostics()[0];
    assert_eq!(diag.code, diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE);
    assert!(diag.message_text.contains("'A'"));
}

#[test]
fn test_cycle_detection_can_be_disabled() {
    let mut b = TreeBuilder::new("a.ts");
    let b_ref = b.type_ref("B");
    let a = b.interface("A", ModifierFlags::empty(), vec![b_ref], vec![]);
    let a_ref = b.type_ref("A");
    let b_iface = b.interface("B", ModifierFlags::empty(), vec![a_ref], vec![]);
    let root = b.source_file(vec![a, b_iface]);
    let options = BinderOptions {
        detect_heritage_cycles: false,
        ..BinderOptions::default()
    };
    let mut session = bind_with(options, b, root);

    let a = global(&session, "A");
    let b_sym = global(&session, "B");
    session.resolver().resolve_symbol(a).unwrap();

    let symbols = session.symbols();
    assert_eq!(symbols.get_extended_types(a), &[b_sym]);
    assert_eq!(symbols.get_extended_types(b_sym), &[a]);
    assert_eq!(symbols.find_member(a, "nothing"), None);
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_heritage_errors_by_kind() {
    let mut b = TreeBuilder::new("a.ts");
    let any = b.any_type();
    let v = b.var("v", ModifierFlags::empty(), any);
    let v_ref = b.type_ref("v");
    let class = b.class("C", ModifierFlags::empty(), vec![v_ref], vec![], vec![]);
    let v_ref2 = b.type_ref("v");
    let iface = b.interface("I", ModifierFlags::empty(), vec![v_ref2], vec![]);
    let missing = b.type_ref("Nowhere");
    let other = b.interface("J", ModifierFlags::empty(), vec![missing], vec![]);
    let root = b.source_file(vec![v, class, iface, other]);
    let mut session = bind(b, root);

    for name in ["C", "I", "J"] {
        let id = global(&session, name);
        session.resolver().resolve_symbol(id).unwrap();
    }

    assert_eq!(count_code(&session, diagnostic_codes::CLASS_CAN_ONLY_IMPLEMENT_OBJECT_TYPE), 1);
    assert_eq!(count_code(&session, diagnostic_codes::INTERFACE_CAN_ONLY_EXTEND_OBJECT_TYPE), 1);
    assert_eq!(count_code(&session, diagnostic_codes::CANNOT_FIND_NAME), 1);
    let j = global(&session, "J");
    assert!(session.symbols().get_extended_types(j).is_empty());
    // The missing base stays linked to the error symbol so it can be retried.
    let error = session.well_known().error;
    assert!(session.symbols().get_dependents(error).contains(&j));
    assert!(!session.symbols().extends_transitively(j, error));
}

#[test]
fn test_second_implementation_is_reported() {
    let mut b = TreeBuilder::new("a.ts");
    let void = b.void_type();
    let first = b.function("f", ModifierFlags::empty(), vec![], void, Some(vec![]));
    let void2 = b.void_type();
    let second = b.function("f", ModifierFlags::empty(), vec![], void2, Some(vec![]));
    let root = b.source_file(vec![first, second]);
    let mut session = bind(b, root);

    let f = global(&session, "f");
    session.resolver().resolve_symbol(f).unwrap();
    session.resolver().resolve_symbol(f).unwrap();

    let second_decl = session.get_decl_for_ast("a.ts", second).unwrap();
    let span = session.decl(second_decl).unwrap().span;
    let diags = session.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::DUPLICATE_FUNCTION_IMPLEMENTATION);
    assert_eq!(diags[0].start, span.start);

    let symbols = session.symbols();
    let sigs = symbols.get_call_signatures(f);
    assert_eq!(sigs.len(), 2);
    let definitions = sigs.iter().filter(|&&s| symbols.is_definition_signature(s)).count();
    assert_eq!(definitions, 1);
}

#[test]
fn test_field_method_collision_reported_once() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let field = b.property("x", ModifierFlags::empty(), num);
    let void = b.void_type();
    let method = b.method("x", ModifierFlags::empty(), vec![], void, Some(vec![]));
    let class = b.class("C", ModifierFlags::empty(), vec![], vec![], vec![field, method]);
    let root = b.source_file(vec![class]);
    let mut session = bind(b, root);

    let c = global(&session, "C");
    session.resolver().resolve_symbol(c).unwrap();
    session.resolver().resolve_symbol(c).unwrap();

    let diags: Vec<_> = session
        .diagnostics()
        .iter()
        .filter(|d| d.code == diagnostic_codes::DUPLICATE_IDENTIFIER)
        .collect();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message_text.contains("'x'"));
    assert_eq!(diags[0].related_information.len(), 1);
}

#[test]
fn test_collision_reporting_can_be_disabled() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let field = b.property("x", ModifierFlags::empty(), num);
    let void = b.void_type();
    let method = b.method("x", ModifierFlags::empty(), vec![], void, Some(vec![]));
    let class = b.class("C", ModifierFlags::empty(), vec![], vec![], vec![field, method]);
    let root = b.source_file(vec![class]);
    let options = BinderOptions {
        report_member_collisions: false,
        ..BinderOptions::default()
    };
    let mut session = bind_with(options, b, root);

    let c = global(&session, "C");
    session.resolver().resolve_symbol(c).unwrap();
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_signature_types_resolve_from_annotations() {
    let mut b = TreeBuilder::new("a.ts");
    let t = b.interface("T", ModifierFlags::empty(), vec![], vec![]);
    let num = b.number_type();
    let a = b.param("a", num);
    let str_ty = b.string_type();
    let opt = b.param_with("b", ModifierFlags::OPTIONAL, str_ty);
    let t_ref = b.type_ref("T");
    let f = b.function("f", ModifierFlags::empty(), vec![a, opt], t_ref, None);
    let g = b.function("g", ModifierFlags::empty(), vec![], NodeIndex::NONE, Some(vec![]));
    let root = b.source_file(vec![t, f, g]);
    let mut session = bind(b, root);

    let t = global(&session, "T");
    let f = global(&session, "f");
    let g = global(&session, "g");
    session.resolver().resolve_symbol(f).unwrap();
    session.resolver().resolve_symbol(g).unwrap();

    let symbols = session.symbols();
    let wk = session.well_known();
    let sig = symbols.get_call_signatures(f)[0];
    let params = symbols.get_parameters(sig);
    assert_eq!(symbols.get_type(params[0]), Some(wk.number));
    assert_eq!(symbols.get_type(params[1]), Some(wk.string));
    assert!(symbols.get(params[1]).unwrap().has_flag(SymbolFlags::OPTIONAL));
    assert_eq!(symbols.get_return_type(sig), Some(t));

    let g_sig = symbols.get_call_signatures(g)[0];
    assert_eq!(symbols.get_return_type(g_sig), Some(wk.any));
}

#[test]
fn test_constructor_signature_returns_instance() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let p = b.param_with("size", ModifierFlags::PUBLIC, num);
    let ctor = b.constructor(ModifierFlags::empty(), vec![p], Some(vec![]));
    let class = b.class("C", ModifierFlags::empty(), vec![], vec![], vec![ctor]);
    let root = b.source_file(vec![class]);
    let mut session = bind(b, root);

    let c = global(&session, "C");
    let instance = session.symbols().get_instance_type(c).unwrap();
    let ctor_sig = session.symbols().get_construct_signatures(c)[0];
    session.resolver().resolve_symbol(ctor_sig).unwrap();
    assert_eq!(session.symbols().get_return_type(ctor_sig), Some(instance));

    let size = session.symbols().get_members(instance)[0];
    assert_eq!(resolved_type(&mut session, size), session.well_known().number);
}

#[test]
fn test_accessor_type_prefers_getter() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let v = b.param("v", num);
    let setter = b.set_accessor("value", ModifierFlags::empty(), v, vec![]);
    let str_ty = b.string_type();
    let getter = b.get_accessor("value", ModifierFlags::empty(), str_ty, vec![]);
    let bool_ty = b.boolean_type();
    let w = b.param("w", bool_ty);
    let only_setter = b.set_accessor("flag", ModifierFlags::empty(), w, vec![]);
    let class = b.class("C", ModifierFlags::empty(), vec![], vec![], vec![setter, getter, only_setter]);
    let root = b.source_file(vec![class]);
    let mut session = bind(b, root);

    let c = global(&session, "C");
    let instance = session.symbols().get_instance_type(c).unwrap();
    let members = session.symbols().get_members(instance).to_vec();
    assert_eq!(members.len(), 2);
    assert_eq!(resolved_type(&mut session, members[0]), session.well_known().string);
    assert_eq!(resolved_type(&mut session, members[1]), session.well_known().boolean);
}

#[test]
fn test_import_alias_resolves_lazily() {
    let mut b = TreeBuilder::new("a.ts");
    let i = b.interface("I", ModifierFlags::EXPORT, vec![], vec![]);
    let module = b.module("M", ModifierFlags::empty(), vec![i]);
    let j = b.import_equals("J", ModifierFlags::empty(), "M");
    let k = b.import_equals("K", ModifierFlags::empty(), "M.I");
    let ji = b.type_ref("J.I");
    let v = b.var("v", ModifierFlags::empty(), ji);
    let k_ref = b.type_ref("K");
    let w = b.var("w", ModifierFlags::empty(), k_ref);
    let root = b.source_file(vec![module, j, k, v, w]);
    let mut session = bind(b, root);

    let m = global(&session, "M");
    let i = session.find_symbol("M.I", Meaning::Type).unwrap();
    let j = global(&session, "J");
    let v = global(&session, "v");
    let w = global(&session, "w");
    assert!(!session.symbols().get(j).unwrap().is_resolved());

    assert_eq!(resolved_type(&mut session, v), i);
    assert_eq!(resolved_type(&mut session, w), i);
    assert_eq!(
        session.symbols().get(j).unwrap().first_target(SymbolLinkKind::TypedAs),
        Some(m)
    );
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_require_import_targets_dynamic_module() {
    let mut b = TreeBuilder::new("a.ts");
    let stats = b.interface("Stats", ModifierFlags::EXPORT, vec![], vec![]);
    let module = b.dynamic_module("fs", vec![stats]);
    let import = b.import_require("nodeFs", "fs");
    let stats_ref = b.type_ref("nodeFs.Stats");
    let s = b.var("s", ModifierFlags::empty(), stats_ref);
    let root = b.source_file(vec![module, import, s]);
    let mut session = bind(b, root);

    let fs = global(&session, "fs");
    assert_eq!(session.symbols().kind(fs), Some(SymbolKind::DynamicModule));
    let alias = global(&session, "nodeFs");
    let target = session.resolver().alias_target(alias).unwrap();
    assert_eq!(target, fs);

    let s = global(&session, "s");
    let stats = child(&session, fs, "Stats");
    assert_eq!(resolved_type(&mut session, s), stats);
}

#[test]
fn test_unresolved_alias_reports_namespace() {
    let mut b = TreeBuilder::new("a.ts");
    let q = b.import_equals("Q", ModifierFlags::empty(), "Nope.Thing");
    let r = b.import_require("R", "missing-module");
    let root = b.source_file(vec![q, r]);
    let mut session = bind(b, root);

    let q = global(&session, "Q");
    let r = global(&session, "R");
    let error = session.well_known().error;
    assert_eq!(session.resolver().alias_target(q).unwrap(), error);
    assert_eq!(session.resolver().alias_target(r).unwrap(), error);
    assert_eq!(count_code(&session, diagnostic_codes::CANNOT_FIND_NAMESPACE), 1);
    assert_eq!(count_code(&session, diagnostic_codes::CANNOT_FIND_NAME), 1);
}

#[test]
fn test_lookup_context_is_searched_first() {
    let mut b = TreeBuilder::new("a.ts");
    let num = b.number_type();
    let x = b.property_signature("x", ModifierFlags::empty(), num);
    let iface = b.interface("I", ModifierFlags::empty(), vec![], vec![x]);
    let any = b.any_type();
    let global_x = b.var("x", ModifierFlags::empty(), any);
    let root = b.source_file(vec![iface, global_x]);
    let mut session = bind(b, root);

    let i = global(&session, "I");
    let member_x = session.symbols().get_members(i)[0];
    let global_x = global(&session, "x");

    let mut resolver = session.resolver();
    let in_context = resolver
        .find_symbol_for_path_in_context(&["x"], &[i], None, Meaning::Any)
        .unwrap();
    let without = resolver.find_symbol_for_path(&["x"], None, Meaning::Any).unwrap();
    assert_eq!(in_context, Some(member_x));
    assert_eq!(without, Some(global_x));
    assert_eq!(resolver.find_symbol_for_path(&["nope"], None, Meaning::Any).unwrap(), None);
}

#[test]
fn test_resolve_type_reference_by_node() {
    let mut b = TreeBuilder::new("a.ts");
    let t = b.interface("T", ModifierFlags::empty(), vec![], vec![]);
    let t_ref = b.type_ref("T");
    let arr = b.array_type(t_ref);
    let v = b.var("v", ModifierFlags::empty(), arr);
    let root = b.source_file(vec![t, v]);
    let mut session = bind(b, root);

    let unit = session.chain().get_unit("a.ts").unwrap().unit;
    let t = global(&session, "T");
    let direct = session.resolver().resolve_type_reference(unit, t_ref, None).unwrap();
    assert_eq!(direct, t);
    let first = session.resolver().resolve_type_reference(unit, arr, None).unwrap();
    let second = session.resolver().resolve_type_reference(unit, arr, None).unwrap();
    assert_eq!(first, second);
}
