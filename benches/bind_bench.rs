//! Binding and resolution benchmarks.
//!
//! Builds a synthetic multi-unit program and measures collect+bind,
//! full resolution, and rebinding one edited unit.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use tsb::{ModifierFlags, NodeArena, NodeIndex, Session, SymbolId, TreeBuilder};

/// One unit: `module M<i> { export interface I<j> {..} export class C<j> extends .. {..} var v<j>: I<j>[] }`
fn build_unit(index: usize, decls_per_unit: usize, salt: &str) -> (String, Arc<NodeArena>, NodeIndex) {
    let path = format!("unit{index}.ts");
    let mut b = TreeBuilder::new(&path);
    let mut body = Vec::new();
    for j in 0..decls_per_unit {
        let num = b.number_type();
        let field = b.property_signature(&format!("f{salt}"), ModifierFlags::empty(), num);
        let str_ty = b.string_type();
        let p = b.param("p", str_ty);
        let void = b.void_type();
        let method = b.method_signature("m", ModifierFlags::empty(), vec![p], void);
        let iface = b.interface(&format!("I{j}"), ModifierFlags::EXPORT, vec![], vec![field, method]);

        let extends = if j > 0 {
            vec![b.type_ref(&format!("C{}", j - 1))]
        } else if index > 0 {
            vec![b.type_ref(&format!("M{}.C0", index - 1))]
        } else {
            Vec::new()
        };
        let implements = vec![b.type_ref(&format!("I{j}"))];
        let num = b.number_type();
        let prop = b.property(&format!("f{salt}"), ModifierFlags::empty(), num);
        let str_ty = b.string_type();
        let p = b.param("p", str_ty);
        let method = b.method("m", ModifierFlags::empty(), vec![p], NodeIndex::NONE, Some(vec![]));
        let class = b.class(
            &format!("C{j}"),
            ModifierFlags::EXPORT,
            extends,
            implements,
            vec![prop, method],
        );

        let i_ref = b.type_ref(&format!("I{j}"));
        let arr = b.array_type(i_ref);
        let var = b.var(&format!("v{j}"), ModifierFlags::empty(), arr);
        body.extend([iface, class, var]);
    }
    let module = b.module(&format!("M{index}"), ModifierFlags::empty(), body);
    let root = b.source_file(vec![module]);
    let (arena, root) = b.finish(root);
    (path, arena, root)
}

fn build_program(units: usize, decls_per_unit: usize) -> Vec<(String, Arc<NodeArena>, NodeIndex)> {
    (0..units)
        .map(|i| build_unit(i, decls_per_unit, ""))
        .collect()
}

fn bind_program(program: &[(String, Arc<NodeArena>, NodeIndex)]) -> Session {
    let mut session = Session::new();
    for (path, arena, root) in program {
        session
            .add_unit(path, Arc::clone(arena), *root)
            .expect("bind unit");
    }
    session
}

fn resolve_all(session: &mut Session) -> usize {
    let ids: Vec<SymbolId> = session.symbols().iter().map(|sym| sym.id).collect();
    let mut resolver = session.resolver();
    for id in ids {
        resolver.resolve_symbol(id).expect("resolve symbol");
    }
    session.symbols().len()
}

const SIZES: [(usize, usize); 3] = [(4, 8), (16, 16), (64, 16)];

fn bench_collect_and_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");
    for (units, decls) in SIZES {
        let program = build_program(units, decls);
        let name = format!("{units}x{decls}");
        group.bench_with_input(BenchmarkId::new("collect_bind", &name), &program, |b, program| {
            b.iter(|| black_box(bind_program(program).symbols().len()))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for (units, decls) in SIZES {
        let program = build_program(units, decls);
        let name = format!("{units}x{decls}");
        group.bench_with_input(BenchmarkId::new("bind_resolve_all", &name), &program, |b, program| {
            b.iter(|| {
                let mut session = bind_program(program);
                black_box(resolve_all(&mut session))
            })
        });
    }
    group.finish();
}

fn bench_incremental_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental");
    for (units, decls) in SIZES {
        let program = build_program(units, decls);
        let mut session = bind_program(&program);
        resolve_all(&mut session);
        let edits = [build_unit(0, decls, "a"), build_unit(0, decls, "b")];
        let name = format!("{units}x{decls}");
        let mut turn = 0usize;
        group.bench_function(BenchmarkId::new("update_first_unit", &name), |b| {
            b.iter(|| {
                let (path, arena, root) = &edits[turn % 2];
                turn += 1;
                session
                    .update_unit(path, Arc::clone(arena), *root)
                    .expect("update unit");
                black_box(resolve_all(&mut session))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_collect_and_bind,
    bench_resolve,
    bench_incremental_update
);
criterion_main!(benches);
