use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hebnorm::{
    in_list, leaf, Args, Context, CostTable, Engine, Evaluator, ListRegistry, Node, Registry,
    RuleSet, RuleSetBuilder,
};

/// A predicate that burns `rounds` iterations before answering.
fn slow(rounds: u64, answer: bool) -> impl Fn(&Context, &Args) -> Result<bool, hebnorm::ArgError> {
    move |_: &Context, _: &Args| {
        let mut acc = 0_u64;
        for i in 0..rounds {
            acc = black_box(acc.wrapping_add(i));
        }
        black_box(acc);
        Ok(answer)
    }
}

fn registry() -> Registry {
    Registry::with_builtins()
        .predicate("heavy", slow(10_000, true))
        .predicate("medium", slow(500, true))
        .predicate("cheap", slow(1, false))
}

/// `heavy` and `medium` are authored first; only `cheap` decides.
fn tree() -> Node {
    Node::all([leaf("heavy"), leaf("medium"), leaf("cheap")])
}

fn bench_ordering(c: &mut Criterion) {
    let registry = registry();
    let node = tree();
    let ctx = Context::new("x");
    let mut group = c.benchmark_group("all_three_leaves");

    let uniform = CostTable::new();
    group.bench_function("authored_order", |b| {
        let ev = Evaluator::new(&uniform, &registry);
        b.iter(|| ev.evaluate(black_box(&node), &ctx));
    });

    let costed = CostTable::from_pairs([("heavy", 100.0), ("medium", 10.0), ("cheap", 1.0)]).unwrap();
    group.bench_function("cost_ordered", |b| {
        let ev = Evaluator::new(&costed, &registry);
        b.iter(|| ev.evaluate(black_box(&node), &ctx));
    });

    group.finish();
}

fn build_rules(n: usize) -> RuleSet {
    let mut builder = RuleSetBuilder::new()
        .cost("in_list", 5.0)
        .cost("heavy", 100.0);
    for i in 0..n {
        let list = format!("L{}", i % 4);
        builder = builder.rule(&format!("r{i}"), move |r| {
            r.when(Node::all([leaf("heavy"), in_list(&list)]))
                .then("add_after", Args::new().with("letter", "ו"))
        });
    }
    builder.compile().unwrap()
}

fn bench_sentence(c: &mut Criterion) {
    let mut lists = ListRegistry::new();
    for i in 0..4 {
        lists.extend(&format!("L{i}"), [format!("w{i}")]);
    }
    let sentence = "w0 x y w1 z w2 q r w3 s";
    let mut group = c.benchmark_group("sentence_run");

    for &n in &[5, 20, 50] {
        let engine = Engine::new(build_rules(n), registry()).with_lists(lists.clone());
        group.bench_function(format!("{n}_rules"), |b| {
            b.iter(|| engine.run(black_box(sentence)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ordering, bench_sentence);
criterion_main!(benches);
