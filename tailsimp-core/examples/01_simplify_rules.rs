//! # Interpreted Tail Simplification Example
//!
//! This example runs the simplifier over a small rule set. It covers:
//! - Dropping rules whose constraints are unsatisfiable
//! - Eliminating variables bound by equalities
//! - Collapsing xor/iff encodings into equalities
//! - Leaving already simplified rules untouched
//!
//! Set `RUST_LOG=tailsimp_core=debug` to see each rule rewrite.

use std::sync::Arc;
use tailsimp_core::datalog::{InterpTailSimplifier, Literal, RuleContext, RuleSet};
use tailsimp_core::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    println!("=== Tailsimp: Interpreted Tail Simplification ===\n");

    let mut ctx = RuleContext::new();
    ctx.declare_relation("edge");
    ctx.declare_relation("path");
    ctx.declare_relation("flag");

    let int = ctx.tm.sorts.int_sort;
    let bool_sort = ctx.tm.sorts.bool_sort;
    let x = ctx.tm.mk_var(0, int);
    let y = ctx.tm.mk_var(1, int);
    let one = ctx.tm.mk_int(1);
    let two = ctx.tm.mk_int(2);
    let three = ctx.tm.mk_int(3);

    // path(x) :- edge(x, y), x = 1, x = 2.
    let head = ctx.mk_atom("path", &[x]);
    let body = ctx.mk_atom("edge", &[x, y]);
    let eq1 = ctx.tm.mk_eq(x, one);
    let eq2 = ctx.tm.mk_eq(x, two);
    let infeasible = ctx.mk_rule(
        head,
        vec![Literal::positive(body), Literal::positive(eq1), Literal::positive(eq2)],
    )?;

    // path(x) :- edge(x, y), y = x.
    let eq_xy = ctx.tm.mk_eq(y, x);
    let self_loop = ctx.mk_rule(head, vec![Literal::positive(body), Literal::positive(eq_xy)])?;

    // flag(x) :- edge(x, y), (p or q), (not p or not q).
    let p = ctx.tm.mk_apply("p", [], bool_sort);
    let q = ctx.tm.mk_apply("q", [], bool_sort);
    let np = ctx.tm.mk_not(p);
    let nq = ctx.tm.mk_not(q);
    let c1 = ctx.tm.mk_or([p, q]);
    let c2 = ctx.tm.mk_or([np, nq]);
    let flag_head = ctx.mk_atom("flag", &[x]);
    let xor = ctx.mk_rule(
        flag_head,
        vec![Literal::positive(body), Literal::positive(c1), Literal::positive(c2)],
    )?;

    // path(x) :- edge(x, y), x <= 3.
    let le = ctx.tm.mk_le(x, three);
    let bounded = ctx.mk_rule(head, vec![Literal::positive(body), Literal::positive(le)])?;

    let rules = RuleSet::from_iter([infeasible, self_loop, xor, Arc::clone(&bounded)]);
    println!("--- Input ---");
    print!("{}", rules.display(&ctx.tm));

    let mut simplifier = InterpTailSimplifier::new();
    let output = simplifier.run(&mut ctx, &rules)?.unwrap_or_else(|| rules.clone());

    println!("\n--- Output ---");
    print!("{}", output.display(&ctx.tm));
    println!(
        "\nThe bounded rule was kept as the same object: {}",
        output.contains(&bounded)
    );

    let stats = simplifier.interp_stats();
    println!("\n--- Statistics ---");
    println!("Rules processed: {}", stats.rules_processed);
    println!("Rules dropped:   {}", stats.rules_dropped);
    println!("Rules modified:  {}", stats.rules_modified);
    println!("Propagations:    {}", stats.propagations);
    println!(
        "Equivalences collapsed: {}",
        simplifier.normalizer_stats().equivalences_collapsed
    );

    Ok(())
}
