mod common;

use common::{assert_same_language, random_lassos, random_ltl, rng};
use hyltl::prelude::*;

fn simplify_with(store: &FormulaStore, options: SimplifierOptions, f: &Formula) -> Formula {
    Simplifier::new(store.clone(), options).simplify(f).unwrap()
}

fn simplify(store: &FormulaStore, f: &Formula) -> Formula {
    simplify_with(store, SimplifierOptions::default(), f)
}

#[test]
fn duplicated_operands_collapse() {
    let store = FormulaStore::new();
    let p = store.ap("p");
    let gfp = store.g(store.f(p));
    let f = store.and([gfp.clone(), gfp.clone()]).unwrap();
    assert_eq!(simplify(&store, &f), gfp);
}

#[test]
fn unrelated_operands_are_kept() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let f = store.or([store.f(a.clone()), store.g(b.clone())]).unwrap();
    let options = SimplifierOptions::none()
        .with_reduce_basics(true)
        .with_synt_impl(true);
    assert_eq!(simplify_with(&store, options, &f), f);
    assert_eq!(simplify(&store, &f), f);

    // a U a is already folded by the store.
    assert_eq!(simplify(&store, &store.u(a.clone(), a.clone())), a);
}

#[test]
fn next_operands_are_merged() {
    let store = FormulaStore::new();
    let (a, b, c) = (store.ap("a"), store.ap("b"), store.ap("c"));
    let f = store
        .and([store.x(a.clone()), store.x(b.clone()), store.g(c.clone())])
        .unwrap();
    let expected = store
        .and([store.x(store.and([a.clone(), b.clone()]).unwrap()), store.g(c.clone())])
        .unwrap();
    assert_eq!(simplify(&store, &f), expected);

    let f = store.or([store.x(a.clone()), store.x(b.clone())]).unwrap();
    assert_eq!(
        simplify(&store, &f),
        store.x(store.or([a.clone(), b.clone()]).unwrap())
    );

    // X a U X b = X(a U b)
    let f = store.u(store.x(a.clone()), store.x(b.clone()));
    assert_eq!(simplify(&store, &f), store.x(store.u(a, b)));
}

#[test]
fn basic_identities() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let (t, f) = (store.tt(), store.ff());
    let basics = SimplifierOptions::none().with_reduce_basics(true);

    let cases = [
        (store.u(t.clone(), b.clone()), store.f(b.clone())),
        (store.r(f.clone(), b.clone()), store.g(b.clone())),
        (store.w(a.clone(), f.clone()), store.g(a.clone())),
        (store.m(a.clone(), t.clone()), store.f(a.clone())),
        (store.f(store.u(a.clone(), b.clone())), store.f(b.clone())),
        (store.g(store.r(a.clone(), b.clone())), store.g(b.clone())),
        (
            store.f(store.m(a.clone(), b.clone())),
            store.f(store.and([a.clone(), b.clone()]).unwrap()),
        ),
        (
            store.g(store.w(a.clone(), b.clone())),
            store.g(store.or([a.clone(), b.clone()]).unwrap()),
        ),
        (store.f(store.x(a.clone())), store.x(store.f(a.clone()))),
        (store.g(store.x(a.clone())), store.x(store.g(a.clone()))),
        (
            store.u(a.clone(), store.u(a.clone(), b.clone())),
            store.u(a.clone(), b.clone()),
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(simplify_with(&store, basics, &input), expected, "{input}");
    }
}

#[test]
fn operand_merging_with_shared_anchor() {
    let store = FormulaStore::new();
    let (a, b, c, d) = (store.ap("a"), store.ap("b"), store.ap("c"), store.ap("d"));
    let basics = SimplifierOptions::none().with_reduce_basics(true);

    // (a U c) & (b U c) & (d W c) = (a & b & d) U c
    let f = store
        .and([
            store.u(a.clone(), c.clone()),
            store.u(b.clone(), c.clone()),
            store.w(d.clone(), c.clone()),
        ])
        .unwrap();
    let merged = simplify_with(&store, basics, &f);
    assert!(merged.is(Op::U));
    assert_eq!(merged.nth(0), &store.and([a.clone(), b.clone(), d.clone()]).unwrap());
    assert_eq!(merged.nth(1), &c);

    // (a U b) | (a W c) | (a U d) = a W (b | c | d)
    let f = store
        .or([
            store.u(a.clone(), b.clone()),
            store.w(a.clone(), c.clone()),
            store.u(a.clone(), d.clone()),
        ])
        .unwrap();
    let merged = simplify_with(&store, basics, &f);
    assert!(merged.is(Op::W));
    assert_eq!(merged.nth(0), &a);
    assert_eq!(merged.nth(1), &store.or([b.clone(), c.clone(), d.clone()]).unwrap());

    // (a R b) & (a M c) & (a R d) = a M (b & c & d)
    let f = store
        .and([
            store.r(a.clone(), b.clone()),
            store.m(a.clone(), c.clone()),
            store.r(a.clone(), d.clone()),
        ])
        .unwrap();
    assert_eq!(
        simplify_with(&store, basics, &f),
        store.m(a.clone(), store.and([b.clone(), c.clone(), d.clone()]).unwrap())
    );
}

#[test]
fn merged_operand_folding_away_frees_its_anchor() {
    let store = FormulaStore::new();
    let (a, b, d) = (store.ap("a"), store.ap("b"), store.ap("d"));
    let ab = store.and([a.clone(), b.clone()]).unwrap();
    let basics = SimplifierOptions::none().with_reduce_basics(true);

    // Operands are visited in creation order. (a U ab) & (b U ab) gives
    // (a & b) U ab, which the store folds to ab; d U ab then starts anew.
    let first = store.u(a.clone(), ab.clone());
    let second = store.u(b.clone(), ab.clone());
    let third = store.u(d.clone(), ab.clone());
    let f = store.and([first, second, third.clone()]).unwrap();
    assert_eq!(f.len(), 3);

    let merged = simplify_with(&store, basics, &f);
    assert_eq!(merged, store.and([a.clone(), b.clone(), third.clone()]).unwrap());
    assert_eq!(merged.len(), 3);
    assert!(merged.children().contains(&third));
}

#[test]
#[should_panic(expected = "was not built by the simplifier's store")]
fn simplifying_a_foreign_formula_panics() {
    let store = FormulaStore::new();
    let other = FormulaStore::new();
    let f = other.g(other.ap("a"));
    let _ = Simplifier::new(store, SimplifierOptions::default()).simplify(&f);
}

#[test]
fn operand_merging() {
    let store = FormulaStore::new();
    let (a, b, c) = (store.ap("a"), store.ap("b"), store.ap("c"));
    let basics = SimplifierOptions::none().with_reduce_basics(true);

    let cases = [
        (
            store.and([store.g(a.clone()), store.g(b.clone())]).unwrap(),
            store.g(store.and([a.clone(), b.clone()]).unwrap()),
        ),
        (
            store.or([store.f(a.clone()), store.f(b.clone())]).unwrap(),
            store.f(store.or([a.clone(), b.clone()]).unwrap()),
        ),
        (
            store
                .and([store.f(store.g(a.clone())), store.f(store.g(b.clone()))])
                .unwrap(),
            store.f(store.g(store.and([a.clone(), b.clone()]).unwrap())),
        ),
        (
            store
                .or([store.g(store.f(a.clone())), store.g(store.f(b.clone()))])
                .unwrap(),
            store.g(store.f(store.or([a.clone(), b.clone()]).unwrap())),
        ),
        // (a U c) & (b W c) = (a & b) U c
        (
            store
                .and([store.u(a.clone(), c.clone()), store.w(b.clone(), c.clone())])
                .unwrap(),
            store.u(store.and([a.clone(), b.clone()]).unwrap(), c.clone()),
        ),
        // (a R b) & (a M c) = a M (b & c)
        (
            store
                .and([store.r(a.clone(), b.clone()), store.m(a.clone(), c.clone())])
                .unwrap(),
            store.m(a.clone(), store.and([b.clone(), c.clone()]).unwrap()),
        ),
        // (a U b) | (a W c) = a W (b | c)
        (
            store
                .or([store.u(a.clone(), b.clone()), store.w(a.clone(), c.clone())])
                .unwrap(),
            store.w(a.clone(), store.or([b.clone(), c.clone()]).unwrap()),
        ),
        // (a R c) | (b M c) = (a | b) R c
        (
            store
                .or([store.r(a.clone(), c.clone()), store.m(b.clone(), c.clone())])
                .unwrap(),
            store.r(store.or([a.clone(), b.clone()]).unwrap(), c.clone()),
        ),
        // F b & (a W b) = a U b
        (
            store
                .and([store.f(b.clone()), store.w(a.clone(), b.clone())])
                .unwrap(),
            store.u(a.clone(), b.clone()),
        ),
        // G a | (a U b) = a W b
        (
            store
                .or([store.g(a.clone()), store.u(a.clone(), b.clone())])
                .unwrap(),
            store.w(a.clone(), b.clone()),
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(simplify_with(&store, basics, &input), expected, "{input}");
    }
}

#[test]
fn eventual_and_universal_absorption() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let (fa, gb) = (store.f(a.clone()), store.g(b.clone()));
    let gfa = store.g(fa.clone());
    let eu = SimplifierOptions::none().with_event_univ(true);

    assert_eq!(simplify_with(&store, eu, &store.u(b.clone(), fa.clone())), fa);
    assert_eq!(simplify_with(&store, eu, &store.r(a.clone(), gb.clone())), gb);
    assert_eq!(simplify_with(&store, eu, &store.x(gfa.clone())), gfa);
    assert_eq!(
        simplify_with(&store, eu, &store.m(fa.clone(), b.clone())),
        store.and([fa.clone(), b.clone()]).unwrap()
    );
    assert_eq!(
        simplify_with(&store, eu, &store.w(gb.clone(), a.clone())),
        store.or([gb.clone(), a.clone()]).unwrap()
    );
    assert_eq!(simplify_with(&store, eu, &store.f(store.u(a.clone(), fa.clone()))), fa);

    // F(b & GF a) = F b & GF a
    let both = SimplifierOptions::none()
        .with_event_univ(true)
        .with_reduce_basics(true);
    let f = store.f(store.and([b.clone(), gfa.clone()]).unwrap());
    assert_eq!(
        simplify_with(&store, both, &f),
        store.and([store.f(b.clone()), gfa.clone()]).unwrap()
    );
}

#[test]
fn implication_based_rules() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let (na, nb) = (store.not(a.clone()), store.not(b.clone()));
    let impl_only = SimplifierOptions::none().with_synt_impl(true);
    let ab = store.or([a.clone(), b.clone()]).unwrap();

    let cases = [
        // a ⇒ (a | b): a U (a | b) = a | b
        (store.u(a.clone(), ab.clone()), ab.clone()),
        // !b ⇒ !b: !b U b = F b
        (store.u(nb.clone(), b.clone()), store.f(b.clone())),
        // !b W b = 1
        (store.w(nb.clone(), b.clone()), store.tt()),
        // b ⇒ !!b: !b M b = 0
        (store.m(nb.clone(), b.clone()), store.ff()),
        // (a & b) ⇒ a: a R (a & b) = a & b
        (
            store.r(a.clone(), store.and([a.clone(), b.clone()]).unwrap()),
            store.and([a.clone(), b.clone()]).unwrap(),
        ),
        // b ⇒ !(!b): !b R b = G b
        (store.r(nb.clone(), b.clone()), store.g(b.clone())),
        // Pruning
        (
            store.and([a.clone(), store.g(a.clone())]).unwrap(),
            store.g(a.clone()),
        ),
        (
            store.or([a.clone(), store.f(a.clone())]).unwrap(),
            store.f(a.clone()),
        ),
        (
            store.and([a.clone(), ab.clone()]).unwrap(),
            a.clone(),
        ),
        // Contradictions and tautologies
        (
            store.and([store.g(a.clone()), store.f(na.clone())]).unwrap(),
            store.ff(),
        ),
        (
            store.or([store.g(a.clone()), store.f(na.clone())]).unwrap(),
            store.tt(),
        ),
        (store.and([a.clone(), na.clone()]).unwrap(), store.ff()),
    ];
    for (input, expected) in cases {
        assert_eq!(simplify_with(&store, impl_only, &input), expected, "{input}");
    }
}

#[test]
fn disabled_rules_only_normalize() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let none = SimplifierOptions::none();

    let f = store.u(store.tt(), b.clone());
    assert_eq!(simplify_with(&store, none, &f), f);

    let g = store.not(store.u(a.clone(), b.clone()));
    assert_eq!(
        simplify_with(&store, none, &g),
        store.r(store.not(a), store.not(b))
    );
}

#[test]
fn containment_stronger_uses_the_oracle() {
    struct SameLanguage(Formula, Formula);
    impl ContainmentOracle for SameLanguage {
        fn contained(&self, f: &Formula, g: &Formula) -> bool {
            (f == &self.0 && g == &self.1) || (f == &self.1 && g == &self.0) || f == g
        }
    }

    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let fb = store.f(b.clone());
    let until = store.u(store.g(a.clone()), fb.clone());

    let options = SimplifierOptions::none().with_containment_checks_stronger(true);
    let mut s = Simplifier::new(store.clone(), options)
        .with_containment_oracle(SameLanguage(until.clone(), fb.clone()));
    assert_eq!(s.simplify(&until).unwrap(), fb);

    // Without the oracle the option is ignored.
    let mut plain = Simplifier::new(store.clone(), options);
    assert_eq!(plain.simplify(&until).unwrap(), until);
}

#[test]
fn cache_can_be_cleared() {
    let store = FormulaStore::new();
    let a = store.ap("a");
    let mut s = Simplifier::new(store.clone(), SimplifierOptions::default());
    let f = store.f(store.u(a.clone(), store.f(a.clone())));
    let first = s.simplify(&f).unwrap();
    s.clear_cache();
    assert_eq!(s.simplify(&f).unwrap(), first);
    assert_eq!(s.options(), &SimplifierOptions::default());

    drop((first, f, a));
    s.clear_cache();
    assert_eq!(store.live_nodes(), 3);
}

fn configurations() -> Vec<SimplifierOptions> {
    vec![
        SimplifierOptions::none(),
        SimplifierOptions::none().with_reduce_basics(true),
        SimplifierOptions::none().with_synt_impl(true),
        SimplifierOptions::none().with_event_univ(true),
        SimplifierOptions::default(),
        SimplifierOptions::default().with_nenoform_stop_on_boolean(true),
    ]
}

#[test]
fn random_formulas_are_simplified_soundly() {
    let store = FormulaStore::new();
    let mut rng = rng();
    let lassos = random_lassos(&mut rng, 24);
    let formulas: Vec<Formula> = (0..150).map(|_| random_ltl(&store, &mut rng, 5)).collect();

    for options in configurations() {
        let mut s = Simplifier::new(store.clone(), options);
        for f in &formulas {
            let simplified = s.simplify(f).unwrap();
            assert_same_language(f, &simplified, &lassos);
            // Idempotent, by node identity
            assert_eq!(s.simplify(&simplified).unwrap(), simplified, "{f} with {options:?}");
        }
    }
}

#[test]
fn basic_rules_never_grow_formulas() {
    let store = FormulaStore::new();
    let mut rng = rng();
    let basics = SimplifierOptions::none().with_reduce_basics(true);
    let mut s = Simplifier::new(store.clone(), basics);

    for _ in 0..150 {
        let f = random_ltl(&store, &mut rng, 5);
        let nnf = s.negative_normal_form(&f, false).unwrap();
        let simplified = s.simplify(&nnf).unwrap();
        assert!(
            simplified.size() <= nnf.size(),
            "{nnf} grew into {simplified}"
        );
    }
}
