mod common;

use common::{assert_same_language, random_lassos, random_ltl, rng};
use hyltl::prelude::*;

fn simplifier(store: &FormulaStore) -> Simplifier {
    Simplifier::new(store.clone(), SimplifierOptions::default())
}

#[test]
fn negated_until_becomes_release() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let mut s = simplifier(&store);

    let f = store.not(store.u(a.clone(), b.clone()));
    let nnf = s.negative_normal_form(&f, false).unwrap();
    assert_eq!(nnf, store.r(store.not(a.clone()), store.not(b.clone())));
    assert!(nnf.is_in_nenoform());

    // Asking for the negation of the positive formula gives the same node.
    let direct = s.negative_normal_form(&store.u(a, b), true).unwrap();
    assert_eq!(direct, nnf);
}

#[test]
fn dual_operators() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let (na, nb) = (store.not(a.clone()), store.not(b.clone()));
    let mut s = simplifier(&store);

    let cases = [
        (store.f(a.clone()), store.g(na.clone())),
        (store.g(a.clone()), store.f(na.clone())),
        (store.x(a.clone()), store.x(na.clone())),
        (store.w(a.clone(), b.clone()), store.m(na.clone(), nb.clone())),
        (store.m(a.clone(), b.clone()), store.w(na.clone(), nb.clone())),
        (store.r(a.clone(), b.clone()), store.u(na.clone(), nb.clone())),
        (
            store.and([a.clone(), store.g(b.clone())]).unwrap(),
            store.or([na.clone(), store.f(nb.clone())]).unwrap(),
        ),
        (
            store.implies(a.clone(), store.g(b.clone())),
            store.and([a.clone(), store.f(nb.clone())]).unwrap(),
        ),
    ];
    for (f, expected) in cases {
        assert_eq!(s.negative_normal_form(&f, true).unwrap(), expected, "!({f})");
    }

    let implies = store.implies(a.clone(), store.g(b.clone()));
    assert_eq!(
        s.negative_normal_form(&implies, false).unwrap(),
        store.or([na, store.g(b)]).unwrap()
    );
}

#[test]
fn equivalence_and_xor_are_expanded() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let (fa, gb) = (store.f(a.clone()), store.g(b.clone()));
    let mut s = simplifier(&store);

    let equiv = store.equiv(fa.clone(), gb.clone());
    let expected = store
        .or([
            store.and([fa.clone(), gb.clone()]).unwrap(),
            store
                .and([store.g(store.not(a.clone())), store.f(store.not(b.clone()))])
                .unwrap(),
        ])
        .unwrap();
    assert_eq!(s.negative_normal_form(&equiv, false).unwrap(), expected);

    let xor = store.xor(fa.clone(), gb.clone());
    assert_eq!(s.negative_normal_form(&xor, true).unwrap(), expected);
}

#[test]
fn sere_operands_keep_their_polarity() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let r = store.concat([a.clone(), b.clone()]).unwrap();
    let mut s = simplifier(&store);

    let closure = store.closure(r.clone());
    assert_eq!(
        s.negative_normal_form(&closure, true).unwrap(),
        store.neg_closure(r.clone())
    );
    assert_eq!(
        s.negative_normal_form(&store.neg_closure(r.clone()), true).unwrap(),
        closure
    );

    let e = store.econcat(r.clone(), store.g(a.clone()));
    assert_eq!(
        s.negative_normal_form(&e, true).unwrap(),
        store.uconcat(r.clone(), store.f(store.not(a.clone())))
    );
    let u = store.uconcat(r.clone(), store.x(b.clone()));
    assert_eq!(
        s.negative_normal_form(&u, true).unwrap(),
        store.econcat(r, store.x(store.not(b)))
    );
}

#[test]
fn stop_on_boolean_leaves_boolean_subformulas() {
    let store = FormulaStore::new();
    let (a, b) = (store.ap("a"), store.ap("b"));
    let xor = store.xor(a.clone(), b.clone());
    let f = store.g(xor.clone());

    let options = SimplifierOptions::default().with_nenoform_stop_on_boolean(true);
    let mut s = Simplifier::new(store.clone(), options);
    assert_eq!(s.negative_normal_form(&f, false).unwrap(), f);
    assert_eq!(
        s.negative_normal_form(&f, true).unwrap(),
        store.f(store.not(xor.clone()))
    );

    let mut full = simplifier(&store);
    assert!(full.negative_normal_form(&f, false).unwrap().is_in_nenoform());
}

#[test]
fn random_formulas_keep_their_language() {
    let store = FormulaStore::new();
    let mut rng = rng();
    let lassos = random_lassos(&mut rng, 24);
    let mut s = simplifier(&store);

    for _ in 0..200 {
        let f = random_ltl(&store, &mut rng, 5);
        let positive = s.negative_normal_form(&f, false).unwrap();
        let negative = s.negative_normal_form(&f, true).unwrap();
        assert!(positive.is_in_nenoform(), "{positive} is not in NNF");
        assert!(negative.is_in_nenoform(), "{negative} is not in NNF");
        assert_same_language(&f, &positive, &lassos);
        assert_same_language(&store.not(f.clone()), &negative, &lassos);

        // Already normalized formulas are left alone.
        assert_eq!(s.negative_normal_form(&positive, false).unwrap(), positive);
        let back = s.negative_normal_form(&negative, true).unwrap();
        assert_same_language(&f, &back, &lassos);
    }
}
