use hyltl::prelude::*;

fn main() {
    let store = FormulaStore::new();
    let (req, ack) = (store.ap("req"), store.ap("ack"));

    // G(req -> F ack) & G(req -> X F ack) & X req & X ack
    let response = store.g(store.implies(req.clone(), store.f(ack.clone())));
    let delayed = store.g(store.implies(req.clone(), store.x(store.f(ack.clone()))));
    let expr = store
        .and([response, delayed, store.x(req), store.x(ack)])
        .unwrap();
    expr.pretty_print().unwrap();

    let mut simplifier = Simplifier::new(store.clone(), SimplifierOptions::default());
    let simplified = simplifier.simplify(&expr).unwrap();
    simplified.pretty_print().unwrap();
    println!();
}
