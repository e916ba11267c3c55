//! State-threading laws, spec §8 laws 12-13. These depend on the executor
//! (not just the pure algebra), so they live here as ordinary `#[test]`s
//! rather than as `arrowline-algebra` property tests.

use arrowline_exec::sequential::{
    cons_function_component, cons_parallel_component, exec_pipeline,
};

#[test]
fn law12_a_three_stage_chain_execs_to_the_mutators_composed_in_order() {
    let c1 = cons_function_component(|a: i32, _s: &Vec<i32>| a)
        .state_mutator(|mut s: Vec<i32>| {
            s.push(1);
            s
        })
        .build();
    let c2 = cons_function_component(|a: i32, _s: &Vec<i32>| a)
        .state_mutator(|mut s: Vec<i32>| {
            s.push(2);
            s
        })
        .build();
    let c3 = cons_function_component(|a: i32, _s: &Vec<i32>| a)
        .state_mutator(|mut s: Vec<i32>| {
            s.push(3);
            s
        })
        .build();

    let chain = c1.then(c2).then(c3);
    let state = exec_pipeline(&chain, 0, Vec::new());

    fn m1(mut s: Vec<i32>) -> Vec<i32> {
        s.push(1);
        s
    }
    fn m2(mut s: Vec<i32>) -> Vec<i32> {
        s.push(2);
        s
    }
    fn m3(mut s: Vec<i32>) -> Vec<i32> {
        s.push(3);
        s
    }
    assert_eq!(state, m3(m2(m1(Vec::new()))));
}

#[test]
fn law13_a_product_execs_to_left_mutator_then_right_mutator() {
    let left = cons_function_component(|a: i32, _s: &Vec<&str>| a)
        .state_mutator(|mut s: Vec<&str>| {
            s.push("left");
            s
        })
        .build();
    let right = cons_function_component(|a: i32, _s: &Vec<&str>| a)
        .state_mutator(|mut s: Vec<&str>| {
            s.push("right");
            s
        })
        .build();

    let product = cons_parallel_component(left, right);
    let state = exec_pipeline(&product, (1, 2), Vec::new());
    assert_eq!(state, vec!["left", "right"]);
}

#[test]
fn law13_fanout_execs_in_the_same_left_then_right_order() {
    let left = cons_function_component(|a: i32, _s: &Vec<&str>| a)
        .state_mutator(|mut s: Vec<&str>| {
            s.push("left");
            s
        })
        .build();
    let right = cons_function_component(|a: i32, _s: &Vec<&str>| a)
        .state_mutator(|mut s: Vec<&str>| {
            s.push("right");
            s
        })
        .build();

    let fanned = left.fanout(right);
    let state = exec_pipeline(&fanned, 7, Vec::new());
    assert_eq!(state, vec!["left", "right"]);
}
