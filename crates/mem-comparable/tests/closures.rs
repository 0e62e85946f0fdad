//! Closures and erased callables.

use mem_comparable::{
    Capability, Closure, Comparator, Fun, StackArena, Transparent, closure_from_fp, is_identical,
    is_updated,
};

fn pick_first(a: i32, _b: i32, _c: i32) -> i32 {
    a
}

fn weighted(a: i32, b: i32, c: i32) -> i32 {
    a * 100 + b * 10 + c
}

type Pick = fn(i32, i32, i32) -> i32;

fn bound(fp: Pick, first: i32, second: i32) -> Fun<(i32,), i32> {
    closure_from_fp(fp).bind(first).bind(second).into_fun()
}

fn count_steps<T: Transparent>(value: &T) -> usize {
    let mut arena = StackArena::new();
    let mut step = value.mem_compare_step(None, &mut arena);
    let mut count = 1;
    while let Some(next) = step.next() {
        step = unsafe { next.resume(&mut arena) };
        count += 1;
    }
    assert!(step.leaf().is_none());
    assert!(arena.is_empty());
    count
}

#[test]
fn creation_and_calls() {
    let closure = closure_from_fp::<fn(i32, i32) -> i32>(|a, _| a);
    assert_eq!(closure.call((1, 2)), 1);

    let bound = closure.bind(2);
    assert_eq!(bound.call((3,)), 2);

    let full = Closure::new(weighted as Pick).bind(1).bind(2).bind(3);
    assert_eq!(full.call(()), 123);
}

#[test]
fn chain_exposes_bound_values_outermost_first() {
    let closure = closure_from_fp(weighted as Pick).bind(1).bind(2);
    let outer = closure.chain();
    assert_eq!(*outer.value(), 2);
    assert_eq!(*outer.chain().value(), 1);

    let fp = outer.chain().chain().fn_ptr();
    assert_eq!(fp(1, 2, 3), 123);
}

#[test]
fn rebuilt_closure_is_identical() {
    let first = bound(weighted, 2, 3);
    let second = bound(weighted, 2, 3);
    assert!(is_identical(&first, &second));
    assert!(!is_updated(&first, &second));
}

#[test]
fn rebinding_last_argument_is_detected() {
    let first = bound(weighted, 2, 3);
    let changed = bound(weighted, 2, 4);
    assert!(!is_identical(&first, &changed));
    assert!(is_updated(&first, &changed));
    assert_eq!(first.call((5,)), 235);
    assert_eq!(changed.call((5,)), 245);
}

#[test]
fn different_function_is_detected() {
    assert!(is_updated(&bound(pick_first, 2, 3), &bound(weighted, 2, 3)));
}

#[test]
fn walk_visits_shape_values_and_function() {
    // shape fingerprint, 3, 2, function pointer, final
    let fun = bound(pick_first, 2, 3);
    assert_eq!(count_steps(&fun), 5);
    // without erasure there is no fingerprint
    let closure = closure_from_fp(pick_first as Pick).bind(2).bind(3);
    assert_eq!(count_steps(&closure), 4);
    assert_eq!(
        mem_comparable::capability_of::<Fun<(i32,), i32>>(),
        Capability::SelfDescribing
    );
}

#[test]
fn unerased_closures_compare_too() {
    let a = closure_from_fp(weighted as Pick).bind(7);
    let b = closure_from_fp(weighted as Pick).bind(7);
    let c = closure_from_fp(weighted as Pick).bind(8);
    assert!(is_identical(&a, &b));
    assert!(is_updated(&a, &c));
}

#[test]
fn cloned_fun_is_identical_and_independent() {
    let original = bound(weighted, 1, 2);
    let copy = original.clone();
    assert!(is_identical(&original, &copy));
    drop(original);
    assert_eq!(copy.call((3,)), 123);
}

fn join(prefix: String, words: Vec<String>) -> String {
    format!("{prefix}{}", words.join(" "))
}

#[test]
fn heap_arguments_compare_by_content() {
    type Join = fn(String, Vec<String>) -> String;
    let make = |prefix: &str, words: &[&str]| {
        closure_from_fp(join as Join)
            .bind(prefix.to_string())
            .bind(words.iter().map(|w| w.to_string()).collect::<Vec<_>>())
            .into_fun()
    };

    let a = make("> ", &["hello", "world"]);
    let b = make("> ", &["hello", "world"]);
    let c = make("> ", &["hello", "there"]);
    assert!(is_identical(&a, &b));
    assert!(is_updated(&a, &c));
    assert_eq!(a.call(()), "> hello world");
}

fn apply_twice(f: Fun<(i32,), i32>, x: i32) -> i32 {
    f.call((f.call((x,)),))
}

#[test]
fn closures_can_capture_closures() {
    type Apply = fn(Fun<(i32,), i32>, i32) -> i32;
    let outer = |inner: Fun<(i32,), i32>| closure_from_fp(apply_twice as Apply).bind(inner).into_fun();

    let a = outer(bound(weighted, 0, 0));
    let b = outer(bound(weighted, 0, 0));
    let c = outer(bound(weighted, 0, 1));
    assert!(is_identical(&a, &b));
    assert!(is_updated(&a, &c));
    assert_eq!(a.call((4,)), 4);
}

fn seed(a: i32, b: u8) -> i32 {
    a + b as i32
}

#[test]
fn erased_funs_with_different_bound_types_differ() {
    // Both are Fun<(), i32>, but one bound an i32 then a u8 while the other
    // bound a tuple into a single-argument function.
    fn unpack(pair: (i32, u8)) -> i32 {
        pair.0 + pair.1 as i32
    }
    let two_step = closure_from_fp(seed as fn(i32, u8) -> i32)
        .bind(1)
        .bind(2)
        .into_fun();
    let one_step = closure_from_fp(unpack as fn((i32, u8)) -> i32)
        .bind((1, 2))
        .into_fun();
    assert_eq!(two_step.call(()), one_step.call(()));

    let comparison = Comparator::default().compare(&two_step, &one_step);
    assert!(comparison.is_ok_and(|c| !c.identical && c.steps == 1));
}
