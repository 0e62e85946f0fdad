//! Arena growth must be invisible to callers.

use mem_comparable::StackArena;
use mem_comparable::arena::{ARENA_ALIGN, INITIAL_CAPACITY};

/// Push/pop script with a bounded live depth; returns every popped value.
fn run_script(arena: &mut StackArena) -> Vec<u64> {
    let mut popped = Vec::new();
    for round in 0..20u64 {
        for depth in 0..=round {
            arena.push(round * 100 + depth);
        }
        arena.push([round as u8; 100]);
        unsafe {
            assert_eq!(arena.pop::<[u8; 100]>(), [round as u8; 100]);
        }
        for _ in 0..=round {
            popped.push(unsafe { arena.pop::<u64>() });
        }
    }
    popped
}

#[test]
fn growth_events_do_not_change_results() {
    let mut small = StackArena::with_capacity(ARENA_ALIGN);
    let mut large = StackArena::with_capacity(64 * 1024);

    let from_small = run_script(&mut small);
    let from_large = run_script(&mut large);

    assert_eq!(from_small, from_large);
    assert!(small.max_size() > ARENA_ALIGN, "small arena should have grown");
    assert_eq!(large.max_size(), 64 * 1024, "large arena should not grow");
    assert!(small.is_empty());
    assert!(large.is_empty());
}

#[test]
fn capacity_doubles() {
    let mut arena = StackArena::new();
    assert_eq!(arena.max_size(), INITIAL_CAPACITY);
    for i in 0..(INITIAL_CAPACITY / ARENA_ALIGN + 1) {
        arena.push(i);
    }
    assert_eq!(arena.max_size(), 2 * INITIAL_CAPACITY);
}

#[test]
fn allocate_returns_stable_slot_until_growth() {
    let mut arena = StackArena::new();
    let slot = arena.allocate(41u32);
    unsafe {
        *slot.as_ptr() += 1;
        assert_eq!(arena.peek::<u32>(), 42);
        assert_eq!(arena.pop::<u32>(), 42);
    }
}
