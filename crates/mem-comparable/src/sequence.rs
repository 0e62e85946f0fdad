//! Externally specialized containers.
//!
//! Sequences compare their element count first, so sequences of different
//! lengths differ without touching any element. Scalar elements are then
//! compared as one contiguous byte range; anything else is visited element by
//! element with an index cursor on the arena.

use std::ptr::NonNull;

use crate::arena::StackArena;
use crate::capability::{Capability, Transparent};
use crate::step::{Leaf, ParentFrame, Resume, Step};

#[derive(Clone, Copy, Debug)]
struct SequenceCursor {
    parent: Option<Resume>,
    data: NonNull<()>,
    len: usize,
    next: usize,
}

/// First step of a run of `T`s: the element count.
///
/// The count leaf lives in the arena slot of the cursor, which stays put until
/// the traversal resumes.
pub fn slice_step<T: Transparent>(
    items: &[T],
    parent: Option<Resume>,
    arena: &mut StackArena,
) -> Step {
    let data = NonNull::from(items).cast::<()>();
    let cursor = arena.allocate(SequenceCursor {
        parent,
        data,
        len: items.len(),
        next: 0,
    });
    // SAFETY: the slot was just written and is not popped before the driver
    // has compared this leaf.
    let count = Leaf::of(unsafe { &cursor.as_ref().len });
    Step::new(Some(Resume::from_raw(data, advance_sequence::<T>)), count)
}

unsafe fn advance_sequence<T: Transparent>(arena: &mut StackArena, _data: NonNull<()>) -> Step {
    if T::CAPABILITY == Capability::Scalar {
        // SAFETY: slice_step pushed this cursor and nothing above it is live.
        let cursor = unsafe { arena.pop::<SequenceCursor>() };
        let bulk = Leaf::from_raw(cursor.data.cast(), cursor.len * std::mem::size_of::<T>());
        return Step::then(cursor.parent, bulk);
    }

    // SAFETY: as above.
    let cursor = unsafe { arena.peek_mut::<SequenceCursor>() };
    let data = cursor.data;
    let index = cursor.next;
    if index + 1 >= cursor.len {
        // SAFETY: as above.
        let cursor = unsafe { arena.pop::<SequenceCursor>() };
        if index < cursor.len {
            // SAFETY: index is in bounds of the borrowed slice.
            let last = unsafe { data.cast::<T>().add(index).as_ref() };
            return last.mem_compare_step(cursor.parent, arena);
        }
        return Step::resume(cursor.parent);
    }
    cursor.next = index + 1;
    // SAFETY: index + 1 < len.
    let item = unsafe { data.cast::<T>().add(index).as_ref() };
    item.mem_compare_step(Some(Resume::from_raw(data, advance_sequence::<T>)), arena)
}

unsafe impl<T: Transparent> Transparent for Vec<T> {
    const CAPABILITY: Capability = Capability::Specialized;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        slice_step(self.as_slice(), parent, arena)
    }
}

unsafe impl<T: Transparent, const N: usize> Transparent for [T; N] {
    const CAPABILITY: Capability = Capability::Specialized;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        slice_step(self.as_slice(), parent, arena)
    }
}

unsafe impl Transparent for String {
    const CAPABILITY: Capability = Capability::Specialized;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        slice_step(self.as_bytes(), parent, arena)
    }
}

unsafe impl<T: Transparent> Transparent for Box<T> {
    const CAPABILITY: Capability = Capability::Specialized;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        self.as_ref().mem_compare_step(parent, arena)
    }
}

static DISCRIMINANTS: [u8; 2] = [0, 1];

unsafe impl<T: Transparent> Transparent for Option<T> {
    const CAPABILITY: Capability = Capability::Specialized;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        match self {
            None => Step::then(parent, Leaf::of(&DISCRIMINANTS[0])),
            Some(_) => {
                arena.push(ParentFrame { parent });
                Step::new(
                    Some(Resume::new(self, advance_option::<T>)),
                    Leaf::of(&DISCRIMINANTS[1]),
                )
            }
        }
    }
}

unsafe fn advance_option<T: Transparent>(arena: &mut StackArena, object: NonNull<()>) -> Step {
    // SAFETY: paired with a `&Option<T>` in `mem_compare_step`.
    let option = unsafe { object.cast::<Option<T>>().as_ref() };
    // SAFETY: pushed right before this continuation was handed out.
    let frame = unsafe { arena.pop::<ParentFrame>() };
    match option {
        Some(value) => value.mem_compare_step(frame.parent, arena),
        None => Step::resume(frame.parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk<T: Transparent>(value: &T) -> usize {
        let mut arena = StackArena::new();
        let mut step = value.mem_compare_step(None, &mut arena);
        let mut count = 1;
        while let Some(next) = step.next() {
            step = unsafe { next.resume(&mut arena) };
            count += 1;
        }
        assert!(step.leaf().is_none(), "final step carries bytes");
        assert!(arena.is_empty());
        count
    }

    #[test]
    fn scalar_elements_compare_in_bulk() {
        // count, empty bulk range ends the walk
        assert_eq!(walk(&Vec::<i32>::new()), 2);
        // count, bulk, final
        assert_eq!(walk(&vec![1i32, 2, 3, 4, 5]), 3);
    }

    #[test]
    fn nested_elements_are_visited_one_by_one() {
        // outer count, then count and bulk for each inner vector, then final
        assert_eq!(walk(&vec![vec![1i32], vec![2, 3]]), 6);
    }

    #[test]
    fn count_leaf_points_at_length() {
        let mut arena = StackArena::new();
        let items = vec![7u8; 3];
        let step = items.mem_compare_step(None, &mut arena);
        let bytes = unsafe { step.leaf().map(|leaf| leaf.bytes()) };
        assert_eq!(bytes, Some(&3usize.to_ne_bytes()[..]));
        let step = unsafe { step.next().map(|next| next.resume(&mut arena)) };
        assert_eq!(step.map(|step| step.leaf_size()), Some(3));
    }

    #[test]
    fn option_compares_discriminant_then_payload() {
        assert_eq!(walk(&None::<u32>), 2);
        assert_eq!(walk(&Some(4u32)), 3);
    }
}
