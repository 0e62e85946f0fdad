//! The continuation-passing unit of a traversal.
//!
//! A [`Step`] names the next byte range to compare (its [`Leaf`]) and how to
//! produce the step after it (its [`Resume`] point). A step without a leaf is
//! a "subtree finished, continue" marker; a step without a resume point is the
//! last one of the walk.

use std::fmt;
use std::ptr::NonNull;
use std::slice;

use crate::arena::StackArena;

/// Produces the step that follows once the current one has been consumed.
///
/// Receives the arena of the running traversal and the object handle stored
/// in the [`Resume`] that carried it.
pub type Continuation = unsafe fn(&mut StackArena, NonNull<()>) -> Step;

/// Where to pick a traversal back up: an opaque object handle plus the
/// continuation that knows how to interpret it.
#[derive(Clone, Copy)]
pub struct Resume {
    object: NonNull<()>,
    continuation: Continuation,
}

impl Resume {
    pub fn new<T>(object: &T, continuation: Continuation) -> Self {
        Self::from_raw(NonNull::from(object).cast(), continuation)
    }

    pub fn from_raw(object: NonNull<()>, continuation: Continuation) -> Self {
        Self {
            object,
            continuation,
        }
    }

    pub fn object(&self) -> NonNull<()> {
        self.object
    }

    pub fn continuation(&self) -> Continuation {
        self.continuation
    }

    /// Run the continuation and produce the next step.
    ///
    /// # Safety
    /// The object this resume point was created for must still be alive and
    /// unmodified, and `arena` must be the arena the traversal that produced
    /// this resume point has been pushing into.
    pub unsafe fn resume(self, arena: &mut StackArena) -> Step {
        // SAFETY: forwarded to the caller.
        unsafe { (self.continuation)(arena, self.object) }
    }
}

impl fmt::Debug for Resume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resume")
            .field("object", &self.object)
            .field("continuation", &(self.continuation as *const ()))
            .finish()
    }
}

/// A non-empty byte range to compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leaf {
    ptr: NonNull<u8>,
    size: usize,
}

impl Leaf {
    /// The full byte representation of `value`, or `None` for zero-sized types.
    pub fn of<T>(value: &T) -> Option<Self> {
        Self::from_raw(NonNull::from(value).cast(), std::mem::size_of::<T>())
    }

    /// `None` when `size` is zero.
    pub fn from_raw(ptr: NonNull<u8>, size: usize) -> Option<Self> {
        (size != 0).then_some(Self { ptr, size })
    }

    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// # Safety
    /// The range must still be readable and fully initialised for `'a`.
    pub unsafe fn bytes<'a>(&self) -> &'a [u8] {
        // SAFETY: forwarded to the caller.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }
}

/// One unit of a traversal.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    next: Option<Resume>,
    leaf: Option<Leaf>,
}

impl Step {
    /// A raw step. With `next == None` the leaf must be `None` as well; use
    /// [`then`](Self::then) when `next` is a parent that may be absent.
    pub fn new(next: Option<Resume>, leaf: Option<Leaf>) -> Self {
        Self { next, leaf }
    }

    /// Compare `leaf`, then continue at `parent`.
    ///
    /// At the top of the graph an extra bare final step is scheduled so the
    /// leaf is never carried by the final step.
    pub fn then(parent: Option<Resume>, leaf: Option<Leaf>) -> Self {
        match (parent, leaf) {
            (None, Some(leaf)) => Self {
                next: Some(Resume::from_raw(NonNull::dangling(), finish)),
                leaf: Some(leaf),
            },
            _ => Self { next: parent, leaf },
        }
    }

    /// A step with no bytes that hands control to `next`.
    pub fn resume(next: Option<Resume>) -> Self {
        Self { next, leaf: None }
    }

    pub fn next(&self) -> Option<Resume> {
        self.next
    }

    pub fn leaf(&self) -> Option<Leaf> {
        self.leaf
    }

    pub fn next_object(&self) -> Option<NonNull<()>> {
        self.next.map(|next| next.object)
    }

    pub fn continuation(&self) -> Option<Continuation> {
        self.next.map(|next| next.continuation)
    }

    pub fn leaf_pointer(&self) -> Option<NonNull<u8>> {
        self.leaf.map(|leaf| leaf.ptr)
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf.map_or(0, |leaf| leaf.size)
    }

    /// True once the top of the value graph has been reached.
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}

unsafe fn finish(_arena: &mut StackArena, _object: NonNull<()>) -> Step {
    Step::resume(None)
}

/// Resume state for strategies that only need to remember their parent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ParentFrame {
    pub(crate) parent: Option<Resume>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_values_have_no_leaf() {
        assert!(Leaf::of(&()).is_none());
        let leaf = Leaf::of(&7u16).map(|leaf| leaf.size());
        assert_eq!(leaf, Some(2));
    }

    #[test]
    fn resume_only_step_reports_sentinels() {
        let step = Step::resume(None);
        assert!(step.is_terminal());
        assert!(step.leaf_pointer().is_none());
        assert_eq!(step.leaf_size(), 0);
        assert!(step.next_object().is_none());
        assert!(step.continuation().is_none());
    }

    #[test]
    fn then_never_ends_on_a_leaf() {
        let value = 9u32;
        let mut arena = StackArena::new();

        let step = Step::then(None, Leaf::of(&value));
        assert!(!step.is_terminal());
        assert_eq!(step.leaf_size(), 4);

        let last = step.next().map(|next| unsafe { next.resume(&mut arena) });
        assert!(last.is_some_and(|last| last.is_terminal() && last.leaf().is_none()));
        assert!(arena.is_empty());

        // nothing to compare at the top: already final
        assert!(Step::then(None, None).is_terminal());
    }

    #[test]
    fn then_with_parent_keeps_it() {
        let parent = Step::then(None, Leaf::of(&1u8)).next();
        let step = Step::then(parent, Leaf::of(&2u8));
        assert_eq!(step.next_object(), parent.map(|p| p.object()));
        assert_eq!(step.leaf_size(), 1);
    }
}
