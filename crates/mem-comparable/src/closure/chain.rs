//! Binding chains: a function pointer wrapped in one layer per bound argument.
//!
//! `Bound<Bound<FnLeaf<fn(A, B, C) -> R>, A>, B>` is `f` with `A` and then `B`
//! bound. A chain compares its outermost bound value first, works inwards, and
//! ends on the function pointer's address.

use std::fmt;
use std::ptr::NonNull;

use crate::arena::StackArena;
use crate::capability::{Capability, Transparent};
use crate::closure::signature::{FnPtr, SplitFirst};
use crate::step::{Leaf, ParentFrame, Resume, Step};

/// A callable built from a function pointer and zero or more bound values.
pub trait Chain: Transparent + Clone + 'static {
    /// Arguments still to be supplied, as a tuple.
    type Args;
    type Output;

    fn call(&self, args: Self::Args) -> Self::Output;
}

/// Base of every chain: the bare function pointer.
#[derive(Clone, Copy)]
pub struct FnLeaf<F> {
    fp: F,
}

impl<F: FnPtr> FnLeaf<F> {
    pub fn new(fp: F) -> Self {
        Self { fp }
    }

    pub fn fn_ptr(&self) -> F {
        self.fp
    }
}

impl<F> fmt::Debug for FnLeaf<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLeaf").finish_non_exhaustive()
    }
}

unsafe impl<F: FnPtr> Transparent for FnLeaf<F> {
    const CAPABILITY: Capability = Capability::SelfDescribing;

    fn mem_compare_step(&self, parent: Option<Resume>, _arena: &mut StackArena) -> Step {
        // FnPtr is sealed to plain fn pointers: one address, no padding.
        Step::then(parent, Leaf::of(&self.fp))
    }
}

impl<F: FnPtr> Chain for FnLeaf<F> {
    type Args = F::Args;
    type Output = F::Output;

    fn call(&self, args: Self::Args) -> Self::Output {
        self.fp.invoke(args)
    }
}

/// `chain` with its first open argument fixed to `value`.
#[derive(Clone, Debug)]
pub struct Bound<C, T> {
    chain: C,
    value: T,
}

impl<C, T> Bound<C, T> {
    pub fn new(chain: C, value: T) -> Self {
        Self { chain, value }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<C: Transparent, T: Transparent> Bound<C, T> {
    unsafe fn after_value(arena: &mut StackArena, object: NonNull<()>) -> Step {
        // SAFETY: handed out together with a `&Self` in `mem_compare_step`.
        let this = unsafe { object.cast::<Self>().as_ref() };
        // SAFETY: pushed by `mem_compare_step`; the value's own state is gone.
        let frame = unsafe { arena.pop::<ParentFrame>() };
        this.chain.mem_compare_step(frame.parent, arena)
    }
}

unsafe impl<C: Transparent, T: Transparent> Transparent for Bound<C, T> {
    const CAPABILITY: Capability = Capability::SelfDescribing;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        arena.push(ParentFrame { parent });
        self.value
            .mem_compare_step(Some(Resume::new(self, Self::after_value)), arena)
    }
}

impl<C, T> Chain for Bound<C, T>
where
    C: Chain,
    C::Args: SplitFirst<Head = T>,
    T: Transparent + Clone + 'static,
{
    type Args = <C::Args as SplitFirst>::Tail;
    type Output = C::Output;

    fn call(&self, args: Self::Args) -> Self::Output {
        self.chain
            .call(<C::Args as SplitFirst>::join(self.value.clone(), args))
    }
}
