//! Erased callables.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

use rustc_hash::FxHasher;

use crate::arena::StackArena;
use crate::capability::{Capability, Transparent};
use crate::closure::chain::Chain;
use crate::step::{Leaf, ParentFrame, Resume, Step};

trait ErasedChain<Args, R> {
    fn call(&self, args: Args) -> R;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step;

    fn clone_box(&self) -> Box<dyn ErasedChain<Args, R>>;
}

/// Owns a concrete chain behind the erased interface.
///
/// `shape` fingerprints the chain type. It is compared before anything else,
/// so two `Fun`s with the same signature but different bound argument types
/// come out as different instead of walking mismatched structures.
struct Holder<C> {
    shape: u64,
    chain: C,
}

impl<C: Chain> Holder<C> {
    fn new(chain: C) -> Self {
        Self {
            shape: shape_of::<C>(),
            chain,
        }
    }

    unsafe fn after_shape(arena: &mut StackArena, object: NonNull<()>) -> Step {
        // SAFETY: handed out together with a `&Self` below.
        let this = unsafe { object.cast::<Self>().as_ref() };
        // SAFETY: pushed right before the shape leaf.
        let frame = unsafe { arena.pop::<ParentFrame>() };
        this.chain.mem_compare_step(frame.parent, arena)
    }
}

impl<C: Chain> ErasedChain<C::Args, C::Output> for Holder<C> {
    fn call(&self, args: C::Args) -> C::Output {
        self.chain.call(args)
    }

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        arena.push(ParentFrame { parent });
        Step::new(
            Some(Resume::new(self, Self::after_shape)),
            Leaf::of(&self.shape),
        )
    }

    fn clone_box(&self) -> Box<dyn ErasedChain<C::Args, C::Output>> {
        Box::new(Holder {
            shape: self.shape,
            chain: self.chain.clone(),
        })
    }
}

fn shape_of<C: 'static>() -> u64 {
    let mut hasher = FxHasher::default();
    TypeId::of::<C>().hash(&mut hasher);
    hasher.finish()
}

/// A callable taking `Args` and returning `R`, with its bound state erased.
///
/// Cloning deep-copies the bound values.
pub struct Fun<Args, R> {
    erased: Box<dyn ErasedChain<Args, R>>,
}

impl<Args, R> Fun<Args, R> {
    pub fn new<C>(chain: C) -> Self
    where
        C: Chain<Args = Args, Output = R>,
    {
        Self {
            erased: Box::new(Holder::new(chain)),
        }
    }

    pub fn call(&self, args: Args) -> R {
        self.erased.call(args)
    }
}

impl<Args, R> Clone for Fun<Args, R> {
    fn clone(&self) -> Self {
        Self {
            erased: self.erased.clone_box(),
        }
    }
}

impl<Args, R> fmt::Debug for Fun<Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fun").finish_non_exhaustive()
    }
}

unsafe impl<Args, R> Transparent for Fun<Args, R> {
    const CAPABILITY: Capability = Capability::SelfDescribing;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        self.erased.mem_compare_step(parent, arena)
    }
}
