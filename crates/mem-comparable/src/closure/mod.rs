//! Partially applied callables the comparator can see into.
//!
//! A [`Closure`] starts from a plain function pointer and binds arguments one
//! at a time, front to back. It can be called with the remaining arguments,
//! compared as is, or erased into a [`Fun`] that only exposes its signature.
//!
//! ```
//! use mem_comparable::{closure_from_fp, is_identical};
//!
//! fn scale(factor: i32, offset: i32, x: i32) -> i32 {
//!     factor * x + offset
//! }
//!
//! let a = closure_from_fp(scale as fn(i32, i32, i32) -> i32).bind(2).bind(3).into_fun();
//! let b = closure_from_fp(scale as fn(i32, i32, i32) -> i32).bind(2).bind(3).into_fun();
//! assert_eq!(a.call((10,)), 23);
//! assert!(is_identical(&a, &b));
//! ```
//!
//! Arguments without a `Transparent` impl are rejected when the closure is
//! built:
//!
//! ```compile_fail
//! use mem_comparable::closure_from_fp;
//!
//! fn first(a: &i32) -> i32 {
//!     *a
//! }
//!
//! let _ = closure_from_fp::<fn(&i32) -> i32>(first);
//! ```

mod chain;
mod fun;
mod signature;

pub use chain::{Bound, Chain, FnLeaf};
pub use fun::Fun;
pub use signature::{FnPtr, SplitFirst};

use crate::arena::StackArena;
use crate::capability::{Capability, Transparent};
use crate::step::{Resume, Step};

/// A binding chain with its concrete bound types still visible.
#[derive(Clone, Debug)]
pub struct Closure<C> {
    chain: C,
}

impl<F: FnPtr> Closure<FnLeaf<F>> {
    pub fn new(fp: F) -> Self {
        Self {
            chain: FnLeaf::new(fp),
        }
    }
}

impl<C: Chain> Closure<C> {
    pub fn call(&self, args: C::Args) -> C::Output {
        self.chain.call(args)
    }

    /// Fix the first open argument.
    pub fn bind<T>(self, value: T) -> Closure<Bound<C, T>>
    where
        C::Args: SplitFirst<Head = T>,
        T: Transparent + Clone + 'static,
    {
        Closure {
            chain: Bound::new(self.chain, value),
        }
    }

    /// Erase the bound state, copying it.
    pub fn to_fun(&self) -> Fun<C::Args, C::Output> {
        Fun::new(self.chain.clone())
    }

    pub fn into_fun(self) -> Fun<C::Args, C::Output> {
        Fun::new(self.chain)
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }
}

unsafe impl<C: Transparent> Transparent for Closure<C> {
    const CAPABILITY: Capability = Capability::SelfDescribing;

    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        self.chain.mem_compare_step(parent, arena)
    }
}

/// Start a closure from a function pointer.
///
/// Non-capturing closures coerce when the signature is spelled out:
/// `closure_from_fp::<fn(i32, i32) -> i32>(|a, _| a)`.
pub fn closure_from_fp<F: FnPtr>(fp: F) -> Closure<FnLeaf<F>> {
    Closure::new(fp)
}
