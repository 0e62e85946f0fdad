//! Function-pointer signatures and argument-tuple plumbing.
//!
//! Argument lists travel as tuples. [`FnPtr`] ties a plain `fn` pointer type to
//! its argument tuple; [`SplitFirst`] peels the first argument off a tuple so
//! it can be bound.

use crate::capability::Transparent;

mod sealed {
    pub trait Sealed {}
}

/// A plain function pointer whose arguments are all transparent.
///
/// Implemented for `fn(A, ..) -> R` with up to eight arguments. A signature
/// with a non-transparent argument (a reference, a raw pointer, a type
/// without a [`Transparent`] impl) has no impl, so building a closure from it
/// does not compile.
pub trait FnPtr: sealed::Sealed + Copy + 'static {
    type Args: 'static;
    type Output: 'static;

    fn invoke(self, args: Self::Args) -> Self::Output;
}

/// A non-empty argument tuple split into its first element and the rest.
pub trait SplitFirst {
    type Head;
    type Tail;

    fn join(head: Self::Head, tail: Self::Tail) -> Self;
}

macro_rules! fn_ptr {
    ($($A:ident),*) => {
        impl<R: 'static, $($A: Transparent + Clone + 'static),*> sealed::Sealed for fn($($A),*) -> R {}

        impl<R: 'static, $($A: Transparent + Clone + 'static),*> FnPtr for fn($($A),*) -> R {
            type Args = ($($A,)*);
            type Output = R;

            #[allow(non_snake_case)]
            fn invoke(self, ($($A,)*): Self::Args) -> R {
                self($($A),*)
            }
        }
    };
}

fn_ptr!();
fn_ptr!(A);
fn_ptr!(A, B);
fn_ptr!(A, B, C);
fn_ptr!(A, B, C, D);
fn_ptr!(A, B, C, D, E);
fn_ptr!(A, B, C, D, E, F);
fn_ptr!(A, B, C, D, E, F, G);
fn_ptr!(A, B, C, D, E, F, G, H);

macro_rules! split_first {
    ($H:ident $(, $T:ident)*) => {
        impl<$H $(, $T)*> SplitFirst for ($H, $($T,)*) {
            type Head = $H;
            type Tail = ($($T,)*);

            #[allow(non_snake_case)]
            fn join(head: $H, ($($T,)*): Self::Tail) -> Self {
                (head, $($T,)*)
            }
        }
    };
}

split_first!(A);
split_first!(A, B);
split_first!(A, B, C);
split_first!(A, B, C, D);
split_first!(A, B, C, D, E);
split_first!(A, B, C, D, E, F);
split_first!(A, B, C, D, E, F, G);
split_first!(A, B, C, D, E, F, G, H);
