//! Member-exposing composites.
//!
//! A composite hands out an ordered list of references to its fields. The
//! traversal visits them one per continuation, keeping a [`MemberCursor`] on
//! the arena between visits; the last member is entered with the composite's
//! own parent so finished composites do not linger on the arena.

use std::marker::PhantomData;
use std::ptr::NonNull;

use smallvec::{SmallVec, smallvec};

use crate::arena::StackArena;
use crate::capability::{Capability, Transparent};
use crate::step::{Resume, Step};

/// The member list of a composite, in declaration order.
pub type Members<'a> = SmallVec<[Member<'a>; 8]>;

type Begin = unsafe fn(NonNull<()>, Option<Resume>, &mut StackArena) -> Step;

/// A type-erased reference to one member.
#[derive(Clone, Copy)]
pub struct Member<'a> {
    object: NonNull<()>,
    begin: Begin,
    capability: Capability,
    _borrow: PhantomData<&'a ()>,
}

impl<'a> Member<'a> {
    pub fn of<T: Transparent>(value: &'a T) -> Self {
        Self {
            object: NonNull::from(value).cast(),
            begin: begin_erased::<T>,
            capability: T::CAPABILITY,
            _borrow: PhantomData,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    fn begin(self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
        // SAFETY: object came from a `&'a T` matching `begin`, still borrowed.
        unsafe { (self.begin)(self.object, parent, arena) }
    }
}

unsafe fn begin_erased<T: Transparent>(
    object: NonNull<()>,
    parent: Option<Resume>,
    arena: &mut StackArena,
) -> Step {
    // SAFETY: only called through a `Member` built from a `&T`.
    let value = unsafe { object.cast::<T>().as_ref() };
    value.mem_compare_step(parent, arena)
}

/// A composite that exposes its fields for comparison.
///
/// The list must have the same length and member types on every call.
pub trait ExposeMembers {
    fn members(&self) -> Members<'_>;

    /// The member at `index`, looked up once per step of the walk.
    ///
    /// The default builds the whole list, making a walk quadratic in the
    /// member count; the registration macros override it.
    fn member(&self, index: usize) -> Option<Member<'_>> {
        self.members().get(index).copied()
    }
}

#[derive(Clone, Copy, Debug)]
struct MemberCursor {
    parent: Option<Resume>,
    len: usize,
    next: usize,
}

/// First step of a member-exposing value.
pub fn members_step<T: ExposeMembers>(
    value: &T,
    parent: Option<Resume>,
    arena: &mut StackArena,
) -> Step {
    let members = value.members();
    match members.as_slice() {
        [] => Step::resume(parent),
        [only] => only.begin(parent, arena),
        [first, ..] => {
            arena.push(MemberCursor {
                parent,
                len: members.len(),
                next: 1,
            });
            first.begin(Some(Resume::new(value, advance_members::<T>)), arena)
        }
    }
}

unsafe fn advance_members<T: ExposeMembers>(arena: &mut StackArena, object: NonNull<()>) -> Step {
    // SAFETY: this continuation is only ever paired with a `&T`.
    let value = unsafe { object.cast::<T>().as_ref() };
    // SAFETY: members_step pushed this cursor and nothing above it is live.
    let cursor = unsafe { arena.peek_mut::<MemberCursor>() };
    let index = cursor.next;
    if index + 1 >= cursor.len {
        // SAFETY: same slot as above.
        let cursor = unsafe { arena.pop::<MemberCursor>() };
        return match value.member(index) {
            Some(last) => last.begin(cursor.parent, arena),
            None => Step::resume(cursor.parent),
        };
    }
    cursor.next = index + 1;
    match value.member(index) {
        Some(member) => member.begin(Some(Resume::new(value, advance_members::<T>)), arena),
        // member list shrank between calls; nothing left to visit here
        None => Step::resume(Some(Resume::new(value, advance_members::<T>))),
    }
}

/// Build a [`Members`] list from field references.
#[macro_export]
macro_rules! members {
    ($($field:expr),* $(,)?) => {
        $crate::smallvec::smallvec![$($crate::Member::of($field)),*]
    };
}

/// Implement [`Transparent`] for types with a hand-written [`ExposeMembers`] impl.
#[macro_export]
macro_rules! impl_transparent_members {
    ($($ty:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::Transparent for $ty {
                const CAPABILITY: $crate::Capability = $crate::Capability::MemberExposing;

                fn mem_compare_step(
                    &self,
                    parent: ::core::option::Option<$crate::Resume>,
                    arena: &mut $crate::StackArena,
                ) -> $crate::Step {
                    $crate::members::members_step(self, parent, arena)
                }
            }
        )+
    };
}

/// Expose the listed fields of a struct, in order, and make it transparent.
///
/// ```
/// struct Sample {
///     id: u32,
///     weights: Vec<f32>,
/// }
///
/// mem_comparable::expose_members!(Sample { id, weights });
///
/// let a = Sample { id: 1, weights: vec![0.5] };
/// let b = Sample { id: 1, weights: vec![0.25] };
/// assert!(mem_comparable::is_updated(&a, &b));
/// ```
#[macro_export]
macro_rules! expose_members {
    ($ty:ty { $($field:tt),* $(,)? }) => {
        impl $crate::ExposeMembers for $ty {
            fn members(&self) -> $crate::Members<'_> {
                $crate::members![$(&self.$field),*]
            }

            #[allow(unused_mut, unused_assignments, unused_variables)]
            fn member(&self, index: usize) -> ::core::option::Option<$crate::Member<'_>> {
                let mut remaining = index;
                $(
                    if remaining == 0 {
                        return ::core::option::Option::Some($crate::Member::of(&self.$field));
                    }
                    remaining -= 1;
                )*
                ::core::option::Option::None
            }
        }

        $crate::impl_transparent_members!($ty);
    };
}

macro_rules! tuple_members {
    ($($T:ident . $idx:tt),+) => {
        impl<$($T: Transparent),+> ExposeMembers for ($($T,)+) {
            fn members(&self) -> Members<'_> {
                smallvec![$(Member::of(&self.$idx)),+]
            }

            fn member(&self, index: usize) -> Option<Member<'_>> {
                match index {
                    $($idx => Some(Member::of(&self.$idx)),)+
                    _ => None,
                }
            }
        }

        unsafe impl<$($T: Transparent),+> Transparent for ($($T,)+) {
            const CAPABILITY: Capability = Capability::MemberExposing;

            fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step {
                members_step(self, parent, arena)
            }
        }
    };
}

tuple_members!(A.0);
tuple_members!(A.0, B.1);
tuple_members!(A.0, B.1, C.2);
tuple_members!(A.0, B.1, C.2, D.3);
tuple_members!(A.0, B.1, C.2, D.3, E.4);
tuple_members!(A.0, B.1, C.2, D.3, E.4, F.5);
tuple_members!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
tuple_members!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
