//! Growable LIFO byte store for traversal resume state.
//!
//! The comparator never recurses. A strategy that has to come back to a value
//! later pushes a small cursor here and pops it when it resumes. Every slot is
//! padded to [`ARENA_ALIGN`] so any state type can be placed at any offset.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

/// Alignment quantum every slot is padded to (one cache line).
pub const ARENA_ALIGN: usize = 64;

/// Capacity of a default arena in bytes.
pub const INITIAL_CAPACITY: usize = 256;

/// Stack-discipline byte arena.
///
/// Slots must be popped in reverse push order with the same type they were
/// pushed with. Debug builds check this and panic on a mismatch; release
/// builds trust the caller, which is why [`peek`](Self::peek),
/// [`peek_mut`](Self::peek_mut) and [`pop`](Self::pop) are `unsafe`.
pub struct StackArena {
    base: NonNull<u8>,
    /// High-water mark in bytes
    size: usize,
    /// Capacity in bytes, always a multiple of `ARENA_ALIGN`
    max_size: usize,
    #[cfg(debug_assertions)]
    tags: Vec<SlotTag>,
}

#[cfg(debug_assertions)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SlotTag {
    id: std::any::TypeId,
    name: &'static str,
}

#[cfg(debug_assertions)]
impl SlotTag {
    fn of<T: 'static>() -> Self {
        Self {
            id: std::any::TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

impl StackArena {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an arena holding at least `capacity` bytes before its first growth.
    pub fn with_capacity(capacity: usize) -> Self {
        let max_size = round_up(capacity.max(1));
        let layout = buffer_layout(max_size);
        // SAFETY: layout has a non-zero size.
        let base = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(base).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Self {
            base,
            size: 0,
            max_size,
            #[cfg(debug_assertions)]
            tags: Vec::new(),
        }
    }

    /// Bytes a slot holding a `T` occupies.
    pub const fn slot_size<T>() -> usize {
        round_up(if std::mem::size_of::<T>() == 0 {
            1
        } else {
            std::mem::size_of::<T>()
        })
    }

    /// Reserve a slot for `value` and return a pointer to it.
    ///
    /// The pointer stays valid until the slot is popped or the arena grows.
    pub fn allocate<T: Copy + 'static>(&mut self, value: T) -> NonNull<T> {
        const {
            assert!(
                std::mem::align_of::<T>() <= ARENA_ALIGN,
                "unsupported alignment for stack arena slot"
            )
        };
        let offset = self.size;
        let new_size = offset
            .checked_add(Self::slot_size::<T>())
            .unwrap_or_else(|| capacity_overflow());
        while new_size > self.max_size {
            self.grow();
        }
        self.size = new_size;
        #[cfg(debug_assertions)]
        self.tags.push(SlotTag::of::<T>());

        // SAFETY: offset + size_of::<T>() <= max_size, offset is a multiple of
        // ARENA_ALIGN and the buffer is ARENA_ALIGN aligned.
        unsafe {
            let slot = self.base.add(offset).cast::<T>();
            slot.write(value);
            slot
        }
    }

    /// Push `value` on top of the arena.
    pub fn push<T: Copy + 'static>(&mut self, value: T) {
        self.allocate(value);
    }

    /// Read the top slot.
    ///
    /// # Safety
    /// The top slot must have been pushed as a `T` and not popped since.
    pub unsafe fn peek<T: Copy + 'static>(&self) -> T {
        // SAFETY: forwarded to the caller.
        unsafe { self.top_slot::<T>().read() }
    }

    /// Mutable access to the top slot, used to advance a cursor in place.
    ///
    /// # Safety
    /// Same contract as [`peek`](Self::peek).
    pub unsafe fn peek_mut<T: Copy + 'static>(&mut self) -> &mut T {
        // SAFETY: forwarded to the caller; the slot is owned by `self`.
        unsafe { &mut *self.top_slot::<T>().as_ptr() }
    }

    /// Read the top slot and release it.
    ///
    /// # Safety
    /// Same contract as [`peek`](Self::peek).
    pub unsafe fn pop<T: Copy + 'static>(&mut self) -> T {
        // SAFETY: forwarded to the caller.
        let value = unsafe { self.peek::<T>() };
        self.size -= Self::slot_size::<T>();
        #[cfg(debug_assertions)]
        self.tags.pop();
        value
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn top_slot<T: 'static>(&self) -> NonNull<T> {
        let slot = Self::slot_size::<T>();
        assert!(self.size >= slot, "stack arena underflow");
        #[cfg(debug_assertions)]
        {
            let expected = SlotTag::of::<T>();
            let found = self.tags.last().copied();
            assert_eq!(
                found.map(|tag| tag.id),
                Some(expected.id),
                "stack arena discipline violated: requested {}, top slot holds {}",
                expected.name,
                found.map_or("nothing", |tag| tag.name),
            );
        }
        // SAFETY: size - slot is the start of the top slot, inside the buffer.
        unsafe { self.base.add(self.size - slot).cast::<T>() }
    }

    /// Double the buffer, keeping every live slot in place relative to `base`.
    fn grow(&mut self) {
        let old_layout = buffer_layout(self.max_size);
        let new_max_size = self
            .max_size
            .checked_mul(2)
            .unwrap_or_else(|| capacity_overflow());
        let new_layout = buffer_layout(new_max_size);
        // SAFETY: base was allocated with old_layout; the new size is non-zero
        // and was validated by buffer_layout.
        let new_base = unsafe { alloc::realloc(self.base.as_ptr(), old_layout, new_max_size) };
        self.base = NonNull::new(new_base).unwrap_or_else(|| alloc::handle_alloc_error(new_layout));
        log::debug!(
            "stack arena grew from {} to {} bytes ({} in use)",
            self.max_size,
            new_max_size,
            self.size
        );
        self.max_size = new_max_size;
    }
}

impl Default for StackArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StackArena {
    fn drop(&mut self) {
        // SAFETY: base was allocated (or last reallocated) with this layout.
        unsafe { alloc::dealloc(self.base.as_ptr(), buffer_layout(self.max_size)) }
    }
}

impl fmt::Debug for StackArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackArena")
            .field("size", &self.size)
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

const fn round_up(bytes: usize) -> usize {
    bytes.div_ceil(ARENA_ALIGN) * ARENA_ALIGN
}

fn buffer_layout(bytes: usize) -> Layout {
    Layout::from_size_align(bytes, ARENA_ALIGN).unwrap_or_else(|_| capacity_overflow())
}

fn capacity_overflow() -> ! {
    panic!("stack arena capacity overflow")
}
