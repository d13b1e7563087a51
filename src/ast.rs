use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use bumpalo::{
    collections::Vec as BumpVec,
    Bump,
};
use tracing::instrument;

pub mod assignment;
pub mod constant_string;
pub mod identifiers;
pub mod value;

/// Owns every node of one syntax tree. Dropping the allocator releases the tree.
#[derive(Debug)]
pub struct ASTAllocator(Bump);

impl ASTAllocator {
    pub fn allocated_bytes(&self) -> usize {
        self.0.allocated_bytes()
    }

    #[allow(clippy::mut_from_ref)] // I think bumpalo knows what it's doing
    #[instrument(level = "trace", name = "alloc", skip(self, val), fields(total_mem = self.allocated_bytes(), chunk_remain = self.0.chunk_capacity()))]
    pub fn alloc<T>(&self, val: T) -> &mut T {
        #[cfg(feature = "trace_mem")]
        let start_mem = self.allocated_bytes();

        #[allow(clippy::let_and_return)] // This binding is used in tracing.
        let v = self.0.alloc(val);

        #[cfg(feature = "trace_mem")]
        tracing::trace!(size = self.allocated_bytes() - start_mem, "allocated");

        v
    }

    pub(crate) fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &[T] {
        #[cfg(feature = "trace_mem")]
        let start_mem = self.allocated_bytes();

        #[allow(clippy::let_and_return)]
        let v = self.0.alloc_slice_copy(src);

        #[cfg(feature = "trace_mem")]
        tracing::trace!(size = self.allocated_bytes() - start_mem, "allocated slice");

        v
    }

    pub(crate) fn new_vec<T>(&self) -> BumpVec<'_, T> {
        BumpVec::new_in(&self.0)
    }
}

impl Default for ASTAllocator {
    fn default() -> Self {
        Self(Bump::new())
    }
}

/// Identity of a single [`assignment::AssignmentList`].
///
/// Ids are unique for the lifetime of the process, so nodes from different allocators can
/// never be mistaken for one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListId(u64);

impl ListId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
