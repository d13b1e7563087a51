use std::cell::Cell;

use bumpalo::collections::Vec as BumpVec;
use thiserror::Error;
use tracing::{
    debug,
    trace,
};

use crate::ast::{
    identifiers::Ident,
    value::Value,
    ASTAllocator,
    ListId,
};

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("assignment is already contained in list {owner}, cannot add it to list {target}")]
pub struct OwnershipConflict {
    pub owner: ListId,
    pub target: ListId,
}

/// A single `name = value` binding, e.g. a parameter assignment in a reactor instantiation.
///
/// Assignments live in an [`ASTAllocator`] and are shared by reference. Which list, if
/// any, contains the node is tracked in the node itself.
pub struct Assignment<'chunk> {
    lhs: Ident,
    rhs: &'chunk [Value],
    owner: Cell<Option<ListId>>,
}

impl<'chunk> Assignment<'chunk> {
    /// Allocate a new, unowned assignment. `rhs` is copied into the allocator.
    pub fn new(
        lhs: Ident,
        rhs: &[Value],
        alloc: &'chunk ASTAllocator,
    ) -> &'chunk Assignment<'chunk> {
        Self::from_parts(lhs, alloc.alloc_slice_copy(rhs), alloc)
    }

    pub(crate) fn from_parts(
        lhs: Ident,
        rhs: &'chunk [Value],
        alloc: &'chunk ASTAllocator,
    ) -> &'chunk Assignment<'chunk> {
        alloc.alloc(Self {
            lhs,
            rhs,
            owner: Cell::new(None),
        })
    }

    pub fn lhs(&self) -> Ident {
        self.lhs
    }

    pub fn rhs(&self) -> &'chunk [Value] {
        self.rhs
    }

    pub fn owner(&self) -> Option<ListId> {
        self.owner.get()
    }

    pub fn is_detached(&self) -> bool {
        self.owner.get().is_none()
    }

    /// A structurally identical copy of this node which no list contains yet.
    pub fn duplicate(&self, alloc: &'chunk ASTAllocator) -> &'chunk Assignment<'chunk> {
        Self::from_parts(self.lhs, self.rhs, alloc)
    }
}

impl PartialEq for Assignment<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl std::fmt::Debug for Assignment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assignment")
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .finish()
    }
}

impl std::fmt::Display for Assignment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = ", self.lhs)?;
        if let [value] = self.rhs {
            return write!(f, "{}", value);
        }

        f.write_str("(")?;
        for (idx, value) in self.rhs.iter().enumerate() {
            if idx != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")
    }
}

/// An ordered group of assignments, in the order they appeared in the source.
///
/// Every child is contained by at most one list at a time. Dropping the list releases its
/// children so they can be added elsewhere.
pub struct AssignmentList<'chunk> {
    id: ListId,
    children: BumpVec<'chunk, &'chunk Assignment<'chunk>>,
}

impl<'chunk> AssignmentList<'chunk> {
    pub fn new(alloc: &'chunk ASTAllocator) -> Self {
        Self {
            id: ListId::fresh(),
            children: alloc.new_vec(),
        }
    }

    /// Build a list from `children`, in iteration order.
    ///
    /// On conflict the children added so far are released again.
    pub fn try_from_iter<I>(
        alloc: &'chunk ASTAllocator,
        children: I,
    ) -> Result<Self, OwnershipConflict>
    where
        I: IntoIterator<Item = &'chunk Assignment<'chunk>>,
    {
        let mut list = Self::new(alloc);
        for child in children {
            list.add(child)?;
        }
        Ok(list)
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    /// Append `child`, taking ownership of it.
    ///
    /// Fails if `child` is already contained in a list, including this one.
    pub fn add(&mut self, child: &'chunk Assignment<'chunk>) -> Result<(), OwnershipConflict> {
        if let Some(owner) = child.owner.get() {
            debug!(%owner, target = %self.id, lhs = %child.lhs, "assignment already owned");
            return Err(OwnershipConflict {
                owner,
                target: self.id,
            });
        }

        child.owner.set(Some(self.id));
        self.children.push(child);
        trace!(
            list = %self.id,
            lhs = %child.lhs,
            len = self.children.len(),
            "added assignment"
        );

        Ok(())
    }

    pub fn children(&self) -> &[&'chunk Assignment<'chunk>] {
        &self.children
    }

    pub fn iter(&self) -> impl Iterator<Item = &'chunk Assignment<'chunk>> + Clone + '_ {
        self.children.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'chunk Assignment<'chunk>> {
        self.children.get(index).copied()
    }

    /// The first assignment binding `name`.
    pub fn find(&self, name: Ident) -> Option<&'chunk Assignment<'chunk>> {
        self.iter().find(|child| child.lhs == name)
    }

    /// Detach `child` if this list contains it, returning the released node.
    ///
    /// Children are matched by identity, not by value.
    pub fn take(&mut self, child: &Assignment<'chunk>) -> Option<&'chunk Assignment<'chunk>> {
        let index = self
            .children
            .iter()
            .position(|candidate| std::ptr::eq(*candidate, child))?;

        let removed = self.children.remove(index);
        removed.owner.set(None);
        trace!(
            list = %self.id,
            lhs = %removed.lhs,
            len = self.children.len(),
            "removed assignment"
        );

        Some(removed)
    }

    pub fn remove(&mut self, child: &Assignment<'chunk>) -> bool {
        self.take(child).is_some()
    }

    /// Detach every child.
    pub fn clear(&mut self) {
        for child in self.children.drain(..) {
            child.owner.set(None);
        }
    }
}

impl Drop for AssignmentList<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl PartialEq for AssignmentList<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| l == r)
    }
}

impl std::fmt::Debug for AssignmentList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl std::fmt::Display for AssignmentList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (idx, child) in self.iter().enumerate() {
            if idx != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", child)?;
        }
        f.write_str(")")
    }
}
