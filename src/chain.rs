//! Singly-linked entity chains
//!
//! Entities of one type link into forward-only chains through an owned
//! `next` relation.  Ownership of the tail travels with the node, so a
//! node can only be released once it is detached; handing a still-linked
//! node to [`dispose`] is a caller error and the node is returned
//! untouched rather than freed.

use crate::diagnostics::{DiagnosticKind, DiagnosticSink, SourceLocation};
use crate::error::{DxfError, Result};

/// A record type that owns a forward link to the next record of the
/// same type.
pub trait Chained: Sized {
    /// The next node in the chain, if any.
    fn next(&self) -> Option<&Self>;

    /// The owned forward-link slot.
    fn next_slot(&mut self) -> &mut Option<Box<Self>>;

    /// Detach and return the tail.
    fn take_next(&mut self) -> Option<Box<Self>> {
        self.next_slot().take()
    }

    /// Attach a node as the tail.  Fails when a tail is already
    /// attached; silently dropping the old tail would tear down the
    /// rest of the chain.
    fn set_next(&mut self, node: Box<Self>) -> Result<()> {
        if self.next().is_some() {
            return Err(DxfError::ChainedDispose);
        }
        *self.next_slot() = Some(node);
        Ok(())
    }

    /// Whether this node still owns a tail.
    fn is_linked(&self) -> bool {
        self.next().is_some()
    }
}

/// Linear traversal to the final node; a single detached node returns
/// itself.
pub fn last<T: Chained>(head: &T) -> &T {
    let mut cur = head;
    while let Some(next) = cur.next() {
        cur = next;
    }
    cur
}

/// Release a whole chain, detaching each node's tail before the node
/// itself is dropped so teardown stays iterative on long chains.
/// An empty chain is a no-op with a note diagnostic.  Returns the
/// number of nodes released.
pub fn free_list<T: Chained>(head: Option<Box<T>>, diags: &mut DiagnosticSink) -> usize {
    if head.is_none() {
        diags.report(
            DiagnosticKind::Note,
            "free_list called on an empty chain",
            SourceLocation::default(),
        );
        return 0;
    }

    let mut count = 0;
    let mut cur = head;
    while let Some(mut node) = cur {
        cur = node.take_next();
        count += 1;
    }
    count
}

/// Release a single detached instance.
///
/// A node whose `next` is still populated is handed back untouched with
/// the error; releasing it directly would orphan the remainder of the
/// chain.
pub fn dispose<T: Chained>(node: Box<T>) -> std::result::Result<(), (Box<T>, DxfError)> {
    if node.is_linked() {
        return Err((node, DxfError::ChainedDispose));
    }
    drop(node);
    Ok(())
}

/// An owning chain head with append-order traversal.
pub struct Chain<T: Chained> {
    head: Option<Box<T>>,
    len: usize,
}

impl<T: Chained> Chain<T> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of nodes in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Append a detached node at the tail.
    pub fn push_back(&mut self, node: Box<T>) -> Result<()> {
        if node.is_linked() {
            return Err(DxfError::ChainedDispose);
        }
        let mut slot = &mut self.head;
        while let Some(existing) = slot {
            slot = existing.next_slot();
        }
        *slot = Some(node);
        self.len += 1;
        Ok(())
    }

    /// The first node.
    pub fn first(&self) -> Option<&T> {
        self.head.as_deref()
    }

    /// The final node, by linear traversal.
    pub fn last(&self) -> Option<&T> {
        self.head.as_deref().map(last)
    }

    /// Detach and return the first node.
    pub fn pop_front(&mut self) -> Option<Box<T>> {
        let mut node = self.head.take()?;
        self.head = node.take_next();
        self.len -= 1;
        Some(node)
    }

    /// Iterate in append order.
    pub fn iter(&self) -> ChainIter<'_, T> {
        ChainIter {
            cur: self.head.as_deref(),
        }
    }
}

impl<T: Chained> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Chained> Drop for Chain<T> {
    fn drop(&mut self) {
        // iterative teardown, no recursive Drop on long chains
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.take_next();
        }
    }
}

/// Forward iterator over a chain.
pub struct ChainIter<'a, T: Chained> {
    cur: Option<&'a T>,
}

impl<'a, T: Chained> Iterator for ChainIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.cur?;
        self.cur = node.next();
        Some(node)
    }
}

impl<'a, T: Chained> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = ChainIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
