//=========================================================================
// Identity Pool
//=========================================================================
//
// Issues and recycles 64-bit object identities.
//
// Lifecycle of an identity:
//   allocate() → live → release() → quarantine → commit() → free list
//
// Released identities sit in quarantine until the owning registry
// reaches its end-of-frame reconciliation, so a handle released in
// frame N is never handed out again before frame N+1.
//
// Reuse order is FIFO by release order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::fmt;

use log::{trace, warn};

//=== ObjectId ============================================================

/// Opaque handle identifying a runtime object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Raw integer value of the handle.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== IdentityPool ========================================================

/// Allocator for [`ObjectId`]s with a quarantined free list.
#[derive(Debug, Default)]
pub struct IdentityPool {
    next: u64,
    free: VecDeque<ObjectId>,
    quarantine: Vec<ObjectId>,
}

impl IdentityPool {
    /// Creates an empty pool starting at identity 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the oldest committed free identity, or a fresh one.
    pub fn allocate(&mut self) -> ObjectId {
        if let Some(id) = self.free.pop_front() {
            trace!("Reusing identity {}", id);
            return id;
        }

        let id = ObjectId(self.next);
        self.next += 1;
        id
    }

    /// Returns `id` to the pool. It becomes reusable after [`commit`](Self::commit).
    ///
    /// Double releases and identities this pool never issued are logged
    /// and ignored.
    pub fn release(&mut self, id: ObjectId) {
        if id.0 >= self.next {
            warn!("Release of identity {} which was never allocated, ignoring", id);
            return;
        }

        if self.quarantine.contains(&id) || self.free.contains(&id) {
            warn!("Identity {} released twice, ignoring", id);
            return;
        }

        self.quarantine.push(id);
    }

    /// Moves quarantined identities onto the free list.
    pub fn commit(&mut self) {
        self.free.extend(self.quarantine.drain(..));
    }

    /// Number of identities ready for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of identities released but not yet committed.
    pub fn pending_count(&self) -> usize {
        self.quarantine.len()
    }

    /// Number of identities ever minted (live or not).
    pub fn minted(&self) -> u64 {
        self.next
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
