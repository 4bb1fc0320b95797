//! Entity handles

use std::fmt;

/// Non-owning handle to an entity in the world registry.
///
/// Holding an `EntityId` says nothing about whether the entity is still alive;
/// callers re-validate through the registry before each use.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Handle that never refers to a live entity
    pub const NULL: Self = Self(u32::MAX);

    /// Create a handle from a raw index
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is the null handle
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Hands out unique entity handles. Handles are never reused.
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u32,
}

impl EntityIdAllocator {
    /// Create a new allocator starting at index 0
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate the next handle
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        // u32::MAX is reserved for NULL
        self.next = self.next.saturating_add(1).min(u32::MAX - 1);
        id
    }

    /// Number of handles allocated so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}
