//! Sort system.
//!
//! Sorts are hash-consed like terms: each distinct [`SortKind`] gets exactly
//! one [`SortId`].

use lasso::Spur;
use rustc_hash::FxHashMap;

/// Unique identifier for a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortId(pub u32);

impl SortId {
    /// Create a sort identifier from its raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index of this sort.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The kind of a sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Boolean sort.
    Bool,
    /// Mathematical integers.
    Int,
    /// An uninterpreted sort, identified by its name.
    Uninterpreted(Spur),
}

/// A sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Identifier of this sort.
    pub id: SortId,
    /// Kind of this sort.
    pub kind: SortKind,
}

/// Owner of all sorts.
#[derive(Debug)]
pub struct SortManager {
    sorts: Vec<Sort>,
    cache: FxHashMap<SortKind, SortId>,
    /// The boolean sort.
    pub bool_sort: SortId,
    /// The integer sort.
    pub int_sort: SortId,
}

impl SortManager {
    /// Create a sort manager with the built-in sorts registered.
    pub fn new() -> Self {
        let mut manager = Self {
            sorts: Vec::new(),
            cache: FxHashMap::default(),
            bool_sort: SortId(0),
            int_sort: SortId(0),
        };
        manager.bool_sort = manager.intern(SortKind::Bool);
        manager.int_sort = manager.intern(SortKind::Int);
        manager
    }

    fn intern(&mut self, kind: SortKind) -> SortId {
        if let Some(&id) = self.cache.get(&kind) {
            return id;
        }
        let id = SortId(self.sorts.len() as u32);
        self.sorts.push(Sort {
            id,
            kind: kind.clone(),
        });
        self.cache.insert(kind, id);
        id
    }

    /// Get or create the uninterpreted sort with the given (interned) name.
    pub fn mk_uninterpreted(&mut self, name: Spur) -> SortId {
        self.intern(SortKind::Uninterpreted(name))
    }

    /// Look up a sort.
    pub fn get(&self, id: SortId) -> Option<&Sort> {
        self.sorts.get(id.0 as usize)
    }

    /// Check whether `id` is the boolean sort.
    pub fn is_bool(&self, id: SortId) -> bool {
        id == self.bool_sort
    }

    /// Check whether `id` is the integer sort.
    pub fn is_int(&self, id: SortId) -> bool {
        id == self.int_sort
    }

    /// Number of registered sorts.
    pub fn len(&self) -> usize {
        self.sorts.len()
    }

    /// Always false: the built-in sorts are registered on creation.
    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }
}

impl Default for SortManager {
    fn default() -> Self {
        Self::new()
    }
}
