//! Page-backed, append-only allocator backing every node in the routing graph.
//!
//! [`Pool<T>`] never frees a single element; it releases everything at once
//! when dropped. Allocation returns a [`PoolIndex<T>`] rather than a raw
//! pointer: in safe Rust the index is the stable handle, since pages are
//! never reallocated once created and a `PoolIndex` stays valid for the
//! pool's entire lifetime.

use std::marker::PhantomData;
use std::mem::size_of;

/// Default page size in bytes.
pub const DEFAULT_PAGE_BYTES: usize = 512;

/// A stable handle to a value allocated from a [`Pool<T>`].
///
/// Cheap to copy, valid for the pool's lifetime, never reused or invalidated
/// by further allocation.
pub struct PoolIndex<T> {
    page: u32,
    slot: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PoolIndex<T> {
    const fn new(page: u32, slot: u32) -> Self {
        PoolIndex {
            page,
            slot,
            _marker: PhantomData,
        }
    }

    /// The monotonically increasing ordinal of this allocation across the
    /// whole pool, counting every page before this one. Used by
    /// [`crate::strings::StringPool`] to hand out stable string IDs.
    #[must_use]
    pub fn ordinal(&self, page_capacity: usize) -> usize {
        self.page as usize * page_capacity + self.slot as usize
    }
}

impl<T> Clone for PoolIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for PoolIndex<T> {}
impl<T> PartialEq for PoolIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page && self.slot == other.slot
    }
}
impl<T> Eq for PoolIndex<T> {}
impl<T> std::fmt::Debug for PoolIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolIndex")
            .field("page", &self.page)
            .field("slot", &self.slot)
            .finish()
    }
}
impl<T> std::hash::Hash for PoolIndex<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.page.hash(state);
        self.slot.hash(state);
    }
}

/// A snapshot of a [`Pool<T>`]'s usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInfo {
    pub pages: usize,
    pub page_capacity: usize,
    pub len: usize,
    pub bytes: usize,
    pub capacity: usize,
}

/// A generic page-backed arena for `T`.
///
/// Each page is a `Vec<T>` pre-allocated (via `Vec::with_capacity`) to hold
/// `page_bytes / size_of::<T>()` elements (at least one), and is never
/// allowed to grow past that capacity — so a page's backing allocation
/// never moves, and every `&T`/`&mut T` handed out by `get`/`get_mut`
/// remains valid for as long as the `Pool` lives.
pub struct Pool<T> {
    pages: Vec<Vec<T>>,
    page_capacity: usize,
    page_bytes: usize,
}

impl<T> Pool<T> {
    /// Create a pool with the default 512-byte page size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_bytes(DEFAULT_PAGE_BYTES)
    }

    /// Create a pool with a custom page size in bytes.
    #[must_use]
    pub fn with_page_bytes(page_bytes: usize) -> Self {
        let elem_size = size_of::<T>().max(1);
        let page_capacity = (page_bytes / elem_size).max(1);
        Pool {
            pages: Vec::new(),
            page_capacity,
            page_bytes,
        }
    }

    /// Allocate `value` and return a stable index to it.
    ///
    /// `O(1)` amortized: only allocates a new page when the current one is
    /// full, and a request for a single `T` always fits in one page by
    /// construction (`page_capacity >= 1`).
    pub fn alloc(&mut self, value: T) -> PoolIndex<T> {
        if self.pages.last().map_or(true, |p| p.len() == self.page_capacity) {
            self.pages.push(Vec::with_capacity(self.page_capacity));
        }
        let page_idx = self.pages.len() - 1;
        let page = &mut self.pages[page_idx];
        let slot_idx = page.len();
        page.push(value);
        PoolIndex::new(page_idx as u32, slot_idx as u32)
    }

    /// Allocate `n` copies of `value` contiguously and return the index of
    /// the first one.
    ///
    /// Contiguity is guaranteed only when `n <= page_capacity`; larger
    /// requests spill onto a fresh page sized to fit the whole request.
    pub fn alloc_array(&mut self, n: usize, value: T) -> PoolIndex<T>
    where
        T: Clone,
    {
        if n == 0 {
            return self.alloc(value);
        }
        let fits_current = self
            .pages
            .last()
            .map_or(false, |p| self.page_capacity - p.len() >= n);
        if !fits_current {
            let cap = n.max(self.page_capacity);
            self.pages.push(Vec::with_capacity(cap));
        }
        let page_idx = self.pages.len() - 1;
        let page = &mut self.pages[page_idx];
        let slot_idx = page.len();
        for _ in 0..n {
            page.push(value.clone());
        }
        PoolIndex::new(page_idx as u32, slot_idx as u32)
    }

    /// Borrow the value at `index`.
    #[must_use]
    pub fn get(&self, index: PoolIndex<T>) -> &T {
        &self.pages[index.page as usize][index.slot as usize]
    }

    /// Mutably borrow the value at `index`.
    ///
    /// Only meaningful during the build phase, where the router holds
    /// `&mut self`; the resolve phase never calls this.
    pub fn get_mut(&mut self, index: PoolIndex<T>) -> &mut T {
        &mut self.pages[index.page as usize][index.slot as usize]
    }

    /// Total elements allocated so far across all pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes actually occupied by allocated elements.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.len() * size_of::<T>()
    }

    /// Total byte capacity across all allocated pages (used + unused).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pages.len() * self.page_capacity * size_of::<T>()
    }

    /// Remaining unused byte capacity in already-allocated pages.
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity() - self.bytes()
    }

    /// A snapshot of pool usage.
    #[must_use]
    pub fn info(&self) -> PoolInfo {
        PoolInfo {
            pages: self.pages.len(),
            page_capacity: self.page_capacity,
            len: self.len(),
            bytes: self.bytes(),
            capacity: self.capacity(),
        }
    }

    #[must_use]
    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    #[must_use]
    pub fn page_bytes(&self) -> usize {
        self.page_bytes
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
