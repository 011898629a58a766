//! ChunkedStore: growable array of fixed-size records with lazy pages.
//!
//! The map's backing store. Records live in fixed-size pages that are only
//! materialized on first write, so a sparse table does not pay memory for
//! regions no probe chain ever touched. Reads distinguish "this index was
//! never materialized" (`None`) from a stored default value; the map relies
//! on that distinction to tell a fresh slot apart from a tombstone.

/// Records per page. Power of two so page/offset math stays shift-and-mask.
const PAGE_LEN: usize = 64;

/// A growable array of `T` with a default fill value and lazily materialized
/// pages. Access is O(1); `set` stores the full record by value.
#[derive(Debug)]
pub struct ChunkedStore<T> {
    pages: Vec<Option<Box<[T]>>>,
    default: T,
    len: usize,
}

impl<T: Clone> ChunkedStore<T> {
    /// Create a store with `len` addressable records, none materialized yet.
    /// Pages fill with clones of `default` when first written.
    pub fn new(len: usize, default: T) -> Self {
        Self {
            pages: Vec::new(),
            default,
            len,
        }
    }

    /// Number of addressable records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True iff the page holding `index` has been materialized.
    pub fn is_allocated(&self, index: usize) -> bool {
        index < self.len
            && self
                .pages
                .get(index / PAGE_LEN)
                .map(Option::is_some)
                .unwrap_or(false)
    }

    /// Read the record at `index`. `None` means out of range or never
    /// materialized, not "holds the default value".
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.pages
            .get(index / PAGE_LEN)?
            .as_ref()
            .map(|page| &page[index % PAGE_LEN])
    }

    /// Mutable access with the same never-materialized contract as `get`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        self.pages
            .get_mut(index / PAGE_LEN)?
            .as_mut()
            .map(|page| &mut page[index % PAGE_LEN])
    }

    /// Store `value` at `index`, materializing the page if needed.
    ///
    /// Panics if `index` is out of range; callers derive indices from the
    /// store's own length (the map masks by capacity), so an out-of-range
    /// write is a logic error, not a recoverable condition.
    pub fn set(&mut self, index: usize, value: T) {
        assert!(
            index < self.len,
            "store index {} out of range {}",
            index,
            self.len
        );
        let page_index = index / PAGE_LEN;
        if page_index >= self.pages.len() {
            self.pages.resize_with(page_index + 1, || None);
        }
        let page = self.pages[page_index]
            .get_or_insert_with(|| vec![self.default.clone(); PAGE_LEN].into_boxed_slice());
        page[index % PAGE_LEN] = value;
    }

    /// Extend the addressable range. Existing pages are untouched; the new
    /// index space starts never-materialized. The store never shrinks.
    pub fn grow(&mut self, new_len: usize) {
        if new_len > self.len {
            self.len = new_len;
        }
    }
}
