//! Pagination engine
//!
//! Fixed-size pages over an ordered sequence, with a bounded page cursor.
//! Pages are 1-based; an empty sequence has zero pages.

use std::ops::Range;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Number of pages needed for `count` items
///
/// Returns 0 for an empty sequence or a zero page size.
#[inline]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// One page of an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    items: &'a [T],
    number: usize,
    total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    /// Items on this page, in order
    #[inline]
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    /// 1-based page number
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Total number of pages in the sequence
    #[inline]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of items on this page
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice one page out of an ordered sequence
///
/// # Errors
///
/// Returns [`Error::PageOutOfRange`] unless `1 <= page <= total_pages`.
/// Callers are expected to validate navigation first (see [`Pager`]).
pub fn paginate<T>(ordered: &[T], page_size: usize, page: usize) -> Result<Page<'_, T>> {
    let total = total_pages(ordered.len(), page_size);
    if page == 0 || page > total {
        return Err(Error::PageOutOfRange {
            page,
            total_pages: total,
        });
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(ordered.len());
    Ok(Page {
        items: &ordered[start..end],
        number: page,
        total_pages: total,
    })
}

/// Page cursor with bounds checking
///
/// Navigation outside `[1, total_pages]` is ignored rather than clamped
/// silently, so callers can tell whether a request took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Current page, 0 only when there are no pages
    current: usize,
    /// Items per page (at least 1)
    page_size: usize,
    /// Items in the underlying sequence
    total_items: usize,
}

impl Pager {
    /// Create a pager positioned on the first page
    ///
    /// # Arguments
    /// * `total_items` - Length of the ordered sequence
    /// * `page_size` - Items per page; 0 is raised to 1
    pub fn new(total_items: usize, page_size: usize) -> Self {
        let mut pager = Self {
            current: 1,
            page_size: page_size.max(1),
            total_items,
        };
        pager.clamp();
        pager
    }

    /// Current page (1-based, 0 when empty)
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Items per page
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Items in the underlying sequence
    #[inline]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Total number of pages
    #[inline]
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Move to a page; returns `false` and leaves the cursor alone if out of range
    pub fn go_to(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        if page == 0 || page > total {
            warn!(page, total_pages = total, "page request out of range ignored");
            return false;
        }
        self.current = page;
        true
    }

    /// Move to the next page if there is one
    pub fn next(&mut self) -> bool {
        self.can_next() && self.go_to(self.current + 1)
    }

    /// Move to the previous page if there is one
    pub fn prev(&mut self) -> bool {
        self.can_prev() && self.go_to(self.current - 1)
    }

    /// Jump to the first page
    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    /// Jump to the last page
    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages())
    }

    /// Whether a previous page exists (drives the "Prev" button)
    #[inline]
    pub fn can_prev(&self) -> bool {
        self.current > 1
    }

    /// Whether a next page exists (drives the "Next" button)
    #[inline]
    pub fn can_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Update the sequence length, clamping the current page
    pub fn set_total_items(&mut self, total: usize) {
        self.total_items = total;
        self.clamp();
    }

    /// Update the page size, clamping the current page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp();
    }

    /// Offsets of the current page within the ordered sequence
    pub fn range(&self) -> Range<usize> {
        if self.current == 0 {
            return 0..0;
        }
        let start = (self.current - 1) * self.page_size;
        start..(start + self.page_size).min(self.total_items)
    }

    /// Page containing the item at `index`, if it exists
    pub fn page_of(&self, index: usize) -> Option<usize> {
        (index < self.total_items).then(|| index / self.page_size + 1)
    }

    /// Slice the current page out of the ordered sequence
    ///
    /// Yields an empty page when there are no pages.
    pub fn page<'a, T>(&self, ordered: &'a [T]) -> Page<'a, T> {
        paginate(ordered, self.page_size, self.current).unwrap_or(Page {
            items: &[],
            number: self.current,
            total_pages: self.total_pages(),
        })
    }

    /// Pager text, e.g. `"Page 2 of 7"`
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total_pages())
    }

    fn clamp(&mut self) {
        let total = self.total_pages();
        let clamped = self.current.clamp(1.min(total), total);
        if clamped != self.current {
            debug!(from = self.current, to = clamped, "current page clamped");
            self.current = clamped;
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(0, 1)
    }
}
