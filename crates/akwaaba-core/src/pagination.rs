//! Page slicing and page-number windows for list endpoints.

use serde::Serialize;

/// Width of the page-number window shown to clients.
pub const PAGE_WINDOW: u32 = 7;

/// One page of a larger result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Items across all pages.
    pub total: usize,
    /// Number of pages (at least 1).
    pub pages: u32,
    /// Page numbers to offer for navigation.
    pub window: Vec<u32>,
}

impl<T> Page<T> {
    /// Slices `items` into page `page`.
    ///
    /// With `clamp` set, a page beyond the end serves the last page;
    /// otherwise it serves an empty page with the requested number.
    pub fn from_vec(items: Vec<T>, page: u32, per_page: u32, clamp: bool) -> Self {
        let per_page = per_page.max(1);
        let total = items.len();
        let pages = page_count(total, per_page);
        let page = if clamp {
            page.clamp(1, pages)
        } else {
            page.max(1)
        };

        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let items: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Self {
            items,
            page,
            per_page,
            total,
            pages,
            window: page_window(page, pages, PAGE_WINDOW),
        }
    }

    /// Maps the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            pages: self.pages,
            window: self.window,
        }
    }
}

/// Number of pages needed for `total` items, never less than one.
pub fn page_count(total: usize, per_page: u32) -> u32 {
    let per_page = per_page.max(1) as usize;
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Up to `width` consecutive page numbers centred on `current`.
pub fn page_window(current: u32, pages: u32, width: u32) -> Vec<u32> {
    let pages = pages.max(1);
    let width = width.clamp(1, pages);
    let current = current.clamp(1, pages);

    let half = width / 2;
    let mut start = current.saturating_sub(half).max(1);
    if start + width - 1 > pages {
        start = pages - width + 1;
    }
    (start..start + width).collect()
}
