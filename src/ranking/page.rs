pub const PAGE_SIZE: usize = 50;

/// One display page of a view.
#[derive(Debug, PartialEq)]
pub struct Page<'a, R> {
    pub items: &'a [R],
    pub page_number: usize,
    pub total_pages: usize,
    /// 0-based, inclusive.
    pub start_index: usize,
    /// 0-based, exclusive, never past the end of the view.
    pub end_index: usize,
    pub total_items: usize,
}

impl<R> Page<'_, R> {
    /// 1-based bounds for "Showing X to Y of Z"; `(0, 0)` when nothing shows.
    pub fn display_bounds(&self) -> (usize, usize) {
        if self.items.is_empty() {
            (0, 0)
        } else {
            (self.start_index + 1, self.end_index)
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    ((len + page_size - 1) / page_size).max(1)
}

/// Slices `view` into page `page_number` (1-based). Pages outside
/// `[1, total_pages]` come back empty rather than clamped.
pub fn paginate<R>(view: &[R], page_size: usize, page_number: usize) -> Page<'_, R> {
    let page_size = page_size.max(1);
    let len = view.len();
    let offset = page_number
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
        .unwrap_or(len)
        .min(len);
    let end = offset.saturating_add(page_size).min(len);

    Page {
        items: &view[offset..end],
        page_number,
        total_pages: total_pages(len, page_size),
        start_index: offset,
        end_index: end,
        total_items: len,
    }
}
