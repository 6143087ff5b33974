use std::ops::Range;

/// Page math shared by the gallery and the media panel.
///
/// Pages are 1-based. Requested pages are clamped into
/// `1..=total_pages()`, and there is always at least one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_items: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            total_items,
            page_size: page_size.max(1),
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn clamp(&self, page: i64) -> usize {
        if page < 1 {
            return 1;
        }
        // Pages past usize::MAX on narrow targets still mean "the last one".
        usize::try_from(page)
            .unwrap_or(usize::MAX)
            .min(self.total_pages())
    }

    /// Item indices shown on `page` after clamping.
    pub fn range(&self, page: i64) -> Range<usize> {
        let page = self.clamp(page);
        let start = ((page - 1) * self.page_size).min(self.total_items);
        let end = (page * self.page_size).min(self.total_items);
        start..end
    }

    pub fn has_previous(&self, page: usize) -> bool {
        page > 1
    }

    pub fn has_next(&self, page: usize) -> bool {
        page < self.total_pages()
    }
}
