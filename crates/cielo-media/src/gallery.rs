//! Author/date filtering and page buttons over a fixed card list.

use serde::{Deserialize, Serialize};

use crate::pager::Pagination;

pub const GALLERY_PAGE_SIZE: usize = 16;

/// One gallery entry. Only `hidden` changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub author: String,
    /// `YYYY-MM-DD`, compared by prefix.
    pub date: String,
    #[serde(default)]
    pub display_date: String,
    pub image_url: String,
    #[serde(skip)]
    hidden: bool,
}

impl ImageCard {
    pub fn new(
        author: impl Into<String>,
        date: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            date: date.into(),
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthorFilter {
    #[default]
    All,
    /// Normalized (trimmed, lowercase) author name.
    Named(String),
}

impl AuthorFilter {
    pub fn matches(&self, author: &str) -> bool {
        match self {
            AuthorFilter::All => true,
            AuthorFilter::Named(name) => normalize(author) == *name,
        }
    }
}

impl From<&str> for AuthorFilter {
    fn from(value: &str) -> Self {
        match normalize(value) {
            v if v.is_empty() || v == "all" => AuthorFilter::All,
            v => AuthorFilter::Named(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub author: AuthorFilter,
    pub date: String,
    pub current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            author: AuthorFilter::All,
            date: String::new(),
            current_page: 1,
        }
    }
}

impl FilterState {
    pub fn matches(&self, card: &ImageCard) -> bool {
        self.author.matches(&card.author) && card.date.starts_with(self.date.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub page: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaginationControl {
    /// One page or fewer: nothing is rendered.
    #[default]
    Hidden,
    Buttons(Vec<PageButton>),
}

impl PaginationControl {
    fn render(pages: &Pagination, current: usize) -> Self {
        let total = pages.total_pages();
        if total <= 1 {
            return PaginationControl::Hidden;
        }
        PaginationControl::Buttons(
            (1..=total)
                .map(|page| PageButton {
                    page,
                    active: page == current,
                })
                .collect(),
        )
    }

    pub fn buttons(&self) -> &[PageButton] {
        match self {
            PaginationControl::Hidden => &[],
            PaginationControl::Buttons(buttons) => buttons,
        }
    }
}

/// Owns the cards of one gallery and its filter state.
#[derive(Debug, Clone)]
pub struct GalleryBrowser {
    cards: Vec<ImageCard>,
    filter: FilterState,
    match_count: usize,
    control: PaginationControl,
}

impl GalleryBrowser {
    /// Take ownership of the cards and show the first page, unfiltered.
    pub fn new(cards: Vec<ImageCard>) -> Self {
        let mut browser = Self {
            cards,
            filter: FilterState::default(),
            match_count: 0,
            control: PaginationControl::Hidden,
        };
        browser.apply_filters(1);
        browser
    }

    pub fn cards(&self) -> &[ImageCard] {
        &self.cards
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn control(&self) -> &PaginationControl {
        &self.control
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.match_count, GALLERY_PAGE_SIZE)
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &ImageCard> {
        self.cards.iter().filter(|card| !card.hidden)
    }

    /// Recompute every card's visibility for `page` under the current filters.
    pub fn apply_filters(&mut self, page: i64) {
        let matched: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| self.filter.matches(card))
            .map(|(i, _)| i)
            .collect();

        let pages = Pagination::new(matched.len(), GALLERY_PAGE_SIZE);
        let current = pages.clamp(page);
        let shown = &matched[pages.range(page)];

        for card in &mut self.cards {
            card.hidden = true;
        }
        for &i in shown {
            self.cards[i].hidden = false;
        }

        self.match_count = matched.len();
        self.filter.current_page = current;
        self.control = PaginationControl::render(&pages, current);
        tracing::trace!(matched = self.match_count, page = current, "gallery filtered");
    }

    pub fn set_author(&mut self, author: &str) {
        self.filter.author = AuthorFilter::from(author);
        self.apply_filters(1);
    }

    pub fn set_date(&mut self, date: &str) {
        self.filter.date = date.trim().to_owned();
        self.apply_filters(1);
    }

    pub fn go_to_page(&mut self, page: i64) {
        self.apply_filters(page);
    }

    pub fn reset(&mut self) {
        self.filter = FilterState::default();
        self.apply_filters(1);
    }
}
