//! Image browsing and insertion for the site's authoring pages.
//!
//! - [`GalleryBrowser`] filters a fixed list of photo cards by author and
//!   date and pages through the matches.
//! - [`MediaInsertionPanel`] lists and uploads images for a [`MediaScope`]
//!   through a [`MediaBackend`] and inserts the selected ones into the editor
//!   registered for its form.

pub mod backend;
pub mod cards;
pub mod error;
pub mod fragment;
pub mod gallery;
#[cfg(feature = "http")]
pub mod http;
pub mod pager;
pub mod panel;

pub use backend::{MediaBackend, MediaListing, UploadFile};
pub use cards::{PhotoRecord, author_options};
pub use error::MediaError;
pub use fragment::{build_fragment, build_insertion};
pub use gallery::{
    AuthorFilter, FilterState, GALLERY_PAGE_SIZE, GalleryBrowser, ImageCard, PageButton,
    PaginationControl,
};
#[cfg(feature = "http")]
pub use http::HttpMediaBackend;
pub use pager::Pagination;
pub use panel::{FileInput, MEDIA_PAGE_SIZE, MediaInsertionPanel, PanelView, SelectedUrls};
pub use cielo_common::MediaScope;
