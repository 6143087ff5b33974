//! The media insertion panel.
//!
//! One panel per form. It lazily lists the scope's uploaded images, uploads
//! new ones from a file pick or a drop, tracks which URLs are selected, and on
//! confirmation hands image markup to the editor registered for its form.
//!
//! Network failures never change panel state; they are logged and the
//! operation simply does not progress.

use cielo_editor_core::{EditorPlatform, EditorRegistry, FormId};

use crate::backend::{MediaBackend, UploadFile};
use crate::fragment::build_insertion;
use crate::pager::Pagination;
use cielo_common::MediaScope;

pub const MEDIA_PAGE_SIZE: usize = 20;
pub const PREVIOUS_LABEL: &str = "Anterior";
pub const NEXT_LABEL: &str = "Siguiente";

/// Selected URLs, unique, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedUrls(Vec<String>);

impl SelectedUrls {
    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|u| u == url)
    }

    /// Flip membership. Returns whether `url` is selected afterwards.
    pub fn toggle(&mut self, url: &str) -> bool {
        match self.0.iter().position(|u| u == url) {
            Some(i) => {
                self.0.remove(i);
                false
            }
            None => {
                self.0.push(url.to_owned());
                true
            }
        }
    }

    /// Add `url` unless already present. Returns whether it was added.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.0.push(url.to_owned());
        true
    }

    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.0.retain(keep);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// The panel's file input control.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    files: Vec<UploadFile>,
}

impl FileInput {
    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn set(&mut self, files: Vec<UploadFile>) {
        self.files = files;
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// What the control displays: the first picked file's name, or nothing.
    pub fn value(&self) -> &str {
        self.files.first().map(|f| f.name.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelItem {
    pub url: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerView {
    pub current: usize,
    pub total: usize,
    pub label: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

/// Everything a host needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub visible: bool,
    pub dragging: bool,
    pub items: Vec<PanelItem>,
    pub pager: PagerView,
    pub insert_enabled: bool,
}

pub struct MediaInsertionPanel<B> {
    backend: B,
    scope: MediaScope,
    form: FormId,
    visible: bool,
    dragging: bool,
    load_requested: bool,
    loaded: bool,
    images: Vec<String>,
    selected: SelectedUrls,
    current_page: usize,
    file_input: FileInput,
}

impl<B: MediaBackend> MediaInsertionPanel<B> {
    pub fn new(backend: B, scope: MediaScope, form: FormId) -> Self {
        Self {
            backend,
            scope,
            form,
            visible: false,
            dragging: false,
            load_requested: false,
            loaded: false,
            images: Vec::new(),
            selected: SelectedUrls::default(),
            current_page: 1,
            file_input: FileInput::default(),
        }
    }

    /// Start from an already known list, as if a listing had succeeded.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.replace_images(images);
        self.loaded = true;
        self.load_requested = true;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scope(&self) -> &MediaScope {
        &self.scope
    }

    pub fn form(&self) -> &FormId {
        &self.form
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn selected(&self) -> &SelectedUrls {
        &self.selected
    }

    pub fn file_input(&self) -> &FileInput {
        &self.file_input
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.images.len(), MEDIA_PAGE_SIZE)
    }

    pub fn insert_enabled(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Show or hide the panel. The first reveal loads the image list; later
    /// reveals reuse it. Returns the new visibility.
    pub async fn toggle_panel(&mut self) -> bool {
        self.visible = !self.visible;
        if self.visible && !self.load_requested {
            self.load_requested = true;
            self.load_images().await;
        }
        self.visible
    }

    pub async fn load_images(&mut self) {
        if self.scope.is_unset() {
            tracing::debug!(form = %self.form, "media scope unset, not listing");
            return;
        }
        match self.backend.list(&self.scope).await {
            Ok(images) => {
                tracing::debug!(scope = %self.scope, count = images.len(), "media listed");
                self.replace_images(images);
                self.current_page = 1;
                self.loaded = true;
            }
            Err(error) => {
                tracing::warn!(scope = %self.scope, %error, "media listing failed");
            }
        }
    }

    /// Upload files and take the returned list. State changes only once the
    /// backend has confirmed the upload.
    pub async fn upload_files(&mut self, files: Vec<UploadFile>) {
        if files.is_empty() {
            tracing::debug!("no files to upload");
            return;
        }
        if self.scope.is_unset() {
            tracing::debug!(form = %self.form, "media scope unset, not uploading");
            return;
        }
        match self.backend.upload(&self.scope, &files).await {
            Ok(images) => {
                tracing::info!(scope = %self.scope, uploaded = files.len(), "media uploaded");
                self.selected.clear();
                self.replace_images(images);
                self.current_page = self.pagination().clamp(self.current_page as i64);
                self.file_input.clear();
            }
            Err(error) => {
                tracing::warn!(scope = %self.scope, %error, "media upload failed");
            }
        }
    }

    /// Files chosen through the file input.
    pub async fn pick_files(&mut self, files: Vec<UploadFile>) {
        self.file_input.set(files.clone());
        self.upload_files(files).await;
    }

    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Dropped files take the same path as picked ones.
    pub async fn drop_files(&mut self, files: Vec<UploadFile>) {
        self.dragging = false;
        self.pick_files(files).await;
    }

    /// Flip selection of a listed image. Unknown URLs are ignored.
    pub fn toggle_selection(&mut self, url: &str) -> bool {
        if !self.images.iter().any(|u| u == url) {
            tracing::debug!(%url, "ignoring selection of unlisted image");
            return false;
        }
        self.selected.toggle(url)
    }

    /// Select a listed image, leaving it selected if it already was.
    /// Returns false for URLs the panel does not list.
    pub fn select(&mut self, url: &str) -> bool {
        if !self.images.iter().any(|u| u == url) {
            tracing::debug!(%url, "ignoring selection of unlisted image");
            return false;
        }
        self.selected.insert(url);
        true
    }

    pub fn go_to_page(&mut self, page: i64) {
        self.current_page = self.pagination().clamp(page);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page as i64 + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page as i64 - 1);
    }

    /// Markup that confirming would insert, if anything is selected.
    pub fn pending_markup(&self) -> Option<String> {
        if self.selected.is_empty() {
            return None;
        }
        Some(build_insertion(self.selected.iter()))
    }

    /// Insert the selected images into this form's editor and clear the
    /// selection. Without a selection or a bound editor nothing changes.
    pub fn confirm_insert<P: EditorPlatform>(&mut self, editors: &mut EditorRegistry<P>) -> bool {
        let Some(html) = self.pending_markup() else {
            tracing::debug!("nothing selected to insert");
            return false;
        };
        if !editors.insert_into(&self.form, &html) {
            return false;
        }
        tracing::debug!(form = %self.form, count = self.selected.len(), "images inserted");
        self.selected.clear();
        true
    }

    pub fn view(&self) -> PanelView {
        let pages = self.pagination();
        let current = pages.clamp(self.current_page as i64);
        let total = pages.total_pages();
        let items = self.images[pages.range(current as i64)]
            .iter()
            .map(|url| PanelItem {
                url: url.clone(),
                selected: self.selected.contains(url),
            })
            .collect();
        PanelView {
            visible: self.visible,
            dragging: self.dragging,
            items,
            pager: PagerView {
                current,
                total,
                label: format!("Página {current} de {total}"),
                previous_enabled: pages.has_previous(current),
                next_enabled: pages.has_next(current),
            },
            insert_enabled: self.insert_enabled(),
        }
    }

    /// Take a fresh list, dropping selections that are no longer listed.
    fn replace_images(&mut self, images: Vec<String>) {
        self.selected.retain(|url| images.contains(url));
        self.images = images;
    }
}
