//! Notes: titled, ordered collections of pages.

use crate::page::Page;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the pages of a note are laid out by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Pages,
    Infinite,
    InfiniteDown,
}

impl LayoutMode {
    /// Index used by the persisted record.
    pub fn index(self) -> u8 {
        match self {
            LayoutMode::Pages => 0,
            LayoutMode::Infinite => 1,
            LayoutMode::InfiniteDown => 2,
        }
    }

    /// Layout for a persisted index. Unknown values fall back to `Pages`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => LayoutMode::Infinite,
            2 => LayoutMode::InfiniteDown,
            _ => LayoutMode::Pages,
        }
    }
}

/// A note. Always holds at least one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub layout: LayoutMode,
    current_page: usize,
    pages: Vec<Page>,
    pub filter_id: Option<String>,
}

impl Note {
    /// Create a note with a fresh id and one empty page.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title)
    }

    /// Create a note with a known id and one empty page.
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            layout: LayoutMode::default(),
            current_page: 0,
            pages: vec![Page::new()],
            filter_id: None,
        }
    }

    /// Rebuild a note from stored parts. An empty page list gets one empty page
    /// and the current page is clamped.
    pub fn from_parts(
        id: impl Into<String>,
        title: impl Into<String>,
        layout: LayoutMode,
        current_page: usize,
        mut pages: Vec<Page>,
        filter_id: Option<String>,
    ) -> Self {
        if pages.is_empty() {
            pages.push(Page::new());
        }
        let current_page = current_page.min(pages.len() - 1);
        Self {
            id: id.into(),
            title: title.into(),
            layout,
            current_page,
            pages,
            filter_id,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    /// Page the user is working on. Non-paged layouts always edit the first page.
    pub fn current_page(&self) -> &Page {
        &self.pages[self.editing_index()]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        let idx = self.editing_index();
        &mut self.pages[idx]
    }

    /// Select the current page. Out-of-range indices are clamped.
    pub fn set_current_page(&mut self, index: usize) {
        self.current_page = index.min(self.pages.len() - 1);
    }

    /// Append an empty page and return its index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::new());
        self.pages.len() - 1
    }

    /// Move a page one slot up or down. Returns false if the move is out of range.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.pages.len() || to >= self.pages.len() || from.abs_diff(to) != 1 {
            return false;
        }
        self.pages.swap(from, to);
        if self.current_page == from {
            self.current_page = to;
        } else if self.current_page == to {
            self.current_page = from;
        }
        true
    }

    /// Delete a page. The last remaining page is never deleted.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }
        self.pages.remove(index);
        if self.current_page > index || self.current_page >= self.pages.len() {
            self.current_page = self.current_page.saturating_sub(1);
        }
        true
    }

    fn editing_index(&self) -> usize {
        match self.layout {
            LayoutMode::Pages => self.current_page,
            LayoutMode::Infinite | LayoutMode::InfiniteDown => 0,
        }
    }
}
