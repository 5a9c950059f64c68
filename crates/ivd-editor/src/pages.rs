//! Multi-page documents.
//!
//! Only the current page lives in the scene. The others are stored as
//! serialized snapshots; switching writes the live scene back into its
//! slot, then loads the incoming one. History is per page and is dropped
//! on every switch.

use crate::editor::Editor;
use crate::error::{EditorError, Notice};
use ivd_core::{SceneAdapter, SceneSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    pub data: SceneSnapshot,
}

impl Page {
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: SceneSnapshot::empty(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<Page>,
    current: Option<usize>,
}

impl Document {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn check(&self, index: usize) -> Result<(), EditorError> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(EditorError::PageOutOfRange {
                index,
                len: self.pages.len(),
            })
        }
    }
}

impl<S: SceneAdapter> Editor<S> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current_page(&self) -> Option<usize> {
        self.document.current
    }

    /// Replace the whole document and show its first page. An empty list
    /// becomes a single blank page.
    ///
    /// If the first page cannot be loaded nothing changes: the previous
    /// document stays current and keeps owning the live scene.
    pub fn load_document(&mut self, pages: Vec<Page>) -> Result<(), EditorError> {
        self.settle_transient_modes();
        let pages = if pages.is_empty() {
            vec![Page::blank("Page 1")]
        } else {
            pages
        };
        self.show_page(&pages[0])?;
        self.document = Document {
            pages,
            current: Some(0),
        };
        log::debug!("loaded document with {} pages", self.document.len());
        Ok(())
    }

    /// Show page `index`. Switching to the current page does nothing.
    ///
    /// If the incoming page cannot be loaded the live scene and the current
    /// index stay as they were.
    pub fn switch_to(&mut self, index: usize) -> Result<(), EditorError> {
        self.document.check(index)?;
        if self.document.current == Some(index) {
            return Ok(());
        }
        self.settle_transient_modes();
        self.store_live_page();

        let incoming = self.document.pages[index].clone();
        self.show_page(&incoming)?;
        self.document.current = Some(index);
        log::debug!("switched to page {index}");
        Ok(())
    }

    /// Deserialize a page into the scene and start with empty history.
    /// On error the scene is left as it was and a notice is raised.
    fn show_page(&mut self, page: &Page) -> Result<(), EditorError> {
        if let Err(err) = self.scene.deserialize(&page.data) {
            self.notify(Notice::error(format!("Could not open \"{}\": {err}", page.name)));
            return Err(err.into());
        }
        self.history.clear();
        self.snapper.reset();
        self.scene.set_active(None);
        self.scene.render();
        Ok(())
    }

    /// Write the live scene into the current page slot.
    fn store_live_page(&mut self) {
        if let Some(current) = self.document.current
            && let Some(page) = self.document.pages.get_mut(current)
        {
            page.data = self.scene.serialize();
        }
    }

    /// Append a blank page and switch to it.
    pub fn add_page(&mut self) -> Result<usize, EditorError> {
        let index = self.document.pages.len();
        self.document
            .pages
            .push(Page::blank(format!("Page {}", index + 1)));
        self.switch_to(index)?;
        Ok(index)
    }

    pub fn rename_page(&mut self, index: usize, name: impl Into<String>) -> Result<(), EditorError> {
        self.document.check(index)?;
        self.document.pages[index].name = name.into();
        Ok(())
    }

    /// Delete a page. Deleting the current page shows its successor, or the
    /// new last page when it was last.
    pub fn delete_page(&mut self, index: usize) -> Result<(), EditorError> {
        self.document.check(index)?;
        if self.document.pages.len() == 1 {
            return Err(EditorError::LastPage);
        }
        if self.document.current == Some(index) {
            let target = if index + 1 < self.document.pages.len() {
                index + 1
            } else {
                index - 1
            };
            self.switch_to(target)?;
        }
        self.document.pages.remove(index);
        if let Some(current) = self.document.current
            && current > index
        {
            self.document.current = Some(current - 1);
        }
        Ok(())
    }

    /// Copy a page right after the original. The current page does not
    /// change.
    pub fn duplicate_page(&mut self, index: usize) -> Result<usize, EditorError> {
        self.document.check(index)?;
        if self.document.current == Some(index) {
            self.store_live_page();
        }
        let source = &self.document.pages[index];
        let copy = Page {
            name: format!("{} copy", source.name),
            data: source.data.clone(),
        };
        self.document.pages.insert(index + 1, copy);
        if let Some(current) = self.document.current
            && current > index
        {
            self.document.current = Some(current + 1);
        }
        Ok(index + 1)
    }

    /// All pages with the live scene written back first.
    pub fn pages_for_save(&mut self) -> Vec<Page> {
        self.store_live_page();
        self.document.pages.clone()
    }
}
