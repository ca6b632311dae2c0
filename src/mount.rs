/// Mount targets
///
/// The mount element is the one piece of shared mutable state the widget touches. The
/// `Mount` trait lists the four mutations the controller performs on it, and `Document`
/// looks mount elements up by id. `MemoryDocument`/`MemoryMount` keep the drawn regions
/// in memory; the browser implementation lives in `dom` behind the `wasm` feature.

use crate::render::{mark_active_link, TableMarkup};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// The element a table draws into.
pub trait Mount {
    /// Replace everything inside the mount element (full draw).
    fn replace_contents(&mut self, markup: &TableMarkup);

    /// Replace the data rows of the table body, leaving the filter row in place.
    fn replace_rows(&mut self, rows: &[String]);

    /// Replace the pagination controls inside the paginate wrapper.
    fn replace_pagination(&mut self, html: &str);

    /// Add or remove the active marker on the link of `page`.
    fn set_page_active(&mut self, page: usize, active: bool);
}

/// Lookup of mount elements by id.
pub trait Document {
    type Mount: Mount;

    fn get_element_by_id(&self, id: &str) -> Option<Self::Mount>;
}

/// Counts of each kind of redraw a mount has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub full_draws: usize,
    pub row_redraws: usize,
    pub pagination_redraws: usize,
}

#[derive(Debug, Default)]
struct MountState {
    markup: Option<TableMarkup>,
    active_pages: BTreeSet<usize>,
    stats: DrawStats,
}

/// In-memory mount element.
///
/// Cloning yields another handle to the same element, as repeated `getElementById`
/// lookups do in a browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryMount {
    state: Rc<RefCell<MountState>>,
}

impl MemoryMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents as HTML, with the active class on marked page links. Empty
    /// until the first full draw.
    pub fn inner_html(&self) -> String {
        let state = self.state.borrow();
        let Some(markup) = state.markup.as_ref() else {
            return String::new();
        };
        let mut markup = markup.clone();
        if let Some(pagination) = markup.pagination.as_mut() {
            for &page in &state.active_pages {
                *pagination = mark_active_link(pagination, page);
            }
        }
        markup.to_html()
    }

    /// The data rows currently in the table body.
    pub fn rows(&self) -> Vec<String> {
        self.state
            .borrow()
            .markup
            .as_ref()
            .map(|m| m.rows.clone())
            .unwrap_or_default()
    }

    /// The filter-input row, if the table has been drawn.
    pub fn filter_row(&self) -> Option<String> {
        self.state.borrow().markup.as_ref().map(|m| m.filter_row.clone())
    }

    pub fn head(&self) -> Option<String> {
        self.state.borrow().markup.as_ref().map(|m| m.head.clone())
    }

    pub fn pagination(&self) -> Option<String> {
        self.state
            .borrow()
            .markup
            .as_ref()
            .and_then(|m| m.pagination.clone())
    }

    /// Page whose link carries the active marker. `None` if no link does.
    pub fn active_page(&self) -> Option<usize> {
        self.state.borrow().active_pages.iter().next().copied()
    }

    /// Pages whose links carry the active marker.
    pub fn active_pages(&self) -> Vec<usize> {
        self.state.borrow().active_pages.iter().copied().collect()
    }

    pub fn stats(&self) -> DrawStats {
        self.state.borrow().stats
    }

    pub fn is_drawn(&self) -> bool {
        self.state.borrow().markup.is_some()
    }
}

impl Mount for MemoryMount {
    fn replace_contents(&mut self, markup: &TableMarkup) {
        let mut state = self.state.borrow_mut();
        state.markup = Some(markup.clone());
        state.active_pages.clear();
        state.stats.full_draws += 1;
    }

    fn replace_rows(&mut self, rows: &[String]) {
        let mut state = self.state.borrow_mut();
        match state.markup.as_mut() {
            Some(markup) => markup.rows = rows.to_vec(),
            None => {
                log::warn!("rows redraw before the table was drawn; ignoring");
                return;
            }
        }
        state.stats.row_redraws += 1;
    }

    fn replace_pagination(&mut self, html: &str) {
        let mut state = self.state.borrow_mut();
        match state.markup.as_mut() {
            Some(markup) => markup.pagination = Some(html.to_string()),
            None => {
                log::warn!("pagination redraw before the table was drawn; ignoring");
                return;
            }
        }
        state.active_pages.clear();
        state.stats.pagination_redraws += 1;
    }

    fn set_page_active(&mut self, page: usize, active: bool) {
        let mut state = self.state.borrow_mut();
        // Only links that exist can be marked.
        let exists = state
            .markup
            .as_ref()
            .and_then(|m| m.pagination.as_ref())
            .map(|p| p.contains(&format!(r#"data-page="{}""#, page)))
            .unwrap_or(false);
        if !exists {
            return;
        }
        if active {
            state.active_pages.insert(page);
        } else {
            state.active_pages.remove(&page);
        }
    }
}

/// In-memory document holding mount elements by id.
///
/// # Examples
///
/// ```
/// use datatable::{Document, MemoryDocument};
///
/// let mut document = MemoryDocument::new();
/// document.add_element("table");
///
/// assert!(document.get_element_by_id("table").is_some());
/// assert!(document.get_element_by_id("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: HashMap<String, MemoryMount>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element with the given id and return a handle to it.
    pub fn add_element(&mut self, id: impl Into<String>) -> MemoryMount {
        self.elements.entry(id.into()).or_default().clone()
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.add_element(id);
        self
    }
}

impl Document for MemoryDocument {
    type Mount = MemoryMount;

    fn get_element_by_id(&self, id: &str) -> Option<MemoryMount> {
        self.elements.get(id).cloned()
    }
}
