/// DataTable controller
///
/// Ties the table model, the renderer and a mount element together. Every operation
/// updates the model and then redraws as little of the mount as it can: sorting redraws
/// the whole table, everything else replaces the data rows (and the pagination controls
/// when the page count may have changed). After each full draw the controller rebinds
/// its event handlers.

use crate::config::{PipelineMode, TableConfig};
use crate::error::{Result, TableError};
use crate::events::{parse_event_script, Bindings, DomEvent, EventBinder, TableEvent};
use crate::mount::{Document, Mount};
use crate::render::{RenderOptions, Renderer};
use crate::table::TableModel;
use crate::view::{PageTarget, SortOrder};

/// A table widget drawn into a mount element.
///
/// # Examples
///
/// ```
/// use datatable::{ColumnDef, ColumnValue, DataTable, MemoryDocument, Row, TableConfig};
///
/// let document = MemoryDocument::new().with_element("table");
/// let rows: Vec<Row> = ["Norway", "Chad", "Peru"]
///     .iter()
///     .map(|name| Row::from([("name".to_string(), ColumnValue::from(*name))]))
///     .collect();
/// let config = TableConfig::new("table", vec![ColumnDef::new("Name", "name").sortable()])
///     .with_data(rows);
///
/// let mut table = DataTable::mount_in(config, &document).unwrap();
/// table.sort("name").unwrap();
/// assert!(table.mount().inner_html().find("Chad") < table.mount().inner_html().find("Peru"));
/// ```
#[derive(Debug)]
pub struct DataTable<M: Mount> {
    model: TableModel,
    renderer: Renderer,
    mount: M,
    bindings: Bindings,
    binds: u64,
}

impl<M: Mount> DataTable<M> {
    /// Build the table and draw it into `mount`.
    pub fn new(config: TableConfig, mount: M) -> Result<Self> {
        config.validate()?;
        let model = TableModel::from_config(&config)?;
        let renderer = Renderer::new(RenderOptions {
            selector: config.selector,
            header_fixed: config.is_header_fixed,
            paginated: config.is_paginated,
        });

        let mut table = DataTable {
            model,
            renderer,
            mount,
            bindings: Bindings::default(),
            binds: 0,
        };
        table.draw();
        Ok(table)
    }

    /// Look up the mount element named by `config.selector` and draw into it.
    pub fn mount_in<D>(config: TableConfig, document: &D) -> Result<Self>
    where
        D: Document<Mount = M>,
    {
        let mount = document
            .get_element_by_id(&config.selector)
            .ok_or_else(|| TableError::MountNotFound(config.selector.clone()))?;
        Self::new(config, mount)
    }

    /// Like [`mount_in`](Self::mount_in), but logs construction failures and returns
    /// `None` instead.
    pub fn mount_or_log<D>(config: TableConfig, document: &D) -> Option<Self>
    where
        D: Document<Mount = M>,
    {
        match Self::mount_in(config, document) {
            Ok(table) => Some(table),
            Err(e) => {
                log::error!("Failed to create table: {}", e);
                None
            }
        }
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    pub fn mount(&self) -> &M {
        &self.mount
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Number of times handlers have been bound, one per full draw.
    pub fn bind_count(&self) -> u64 {
        self.binds
    }

    pub fn current_page(&self) -> usize {
        self.model.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.model.page_count()
    }

    fn paginated(&self) -> bool {
        self.renderer.options().paginated
    }

    /// Replace the mount contents with a fresh rendering of the whole table.
    pub fn draw(&mut self) {
        let markup = self.renderer.table(&self.model);
        self.mount.replace_contents(&markup);
        log::debug!(
            "draw: {} rows, page {} of {}",
            markup.rows.len(),
            self.model.current_page(),
            self.model.page_count()
        );
        self.rebind();
        self.mark_active_page();
    }

    /// Rebuild the event bindings for the markup now in the mount.
    pub fn rebind(&mut self) {
        self.binds += 1;
        self.bindings = EventBinder::bind(self.model.schema(), self.paginated(), self.binds);
    }

    fn redraw_rows(&mut self) {
        let rows = self.renderer.table_rows(&self.model);
        self.mount.replace_rows(&rows);
    }

    fn redraw_pagination(&mut self) {
        let html = self.renderer.paginate(&self.model);
        self.mount.replace_pagination(&html);
    }

    fn mark_active_page(&mut self) {
        if self.paginated() {
            self.mount.set_page_active(self.model.current_page(), true);
        }
    }

    pub fn filter(&mut self, value: &str, column: &str) -> Result<()> {
        self.model.filter(value, column)?;
        self.redraw_rows();
        if self.paginated() && self.model.mode() == PipelineMode::Composed {
            self.redraw_pagination();
            self.mark_active_page();
        }
        Ok(())
    }

    pub fn sort(&mut self, column: &str) -> Result<SortOrder> {
        let order = self.model.sort(column)?;
        self.draw();
        Ok(order)
    }

    /// Navigate to a page. Returns false when the navigation was a no-op.
    pub fn show_page(&mut self, target: PageTarget) -> Result<bool> {
        let previous = self.model.current_page();
        if self.paginated() {
            self.mount.set_page_active(previous, false);
        }

        let moved = match self.model.show_page(target) {
            Ok(moved) => moved,
            Err(e) => {
                self.mark_active_page();
                return Err(e);
            }
        };
        if moved {
            self.redraw_rows();
        }
        self.mark_active_page();
        Ok(moved)
    }

    pub fn set_page_size(&mut self, limit: usize) -> Result<()> {
        self.model.set_page_size(limit)?;
        self.redraw_rows();
        if self.paginated() {
            self.redraw_pagination();
            self.mark_active_page();
        }
        Ok(())
    }

    pub fn apply(&mut self, event: TableEvent) -> Result<()> {
        match event {
            TableEvent::Sort { column } => self.sort(&column).map(|_| ()),
            TableEvent::Filter { column, value } => self.filter(&value, &column),
            TableEvent::ShowPage { target } => self.show_page(target).map(|_| ()),
            TableEvent::SetPageSize { limit } => self.set_page_size(limit),
        }
    }

    /// Apply a script of events, one JSON `TableEvent` per line.
    ///
    /// A line that does not parse fails the whole script before anything is applied.
    /// Events the table rejects are logged and skipped. Returns how many were applied.
    pub fn replay(&mut self, script: &str) -> Result<usize> {
        let mut applied = 0;
        for (line, event) in parse_event_script(script)? {
            match self.apply(event) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("line {}: {}", line, e),
            }
        }
        Ok(applied)
    }

    /// Dispatch a DOM event through the current bindings. Returns false when the
    /// event does not target a bound element.
    pub fn handle(&mut self, event: &DomEvent) -> Result<bool> {
        match self.bindings.resolve(event) {
            Some(table_event) => {
                self.apply(table_event)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
