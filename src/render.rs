/// DataTable Renderer
///
/// Turns the table model into markup. A full draw produces a [`TableMarkup`] holding
/// every region of the widget. The rows-only and pagination redraws reuse the row and
/// pagination templates on their own.

use crate::column::{Column, ColumnType};
use crate::config::PAGE_SIZE_OPTIONS;
use crate::table::{Record, TableModel};
use crate::view::{PageTarget, SortOrder};

/// Class carried by every data row; rows-only redraws replace exactly these elements.
pub const DATA_ROW_CLASS: &str = "data-row";
/// Class of the element wrapping the pagination controls.
pub const PAGINATE_WRAPPER_CLASS: &str = "paginate-wrapper";
/// Class of the page, previous and next links.
pub const PAGINATE_BUTTON_CLASS: &str = "paginate-button";
/// Class toggled on the link of the page being shown.
pub const ACTIVE_CLASS: &str = "active";
/// Class of the entries-per-page selector.
pub const LIMIT_SELECT_CLASS: &str = "limit-select";
/// Class of the filter inputs.
pub const SEARCH_INPUT_CLASS: &str = "input-search";

/// Presentation options fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Id of the mount element, referenced by `aria-controls`.
    pub selector: String,
    pub header_fixed: bool,
    pub paginated: bool,
}

/// Markup for a full draw, split into the regions later redraws replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMarkup {
    pub table_class: String,
    pub head: String,
    pub filter_row: String,
    pub rows: Vec<String>,
    /// Pagination controls, present when pagination is enabled.
    pub pagination: Option<String>,
}

impl TableMarkup {
    /// The whole widget as one HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<table class="{}" style="width: 100%;" role="grid">"#,
            self.table_class
        );
        html.push_str(&self.head);
        html.push_str("<tbody>");
        html.push_str(&self.filter_row);
        for row in &self.rows {
            html.push_str(row);
        }
        html.push_str("</tbody></table>");
        html.push_str(&wrap_pagination(self.pagination.as_deref().unwrap_or("")));
        html
    }
}

pub(crate) fn wrap_pagination(inner: &str) -> String {
    format!(r#"<div class="{}">{}</div>"#, PAGINATE_WRAPPER_CLASS, inner)
}

/// Add the active class to the link for `page` in pagination markup. Markup without
/// that link is returned unchanged.
pub(crate) fn mark_active_link(html: &str, page: usize) -> String {
    let open = format!(r#"<a class="{}""#, PAGINATE_BUTTON_CLASS);
    let Some(at) = html.find(&format!(r#"data-page="{}""#, page)) else {
        return html.to_string();
    };
    let Some(start) = html[..at].rfind(&open) else {
        return html.to_string();
    };
    // just inside the closing quote of the class attribute
    let insert = start + open.len() - 1;
    format!("{} {}{}", &html[..insert], ACTIVE_CLASS, &html[insert..])
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Builds widget markup from a table model.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Markup for a full draw.
    pub fn table(&self, model: &TableModel) -> TableMarkup {
        let table_class = if self.options.header_fixed {
            "data-table sticky-header".to_string()
        } else {
            "data-table".to_string()
        };

        TableMarkup {
            table_class,
            head: self.table_head(model),
            filter_row: self.search_box_row(model),
            rows: self.table_rows(model),
            pagination: self.options.paginated.then(|| self.paginate(model)),
        }
    }

    pub fn table_head(&self, model: &TableModel) -> String {
        let cells: String = model
            .schema()
            .columns()
            .iter()
            .map(|column| self.th(column, model.sort_order_of(column.key())))
            .collect();
        format!(r#"<thead><tr role="row">{}</tr></thead>"#, cells)
    }

    /// Header cell. The class shows the sort direction, or `sorting_both` for a column
    /// that is unsorted or cannot be sorted.
    pub fn th(&self, column: &Column, order: Option<SortOrder>) -> String {
        format!(
            r#"<th data-columnname="{}" data-issortable="{}" class="{}" tabindex="0" aria-controls="{}" rowspan="1" colspan="1">{}</th>"#,
            escape_html(column.key()),
            column.is_sortable(),
            sort_class(column, order),
            escape_html(&self.options.selector),
            escape_html(column.header()),
        )
    }

    pub fn search_box_row(&self, model: &TableModel) -> String {
        let cells: String = model
            .schema()
            .columns()
            .iter()
            .map(|column| {
                if column.is_filterable() {
                    self.search_box(column)
                } else {
                    "<td></td>".to_string()
                }
            })
            .collect();
        format!(r#"<tr role="row" class="odd">{}</tr>"#, cells)
    }

    pub fn search_box(&self, column: &Column) -> String {
        let input_type = match column.column_type() {
            ColumnType::String => "text",
            ColumnType::Numeric => "number",
        };
        format!(
            r#"<td><input class="{}" data-search="true" data-columnname="{}" placeholder="search" type="{}"/></td>"#,
            SEARCH_INPUT_CLASS,
            escape_html(column.key()),
            input_type,
        )
    }

    pub fn table_row(&self, record: &Record) -> String {
        let cells: String = record
            .values()
            .iter()
            .map(|value| format!("<td>{}</td>", escape_html(&value.display_text())))
            .collect();
        format!(r#"<tr role="row" class="{}">{}</tr>"#, DATA_ROW_CLASS, cells)
    }

    /// One `<tr>` per visible record.
    pub fn table_rows(&self, model: &TableModel) -> Vec<String> {
        model
            .visible_rows()
            .into_iter()
            .map(|record| self.table_row(record))
            .collect()
    }

    /// Pagination controls: entries selector, Previous, one link per page, Next.
    /// Page numbers are shown 0-based.
    pub fn paginate(&self, model: &TableModel) -> String {
        let links: String = (0..model.page_count())
            .map(|page| self.page_link(page))
            .collect();
        format!(
            r#"<div class="paginate">{}{}{}{}</div>"#,
            self.entries(model.limit()),
            self.previous(),
            links,
            self.next(),
        )
    }

    pub fn entries(&self, limit: usize) -> String {
        let options: String = PAGE_SIZE_OPTIONS
            .iter()
            .map(|&size| {
                let selected = if size == limit { " selected" } else { "" };
                format!(r#"<option value="{0}"{1}>{0}</option>"#, size, selected)
            })
            .collect();
        format!(
            r#"<div class="entries" id="limit"><label>Show <select class="{}">{}</select> entries</label></div>"#,
            LIMIT_SELECT_CLASS, options,
        )
    }

    pub fn page_link(&self, page: usize) -> String {
        self.link("", PageTarget::Page(page), &page.to_string())
    }

    pub fn previous(&self) -> String {
        self.link(" previous", PageTarget::Previous, "Previous")
    }

    pub fn next(&self) -> String {
        self.link(" next", PageTarget::Next, "Next")
    }

    fn link(&self, extra_class: &str, target: PageTarget, label: &str) -> String {
        format!(
            r#"<a class="{}{}" aria-controls="{}" data-page="{}">{}</a>"#,
            PAGINATE_BUTTON_CLASS,
            extra_class,
            escape_html(&self.options.selector),
            target,
            label,
        )
    }
}

fn sort_class(column: &Column, order: Option<SortOrder>) -> &'static str {
    if !column.is_sortable() {
        return "sorting_both";
    }
    match order {
        None => "sorting_both",
        Some(SortOrder::Ascending) => "sorting_asc",
        Some(SortOrder::Descending) => "sorting_desc",
    }
}
