/// Table construction options.
///
/// The configuration is usually deserialized from JSON using the option names the widget
/// has always accepted (`selector`, `data`, `columns`, `isHeaderFixed`, `isPaginated`),
/// plus `pageSize`, `pipeline` and `typeInference`.

use crate::column::{ColumnDef, TypeInference};
use crate::error::{Result, TableError};
use crate::table::Row;
use serde::{Deserialize, Serialize};

/// Page sizes offered by the entries selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Rows per page until the user picks another option.
pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// How filtering, sorting and pagination combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineMode {
    /// Visible rows are always project → filter → sort → page over the whole dataset.
    #[default]
    Composed,
    /// Each operation starts over from the dataset: filtering ignores page and sort,
    /// sorting reorders whatever is shown, and paging drops filter and sort.
    Legacy,
}

/// Construction configuration for a [`DataTable`](crate::DataTable).
///
/// # Examples
///
/// ```
/// use datatable::{PipelineMode, TableConfig};
///
/// let config = TableConfig::from_json(r#"{
///     "selector": "table",
///     "isPaginated": true,
///     "columns": [{"header": "Name", "data": "name", "isSortable": true}],
///     "data": [{"name": "Norway"}, {"name": "Chad"}]
/// }"#).unwrap();
///
/// assert_eq!(config.page_size, 10);
/// assert_eq!(config.pipeline, PipelineMode::Composed);
/// assert_eq!(config.data.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Id of the mount element. It must already exist in the document.
    pub selector: String,
    #[serde(default)]
    pub data: Vec<Row>,
    pub columns: Vec<ColumnDef>,
    /// Adds the sticky-header class to the table.
    #[serde(default)]
    pub is_header_fixed: bool,
    /// Renders the entries selector and the page links.
    #[serde(default)]
    pub is_paginated: bool,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub pipeline: PipelineMode,
    #[serde(default)]
    pub type_inference: TypeInference,
}

impl TableConfig {
    pub fn new(selector: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        TableConfig {
            selector: selector.into(),
            data: Vec::new(),
            columns,
            is_header_fixed: false,
            is_paginated: false,
            page_size: DEFAULT_PAGE_SIZE,
            pipeline: PipelineMode::default(),
            type_inference: TypeInference::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_data(mut self, data: Vec<Row>) -> Self {
        self.data = data;
        self
    }

    pub fn header_fixed(mut self, fixed: bool) -> Self {
        self.is_header_fixed = fixed;
        self
    }

    pub fn paginated(mut self, paginated: bool) -> Self {
        self.is_paginated = paginated;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn pipeline(mut self, pipeline: PipelineMode) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn type_inference(mut self, inference: TypeInference) -> Self {
        self.type_inference = inference;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_page_size(self.page_size)
    }
}

pub(crate) fn check_page_size(limit: usize) -> Result<()> {
    if PAGE_SIZE_OPTIONS.contains(&limit) {
        Ok(())
    } else {
        Err(TableError::InvalidPageSize(limit))
    }
}
