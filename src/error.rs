use thiserror::Error;

/// Errors raised while building a table or applying an interaction to it.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("mount element '{0}' not found in document")]
    MountNotFound(String),
    #[error("column '{0}' is not defined for this table")]
    UnknownColumn(String),
    #[error("column '{0}' is not sortable")]
    NotSortable(String),
    #[error("column '{0}' is not filterable")]
    NotFilterable(String),
    #[error("page size {0} is not one of the offered options")]
    InvalidPageSize(usize),
    #[error("page {page} out of range [0, {pages})")]
    PageOutOfRange { page: usize, pages: usize },
    #[error("invalid table configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("event script line {line}: {source}")]
    EventScript {
        line: usize,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;
