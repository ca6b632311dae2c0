/// DataTable Table Model
///
/// The model owns the projected dataset, the typed schema, and the interaction state
/// (filter, sort, page, page size). It derives the rows currently shown from that state.
///
/// # Examples
///
/// ```
/// use datatable::{ColumnDef, ColumnValue, PageTarget, Row, TableConfig, TableModel};
///
/// let rows: Vec<Row> = (0..12)
///     .map(|i| Row::from([
///         ("name".to_string(), ColumnValue::from(format!("Country {}", i))),
///         ("population".to_string(), ColumnValue::from(i * 1000)),
///     ]))
///     .collect();
///
/// let config = TableConfig::new("table", vec![
///     ColumnDef::new("Name", "name").sortable().filterable(),
///     ColumnDef::new("Population", "population").sortable().filterable(),
/// ])
/// .with_data(rows);
///
/// let mut model = TableModel::from_config(&config).unwrap();
/// assert_eq!(model.visible_rows().len(), 10);
///
/// model.show_page(PageTarget::Next).unwrap();
/// assert_eq!(model.current_page(), 1);
/// assert_eq!(model.visible_rows().len(), 2);
/// ```

use crate::column::{Column, ColumnDef, ColumnType, ColumnValue, TypeInference};
use crate::config::{check_page_size, PipelineMode, TableConfig};
use crate::error::{Result, TableError};
use crate::view::{FilterView, PageTarget, PageWindow, Predicate, SortKey, SortOrder, SortedView};
use serde::Serialize;
use std::collections::HashMap;

/// A raw dataset row: field key to value.
pub type Row = HashMap<String, ColumnValue>;

/// A row projected onto the table's columns, values in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<ColumnValue>,
}

impl Record {
    pub fn get(&self, column: usize) -> Option<&ColumnValue> {
        self.values.get(column)
    }

    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }
}

static MISSING: ColumnValue = ColumnValue::Missing;

/// The dataset after projection. Set once at construction and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Project raw rows onto the given column keys. Keys absent from a row become
    /// `Missing` cells, distinct from an explicit `null`.
    pub fn project(rows: &[Row], keys: &[&str]) -> Self {
        let records = rows
            .iter()
            .map(|row| Record {
                values: keys
                    .iter()
                    .map(|key| row.get(*key).cloned().unwrap_or(ColumnValue::Missing))
                    .collect(),
            })
            .collect();

        Dataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }

    /// Value of one cell. Out-of-range positions read as missing.
    pub fn value(&self, row: usize, column: usize) -> &ColumnValue {
        self.records
            .get(row)
            .and_then(|record| record.get(column))
            .unwrap_or(&MISSING)
    }

    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &ColumnValue> + '_ {
        self.records.iter().map(move |record| record.get(column).unwrap_or(&MISSING))
    }

    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.records.len()).collect()
    }
}

/// Schema: the column definitions with their inferred types, in display order.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Type every column from the projected dataset.
    pub fn infer(defs: Vec<ColumnDef>, dataset: &Dataset, inference: TypeInference) -> Self {
        let columns = defs
            .into_iter()
            .enumerate()
            .map(|(i, def)| {
                let column_type = inference.infer(dataset.column_values(i));
                Column::new(def, column_type)
            })
            .collect();

        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the index of a column by key, or None if not found.
    pub fn get_column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key() == key)
    }

    pub fn get_column_type(&self, key: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.key() == key)
            .map(|c| c.column_type())
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.key()).collect()
    }
}

/// The last filter typed into a filter input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub column: String,
    pub value: String,
}

/// The active sort column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

/// Table state and the row-derivation pipeline.
#[derive(Debug, Clone)]
pub struct TableModel {
    schema: Schema,
    dataset: Dataset,
    mode: PipelineMode,
    filter: Option<FilterState>,
    sort: Option<SortState>,
    current_page: usize,
    limit: usize,
    /// Rows that page slicing draws from. In composed mode this is the filtered
    /// count; in legacy mode it is always the dataset size.
    source_len: usize,
    /// Dataset indices of the rows currently shown, in display order
    rows: Vec<usize>,
}

impl TableModel {
    pub fn new(
        columns: Vec<ColumnDef>,
        data: &[Row],
        limit: usize,
        mode: PipelineMode,
        inference: TypeInference,
    ) -> Result<Self> {
        check_page_size(limit)?;

        let keys: Vec<&str> = columns.iter().map(|c| c.data.as_str()).collect();
        let dataset = Dataset::project(data, &keys);
        let schema = Schema::infer(columns, &dataset, inference);

        let mut model = TableModel {
            schema,
            source_len: dataset.len(),
            dataset,
            mode,
            filter: None,
            sort: None,
            current_page: 0,
            limit,
            rows: Vec::new(),
        };
        model.refresh();
        Ok(model)
    }

    pub fn from_config(config: &TableConfig) -> Result<Self> {
        Self::new(
            config.columns.clone(),
            &config.data,
            config.page_size,
            config.pipeline,
            config.type_inference,
        )
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn filter_state(&self) -> Option<&FilterState> {
        self.filter.as_ref()
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Sort direction of a column, if it is the active sort column.
    pub fn sort_order_of(&self, key: &str) -> Option<SortOrder> {
        self.sort
            .as_ref()
            .filter(|s| s.column == key)
            .map(|s| s.order)
    }

    pub fn page_count(&self) -> usize {
        PageWindow::page_count(self.source_len, self.limit)
    }

    pub fn last_page(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    /// Slice bounds of the current page within the rows pages are cut from.
    pub fn page_window(&self) -> PageWindow {
        PageWindow::new(self.current_page, self.limit, self.source_len)
    }

    /// Dataset indices of the rows currently shown.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// The projected records currently shown, in display order.
    pub fn visible_rows(&self) -> Vec<&Record> {
        self.rows
            .iter()
            .filter_map(|&row| self.dataset.record(row))
            .collect()
    }

    /// Current page of the unfiltered, unsorted dataset.
    pub fn page_rows(&self) -> Vec<usize> {
        PageWindow::new(self.current_page, self.limit, self.dataset.len())
            .range()
            .collect()
    }

    /// Keep the rows whose `column` value matches `value`.
    ///
    /// String columns match a case-insensitive substring. Numeric columns match the
    /// integer prefix of `value` exactly, so text without one matches nothing.
    pub fn filter(&mut self, value: &str, column: &str) -> Result<()> {
        let index = self.column_index(column)?;
        let col = &self.schema.columns[index];
        if !col.is_filterable() {
            return Err(TableError::NotFilterable(column.to_string()));
        }

        self.filter = Some(FilterState {
            column: column.to_string(),
            value: value.to_string(),
        });

        match self.mode {
            PipelineMode::Legacy => {
                let predicate = Predicate::for_column(col, value);
                let all = self.dataset.all_indices();
                self.rows = FilterView::new(&self.dataset, &all, index, predicate).into_indices();
            }
            PipelineMode::Composed => {
                self.current_page = 0;
                self.derive();
            }
        }

        log::debug!(
            "filter {:?} on '{}' leaves {} rows",
            value,
            column,
            self.rows.len()
        );
        Ok(())
    }

    /// Sort by `column`, toggling the direction if it is already the sort column.
    /// Returns the direction now in effect.
    pub fn sort(&mut self, column: &str) -> Result<SortOrder> {
        let index = self.column_index(column)?;
        let col = &self.schema.columns[index];
        if !col.is_sortable() {
            return Err(TableError::NotSortable(column.to_string()));
        }
        let column_type = col.column_type();

        let order = match self.sort_order_of(column) {
            Some(order) => order.toggled(),
            None => SortOrder::Ascending,
        };
        self.sort = Some(SortState {
            column: column.to_string(),
            order,
        });

        match self.mode {
            PipelineMode::Legacy => {
                let key = SortKey { column: index, order };
                self.rows = SortedView::new(&self.dataset, &self.rows, key, column_type).into_indices();
            }
            PipelineMode::Composed => self.derive(),
        }

        log::debug!("sort '{}' {:?}", column, order);
        Ok(order)
    }

    /// Navigate to another page. Returns false when the navigation is a no-op:
    /// `Next` on the last page or `Previous` on the first.
    pub fn show_page(&mut self, target: PageTarget) -> Result<bool> {
        let page = match target {
            PageTarget::Next => {
                if self.current_page >= self.last_page() {
                    return Ok(false);
                }
                self.current_page + 1
            }
            PageTarget::Previous => {
                if self.current_page == 0 {
                    return Ok(false);
                }
                self.current_page - 1
            }
            PageTarget::Page(page) => {
                let pages = self.page_count();
                if page > 0 && page >= pages {
                    return Err(TableError::PageOutOfRange { page, pages });
                }
                page
            }
        };

        self.current_page = page;
        self.refresh();
        log::debug!("show page {} of {}", page, self.page_count());
        Ok(true)
    }

    /// Change the number of rows per page. The current page is clamped to the new
    /// last page.
    pub fn set_page_size(&mut self, limit: usize) -> Result<()> {
        check_page_size(limit)?;
        self.limit = limit;
        self.current_page = self.current_page.min(self.last_page());
        self.refresh();
        log::debug!("page size {} gives {} pages", limit, self.page_count());
        Ok(())
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .get_column_index(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))
    }

    /// Recompute the shown rows after a page or page-size change.
    fn refresh(&mut self) {
        match self.mode {
            PipelineMode::Legacy => {
                self.source_len = self.dataset.len();
                self.rows = self.page_rows();
            }
            PipelineMode::Composed => self.derive(),
        }
    }

    /// project → filter → sort → page
    fn derive(&mut self) {
        let mut indices = self.dataset.all_indices();

        if let Some(filter) = &self.filter {
            if let Some(index) = self.schema.get_column_index(&filter.column) {
                let predicate = Predicate::for_column(&self.schema.columns[index], &filter.value);
                indices = FilterView::new(&self.dataset, &indices, index, predicate).into_indices();
            }
        }

        if let Some(sort) = &self.sort {
            if let Some(index) = self.schema.get_column_index(&sort.column) {
                let key = SortKey {
                    column: index,
                    order: sort.order,
                };
                let column_type = self.schema.columns[index].column_type();
                indices = SortedView::new(&self.dataset, &indices, key, column_type).into_indices();
            }
        }

        self.source_len = indices.len();
        self.rows = self.page_window().apply(&indices).to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                Row::from([
                    ("name".to_string(), ColumnValue::from(format!("Country {:02}", i))),
                    ("population".to_string(), ColumnValue::from((i as i32 % 4) * 100)),
                    ("region".to_string(), ColumnValue::from("Europe")),
                ])
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("Name", "name").sortable().filterable(),
            ColumnDef::new("Population", "population").sortable().filterable(),
            ColumnDef::new("Region", "region"),
        ]
    }

    fn table_model(rows: usize, mode: PipelineMode) -> TableModel {
        TableModel::new(columns(), &countries(rows), 10, mode, TypeInference::FirstRow).unwrap()
    }

    fn names(model: &TableModel) -> Vec<String> {
        model
            .visible_rows()
            .iter()
            .map(|r| r.get(0).unwrap().display_text())
            .collect()
    }

    #[test]
    fn test_projection_keeps_column_order() {
        let mut row = Row::new();
        row.insert("extra".to_string(), ColumnValue::from("ignored"));
        row.insert("b".to_string(), ColumnValue::from(2));
        row.insert("a".to_string(), ColumnValue::from(1));

        let dataset = Dataset::project(&[row], &["a", "b", "missing"]);
        let record = dataset.record(0).unwrap();
        assert_eq!(
            record.values(),
            &[ColumnValue::from(1), ColumnValue::from(2), ColumnValue::Missing]
        );
        assert_eq!(dataset.value(5, 0), &ColumnValue::Missing);
    }

    #[test]
    fn test_schema_types_from_first_row() {
        let model = table_model(3, PipelineMode::Composed);
        let schema = model.schema();
        assert_eq!(schema.get_column_type("name"), Some(ColumnType::String));
        assert_eq!(schema.get_column_type("population"), Some(ColumnType::Numeric));
        assert_eq!(schema.get_column_names(), vec!["name", "population", "region"]);
    }

    #[test]
    fn test_first_row_inference_misclassifies_later_rows() {
        let rows = vec![
            Row::from([("code".to_string(), ColumnValue::from("100"))]),
            Row::from([("code".to_string(), ColumnValue::from("A-7"))]),
        ];
        let defs = vec![ColumnDef::new("Code", "code").filterable()];

        let model = TableModel::new(defs.clone(), &rows, 10, PipelineMode::Composed, TypeInference::FirstRow).unwrap();
        assert_eq!(model.schema().get_column_type("code"), Some(ColumnType::Numeric));

        let mut model = TableModel::new(defs, &rows, 10, PipelineMode::Composed, TypeInference::FirstRow).unwrap();
        model.filter("A-7", "code").unwrap();
        assert!(model.visible_rows().is_empty());
    }

    fn from_json(json: &str) -> Vec<Row> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_null_first_value_types_column_numeric() {
        let defs = vec![ColumnDef::new("P", "p").sortable().filterable()];
        let rows = from_json(r#"[{"p": null}, {"p": 100}, {"p": 9}]"#);

        let mut model = TableModel::new(defs.clone(), &rows, 10, PipelineMode::Composed, TypeInference::FirstRow).unwrap();
        assert_eq!(model.schema().get_column_type("p"), Some(ColumnType::Numeric));

        // null sorts as zero, and numbers compare numerically rather than as text
        model.sort("p").unwrap();
        assert_eq!(model.row_indices(), &[0, 2, 1]);

        // but null equals no number when filtering
        model.filter("0", "p").unwrap();
        assert!(model.visible_rows().is_empty());

        // A key missing from the first row still types the column as string.
        let rows = from_json(r#"[{}, {"p": 5}]"#);
        let model = TableModel::new(defs, &rows, 10, PipelineMode::Composed, TypeInference::FirstRow).unwrap();
        assert_eq!(model.schema().get_column_type("p"), Some(ColumnType::String));
        assert_eq!(model.dataset().value(0, 0), &ColumnValue::Missing);
    }

    #[test]
    fn test_empty_dataset() {
        let mut model = TableModel::new(columns(), &[], 10, PipelineMode::Composed, TypeInference::FirstRow).unwrap();
        assert_eq!(model.schema().get_column_type("population"), Some(ColumnType::String));
        assert_eq!(model.page_count(), 0);
        assert!(model.visible_rows().is_empty());
        assert!(!model.show_page(PageTarget::Next).unwrap());
        assert!(model.show_page(PageTarget::Page(0)).unwrap());
    }

    #[test]
    fn test_initial_page() {
        let model = table_model(12, PipelineMode::Composed);
        assert_eq!(model.current_page(), 0);
        assert_eq!(model.page_count(), 2);
        assert_eq!(model.row_indices(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_bad_page_size_rejected() {
        let err = TableModel::new(columns(), &countries(3), 15, PipelineMode::Composed, TypeInference::FirstRow)
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidPageSize(15)));
    }

    #[test]
    fn test_filter_string_column() {
        for mode in [PipelineMode::Composed, PipelineMode::Legacy] {
            let mut model = table_model(12, mode);
            model.filter("country 1", "name").unwrap();
            assert_eq!(names(&model), vec!["Country 10", "Country 11"], "{:?}", mode);
        }
    }

    #[test]
    fn test_filter_numeric_column() {
        let mut model = table_model(12, PipelineMode::Composed);
        model.filter("300", "population").unwrap();
        assert_eq!(model.row_indices(), &[3, 7, 11]);

        model.filter("abc", "population").unwrap();
        assert!(model.visible_rows().is_empty());
    }

    #[test]
    fn test_filter_empty_value_on_string_column_keeps_all() {
        let mut model = table_model(12, PipelineMode::Legacy);
        model.filter("", "name").unwrap();
        // Legacy filtering works on the whole dataset and does not slice.
        assert_eq!(model.visible_rows().len(), 12);

        let mut model = model_composed(12);
        model.filter("", "name").unwrap();
        assert_eq!(model.visible_rows().len(), 10);
        assert_eq!(model.page_count(), 2);
    }

    fn model_composed(rows: usize) -> TableModel {
        table_model(rows, PipelineMode::Composed)
    }

    #[test]
    fn test_filter_rejects_unknown_and_unfilterable_columns() {
        let mut model = model_composed(3);
        assert!(matches!(model.filter("x", "capital"), Err(TableError::UnknownColumn(_))));
        assert!(matches!(model.filter("x", "region"), Err(TableError::NotFilterable(_))));
        assert!(model.filter_state().is_none());
    }

    #[test]
    fn test_filter_resets_page_in_composed_mode() {
        let mut model = model_composed(25);
        model.show_page(PageTarget::Page(2)).unwrap();
        model.filter("0", "population").unwrap();

        assert_eq!(model.current_page(), 0);
        // populations 0 at rows 0, 4, 8, 12, 16, 20, 24
        assert_eq!(model.page_count(), 1);
        assert_eq!(model.row_indices(), &[0, 4, 8, 12, 16, 20, 24]);
    }

    #[test]
    fn test_sort_toggles_and_resets() {
        let mut model = model_composed(5);

        assert_eq!(model.sort("name").unwrap(), SortOrder::Ascending);
        assert_eq!(model.sort("name").unwrap(), SortOrder::Descending);
        assert_eq!(model.sort("name").unwrap(), SortOrder::Ascending);
        assert_eq!(model.sort("name").unwrap(), SortOrder::Descending);

        assert_eq!(model.sort("population").unwrap(), SortOrder::Ascending);
        assert_eq!(model.sort_order_of("name"), None);
        assert_eq!(model.sort_order_of("population"), Some(SortOrder::Ascending));

        // Returning to the first column starts over at ascending.
        assert_eq!(model.sort("name").unwrap(), SortOrder::Ascending);
    }

    #[test]
    fn test_sort_rejects_unsortable_column() {
        let mut model = model_composed(3);
        assert!(matches!(model.sort("region"), Err(TableError::NotSortable(_))));
        assert!(model.sort_state().is_none());
    }

    #[test]
    fn test_sort_descending_strings() {
        let mut model = model_composed(12);
        model.sort("name").unwrap();
        model.sort("name").unwrap();
        assert_eq!(names(&model)[0], "Country 11");
        assert_eq!(names(&model)[9], "Country 02");
    }

    #[test]
    fn test_composed_sort_spans_all_pages() {
        let mut model = model_composed(12);
        model.sort("population").unwrap();
        model.sort("population").unwrap();
        // Rows with population 300 first, across the whole dataset.
        assert_eq!(&model.row_indices()[..3], &[3, 7, 11]);

        model.show_page(PageTarget::Next).unwrap();
        assert_eq!(model.row_indices(), &[4, 8]);
    }

    #[test]
    fn test_legacy_sort_reorders_current_rows_only() {
        let mut model = table_model(12, PipelineMode::Legacy);
        model.sort("population").unwrap();
        model.sort("population").unwrap();
        // Only the first page is reordered.
        assert_eq!(&model.row_indices()[..2], &[3, 7]);
        assert!(!model.row_indices().contains(&11));
    }

    #[test]
    fn test_legacy_page_change_drops_filter_and_sort() {
        let mut model = table_model(12, PipelineMode::Legacy);
        model.filter("Country 1", "name").unwrap();
        model.sort("name").unwrap();
        model.show_page(PageTarget::Next).unwrap();

        assert_eq!(model.row_indices(), &[10, 11]);
        // The state is remembered even though the rows no longer reflect it.
        assert!(model.filter_state().is_some());
        assert!(model.sort_state().is_some());
    }

    #[test]
    fn test_legacy_page_count_ignores_filter() {
        let mut model = table_model(30, PipelineMode::Legacy);
        model.filter("Country 01", "name").unwrap();
        assert_eq!(model.visible_rows().len(), 1);
        assert_eq!(model.page_count(), 3);
    }

    #[test]
    fn test_show_page_walks_to_last_page() {
        let mut model = model_composed(45);
        assert!(model.show_page(PageTarget::Page(0)).unwrap());
        for _ in 0..model.page_count() - 1 {
            assert!(model.show_page(PageTarget::Next).unwrap());
        }
        assert_eq!(model.current_page(), 4);
        assert_eq!(model.visible_rows().len(), 5);

        assert!(!model.show_page(PageTarget::Next).unwrap());
        assert_eq!(model.current_page(), 4);
    }

    #[test]
    fn test_show_page_previous_on_first_page() {
        let mut model = model_composed(12);
        assert!(!model.show_page(PageTarget::Previous).unwrap());
        assert_eq!(model.current_page(), 0);

        model.show_page(PageTarget::Page(1)).unwrap();
        assert!(model.show_page(PageTarget::Previous).unwrap());
        assert_eq!(model.current_page(), 0);
    }

    #[test]
    fn test_show_page_out_of_range() {
        let mut model = model_composed(12);
        let err = model.show_page(PageTarget::Page(2)).unwrap_err();
        assert!(matches!(err, TableError::PageOutOfRange { page: 2, pages: 2 }));
        assert_eq!(model.current_page(), 0);
    }

    #[test]
    fn test_page_size_change() {
        for mode in [PipelineMode::Composed, PipelineMode::Legacy] {
            let mut model = table_model(30, mode);
            model.set_page_size(25).unwrap();
            assert_eq!(model.page_count(), 2);
            assert_eq!(model.visible_rows().len(), 25);

            model.show_page(PageTarget::Next).unwrap();
            assert_eq!(model.visible_rows().len(), 5);
        }
    }

    #[test]
    fn test_page_size_change_clamps_current_page() {
        let mut model = model_composed(30);
        model.show_page(PageTarget::Page(2)).unwrap();
        model.set_page_size(50).unwrap();
        assert_eq!(model.current_page(), 0);
        assert_eq!(model.visible_rows().len(), 30);

        assert!(matches!(model.set_page_size(20), Err(TableError::InvalidPageSize(20))));
        assert_eq!(model.limit(), 50);
    }
}
