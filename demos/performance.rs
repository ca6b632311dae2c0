/// Performance Example
///
/// This example demonstrates:
/// - Construction cost (projection and type inference) for a large dataset
/// - Cost of a filter keystroke versus a sort, with their redraws
/// - Walking every page

use datatable::{ColumnDef, ColumnValue, DataTable, MemoryDocument, PageTarget, Row, TableConfig};
use std::time::Instant;

fn main() {
    println!("=== DataTable Performance Example ===\n");

    let n = 50_000;
    let rows: Vec<Row> = (0..n)
        .map(|i| {
            Row::from([
                ("id".to_string(), ColumnValue::from(i)),
                ("name".to_string(), ColumnValue::from(format!("user_{}", i % 977))),
                ("score".to_string(), ColumnValue::from((i * 31 % 1000) as f64 / 10.0)),
            ])
        })
        .collect();
    let config = TableConfig::new(
        "perf",
        vec![
            ColumnDef::new("Id", "id").sortable().filterable(),
            ColumnDef::new("Name", "name").sortable().filterable(),
            ColumnDef::new("Score", "score").sortable(),
        ],
    )
    .with_data(rows)
    .paginated(true)
    .page_size(100);
    let document = MemoryDocument::new().with_element("perf");

    // 1. Construction
    let start = Instant::now();
    let mut table = DataTable::mount_in(config, &document).unwrap();
    println!("1. Construct + first draw of {} rows: {:?}", n, start.elapsed());

    // 2. Filter keystrokes, one redraw each
    let start = Instant::now();
    for keystrokes in ["u", "us", "use", "user_9", "user_97"] {
        table.filter(keystrokes, "name").unwrap();
    }
    println!("2. Five filter keystrokes: {:?}", start.elapsed());
    println!("   {} pages after filtering", table.page_count());
    table.filter("", "name").unwrap();

    // 3. Sorts, full draw each
    let start = Instant::now();
    table.sort("score").unwrap();
    table.sort("score").unwrap();
    table.sort("name").unwrap();
    println!("3. Three sorts: {:?}", start.elapsed());

    // 4. Page walk
    let start = Instant::now();
    let mut pages = 1;
    while table.show_page(PageTarget::Next).unwrap() {
        pages += 1;
    }
    println!("4. Walked {} pages: {:?}", pages, start.elapsed());

    let stats = table.mount().stats();
    println!(
        "\nRedraws: {} full, {} rows only, {} pagination",
        stats.full_draws, stats.row_redraws, stats.pagination_redraws
    );

    println!("\n=== Example Complete ===");
}
