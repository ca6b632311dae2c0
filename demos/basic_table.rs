/// Basic Table Example
///
/// This example demonstrates:
/// - Building a table config from rows and column definitions
/// - Drawing into a mount element
/// - Filtering, sorting and paging, and what each one redraws

use datatable::{ColumnDef, ColumnValue, DataTable, MemoryDocument, PageTarget, Row, TableConfig};

const COUNTRIES: [(&str, &str, i32); 12] = [
    ("Afghanistan", "Kabul", 38_928_346),
    ("Albania", "Tirana", 2_877_797),
    ("Algeria", "Algiers", 43_851_044),
    ("Andorra", "Andorra la Vella", 77_265),
    ("Angola", "Luanda", 32_866_272),
    ("Argentina", "Buenos Aires", 45_195_774),
    ("Armenia", "Yerevan", 2_963_243),
    ("Australia", "Canberra", 25_499_884),
    ("Austria", "Vienna", 9_006_398),
    ("Azerbaijan", "Baku", 10_139_177),
    ("Bahamas", "Nassau", 393_244),
    ("Bahrain", "Manama", 1_701_575),
];

fn main() {
    println!("=== DataTable Basic Example ===\n");

    // 1. Rows and columns
    let rows: Vec<Row> = COUNTRIES
        .iter()
        .map(|(name, capital, population)| {
            Row::from([
                ("name".to_string(), ColumnValue::from(*name)),
                ("capital".to_string(), ColumnValue::from(*capital)),
                ("population".to_string(), ColumnValue::from(*population)),
            ])
        })
        .collect();

    let config = TableConfig::new(
        "countries",
        vec![
            ColumnDef::new("Country", "name").sortable().filterable(),
            ColumnDef::new("Capital", "capital").filterable(),
            ColumnDef::new("Population", "population").sortable().filterable(),
        ],
    )
    .with_data(rows)
    .header_fixed(true)
    .paginated(true);

    // 2. Mount
    println!("1. Drawing into #countries...");
    let document = MemoryDocument::new().with_element("countries");
    let mut table = match DataTable::mount_in(config, &document) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("   {}", e);
            return;
        }
    };
    let schema = table.model().schema();
    for column in schema.columns() {
        println!("   {} ({:?})", column.header(), column.column_type());
    }
    println!(
        "   {} rows shown, page {} of {}\n",
        table.mount().rows().len(),
        table.current_page(),
        table.page_count()
    );

    // 3. Filter
    println!("2. Filtering capital by 'an'...");
    table.filter("an", "capital").unwrap();
    print_rows(&table);

    // 4. Sort
    println!("3. Sorting population (twice)...");
    table.filter("", "capital").unwrap();
    table.sort("population").unwrap();
    table.sort("population").unwrap();
    print_rows(&table);

    // 5. Page
    println!("4. Next page...");
    table.show_page(PageTarget::Next).unwrap();
    print_rows(&table);

    let stats = table.mount().stats();
    println!(
        "Redraws: {} full, {} rows only, {} pagination",
        stats.full_draws, stats.row_redraws, stats.pagination_redraws
    );

    println!("\n=== Example Complete ===");
}

fn print_rows(table: &DataTable<datatable::MemoryMount>) {
    for record in table.model().visible_rows() {
        let cells: Vec<String> = record.values().iter().map(|v| v.display_text()).collect();
        println!("   {}", cells.join(" | "));
    }
    println!();
}
