/// Interactions Example
///
/// This example demonstrates:
/// - Routing DOM events through the bindings of the latest draw
/// - Replaying a script of serialized table events
/// - Composed versus legacy pipelines on the same interactions

use datatable::{
    ColumnDef, ColumnValue, DataTable, DomEvent, MemoryDocument, PageTarget, PipelineMode, Row,
    TableConfig, TableEvent,
};

fn config(mode: PipelineMode) -> TableConfig {
    let rows: Vec<Row> = (0..40)
        .map(|i| {
            Row::from([
                ("sku".to_string(), ColumnValue::from(format!("SKU-{:03}", i))),
                ("stock".to_string(), ColumnValue::from((i * 7) % 50)),
            ])
        })
        .collect();

    TableConfig::new(
        "inventory",
        vec![
            ColumnDef::new("SKU", "sku").sortable().filterable(),
            ColumnDef::new("Stock", "stock").sortable().filterable(),
        ],
    )
    .with_data(rows)
    .paginated(true)
    .pipeline(mode)
}

fn main() {
    println!("=== DataTable Interactions Example ===\n");

    let script = r#"[
        {"type": "Sort", "column": "stock"},
        {"type": "ShowPage", "target": "next"},
        {"type": "Filter", "column": "sku", "value": "sku-01"}
    ]"#;
    let events: Vec<TableEvent> = match serde_json::from_str(script) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("bad script: {}", e);
            return;
        }
    };

    for mode in [PipelineMode::Composed, PipelineMode::Legacy] {
        println!("{:?} pipeline", mode);
        let document = MemoryDocument::new().with_element("inventory");
        let mut table = DataTable::mount_in(config(mode), &document).unwrap();

        // 1. DOM events, as the browser listeners deliver them
        let clicks = [
            DomEvent::header_click("sku", true),
            DomEvent::header_click("sku", true),
            DomEvent::page_click(PageTarget::Page(3)),
            DomEvent::page_size_change(25),
        ];
        for click in &clicks {
            let handled = table.handle(click).unwrap();
            println!(
                "   {:?} on <{}> handled={} page={}/{}",
                click.kind,
                click.tag,
                handled,
                table.current_page(),
                table.page_count()
            );
        }

        // 2. Scripted events
        for event in events.iter().cloned() {
            println!("   {:?}", event);
            if let Err(e) = table.apply(event) {
                println!("   rejected: {}", e);
            }
        }

        let skus: Vec<String> = table
            .model()
            .visible_rows()
            .iter()
            .filter_map(|r| r.get(0).map(|v| v.display_text()))
            .collect();
        println!("   shown: {:?}", skus);
        println!("   bindings generation {}\n", table.bindings().generation());
    }

    println!("=== Example Complete ===");
}
