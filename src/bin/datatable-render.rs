/// DataTable Renderer CLI
///
/// Builds a table from a JSON config, replays an optional file of events (one JSON
/// `TableEvent` per line), and prints the final contents of the mount element. Page
/// links carry the `active` class the browser would show.
///
/// Usage: datatable-render <config.json> [events.jsonl]

use datatable::{DataTable, MemoryDocument, TableConfig};
use std::process::ExitCode;

fn run(config_path: &str, events_path: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let config = TableConfig::from_json(&std::fs::read_to_string(config_path)?)?;
    let document = MemoryDocument::new().with_element(config.selector.clone());
    let mut table = DataTable::mount_in(config, &document)?;

    if let Some(path) = events_path {
        let script = std::fs::read_to_string(path)?;
        let applied = table
            .replay(&script)
            .map_err(|e| format!("{}: {}", path, e))?;
        log::info!("applied {} events from {}", applied, path);
    }

    let stats = table.mount().stats();
    log::info!(
        "page {} of {}, {} full draws, {} row redraws, {} pagination redraws",
        table.current_page(),
        table.page_count(),
        stats.full_draws,
        stats.row_redraws,
        stats.pagination_redraws
    );
    Ok(table.mount().inner_html())
}

fn main() -> ExitCode {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args: Vec<String> = std::env::args().collect();
    let Some(config_path) = args.get(1) else {
        eprintln!("usage: datatable-render <config.json> [events.jsonl]");
        return ExitCode::from(2);
    };

    match run(config_path, args.get(2).map(|s| s.as_str())) {
        Ok(html) => {
            println!("{}", html);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
