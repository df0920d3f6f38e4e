//! Main application entry point.
//!
//! Usage: `sortable [config.json] < events.jsonl`

use sortable_app::{App, AppConfig};
use std::io;

fn main() {
    env_logger::init();
    log::info!("Starting sortable");

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path),
        None => Ok(AppConfig::default()),
    };

    let result = config.and_then(App::new).and_then(|mut app| {
        let stdin = io::stdin();
        let stdout = io::stdout();
        app.run(stdin.lock(), stdout.lock())
    });

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
