use anyhow::{Context, Result};
use clap::Parser;

use naive::cli::{cursor_report, render_report, CliArgs};
use naive::config::EngineConfig;
use naive::model::EditorSession;

fn main() -> Result<()> {
    naive::tracing::init();

    let config = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;
    let engine_config = EngineConfig::load();

    let mut session = EditorSession::from_config(&engine_config);
    session
        .open_file(&config.file)
        .with_context(|| format!("Failed to open {}", config.file.display()))?;
    if let Some(id) = &config.language {
        session.set_language(id);
    }
    if session.is_degraded() {
        tracing::warn!("Highlighting degraded: {:?}", session.last_error());
    }

    print!("{}", render_report(&session, config.output));

    if let Some(offset) = config.cursor {
        session.cursor_move_to(offset as isize);
        if let Some(report) = cursor_report(&session) {
            println!("{}", report);
        }
    }

    Ok(())
}
