//! Where the engine looks for user files
//!
//! Everything lives in one per-user directory (`~/.config/naive/` on
//! Unix/macOS, `%APPDATA%\naive\` on Windows):
//!
//! ```text
//! config.yaml          engine config (default language, extra grammar dirs)
//! grammars/{id}.yaml   user grammars, searched before the builtin ones
//! logs/naive.log.*     daily-rotated debug log
//! ```
//!
//! Only the logs directory is ever created; the engine never writes config
//! or grammar files.

use std::{env, fs, path::PathBuf};

const APP_DIR: &str = "naive";

/// Per-user directory holding config, grammars and logs
///
/// Unix/macOS: `$XDG_CONFIG_HOME/naive` when set, else `~/.config/naive`.
/// Windows: `%APPDATA%\naive`.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// Directory of user grammar files, first in the registry's search order
pub fn grammars_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("grammars"))
}

/// The engine config read by [`EngineConfig::load`](crate::config::EngineConfig::load)
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// Target of the file log layer
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
