// Platform paths
// Where the settings file and the SQLite store live on each OS.
//
// Uses `cfg(target_os)` to select the platform convention at compile time.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "coursefinder";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/coursefinder` or `~/.config/coursefinder`
/// - **macOS**: `~/Library/Application Support/coursefinder`
/// - **Windows**: `%APPDATA%/coursefinder`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
            .join(APP_DIR)
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
            _ => home_dir().join(".config").join(APP_DIR),
        }
    }
}

/// Returns the platform-specific data directory (SQLite store).
///
/// - **Linux**: `$XDG_DATA_HOME/coursefinder` or `~/.local/share/coursefinder`
/// - **macOS**: `~/Library/Application Support/coursefinder`
/// - **Windows**: `%LOCALAPPDATA%/coursefinder`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        env::var("LOCALAPPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join("AppData").join("Local"))
            .join(APP_DIR)
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
            _ => home_dir().join(".local").join("share").join(APP_DIR),
        }
    }
}

/// Default SQLite file inside the data directory.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("coursefinder.db")
}
