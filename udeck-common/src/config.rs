//! Configuration loading and data directory resolution

use std::path::PathBuf;

/// Environment variable overriding the data directory location.
pub const DATA_DIR_ENV: &str = "UDECK_DATA_DIR";

/// Data directory resolution priority order:
/// 1. Explicit caller argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    // Priority 1: explicit argument
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(data_dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Find the configuration file for the platform, if one exists
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("udeck").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/udeck/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default data directory path
pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/udeck (or /var/lib/udeck for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("udeck"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/udeck"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/udeck
        dirs::data_dir()
            .map(|d| d.join("udeck"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/udeck"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\udeck
        dirs::data_local_dir()
            .map(|d| d.join("udeck"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\udeck"))
    } else {
        PathBuf::from("./udeck_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn explicit_argument_wins() {
        let resolved = resolve_data_dir(Some("/tmp/udeck-test"));
        assert_eq!(resolved, PathBuf::from("/tmp/udeck-test"));
    }

    #[test]
    #[serial]
    fn environment_variable_used_when_no_argument() {
        std::env::set_var(DATA_DIR_ENV, "/tmp/udeck-env-test");
        let resolved = resolve_data_dir(None);
        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(resolved, PathBuf::from("/tmp/udeck-env-test"));
    }

    #[test]
    #[serial]
    fn explicit_argument_beats_environment() {
        std::env::set_var(DATA_DIR_ENV, "/tmp/udeck-env-test");
        let resolved = resolve_data_dir(Some("/tmp/udeck-arg-test"));
        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(resolved, PathBuf::from("/tmp/udeck-arg-test"));
    }

    #[test]
    #[serial]
    fn default_ends_with_app_directory() {
        std::env::remove_var(DATA_DIR_ENV);
        let default = default_data_dir();
        let name = default.file_name().and_then(|n| n.to_str()).unwrap_or("");
        assert!(name == "udeck" || name == "udeck_data");
    }
}
