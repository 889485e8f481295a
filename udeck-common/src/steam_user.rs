//! Steam account detection
//!
//! Finds the account most recently signed in to the local Steam install by
//! parsing `config/loginusers.vdf`, falling back to directory modification
//! times under `userdata/` when the login file is missing or unhelpful.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A SteamID64 used as a block key in loginusers.vdf.
static STEAM64_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*"(\d{17})"\s*$"#).unwrap());

/// A quoted key/value line inside a block.
static QUOTED_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"([^"]+)"\s+"([^"]*)"\s*$"#).unwrap());

/// Get the active Steam user's account id (the `userdata/` folder name).
///
/// Uses the `MostRecent` flag in loginusers.vdf as the primary source and
/// falls back to mtime-based detection, excluding the reserved id 0.
/// The install path is auto-detected when not given.
pub fn get_active_user_id(steam_path: Option<&Path>) -> Option<String> {
    let steam_path = match steam_path.map(Path::to_path_buf).or_else(find_steam_path) {
        Some(path) => path,
        None => {
            warn!("Could not find Steam installation path");
            return None;
        }
    };

    if let Some(user_id) = user_from_login_file(&steam_path) {
        info!(user_id = %user_id, "Active Steam user from loginusers.vdf");
        return Some(user_id);
    }

    if let Some(user_id) = user_from_mtime(&steam_path) {
        info!(user_id = %user_id, "Active Steam user from userdata mtime fallback");
        return Some(user_id);
    }

    warn!("Could not detect the active Steam user");
    None
}

/// Validate that a user id has a userdata directory with a config folder.
pub fn validate_user_id(steam_path: &Path, user_id: &str) -> bool {
    if user_id == "0" {
        return false;
    }
    steam_path.join("userdata").join(user_id).join("config").exists()
}

/// Find the Steam installation directory
fn find_steam_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    [home.join(".steam/steam"), home.join(".local/share/Steam")]
        .into_iter()
        .find(|path| path.join("steamapps").exists())
}

/// Read the account flagged `MostRecent` from loginusers.vdf.
///
/// The file keys users by SteamID64; the userdata folder name is the low
/// 32 bits of that id. Parsing is line-oriented and tolerant: anything
/// unexpected just means no answer, and the mtime fallback takes over.
fn user_from_login_file(steam_path: &Path) -> Option<String> {
    let login_path = steam_path.join("config").join("loginusers.vdf");
    let content = match std::fs::read_to_string(&login_path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %login_path.display(), error = %e, "loginusers.vdf not readable");
            return None;
        }
    };

    let mut current_steam64: Option<u64> = None;
    for line in content.lines() {
        if let Some(caps) = STEAM64_KEY.captures(line) {
            current_steam64 = caps[1].parse::<u64>().ok();
            continue;
        }
        let Some(caps) = QUOTED_PAIR.captures(line) else {
            continue;
        };
        if &caps[1] != "MostRecent" || &caps[2] != "1" {
            continue;
        }
        let Some(steam64) = current_steam64 else {
            continue;
        };
        let account_id = (steam64 & 0xFFFF_FFFF).to_string();
        if steam_path.join("userdata").join(&account_id).exists() {
            return Some(account_id);
        }
        warn!(account_id = %account_id, "MostRecent user has no userdata directory");
    }

    debug!("No MostRecent user found in loginusers.vdf");
    None
}

/// Fallback: most recently modified numeric userdata directory.
///
/// User 0 is a meta-directory, never a real account.
fn user_from_mtime(steam_path: &Path) -> Option<String> {
    let userdata = steam_path.join("userdata");
    let entries = std::fs::read_dir(&userdata).ok()?;

    let mut candidates: Vec<(String, std::time::SystemTime)> = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if name == "0" {
            debug!("Skipping reserved userdata id 0");
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }
        let Ok(mtime) = metadata.modified() else {
            continue;
        };
        candidates.push((name, mtime));
    }

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.into_iter().next().map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // SteamID64 base offset for individual accounts; account id 11223344.
    const LOGIN_FILE: &str = r#"
"users"
{
	"76561197971489072"
	{
		"AccountName"		"someone"
		"PersonaName"		"Someone"
		"MostRecent"		"1"
		"Timestamp"		"1700000000"
	}
	"76561197960265729"
	{
		"AccountName"		"other"
		"MostRecent"		"0"
	}
}
"#;

    fn write_login_file(steam_path: &Path, content: &str) {
        fs::create_dir_all(steam_path.join("config")).unwrap();
        fs::write(steam_path.join("config").join("loginusers.vdf"), content).unwrap();
    }

    #[test]
    fn detects_most_recent_user() {
        let dir = tempfile::tempdir().unwrap();
        let steam_path = dir.path();
        write_login_file(steam_path, LOGIN_FILE);
        fs::create_dir_all(steam_path.join("userdata").join("11223344")).unwrap();

        assert_eq!(
            get_active_user_id(Some(steam_path)),
            Some("11223344".to_string())
        );
    }

    #[test]
    fn most_recent_without_userdata_falls_back_to_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let steam_path = dir.path();
        write_login_file(steam_path, LOGIN_FILE);
        // MostRecent account has no userdata folder; only 555 exists.
        fs::create_dir_all(steam_path.join("userdata").join("555")).unwrap();

        assert_eq!(get_active_user_id(Some(steam_path)), Some("555".to_string()));
    }

    #[test]
    fn meta_user_zero_is_never_returned() {
        let dir = tempfile::tempdir().unwrap();
        let steam_path = dir.path();
        fs::create_dir_all(steam_path.join("userdata").join("0")).unwrap();

        assert_eq!(get_active_user_id(Some(steam_path)), None);
    }

    #[test]
    fn non_numeric_userdata_entries_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let steam_path = dir.path();
        fs::create_dir_all(steam_path.join("userdata").join("ac_cache")).unwrap();
        fs::create_dir_all(steam_path.join("userdata").join("4242")).unwrap();

        assert_eq!(get_active_user_id(Some(steam_path)), Some("4242".to_string()));
    }

    #[test]
    fn validate_requires_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        let steam_path = dir.path();
        fs::create_dir_all(steam_path.join("userdata").join("777").join("config")).unwrap();
        fs::create_dir_all(steam_path.join("userdata").join("888")).unwrap();

        assert!(validate_user_id(steam_path, "777"));
        assert!(!validate_user_id(steam_path, "888"));
        assert!(!validate_user_id(steam_path, "0"));
        assert!(!validate_user_id(steam_path, "999"));
    }

    #[test]
    fn unreadable_login_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(get_active_user_id(Some(dir.path())), None);
    }
}
