use crate::core::error::{KunjError, Result};
use std::path::{Path, PathBuf};

pub const KUNJ_DIR: &str = ".kunj";
pub const CONFIG_FILE: &str = "config.json";
pub const BRANCHES_FILE: &str = "branches.json";
pub const WORK_LOG_DIR: &str = "work-logs";

/// `~/.kunj`
pub fn get_global_directory() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(KUNJ_DIR))
        .ok_or(KunjError::HomeDirectoryNotFound)
}

/// `~/.kunj/config.json`
pub fn get_global_config_path() -> Result<PathBuf> {
    Ok(get_global_directory()?.join(CONFIG_FILE))
}

/// `<repo>/.kunj`
pub fn get_local_directory(workdir: &Path) -> PathBuf {
    workdir.join(KUNJ_DIR)
}

pub fn get_local_config_path(workdir: &Path) -> PathBuf {
    get_local_directory(workdir).join(CONFIG_FILE)
}

pub fn get_branches_path(workdir: &Path) -> PathBuf {
    get_local_directory(workdir).join(BRANCHES_FILE)
}

pub fn get_work_log_directory(workdir: &Path) -> PathBuf {
    get_local_directory(workdir).join(WORK_LOG_DIR)
}
