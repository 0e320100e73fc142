use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("ALBUM_API_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));
pub static DATABASE_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("database.sqlite"));

pub const DEFAULT_MAX_PAGE_SIZE: i64 = 500;

/// Upper bound on parent links followed while resolving an album path.
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 256;
