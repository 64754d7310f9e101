//! Local preference storage.
//!
//! # Invariants
//! - Settings survive `clear_db`; only records are wiped by a demo reset.
//! - The theme preference lives under the fixed key `theme`.

use crate::repo::record_repo::{SqliteRecordStore, StoreError, StoreResult};
use rusqlite::params;
use std::fmt::{Display, Formatter};

/// Fixed key holding the UI theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository interface for string preferences.
pub trait SettingsRepository {
    fn get_setting(&self, key: &str) -> StoreResult<Option<String>>;
    fn put_setting(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl SettingsRepository for SqliteRecordStore<'_> {
    fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT value FROM settings WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        self.connection().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Reads the stored theme, falling back to `Theme::Light` when unset.
///
/// # Errors
/// - `InvalidData` when the stored value is not `light` or `dark`.
pub fn load_theme(repo: &impl SettingsRepository) -> StoreResult<Theme> {
    match repo.get_setting(THEME_KEY)? {
        Some(value) => Theme::parse(&value)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown theme `{value}`"))),
        None => Ok(Theme::default()),
    }
}

pub fn save_theme(repo: &impl SettingsRepository, theme: Theme) -> StoreResult<()> {
    repo.put_setting(THEME_KEY, theme.as_str())
}
