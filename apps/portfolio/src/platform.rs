//! Desktop implementations of the clipboard and theme-preference seams.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;
use presentation_core::{theme::Theme, ClipboardWriter, ThemeStore};
use serde::{Deserialize, Serialize};

pub struct ArboardClipboard;

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().map_err(|err| anyhow!(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| anyhow!("failed to write clipboard: {err}"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PreferencesFile {
    theme: String,
}

pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow!("unable to resolve local config dir"))?;
        Ok(base.join("portfolio").join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read '{}'", self.path.display()))?;
        let file: PreferencesFile = toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{}'", self.path.display()))?;
        let theme = file.theme.parse::<Theme>().map_err(|err| anyhow!(err))?;
        Ok(Some(theme))
    }

    fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create preferences dir '{}'", parent.display())
            })?;
        }
        let raw = toml::to_string(&PreferencesFile {
            theme: theme.as_str().to_string(),
        })?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write '{}'", self.path.display()))
    }
}
