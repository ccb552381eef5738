use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tracing::{info, warn};

pub use shared::domain::Theme;

pub trait ThemeStore: Send + Sync {
    fn load(&self) -> Result<Option<Theme>>;
    fn save(&self, theme: Theme) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryThemeStore {
    value: Mutex<Option<Theme>>,
}

impl MemoryThemeStore {
    pub fn with_value(theme: Theme) -> Self {
        Self {
            value: Mutex::new(Some(theme)),
        }
    }

    pub fn stored(&self) -> Option<Theme> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        Ok(self.stored())
    }

    fn save(&self, theme: Theme) -> Result<()> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(theme);
        Ok(())
    }
}

/// The page-wide theme flag. Read from the store once, written on every toggle.
pub struct ThemePreference {
    current: Theme,
    store: Arc<dyn ThemeStore>,
}

impl ThemePreference {
    pub fn init(store: Arc<dyn ThemeStore>) -> Self {
        let current = match store.load() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "failed to read saved theme; using default");
                Theme::default()
            }
        };
        info!(theme = current.as_str(), "theme initialized");
        Self { current, store }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current == Theme::Dark
    }

    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        if let Err(err) = self.store.save(self.current) {
            warn!(error = %err, theme = self.current.as_str(), "failed to persist theme");
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        fn load(&self) -> Result<Option<Theme>> {
            anyhow::bail!("storage disabled")
        }

        fn save(&self, _theme: Theme) -> Result<()> {
            anyhow::bail!("storage disabled")
        }
    }

    #[test]
    fn defaults_to_dark_without_saved_value() {
        let preference = ThemePreference::init(Arc::new(MemoryThemeStore::default()));
        assert!(preference.is_dark());
    }

    #[test]
    fn restores_saved_value_and_persists_toggles() {
        let store = Arc::new(MemoryThemeStore::with_value(Theme::Light));
        let mut preference = ThemePreference::init(store.clone());
        assert_eq!(preference.current(), Theme::Light);

        assert_eq!(preference.toggle(), Theme::Dark);
        assert_eq!(store.stored(), Some(Theme::Dark));
        assert_eq!(preference.toggle(), Theme::Light);
        assert_eq!(store.stored(), Some(Theme::Light));
    }

    #[test]
    fn store_failures_do_not_block_toggling() {
        let mut preference = ThemePreference::init(Arc::new(BrokenStore));
        assert_eq!(preference.current(), Theme::Dark);
        assert_eq!(preference.toggle(), Theme::Light);
    }
}
