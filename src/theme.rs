use crate::app_dirs::AppDirs;
use crate::error::StoreError;
use clap::ValueEnum;
use ratatui::style::Color;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Retro,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Retro];

    /// Parse a stored theme name; anything unknown is `None`
    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.to_string() == name.trim())
    }

    pub fn next(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Retro,
            Theme::Retro => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Reset,
                pending: Color::DarkGray,
                correct: Color::Green,
                incorrect: Color::Red,
                current: Color::White,
                accent: Color::Magenta,
            },
            Theme::Light => Palette {
                background: Color::White,
                pending: Color::Gray,
                correct: Color::Rgb(22, 120, 60),
                incorrect: Color::Rgb(190, 30, 45),
                current: Color::Black,
                accent: Color::Blue,
            },
            Theme::Retro => Palette {
                background: Color::Black,
                pending: Color::Rgb(60, 110, 60),
                correct: Color::LightGreen,
                incorrect: Color::Rgb(255, 176, 0),
                current: Color::LightGreen,
                accent: Color::Rgb(255, 176, 0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub pending: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub current: Color,
    pub accent: Color,
}

/// Persisted theme preference: one name in a plain file
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::theme_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    /// Saved theme, or dark when absent or not a known name
    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(name) => Theme::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(name = name.trim(), "unknown theme, using dark");
                Theme::default()
            }),
            Err(_) => Theme::default(),
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&self.path, theme.to_string()).map_err(|e| StoreError::io(&self.path, e))
    }

    /// Save and return the theme after `current`
    pub fn cycle(&self, current: Theme) -> Theme {
        let next = current.next();
        if let Err(e) = self.save(next) {
            tracing::warn!("failed to save theme: {e}");
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_absent_theme_is_dark() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::with_path(dir.path().join("theme"));
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn test_invalid_theme_is_dark() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theme");
        fs::write(&path, "solarized").unwrap();
        assert_eq!(ThemeStore::with_path(&path).load(), Theme::Dark);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::with_path(dir.path().join("nested").join("theme"));
        store.save(Theme::Retro).unwrap();
        assert_eq!(store.load(), Theme::Retro);
    }

    #[test]
    fn test_cycle_persists() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::with_path(dir.path().join("theme"));
        let mut theme = store.load();
        let mut seen = vec![theme];
        for _ in 0..3 {
            theme = store.cycle(theme);
            assert_eq!(store.load(), theme);
            seen.push(theme);
        }
        assert_eq!(
            seen,
            vec![Theme::Dark, Theme::Light, Theme::Retro, Theme::Dark]
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light"), Some(Theme::Light));
        assert_eq!(Theme::from_name("retro\n"), Some(Theme::Retro));
        assert_eq!(Theme::from_name("Light"), None);
    }

    #[test]
    fn test_palettes_distinguish_outcomes() {
        for theme in Theme::ALL {
            let palette = theme.palette();
            assert_ne!(palette.correct, palette.incorrect);
        }
    }
}
