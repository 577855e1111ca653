use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::platform::detect_system_dark_mode;

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 24;
pub const FONT_SIZE_STEP: u32 = 2;

const FALLBACK_SHELLS: &[&str] = &["/bin/bash", "/bin/sh", "/usr/bin/bash", "/bin/zsh"];
const LAST_RESORT_SHELL: &str = "/bin/sh";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

impl ThemeMode {
    pub fn is_dark(self) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::SystemDefault => detect_system_dark_mode(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default)]
    pub word_wrap_enabled: bool,

    /// Shell for the terminal pane. `None` uses `$SHELL`, then `/bin/bash`.
    #[serde(default)]
    pub shell: Option<String>,

    #[serde(default = "default_scrollback_lines")]
    pub scrollback_lines: usize,
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Dark
}

fn default_font_size() -> u32 {
    12
}

fn default_line_numbers() -> bool {
    true
}

fn default_scrollback_lines() -> usize {
    1000
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            font_size: default_font_size(),
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: false,
            shell: None,
            scrollback_lines: default_scrollback_lines(),
        }
    }
}

impl AppSettings {
    /// Load settings from the user config dir, or defaults if missing/corrupt
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %path.display(), "failed to parse settings: {e}; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "no settings file; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("termpad");
        path.push("settings.json");
        path
    }

    /// Shell to launch in the terminal pane.
    pub fn resolve_shell(&self) -> String {
        self.shell_candidates()
            .into_iter()
            .next()
            .unwrap_or_else(|| LAST_RESORT_SHELL.to_string())
    }

    /// Shells to try, most preferred first: the override, `$SHELL`, then the
    /// usual locations. Absolute paths that do not exist are skipped; bare
    /// names are kept for a PATH lookup. Never empty.
    pub fn shell_candidates(&self) -> Vec<String> {
        let preferred = self.shell.clone().into_iter().chain(std::env::var("SHELL").ok());
        let fallbacks = FALLBACK_SHELLS.iter().map(|s| s.to_string());

        let mut shells: Vec<String> = Vec::new();
        for shell in preferred.chain(fallbacks) {
            let shell = shell.trim().to_string();
            if shell.is_empty() || shells.contains(&shell) {
                continue;
            }
            if shell.contains('/') && !Path::new(&shell).exists() {
                debug!(shell, "skipping missing shell");
                continue;
            }
            shells.push(shell);
        }
        if shells.is_empty() {
            shells.push(LAST_RESORT_SHELL.to_string());
        }
        shells
    }
}

/// Theme and zoom level currently applied to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPreferences {
    pub dark_mode: bool,
    font_size: u32,
}

impl ViewPreferences {
    pub fn new(dark_mode: bool, font_size: u32) -> Self {
        Self {
            dark_mode,
            font_size: font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.theme_mode.is_dark(), settings.font_size)
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn zoom_in(&mut self) {
        self.font_size = (self.font_size + FONT_SIZE_STEP).min(MAX_FONT_SIZE);
    }

    pub fn zoom_out(&mut self) {
        self.font_size = self
            .font_size
            .saturating_sub(FONT_SIZE_STEP)
            .max(MIN_FONT_SIZE);
    }

    /// Copy the current view back into persisted settings.
    pub fn store_into(&self, settings: &mut AppSettings) {
        settings.theme_mode = if self.dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        settings.font_size = self.font_size;
    }
}
