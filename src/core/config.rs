use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Effective configuration as YAML.
    pub fn render(cfg: &Config) -> AppResult<String> {
        serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Platform editor used when none is requested.
    pub fn default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    /// Open `path` in `editor`, falling back to the default editor.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let fallback = Self::default_editor();
        let requested = editor.map(str::to_string).unwrap_or_else(|| fallback.clone());

        if run_editor(&requested, path) {
            success(format!("Configuration file edited using '{requested}'"));
            return Ok(());
        }

        warning(format!(
            "Editor '{requested}' not available, falling back to '{fallback}'"
        ));

        if requested != fallback && run_editor(&fallback, path) {
            success(format!("Configuration file edited using '{fallback}'"));
            return Ok(());
        }

        Err(AppError::Config(format!(
            "failed to edit {} with '{fallback}'",
            path.display()
        )))
    }
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}
