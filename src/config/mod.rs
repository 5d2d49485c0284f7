use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_server_addr")]
    pub server_addr: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_so_number_seed")]
    pub so_number_seed: i64,
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_server_addr() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_page_size() -> usize {
    20
}
fn default_so_number_seed() -> i64 {
    3_184_947
}
fn default_max_attachment_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_log_filter() -> String {
    "phainspect=info,tower_http=info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    /// Default settings pointing at the given database path.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            server_addr: default_server_addr(),
            page_size: default_page_size(),
            so_number_seed: default_so_number_seed(),
            max_attachment_bytes: default_max_attachment_bytes(),
            log_filter: default_log_filter(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("phainspect")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".phainspect")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("phainspect.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("phainspect.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = std::path::Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("phainspect.sqlite"),
        };

        let config = Config::with_database(db_path.to_string_lossy().to_string());

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.so_number_seed, 3_184_947);
        assert_eq!(cfg.server_addr, "127.0.0.1:8080");
    }
}
