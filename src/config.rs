use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;

use crate::{
    models::{GridSize, PuzzleSettings},
    puzzle::DEFAULT_ATTEMPTS_PER_WORD,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub puzzle: PuzzleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleConfig {
    pub default_settings: PuzzleSettings,
    pub attempts_per_word: usize,
    /// How long a generated puzzle stays available for export (seconds)
    pub puzzle_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                static_dir: "./frontend".to_string(),
            },
            puzzle: PuzzleConfig {
                default_settings: PuzzleSettings::default(),
                attempts_per_word: DEFAULT_ATTEMPTS_PER_WORD,
                puzzle_ttl_secs: 3600,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.server.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.server.static_dir),
        };

        let size = match env::var("DEFAULT_GRID_SIZE") {
            Ok(label) => GridSize::from_label(&label).ok_or_else(|| {
                anyhow!(
                    "DEFAULT_GRID_SIZE must be one of tiny, small, medium, large, huge (got {})",
                    label
                )
            })?,
            Err(_) => defaults.puzzle.default_settings.size,
        };

        let puzzle = PuzzleConfig {
            default_settings: PuzzleSettings {
                size,
                allow_diagonal: parse_flag("ALLOW_DIAGONAL", true)?,
                allow_backwards: parse_flag("ALLOW_BACKWARDS", true)?,
            },
            attempts_per_word: env::var("PLACEMENT_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_ATTEMPTS_PER_WORD.to_string())
                .parse()
                .context("PLACEMENT_ATTEMPTS must be a number")?,
            puzzle_ttl_secs: env::var("PUZZLE_TTL_SECS")
                .unwrap_or_else(|_| defaults.puzzle.puzzle_ttl_secs.to_string())
                .parse()
                .context("PUZZLE_TTL_SECS must be a number")?,
        };

        Ok(Config { server, puzzle })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_bool(&value).with_context(|| format!("{} must be true or false", name)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("invalid boolean '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_settings() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.puzzle.default_settings.size, GridSize::Medium);
        assert!(config.puzzle.default_settings.allow_diagonal);
        assert!(config.puzzle.default_settings.allow_backwards);
        assert_eq!(config.puzzle.attempts_per_word, 100);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" on ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("no").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_from_env_reads_puzzle_settings() {
        env::set_var("DEFAULT_GRID_SIZE", "Large");
        env::set_var("ALLOW_DIAGONAL", "off");
        env::set_var("PUZZLE_TTL_SECS", "120");

        let config = Config::from_env().unwrap();
        assert_eq!(config.puzzle.default_settings.size, GridSize::Large);
        assert!(!config.puzzle.default_settings.allow_diagonal);
        assert_eq!(config.puzzle.puzzle_ttl_secs, 120);

        env::set_var("PUZZLE_TTL_SECS", "soon");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.to_string(), "PUZZLE_TTL_SECS must be a number");

        env::set_var("PUZZLE_TTL_SECS", "120");
        env::set_var("DEFAULT_GRID_SIZE", "gigantic");
        assert!(Config::from_env().is_err());

        env::remove_var("DEFAULT_GRID_SIZE");
        env::remove_var("ALLOW_DIAGONAL");
        env::remove_var("PUZZLE_TTL_SECS");
    }
}
