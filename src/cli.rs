//! CLI command implementations for ctf-reflex.

pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod validate;

mod output;

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use ctf_reflex::agents::DEFAULT_ROLES;
use ctf_reflex::error::{ConfigError, LayoutError, MapGenError, MatchError, ReplayError};
use ctf_reflex::tournament::{Lineup, generate_layout};
use ctf_reflex::{Layout, MatchConfig, RoleId};

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// The board as an ASCII grid.
    Ascii,
    /// Structured status text.
    Status,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Match setup shared by `run` and `tournament`.
#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Layout file (default: built-in layout)
    #[arg(short, long, conflicts_with = "random_layout")]
    pub(crate) layout: Option<PathBuf>,

    /// Generate a symmetric layout of this size per seed, e.g. 24x11
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub(crate) random_layout: Option<(i32, i32)>,

    /// Maximum plies (default: config file or 1200)
    #[arg(short, long)]
    pub(crate) turns: Option<u32>,

    /// Red roles, e.g. offensive,defensive
    #[arg(long, value_parser = parse_roles)]
    pub(crate) red: Option<(RoleId, RoleId)>,

    /// Blue roles, e.g. defensive,defensive
    #[arg(long, value_parser = parse_roles)]
    pub(crate) blue: Option<(RoleId, RoleId)>,

    /// JSON match configuration file
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Check engine invariants after every ply
    #[arg(long)]
    pub(crate) check: bool,
}

impl MatchArgs {
    /// Match configuration: file values, then flag overrides.
    pub(crate) fn match_config(&self) -> Result<MatchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        if let Some(turns) = self.turns {
            config.max_turns = turns;
        }
        if self.check {
            config.check_invariants = true;
        }
        Ok(config)
    }

    /// Lineup from the role flags.
    pub(crate) fn lineup(&self) -> Lineup {
        Lineup {
            red: self.red.unwrap_or(DEFAULT_ROLES),
            blue: self.blue.unwrap_or(DEFAULT_ROLES),
        }
    }

    /// Layout for the match played with `seed`.
    pub(crate) fn layout(&self, seed: u64) -> Result<Layout, CliError> {
        if let Some((width, height)) = self.random_layout {
            return Ok(generate_layout(seed, width, height)?);
        }
        match &self.layout {
            Some(path) => read_layout(path),
            None => Ok(Layout::default_capture()?),
        }
    }
}

/// Read and parse a layout file.
pub(crate) fn read_layout(path: &Path) -> Result<Layout, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    Ok(Layout::parse(&text)?)
}

/// Seed from the flag, or from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(42)
    })
}

fn parse_roles(s: &str) -> Result<(RoleId, RoleId), String> {
    let (first, second) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two roles separated by a comma, got '{s}'"))?;
    let first = first.trim().parse::<RoleId>().map_err(|e| e.to_string())?;
    let second = second.trim().parse::<RoleId>().map_err(|e| e.to_string())?;
    Ok((first, second))
}

fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<LayoutError> for CliError {
    fn from(e: LayoutError) -> Self {
        Self::new(format!("Invalid layout: {e}"))
    }
}

impl From<MapGenError> for CliError {
    fn from(e: MapGenError) -> Self {
        Self::new(format!("Layout generation failed: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::new(format!("Match failed: {e}"))
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        Self::new(format!("Replay failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!(
            parse_roles("offensive, DefensiveAgent"),
            Ok((RoleId::Offensive, RoleId::Defensive))
        );
        assert!(parse_roles("offensive").is_err());
        assert!(parse_roles("offensive,goalie").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("24x11"), Ok((24, 11)));
        assert_eq!(parse_size("16X7"), Ok((16, 7)));
        assert!(parse_size("24").is_err());
        assert!(parse_size("ax7").is_err());
    }
}
