use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// ── Report configuration ─────────────────────────────────────────────

/// Fully resolved options for one report run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    pub json_file:     PathBuf,
    pub summary:       bool,
    pub scanning:      bool,
    pub failed:        bool,
    pub pager:         bool,
    pub low_space:     Option<f64>,
    pub min_bad_disks: Option<usize>,
    /// Domain suffix stripped from server names; empty keeps the first label.
    pub trim_domain:   String,
    pub color:         bool,
}

/// The one detail section a report ends with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportMode {
    /// Every displayed disk.
    Disks,
    /// Per-erasure-set averages.
    Sets,
    /// Failed disks only.
    FailedDisks,
    /// Erasure sets below a free-space threshold.
    LowSpace(f64),
}

impl ReportConfig {
    /// Reject option combinations that cannot produce a report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scanning && self.failed {
            return Err(ConfigError::ScanningWithFailed);
        }
        if let Some(t) = self.low_space {
            if !self.summary { return Err(ConfigError::LowSpaceWithoutSummary); }
            if !t.is_finite() { return Err(ConfigError::LowSpaceNotFinite(t)); }
        }
        if self.min_bad_disks.is_some() && !(self.summary && self.failed) {
            return Err(ConfigError::MinBadDisksWithoutFailedSummary);
        }
        Ok(())
    }

    pub fn mode(&self) -> ReportMode {
        match (self.summary, self.failed, self.low_space) {
            (false, true, _)      => ReportMode::FailedDisks,
            (true, _, Some(t))    => ReportMode::LowSpace(t),
            (true, _, None)       => ReportMode::Sets,
            (false, false, _)     => ReportMode::Disks,
        }
    }
}

// ── Settings file ────────────────────────────────────────────────────

/// Persistent defaults and the named snapshot registry.
///
/// Example `mdb.toml`:
/// ```toml
/// [defaults]
/// trim_domain = ".example.com"
/// pager       = true
/// theme       = "nord"
///
/// [profiles]
/// prod    = "/srv/diag/prod.json"
/// staging = "/srv/diag/staging.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub trim_domain: String,
    #[serde(default)]
    pub pager:       bool,
    #[serde(default = "default_color")]
    pub color:       bool,
    /// Pager colour theme: default, dracula, gruvbox or nord.
    #[serde(default = "default_theme")]
    pub theme:       String,
}

fn default_color() -> bool { true }
fn default_theme() -> String { "default".into() }

impl Default for Defaults {
    fn default() -> Self {
        Self { trim_domain: String::new(), pager: false, color: true, theme: default_theme() }
    }
}

impl Settings {
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mdb").join("mdb.toml"))
    }

    /// Load from the default location; a missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(p) => Self::load_from(&p),
            None    => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(settings_err(path, e)),
        };
        toml::from_str(&text).map_err(|e| settings_err(path, e))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| settings_err(path, e))?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| settings_err(path, e))?;
        fs::write(path, format!("# mdb settings\n\n{}", text)).map_err(|e| settings_err(path, e))
    }

    // ── Profiles ──────────────────────────────────────────────────────

    pub fn add_profile(&mut self, name: &str, file: PathBuf) -> Result<(), ConfigError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidProfileName(name.to_string()));
        }
        self.profiles.insert(name.to_string(), file);
        Ok(())
    }

    pub fn remove_profile(&mut self, name: &str) -> Result<PathBuf, ConfigError> {
        self.profiles.remove(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }

    /// Map a command-line target to a snapshot file: an existing path wins,
    /// then a profile of that name; anything else is passed through so the
    /// loader can report it.
    pub fn resolve(&self, target: &str) -> PathBuf {
        let direct = PathBuf::from(target);
        if direct.exists() {
            return direct;
        }
        match self.profiles.get(target) {
            Some(p) => {
                debug!(profile = target, path = %p.display(), "resolved profile");
                p.clone()
            }
            None => direct,
        }
    }
}

fn settings_err(path: &Path, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Settings { path: path.to_path_buf(), message: e.to_string() }
}
