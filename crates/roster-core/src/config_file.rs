use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConvertSettings, ExtractionSettings, MappingConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_BODY_LIMIT_MB: u64 = 50;
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_OUTPUT_DIR: &str = "output_csvs";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub paths: Option<PathsConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub mapping: Option<MappingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: Option<String>,
    pub body_limit_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub uploads_dir: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub x_tolerance: Option<f64>,
    pub y_tolerance: Option<f64>,
    pub snap_tolerance: Option<f64>,
    pub join_tolerance: Option<f64>,
    pub strict_lines: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSection {
    pub student_column: Option<String>,
    pub division_column: Option<String>,
    pub team_id_aliases: Option<Vec<String>>,
    pub team_default: Option<i64>,
    pub option_columns: Option<BTreeMap<String, Vec<String>>>,
}

/// Platform config directory path: `<config_dir>/roster/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("roster").join("config.toml"))
}

/// Load config by cascading CWD `.roster.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".roster.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let pick = |o: Option<String>, b: Option<String>| o.or(b);

    let (bs, os) = (base.server.unwrap_or_default(), overlay.server.unwrap_or_default());
    let (bp, op) = (base.paths.unwrap_or_default(), overlay.paths.unwrap_or_default());
    let (be, oe) = (
        base.extraction.unwrap_or_default(),
        overlay.extraction.unwrap_or_default(),
    );
    let (bm, om) = (base.mapping.unwrap_or_default(), overlay.mapping.unwrap_or_default());

    ConfigFile {
        server: Some(ServerConfig {
            bind_addr: pick(os.bind_addr, bs.bind_addr),
            body_limit_mb: os.body_limit_mb.or(bs.body_limit_mb),
        }),
        paths: Some(PathsConfig {
            uploads_dir: pick(op.uploads_dir, bp.uploads_dir),
            output_dir: pick(op.output_dir, bp.output_dir),
        }),
        extraction: Some(ExtractionConfig {
            x_tolerance: oe.x_tolerance.or(be.x_tolerance),
            y_tolerance: oe.y_tolerance.or(be.y_tolerance),
            snap_tolerance: oe.snap_tolerance.or(be.snap_tolerance),
            join_tolerance: oe.join_tolerance.or(be.join_tolerance),
            strict_lines: oe.strict_lines.or(be.strict_lines),
        }),
        mapping: Some(MappingSection {
            student_column: pick(om.student_column, bm.student_column),
            division_column: pick(om.division_column, bm.division_column),
            team_id_aliases: om.team_id_aliases.or(bm.team_id_aliases),
            team_default: om.team_default.or(bm.team_default),
            option_columns: om.option_columns.or(bm.option_columns),
        }),
    }
}

impl ConfigFile {
    pub fn bind_addr(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind_addr.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    pub fn body_limit_bytes(&self) -> usize {
        let mb = self
            .server
            .as_ref()
            .and_then(|s| s.body_limit_mb)
            .unwrap_or(DEFAULT_BODY_LIMIT_MB);
        (mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(|p| p.uploads_dir.as_deref())
            .unwrap_or(DEFAULT_UPLOADS_DIR)
            .into()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(|p| p.output_dir.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_DIR)
            .into()
    }

    /// Resolve the extraction and mapping sections over the built-in
    /// defaults.
    pub fn convert_settings(&self) -> ConvertSettings {
        let mut extraction = ExtractionSettings::default();
        if let Some(e) = &self.extraction {
            extraction.x_tolerance = e.x_tolerance.unwrap_or(extraction.x_tolerance);
            extraction.y_tolerance = e.y_tolerance.unwrap_or(extraction.y_tolerance);
            extraction.snap_tolerance = e.snap_tolerance.unwrap_or(extraction.snap_tolerance);
            extraction.join_tolerance = e.join_tolerance.unwrap_or(extraction.join_tolerance);
            extraction.strict_lines = e.strict_lines.unwrap_or(extraction.strict_lines);
        }

        let mut mapping = MappingConfig::default();
        if let Some(m) = &self.mapping {
            if let Some(v) = &m.student_column {
                mapping.student_column = v.clone();
            }
            if let Some(v) = &m.division_column {
                mapping.division_column = v.clone();
            }
            if let Some(v) = &m.team_id_aliases {
                mapping.team_id_aliases = v.clone();
            }
            if let Some(v) = m.team_default {
                mapping.team_default = v;
            }
            if let Some(v) = &m.option_columns {
                mapping.option_columns = v.clone();
            }
        }

        ConvertSettings {
            extraction,
            mapping,
        }
    }
}
