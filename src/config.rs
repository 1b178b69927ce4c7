use crate::error::{AgroRiskError, Result};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// JSON file mapping crop name to thresholds and recommendations.
    #[serde(default = "default_crops_file")]
    pub crops_file: PathBuf,
    /// Crops selected for import when the session starts.
    #[serde(default = "default_crops")]
    pub default_crops: Vec<String>,
    /// Directory downloads (CSV, XLSX, GeoJSON) are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub map: MapConfig,
    pub sentinel: Option<SentinelConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Degrees of longitude shown across the map view.
    #[serde(default = "default_span")]
    pub span_deg: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: -1.8,
            center_lon: -79.0,
            span_deg: default_span(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SentinelConfig {
    pub client_id: String,
    pub client_secret: String,
    pub instance_id: String,
    /// south,west,north,east
    #[serde(default = "default_bbox")]
    pub bbox: String,
    #[serde(default = "default_size_px")]
    pub size_px: u32,
    /// start/end, both YYYY-MM-DD
    #[serde(default = "default_time_range")]
    pub time_range: String,
    #[serde(default = "default_ndvi_output")]
    pub output: PathBuf,
}

impl std::fmt::Debug for SentinelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentinelConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("instance_id", &self.instance_id)
            .field("bbox", &self.bbox)
            .field("size_px", &self.size_px)
            .field("time_range", &self.time_range)
            .field("output", &self.output)
            .finish()
    }
}

impl SentinelConfig {
    /// Build from `SENTINEL_CLIENT_ID`, `SENTINEL_CLIENT_SECRET` and
    /// `INSTANCE_ID` when no config section is present.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| AgroRiskError::Config(format!("{} is not set", name)))
        };

        Ok(Self {
            client_id: var("SENTINEL_CLIENT_ID")?,
            client_secret: var("SENTINEL_CLIENT_SECRET")?,
            instance_id: var("INSTANCE_ID")?,
            bbox: default_bbox(),
            size_px: default_size_px(),
            time_range: default_time_range(),
            output: default_ndvi_output(),
        })
    }
}

fn default_crops_file() -> PathBuf {
    PathBuf::from("config/cultivos.json")
}

fn default_crops() -> Vec<String> {
    vec!["maíz".into(), "arroz".into()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_span() -> f64 {
    6.0
}

fn default_bbox() -> String {
    "-1.75,-80.85,-1.65,-80.75".into()
}

fn default_size_px() -> u32 {
    512
}

fn default_time_range() -> String {
    "2025-07-20/2025-07-29".into()
}

fn default_ndvi_output() -> PathBuf {
    PathBuf::from("ndvi_map.png")
}

impl Config {
    /// Load config from an explicit path, or from the standard locations.
    /// Without an explicit path a missing file falls back to defaults.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(AgroRiskError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::warn!("No config.yaml found - using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AgroRiskError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml_str(&config_str)?;
        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let content = Self::substitute_env_vars(content);
        serde_yaml::from_str(&content)
            .map_err(|e| AgroRiskError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in ./config, then the XDG config directory.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("agrorisk").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/agrorisk/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroRiskError::Config("Cannot determine config directory".into()))?
            .join("agrorisk");
        Ok(config_dir.join("config.yaml"))
    }

    /// Sentinel Hub settings from the config file, else from the environment.
    pub fn sentinel_or_env(&self) -> Result<SentinelConfig> {
        match &self.sentinel {
            Some(s) => Ok(s.clone()),
            None => SentinelConfig::from_env(),
        }
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up agrorisk!");
        println!();

        println!("Crops");
        let crops_file: String = Input::new()
            .with_prompt("  Crop rules file")
            .default("config/cultivos.json".into())
            .interact_text()
            .map_err(|e| AgroRiskError::Config(format!("Input error: {}", e)))?;

        let default_crops: String = Input::new()
            .with_prompt("  Crops selected at start (comma separated, blank for all)")
            .default("maíz, arroz".into())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AgroRiskError::Config(format!("Input error: {}", e)))?;

        let output_dir: String = Input::new()
            .with_prompt("  Download directory")
            .default(".".into())
            .interact_text()
            .map_err(|e| AgroRiskError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Sentinel Hub (leave client ID blank to use environment variables)");
        let client_id: String = Input::new()
            .with_prompt("  Client ID")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AgroRiskError::Config(format!("Input error: {}", e)))?;

        let sentinel = if client_id.is_empty() {
            None
        } else {
            let client_secret: String = Password::new()
                .with_prompt("  Client secret")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| AgroRiskError::Config(format!("Input error: {}", e)))?;

            let instance_id: String = Input::new()
                .with_prompt("  Instance ID")
                .interact_text()
                .map_err(|e| AgroRiskError::Config(format!("Input error: {}", e)))?;

            Some(SentinelConfig {
                client_id,
                client_secret,
                instance_id,
                bbox: default_bbox(),
                size_px: default_size_px(),
                time_range: default_time_range(),
                output: default_ndvi_output(),
            })
        };

        println!();

        let config = Config {
            crops_file: PathBuf::from(crops_file),
            default_crops: default_crops
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
            output_dir: PathBuf::from(output_dir),
            map: MapConfig::default(),
            sentinel,
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AgroRiskError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agrorisk configuration\n# Generated by `agrorisk init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return content.to_string();
        };

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crops_file: default_crops_file(),
            default_crops: default_crops(),
            output_dir: default_output_dir(),
            map: MapConfig::default(),
            sentinel: None,
        }
    }
}
