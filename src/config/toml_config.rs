use crate::core::spin::Spinner;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PickerError, Result};
use crate::utils::validation::{
    validate_one_of, validate_path, validate_positive_number, validate_range, Validate,
    LOG_FORMATS, MAX_DEDUP_DAYS, MAX_SPIN_INTERVAL_MS, MAX_SPIN_TICKS,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub picker: PickerSection,
    #[serde(default)]
    pub selection: SelectionSection,
    pub animation: Option<AnimationSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerSection {
    pub pool_path: String,
    pub log_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSection {
    #[serde(default)]
    pub exclude: String,
    #[serde(default = "default_dedup_days")]
    pub dedup_days: u32,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl Default for SelectionSection {
    fn default() -> Self {
        Self {
            exclude: String::new(),
            dedup_days: default_dedup_days(),
            samples: default_samples(),
        }
    }
}

fn default_dedup_days() -> u32 {
    30
}

fn default_samples() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSection {
    pub enabled: bool,
    pub ticks: Option<u32>,
    pub interval_ms: Option<u64>,
    pub slowdown: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PickerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PickerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PickerError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 動畫設定；未設定時使用預設值
    pub fn spinner(&self) -> Option<Spinner> {
        match &self.animation {
            None => Some(Spinner::default()),
            Some(anim) if !anim.enabled => None,
            Some(anim) => {
                let base = if anim.slowdown.unwrap_or(false) {
                    Spinner::slowing()
                } else {
                    Spinner::default()
                };
                Some(Spinner {
                    ticks: anim.ticks.unwrap_or(base.ticks),
                    interval: anim
                        .interval_ms
                        .map(Duration::from_millis)
                        .unwrap_or(base.interval),
                    slowdown: base.slowdown,
                })
            }
        }
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("text")
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn pool_path(&self) -> &Path {
        Path::new(&self.picker.pool_path)
    }

    fn log_path(&self) -> &Path {
        Path::new(&self.picker.log_path)
    }

    fn exclude(&self) -> &str {
        &self.selection.exclude
    }

    fn dedup_days(&self) -> u32 {
        self.selection.dedup_days
    }

    fn sample_count(&self) -> usize {
        self.selection.samples
    }
}

/// `${VAR}` left in a value means the variable was not set at load time.
fn require_resolved(value: &str) -> Result<()> {
    let unresolved = value
        .split_once("${")
        .and_then(|(_, rest)| rest.split_once('}'))
        .map(|(name, _)| name);
    match unresolved {
        Some(name) => Err(PickerError::MissingConfigError {
            field: name.to_string(),
        }),
        None => Ok(()),
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        require_resolved(&self.picker.pool_path)?;
        require_resolved(&self.picker.log_path)?;
        validate_path("picker.pool_path", &self.picker.pool_path)?;
        validate_path("picker.log_path", &self.picker.log_path)?;
        validate_positive_number("selection.samples", self.selection.samples, 1)?;
        validate_range(
            "selection.dedup_days",
            self.selection.dedup_days,
            0,
            MAX_DEDUP_DAYS,
        )?;
        if let Some(ticks) = self.animation.as_ref().and_then(|a| a.ticks) {
            validate_range("animation.ticks", ticks, 0, MAX_SPIN_TICKS)?;
        }
        if let Some(interval_ms) = self.animation.as_ref().and_then(|a| a.interval_ms) {
            validate_range("animation.interval_ms", interval_ms, 0, MAX_SPIN_INTERVAL_MS)?;
        }
        validate_one_of("logging.format", self.log_format(), LOG_FORMATS)?;
        Ok(())
    }
}
