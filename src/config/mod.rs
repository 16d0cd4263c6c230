use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::services::BudgetThresholds;
use crate::errors::LedgerError;
use crate::ledger::{CategoryCatalog, TransactionType};
use crate::storage::DEFAULT_PAGE_SIZE;
use crate::utils::{app_data_dir, config_file_in, ensure_dir};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub thresholds: BudgetThresholds,
    /// Replaces the built-in label list for the given transaction type.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub category_overrides: BTreeMap<TransactionType, Vec<String>>,
    pub default_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            thresholds: BudgetThresholds::default(),
            category_overrides: BTreeMap::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn catalog(&self) -> CategoryCatalog {
        CategoryCatalog::with_overrides(&self.category_overrides)
    }

    pub fn thresholds(&self) -> BudgetThresholds {
        self.thresholds
    }

    /// Rejects values serde alone cannot rule out.
    pub fn validate(&self) -> Result<(), LedgerError> {
        BudgetThresholds::new(self.thresholds.warning_above, self.thresholds.over_above)?;
        if self.default_page_size == 0 {
            return Err(LedgerError::Validation(
                "default_page_size must be at least 1".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(LedgerError::Validation("currency must not be empty".into()));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
