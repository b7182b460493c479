//! Settings file for the installer modules.
//!
//! One JSON document configures branding and the defaults of each module.
//! Every section is optional; missing values fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    /// Product name used in summaries, e.g. "Install Acme on ...".
    pub short_product_name: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            short_product_name: "Generic".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocaleSettings {
    /// Default region, e.g. "Europe"
    pub region: Option<String>,
    /// Default zone within `region`, e.g. "Berlin"
    pub zone: Option<String>,
    pub locale_gen_path: Option<PathBuf>,
    pub zone_tab_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartitionSettings {
    /// Bootloader target used when none is given on the command line:
    /// a device path or a mount point.
    pub boot_loader_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallerSettings {
    pub branding: Branding,
    pub locale: LocaleSettings,
    pub partition: PartitionSettings,
}

impl InstallerSettings {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize settings to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;
        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.branding.short_product_name.trim().is_empty() {
            anyhow::bail!("branding.shortProductName must not be empty");
        }

        match (&self.locale.region, &self.locale.zone) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("locale.region and locale.zone must be given together");
            }
            (Some(region), Some(zone)) if region.trim().is_empty() || zone.trim().is_empty() => {
                anyhow::bail!("locale.region and locale.zone must not be empty");
            }
            _ => {}
        }

        if let Some(target) = &self.partition.boot_loader_path {
            if !target.is_empty() && !target.starts_with('/') {
                anyhow::bail!(
                    "partition.bootLoaderPath must be a device path or an absolute mount point"
                );
            }
        }

        Ok(())
    }
}
