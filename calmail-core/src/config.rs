//! calmail configuration at ~/.config/calmail/config.toml

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::classify::KeywordClassifier;
use crate::error::{CalmailError, CalmailResult};
use crate::reconcile::DEFAULT_PROVENANCE_NOTE;

static DEFAULT_MAILBOX_DIR: &str = "~/mail/calmail";
static DEFAULT_CALENDAR_DIR: &str = "~/calendar/calmail";

fn default_mailbox_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MAILBOX_DIR)
}

fn default_calendar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_DIR)
}

fn default_provenance_note() -> String {
    DEFAULT_PROVENANCE_NOTE.to_string()
}

fn default_create_keywords() -> Vec<String> {
    vec!["Invitation:".to_string()]
}

fn default_update_keywords() -> Vec<String> {
    vec!["Updated invitation".to_string()]
}

fn default_delete_keywords() -> Vec<String> {
    vec!["Canceled event".to_string(), "Cancelled event".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalmailConfig {
    /// Maildir-style directory: one subdirectory per thread, `.eml` messages inside
    #[serde(default = "default_mailbox_dir")]
    pub mailbox_dir: PathBuf,

    /// Directory store the events are written to
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: PathBuf,

    /// Appended to the description of every created event
    #[serde(default = "default_provenance_note")]
    pub provenance_note: String,

    #[serde(default)]
    pub keywords: KeywordsConfig,
}

/// Subject keywords for each intent, matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default = "default_create_keywords")]
    pub create: Vec<String>,
    #[serde(default = "default_update_keywords")]
    pub update: Vec<String>,
    #[serde(default = "default_delete_keywords")]
    pub delete: Vec<String>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        KeywordsConfig {
            create: default_create_keywords(),
            update: default_update_keywords(),
            delete: default_delete_keywords(),
        }
    }
}

impl Default for CalmailConfig {
    fn default() -> Self {
        CalmailConfig {
            mailbox_dir: default_mailbox_dir(),
            calendar_dir: default_calendar_dir(),
            provenance_note: default_provenance_note(),
            keywords: KeywordsConfig::default(),
        }
    }
}

impl CalmailConfig {
    pub fn config_path() -> CalmailResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalmailError::Config("Could not determine config directory".into()))?
            .join("calmail");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented default if missing), with
    /// `CALMAIL_*` environment variables taking precedence.
    pub fn load() -> CalmailResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("CALMAIL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| CalmailError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalmailError::Config(e.to_string()))
    }

    /// Load a specific file, without environment overrides.
    pub fn load_from(path: &Path) -> CalmailResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(true))
            .build()
            .map_err(|e| CalmailError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalmailError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalmailResult<()> {
        let contents = format!(
            "\
# calmail configuration

# Where invitation threads are read from:
# mailbox_dir = \"{}\"

# Where events are written to:
# calendar_dir = \"{}\"

# Appended to every imported event's description:
# provenance_note = \"{}\"

# Subject keywords deciding what a message asks for:
# [keywords]
# create = [\"Invitation:\"]
# update = [\"Updated invitation\"]
# delete = [\"Canceled event\", \"Cancelled event\"]
",
            DEFAULT_MAILBOX_DIR, DEFAULT_CALENDAR_DIR, DEFAULT_PROVENANCE_NOTE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalmailError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalmailError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn mailbox_path(&self) -> PathBuf {
        expand(&self.mailbox_dir)
    }

    pub fn calendar_path(&self) -> PathBuf {
        expand(&self.calendar_dir)
    }

    pub fn classifier(&self) -> KeywordClassifier {
        KeywordClassifier::new(
            &self.keywords.create,
            &self.keywords.update,
            &self.keywords.delete,
        )
    }

    /// The effective settings as TOML.
    pub fn to_toml(&self) -> CalmailResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalmailError::Serialization(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classifier, Intent};

    #[test]
    fn test_default_config_file_loads_as_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("calmail/config.toml");

        CalmailConfig::create_default_config(&path).unwrap();
        let config = CalmailConfig::load_from(&path).unwrap();

        assert_eq!(config.mailbox_dir, default_mailbox_dir());
        assert_eq!(config.provenance_note, DEFAULT_PROVENANCE_NOTE);
        assert_eq!(config.keywords.create, default_create_keywords());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "calendar_dir = \"/srv/cal\"\n\n[keywords]\ndelete = [\"Abgesagt\"]\n",
        )
        .unwrap();

        let config = CalmailConfig::load_from(&path).unwrap();

        assert_eq!(config.calendar_path(), PathBuf::from("/srv/cal"));
        assert_eq!(config.keywords.update, default_update_keywords());

        let classifier = config.classifier();
        assert_eq!(classifier.classify("Abgesagt: Standup"), Some(Intent::Delete));
        assert_eq!(classifier.classify("Canceled event: Standup"), None);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = CalmailConfig::default();
        assert_eq!(config.mailbox_path(), home.join("mail/calmail"));
    }

    #[test]
    fn test_to_toml_roundtrips_keys() {
        let toml = CalmailConfig::default().to_toml().unwrap();
        assert!(toml.contains("mailbox_dir = \"~/mail/calmail\""));
        assert!(toml.contains("[keywords]"));
    }
}
