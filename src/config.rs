// Copyright 2023 Helsing GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use miette::{IntoDiagnostic, WrapErr};
use serde::Deserialize;

use crate::{
    errors::{DeserializationError, ReadError},
    validation::{Level, rules::RuleSet},
};

/// Name of the configuration file
pub const CONFIG_FILE: &str = ".fieldcase.toml";

/// Representation of the `.fieldcase.toml` configuration file
///
/// # Example
///
/// ```toml
/// [scan]
/// source-extensions = ["ts", "tsx"]
/// exclude = ["**/generated/**"]
///
/// [rules]
/// ObjectKeyCasing = "warning"
/// QueryAliasCasing = "allow"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Path to the configuration file
    config_path: Option<PathBuf>,

    /// File discovery settings
    scan: ScanConfig,

    /// Rule level overrides
    rules: BTreeMap<String, RuleSetting>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    scan: ScanConfig,
    #[serde(default)]
    rules: BTreeMap<String, RuleSetting>,
}

/// Settings of the `[scan]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScanConfig {
    /// Extensions of files whose object literals are checked
    pub source_extensions: Vec<String>,
    /// Extensions of files whose schema sections and queries are checked
    pub sql_extensions: Vec<String>,
    /// Glob patterns, relative to the scan root, of paths to skip
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let strings = |values: &[&str]| values.iter().map(|value| value.to_string()).collect();

        Self {
            source_extensions: strings(&["js", "jsx", "mjs", "cjs", "ts", "tsx"]),
            sql_extensions: strings(&["sql"]),
            exclude: strings(&[
                "**/node_modules/**",
                "**/target/**",
                "**/.git/**",
                "**/dist/**",
            ]),
        }
    }
}

/// Level a rule is enforced at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetting {
    /// Do not check the rule
    Allow,
    /// Report violations as advice
    Info,
    /// Report violations as warnings
    Warning,
    /// Report violations as errors
    Error,
}

impl RuleSetting {
    /// Level violations are reported at, `None` if the rule is allowed.
    pub fn level(self) -> Option<Level> {
        match self {
            Self::Allow => None,
            Self::Info => Some(Level::Info),
            Self::Warning => Some(Level::Warning),
            Self::Error => Some(Level::Error),
        }
    }
}

impl Config {
    /// Load the configuration that applies to a directory
    ///
    /// # Arguments
    /// * `cwd` - Starting directory to search for the configuration file
    pub fn new(cwd: Option<&Path>) -> miette::Result<Self> {
        match Self::locate_config(cwd) {
            Some(config_path) => Self::from_file(&config_path),
            None => Ok(Self::default()),
        }
    }

    /// Create configuration from a TOML file
    ///
    /// # Arguments
    /// * `config_path` - Path to the configuration file
    pub fn from_file(config_path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(config_path)
            .into_diagnostic()
            .wrap_err(ReadError(config_path.to_owned()))?;

        let raw: RawConfig = toml::from_str(&contents)
            .into_diagnostic()
            .wrap_err(DeserializationError(config_path.to_owned()))?;

        tracing::debug!("loaded configuration from {}", config_path.display());

        Ok(Self {
            config_path: Some(config_path.to_owned()),
            scan: raw.scan,
            rules: raw.rules,
        })
    }

    /// Path of the loaded configuration file, if any
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// File discovery settings
    pub fn scan(&self) -> &ScanConfig {
        &self.scan
    }

    /// Override the level of a rule, taking precedence over the configuration file
    pub fn set_rule(&mut self, rule: impl Into<String>, setting: RuleSetting) {
        self.rules.insert(rule.into(), setting);
    }

    /// Build the rule set with all level overrides applied
    pub fn rule_set(&self) -> miette::Result<RuleSet> {
        let levels = self
            .rules
            .iter()
            .map(|(rule, setting)| (rule.clone(), setting.level()))
            .collect();

        let rules = crate::validation::rules::configured(&levels).wrap_err_with(|| {
            match &self.config_path {
                Some(path) => format!("invalid rule configuration in {}", path.display()),
                None => "invalid rule configuration".to_string(),
            }
        })?;

        Ok(rules)
    }

    /// Locate the configuration file in the given directory or any parent directories
    ///
    /// # Returns
    /// Some(PathBuf) if the configuration file is found, None otherwise
    fn locate_config(cwd: Option<&Path>) -> Option<PathBuf> {
        let mut current_dir = cwd?.to_owned();

        loop {
            let config_path = current_dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current_dir.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(Some(dir.path())).unwrap();

        assert_eq!(config.path(), None);
        assert_eq!(config.scan(), &ScanConfig::default());
        assert_eq!(config.rule_set().unwrap().len(), 4);
    }

    #[test]
    fn locates_config_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[scan]\nsql-extensions = [\"sql\", \"ch\"]\n\n[rules]\nObjectKeyCasing = \"allow\"\nSchemaColumnCasing = \"warning\"\n",
        )
        .unwrap();

        let config = Config::new(Some(&nested)).unwrap();

        assert_eq!(config.path(), Some(dir.path().join(CONFIG_FILE).as_path()));
        assert_eq!(config.scan().sql_extensions, vec!["sql", "ch"]);
        assert_eq!(
            config.scan().source_extensions,
            ScanConfig::default().source_extensions
        );

        let names: Vec<_> = config
            .rule_set()
            .unwrap()
            .iter()
            .map(|rule| rule.rule_name())
            .collect();
        assert_eq!(
            names,
            vec!["MappingConsistency", "SchemaColumnCasing", "QueryAliasCasing"]
        );
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let mut config = Config::default();
        config.set_rule("QueryAliasCasing", RuleSetting::Allow);

        let rules = config.rule_set().unwrap();
        assert!(rules.iter().all(|rule| rule.rule_name() != "QueryAliasCasing"));
    }

    #[test]
    fn rejects_unknown_rules_and_fields() {
        let mut config = Config::default();
        config.set_rule("CamelCase", RuleSetting::Error);
        assert!(config.rule_set().is_err());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[scan]\nextensions = [\"ts\"]\n").unwrap();
        assert!(Config::from_file(&path).is_err());

        fs::write(&path, "[rules]\nObjectKeyCasing = \"fatal\"\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
