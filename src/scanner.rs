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

use std::path::{Path, PathBuf};

use glob::Pattern;
use miette::{IntoDiagnostic, WrapErr};
use walkdir::WalkDir;

use crate::{
    config::ScanConfig,
    errors::{FileNotFound, PatternError, ReadError},
    report::{Reporter, Summary},
    validation::{FileKind, Validator, rules::RuleSet},
};

/// File selected for scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTarget {
    /// Path on disk
    pub path: PathBuf,
    /// Name used when reporting, relative to the scan root
    pub name: String,
    /// How the file is checked
    pub kind: FileKind,
}

/// Walks a directory tree and checks every source and SQL file in it.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    source_extensions: Vec<String>,
    sql_extensions: Vec<String>,
    exclude: Vec<Pattern>,
    validator: Validator,
}

impl Scanner {
    /// Create a scanner for `root` enforcing `rules`.
    pub fn new(
        root: impl Into<PathBuf>,
        config: &ScanConfig,
        rules: RuleSet,
    ) -> miette::Result<Self> {
        let exclude = config
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .into_diagnostic()
                    .wrap_err(PatternError(pattern.clone()))
            })
            .collect::<miette::Result<_>>()?;

        Ok(Self {
            root: root.into(),
            source_extensions: config.source_extensions.clone(),
            sql_extensions: config.sql_extensions.clone(),
            exclude,
            validator: Validator::new(rules),
        })
    }

    /// Root of the scan
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Determine how a file is checked from its extension.
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let extension = path.extension()?.to_str()?;

        if self.source_extensions.iter().any(|ext| ext == extension) {
            Some(FileKind::Source)
        } else if self.sql_extensions.iter().any(|ext| ext == extension) {
            Some(FileKind::Sql)
        } else {
            None
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(name))
    }

    /// Collect the files to scan, in a deterministic order.
    pub fn discover(&self) -> miette::Result<Vec<ScanTarget>> {
        if !self.root.exists() {
            return Err(FileNotFound(self.root.clone()).into());
        }

        if self.root.is_file() {
            let Some(kind) = self.classify(&self.root) else {
                tracing::warn!(
                    ":: {} is neither a source nor a SQL file",
                    self.root.display()
                );
                return Ok(vec![]);
            };

            return Ok(vec![ScanTarget {
                path: self.root.clone(),
                name: self.root.display().to_string(),
                kind,
            }]);
        }

        let mut targets = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to walk {}", self.root.display()))?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(kind) = self.classify(entry.path()) else {
                continue;
            };

            let name = relative_name(&self.root, entry.path());

            if self.is_excluded(&name) {
                tracing::debug!(":: excluded {name}");
                continue;
            }

            targets.push(ScanTarget {
                path: entry.into_path(),
                name,
                kind,
            });
        }

        Ok(targets)
    }

    /// Check every discovered file, feeding the results into `reporter`.
    pub async fn scan(&mut self, reporter: &mut dyn Reporter) -> miette::Result<Summary> {
        let mut summary = Summary::default();

        for target in self.discover()? {
            let bytes = tokio::fs::read(&target.path)
                .await
                .into_diagnostic()
                .wrap_err(ReadError(target.path.clone()))?;

            let Ok(contents) = String::from_utf8(bytes) else {
                tracing::warn!(":: skipping {}, not valid UTF-8", target.name);
                continue;
            };

            tracing::debug!(":: checking {}", target.name);

            let violations = self.validator.validate(&target.name, target.kind, &contents);

            summary.files += 1;
            summary.issues += violations.len();

            if violations.is_empty() {
                reporter.passed(&target.name)?;
            }

            for violation in &violations {
                reporter.report(&target.name, &contents, violation)?;
            }
        }

        tracing::info!(
            ":: checked {} files, found {} issues",
            summary.files,
            summary.issues
        );

        reporter.finish(&summary)?;

        Ok(summary)
    }
}

/// Path of `path` relative to `root`, using `/` as separator.
fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
