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

use std::io::Write;

use miette::{GraphicalReportHandler, IntoDiagnostic, NamedSource, Report};
use serde::{Deserialize, Serialize};

use crate::validation::{Level, Violation};

/// Output format of the command line interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    /// Rendered diagnostics with source snippets
    #[default]
    Human,
    /// A JSON array of [`LintIssue`] records
    Json,
}

/// Single issue found while scanning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
    /// File the issue was found in
    pub file: String,
    /// Line of the offending identifier, starting at 1
    pub line: usize,
    /// Offending identifier
    pub column: String,
    /// Description of the issue
    pub issue: String,
    /// Severity of the issue
    pub severity: Level,
    /// Rule that produced the issue
    pub rule: String,
}

impl From<&Violation> for LintIssue {
    fn from(violation: &Violation) -> Self {
        Self {
            file: violation.location.file.clone().unwrap_or_default(),
            line: violation.location.position.line,
            column: violation.location.identifier.clone(),
            issue: violation.message.message.clone(),
            severity: violation.level,
            rule: violation.rule.clone(),
        }
    }
}

/// Outcome of a scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of files checked
    pub files: usize,
    /// Number of issues reported
    pub issues: usize,
}

impl Summary {
    /// Whether no issue was reported.
    pub fn is_clean(&self) -> bool {
        self.issues == 0
    }
}

/// Sink receiving the results of a scan.
pub trait Reporter {
    /// A file was checked without issues.
    fn passed(&mut self, _file: &str) -> miette::Result<()> {
        Ok(())
    }

    /// A violation was found in `file`, whose full text is `contents`.
    fn report(&mut self, file: &str, contents: &str, violation: &Violation) -> miette::Result<()>;

    /// The scan is complete.
    fn finish(&mut self, _summary: &Summary) -> miette::Result<()> {
        Ok(())
    }
}

impl Reporter for Vec<LintIssue> {
    fn report(
        &mut self,
        _file: &str,
        _contents: &str,
        violation: &Violation,
    ) -> miette::Result<()> {
        self.push(violation.into());
        Ok(())
    }
}

/// Renders violations as diagnostics pointing into the offending source.
pub struct HumanReporter<W> {
    out: W,
    handler: GraphicalReportHandler,
    verbose: bool,
}

impl<W: Write> HumanReporter<W> {
    /// Create a reporter writing to `out`, listing passing files if `verbose` is set.
    pub fn new(out: W, verbose: bool) -> Self {
        Self::with_handler(out, GraphicalReportHandler::new(), verbose)
    }

    /// Create a reporter rendering with a custom handler.
    pub fn with_handler(out: W, handler: GraphicalReportHandler, verbose: bool) -> Self {
        Self {
            out,
            handler,
            verbose,
        }
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for HumanReporter<W> {
    fn passed(&mut self, file: &str) -> miette::Result<()> {
        if self.verbose {
            writeln!(self.out, "ok: {file}").into_diagnostic()?;
        }

        Ok(())
    }

    fn report(&mut self, file: &str, contents: &str, violation: &Violation) -> miette::Result<()> {
        let report = Report::new(violation.clone())
            .with_source_code(NamedSource::new(file, contents.to_owned()));

        let mut rendered = String::new();
        self.handler
            .render_report(&mut rendered, &*report)
            .map_err(|_| miette::miette!("failed to render violation in {file}"))?;

        writeln!(self.out, "{rendered}").into_diagnostic()
    }

    fn finish(&mut self, summary: &Summary) -> miette::Result<()> {
        let files = match summary.files {
            1 => "1 file".to_string(),
            n => format!("{n} files"),
        };

        match summary.issues {
            0 => writeln!(self.out, "no issues found in {files}"),
            1 => writeln!(self.out, "found 1 issue in {files}"),
            n => writeln!(self.out, "found {n} issues in {files}"),
        }
        .into_diagnostic()
    }
}

/// Collects [`LintIssue`] records and prints them as a JSON array once the scan is complete.
pub struct JsonReporter<W> {
    out: W,
    issues: Vec<LintIssue>,
}

impl<W: Write> JsonReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            issues: Vec::new(),
        }
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, file: &str, contents: &str, violation: &Violation) -> miette::Result<()> {
        self.issues.report(file, contents, violation)
    }

    fn finish(&mut self, _summary: &Summary) -> miette::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &self.issues).into_diagnostic()?;
        writeln!(self.out).into_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FileKind, Validator};
    use miette::GraphicalTheme;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "const payload = {\n  created_at: now(),\n};\n";

    fn violations() -> Vec<Violation> {
        Validator::default().validate("payload.ts", FileKind::Source, SOURCE)
    }

    #[test]
    fn converts_violation_to_issue() {
        let issue = LintIssue::from(&violations()[0]);

        assert_eq!(
            issue,
            LintIssue {
                file: "payload.ts".into(),
                line: 2,
                column: "created_at".into(),
                issue: "object key `created_at` is not camelCase".into(),
                severity: Level::Error,
                rule: "ObjectKeyCasing".into(),
            }
        );
    }

    #[test]
    fn human_reporter_renders_snippet() {
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        let mut reporter = HumanReporter::with_handler(Vec::new(), handler, true);

        reporter.passed("clean.ts").unwrap();
        for violation in violations() {
            reporter.report("payload.ts", SOURCE, &violation).unwrap();
        }
        reporter
            .finish(&Summary {
                files: 2,
                issues: 1,
            })
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.starts_with("ok: clean.ts\n"));
        assert!(output.contains("ObjectKeyCasing"));
        assert!(output.contains("payload.ts"));
        assert!(output.contains("object key `created_at` is not camelCase"));
        assert!(output.contains("Rename the key to `createdAt`."));
        assert!(output.ends_with("found 1 issue in 2 files\n"));
    }

    #[test]
    fn human_reporter_is_quiet_about_passing_files() {
        let mut reporter = HumanReporter::new(Vec::new(), false);

        reporter.passed("clean.ts").unwrap();
        reporter
            .finish(&Summary {
                files: 1,
                issues: 0,
            })
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "no issues found in 1 file\n");
    }

    #[test]
    fn json_reporter_prints_issue_records() {
        let mut reporter = JsonReporter::new(Vec::new());

        for violation in violations() {
            reporter.report("payload.ts", SOURCE, &violation).unwrap();
        }
        reporter.finish(&Summary::default()).unwrap();

        let output = reporter.into_inner();
        let issues: Vec<LintIssue> = serde_json::from_slice(&output).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Level::Error);

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value[0]["severity"], "error");
        assert_eq!(value[0]["column"], "created_at");
    }
}
