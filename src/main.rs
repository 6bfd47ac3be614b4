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

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use fieldcase::{
    config::{Config, RuleSetting},
    report::{Format, HumanReporter, JsonReporter, Reporter},
    scanner::Scanner,
};
use miette::{Context as _, IntoDiagnostic, miette};
use tracing::level_filters::LevelFilter;

/// Checks that API field names are camelCase and storage columns are snake_case
#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Cli {
    /// File or directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Print files that pass and progress information
    #[clap(long, short)]
    verbose: bool,

    /// Output format
    #[clap(long, value_enum, default_value_t = Format::Human)]
    format: Format,

    /// Allow these rules to be violated.
    #[clap(long, short)]
    allow: Vec<String>,

    /// Treat these rule violations as errors.
    #[clap(long, short)]
    deny: Vec<String>,

    /// Treat these rule violations as warnings.
    #[clap(long, short)]
    warn: Vec<String>,

    /// Configuration file to use instead of searching for `.fieldcase.toml`
    #[clap(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<ExitCode> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_level(false)
        .with_file(false)
        .with_target(false)
        .with_line_number(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| miette!("failed to initialize logging: {error}"))?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => {
            let start = if cli.path.is_dir() {
                cli.path.clone()
            } else {
                cli.path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(|parent| parent.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."))
            };

            let start = std::path::absolute(&start)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to resolve {}", start.display()))?;

            Config::new(Some(&start))?
        }
    };

    for rule in cli.allow {
        config.set_rule(rule, RuleSetting::Allow);
    }
    for rule in cli.warn {
        config.set_rule(rule, RuleSetting::Warning);
    }
    for rule in cli.deny {
        config.set_rule(rule, RuleSetting::Error);
    }

    let mut scanner = Scanner::new(&cli.path, config.scan(), config.rule_set()?)?;

    let mut reporter: Box<dyn Reporter> = match cli.format {
        Format::Human => Box::new(HumanReporter::new(std::io::stdout(), cli.verbose)),
        Format::Json => Box::new(JsonReporter::new(std::io::stdout())),
    };

    let summary = scanner
        .scan(reporter.as_mut())
        .await
        .wrap_err(miette!("scan of {} failed", cli.path.display()))?;

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
