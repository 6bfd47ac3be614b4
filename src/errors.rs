use std::path::PathBuf;

use miette::Diagnostic;

#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("could not read from {}", .0.display())]
pub(crate) struct ReadError(pub PathBuf);

#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("could not deserialize {}", .0.display())]
pub(crate) struct DeserializationError(pub PathBuf);

#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("path `{}` is missing", .0.display())]
#[diagnostic(help("pass an existing file or directory to scan"))]
pub(crate) struct FileNotFound(pub PathBuf);

#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("invalid exclude pattern `{0}`")]
pub(crate) struct PatternError(pub String);

/// Error for when a rule name is unknown.
#[derive(thiserror::Error, Diagnostic, Debug, PartialEq, Eq)]
#[error("unknown rule `{rule}`")]
pub struct UnknownRuleError {
    /// Rule name that was given.
    pub rule: String,
    /// Names of all rules.
    pub known: Vec<&'static str>,
    #[help]
    help: String,
}

impl UnknownRuleError {
    pub(crate) fn new(rule: impl Into<String>, known: Vec<&'static str>) -> Self {
        let help = format!("known rules are: {}", known.join(", "));

        Self {
            rule: rule.into(),
            known,
            help,
        }
    }
}
