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

use std::fmt::{self, Display, Formatter};

use miette::{Diagnostic, LabeledSpan, Severity};
use serde::{Deserialize, Serialize};

use crate::validation::data::Position;

/// Severity level of violation.
#[derive(
    Clone,
    Debug,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Location of violation.
#[derive(Default, PartialEq, Clone, Eq, Debug)]
pub struct Location {
    /// File that contains violation
    pub file: Option<String>,
    /// Position of the offending identifier
    pub position: Position,
    /// Offending identifier
    pub identifier: String,
    /// Byte length of the identifier as written in the source
    pub length: usize,
}

impl Location {
    /// Location of an identifier, the file is filled in by the [`Validator`](super::Validator).
    pub fn new(identifier: impl Into<String>, position: Position) -> Self {
        let identifier = identifier.into();

        Self {
            file: None,
            position,
            length: identifier.len(),
            identifier,
        }
    }

    /// Override the source length, for identifiers written with escapes.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

/// Violation message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Message {
    /// Message describing violation
    pub message: String,
    /// Information on what went wrong
    pub help: String,
}

impl Diagnostic for Message {}

/// Message with `{offendingName}` and `{expectedName}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTemplate {
    /// Template of [`Message::message`].
    pub message: &'static str,
    /// Template of [`Message::help`].
    pub help: &'static str,
}

impl MessageTemplate {
    const OFFENDING_NAME: &str = "{offendingName}";
    const EXPECTED_NAME: &str = "{expectedName}";

    /// Create a new template.
    pub const fn new(message: &'static str, help: &'static str) -> Self {
        Self { message, help }
    }

    /// Substitute the placeholders of this template.
    pub fn render(&self, offending_name: &str, expected_name: &str) -> Message {
        let interpolate = |template: &str| {
            template
                .replace(Self::OFFENDING_NAME, offending_name)
                .replace(Self::EXPECTED_NAME, expected_name)
        };

        Message {
            message: interpolate(self.message),
            help: interpolate(self.help),
        }
    }
}

/// Rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rule name that was violated
    pub rule: String,
    /// Level of violation
    pub level: Level,
    /// Message
    pub message: Message,
    /// Location where violation occured
    pub location: Location,
    /// Help text
    pub info: String,
}

/// Alias for list of [`Violation`].
pub type Violations = Vec<Violation>;

impl std::error::Error for Violation {}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.info)
    }
}

impl Diagnostic for Violation {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(&self.rule))
    }

    fn severity(&self) -> Option<Severity> {
        let level = match self.level {
            Level::Info => Severity::Advice,
            Level::Warning => Severity::Warning,
            Level::Error => Severity::Error,
        };

        Some(level)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = LabeledSpan::new(
            Some(self.message.message.clone()),
            self.location.position.offset,
            self.location.length,
        );

        Some(Box::new([span].into_iter()))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.message)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(&self.message.help))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_render_template() {
        let template = MessageTemplate::new(
            "`{offendingName}` is wrong",
            "use `{expectedName}` instead of `{offendingName}`",
        );

        assert_eq!(
            template.render("userID", "userId"),
            Message {
                message: "`userID` is wrong".into(),
                help: "use `userId` instead of `userID`".into(),
            }
        );
    }

    #[test]
    fn can_parse_level() {
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warning));
        assert_eq!(Level::Error.to_string(), "error");
        assert!("fatal".parse::<Level>().is_err());
    }
}
