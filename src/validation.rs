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

/// Parsed object literals and SQL identifiers.
pub mod data;
/// Rules for field names.
pub mod rules;

mod parse;
mod violation;

pub use self::{parse::*, violation::*};

use self::rules::RuleSet;

/// Kind of file a [`Validator`] can check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// JavaScript or TypeScript source, checked for object literal keys.
    Source,
    /// SQL file, checked for schema columns and query aliases.
    Sql,
}

/// Runs a [`RuleSet`] over files.
#[derive(Debug)]
pub struct Validator {
    rules: RuleSet,
}

impl Validator {
    /// Create a new validator enforcing `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Check the contents of a file, attributing violations to `file`.
    pub fn validate(&mut self, file: &str, kind: FileKind, contents: &str) -> Violations {
        let mut violations = match kind {
            FileKind::Source => SourceParser::new(contents).parse().check(&mut self.rules),
            FileKind::Sql => SqlParser::new(contents).parse().check(&mut self.rules),
        };

        for violation in &mut violations {
            violation.location.file = Some(file.to_owned());
        }

        violations
    }

    /// Names of the rules being enforced.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.rule_name()).collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(rules::all())
    }
}
