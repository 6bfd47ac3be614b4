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

use super::*;

/// Schema and query identifiers extracted from a SQL file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SqlFile {
    /// Columns declared in schema sections.
    pub columns: Vec<Column>,
    /// Aliasing candidates found in query text.
    pub aliases: Vec<AliasCandidate>,
}

impl SqlFile {
    /// Check [`SqlFile`] against [`RuleSet`] for [`Violations`].
    pub fn check(&self, rules: &mut RuleSet) -> Violations {
        let mut violations = Violations::default();

        for column in &self.columns {
            violations.append(&mut rules.check_column(column));
        }

        for alias in &self.aliases {
            violations.append(&mut rules.check_alias(alias));
        }

        violations
    }
}

/// Identifier found in SQL text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlIdent {
    /// Name of identifier, without quotes.
    pub name: String,
    /// Position of identifier.
    pub position: Position,
}

/// Column declared inside of a schema section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: SqlIdent,
    /// Type token following the name.
    pub type_: String,
}

/// `column AS alias` fragment found in query text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasCandidate {
    /// Aliased column, `None` when only the alias could be recognized.
    pub column: Option<SqlIdent>,
    /// Alias.
    pub alias: SqlIdent,
}
