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

const COLUMN_NOT_SNAKE_CASE: MessageTemplate = MessageTemplate::new(
    "column `{offendingName}` is not snake_case",
    "Storage columns must be snake_case, use `{expectedName}`.",
);

const ALIAS_NOT_CAMEL_CASE: MessageTemplate = MessageTemplate::new(
    "alias `{offendingName}` is not camelCase",
    "Query aliases are API field names, use `{expectedName}`.",
);

/// Ensure that aliased query columns are snake_case and their aliases camelCase.
#[derive(Debug, Clone, Default)]
pub struct QueryAliasCasing;

impl Rule for QueryAliasCasing {
    fn rule_info(&self) -> &'static str {
        "Make sure that query columns are snake_case and their aliases camelCase."
    }

    fn check_alias(&mut self, candidate: &AliasCandidate) -> Violations {
        let mut violations = Violations::default();

        if let Some(column) = &candidate.column
            && !is_snake_case(&column.name)
        {
            let expected = camel_to_snake(&column.name);
            let message = COLUMN_NOT_SNAKE_CASE.render(&column.name, &expected);
            let location = Location::new(column.name.as_str(), column.position);
            violations.push(self.to_violation(message, location));
        }

        let alias = &candidate.alias;

        if !is_camel_case(&alias.name) {
            let expected = suggest_camel_case(&alias.name);
            let message = ALIAS_NOT_CAMEL_CASE.render(&alias.name, &expected);
            let location = Location::new(alias.name.as_str(), alias.position);
            violations.push(self.to_violation(message, location));
        }

        violations
    }
}
