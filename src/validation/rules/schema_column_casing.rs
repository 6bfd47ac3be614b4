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

const NOT_SNAKE_CASE: MessageTemplate = MessageTemplate::new(
    "column `{offendingName}` is not snake_case",
    "Storage columns must be snake_case, use `{expectedName}`.",
);

/// Ensure that columns declared in schema sections are snake_case.
#[derive(Debug, Clone, Default)]
pub struct SchemaColumnCasing;

impl Rule for SchemaColumnCasing {
    fn rule_info(&self) -> &'static str {
        "Make sure that schema columns are snake_case."
    }

    fn check_column(&mut self, column: &Column) -> Violations {
        let name = &column.name.name;

        if is_snake_case(name) {
            return Violations::default();
        }

        let message = NOT_SNAKE_CASE.render(name, &camel_to_snake(name));
        vec![self.to_violation(message, Location::new(name.as_str(), column.name.position))]
    }
}
