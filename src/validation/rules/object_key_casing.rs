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

const NOT_CAMEL_CASE: MessageTemplate = MessageTemplate::new(
    "object key `{offendingName}` is not camelCase",
    "Rename the key to `{expectedName}`.",
);

const NO_SUGGESTION: MessageTemplate = MessageTemplate::new(
    "object key `{offendingName}` is not camelCase",
    "Rename the key to a camelCase identifier, no automatic suggestion is available for `{expectedName}`.",
);

/// Ensure that keys of plain object literals are camelCase.
///
/// Mapping objects are left to [`MappingConsistency`].
#[derive(Debug, Clone, Default)]
pub struct ObjectKeyCasing;

impl Rule for ObjectKeyCasing {
    fn rule_info(&self) -> &'static str {
        "Make sure that object keys are camelCase."
    }

    fn check_object(&mut self, object: &ObjectExpression) -> Violations {
        if object.is_mapping() {
            return Violations::default();
        }

        object
            .keys()
            .filter(|(key, ..)| !is_camel_case(key))
            .map(|(key, position, length)| {
                let suggestion = suggest_camel_case(key);
                let template = if suggestion == key {
                    NO_SUGGESTION
                } else {
                    NOT_CAMEL_CASE
                };

                self.to_violation(
                    template.render(key, &suggestion),
                    Location::new(key, position).with_length(length),
                )
            })
            .collect()
    }
}
