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

const KEY_NOT_CAMEL_CASE: MessageTemplate = MessageTemplate::new(
    "mapping key `{offendingName}` is not camelCase",
    "Mapping keys are API field names, use `{expectedName}`.",
);

const VALUE_NOT_SNAKE_CASE: MessageTemplate = MessageTemplate::new(
    "mapping value `{offendingName}` is not snake_case",
    "Mapping values are column names, use `{expectedName}`.",
);

const INCORRECT_MAPPING: MessageTemplate = MessageTemplate::new(
    "incorrect mapping for `{offendingName}`",
    "The canonical column name for `{offendingName}` is `{expectedName}`.",
);

/// Ensure that mapping objects pair every camelCase key with its snake_case column.
///
/// Each pair yields at most one violation: the key is checked first, then the value, then
/// the mapping itself.
#[derive(Debug, Clone, Default)]
pub struct MappingConsistency;

impl MappingConsistency {
    fn check_pair(
        &self,
        key: (&str, Position, usize),
        value: &StringLiteral,
    ) -> Option<Violation> {
        let (key, position, length) = key;

        if !is_camel_case(key) {
            let message = KEY_NOT_CAMEL_CASE.render(key, &suggest_camel_case(key));
            let location = Location::new(key, position).with_length(length);
            return Some(self.to_violation(message, location));
        }

        let expected = camel_to_snake(key);

        if !is_snake_case(&value.value) {
            let message = VALUE_NOT_SNAKE_CASE.render(&value.value, &expected);
            let location = Location::new(value.value.as_str(), value.value_position())
                .with_length(value.raw_len);
            return Some(self.to_violation(message, location));
        }

        if !validate_mapping(key, &value.value) {
            let message = INCORRECT_MAPPING.render(key, &expected);
            let location = Location::new(value.value.as_str(), value.value_position())
                .with_length(value.raw_len);
            return Some(self.to_violation(message, location));
        }

        None
    }
}

impl Rule for MappingConsistency {
    fn rule_info(&self) -> &'static str {
        "Make sure that mapping objects map camelCase keys to their snake_case columns."
    }

    fn check_object(&mut self, object: &ObjectExpression) -> Violations {
        if !object.is_mapping() {
            return Violations::default();
        }

        object
            .properties()
            .filter_map(|property| match (&property.key, &property.value) {
                (key, Expression::String(value)) => {
                    key.name().and_then(|key| self.check_pair(key, value))
                }
                _ => None,
            })
            .collect()
    }
}
