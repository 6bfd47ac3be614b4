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

use std::{collections::BTreeMap, fmt::Debug};

use crate::{
    case::*,
    errors::UnknownRuleError,
    validation::{
        data::*,
        violation::{self, *},
    },
};

mod mapping_consistency;
mod object_key_casing;
mod query_alias_casing;
mod schema_column_casing;

pub use self::{
    mapping_consistency::*, object_key_casing::*, query_alias_casing::*, schema_column_casing::*,
};

/// Collection of rules.
pub type RuleSet = Vec<Box<dyn Rule>>;

/// Rule to enforce for field names.
pub trait Rule: Debug {
    /// Name of this rule.
    ///
    /// Defaults to the name of the type of this rule.
    fn rule_name(&self) -> &'static str {
        let name = std::any::type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name)
    }

    /// Help text for rule.
    fn rule_info(&self) -> &'static str;

    /// Default severity [`Level`] of the rule.
    fn rule_level(&self) -> Level {
        Level::Error
    }

    /// Turn a message into a violation.
    fn to_violation(&self, message: violation::Message, location: Location) -> Violation {
        Violation {
            rule: self.rule_name().into(),
            level: self.rule_level(),
            message,
            location,
            info: self.rule_info().into(),
        }
    }

    /// Check [`ObjectExpression`] for violations.
    fn check_object(&mut self, _object: &ObjectExpression) -> Violations {
        vec![]
    }

    /// Check schema [`Column`] for violations.
    fn check_column(&mut self, _column: &Column) -> Violations {
        vec![]
    }

    /// Check query [`AliasCandidate`] for violations.
    fn check_alias(&mut self, _alias: &AliasCandidate) -> Violations {
        vec![]
    }
}

impl Rule for RuleSet {
    fn rule_name(&self) -> &'static str {
        "RuleSet"
    }

    fn rule_info(&self) -> &'static str {
        "RuleSet"
    }

    fn check_object(&mut self, object: &ObjectExpression) -> Violations {
        self.iter_mut()
            .flat_map(|rule| rule.check_object(object))
            .collect()
    }

    fn check_column(&mut self, column: &Column) -> Violations {
        self.iter_mut()
            .flat_map(|rule| rule.check_column(column))
            .collect()
    }

    fn check_alias(&mut self, alias: &AliasCandidate) -> Violations {
        self.iter_mut()
            .flat_map(|rule| rule.check_alias(alias))
            .collect()
    }
}

/// Rule reporting its violations at a configured [`Level`].
#[derive(Debug)]
pub struct Leveled {
    rule: Box<dyn Rule>,
    level: Level,
}

impl Leveled {
    /// Override the level of `rule`.
    pub fn new(rule: Box<dyn Rule>, level: Level) -> Self {
        Self { rule, level }
    }

    fn relevel(&self, violations: Violations) -> Violations {
        violations
            .into_iter()
            .map(|violation| Violation {
                level: self.level,
                ..violation
            })
            .collect()
    }
}

impl Rule for Leveled {
    fn rule_name(&self) -> &'static str {
        self.rule.rule_name()
    }

    fn rule_info(&self) -> &'static str {
        self.rule.rule_info()
    }

    fn rule_level(&self) -> Level {
        self.level
    }

    fn check_object(&mut self, object: &ObjectExpression) -> Violations {
        let violations = self.rule.check_object(object);
        self.relevel(violations)
    }

    fn check_column(&mut self, column: &Column) -> Violations {
        let violations = self.rule.check_column(column);
        self.relevel(violations)
    }

    fn check_alias(&mut self, alias: &AliasCandidate) -> Violations {
        let violations = self.rule.check_alias(alias);
        self.relevel(violations)
    }
}

/// Get all rules at their default levels.
pub fn all() -> RuleSet {
    vec![
        Box::new(ObjectKeyCasing),
        Box::new(MappingConsistency),
        Box::new(SchemaColumnCasing),
        Box::new(QueryAliasCasing),
    ]
}

/// Get all rules with level overrides applied.
///
/// Rules mapped to `None` are allowed and left out of the returned set.
pub fn configured(levels: &BTreeMap<String, Option<Level>>) -> Result<RuleSet, UnknownRuleError> {
    let rules = all();

    if let Some(unknown) = levels
        .keys()
        .find(|name| !rules.iter().any(|rule| rule.rule_name() == name.as_str()))
    {
        return Err(UnknownRuleError::new(
            unknown.as_str(),
            rules.iter().map(|rule| rule.rule_name()).collect(),
        ));
    }

    let rules = rules
        .into_iter()
        .filter_map(|rule| match levels.get(rule.rule_name()) {
            None => Some(rule),
            Some(None) => None,
            Some(Some(level)) => Some(Box::new(Leveled::new(rule, *level)) as Box<dyn Rule>),
        })
        .collect();

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_names_are_type_names() {
        let names: Vec<_> = all().iter().map(|rule| rule.rule_name()).collect();
        assert_eq!(
            names,
            vec![
                "ObjectKeyCasing",
                "MappingConsistency",
                "SchemaColumnCasing",
                "QueryAliasCasing"
            ]
        );
    }

    #[test]
    fn configured_should_drop_allowed_rules() {
        let levels = BTreeMap::from([("ObjectKeyCasing".to_string(), None)]);
        let rules = configured(&levels).unwrap();

        assert_eq!(rules.len(), 3);
        assert!(
            rules
                .iter()
                .all(|rule| rule.rule_name() != ObjectKeyCasing.rule_name())
        );
    }

    #[test]
    fn configured_should_override_levels() {
        let levels = BTreeMap::from([("SchemaColumnCasing".to_string(), Some(Level::Warning))]);
        let mut rules = configured(&levels).unwrap();

        let column = Column {
            name: SqlIdent {
                name: "userId".into(),
                position: Position::new(2, 1, 10),
            },
            type_: "String".into(),
        };

        let violations = rules.check_column(&column);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, Level::Warning);
        assert_eq!(violations[0].rule, "SchemaColumnCasing");
    }

    #[test]
    fn configured_should_reject_unknown_rules() {
        let levels = BTreeMap::from([("NoSuchRule".to_string(), Some(Level::Error))]);
        let error = configured(&levels).unwrap_err();
        assert_eq!(error.rule, "NoSuchRule");
        assert_eq!(error.known.len(), 4);
    }
}
