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

/// Source file reduced to the object literals it contains.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Outermost object expressions, in source order.
    pub objects: Vec<ObjectExpression>,
}

impl SourceFile {
    /// Visit every object expression, including nested ones, in source order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ObjectExpression)) {
        for object in &self.objects {
            object.walk(visit);
        }
    }

    /// Check [`SourceFile`] against [`RuleSet`] for [`Violations`].
    pub fn check(&self, rules: &mut RuleSet) -> Violations {
        let mut violations = Violations::default();
        self.walk(&mut |object| violations.append(&mut rules.check_object(object)));
        violations
    }
}

/// Identifier token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    /// Name of identifier.
    pub name: String,
    /// Position of identifier.
    pub position: Position,
}

/// String literal token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLiteral {
    /// Value with escapes resolved.
    pub value: String,
    /// Position of the opening quote.
    pub position: Position,
    /// Byte length of the value as written, escapes included.
    pub raw_len: usize,
}

impl StringLiteral {
    /// Position of the first character of the value.
    ///
    /// Quotes are single bytes, so the contents start one past the opening quote.
    pub fn value_position(&self) -> Position {
        Position::new(
            self.position.line,
            self.position.column + 1,
            self.position.offset + 1,
        )
    }
}

/// Object literal expression, `{ key: value, ... }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectExpression {
    /// Position of the opening brace.
    pub position: Position,
    /// Members in source order.
    pub members: Vec<Member>,
}

impl ObjectExpression {
    /// Visit this object and every object nested within it.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ObjectExpression)) {
        visit(self);

        for member in &self.members {
            match member {
                Member::Property(property) => property.value.walk(visit),
                Member::Spread(expression) => expression.walk(visit),
                Member::Method { body, .. } => body.iter().for_each(|object| object.walk(visit)),
                Member::Shorthand(_) => {}
            }
        }
    }

    /// Whether this object maps keys to string literals only.
    ///
    /// Such objects are treated as camel to snake mappings. Empty objects are not mappings.
    pub fn is_mapping(&self) -> bool {
        !self.members.is_empty()
            && self.members.iter().all(|member| {
                matches!(
                    member,
                    Member::Property(Property {
                        value: Expression::String(_),
                        ..
                    })
                )
            })
    }

    /// Properties with a `key: value` shape.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter_map(|member| match member {
            Member::Property(property) => Some(property),
            _ => None,
        })
    }

    /// Named keys of all members, skipping spreads, computed and numeric keys.
    ///
    /// Each key comes with its position and its byte length in the source.
    pub fn keys(&self) -> impl Iterator<Item = (&str, Position, usize)> {
        self.members.iter().filter_map(|member| match member {
            Member::Property(Property { key, .. }) | Member::Method { key, .. } => key.name(),
            Member::Shorthand(ident) => {
                Some((ident.name.as_str(), ident.position, ident.name.len()))
            }
            Member::Spread(_) => None,
        })
    }
}

/// Member of an [`ObjectExpression`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    /// `key: value`
    Property(Property),
    /// `{ key }`
    Shorthand(Identifier),
    /// `...expression`
    Spread(Expression),
    /// `key() { ... }`, with the objects found in its body.
    Method {
        key: PropertyKey,
        body: Vec<ObjectExpression>,
    },
}

/// Property with key and value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    /// Property key.
    pub key: PropertyKey,
    /// Property value.
    pub value: Expression,
}

/// Key of a property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyKey {
    /// `userId: ...`
    Identifier(Identifier),
    /// `"userId": ...`
    String(StringLiteral),
    /// `42: ...`
    Numeric(Position),
    /// `[expression]: ...`
    Computed(Position),
}

impl PropertyKey {
    /// Name, position and source length of named keys.
    pub fn name(&self) -> Option<(&str, Position, usize)> {
        match self {
            Self::Identifier(ident) => Some((&ident.name, ident.position, ident.name.len())),
            Self::String(literal) => {
                Some((&literal.value, literal.value_position(), literal.raw_len))
            }
            Self::Numeric(_) | Self::Computed(_) => None,
        }
    }
}

/// Property value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    /// String literal value.
    String(StringLiteral),
    /// Nested object literal.
    Object(ObjectExpression),
    /// Any other expression, with the object literals found inside of it.
    Other(Vec<ObjectExpression>),
}

impl Expression {
    /// Visit all object expressions contained in this expression.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ObjectExpression)) {
        match self {
            Self::String(_) => {}
            Self::Object(object) => object.walk(visit),
            Self::Other(objects) => objects.iter().for_each(|object| object.walk(visit)),
        }
    }
}
