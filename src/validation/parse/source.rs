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

use super::lexer::{Lexer, Token, TokenKind};
use crate::validation::data::*;

/// Keywords after which a `{` starts an expression rather than a block.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "default", "yield", "await", "typeof", "void", "in", "of",
];

/// Punctuation after which a `{` starts an expression rather than a block.
const EXPRESSION_PUNCTUATION: &[char] = &['=', '(', ',', '[', '?', '!', '|', '&', '+', '{'];

/// Punctuation after which a `<` opens a JSX element.
const ELEMENT_PUNCTUATION: &[char] = &['(', ',', '=', '?', ':', '{', '>', '&', '|', '[', ';'];

/// Modifiers that may precede the key of a method.
const METHOD_MODIFIERS: &[&str] = &["async", "get", "set", "static"];

/// Parser discovering object literals in JavaScript and TypeScript sources.
///
/// Parsing never fails: anything that does not look like an object literal is skipped and
/// searched for object literals nested inside of it.
pub struct SourceParser {
    tokens: Vec<Token>,
    /// Index of the matching bracket of every bracket token.
    pairs: Vec<Option<usize>>,
    /// Index of the innermost unclosed bracket preceding every token.
    enclosing: Vec<Option<usize>>,
}

impl SourceParser {
    /// Tokenize `source`.
    pub fn new(source: &str) -> Self {
        let tokens = Lexer::new(source).tokenize();
        let (pairs, enclosing) = match_brackets(&tokens);

        Self {
            tokens,
            pairs,
            enclosing,
        }
    }

    /// Parse into a [`SourceFile`].
    pub fn parse(self) -> SourceFile {
        SourceFile {
            objects: self.scan(0, self.tokens.len(), false),
        }
    }

    fn is(&self, index: usize, c: char) -> bool {
        self.tokens.get(index).is_some_and(|token| token.is(c))
    }

    fn ident(&self, index: usize) -> Option<&str> {
        match &self.tokens.get(index)?.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Find object literals within `start..end`.
    ///
    /// `leading` tells whether a `{` at `start` is in expression position.
    fn scan(&self, start: usize, end: usize, leading: bool) -> Vec<ObjectExpression> {
        let mut objects = vec![];
        let mut index = start;

        while index < end {
            if self.is(index, '{') && self.is_expression_position(index, start, leading) {
                let object = self
                    .matching(index, end)
                    .filter(|&close| !self.is(close + 1, '='))
                    .and_then(|close| Some((self.object(index, close)?, close)));

                if let Some((object, close)) = object {
                    objects.push(object);
                    index = close + 1;
                    continue;
                }
            }

            index += 1;
        }

        objects
    }

    fn is_expression_position(&self, index: usize, start: usize, leading: bool) -> bool {
        if index == start {
            return leading;
        }

        let previous = &self.tokens[index - 1];

        match &previous.kind {
            TokenKind::Spread => true,
            TokenKind::Ident(keyword) => EXPRESSION_KEYWORDS.contains(&keyword.as_str()),
            TokenKind::Punct('=') => {
                !self.is_type_alias(index - 1) && !self.is_jsx_attribute(index - 1)
            }
            TokenKind::Punct(c @ ('(' | ',')) => {
                !self.is_parameter(index - 1, *c == '(').unwrap_or(false)
            }
            TokenKind::Punct(c) => EXPRESSION_PUNCTUATION.contains(c),
            _ => false,
        }
    }

    /// Whether the `=` at `equals` belongs to `type Name<...> =`.
    fn is_type_alias(&self, equals: usize) -> bool {
        let Some(mut index) = equals.checked_sub(1) else {
            return false;
        };

        if self.is(index, '>') {
            let mut depth = 0usize;
            loop {
                if self.is(index, '>') {
                    depth += 1;
                } else if self.is(index, '<') {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }

                let Some(previous) = index.checked_sub(1) else {
                    return false;
                };
                index = previous;
            }

            let Some(previous) = index.checked_sub(1) else {
                return false;
            };
            index = previous;
        }

        self.ident(index).is_some()
            && index
                .checked_sub(1)
                .and_then(|keyword| self.ident(keyword))
                .is_some_and(|keyword| keyword == "type")
    }

    /// Whether the `=` at `equals` assigns a JSX attribute, as in `<img src={url} />`.
    fn is_jsx_attribute(&self, equals: usize) -> bool {
        let mut index = equals;

        loop {
            let Some(previous) = index.checked_sub(1) else {
                return false;
            };
            index = previous;

            match &self.tokens[index].kind {
                TokenKind::Ident(_) | TokenKind::String(..) => {}
                TokenKind::Punct('-' | '=' | '.' | ':') => {}
                TokenKind::Punct('}') => match self.enclosing_opener(index) {
                    Some(open) if self.is(open, '{') => index = open,
                    _ => return false,
                },
                TokenKind::Punct('<') => {
                    return self.ident(index + 1).is_some() && self.starts_element(index);
                }
                _ => return false,
            }
        }
    }

    /// Whether the `<` at `index` opens a JSX element rather than comparing.
    fn starts_element(&self, index: usize) -> bool {
        let Some(previous) = index.checked_sub(1) else {
            return true;
        };

        match &self.tokens[previous].kind {
            TokenKind::Arrow => true,
            TokenKind::Ident(keyword) => EXPRESSION_KEYWORDS.contains(&keyword.as_str()),
            TokenKind::Punct(c) => ELEMENT_PUNCTUATION.contains(c),
            _ => false,
        }
    }

    /// Whether the token at `index` sits in the parameter list of a function.
    ///
    /// A parenthesized group followed by `=>`, `{` or a return type annotation is a parameter
    /// list, so braces inside of it are destructuring patterns.
    fn is_parameter(&self, index: usize, is_open: bool) -> Option<bool> {
        let open = if is_open {
            index
        } else {
            self.enclosing_opener(index)?
        };

        if !self.is(open, '(') {
            return Some(false);
        }

        let close = self.matching(open, self.tokens.len())?;
        let next = self.tokens.get(close + 1)?;

        Some(next.kind == TokenKind::Arrow || next.is('{') || next.is(':'))
    }

    /// Find the unclosed bracket enclosing the token at `index`.
    fn enclosing_opener(&self, index: usize) -> Option<usize> {
        self.enclosing.get(index).copied().flatten()
    }

    /// Find the bracket closing the one at `open`, searching before `end`.
    fn matching(&self, open: usize, end: usize) -> Option<usize> {
        self.pairs
            .get(open)
            .copied()
            .flatten()
            .filter(|&close| open < close && close < end)
    }

    /// Split `start..end` at commas outside of brackets.
    fn split_commas(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut segments = vec![];
        let mut depth = 0usize;
        let mut segment_start = start;

        for index in start..end {
            match &self.tokens[index].kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
                TokenKind::Punct(',') if depth == 0 => {
                    segments.push((segment_start, index));
                    segment_start = index + 1;
                }
                _ => {}
            }
        }

        segments.push((segment_start, end));
        segments
    }

    /// Parse the braces `open..=close` as an object literal.
    fn object(&self, open: usize, close: usize) -> Option<ObjectExpression> {
        let segments = self.split_commas(open + 1, close);
        let last = segments.len() - 1;
        let mut members = vec![];

        for (index, (start, end)) in segments.into_iter().enumerate() {
            if start == end {
                // trailing comma, or `{}`
                if index == last {
                    continue;
                }
                return None;
            }

            members.push(self.member(start, end)?);
        }

        Some(ObjectExpression {
            position: self.tokens[open].position,
            members,
        })
    }

    fn member(&self, start: usize, end: usize) -> Option<Member> {
        if self.tokens[start].kind == TokenKind::Spread {
            return Some(Member::Spread(self.expression(start + 1, end)?));
        }

        let mut key_start = start;
        while key_start + 1 < end
            && (self.is(key_start, '*')
                || self
                    .ident(key_start)
                    .is_some_and(|ident| METHOD_MODIFIERS.contains(&ident))
                    && self.is_key(key_start + 1))
        {
            key_start += 1;
        }

        let (key, next) = self.key(key_start, end)?;

        if next == end {
            return match key {
                PropertyKey::Identifier(ident) if key_start == start => {
                    Some(Member::Shorthand(ident))
                }
                _ => None,
            };
        }

        if self.is(next, ':') {
            return Some(Member::Property(Property {
                key,
                value: self.expression(next + 1, end)?,
            }));
        }

        if self.is(next, '(') || self.is(next, '<') {
            let body = (next..end).find(|&index| self.is(index, '{'))?;
            if self.matching(body, end)? != end - 1 {
                return None;
            }

            return Some(Member::Method {
                key,
                body: self.scan(body + 1, end - 1, false),
            });
        }

        None
    }

    fn is_key(&self, index: usize) -> bool {
        matches!(
            self.tokens.get(index).map(|token| &token.kind),
            Some(TokenKind::Ident(_) | TokenKind::String(..) | TokenKind::Number)
        ) || self.is(index, '[')
    }

    /// Parse a property key at `index`, returning it with the index following it.
    fn key(&self, index: usize, end: usize) -> Option<(PropertyKey, usize)> {
        let token = &self.tokens[index];

        let key = match &token.kind {
            TokenKind::Ident(name) => PropertyKey::Identifier(Identifier {
                name: name.clone(),
                position: token.position,
            }),
            TokenKind::String(value, raw_len) => PropertyKey::String(StringLiteral {
                value: value.clone(),
                position: token.position,
                raw_len: *raw_len,
            }),
            TokenKind::Number => PropertyKey::Numeric(token.position),
            TokenKind::Punct('[') => {
                let close = self.matching(index, end)?;
                return Some((PropertyKey::Computed(token.position), close + 1));
            }
            _ => return None,
        };

        Some((key, index + 1))
    }

    /// Parse the value expression `start..end`.
    fn expression(&self, start: usize, end: usize) -> Option<Expression> {
        if start >= end {
            return None;
        }

        // statements only appear inside of blocks and type literals
        let mut depth = 0usize;
        for token in &self.tokens[start..end] {
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
                TokenKind::Punct(';') if depth == 0 => return None,
                _ => {}
            }
        }

        if end - start == 1 {
            if let TokenKind::String(value, raw_len) = &self.tokens[start].kind {
                return Some(Expression::String(StringLiteral {
                    value: value.clone(),
                    position: self.tokens[start].position,
                    raw_len: *raw_len,
                }));
            }
        }

        if self.is(start, '{') && self.matching(start, end) == Some(end - 1) {
            if let Some(object) = self.object(start, end - 1) {
                return Some(Expression::Object(object));
            }
        }

        Some(Expression::Other(self.scan(start, end, true)))
    }
}

/// Pair up the brackets of `tokens`.
///
/// Returns the matching bracket of every bracket token and the innermost unclosed bracket
/// preceding every token. A closing bracket without opener is left unmatched, and so are the
/// openers it skips over.
fn match_brackets(tokens: &[Token]) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
    let mut pairs = vec![None; tokens.len()];
    let mut enclosing = Vec::with_capacity(tokens.len());
    let mut stack: Vec<(char, usize)> = vec![];

    for (index, token) in tokens.iter().enumerate() {
        enclosing.push(stack.last().map(|&(_, open)| open));

        match &token.kind {
            TokenKind::Punct(c @ ('(' | '[' | '{')) => stack.push((*c, index)),
            TokenKind::Punct(c @ (')' | ']' | '}')) => {
                let expected = match *c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };

                if let Some(depth) = stack.iter().rposition(|&(open, _)| open == expected) {
                    let (_, open) = stack[depth];
                    stack.truncate(depth);
                    pairs[open] = Some(index);
                    pairs[index] = Some(open);
                }
            }
            _ => {}
        }
    }

    (pairs, enclosing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        SourceParser::new(source).parse()
    }

    fn keys(file: &SourceFile) -> Vec<Vec<String>> {
        let mut keys = vec![];
        file.walk(&mut |object| {
            keys.push(object.keys().map(|(key, ..)| key.to_owned()).collect());
        });
        keys
    }

    #[test]
    fn can_parse_mapping_object() {
        let file = parse("export const FIELDS = {\n  userId: 'user_id',\n  \"createdAt\": \"created_at\",\n};\n");

        assert_eq!(file.objects.len(), 1);
        let object = &file.objects[0];
        assert!(object.is_mapping());
        assert_eq!(object.position, Position::new(1, 23, 22));

        let keys: Vec<_> = object.keys().collect();
        assert_eq!(
            keys,
            vec![
                ("userId", Position::new(2, 3, 26), 6),
                ("createdAt", Position::new(3, 4, 48), 9),
            ]
        );
    }

    #[test]
    fn can_parse_nested_objects() {
        let file = parse(
            "const payload = { user_id: id, meta: { createdAt: now(), ...extra }, list: [{ a_b: 1 }] };",
        );

        assert_eq!(
            keys(&file),
            vec![
                vec!["user_id", "meta", "list"],
                vec!["createdAt"],
                vec!["a_b"],
            ]
        );
    }

    #[test]
    fn finds_objects_in_calls_and_returns() {
        let file = parse(
            "function f(a) {\n  log({ some_key: a });\n  return { otherKey: 1 };\n}\n",
        );

        assert_eq!(keys(&file), vec![vec!["some_key"], vec!["otherKey"]]);
    }

    #[test]
    fn skips_blocks_types_and_patterns() {
        let file = parse(
            "interface Row { user_id: string }\n\
             type Alias<T> = { user_id: T };\n\
             const { user_id } = row;\n\
             function g({ user_id }) { if (user_id) { x = 1; } }\n\
             const h = ({ user_id }: Row) => user_id;\n\
             import { some_thing } from './x';\n",
        );

        assert!(file.objects.is_empty(), "{:?}", file.objects);
    }

    #[test]
    fn parses_shorthand_spread_and_methods() {
        let file = parse("const o = { user_id, ...rest, [k]: 1, 42: 'x', get total_count() { return { inner_key: 1 }; } };");

        let object = &file.objects[0];
        assert_eq!(object.members.len(), 5);
        assert!(matches!(object.members[0], Member::Shorthand(_)));
        assert!(matches!(object.members[1], Member::Spread(_)));
        assert!(matches!(
            object.members[2],
            Member::Property(Property {
                key: PropertyKey::Computed(_),
                ..
            })
        ));
        assert!(matches!(object.members[4], Member::Method { .. }));

        assert_eq!(
            keys(&file),
            vec![vec!["user_id", "total_count"], vec!["inner_key"]]
        );
    }

    #[test]
    fn finds_objects_in_jsx_attributes() {
        let file = parse("const el = <div style={{ font_size: 12 }} />;");
        assert_eq!(keys(&file), vec![vec!["font_size"]]);
    }

    #[test]
    fn jsx_attribute_values_are_not_objects() {
        let file = parse(
            "const el = <img src={user_name} alt=\"x\" data-id={row_id} style={{ font_size: 1 }} />;\n\
             const o = a < b;\n\
             x = { k_k: 1 };\n",
        );

        assert_eq!(keys(&file), vec![vec!["font_size"], vec!["k_k"]]);
    }

    #[test]
    fn many_objects_in_one_argument_list() {
        let source = format!("f({});", vec!["a, { b: 1 }"; 20_000].join(", "));
        let file = parse(&source);

        assert_eq!(file.objects.len(), 20_000);
    }

    #[test]
    fn unbalanced_brackets_are_skipped() {
        let file = parse("f(a]; x = { user_id: (1 };\ny = { otherKey: 2 };");
        assert_eq!(keys(&file), vec![vec!["user_id"], vec!["otherKey"]]);
    }

    #[test]
    fn empty_object() {
        let file = parse("const empty = {};");
        assert_eq!(file.objects.len(), 1);
        assert!(file.objects[0].members.is_empty());
        assert!(!file.objects[0].is_mapping());
    }
}
