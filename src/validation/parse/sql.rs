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

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::validation::data::*;

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:TEMPORARY\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?[`"\w.]+"#,
    )
    .expect("valid table header regex")
});

static COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:`([^`]+)`|([A-Za-z_][A-Za-z0-9_]*))\s+([^\s,]+)")
        .expect("valid column regex")
});

static ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Za-z_][A-Za-z0-9_]*)\s+AS\s+([A-Za-z_][A-Za-z0-9_]*)\b")
        .expect("valid alias regex")
});

static SNAKE_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:AS)\s+([a-z][a-z0-9]*(?:_[a-z0-9]+)+)\b").expect("valid alias regex")
});

static AS_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAS\b").expect("valid keyword regex"));

/// Leading words of schema lines that declare something other than a column.
const TABLE_CLAUSES: &[&str] = &[
    "INDEX",
    "PRIMARY",
    "CONSTRAINT",
    "KEY",
    "PROJECTION",
    "UNIQUE",
    "FOREIGN",
    "CHECK",
];

/// Keywords that can precede `AS` without being a column.
const NON_COLUMNS: &[&str] = &["END", "NULL", "TRUE", "FALSE", "DISTINCT"];

/// Line of the input with its 1-based number and byte offset.
#[derive(Clone, Copy, Debug)]
struct Line<'a> {
    number: usize,
    offset: usize,
    text: &'a str,
}

fn lines(source: &str, first_line: usize) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;

    source
        .split_inclusive('\n')
        .enumerate()
        .map(move |(index, raw)| {
            let line = Line {
                number: first_line + index,
                offset,
                text: raw.trim_end_matches(['\n', '\r']),
            };
            offset += raw.len();
            line
        })
}

/// Strip a `--`, `//` or `#` comment from a schema line.
fn strip_comment(text: &str) -> &str {
    ["--", "//", "#"]
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
        .map_or(text, |index| &text[..index])
}

/// Parser for SQL files containing schema sections and queries.
pub struct SqlParser<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SqlParser<'a> {
    /// Create a parser over `source`.
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(index, _)| index + 1))
            .collect();

        Self {
            source,
            line_starts,
        }
    }

    /// Parse into a [`SqlFile`].
    pub fn parse(self) -> SqlFile {
        let mut columns = vec![];
        let mut masked = self.source.as_bytes().to_vec();
        let mut section = Section::Outside;

        for line in lines(self.source, 1) {
            let code = strip_comment(line.text);

            section = match section {
                Section::Outside => match CREATE_TABLE.find(code) {
                    Some(header) => continue_header(code, header.end(), line, &mut masked),
                    None => Section::Outside,
                },
                Section::Header => continue_header(code, 0, line, &mut masked),
                Section::Body(depth) => {
                    if depth == 1 {
                        columns.extend(column(line));
                    }

                    continue_body(code, 0, depth, line, &mut masked)
                }
            };
        }

        mask_query_noise(&mut masked);
        let query = String::from_utf8_lossy(&masked);

        SqlFile {
            columns,
            aliases: self.aliases(&query),
        }
    }

    fn position(&self, offset: usize) -> Position {
        let index = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[index];
        let column = self.source[line_start..offset].chars().count() + 1;
        Position::new(index + 1, column, offset)
    }

    fn ident(&self, name: &str, offset: usize) -> SqlIdent {
        SqlIdent {
            name: name.into(),
            position: self.position(offset),
        }
    }

    fn aliases(&self, query: &str) -> Vec<AliasCandidate> {
        let mut seen = BTreeSet::new();
        let mut aliases = vec![];

        for captures in ALIAS.captures_iter(query) {
            let (Some(column), Some(alias)) = (captures.get(1), captures.get(2)) else {
                continue;
            };

            if is_cast_argument(&query[..column.start()]) {
                continue;
            }

            let column = NON_COLUMNS
                .iter()
                .all(|keyword| !column.as_str().eq_ignore_ascii_case(keyword))
                .then(|| self.ident(column.as_str(), column.start()));

            seen.insert(alias.start());
            aliases.push(AliasCandidate {
                column,
                alias: self.ident(alias.as_str(), alias.start()),
            });
        }

        for captures in SNAKE_ALIAS.captures_iter(query) {
            let Some(alias) = captures.get(1) else {
                continue;
            };

            if seen.insert(alias.start()) {
                aliases.push(AliasCandidate {
                    column: None,
                    alias: self.ident(alias.as_str(), alias.start()),
                });
            }
        }

        aliases.sort_by_key(|candidate| candidate.alias.position);
        aliases
    }
}

/// State of the schema section scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    /// Not inside of a `CREATE TABLE` statement.
    Outside,
    /// Header seen, waiting for the opening parenthesis.
    Header,
    /// Inside of the column list at the given parenthesis depth.
    Body(usize),
}

/// Continue a `CREATE TABLE` header at byte `from` of `code`, masking the text belonging to it.
///
/// The header ends at the opening parenthesis of the column list, or at a `;` or `AS`
/// ending a statement without column list.
fn continue_header(code: &str, from: usize, line: Line<'_>, masked: &mut [u8]) -> Section {
    let rest = &code[from..];
    let open = rest.find('(');

    match statement_end(rest) {
        Some((start, end)) if open.is_none_or(|open| start < open) => {
            mask(masked, line.offset, line.offset + from + end);
            Section::Outside
        }
        _ => match open {
            Some(open) => continue_body(code, from + open + 1, 1, line, masked),
            None => {
                mask(masked, line.offset, line.offset + line.text.len());
                Section::Header
            }
        },
    }
}

/// Continue a column list at byte `from` of `code`, masking the text belonging to it.
///
/// Text following the closing parenthesis is part of the statement up to a `;` or `AS`.
fn continue_body(
    code: &str,
    from: usize,
    depth: usize,
    line: Line<'_>,
    masked: &mut [u8],
) -> Section {
    match close_paren(&code[from..], depth) {
        Ok(depth) => {
            mask(masked, line.offset, line.offset + line.text.len());
            Section::Body(depth)
        }
        Err(close) => {
            let close = from + close + 1;
            let end = statement_end(&code[close..])
                .map_or(line.text.len(), |(_, end)| close + end);
            mask(masked, line.offset, line.offset + end);
            Section::Outside
        }
    }
}

/// Byte range of the first `;` or `AS` keyword in `code`.
fn statement_end(code: &str) -> Option<(usize, usize)> {
    let semicolon = code.find(';').map(|index| (index, index + 1));
    let keyword = AS_KEYWORD
        .find(code)
        .map(|keyword| (keyword.start(), keyword.end()));

    semicolon.into_iter().chain(keyword).min()
}

/// Track parentheses of `code`, starting at `depth`.
///
/// Returns the byte index of the parenthesis closing the column list as `Err`.
fn close_paren(code: &str, mut depth: usize) -> Result<usize, usize> {
    for (index, c) in code.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Err(index);
                }
            }
            _ => {}
        }
    }

    Ok(depth)
}

/// Extract the column declared on a schema line, if any.
fn column(line: Line<'_>) -> Option<Column> {
    let trimmed = line.text.trim_start();

    if trimmed.is_empty()
        || trimmed.starts_with(')')
        || ["--", "//", "#"]
            .iter()
            .any(|marker| trimmed.starts_with(marker))
    {
        return None;
    }

    let captures = COLUMN.captures(line.text)?;
    let name = captures.get(1).or_else(|| captures.get(2))?;
    let type_ = captures.get(3)?;

    if captures.get(2).is_some()
        && TABLE_CLAUSES
            .iter()
            .any(|clause| name.as_str().eq_ignore_ascii_case(clause))
    {
        return None;
    }

    let column = line.text[..name.start()].chars().count() + 1;

    Some(Column {
        name: SqlIdent {
            name: name.as_str().into(),
            position: Position::new(line.number, column, line.offset + name.start()),
        },
        type_: type_.as_str().into(),
    })
}

/// Extract the columns of the body of a schema section.
///
/// `first_line` is the line number of the first line of `body`. Byte offsets are relative to
/// the start of `body`.
pub fn parse_schema_section(body: &str, first_line: usize) -> Vec<Column> {
    lines(body, first_line).filter_map(column).collect()
}

/// Whether text preceding an `AS` candidate ends in `CAST(`.
fn is_cast_argument(prefix: &str) -> bool {
    let Some(prefix) = prefix.trim_end().strip_suffix('(') else {
        return false;
    };
    let prefix = prefix.trim_end();

    prefix.len() >= 4
        && prefix.is_char_boundary(prefix.len() - 4)
        && prefix[prefix.len() - 4..].eq_ignore_ascii_case("cast")
        && !prefix[..prefix.len() - 4]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Blank out `start..end` of `bytes`, keeping line breaks.
fn mask(bytes: &mut [u8], start: usize, end: usize) {
    let len = bytes.len();

    for byte in &mut bytes[start..end.min(len)] {
        if *byte != b'\n' {
            *byte = b' ';
        }
    }
}

/// Blank out `--` comments and single quoted string contents.
fn mask_query_noise(bytes: &mut [u8]) {
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'-' if bytes.get(index + 1) == Some(&b'-') => {
                let end = bytes[index..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |position| index + position);
                mask(bytes, index, end);
                index = end;
            }
            b'\'' => {
                let end = bytes[index + 1..]
                    .iter()
                    .position(|&b| b == b'\'')
                    .map_or(bytes.len(), |position| index + 1 + position);
                mask(bytes, index + 1, end);
                index = end + 1;
            }
            _ => index += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(|column| column.name.name.as_str()).collect()
    }

    fn alias_pairs(file: &SqlFile) -> Vec<(Option<&str>, &str)> {
        file.aliases
            .iter()
            .map(|candidate| {
                (
                    candidate.column.as_ref().map(|column| column.name.as_str()),
                    candidate.alias.name.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn can_parse_schema_section_body() {
        let columns = parse_schema_section("user_id String,\nuserId String,\nsession_id String", 1);

        assert_eq!(names(&columns), vec!["user_id", "userId", "session_id"]);
        assert_eq!(columns[1].name.position, Position::new(2, 1, 16));
        assert_eq!(columns[1].type_, "String");
    }

    #[test]
    fn can_parse_create_table() {
        let source = "-- events\n\
                      CREATE TABLE IF NOT EXISTS events (\n\
                      \x20   `user_id` String,\n\
                      \x20   createdAt DateTime, -- wrong\n\
                      \n\
                      \x20   -- comment String\n\
                      \x20   amount Decimal(18, 2),\n\
                      \x20   INDEX idx_user user_id TYPE bloom_filter GRANULARITY 1\n\
                      ) ENGINE = MergeTree ORDER BY user_id;\n";

        let file = SqlParser::new(source).parse();

        assert_eq!(names(&file.columns), vec!["user_id", "createdAt", "amount"]);
        assert_eq!(file.columns[0].name.position.line, 3);
        assert_eq!(file.columns[0].name.position.column, 6);
        assert_eq!(file.columns[1].name.position, Position::new(4, 5, 72));
        assert!(file.aliases.is_empty());
    }

    #[test]
    fn can_parse_header_without_parenthesis() {
        let source = "CREATE TABLE users\n(\n    UserName String\n)\nENGINE = Memory;\n";
        let file = SqlParser::new(source).parse();

        assert_eq!(names(&file.columns), vec!["UserName"]);
        assert_eq!(file.columns[0].name.position.line, 3);
    }

    #[test]
    fn nested_types_do_not_close_the_section() {
        let source = "CREATE TABLE t (\n  tags Nested(\n    tag_key String\n  ),\n  lastSeen DateTime\n)\n";
        let file = SqlParser::new(source).parse();

        assert_eq!(names(&file.columns), vec!["tags", "lastSeen"]);
    }

    #[test]
    fn single_line_tables_have_no_section() {
        let file = SqlParser::new("CREATE TABLE t (a Int32, b Int32);\nSELECT a AS b FROM t;\n").parse();

        assert!(file.columns.is_empty());
        assert_eq!(alias_pairs(&file), vec![(Some("a"), "b")]);
    }

    #[test]
    fn tables_without_column_list_end_at_semicolon() {
        let source = "CREATE TABLE events_copy AS events;\nSELECT user_id AS user_key FROM events_copy;\n";
        let file = SqlParser::new(source).parse();

        assert!(file.columns.is_empty());
        assert_eq!(alias_pairs(&file), vec![(Some("user_id"), "user_key")]);
        assert_eq!(file.aliases[0].alias.position.line, 2);
    }

    #[test]
    fn header_without_column_list_continues_on_next_lines() {
        let source = "CREATE TABLE events_copy\n  ENGINE = Memory;\nSELECT a AS b FROM t;\n";
        let file = SqlParser::new(source).parse();

        assert_eq!(alias_pairs(&file), vec![(Some("a"), "b")]);
    }

    #[test]
    fn queries_following_a_table_header_are_checked() {
        let file = SqlParser::new(
            "CREATE TABLE t ENGINE = Memory AS SELECT user_id AS user_key FROM events;",
        )
        .parse();

        assert!(file.columns.is_empty());
        assert_eq!(alias_pairs(&file), vec![(Some("user_id"), "user_key")]);
        assert_eq!(file.aliases[0].alias.position, Position::new(1, 53, 52));
    }

    #[test]
    fn queries_following_a_column_list_are_checked() {
        let source = "CREATE TABLE t (\n  a_b String\n) ENGINE = Memory AS SELECT x AS y_z FROM s;\n\
                      CREATE TABLE u (a Int32) AS SELECT a AS b FROM v;\n";
        let file = SqlParser::new(source).parse();

        assert_eq!(names(&file.columns), vec!["a_b"]);
        assert_eq!(
            alias_pairs(&file),
            vec![(Some("x"), "y_z"), (Some("a"), "b")]
        );
    }

    #[test]
    fn can_parse_query_aliases() {
        let file = SqlParser::new(
            "SELECT user_id AS userId, session_id AS session_id FROM events",
        )
        .parse();

        assert_eq!(
            alias_pairs(&file),
            vec![(Some("user_id"), "userId"), (Some("session_id"), "session_id")]
        );
        assert_eq!(file.aliases[1].alias.position, Position::new(1, 41, 40));
    }

    #[test]
    fn finds_snake_aliases_of_expressions() {
        let file = SqlParser::new(
            "SELECT\n  count(*) AS total_count,\n  max(ts) as lastSeen,\n  CASE WHEN a THEN 1 END AS is_active\nFROM t",
        )
        .parse();

        assert_eq!(
            alias_pairs(&file),
            vec![(None, "total_count"), (None, "is_active")]
        );
        assert_eq!(file.aliases[0].alias.position.line, 2);
    }

    #[test]
    fn skips_casts_comments_and_strings() {
        let file = SqlParser::new(
            "SELECT CAST(user_id AS String) AS user_key, -- x AS y_z\n  'a AS b_c' AS label FROM t",
        )
        .parse();

        assert_eq!(alias_pairs(&file), vec![(None, "user_key")]);
    }

    #[test]
    fn schema_sections_are_not_queries() {
        let source = "CREATE TABLE t (\n  a_b String ALIAS x AS y_z\n)\nSELECT a AS b";
        let file = SqlParser::new(source).parse();

        assert_eq!(alias_pairs(&file), vec![(Some("a"), "b")]);
    }
}
