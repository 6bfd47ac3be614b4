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

use super::is_snake_case;

/// Convert a `camelCase` identifier into `snake_case`.
///
/// A word boundary is placed
///
/// 1. between a lowercase letter or digit and a following uppercase letter, and
/// 2. between two uppercase letters when the second one is followed by a lowercase letter,
///    which splits an acronym from the word after it (`HTTPResponse` -> `http_response`).
///
/// The result is lowercased. Input is not validated, malformed identifiers are converted by the
/// same character rule.
pub fn camel_to_snake(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut result = String::with_capacity(ident.len() + ident.len() / 2);

    for (index, &current) in chars.iter().enumerate() {
        if index > 0 && current.is_ascii_uppercase() {
            let previous = chars[index - 1];
            let next = chars.get(index + 1).copied();

            let after_word = previous.is_ascii_lowercase() || previous.is_ascii_digit();
            let ends_acronym =
                previous.is_ascii_uppercase() && next.is_some_and(|c| c.is_ascii_lowercase());

            if after_word || ends_acronym {
                result.push('_');
            }
        }

        result.push(current);
    }

    result.to_lowercase()
}

/// Convert a `snake_case` identifier into `camelCase`.
///
/// The identifier is lowercased, then every underscore followed by another character is removed
/// and that character is uppercased. Digits have no case and are kept as they are.
pub fn snake_to_camel(ident: &str) -> String {
    let lowered = ident.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut chars = lowered.chars();

    while let Some(current) = chars.next() {
        if current != '_' {
            result.push(current);
            continue;
        }

        match chars.next() {
            Some(next) => result.extend(next.to_uppercase()),
            None => result.push(current),
        }
    }

    result
}

/// Suggest a `camelCase` spelling for an identifier that is not `camelCase`.
///
/// Identifiers containing underscores get every `_x` replaced with `X`, identifiers starting
/// with an uppercase letter get their first character lowercased. Anything else is returned
/// unchanged, meaning no fix could be derived.
pub fn suggest_camel_case(ident: &str) -> String {
    if is_snake_case(ident) || ident.contains('_') {
        let mut result = String::with_capacity(ident.len());
        let mut chars = ident.chars().peekable();

        while let Some(current) = chars.next() {
            match chars.peek() {
                Some(next) if current == '_' && next.is_ascii_lowercase() => {
                    result.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => result.push(current),
            }
        }

        return result;
    }

    let mut chars = ident.chars();

    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut result = String::with_capacity(ident.len());
            result.push(first.to_ascii_lowercase());
            result.push_str(chars.as_str());
            result
        }
        _ => ident.to_owned(),
    }
}
