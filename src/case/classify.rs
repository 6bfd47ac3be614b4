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

/// Determine if this character is allowed at the start of an identifier in either convention.
fn is_allowed_start(c: u8) -> bool {
    c.is_ascii_lowercase()
}

/// Determine if this string is a valid `camelCase` identifier.
///
/// The first character must be a lowercase ASCII letter, all others ASCII letters or digits.
pub fn is_camel_case(ident: &str) -> bool {
    match ident.as_bytes() {
        [first, rest @ ..] => {
            is_allowed_start(*first) && rest.iter().all(|c| c.is_ascii_alphanumeric())
        }
        [] => false,
    }
}

/// Determine if this string is a valid `snake_case` identifier.
///
/// The first character must be a lowercase ASCII letter, all others lowercase ASCII letters,
/// digits or single underscores. A trailing underscore is not allowed.
pub fn is_snake_case(ident: &str) -> bool {
    let bytes = ident.as_bytes();

    let Some(first) = bytes.first() else {
        return false;
    };

    is_allowed_start(*first)
        && bytes
            .iter()
            .all(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_')
        && !ident.contains("__")
        && !ident.ends_with('_')
}
