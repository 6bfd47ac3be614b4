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

//! Classification of and conversion between `camelCase` and `snake_case` identifiers.
//!
//! Every function in this module is total: any string, including the empty string and strings
//! containing symbols or non-ASCII characters, yields a plain `bool` or `String`.

/// Predicates deciding the casing convention of an identifier.
mod classify;
/// Conversions between the two casing conventions.
mod convert;
/// Validation of camel/snake pairs.
mod mapping;

pub use self::{classify::*, convert::*, mapping::*};

use std::fmt;

/// Casing convention of an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// `camelCase`, as used by API payloads.
    Camel,
    /// `snake_case`, as used by storage columns.
    Snake,
    /// Any other shape (`PascalCase`, `SCREAMING_SNAKE`, `kebab-case`, ...).
    Neither,
}

impl CaseKind {
    /// Classify an identifier.
    ///
    /// Single-word lowercase identifiers such as `user` are valid in both conventions and
    /// classify as [`CaseKind::Camel`].
    pub fn of(ident: &str) -> Self {
        if is_camel_case(ident) {
            Self::Camel
        } else if is_snake_case(ident) {
            Self::Snake
        } else {
            Self::Neither
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camel => f.write_str("camelCase"),
            Self::Snake => f.write_str("snake_case"),
            Self::Neither => f.write_str("neither"),
        }
    }
}
