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

use fieldcase::{report::LintIssue, validation::*};
use paste::paste;

macro_rules! lint_test {
    ($name:ident, $extension:ident, $kind:expr) => {
        paste! {
            #[test]
            fn [< can_lint_ $name >]() {
                let file = concat!(stringify!($name), ".", stringify!($extension));
                let contents = std::fs::read_to_string(concat!("tests/data/", stringify!($name), ".", stringify!($extension))).unwrap();
                let issues: Vec<LintIssue> = Validator::default()
                    .validate(file, $kind, &contents)
                    .iter()
                    .map(LintIssue::from)
                    .collect();
                let expected = std::fs::read_to_string(concat!("tests/data/", stringify!($name), ".json")).unwrap();
                let expected: Vec<LintIssue> = serde_json::from_str(&expected).unwrap();
                similar_asserts::assert_eq!(issues, expected);
            }
        }
    };
}

lint_test!(mappings, ts, FileKind::Source);
lint_test!(component, jsx, FileKind::Source);
lint_test!(events, sql, FileKind::Sql);
