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

use super::camel_to_snake;

/// Check that `snake_value` is the canonical `snake_case` counterpart of `camel_key`.
///
/// Neither side is classified here, callers wanting that guarantee check the casing first.
pub fn validate_mapping(camel_key: &str, snake_value: &str) -> bool {
    camel_to_snake(camel_key) == snake_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_validate_mapping() {
        assert!(validate_mapping("userId", "user_id"));
        assert!(validate_mapping("userIDToken", "user_id_token"));
        assert!(validate_mapping("", ""));
    }

    #[test]
    fn can_fail_wrong_mapping() {
        assert!(!validate_mapping("userId", "userid"));
        assert!(!validate_mapping("userId", "user_name"));
        assert!(!validate_mapping("userId", "USER_ID"));
    }
}
