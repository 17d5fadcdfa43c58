// Copyright 2025 Fernando Borretti
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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::generator::DigitSpec;
use crate::generator::OperandRule;
use crate::generator::validate_count;
use crate::types::category::Category;

/// Generator rules and drill defaults, optionally loaded from a TOML file.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Problems generated per category.
    pub count: usize,
    /// Problems shown per page in the drill.
    pub page_size: usize,
    pub addition: OperandRule,
    pub subtraction: OperandRule,
    pub multiplication: OperandRule,
    pub division: OperandRule,
}

impl Default for Config {
    fn default() -> Self {
        let magnitude = DigitSpec::Magnitude {
            min_exponent: 1,
            max_exponent: 4,
        };
        Self {
            count: 10,
            page_size: 20,
            addition: OperandRule {
                first: magnitude,
                second: magnitude,
            },
            subtraction: OperandRule {
                first: magnitude,
                second: magnitude,
            },
            multiplication: OperandRule {
                first: DigitSpec::Range { min: 2, max: 50 },
                second: DigitSpec::Range { min: 2, max: 30 },
            },
            division: OperandRule {
                first: DigitSpec::Range { min: 2, max: 50 },
                second: DigitSpec::Range { min: 2, max: 30 },
            },
        }
    }
}

impl Config {
    /// Load the config at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return fail("config file does not exist.");
                }
                log::debug!("Loading config from {}", path.display());
                let content = read_to_string(path)?;
                Self::parse(&content)?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Fallible<()> {
        validate_count(self.count)?;
        if self.page_size == 0 {
            return fail("page_size must be positive.");
        }
        for category in Category::ALL {
            self.rule(category)
                .validate(category)
                .map_err(|e| ErrorReport::new(&format!("[{category}] {}", e.message())))?;
        }
        Ok(())
    }

    pub fn rule(&self, category: Category) -> &OperandRule {
        match category {
            Category::Addition => &self.addition,
            Category::Subtraction => &self.subtraction,
            Category::Multiplication => &self.multiplication,
            Category::Division => &self.division,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults_are_valid() -> Fallible<()> {
        Config::default().validate()
    }

    #[test]
    fn test_empty_file_gives_defaults() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let config = Config::parse(
            r#"
            count = 3

            [multiplication]
            first = { kind = "range", min = 2, max = 12 }
            second = { kind = "range", min = 2, max = 12 }
            "#,
        )?;
        assert_eq!(config.count, 3);
        assert_eq!(config.page_size, 20);
        assert_eq!(
            config.multiplication.first,
            DigitSpec::Range { min: 2, max: 12 }
        );
        assert_eq!(config.addition, Config::default().addition);
        Ok(())
    }

    #[test]
    fn test_zero_divisor_is_rejected() {
        let result = Config::parse(
            r#"
            [division]
            first = { kind = "range", min = 1, max = 10 }
            second = { kind = "range", min = 0, max = 10 }
            "#,
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "error: [division] division divisor range must not include zero."
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert!(Config::parse("count = 0").is_err());
    }

    #[test]
    fn test_count_above_limit_is_rejected() {
        let err = Config::parse("count = 10001").unwrap_err();
        assert_eq!(err.message(), "count must be at most 10000.");
        assert!(Config::parse("count = 10000").is_ok());
    }

    #[test]
    fn test_load_from_file() -> Fallible<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "page_size = 5")?;
        let config = Config::load(Some(file.path()))?;
        assert_eq!(config.page_size, 5);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("./derpherp.toml")));
        assert_eq!(
            result.unwrap_err().to_string(),
            "error: config file does not exist."
        );
    }

    #[test]
    fn test_load_without_path() -> Fallible<()> {
        assert_eq!(Config::load(None)?, Config::default());
        Ok(())
    }
}
