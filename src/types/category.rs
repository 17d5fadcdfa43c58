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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// An arithmetic operation. The declaration order is the display order.
#[derive(ValueEnum, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Addition,
        Category::Subtraction,
        Category::Multiplication,
        Category::Division,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Addition => "addition",
            Category::Subtraction => "subtraction",
            Category::Multiplication => "multiplication",
            Category::Division => "division",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Category::Addition => "+",
            Category::Subtraction => "-",
            Category::Multiplication => "×",
            Category::Division => "÷",
        }
    }

    /// Capitalized name, for headings.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Addition => "Addition",
            Category::Subtraction => "Subtraction",
            Category::Multiplication => "Multiplication",
            Category::Division => "Division",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addition" => Ok(Category::Addition),
            "subtraction" => Ok(Category::Subtraction),
            "multiplication" => Ok(Category::Multiplication),
            "division" => Ok(Category::Division),
            _ => fail(format!("invalid category: {s}")),
        }
    }
}
