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

use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::category::Category;

/// Identifies a problem within a batch, e.g. `addition-3`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ProblemId {
    category: Category,
    ordinal: usize,
}

impl ProblemId {
    pub fn new(category: Category, ordinal: usize) -> Self {
        Self { category, ordinal }
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl Display for ProblemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.category, self.ordinal)
    }
}

impl FromStr for ProblemId {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, ordinal) = s
            .rsplit_once('-')
            .ok_or_else(|| ErrorReport::new("invalid problem identifier"))?;
        let category: Category = category.parse()?;
        let ordinal: usize = ordinal
            .parse()
            .map_err(|_| ErrorReport::new("invalid problem identifier"))?;
        if ordinal == 0 {
            return fail("invalid problem identifier");
        }
        Ok(Self { category, ordinal })
    }
}

impl Serialize for ProblemId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A generated arithmetic question.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Problem {
    id: ProblemId,
    operand1: u64,
    operand2: u64,
    /// Always an integer: division problems are built from an exact quotient.
    answer: u64,
    text: String,
}

impl Problem {
    /// Build a problem from its operands. Subtraction must not go negative and
    /// division must be exact.
    pub fn new(category: Category, operand1: u64, operand2: u64, ordinal: usize) -> Fallible<Self> {
        if ordinal == 0 {
            return fail("ordinal numbers start at 1.");
        }
        let answer = match category {
            Category::Addition => operand1.checked_add(operand2),
            Category::Subtraction => {
                if operand1 < operand2 {
                    return fail(format!(
                        "subtraction {operand1} - {operand2} has a negative result."
                    ));
                }
                Some(operand1 - operand2)
            }
            Category::Multiplication => operand1.checked_mul(operand2),
            Category::Division => {
                if operand2 == 0 {
                    return fail("division by zero.");
                }
                if operand1 % operand2 != 0 {
                    return fail(format!(
                        "division {operand1} ÷ {operand2} has a remainder."
                    ));
                }
                Some(operand1 / operand2)
            }
        };
        let answer = answer.ok_or_else(|| ErrorReport::new("operands are too large."))?;
        let text = format!(
            "{} {} {} = ?",
            format_thousands(operand1),
            category.symbol(),
            format_thousands(operand2)
        );
        Ok(Self {
            id: ProblemId::new(category, ordinal),
            operand1,
            operand2,
            answer,
            text,
        })
    }

    pub fn id(&self) -> ProblemId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.id.category
    }

    /// The 1-based position of the problem within its category.
    pub fn ordinal(&self) -> usize {
        self.id.ordinal
    }

    pub fn operand1(&self) -> u64 {
        self.operand1
    }

    pub fn operand2(&self) -> u64 {
        self.operand2
    }

    pub fn answer(&self) -> u64 {
        self.answer
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Render an integer with `,` between groups of three digits.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
