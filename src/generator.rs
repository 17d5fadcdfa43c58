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

use rand::Rng;
use serde::Deserialize;

use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::batch::Batch;
use crate::types::category::Category;
use crate::types::problem::Problem;

/// Upper bound on any single operand, so that every answer stays exactly
/// representable as an `f64`.
pub const MAX_OPERAND: u64 = 1_000_000;

/// Largest exponent accepted by [`DigitSpec::Magnitude`].
pub const MAX_EXPONENT: u32 = 6;

/// Most problems that can be generated per category in one batch.
pub const MAX_COUNT: usize = 10_000;

/// How a single operand is drawn.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DigitSpec {
    /// Uniform in `[min, max]`.
    Range { min: u64, max: u64 },
    /// Pick `k` uniformly in `[min_exponent, max_exponent]`, then draw
    /// uniformly in `[1, 10^k]`.
    Magnitude { min_exponent: u32, max_exponent: u32 },
}

impl DigitSpec {
    pub fn validate(&self) -> Fallible<()> {
        match *self {
            DigitSpec::Range { min, max } => {
                if min > max {
                    return fail(format!("range minimum {min} exceeds maximum {max}."));
                }
                if max > MAX_OPERAND {
                    return fail(format!("range maximum {max} exceeds {MAX_OPERAND}."));
                }
            }
            DigitSpec::Magnitude {
                min_exponent,
                max_exponent,
            } => {
                if min_exponent > max_exponent {
                    return fail(format!(
                        "minimum exponent {min_exponent} exceeds maximum exponent {max_exponent}."
                    ));
                }
                if max_exponent > MAX_EXPONENT {
                    return fail(format!(
                        "maximum exponent {max_exponent} exceeds {MAX_EXPONENT}."
                    ));
                }
            }
        }
        Ok(())
    }

    /// The smallest value `sample` can produce.
    pub fn min_value(&self) -> u64 {
        match *self {
            DigitSpec::Range { min, .. } => min,
            DigitSpec::Magnitude { .. } => 1,
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        match *self {
            DigitSpec::Range { min, max } => rng.random_range(min..=max),
            DigitSpec::Magnitude {
                min_exponent,
                max_exponent,
            } => {
                let k = rng.random_range(min_exponent..=max_exponent);
                rng.random_range(1..=10u64.pow(k))
            }
        }
    }
}

/// The pair of operand specs for one category. For division, `first` is the
/// quotient and `second` the divisor.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(deny_unknown_fields)]
pub struct OperandRule {
    pub first: DigitSpec,
    pub second: DigitSpec,
}

impl OperandRule {
    pub fn validate(&self, category: Category) -> Fallible<()> {
        self.first.validate()?;
        self.second.validate()?;
        if category == Category::Division && self.second.min_value() == 0 {
            return fail("division divisor range must not include zero.");
        }
        Ok(())
    }
}

pub fn validate_count(count: usize) -> Fallible<()> {
    if count == 0 {
        return fail("count must be positive.");
    }
    if count > MAX_COUNT {
        return fail(format!("count must be at most {MAX_COUNT}."));
    }
    Ok(())
}

/// Generate `count` problems of one category. Ordinals start at 1.
pub fn generate<R: Rng>(
    rng: &mut R,
    category: Category,
    count: usize,
    rule: &OperandRule,
) -> Fallible<Vec<Problem>> {
    validate_count(count)?;
    rule.validate(category)?;
    let mut problems = Vec::with_capacity(count);
    for ordinal in 1..=count {
        let a = rule.first.sample(rng);
        let b = rule.second.sample(rng);
        let problem = match category {
            Category::Addition | Category::Multiplication => {
                Problem::new(category, a, b, ordinal)?
            }
            Category::Subtraction => {
                let (minuend, subtrahend) = if a >= b { (a, b) } else { (b, a) };
                Problem::new(category, minuend, subtrahend, ordinal)?
            }
            Category::Division => {
                let (quotient, divisor) = (a, b);
                Problem::new(category, divisor * quotient, divisor, ordinal)?
            }
        };
        problems.push(problem);
    }
    Ok(problems)
}

/// Generate `count` problems for each of `categories`.
pub fn generate_batch<R: Rng>(
    rng: &mut R,
    categories: &[Category],
    count: usize,
    config: &Config,
) -> Fallible<Batch> {
    if categories.is_empty() {
        return fail("no categories selected.");
    }
    validate_count(count)?;
    let mut batch = Batch::empty();
    for category in categories {
        let problems = generate(rng, *category, count, config.rule(*category))?;
        batch.insert(*category, problems);
    }
    log::debug!(
        "Generated {} problems across {} categories.",
        batch.len(),
        categories.len()
    );
    Ok(batch)
}
