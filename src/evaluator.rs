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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::problem::Problem;

/// Maximum difference accepted when the expected answer is fractional.
const TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Evaluation {
    pub correct: bool,
    pub value: f64,
}

/// Grade `submitted` against the problem's expected answer. Pure: recording
/// the result is up to the caller.
pub fn evaluate(problem: &Problem, submitted: &str) -> Fallible<Evaluation> {
    let value = parse_answer(submitted)?;
    let correct = answers_match(problem.answer() as f64, value);
    Ok(Evaluation { correct, value })
}

/// Parse a plain decimal number such as `-1,234.5`. A `,` or `_` separator
/// is only accepted between groups of three integer digits. Exponents and
/// words like `inf` are rejected.
pub fn parse_answer(text: &str) -> Fallible<f64> {
    let digits = match strip_separators(text.trim()) {
        Some(digits) => digits,
        None => return fail("invalid number"),
    };
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => fail("invalid number"),
    }
}

fn strip_separators(text: &str) -> Option<String> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !fraction.is_none_or(all_digits) {
        return None;
    }
    let mut groups = integer.split([',', '_']);
    let head = groups.next()?;
    let grouped = integer.len() > head.len();
    if !all_digits(head) || (grouped && !(1..=3).contains(&head.len())) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && all_digits(group)) {
        return None;
    }
    if integer.is_empty() && fraction.is_none_or(str::is_empty) {
        return None;
    }
    let sign = &text[..text.len() - unsigned.len()];
    let mut cleaned: String = sign.to_string();
    cleaned.extend(integer.chars().filter(char::is_ascii_digit));
    if let Some(fraction) = fraction {
        cleaned.push('.');
        cleaned.push_str(fraction);
    }
    Some(cleaned)
}

/// Integral answers must match exactly; fractional ones within `TOLERANCE`.
/// Generated problems always have integral answers, so the tolerance branch
/// is only reached from tests.
pub fn answers_match(expected: f64, submitted: f64) -> bool {
    if expected.fract() == 0.0 {
        submitted == expected
    } else {
        (submitted - expected).abs() < TOLERANCE
    }
}
