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

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::Fallible;
use crate::error::fail;
use crate::evaluator::Evaluation;
use crate::evaluator::evaluate;
use crate::types::batch::Batch;
use crate::types::category::Category;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

/// The latest graded answer to a problem.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Attempt {
    pub problem: ProblemId,
    pub submitted: f64,
    pub correct: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct CategoryStats {
    pub attempted: usize,
    pub correct: usize,
}

/// One practice run: a batch and everything recorded against it. Replaced
/// wholesale when a new batch is generated.
#[derive(Clone, Debug)]
pub struct Session {
    batch: Batch,
    started_at: Timestamp,
    attempts: BTreeMap<ProblemId, Attempt>,
    stats: BTreeMap<Category, CategoryStats>,
    revealed: BTreeSet<ProblemId>,
}

impl Session {
    pub fn new(batch: Batch, started_at: Timestamp) -> Self {
        Self {
            batch,
            started_at,
            attempts: BTreeMap::new(),
            stats: BTreeMap::new(),
            revealed: BTreeSet::new(),
        }
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    fn problem(&self, id: ProblemId) -> Fallible<&Problem> {
        match self.batch.get(id) {
            Some(problem) => Ok(problem),
            None => fail(format!("no problem with identifier {id}.")),
        }
    }

    /// Grade an answer. Invalid input leaves the session untouched. The
    /// attempt record is always overwritten, but the category counters only
    /// move the first time a problem is graded.
    pub fn check(&mut self, id: ProblemId, submitted: &str) -> Fallible<Evaluation> {
        let problem = self.problem(id)?;
        let evaluation = evaluate(problem, submitted)?;
        let attempt = Attempt {
            problem: id,
            submitted: evaluation.value,
            correct: evaluation.correct,
        };
        let first = self.attempts.insert(id, attempt).is_none();
        if first {
            let stats = self.stats.entry(id.category()).or_default();
            stats.attempted += 1;
            if evaluation.correct {
                stats.correct += 1;
            }
        }
        Ok(evaluation)
    }

    pub fn reveal(&mut self, id: ProblemId) -> Fallible<()> {
        self.problem(id)?;
        self.revealed.insert(id);
        Ok(())
    }

    pub fn hide(&mut self, id: ProblemId) -> Fallible<()> {
        self.problem(id)?;
        self.revealed.remove(&id);
        Ok(())
    }

    pub fn is_revealed(&self, id: ProblemId) -> bool {
        self.revealed.contains(&id)
    }

    pub fn revealed(&self) -> impl Iterator<Item = ProblemId> + '_ {
        self.revealed.iter().copied()
    }

    pub fn attempt(&self, id: ProblemId) -> Option<&Attempt> {
        self.attempts.get(&id)
    }

    pub fn attempts(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.values()
    }

    pub fn stats(&self, category: Category) -> CategoryStats {
        self.stats.get(&category).copied().unwrap_or_default()
    }

    /// Counters summed over every category.
    pub fn totals(&self) -> CategoryStats {
        self.stats
            .values()
            .fold(CategoryStats::default(), |acc, s| CategoryStats {
                attempted: acc.attempted + s.attempted,
                correct: acc.correct + s.correct,
            })
    }

    /// Percentage of attempted problems answered correctly.
    pub fn accuracy(&self) -> f64 {
        let totals = self.totals();
        percentage(totals.correct, totals.attempted)
    }

    /// Percentage of the batch that has been attempted.
    pub fn completion_rate(&self) -> f64 {
        percentage(self.totals().attempted, self.batch.len())
    }

    pub fn elapsed_seconds(&self, now: Timestamp) -> u64 {
        self.started_at.seconds_until(now)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
