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

use serde::Serialize;

use crate::session::Session;
use crate::types::batch::Batch;
use crate::types::category::Category;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    metadata: MetadataExport,
    problems: BTreeMap<Category, Vec<ProblemExport>>,
    performance: PerformanceExport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetadataExport {
    generated_at: Timestamp,
    exported_at: Timestamp,
    elapsed_seconds: u64,
    total_problems: usize,
    attempted: usize,
    correct: usize,
    accuracy: f64,
    completion_rate: f64,
    categories: BTreeMap<Category, CategoryExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryExport {
    problems: usize,
    attempted: usize,
    correct: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemExport {
    id: ProblemId,
    ordinal: usize,
    operand1: u64,
    operand2: u64,
    answer: u64,
    question: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceExport {
    attempts: BTreeMap<ProblemId, AttemptExport>,
    revealed: Vec<ProblemId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttemptExport {
    submitted: f64,
    correct: bool,
}

/// The problems of a batch, keyed by category.
pub fn export_batch(batch: &Batch) -> BTreeMap<Category, Vec<ProblemExport>> {
    batch
        .categories()
        .map(|category| {
            let problems = batch
                .problems(category)
                .iter()
                .map(|p| ProblemExport {
                    id: p.id(),
                    ordinal: p.ordinal(),
                    operand1: p.operand1(),
                    operand2: p.operand2(),
                    answer: p.answer(),
                    question: p.text().to_string(),
                })
                .collect();
            (category, problems)
        })
        .collect()
}

pub fn export_session(session: &Session, now: Timestamp) -> SessionExport {
    let batch = session.batch();
    let totals = session.totals();
    let categories = batch
        .categories()
        .map(|category| {
            let stats = session.stats(category);
            let export = CategoryExport {
                problems: batch.problems(category).len(),
                attempted: stats.attempted,
                correct: stats.correct,
            };
            (category, export)
        })
        .collect();
    let metadata = MetadataExport {
        generated_at: session.started_at(),
        exported_at: now,
        elapsed_seconds: session.elapsed_seconds(now),
        total_problems: batch.len(),
        attempted: totals.attempted,
        correct: totals.correct,
        accuracy: session.accuracy(),
        completion_rate: session.completion_rate(),
        categories,
    };
    let attempts = session
        .attempts()
        .map(|a| {
            (
                a.problem,
                AttemptExport {
                    submitted: a.submitted,
                    correct: a.correct,
                },
            )
        })
        .collect();
    SessionExport {
        metadata,
        problems: export_batch(batch),
        performance: PerformanceExport {
            attempts,
            revealed: session.revealed().collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use serde_json::json;

    use super::*;
    use crate::error::Fallible;
    use crate::types::problem::Problem;

    #[test]
    fn test_session_export() -> Fallible<()> {
        let mut batch = Batch::empty();
        batch.insert(
            Category::Addition,
            vec![
                Problem::new(Category::Addition, 345, 12, 1)?,
                Problem::new(Category::Addition, 1, 2, 2)?,
            ],
        );
        let mut session = Session::new(batch, Timestamp::now());
        session.check("addition-1".parse()?, "357")?;
        session.check("addition-2".parse()?, "4")?;
        session.reveal("addition-2".parse()?)?;

        let export = export_session(&session, Timestamp::now());
        let value: Value = serde_json::to_value(&export)?;

        let metadata = &value["metadata"];
        assert_eq!(metadata["totalProblems"], json!(2));
        assert_eq!(metadata["attempted"], json!(2));
        assert_eq!(metadata["correct"], json!(1));
        assert_eq!(metadata["accuracy"], json!(50.0));
        assert_eq!(metadata["completionRate"], json!(100.0));
        assert_eq!(
            metadata["categories"]["addition"],
            json!({"problems": 2, "attempted": 2, "correct": 1})
        );

        let problem = &value["problems"]["addition"][0];
        assert_eq!(problem["id"], json!("addition-1"));
        assert_eq!(problem["question"], json!("345 + 12 = ?"));
        assert_eq!(problem["answer"], json!(357));

        let performance = &value["performance"];
        assert_eq!(
            performance["attempts"]["addition-2"],
            json!({"submitted": 4.0, "correct": false})
        );
        assert_eq!(performance["revealed"], json!(["addition-2"]));
        Ok(())
    }
}
