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

use crate::types::category::Category;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;

/// The problems of one generation, keyed by category.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Batch {
    problems: BTreeMap<Category, Vec<Problem>>,
}

impl Batch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, problems: Vec<Problem>) {
        self.problems.insert(category, problems);
    }

    /// The problems of a category, in generation order.
    pub fn problems(&self, category: Category) -> &[Problem] {
        self.problems
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.problems.keys().copied()
    }

    /// Every problem, categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.values().flatten()
    }

    pub fn get(&self, id: ProblemId) -> Option<&Problem> {
        self.problems(id.category()).iter().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.problems.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
