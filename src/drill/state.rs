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
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rand::rngs::StdRng;

use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::session::Session;
use crate::types::category::Category;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub mutable: Arc<Mutex<MutableState>>,
}

impl ServerState {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("session state is poisoned."))
    }
}

pub struct MutableState {
    pub rng: StdRng,
    pub session: Session,
    /// The count and categories used for the current batch.
    pub count: usize,
    pub selection: Selection,
    /// Zero-based index of the page being shown.
    pub page: usize,
    /// Inline errors for answers that could not be parsed.
    pub errors: BTreeMap<ProblemId, String>,
    /// The text last submitted for each problem.
    pub drafts: BTreeMap<ProblemId, String>,
    /// An error from the last action that is not tied to a problem.
    pub notice: Option<String>,
}

impl MutableState {
    pub fn page_count(&self, page_size: usize) -> usize {
        self.session.batch().len().div_ceil(page_size).max(1)
    }

    pub fn page_problems(&self, page_size: usize) -> Vec<&Problem> {
        self.session
            .batch()
            .iter()
            .skip(self.page * page_size)
            .take(page_size)
            .collect()
    }

    /// Replace the session, forgetting everything tied to the old batch.
    pub fn replace_session(&mut self, session: Session) {
        self.session = session;
        self.page = 0;
        self.errors.clear();
        self.drafts.clear();
    }
}

/// Which categories a batch is generated for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Selection {
    All,
    Only(Category),
}

impl Selection {
    pub fn categories(&self) -> Vec<Category> {
        match self {
            Selection::All => Category::ALL.to_vec(),
            Selection::Only(category) => vec![*category],
        }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for Selection {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Selection::All),
            _ => Ok(Selection::Only(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::generator::generate_batch;
    use crate::types::timestamp::Timestamp;

    fn state(count: usize) -> Fallible<MutableState> {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = generate_batch(&mut rng, &Category::ALL, count, &Config::default())?;
        Ok(MutableState {
            rng,
            session: Session::new(batch, Timestamp::now()),
            count,
            selection: Selection::All,
            page: 0,
            errors: BTreeMap::new(),
            drafts: BTreeMap::new(),
            notice: None,
        })
    }

    #[test]
    fn test_pagination() -> Fallible<()> {
        let mut state = state(3)?;
        assert_eq!(state.page_count(5), 3);
        assert_eq!(state.page_problems(5).len(), 5);
        state.page = 2;
        let last = state.page_problems(5);
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].id().to_string(), "division-3");
        Ok(())
    }

    #[test]
    fn test_page_count_is_at_least_one() -> Fallible<()> {
        let state = state(1)?;
        assert_eq!(state.page_count(100), 1);
        Ok(())
    }

    #[test]
    fn test_selection_parse() -> Fallible<()> {
        assert_eq!("all".parse::<Selection>()?, Selection::All);
        assert_eq!(
            "division".parse::<Selection>()?,
            Selection::Only(Category::Division)
        );
        assert!("modulo".parse::<Selection>().is_err());
        assert_eq!(Selection::All.categories().len(), 4);
        Ok(())
    }
}
