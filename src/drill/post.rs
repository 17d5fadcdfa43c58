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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::drill::state::MutableState;
use crate::drill::state::Selection;
use crate::drill::state::ServerState;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::generator::generate_batch;
use crate::session::Session;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
enum Action {
    Generate,
    Check,
    Reveal,
    Hide,
    Previous,
    Next,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    count: Option<String>,
    category: Option<String>,
    problem: Option<String>,
    answer: Option<String>,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
            if let Ok(mut mutable) = state.lock() {
                mutable.notice = Some(e.message().to_string());
            }
        }
    }
    Redirect::to("/")
}

fn action_handler(state: &ServerState, form: FormData) -> Fallible<()> {
    let mut mutable = state.lock()?;
    mutable.notice = None;
    let page_size = state.config.page_size;
    match form.action {
        Action::Generate => {
            let count: usize = match form.count.as_deref().map(str::trim) {
                None | Some("") => mutable.count,
                Some(count) => count
                    .parse()
                    .map_err(|_| ErrorReport::new("count must be a positive integer."))?,
            };
            let selection: Selection = match form.category.as_deref() {
                None | Some("") => mutable.selection,
                Some(category) => category.parse()?,
            };
            let batch = generate_batch(
                &mut mutable.rng,
                &selection.categories(),
                count,
                &state.config,
            )?;
            log::debug!("New session: {count} problems each for {selection}.");
            mutable.replace_session(Session::new(batch, Timestamp::now()));
            mutable.count = count;
            mutable.selection = selection;
        }
        Action::Check => {
            let id = problem_id(&form)?;
            let answer = form.answer.unwrap_or_default();
            check(&mut mutable, id, answer)?;
        }
        Action::Reveal => {
            let id = problem_id(&form)?;
            mutable.session.reveal(id)?;
        }
        Action::Hide => {
            let id = problem_id(&form)?;
            mutable.session.hide(id)?;
        }
        Action::Previous => {
            mutable.page = mutable.page.saturating_sub(1);
        }
        Action::Next => {
            let last = mutable.page_count(page_size) - 1;
            mutable.page = (mutable.page + 1).min(last);
        }
    }
    Ok(())
}

fn problem_id(form: &FormData) -> Fallible<ProblemId> {
    match form.problem.as_deref() {
        Some(id) => id.parse(),
        None => Err(ErrorReport::new("missing problem identifier.")),
    }
}

/// Grade an answer, keeping parse failures next to the problem instead of
/// failing the whole action.
fn check(mutable: &mut MutableState, id: ProblemId, answer: String) -> Fallible<()> {
    if mutable.session.batch().get(id).is_none() {
        return fail(format!("no problem with identifier {id}."));
    }
    match mutable.session.check(id, &answer) {
        Ok(evaluation) => {
            log::debug!(
                "{id}: {} ({})",
                evaluation.value,
                if evaluation.correct {
                    "correct"
                } else {
                    "incorrect"
                }
            );
            mutable.errors.remove(&id);
        }
        Err(e) => {
            log::debug!("{id}: {e}");
            mutable.errors.insert(id, e.message().to_string());
        }
    }
    mutable.drafts.insert(id, answer);
    Ok(())
}
