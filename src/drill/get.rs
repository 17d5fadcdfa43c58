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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::drill::state::MutableState;
use crate::drill::state::Selection;
use crate::drill::state::ServerState;
use crate::drill::template::page_template;
use crate::error::Fallible;
use crate::generator::MAX_COUNT;
use crate::types::category::Category;
use crate::types::problem::Problem;
use crate::types::problem::format_thousands;
use crate::types::timestamp::Timestamp;
use crate::types::timestamp::format_elapsed;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    match render_page(&state) {
        Ok(body) => {
            let html = page_template(body);
            (StatusCode::OK, Html(html.into_string()))
        }
        Err(e) => {
            log::error!("{e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(e.to_string()))
        }
    }
}

fn render_page(state: &ServerState) -> Fallible<Markup> {
    let mutable = state.lock()?;
    let page_size = state.config.page_size;
    let session = &mutable.session;
    let totals = session.totals();
    let elapsed = format_elapsed(session.elapsed_seconds(Timestamp::now()));
    let summary = format!(
        "{} / {} attempted, {:.1}% accuracy",
        totals.attempted,
        session.batch().len(),
        session.accuracy()
    );
    let page_label = format!(
        "Page {} of {}",
        mutable.page + 1,
        mutable.page_count(page_size)
    );
    let first_page = mutable.page == 0;
    let last_page = mutable.page + 1 >= mutable.page_count(page_size);
    let body = html! {
        div.root {
            div.header {
                h1 { "Arithmetic Drill" }
                div.elapsed { "Elapsed: " (elapsed) }
                div.summary { (summary) }
                a.export href="/export.json" download="math_session.json" { "Export JSON" }
            }
            @if let Some(notice) = &mutable.notice {
                div.notice { (notice) }
            }
            (render_generate_form(&mutable))
            div.stats {
                @for category in session.batch().categories() {
                    (render_stats(&mutable, category))
                }
            }
            div.problems {
                @if session.batch().is_empty() {
                    p.empty { "No problems generated." }
                }
                @for problem in mutable.page_problems(page_size) {
                    (render_problem(&mutable, problem))
                }
            }
            div.pagination {
                form action="/" method="post" {
                    @if first_page {
                        input id="previous" type="submit" name="action" value="Previous" disabled;
                    } @else {
                        input id="previous" type="submit" name="action" value="Previous";
                    }
                    span.page { (page_label) }
                    @if last_page {
                        input id="next" type="submit" name="action" value="Next" disabled;
                    } @else {
                        input id="next" type="submit" name="action" value="Next";
                    }
                }
            }
        }
    };
    Ok(body)
}

fn render_generate_form(mutable: &MutableState) -> Markup {
    let selected = mutable.selection;
    html! {
        form.generate action="/" method="post" {
            label for="count" { "Problems per category" }
            input id="count" type="number" name="count" min="1" max=(MAX_COUNT) value=(mutable.count);
            label for="category" { "Operation" }
            select id="category" name="category" {
                option value="all" selected[selected == Selection::All] { "All" }
                @for category in Category::ALL {
                    option value=(category.as_str()) selected[selected == Selection::Only(category)] {
                        (category.title())
                    }
                }
            }
            input id="generate" type="submit" name="action" value="Generate";
        }
    }
}

fn render_stats(mutable: &MutableState, category: Category) -> Markup {
    let stats = mutable.session.stats(category);
    let total = mutable.session.batch().problems(category).len();
    html! {
        div.stat {
            h2 { (category.symbol()) " " (category.title()) }
            p.attempted { (stats.attempted) " / " (total) " attempted" }
            p.correct { (stats.correct) " correct" }
        }
    }
}

fn render_problem(mutable: &MutableState, problem: &Problem) -> Markup {
    let id = problem.id();
    let revealed = mutable.session.is_revealed(id);
    let draft = mutable.drafts.get(&id).map(String::as_str).unwrap_or("");
    let feedback: Markup = match (mutable.errors.get(&id), mutable.session.attempt(id)) {
        (Some(error), _) => html! { span.invalid { (error) } },
        (None, Some(attempt)) if attempt.correct => html! { span.correct { "Correct" } },
        (None, Some(_)) => html! { span.incorrect { "Incorrect" } },
        (None, None) => html! {},
    };
    html! {
        div.problem id=(id.to_string()) {
            div.label {
                span.category { (problem.category().title()) }
                span.ordinal { "#" (problem.ordinal()) }
            }
            div.question { (problem.text()) }
            form action="/" method="post" {
                input type="hidden" name="problem" value=(id.to_string());
                input type="text" name="answer" inputmode="decimal" autocomplete="off" value=(draft);
                input type="submit" name="action" value="Check";
                @if revealed {
                    input type="submit" name="action" value="Hide";
                } @else {
                    input type="submit" name="action" value="Reveal";
                }
            }
            div.feedback {
                (feedback)
                @if revealed {
                    span.answer { "Answer: " (format_thousands(problem.answer())) }
                }
            }
        }
    }
}
