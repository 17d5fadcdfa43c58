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

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::error::Fallible;
use crate::export::export_batch;
use crate::generator::generate_batch;
use crate::types::category::Category;

/// Print a fresh batch as JSON, keyed by category.
pub fn print_problems(
    config: &Config,
    count: Option<usize>,
    category: Option<Category>,
    seed: Option<u64>,
) -> Fallible<()> {
    let json = get_problems_json(config, count, category, seed)?;
    println!("{json}");
    Ok(())
}

fn get_problems_json(
    config: &Config,
    count: Option<usize>,
    category: Option<Category>,
    seed: Option<u64>,
) -> Fallible<String> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let categories: Vec<Category> = match category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };
    let count = count.unwrap_or(config.count);
    let batch = generate_batch(&mut rng, &categories, count, config)?;
    let json = serde_json::to_string_pretty(&export_batch(&batch))?;
    Ok(json)
}
