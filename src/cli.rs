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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_config;
use crate::cmd::generate::print_problems;
use crate::config::Config;
use crate::drill::server::ServerOptions;
use crate::drill::server::start_server;
use crate::error::Fallible;
use crate::types::category::Category;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Practice in the browser.
    Drill {
        /// Problems per category.
        #[arg(long)]
        count: Option<usize>,
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// The port to use for the web server.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Seed for problem generation.
        #[arg(long)]
        seed: Option<u64>,
        /// Don't open the browser automatically.
        #[arg(long)]
        no_open: bool,
    },
    /// Print a batch of problems as JSON.
    Generate {
        /// Problems per category.
        #[arg(long)]
        count: Option<usize>,
        /// Only generate problems of this category.
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seed for problem generation.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a config file.
    Check {
        /// Path to the config file.
        config: PathBuf,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            count,
            config,
            port,
            seed,
            no_open,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(count) = count {
                config.count = count;
            }
            let options = ServerOptions {
                port,
                seed,
                open_browser: !no_open,
            };
            start_server(config, options).await
        }
        Command::Generate {
            count,
            category,
            config,
            seed,
        } => {
            let config = Config::load(config.as_deref())?;
            print_problems(&config, count, category, seed)
        }
        Command::Check { config } => check_config(&config),
    }
}
