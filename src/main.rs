/* main.rs
 *
 * Copyright 2026 emviolet
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 *
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

use std::fs;
use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::debug;

use solitaire_check::engine::status_text::build_check_status;
use solitaire_check::engine::{check_solvable, CheckProfile, SearchLimits};
use solitaire_check::game::{all_variants, deal, variant_for_id, Snapshot, VariantRules};
use solitaire_check::trace;
use solitaire_check::winnability::{
    default_find_attempts, find_solvable_seed_parallel, CheckClient, CheckRequest, CheckResponse,
    Submission, TracingFeedback,
};

/// Slack on top of the search budget before the worker is given up on.
const WORKER_GRACE_MS: u64 = 5_000;

#[derive(Debug, Parser)]
#[command(name = "solitaire-check", version, about = "Solitaire solvability checker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a check request (JSON) and print the response.
    Check {
        /// Request file, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Deal a seeded game and check it.
    Deal {
        #[arg(long)]
        game: String,
        #[arg(long)]
        seed: u64,
        #[command(flatten)]
        budget: BudgetArgs,
        /// Print a one-line summary instead of JSON.
        #[arg(long)]
        summary: bool,
    },
    /// Search seeds upward from `--seed` for a provably solvable deal.
    Find {
        #[arg(long)]
        game: String,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        attempts: Option<u32>,
        #[command(flatten)]
        budget: BudgetArgs,
    },
    /// List known game ids.
    Variants,
}

#[derive(Debug, clap::Args)]
struct BudgetArgs {
    /// Use the backtracking search.
    #[arg(long)]
    deep: bool,
    #[arg(long)]
    max_states: Option<usize>,
    #[arg(long)]
    max_ms: Option<u64>,
    #[arg(long)]
    threshold: Option<usize>,
}

impl BudgetArgs {
    fn limits(&self, rules: &VariantRules) -> SearchLimits {
        let base = CheckProfile::for_variant(rules).limits(self.deep);
        let limits = SearchLimits {
            max_states: self.max_states.unwrap_or(base.max_states),
            max_duration_ms: self.max_ms.unwrap_or(base.max_duration_ms),
            ..base
        };
        match self.threshold {
            Some(threshold) => limits.with_threshold(threshold),
            None => limits,
        }
    }
}

fn lookup(game: &str) -> Result<&'static VariantRules, String> {
    variant_for_id(game).ok_or_else(|| format!("unknown game `{game}` (see `variants`)"))
}

fn read_input(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| format!("failed to read stdin: {err}"))?;
        return Ok(buffer);
    }
    fs::read_to_string(input).map_err(|err| format!("failed to read {input}: {err}"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to encode response: {err}"))?;
    println!("{text}");
    Ok(())
}

fn run_check_command(input: &str) -> Result<(), String> {
    let text = read_input(input)?;
    let request: CheckRequest =
        serde_json::from_str(&text).map_err(|err| format!("invalid check request: {err}"))?;
    let request_id = request.request_id;
    let timeout_ms = request.limits.max_duration_ms.saturating_add(WORKER_GRACE_MS);
    let timeout = Duration::from_millis(timeout_ms);
    let mut client = CheckClient::new(TracingFeedback);
    let mut response = match client.submit(&request.game, request.snapshot, request.limits) {
        Submission::Completed(response) => response,
        Submission::Pending(_) => client
            .wait(timeout)
            .ok_or_else(|| "check worker did not answer in time".to_string())?,
    };
    response.request_id = request_id;
    print_json(&response)?;
    match response.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn run_deal_command(
    game: &str,
    seed: u64,
    budget: &BudgetArgs,
    summary: bool,
) -> Result<(), String> {
    let rules = lookup(game)?;
    let limits = budget.limits(rules);
    let state = deal(rules, seed);
    debug!(game, seed, "dealt");
    let result = check_solvable(&state, rules, &limits);
    if summary {
        println!("{} #{seed}: {}", rules.label, build_check_status(&result));
        for (step, mv) in result.solution_moves.iter().flatten().enumerate() {
            println!("{:>4}. {}", step + 1, mv.describe());
        }
        return Ok(());
    }
    let response = CheckResponse {
        request_id: seed,
        result: Some(result),
        error: None,
    };
    print_json(&serde_json::json!({
        "game": rules.id,
        "seed": seed,
        "snapshot": Snapshot::from_state(&state, rules),
        "response": response,
    }))
}

fn run_find_command(
    game: &str,
    seed: u64,
    attempts: Option<u32>,
    budget: &BudgetArgs,
) -> Result<(), String> {
    let rules = lookup(game)?;
    let attempts = attempts.unwrap_or_else(default_find_attempts);
    let found = find_solvable_seed_parallel(rules, seed, attempts, budget.limits(rules))
        .ok_or_else(|| format!("no solvable {game} deal in {attempts} seeds from {seed}"))?;
    println!(
        "{} #{}: {} (attempt {})",
        rules.label,
        found.seed,
        build_check_status(&found.result),
        found.attempts
    );
    Ok(())
}

fn run_variants_command() {
    for rules in all_variants() {
        println!("{:<14} {}", rules.id, rules.label);
    }
}

fn main() -> ExitCode {
    trace::init();
    let cli = Cli::parse();
    let outcome = match &cli.command {
        Command::Check { input } => run_check_command(input),
        Command::Deal {
            game,
            seed,
            budget,
            summary,
        } => run_deal_command(game, *seed, budget, *summary),
        Command::Find {
            game,
            seed,
            attempts,
            budget,
        } => run_find_command(game, *seed, *attempts, budget),
        Command::Variants => {
            run_variants_command();
            Ok(())
        }
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
