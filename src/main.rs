use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

// Use library instead of local modules
use squad_balancer::logging::init_tracing;
use squad_balancer::{
    extract_aliases, load_roster_csv, parse_name_list, BalancedTeams, IdentityResolver,
    ResolvedPlayer, RosterRecord, Settings, TeamBalancer,
};

/// Split a list of players into two balanced five-a-side squads
#[derive(Parser, Debug)]
#[command(name = "squad-balancer", version, about, long_about = None)]
struct Cli {
    /// Settings JSON (thresholds, squad size, log filter)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve names against the roster and split them into two squads
    Balance {
        /// Roster CSV (name,aliases,rating,position)
        #[arg(long, value_name = "FILE")]
        roster: PathBuf,

        /// Text file with one name per line (pasted or OCR'd list)
        #[arg(long, value_name = "FILE", conflicts_with = "names")]
        names_file: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Player names
        names: Vec<String>,
    },

    /// Show how a single name resolves, plus ranked alternatives
    Resolve {
        #[arg(long, value_name = "FILE")]
        roster: PathBuf,

        /// How many alternatives to list
        #[arg(long, default_value_t = 5)]
        limit: usize,

        query: String,
    },

    /// Parse a catalog name of the form "Name (alias1 / alias2)"
    Aliases { raw: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings: {:?}", path))?,
        None => Settings::from_env().context("Invalid settings from environment")?,
    };

    init_tracing(settings.log_filter())?;

    match cli.command {
        Command::Balance {
            roster,
            names_file,
            json,
            names,
        } => run_balance(&settings, &roster, names_file.as_deref(), names, json),
        Command::Resolve {
            roster,
            limit,
            query,
        } => run_resolve(&settings, &roster, &query, limit),
        Command::Aliases { raw } => {
            let parsed = extract_aliases(&raw);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
    }
}

fn load_roster(path: &Path) -> Result<Vec<RosterRecord>> {
    load_roster_csv(path).with_context(|| format!("Failed to load roster: {:?}", path))
}

fn run_balance(
    settings: &Settings,
    roster_path: &Path,
    names_file: Option<&Path>,
    names: Vec<String>,
    json: bool,
) -> Result<()> {
    let roster = load_roster(roster_path)?;

    let names = match names_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read names file: {:?}", path))?;
            parse_name_list(&text)
        }
        None => names,
    };

    if names.is_empty() {
        bail!("No player names given (pass names or --names-file)");
    }

    let resolver = IdentityResolver::with_config(settings.resolver.clone());
    let balancer = TeamBalancer::with_config(settings.balancer.clone());
    let teams = balancer.balance_with_roster(&names, &resolver, &roster);

    if json {
        println!("{}", serde_json::to_string_pretty(&teams)?);
    } else {
        print_teams(&teams);
    }

    Ok(())
}

fn run_resolve(settings: &Settings, roster_path: &Path, query: &str, limit: usize) -> Result<()> {
    let roster = load_roster(roster_path)?;
    let resolver = IdentityResolver::with_config(settings.resolver.clone());

    match resolver.match_query(query, &roster) {
        Some(m) => println!(
            "✓ {} → {} ({}, distance {:.2})",
            query,
            m.record.name,
            m.strategy.as_str(),
            m.distance
        ),
        None => println!("✗ {} → no match", query),
    }

    let candidates = resolver.find_all_matches(query, &roster, limit);
    if !candidates.is_empty() {
        println!("\nCandidates:");
        for candidate in candidates {
            println!("  {:<20} {:.2}", candidate.record.name, candidate.distance);
        }
    }

    Ok(())
}

fn print_teams(teams: &BalancedTeams) {
    println!("⚖️  Balanced squads");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    print_team("Team A", &teams.team_a, teams.total_a);
    print_team("Team B", &teams.team_b, teams.total_b);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", teams.summary());

    let unmatched = teams.unmatched();
    if !unmatched.is_empty() {
        println!("⚠️  Not in roster (rated as default): {}", unmatched.join(", "));
    }
}

fn print_team(label: &str, players: &[ResolvedPlayer], total: u32) {
    println!("\n{} (rating {})", label, total);
    for player in players {
        let marker = if player.is_matched() { ' ' } else { '?' };
        println!(
            " {} {:<20} {:>3}  {}",
            marker,
            player.display_name(),
            player.rating,
            player.position
        );
    }
}
