mod client;
mod compare;
mod config;
mod model;
mod names;
mod parser;
mod past_results;
mod program;

use std::time::Instant;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::client::PcsClient;
use crate::compare::{ComparisonEntry, Winner};
use crate::model::{RaceResult, SeasonResults};

#[derive(Parser)]
#[command(name = "pcs_compare", about = "Rider results and head-to-heads from ProCyclingStats")]
struct Cli {
    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// A rider's races for one season
    Results {
        rider: String,
        /// Season year (default: current year)
        #[arg(short, long)]
        season: Option<i32>,
    },
    /// Head-to-head of two riders' results in one season
    Compare {
        rider1: String,
        rider2: String,
        #[arg(short, long)]
        season: Option<i32>,
    },
    /// Merged upcoming programs of two riders
    Program { rider1: String, rider2: String },
    /// A rider's result in one race across every active season
    Past { rider: String, race: String },
    /// Seasons listed on a rider's page
    Seasons { rider: String },
    /// Personal details of a rider
    Profile { rider: String },
    /// A rider's team for each season
    Teams { rider: String },
    /// Points per speciality and PCS ranking per season
    Points { rider: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = config::Config::from_env()?;
    let client = PcsClient::new(cfg)?;
    let json = cli.json;

    match cli.command {
        Commands::Results { rider, season } => {
            let season = season.unwrap_or_else(current_season);
            let races = client.season_results(&rider, season).await?;
            if json {
                return print_json(&races);
            }
            if races.is_empty() {
                println!("No results found for {} in {}.", rider, season);
                return Ok(());
            }
            print_season(&rider, season, &races);
        }
        Commands::Compare { rider1, rider2, season } => {
            let season = season.unwrap_or_else(current_season);
            let (r1, r2) = tokio::try_join!(
                client.season_results(&rider1, season),
                client.season_results(&rider2, season),
            )?;
            let entries = compare::compare_results(&r1, &r2);
            let h2h = compare::tally(&entries);
            if json {
                return print_json(&serde_json::json!({ "entries": entries, "tally": h2h }));
            }
            if entries.is_empty() {
                println!("{} and {} share no races in {}.", rider1, rider2, season);
                return Ok(());
            }
            print_comparison(&rider1, &rider2, &entries);
            println!(
                "\n{} {} - {} {} ({} ties, {} undecided)",
                rider1, h2h.rider1_wins, h2h.rider2_wins, rider2, h2h.ties, h2h.undecided
            );
        }
        Commands::Program { rider1, rider2 } => {
            let (p1, p2) = tokio::try_join!(client.program(&rider1), client.program(&rider2))?;
            let merged = program::merge_programs(&p1, &p2);
            if json {
                return print_json(&merged);
            }
            if merged.is_empty() {
                println!("No upcoming races for {} or {}.", rider1, rider2);
                return Ok(());
            }
            println!(
                "{:<6} | {:<40} | {:<4} | {:^5} | {:^5}",
                "Date", "Race", "Flag", "1", "2"
            );
            println!("{}", "-".repeat(72));
            for m in &merged {
                println!(
                    "{:<6} | {:<40} | {:<4} | {:^5} | {:^5}",
                    m.date,
                    truncate(&m.title, 40),
                    m.flag.to_uppercase(),
                    tick(m.participating_1),
                    tick(m.participating_2)
                );
            }
            println!("\n1 = {} | 2 = {}", rider1, rider2);
        }
        Commands::Past { rider, race } => {
            let results = past_results::fetch_past_results(&client, &rider, &race).await?;
            if json {
                return print_json(&results);
            }
            if results.is_empty() {
                println!("No seasons found for {}.", rider);
                return Ok(());
            }
            println!("{} in {}", rider, race);
            for (season, result) in results.iter().filter(|(_, r)| *r != model::NOT_FOUND) {
                println!("  {}: {}", season, result);
            }
            match past_results::best_result(&results) {
                Some((season, place)) => println!("Best: {} in {}", place, season),
                None => println!("No classified finish."),
            }
        }
        Commands::Seasons { rider } => {
            let seasons = client.active_seasons(&rider).await?;
            if json {
                return print_json(&seasons);
            }
            let list: Vec<String> = seasons.iter().map(|s| s.to_string()).collect();
            println!("{}: {}", rider, list.join(", "));
        }
        Commands::Profile { rider } => {
            let profile = client.profile(&rider).await?;
            if json {
                return print_json(&profile);
            }
            if profile.is_empty() {
                println!("No profile found for {}.", rider);
                return Ok(());
            }
            let fields = [
                ("Born", &profile.date_of_birth),
                ("Age", &profile.age),
                ("Place of birth", &profile.place_of_birth),
                ("Nationality", &profile.nationality),
                ("Weight", &profile.weight),
                ("Height", &profile.height),
            ];
            println!("{}", rider);
            for (label, value) in fields {
                println!("  {:<15} {}", label, value.as_deref().unwrap_or("-"));
            }
        }
        Commands::Teams { rider } => {
            let teams = client.team_history(&rider).await?;
            if json {
                return print_json(&teams);
            }
            if teams.is_empty() {
                println!("No team history found for {}.", rider);
                return Ok(());
            }
            println!("{:<6} | {:<40} | {}", "Season", "Team", "Class");
            println!("{}", "-".repeat(60));
            for t in &teams {
                println!("{:<6} | {:<40} | {}", t.season, truncate(&t.team_name, 40), t.class);
            }
        }
        Commands::Points { rider } => {
            let points = client.points(&rider).await?;
            if json {
                return print_json(&points);
            }
            if points == model::RiderPoints::default() {
                println!("No points found for {}.", rider);
                return Ok(());
            }
            println!("{}", rider);
            for (speciality, value) in &points.per_speciality {
                println!("  {:<15} {:>6}", speciality, value);
            }
            if !points.per_season.is_empty() {
                println!("\n{:<6} | {:>7} | {:>5}", "Season", "Points", "Rank");
                println!("{}", "-".repeat(24));
            }
            for r in &points.per_season {
                println!("{:<6} | {:>7} | {:>5}", r.season, r.points, r.rank);
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn current_season() -> i32 {
    chrono::Local::now().year()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_season(rider: &str, season: i32, races: &SeasonResults) {
    println!("{} - {} season", rider, season);
    for (name, race) in races {
        match race {
            RaceResult::OneDay(r) => {
                println!("\n{} [{}]", name, r.flag.to_uppercase());
                println!(
                    "  {} - {} - {} km - {} PCS - {} UCI",
                    r.date, r.result, r.distance_km, r.pcs_points, r.uci_points
                );
            }
            RaceResult::Stage(r) => {
                println!("\n{} [{}]  {}", name, r.flag.to_uppercase(), r.date_range);
                for s in &r.stages {
                    println!(
                        "  {}\n    {} - {} - {} km - {} PCS - {} UCI",
                        s.description, s.date, s.result, s.distance_km, s.pcs_points, s.uci_points
                    );
                }
                if !r.classifications.is_empty() {
                    println!("  Classifications:");
                }
                for c in &r.classifications {
                    println!(
                        "    {}: {} - {} PCS - {} UCI",
                        c.name, c.result, c.pcs_points, c.uci_points
                    );
                }
            }
        }
    }
}

fn print_comparison(rider1: &str, rider2: &str, entries: &[ComparisonEntry]) {
    println!(
        "{:<13} | {:<32} | {:<28} | {:>6} | {:>6} | {}",
        "Date",
        "Race",
        "Stage / classification",
        truncate(rider1, 6),
        truncate(rider2, 6),
        "Winner"
    );
    println!("{}", "-".repeat(110));
    for e in entries {
        let winner = match e.winner {
            Winner::Rider1 => rider1,
            Winner::Rider2 => rider2,
            Winner::Tie => "tie",
            Winner::Undecided => "-",
        };
        println!(
            "{:<13} | {:<32} | {:<28} | {:>6} | {:>6} | {}",
            e.date,
            truncate(&e.race, 32),
            truncate(e.stage_or_class.as_deref().unwrap_or(""), 28),
            e.name1_result,
            e.name2_result,
            winner
        );
    }
}

fn tick(on: bool) -> &'static str {
    if on {
        "x"
    } else {
        ""
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_chars() {
        assert_eq!(truncate("Pogačar", 10), "Pogačar");
        assert_eq!(truncate("Tour de France (2.UWT)", 10), "Tour de...");
    }
}
