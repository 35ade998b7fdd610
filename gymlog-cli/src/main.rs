mod browser;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::{LevelFilter, info};

use gymlog::exercise::DATE_FORMAT;
use gymlog::logging::{init_logger, parse_level};
use gymlog::{ExerciseForm, ExerciseRecord, ExerciseRepository, MuscleGroup, SetEntry, Store};

const DEFAULT_DATABASE: &str = "database/gymtracker.db";

#[derive(Parser, Debug)]
#[command(version, about = "Gymlog - Workout Logger CLI", long_about = None)]
struct Args {
    /// Exercise database file, created if missing
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE, global = true)]
    database: PathBuf,
    /// off, error, warn, info, debug or trace
    #[arg(long, env = "GYMLOG_LOG", value_parser = parse_level_arg, global = true)]
    log_level: Option<LevelFilter>,
    #[command(subcommand)]
    command: Commands,
}

fn parse_level_arg(s: &str) -> std::result::Result<LevelFilter, String> {
    parse_level(s).ok_or_else(|| format!("unknown log level: {}", s))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a new exercise entry
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        group: String,
        #[arg(short, long)]
        weight: String,
        #[arg(short, long)]
        reps: String,
        /// YYYY-MM-DD, leave out for an undated entry
        #[arg(short, long, default_value = "")]
        date: String,
    },
    /// Log another set of an exercise already in the history
    Log {
        name: String,
        #[arg(short, long)]
        weight: String,
        #[arg(short, long)]
        reps: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List every entry, most recent first
    List {
        #[arg(long)]
        json: bool,
    },
    /// List exercise names, optionally for one muscle group
    Names {
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Show the history of one exercise
    History {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing entry
    Edit(EditArgs),
    /// Delete an entry by id
    Delete { id: i32 },
    /// List the muscle groups
    Groups,
    /// Interactive browser: muscle groups, exercises, history
    Browse,
}

#[derive(clap::Args, Debug)]
struct EditArgs {
    id: i32,
    #[arg(short, long)]
    name: Option<String>,
    #[arg(short, long)]
    group: Option<String>,
    #[arg(short, long)]
    weight: Option<String>,
    #[arg(short, long)]
    reps: Option<String>,
    #[arg(short, long, conflicts_with = "clear_date")]
    date: Option<String>,
    #[arg(long)]
    clear_date: bool,
}

fn open_repository(path: &Path) -> Result<ExerciseRepository> {
    let store = Store::open(path)
        .with_context(|| format!("cannot open exercise store at {}", path.display()))?;
    Ok(ExerciseRepository::new(store))
}

fn print_records(records: &[ExerciseRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No exercises recorded yet.");
    }
    for record in records {
        let id = record.id.map(|id| id.to_string()).unwrap_or_default();
        println!("#{:<5} [{}] {}", id, record.muscle_group, record);
    }
    Ok(())
}

fn add(repo: &ExerciseRepository, form: ExerciseForm<'_>) -> Result<()> {
    save(repo, &form.parse()?)
}

fn save(repo: &ExerciseRepository, record: &ExerciseRecord) -> Result<()> {
    if !repo.insert(record) {
        bail!("Failed to save the exercise.");
    }
    println!("Saved: {}", record);
    Ok(())
}

fn edit(repo: &ExerciseRepository, args: EditArgs) -> Result<()> {
    let id = args.id;
    let Some(current) = repo.find_by_id(id)? else {
        bail!("No exercise #{}", id);
    };

    let name = args.name.unwrap_or_else(|| current.name.clone());
    let group = args
        .group
        .unwrap_or_else(|| current.muscle_group.to_string());
    let weight = args.weight.unwrap_or_else(|| current.weight.to_string());
    let reps = args
        .reps
        .unwrap_or_else(|| current.repetitions.to_string());
    let date = if args.clear_date {
        String::new()
    } else {
        args.date
            .or_else(|| current.date_string())
            .unwrap_or_default()
    };

    let record = ExerciseRecord {
        id: current.id,
        ..ExerciseForm {
            name: &name,
            muscle_group: &group,
            weight: &weight,
            repetitions: &reps,
            date: &date,
        }
        .parse()?
    };

    if !repo.update(&record) {
        bail!("Failed to update exercise #{}.", id);
    }
    println!("Updated: {}", record);
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let level = match (&args.command, args.log_level) {
        (_, Some(level)) => level,
        // Log lines would tear the alternate screen.
        (Commands::Browse, None) => LevelFilter::Off,
        (_, None) => LevelFilter::Warn,
    };
    init_logger(level);

    let repo = open_repository(&args.database)?;
    info!("Using exercise store {}", repo.store().path().display());

    match args.command {
        Commands::Add {
            name,
            group,
            weight,
            reps,
            date,
        } => add(
            &repo,
            ExerciseForm {
                name: &name,
                muscle_group: &group,
                weight: &weight,
                repetitions: &reps,
                date: &date,
            },
        ),
        Commands::Log {
            name,
            weight,
            reps,
            date,
        } => {
            let date = date
                .unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string());
            let entry = SetEntry::parse(&name, &weight, &reps, &date)?;
            let group = repo.group_of(&entry.name)?;
            save(&repo, &entry.into_record(group))
        }
        Commands::List { json } => print_records(&repo.find_all()?, json),
        Commands::Names { group } => {
            let names = match group {
                Some(group) => repo.distinct_names_by_group(group.parse::<MuscleGroup>()?)?,
                None => repo.distinct_names()?,
            };
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::History { name, json } => print_records(&repo.find_by_name(&name)?, json),
        Commands::Edit(edit_args) => edit(&repo, edit_args),
        Commands::Delete { id } => {
            if !repo.delete(id) {
                bail!("No exercise #{} was deleted.", id);
            }
            println!("Deleted exercise #{}", id);
            Ok(())
        }
        Commands::Groups => {
            for group in MuscleGroup::ALL {
                println!("{}", group);
            }
            Ok(())
        }
        Commands::Browse => {
            let terminal = ratatui::init();
            let result = browser::run(terminal, &repo);
            ratatui::restore();
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_add_with_global_database() {
        let args = Args::try_parse_from([
            "gymlog",
            "--database",
            "/tmp/gym.db",
            "add",
            "-n",
            "Squat",
            "-g",
            "Legs",
            "-w",
            "100",
            "-r",
            "5",
        ])
        .unwrap();
        assert_eq!(args.database, PathBuf::from("/tmp/gym.db"));
        assert!(matches!(args.command, Commands::Add { ref date, .. } if date.is_empty()));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let parsed = Args::try_parse_from(["gymlog", "--log-level", "loud", "groups"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn edit_date_conflicts_with_clear_date() {
        let parsed = Args::try_parse_from([
            "gymlog",
            "edit",
            "3",
            "--date",
            "2024-01-01",
            "--clear-date",
        ]);
        assert!(parsed.is_err());
    }
}
