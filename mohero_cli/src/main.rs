use chrono::Utc;
use clap::{Parser, Subcommand};
use mohero_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mohero")]
#[command(about = "Mohero ritual program tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available programs
    Programs,

    /// Select a program (enrolls you, or resumes an existing enrollment)
    Select {
        /// Program id, e.g. crocodile-tide
        program_id: String,
    },

    /// Show today's ritual for the selected program
    Today,

    /// Record reps against an exercise in today's ritual
    Log {
        /// Exercise id, e.g. squats
        exercise_id: String,
        /// Reps (or seconds) to add
        reps: u32,
    },

    /// Complete today's ritual and advance to the next day
    Complete,

    /// Show your enrollments and profile
    Status,

    /// Show the clans, or join one
    Clan {
        /// Clan id (onotka, ekloa, okwaho)
        name: Option<String>,
    },

    /// Export the completed-day journal to CSV
    Export {
        /// Clean up processed journal files after export
        #[arg(long)]
        cleanup: bool,
    },
}

/// File layout under the data directory
struct SessionPaths {
    state: PathBuf,
    profile: PathBuf,
    journal_dir: PathBuf,
    journal: PathBuf,
    csv: PathBuf,
}

impl SessionPaths {
    fn new(data_dir: &Path) -> Self {
        let journal_dir = data_dir.join("journal");
        Self {
            state: data_dir.join("state.json"),
            profile: data_dir.join("profile.json"),
            journal: journal_dir.join("completed_days.jsonl"),
            journal_dir,
            csv: data_dir.join("history.csv"),
        }
    }
}

fn main() -> Result<()> {
    mohero_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = SessionPaths::new(&data_dir);

    match cli.command {
        Commands::Programs => cmd_programs(&paths),
        Commands::Select { program_id } => cmd_select(&paths, &program_id),
        Commands::Today => cmd_today(&paths),
        Commands::Log { exercise_id, reps } => cmd_log(&paths, &exercise_id, reps),
        Commands::Complete => cmd_complete(&paths),
        Commands::Status => cmd_status(&paths),
        Commands::Clan { name } => cmd_clan(&paths, name.as_deref(), &config),
        Commands::Export { cleanup } => cmd_export(&paths, cleanup),
    }
}

/// Build the session tracker: validated catalog plus restored state
fn load_tracker(paths: &SessionPaths) -> Result<ProgramProgressTracker> {
    let catalog = build_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let mut tracker = ProgramProgressTracker::new(&catalog);
    let state = UserProgressState::load(&paths.state)?;
    tracker.restore(&state);
    Ok(tracker)
}

fn save_tracker(paths: &SessionPaths, tracker: &ProgramProgressTracker) -> Result<()> {
    tracker.snapshot().save(&paths.state)
}

fn cmd_programs(paths: &SessionPaths) -> Result<()> {
    let tracker = load_tracker(paths)?;

    println!("Available programs:\n");
    for program in tracker.programs() {
        let category = match program.category {
            ProgramCategory::Discovery => "discovery",
            ProgramCategory::Premium => "premium",
        };
        println!("  {}  [{}]", program.title, category);
        println!("    id: {}  ·  {} days", program.id, program.duration);
        println!("    focus: {}", program.focus.join(", "));
        println!();
    }

    Ok(())
}

fn cmd_select(paths: &SessionPaths, program_id: &str) -> Result<()> {
    let mut tracker = load_tracker(paths)?;

    tracker.select_program(program_id, Utc::now())?;
    save_tracker(paths, &tracker)?;

    UserProfile::update(&paths.profile, |profile| {
        profile.current_program_id = Some(program_id.to_string());
        Ok(())
    })?;

    let program = tracker
        .program(program_id)
        .ok_or_else(|| Error::NotFound(format!("program '{}'", program_id)))?;
    let enrollment = tracker
        .user_programs()
        .iter()
        .find(|up| up.program_id == program_id)
        .ok_or_else(|| Error::State("enrollment missing after select".into()))?;

    println!("✓ {} selected", program.title);
    if enrollment.completed {
        println!("  You already finished this program. Félicitations, guerrier.");
    } else {
        println!("  Day {} of {}", enrollment.current_day, program.duration);
    }

    Ok(())
}

fn cmd_today(paths: &SessionPaths) -> Result<()> {
    let tracker = load_tracker(paths)?;

    match tracker.current_ritual() {
        RitualStatus::NoProgram => {
            println!("No active program. Run `mohero programs`, then `mohero select <id>`.");
        }
        RitualStatus::ProgramComplete => {
            let title = tracker
                .current_program()
                .map(|p| p.title.as_str())
                .unwrap_or("your program");
            println!("Program complete — {} has no ritual left for you.", title);
            println!("Choose your next path with `mohero select <id>`.");
        }
        RitualStatus::InProgress(ritual) => {
            let duration = tracker
                .program(&ritual.program_id)
                .map(|p| p.duration)
                .unwrap_or(ritual.day);
            let title = tracker
                .program(&ritual.program_id)
                .map(|p| p.title.as_str())
                .unwrap_or(ritual.program_id.as_str());
            println!("{} — Day {} of {}\n", title, ritual.day, duration);
            println!("  « {} »\n", ritual.quote);

            for exercise in &ritual.exercises {
                println!(
                    "  {:<10} {:<24} {}/{}",
                    exercise.id, exercise.name, exercise.completed_reps, exercise.target_reps
                );
            }

            let percent = (ritual.completion_fraction() * 100.0).round() as u32;
            println!("\n  Ritual {}% complete", percent);
            if ritual.is_fully_done() {
                println!("  Every exercise done — run `mohero complete` to close the day.");
            }
        }
    }

    Ok(())
}

fn cmd_log(paths: &SessionPaths, exercise_id: &str, reps: u32) -> Result<()> {
    let mut tracker = load_tracker(paths)?;

    match tracker.current_ritual() {
        RitualStatus::NoProgram => {
            println!("No active program. Run `mohero select <id>` first.");
            return Ok(());
        }
        RitualStatus::ProgramComplete => {
            println!("Program complete — nothing left to log.");
            return Ok(());
        }
        RitualStatus::InProgress(ritual) => {
            if !ritual.exercises.iter().any(|e| e.id == exercise_id) {
                println!("'{}' is not part of today's ritual.", exercise_id);
                println!(
                    "Today: {}",
                    ritual
                        .exercises
                        .iter()
                        .map(|e| e.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                return Ok(());
            }
        }
    }

    tracker.record_exercise_reps(exercise_id, reps);
    save_tracker(paths, &tracker)?;

    if let Some(ritual) = tracker.current_ritual().ritual() {
        if let Some(exercise) = ritual.exercises.iter().find(|e| e.id == exercise_id) {
            println!(
                "✓ {}: {}/{}",
                exercise.name, exercise.completed_reps, exercise.target_reps
            );
        }
        let percent = (ritual.completion_fraction() * 100.0).round() as u32;
        println!("  Ritual {}% complete", percent);
    }

    Ok(())
}

fn cmd_complete(paths: &SessionPaths) -> Result<()> {
    let mut tracker = load_tracker(paths)?;

    let Some(completion) = tracker.complete_day() else {
        println!("Nothing to complete — no active program in progress.");
        return Ok(());
    };

    save_tracker(paths, &tracker)?;

    // Journal the completion and bump the lifetime counter
    let record = CompletedDay::from_completion(&completion, Utc::now());
    let mut journal = JsonlJournal::new(&paths.journal);
    journal.append(&record)?;

    let profile = UserProfile::update(&paths.profile, |profile| {
        profile.total_days_completed += 1;
        Ok(())
    })?;

    println!(
        "✓ Day {} complete ({}% of the ritual done)",
        completion.day,
        (completion.fraction * 100.0).round() as u32
    );
    println!("  {} days completed in total", profile.total_days_completed);

    if completion.program_completed {
        let title = tracker
            .program(&completion.program_id)
            .map(|p| p.title.as_str())
            .unwrap_or(completion.program_id.as_str());
        println!("\n★ Program complete: {}. Le cycle s'achève.", title);
    }

    Ok(())
}

fn cmd_status(paths: &SessionPaths) -> Result<()> {
    let tracker = load_tracker(paths)?;
    let profile = UserProfile::load(&paths.profile)?;

    if !profile.name.is_empty() {
        println!("{}", profile.name);
    }
    match profile.clan {
        Some(clan) => println!("Clan: {}", clan.title()),
        None => println!("Clan: none (join one with `mohero clan <id>`)"),
    }
    println!("Total days completed: {}\n", profile.total_days_completed);

    if tracker.user_programs().is_empty() {
        println!("No enrollments yet.");
        return Ok(());
    }

    println!("Enrollments:");
    for enrollment in tracker.user_programs() {
        let (title, duration) = tracker
            .program(&enrollment.program_id)
            .map(|p| (p.title.as_str(), p.duration))
            .unwrap_or((enrollment.program_id.as_str(), 0));

        if enrollment.completed {
            println!("  {} — completed", title);
        } else {
            println!("  {} — day {} of {}", title, enrollment.current_day, duration);
        }
    }

    Ok(())
}

fn cmd_clan(paths: &SessionPaths, name: Option<&str>, config: &Config) -> Result<()> {
    let Some(name) = name else {
        let profile = UserProfile::load(&paths.profile)?;
        for clan in Clan::all() {
            let marker = if profile.clan == Some(clan) { "●" } else { " " };
            println!("{} {}  ({})", marker, clan.title(), clan.id());
            println!("    {}", clan.description());
            println!("    objectifs: {}", clan.objectives().join(", "));
            println!();
        }
        return Ok(());
    };

    let Some(clan) = Clan::parse(name) else {
        eprintln!("Unknown clan: {}. Choose onotka, ekloa or okwaho.", name);
        return Err(Error::NotFound(format!("clan '{}'", name)));
    };

    let profile = UserProfile::update(&paths.profile, |profile| {
        if profile.name.is_empty() {
            if let Some(ref default_name) = config.user.name {
                profile.name = default_name.clone();
            }
        }
        if profile.email.is_none() {
            profile.email = config.user.email.clone();
        }
        profile.clan = Some(clan);
        Ok(())
    })?;

    println!("✓ Welcome to {}", clan.title());
    println!("  {}", clan.description());
    if !profile.name.is_empty() {
        println!("  Bienvenue, {}.", profile.name);
    }

    Ok(())
}

fn cmd_export(paths: &SessionPaths, cleanup: bool) -> Result<()> {
    if !paths.journal.exists() {
        println!("No journal found - nothing to export.");
        return Ok(());
    }

    let count = mohero_core::csv_export::journal_to_csv_and_archive(&paths.journal, &paths.csv)?;

    println!("✓ Exported {} completed days to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = mohero_core::csv_export::cleanup_processed_journals(&paths.journal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journal files", cleaned);
        }
    }

    Ok(())
}
