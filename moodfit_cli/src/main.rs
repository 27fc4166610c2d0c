use chrono::{Duration, Local, Utc};
use clap::{Parser, Subcommand};
use moodfit_core::csv_rollup::{remove_archived_logs, rollup_to_csv};
use moodfit_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "moodfit")]
#[command(about = "Mood-based workout recommendations and streak tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the workout plan for a mood
    Recommend {
        /// Mood (happy, neutral, frustrated, stressed)
        #[arg(long)]
        mood: String,

        /// Difficulty (beginner, intermediate, advanced)
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Pick one random exercise weighted toward a difficulty
    Random {
        #[arg(long)]
        difficulty: Option<String>,

        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the plan for a mood through the timer and log the session
    Workout {
        #[arg(long)]
        mood: String,

        #[arg(long)]
        difficulty: Option<String>,

        /// Show the plan without running or logging it
        #[arg(long)]
        dry_run: bool,

        /// Simulate the timers instead of waiting (for testing)
        #[arg(long)]
        auto_complete: bool,
    },

    /// Show streak and lifetime statistics (default)
    Stats,

    /// Roll up the session log to CSV
    Rollup {
        /// Clean up processed logs after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// Paths inside the data directory
struct DataPaths {
    store_dir: PathBuf,
    log_dir: PathBuf,
    log: SessionLog,
    csv_path: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let log_dir = data_dir.join("wal");
        Self {
            store_dir: data_dir.join("store"),
            log: SessionLog::new(log_dir.join("sessions.wal")),
            log_dir,
            csv_path: data_dir.join("sessions.csv"),
        }
    }
}

fn main() -> Result<()> {
    moodfit_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Recommend { mood, difficulty }) => {
            cmd_recommend(&mood, difficulty.as_deref(), &config)
        }
        Some(Commands::Random { difficulty, seed }) => {
            cmd_random(difficulty.as_deref(), seed, &config)
        }
        Some(Commands::Workout {
            mood,
            difficulty,
            dry_run,
            auto_complete,
        }) => cmd_workout(
            &paths,
            &mood,
            difficulty.as_deref(),
            dry_run,
            auto_complete,
            &config,
        ),
        Some(Commands::Stats) | None => cmd_stats(&paths, &config),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&paths, cleanup),
    }
}

fn parse_mood(name: &str) -> Mood {
    Mood::parse(name).unwrap_or_else(|| {
        eprintln!("Unknown mood: {}. Using Neutral.", name);
        Mood::Neutral
    })
}

fn parse_difficulty(name: Option<&str>, config: &Config) -> Difficulty {
    let fallback = config.workout.preferred_difficulty;
    match name {
        None => fallback,
        Some(n) => Difficulty::parse(n).unwrap_or_else(|| {
            eprintln!("Unknown difficulty: {}. Using {}.", n, fallback);
            fallback
        }),
    }
}

fn cmd_recommend(mood: &str, difficulty: Option<&str>, config: &Config) -> Result<()> {
    let mood = parse_mood(mood);
    let difficulty = parse_difficulty(difficulty, config);
    let exercises = recommend_for_mood(get_default_catalog(), mood, difficulty);
    display_plan(mood, difficulty, &exercises);
    Ok(())
}

fn cmd_random(difficulty: Option<&str>, seed: Option<u64>, config: &Config) -> Result<()> {
    let difficulty = parse_difficulty(difficulty, config);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let exercise = select_random_exercise(get_default_catalog(), difficulty, &mut rng);
    println!();
    println!("  🎲 {} [{} · {}]", exercise.name, exercise.category, exercise.difficulty);
    println!("     {}", exercise.description);
    println!("     {}", exercise.instructions);
    println!(
        "     ~{} min, ~{} kcal",
        exercise.duration_minutes, exercise.calories
    );
    println!();
    Ok(())
}

fn cmd_workout(
    paths: &DataPaths,
    mood: &str,
    difficulty: Option<&str>,
    dry_run: bool,
    auto_complete: bool,
    config: &Config,
) -> Result<()> {
    let mood = parse_mood(mood);
    let difficulty = parse_difficulty(difficulty, config);

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let exercises = recommend_for_mood(catalog, mood, difficulty);
    display_plan(mood, difficulty, &exercises);

    if dry_run {
        println!("\n[Dry run - not logging session]");
        return Ok(());
    }

    std::fs::create_dir_all(&paths.log_dir)?;
    let tracker = ProgressTracker::new(JsonFileStore::new(&paths.store_dir));
    let user = tracker.load_user()?;

    let mut session = if auto_complete {
        // Backdate the simulated run so it ends at roughly the real current time
        let planned_secs: u32 = exercises
            .iter()
            .map(|e| e.duration_minutes * config.workout.seconds_per_minute)
            .sum();
        let clock = ManualClock::new(Utc::now() - Duration::seconds(planned_secs as i64));
        let step = Duration::milliseconds(config.workout.tick_interval_ms as i64);
        let ticker = clock.clone();
        perform_exercises(
            &clock,
            move || ticker.advance(step),
            user.id,
            mood,
            exercises,
            config,
            false,
        )?
    } else {
        let interval = std::time::Duration::from_millis(config.workout.tick_interval_ms);
        perform_exercises(
            &SystemClock,
            move || std::thread::sleep(interval),
            user.id,
            mood,
            exercises,
            config,
            true,
        )?
    };

    if session.exercises().is_empty() {
        println!("\nNo exercises completed - nothing logged.");
        return Ok(());
    }

    if !auto_complete {
        if let Some(rating) = prompt_rating()? {
            session.set_rating(rating)?;
        }
    }

    let mut log = paths.log.clone();
    log.append(&session)?;

    let finished_at = session
        .ended_at()
        .unwrap_or_else(Utc::now)
        .with_timezone(&Local);
    let snapshot = tracker.record_completion(&session, finished_at)?;

    println!("\n✓ Session logged!");
    println!(
        "  {} exercises · {} min · {} kcal",
        session.exercises().len(),
        session.duration_minutes(),
        session.calories_burned()
    );
    println!(
        "  🔥 Streak: {} day(s) (best {})",
        snapshot.user.current_streak(),
        snapshot.user.best_streak()
    );
    Ok(())
}

/// Time each exercise and collect the finished ones into a session
fn perform_exercises<C, W>(
    clock: &C,
    mut wait: W,
    user_id: uuid::Uuid,
    mood: Mood,
    exercises: Vec<Exercise>,
    config: &Config,
    interactive: bool,
) -> Result<WorkoutSession>
where
    C: Clock + Clone,
    W: FnMut(),
{
    let mut session = WorkoutSession::start(user_id, mood, clock.now());

    for exercise in exercises {
        if interactive && !prompt_start(&exercise)? {
            println!("  Skipped {}", exercise.name);
            continue;
        }

        let total = exercise.duration_minutes * config.workout.seconds_per_minute;
        let mut timer = WorkoutTimer::with_clock(total, clock.clone());
        timer.start();

        let mut last_shown = None;
        loop {
            let events = timer.tick();
            if interactive && last_shown != Some(timer.remaining_secs()) {
                print!("\r  ⏱  {} {}", exercise.name, timer.formatted_remaining());
                io::stdout().flush()?;
                last_shown = Some(timer.remaining_secs());
            }
            if events.contains(&TimerEvent::Finished) {
                break;
            }
            wait();
        }

        if interactive {
            println!();
        }
        println!("  ✓ {} done ({})", exercise.name, format_mmss(total));
        session.add_exercise(exercise)?;
    }

    session.end_workout(clock.now())?;
    Ok(session)
}

fn cmd_stats(paths: &DataPaths, config: &Config) -> Result<()> {
    let tracker = ProgressTracker::new(JsonFileStore::new(&paths.store_dir));
    tracker.refresh_streak(&Local::now())?;
    let user = tracker.update_user(|user| {
        user.record_open();
        if user.name != config.user.name {
            user.name = config.user.name.clone();
        }
    })?;
    let progress = tracker.load_progress()?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  MOODFIT STATS · {}", user.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  🔥 Current streak: {} day(s)   🏆 Best: {}",
        user.current_streak(),
        user.best_streak()
    );
    println!(
        "  Workouts: {}   Minutes: {}   Calories: {}",
        progress.total_workouts, progress.total_minutes, progress.total_calories
    );
    println!(
        "  This week: {}",
        progress.workouts_this_week(Utc::now())
    );
    if let Some(mood) = progress.favorite_mood() {
        println!("  Favorite mood: {}", mood);
    }
    for mood in Mood::ALL {
        if let Some(count) = progress.mood_counts.get(&mood) {
            println!("    {:<11} {}", mood.label(), count);
        }
    }
    println!();
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    let count = rollup_to_csv(&paths.log, &paths.csv_path)?;

    if count == 0 {
        println!("No logged sessions - nothing to roll up.");
    } else {
        println!("✓ Rolled up {} sessions to CSV", count);
        println!("  CSV: {}", paths.csv_path.display());
    }

    if cleanup {
        let cleaned = remove_archived_logs(&paths.log_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed logs", cleaned);
        }
    }

    Ok(())
}

fn display_plan(mood: Mood, difficulty: Difficulty, exercises: &[Exercise]) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} WORKOUT · {}", mood.label().to_uppercase(), difficulty);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for (i, exercise) in exercises.iter().enumerate() {
        println!(
            "  {}. {} [{}] ~{} min, ~{} kcal",
            i + 1,
            exercise.name,
            exercise.category,
            exercise.duration_minutes,
            exercise.calories
        );
        println!("     {}", exercise.instructions);
        if let Some(ref media) = exercise.media_ref {
            println!("     ℹ Media: {}", media);
        }
    }

    println!();
}

fn prompt_start(exercise: &Exercise) -> Result<bool> {
    println!("─────────────────────────────────────────");
    println!("Next: {}", exercise.name);
    println!("Press Enter to start, 's' + Enter to skip");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase() != "s")
}

fn prompt_rating() -> Result<Option<u8>> {
    print!("Rate this workout 1-5 (Enter to skip): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().parse::<u8>().ok().filter(|r| (1..=5).contains(r)))
}
