mod app;
mod logging;
mod settings;
mod subject;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gonogo_analysis::{Evaluation, SessionReport};
use gonogo_core::SessionProfile;
use gonogo_timing::{HighPrecisionTimer, ManualTimer, Timer};
use rand::SeedableRng;
use rand::rngs::StdRng;

use app::App;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "gonogo",
    version,
    about = "Run a Go/No-Go session with a simulated participant and print the evaluation"
)]
struct Args {
    /// Participant age in years (0-120)
    #[arg(long, default_value = "25")]
    age: String,

    /// Participant sex: male or female
    #[arg(long, default_value = "male")]
    sex: String,

    /// JSON settings file (experiment, evaluation, input, subject sections)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Seed for sequence and participant randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Run in virtual time instead of real time
    #[arg(long)]
    fast: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log trial transitions
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let profile = SessionProfile::parse(&args.age, &args.sex).context("invalid participant")?;
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(rounds) = args.rounds {
        settings.experiment.total_rounds = rounds;
    }

    let report = if args.fast {
        run(settings, ManualTimer::new(), args.seed, profile)?
    } else {
        run(settings, HighPrecisionTimer::new(), args.seed, profile)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run<T: Timer>(
    settings: Settings,
    timer: T,
    seed: Option<u64>,
    profile: SessionProfile,
) -> Result<SessionReport> {
    let (engine_rng, subject_rng) = match seed {
        Some(seed) => (
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
    };
    let mut app = App::new(settings, timer, engine_rng, subject_rng)?;
    app.run(profile)
}

fn percent(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_owned(), |v| format!("{:.0}%", v * 100.0))
}

fn print_report(report: &SessionReport) {
    println!("=== GO / NO-GO RESULTS ===");
    println!(
        "Participant: {}, {} years",
        report.profile.sex(),
        report.profile.age()
    );
    println!(
        "Accuracy: {} ({}/{})",
        percent(report.accuracy),
        report.correct_trials,
        report.total_trials
    );
    println!("Inhibition: {}", percent(report.inhibition_rate));

    match &report.evaluation {
        Evaluation::Scored(s) => {
            println!(
                "Median reaction: {:.0}ms (Q1 {:.0}ms, Q3 {:.0}ms, {} of {} presses kept)",
                s.filtered_median_ms, s.q1_ms, s.q3_ms, s.counts.kept, s.counts.eligible
            );
            println!("Rating: {} (z = {:+.2})", s.rating, s.z_score);
            println!(
                "Average for {} {}: {:.0}ms, difference {:+.0}ms",
                report.profile.sex(),
                s.bracket,
                s.group_mean_ms,
                s.diff_ms
            );
            if let Some(d) = &s.distribution {
                println!(
                    "Distribution: min {:.0} | q1 {:.0} | median {:.0} | q3 {:.0} | max {:.0}",
                    d.min, d.q1, d.median, d.q3, d.max
                );
            }
        }
        Evaluation::InsufficientData(c) => {
            println!(
                "Reaction time: insufficient data ({} presses, {} anticipatory, {} too slow, {} outliers)",
                c.eligible, c.anticipatory, c.over_cutoff, c.outliers
            );
        }
    }
}
