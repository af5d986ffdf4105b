use clap::{Parser, Subcommand};
use courtship::control::{self, ControlCommand};
use courtship::push::FINAL_STEP;
use courtship::{Channel, Channels, Experience, ManualScheduler, MemoryChannel, Settings};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "courtship", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the envelope in the running valentine window
    Open,
    /// Return the running valentine window to the closed envelope
    Reset,
    /// Silence all audio in the running valentine window
    Suspend,
    /// Play the decline-then-accept script headless and print each step
    Simulate {
        /// Seed for the decline control's jumps
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Number of times to chase the decline control
        #[arg(short, long)]
        provokes: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Open => control::send(ControlCommand::Open)?,
        Commands::Reset => control::send(ControlCommand::Reset)?,
        Commands::Suspend => control::send(ControlCommand::Suspend)?,
        Commands::Simulate { seed, provokes } => simulate(seed, provokes)?,
    }
    Ok(())
}

fn simulate(seed: u64, provokes: Option<u32>) -> anyhow::Result<()> {
    let settings = Settings::default();
    let tuning = settings.tuning.clone();
    let mut session = Experience::new(
        settings,
        ManualScheduler::new(),
        Channels::new(
            MemoryChannel::new("background"),
            MemoryChannel::new("decline"),
            MemoryChannel::new("accept"),
        ),
        StdRng::seed_from_u64(seed),
    )?;

    let report = |label: &str, s: &Experience<ManualScheduler, MemoryChannel>| {
        let p = s.presentation();
        let audible = s
            .audio()
            .playing()
            .map(|c: Channel| c.to_string())
            .unwrap_or_else(|| "silence".to_string());
        println!(
            "{:>8.2}s {:<14} stage={} popup={} misses={} push={}/{} decline=({:+.1}, {:+.1})x{:.2} audio={}",
            s.scheduler().now().as_secs_f64(),
            label,
            p.stage,
            p.popup,
            s.misses(),
            s.push_state().step,
            if s.push_state().active { "on" } else { "off" },
            p.decline_offset.x,
            p.decline_offset.y,
            p.decline_scale,
            audible,
        );
    };

    report("start", &session);
    session.open();
    report("open", &session);
    session.advance(tuning.reveal_delay());
    report("revealed", &session);

    for _ in 0..provokes.unwrap_or(tuning.miss_threshold) {
        session.advance(Duration::from_millis(150));
        session.provoke();
        report("provoke", &session);
    }

    session.close_popup();
    report("dismiss", &session);
    for _ in 0..FINAL_STEP {
        session.advance(tuning.push_interval());
        report("push", &session);
    }

    session.accept();
    report("accept", &session);
    session.advance(tuning.carousel_interval());
    report("carousel", &session);

    session.reset();
    report("reset", &session);
    Ok(())
}
