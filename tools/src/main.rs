//! wheel-runner: headless driver for the prize wheel core.
//!
//! Usage:
//!   wheel-runner --seed 12345 --sessions 10000 --db run.db
//!   wheel-runner --config data/promo_wheel.json --entropy
//!   wheel-runner --ipc-mode
//!   wheel-runner --seed 12345 --ipc-mode
//!
//! Batch runs default to seed 42. IPC sessions face real players, so they
//! draw from OS entropy unless --seed is given.

use anyhow::Result;
use prizewheel_core::{
    config::WheelConfig,
    outcome::OutcomeTable,
    rng::WheelRng,
    session::WheelSession,
    stats::DrawTally,
    store::WheelStore,
    types::Millis,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Spin,
    Advance { ms: Millis },
    Dismiss,
    Teardown,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let sessions = parse_arg(&args, "--sessions", 10_000u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let entropy = args.iter().any(|a| a == "--entropy");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let config_path = string_arg(&args, "--config");

    let config = match config_path {
        Some(path) => WheelConfig::load(path)?,
        None => WheelConfig::default_promo(),
    };
    config.validate()?;

    let run_seed = choose_run_seed(&args, seed, ipc_mode, entropy);
    let run_id = match run_seed {
        Some(s) => format!("run-{s}-{}", unix_secs()),
        None => format!("run-entropy-{}", uuid::Uuid::new_v4()),
    };

    if !ipc_mode {
        println!("Prize wheel — wheel-runner");
        println!("  run_id:    {run_id}");
        match run_seed {
            Some(s) => println!("  seed:      {s}"),
            None => println!("  seed:      (os entropy)"),
        }
        println!("  sessions:  {sessions}");
        println!("  config:    {}", config_path.unwrap_or("(built-in promo wheel)"));
        println!("  db:        {db}");
        println!();
    }

    let store = WheelStore::open(db)?;
    store.migrate()?;
    store.insert_run(&run_id, run_seed, env!("CARGO_PKG_VERSION"), &config)?;

    if ipc_mode {
        let rng = make_rng(run_seed, 0);
        let mut session = WheelSession::new(format!("{run_id}-s0"), &config, rng)?;
        run_ipc_loop(&mut session, &store, &run_id)?;
    } else {
        let tally = run_batch(&config, &store, &run_id, run_seed, sessions)?;
        print_summary(&config, &store, &run_id, &tally)?;
    }

    Ok(())
}

/// Seed for this run, or None to draw from OS entropy.
fn choose_run_seed(args: &[String], seed: u64, ipc_mode: bool, entropy: bool) -> Option<u64> {
    let seed_given = string_arg(args, "--seed").is_some();
    if entropy || (ipc_mode && !seed_given) {
        None
    } else {
        Some(seed)
    }
}

fn make_rng(seed: Option<u64>, session_index: u64) -> WheelRng {
    match seed {
        Some(s) => WheelRng::for_session(s, session_index),
        None => WheelRng::from_entropy(),
    }
}

/// Play `sessions` independent sessions through spin, settle and reveal.
fn run_batch(
    config: &WheelConfig,
    store: &WheelStore,
    run_id: &str,
    seed: Option<u64>,
    sessions: u64,
) -> Result<DrawTally> {
    let mut tally = DrawTally::new(config.outcomes.len());
    let full_cycle = config.spin.duration_ms + config.spin.reveal_delay_ms;

    for n in 0..sessions {
        let mut session = WheelSession::new(format!("{run_id}-s{n}"), config, make_rng(seed, n))?;
        session.spin()?;
        session.advance(full_cycle);
        session.dismiss();

        match session.state().chosen_outcome_index {
            Some(index) if session.result().is_some() => tally.record(index),
            _ => log::warn!("session {} did not settle", session.session_id),
        }
        store.append_events(run_id, &session.drain_events())?;
    }
    Ok(tally)
}

fn run_ipc_loop(session: &mut WheelSession, store: &WheelStore, run_id: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Spin => {
                session.spin()?;
            }
            IpcCommand::Advance { ms } => {
                session.advance(ms);
            }
            IpcCommand::Dismiss => {
                session.dismiss();
            }
            IpcCommand::Teardown => {
                session.teardown();
            }
        }
        store.append_events(run_id, &session.drain_events())?;
        writeln!(stdout, "{}", serde_json::to_string(&session.view())?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(
    config: &WheelConfig,
    store: &WheelStore,
    run_id: &str,
    tally: &DrawTally,
) -> Result<()> {
    let table = OutcomeTable::new(config.outcomes.clone())?;
    let started = store.event_count(run_id, "spin_started")?;
    let settled = store.event_count(run_id, "spin_settled")?;
    let shown = store.event_count(run_id, "result_shown")?;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {run_id}");
    println!("  spins started:   {started}");
    println!("  spins settled:   {settled}");
    println!("  results shown:   {shown}");
    println!();

    println!("=== OUTCOME SHARES ===");
    let logged = store.settled_counts(run_id)?;
    for row in tally.compare(&table) {
        let from_log = logged
            .iter()
            .find(|(index, _)| *index == row.index)
            .map(|(_, count)| *count)
            .unwrap_or(0);
        println!(
            "  [{}] {:<16} w={:<3} expected {:>6.2}% | observed {:>6.2}% ({} draws, {} logged)",
            row.index,
            row.label,
            row.weight,
            row.expected * 100.0,
            row.observed * 100.0,
            row.count,
            from_log
        );
    }
    println!();
    println!(
        "  max deviation:   {:.3} percentage points",
        tally.max_abs_deviation(&table) * 100.0
    );
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn unix_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
