use qplay::core::{MeasureScope, Qubit};
use qplay::runtime::{parse_script, Command, CommandOutcome, SessionStore};
use qplay::PlaygroundConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => { eprintln!("Configuration error: {e}"); std::process::exit(1); }
    };
    init_tracing(&config);
    print_banner();

    match args.get(1).map(String::as_str) {
        None | Some("demo")           => run_demo(&config),
        Some("run")                   => cli_run(&config, args.get(2).map(String::as_str)),
        Some("help") | Some("--help") => print_help(),
        Some(unknown) => {
            eprintln!("Unknown command '{}'. Run 'qplay help' for usage.", unknown);
            std::process::exit(1);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────

fn load_config() -> Result<PlaygroundConfig, qplay::ConfigError> {
    let base = match std::env::var("QPLAY_CONFIG") {
        Ok(path) => PlaygroundConfig::from_json_file(path)?,
        Err(_) => PlaygroundConfig::default(),
    };
    base.with_env()
}

fn init_tracing(config: &PlaygroundConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_banner() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║          qplay v0.1.0                        ║");
    println!("║      Two-Qubit Quantum Register Engine       ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();
}

fn print_help() {
    println!("Usage: qplay [COMMAND] [ARGS]\n");
    println!("Commands:");
    println!("  demo              Bell-state walkthrough (default)");
    println!("  run <script>      Execute a command script in a fresh session");
    println!("  help              Show this message\n");
    println!("Script commands (one per line):");
    println!("  gate:X|H|CNOT             Apply a gate (H, X act on Q1)");
    println!("  measure:Q1|Q2|BOTH        Measure and collapse");
    println!("  reset:Q1|Q2               Reset one qubit to |0⟩");
    println!("  hard_reset                Return the register to |00⟩");
    println!("  trials:Q1|Q2|BOTH,<n>     Sample n measurements without collapsing\n");
    println!("Comments:  // or #");
    println!("Environment: QPLAY_CONFIG (JSON file), QPLAY_SEED, QPLAY_MAX_TRIALS, QPLAY_LOG, RUST_LOG");
}

// ── CLI ───────────────────────────────────────────────────────────────────

fn cli_run(config: &PlaygroundConfig, path: Option<&str>) {
    let path = match path {
        Some(p) => p,
        None => {
            eprintln!("Usage: qplay run <script>");
            std::process::exit(1);
        }
    };

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => { eprintln!("Cannot read '{}': {}", path, e); std::process::exit(1); }
    };

    let commands = match parse_script(&source) {
        Ok(c) => c,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };

    println!("━━━ qplay Script Runner ━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("File: {path}  ({} command(s))\n", commands.len());

    let store = SessionStore::from_config(config);
    let session = store.create_session();
    println!("Session {}\n", session.session_id);

    for command in &commands {
        println!("> {command}");
        match store.execute(session.session_id, command) {
            Ok(CommandOutcome::State(state)) => print!("{state}"),
            Ok(CommandOutcome::Measured(report)) => {
                println!("  outcome: Q1={} Q2={}", bit_label(report.outcome.q1), bit_label(report.outcome.q2));
                print!("{}", report.state);
            }
            Ok(CommandOutcome::Trials(stats)) => {
                for (label, count) in &stats.counts {
                    println!("  {label:>2}  {count:>8}  {:.4}", stats.frequency(label));
                }
            }
            Err(e) => { eprintln!("Runtime error: {e}"); std::process::exit(1); }
        }
        println!();
    }
}

fn bit_label(bit: Option<u8>) -> String {
    bit.map_or_else(|| "?".to_string(), |b| b.to_string())
}

// ── Demo ──────────────────────────────────────────────────────────────────

fn run_demo(config: &PlaygroundConfig) {
    println!("━━━ Demo: Bell State |Φ+⟩ ━━━━━━━━━━━━━━━━━━━━━━━");
    let store = SessionStore::from_config(config);
    let id = store.create_session().session_id;

    let steps = "gate:H\ngate:CNOT\ntrials:BOTH,1000\ntrials:Q1,1000\nmeasure:Q1\nreset:Q1\n";
    let commands = match parse_script(steps) {
        Ok(c) => c,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };

    for command in &commands {
        println!("> {command}");
        match store.execute(id, command) {
            Ok(CommandOutcome::State(state)) => print!("{state}"),
            Ok(CommandOutcome::Measured(report)) => {
                println!("  outcome: Q1={}", bit_label(report.outcome.q1));
                print!("{}", report.state);
            }
            Ok(CommandOutcome::Trials(stats)) => {
                let labels: &[&str] = match command {
                    Command::Trials { scope: MeasureScope::Both, .. } => &["00", "01", "10", "11"],
                    _ => &["0", "1"],
                };
                for label in labels {
                    println!("  |{label}⟩  {:>5}  {:.4}", stats.count(label), stats.frequency(label));
                }
            }
            Err(e) => { eprintln!("Runtime error: {e}"); std::process::exit(1); }
        }
        println!();
    }

    if let Ok(register) = store.fetch(id) {
        let p = register.vector.marginal_probability(Qubit::Q2, 1);
        println!("After resetting Q1, P(Q2=1) = {p:.4}");
    }
    println!();
}
