use alan::{Definition, ProgramLoader, ProgramManager, Trace, TuringMachine, TuringMachineError};
use clap::{Parser, ValueEnum};
use log::{debug, error, info, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Frames the final tape.
const BANNER: &str = "----------------------------------------";

/// Exit code for a definition, parse or stuck-machine error.
const EXIT_ERROR: u8 = 1;
/// Exit code for a run aborted because the tape could not grow.
const EXIT_FATAL: u8 = 2;

/// A single-tape Turing machine simulator.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  alan demos/flip.tm
  alan --demo busy-beaver-2 --format json")]
struct Cli {
    /// Path to a machine definition file.
    #[clap(required_unless_present_any = ["demo", "list"])]
    program: Option<PathBuf>,

    /// Run an embedded demo program instead of a file.
    #[clap(long, conflicts_with = "program")]
    demo: Option<String>,

    /// List the embedded demo programs and exit.
    #[clap(long)]
    list: bool,

    /// Only print the final tape.
    #[clap(short, long)]
    quiet: bool,

    /// Format of the per-step trace.
    #[clap(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log at info level, ignoring RUST_LOG.
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        list_programs();
        return ExitCode::SUCCESS;
    }

    let definition = match load(&cli) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("Unable to parse machine's definition.\n{e}");
            return exit_code(&e);
        }
    };

    let mut machine = match TuringMachine::new(definition) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Unable to start machine: {e}");
            return exit_code(&e);
        }
    };

    let format = cli.format;
    let result = if cli.quiet {
        machine.run()
    } else {
        machine.run_with(|trace| print_trace(trace, format))
    };

    match result {
        Ok(halt) => {
            print_final_tape(&machine);
            match halt.into_result() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Machine stuck: {e}");
                    exit_code(&e)
                }
            }
        }
        Err(e) => {
            error!("Run aborted after {} steps", machine.step_count());
            eprintln!("Machine error: {e}");
            exit_code(&e)
        }
    }
}

/// Installs `env_logger`, either from `RUST_LOG` or at info level when verbose.
fn init_logging(verbose: bool) {
    if verbose {
        env_logger::builder().filter_level(LevelFilter::Info).init();
        info!("Verbose output enabled (ignoring RUST_LOG environment variable)");
    } else {
        env_logger::init();
        debug!("Logging configured from environment variables");
    }
}

/// Loads the definition named on the command line.
fn load(cli: &Cli) -> Result<Definition, TuringMachineError> {
    if let Some(name) = &cli.demo {
        return ProgramManager::get_program_by_name(name);
    }

    match &cli.program {
        Some(path) => ProgramLoader::load_program(path),
        None => Err(TuringMachineError::FileOpen(
            "Input file with machine's definition is required".to_string(),
        )),
    }
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:<18} {} rules, {} states, tape '{}', {} -> {}",
                info.name,
                info.rule_count,
                info.state_count,
                info.tape,
                info.start_state,
                info.stop_state
            );
        }
    }
}

fn print_trace(trace: &Trace, format: Format) {
    match format {
        Format::Text => println!("{trace}"),
        Format::Json => match serde_json::to_string(trace) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Failed to serialize trace: {e}"),
        },
    }
}

fn print_final_tape(machine: &TuringMachine) {
    println!("{BANNER}");
    println!("{}", machine.tape());
    println!("{BANNER}");
}

fn exit_code(error: &TuringMachineError) -> ExitCode {
    ExitCode::from(exit_status(error))
}

fn exit_status(error: &TuringMachineError) -> u8 {
    if error.is_fatal() {
        EXIT_FATAL
    } else {
        EXIT_ERROR
    }
}
