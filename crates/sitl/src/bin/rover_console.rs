//! Interactive console for the simulated rover.
//!
//! Reads command lines from stdin, passes them over a simulated serial
//! console to the command router and runs the control loop against the
//! host clock. With `--sim-ms` the rover
//! instead runs headless on a simulated clock for a fixed time and exits.
//!
//! Usage:
//!   cargo run -p subsumption_sitl --bin rover_console -- [OPTIONS]
//!
//! Options:
//!   --interval <MS>     Control tick interval (default: ROVER_TICK_MS)
//!   --go                Start the scheduler immediately (same as `DG`)
//!   --script <FILE>     Feed command lines from FILE before stdin
//!   --sim-ms <MS>       Run on simulated time for MS milliseconds, then exit

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use subsumption_rover::console::UartConsole;
use subsumption_rover::core::TimeSource;
use subsumption_rover::parameters::{ParamValue, ParameterStore, RoverParams};
use subsumption_rover::platform::traits::UartConfig;
use subsumption_sitl::{
    console_symbol, RoverBehaviors, RoverState, SitlError, SitlHardware, SitlRover,
    SitlTimeSource, SitlUart, StdTimeSource, StdoutConsole,
};

struct Args {
    interval: Option<u32>,
    go: bool,
    script: Option<String>,
    sim_ms: Option<u32>,
}

fn parse_args() -> Args {
    let mut args = Args {
        interval: None,
        go: false,
        script: None,
        sim_ms: None,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--interval" => {
                i += 1;
                args.interval = Some(parse_u32_arg(&raw, i, "interval"));
            }
            "--go" => args.go = true,
            "--script" => {
                i += 1;
                args.script = Some(raw.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("Error: --script requires a value");
                    process::exit(1);
                }));
            }
            "--sim-ms" => {
                i += 1;
                args.sim_ms = Some(parse_u32_arg(&raw, i, "sim-ms"));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn parse_u32_arg(raw: &[String], i: usize, name: &str) -> u32 {
    raw.get(i)
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires a value");
            process::exit(1);
        })
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Error: invalid value for --{name}");
            process::exit(1);
        })
}

fn print_usage() {
    eprintln!(
        "Usage: rover_console [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --interval <MS>   Control tick interval in milliseconds\n\
         \x20 --go              Start the scheduler immediately\n\
         \x20 --script <FILE>   Feed command lines from FILE before stdin\n\
         \x20 --sim-ms <MS>     Run on simulated time for MS milliseconds, then exit\n\
         \x20 -h, --help        Show this help"
    );
}

fn load_params(args: &Args) -> Result<RoverParams, SitlError> {
    let mut store = ParameterStore::new();
    RoverParams::register_defaults(&mut store)?;
    if let Some(interval) = args.interval {
        let interval = i32::try_from(interval)
            .map_err(|_| SitlError::InvalidArgument(format!("--interval {interval}")))?;
        store.set("TICK_MS", ParamValue::Int(interval))?;
    }
    Ok(RoverParams::from_store(&store))
}

/// Forward stdin to the control loop until EOF
fn spawn_stdin_reader() -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buf = [0u8; 64];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

fn run(args: Args) -> Result<(), SitlError> {
    let params = load_params(&args)?;
    let script = match &args.script {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };

    let hardware = SitlHardware::new();
    let state = RoverState::new();
    let mut behaviors = RoverBehaviors::new(&state, &hardware, &params);
    let mut console = StdoutConsole::new();

    if let Some(duration_ms) = args.sim_ms {
        let time = SitlTimeSource::new();
        let mut rover = SitlRover::new(&mut behaviors, &state, hardware, params.tick_ms, 0)?;
        if args.go {
            rover.feed_str("DG\n", &mut console);
        }
        rover.feed_str(&script, &mut console);
        let ticks = rover.run_for(&time, u64::from(duration_ms), &mut console);
        let pose = rover.pose();
        println!(
            "\n{} ticks in {} ms, x = {:.2} in, y = {:.2} in, heading = {:.1}",
            ticks, duration_ms, pose.x_inches, pose.y_inches, pose.heading_degrees
        );
        console.flush()?;
        return Ok(());
    }

    let time = StdTimeSource::new();
    let mut rover = SitlRover::new(&mut behaviors, &state, hardware, params.tick_ms, time.now_ms())?;
    println!(
        "=== Subsumption Rover SITL ===\nTick: {} ms. Enter DG to start, ? for help, Ctrl+D to quit.",
        params.tick_ms
    );
    if args.go {
        rover.feed_str("DG\n", &mut console);
    }
    rover.feed_str(&script, &mut console);
    console.flush()?;

    // Keystrokes and replies cross a simulated serial line
    let mut serial = UartConsole::new(SitlUart::new(UartConfig {
        baud_rate: params.console_baud,
    }));
    let mut stdout = io::stdout();
    let input = spawn_stdin_reader();
    loop {
        match input.try_recv() {
            Ok(bytes) => {
                let symbols: Vec<u8> = bytes.into_iter().filter_map(console_symbol).collect();
                serial.uart_mut().inject_rx_data(&symbols);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }
        rover.pump(&mut serial);
        rover.poll(time.now_ms(), &mut serial);
        if let Some(e) = serial.take_error() {
            return Err(SitlError::Platform(e));
        }
        stdout.write_all(&serial.uart_mut().drain_tx())?;
        stdout.flush()?;
        thread::sleep(Duration::from_millis(1));
    }

    println!("\nstdin closed, exiting.");
    Ok(())
}

fn main() {
    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
