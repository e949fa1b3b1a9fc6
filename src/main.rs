//! theremulator CLI: gesture-controlled theremin.
//!
//! Usage:
//!   theremulator                              play the demo performance
//!   theremulator --trace hands.trace          play a recorded detection trace
//!   detector | theremulator --trace -         play live detections from stdin
//!   theremulator --wav out.wav --seconds 20   render the demo to a WAV file

mod args;

use std::io::{self, BufReader, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::{env, fs, process};

use args::{CliArgs, SourceArg, USAGE};
use tm_master::{
    render_offline, DemoPerformance, DetectionSource, Orchestrator, OrchestratorError,
    PacedSource, Synthesizer, ThreadedSource, TraceSource, DEFAULT_MAX_SECONDS,
};

/// Demo length when `--seconds` is not given.
const DEFAULT_DEMO_SECONDS: f64 = 30.0;
/// Longest wait for a live detector frame on stdin.
const LIVE_FRAME_TIMEOUT: Duration = Duration::from_secs(2);
const STATUS_INTERVAL: Duration = Duration::from_millis(50);

type BoxedSource = Box<dyn DetectionSource + Send>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = args::parse(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("{}", USAGE);
        process::exit(1);
    });
    if args.help {
        println!("{}", USAGE);
        return;
    }

    let result = match args.wav.clone() {
        Some(path) => render_to_wav(&args, &path),
        None => play_live(&args).map_err(Into::into),
    };
    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn open_source(args: &CliArgs) -> Result<BoxedSource, OrchestratorError> {
    let source: BoxedSource = match &args.source {
        SourceArg::Demo => {
            let seconds = args.seconds.unwrap_or(DEFAULT_DEMO_SECONDS);
            Box::new(DemoPerformance::new(&args.config, Duration::from_secs_f64(seconds)))
        }
        SourceArg::Stdin => Box::new(TraceSource::new(BufReader::new(io::stdin()))?),
        SourceArg::File(path) => Box::new(TraceSource::open(path)?),
    };
    Ok(source)
}

fn render_to_wav(args: &CliArgs, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = open_source(args)?;
    let resolution = source.resolution();
    println!("Rendering to {} at {} Hz...", path, args.config.sample_rate);

    let max_seconds = args.seconds.unwrap_or(DEFAULT_MAX_SECONDS);
    let render = render_offline(&args.config, resolution, &mut source, max_seconds)?;
    let wav = render.to_wav();
    fs::write(path, &wav)?;

    if !render.calibrated {
        log::warn!("source ended before calibration completed; output is silent");
    }
    println!(
        "Rendered {:.1}s ({} frames, {} bytes)",
        render.duration_secs(),
        render.frames,
        wav.len()
    );
    Ok(())
}

fn play_live(args: &CliArgs) -> Result<(), OrchestratorError> {
    let source = open_source(args)?;
    let resolution = source.resolution();
    let mut source: BoxedSource = match args.source {
        // Live detections arrive in real time; guard against a stalled producer.
        SourceArg::Stdin => Box::new(ThreadedSource::spawn(source, LIVE_FRAME_TIMEOUT)),
        _ => Box::new(PacedSource::new(source)),
    };

    let synth = Synthesizer::with_default_device(&args.config)?;
    let mut orch = Orchestrator::with_synthesizer(&args.config, resolution, synth);

    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = args.seconds {
        let cancel = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs_f64(seconds));
            cancel.store(true, Ordering::Relaxed);
        });
    }

    let done = Arc::new(AtomicBool::new(false));
    let status = {
        let display = orch.display();
        let done = done.clone();
        thread::spawn(move || {
            let mut seen = 0;
            while !done.load(Ordering::Relaxed) {
                let version = display.version();
                if version != seen {
                    seen = version;
                    if let Some(frame) = display.latest() {
                        print!("\r{:<24}", frame.to_string());
                        let _ = io::stdout().flush();
                    }
                }
                thread::sleep(STATUS_INTERVAL);
            }
        })
    };

    println!(
        "Calibrating for {:.1}s: move both hands around the playing area.",
        args.config.calibration_seconds
    );
    let result = orch.run(&mut source, &cancel);
    done.store(true, Ordering::Relaxed);
    let _ = status.join();
    orch.stop()?;

    let summary = result?;
    println!("\rDone: {} frames.{:<16}", summary.frames, "");
    Ok(())
}
