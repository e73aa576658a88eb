use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use snd_capture::{
    config::{CLOCK_RATE, DURATION, OUTPUT_FILE},
    vcd::{self, VcdOptions},
    CaptureConfig, CaptureDriver, CaptureResult, WavSink,
};
use snd_sim::{Dut, LocalSimulator, TracingLog};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "snd_capture",
    author,
    version,
    about = "Clock the logistic_snd design and record its sound output as a WAV file"
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reset the design, then sample its sound output every clock cycle.
    Capture {
        #[command(flatten)]
        run: RunArgs,

        /// WAV file to write.
        #[arg(short, long, default_value = OUTPUT_FILE)]
        output: PathBuf,
    },

    /// Reset the design and clock it for the full duration without recording.
    Smoke {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Convert a VCD dump of an earlier run, sampling snd_out on falling clock edges.
    FromVcd {
        /// VCD file to read (stdin if omitted).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// WAV file to write.
        #[arg(short, long, default_value = OUTPUT_FILE)]
        output: PathBuf,

        /// Dotted scope holding the clk and snd_out variables.
        #[arg(long, default_value = "TOP.tb")]
        scope: String,

        /// Sample rate written to the WAV header.
        #[arg(long, default_value_t = CLOCK_RATE)]
        clock_rate: u64,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Shared library built from the design.
    #[arg(long)]
    dut: PathBuf,

    /// Cycles per second of captured audio.
    #[arg(long, default_value_t = CLOCK_RATE)]
    clock_rate: u64,

    /// Seconds to run.
    #[arg(long, default_value_t = DURATION)]
    duration: u64,
}

impl RunArgs {
    fn config(&self) -> CaptureConfig {
        CaptureConfig {
            clock_rate: self.clock_rate,
            duration: self.duration,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> CaptureResult<()> {
    match command {
        Commands::Capture { run, output } => capture(run, output).await,
        Commands::Smoke { run } => smoke(run).await,
        Commands::FromVcd {
            input,
            output,
            scope,
            clock_rate,
        } => from_vcd(input, output, &scope, clock_rate),
    }
}

async fn capture(run: RunArgs, output: PathBuf) -> CaptureResult<()> {
    let config = CaptureConfig {
        output,
        ..run.config()
    };
    let mut driver = new_driver(&run, config)?;
    let config = driver.config();
    let sink = WavSink::create(&config.output, config.wav_spec()?)?;
    let output = config.output.clone();

    let report = driver.capture_to_wav(sink).await?;
    info!(
        output = %output.display(),
        frames = report.bytes_written,
        flushes = report.flushes,
        "capture complete"
    );
    Ok(())
}

async fn smoke(run: RunArgs) -> CaptureResult<()> {
    let mut driver = new_driver(&run, run.config())?;
    let report = driver.smoke().await?;
    info!(
        iterations = report.iterations,
        cycles = report.cycles,
        time_ps = report.end_time,
        "smoke run complete"
    );
    Ok(())
}

fn new_driver(
    run: &RunArgs,
    config: CaptureConfig,
) -> CaptureResult<CaptureDriver<LocalSimulator<Dut>>> {
    let dut = Dut::new(&run.dut)?;
    let dut_name = run
        .dut
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "dut".to_string());
    let simulator = Arc::new(LocalSimulator::new(dut));
    let log = Arc::new(TracingLog::new(&dut_name));
    CaptureDriver::new(simulator, log, config)
}

fn from_vcd(
    input: Option<PathBuf>,
    output: PathBuf,
    scope: &str,
    clock_rate: u64,
) -> CaptureResult<()> {
    let config = CaptureConfig {
        clock_rate,
        output,
        ..Default::default()
    };
    let options = VcdOptions::default().with_scope(scope);
    let mut sink = WavSink::create(&config.output, config.wav_spec()?)?;

    let report = match input {
        Some(path) => vcd::convert(BufReader::new(File::open(path)?), &options, &mut sink)?,
        None => vcd::convert(io::stdin().lock(), &options, &mut sink)?,
    };
    let frames = sink.finalize()?;
    info!(
        output = %config.output.display(),
        frames,
        transitions = report.clock_transitions,
        "conversion complete"
    );
    Ok(())
}
