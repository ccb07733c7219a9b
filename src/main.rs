use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::Parser;
use revertir::check::{check, CheckOptions, MemorySource};
use revertir::cli::{CheckArgs, Cli, Command, RevdocsArgs};
use revertir::config::DetectorConfig;
use revertir::revdocs::{read_revdocs, revdocs_to_reverts, Progress};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<DetectorConfig> {
    match path {
        Some(path) => DetectorConfig::from_file(path),
        None => Ok(DetectorConfig::default()),
    }
}

/// Page title, then `.` per revision and `r` per revert, one line per page
fn print_progress(event: Progress<'_>) {
    match event {
        Progress::PageStart { title } => eprint!("{}: ", title.unwrap_or("<untitled>")),
        Progress::Revision { reverting: true } => eprint!("r"),
        Progress::Revision { reverting: false } => eprint!("."),
        Progress::PageEnd => eprintln!(),
    }
}

/// Stream reverts from one document source to one sink as JSON lines
fn write_reverts<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    config: &DetectorConfig,
    verbose: bool,
) -> Result<usize> {
    let mut reverts = revdocs_to_reverts(read_revdocs(reader), config);
    if verbose {
        reverts = reverts.with_progress(print_progress);
    }

    let mut count = 0;
    for revert in reverts {
        let revert = revert?;
        serde_json::to_writer(&mut writer, &revert)?;
        writeln!(writer)?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

/// `<dir>/<input stem>.reverts.jsonl`
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string());
    dir.join(format!("{}.reverts.jsonl", stem))
}

/// Output file for each input, rejecting inputs that would share one
fn output_paths(dir: &Path, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    let mut paths = Vec::with_capacity(inputs.len());

    for input in inputs {
        let path = output_path(dir, input);
        if let Some(previous) = seen.insert(path.clone(), input.as_path()) {
            anyhow::bail!(
                "Output collision: {} and {} both write {}",
                previous.display(),
                input.display(),
                path.display()
            );
        }
        paths.push(path);
    }

    Ok(paths)
}

fn run_revdocs(args: RevdocsArgs, config: DetectorConfig) -> Result<()> {
    let config = config.with_overrides(args.radius, args.use_sha1);
    config.validate()?;

    if args.inputs.is_empty() {
        let stdout = BufWriter::new(io::stdout().lock());
        let count = write_reverts(io::stdin().lock(), stdout, &config, args.verbose)?;
        tracing::debug!(count, "finished stdin");
        return Ok(());
    }

    let outputs: Vec<Option<PathBuf>> = match &args.output {
        Some(dir) => {
            let paths = output_paths(dir, &args.inputs)?;
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            paths.into_iter().map(Some).collect()
        }
        None => vec![None; args.inputs.len()],
    };

    for (input, output) in args.inputs.iter().zip(outputs) {
        let file =
            File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        let reader = BufReader::new(file);

        let count = match output {
            Some(path) => {
                let out = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_reverts(reader, BufWriter::new(out), &config, args.verbose)
            }
            None => write_reverts(
                reader,
                BufWriter::new(io::stdout().lock()),
                &config,
                args.verbose,
            ),
        }
        .with_context(|| format!("Failed to process {}", input.display()))?;

        tracing::debug!(input = %input.display(), count, "finished input");
    }

    Ok(())
}

fn run_check(args: CheckArgs, config: DetectorConfig) -> Result<()> {
    let config = config.with_overrides(args.radius, false);
    config.validate()?;

    let window = match args.window {
        Some(seconds) => Some(
            TimeDelta::try_seconds(seconds)
                .with_context(|| format!("Invalid value for --window: {}", seconds))?,
        ),
        None => None,
    };

    let file = File::open(&args.history)
        .with_context(|| format!("Failed to open {}", args.history.display()))?;
    let source = MemorySource::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load {}", args.history.display()))?;

    let options = CheckOptions {
        radius: config.radius,
        page_id: args.page_id,
        before: args.before,
        window,
    };

    let status = check(&source, args.rev_id, &options)?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Revdocs(revdocs) => run_revdocs(revdocs, config),
        Command::Check(check_args) => run_check(check_args, config),
    }
}
