use std::{
	fs::{self, OpenOptions},
	io::{self, Write},
	path::{Path, PathBuf},
	process::ExitCode,
};

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use clap::Parser;
use fortuna::{
	command::{self, Command, StatsRequest},
	dice::roller::FastRand as FastRandRoller,
	format, resolve_command, stats,
};
use tracing_subscriber::EnvFilter;

/// Rolls tabletop dice notation, or summarizes a history of rolls.
#[derive(Debug, Parser)]
#[command(name = "fortuna", version)]
struct Cli {
	/// Dice line (e.g. `2 1d20a + 4d6k3 - 2`) or stats keyword. Read from stdin when omitted.
	words: Vec<String>,

	/// Seed for the roller, for repeatable results
	#[arg(long)]
	seed: Option<u64>,

	/// Mention to start the title with
	#[arg(long, default_value = "You")]
	name: String,

	/// File of `dice;results` lines that rolls are appended to and stats are read from
	#[arg(long)]
	history: Option<PathBuf>,

	/// Log debug output
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	let filter = if cli.verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

	// Obtain the line by combining all words passed to the executable, so that it can be left unquoted even with
	// spaces. Without any words, the first line of stdin is used.
	let input = if cli.words.is_empty() {
		match io::stdin().lines().next() {
			Some(Ok(line)) => line,
			Some(Err(err)) => {
				eprintln!("Unable to read stdin: {err}");
				return ExitCode::FAILURE;
			}
			None => String::new(),
		}
	} else {
		cli.words.join(" ")
	};

	match Command::route(&input) {
		Ok(Command::Roll(line)) => roll(&cli, &line),
		Ok(Command::Stats(request)) => show_stats(cli.history.as_deref(), &cli.name, request),
		Err(err) => {
			eprintln!("Invalid format: {err}");
			ExitCode::FAILURE
		}
	}
}

/// Resolves a dice line, prints it and appends it to the history file if there is one.
fn roll(cli: &Cli, line: &str) -> ExitCode {
	let mut roller = cli.seed.map_or_else(FastRandRoller::default, FastRandRoller::with_seed);

	let rendered = match resolve_command(line, &mut roller) {
		Ok(rendered) => rendered,
		Err(err) => {
			report(line, &err);
			return ExitCode::FAILURE;
		}
	};

	println!("{}", rendered.title_for(&cli.name));
	println!("{}", rendered.text);

	if let Some(path) = &cli.history {
		let records = rendered.records(0, 0);
		let appended = OpenOptions::new()
			.create(true)
			.append(true)
			.open(path)
			.and_then(|mut file| {
				records
					.iter()
					.try_for_each(|record| writeln!(file, "{};{}", record.dice, record.results))
			});

		if let Err(err) = appended {
			eprintln!("Unable to write history to {}: {err}", path.display());
			return ExitCode::FAILURE;
		}
	}

	ExitCode::SUCCESS
}

/// Handles the stats keywords against the history file.
fn show_stats(history: Option<&Path>, mention: &str, request: StatsRequest) -> ExitCode {
	let Some(path) = history else {
		eprintln!("Stats need a history file (--history <FILE>)");
		return ExitCode::FAILURE;
	};

	if matches!(request, StatsRequest::Reset | StatsRequest::ResetServer) {
		return match fs::write(path, "") {
			Ok(()) => {
				println!("Stats have been reset.");
				ExitCode::SUCCESS
			}
			Err(err) => {
				eprintln!("Unable to reset {}: {err}", path.display());
				ExitCode::FAILURE
			}
		};
	}

	let contents = match fs::read_to_string(path) {
		Ok(contents) => contents,
		Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
		Err(err) => {
			eprintln!("Unable to read {}: {err}", path.display());
			return ExitCode::FAILURE;
		}
	};

	let summary = stats::aggregate(
		contents
			.lines()
			.filter(|line| !line.trim().is_empty())
			.map(|line| line.split_once(';').unwrap_or((line, ""))),
	);
	println!("{}", format::format_stats(&summary, mention));

	ExitCode::SUCCESS
}

/// Prints a command error, pointing at the offending part of the line when possible.
fn report(line: &str, err: &command::Error) {
	let span = match err {
		command::Error::Parse(parse_err) => parse_err.span(),
		_ => None,
	};

	let Some(span) = span else {
		eprintln!("Invalid format: {err}");
		return;
	};

	// Spans are byte offsets into the line
	let printed = Report::build(ReportKind::Error, span.clone())
		.with_config(Config::default().with_index_type(IndexType::Byte))
		.with_message("Invalid format")
		.with_label(Label::new(span).with_message(err.to_string()))
		.finish()
		.eprint(Source::from(line));

	if printed.is_err() {
		eprintln!("Invalid format: {err}");
	}
}
