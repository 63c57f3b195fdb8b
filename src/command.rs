//! Entry point for chat commands: routing a raw line and resolving dice lines into rendered results.

use crate::{
	dice::{Rolled, Roller},
	expr::{CalcError, Evaled},
	format, parse,
	stats::HistoricalRoll,
};

/// Stats action requested instead of a roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Mirrors the fixed set of keywords")]
pub enum StatsRequest {
	/// `stats`: the caller's rolls on this server
	Personal,

	/// `campaign stats`: the caller's rolls in the active campaign
	Campaign,

	/// `reset stats`: delete all of the caller's stored rolls
	Reset,

	/// `reset server stats`: delete the caller's stored rolls on this server
	ResetServer,
}

/// Routed command line
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "A line is either a roll or a stats keyword")]
pub enum Command {
	/// Dice line to resolve, lower-cased and trimmed
	Roll(String),

	/// Stats keyword, which bypasses dice parsing entirely
	Stats(StatsRequest),
}

impl Command {
	/// Routes a line. Lines mentioning `stats` must be one of the stats keywords; anything else is a dice line.
	///
	/// # Errors
	/// If the line mentions `stats` but isn't a known keyword, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use fortuna::command::{Command, StatsRequest};
	///
	/// assert_eq!(Command::route(" Reset Stats ")?, Command::Stats(StatsRequest::Reset));
	/// assert_eq!(Command::route("2D6 + 1")?, Command::Roll("2d6 + 1".to_owned()));
	/// assert!(Command::route("stats please").is_err());
	/// # Ok::<(), fortuna::command::Error>(())
	/// ```
	pub fn route(input: &str) -> Result<Self, Error> {
		let line = input.trim().to_lowercase();
		if !line.contains("stats") {
			tracing::debug!(%line, "routed to dice roll");
			return Ok(Self::Roll(line));
		}

		let request = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
			["stats"] => StatsRequest::Personal,
			["campaign", "stats"] => StatsRequest::Campaign,
			["reset", "stats"] => StatsRequest::Reset,
			["reset", "server", "stats"] => StatsRequest::ResetServer,
			_ => return Err(Error::UnknownStats(line)),
		};
		tracing::debug!(?request, "routed to stats");

		Ok(Self::Stats(request))
	}
}

/// Resolved dice line, ready to be sent and persisted
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RenderedRolls {
	/// Every rolled term, in order
	pub evaled: Evaled<'static>,

	/// Pre-rendered result block
	pub text: String,

	/// Title without the mention of who rolled (see [`Self::title_for()`])
	pub title: String,

	/// Grand total of the line
	pub grand_total: f64,
}

impl RenderedRolls {
	/// Builds the full title for a given mention.
	#[must_use]
	pub fn title_for(&self, mention: &str) -> String {
		format!("{mention} {}", self.title)
	}

	/// Every rolled set of dice, in order.
	pub fn rolls(&self) -> impl Iterator<Item = &Rolled<'static>> {
		self.evaled.rolls()
	}

	/// Builds the records to persist, one per rolled set of dice.
	#[must_use]
	pub fn records(&self, user_id: u64, server_id: u64) -> Vec<HistoricalRoll> {
		self.rolls()
			.map(|rolled| HistoricalRoll::from_rolled(rolled, user_id, server_id))
			.collect()
	}
}

/// Parses, rolls and renders a dice line.
///
/// A line with a single term renders as that term's line; several terms render as an aligned block ending with the
/// grand total.
///
/// # Errors
/// If the line can't be parsed, has no roll terms, or its grand total divides by zero, an error variant is returned.
///
/// # Examples
/// ```
/// use fortuna::{command::resolve_command, dice::roller::Iter as IterRoller};
///
/// let rendered = resolve_command("4d6k3", &mut IterRoller::new([1, 4, 4, 6]))?;
/// assert_eq!(rendered.text, "4d6 keep 3\tRolls: 1, 4, 4, 6 \tTotal: 14");
/// assert_eq!(rendered.title_for("Alex"), "Alex rolled some dice:");
/// assert_eq!(rendered.records(1, 2)[0].results, "1,4,4,6");
/// # Ok::<(), fortuna::command::Error>(())
/// ```
pub fn resolve_command(input: &str, roller: &mut impl Roller) -> Result<RenderedRolls, Error> {
	let expr = parse::expr(input)?;
	if expr.is_empty() {
		return Err(Error::Empty);
	}

	let evaled = expr.roll(roller);
	let grand_total = evaled.grand_total()?;
	let text = match evaled.terms.as_slice() {
		[term] => format::format_single(&term.rolled),
		_ => format::format_many(&evaled, "")?,
	};
	let title = format::title(&evaled, input);
	tracing::debug!(terms = evaled.terms.len(), grand_total, "resolved dice line");

	Ok(RenderedRolls {
		evaled: evaled.into_owned(),
		text,
		title,
		grand_total,
	})
}

/// Error that can occur while handling a command line
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The dice line couldn't be parsed.
	#[error(transparent)]
	Parse(#[from] parse::Error),

	/// The line had no roll terms.
	#[error("no dice to roll")]
	Empty,

	/// The grand total couldn't be calculated.
	#[error(transparent)]
	Calc(#[from] CalcError),

	/// The line mentioned stats but wasn't a known stats keyword.
	#[error("unknown stats command \"{0}\"")]
	UnknownStats(String),
}
