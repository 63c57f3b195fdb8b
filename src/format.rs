//! Rendering of rolled dice into aligned, human-readable text.

use crate::{
	dice::{Policy, Rolled},
	expr::{CalcError, Evaled},
	stats::Summary,
};

/// Formats a number for presentation: integral values have no decimal point, anything else is rounded to two
/// decimal places.
///
/// # Examples
/// ```
/// use fortuna::format::clean_number;
///
/// assert_eq!(clean_number(8.0), "8");
/// assert_eq!(clean_number(3.5), "3.5");
/// assert_eq!(clean_number(10.0 / 3.0), "3.33");
/// assert_eq!(clean_number(-2.0), "-2");
/// ```
#[must_use]
pub fn clean_number(value: f64) -> String {
	if value.fract() == 0.0 {
		return if value == 0.0 { "0".to_owned() } else { value.to_string() };
	}

	let rounded = (value * 100.0).round() / 100.0;
	if rounded == 0.0 {
		"0".to_owned()
	} else {
		rounded.to_string()
	}
}

/// Formats a single rolled set of dice as one line, with its notation padded to `width` characters.
fn line(rolled: &Rolled<'_>, width: usize) -> String {
	let notation = rolled.dice().notation();
	let faces = rolled.faces();

	match faces {
		[face] if rolled.dice().modifiers().is_empty() && rolled.dice().policy() == Policy::Sum => {
			format!("{notation:<width$}\tRoll: {face}")
		}
		[face] => format!("{notation:<width$}\tRoll: {face}\tTotal: {}", rolled.total()),
		_ => format!(
			"{notation:<width$}\tRolls: {} \tTotal: {}",
			faces.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
			rolled.total()
		),
	}
}

/// Formats a single rolled set of dice as one line.
///
/// A single die without anything changing its value shows only its face; anything else also shows the total.
///
/// # Examples
/// ```
/// use fortuna::{dice::{roller::{Iter as IterRoller, Roller}, Dice}, format::format_single};
///
/// let dice = Dice::new(2, 6)?;
/// let rolled = IterRoller::new([3, 5]).roll(&dice);
/// assert_eq!(format_single(&rolled), "2d6\tRolls: 3, 5 \tTotal: 8");
///
/// let dice = Dice::new(1, 20)?;
/// let rolled = IterRoller::new([17]).roll(&dice);
/// assert_eq!(format_single(&rolled), "d20\tRoll: 17");
/// # Ok::<(), fortuna::dice::Error>(())
/// ```
#[must_use]
pub fn format_single(rolled: &Rolled<'_>) -> String {
	line(rolled, 0)
}

/// Formats every rolled term of a line as its own line, padding the notations so the results line up, followed by
/// the grand total. A non-empty `header` is written as the first line.
///
/// # Errors
/// If the grand total can't be calculated, an error variant is returned.
///
/// # Examples
/// ```
/// use fortuna::{dice::roller::Iter as IterRoller, format::format_many, Expr};
///
/// let expr: Expr = "2d6 + 1d4".parse()?;
/// let evaled = expr.roll(&mut IterRoller::new([3, 5, 2]));
/// assert_eq!(
/// 	format_many(&evaled, "")?,
/// 	"2d6\tRolls: 3, 5 \tTotal: 8\nd4 \tRoll: 2\nGrand Total: 10"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn format_many(evaled: &Evaled<'_>, header: &str) -> Result<String, CalcError> {
	let width = evaled
		.rolls()
		.map(|rolled| rolled.dice().notation().len())
		.max()
		.unwrap_or(0);

	let mut lines = Vec::with_capacity(evaled.terms.len().saturating_add(2));
	if !header.is_empty() {
		lines.push(header.to_owned());
	}
	lines.extend(evaled.rolls().map(|rolled| line(rolled, width)));
	lines.push(format!("Grand Total: {}", clean_number(evaled.grand_total()?)));

	Ok(lines.join("\n"))
}

/// Builds the title for a rolled line, without the mention of who rolled it: `rolled a die:` for a single term
/// with a single face, `rolled some dice:` for any other single term, and ``rolled `<input>` `` for several terms.
///
/// # Examples
/// ```
/// use fortuna::{dice::roller::Val as ValRoller, format::title, Expr};
///
/// let expr: Expr = "d20".parse()?;
/// assert_eq!(title(&expr.roll(&mut ValRoller(4)), "d20"), "rolled a die:");
///
/// let expr: Expr = "d20a".parse()?;
/// assert_eq!(title(&expr.roll(&mut ValRoller(4)), "d20a"), "rolled some dice:");
///
/// let expr: Expr = "d20 + d4".parse()?;
/// assert_eq!(title(&expr.roll(&mut ValRoller(4)), " d20 + d4 "), "rolled `d20 + d4`");
/// # Ok::<(), fortuna::parse::Error>(())
/// ```
#[must_use]
pub fn title(evaled: &Evaled<'_>, input: &str) -> String {
	match evaled.terms.as_slice() {
		[term] if term.rolled.faces().len() == 1 => "rolled a die:".to_owned(),
		[_] => "rolled some dice:".to_owned(),
		_ => format!("rolled `{}`", input.trim()),
	}
}

/// Renders a stats summary under a heading naming whose rolls they are.
///
/// # Examples
/// ```
/// use fortuna::{format::format_stats, stats::aggregate};
///
/// let summary = aggregate([("1d20", "20"), ("1d3", "1")]);
/// let text = format_stats(&summary, "Alex");
/// assert!(text.starts_with("Roll stats for Alex\nd4 (0 rolled): 0.0 (avg)\n"));
/// assert!(text.contains("\nd20 (1 rolled): 20.0 (+9.5)\n"));
/// assert!(text.ends_with("\n1 other die rolled."));
/// ```
#[must_use]
pub fn format_stats(summary: &Summary, mention: &str) -> String {
	format!("Roll stats for {mention}\n{summary}")
}
