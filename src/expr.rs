//! Data structures for full dice lines made of several roll terms, and combining their results.

use std::fmt;

use crate::dice::{Dice, Operator, Rolled, Roller};

/// One roll term of a line, along with how its total combines with the running total of the terms before it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Term {
	/// Operator combining this term's total with the running total. Ignored for the first term of a line.
	pub op: Operator,

	/// Dice to roll
	pub dice: Dice,
}

/// Full dice line: an ordered list of roll terms
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Expr {
	/// Terms in the order they were written, with repeat counts already expanded
	pub terms: Vec<Term>,
}

impl Expr {
	/// Rolls every term, in order, with the given roller.
	///
	/// # Examples
	/// ```
	/// use fortuna::{dice::roller::Iter as IterRoller, Expr};
	///
	/// let expr: Expr = "2d6 + 1d4 - 3".parse()?;
	/// let evaled = expr.roll(&mut IterRoller::new([3, 5, 4]));
	/// assert_eq!(evaled.grand_total()?, 9.0);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn roll(&self, roller: &mut impl Roller) -> Evaled<'_> {
		let terms = self
			.terms
			.iter()
			.map(|term| RolledTerm {
				op: term.op,
				rolled: roller.roll(&term.dice),
			})
			.collect();

		Evaled { terms }
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every roll), which is
	/// only the case when every die has a single side.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		self.terms.iter().all(|term| term.dice.is_deterministic())
	}

	/// Checks whether there are no terms at all.
	#[must_use]
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}
}

impl fmt::Display for Expr {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// Terms are written in their canonical notation, joined by their combine operators. Parsing the output results
	/// in the same terms.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, term) in self.terms.iter().enumerate() {
			if idx > 0 {
				write!(f, " {} ", term.op)?;
			}
			write!(f, "{}", term.dice)?;
		}
		Ok(())
	}
}

/// Rolled term of a line
#[derive(Debug, Clone, PartialEq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct RolledTerm<'a> {
	/// Operator combining this term's total with the running total
	pub op: Operator,

	/// Result of rolling the term's dice
	pub rolled: Rolled<'a>,
}

/// Rolled line, produced by [`Expr::roll()`]
#[derive(Debug, Clone, PartialEq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Evaled<'a> {
	/// Rolled terms, in order
	pub terms: Vec<RolledTerm<'a>>,
}

impl<'a> Evaled<'a> {
	/// Calculates the grand total by folding the terms left to right: the first term's total is the starting value,
	/// and each following term is combined into it with its own operator. An empty line totals zero.
	///
	/// # Errors
	/// If a term that divides the running total has a total of zero, an error variant is returned.
	pub fn grand_total(&self) -> Result<f64, CalcError> {
		let mut terms = self.terms.iter();
		let Some(first) = terms.next() else {
			return Ok(0.0);
		};

		terms.try_fold(first.rolled.total(), |acc, term| {
			if term.op == Operator::Div && term.rolled.total() == 0.0 {
				return Err(CalcError::DivisionByZero(term.rolled.dice().notation()));
			}
			Ok(term.op.apply(acc, term.rolled.total()))
		})
	}

	/// Iterates over the rolled dice of every term.
	pub fn rolls(&self) -> impl Iterator<Item = &Rolled<'a>> + '_ {
		self.terms.iter().map(|term| &term.rolled)
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Evaled<'static> {
		Evaled {
			terms: self
				.terms
				.into_iter()
				.map(|term| RolledTerm {
					op: term.op,
					rolled: term.rolled.into_owned(),
				})
				.collect(),
		}
	}
}

/// Error that can occur during [`Evaled::grand_total()`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalcError {
	/// A term divided the running total but came out to zero.
	#[error("division by zero: {0} totalled 0")]
	DivisionByZero(String),
}
