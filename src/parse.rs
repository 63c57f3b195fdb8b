//! Parser generators and the assembly of parsed tokens into full expressions.
//!
//! Parsing happens in two steps. The [`lexer()`] turns a (lower-cased) input line into a flat list of spanned
//! [`Token`]s. Then [`assemble()`] walks those tokens with a small state machine, folding constants into the roll
//! before them, expanding repeat counts and attaching combine operators, to produce an [`Expr`].

use std::{fmt, ops::Range, str::FromStr};

use chumsky::{error::RichReason, prelude::*};

use crate::{
	dice::{self, Dice, Modifier, Operator, Policy, MAX_QUANTITY},
	expr::{Expr, Term},
};

/// A value paired with the byte range of the input it was parsed from
pub type Spanned<T> = (T, SimpleSpan);

/// Flat unit of a dice line produced by the [`lexer()`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Token {
	/// Roll term such as `2d6`, `d20a` or `1d8dd`
	Dice {
		/// Number of dice, if written
		quantity: Option<u32>,

		/// Number of sides
		sides: u32,

		/// Count of `a` marks minus count of `d` marks after the sides
		lean: i32,
	},

	/// Keep clause (`k3` or `keep 3`)
	Keep(u32),

	/// Bare integer
	Num(u32),

	/// Arithmetic operator
	Op(Operator),
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Dice {
				quantity,
				sides,
				lean,
			} => {
				if let Some(quantity) = quantity {
					write!(f, "{quantity}")?;
				}
				write!(f, "d{sides}")?;
				let mark = if *lean > 0 { "a" } else { "d" };
				write!(f, "{}", mark.repeat(lean.unsigned_abs() as usize))
			}
			Self::Keep(keep) => write!(f, "keep {keep}"),
			Self::Num(num) => write!(f, "{num}"),
			Self::Op(op) => write!(f, "{op}"),
		}
	}
}

/// Generates a parser for unsigned integers that fit in a `u32`. Leading zeros are part of the number.
fn uint<'src>() -> impl Parser<'src, &'src str, u32, extra::Err<Rich<'src, char>>> + Clone {
	text::digits(10).to_slice().try_map(|digits: &str, span| {
		digits
			.parse()
			.map_err(|err| Rich::custom(span, format!("number {digits} is too large: {err}")))
	})
}

/// Generates a parser that specifically handles dice terms like "d20", "2d6", "d20a", "4d8dd", etc.
pub fn dice_token<'src>() -> impl Parser<'src, &'src str, Token, extra::Err<Rich<'src, char>>> + Clone {
	// Advantage/disadvantage marks, counted against each other
	let lean = one_of("ad")
		.map(|mark| if mark == 'a' { 1_i32 } else { -1_i32 })
		.repeated()
		.collect::<Vec<_>>()
		.map(|marks| marks.into_iter().sum::<i32>());

	uint()
		.or_not()
		.then_ignore(just('d'))
		.then(uint())
		.then(lean)
		.map(|((quantity, sides), lean)| Token::Dice {
			quantity,
			sides,
			lean,
		})
		.labelled("dice")
}

/// Generates a parser that turns a full lower-cased line into spanned tokens and expects end of input.
///
/// Whitespace is allowed between every token, and a line of only whitespace lexes as no tokens. A number followed by
/// whitespace and then a roll term lexes as a separate [`Token::Num`], which is how repeat counts (`3 2d6`) are told
/// apart from dice quantities (`32d6`).
pub fn lexer<'src>() -> impl Parser<'src, &'src str, Vec<Spanned<Token>>, extra::Err<Rich<'src, char>>> + Clone {
	let keep = just("keep")
		.or(just("k"))
		.then_ignore(text::whitespace())
		.ignore_then(uint())
		.map(Token::Keep)
		.labelled("keep clause");

	let op = choice((
		just('+').to(Operator::Add),
		just('-').to(Operator::Sub),
		just('*').to(Operator::Mul),
		just('/').to(Operator::Div),
	))
	.map(Token::Op)
	.labelled("operator");

	let num = uint().map(Token::Num).labelled("number");

	choice((dice_token(), keep, op, num))
		.map_with(|token, e| (token, e.span()))
		.padded()
		.repeated()
		.collect::<Vec<_>>()
		.then_ignore(text::whitespace())
		.then_ignore(end())
}

/// Extracts the tokens from a line. The line is lower-cased first, so the grammar is case-insensitive.
///
/// # Errors
/// If the line contains anything that isn't part of a valid token, an error variant describing the first offending
/// character is returned.
///
/// # Examples
/// ```
/// use fortuna::{dice::Operator, parse::{extract, Token}};
///
/// let tokens = extract("2d6 + 3")?;
/// let tokens = tokens.into_iter().map(|(token, _)| token).collect::<Vec<_>>();
/// assert_eq!(
/// 	tokens,
/// 	vec![
/// 		Token::Dice { quantity: Some(2), sides: 6, lean: 0 },
/// 		Token::Op(Operator::Add),
/// 		Token::Num(3),
/// 	]
/// );
/// # Ok::<(), fortuna::parse::Error>(())
/// ```
pub fn extract(input: &str) -> Result<Vec<Spanned<Token>>, Error> {
	let lc = input.to_lowercase();
	let parser = lexer();
	parser.parse(lc.as_str()).into_result().map_err(|errs| match errs.first() {
		Some(err) => Error::from_rich(&lc, err),
		None => Error::Unexpected {
			found: None,
			span: 0..lc.len(),
			context: lc.clone(),
		},
	})
}

/// Roll term being assembled, before it is validated into [`Dice`]
#[derive(Debug)]
struct Draft {
	/// Operator combining the first copy with the previous term
	op: Operator,

	/// Number of independent copies to roll
	copies: u32,

	/// Number of dice
	quantity: u32,

	/// Number of sides
	sides: u32,

	/// Advantage/disadvantage marks
	lean: i32,

	/// Keep clause, if any
	keep: Option<u32>,

	/// Folded constants
	modifiers: Vec<Modifier>,

	/// Where the roll term came from
	span: SimpleSpan,
}

impl Draft {
	/// Validates the draft and expands it into its copies.
	fn into_terms(self) -> Result<impl Iterator<Item = Term>, Error> {
		let policy = match self.keep {
			Some(keep) => Policy::KeepHighest(keep),
			None => Policy::from_lean(self.lean),
		};

		let dice = Dice::builder()
			.quantity(self.quantity)
			.sides(self.sides)
			.policy(policy)
			.modifiers(self.modifiers)
			.build()?;
		tracing::trace!(%dice, copies = self.copies, span = ?self.span, "assembled roll term");

		let first_op = self.op;
		Ok((0..self.copies).map(move |copy| Term {
			op: if copy == 0 { first_op } else { Operator::Add },
			dice: dice.clone(),
		}))
	}
}

/// Assembles a list of tokens into an expression.
///
/// - A number directly followed by a roll term is a repeat count: the term is rolled that many independent times.
///   The first copy combines with what came before using the operator in effect before the count; the other copies
///   are added.
/// - Any other number is folded into the roll before it as a [`Modifier`], using the pending operator (or `+`).
/// - An operator directly before a roll term becomes that term's combine operator.
/// - A keep clause applies to the roll before it; only one is allowed per roll, and never alongside advantage or
///   disadvantage.
/// - A roll term or number written directly against a roll term or keep clause (`d20d6`, `4d6k3d6`) is rejected.
///
/// An empty token list assembles into an empty expression.
///
/// # Errors
/// If the tokens don't form a valid line, an error variant is returned.
pub fn assemble(tokens: &[Spanned<Token>], input: &str) -> Result<Expr, Error> {
	let mut drafts: Vec<Draft> = Vec::new();
	let mut pending: Option<Spanned<Operator>> = None;
	let mut repeat: Option<u32> = None;

	let mut previous: Option<Spanned<Token>> = None;
	let mut iter = tokens.iter().peekable();
	while let Some(&(token, span)) = iter.next() {
		// A roll term or number must be separated from the roll term or keep clause before it
		if let Some((Token::Dice { .. } | Token::Keep(_), prev_span)) = previous {
			if prev_span.end == span.start && matches!(token, Token::Dice { .. } | Token::Num(_)) {
				return Err(Error::Unexpected {
					found: input.get(span.start..).and_then(|rest| rest.chars().next()),
					span: span.start..span.end,
					context: context_around(input, prev_span.start..span.end),
				});
			}
		}
		previous = Some((token, span));

		match token {
			Token::Dice {
				quantity,
				sides,
				lean,
			} => {
				let op = match pending.take() {
					Some((op, op_span)) if drafts.is_empty() && op != Operator::Add => {
						return Err(Error::LeadingOperator {
							symbol: op.symbol(),
							span: op_span.start..op_span.end,
						});
					}
					Some((op, _)) => op,
					None => Operator::Add,
				};

				drafts.push(Draft {
					op,
					copies: repeat.take().unwrap_or(1),
					quantity: quantity.unwrap_or(1),
					sides,
					lean,
					keep: None,
					modifiers: Vec::new(),
					span,
				});
			}

			Token::Num(value) => {
				if matches!(iter.peek(), Some((Token::Dice { .. }, _))) {
					if value == 0 {
						return Err(Error::ZeroRepeat {
							span: span.start..span.end,
						});
					}
					if value > MAX_QUANTITY {
						return Err(dice::Error::QuantityExceeded { quantity: value }.into());
					}
					repeat = Some(value);
					continue;
				}

				let Some(draft) = drafts.last_mut() else {
					return Err(Error::Constant {
						value,
						span: span.start..span.end,
					});
				};
				let op = pending.take().map_or(Operator::Add, |(op, _)| op);
				draft.modifiers.push(Modifier::new(op, value));
			}

			Token::Op(op) => {
				if let Some((previous, _)) = pending {
					return Err(Error::Operator {
						symbol: previous.symbol(),
						span: span.start..span.end,
						context: context_around(input, span.start..span.end),
					});
				}
				pending = Some((op, span));
			}

			Token::Keep(keep) => {
				if let Some((op, op_span)) = pending {
					return Err(Error::Operator {
						symbol: op.symbol(),
						span: op_span.start..op_span.end,
						context: context_around(input, op_span.start..span.end),
					});
				}
				let Some(draft) = drafts.last_mut() else {
					return Err(Error::Unexpected {
						found: Some('k'),
						span: span.start..span.end,
						context: context_around(input, span.start..span.end),
					});
				};
				if draft.keep.is_some() {
					return Err(Error::MultipleKeep {
						span: span.start..span.end,
					});
				}
				if draft.lean != 0 {
					return Err(Error::KeepWithAdvantage {
						span: draft.span.start..span.end,
					});
				}
				draft.keep = Some(keep);
			}
		}
	}

	if let Some((op, span)) = pending {
		return Err(Error::Operator {
			symbol: op.symbol(),
			span: span.start..span.end,
			context: context_around(input, span.start..span.end),
		});
	}

	let mut terms = Vec::new();
	for draft in drafts {
		terms.extend(draft.into_terms()?);
	}

	Ok(Expr { terms })
}

/// Parses a full line into an expression: [`extract()`] followed by [`assemble()`].
///
/// # Errors
/// If the line can't be tokenized or assembled, an error variant is returned.
///
/// # Examples
/// ```
/// use fortuna::parse::expr;
///
/// let expr = expr("2 1d6 + 1d4-1")?;
/// assert_eq!(expr.terms.len(), 3);
/// assert_eq!(expr.to_string(), "d6 + d6 + d4 - 1");
/// # Ok::<(), fortuna::parse::Error>(())
/// ```
pub fn expr(input: &str) -> Result<Expr, Error> {
	let tokens = extract(input)?;
	assemble(&tokens, &input.to_lowercase())
}

/// Describes the character an error was found at.
fn describe_found(found: Option<char>) -> String {
	match found {
		Some(found) => format!("unexpected '{found}'"),
		None => "unexpected end of input".to_owned(),
	}
}

/// Builds a short excerpt of the input around a span, for error messages.
fn context_around(input: &str, span: Range<usize>) -> String {
	let start = span.start.saturating_sub(4);
	let end = span.end.saturating_add(4).min(input.len());
	input
		.char_indices()
		.filter(|(idx, _)| (start..end).contains(idx))
		.map(|(_, c)| c)
		.collect::<String>()
		.trim()
		.to_owned()
}

/// An error resulting from parsing a dice line
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// A character appeared where nothing in the grammar can.
	#[error("{} at position {} in \"{context}\"", describe_found(*found), span.start)]
	Unexpected {
		/// Offending character, or `None` at the end of the input
		found: Option<char>,

		/// Location of the offending character
		span: Range<usize>,

		/// Excerpt of the input around the offending character
		context: String,
	},

	/// A number didn't fit.
	#[error("{details}")]
	Number {
		/// Description of the problem
		details: String,

		/// Location of the number
		span: Range<usize>,
	},

	/// A second keep clause was given for the same roll.
	#[error("multiple keep values provided")]
	MultipleKeep {
		/// Location of the second keep clause
		span: Range<usize>,
	},

	/// A keep clause was given for a roll with advantage or disadvantage.
	#[error("keep cannot be combined with advantage or disadvantage")]
	KeepWithAdvantage {
		/// Location of the roll and its keep clause
		span: Range<usize>,
	},

	/// An operator wasn't followed by a number or roll.
	#[error("operator '{symbol}' must be followed by a number or a roll (near \"{context}\")")]
	Operator {
		/// Operator that was left dangling
		symbol: char,

		/// Location of the problem
		span: Range<usize>,

		/// Excerpt of the input around the problem
		context: String,
	},

	/// A line started with an operator other than `+`.
	#[error("a roll can't start with '{symbol}'")]
	LeadingOperator {
		/// Operator the line started with
		symbol: char,

		/// Location of the operator
		span: Range<usize>,
	},

	/// A number appeared before any roll it could modify.
	#[error("constant {value} has no roll to modify")]
	Constant {
		/// Value of the constant
		value: u32,

		/// Location of the constant
		span: Range<usize>,
	},

	/// A roll term was repeated zero times.
	#[error("a roll can't be repeated zero times")]
	ZeroRepeat {
		/// Location of the repeat count
		span: Range<usize>,
	},

	/// A single roll term was expected.
	#[error("expected exactly one roll, found {terms}")]
	NotSingle {
		/// Number of roll terms found
		terms: usize,
	},

	/// Dice that were parsed are invalid.
	#[error(transparent)]
	Dice(#[from] dice::Error),
}

impl Error {
	/// Location in the input the error refers to, if it has one.
	#[must_use]
	pub fn span(&self) -> Option<Range<usize>> {
		match self {
			Self::Unexpected { span, .. }
			| Self::Number { span, .. }
			| Self::MultipleKeep { span }
			| Self::KeepWithAdvantage { span }
			| Self::Operator { span, .. }
			| Self::LeadingOperator { span, .. }
			| Self::Constant { span, .. }
			| Self::ZeroRepeat { span } => Some(span.clone()),
			Self::NotSingle { .. } | Self::Dice(..) => None,
		}
	}

	/// Converts a chumsky error into one of ours.
	fn from_rich(input: &str, err: &Rich<'_, char>) -> Self {
		let span = err.span().start..err.span().end;
		match err.reason() {
			RichReason::Custom(details) => Self::Number {
				details: details.clone(),
				span,
			},
			_ => Self::Unexpected {
				found: err.found().copied(),
				context: context_around(input, span.clone()),
				span,
			},
		}
	}
}

impl FromStr for Dice {
	type Err = Error;

	/// Parses a line that must contain exactly one roll term, without repeat counts.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut terms = expr(s)?.terms;
		if terms.len() == 1 {
			Ok(terms.remove(0).dice)
		} else {
			Err(Error::NotSingle { terms: terms.len() })
		}
	}
}

impl FromStr for Expr {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		expr(s)
	}
}
