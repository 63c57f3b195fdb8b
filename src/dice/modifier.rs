//! Arithmetic operators and the flat modifiers built from them.

use std::fmt;

/// Arithmetic operator used both by [`Modifier`]s and for combining the totals of several rolls in one line.
///
/// Operators never have precedence over each other: they are always applied left to right in the order they were
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::exhaustive_enums, reason = "The grammar only knows these four")]
pub enum Operator {
	/// Addition (`+`)
	#[default]
	Add,

	/// Subtraction (`-`)
	Sub,

	/// Multiplication (`*`)
	Mul,

	/// True (non-truncating) division (`/`)
	Div,
}

impl Operator {
	/// Gets the operator that corresponds to a symbol, if any.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::modifier::Operator;
	///
	/// assert_eq!(Operator::from_symbol('*'), Some(Operator::Mul));
	/// assert_eq!(Operator::from_symbol('%'), None);
	/// ```
	#[must_use]
	pub const fn from_symbol(symbol: char) -> Option<Self> {
		match symbol {
			'+' => Some(Self::Add),
			'-' => Some(Self::Sub),
			'*' => Some(Self::Mul),
			'/' => Some(Self::Div),
			_ => None,
		}
	}

	/// Gets the symbol that represents the operator.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
			Self::Mul => '*',
			Self::Div => '/',
		}
	}

	/// Applies the operator to two values.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::modifier::Operator;
	///
	/// assert_eq!(Operator::Div.apply(7.0, 2.0), 3.5);
	/// assert_eq!(Operator::Sub.apply(7.0, 2.0), 5.0);
	/// ```
	#[must_use]
	pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
		match self {
			Self::Add => lhs + rhs,
			Self::Sub => lhs - rhs,
			Self::Mul => lhs * rhs,
			Self::Div => lhs / rhs,
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Flat arithmetic adjustment applied to the aggregate of a roll after its resolution policy, e.g. the `+2` in `1d4+2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Modifier {
	/// Operation to perform
	pub op: Operator,

	/// Right-hand side of the operation
	pub operand: u32,
}

impl Modifier {
	/// Creates a new modifier.
	#[must_use]
	pub const fn new(op: Operator, operand: u32) -> Self {
		Self { op, operand }
	}

	/// Applies the modifier to a value.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::modifier::{Modifier, Operator};
	///
	/// let halve = Modifier::new(Operator::Div, 2);
	/// assert_eq!(halve.apply(halve.apply(5.0)), 1.25);
	/// ```
	#[must_use]
	pub fn apply(self, value: f64) -> f64 {
		self.op.apply(value, f64::from(self.operand))
	}
}

impl fmt::Display for Modifier {
	/// Formats the modifier as its operator and operand separated by a space (`+ 2`), which is also how it appears
	/// in a roll's notation.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.op, self.operand)
	}
}
