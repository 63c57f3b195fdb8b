//! All functionality for directly creating dice, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For rolling several of them as part of one line, see [`Expr`].
//!
//! [`Expr`]: crate::expr::Expr

pub mod modifier;
pub mod roller;

use std::{borrow::Cow, collections::BinaryHeap, fmt};

pub use self::{
	modifier::{Modifier, Operator},
	roller::Roller,
};

/// Highest number of dice that can be rolled by a single set of dice (and the highest repeat count for a roll term)
pub const MAX_QUANTITY: u32 = 1000;

/// How the individual faces of a roll are aggregated into a single value before any [`Modifier`]s are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Policy {
	/// Sum of all faces
	#[default]
	Sum,

	/// Highest face. A single die is promoted to two dice when rolled.
	Advantage,

	/// Lowest face. A single die is promoted to two dice when rolled.
	Disadvantage,

	/// Sum of the given number of highest faces. Keeping at least as many as were rolled keeps all of them.
	KeepHighest(u32),
}

impl Policy {
	/// Picks the policy for a run of advantage/disadvantage marks: more `a`s than `d`s gives advantage, more `d`s
	/// than `a`s gives disadvantage, and an even count (including none at all) gives a plain sum.
	#[must_use]
	pub const fn from_lean(lean: i32) -> Self {
		if lean > 0 {
			Self::Advantage
		} else if lean < 0 {
			Self::Disadvantage
		} else {
			Self::Sum
		}
	}

	/// Aggregates a set of faces according to the policy.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::Policy;
	///
	/// assert_eq!(Policy::Sum.aggregate(&[1, 4, 4, 6]), 15);
	/// assert_eq!(Policy::Advantage.aggregate(&[4, 17]), 17);
	/// assert_eq!(Policy::KeepHighest(3).aggregate(&[1, 4, 4, 6]), 14);
	/// ```
	#[must_use]
	pub fn aggregate(self, faces: &[u32]) -> u64 {
		match self {
			Self::Sum => faces.iter().copied().map(u64::from).sum(),
			Self::Advantage => faces.iter().copied().max().map_or(0, u64::from),
			Self::Disadvantage => faces.iter().copied().min().map_or(0, u64::from),
			Self::KeepHighest(keep) => {
				let mut heap = faces.iter().copied().collect::<BinaryHeap<_>>();
				let mut sum = 0;
				for _ in 0..keep {
					match heap.pop() {
						Some(face) => sum += u64::from(face),
						None => break,
					}
				}
				sum
			}
		}
	}
}

/// A single roll term: a number of dice with the same number of sides, the policy used to aggregate their faces, and
/// a list of modifiers to apply to the aggregate.
///
/// Dice can only be created through [`Dice::new()`] or the [`Builder`], both of which validate the quantity cap and
/// the other invariants. Creating dice never consumes any randomness; see [`Roller::roll()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dice {
	/// Number of dice as written
	quantity: u32,

	/// Number of sides for each die
	sides: u32,

	/// How faces are aggregated
	policy: Policy,

	/// Modifiers to apply to the aggregate, in order
	modifiers: Vec<Modifier>,
}

impl Dice {
	/// Creates a new set of dice with a given quantity and number of sides, summing all faces.
	///
	/// # Errors
	/// If the quantity is zero or above [`MAX_QUANTITY`], or the number of sides is zero, an error variant is
	/// returned.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::{Dice, Error};
	///
	/// assert!(Dice::new(1000, 6).is_ok());
	/// assert!(matches!(Dice::new(1001, 6), Err(Error::QuantityExceeded { quantity: 1001 })));
	/// ```
	pub fn new(quantity: u32, sides: u32) -> Result<Self, Error> {
		Self::builder().quantity(quantity).sides(sides).build()
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Number of dice as written. See [`Self::effective_quantity()`] for the number that will actually be rolled.
	#[must_use]
	#[inline]
	pub const fn quantity(&self) -> u32 {
		self.quantity
	}

	/// Number of dice that are rolled, accounting for single dice with advantage or disadvantage being rolled as a
	/// pair.
	#[must_use]
	pub const fn effective_quantity(&self) -> u32 {
		match self.policy {
			Policy::Advantage | Policy::Disadvantage if self.quantity == 1 => 2,
			_ => self.quantity,
		}
	}

	/// Number of sides for each die
	#[must_use]
	#[inline]
	pub const fn sides(&self) -> u32 {
		self.sides
	}

	/// Aggregation policy
	#[must_use]
	#[inline]
	pub const fn policy(&self) -> Policy {
		self.policy
	}

	/// Whether the highest face is taken
	#[must_use]
	#[inline]
	pub const fn advantage(&self) -> bool {
		matches!(self.policy, Policy::Advantage)
	}

	/// Whether the lowest face is taken
	#[must_use]
	#[inline]
	pub const fn disadvantage(&self) -> bool {
		matches!(self.policy, Policy::Disadvantage)
	}

	/// Number of highest faces that are kept, if limited
	#[must_use]
	pub const fn keep(&self) -> Option<u32> {
		match self.policy {
			Policy::KeepHighest(keep) => Some(keep),
			_ => None,
		}
	}

	/// Modifiers applied to the aggregate, in the order they are applied
	#[must_use]
	#[inline]
	pub fn modifiers(&self) -> &[Modifier] {
		&self.modifiers
	}

	/// Builds the canonical notation for the dice. This isn't necessarily the text that was originally parsed, but
	/// parsing it again always results in identical dice.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::{Dice, Modifier, Operator};
	///
	/// let dice = Dice::builder()
	/// 	.quantity(4)
	/// 	.sides(8)
	/// 	.keep_highest(3)
	/// 	.modifier(Modifier::new(Operator::Sub, 2))
	/// 	.build()?;
	/// assert_eq!(dice.notation(), "4d8 keep 3 - 2");
	///
	/// let dice = Dice::builder().sides(20).advantage().build()?;
	/// assert_eq!(dice.notation(), "d20a");
	/// # Ok::<(), fortuna::dice::Error>(())
	/// ```
	#[must_use]
	pub fn notation(&self) -> String {
		let mut notation = if self.quantity > 1 {
			format!("{}d{}", self.quantity, self.sides)
		} else {
			format!("d{}", self.sides)
		};

		match self.policy {
			Policy::Sum => {}
			Policy::Advantage => notation.push('a'),
			Policy::Disadvantage => notation.push('d'),
			Policy::KeepHighest(keep) => notation.push_str(&format!(" keep {keep}")),
		}

		for modifier in &self.modifiers {
			notation.push(' ');
			notation.push_str(&modifier.to_string());
		}

		notation
	}

	/// Builds the `{quantity}d{sides}` string that persisted roll records are keyed by. The quantity is the number
	/// of dice actually rolled.
	#[must_use]
	pub fn dice_str(&self) -> String {
		format!("{}d{}", self.effective_quantity(), self.sides)
	}

	/// Checks whether rolling the dice always results in the same faces.
	#[must_use]
	#[inline]
	pub const fn is_deterministic(&self) -> bool {
		self.sides == 1
	}
}

impl fmt::Display for Dice {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to [`Self::notation()`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.notation())
	}
}

/// Representation of the result from rolling [`Dice`]: every face that was rolled and the final total.
///
/// A `Rolled` can only be produced by a [`Roller`], so its faces and total are fixed once it exists. Reading them
/// any number of times, in any order, always yields the same values.
#[derive(Debug, Clone, PartialEq)]
pub struct Rolled<'a> {
	/// Each individual face that was rolled, including those not kept
	faces: Vec<u32>,

	/// Aggregate after the policy and all modifiers
	total: f64,

	/// Dice that were rolled to produce this
	dice: Cow<'a, Dice>,
}

impl<'a> Rolled<'a> {
	/// Resolves a set of faces for some dice: aggregates them with the dice's policy, then folds the modifiers over
	/// the aggregate in order.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::{Dice, Rolled};
	///
	/// let dice = Dice::builder().quantity(4).sides(6).keep_highest(3).build()?;
	/// let rolled = Rolled::from_dice_and_faces(&dice, vec![1, 4, 4, 6]);
	/// assert_eq!(rolled.total(), 14.0);
	/// assert_eq!(rolled.faces(), &[1, 4, 4, 6]);
	/// # Ok::<(), fortuna::dice::Error>(())
	/// ```
	#[must_use]
	#[expect(clippy::cast_precision_loss, reason = "Aggregates are far below 2^52")]
	pub fn from_dice_and_faces(dice: &'a Dice, faces: Vec<u32>) -> Self {
		let base = dice.policy.aggregate(&faces) as f64;
		let total = dice.modifiers.iter().fold(base, |value, modifier| modifier.apply(value));

		Self {
			faces,
			total,
			dice: Cow::Borrowed(dice),
		}
	}

	/// Each individual face that was rolled, in draw order. Faces dropped by a keep policy are still included.
	#[must_use]
	#[inline]
	pub fn faces(&self) -> &[u32] {
		&self.faces
	}

	/// Total after the policy and all modifiers
	#[must_use]
	#[inline]
	pub const fn total(&self) -> f64 {
		self.total
	}

	/// Dice that were rolled
	#[must_use]
	#[inline]
	pub fn dice(&self) -> &Dice {
		&self.dice
	}

	/// Builds the `{quantity}d{sides}` string for persisting the roll.
	#[must_use]
	pub fn dice_str(&self) -> String {
		self.dice.dice_str()
	}

	/// Builds the comma-joined list of faces for persisting the roll.
	///
	/// # Examples
	/// ```
	/// use fortuna::dice::{Dice, Rolled};
	///
	/// let dice = Dice::new(3, 6)?;
	/// let rolled = Rolled::from_dice_and_faces(&dice, vec![3, 1, 6]);
	/// assert_eq!(rolled.dice_str(), "3d6");
	/// assert_eq!(rolled.results_csv(), "3,1,6");
	/// # Ok::<(), fortuna::dice::Error>(())
	/// ```
	#[must_use]
	pub fn results_csv(&self) -> String {
		self.faces.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			faces: self.faces,
			total: self.total,
			dice: Cow::Owned(self.dice.into_owned()),
		}
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// More dice were requested than [`MAX_QUANTITY`] allows.
	#[error("Maximum quantity exceeded ({quantity} > {MAX_QUANTITY})")]
	QuantityExceeded {
		/// Quantity that was requested
		quantity: u32,
	},

	/// Zero dice were requested.
	#[error("at least one die must be rolled")]
	NoDice,

	/// Dice with zero sides were requested.
	#[error("dice must have at least one side")]
	NoSides,

	/// A modifier divides by zero.
	#[error("cannot divide by zero")]
	DivisionByZero,
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use fortuna::Dice;
///
/// let dice = Dice::builder().quantity(2).sides(6).build()?;
/// assert_eq!(dice, Dice::new(2, 6)?);
/// # Ok::<(), fortuna::dice::Error>(())
/// ```
///
/// ## Policy and modifiers
/// ```
/// use fortuna::dice::{Dice, Modifier, Operator, Policy};
///
/// let dice = Dice::builder()
/// 	.sides(20)
/// 	.disadvantage()
/// 	.modifier(Modifier::new(Operator::Add, 5))
/// 	.build()?;
/// assert_eq!(dice.policy(), Policy::Disadvantage);
/// assert_eq!(dice.effective_quantity(), 2);
/// assert_eq!(dice.modifiers(), &[Modifier::new(Operator::Add, 5)]);
/// # Ok::<(), fortuna::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
	/// Number of dice
	quantity: u32,

	/// Number of sides
	sides: u32,

	/// Aggregation policy
	policy: Policy,

	/// Modifiers in application order
	modifiers: Vec<Modifier>,
}

impl Default for Builder {
	/// Starts from a single d20.
	fn default() -> Self {
		Self {
			quantity: 1,
			sides: 20,
			policy: Policy::Sum,
			modifiers: Vec::new(),
		}
	}
}

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn quantity(mut self, quantity: u32) -> Self {
		self.quantity = quantity;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u32) -> Self {
		self.sides = sides;
		self
	}

	/// Sets the aggregation policy.
	#[must_use]
	pub const fn policy(mut self, policy: Policy) -> Self {
		self.policy = policy;
		self
	}

	/// Takes the highest face.
	#[must_use]
	pub const fn advantage(self) -> Self {
		self.policy(Policy::Advantage)
	}

	/// Takes the lowest face.
	#[must_use]
	pub const fn disadvantage(self) -> Self {
		self.policy(Policy::Disadvantage)
	}

	/// Sums only the highest `keep` faces.
	#[must_use]
	pub const fn keep_highest(self, keep: u32) -> Self {
		self.policy(Policy::KeepHighest(keep))
	}

	/// Appends a modifier.
	#[must_use]
	pub fn modifier(mut self, modifier: Modifier) -> Self {
		self.modifiers.push(modifier);
		self
	}

	/// Appends several modifiers.
	#[must_use]
	pub fn modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
		self.modifiers.extend(modifiers);
		self
	}

	/// Validates and finalizes the dice.
	///
	/// # Errors
	/// If the quantity is zero or above [`MAX_QUANTITY`], the number of sides is zero, or a modifier divides by
	/// zero, an error variant is returned.
	pub fn build(self) -> Result<Dice, Error> {
		if self.quantity == 0 {
			return Err(Error::NoDice);
		}
		if self.quantity > MAX_QUANTITY {
			return Err(Error::QuantityExceeded {
				quantity: self.quantity,
			});
		}
		if self.sides == 0 {
			return Err(Error::NoSides);
		}
		if self.modifiers.iter().any(|m| m.op == Operator::Div && m.operand == 0) {
			return Err(Error::DivisionByZero);
		}

		Ok(Dice {
			quantity: self.quantity,
			sides: self.sides,
			policy: self.policy,
			modifiers: self.modifiers,
		})
	}
}
