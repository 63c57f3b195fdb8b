//! Aggregation of historical rolls into per-die statistics.
//!
//! The engine never stores rolls itself. Callers persist one [`HistoricalRoll`] per rolled set of dice and hand
//! them back here to summarize how lucky someone has been.

use std::fmt;

use crate::dice::Rolled;

/// Die sizes that are reported individually. Everything else only counts towards [`Summary::other`].
pub const COMMON_SIDES: [u32; 6] = [4, 6, 8, 10, 12, 20];

/// Persisted record of one rolled set of dice
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Mirrors the persisted row")]
pub struct HistoricalRoll {
	/// Dice in `{quantity}d{sides}` form
	pub dice: String,

	/// Comma-joined faces
	pub results: String,

	/// Who rolled
	pub user_id: u64,

	/// Where it was rolled
	pub server_id: u64,
}

impl HistoricalRoll {
	/// Creates the record for a rolled set of dice.
	#[must_use]
	pub fn from_rolled(rolled: &Rolled<'_>, user_id: u64, server_id: u64) -> Self {
		Self {
			dice: rolled.dice_str(),
			results: rolled.results_csv(),
			user_id,
			server_id,
		}
	}
}

/// Statistics for a single die size
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Bucket {
	/// Number of sides
	pub sides: u32,

	/// Number of faces rolled
	pub count: usize,

	/// Sum of all faces rolled
	pub sum: u64,
}

impl Bucket {
	/// Creates an empty bucket.
	#[must_use]
	pub const fn new(sides: u32) -> Self {
		Self { sides, count: 0, sum: 0 }
	}

	/// Mean face, or zero when nothing was rolled
	#[must_use]
	#[expect(clippy::cast_precision_loss, reason = "Counts and sums are far below 2^52")]
	pub fn average(&self) -> f64 {
		if self.count == 0 {
			0.0
		} else {
			self.sum as f64 / self.count as f64
		}
	}

	/// Mean face of a fair die of this size
	#[must_use]
	pub fn expected(&self) -> f64 {
		(f64::from(self.sides) + 1.0) / 2.0
	}

	/// Mean face rounded to one decimal place, with ties going to the even digit
	#[must_use]
	pub fn rounded_average(&self) -> f64 {
		round_tenths(self.average())
	}

	/// How far the rounded mean is from a fair die's, or zero when nothing was rolled. The delta is taken from
	/// [`Self::rounded_average()`], so it always matches the average that is displayed.
	#[must_use]
	pub fn delta(&self) -> f64 {
		if self.count == 0 {
			0.0
		} else {
			self.rounded_average() - self.expected()
		}
	}

	/// Renders the delta with an explicit sign and one decimal place, or `avg` when it rounds to zero.
	///
	/// # Examples
	/// ```
	/// use fortuna::stats::aggregate;
	///
	/// let summary = aggregate([("2d6", "6,6"), ("1d20", "10,11")]);
	/// assert_eq!(summary.bucket(6).map(|b| b.delta_string()).as_deref(), Some("+2.5"));
	/// assert_eq!(summary.bucket(20).map(|b| b.delta_string()).as_deref(), Some("avg"));
	/// assert_eq!(summary.bucket(4).map(|b| b.delta_string()).as_deref(), Some("avg"));
	/// ```
	#[must_use]
	pub fn delta_string(&self) -> String {
		let delta = round_tenths(self.delta());
		if delta == 0.0 {
			"avg".to_owned()
		} else {
			format!("{delta:+.1}")
		}
	}
}

impl fmt::Display for Bucket {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"d{} ({} rolled): {:.1} ({})",
			self.sides,
			self.count,
			self.rounded_average(),
			self.delta_string()
		)
	}
}

/// Statistics over a set of historical rolls
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Summary {
	/// One bucket per entry of [`COMMON_SIDES`], in the same order
	pub buckets: Vec<Bucket>,

	/// Number of faces rolled on any other die size
	pub other: usize,
}

impl Summary {
	/// Gets the bucket for a common die size.
	#[must_use]
	pub fn bucket(&self, sides: u32) -> Option<&Bucket> {
		self.buckets.iter().find(|bucket| bucket.sides == sides)
	}
}

impl fmt::Display for Summary {
	/// Writes one line per common die size followed by the count of other dice.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for bucket in &self.buckets {
			writeln!(f, "{bucket}")?;
		}
		write!(f, "{} other die rolled.", self.other)
	}
}

/// Rounds to one decimal place, with ties going to the even digit.
fn round_tenths(value: f64) -> f64 {
	(value * 10.0).round_ties_even() / 10.0
}

/// Parses one persisted record into its die size and faces.
fn parse_record(dice: &str, results: &str) -> Option<(u32, Vec<u32>)> {
	let (_, sides) = dice.trim().split_once('d')?;
	let sides = sides.parse().ok()?;
	let faces = results
		.split(',')
		.map(|face| face.trim().parse().ok())
		.collect::<Option<Vec<u32>>>()?;
	Some((sides, faces))
}

/// Aggregates `(dice, results)` pairs (as persisted from [`Rolled::dice_str()`] and [`Rolled::results_csv()`]) into
/// a [`Summary`]. Records that can't be read are skipped.
///
/// # Examples
/// ```
/// use fortuna::stats::aggregate;
///
/// let summary = aggregate([("2d6", "3,5"), ("1d6", "1"), ("1d100", "42"), ("3d7", "1,2,3")]);
/// let d6 = summary.bucket(6).unwrap();
/// assert_eq!(d6.count, 3);
/// assert_eq!(d6.average(), 3.0);
/// assert_eq!(summary.other, 4);
/// ```
pub fn aggregate<'a>(records: impl IntoIterator<Item = (&'a str, &'a str)>) -> Summary {
	let mut buckets = COMMON_SIDES.map(Bucket::new).to_vec();
	let mut other = 0_usize;

	for (dice, results) in records {
		let Some((sides, faces)) = parse_record(dice, results) else {
			tracing::warn!(dice, results, "skipping malformed roll record");
			continue;
		};

		match buckets.iter_mut().find(|bucket| bucket.sides == sides) {
			Some(bucket) => {
				bucket.count = bucket.count.saturating_add(faces.len());
				bucket.sum = faces.iter().fold(bucket.sum, |sum, face| sum.saturating_add(u64::from(*face)));
			}
			None => other = other.saturating_add(faces.len()),
		}
	}

	Summary { buckets, other }
}

/// Aggregates persisted records. See [`aggregate()`].
pub fn aggregate_records<'a>(records: impl IntoIterator<Item = &'a HistoricalRoll>) -> Summary {
	aggregate(records.into_iter().map(|record| (record.dice.as_str(), record.results.as_str())))
}
