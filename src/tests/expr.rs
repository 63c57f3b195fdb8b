use crate::{
	dice::{
		roller::{FastRand as FastRandRoller, Iter as IterRoller, Val as ValRoller},
		Dice, Modifier, Operator,
	},
	expr::{CalcError, Expr, Term},
};

#[test]
fn empty_line_totals_zero() {
	let expr = Expr::default();
	assert!(expr.is_empty());
	assert_eq!(expr.roll(&mut ValRoller(1)).grand_total(), Ok(0.0));
}

#[test]
fn single_term() {
	let expr = line(&[(Operator::Add, plain(2, 6))]);
	let evaled = expr.roll(&mut IterRoller::new([3, 5]));
	assert_eq!(evaled.grand_total(), Ok(8.0));
}

#[test]
fn first_operator_is_ignored() {
	let expr = line(&[(Operator::Mul, plain(1, 6))]);
	assert_eq!(expr.roll(&mut ValRoller(4)).grand_total(), Ok(4.0));
}

#[test]
fn left_fold() {
	let expr = line(&[
		(Operator::Add, plain(1, 6)),
		(Operator::Add, plain(1, 6)),
		(Operator::Mul, plain(1, 6)),
		(Operator::Sub, plain(1, 6)),
		(Operator::Div, plain(1, 6)),
	]);
	let evaled = expr.roll(&mut IterRoller::new([2, 3, 4, 5, 3]));
	// ((((2 + 3) * 4) - 5) / 3)
	assert_eq!(evaled.grand_total(), Ok(5.0));
}

#[test]
fn true_division() {
	let expr = line(&[(Operator::Add, plain(1, 10)), (Operator::Div, plain(1, 10))]);
	let evaled = expr.roll(&mut IterRoller::new([7, 2]));
	assert_eq!(evaled.grand_total(), Ok(3.5));
}

#[test]
fn division_by_zero_total() {
	let zeroed = Dice::builder()
		.sides(6)
		.modifier(Modifier::new(Operator::Mul, 0))
		.build()
		.unwrap();
	let expr = line(&[(Operator::Add, plain(1, 6)), (Operator::Div, zeroed)]);
	let evaled = expr.roll(&mut ValRoller(3));
	assert_eq!(
		evaled.grand_total(),
		Err(CalcError::DivisionByZero("d6 * 0".to_owned()))
	);
}

#[test]
fn rolls_follow_term_order() {
	let expr = line(&[(Operator::Add, plain(2, 4)), (Operator::Sub, plain(1, 8))]);
	let evaled = expr.roll(&mut IterRoller::new([1, 2, 7]));
	let faces = evaled.rolls().map(|rolled| rolled.faces().to_vec()).collect::<Vec<_>>();
	assert_eq!(faces, vec![vec![1, 2], vec![7]]);
	assert_eq!(evaled.grand_total(), Ok(-4.0));
}

#[test]
fn independent_copies() {
	let dice = plain(1, 1000);
	let expr = line(&[(Operator::Add, dice.clone()), (Operator::Add, dice)]);
	let evaled = expr.roll(&mut FastRandRoller::with_seed(7));
	assert_eq!(evaled.terms.len(), 2);
	assert!(evaled.rolls().all(|rolled| rolled.faces().len() == 1));
}

#[test]
fn into_owned_outlives_expr() {
	let evaled = {
		let expr = line(&[(Operator::Add, plain(3, 6))]);
		expr.roll(&mut ValRoller(2)).into_owned()
	};
	assert_eq!(evaled.grand_total(), Ok(6.0));
}

#[test]
fn deterministic() {
	assert!(line(&[(Operator::Add, plain(4, 1)), (Operator::Sub, plain(2, 1))]).is_deterministic());
	assert!(!line(&[(Operator::Add, plain(4, 1)), (Operator::Sub, plain(2, 6))]).is_deterministic());
}

#[test]
fn display() {
	let expr = line(&[(Operator::Add, plain(2, 6)), (Operator::Div, plain(1, 4))]);
	assert_eq!(expr.to_string(), "2d6 / d4");
}

fn plain(quantity: u32, sides: u32) -> Dice {
	Dice::new(quantity, sides).unwrap()
}

fn line(terms: &[(Operator, Dice)]) -> Expr {
	Expr {
		terms: terms
			.iter()
			.map(|(op, dice)| Term {
				op: *op,
				dice: dice.clone(),
			})
			.collect(),
	}
}
