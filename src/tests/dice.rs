use crate::dice::{
	roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Roller, Val as ValRoller},
	Dice, Error, Modifier, Operator, Policy, Rolled, MAX_QUANTITY,
};

#[test]
fn single_d20() {
	let dice = Dice::new(1, 20).unwrap();
	let rolled = rolls_in_range(&dice);
	assert_eq!(rolled.faces().len(), 1);
	assert_eq!(rolled.dice(), &dice);
}

#[test]
fn double_d8() {
	let dice = Dice::new(2, 8).unwrap();
	let rolled = rolls_in_range(&dice);
	assert_eq!(rolled.faces().len(), 2);
}

#[test]
fn max_dice() {
	let dice = Dice::new(MAX_QUANTITY, 100).unwrap();
	let rolled = rolls_in_range(&dice);
	assert_eq!(rolled.faces().len(), MAX_QUANTITY as usize);
}

#[test]
fn quantity_cap() {
	assert!(Dice::new(1000, 6).is_ok());
	assert_eq!(Dice::new(1001, 6), Err(Error::QuantityExceeded { quantity: 1001 }));
	assert_eq!(
		Dice::new(1001, 6).unwrap_err().to_string(),
		"Maximum quantity exceeded (1001 > 1000)"
	);
}

#[test]
fn invalid_dice() {
	assert_eq!(Dice::new(0, 6), Err(Error::NoDice));
	assert_eq!(Dice::new(1, 0), Err(Error::NoSides));
	assert_eq!(
		Dice::builder()
			.sides(6)
			.modifier(Modifier::new(Operator::Div, 0))
			.build(),
		Err(Error::DivisionByZero)
	);
}

#[test]
fn all_dice_sides_occur() {
	let dice = Dice::new(MAX_QUANTITY, 20).unwrap();
	let mut roller = FastRandRoller::with_seed(0xd1ce);
	let mut faces = Vec::new();

	for _ in 0..10 {
		faces.extend_from_slice(roller.roll(&dice).faces());
	}

	assert!(faces.iter().all(|face| (1..=20).contains(face)));
	for side in 1..=20 {
		assert!(faces.contains(&side));
	}
}

#[test]
fn advantage_promotes_single_die() {
	let dice = Dice::builder().sides(20).advantage().build().unwrap();
	assert_eq!(dice.quantity(), 1);
	assert_eq!(dice.effective_quantity(), 2);

	let rolled = IterRoller::new([4, 17]).roll(&dice);
	assert_eq!(rolled.faces(), &[4, 17]);
	assert_eq!(rolled.total(), 17.0);
}

#[test]
fn disadvantage_promotes_single_die() {
	let dice = Dice::builder().sides(20).disadvantage().build().unwrap();
	assert_eq!(dice.effective_quantity(), 2);

	let rolled = IterRoller::new([4, 17]).roll(&dice);
	assert_eq!(rolled.faces().len(), 2);
	assert_eq!(rolled.total(), 4.0);
}

#[test]
fn advantage_on_several_dice_keeps_quantity() {
	let dice = Dice::builder().quantity(3).sides(6).advantage().build().unwrap();
	assert_eq!(dice.effective_quantity(), 3);

	let rolled = IterRoller::new([2, 6, 3]).roll(&dice);
	assert_eq!(rolled.total(), 6.0);
}

#[test]
fn keep_highest_over_permutations() {
	let dice = Dice::builder().quantity(4).sides(6).keep_highest(3).build().unwrap();
	let faces = [1, 4, 4, 6];

	for perm in permutations(&faces) {
		let rolled = Rolled::from_dice_and_faces(&dice, perm.clone());
		assert_eq!(rolled.total(), 14.0, "faces {perm:?}");
		assert_eq!(rolled.faces(), perm.as_slice());
	}
}

#[test]
fn keep_zero_and_keep_all() {
	let none = Dice::builder().quantity(3).sides(6).keep_highest(0).build().unwrap();
	assert_eq!(Rolled::from_dice_and_faces(&none, vec![2, 3, 4]).total(), 0.0);

	let all = Dice::builder().quantity(3).sides(6).keep_highest(5).build().unwrap();
	assert_eq!(Rolled::from_dice_and_faces(&all, vec![2, 3, 4]).total(), 9.0);
}

#[test]
fn modifiers_fold_in_order() {
	let dice = Dice::builder()
		.quantity(2)
		.sides(6)
		.modifier(Modifier::new(Operator::Add, 2))
		.modifier(Modifier::new(Operator::Mul, 3))
		.modifier(Modifier::new(Operator::Div, 4))
		.build()
		.unwrap();

	let rolled = IterRoller::new([3, 5]).roll(&dice);
	assert_eq!(rolled.total(), 7.5);
}

#[test]
fn scenario_plain_sum() {
	let dice = Dice::new(2, 6).unwrap();
	let rolled = IterRoller::new([3, 5]).roll(&dice);
	assert_eq!(rolled.total(), 8.0);
}

#[test]
fn scenario_modifier() {
	let dice = Dice::builder()
		.sides(4)
		.modifier(Modifier::new(Operator::Add, 2))
		.build()
		.unwrap();
	let rolled = IterRoller::new([3]).roll(&dice);
	assert_eq!(rolled.total(), 5.0);
}

#[test]
fn deterministic_with_same_seed() {
	let dice = Dice::new(50, 12).unwrap();
	let first = FastRandRoller::with_seed(42).roll(&dice);
	let second = FastRandRoller::with_seed(42).roll(&dice);
	assert_eq!(first.faces(), second.faces());
	assert_eq!(first.total(), second.total());
}

#[test]
fn reads_never_reroll() {
	let dice = Dice::new(8, 10).unwrap();
	let rolled = FastRandRoller::default().roll(&dice);

	let total = rolled.total();
	let faces = rolled.faces().to_vec();
	assert_eq!(rolled.faces(), faces.as_slice());
	assert_eq!(rolled.total(), total);
	assert_eq!(rolled.results_csv(), rolled.results_csv());
}

#[test]
fn max_roller() {
	let dice = Dice::new(3, 8).unwrap();
	assert_eq!(MaxRoller.roll(&dice).total(), 24.0);
}

#[test]
fn val_roller_through_reference() {
	let dice = Dice::new(2, 8).unwrap();
	let mut roller = ValRoller(5);
	let by_ref = &mut roller;
	assert_eq!(by_ref.roll(&dice).faces(), &[5, 5]);
}

#[test]
fn deterministic_dice() {
	assert!(Dice::new(10, 1).unwrap().is_deterministic());
	assert!(!Dice::new(1, 2).unwrap().is_deterministic());
}

#[test]
fn notation_and_dice_str() {
	let dice = Dice::builder()
		.quantity(4)
		.sides(8)
		.keep_highest(3)
		.modifier(Modifier::new(Operator::Sub, 2))
		.build()
		.unwrap();
	assert_eq!(dice.notation(), "4d8 keep 3 - 2");
	assert_eq!(dice.to_string(), dice.notation());
	assert_eq!(dice.dice_str(), "4d8");

	let dice = Dice::builder().sides(20).disadvantage().build().unwrap();
	assert_eq!(dice.notation(), "d20d");
	assert_eq!(dice.dice_str(), "2d20");
	assert_eq!(dice.keep(), None);
	assert!(dice.disadvantage());
	assert!(!dice.advantage());
}

#[test]
fn policy_from_lean() {
	assert_eq!(Policy::from_lean(0), Policy::Sum);
	assert_eq!(Policy::from_lean(2), Policy::Advantage);
	assert_eq!(Policy::from_lean(-1), Policy::Disadvantage);
}

#[test]
fn rolled_into_owned() {
	let rolled = {
		let dice = Dice::new(2, 6).unwrap();
		IterRoller::new([1, 2]).roll(&dice).into_owned()
	};
	assert_eq!(rolled.faces(), &[1, 2]);
	assert_eq!(rolled.dice_str(), "2d6");
}

fn rolls_in_range(dice: &Dice) -> Rolled<'_> {
	let rolled = FastRandRoller::default().roll(dice);
	assert!(rolled
		.faces()
		.iter()
		.all(|face| (1..=dice.sides()).contains(face)));
	rolled
}

fn permutations(faces: &[u32]) -> Vec<Vec<u32>> {
	if faces.len() <= 1 {
		return vec![faces.to_vec()];
	}

	let mut perms = Vec::new();
	for idx in 0..faces.len() {
		let mut rest = faces.to_vec();
		let face = rest.remove(idx);
		for mut perm in permutations(&rest) {
			perm.insert(0, face);
			perms.push(perm);
		}
	}
	perms
}
