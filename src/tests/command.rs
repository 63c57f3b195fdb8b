use crate::{
	command::{resolve_command, Command, Error, StatsRequest},
	dice::roller::{FastRand as FastRandRoller, Iter as IterRoller, Val as ValRoller},
	expr::CalcError,
	parse,
};

#[test]
fn routes_stats_keywords() {
	assert_eq!(Command::route("stats"), Ok(Command::Stats(StatsRequest::Personal)));
	assert_eq!(
		Command::route("Campaign  Stats"),
		Ok(Command::Stats(StatsRequest::Campaign))
	);
	assert_eq!(Command::route("reset stats"), Ok(Command::Stats(StatsRequest::Reset)));
	assert_eq!(
		Command::route(" reset server stats\n"),
		Ok(Command::Stats(StatsRequest::ResetServer))
	);
}

#[test]
fn routes_unknown_stats() {
	assert_eq!(
		Command::route("server stats"),
		Err(Error::UnknownStats("server stats".to_owned()))
	);
}

#[test]
fn routes_rolls() {
	assert_eq!(Command::route(" 4D6K3 "), Ok(Command::Roll("4d6k3".to_owned())));
}

#[test]
fn scenario_sum() {
	let rendered = resolve_command("2d6", &mut IterRoller::new([3, 5])).unwrap();
	assert_eq!(rendered.text, "2d6\tRolls: 3, 5 \tTotal: 8");
	assert_eq!(rendered.grand_total, 8.0);
	assert_eq!(rendered.title, "rolled some dice:");
}

#[test]
fn scenario_advantage() {
	let rendered = resolve_command("d20a", &mut IterRoller::new([4, 17])).unwrap();
	assert_eq!(rendered.grand_total, 17.0);
	assert_eq!(rendered.rolls().next().map(|rolled| rolled.faces().len()), Some(2));
}

#[test]
fn scenario_keep() {
	let rendered = resolve_command("4d6k3", &mut IterRoller::new([1, 4, 4, 6])).unwrap();
	assert_eq!(rendered.grand_total, 14.0);
}

#[test]
fn scenario_modifier() {
	let rendered = resolve_command("1d4+2", &mut IterRoller::new([3])).unwrap();
	assert_eq!(rendered.grand_total, 5.0);
	assert_eq!(rendered.text, "d4 + 2\tRoll: 3\tTotal: 5");
	assert_eq!(rendered.title_for("Alex"), "Alex rolled a die:");
}

#[test]
fn scenario_repeat() {
	let rendered = resolve_command("2 1d6", &mut IterRoller::new([2, 6])).unwrap();
	assert_eq!(rendered.evaled.terms.len(), 2);
	assert_eq!(rendered.grand_total, 8.0);
	assert_eq!(rendered.text, "d6\tRoll: 2\nd6\tRoll: 6\nGrand Total: 8");
	assert_eq!(rendered.title, "rolled `2 1d6`");
}

#[test]
fn scenario_bad_input() {
	let err = resolve_command("xyz", &mut ValRoller(1)).unwrap_err();
	assert!(matches!(
		err,
		Error::Parse(parse::Error::Unexpected { found: Some('x'), .. })
	));
	assert!(err.to_string().contains("'x'"));
}

#[test]
fn empty_input() {
	assert_eq!(resolve_command("   ", &mut ValRoller(1)), Err(Error::Empty));
}

#[test]
fn division_by_zero() {
	let err = resolve_command("d6 / d6 - 1", &mut ValRoller(1)).unwrap_err();
	assert_eq!(err, Error::Calc(CalcError::DivisionByZero("d6 - 1".to_owned())));
}

#[test]
fn records_for_persistence() {
	let rendered = resolve_command("d20a + 2d6", &mut IterRoller::new([4, 17, 1, 2])).unwrap();
	let records = rendered.records(10, 20);
	assert_eq!(records.len(), 2);
	assert_eq!(records[0].dice, "2d20");
	assert_eq!(records[0].results, "4,17");
	assert_eq!(records[1].dice, "2d6");
	assert_eq!(records[1].results, "1,2");
	assert!(records.iter().all(|record| record.user_id == 10 && record.server_id == 20));
}

#[test]
fn random_rolls_stay_in_range() {
	let mut roller = FastRandRoller::with_seed(1234);
	for _ in 0..100 {
		let rendered = resolve_command("3 4d6k3 + d20a - 1d8", &mut roller).unwrap();
		assert_eq!(rendered.evaled.terms.len(), 5);
		for rolled in rendered.rolls() {
			let sides = rolled.dice().sides();
			assert!(rolled.faces().iter().all(|face| (1..=sides).contains(face)));
		}
	}
}
