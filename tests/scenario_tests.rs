//! Scenario tests
//!
//! Concrete groups with hand computed balances. Every scenario also checks that the
//! balances net to zero and that the planned transfers cover all debt.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use split_core::*;

fn name(raw: &str) -> ParticipantName {
    ParticipantName::new_unchecked(raw)
}

fn entry(payers: &[(&str, Decimal)], split: &[&str]) -> ExpenseEntry {
    let amount = payers.iter().map(|(_, a)| *a).sum();
    ExpenseEntry::new(
        "expense",
        amount,
        payers.iter().map(|(n, a)| PaymentShare::new(name(n), *a)).collect(),
        split.iter().map(|s| name(s)).collect(),
    )
}

fn assert_close(actual: Option<Decimal>, expected: Decimal, tolerance: Decimal) {
    let actual = actual.expect("participant missing from balances");
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} within {tolerance}, got {actual}"
    );
}

fn assert_consistent(sheet: &BalanceSheet, plan: &[Transaction]) {
    assert!(sheet.residual().abs() <= dec!(0.01), "balances sum to {}", sheet.residual());
    let moved = total_transferred(plan);
    let debt = total_debt(&sheet.balances);
    assert!((moved - debt).abs() <= dec!(0.01), "moved {moved}, debt {debt}");

    for tx in plan {
        assert_ne!(tx.from, tx.to);
        assert!(sheet.balances.get(tx.from.as_str()).unwrap() < dec!(-0.01));
        assert!(sheet.balances.get(tx.to.as_str()).unwrap() > dec!(0.01));
    }
}

fn run(names: &[&str], entries: &[ExpenseEntry]) -> (BalanceSheet, Vec<Transaction>) {
    let group = ParticipantSet::from_names(names);
    let sheet = compute_balances(&group, entries).unwrap();
    let plan = plan_settlement(&sheet.balances);
    assert_consistent(&sheet, &plan);
    (sheet, plan)
}

mod basic_groups {
    use super::*;

    #[test]
    fn one_payer_three_way() {
        let (sheet, plan) = run(
            &["Alice", "Bob", "Charlie"],
            &[entry(&[("Alice", dec!(90))], &["Alice", "Bob", "Charlie"])],
        );
        assert_eq!(sheet.balances.get("Alice"), Some(dec!(60)));
        assert_eq!(sheet.balances.get("Bob"), Some(dec!(-30)));
        assert_eq!(sheet.balances.get("Charlie"), Some(dec!(-30)));
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn hundred_over_three() {
        let (sheet, _) = run(&["A", "B", "C"], &[entry(&[("A", dec!(100))], &["A", "B", "C"])]);
        assert_close(sheet.balances.get("A"), dec!(66.67), dec!(0.02));
        assert_close(sheet.balances.get("B"), dec!(-33.33), dec!(0.01));
        assert_close(sheet.balances.get("C"), dec!(-33.33), dec!(0.01));
    }

    #[test]
    fn offsetting_payments_need_no_transfers() {
        let (sheet, plan) = run(
            &["A", "B"],
            &[entry(&[("A", dec!(50))], &["A", "B"]), entry(&[("B", dec!(50))], &["A", "B"])],
        );
        assert_eq!(sheet.balances.get("A"), Some(Decimal::ZERO));
        assert_eq!(sheet.balances.get("B"), Some(Decimal::ZERO));
        assert!(plan.is_empty());
    }

    #[test]
    fn twenty_people_one_payer() {
        let names: Vec<String> = (1..=20).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let (sheet, plan) = run(&refs, &[entry(&[("P1", dec!(500))], &refs)]);

        assert_eq!(sheet.balances.get("P1"), Some(dec!(475)));
        for other in &refs[1..] {
            assert_eq!(sheet.balances.get(other), Some(dec!(-25)));
        }
        assert_eq!(plan.len(), 19);
    }

    #[test]
    fn seven_people_rounding_corrected() {
        let refs = ["P1", "P2", "P3", "P4", "P5", "P6", "P7"];
        let (sheet, _) = run(&refs, &[entry(&[("P1", dec!(100))], &refs)]);

        assert_eq!(sheet.balances.get("P1"), Some(dec!(85.74)));
        for other in &refs[1..] {
            assert_eq!(sheet.balances.get(other), Some(dec!(-14.29)));
        }
        assert_eq!(sheet.residual(), Decimal::ZERO);
    }
}

mod multi_payer {
    use super::*;

    #[test]
    fn food_and_drinks() {
        let (sheet, _) = run(
            &["Januda", "Bethmin", "Vinuki", "Vinumi"],
            &[
                entry(
                    &[("Januda", dec!(50)), ("Bethmin", dec!(50))],
                    &["Januda", "Bethmin", "Vinuki", "Vinumi"],
                ),
                entry(&[("Vinuki", dec!(150)), ("Vinumi", dec!(50))], &["Bethmin", "Vinuki", "Vinumi"]),
            ],
        );
        assert_close(sheet.balances.get("Januda"), dec!(25), dec!(0.02));
        assert_close(sheet.balances.get("Bethmin"), dec!(-41.67), dec!(0.02));
        assert_close(sheet.balances.get("Vinuki"), dec!(58.33), dec!(0.02));
        assert_close(sheet.balances.get("Vinumi"), dec!(-41.67), dec!(0.02));
    }

    #[test]
    fn five_people_partial_splits() {
        let (sheet, _) = run(
            &["A", "B", "C", "D", "E"],
            &[
                entry(&[("A", dec!(100)), ("B", dec!(50))], &["A", "B", "C", "D", "E"]),
                entry(&[("C", dec!(40))], &["A", "C"]),
                entry(&[("D", dec!(30)), ("E", dec!(30))], &["B", "C", "D", "E"]),
            ],
        );
        assert_eq!(sheet.balances.get("A"), Some(dec!(50)));
        assert_eq!(sheet.balances.get("B"), Some(dec!(5)));
        assert_eq!(sheet.balances.get("C"), Some(dec!(-25)));
        assert_eq!(sheet.balances.get("D"), Some(dec!(-15)));
        assert_eq!(sheet.balances.get("E"), Some(dec!(-15)));
        assert_eq!(sheet.total_spent, dec!(250));
    }

    #[test]
    fn three_payers_one_expense() {
        let (sheet, plan) = run(
            &["A", "B", "C", "D"],
            &[entry(&[("A", dec!(40)), ("B", dec!(35)), ("C", dec!(25))], &["A", "B", "C", "D"])],
        );
        assert_eq!(sheet.balances.get("A"), Some(dec!(15)));
        assert_eq!(sheet.balances.get("B"), Some(dec!(10)));
        assert_eq!(sheet.balances.get("C"), Some(dec!(0)));
        assert_eq!(sheet.balances.get("D"), Some(dec!(-25)));
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn everyone_pays_the_same() {
        let all = ["A", "B", "C"];
        let (_, plan) = run(
            &all,
            &[
                entry(&[("A", dec!(90))], &all),
                entry(&[("B", dec!(90))], &all),
                entry(&[("C", dec!(90))], &all),
            ],
        );
        assert!(plan.is_empty());
    }
}

mod edge_cases {
    use super::*;

    #[test]
    fn paying_for_yourself_is_settled() {
        let (sheet, plan) = run(&["Alice"], &[entry(&[("Alice", dec!(50))], &["Alice"])]);
        assert_eq!(sheet.balances.get("Alice"), Some(Decimal::ZERO));
        assert!(plan.is_empty());
    }

    #[test]
    fn zero_amount_entry_changes_nothing() {
        let (sheet, plan) = run(&["A", "B"], &[entry(&[("A", dec!(0))], &["A", "B"])]);
        assert!(sheet.balances.iter().all(|(_, b)| b.is_zero()));
        assert!(plan.is_empty());
    }

    #[test]
    fn circular_gifts() {
        let (sheet, plan) = run(
            &["A", "B", "C"],
            &[
                entry(&[("A", dec!(60))], &["B"]),
                entry(&[("B", dec!(90))], &["C"]),
                entry(&[("C", dec!(30))], &["A"]),
            ],
        );
        assert_eq!(sheet.balances.get("A"), Some(dec!(30)));
        assert_eq!(sheet.balances.get("B"), Some(dec!(30)));
        assert_eq!(sheet.balances.get("C"), Some(dec!(-60)));
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn repeated_small_debts_consolidate() {
        let entries: Vec<ExpenseEntry> = (0..5).map(|_| entry(&[("A", dec!(10))], &["B"])).collect();
        let (sheet, plan) = run(&["A", "B"], &entries);

        assert_eq!(sheet.total_spent, dec!(50));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].amount, dec!(50));
        assert_eq!(plan[0].from, "B");
    }

    #[test]
    fn uninvolved_participant_stays_at_zero() {
        let (sheet, plan) = run(&["A", "B", "C"], &[entry(&[("A", dec!(75))], &["C"])]);
        assert_eq!(sheet.balances.get("B"), Some(Decimal::ZERO));
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn very_large_amount() {
        let (sheet, _) = run(&["A", "B", "C"], &[entry(&[("A", dec!(999999.99))], &["A", "B", "C"])]);
        assert_close(sheet.balances.get("A"), dec!(666666.66), dec!(0.02));
        assert_close(sheet.balances.get("B"), dec!(-333333.33), dec!(0.01));
    }

    #[test]
    fn overpayment_leaves_residual_visible() {
        let group = ParticipantSet::from_names(["A", "B", "C"]);
        let sheet = compute_balances(
            &group,
            &[entry(&[("A", dec!(60)), ("B", dec!(60))], &["A", "B", "C"])
                .with_amount(dec!(100))],
        )
        .unwrap();

        assert!(sheet.correction.is_none());
        assert!(sheet.residual() > dec!(1));
        assert!(sheet.balances.get("C").unwrap() < Decimal::ZERO);
    }

    #[test]
    fn legacy_and_multi_payer_agree() {
        let group = ParticipantSet::from_names(["Alice", "Bob"]);
        let legacy = ExpenseEntry::legacy("Taxi", name("Alice"), dec!(80), vec![name("Alice"), name("Bob")]);
        let multi = entry(&[("Alice", dec!(80))], &["Alice", "Bob"]);

        let a = compute_balances(&group, &[legacy]).unwrap();
        let b = compute_balances(&group, &[multi]).unwrap();
        assert_eq!(a.balances, b.balances);
    }

    #[test]
    fn computation_is_idempotent() {
        let group = ParticipantSet::from_names(["A", "B", "C"]);
        let entries = [entry(&[("A", dec!(100))], &["A", "B", "C"])];
        assert_eq!(
            compute_balances(&group, &entries).unwrap(),
            compute_balances(&group, &entries).unwrap()
        );
    }
}

trait WithAmount {
    fn with_amount(self, amount: Decimal) -> Self;
}

impl WithAmount for ExpenseEntry {
    fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }
}
