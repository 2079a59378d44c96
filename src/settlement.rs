// 4.0 settlement.rs: turn net balances into point to point transfers.
// greedy two cursor matching over debtors and creditors in group order. this is not a
// minimum transfer count optimum, it never tries subset matching.

use rust_decimal::Decimal;

use crate::config::Tolerances;
use crate::types::{round2, AmountMap, ParticipantName, Transaction};

// one side of the matching with whatever is still outstanding
#[derive(Debug, Clone)]
struct Outstanding {
    name: ParticipantName,
    amount: Decimal,
}

pub fn plan_settlement(balances: &AmountMap) -> Vec<Transaction> {
    plan_settlement_with(balances, &Tolerances::default())
}

pub fn plan_settlement_with(balances: &AmountMap, tolerances: &Tolerances) -> Vec<Transaction> {
    let dust = tolerances.dust;
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for (name, balance) in balances.iter() {
        if balance > dust {
            creditors.push(Outstanding { name: name.clone(), amount: balance });
        } else if balance < -dust {
            debtors.push(Outstanding { name: name.clone(), amount: -balance });
        }
    }

    let mut transactions = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let pay = debtor.amount.min(creditor.amount);

        tracing::debug!(from = %debtor.name, to = %creditor.name, amount = %pay, "Transfer planned");

        transactions.push(Transaction {
            from: debtor.name.clone(),
            to: creditor.name.clone(),
            amount: round2(pay),
        });

        debtor.amount -= pay;
        creditor.amount -= pay;

        if debtor.amount.abs() < dust {
            i += 1;
        }
        if creditor.amount.abs() < dust {
            j += 1;
        }
    }

    transactions
}

// sum of all transfer amounts
pub fn total_transferred(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(|t| t.amount).sum()
}

// sum of what debtors owe, i.e. what a complete plan has to move
pub fn total_debt(balances: &AmountMap) -> Decimal {
    balances
        .iter()
        .filter(|(_, b)| b.is_sign_negative())
        .map(|(_, b)| -b)
        .sum()
}

// Net position change per participant if every transfer is paid. applying this to the
// balances should leave everyone inside the dust band.
pub fn net_flows(transactions: &[Transaction]) -> AmountMap {
    let mut flows = AmountMap::new();

    for tx in transactions {
        // a payer's balance rises toward zero, a receiver's falls
        let from = flows.get(tx.from.as_str()).unwrap_or(Decimal::ZERO) + tx.amount;
        flows.insert(tx.from.clone(), from);
        let to = flows.get(tx.to.as_str()).unwrap_or(Decimal::ZERO) - tx.amount;
        flows.insert(tx.to.clone(), to);
    }

    flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balances(pairs: &[(&str, Decimal)]) -> AmountMap {
        pairs
            .iter()
            .map(|(n, b)| (ParticipantName::new_unchecked(n), *b))
            .collect()
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let b = balances(&[("Alice", dec!(60)), ("Bob", dec!(-30)), ("Charlie", dec!(-30))]);
        let plan = plan_settlement(&b);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].from, "Bob");
        assert_eq!(plan[0].to, "Alice");
        assert_eq!(plan[0].amount, dec!(30));
        assert_eq!(plan[1].from, "Charlie");
        assert_eq!(total_transferred(&plan), total_debt(&b));
    }

    #[test]
    fn test_both_cursors_advance_on_exact_match() {
        let b = balances(&[("A", dec!(10)), ("B", dec!(-10)), ("C", dec!(5)), ("D", dec!(-5))]);
        let plan = plan_settlement(&b);

        assert_eq!(plan.len(), 2);
        assert_eq!((plan[0].from.as_str(), plan[0].to.as_str()), ("B", "A"));
        assert_eq!((plan[1].from.as_str(), plan[1].to.as_str()), ("D", "C"));
    }

    #[test]
    fn test_debtor_split_across_creditors() {
        let b = balances(&[("A", dec!(15)), ("B", dec!(10)), ("C", dec!(0)), ("D", dec!(-25))]);
        let plan = plan_settlement(&b);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].amount, dec!(15));
        assert_eq!(plan[1].amount, dec!(10));
        assert!(plan.iter().all(|t| t.from == "D"));
    }

    #[test]
    fn test_dust_is_settled() {
        let b = balances(&[("A", dec!(0.01)), ("B", dec!(-0.01)), ("C", dec!(0))]);
        assert!(plan_settlement(&b).is_empty());
    }

    #[test]
    fn test_amounts_rounded_at_emission() {
        let b = balances(&[("A", dec!(66.67)), ("B", dec!(-33.335)), ("C", dec!(-33.335))]);
        let plan = plan_settlement(&b);
        assert_eq!(plan[0].amount, dec!(33.34));
    }

    #[test]
    fn test_net_flows_zero_out_balances() {
        let b = balances(&[("A", dec!(50)), ("B", dec!(5)), ("C", dec!(-25)), ("D", dec!(-15)), ("E", dec!(-15))]);
        let plan = plan_settlement(&b);
        let flows = net_flows(&plan);

        for (name, balance) in b.iter() {
            let after = balance + flows.get(name.as_str()).unwrap_or(Decimal::ZERO);
            assert!(after.abs() <= dec!(0.01), "{name} left with {after}");
        }
    }

    #[test]
    fn test_no_self_payment() {
        let b = balances(&[("A", dec!(20)), ("B", dec!(-20))]);
        let plan = plan_settlement(&b);
        assert!(plan.iter().all(|t| t.from != t.to));
    }
}
