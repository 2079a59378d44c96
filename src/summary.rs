// 5.0: group summary. total spent, average share, who is owed and who owes.
// plain text rendering only, anything richer belongs to the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::balance::BalanceSheet;
use crate::config::{Currency, Tolerances};
use crate::types::{round2, ParticipantName, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum Standing {
    IsOwed(Decimal),
    Owes(Decimal),
    SettledUp,
}

impl Standing {
    pub fn from_balance(balance: Decimal, dust: Decimal) -> Self {
        if balance > dust {
            Standing::IsOwed(balance)
        } else if balance < -dust {
            Standing::Owes(-balance)
        } else {
            Standing::SettledUp
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStanding {
    pub name: ParticipantName,
    pub balance: Decimal,
    pub standing: Standing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub currency: Currency,
    pub total_spent: Decimal,
    pub average_share: Decimal,
    pub standings: Vec<ParticipantStanding>,
    pub transactions: Vec<Transaction>,
}

impl Summary {
    pub fn new(
        sheet: &BalanceSheet,
        transactions: Vec<Transaction>,
        currency: Currency,
        tolerances: &Tolerances,
    ) -> Self {
        let headcount = sheet.balances.len();
        let average_share = if headcount == 0 {
            Decimal::ZERO
        } else {
            sheet.total_spent / Decimal::from(headcount)
        };

        let standings = sheet
            .balances
            .iter()
            .map(|(name, balance)| ParticipantStanding {
                name: name.clone(),
                balance,
                standing: Standing::from_balance(balance, tolerances.dust),
            })
            .collect();

        Self {
            currency,
            total_spent: sheet.total_spent,
            average_share,
            standings,
            transactions,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.transactions.is_empty()
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency.symbol(), round2(amount))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total spent: {}", self.money(self.total_spent))?;
        writeln!(f, "Average share: {}", self.money(self.average_share))?;

        for s in &self.standings {
            match s.standing {
                Standing::IsOwed(amount) => writeln!(f, "{} is owed {}", s.name, self.money(amount))?,
                Standing::Owes(amount) => writeln!(f, "{} owes {}", s.name, self.money(amount))?,
                Standing::SettledUp => writeln!(f, "{} is settled up", s.name)?,
            }
        }

        if self.is_settled() {
            return writeln!(f, "Everyone is settled up!");
        }
        for tx in &self.transactions {
            writeln!(f, "{} needs to pay {}: {}", tx.from, tx.to, self.money(tx.amount))?;
        }
        Ok(())
    }
}
