// 2.0: expense entries. who paid what, and who shares the cost.
// two payer shapes exist in stored data: the legacy single `payer` and the `payers` list.
// both deserialize into one type and are normalized before any math runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::config::Tolerances;
use crate::types::{round2, ParticipantName, ParticipantSet};

// One payer's contribution to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentShare {
    pub name: ParticipantName,
    pub amount: Decimal,
}

impl PaymentShare {
    pub fn new(name: ParticipantName, amount: Decimal) -> Self {
        Self { name, amount }
    }
}

// 2.1: payer shape as found in stored entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayerShape {
    Multiple { payers: Vec<PaymentShare> },
    // legacy: one implicit payer for the full amount
    Single { payer: ParticipantName },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub description: String,
    pub amount: Decimal,
    #[serde(flatten)]
    pub paid_by: PayerShape,
    // empty means everyone known when balances are computed
    #[serde(default)]
    pub split_among: Vec<ParticipantName>,
}

impl ExpenseEntry {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        payers: Vec<PaymentShare>,
        split_among: Vec<ParticipantName>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: PayerShape::Multiple { payers },
            split_among,
        }
    }

    pub fn legacy(
        description: impl Into<String>,
        payer: ParticipantName,
        amount: Decimal,
        split_among: Vec<ParticipantName>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: PayerShape::Single { payer },
            split_among,
        }
    }

    // 2.2: normalized payer list. legacy entries become one share for the full amount.
    pub fn payers(&self) -> Cow<'_, [PaymentShare]> {
        match &self.paid_by {
            PayerShape::Multiple { payers } => Cow::Borrowed(payers.as_slice()),
            PayerShape::Single { payer } => {
                Cow::Owned(vec![PaymentShare::new(payer.clone(), self.amount)])
            }
        }
    }

    pub fn payer_total(&self) -> Decimal {
        self.payers().iter().map(|p| p.amount).sum()
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self.paid_by, PayerShape::Single { .. })
    }

    // rewrite a legacy entry into the multi payer form
    pub fn normalize(&mut self) {
        if self.is_legacy() {
            let payers = self.payers().into_owned();
            self.paid_by = PayerShape::Multiple { payers };
        }
    }

    pub fn references(&self, name: &ParticipantName) -> bool {
        self.payers().iter().any(|p| &p.name == name) || self.split_among.contains(name)
    }

    // 2.3: admission checks. the balance engine never runs these, it tolerates bad data.
    pub fn validate(
        &self,
        participants: &ParticipantSet,
        tolerances: &Tolerances,
    ) -> Result<(), EntryError> {
        if self.description.trim().is_empty() {
            return Err(EntryError::EmptyDescription);
        }

        if self.amount <= Decimal::ZERO {
            return Err(EntryError::NonPositiveAmount(self.amount));
        }

        let payers = self.payers();
        if payers.is_empty() {
            return Err(EntryError::NoPayers);
        }

        for share in payers.iter() {
            if share.amount <= Decimal::ZERO {
                return Err(EntryError::NonPositiveShare {
                    name: share.name.clone(),
                    amount: share.amount,
                });
            }
            if !participants.contains(&share.name) {
                return Err(EntryError::UnknownParticipant(share.name.clone()));
            }
        }

        let total: Decimal = payers.iter().map(|p| p.amount).sum();
        if (total - self.amount).abs() > tolerances.payer_total {
            return Err(EntryError::PayerTotalMismatch {
                total,
                amount: self.amount,
            });
        }

        if self.split_among.is_empty() {
            return Err(EntryError::EmptySplit);
        }

        for (idx, name) in self.split_among.iter().enumerate() {
            if !participants.contains(name) {
                return Err(EntryError::UnknownParticipant(name.clone()));
            }
            if self.split_among[..idx].contains(name) {
                return Err(EntryError::DuplicateSplitMember(name.clone()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("Entry description is empty")]
    EmptyDescription,

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Entry has no payers")]
    NoPayers,

    #[error("Payer {name} has a non-positive share {amount}")]
    NonPositiveShare { name: ParticipantName, amount: Decimal },

    #[error("Payer amounts ({total}) must equal the total ({amount})")]
    PayerTotalMismatch { total: Decimal, amount: Decimal },

    #[error("Entry must be split among at least one participant")]
    EmptySplit,

    #[error("Unknown participant {0}")]
    UnknownParticipant(ParticipantName),

    #[error("Participant {0} appears twice in the split")]
    DuplicateSplitMember(ParticipantName),
}

// 2.4: divide a total evenly over payers. the last payer absorbs the cent remainder.
pub fn split_equally(
    total: Decimal,
    payers: &[ParticipantName],
) -> Result<Vec<PaymentShare>, EntryError> {
    if total <= Decimal::ZERO {
        return Err(EntryError::NonPositiveAmount(total));
    }
    if payers.is_empty() {
        return Err(EntryError::NoPayers);
    }

    let count = Decimal::from(payers.len());
    let each = round2(total / count);
    let remainder = round2(total - each * count);
    let last = payers.len() - 1;

    Ok(payers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let amount = if i == last { each + remainder } else { each };
            PaymentShare::new(name.clone(), amount)
        })
        .collect())
}
