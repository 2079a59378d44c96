//! Balance engine.
//!
//! Aggregates what each participant paid and owes across all entries, nets the two
//! into a cent-rounded balance, and folds small rounding residuals back into the
//! largest balance so the group sums to zero. Positive balance = owed to them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Tolerances;
use crate::entry::ExpenseEntry;
use crate::types::{round2, AmountMap, ParticipantName, ParticipantSet};

/// Output of one balance computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub paid: AmountMap,
    pub owed: AmountMap,
    pub balances: AmountMap,
    pub total_spent: Decimal,
    /// Set when the rounding pass moved a residual onto one participant.
    pub correction: Option<RoundingCorrection>,
}

impl BalanceSheet {
    /// Rounded sum of all balances after correction. Zero for consistent data.
    pub fn residual(&self) -> Decimal {
        round2(self.balances.total())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingCorrection {
    pub adjusted: ParticipantName,
    pub residual: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("Entry {index} ({description}) has nobody to split among")]
    EmptySplit { index: usize, description: String },
}

pub fn compute_balances(
    participants: &ParticipantSet,
    entries: &[ExpenseEntry],
) -> Result<BalanceSheet, BalanceError> {
    compute_balances_with(participants, entries, &Tolerances::default())
}

pub fn compute_balances_with(
    participants: &ParticipantSet,
    entries: &[ExpenseEntry],
    tolerances: &Tolerances,
) -> Result<BalanceSheet, BalanceError> {
    let mut paid = AmountMap::zeroed(participants);
    let mut owed = AmountMap::zeroed(participants);
    let mut total_spent = Decimal::ZERO;

    for (index, entry) in entries.iter().enumerate() {
        // empty split falls back to whoever is known right now
        let split: &[ParticipantName] = if entry.split_among.is_empty() {
            participants.as_slice()
        } else {
            &entry.split_among
        };

        if split.is_empty() {
            return Err(BalanceError::EmptySplit {
                index,
                description: entry.description.clone(),
            });
        }

        let per_person = entry.amount / Decimal::from(split.len());

        for share in entry.payers().iter() {
            if !paid.credit(share.name.as_str(), share.amount) {
                tracing::trace!(entry = index, payer = %share.name, "Dropping share of unknown payer");
            }
        }

        total_spent += entry.amount;

        for name in split {
            if !owed.credit(name.as_str(), per_person) {
                tracing::trace!(entry = index, member = %name, "Dropping split member not in group");
            }
        }
    }

    let mut balances: AmountMap = paid
        .iter()
        .map(|(name, p)| {
            let o = owed.get(name.as_str()).unwrap_or(Decimal::ZERO);
            (name.clone(), round2(p - o))
        })
        .collect();

    let correction = correct_rounding(&mut balances, tolerances);

    Ok(BalanceSheet {
        paid,
        owed,
        balances,
        total_spent,
        correction,
    })
}

// independent per-person rounding can leave a few cents over or under. a residual that
// big (>= ceiling) means payer totals disagree with entry amounts and is left visible.
fn correct_rounding(balances: &mut AmountMap, tolerances: &Tolerances) -> Option<RoundingCorrection> {
    let residual = round2(balances.total());

    if !tolerances.should_correct(residual) {
        if residual.abs() >= tolerances.correction_ceiling {
            tracing::warn!(%residual, "Balances do not sum to zero, leaving residual uncorrected");
        }
        return None;
    }

    // strict comparison: first participant wins ties
    let mut largest: Option<(ParticipantName, Decimal)> = None;
    for (name, balance) in balances.iter() {
        let magnitude = balance.abs();
        let beats = match &largest {
            Some((_, best)) => magnitude > *best,
            None => magnitude > Decimal::ZERO,
        };
        if beats {
            largest = Some((name.clone(), magnitude));
        }
    }

    let (name, _) = largest?;
    let slot = balances.get_mut(name.as_str())?;
    *slot = round2(*slot - residual);

    tracing::debug!(participant = %name, %residual, "Folded rounding residual into largest balance");

    Some(RoundingCorrection {
        adjusted: name,
        residual,
    })
}
