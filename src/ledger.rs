//! Ledger state: the participant set and entry list the pure engine reads from.
//!
//! All edits go through here so admission checks run once, at the edge. Renames and
//! removals cascade into every entry that references the participant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::{compute_balances_with, BalanceError, BalanceSheet};
use crate::config::{ConfigError, LedgerConfig};
use crate::entry::{EntryError, ExpenseEntry, PayerShape};
use crate::settlement::plan_settlement_with;
use crate::summary::Summary;
use crate::types::{ParticipantName, ParticipantSet, Transaction};

#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("Participant name is empty")]
    EmptyName,

    #[error("Participant {0} already exists")]
    DuplicateParticipant(ParticipantName),

    #[error("Participant {0} not found")]
    ParticipantNotFound(String),

    #[error("Entry {0} not found")]
    EntryNotFound(usize),

    #[error("Invalid entry: {0}")]
    Entry(#[from] EntryError),

    #[error("Balance error: {0}")]
    Balance(#[from] BalanceError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unreadable ledger snapshot: {0}")]
    Snapshot(String),
}

/// What a participant removal did to the entry list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub entries_deleted: usize,
    pub entries_adjusted: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    config: LedgerConfig,
    #[serde(default)]
    participants: ParticipantSet,
    #[serde(default)]
    entries: Vec<ExpenseEntry>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            config,
            participants: ParticipantSet::new(),
            entries: Vec::new(),
        })
    }

    /// Parse a stored snapshot. Entries are taken as stored, legacy shapes included,
    /// but the config has to pass the same checks as [`Ledger::new`].
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        let ledger: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        ledger.config.validate()?;
        Ok(ledger)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LedgerConfig) -> Result<(), LedgerError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    pub fn entries(&self) -> &[ExpenseEntry] {
        &self.entries
    }

    pub fn add_participant(&mut self, raw: &str) -> Result<ParticipantName, LedgerError> {
        let name = ParticipantName::new(raw).ok_or(LedgerError::EmptyName)?;
        if !self.participants.insert(name.clone()) {
            return Err(LedgerError::DuplicateParticipant(name));
        }
        tracing::info!(participant = %name, "Participant added");
        Ok(name)
    }

    pub fn rename_participant(&mut self, old: &str, new: &str) -> Result<(), LedgerError> {
        let old = self.known(old)?;
        let new = ParticipantName::new(new).ok_or(LedgerError::EmptyName)?;
        if new == old {
            return Ok(());
        }
        if !self.participants.rename(&old, new.clone()) {
            return Err(LedgerError::DuplicateParticipant(new));
        }

        for entry in &mut self.entries {
            match &mut entry.paid_by {
                PayerShape::Single { payer } => {
                    if *payer == old {
                        *payer = new.clone();
                    }
                }
                PayerShape::Multiple { payers } => {
                    for share in payers.iter_mut().filter(|s| s.name == old) {
                        share.name = new.clone();
                    }
                }
            }
            for member in entry.split_among.iter_mut().filter(|m| **m == old) {
                *member = new.clone();
            }
        }

        tracing::info!(from = %old, to = %new, "Participant renamed");
        Ok(())
    }

    // walks entries last to first so removals don't shift what is left to visit
    pub fn remove_participant(&mut self, raw: &str) -> Result<RemovalReport, LedgerError> {
        let name = self.known(raw)?;
        self.participants.remove(&name);

        let mut report = RemovalReport::default();
        for idx in (0..self.entries.len()).rev() {
            let entry = &mut self.entries[idx];
            let mut touched = false;

            match &mut entry.paid_by {
                PayerShape::Single { payer } => {
                    if *payer == name {
                        self.entries.remove(idx);
                        report.entries_deleted += 1;
                        continue;
                    }
                }
                PayerShape::Multiple { payers } => {
                    let before = payers.len();
                    payers.retain(|s| s.name != name);
                    if payers.is_empty() {
                        self.entries.remove(idx);
                        report.entries_deleted += 1;
                        continue;
                    }
                    // the expense becomes whatever the remaining payers covered
                    let covered = payers.iter().map(|s| s.amount).sum::<Decimal>();
                    touched = payers.len() != before || covered != entry.amount;
                    entry.amount = covered;
                }
            }

            let before = entry.split_among.len();
            entry.split_among.retain(|m| *m != name);
            touched |= entry.split_among.len() != before;

            if touched {
                report.entries_adjusted += 1;
            }
        }

        tracing::info!(
            participant = %name,
            deleted = report.entries_deleted,
            adjusted = report.entries_adjusted,
            "Participant removed"
        );
        Ok(report)
    }

    pub fn add_entry(&mut self, mut entry: ExpenseEntry) -> Result<usize, LedgerError> {
        self.admit(&mut entry)?;
        self.entries.push(entry);
        Ok(self.entries.len() - 1)
    }

    pub fn edit_entry(&mut self, index: usize, mut entry: ExpenseEntry) -> Result<(), LedgerError> {
        if index >= self.entries.len() {
            return Err(LedgerError::EntryNotFound(index));
        }
        self.admit(&mut entry)?;
        self.entries[index] = entry;
        Ok(())
    }

    pub fn delete_entry(&mut self, index: usize) -> Result<ExpenseEntry, LedgerError> {
        if index >= self.entries.len() {
            return Err(LedgerError::EntryNotFound(index));
        }
        Ok(self.entries.remove(index))
    }

    pub fn balances(&self) -> Result<BalanceSheet, LedgerError> {
        Ok(compute_balances_with(
            &self.participants,
            &self.entries,
            &self.config.tolerances,
        )?)
    }

    pub fn settle(&self) -> Result<Vec<Transaction>, LedgerError> {
        let sheet = self.balances()?;
        Ok(plan_settlement_with(&sheet.balances, &self.config.tolerances))
    }

    pub fn summary(&self) -> Result<Summary, LedgerError> {
        let sheet = self.balances()?;
        let plan = plan_settlement_with(&sheet.balances, &self.config.tolerances);
        Ok(Summary::new(&sheet, plan, self.config.currency, &self.config.tolerances))
    }

    fn known(&self, raw: &str) -> Result<ParticipantName, LedgerError> {
        ParticipantName::new(raw)
            .filter(|n| self.participants.contains(n))
            .ok_or_else(|| LedgerError::ParticipantNotFound(raw.to_string()))
    }

    fn admit(&self, entry: &mut ExpenseEntry) -> Result<(), EntryError> {
        entry.description = entry.description.trim().to_string();
        entry.validate(&self.participants, &self.config.tolerances)?;
        entry.normalize();
        Ok(())
    }
}
