// 1.0: primitives. participant names, ordered amount maps, transfers, cent rounding.
// names are the only identity key, so they get a newtype that is always trimmed and non-empty.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

// round to cents, half away from zero. every displayed or compared balance goes through here.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Participant name is empty")]
    Empty,

    #[error("Participant {0} is listed more than once")]
    Duplicate(String),
}

// 1.1: display name of a participant. case sensitive, trimmed, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        debug_assert!(!raw.trim().is_empty());
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = NameError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw).ok_or(NameError::Empty)
    }
}

impl From<ParticipantName> for String {
    fn from(name: ParticipantName) -> Self {
        name.0
    }
}

impl PartialEq<str> for ParticipantName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ParticipantName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// 1.2: insertion ordered, duplicate free set of names. order drives every map the engine
// returns and the creditor/debtor order of a settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ParticipantName>", into = "Vec<ParticipantName>")]
pub struct ParticipantSet(Vec<ParticipantName>);

impl ParticipantSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    // blank and repeated names are skipped
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for raw in names {
            if let Some(name) = ParticipantName::new(raw.as_ref()) {
                set.insert(name);
            }
        }
        set
    }

    // false if the name was already present
    pub fn insert(&mut self, name: ParticipantName) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    pub fn contains(&self, name: &ParticipantName) -> bool {
        self.0.contains(name)
    }

    pub fn remove(&mut self, name: &ParticipantName) -> bool {
        match self.0.iter().position(|n| n == name) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    // a renamed participant counts as newly added and moves to the end
    pub fn rename(&mut self, old: &ParticipantName, new: ParticipantName) -> bool {
        if self.contains(&new) || !self.remove(old) {
            return false;
        }
        self.0.push(new);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantName> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ParticipantName] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<ParticipantName>> for ParticipantSet {
    type Error = NameError;

    fn try_from(names: Vec<ParticipantName>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for name in names {
            if set.contains(&name) {
                return Err(NameError::Duplicate(name.into()));
            }
            set.0.push(name);
        }
        Ok(set)
    }
}

impl From<ParticipantSet> for Vec<ParticipantName> {
    fn from(set: ParticipantSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a ParticipantSet {
    type Item = &'a ParticipantName;
    type IntoIter = std::slice::Iter<'a, ParticipantName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// 1.3: name -> amount map that remembers insertion order. paid, owed and balances all use it.
// groups are tens of people, so a linear scan beats hashing here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountMap(Vec<(ParticipantName, Decimal)>);

impl AmountMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn zeroed(participants: &ParticipantSet) -> Self {
        Self(participants.iter().map(|n| (n.clone(), Decimal::ZERO)).collect())
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Decimal> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    // adds to an existing key. unknown names are dropped and reported as false.
    pub fn credit(&mut self, name: &str, amount: Decimal) -> bool {
        match self.get_mut(name) {
            Some(slot) => {
                *slot += amount;
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, name: ParticipantName, amount: Decimal) {
        match self.get_mut(name.as_str()) {
            Some(slot) => *slot = amount,
            None => self.0.push((name, amount)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantName, Decimal)> {
        self.0.iter().map(|(n, v)| (n, *v))
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().map(|(_, v)| *v).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ParticipantName, Decimal)> for AmountMap {
    fn from_iter<I: IntoIterator<Item = (ParticipantName, Decimal)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, amount) in iter {
            map.insert(name, amount);
        }
        map
    }
}

// 1.4: one suggested transfer. from is the debtor, to the creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: ParticipantName,
    pub to: ParticipantName,
    pub amount: Decimal,
}
