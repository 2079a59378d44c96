// split-core: shared expense ledger engine.
// balances first: paid/owed aggregation and cent rounding decide everything downstream.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: ParticipantName, ParticipantSet, AmountMap, Transaction
//   2.x  entry.rs: expense entries, legacy payer shape, admission checks, equal split
//   3.x  balance.rs: paid/owed aggregation, net balances, rounding correction
//   4.x  settlement.rs: greedy debtor/creditor transfer planning
//   5.x  summary.rs: total spent, average share, standings, text rendering
//   6.x  config.rs: display currency, tolerance bands
//   7.x  ledger.rs: participant/entry lifecycle with cascading rename and removal

// core modules
pub mod balance;
pub mod entry;
pub mod settlement;
pub mod types;

// collaborator modules
pub mod config;
pub mod ledger;
pub mod summary;

// re exports for convenience
pub use balance::{compute_balances, compute_balances_with, BalanceError, BalanceSheet, RoundingCorrection};
pub use config::{ConfigError, Currency, LedgerConfig, Tolerances};
pub use entry::{split_equally, EntryError, ExpenseEntry, PayerShape, PaymentShare};
pub use ledger::{Ledger, LedgerError, RemovalReport};
pub use settlement::{net_flows, plan_settlement, plan_settlement_with, total_debt, total_transferred};
pub use summary::{ParticipantStanding, Standing, Summary};
pub use types::*;
