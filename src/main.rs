//! Shared expense simulation.
//!
//! Walks a few groups through recording expenses, computing balances and planning
//! settlement. Pass a JSON ledger snapshot path to summarize that instead.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use split_core::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Some(path) = std::env::args().nth(1) {
        if let Err(e) = summarize_file(&path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    println!("Shared Expense Settlement Simulation\n");

    scenario_1_weekend_trip();
    scenario_2_multiple_payers();
    scenario_3_rounding_residual();
    scenario_4_participant_changes();
    scenario_5_legacy_entries();

    println!("\nAll simulations completed successfully.");
}

fn summarize_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let ledger = Ledger::from_json(&raw)?;
    print!("{}", ledger.summary()?);
    Ok(())
}

fn name(raw: &str) -> ParticipantName {
    ParticipantName::new_unchecked(raw)
}

fn entry(description: &str, payers: &[(&str, Decimal)], split: &[&str]) -> ExpenseEntry {
    let amount = payers.iter().map(|(_, a)| *a).sum();
    ExpenseEntry::new(
        description,
        amount,
        payers.iter().map(|(n, a)| PaymentShare::new(name(n), *a)).collect(),
        split.iter().map(|s| name(s)).collect(),
    )
}

fn group(names: &[&str], config: LedgerConfig) -> Ledger {
    let mut ledger = Ledger::new(config).unwrap();
    for n in names {
        ledger.add_participant(n).unwrap();
    }
    ledger
}

/// One payer covers a shared dinner.
fn scenario_1_weekend_trip() {
    println!("Scenario 1: Weekend Trip\n");

    let mut ledger = group(&["Alice", "Bob", "Charlie"], LedgerConfig::usd());
    ledger
        .add_entry(entry("Dinner", &[("Alice", dec!(90))], &["Alice", "Bob", "Charlie"]))
        .unwrap();

    println!("  Alice pays $90 for dinner, split three ways\n");
    print_indented(&ledger.summary().unwrap());
}

/// Several payers, partial splits.
fn scenario_2_multiple_payers() {
    println!("Scenario 2: Multiple Payers\n");

    let mut ledger = group(&["Januda", "Bethmin", "Vinuki", "Vinumi"], LedgerConfig::default());
    ledger
        .add_entry(entry(
            "Food",
            &[("Januda", dec!(50)), ("Bethmin", dec!(50))],
            &["Januda", "Bethmin", "Vinuki", "Vinumi"],
        ))
        .unwrap();
    ledger
        .add_entry(entry(
            "Drinks",
            &[("Vinuki", dec!(150)), ("Vinumi", dec!(50))],
            &["Bethmin", "Vinuki", "Vinumi"],
        ))
        .unwrap();

    println!("  Food paid by two, split four ways; drinks paid by two, split three ways\n");
    print_indented(&ledger.summary().unwrap());
}

/// 100 split seven ways leaves three cents that land on the payer.
fn scenario_3_rounding_residual() {
    println!("Scenario 3: Rounding Residual\n");

    let names = ["P1", "P2", "P3", "P4", "P5", "P6", "P7"];
    let mut ledger = group(&names, LedgerConfig::eur());
    ledger.add_entry(entry("Tickets", &[("P1", dec!(100))], &names)).unwrap();

    let sheet = ledger.balances().unwrap();
    if let Some(c) = &sheet.correction {
        println!("  Residual {} folded into {}\n", c.residual, c.adjusted);
    }
    print_indented(&ledger.summary().unwrap());
}

/// Renaming and removing participants rewrites the entries that mention them.
fn scenario_4_participant_changes() {
    println!("Scenario 4: Participant Changes\n");

    let mut ledger = group(&["A", "B", "C"], LedgerConfig::usd());
    ledger.add_entry(entry("Lunch", &[("A", dec!(20)), ("B", dec!(40))], &["A", "B", "C"])).unwrap();
    ledger.add_entry(entry("Taxi", &[("C", dec!(12))], &["A", "C"])).unwrap();

    ledger.rename_participant("C", "Cara").unwrap();
    println!("  C renamed to Cara");

    let report = ledger.remove_participant("A").unwrap();
    println!(
        "  A removed: {} entries deleted, {} adjusted\n",
        report.entries_deleted, report.entries_adjusted
    );
    print_indented(&ledger.summary().unwrap());
}

/// Stored data in the old single payer shape still computes.
fn scenario_5_legacy_entries() {
    println!("Scenario 5: Legacy Entries\n");

    let json = r#"{
        "config": { "currency": "LKR" },
        "participants": ["Alice", "Bob"],
        "entries": [
            { "description": "Taxi", "payer": "Alice", "amount": 80, "splitAmong": ["Alice", "Bob"] }
        ]
    }"#;
    let ledger = Ledger::from_json(json).unwrap();
    print_indented(&ledger.summary().unwrap());
}

fn print_indented(summary: &Summary) {
    for line in summary.to_string().lines() {
        println!("  {}", line);
    }
    println!();
}
