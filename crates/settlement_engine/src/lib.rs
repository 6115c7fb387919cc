//! Client side of funder settlement for the funding campaign contract.
//!
//! The contracts are the ledger of record. This crate reads campaign state from
//! them, drives the approve/transfer repayment sequence one funder at a time,
//! decodes contract error codes and checks submissions before they are sent.

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod preflight;
pub mod settlement;
pub mod snapshot;

pub use config::{BatchPolicy, InterestSource, SettlementConfig};
pub use engine::{FunderOutcome, FunderReport, SettlementEngine, UnresolvedRepayment};
pub use error::{LedgerError, RejectionKind, SettlementError};
pub use ledger::LedgerOfRecord;
pub use settlement::{Settlement, SettlementPhase};
pub use snapshot::{CampaignSnapshot, FunderClaim};
