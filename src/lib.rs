//! A ledger handler for the `simplewallet` transaction family.
//!
//! The handler applies `deposit`, `withdraw` and `transfer` instructions
//! against an external key/value ledger state reached through the
//! [`LedgerState`](domain::ports::LedgerState) port. Everything outside
//! the balance state transition (networking, signing, consensus) belongs
//! to the invoking runtime; [`application::engine::LedgerEngine`] is a
//! small in-process stand-in for it.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
