//! Application layer containing the business logic orchestration.
//!
//! [`handler::WalletHandler`] is the state transition itself;
//! [`engine::LedgerEngine`] drives it the way a runtime would, one
//! submission at a time against namespace-scoped state.

pub mod engine;
pub mod handler;
