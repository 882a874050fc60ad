//! Domain layer: addresses, balances, instructions and the ports the
//! handler talks through.

pub mod account;
pub mod address;
pub mod instruction;
pub mod ports;
