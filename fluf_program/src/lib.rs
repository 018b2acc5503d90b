//! Fluf: single-asset deposit pools whose shares can be flash-borrowed.
//!
//! Depositors hand a base asset to a pool and receive pool shares that redeem
//! for a proportional slice of the pool's base vault. Shares can be borrowed
//! within one transaction through [`instruction::FlufInstruction::LendAndCall`],
//! which calls back into a borrower program and enforces repayment plus a fee
//! before returning.

pub mod constants;
#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;
pub mod error;
pub mod instruction;
pub mod math;
pub mod pda;
pub mod processor;
pub mod state;

pub use constants::*;
pub use solana_program;

solana_program::declare_id!("7Crsw9yaDiT5jMZ8yWJgkdVeWpLirh9G5hJZCp9G1Aiy");
