//! Shared primitives and error types for the private voting contracts.
//!
//! This crate provides:
//! - [`CommonError`]: standardised error codes shared across contracts.
//! - [`nullifier`]: the single-use token registry used as the admission
//!   check for every ballot action.
//!
//! Contract-specific errors keep their own enums and convert from
//! [`CommonError`] where a shared primitive can fail.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::arithmetic_side_effects)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod nullifier;

pub use nullifier::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Standardised error codes shared by every contract in the workspace.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authentication & authorisation |
/// | 20 – 29 | Resource not found             |
/// | 30 – 39 | Validation / input             |
/// | 100+    | Reserved for contract-specific |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    AccessDenied = 10,
    RecordNotFound = 21,
    InvalidInput = 30,
    /// The nullifier is already present in the registry.
    NullifierSpent = 33,
}
