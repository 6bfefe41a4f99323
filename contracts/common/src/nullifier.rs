//! Single-use nullifier registry.
//!
//! A nullifier is an opaque 32-byte token. Once inserted it stays in the
//! registry for the lifetime of the contract; there is no removal and no
//! enumeration, only a membership query. Callers derive the token however
//! their protocol requires and hand it to [`check_and_insert`] inside the
//! same invocation that performs the guarded state change, so a rejected
//! insert aborts the whole action.
//!
//! [`is_spent`] is the non-committing half of the same check and is what
//! dry-run entry points call.

use soroban_sdk::{symbol_short, BytesN, Env, Symbol};

use crate::CommonError;

const SPENT: Symbol = symbol_short!("NUL_SPNT");
const SPENT_CNT: Symbol = symbol_short!("NUL_CNT");

// Nullifiers must outlive the election they guard.
const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

fn spent_key(nullifier: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (SPENT, nullifier.clone())
}

/// Returns `true` when `nullifier` has already been accepted.
pub fn is_spent(env: &Env, nullifier: &BytesN<32>) -> bool {
    env.storage().persistent().has(&spent_key(nullifier))
}

/// Insert `nullifier` if absent.
///
/// Returns `CommonError::NullifierSpent` and writes nothing when the token
/// is already present.
pub fn check_and_insert(env: &Env, nullifier: &BytesN<32>) -> Result<(), CommonError> {
    let key = spent_key(nullifier);
    if env.storage().persistent().has(&key) {
        return Err(CommonError::NullifierSpent);
    }

    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let count: u32 = env.storage().instance().get(&SPENT_CNT).unwrap_or(0);
    env.storage()
        .instance()
        .set(&SPENT_CNT, &count.saturating_add(1));

    Ok(())
}

/// Number of nullifiers accepted so far.
pub fn spent_count(env: &Env) -> u32 {
    env.storage().instance().get(&SPENT_CNT).unwrap_or(0)
}
