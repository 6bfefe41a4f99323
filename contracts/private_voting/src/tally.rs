//! Public per-candidate tally.
//!
//! Counters start at zero on first reference and only ever grow.

use soroban_sdk::{symbol_short, Env, Symbol};

pub type CandidateId = u64;

const TALLY: Symbol = symbol_short!("TALLY");
const TOTAL: Symbol = symbol_short!("TOT_VOTE");

// TTL: ~30 days
const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

fn tally_key(candidate: CandidateId) -> (Symbol, CandidateId) {
    (TALLY, candidate)
}

pub fn get(env: &Env, candidate: CandidateId) -> i128 {
    env.storage()
        .persistent()
        .get(&tally_key(candidate))
        .unwrap_or(0i128)
}

/// Sum of every increment applied so far.
pub fn total(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL).unwrap_or(0i128)
}

/// Add `weight` to `candidate` and return the new count.
pub(crate) fn increment(env: &Env, candidate: CandidateId, weight: i128) -> i128 {
    let key = tally_key(candidate);
    let count = get(env, candidate).saturating_add(weight);
    env.storage().persistent().set(&key, &count);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let sum = total(env).saturating_add(weight);
    env.storage().instance().set(&TOTAL, &sum);

    count
}
