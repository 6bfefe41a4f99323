//! Structured event publishing for the private voting contract.
//!
//! Ballot events never carry the voter's or delegatee's address.

#![allow(deprecated)]

use soroban_sdk::{symbol_short, Address, BytesN, Env};

use crate::tally::CandidateId;

pub fn publish_initialized(env: &Env, admin: &Address, weight_source: &Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        (admin.clone(), weight_source.clone()),
    );
}

pub fn publish_nullifier_spent(env: &Env, nullifier: &BytesN<32>) {
    env.events()
        .publish((symbol_short!("NULLIFY"),), nullifier.clone());
}

pub fn publish_vote_cast(env: &Env, candidate: CandidateId, weight: i128) {
    env.events()
        .publish((symbol_short!("VOTE_CST"), candidate), weight);
}

pub fn publish_delegation_recorded(env: &Env, record_id: &BytesN<32>) {
    env.events()
        .publish((symbol_short!("DEL_REC"),), record_id.clone());
}

pub fn publish_delegated_vote_cast(env: &Env, candidate: CandidateId, weight: i128) {
    env.events()
        .publish((symbol_short!("DEL_CST"), candidate), weight);
}

pub fn publish_voting_ended(env: &Env, admin: &Address) {
    env.events()
        .publish((symbol_short!("VOTE_END"),), admin.clone());
}
