//! Election context: the immutable per-deployment configuration.
//!
//! Written exactly once by `initialize`. The only mutable flag kept next to
//! it is `CLOSED`, which the administrator sets when ending the vote.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const CONTEXT: Symbol = symbol_short!("CONTEXT");
const CLOSED: Symbol = symbol_short!("CLOSED");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

/// How much weight a delegation carries when the delegatee redeems it.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DelegatedWeight {
    /// Every delegation counts as a single vote.
    Unit,
    /// The delegator's balance at delegation time.
    Snapshot,
    /// The delegator's balance re-read at redemption time.
    Live,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElectionContext {
    pub admin: Address,
    /// Token contract whose balances are the voting weight.
    pub weight_source: Address,
    pub delegated_weight: DelegatedWeight,
    pub created_at: u64,
}

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONTEXT)
}

pub(crate) fn store(env: &Env, context: &ElectionContext) -> Result<(), ContractError> {
    if is_initialized(env) {
        return Err(ContractError::AlreadyInitialized);
    }
    env.storage().instance().set(&CONTEXT, context);
    extend_instance(env);
    Ok(())
}

pub fn load(env: &Env) -> Result<ElectionContext, ContractError> {
    env.storage()
        .instance()
        .get(&CONTEXT)
        .ok_or(ContractError::NotInitialized)
}

pub fn is_closed(env: &Env) -> bool {
    env.storage().instance().get(&CLOSED).unwrap_or(false)
}

/// Guard for every ballot action.
pub fn require_open(env: &Env) -> Result<(), ContractError> {
    if is_closed(env) {
        return Err(ContractError::VotingClosed);
    }
    Ok(())
}

pub(crate) fn close(env: &Env) {
    env.storage().instance().set(&CLOSED, &true);
    extend_instance(env);
}
