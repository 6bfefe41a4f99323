//! Delegation records addressed to a delegatee.
//!
//! A record is stored under its own id and referenced from the delegatee's
//! inbox. The inbox key is a hash of the delegatee and the election rather
//! than the raw address, and the record id mixes in the delegator's ballot
//! nullifier and the blinding value, so neither key names the delegator.
//! Contract entry points only return records to the authenticated delegatee.
//!
//! ## Rules
//! - A record is created once per delegator per election (the delegator's
//!   ballot nullifier guarantees this).
//! - A record is redeemed at most once; `consumed` is set on redemption and
//!   the redemption nullifier backs it up.
//! - Records are never deleted.

use soroban_sdk::{contracttype, symbol_short, xdr::ToXdr, Address, Bytes, BytesN, Env, Symbol, Vec};

// ── Storage key prefixes ─────────────────────────────────────────────────────

/// Maps record id → `DelegationRecord`.
const RECORD: Symbol = symbol_short!("DEL_REC");
/// Maps inbox tag → ids of records addressed to that delegatee.
const INBOX: Symbol = symbol_short!("DEL_BOX");

const INBOX_SCOPE: &[u8] = b"inbox";

const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ─────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegationRecord {
    pub record_id: BytesN<32>,
    pub delegatee: Address,
    /// Shared between delegator and delegatee; mixed into the record id.
    pub blinding: BytesN<32>,
    /// Frozen weight; zero under the live-weight policy.
    pub weight: i128,
    /// Only kept under the live-weight policy, where the balance is re-read.
    pub delegator: Option<Address>,
    pub consumed: bool,
    pub created_at: u64,
}

// ── Key derivation ───────────────────────────────────────────────────────────

fn inbox_tag(env: &Env, delegatee: &Address) -> BytesN<32> {
    let mut data = Bytes::from_slice(env, INBOX_SCOPE);
    data.append(&env.current_contract_address().to_xdr(env));
    data.append(&delegatee.clone().to_xdr(env));
    env.crypto().sha256(&data).into()
}

/// `record_id = SHA-256(delegator_nullifier || blinding || delegatee_xdr)`
pub fn record_id(
    env: &Env,
    delegator_nullifier: &BytesN<32>,
    delegatee: &Address,
    blinding: &BytesN<32>,
) -> BytesN<32> {
    let mut data = Bytes::from_array(env, &delegator_nullifier.to_array());
    data.extend_from_array(&blinding.to_array());
    data.append(&delegatee.clone().to_xdr(env));
    env.crypto().sha256(&data).into()
}

fn record_key(record_id: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (RECORD, record_id.clone())
}

fn inbox_key(env: &Env, delegatee: &Address) -> (Symbol, BytesN<32>) {
    (INBOX, inbox_tag(env, delegatee))
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn inbox(env: &Env, delegatee: &Address) -> Vec<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&inbox_key(env, delegatee))
        .unwrap_or(Vec::new(env))
}

fn save(env: &Env, record: &DelegationRecord) {
    let key = record_key(&record.record_id);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Persist a new record and append it to the delegatee's inbox.
pub(crate) fn store(env: &Env, record: &DelegationRecord) {
    save(env, record);

    let key = inbox_key(env, &record.delegatee);
    let mut ids = inbox(env, &record.delegatee);
    ids.push_back(record.record_id.clone());
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn load(env: &Env, record_id: &BytesN<32>) -> Option<DelegationRecord> {
    env.storage().persistent().get(&record_key(record_id))
}

/// Oldest record addressed to `delegatee` that has not been redeemed.
pub fn next_unconsumed(env: &Env, delegatee: &Address) -> Option<DelegationRecord> {
    inbox(env, delegatee)
        .iter()
        .filter_map(|id| load(env, &id))
        .find(|record| !record.consumed)
}

/// Every record addressed to `delegatee`, consumed or not, oldest first.
pub fn records_for(env: &Env, delegatee: &Address) -> Vec<DelegationRecord> {
    let mut out = Vec::new(env);
    for id in inbox(env, delegatee).iter() {
        if let Some(record) = load(env, &id) {
            out.push_back(record);
        }
    }
    out
}

pub(crate) fn mark_consumed(env: &Env, record: &DelegationRecord) {
    let mut updated = record.clone();
    updated.consumed = true;
    save(env, &updated);
}
