//! Nullifier derivation for ballot actions.
//!
//! ```text
//! nullifier = SHA-256( scope(domain) || election_xdr || subject )
//! ```
//!
//! `election_xdr` is the XDR encoding of this contract's address, so the same
//! voter produces unrelated nullifiers in different elections.
//!
//! `Vote` and `Delegate` share the `ballot` scope and the voter's secret as
//! subject: both actions derive the *same* token, which is what makes them
//! mutually exclusive. `Redeem` has its own scope and uses the delegatee's
//! secret plus the delegation record id, so redeeming never touches the
//! delegatee's own ballot nullifier.

use common::nullifier as registry;
use soroban_sdk::{contracttype, xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::{events, ContractError};

const BALLOT_SCOPE: &[u8] = b"ballot";
const REDEEM_SCOPE: &[u8] = b"redeem";

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NullifierDomain {
    Vote,
    Delegate,
    Redeem,
}

impl NullifierDomain {
    fn scope(&self) -> &'static [u8] {
        match self {
            NullifierDomain::Vote | NullifierDomain::Delegate => BALLOT_SCOPE,
            NullifierDomain::Redeem => REDEEM_SCOPE,
        }
    }
}

/// The secret bound to an account identity.
///
/// Account ownership is proven by `require_auth`, so the canonical encoding
/// of the authenticated address is what binds a nullifier to its voter.
pub fn voter_secret(env: &Env, voter: &Address) -> Bytes {
    voter.clone().to_xdr(env)
}

fn derive(env: &Env, election: &Address, domain: NullifierDomain, subject: &Bytes) -> BytesN<32> {
    let mut data = Bytes::from_slice(env, domain.scope());
    data.append(&election.clone().to_xdr(env));
    data.append(subject);
    env.crypto().sha256(&data).into()
}

/// Nullifier a voter emits when casting (`Vote`) or delegating (`Delegate`).
pub fn for_voter(env: &Env, voter: &Address, domain: NullifierDomain) -> BytesN<32> {
    for_voter_in(env, &env.current_contract_address(), voter, domain)
}

/// Same derivation for an explicit election address.
///
/// Submitters use this off-ledger to declare the nullifier a transaction
/// will emit. The contract exposes no entry point for it, so "has X voted"
/// is never a single on-ledger query.
pub fn for_voter_in(
    env: &Env,
    election: &Address,
    voter: &Address,
    domain: NullifierDomain,
) -> BytesN<32> {
    derive(env, election, domain, &voter_secret(env, voter))
}

/// Nullifier a delegatee emits when redeeming `record_id`.
pub fn for_redemption(env: &Env, delegatee: &Address, record_id: &BytesN<32>) -> BytesN<32> {
    let mut subject = voter_secret(env, delegatee);
    subject.extend_from_array(&record_id.to_array());
    derive(
        env,
        &env.current_contract_address(),
        NullifierDomain::Redeem,
        &subject,
    )
}

/// Non-committing check used while planning an action.
pub fn ensure_unspent(env: &Env, nullifier: &BytesN<32>) -> Result<(), ContractError> {
    if registry::is_spent(env, nullifier) {
        return Err(ContractError::NullifierCollision);
    }
    Ok(())
}

/// Committing check: insert the nullifier or fail the action.
pub fn spend(env: &Env, nullifier: &BytesN<32>) -> Result<(), ContractError> {
    registry::check_and_insert(env, nullifier)?;
    events::publish_nullifier_spent(env, nullifier);
    Ok(())
}
