#![no_std]

//! # Private Voting
//!
//! A token-weighted election in which every voter may act exactly once:
//!
//! - **Cast**: add the voter's token balance to a candidate's tally.
//! - **Delegate**: hand the voting right to a delegatee instead.
//! - **Redeem**: the delegatee adds a delegated weight to a candidate.
//!
//! ## One action per voter
//! Casting and delegating derive the same per-voter, per-election nullifier
//! (see [`nullifier`]). Admission is nothing more than inserting that token
//! into the registry: whichever action lands first wins and the other fails
//! with `NullifierCollision`. No "has voted" flag is stored anywhere.
//!
//! ## Dry runs
//! Every action is split into a *plan* (all validation, no writes) and an
//! *apply* step. The `preflight_*` entry points run only the plan, giving
//! submitters a non-committing check against the same registry the committing
//! path uses. A preflight that passes can still lose at settlement when a
//! conflicting transaction is applied first.

pub mod delegation;
pub mod election;
pub mod events;
pub mod nullifier;
pub mod tally;
pub mod weight;

use common::CommonError;
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec};

use delegation::DelegationRecord;
use election::{DelegatedWeight, ElectionContext};
use nullifier::NullifierDomain;
use tally::CandidateId;

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    /// The action's nullifier is already registered.
    NullifierCollision = 5,
    /// No unconsumed delegation is addressed to the caller.
    DelegationNotFound = 6,
    NoVotingWeight = 7,
    SelfDelegation = 8,
    VotingClosed = 9,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NullifierSpent => ContractError::NullifierCollision,
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::RecordNotFound => ContractError::DelegationNotFound,
            CommonError::InvalidInput => ContractError::InvalidInput,
        }
    }
}

// ── Action plans ─────────────────────────────────────────────────────────────

struct BallotPlan {
    nullifier: BytesN<32>,
    weight: i128,
}

struct DelegationPlan {
    nullifier: BytesN<32>,
    record: DelegationRecord,
}

struct RedemptionPlan {
    nullifier: BytesN<32>,
    record: DelegationRecord,
    weight: i128,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct PrivateVotingContract;

#[contractimpl]
impl PrivateVotingContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Fix the election context.
    ///
    /// * `admin`           : may end the vote.
    /// * `weight_source`   : token contract; a voter's balance is their weight.
    /// * `delegated_weight`: how much a redeemed delegation counts for.
    pub fn initialize(
        env: Env,
        admin: Address,
        weight_source: Address,
        delegated_weight: DelegatedWeight,
    ) -> Result<(), ContractError> {
        if admin == weight_source {
            return Err(ContractError::InvalidInput);
        }

        let context = ElectionContext {
            admin: admin.clone(),
            weight_source: weight_source.clone(),
            delegated_weight,
            created_at: env.ledger().timestamp(),
        };
        election::store(&env, &context)?;
        events::publish_initialized(&env, &admin, &weight_source);

        Ok(())
    }

    // ── Ballot actions ────────────────────────────────────────────────────────

    /// Cast the voter's full weight for `candidate`.
    ///
    /// Returns the weight added to the tally.
    pub fn cast_vote(
        env: Env,
        voter: Address,
        candidate: CandidateId,
    ) -> Result<i128, ContractError> {
        voter.require_auth();

        let plan = Self::plan_cast_vote(&env, &voter)?;

        nullifier::spend(&env, &plan.nullifier)?;
        tally::increment(&env, candidate, plan.weight);
        events::publish_vote_cast(&env, candidate, plan.weight);

        Ok(plan.weight)
    }

    /// Hand the voter's right to `delegatee`.
    ///
    /// `blinding` is a value shared out of band between delegator and
    /// delegatee. Returns the id of the new delegation record.
    pub fn delegate_vote(
        env: Env,
        voter: Address,
        delegatee: Address,
        blinding: BytesN<32>,
    ) -> Result<BytesN<32>, ContractError> {
        voter.require_auth();

        let plan = Self::plan_delegate_vote(&env, &voter, &delegatee, &blinding)?;

        nullifier::spend(&env, &plan.nullifier)?;
        delegation::store(&env, &plan.record);
        events::publish_delegation_recorded(&env, &plan.record.record_id);

        Ok(plan.record.record_id)
    }

    /// Redeem the oldest unconsumed delegation addressed to `delegatee`.
    ///
    /// Returns the weight added to the tally.
    pub fn cast_delegated_vote(
        env: Env,
        delegatee: Address,
        candidate: CandidateId,
    ) -> Result<i128, ContractError> {
        delegatee.require_auth();

        let plan = Self::plan_cast_delegated_vote(&env, &delegatee)?;

        nullifier::spend(&env, &plan.nullifier)?;
        delegation::mark_consumed(&env, &plan.record);
        tally::increment(&env, candidate, plan.weight);
        events::publish_delegated_vote_cast(&env, candidate, plan.weight);

        Ok(plan.weight)
    }

    // ── Dry runs ──────────────────────────────────────────────────────────────

    /// Validate `cast_vote` without writing; returns the weight it would add.
    pub fn preflight_cast_vote(env: Env, voter: Address) -> Result<i128, ContractError> {
        Self::plan_cast_vote(&env, &voter).map(|plan| plan.weight)
    }

    /// Validate `delegate_vote` without writing; returns the record id it
    /// would create.
    pub fn preflight_delegate_vote(
        env: Env,
        voter: Address,
        delegatee: Address,
        blinding: BytesN<32>,
    ) -> Result<BytesN<32>, ContractError> {
        Self::plan_delegate_vote(&env, &voter, &delegatee, &blinding)
            .map(|plan| plan.record.record_id)
    }

    /// Validate `cast_delegated_vote` without writing; returns the weight it
    /// would add.
    pub fn preflight_cast_delegated_vote(
        env: Env,
        delegatee: Address,
    ) -> Result<i128, ContractError> {
        Self::plan_cast_delegated_vote(&env, &delegatee).map(|plan| plan.weight)
    }

    // ── Admin ─────────────────────────────────────────────────────────────────

    /// Close the election. Every later ballot action fails with
    /// `VotingClosed`; tallies stay readable.
    pub fn end_vote(env: Env, caller: Address) -> Result<(), ContractError> {
        let context = election::load(&env)?;
        caller.require_auth();

        if caller != context.admin {
            return Err(ContractError::Unauthorized);
        }
        election::require_open(&env)?;

        election::close(&env);
        events::publish_voting_ended(&env, &caller);

        Ok(())
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn get_vote(env: Env, candidate: CandidateId) -> i128 {
        tally::get(&env, candidate)
    }

    pub fn get_total_votes(env: Env) -> i128 {
        tally::total(&env)
    }

    pub fn is_active(env: Env) -> bool {
        election::is_initialized(&env) && !election::is_closed(&env)
    }

    pub fn get_context(env: Env) -> Result<ElectionContext, ContractError> {
        election::load(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        election::load(&env).map(|context| context.admin)
    }

    pub fn is_nullifier_spent(env: Env, nullifier: BytesN<32>) -> bool {
        common::nullifier::is_spent(&env, &nullifier)
    }

    pub fn get_spent_nullifier_count(env: Env) -> u32 {
        common::nullifier::spent_count(&env)
    }

    /// Nullifier the delegatee's next redemption would emit, if any
    /// delegation is waiting for them.
    pub fn redemption_nullifier(env: Env, delegatee: Address) -> Option<BytesN<32>> {
        delegatee.require_auth();
        delegation::next_unconsumed(&env, &delegatee)
            .map(|record| nullifier::for_redemption(&env, &delegatee, &record.record_id))
    }

    /// Delegations addressed to `delegatee`. Only the delegatee may read them.
    pub fn get_delegations(env: Env, delegatee: Address) -> Vec<DelegationRecord> {
        delegatee.require_auth();
        delegation::records_for(&env, &delegatee)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn plan_cast_vote(env: &Env, voter: &Address) -> Result<BallotPlan, ContractError> {
        let context = election::load(env)?;
        election::require_open(env)?;

        let nullifier = nullifier::for_voter(env, voter, NullifierDomain::Vote);
        nullifier::ensure_unspent(env, &nullifier)?;

        let weight = weight::resolve(env, &context, voter)?;

        Ok(BallotPlan { nullifier, weight })
    }

    fn plan_delegate_vote(
        env: &Env,
        voter: &Address,
        delegatee: &Address,
        blinding: &BytesN<32>,
    ) -> Result<DelegationPlan, ContractError> {
        let context = election::load(env)?;
        election::require_open(env)?;

        if voter == delegatee {
            return Err(ContractError::SelfDelegation);
        }

        let nullifier = nullifier::for_voter(env, voter, NullifierDomain::Delegate);
        nullifier::ensure_unspent(env, &nullifier)?;

        let balance = weight::resolve(env, &context, voter)?;
        let delegator = match context.delegated_weight {
            DelegatedWeight::Live => Some(voter.clone()),
            DelegatedWeight::Unit | DelegatedWeight::Snapshot => None,
        };

        let record = DelegationRecord {
            record_id: delegation::record_id(env, &nullifier, delegatee, blinding),
            delegatee: delegatee.clone(),
            blinding: blinding.clone(),
            weight: weight::at_delegation(&context, balance),
            delegator,
            consumed: false,
            created_at: env.ledger().timestamp(),
        };

        Ok(DelegationPlan { nullifier, record })
    }

    fn plan_cast_delegated_vote(
        env: &Env,
        delegatee: &Address,
    ) -> Result<RedemptionPlan, ContractError> {
        let context = election::load(env)?;
        election::require_open(env)?;

        let record =
            delegation::next_unconsumed(env, delegatee).ok_or(ContractError::DelegationNotFound)?;

        let nullifier = nullifier::for_redemption(env, delegatee, &record.record_id);
        nullifier::ensure_unspent(env, &nullifier)?;

        let weight = weight::at_redemption(env, &context, &record)?;

        Ok(RedemptionPlan {
            nullifier,
            record,
            weight,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
