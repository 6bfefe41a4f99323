//! # Private Voting Testing Framework
//!
//! A reusable harness for the private voting contract supporting
//! property-based testing, invariant checking, state exploration, a
//! declarative scenario DSL and a model of the two validation layers a
//! transaction passes through before it is final.
//!
//! ## Architecture
//!
//! ```text
//! test/framework/
//! ├── mod.rs             # Core TestEnv, VotingTestHarness, re-exports
//! ├── generators.rs      # Property-based test value generators
//! ├── invariants.rs      # Tally & nullifier invariants
//! ├── settlement.rs      # Simulation, mempool and ordered settlement
//! ├── state_explorer.rs  # Action-sequence exploration with a reference model
//! └── scenario_dsl.rs    # Declarative test scenario builder
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut env = TestEnv::new();
//! let harness = VotingTestHarness::new(&mut env, DelegatedWeight::Unit);
//! let alice = harness.create_voter(100);
//! harness.cast_vote(&alice, 1);
//! assert_eq!(harness.get_vote(1), 100);
//! ```

extern crate std;


use private_voting::{
    delegation::DelegationRecord,
    election::DelegatedWeight,
    nullifier::{self, NullifierDomain},
    PrivateVotingContract, PrivateVotingContractClient,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, BytesN, Env, Vec as SorobanVec,
};

use settlement::Sequencer;

// ── Core Test Environment ────────────────────────────────────────────────────

/// A high-level test environment that wraps the Soroban `Env` and provides
/// token deployment, time control, and address management.
pub struct TestEnv {
    pub env: Env,
    generated_addresses: std::vec::Vec<Address>,
}

impl TestEnv {
    /// Create a new test environment with all auth mocked.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        Self {
            env,
            generated_addresses: std::vec::Vec::new(),
        }
    }

    /// Generate a fresh Soroban address (cached for re-use).
    pub fn generate_address(&mut self) -> Address {
        let addr = Address::generate(&self.env);
        self.generated_addresses.push(addr.clone());
        addr
    }

    /// Generate `n` distinct addresses.
    pub fn generate_addresses(&mut self, n: usize) -> std::vec::Vec<Address> {
        (0..n).map(|_| self.generate_address()).collect()
    }

    /// Advance the ledger timestamp by `delta` seconds.
    pub fn advance_time(&self, delta: u64) {
        let current = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(current.saturating_add(delta));
    }

    /// Current ledger timestamp.
    pub fn timestamp(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    /// Deploy a SAC token used as the weight source.
    pub fn deploy_weight_token(&self) -> Address {
        self.env
            .register_stellar_asset_contract_v2(Address::generate(&self.env))
            .address()
    }

    /// Mint tokens from a SAC token to a recipient.
    pub fn mint_tokens(&self, token: &Address, recipient: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, token).mint(recipient, &amount);
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ── Voting Harness ───────────────────────────────────────────────────────────

/// Pre-wired private voting contract with its weight token deployed.
pub struct VotingTestHarness<'a> {
    pub env: &'a mut TestEnv,
    pub client: PrivateVotingContractClient<'static>,
    pub contract_id: Address,
    pub admin: Address,
    pub weight_token: Address,
    pub policy: DelegatedWeight,
}

impl<'a> VotingTestHarness<'a> {
    /// Deploy and initialize a voting contract using `policy` for delegations.
    pub fn new(env: &'a mut TestEnv, policy: DelegatedWeight) -> Self {
        let weight_token = env.deploy_weight_token();
        let contract_id = env.env.register(PrivateVotingContract, ());
        let client = PrivateVotingContractClient::new(&env.env, &contract_id);
        let admin = env.generate_address();

        client.initialize(&admin, &weight_token, &policy);

        Self {
            env,
            client,
            contract_id,
            admin,
            weight_token,
            policy,
        }
    }

    /// Create a voter holding `weight` tokens.
    pub fn create_voter(&self, weight: i128) -> Address {
        let voter = Address::generate(&self.env.env);
        if weight > 0 {
            self.env.mint_tokens(&self.weight_token, &voter, weight);
        }
        voter
    }

    /// Deterministic blinding value for tests.
    pub fn blinding(&self, seed: u8) -> BytesN<32> {
        BytesN::from_array(&self.env.env, &[seed; 32])
    }

    pub fn cast_vote(&self, voter: &Address, candidate: u64) -> i128 {
        self.client.cast_vote(voter, &candidate)
    }

    pub fn delegate(&self, voter: &Address, delegatee: &Address, blinding_seed: u8) -> BytesN<32> {
        self.client
            .delegate_vote(voter, delegatee, &self.blinding(blinding_seed))
    }

    pub fn cast_delegated(&self, delegatee: &Address, candidate: u64) -> i128 {
        self.client.cast_delegated_vote(delegatee, &candidate)
    }

    pub fn end_vote(&self) {
        self.client.end_vote(&self.admin);
    }

    pub fn get_vote(&self, candidate: u64) -> i128 {
        self.client.get_vote(&candidate)
    }

    pub fn total_votes(&self) -> i128 {
        self.client.get_total_votes()
    }

    pub fn spent_nullifiers(&self) -> u32 {
        self.client.get_spent_nullifier_count()
    }

    /// Ballot nullifier `voter` emits in this election, derived off-ledger.
    pub fn ballot_nullifier(&self, voter: &Address) -> BytesN<32> {
        nullifier::for_voter_in(&self.env.env, &self.contract_id, voter, NullifierDomain::Vote)
    }

    /// Whether `voter` has used their ballot nullifier (voted or delegated).
    pub fn ballot_spent(&self, voter: &Address) -> bool {
        self.client.is_nullifier_spent(&self.ballot_nullifier(voter))
    }

    pub fn delegations(&self, delegatee: &Address) -> SorobanVec<DelegationRecord> {
        self.client.get_delegations(delegatee)
    }

    /// A submitter/node pair bound to this contract.
    pub fn sequencer(&self) -> Sequencer<'_> {
        Sequencer::new(&self.client)
    }

    /// Snapshot of all observable voting state for invariant checking.
    pub fn snapshot(&self, voters: &[Address], candidates: &[u64]) -> VotingSnapshot {
        let tallies = candidates
            .iter()
            .map(|c| (*c, self.get_vote(*c)))
            .collect();
        let ballots = voters
            .iter()
            .map(|v| (v.clone(), self.ballot_spent(v)))
            .collect();

        VotingSnapshot {
            timestamp: self.env.timestamp(),
            tallies,
            total_votes: self.total_votes(),
            spent_nullifiers: self.spent_nullifiers(),
            ballots,
            active: self.client.is_active(),
        }
    }
}

/// Immutable snapshot of voting contract state at a point in time.
#[derive(Debug, Clone)]
pub struct VotingSnapshot {
    pub timestamp: u64,
    pub tallies: std::vec::Vec<(u64, i128)>,
    pub total_votes: i128,
    pub spent_nullifiers: u32,
    /// Per voter: whether their ballot nullifier is registered.
    pub ballots: std::vec::Vec<(Address, bool)>,
    pub active: bool,
}

impl VotingSnapshot {
    /// Sum of the tracked candidates' tallies.
    pub fn sum_tallies(&self) -> i128 {
        self.tallies.iter().map(|(_, t)| t).sum()
    }

    pub fn tally(&self, candidate: u64) -> i128 {
        self.tallies
            .iter()
            .find(|(c, _)| *c == candidate)
            .map(|(_, t)| *t)
            .unwrap_or(0)
    }

    pub fn spent_ballots(&self) -> usize {
        self.ballots.iter().filter(|(_, spent)| *spent).count()
    }
}

// ── Test Outcome Tracking ────────────────────────────────────────────────────

/// Result of a single test action, used by the state explorer and scenario DSL.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action succeeded, carrying the weight it applied.
    Ok(i128),
    /// The action failed with a contract error code.
    ExpectedError(u32),
    /// The action failed outside the contract's error set.
    UnexpectedError(std::string::String),
}

/// Summary of a test run with coverage metrics.
#[derive(Debug, Clone)]
pub struct TestRunSummary {
    pub actions_executed: usize,
    pub invariant_checks: usize,
    pub invariant_violations: std::vec::Vec<std::string::String>,
    pub entry_points_hit: std::collections::HashSet<std::string::String>,
    pub transitions_observed: usize,
}

impl TestRunSummary {
    pub fn new() -> Self {
        Self {
            actions_executed: 0,
            invariant_checks: 0,
            invariant_violations: std::vec::Vec::new(),
            entry_points_hit: std::collections::HashSet::new(),
            transitions_observed: 0,
        }
    }

    /// True when no invariant violations were detected.
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    /// Coverage ratio: entry points hit / total known entry points.
    pub fn entry_point_coverage(&self, total_entry_points: usize) -> f64 {
        if total_entry_points == 0 {
            return 0.0;
        }
        self.entry_points_hit.len() as f64 / total_entry_points as f64
    }
}

impl Default for TestRunSummary {
    fn default() -> Self {
        Self::new()
    }
}
