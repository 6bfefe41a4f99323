#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use private_voting::{
    election::DelegatedWeight,
    nullifier::{self, NullifierDomain},
    PrivateVotingContract, PrivateVotingContractClient,
};
use soroban_sdk::{testutils::Address as _, token::StellarAssetClient, Address, BytesN, Env};

const VOTERS: usize = 5;
const CANDIDATES: u64 = 4;

/// Every ballot entry point plus closing. Indexes select from a fixed voter
/// pool.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Cast { voter: u8, candidate: u8 },
    Delegate { voter: u8, delegatee: u8, blinding: u8 },
    Redeem { delegatee: u8, candidate: u8 },
    Preflight { voter: u8 },
    EndVote,
}

#[derive(Arbitrary, Debug)]
pub struct FuzzInput {
    policy: u8,
    balances: [u16; VOTERS],
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: FuzzInput| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(PrivateVotingContract, ());
    let client = PrivateVotingContractClient::new(&env, &contract_id);

    let policy = match input.policy % 3 {
        0 => DelegatedWeight::Unit,
        1 => DelegatedWeight::Snapshot,
        _ => DelegatedWeight::Live,
    };
    if client.try_initialize(&admin, &token, &policy).is_err() {
        return;
    }

    let mut voters = Vec::with_capacity(VOTERS);
    for balance in input.balances {
        let v = Address::generate(&env);
        if balance > 0 {
            StellarAssetClient::new(&env, &token).mint(&v, &(balance as i128));
        }
        voters.push(v);
    }
    let pick = |i: u8| &voters[i as usize % VOTERS];
    let candidate = |c: u8| c as u64 % CANDIDATES + 1;

    let mut terminal = [0u32; VOTERS];

    for action in input.actions {
        let before = client.get_total_votes();
        let spent_before = client.get_spent_nullifier_count();

        let added = match action {
            FuzzAction::Cast { voter, candidate: c } => {
                let ok = client.try_cast_vote(pick(voter), &candidate(c));
                if let Ok(Ok(_)) = ok {
                    terminal[voter as usize % VOTERS] += 1;
                }
                ok.ok().and_then(|r| r.ok())
            }
            FuzzAction::Delegate { voter, delegatee, blinding } => {
                let ok = client.try_delegate_vote(
                    pick(voter),
                    pick(delegatee),
                    &BytesN::from_array(&env, &[blinding; 32]),
                );
                if let Ok(Ok(_)) = ok {
                    terminal[voter as usize % VOTERS] += 1;
                }
                ok.ok().and_then(|r| r.ok()).map(|_| 0)
            }
            FuzzAction::Redeem { delegatee, candidate: c } => client
                .try_cast_delegated_vote(pick(delegatee), &candidate(c))
                .ok()
                .and_then(|r| r.ok()),
            FuzzAction::Preflight { voter } => {
                let _ = client.try_preflight_cast_vote(pick(voter));
                assert_eq!(
                    client.get_spent_nullifier_count(),
                    spent_before,
                    "INVARIANT VIOLATION: dry run wrote a nullifier"
                );
                None
            }
            FuzzAction::EndVote => {
                let _ = client.try_end_vote(&admin);
                None
            }
        };

        // ── Post-action invariant checks ──
        let after = client.get_total_votes();
        assert!(after >= before, "INVARIANT VIOLATION: total decreased");
        match added {
            Some(w) => {
                assert_eq!(after, before + w, "INVARIANT VIOLATION: reported weight mismatch");
                assert!(client.get_spent_nullifier_count() == spent_before + 1);
            }
            None => {
                assert_eq!(after, before, "INVARIANT VIOLATION: failed action changed tally");
                assert_eq!(client.get_spent_nullifier_count(), spent_before);
            }
        }
    }

    for (i, v) in voters.iter().enumerate() {
        assert!(terminal[i] <= 1, "INVARIANT VIOLATION: voter acted twice");
        let n = nullifier::for_voter_in(&env, &contract_id, v, NullifierDomain::Vote);
        assert_eq!(client.is_nullifier_spent(&n), terminal[i] == 1);
    }

    let tallied: i128 = (1..=CANDIDATES).map(|c| client.get_vote(&c)).sum();
    assert_eq!(tallied, client.get_total_votes());
});
