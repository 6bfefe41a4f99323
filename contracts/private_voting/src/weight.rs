//! Voting weight resolution against the configured token contract.

use soroban_sdk::{token::TokenClient, Address, Env};

use crate::delegation::DelegationRecord;
use crate::election::{DelegatedWeight, ElectionContext};
use crate::ContractError;

/// Current token balance of `holder`, rejected when it is not positive.
pub fn resolve(
    env: &Env,
    context: &ElectionContext,
    holder: &Address,
) -> Result<i128, ContractError> {
    let balance = TokenClient::new(env, &context.weight_source).balance(holder);
    if balance <= 0 {
        return Err(ContractError::NoVotingWeight);
    }
    Ok(balance)
}

/// Weight frozen into a delegation record when it is created.
///
/// Under `Live` the record carries no weight; it is resolved at redemption.
pub fn at_delegation(context: &ElectionContext, delegator_balance: i128) -> i128 {
    match context.delegated_weight {
        DelegatedWeight::Unit => 1,
        DelegatedWeight::Snapshot => delegator_balance,
        DelegatedWeight::Live => 0,
    }
}

/// Weight a delegatee adds to the tally when redeeming `record`.
pub fn at_redemption(
    env: &Env,
    context: &ElectionContext,
    record: &DelegationRecord,
) -> Result<i128, ContractError> {
    match context.delegated_weight {
        DelegatedWeight::Unit | DelegatedWeight::Snapshot => Ok(record.weight),
        DelegatedWeight::Live => {
            let delegator = record
                .delegator
                .as_ref()
                .ok_or(ContractError::DelegationNotFound)?;
            resolve(env, context, delegator)
        }
    }
}
