// ============================================================================
// INVARIANTS
// ============================================================================
//
// Checks over the ticket registry state, compiled for tests only. They read
// contract storage, so callers run them inside the contract's frame
// (`env.as_contract`).
//
// 1. Single owner: every minted id resolves to exactly one owner
// 2. Conservation: the sum of holder balances equals total supply
// 3. Index consistency: OwnerTokenAt / TokenIndex / Owner agree
//
// ============================================================================

use soroban_sdk::{Address, Env, Vec};

use crate::storage::{balance, get_owner, token_index, token_of_owner_at, total_supply};

/// Every id below the supply counter has an owner
pub fn all_tokens_owned(env: &Env) -> bool {
    (0..total_supply(env)).all(|token_id| get_owner(env, token_id).is_ok())
}

/// Sum of the given holders' balances equals total supply.
///
/// `holders` must list every account that ever received a token.
pub fn balances_match_supply(env: &Env, holders: &Vec<Address>) -> bool {
    let sum: u64 = holders.iter().map(|h| balance(env, &h) as u64).sum();
    sum == total_supply(env)
}

/// Each entry in `owner`'s index points back at `owner`, and the index
/// has no entry past its balance.
pub fn owner_index_consistent(env: &Env, owner: &Address) -> bool {
    let count = balance(env, owner);

    for index in 0..count {
        let Some(token_id) = token_of_owner_at(env, owner, index) else {
            return false;
        };
        if token_index(env, token_id) != Some(index) {
            return false;
        }
        match get_owner(env, token_id) {
            Ok(recorded) if recorded == *owner => {}
            _ => return false,
        }
    }

    token_of_owner_at(env, owner, count).is_none()
}
