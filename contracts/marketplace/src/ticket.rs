// Calls into the ticket contract

use soroban_sdk::{Address, Env, Error, IntoVal, Symbol};

/// Current owner of `token_id`, `None` when the ticket contract rejects the id
pub fn owner_of(env: &Env, nft_contract: &Address, token_id: u64) -> Option<Address> {
    match env.try_invoke_contract::<Address, Error>(
        nft_contract,
        &Symbol::new(env, "owner_of"),
        (token_id,).into_val(env),
    ) {
        Ok(Ok(owner)) => Some(owner),
        _ => None,
    }
}

pub fn transfer_count(env: &Env, nft_contract: &Address, token_id: u64) -> u32 {
    env.invoke_contract(
        nft_contract,
        &Symbol::new(env, "transfer_count"),
        (token_id,).into_val(env),
    )
}

pub fn get_approved(env: &Env, nft_contract: &Address, token_id: u64) -> Option<Address> {
    env.invoke_contract(
        nft_contract,
        &Symbol::new(env, "get_approved"),
        (token_id,).into_val(env),
    )
}

pub fn is_approved_for_all(
    env: &Env,
    nft_contract: &Address,
    owner: &Address,
    operator: &Address,
) -> bool {
    env.invoke_contract(
        nft_contract,
        &Symbol::new(env, "is_approved_for_all"),
        (owner, operator).into_val(env),
    )
}

/// Move `token_id` with the marketplace acting as spender
pub fn transfer_from(
    env: &Env,
    nft_contract: &Address,
    from: &Address,
    to: &Address,
    token_id: u64,
) {
    env.invoke_contract::<()>(
        nft_contract,
        &Symbol::new(env, "transfer_from"),
        (env.current_contract_address(), from, to, token_id).into_val(env),
    );
}
