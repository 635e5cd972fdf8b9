use soroban_sdk::{contracttype, Address, Env};
use ticketing_types::{
    TicketConfig, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND,
    PERSISTENT_TTL_THRESHOLD,
};

use crate::error::TicketError;

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Storage design:
// - Owner token lists use indexed storage (Balance + OwnerTokenAt) instead
//   of a Vec so no single entry grows with the holder's balance
// - TokenIndex gives O(1) swap-and-pop removal on transfer
// - A transfer touches at most 10 entries
// ============================================================================

/// Storage keys for the ticket contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Ticket configuration (Instance storage)
    Config,
    /// Marketplace auto-approved at mint (Instance storage)
    Marketplace,
    /// Next token id counter (Instance storage)
    NextTokenId,
    /// Token id -> owner
    Owner(u64),
    /// Owner -> number of tokens held
    Balance(Address),
    /// Owner -> index -> token id
    OwnerTokenAt(Address, u32),
    /// Token id -> index in its owner's list
    TokenIndex(u64),
    /// Token id -> approved address
    Approval(u64),
    /// Owner -> operator -> approved for all
    ApprovalForAll(Address, Address),
    /// Token id -> number of ownership changes
    TransferCount(u64),
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn set_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    extend_persistent_ttl(env, key);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<TicketConfig, TicketError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(TicketError::NotInitialized)
}

pub fn set_config(env: &Env, config: &TicketConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().set(&DataKey::NextTokenId, &0u64);
    extend_instance_ttl(env);
}

pub fn get_marketplace(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Marketplace)
}

pub fn set_marketplace(env: &Env, marketplace: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::Marketplace, marketplace);
    extend_instance_ttl(env);
}

// === Supply ===

/// Number of tokens minted so far, which is also the next token id.
pub fn total_supply(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0)
}

pub fn next_token_id(env: &Env) -> u64 {
    let id = total_supply(env);
    let next = id.checked_add(1).expect("Token id overflow");
    env.storage().instance().set(&DataKey::NextTokenId, &next);
    id
}

// === Ownership ===

pub fn get_owner(env: &Env, token_id: u64) -> Result<Address, TicketError> {
    env.storage()
        .persistent()
        .get(&DataKey::Owner(token_id))
        .ok_or(TicketError::TokenNotFound)
}

pub fn set_owner(env: &Env, token_id: u64, owner: &Address) {
    set_persistent(env, &DataKey::Owner(token_id), owner);
}

pub fn balance(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(owner.clone()))
        .unwrap_or(0)
}

pub fn token_of_owner_at(env: &Env, owner: &Address, index: u32) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerTokenAt(owner.clone(), index))
}

pub fn token_index(env: &Env, token_id: u64) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::TokenIndex(token_id))
}

/// Append a token to its owner's indexed list - O(1)
pub fn add_token_to_owner(env: &Env, owner: &Address, token_id: u64) {
    let count = balance(env, owner);

    set_persistent(env, &DataKey::OwnerTokenAt(owner.clone(), count), &token_id);
    set_persistent(env, &DataKey::TokenIndex(token_id), &count);
    set_persistent(env, &DataKey::Balance(owner.clone()), &(count + 1));
}

/// Remove a token from its owner's indexed list using swap-and-pop - O(1)
pub fn remove_token_from_owner(env: &Env, owner: &Address, token_id: u64) {
    let count = balance(env, owner);
    if count == 0 {
        return;
    }

    let index_to_remove = token_index(env, token_id).unwrap_or(0);
    let last_index = count - 1;

    if index_to_remove != last_index {
        if let Some(last_token_id) = token_of_owner_at(env, owner, last_index) {
            set_persistent(
                env,
                &DataKey::OwnerTokenAt(owner.clone(), index_to_remove),
                &last_token_id,
            );
            set_persistent(env, &DataKey::TokenIndex(last_token_id), &index_to_remove);
        }
    }

    env.storage()
        .persistent()
        .remove(&DataKey::OwnerTokenAt(owner.clone(), last_index));
    env.storage()
        .persistent()
        .remove(&DataKey::TokenIndex(token_id));

    if count > 1 {
        set_persistent(env, &DataKey::Balance(owner.clone()), &(count - 1));
    } else {
        env.storage()
            .persistent()
            .remove(&DataKey::Balance(owner.clone()));
    }
}

/// Ownership changes of `token_id` since mint. Lets holders of an older
/// snapshot (a marketplace listing) detect that the token moved in between.
pub fn transfer_count(env: &Env, token_id: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::TransferCount(token_id))
        .unwrap_or(0)
}

pub fn bump_transfer_count(env: &Env, token_id: u64) {
    let count = transfer_count(env, token_id).saturating_add(1);
    set_persistent(env, &DataKey::TransferCount(token_id), &count);
}

// === Approvals ===

pub fn get_approval(env: &Env, token_id: u64) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Approval(token_id))
}

pub fn set_approval(env: &Env, token_id: u64, approved: &Address) {
    set_persistent(env, &DataKey::Approval(token_id), approved);
}

pub fn remove_approval(env: &Env, token_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::Approval(token_id));
}

pub fn is_operator(env: &Env, owner: &Address, operator: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::ApprovalForAll(owner.clone(), operator.clone()))
        .unwrap_or(false)
}

pub fn set_operator(env: &Env, owner: &Address, operator: &Address, approved: bool) {
    let key = DataKey::ApprovalForAll(owner.clone(), operator.clone());
    if approved {
        set_persistent(env, &key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}
