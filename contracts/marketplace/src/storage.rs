use soroban_sdk::{contracttype, Address, Env};
use ticketing_types::{
    Listing, MarketConfig, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND,
    PERSISTENT_TTL_THRESHOLD,
};

use crate::error::MarketError;

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Storage design:
// - Every listing is kept under its own key and never deleted, so sold and
//   cancelled listings stay readable by id
// - Active listings form an indexed set (ActiveCount + ActiveAt + ActiveIndex)
//   with swap-and-pop removal, so market reads never scan closed listings
// - ActiveAt holds a copy of the listing itself: a market page costs one
//   read per item. Active listings never change in place, so the copy only
//   has to be dropped when the listing closes
// - TokenListing points a token at its single active listing
// ============================================================================

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin and payment token (Instance storage)
    Config,
    /// Ticket contract (Instance storage)
    NftContract,
    /// Number of listings ever created, also the next listing id (Instance storage)
    ListingCount,
    /// Number of active listings (Instance storage)
    ActiveCount,
    /// Listing id -> listing
    Listing(u64),
    /// Index -> active listing
    ActiveAt(u32),
    /// Active listing id -> index in the active set
    ActiveIndex(u64),
    /// Token id -> its active listing id
    TokenListing(u64),
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

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<MarketConfig, MarketError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(MarketError::NotInitialized)
}

pub fn set_config(env: &Env, config: &MarketConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().set(&DataKey::ListingCount, &0u64);
    env.storage().instance().set(&DataKey::ActiveCount, &0u32);
    extend_instance_ttl(env);
}

pub fn get_nft_contract(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::NftContract)
}

pub fn set_nft_contract(env: &Env, nft_contract: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::NftContract, nft_contract);
    extend_instance_ttl(env);
}

// === Listings ===

pub fn listing_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ListingCount)
        .unwrap_or(0)
}

pub fn next_listing_id(env: &Env) -> u64 {
    let id = listing_count(env);
    let next = id.checked_add(1).expect("Listing id overflow");
    env.storage().instance().set(&DataKey::ListingCount, &next);
    id
}

pub fn get_listing(env: &Env, listing_id: u64) -> Result<Listing, MarketError> {
    let key = DataKey::Listing(listing_id);
    let listing: Listing = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(MarketError::ListingNotFound)?;
    extend_persistent_ttl(env, &key);
    Ok(listing)
}

pub fn set_listing(env: &Env, listing: &Listing) {
    let key = DataKey::Listing(listing.listing_id);
    env.storage().persistent().set(&key, listing);
    extend_persistent_ttl(env, &key);
}

pub fn get_token_listing(env: &Env, token_id: u64) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::TokenListing(token_id))
}

// === Active set ===

pub fn active_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ActiveCount)
        .unwrap_or(0)
}

pub fn active_listing_at(env: &Env, index: u32) -> Option<Listing> {
    env.storage().persistent().get(&DataKey::ActiveAt(index))
}

/// Add a listing to the active set and point its token at it - O(1)
pub fn activate(env: &Env, listing: &Listing) {
    let count = active_count(env);

    let at_key = DataKey::ActiveAt(count);
    env.storage().persistent().set(&at_key, listing);
    extend_persistent_ttl(env, &at_key);

    let index_key = DataKey::ActiveIndex(listing.listing_id);
    env.storage().persistent().set(&index_key, &count);
    extend_persistent_ttl(env, &index_key);

    let token_key = DataKey::TokenListing(listing.token_id);
    env.storage().persistent().set(&token_key, &listing.listing_id);
    extend_persistent_ttl(env, &token_key);

    env.storage()
        .instance()
        .set(&DataKey::ActiveCount, &(count + 1));
}

/// Remove a listing from the active set using swap-and-pop - O(1)
pub fn deactivate(env: &Env, listing_id: u64, token_id: u64) {
    let count = active_count(env);
    let index_key = DataKey::ActiveIndex(listing_id);
    let Some(index_to_remove) = env.storage().persistent().get::<_, u32>(&index_key) else {
        return;
    };
    let last_index = count - 1;

    if index_to_remove != last_index {
        if let Some(last) = active_listing_at(env, last_index) {
            let moved_key = DataKey::ActiveAt(index_to_remove);
            env.storage().persistent().set(&moved_key, &last);
            extend_persistent_ttl(env, &moved_key);

            let moved_index_key = DataKey::ActiveIndex(last.listing_id);
            env.storage()
                .persistent()
                .set(&moved_index_key, &index_to_remove);
            extend_persistent_ttl(env, &moved_index_key);
        }
    }

    env.storage()
        .persistent()
        .remove(&DataKey::ActiveAt(last_index));
    env.storage().persistent().remove(&index_key);

    if get_token_listing(env, token_id) == Some(listing_id) {
        env.storage()
            .persistent()
            .remove(&DataKey::TokenListing(token_id));
    }

    env.storage()
        .instance()
        .set(&DataKey::ActiveCount, &last_index);
}
