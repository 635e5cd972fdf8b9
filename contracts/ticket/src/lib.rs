#![no_std]

mod error;
mod events;
#[cfg(test)]
mod invariants;
mod metadata;
mod storage;

pub use error::TicketError;
pub use events::*;

use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Vec};
use storage::{
    add_token_to_owner, get_approval, get_config, get_marketplace, get_owner, has_config,
    is_operator, remove_approval, remove_token_from_owner, set_approval, set_config,
    set_marketplace, set_operator, set_owner,
};
use ticketing_types::{page_bounds, TicketConfig};

#[contract]
pub struct Ticket;

#[contractimpl]
impl Ticket {
    /// Initialize the ticket collection. `admin` becomes the contract owner
    /// and the only account allowed to mint.
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        base_uri: String,
    ) -> Result<(), TicketError> {
        if has_config(&env) {
            return Err(TicketError::AlreadyInitialized);
        }

        admin.require_auth();

        if base_uri.len() as usize > metadata::MAX_BASE_URI_LEN {
            return Err(TicketError::BaseUriTooLong);
        }

        let config = TicketConfig {
            admin,
            name,
            symbol,
            base_uri,
        };
        set_config(&env, &config);

        log!(&env, "Ticket initialized, owner {}", config.admin);
        Ok(())
    }

    /// Tell the ticket contract which marketplace to auto-approve at mint
    pub fn set_marketplace_contract_address(
        env: Env,
        marketplace: Address,
    ) -> Result<(), TicketError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        set_marketplace(&env, &marketplace);

        MarketplaceSet { marketplace }.publish(&env);
        Ok(())
    }

    /// Mint the next ticket to `to`. Returns the new token id.
    ///
    /// When a marketplace is wired, `to` approves it as operator so listings
    /// can settle without a separate approval step.
    pub fn safe_mint(env: Env, to: Address) -> Result<u64, TicketError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        let token_id = storage::next_token_id(&env);
        set_owner(&env, token_id, &to);
        add_token_to_owner(&env, &to, token_id);

        if let Some(marketplace) = get_marketplace(&env) {
            if !is_operator(&env, &to, &marketplace) {
                set_operator(&env, &to, &marketplace, true);
                ApproveForAll {
                    owner: to.clone(),
                    operator: marketplace,
                    approved: true,
                }
                .publish(&env);
            }
        }

        log!(&env, "Minted ticket {} to {}", token_id, to);
        Mint { to, token_id }.publish(&env);

        Ok(token_id)
    }

    // === Transfers ===

    /// Owner-initiated transfer
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) -> Result<(), TicketError> {
        from.require_auth();

        let owner = get_owner(&env, token_id)?;
        if owner != from {
            return Err(TicketError::NotOwner);
        }

        move_token(&env, &from, &to, token_id)
    }

    /// Transfer by the owner, the token's approved address, or an operator of `from`
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        token_id: u64,
    ) -> Result<(), TicketError> {
        spender.require_auth();

        let owner = get_owner(&env, token_id)?;
        if owner != from {
            return Err(TicketError::NotOwner);
        }

        if !is_approved_or_owner(&env, &spender, &owner, token_id) {
            return Err(TicketError::NotAuthorized);
        }

        move_token(&env, &from, &to, token_id)
    }

    // === Approvals ===

    /// Approve `approved` to transfer `token_id`. Cleared on transfer.
    pub fn approve(
        env: Env,
        approver: Address,
        approved: Address,
        token_id: u64,
    ) -> Result<(), TicketError> {
        approver.require_auth();

        let owner = get_owner(&env, token_id)?;
        if approver != owner && !is_operator(&env, &owner, &approver) {
            return Err(TicketError::NotAuthorized);
        }

        set_approval(&env, token_id, &approved);

        Approve {
            approver,
            token_id,
            approved,
        }
        .publish(&env);
        Ok(())
    }

    /// Grant or revoke `operator` over every token `owner` holds
    pub fn set_approval_for_all(
        env: Env,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), TicketError> {
        owner.require_auth();

        if owner == operator {
            return Err(TicketError::SelfApproval);
        }

        set_operator(&env, &owner, &operator, approved);

        ApproveForAll {
            owner,
            operator,
            approved,
        }
        .publish(&env);
        Ok(())
    }

    // === Ownership proof ===

    /// Publish an ownership approval request for `token_id` carrying `secret`.
    ///
    /// Only the current owner may ask. Nothing is stored: verification of
    /// the secret happens off-chain against the emitted event.
    pub fn prove_ownership(
        env: Env,
        caller: Address,
        token_id: u64,
        secret: u64,
    ) -> Result<(), TicketError> {
        caller.require_auth();

        let owner = get_owner(&env, token_id)?;
        if owner != caller {
            return Err(TicketError::NotOwner);
        }

        OwnershipApprovalRequest {
            caller,
            token_id,
            secret,
        }
        .publish(&env);
        Ok(())
    }

    // === View Functions ===

    /// Contract owner (admin)
    pub fn owner(env: Env) -> Result<Address, TicketError> {
        Ok(get_config(&env)?.admin)
    }

    pub fn marketplace(env: Env) -> Option<Address> {
        get_marketplace(&env)
    }

    pub fn owner_of(env: Env, token_id: u64) -> Result<Address, TicketError> {
        get_owner(&env, token_id)
    }

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        storage::balance(&env, &owner)
    }

    pub fn total_supply(env: Env) -> u64 {
        storage::total_supply(&env)
    }

    /// Ownership changes of `token_id` since mint, 0 for unknown ids
    pub fn transfer_count(env: Env, token_id: u64) -> u32 {
        storage::transfer_count(&env, token_id)
    }

    pub fn get_approved(env: Env, token_id: u64) -> Option<Address> {
        get_approval(&env, token_id)
    }

    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        is_operator(&env, &owner, &operator)
    }

    pub fn name(env: Env) -> Result<String, TicketError> {
        Ok(get_config(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, TicketError> {
        Ok(get_config(&env)?.symbol)
    }

    pub fn token_uri(env: Env, token_id: u64) -> Result<String, TicketError> {
        get_owner(&env, token_id)?;
        let config = get_config(&env)?;
        Ok(metadata::token_uri(&env, &config.base_uri, token_id))
    }

    /// Token ids held by `owner`, `limit` capped at 50
    pub fn tokens_of_owner(env: Env, owner: Address, start_index: u32, limit: u32) -> Vec<u64> {
        let count = storage::balance(&env, &owner);
        let (start, end) = page_bounds(start_index as u64, limit, count as u64);

        let mut tokens: Vec<u64> = Vec::new(&env);
        for index in start..end {
            if let Some(token_id) = storage::token_of_owner_at(&env, &owner, index as u32) {
                tokens.push_back(token_id);
            }
        }
        tokens
    }
}

// === Helper Functions ===

fn is_approved_or_owner(env: &Env, spender: &Address, owner: &Address, token_id: u64) -> bool {
    if spender == owner {
        return true;
    }

    if get_approval(env, token_id).as_ref() == Some(spender) {
        return true;
    }

    is_operator(env, owner, spender)
}

fn move_token(env: &Env, from: &Address, to: &Address, token_id: u64) -> Result<(), TicketError> {
    if from == to {
        return Err(TicketError::InvalidRecipient);
    }

    set_owner(env, token_id, to);
    remove_approval(env, token_id);
    storage::bump_transfer_count(env, token_id);

    remove_token_from_owner(env, from, token_id);
    add_token_to_owner(env, to, token_id);

    Transfer {
        from: from.clone(),
        to: to.clone(),
        token_id,
    }
    .publish(env);
    Ok(())
}
