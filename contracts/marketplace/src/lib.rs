#![no_std]

mod error;
mod events;
mod storage;
mod ticket;

pub use error::MarketError;
pub use events::*;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};
use storage::{
    activate, active_count, active_listing_at, deactivate, get_config, get_listing,
    get_nft_contract, get_token_listing, has_config, listing_count, next_listing_id, set_config,
    set_listing, set_nft_contract,
};
use ticketing_types::{page_bounds, Listing, ListingStatus, MarketConfig, MAX_PAGE_SIZE};

#[contract]
pub struct Marketplace;

#[contractimpl]
impl Marketplace {
    /// Initialize the marketplace with its admin and settlement token
    pub fn initialize(env: Env, admin: Address, payment_token: Address) -> Result<(), MarketError> {
        if has_config(&env) {
            return Err(MarketError::AlreadyInitialized);
        }

        admin.require_auth();

        set_config(
            &env,
            &MarketConfig {
                admin,
                payment_token,
            },
        );
        Ok(())
    }

    /// Point the marketplace at the ticket contract it trades
    pub fn set_nft_contract_address(env: Env, nft_contract: Address) -> Result<(), MarketError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        set_nft_contract(&env, &nft_contract);

        NftContractSet { nft_contract }.publish(&env);
        Ok(())
    }

    /// List `token_id` for sale at `price`. Returns the listing id.
    ///
    /// The marketplace must be able to move the ticket, either through a
    /// per-token approval or as operator of the seller. Listing a token that
    /// already has an active listing cancels the older one.
    pub fn list_nft(
        env: Env,
        seller: Address,
        token_id: u64,
        price: i128,
    ) -> Result<u64, MarketError> {
        seller.require_auth();

        get_config(&env)?;
        let nft_contract = get_nft_contract(&env).ok_or(MarketError::NftContractNotSet)?;

        if price <= 0 {
            return Err(MarketError::InvalidPrice);
        }

        if ticket::owner_of(&env, &nft_contract, token_id).as_ref() != Some(&seller) {
            return Err(MarketError::NotTokenOwner);
        }

        let marketplace = env.current_contract_address();
        let approved = ticket::get_approved(&env, &nft_contract, token_id).as_ref()
            == Some(&marketplace)
            || ticket::is_approved_for_all(&env, &nft_contract, &seller, &marketplace);
        if !approved {
            return Err(MarketError::NotApproved);
        }

        if let Some(previous_id) = get_token_listing(&env, token_id) {
            close_listing(&env, previous_id, ListingStatus::Cancelled, None)?;
            Cancelled {
                listing_id: previous_id,
                token_id,
            }
            .publish(&env);
        }

        let listing_id = next_listing_id(&env);
        let listing = Listing {
            listing_id,
            token_id,
            seller: seller.clone(),
            price,
            status: ListingStatus::Active,
            buyer: None,
            created_at: env.ledger().timestamp(),
            token_transfers: ticket::transfer_count(&env, &nft_contract, token_id),
        };
        set_listing(&env, &listing);
        activate(&env, &listing);

        log!(&env, "Listed ticket {} as listing {}", token_id, listing_id);
        Listed {
            listing_id,
            seller,
            token_id,
            price,
        }
        .publish(&env);

        Ok(listing_id)
    }

    /// Buy an active listing. `payment` is the most the buyer is willing to
    /// pay; exactly the listing price is charged. Returns the seller.
    pub fn purchase_nft(
        env: Env,
        buyer: Address,
        listing_id: u64,
        payment: i128,
    ) -> Result<Address, MarketError> {
        buyer.require_auth();

        let config = get_config(&env)?;
        let nft_contract = get_nft_contract(&env).ok_or(MarketError::NftContractNotSet)?;

        let listing = get_listing(&env, listing_id)?;
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }

        if payment < listing.price {
            return Err(MarketError::InsufficientPayment);
        }

        if buyer == listing.seller {
            return Err(MarketError::SellerCannotBuy);
        }

        if is_stale(&env, &nft_contract, &listing) {
            return Err(MarketError::ListingStale);
        }

        // Effects before the external calls
        close_listing(&env, listing_id, ListingStatus::Sold, Some(buyer.clone()))?;

        token::Client::new(&env, &config.payment_token).transfer(
            &buyer,
            &listing.seller,
            &listing.price,
        );
        ticket::transfer_from(
            &env,
            &nft_contract,
            &listing.seller,
            &buyer,
            listing.token_id,
        );

        log!(&env, "Listing {} sold to {}", listing_id, buyer);
        Purchased {
            listing_id,
            buyer,
            seller: listing.seller.clone(),
            token_id: listing.token_id,
            price: listing.price,
        }
        .publish(&env);

        Ok(listing.seller)
    }

    /// Withdraw an active listing
    pub fn cancel_listing(env: Env, seller: Address, listing_id: u64) -> Result<(), MarketError> {
        seller.require_auth();

        let listing = get_listing(&env, listing_id)?;
        if listing.seller != seller {
            return Err(MarketError::NotSeller);
        }
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }

        close_listing(&env, listing_id, ListingStatus::Cancelled, None)?;

        Cancelled {
            listing_id,
            token_id: listing.token_id,
        }
        .publish(&env);
        Ok(())
    }

    /// Close an active listing whose ticket has moved since it was listed.
    /// Anyone may call this; the listing can never be bought anyway.
    pub fn close_stale_listing(env: Env, listing_id: u64) -> Result<(), MarketError> {
        let nft_contract = get_nft_contract(&env).ok_or(MarketError::NftContractNotSet)?;

        let listing = get_listing(&env, listing_id)?;
        if !listing.is_active() {
            return Err(MarketError::ListingNotActive);
        }
        if !is_stale(&env, &nft_contract, &listing) {
            return Err(MarketError::ListingNotStale);
        }

        close_listing(&env, listing_id, ListingStatus::Cancelled, None)?;

        log!(&env, "Closed stale listing {}", listing_id);
        Cancelled {
            listing_id,
            token_id: listing.token_id,
        }
        .publish(&env);
        Ok(())
    }

    // === View Functions ===

    pub fn get_listing(env: Env, listing_id: u64) -> Result<Listing, MarketError> {
        get_listing(&env, listing_id)
    }

    /// Active listings, at most 50
    pub fn fetch_market_items(env: Env) -> Vec<Listing> {
        Self::fetch_market_items_paginated(env, 0, MAX_PAGE_SIZE)
    }

    /// Active listings from `start_index` in the active set, `limit` capped at 50
    pub fn fetch_market_items_paginated(env: Env, start_index: u32, limit: u32) -> Vec<Listing> {
        let count = active_count(&env);
        let (start, end) = page_bounds(start_index as u64, limit, count as u64);

        let mut items: Vec<Listing> = Vec::new(&env);
        for index in start..end {
            if let Some(listing) = active_listing_at(&env, index as u32) {
                items.push_back(listing);
            }
        }
        items
    }

    /// Listings ever created, which is also the next listing id
    pub fn listing_count(env: Env) -> u64 {
        listing_count(&env)
    }

    pub fn active_count(env: Env) -> u32 {
        active_count(&env)
    }

    pub fn nft_contract(env: Env) -> Option<Address> {
        get_nft_contract(&env)
    }

    pub fn payment_token(env: Env) -> Result<Address, MarketError> {
        Ok(get_config(&env)?.payment_token)
    }

    pub fn admin(env: Env) -> Result<Address, MarketError> {
        Ok(get_config(&env)?.admin)
    }
}

// === Helper Functions ===

/// The seller no longer holds the ticket, or it left and came back since listing
fn is_stale(env: &Env, nft_contract: &Address, listing: &Listing) -> bool {
    ticket::owner_of(env, nft_contract, listing.token_id).as_ref() != Some(&listing.seller)
        || ticket::transfer_count(env, nft_contract, listing.token_id) != listing.token_transfers
}

fn close_listing(
    env: &Env,
    listing_id: u64,
    status: ListingStatus,
    buyer: Option<Address>,
) -> Result<(), MarketError> {
    let mut listing = get_listing(env, listing_id)?;
    listing.status = status;
    listing.buyer = buyer;
    set_listing(env, &listing);
    deactivate(env, listing_id, listing.token_id);
    Ok(())
}

#[cfg(test)]
mod test;
