use soroban_sdk::{contracttype, Address};

/// Lifecycle of a marketplace listing
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListingStatus {
    /// For sale
    Active,
    /// Purchased, ticket moved to the buyer
    Sold,
    /// Withdrawn by the seller, superseded by a newer listing, or closed
    /// after the ticket left the seller
    Cancelled,
}

/// Offer to sell one ticket at a fixed price
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    pub listing_id: u64,
    pub token_id: u64,
    /// Seller who receives payment
    pub seller: Address,
    /// Price in the marketplace payment token's smallest unit
    pub price: i128,
    pub status: ListingStatus,
    /// Set once the listing is sold
    pub buyer: Option<Address>,
    /// Ledger timestamp at listing time
    pub created_at: u64,
    /// Ticket transfer count when listed. The listing is stale once the
    /// ticket has moved, even if it came back to the seller.
    pub token_transfers: u32,
}

impl Listing {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

/// Marketplace configuration - immutable after initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct MarketConfig {
    /// Admin allowed to wire the ticket contract
    pub admin: Address,
    /// Token used to settle purchases
    pub payment_token: Address,
}
