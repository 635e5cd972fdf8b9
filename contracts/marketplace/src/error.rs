use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// `set_nft_contract_address` has not been called
    NftContractNotSet = 3,
    /// Price must be strictly positive
    InvalidPrice = 4,
    NotTokenOwner = 5,
    /// Marketplace is neither approved for the token nor an operator of the seller
    NotApproved = 6,
    ListingNotFound = 7,
    ListingNotActive = 8,
    InsufficientPayment = 9,
    SellerCannotBuy = 10,
    NotSeller = 11,
    /// Seller no longer owns the listed ticket
    ListingStale = 12,
    /// Listing can still be bought, only stale listings may be closed by anyone
    ListingNotStale = 13,
}
