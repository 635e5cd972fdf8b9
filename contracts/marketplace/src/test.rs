extern crate std;

use super::*;
use soroban_sdk::testutils::{Address as _, Events as _, Ledger};
use soroban_sdk::{token, Event, String};
use ticketing_ticket::{Ticket, TicketClient};

const PRICE: i128 = 1_000;

struct Setup<'a> {
    env: Env,
    admin: Address,
    market: MarketplaceClient<'a>,
    ticket: TicketClient<'a>,
    payment: token::Client<'a>,
    payment_admin: token::StellarAssetClient<'a>,
}

impl<'a> Setup<'a> {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);

        let sac = env.register_stellar_asset_contract_v2(admin.clone());
        let payment = token::Client::new(&env, &sac.address());
        let payment_admin = token::StellarAssetClient::new(&env, &sac.address());

        let ticket_id = env.register(Ticket, ());
        let ticket = TicketClient::new(&env, &ticket_id);
        ticket.initialize(
            &admin,
            &String::from_str(&env, "Ticket"),
            &String::from_str(&env, "TCK"),
            &String::from_str(&env, "ipfs://tickets/"),
        );

        let market_id = env.register(Marketplace, ());
        let market = MarketplaceClient::new(&env, &market_id);
        market.initialize(&admin, &sac.address());

        market.set_nft_contract_address(&ticket_id);
        ticket.set_marketplace_contract_address(&market_id);

        Setup {
            env,
            admin,
            market,
            ticket,
            payment,
            payment_admin,
        }
    }

    /// Mint a ticket to a fresh account and return both
    fn seller_with_ticket(&self) -> (Address, u64) {
        let seller = Address::generate(&self.env);
        let token_id = self.ticket.safe_mint(&seller);
        (seller, token_id)
    }

    fn funded_buyer(&self, amount: i128) -> Address {
        let buyer = Address::generate(&self.env);
        self.payment_admin.mint(&buyer, &amount);
        buyer
    }
}

// === Initialization Tests ===

#[test]
fn test_initialize() {
    let s = Setup::new();

    assert_eq!(s.market.admin(), s.admin);
    assert_eq!(s.market.payment_token(), s.payment.address);
    assert_eq!(s.market.nft_contract(), Some(s.ticket.address.clone()));
    assert_eq!(s.market.listing_count(), 0);
    assert_eq!(s.market.active_count(), 0);
}

#[test]
fn test_initialize_twice_fails() {
    let s = Setup::new();

    let result = s.market.try_initialize(&s.admin, &s.payment.address);
    assert_eq!(result, Err(Ok(MarketError::AlreadyInitialized)));
}

#[test]
fn test_list_without_nft_contract() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let market_id = env.register(Marketplace, ());
    let market = MarketplaceClient::new(&env, &market_id);
    market.initialize(&admin, &Address::generate(&env));

    let seller = Address::generate(&env);
    let result = market.try_list_nft(&seller, &0, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::NftContractNotSet)));
}

#[test]
fn test_set_nft_contract_emits_event() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let market_id = env.register(Marketplace, ());
    let market = MarketplaceClient::new(&env, &market_id);
    market.initialize(&admin, &Address::generate(&env));

    let nft_contract = Address::generate(&env);
    market.set_nft_contract_address(&nft_contract);

    let expected = NftContractSet { nft_contract };
    assert_eq!(
        env.events().all(),
        std::vec![expected.to_xdr(&env, &market_id)]
    );
}

// === Listing Tests ===

#[test]
fn test_list_nft() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    s.env.ledger().set_timestamp(1_700_000_000);
    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    assert_eq!(listing_id, 0);

    let listing = s.market.get_listing(&listing_id);
    assert_eq!(listing.token_id, token_id);
    assert_eq!(listing.seller, seller);
    assert_eq!(listing.price, PRICE);
    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(listing.buyer, None);
    assert_eq!(listing.created_at, 1_700_000_000);

    // Listing does not move the ticket
    assert_eq!(s.ticket.owner_of(&token_id), seller);
}

#[test]
fn test_list_emits_listed() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);

    let expected = Listed {
        listing_id,
        seller,
        token_id,
        price: PRICE,
    };
    assert_eq!(
        s.env.events().all().filter_by_contract(&s.market.address),
        std::vec![expected.to_xdr(&s.env, &s.market.address)]
    );
}

#[test]
fn test_list_zero_price() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let result = s.market.try_list_nft(&seller, &token_id, &0);
    assert_eq!(result, Err(Ok(MarketError::InvalidPrice)));
}

#[test]
fn test_list_not_owner() {
    let s = Setup::new();
    let (_seller, token_id) = s.seller_with_ticket();
    let stranger = Address::generate(&s.env);

    let result = s.market.try_list_nft(&stranger, &token_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::NotTokenOwner)));
}

#[test]
fn test_list_unknown_token() {
    let s = Setup::new();
    let seller = Address::generate(&s.env);

    let result = s.market.try_list_nft(&seller, &42, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::NotTokenOwner)));
}

#[test]
fn test_list_without_approval() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    s.ticket
        .set_approval_for_all(&seller, &s.market.address, &false);

    let result = s.market.try_list_nft(&seller, &token_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::NotApproved)));
}

#[test]
fn test_list_with_single_token_approval() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    s.ticket
        .set_approval_for_all(&seller, &s.market.address, &false);
    s.ticket.approve(&seller, &s.market.address, &token_id);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    assert!(s.market.get_listing(&listing_id).is_active());
}

#[test]
fn test_relist_cancels_previous() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let first = s.market.list_nft(&seller, &token_id, &PRICE);
    let second = s.market.list_nft(&seller, &token_id, &(PRICE * 2));

    assert_eq!(second, first + 1);
    assert_eq!(
        s.market.get_listing(&first).status,
        ListingStatus::Cancelled
    );
    assert!(s.market.get_listing(&second).is_active());

    let items = s.market.fetch_market_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.get_unchecked(0).listing_id, second);
}

#[test]
fn test_relist_emits_cancelled_then_listed() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let first = s.market.list_nft(&seller, &token_id, &PRICE);
    let second = s.market.list_nft(&seller, &token_id, &(PRICE * 2));

    let cancelled = Cancelled {
        listing_id: first,
        token_id,
    };
    let listed = Listed {
        listing_id: second,
        seller,
        token_id,
        price: PRICE * 2,
    };
    assert_eq!(
        s.env.events().all().filter_by_contract(&s.market.address),
        std::vec![
            cancelled.to_xdr(&s.env, &s.market.address),
            listed.to_xdr(&s.env, &s.market.address),
        ]
    );
}

// === Purchase Tests ===

#[test]
fn test_purchase_nft() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let buyer = s.funded_buyer(PRICE * 3);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    let paid_to = s.market.purchase_nft(&buyer, &listing_id, &(PRICE * 2));

    let expected = Purchased {
        listing_id,
        buyer: buyer.clone(),
        seller: seller.clone(),
        token_id,
        price: PRICE,
    };
    assert_eq!(
        s.env.events().all().filter_by_contract(&s.market.address),
        std::vec![expected.to_xdr(&s.env, &s.market.address)]
    );
    assert_eq!(paid_to, seller);

    // Ticket moved
    assert_eq!(s.ticket.owner_of(&token_id), buyer);
    assert_eq!(s.ticket.balance_of(&seller), 0);
    assert_eq!(s.ticket.balance_of(&buyer), 1);

    // Exactly the price moved
    assert_eq!(s.payment.balance(&seller), PRICE);
    assert_eq!(s.payment.balance(&buyer), PRICE * 2);

    let listing = s.market.get_listing(&listing_id);
    assert_eq!(listing.status, ListingStatus::Sold);
    assert_eq!(listing.buyer, Some(buyer.clone()));
    assert_eq!(s.market.fetch_market_items().len(), 0);
}

#[test]
fn test_purchase_insufficient_payment() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let buyer = s.funded_buyer(PRICE);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    let result = s.market.try_purchase_nft(&buyer, &listing_id, &(PRICE - 1));

    assert_eq!(result, Err(Ok(MarketError::InsufficientPayment)));
    assert_eq!(s.ticket.owner_of(&token_id), seller);
    assert_eq!(s.payment.balance(&buyer), PRICE);
}

#[test]
fn test_purchase_by_seller() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    s.payment_admin.mint(&seller, &PRICE);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    let result = s.market.try_purchase_nft(&seller, &listing_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::SellerCannotBuy)));
}

#[test]
fn test_purchase_twice() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let buyer = s.funded_buyer(PRICE);
    let late_buyer = s.funded_buyer(PRICE);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    s.market.purchase_nft(&buyer, &listing_id, &PRICE);

    let result = s.market.try_purchase_nft(&late_buyer, &listing_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::ListingNotActive)));
}

#[test]
fn test_purchase_unknown_listing() {
    let s = Setup::new();
    let buyer = s.funded_buyer(PRICE);

    let result = s.market.try_purchase_nft(&buyer, &3, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::ListingNotFound)));
}

#[test]
fn test_purchase_stale_listing() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let friend = Address::generate(&s.env);
    let buyer = s.funded_buyer(PRICE);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);

    // Ticket leaves the seller outside the marketplace
    s.ticket.transfer(&seller, &friend, &token_id);

    let result = s.market.try_purchase_nft(&buyer, &listing_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::ListingStale)));
    assert_eq!(s.payment.balance(&buyer), PRICE);
}

#[test]
fn test_listing_stays_stale_after_ticket_returns() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let friend = Address::generate(&s.env);
    let buyer = s.funded_buyer(PRICE);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);

    s.ticket.transfer(&seller, &friend, &token_id);
    s.ticket.transfer(&friend, &seller, &token_id);
    assert_eq!(s.ticket.owner_of(&token_id), seller);

    // The old price does not come back to life
    let result = s.market.try_purchase_nft(&buyer, &listing_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::ListingStale)));
    assert_eq!(s.payment.balance(&buyer), PRICE);

    // A fresh listing by the seller is buyable
    let relisted = s.market.list_nft(&seller, &token_id, &PRICE);
    s.market.purchase_nft(&buyer, &relisted, &PRICE);
    assert_eq!(s.ticket.owner_of(&token_id), buyer);
}

#[test]
fn test_resale_after_purchase() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let buyer = s.funded_buyer(PRICE);
    let second_buyer = s.funded_buyer(PRICE * 2);

    let first = s.market.list_nft(&seller, &token_id, &PRICE);
    s.market.purchase_nft(&buyer, &first, &PRICE);

    // Buyer was not minted to, so it approves the marketplace itself
    s.ticket
        .set_approval_for_all(&buyer, &s.market.address, &true);
    let second = s.market.list_nft(&buyer, &token_id, &(PRICE * 2));
    s.market.purchase_nft(&second_buyer, &second, &(PRICE * 2));

    assert_eq!(s.ticket.owner_of(&token_id), second_buyer);
    assert_eq!(s.payment.balance(&buyer), PRICE * 2);
    assert_eq!(s.payment.balance(&seller), PRICE);
}

// === Cancel Tests ===

#[test]
fn test_cancel_listing() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    s.market.cancel_listing(&seller, &listing_id);

    let expected = Cancelled {
        listing_id,
        token_id,
    };
    assert_eq!(
        s.env.events().all(),
        std::vec![expected.to_xdr(&s.env, &s.market.address)]
    );

    assert_eq!(
        s.market.get_listing(&listing_id).status,
        ListingStatus::Cancelled
    );
    assert_eq!(s.market.active_count(), 0);

    let buyer = s.funded_buyer(PRICE);
    let result = s.market.try_purchase_nft(&buyer, &listing_id, &PRICE);
    assert_eq!(result, Err(Ok(MarketError::ListingNotActive)));
}

#[test]
fn test_cancel_by_other_account() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let stranger = Address::generate(&s.env);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    let result = s.market.try_cancel_listing(&stranger, &listing_id);
    assert_eq!(result, Err(Ok(MarketError::NotSeller)));
}

#[test]
fn test_cancel_twice() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    s.market.cancel_listing(&seller, &listing_id);

    let result = s.market.try_cancel_listing(&seller, &listing_id);
    assert_eq!(result, Err(Ok(MarketError::ListingNotActive)));
}

// === Stale Listing Tests ===

#[test]
fn test_close_stale_listing_by_anyone() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let friend = Address::generate(&s.env);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    s.ticket.transfer(&seller, &friend, &token_id);

    // Still listed until someone closes it
    assert_eq!(s.market.fetch_market_items().len(), 1);

    s.market.close_stale_listing(&listing_id);

    let expected = Cancelled {
        listing_id,
        token_id,
    };
    assert_eq!(
        s.env.events().all().filter_by_contract(&s.market.address),
        std::vec![expected.to_xdr(&s.env, &s.market.address)]
    );

    assert_eq!(
        s.market.get_listing(&listing_id).status,
        ListingStatus::Cancelled
    );
    assert_eq!(s.market.fetch_market_items().len(), 0);
    assert_eq!(s.market.active_count(), 0);
}

#[test]
fn test_close_stale_listing_after_round_trip() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();
    let friend = Address::generate(&s.env);

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    s.ticket.transfer(&seller, &friend, &token_id);
    s.ticket.transfer(&friend, &seller, &token_id);

    s.market.close_stale_listing(&listing_id);
    assert_eq!(s.market.fetch_market_items().len(), 0);
}

#[test]
fn test_close_stale_listing_rejects_live_listing() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);

    let result = s.market.try_close_stale_listing(&listing_id);
    assert_eq!(result, Err(Ok(MarketError::ListingNotStale)));
    assert!(s.market.get_listing(&listing_id).is_active());
}

#[test]
fn test_close_stale_listing_already_closed() {
    let s = Setup::new();
    let (seller, token_id) = s.seller_with_ticket();

    let listing_id = s.market.list_nft(&seller, &token_id, &PRICE);
    s.market.cancel_listing(&seller, &listing_id);

    let result = s.market.try_close_stale_listing(&listing_id);
    assert_eq!(result, Err(Ok(MarketError::ListingNotActive)));
}

// === Market Items Tests ===

#[test]
fn test_fetch_market_items() {
    let s = Setup::new();

    let mut listing_ids = std::vec::Vec::new();
    for _ in 0..4 {
        let (seller, token_id) = s.seller_with_ticket();
        listing_ids.push((seller.clone(), s.market.list_nft(&seller, &token_id, &PRICE)));
    }
    assert_eq!(s.market.fetch_market_items().len(), 4);

    // Close the first listing; the last one takes its slot
    let (first_seller, first_id) = listing_ids[0].clone();
    s.market.cancel_listing(&first_seller, &first_id);

    let items = s.market.fetch_market_items();
    assert_eq!(items.len(), 3);
    assert_eq!(items.get_unchecked(0).listing_id, listing_ids[3].1);
    assert!(items.iter().all(|item| item.is_active()));

    assert_eq!(s.market.listing_count(), 4);
    assert_eq!(s.market.active_count(), 3);
}

#[test]
fn test_fetch_market_items_paginated() {
    let s = Setup::new();

    for _ in 0..5 {
        let (seller, token_id) = s.seller_with_ticket();
        s.market.list_nft(&seller, &token_id, &PRICE);
    }

    let page = s.market.fetch_market_items_paginated(&0, &2);
    assert_eq!(page.len(), 2);
    assert_eq!(page.get_unchecked(0).listing_id, 0);
    assert_eq!(page.get_unchecked(1).listing_id, 1);

    let tail = s.market.fetch_market_items_paginated(&4, &10);
    assert_eq!(tail.len(), 1);
    assert_eq!(tail.get_unchecked(0).listing_id, 4);

    assert_eq!(s.market.fetch_market_items_paginated(&10, &10).len(), 0);
}

#[test]
fn test_fetch_market_items_empty() {
    let s = Setup::new();
    assert_eq!(s.market.fetch_market_items().len(), 0);
}

#[test]
fn test_fetch_market_items_full_page() {
    let s = Setup::new();

    for _ in 0..MAX_PAGE_SIZE + 1 {
        let (seller, token_id) = s.seller_with_ticket();
        s.market.list_nft(&seller, &token_id, &PRICE);
    }
    assert_eq!(s.market.active_count(), MAX_PAGE_SIZE + 1);

    let items = s.market.fetch_market_items();
    assert_eq!(items.len(), MAX_PAGE_SIZE);
    assert_eq!(items.get_unchecked(0).listing_id, 0);

    let rest = s.market.fetch_market_items_paginated(&MAX_PAGE_SIZE, &MAX_PAGE_SIZE);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest.get_unchecked(0).listing_id, MAX_PAGE_SIZE as u64);
}
