use soroban_sdk::{contracttype, Address, String};

/// Ticket contract configuration - immutable after initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct TicketConfig {
    /// Contract owner, the only account allowed to mint
    pub admin: Address,
    pub name: String,
    pub symbol: String,
    /// Prefix for `token_uri`, the decimal token id is appended
    pub base_uri: String,
}

/// A wired Ticket/Marketplace pair created by the deployer
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub ticket: Address,
    pub marketplace: Address,
    /// Ledger sequence the pair was deployed in
    pub ledger: u32,
}
