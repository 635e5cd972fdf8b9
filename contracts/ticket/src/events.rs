use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mint {
    #[topic]
    pub to: Address,
    pub token_id: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transfer {
    #[topic]
    pub from: Address,
    #[topic]
    pub to: Address,
    pub token_id: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Approve {
    #[topic]
    pub approver: Address,
    #[topic]
    pub token_id: u64,
    pub approved: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApproveForAll {
    #[topic]
    pub owner: Address,
    pub operator: Address,
    pub approved: bool,
}

/// Signal that `caller` claims `token_id` and presents `secret`.
/// Off-chain verifiers listen for this; the contract stores nothing.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipApprovalRequest {
    #[topic]
    pub caller: Address,
    #[topic]
    pub token_id: u64,
    pub secret: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketplaceSet {
    pub marketplace: Address,
}
