use soroban_sdk::contracterror;

/// Ticket contract errors. Codes are part of the contract interface.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TicketError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// No token was minted with this id
    TokenNotFound = 3,
    /// `from` (or the prover) does not own the token
    NotOwner = 4,
    /// Spender is neither owner, approved address nor operator
    NotAuthorized = 5,
    /// Transfer to the current owner
    InvalidRecipient = 6,
    /// Owner tried to make itself an operator
    SelfApproval = 7,
    /// Base URI leaves no room for the token id suffix
    BaseUriTooLong = 8,
}
