#![no_std]

mod deployment;
mod listing;

pub use deployment::*;
pub use listing::*;

/// Upper bound on entries returned by any paginated read.
///
/// Each returned entry costs one ledger read (an owner index slot or an
/// active listing slot). Adding the count entry, the contract instance and
/// its code, a full page touches at most 53 entries, under Soroban's 100
/// footprint entries per tx.
pub const MAX_PAGE_SIZE: u32 = 50;

// TTL constants (ledgers)
pub const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
pub const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
pub const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
pub const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Half-open index range `[start, end)` for a page of `limit` entries out of `count`.
///
/// `limit` is capped at [`MAX_PAGE_SIZE`]. A `start` past the end yields an
/// empty range.
pub fn page_bounds(start: u64, limit: u32, count: u64) -> (u64, u64) {
    let safe_limit = if limit > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        limit
    };

    let end = start.saturating_add(safe_limit as u64).min(count);
    let start = start.min(end);

    (start, end)
}
