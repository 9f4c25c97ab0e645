//! Fixed-window rate limiting, abuse detection, and block management

mod abuse;
mod fingerprint;
mod limiter;
mod types;


pub use fingerprint::client_fingerprint;
pub use limiter::RateLimiter;
pub use types::{
    ActionActivity, ActionReceipt, BlockRecord, BlockStatus, LimitDecision, RateLimitRecord,
    SuspicionReport,
};
