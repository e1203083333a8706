//! Refresh-token records and issued token pairs.

pub mod pair;
pub mod record;

pub use pair::TokenPair;
pub use record::RefreshTokenRecord;
