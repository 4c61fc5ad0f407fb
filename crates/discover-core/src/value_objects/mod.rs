//! Value objects - immutable types that represent domain concepts

mod snowflake;
mod storage_url;
mod user_key;
mod vote_value;

pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use storage_url::StorageUrl;
pub use user_key::UserKey;
pub use vote_value::{VoteTally, VoteValue};
