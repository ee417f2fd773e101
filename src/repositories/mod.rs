mod key_value;
#[cfg(test)]
pub mod memory;

pub use key_value::{KeyValueRepositoryTrait, RedisRepository};

#[cfg(test)]
pub use key_value::MockKeyValueRepositoryTrait;
