pub use crate::error::Error;
pub use crate::{ItemId, UserId};

pub type AHashSet<V> = std::collections::HashSet<V, ahash::RandomState>;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
