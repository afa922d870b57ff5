//! Engine error taxonomy.

use crate::{ItemId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The rating sequence is empty. Rejected at construction, never mid-loop.
    #[error("the rating set is empty")]
    EmptyRatings,

    #[error("user #{user_id} is out of range (the store covers {n_users} users)")]
    UserOutOfRange { user_id: UserId, n_users: usize },

    #[error("item #{item_id} is out of range (the store covers {n_items} items)")]
    ItemOutOfRange { item_id: ItemId, n_items: usize },

    #[error("invalid hyperparameters: {0}")]
    InvalidHyperparameters(String),

    /// Supplied matrices do not agree with each other or with the rating set.
    #[error("factor shapes do not match: {0}")]
    ShapeMismatch(String),

    /// Non-finite values appeared in the factor matrices, usually from a
    /// learning rate too large for the data scale. The last stable iteration
    /// is `iteration - 1`.
    #[error("training diverged: non-finite factors after iteration {iteration}")]
    Diverged { iteration: usize },
}
