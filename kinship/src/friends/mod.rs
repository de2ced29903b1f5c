//! Friendship manager and its operation handlers
//!
//! [`FriendshipManager`] is the entry point. It delegates to one handler per
//! resource, all sharing the same store handle.

mod contexts;
mod lifecycle;
mod likes;
mod manager;

pub use contexts::ContextOperations;
pub use lifecycle::FriendshipLifecycle;
pub use likes::LikeOperations;
pub use manager::FriendshipManager;
