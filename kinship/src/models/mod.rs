//! Domain models for friendships and the annotations attached to them

pub mod context;
pub mod friendship;
pub mod like;
pub mod user_id;

// Re-export important models
pub use context::FriendContext;
pub use friendship::{Friendship, FriendshipStatus};
pub use like::FriendLike;
pub use user_id::UserId;
