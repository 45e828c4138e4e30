//! Activity broadcasting for the copresence coordination service.
//!
//! Building blocks:
//!
//! - [`ActivityBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ActivityEvent`] -- the canonical activity event envelope.
//! - [`TopicFilter`] -- per-subscription entity/topic matching.
//! - [`Subscription`] -- a filtered receiver that surfaces dropped messages
//!   as an explicit resynchronize signal instead of silently skipping.

pub mod bus;
pub mod topic;

pub use bus::{ActivityBus, ActivityEvent, Subscription, SubscriptionLapse};
pub use topic::TopicFilter;
