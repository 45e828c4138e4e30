//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod cursor_repo;
pub mod lock_repo;
pub mod presence_repo;
pub mod session_repo;

pub use activity_repo::ActivityLogRepo;
pub use cursor_repo::CursorRepo;
pub use lock_repo::{AcquireOutcome, EntityLockRepo};
pub use presence_repo::PresenceRepo;
pub use session_repo::SessionRepo;
