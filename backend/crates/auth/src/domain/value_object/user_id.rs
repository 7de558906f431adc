pub use kernel::id::UserId;
