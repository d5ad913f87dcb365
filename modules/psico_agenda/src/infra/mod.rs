pub mod events;
pub mod mock;
pub mod notify;
pub mod session;
