pub mod dashboard;
pub mod error;
pub mod events;
pub mod ports;
pub mod refresh;
pub mod registration;
pub mod view;
