pub mod client;
pub mod error;
pub mod model;

pub use client::SchedulingApi;
pub use error::SchedulingError;
pub use model::{
    Appointment, AppointmentStatus, NewAccount, Patient, Registered, Request, RequestStatus,
    Role, RoleProfile, Session, User,
};
