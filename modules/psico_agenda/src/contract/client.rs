use async_trait::async_trait;

use crate::contract::{
    error::SchedulingError,
    model::{Appointment, NewAccount, Patient, Registered, Request, Role},
};

/// Data-access API of the booking backend. Every listing is already scoped to
/// `user_id` by the implementation; consumers still apply their own filters.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    /// Appointments visible to `user_id` acting as `role`.
    async fn get_appointments(
        &self,
        user_id: &str,
        role: Role,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    /// Patients linked to the psychologist `user_id`.
    async fn get_patients(&self, user_id: &str) -> Result<Vec<Patient>, SchedulingError>;

    /// Care requests addressed to or created by `user_id`.
    async fn get_requests(&self, user_id: &str) -> Result<Vec<Request>, SchedulingError>;

    /// Create an account. Fails with `Conflict` on a duplicate e-mail.
    async fn register(&self, account: NewAccount) -> Result<Registered, SchedulingError>;
}
