//! In-memory implementation of the scheduling API, standing in for the booking
//! backend during development and tests.

pub mod seed;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::contract::{
    client::SchedulingApi,
    error::SchedulingError,
    model::{Appointment, NewAccount, Patient, Registered, Request, Role, RoleProfile, User},
};

pub use seed::Seed;

pub struct InMemorySchedulingApi {
    store: RwLock<Seed>,
    latency: Duration,
    offline: AtomicBool,
}

impl InMemorySchedulingApi {
    pub fn new(latency: Duration) -> Self {
        Self::from_seed(Seed::default(), latency)
    }

    pub fn from_seed(seed: Seed, latency: Duration) -> Self {
        info!(
            users = seed.users.len(),
            patients = seed.patients.len(),
            appointments = seed.appointments.len(),
            requests = seed.requests.len(),
            "in-memory scheduling api seeded"
        );
        Self {
            store: RwLock::new(seed),
            latency,
            offline: AtomicBool::new(false),
        }
    }

    /// While offline every call fails with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    pub fn add_appointment(&self, appointment: Appointment) {
        self.store.write().appointments.push(appointment);
    }

    pub fn add_patient(&self, patient: Patient) {
        self.store.write().patients.push(patient);
    }

    pub fn add_request(&self, request: Request) {
        self.store.write().requests.push(request);
    }

    pub fn find_user(&self, id: &str) -> Option<User> {
        self.store.read().users.iter().find(|u| u.id == id).cloned()
    }

    async fn round_trip(&self, op: &'static str) -> Result<(), SchedulingError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::Acquire) {
            debug!(op, "api offline");
            return Err(SchedulingError::unavailable("api offline"));
        }
        Ok(())
    }
}

fn require(value: &str, label: &str) -> Result<(), SchedulingError> {
    if value.trim().is_empty() {
        return Err(SchedulingError::validation(format!("{label} é obrigatório")));
    }
    Ok(())
}

#[async_trait]
impl SchedulingApi for InMemorySchedulingApi {
    async fn get_appointments(
        &self,
        user_id: &str,
        role: Role,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.round_trip("get_appointments").await?;
        let store = self.store.read();
        Ok(store
            .appointments
            .iter()
            .filter(|a| match role {
                Role::Psychologist => a.psychologist_id == user_id,
                Role::Patient => a.patient_id == user_id,
            })
            .cloned()
            .collect())
    }

    async fn get_patients(&self, user_id: &str) -> Result<Vec<Patient>, SchedulingError> {
        self.round_trip("get_patients").await?;
        let store = self.store.read();
        Ok(store
            .patients
            .iter()
            .filter(|p| {
                p.psychologist_id.as_deref() == Some(user_id)
                    || store
                        .appointments
                        .iter()
                        .any(|a| a.psychologist_id == user_id && a.patient_id == p.id)
            })
            .cloned()
            .collect())
    }

    async fn get_requests(&self, user_id: &str) -> Result<Vec<Request>, SchedulingError> {
        self.round_trip("get_requests").await?;
        let store = self.store.read();
        Ok(store
            .requests
            .iter()
            .filter(|r| {
                r.preferred_psychologist.as_deref() == Some(user_id)
                    || r.patient_id.as_deref() == Some(user_id)
            })
            .cloned()
            .collect())
    }

    async fn register(&self, account: NewAccount) -> Result<Registered, SchedulingError> {
        self.round_trip("register").await?;
        require(&account.name, "Nome")?;
        require(&account.email, "E-mail")?;
        require(&account.password, "Senha")?;

        let mut store = self.store.write();
        if store
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(account.email.trim()))
        {
            return Err(SchedulingError::conflict(account.email));
        }

        let (crp, specialty, birth_date) = match &account.profile {
            RoleProfile::Patient { birth_date } => (None, None, Some(birth_date.clone())),
            RoleProfile::Psychologist { crp, specialty } => {
                (Some(crp.clone()), Some(specialty.clone()), None)
            }
        };
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: account.name.trim().to_string(),
            email: account.email.trim().to_string(),
            role: account.profile.role(),
            phone: Some(account.phone),
            crp,
            specialty,
            birth_date,
        };

        if user.role == Role::Patient {
            store.patients.push(Patient {
                id: user.id.clone(),
                name: user.name.clone(),
                email: Some(user.email.clone()),
                phone: user.phone.clone(),
                birth_date: user.birth_date.clone(),
                psychologist_id: None,
                extra: Default::default(),
            });
        }
        store.users.push(user.clone());
        info!(user_id = %user.id, role = %user.role, "account registered");

        Ok(Registered {
            token: format!("mock-token-{}", Uuid::new_v4().simple()),
            user,
        })
    }
}
