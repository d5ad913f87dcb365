#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use psico_agenda::client::SchedulingApi;
use psico_agenda::domain::events::DashboardEvent;
use psico_agenda::domain::ports::{Clock, EventPublisher};
use psico_agenda::error::SchedulingError;
use psico_agenda::model::{
    Appointment, AppointmentStatus, NewAccount, Patient, Registered, Request, RequestStatus,
    Role, Session, User,
};

/// São Paulo offset, so calendar days differ from UTC late in the evening.
pub fn brt() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

/// 2024-05-10 local time at `h:m` in `brt()`.
pub fn local(day: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
    brt().with_ymd_and_hms(2024, 5, day, h, m, 0).unwrap()
}

pub fn psychologist(id: &str, name: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: format!("{id}@sunshine.app"),
        role: Role::Psychologist,
        phone: None,
        crp: Some("06/00000".into()),
        specialty: None,
        birth_date: None,
    }
}

pub fn session(user: User) -> Arc<Session> {
    Arc::new(Session::new(user, "token"))
}

pub fn appointment(
    id: &str,
    date: DateTime<FixedOffset>,
    patient_id: &str,
    psychologist_id: &str,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: id.into(),
        date: date.with_timezone(&Utc),
        patient_id: patient_id.into(),
        psychologist_id: psychologist_id.into(),
        status,
        notes: None,
    }
}

pub fn patient(id: &str) -> Patient {
    Patient {
        id: id.into(),
        name: format!("Paciente {id}"),
        email: None,
        phone: None,
        birth_date: None,
        psychologist_id: None,
        extra: Default::default(),
    }
}

pub fn request(id: &str, status: RequestStatus, preferred: Option<&str>) -> Request {
    Request {
        id: id.into(),
        status,
        preferred_psychologist: preferred.map(Into::into),
        patient_id: None,
        patient_name: None,
        message: None,
        created_at: None,
    }
}

pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DashboardEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<DashboardEvent> {
        self.events.lock().clone()
    }
}

impl EventPublisher<DashboardEvent> for RecordingPublisher {
    fn publish(&self, event: &DashboardEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Scheduling API whose `get_appointments` calls block until the test releases
/// them, one gate per call in issue order.
pub struct GatedApi {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<Appointment>, SchedulingError>>>>,
    entered: mpsc::UnboundedSender<()>,
    patients: Vec<Patient>,
}

pub type Gate = oneshot::Sender<Result<Vec<Appointment>, SchedulingError>>;

impl GatedApi {
    /// Returns the api, one sender per gate, and a receiver signalled every
    /// time a fetch reaches its gate.
    pub fn new(
        gates: usize,
        patients: Vec<Patient>,
    ) -> (Arc<Self>, Vec<Gate>, mpsc::UnboundedReceiver<()>) {
        let (entered, entered_rx) = mpsc::unbounded_channel();
        let mut senders = Vec::with_capacity(gates);
        let mut receivers = VecDeque::with_capacity(gates);
        for _ in 0..gates {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let api = Arc::new(Self {
            gates: Mutex::new(receivers),
            entered,
            patients,
        });
        (api, senders, entered_rx)
    }
}

#[async_trait]
impl SchedulingApi for GatedApi {
    async fn get_appointments(
        &self,
        _user_id: &str,
        _role: Role,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let gate = self.gates.lock().pop_front();
        let _ = self.entered.send(());
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(SchedulingError::internal())),
            None => Ok(Vec::new()),
        }
    }

    async fn get_patients(&self, _user_id: &str) -> Result<Vec<Patient>, SchedulingError> {
        Ok(self.patients.clone())
    }

    async fn get_requests(&self, _user_id: &str) -> Result<Vec<Request>, SchedulingError> {
        Ok(Vec::new())
    }

    async fn register(&self, _account: NewAccount) -> Result<Registered, SchedulingError> {
        Err(SchedulingError::internal())
    }
}
