use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::model::{
    Appointment, AppointmentStatus, Patient, Request, RequestStatus, Role, User,
};

/// Initial contents of the in-memory API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Seed {
    /// Load a fixture file. YAML is a superset of JSON, so both are accepted.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read seed file '{}'", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid seed file '{}'", path.display()))
    }

    /// Small demo practice laid out around `now`: one busy psychologist (`p1`),
    /// one brand-new psychologist (`p2`) and a patient account (`pt1`).
    pub fn demo(now: DateTime<Utc>) -> Self {
        let psychologist = |id: &str, name: &str, email: &str, crp: &str| User {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::Psychologist,
            phone: None,
            crp: Some(crp.into()),
            specialty: Some("Psicologia Clínica".into()),
            birth_date: None,
        };
        let patient = |id: &str, name: &str, email: &str| Patient {
            id: id.into(),
            name: name.into(),
            email: Some(email.into()),
            phone: None,
            birth_date: None,
            psychologist_id: Some("p1".into()),
            extra: Default::default(),
        };
        let appointment = |id: &str, offset: Duration, patient_id: &str, status| Appointment {
            id: id.into(),
            date: now + offset,
            patient_id: patient_id.into(),
            psychologist_id: "p1".into(),
            status,
            notes: None,
        };

        Seed {
            users: vec![
                psychologist("p1", "Dra. Ana Souza", "ana@sunshine.app", "06/12345"),
                psychologist("p2", "Dr. Bruno Lima", "bruno@sunshine.app", "06/54321"),
                User {
                    id: "pt1".into(),
                    name: "Carla Mendes".into(),
                    email: "carla@example.com".into(),
                    role: Role::Patient,
                    phone: Some("(11) 98888-0001".into()),
                    crp: None,
                    specialty: None,
                    birth_date: Some("1990-04-12".into()),
                },
            ],
            patients: vec![
                patient("pt1", "Carla Mendes", "carla@example.com"),
                patient("pt2", "Diego Rocha", "diego@example.com"),
                patient("pt3", "Elisa Prado", "elisa@example.com"),
            ],
            appointments: vec![
                appointment("a1", Duration::hours(1), "pt1", AppointmentStatus::Scheduled),
                appointment("a2", Duration::days(1), "pt2", AppointmentStatus::Scheduled),
                appointment("a3", Duration::days(3), "pt3", AppointmentStatus::Scheduled),
                appointment("a4", -Duration::days(1), "pt1", AppointmentStatus::Completed),
                appointment("a5", -Duration::days(7), "pt2", AppointmentStatus::Completed),
                appointment("a6", Duration::days(2), "pt3", AppointmentStatus::Cancelled),
                // patient record was removed; must not show up in the upcoming list
                appointment("a7", Duration::days(4), "pt9", AppointmentStatus::Scheduled),
            ],
            requests: vec![
                Request {
                    id: "r1".into(),
                    status: RequestStatus::Pending,
                    preferred_psychologist: Some("p1".into()),
                    patient_id: None,
                    patient_name: Some("Fábio Teixeira".into()),
                    message: Some("Gostaria de iniciar terapia.".into()),
                    created_at: Some(now - Duration::hours(5)),
                },
                Request {
                    id: "r2".into(),
                    status: RequestStatus::Accepted,
                    preferred_psychologist: Some("p1".into()),
                    patient_id: Some("pt3".into()),
                    patient_name: Some("Elisa Prado".into()),
                    message: None,
                    created_at: Some(now - Duration::days(10)),
                },
            ],
        }
    }
}
