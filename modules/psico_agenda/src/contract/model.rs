use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. Wire names follow the booking API (`paciente` / `psicologo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "paciente", alias = "patient")]
    Patient,
    #[serde(rename = "psicologo", alias = "psychologist")]
    Psychologist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "paciente",
            Role::Psychologist => "psicologo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paciente" | "patient" => Ok(Role::Patient),
            "psicologo" | "psicólogo" | "psychologist" => Ok(Role::Psychologist),
            other => Err(format!(
                "invalid role '{other}': expected 'paciente' or 'psicologo'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "agendado", alias = "scheduled")]
    Scheduled,
    #[serde(rename = "concluido", alias = "completed")]
    Completed,
    #[serde(rename = "cancelado", alias = "cancelled")]
    Cancelled,
    /// Any status this client does not know about; never matches a dashboard rule.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "pendente", alias = "pending")]
    Pending,
    #[serde(rename = "aceito", alias = "accepted")]
    Accepted,
    #[serde(rename = "recusado", alias = "rejected")]
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub date: DateTime<Utc>,
    pub patient_id: String,
    pub psychologist_id: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Patient profile. Only `id` and `name` matter to the dashboard; everything
/// else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Psychologist the patient is linked to, used by the API for scoping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychologist_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A patient's request for care, optionally addressed to a psychologist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_psychologist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, rename = "CRP", skip_serializing_if = "Option::is_none")]
    pub crp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

/// Signed-in subject: who the dashboard is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }
}

/// Role-specific part of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleProfile {
    Patient { birth_date: String },
    Psychologist { crp: String, specialty: String },
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Patient { .. } => Role::Patient,
            RoleProfile::Psychologist { .. } => Role::Psychologist,
        }
    }
}

/// Data sent to the API to create an account. The password confirmation is
/// checked client-side and never leaves the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub profile: RoleProfile,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub user: User,
    pub token: String,
}
