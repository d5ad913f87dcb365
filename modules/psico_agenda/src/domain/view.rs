//! Pure derivation of the psychologist dashboard from fetched collections.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::contract::model::{
    Appointment, AppointmentStatus, Patient, Request, RequestStatus, User,
};

/// Default length of the upcoming-appointments list.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// An upcoming appointment together with the patient it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingEntry {
    pub appointment: Appointment,
    pub patient: Patient,
}

/// What to tell the user when the upcoming list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingHint {
    /// "Você ainda não possui pacientes cadastrados."
    NoPatients,
    /// "Todos os agendamentos estão em dia!!!"
    AllCaughtUp,
}

impl UpcomingHint {
    pub fn message(&self) -> &'static str {
        match self {
            UpcomingHint::NoPatients => "Você ainda não possui pacientes cadastrados.",
            UpcomingHint::AllCaughtUp => "Todos os agendamentos estão em dia!!!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub greeting_name: String,
    /// Scheduled sessions of this psychologist on `generated_at`'s calendar day.
    pub today: Vec<Appointment>,
    pub today_sessions: usize,
    pub active_patients: usize,
    pub completed_sessions: usize,
    pub pending_requests: usize,
    pub upcoming: Vec<UpcomingEntry>,
    pub upcoming_hint: Option<UpcomingHint>,
    pub is_new_psychologist: bool,
    /// The welcome panel replaces the upcoming panel for new psychologists.
    pub show_upcoming: bool,
    pub generated_at: DateTime<chrono::FixedOffset>,
}

impl DashboardView {
    /// View shown before anything has been fetched.
    pub fn empty<Tz: TimeZone>(user: &User, now: &DateTime<Tz>) -> Self {
        derive_view(&[], &[], &[], user, now, DEFAULT_UPCOMING_LIMIT)
    }
}

fn is_mine(apt: &Appointment, user: &User) -> bool {
    apt.psychologist_id == user.id
}

/// Build the dashboard view. Calendar days are taken in `now`'s time zone,
/// upcoming-ness is a plain instant comparison against `now`.
pub fn derive_view<Tz: TimeZone>(
    appointments: &[Appointment],
    patients: &[Patient],
    requests: &[Request],
    user: &User,
    now: &DateTime<Tz>,
    upcoming_limit: usize,
) -> DashboardView {
    let tz = now.timezone();
    derive_view_by(
        appointments,
        patients,
        requests,
        user,
        now,
        |at| at.with_timezone(&tz).date_naive(),
        upcoming_limit,
    )
}

/// Like [`derive_view`], with calendar days resolved by `calendar_day` for
/// every instant, `now` included.
pub fn derive_view_by<Tz, F>(
    appointments: &[Appointment],
    patients: &[Patient],
    requests: &[Request],
    user: &User,
    now: &DateTime<Tz>,
    calendar_day: F,
    upcoming_limit: usize,
) -> DashboardView
where
    Tz: TimeZone,
    F: Fn(&DateTime<Utc>) -> NaiveDate,
{
    let today_date = calendar_day(&now.with_timezone(&Utc));

    let today: Vec<Appointment> = appointments
        .iter()
        .filter(|apt| {
            calendar_day(&apt.date) == today_date
                && is_mine(apt, user)
                && apt.status == AppointmentStatus::Scheduled
        })
        .cloned()
        .collect();

    let completed_sessions = appointments
        .iter()
        .filter(|apt| apt.status == AppointmentStatus::Completed && is_mine(apt, user))
        .count();

    let pending_requests = requests
        .iter()
        .filter(|req| {
            req.status == RequestStatus::Pending
                && req.preferred_psychologist.as_deref() == Some(user.id.as_str())
        })
        .count();

    // Truncate first, then drop dangling patient references: the list may end
    // up shorter than the limit even when more candidates exist.
    let upcoming: Vec<UpcomingEntry> = appointments
        .iter()
        .filter(|apt| {
            apt.date >= *now && apt.status == AppointmentStatus::Scheduled && is_mine(apt, user)
        })
        .take(upcoming_limit)
        .filter_map(|apt| {
            patients
                .iter()
                .find(|p| p.id == apt.patient_id)
                .map(|patient| UpcomingEntry {
                    appointment: apt.clone(),
                    patient: patient.clone(),
                })
        })
        .collect();

    let is_new_psychologist =
        patients.is_empty() && appointments.is_empty() && requests.is_empty();

    let upcoming_hint = match (upcoming.is_empty(), patients.is_empty()) {
        (false, _) => None,
        (true, true) => Some(UpcomingHint::NoPatients),
        (true, false) => Some(UpcomingHint::AllCaughtUp),
    };

    DashboardView {
        greeting_name: user.name.clone(),
        today_sessions: today.len(),
        today,
        active_patients: patients.len(),
        completed_sessions,
        pending_requests,
        upcoming,
        upcoming_hint,
        is_new_psychologist,
        show_upcoming: !is_new_psychologist,
        generated_at: now.fixed_offset(),
    }
}
