use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::contract::model::{Session, User};

/// Authentication collaborator: owns the current session.
pub trait AuthPort: Send + Sync {
    fn current_session(&self) -> Option<Session>;
    fn login(&self, user: User, token: String);
    fn logout(&self);
}

/// User-visible notifications (toasts in a graphical host).
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}

/// Source of "now", including the time zone calendar days are computed in.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar day `at` falls on in this clock's zone. The default applies
    /// the current offset, which only holds for zones without DST.
    fn calendar_day(&self, at: &DateTime<Utc>) -> NaiveDate {
        at.with_timezone(self.now().offset()).date_naive()
    }
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn calendar_day(&self, at: &DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }
}
