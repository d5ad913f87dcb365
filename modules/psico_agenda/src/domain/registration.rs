use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::{
    client::SchedulingApi,
    error::SchedulingError,
    model::{NewAccount, Role, RoleProfile, User},
};
use crate::domain::error::DomainError;
use crate::domain::ports::{AuthPort, Notifier};

pub const SUCCESS_MESSAGE: &str = "Conta criada com sucesso";

/// Input fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    BirthDate,
    Crp,
    Specialty,
}

const SHARED_FIELDS: [Field; 5] = [
    Field::Name,
    Field::Email,
    Field::Password,
    Field::ConfirmPassword,
    Field::Phone,
];

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Nome Completo",
            Field::Email => "E-mail",
            Field::Password => "Senha",
            Field::ConfirmPassword => "Confirme sua senha",
            Field::Phone => "Telefone",
            Field::BirthDate => "Data de Nascimento",
            Field::Crp => "CRP",
            Field::Specialty => "Especialidade",
        }
    }

    /// Fields that must be filled in for `role`, in display order.
    pub fn required_for(role: Role) -> Vec<Field> {
        let mut fields = SHARED_FIELDS.to_vec();
        match role {
            Role::Patient => fields.push(Field::BirthDate),
            Role::Psychologist => fields.extend([Field::Crp, Field::Specialty]),
        }
        fields
    }
}

/// Raw form contents. Fields not shown for the selected role keep their value
/// but are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub birth_date: String,
    pub crp: String,
    pub specialty: String,
}

impl RegistrationForm {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::Phone => &self.phone,
            Field::BirthDate => &self.birth_date,
            Field::Crp => &self.crp,
            Field::Specialty => &self.specialty,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
            Field::Phone => &mut self.phone,
            Field::BirthDate => &mut self.birth_date,
            Field::Crp => &mut self.crp,
            Field::Specialty => &mut self.specialty,
        };
        *slot = value.into();
    }

    /// Presence check, then password confirmation. No format validation.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(field) = Field::required_for(self.role)
            .into_iter()
            .find(|f| self.get(*f).is_empty())
        {
            return Err(DomainError::missing_field(field));
        }
        if self.password != self.confirm_password {
            return Err(DomainError::password_mismatch());
        }
        Ok(())
    }

    pub fn to_account(&self) -> NewAccount {
        let profile = match self.role {
            Role::Patient => RoleProfile::Patient {
                birth_date: self.birth_date.clone(),
            },
            Role::Psychologist => RoleProfile::Psychologist {
                crp: self.crp.clone(),
                specialty: self.specialty.clone(),
            },
        };
        NewAccount {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            phone: self.phone.clone(),
            profile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Registered(User),
    /// Rejected client-side; the API was not called.
    Invalid(DomainError),
    /// The API refused or failed; its message was shown verbatim.
    Failed(SchedulingError),
}

struct FormState {
    form: RegistrationForm,
    phase: FormPhase,
    last_outcome: Option<SubmitOutcome>,
}

/// Registration form controller: `Editing → Submitting → Editing`, with the
/// outcome of each submission kept for display.
pub struct RegistrationController {
    api: Arc<dyn SchedulingApi>,
    auth: Arc<dyn AuthPort>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<FormState>,
}

impl RegistrationController {
    pub fn new(
        api: Arc<dyn SchedulingApi>,
        auth: Arc<dyn AuthPort>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            auth,
            notifier,
            state: Mutex::new(FormState {
                form: RegistrationForm::default(),
                phase: FormPhase::Editing,
                last_outcome: None,
            }),
        }
    }

    pub fn set_role(&self, role: Role) {
        self.state.lock().form.role = role;
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        self.state.lock().form.set(field, value);
    }

    pub fn form(&self) -> RegistrationForm {
        self.state.lock().form.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.state.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == FormPhase::Submitting
    }

    pub fn last_outcome(&self) -> Option<SubmitOutcome> {
        self.state.lock().last_outcome.clone()
    }

    #[instrument(name = "psico_agenda.registration.submit", skip(self), fields(role = tracing::field::Empty))]
    pub async fn submit(&self) -> SubmitOutcome {
        let form = {
            let mut st = self.state.lock();
            if st.phase == FormPhase::Submitting {
                debug!("submit ignored: already submitting");
                return SubmitOutcome::Invalid(DomainError::already_submitting());
            }
            tracing::Span::current().record("role", st.form.role.as_str());
            if let Err(e) = st.form.validate() {
                drop(st);
                debug!(error = %e, "registration rejected by form validation");
                self.notifier.notify_error(&e.to_string());
                return self.finish(SubmitOutcome::Invalid(e));
            }
            st.phase = FormPhase::Submitting;
            st.form.clone()
        };

        info!(email = %form.email, "submitting registration");
        let outcome = match self.api.register(form.to_account()).await {
            Ok(registered) => {
                self.auth
                    .login(registered.user.clone(), registered.token.clone());
                self.notifier.notify_success(SUCCESS_MESSAGE);
                info!(user_id = %registered.user.id, "account created");
                SubmitOutcome::Registered(registered.user)
            }
            Err(e) => {
                warn!(error = %e, "registration failed");
                self.notifier.notify_error(&e.to_string());
                SubmitOutcome::Failed(e)
            }
        };
        self.finish(outcome)
    }

    fn finish(&self, outcome: SubmitOutcome) -> SubmitOutcome {
        let mut st = self.state.lock();
        st.phase = FormPhase::Editing;
        st.last_outcome = Some(outcome.clone());
        outcome
    }
}
