use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use runtime::{module_config, ConfigProvider};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::PsicoAgendaConfig;
use crate::contract::client::SchedulingApi;
use crate::contract::model::{Role, Session};
use crate::domain::dashboard::Dashboard;
use crate::domain::ports::{AuthPort, Clock, Notifier, SystemClock};
use crate::domain::refresh::{RefreshHandle, RefreshLoop};
use crate::domain::registration::RegistrationController;
use crate::infra::events::BroadcastPublisher;
use crate::infra::mock::{InMemorySchedulingApi, Seed};
use crate::infra::session::InMemoryAuth;

/// Wires the module's collaborators together from configuration.
pub struct PsicoAgenda {
    config: PsicoAgendaConfig,
    api: Arc<InMemorySchedulingApi>,
    auth: Arc<InMemoryAuth>,
    events: BroadcastPublisher,
    clock: Arc<dyn Clock>,
}

impl PsicoAgenda {
    pub const NAME: &'static str = "psico_agenda";

    /// Read this module's section from `provider` and build the module.
    pub fn init(provider: &dyn ConfigProvider, home_dir: &Path) -> anyhow::Result<Self> {
        info!("Initializing psico_agenda module");
        let cfg: PsicoAgendaConfig = module_config(provider, Self::NAME)?;
        debug!(
            refresh_interval_ms = cfg.refresh_interval.as_millis() as u64,
            upcoming_limit = cfg.upcoming_limit,
            stale_policy = ?cfg.stale_policy,
            "Loaded psico_agenda config"
        );
        Self::from_config(cfg, home_dir, Arc::new(SystemClock))
    }

    pub fn from_config(
        config: PsicoAgendaConfig,
        home_dir: &Path,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        if config.upcoming_limit == 0 {
            bail!("upcoming_limit must be at least 1");
        }
        if config.refresh_interval.is_zero() {
            bail!("refresh_interval must be greater than zero");
        }

        let seed = match &config.api.seed_file {
            Some(file) => {
                let path = resolve(file, home_dir);
                Seed::from_path(&path)
                    .with_context(|| format!("failed to seed api from '{}'", path.display()))?
            }
            None if config.api.demo_seed => Seed::demo(clock.now().with_timezone(&Utc)),
            None => Seed::default(),
        };

        let api = Arc::new(InMemorySchedulingApi::from_seed(seed, config.api.latency));
        let events = BroadcastPublisher::new(config.event_capacity);

        Ok(Self {
            config,
            api,
            auth: Arc::new(InMemoryAuth::new()),
            events,
            clock,
        })
    }

    pub fn config(&self) -> &PsicoAgendaConfig {
        &self.config
    }

    pub fn api(&self) -> Arc<dyn SchedulingApi> {
        self.api.clone()
    }

    pub fn mock_api(&self) -> &Arc<InMemorySchedulingApi> {
        &self.api
    }

    pub fn auth(&self) -> Arc<InMemoryAuth> {
        self.auth.clone()
    }

    pub fn events(&self) -> &BroadcastPublisher {
        &self.events
    }

    /// Start a session for a user already known to the api.
    pub fn sign_in(&self, user_id: &str) -> anyhow::Result<Session> {
        let user = self
            .api
            .find_user(user_id)
            .ok_or_else(|| anyhow!("unknown user '{user_id}'"))?;
        self.auth
            .login(user, format!("mock-token-{}", Uuid::new_v4().simple()));
        self.auth
            .current_session()
            .ok_or_else(|| anyhow!("session was not established"))
    }

    /// Dashboard for the signed-in psychologist.
    pub fn dashboard(&self) -> anyhow::Result<Arc<Dashboard>> {
        let session = self
            .auth
            .session_arc()
            .ok_or_else(|| anyhow!("no active session"))?;
        if session.user.role != Role::Psychologist {
            bail!(
                "the dashboard is only available to psychologists (user '{}' is {})",
                session.user.id,
                session.user.role
            );
        }
        Ok(Arc::new(Dashboard::new(
            self.api(),
            session,
            Arc::new(self.events.clone()),
            self.clock.clone(),
            self.config.dashboard(),
        )))
    }

    /// Build the dashboard and start its refresh triggers.
    pub fn mount_dashboard(
        &self,
        cancel: CancellationToken,
    ) -> anyhow::Result<(Arc<Dashboard>, RefreshHandle)> {
        let dashboard = self.dashboard()?;
        let handle = RefreshLoop::spawn(dashboard.clone(), self.config.refresh_interval, cancel);
        Ok((dashboard, handle))
    }

    pub fn registration(&self, notifier: Arc<dyn Notifier>) -> RegistrationController {
        RegistrationController::new(self.api(), self.auth.clone(), notifier)
    }
}

fn resolve(file: &str, home_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        home_dir.join(p)
    }
}
