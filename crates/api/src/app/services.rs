//! Service wiring: credential store, token issuer, gate and duty services.

use std::sync::Arc;

use anyhow::Context;

use dutyroster_auth::{AuthorizationGate, CredentialStore, PasswordError, SessionService, TokenIssuer};
use dutyroster_infra::{
    DutyService, DutyServices, DutyTypeService, DutyWorkerService, InMemoryCredentialStore,
    PostgresCredentialStore,
};

use crate::config::ApiConfig;
use crate::permissions;

pub const USERS_SEED_FILE: &str = "users.json";

#[derive(Clone)]
pub struct AppServices {
    pub gate: AuthorizationGate,
    pub sessions: SessionService,
    pub duties: Arc<DutyService>,
    pub duty_types: Arc<DutyTypeService>,
    pub duty_workers: Arc<DutyWorkerService>,
}

impl AppServices {
    /// Fails only when `password_cost` is outside bcrypt's range.
    pub fn new(
        gate: AuthorizationGate,
        services: DutyServices,
        password_cost: u32,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            sessions: SessionService::new(gate.clone(), password_cost)?,
            gate,
            duties: services.duties,
            duty_types: services.duty_types,
            duty_workers: services.duty_workers,
        })
    }
}

/// Build all services from configuration.
///
/// Without `DATABASE_URL`, users come from `DATA_DIR/users.json`.
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    for permission in &permissions::ALL {
        permission
            .validate_required()
            .with_context(|| format!("route permission '{permission}' is malformed"))?;
    }

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("using Postgres credential store");
            Arc::new(PostgresCredentialStore::connect_lazy(url).context("invalid DATABASE_URL")?)
        }
        None => {
            let seed = config.data_dir.join(USERS_SEED_FILE);
            tracing::warn!(path = %seed.display(), "DATABASE_URL not set; using in-memory credential store");
            Arc::new(
                InMemoryCredentialStore::from_seed_file(&seed)
                    .await
                    .context("failed to load user seed file")?,
            )
        }
    };

    let tokens = TokenIssuer::new(config.jwt_secret.clone(), config.token_ttl);
    if !tokens.has_secret() {
        tracing::error!("JWT_SECRET not set; authenticated routes will fail");
    }

    let gate = AuthorizationGate::new(store, Arc::new(tokens));
    let duties = DutyServices::open(&config.data_dir);

    AppServices::new(gate, duties, config.password_cost).context("failed to prepare login service")
}
