//! Batch orchestration: session, dispatch, one re-auth replay, results.

use std::sync::Arc;
use std::time::Duration;

use vtx_auth::{AuthController, Credentials, RetryPolicy, Session, SessionCache};
use vtx_client::{DEFAULT_CONCURRENCY, HttpTransport, RawResponse, RequestDescriptor, Transport};
use vtx_client::{dispatch, parse_responses};
use vtx_config::{LookupConfig, VertexConfig, VtxConfig};
use vtx_core::{Entity, ErrorReport, LookupError, LookupResult};

use crate::aggregate::build_results;

/// Per-batch knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSettings {
    pub concurrency: usize,
    pub result_limit: u32,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            result_limit: 10,
        }
    }
}

impl From<&LookupConfig> for LookupSettings {
    fn from(config: &LookupConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            result_limit: config.result_limit,
        }
    }
}

/// Looks up entities in Vertex, sharing one session cache across batches.
pub struct VertexLookup<T> {
    transport: Arc<T>,
    auth: AuthController<T>,
    settings: LookupSettings,
}

impl VertexLookup<HttpTransport> {
    /// Build a lookup over HTTP from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Config`] when TLS material or the proxy in
    /// `[request]` cannot be loaded.
    pub fn from_config(config: &VtxConfig) -> Result<Self, LookupError> {
        let transport = Arc::new(HttpTransport::new(&config.request)?);
        let cache = Arc::new(SessionCache::new(Duration::from_secs(config.session.ttl_secs)));
        Ok(Self::new(transport, cache)
            .with_retry_policy(RetryPolicy::from(&config.session))
            .with_settings(LookupSettings::from(&config.lookup)))
    }
}

impl<T: Transport> VertexLookup<T> {
    #[must_use]
    pub fn new(transport: Arc<T>, cache: Arc<SessionCache>) -> Self {
        let auth = AuthController::new(Arc::clone(&transport), cache);
        Self {
            transport,
            auth,
            settings: LookupSettings::default(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.auth = self.auth.with_retry_policy(retry);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: LookupSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthController<T> {
        &self.auth
    }

    #[must_use]
    pub const fn settings(&self) -> LookupSettings {
        self.settings
    }

    /// Host entry point: results in entity order, or one error report for the
    /// whole batch.
    ///
    /// # Errors
    ///
    /// Any failure from [`Self::run`], converted to an [`ErrorReport`].
    pub async fn do_lookup(
        &self,
        entities: &[Entity],
        options: &VertexConfig,
    ) -> Result<Vec<LookupResult>, ErrorReport> {
        self.run(entities, options).await.map_err(|error| {
            tracing::error!(kind = error.kind(), %error, "lookup failed");
            error.to_report()
        })
    }

    /// Look up every entity. Exactly one result per entity, same order.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Config`] when a required option is empty
    /// - [`LookupError::Auth`] when login fails, or the batch is still
    ///   rejected with 401 after one re-authentication
    /// - [`LookupError::Network`] / [`LookupError::Request`] for the first
    ///   failing storm request
    pub async fn run(
        &self,
        entities: &[Entity],
        options: &VertexConfig,
    ) -> Result<Vec<LookupResult>, LookupError> {
        let problems = options.validate();
        if !problems.is_empty() {
            let keys: Vec<&str> = problems.iter().map(|p| p.key.as_str()).collect();
            return Err(LookupError::Config(format!(
                "missing required options: {}",
                keys.join(", ")
            )));
        }
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        self.auth.cache().purge_expired();
        let credentials = Credentials::from(options);
        tracing::debug!(entities = entities.len(), url = %credentials.base_url, "starting lookup");

        let responses = self.fetch(entities, &credentials).await?;
        let outcomes = parse_responses(entities, &responses);
        let results = build_results(outcomes, &credentials.base_url);

        tracing::info!(
            entities = entities.len(),
            hits = results.iter().filter(|r| !r.is_miss()).count(),
            "lookup complete"
        );
        Ok(results)
    }

    /// Dispatch the batch, replaying it once under a fresh session if any
    /// response came back 401.
    async fn fetch(
        &self,
        entities: &[Entity],
        credentials: &Credentials,
    ) -> Result<Vec<RawResponse>, LookupError> {
        let session = self.auth.ensure_session(credentials, false).await?;
        let responses = self.dispatch_batch(entities, credentials, &session).await?;

        let expired = responses.iter().filter(|r| r.is_auth_expired()).count();
        if expired == 0 {
            return Ok(responses);
        }

        tracing::warn!(expired, "session rejected mid-batch; re-authenticating");
        let session = self.auth.ensure_session(credentials, true).await?;
        let responses = self.dispatch_batch(entities, credentials, &session).await?;

        if responses.iter().any(RawResponse::is_auth_expired) {
            self.auth.invalidate(credentials);
            return Err(LookupError::auth(
                "session rejected (401) again after re-authentication",
            ));
        }
        Ok(responses)
    }

    async fn dispatch_batch(
        &self,
        entities: &[Entity],
        credentials: &Credentials,
        session: &Session,
    ) -> Result<Vec<RawResponse>, LookupError> {
        let descriptors: Vec<RequestDescriptor> = entities
            .iter()
            .map(|entity| {
                RequestDescriptor::storm(
                    &credentials.base_url,
                    entity,
                    &session.token,
                    self.settings.result_limit,
                )
            })
            .collect();

        dispatch(&self.transport, &descriptors, self.settings.concurrency)
            .await
            .inspect_err(|error| {
                if matches!(error, LookupError::Auth { .. }) {
                    self.auth.invalidate(credentials);
                }
            })
    }
}
