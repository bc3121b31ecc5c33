//! Application context providing dependency injection root.

use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::di::{Context as ContextDerive, FromRef};
use crate::error::AppError;
use crate::sparql::{HttpSparqlTransport, RetryPolicy, SparqlExecutor, SparqlTransport};
use crate::wikidata::{HttpWikidataApi, WikidataApi};

/// Shared entity search/metadata client.
pub type AppApi = Arc<dyn WikidataApi>;

/// Shared SPARQL endpoint transport.
pub type AppTransport = Arc<dyn SparqlTransport>;

/// Root application context for dependency injection.
///
/// `#[derive(Context)]` generates a `FromRef<Context>` impl per field, so
/// services can declare any of these types as a field and derive
/// `FromContext`.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Application configuration.
    pub config: Arc<Config>,
    /// MediaWiki API client.
    pub api: AppApi,
    /// SPARQL endpoint transport.
    pub transport: AppTransport,
}

impl Context {
    /// Creates a context from explicit collaborators.
    pub fn new(config: Config, api: AppApi, transport: AppTransport) -> Self {
        Self {
            config: Arc::new(config),
            api,
            transport,
        }
    }

    /// Loads configuration and connects to the live Wikidata endpoints.
    pub fn load() -> Result<Self, AppError> {
        Self::connect(Config::load()?)
    }

    /// Creates a context backed by the live Wikidata endpoints.
    ///
    /// Both clients share one connection pool.
    pub fn connect(config: Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.wikidata.user_agent.clone())
            .timeout(config.wikidata.timeout())
            .build()?;

        let api = Arc::new(HttpWikidataApi::new(client.clone(), &config.wikidata));
        let transport = Arc::new(HttpSparqlTransport::new(client, &config.wikidata));

        Ok(Self::new(config, api, transport))
    }
}

/// Each resolution gets its own executor; retry state never outlives a call.
impl FromRef<Context> for SparqlExecutor {
    fn from_ref(ctx: &Context) -> Self {
        SparqlExecutor::new(ctx.transport.clone(), RetryPolicy::from(&ctx.config.retry))
    }
}
