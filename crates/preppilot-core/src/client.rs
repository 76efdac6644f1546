use reqwest::Client;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{ConfigurationError, GenerationError};
use crate::pack::{GenerateRequest, PrepPack};

/// Progress of a generation call, in the order the phases are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    Mapping,
    Generating,
}

impl Phase {
    pub fn message(&self) -> &'static str {
        match self {
            Phase::Idle => "",
            Phase::Analyzing => "Analyzing job requirements…",
            Phase::Mapping => "Mapping skills to interview expectations…",
            Phase::Generating => "Generating prep pack…",
        }
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    base_url: String,
}

impl GenerationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("preppilot/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from configuration; fails before any request when no
    /// backend URL is set.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        Ok(Self::new(&config.backend_url()?))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/generate", self.base_url)
    }

    /// Issue one generation request. There is no retry; a failure is returned
    /// to the caller as is.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        progress: &watch::Sender<Phase>,
    ) -> Result<PrepPack, GenerationError> {
        let url = self.endpoint();
        progress.send_replace(Phase::Analyzing);
        tracing::info!(%url, level = request.level.as_str(), "requesting prep pack");

        progress.send_replace(Phase::Mapping);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("generation transport failure: {err}");
                GenerationError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "generation backend returned an error");
            return Err(if status.is_client_error() {
                GenerationError::Rejected { status, body }
            } else {
                GenerationError::Service { status, body }
            });
        }

        progress.send_replace(Phase::Generating);
        let body = response.text().await.map_err(GenerationError::Transport)?;
        let pack = PrepPack::from_json(&body)?;
        tracing::info!(
            skills = pack.required_skills.len(),
            questions = pack.tech_questions.len(),
            "prep pack received"
        );
        Ok(pack)
    }
}
