//! Typed HTTP client for the interlink bridge.
//!
//! Used by the second runtime to reach host functionality, and by the bridge's
//! own integration tests.

mod error;

pub use error::ClientError;

use interlink_protocol::{
    CommandKind, CommandRequest, CommandResult, ContextResponse, ErrorEnvelope, HealthResponse,
    SuccessEnvelope, ToolExecuteRequest, routes,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Client for one bridge instance.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: Url,
}

impl BridgeClient {
    /// Create a client for a bridge at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.client.get(self.url(routes::HEALTH)?).send().await?;
        decode(response).await
    }

    /// Execute a host tool and return its result verbatim.
    pub async fn execute_tool(
        &self,
        name: &str,
        args: serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ClientError> {
        let request = ToolExecuteRequest {
            name: name.to_string(),
            args,
        };
        let response = self
            .client
            .post(self.url(routes::TOOLS_EXECUTE)?)
            .json(&request)
            .send()
            .await?;
        decode_envelope(response).await
    }

    pub async fn build_context(&self) -> Result<ContextResponse, ClientError> {
        let response = self
            .client
            .get(self.url(routes::CONTEXT_BUILD)?)
            .send()
            .await?;
        decode(response).await
    }

    /// Run `command` through the interpreter for `kind`.
    ///
    /// Negative outcomes (unknown slash command, missing path, failed shell
    /// command) come back as `Ok`; inspect [`CommandResult::is_negative`].
    pub async fn process_command(
        &self,
        kind: CommandKind,
        command: &str,
    ) -> Result<CommandResult, ClientError> {
        let request = CommandRequest {
            command: command.to_string(),
            kind,
        };
        let response = self
            .client
            .post(self.url(routes::COMMANDS_PROCESS)?)
            .json(&request)
            .send()
            .await?;
        decode_envelope(response).await
    }

    fn url(&self, route: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(route)?)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let envelope: SuccessEnvelope<T> = decode(response).await?;
    Ok(envelope.result)
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error,
        Err(_) => body,
    };
    ClientError::Api { status, message }
}
