use async_trait::async_trait;
use barbella_core::turn::Turn;
use barbella_core::view::{ChatTransport, TransportError};
use reqwest::Client;
use url::Url;

use crate::Result;

/// Posts the turn list to `<base>/api/chat`.
///
/// No client-side timeout: a request that never resolves keeps the view in
/// its sending state.
pub struct HttpChatTransport {
    client: Client,
    endpoint: Url,
}

impl HttpChatTransport {
    pub fn new(base: &Url) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            endpoint: base.join("/api/chat")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn post_turns(&self, turns: &[Turn]) -> core::result::Result<String, TransportError> {
        log::debug!("POST {} ({} turns)", self.endpoint, turns.len());

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(turns)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}
