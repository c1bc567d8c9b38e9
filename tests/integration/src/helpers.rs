//! Test helpers for integration tests
//!
//! Provides a gateway bound to an ephemeral port and a small WebSocket client
//! that reads JSON events with timeouts.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use relay_common::{AppConfig, ChatConfig, CorsConfig};
use relay_core::MessageStore;
use relay_db::InMemoryMessageStore;
use relay_gateway::server::{build_store, create_app, GatewayState};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::fixtures::{init_frame, message_frame, typing_frame};

/// How long a client waits for an expected event
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a client listens before concluding nothing was sent
pub const SILENCE_WINDOW: Duration = Duration::from_millis(250);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a gateway backed by a fresh in-memory store
    pub async fn start() -> Result<(Self, Arc<InMemoryMessageStore>)> {
        let store = Arc::new(InMemoryMessageStore::default());
        let server = Self::start_with_store(store.clone(), ChatConfig::default()).await?;
        Ok((server, store))
    }

    /// Start a gateway over an arbitrary store
    pub async fn start_with_store(store: Arc<dyn MessageStore>, chat: ChatConfig) -> Result<Self> {
        let state = GatewayState::new(store, chat);
        let app = create_app(state.clone(), &CorsConfig::default());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Start a gateway with the store selected by the environment
    pub async fn start_from_env() -> Result<Self> {
        let config = test_config()?;
        let store = build_store(&config.store).await?;
        Self::start_with_store(store, config.chat).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Open a WebSocket on `/`
    pub async fn connect(&self) -> Result<WsClient> {
        WsClient::connect(&self.ws_url("/")).await
    }

    /// Open a WebSocket and complete `init`, consuming the history and join frames
    pub async fn join(&self, username: &str) -> Result<WsClient> {
        let mut client = self.connect().await?;
        client.send_json(&init_frame(username)).await?;
        client.expect_kind("history").await?;
        let joined = client.expect_kind("system").await?;
        if joined["message"] != format!("{username} joined the chat") {
            bail!("unexpected join notice {joined}");
        }
        Ok(client)
    }

    /// Wait until the registry holds exactly `count` connections
    pub async fn wait_for_connections(&self, count: usize) -> Result<()> {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while self.state.registry().len() != count {
            if tokio::time::Instant::now() >= deadline {
                bail!(
                    "expected {count} connections, registry has {}",
                    self.state.registry().len()
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }
}

/// WebSocket client speaking the chat protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("connecting to {url}"))?;
        Ok(Self { stream })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    pub async fn send_json(&mut self, value: &Value) -> Result<()> {
        self.send_text(&value.to_string()).await
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.stream.send(Message::Binary(bytes)).await?;
        Ok(())
    }

    pub async fn say(&mut self, text: &str) -> Result<()> {
        self.send_json(&message_frame(text)).await
    }

    pub async fn typing(&mut self) -> Result<()> {
        self.send_json(&typing_frame()).await
    }

    /// Next JSON event, within `timeout`
    pub async fn recv_within(&mut self, timeout: Duration) -> Result<Option<Value>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let next = match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Ok(next) => next,
                Err(_) => return Ok(None),
            };

            match next {
                Some(Ok(Message::Text(text))) => return Ok(Some(serde_json::from_str(&text)?)),
                Some(Ok(Message::Close(_))) | None => bail!("connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Next JSON event; fails if none arrives in time
    pub async fn recv(&mut self) -> Result<Value> {
        self.recv_within(RECV_TIMEOUT)
            .await?
            .context("timed out waiting for an event")
    }

    /// Next event, which must be of type `kind`
    pub async fn expect_kind(&mut self, kind: &str) -> Result<Value> {
        let event = self.recv().await?;
        if event["type"] != kind {
            bail!("expected {kind} event, got {event}");
        }
        Ok(event)
    }

    /// Fails if any event arrives within the silence window
    pub async fn expect_silence(&mut self) -> Result<()> {
        if let Some(event) = self.recv_within(SILENCE_WINDOW).await? {
            bail!("expected no events, got {event}");
        }
        Ok(())
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Create a test configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if a database is available
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(body)
}
