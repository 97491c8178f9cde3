//! Client configuration

/// Client configuration for connecting to the ordering backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://api.example.com")
    pub base_url: String,

    /// Push channel WebSocket URL (e.g., "wss://api.example.com/ws")
    pub push_url: String,

    /// Auth token for authenticated requests
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, push_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            push_url: push_url.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Set the auth token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080", "ws://localhost:8080/ws")
    }
}
