//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    ApiResponse, LoginRequest, LoginResponse, RegisterRequest, TableAvailabilityQuery,
    UploadResult, UploadSignature, UserInfo,
};
use shared::models::{
    DiningTable, MenuItem, MenuItemCreate, MenuItemUpdate, Order, OrderCreate,
};

/// Header flag admins send to receive hidden menu items
const INCLUDE_HIDDEN_HEADER: &str = "x-include-hidden";

/// HTTP client for making network requests to the ordering backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn apply_auth(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        request
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.apply_auth(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    async fn get_query<T: DeserializeOwned, Q: serde::Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.apply_auth(self.client.get(self.url(path)).query(query));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.apply_auth(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.apply_auth(self.client.post(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.apply_auth(self.client.put(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.apply_auth(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    fn unwrap_data<T>(response: ApiResponse<T>, what: &str) -> ClientResult<T> {
        response
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {what} data")))
    }

    // ========== Auth API ==========

    /// Login with username and password
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: ApiResponse<LoginResponse> = self.post("/api/auth/login", &request).await?;
        Self::unwrap_data(response, "login")
    }

    /// Register a new account
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<LoginResponse> {
        let response: ApiResponse<LoginResponse> =
            self.post("/api/auth/register", request).await?;
        Self::unwrap_data(response, "register")
    }

    /// Get current user information
    pub async fn me(&self) -> ClientResult<UserInfo> {
        let response: ApiResponse<UserInfo> = self.get("/api/auth/me").await?;
        Self::unwrap_data(response, "user")
    }

    /// Logout
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.post_empty::<ApiResponse<()>>("/api/auth/logout").await?;
        self.token = None;
        Ok(())
    }

    // ========== Menu API ==========

    /// Fetch the menu. Admins pass `include_hidden` to also receive
    /// hidden items; the flag travels as a request header.
    pub async fn fetch_menu(&self, include_hidden: bool) -> ClientResult<Vec<MenuItem>> {
        let mut request = self.apply_auth(self.client.get(self.url("/api/menu")));
        if include_hidden {
            request = request.header(INCLUDE_HIDDEN_HEADER, "true");
        }
        let response = request.send().await?;
        let body: ApiResponse<Vec<MenuItem>> = Self::handle_response(response).await?;
        Self::unwrap_data(body, "menu")
    }

    /// Create a menu item (admin)
    pub async fn create_menu_item(&self, payload: &MenuItemCreate) -> ClientResult<MenuItem> {
        let response: ApiResponse<MenuItem> = self.post("/api/menu", payload).await?;
        Self::unwrap_data(response, "menu item")
    }

    /// Update a menu item (admin)
    pub async fn update_menu_item(
        &self,
        id: &str,
        payload: &MenuItemUpdate,
    ) -> ClientResult<MenuItem> {
        let response: ApiResponse<MenuItem> =
            self.put(&format!("/api/menu/{id}"), payload).await?;
        Self::unwrap_data(response, "menu item")
    }

    /// Delete a menu item (admin)
    pub async fn delete_menu_item(&self, id: &str) -> ClientResult<()> {
        self.delete::<ApiResponse<()>>(&format!("/api/menu/{id}"))
            .await?;
        Ok(())
    }

    // ========== Tables API ==========

    /// Query tables available for a reservation window. The pair travels
    /// as ISO-8601 timestamps in the query string.
    pub async fn available_tables(
        &self,
        query: &TableAvailabilityQuery,
    ) -> ClientResult<Vec<DiningTable>> {
        let response: ApiResponse<Vec<DiningTable>> =
            self.get_query("/api/tables/available", query).await?;
        Self::unwrap_data(response, "tables")
    }

    // ========== Orders API ==========

    /// Submit an order
    pub async fn create_order(&self, payload: &OrderCreate) -> ClientResult<Order> {
        let response: ApiResponse<Order> = self.post("/api/orders", payload).await?;
        Self::unwrap_data(response, "order")
    }

    /// List the current user's orders
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let response: ApiResponse<Vec<Order>> = self.get("/api/orders").await?;
        Self::unwrap_data(response, "orders")
    }

    /// Fetch a single order
    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        let response: ApiResponse<Order> = self.get(&format!("/api/orders/{id}")).await?;
        Self::unwrap_data(response, "order")
    }

    // ========== Image upload ==========

    /// Request a signature for a direct upload to the image host (admin)
    pub async fn upload_signature(&self) -> ClientResult<UploadSignature> {
        let response: ApiResponse<UploadSignature> =
            self.post_empty("/api/upload/signature").await?;
        Self::unwrap_data(response, "upload signature")
    }

    /// Upload an image directly to the image host using a server-issued
    /// signature. Returns the public id and secure URL.
    pub async fn upload_image(
        &self,
        signature: &UploadSignature,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadResult> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let mut form = reqwest::multipart::Form::new()
            .text("api_key", signature.api_key.clone())
            .text("timestamp", signature.timestamp.to_string())
            .text("signature", signature.signature.clone())
            .part("file", part);
        if let Some(public_id) = &signature.public_id {
            form = form.text("public_id", public_id.clone());
        }

        let response = self
            .client
            .post(&signature.upload_url)
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one request, return its raw bytes and answer with the given
    /// JSON body.
    async fn serve_once(listener: TcpListener, body: String) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let (header_end, content_length) = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                break (pos + 4, length);
            }
        };
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_upload_image_sends_signed_multipart() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let host_response = serde_json::json!({
            "public_id": "menu/42",
            "secure_url": "https://img.example.com/menu/42.jpg",
        })
        .to_string();
        let server = tokio::spawn(serve_once(listener, host_response));

        let config = ClientConfig::new("http://unused", "ws://unused");
        let client = HttpClient::new(&config);
        let signature = UploadSignature {
            signature: "sig-1".to_string(),
            timestamp: 1_756_300_000,
            api_key: "key-1".to_string(),
            public_id: Some("menu/42".to_string()),
            upload_url: format!("http://{addr}/upload"),
        };

        let result = client
            .upload_image(&signature, "photo.jpg", b"jpeg bytes".to_vec())
            .await
            .unwrap();
        assert_eq!(result.public_id, "menu/42");
        assert_eq!(result.secure_url, "https://img.example.com/menu/42.jpg");

        let request = server.await.unwrap();
        for field in ["api_key", "timestamp", "signature", "public_id", "file"] {
            assert!(
                request.contains(&format!("name=\"{field}\"")),
                "missing multipart field {field}"
            );
        }
        assert!(request.contains("filename=\"photo.jpg\""));
        assert!(request.contains("sig-1"));
        assert!(request.contains("jpeg bytes"));
    }
}
