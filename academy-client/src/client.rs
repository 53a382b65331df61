//! HTTP client for the academy-portal API
//!
//! Thin typed wrapper over `reqwest`. Request bodies are validated locally
//! with the same rules the portal applies, so obvious mistakes never leave
//! the machine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use academy_common::api::auth::{now_millis, sign_request, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use academy_common::api::types::{
    ChatMessage, ChatRoom, ChatRoomInput, CheckoutRequest, CheckoutResponse, ErrorBody, Lead,
    LeadRequest, LeadResponse, Page, Program, QuizAnswers, RecommendationView,
    SendMessageRequest,
};
use academy_common::search::filter_programs;

use crate::chat_poller::ChatTransport;
use crate::error::{ClientError, Result};

pub const DEFAULT_PORTAL_URL: &str = "http://127.0.0.1:5780";

const USER_AGENT: &str = concat!("academy-client/", env!("CARGO_PKG_VERSION"));

/// Typed portal API client
#[derive(Debug, Clone)]
pub struct PortalClient {
    http_client: reqwest::Client,
    base_url: String,
    admin_secret: Option<i64>,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_secret: None,
        })
    }

    /// Sign `/api/admin` requests with this shared secret
    pub fn with_admin_secret(mut self, secret: i64) -> Self {
        self.admin_secret = Some(secret);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self.http_client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(path, "POST");
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    /// Send a signed admin request
    ///
    /// `path` includes any query string; it is signed exactly as sent.
    async fn admin_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let mut request = self.http_client.request(method.clone(), self.url(path));

        if let Some(secret) = self.admin_secret {
            let timestamp = now_millis();
            let signed_body = body.clone().unwrap_or(Value::Null);
            let signature = sign_request(method.as_str(), path, timestamp, &signed_body, secret);
            request = request
                .header(TIMESTAMP_HEADER, timestamp.to_string())
                .header(SIGNATURE_HEADER, signature);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(path, method = %method, "Admin request");
        decode(request.send().await?).await
    }

    // ========================================
    // Programs & quiz
    // ========================================

    pub async fn programs(&self) -> Result<Vec<Program>> {
        self.get_json("/api/programs").await
    }

    /// Fetch the catalog and filter it locally
    pub async fn search_programs(&self, query: &str) -> Result<Vec<Program>> {
        let programs = self.programs().await?;
        Ok(filter_programs(&programs, query).into_iter().cloned().collect())
    }

    pub async fn recommend(&self, answers: &QuizAnswers) -> Result<RecommendationView> {
        self.post_json("/api/quiz/recommend", answers).await
    }

    // ========================================
    // Leads & checkout
    // ========================================

    pub async fn submit_lead(&self, lead: &LeadRequest) -> Result<LeadResponse> {
        lead.validate()?;
        self.post_json("/api/leads", lead).await
    }

    /// Start a hosted checkout for the given program slugs
    ///
    /// An empty cart fails with [`ClientError::EmptyCart`] without touching
    /// the network.
    pub async fn create_checkout(
        &self,
        product_ids: Vec<String>,
        email: Option<String>,
    ) -> Result<CheckoutResponse> {
        if product_ids.is_empty() {
            return Err(ClientError::EmptyCart);
        }
        let request = CheckoutRequest { product_ids, email };
        request.validate()?;
        self.post_json("/api/checkout/session", &request).await
    }

    // ========================================
    // Chat
    // ========================================

    pub async fn chat_rooms(&self) -> Result<Vec<ChatRoom>> {
        self.get_json("/api/chat/rooms").await
    }

    pub async fn recent_messages(&self, room: &str, limit: i64) -> Result<Vec<ChatMessage>> {
        self.get_json(&format!("/api/chat/rooms/{}/messages?limit={}", room, limit))
            .await
    }

    pub async fn send_message(&self, room: &str, request: &SendMessageRequest) -> Result<ChatMessage> {
        request.validate()?;
        self.post_json(&format!("/api/chat/rooms/{}/messages", room), request)
            .await
    }

    // ========================================
    // Admin
    // ========================================

    pub async fn admin_leads(&self, page: i64) -> Result<Page<Lead>> {
        self.admin_json(Method::GET, &format!("/api/admin/leads?page={}", page), None)
            .await
    }

    pub async fn admin_create_room(&self, input: &ChatRoomInput) -> Result<ChatRoom> {
        input.validate()?;
        let body = serde_json::to_value(input).map_err(|e| {
            ClientError::Validation(vec![academy_common::FieldError::new("body", e.to_string())])
        })?;
        self.admin_json(Method::POST, "/api/admin/chat/rooms", Some(body))
            .await
    }
}

/// Turn a portal response into `T` or a typed error
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 422 {
        if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(&body) {
            if let Some(fields) = error.fields {
                return Err(ClientError::Validation(fields));
            }
        }
    }

    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatTransport for PortalClient {
    async fn fetch_recent(&self, room: &str, limit: i64) -> Result<Vec<ChatMessage>> {
        self.recent_messages(room, limit).await
    }

    async fn send(&self, room: &str, author: &str, body: &str) -> Result<ChatMessage> {
        let request = SendMessageRequest {
            author: author.to_string(),
            body: body.to_string(),
        };
        self.send_message(room, &request).await
    }
}
