//! Shared API request/response types
//!
//! Used by academy-portal to serve requests and by academy-client to build
//! them. Every input type knows how to validate itself so both sides apply
//! the same rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommendation::{AgeBracket, Goal, ProgramSlug, Recommendation, Sport};
use crate::validation::{
    FieldError, Validator, CHAT_AUTHOR_MAX_CHARS, CHAT_BODY_MAX_CHARS, MESSAGE_MAX_CHARS,
    NAME_MAX_CHARS, TITLE_MAX_CHARS,
};
use crate::Result;

/// Most programs a single checkout may contain
pub const CHECKOUT_MAX_ITEMS: usize = 10;

// ========================================
// Programs
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub schedule: Option<String>,
    pub age_range: Option<String>,
    pub sport: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// Whole-dollar prices render without cents ("$245"), others with ("$12.50")
    pub fn price_display(&self) -> String {
        format_price(self.price_cents)
    }
}

pub fn format_price(cents: i64) -> String {
    if cents % 100 == 0 {
        format!("${}", cents / 100)
    } else {
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}

/// Create/update payload for a program (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramInput {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl ProgramInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.slug("slug", &self.slug)
            .length("name", &self.name, 1, NAME_MAX_CHARS)
            .length("description", &self.description, 0, MESSAGE_MAX_CHARS)
            .non_negative("price_cents", self.price_cents)
            .optional_text("schedule", self.schedule.as_deref(), TITLE_MAX_CHARS)
            .optional_text("age_range", self.age_range.as_deref(), 40)
            .optional_text("sport", self.sport.as_deref(), 40);
        v.finish()
    }
}

// ========================================
// Quiz & Leads
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswers {
    pub age: AgeBracket,
    pub sport: Sport,
    pub goal: Goal,
}

/// Owned form of [`Recommendation`] for deserializing on the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub program: String,
    pub slug: ProgramSlug,
    pub price: String,
    pub price_cents: i64,
    pub description: String,
    pub cta_path: String,
}

impl From<Recommendation> for RecommendationView {
    fn from(r: Recommendation) -> Self {
        Self {
            program: r.program.to_string(),
            slug: r.slug,
            price: r.price.to_string(),
            price_cents: r.price_cents,
            description: r.description.to_string(),
            cta_path: r.cta_path.to_string(),
        }
    }
}

/// Contact / free-trial form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub quiz: Option<QuizAnswers>,
    /// Page or campaign the form was submitted from
    #[serde(default)]
    pub source: Option<String>,
}

impl LeadRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.name("name", &self.name)
            .email("email", &self.email)
            .optional_phone("phone", self.phone.as_deref())
            .optional_text("message", self.message.as_deref(), MESSAGE_MAX_CHARS)
            .optional_text("source", self.source.as_deref(), TITLE_MAX_CHARS);
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub id: String,
    pub recommendation: Option<RecommendationView>,
}

/// Stored lead as shown on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub athlete_age: Option<String>,
    pub sport: Option<String>,
    pub goal: Option<String>,
    pub recommended_slug: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ========================================
// Checkout
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Program slugs to purchase
    #[serde(alias = "productIds")]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CheckoutRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if self.product_ids.is_empty() {
            v.push("product_ids", "must contain at least one program");
        } else if self.product_ids.len() > CHECKOUT_MAX_ITEMS {
            v.push(
                "product_ids",
                format!("must contain at most {} programs", CHECKOUT_MAX_ITEMS),
            );
        }
        if let Some(email) = self.normalized_email() {
            v.email("email", &email);
        }
        v.finish()
    }

    /// Trimmed, lowercased email; blank counts as absent
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    /// Provider-hosted page the browser is redirected to
    pub url: String,
}

// ========================================
// Chat
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoomInput {
    pub slug: String,
    pub name: String,
}

impl ChatRoomInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.slug("slug", &self.slug)
            .length("name", &self.name, 1, NAME_MAX_CHARS);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    /// Insertion order within the database; messages sort by this
    pub seq: i64,
    pub room_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub author: String,
    pub body: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.length("author", &self.author, 1, CHAT_AUTHOR_MAX_CHARS)
            .length("body", &self.body, 1, CHAT_BODY_MAX_CHARS);
        v.finish()
    }
}

// ========================================
// Gallery, videos, testimonials, coaches
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryInput {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl GalleryInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.length("title", &self.title, 1, TITLE_MAX_CHARS)
            .url("image_url", &self.image_url)
            .optional_text("caption", self.caption.as_deref(), MESSAGE_MAX_CHARS);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub video_url: String,
    pub description: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInput {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl VideoInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.length("title", &self.title, 1, TITLE_MAX_CHARS)
            .url("video_url", &self.video_url)
            .optional_text("description", self.description.as_deref(), MESSAGE_MAX_CHARS);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub author: String,
    pub quote: String,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialInput {
    pub author: String,
    pub quote: String,
    pub rating: i64,
}

impl TestimonialInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.name("author", &self.author)
            .length("quote", &self.quote, 1, MESSAGE_MAX_CHARS)
            .range("rating", self.rating, 1, 5);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub id: String,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachInput {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl CoachInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.name("name", &self.name)
            .length("title", &self.title, 1, TITLE_MAX_CHARS)
            .optional_text("bio", self.bio.as_deref(), MESSAGE_MAX_CHARS);
        if let Some(url) = self.photo_url.as_deref() {
            v.url("photo_url", url);
        }
        v.finish()
    }
}

// ========================================
// Envelopes
// ========================================

/// One page of a paginated admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}
