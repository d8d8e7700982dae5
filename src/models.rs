use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ============ Catalog Enums ============

/// Category of a loan product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Personal,
    Education,
    Vehicle,
    Home,
    CreditLine,
    DebtConsolidation,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Personal => "personal",
            LoanType::Education => "education",
            LoanType::Vehicle => "vehicle",
            LoanType::Home => "home",
            LoanType::CreditLine => "credit_line",
            LoanType::DebtConsolidation => "debt_consolidation",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(LoanType::Personal),
            "education" => Ok(LoanType::Education),
            "vehicle" => Ok(LoanType::Vehicle),
            "home" => Ok(LoanType::Home),
            "credit_line" => Ok(LoanType::CreditLine),
            "debt_consolidation" => Ok(LoanType::DebtConsolidation),
            other => Err(format!("unknown loan type '{}'", other)),
        }
    }
}

/// How quickly approved funds reach the borrower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisbursalSpeed {
    Instant,
    Fast,
    #[default]
    Standard,
    Slow,
}

impl DisbursalSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisbursalSpeed::Instant => "instant",
            DisbursalSpeed::Fast => "fast",
            DisbursalSpeed::Standard => "standard",
            DisbursalSpeed::Slow => "slow",
        }
    }
}

impl fmt::Display for DisbursalSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisbursalSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instant" => Ok(DisbursalSpeed::Instant),
            "fast" => Ok(DisbursalSpeed::Fast),
            "standard" => Ok(DisbursalSpeed::Standard),
            "slow" => Ok(DisbursalSpeed::Slow),
            other => Err(format!("unknown disbursal speed '{}'", other)),
        }
    }
}

/// Amount of paperwork an application requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocsLevel {
    Minimal,
    #[default]
    Standard,
    Extensive,
}

impl DocsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocsLevel::Minimal => "minimal",
            DocsLevel::Standard => "standard",
            DocsLevel::Extensive => "extensive",
        }
    }
}

impl fmt::Display for DocsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocsLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(DocsLevel::Minimal),
            "standard" => Ok(DocsLevel::Standard),
            "extensive" => Ok(DocsLevel::Extensive),
            other => Err(format!("unknown docs level '{}'", other)),
        }
    }
}

// ============ Product Record ============

/// A question/answer pair attached to a product. Order is display and match priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Free-text terms of a product. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Terms {
    /// Prepayment penalty wording, e.g. "None after 6 months".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment_penalty: Option<String>,
    /// Late payment fee wording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_payment_fee: Option<String>,
    /// Expected processing time, e.g. "4-24 hours".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
    /// Additional eligibility criteria, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub eligibility_criteria: Vec<String>,
    /// Documents the applicant must provide, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_documents: Vec<String>,
}

/// A loan product as stored in the catalog.
///
/// Records are read-only for this service: they are created and updated by the
/// catalog owner and only ever read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Stable unique identifier.
    pub id: Uuid,
    /// Display name of the product.
    pub name: String,
    /// Issuing bank or lender.
    pub bank: String,
    /// Loan category.
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    /// Annual percentage rate, 0-100.
    pub rate_apr: f64,
    /// Minimum monthly income, in rupees.
    pub min_income: f64,
    /// Minimum credit score on the 300-900 scale.
    pub min_credit_score: u16,
    /// Shortest tenure in months.
    #[serde(default = "default_tenure_min")]
    pub tenure_min_months: u32,
    /// Longest tenure in months.
    #[serde(default = "default_tenure_max")]
    pub tenure_max_months: u32,
    /// Processing fee as a percentage of the principal, 0-10.
    #[serde(default)]
    pub processing_fee_pct: f64,
    /// Whether the loan can be prepaid.
    #[serde(default = "default_prepayment_allowed")]
    pub prepayment_allowed: bool,
    #[serde(default)]
    pub disbursal_speed: DisbursalSpeed,
    #[serde(default)]
    pub docs_level: DocsLevel,
    /// Marketing summary.
    pub summary: String,
    #[serde(default)]
    pub faq: Vec<Faq>,
    #[serde(default)]
    pub terms: Terms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_tenure_min() -> u32 {
    6
}

fn default_tenure_max() -> u32 {
    60
}

fn default_prepayment_allowed() -> bool {
    true
}

impl Product {
    /// Difference between the longest and shortest tenure, in months.
    pub fn tenure_spread_months(&self) -> u32 {
        self.tenure_max_months.saturating_sub(self.tenure_min_months)
    }

    /// Checks the record invariants, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Product name is required"));
        }
        if self.bank.trim().is_empty() {
            errors.push(FieldError::new("bank", "Bank name is required"));
        }
        if !(0.0..=100.0).contains(&self.rate_apr) {
            errors.push(FieldError::new("rate_apr", "must be between 0 and 100"));
        }
        if self.min_income.is_nan() || self.min_income < 0.0 {
            errors.push(FieldError::new("min_income", "must be at least 0"));
        }
        if !(300..=900).contains(&self.min_credit_score) {
            errors.push(FieldError::new(
                "min_credit_score",
                "must be between 300 and 900",
            ));
        }
        if self.tenure_min_months < 1 {
            errors.push(FieldError::new("tenure_min_months", "must be at least 1"));
        }
        if self.tenure_max_months < self.tenure_min_months {
            errors.push(FieldError::new(
                "tenure_max_months",
                "must be greater than or equal to tenure_min_months",
            ));
        }
        if !(0.0..=10.0).contains(&self.processing_fee_pct) {
            errors.push(FieldError::new(
                "processing_fee_pct",
                "must be between 0 and 10",
            ));
        }
        if self.summary.trim().is_empty() {
            errors.push(FieldError::new("summary", "Summary is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ============ Derived Views ============

/// Optional borrower attributes used for scoring. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserProfile {
    /// Monthly income, in rupees.
    pub income: Option<f64>,
    /// Credit score on the 300-900 scale.
    pub credit_score: Option<u16>,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.income.is_some_and(|v| v.is_nan() || v < 0.0) {
            errors.push(FieldError::new("income", "must be at least 0"));
        }
        if self
            .credit_score
            .is_some_and(|v| !(300..=900).contains(&v))
        {
            errors.push(FieldError::new("creditScore", "must be between 300 and 900"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Visual style of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Destructive,
    Outline,
}

/// A short qualifier label summarising one notable attribute of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Badge {
    pub label: String,
    pub variant: BadgeVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Badge {
    pub fn new(label: impl Into<String>, variant: BadgeVariant, icon: &str) -> Self {
        Self {
            label: label.into(),
            variant,
            icon: Some(icon.to_string()),
        }
    }
}

/// A product decorated with its badges and match score for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub badges: Vec<Badge>,
    /// Compatibility score, 0-100.
    pub match_score: u8,
}

// ============ Q&A Models ============

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior turn supplied by the caller. The service never stores these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Which path produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Grounded answer from the Gemini model.
    Gemini,
    /// Deterministic rule-based answer.
    Fallback,
}

/// Request payload for `POST /api/v1/ai/ask`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// UUID of the product the question is about.
    pub product_id: String,
    /// The question, 1-1000 characters.
    pub message: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Longest accepted question, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

impl AskRequest {
    /// Checks the request shape and returns the parsed product id.
    pub fn validate(&self) -> Result<Uuid, Vec<FieldError>> {
        let mut errors = Vec::new();

        let product_id = match Uuid::parse_str(self.product_id.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(FieldError::new("productId", "Invalid product ID"));
                None
            }
        };

        if self.message.is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        } else if self.message.chars().count() > MAX_MESSAGE_CHARS {
            errors.push(FieldError::new(
                "message",
                format!("Message must be at most {} characters", MAX_MESSAGE_CHARS),
            ));
        }

        for (index, turn) in self.history.iter().enumerate() {
            if turn.content.is_empty() {
                errors.push(FieldError::new(
                    format!("history[{}].content", index),
                    "Message content is required",
                ));
            }
        }

        match product_id {
            Some(id) if errors.is_empty() => Ok(id),
            _ => Err(errors),
        }
    }
}

/// Response payload for `POST /api/v1/ai/ask`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub response: String,
    pub source: AnswerSource,
    /// Product fields the answer may draw from.
    pub cited_fields: Vec<String>,
}

// ============ Listing Models ============

/// Query parameters for `GET /api/v1/products`.
///
/// `minIncome`/`maxIncome` and `minCreditScore`/`maxCreditScore` describe the
/// borrower, so both keep products whose requirement is at or below the value.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilters {
    /// Case-insensitive substring of the bank name.
    pub bank: Option<String>,
    /// Exact loan type, e.g. `personal` or `credit_line`.
    #[serde(rename = "type")]
    pub loan_type: Option<String>,
    pub min_apr: Option<f64>,
    pub max_apr: Option<f64>,
    pub min_income: Option<f64>,
    pub max_income: Option<f64>,
    pub min_credit_score: Option<u16>,
    pub max_credit_score: Option<u16>,
    /// Borrower income used for match scoring.
    pub income: Option<f64>,
    /// Borrower credit score used for match scoring.
    pub credit_score: Option<u16>,
}

impl ProductFilters {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            income: self.income,
            credit_score: self.credit_score,
        }
    }

    /// Checks filter bounds, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(loan_type) = &self.loan_type {
            if let Err(e) = loan_type.parse::<LoanType>() {
                errors.push(FieldError::new("type", e));
            }
        }
        if self.min_apr.is_some_and(|v| v.is_nan() || v < 0.0) {
            errors.push(FieldError::new("minApr", "must be at least 0"));
        }
        if self.max_apr.is_some_and(|v| v.is_nan() || v > 100.0) {
            errors.push(FieldError::new("maxApr", "must be at most 100"));
        }
        if self.min_income.is_some_and(|v| v.is_nan() || v < 0.0) {
            errors.push(FieldError::new("minIncome", "must be at least 0"));
        }
        if self.max_income.is_some_and(|v| v.is_nan() || v < 0.0) {
            errors.push(FieldError::new("maxIncome", "must be at least 0"));
        }
        if self.min_credit_score.is_some_and(|v| v < 300) {
            errors.push(FieldError::new("minCreditScore", "must be at least 300"));
        }
        if self.max_credit_score.is_some_and(|v| v > 900) {
            errors.push(FieldError::new("maxCreditScore", "must be at most 900"));
        }
        if let Err(profile_errors) = self.profile().validate() {
            errors.extend(profile_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether `product` passes every filter that is set.
    ///
    /// Income and credit-score bounds describe the borrower, so a product
    /// passes when its requirement is at or below the given value.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(bank) = &self.bank {
            if !product.bank.to_lowercase().contains(&bank.to_lowercase()) {
                return false;
            }
        }
        if let Some(loan_type) = &self.loan_type {
            if product.loan_type.as_str() != loan_type {
                return false;
            }
        }
        if self.min_apr.is_some_and(|v| product.rate_apr < v) {
            return false;
        }
        if self.max_apr.is_some_and(|v| product.rate_apr > v) {
            return false;
        }
        for income in [self.min_income, self.max_income].into_iter().flatten() {
            if product.min_income > income {
                return false;
            }
        }
        for score in [self.min_credit_score, self.max_credit_score]
            .into_iter()
            .flatten()
        {
            if product.min_credit_score > score {
                return false;
            }
        }
        true
    }
}

/// Query parameters for `GET /api/v1/products/top-picks`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TopPicksQuery {
    pub income: Option<f64>,
    pub credit_score: Option<u16>,
    /// Number of picks to return, 1-15. Defaults to 5.
    pub limit: Option<usize>,
}

pub const DEFAULT_TOP_PICKS: usize = 5;
pub const MAX_TOP_PICKS: usize = 15;

impl TopPicksQuery {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            income: self.income,
            credit_score: self.credit_score,
        }
    }

    /// Requested pick count, defaulted and checked against the allowed range.
    pub fn limit(&self) -> Result<usize, Vec<FieldError>> {
        match self.limit {
            None => Ok(DEFAULT_TOP_PICKS),
            Some(n) if (1..=MAX_TOP_PICKS).contains(&n) => Ok(n),
            Some(_) => Err(vec![FieldError::new(
                "limit",
                format!("must be between 1 and {}", MAX_TOP_PICKS),
            )]),
        }
    }
}

/// Response payload for `GET /api/v1/products`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ListedProduct>,
    /// Sorted unique bank names present in `products`.
    pub banks: Vec<String>,
    pub total: usize,
}

/// Response payload for `GET /api/v1/products/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: ListedProduct,
}

// ============ Validation Details ============

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
