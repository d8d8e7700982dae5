use crate::errors::{AppError, ResultExt};
use crate::models::{DisbursalSpeed, DocsLevel, Faq, LoanType, Product, Terms};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!("../migrations/0001_create_products.sql");

const PRODUCT_COLUMNS: &str = "id, name, bank, type, rate_apr, min_income, min_credit_score, \
     tenure_min_months, tenure_max_months, processing_fee_pct, prepayment_allowed, \
     disbursal_speed, docs_level, summary, faq, terms, created_at, updated_at";

/// Persistent source of product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches one product; `Ok(None)` when the store has no such row.
    async fn fetch_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    /// Fetches every product ordered by ascending APR.
    async fn fetch_products(&self) -> Result<Vec<Product>, AppError>;
}

/// Row shape of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    bank: String,
    #[sqlx(rename = "type")]
    loan_type: String,
    rate_apr: BigDecimal,
    min_income: BigDecimal,
    min_credit_score: i32,
    tenure_min_months: i32,
    tenure_max_months: i32,
    processing_fee_pct: Option<BigDecimal>,
    prepayment_allowed: Option<bool>,
    disbursal_speed: Option<String>,
    docs_level: Option<String>,
    summary: String,
    faq: Option<Json<Vec<Faq>>>,
    terms: Option<Json<Terms>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn decimal_to_f64(value: &BigDecimal, column: &str) -> Result<f64, AppError> {
    value
        .to_f64()
        .ok_or_else(|| AppError::InternalError(format!("{} is not representable", column)))
}

fn f64_to_decimal(value: f64, column: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(&value.to_string())
        .map_err(|e| AppError::InternalError(format!("{} is not a valid decimal: {}", column, e)))
}

fn to_u32(value: i32, column: &str) -> Result<u32, AppError> {
    u32::try_from(value)
        .map_err(|_| AppError::InternalError(format!("{} must not be negative", column)))
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let loan_type = LoanType::from_str(&row.loan_type).map_err(AppError::InternalError)?;
        let disbursal_speed = row
            .disbursal_speed
            .as_deref()
            .map(DisbursalSpeed::from_str)
            .transpose()
            .map_err(AppError::InternalError)?
            .unwrap_or_default();
        let docs_level = row
            .docs_level
            .as_deref()
            .map(DocsLevel::from_str)
            .transpose()
            .map_err(AppError::InternalError)?
            .unwrap_or_default();

        Ok(Product {
            id: row.id,
            name: row.name,
            bank: row.bank,
            loan_type,
            rate_apr: decimal_to_f64(&row.rate_apr, "rate_apr")?,
            min_income: decimal_to_f64(&row.min_income, "min_income")?,
            min_credit_score: u16::try_from(row.min_credit_score).map_err(|_| {
                AppError::InternalError("min_credit_score out of range".to_string())
            })?,
            tenure_min_months: to_u32(row.tenure_min_months, "tenure_min_months")?,
            tenure_max_months: to_u32(row.tenure_max_months, "tenure_max_months")?,
            processing_fee_pct: row
                .processing_fee_pct
                .as_ref()
                .map(|fee| decimal_to_f64(fee, "processing_fee_pct"))
                .transpose()?
                .unwrap_or(0.0),
            prepayment_allowed: row.prepayment_allowed.unwrap_or(true),
            disbursal_speed,
            docs_level,
            summary: row.summary,
            faq: row.faq.map(|Json(faq)| faq).unwrap_or_default(),
            terms: row.terms.map(|Json(terms)| terms).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Product store backed by the Postgres `products` table.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `products` table and its indexes if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .context("Failed to create products schema")?;
        Ok(())
    }

    /// Inserts or fully replaces a product by id.
    pub async fn upsert_product(&self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, bank, type, rate_apr, min_income, min_credit_score,
                tenure_min_months, tenure_max_months, processing_fee_pct,
                prepayment_allowed, disbursal_speed, docs_level, summary, faq, terms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                bank = EXCLUDED.bank,
                type = EXCLUDED.type,
                rate_apr = EXCLUDED.rate_apr,
                min_income = EXCLUDED.min_income,
                min_credit_score = EXCLUDED.min_credit_score,
                tenure_min_months = EXCLUDED.tenure_min_months,
                tenure_max_months = EXCLUDED.tenure_max_months,
                processing_fee_pct = EXCLUDED.processing_fee_pct,
                prepayment_allowed = EXCLUDED.prepayment_allowed,
                disbursal_speed = EXCLUDED.disbursal_speed,
                docs_level = EXCLUDED.docs_level,
                summary = EXCLUDED.summary,
                faq = EXCLUDED.faq,
                terms = EXCLUDED.terms,
                updated_at = now()
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.bank)
        .bind(product.loan_type.as_str())
        .bind(f64_to_decimal(product.rate_apr, "rate_apr")?)
        .bind(f64_to_decimal(product.min_income, "min_income")?)
        .bind(i32::from(product.min_credit_score))
        .bind(product.tenure_min_months as i32)
        .bind(product.tenure_max_months as i32)
        .bind(f64_to_decimal(product.processing_fee_pct, "processing_fee_pct")?)
        .bind(product.prepayment_allowed)
        .bind(product.disbursal_speed.as_str())
        .bind(product.docs_level.as_str())
        .bind(&product.summary)
        .bind(Json(&product.faq))
        .bind(Json(&product.terms))
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert product {}", product.id))?;

        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn fetch_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch product {}", id))?;

        row.map(Product::try_from).transpose()
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY rate_apr ASC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list products")?;

        rows.into_iter().map(Product::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            id: Uuid::nil(),
            name: "Canara Bank Home Loan".to_string(),
            bank: "Canara Bank".to_string(),
            loan_type: "home".to_string(),
            rate_apr: BigDecimal::from_str("8.35").unwrap(),
            min_income: BigDecimal::from_str("30000.00").unwrap(),
            min_credit_score: 700,
            tenure_min_months: 60,
            tenure_max_months: 360,
            processing_fee_pct: None,
            prepayment_allowed: None,
            disbursal_speed: None,
            docs_level: Some("extensive".to_string()),
            summary: "Home loan.".to_string(),
            faq: None,
            terms: Some(Json(Terms {
                processing_time: Some("7-10 days".to_string()),
                ..Terms::default()
            })),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_row_conversion_applies_column_defaults() {
        let product = Product::try_from(row()).unwrap();

        assert_eq!(product.loan_type, LoanType::Home);
        assert_eq!(product.rate_apr, 8.35);
        assert_eq!(product.min_income, 30_000.0);
        assert_eq!(product.processing_fee_pct, 0.0);
        assert!(product.prepayment_allowed);
        assert_eq!(product.disbursal_speed, DisbursalSpeed::Standard);
        assert_eq!(product.docs_level, DocsLevel::Extensive);
        assert!(product.faq.is_empty());
        assert_eq!(product.terms.processing_time.as_deref(), Some("7-10 days"));
    }

    #[test]
    fn test_row_with_unknown_enum_is_rejected() {
        let mut bad = row();
        bad.loan_type = "mortgage".to_string();
        assert!(Product::try_from(bad).is_err());

        let mut bad = row();
        bad.tenure_min_months = -1;
        assert!(Product::try_from(bad).is_err());
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(f64_to_decimal(10.5, "rate_apr").unwrap().to_string(), "10.5");
        assert_eq!(
            decimal_to_f64(&BigDecimal::from_str("1.50").unwrap(), "fee").unwrap(),
            1.5
        );
    }
}
