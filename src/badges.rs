use crate::format::format_income_short;
use crate::models::{Badge, BadgeVariant, DisbursalSpeed, DocsLevel, LoanType, Product};

/// Maximum number of badges shown for one product.
pub const MAX_BADGES: usize = 5;

/// Generates the qualifier badges for a product.
///
/// Rules run in a fixed order and each category contributes at most one badge:
/// APR, prepayment, disbursal speed, documentation, income, credit score,
/// tenure flexibility, processing fee and finally loan type. The result is the
/// first [`MAX_BADGES`] badges in that order; nothing is re-sorted.
pub fn generate_badges(product: &Product) -> Vec<Badge> {
    let mut badges = Vec::new();

    // APR tiers
    if product.rate_apr <= 8.0 {
        badges.push(Badge::new("Low APR", BadgeVariant::Default, "percent"));
    } else if product.rate_apr <= 12.0 {
        badges.push(Badge::new(
            "Competitive Rate",
            BadgeVariant::Secondary,
            "trending-down",
        ));
    }

    if product.prepayment_allowed {
        badges.push(Badge::new(
            "No Prepayment Penalty",
            BadgeVariant::Secondary,
            "check-circle",
        ));
    }

    match product.disbursal_speed {
        DisbursalSpeed::Instant => {
            badges.push(Badge::new("Instant Disbursal", BadgeVariant::Default, "zap"))
        }
        DisbursalSpeed::Fast => {
            badges.push(Badge::new("Fast Disbursal", BadgeVariant::Secondary, "clock"))
        }
        DisbursalSpeed::Standard | DisbursalSpeed::Slow => {}
    }

    if product.docs_level == DocsLevel::Minimal {
        badges.push(Badge::new(
            "Minimal Docs",
            BadgeVariant::Secondary,
            "file-minus",
        ));
    }

    // Income requirement
    if product.min_income <= 25_000.0 {
        badges.push(Badge::new(
            format!("₹{}+ Eligible", format_income_short(product.min_income)),
            BadgeVariant::Outline,
            "wallet",
        ));
    } else if product.min_income <= 50_000.0 {
        badges.push(Badge::new(
            format!("Salary ≥ ₹{}", format_income_short(product.min_income)),
            BadgeVariant::Outline,
            "indian-rupee",
        ));
    }

    // Credit score requirement
    if product.min_credit_score <= 650 {
        badges.push(Badge::new(
            "Low Credit Score OK",
            BadgeVariant::Secondary,
            "shield-check",
        ));
    } else if product.min_credit_score >= 750 {
        badges.push(Badge::new(
            format!("Credit Score ≥ {}", product.min_credit_score),
            BadgeVariant::Outline,
            "award",
        ));
    }

    if product.tenure_spread_months() >= 48 {
        badges.push(Badge::new(
            "Flexible Tenure",
            BadgeVariant::Secondary,
            "calendar",
        ));
    }

    // Processing fee
    if product.processing_fee_pct == 0.0 {
        badges.push(Badge::new(
            "Zero Processing Fee",
            BadgeVariant::Default,
            "gift",
        ));
    } else if product.processing_fee_pct <= 0.5 {
        badges.push(Badge::new(
            "Low Processing Fee",
            BadgeVariant::Secondary,
            "percent",
        ));
    }

    if let Some(badge) = loan_type_badge(product.loan_type) {
        badges.push(badge);
    }

    badges.truncate(MAX_BADGES);
    badges
}

fn loan_type_badge(loan_type: LoanType) -> Option<Badge> {
    match loan_type {
        LoanType::Education => Some(Badge::new(
            "Education Loan",
            BadgeVariant::Outline,
            "graduation-cap",
        )),
        LoanType::Home => Some(Badge::new("Home Loan", BadgeVariant::Outline, "home")),
        LoanType::Vehicle => Some(Badge::new("Vehicle Loan", BadgeVariant::Outline, "car")),
        LoanType::Personal | LoanType::CreditLine | LoanType::DebtConsolidation => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Terms;
    use uuid::Uuid;

    fn product() -> Product {
        Product {
            id: Uuid::nil(),
            name: "Plain Loan".to_string(),
            bank: "Plain Bank".to_string(),
            loan_type: LoanType::Personal,
            rate_apr: 16.0,
            min_income: 60_000.0,
            min_credit_score: 700,
            tenure_min_months: 12,
            tenure_max_months: 36,
            processing_fee_pct: 2.0,
            prepayment_allowed: false,
            disbursal_speed: DisbursalSpeed::Standard,
            docs_level: DocsLevel::Standard,
            summary: "Nothing notable.".to_string(),
            faq: vec![],
            terms: Terms::default(),
            created_at: None,
            updated_at: None,
        }
    }

    fn labels(product: &Product) -> Vec<String> {
        generate_badges(product).into_iter().map(|b| b.label).collect()
    }

    #[test]
    fn test_product_without_highlights_gets_no_badges() {
        assert!(generate_badges(&product()).is_empty());
    }

    #[test]
    fn test_apr_tiers_are_exclusive() {
        let mut p = product();
        p.rate_apr = 8.0;
        assert_eq!(labels(&p), vec!["Low APR"]);

        p.rate_apr = 8.01;
        assert_eq!(labels(&p), vec!["Competitive Rate"]);

        p.rate_apr = 12.0;
        assert_eq!(labels(&p), vec!["Competitive Rate"]);
    }

    #[test]
    fn test_income_badge_labels() {
        let mut p = product();
        p.min_income = 15_000.0;
        assert_eq!(labels(&p), vec!["₹15K+ Eligible"]);

        p.min_income = 40_000.0;
        assert_eq!(labels(&p), vec!["Salary ≥ ₹40K"]);

        p.min_income = 0.0;
        assert_eq!(labels(&p), vec!["₹0+ Eligible"]);
    }

    #[test]
    fn test_credit_score_badges() {
        let mut p = product();
        p.min_credit_score = 650;
        assert_eq!(labels(&p), vec!["Low Credit Score OK"]);

        p.min_credit_score = 760;
        assert_eq!(labels(&p), vec!["Credit Score ≥ 760"]);
    }

    #[test]
    fn test_variants_and_icons() {
        let mut p = product();
        p.disbursal_speed = DisbursalSpeed::Instant;
        p.processing_fee_pct = 0.5;

        let badges = generate_badges(&p);
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].variant, BadgeVariant::Default);
        assert_eq!(badges[0].icon.as_deref(), Some("zap"));
        assert_eq!(badges[1].label, "Low Processing Fee");
        assert_eq!(badges[1].variant, BadgeVariant::Secondary);
    }

    #[test]
    fn test_truncates_in_rule_order() {
        let mut p = product();
        p.rate_apr = 7.0;
        p.prepayment_allowed = true;
        p.disbursal_speed = DisbursalSpeed::Fast;
        p.docs_level = DocsLevel::Minimal;
        p.min_income = 10_000.0;
        p.min_credit_score = 600;
        p.loan_type = LoanType::Home;

        assert_eq!(
            labels(&p),
            vec![
                "Low APR",
                "No Prepayment Penalty",
                "Fast Disbursal",
                "Minimal Docs",
                "₹10K+ Eligible",
            ]
        );
    }

    #[test]
    fn test_type_badge_when_room_remains() {
        let mut p = product();
        p.loan_type = LoanType::Vehicle;
        assert_eq!(labels(&p), vec!["Vehicle Loan"]);

        p.loan_type = LoanType::CreditLine;
        assert!(labels(&p).is_empty());
    }
}
