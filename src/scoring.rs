use crate::badges::generate_badges;
use crate::models::{DisbursalSpeed, DocsLevel, ListedProduct, Product, UserProfile};

const BASE_SCORE: u32 = 50;
const MAX_SCORE: u32 = 100;

/// Computes how well a product fits a borrower, clamped to `0..=100`.
///
/// Starts at 50 and adds non-negative bonuses, so a product scored without a
/// profile always lands in `50..=100`. A missing income or credit score simply
/// disables the matching bonus.
pub fn calculate_match_score(product: &Product, profile: &UserProfile) -> u8 {
    let mut score = BASE_SCORE;

    // APR brackets, lower is better
    score += if product.rate_apr <= 8.0 {
        20
    } else if product.rate_apr <= 12.0 {
        15
    } else if product.rate_apr <= 15.0 {
        10
    } else if product.rate_apr <= 18.0 {
        5
    } else {
        0
    };

    if let Some(income) = profile.income {
        if income >= product.min_income {
            score += 15;
            if income >= product.min_income * 1.5 {
                score += 5;
            }
        }
    }

    if let Some(credit_score) = profile.credit_score {
        if credit_score >= product.min_credit_score {
            score += 15;
            if u32::from(credit_score) >= u32::from(product.min_credit_score) + 50 {
                score += 5;
            }
        }
    }

    if product.prepayment_allowed {
        score += 5;
    }
    score += match product.disbursal_speed {
        DisbursalSpeed::Instant => 8,
        DisbursalSpeed::Fast => 5,
        DisbursalSpeed::Standard | DisbursalSpeed::Slow => 0,
    };
    if product.docs_level == DocsLevel::Minimal {
        score += 5;
    }
    if product.processing_fee_pct == 0.0 {
        score += 5;
    }
    if product.tenure_spread_months() >= 48 {
        score += 3;
    }

    score.min(MAX_SCORE) as u8
}

/// Decorates a product with its badges and match score.
pub fn list_product(product: Product, profile: &UserProfile) -> ListedProduct {
    let badges = generate_badges(&product);
    let match_score = calculate_match_score(&product, profile);
    ListedProduct {
        product,
        badges,
        match_score,
    }
}

/// Scores every product and orders them by descending match score.
///
/// The sort is stable, so products with equal scores keep their incoming order.
pub fn rank_products(products: Vec<Product>, profile: &UserProfile) -> Vec<ListedProduct> {
    let mut ranked: Vec<ListedProduct> = products
        .into_iter()
        .map(|product| list_product(product, profile))
        .collect();
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}
