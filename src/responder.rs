//! Deterministic product Q&A used whenever the model cannot answer.
//!
//! A question is classified against an ordered table of topics; the first topic
//! whose keywords appear in the question answers it from structured product
//! fields. Questions that hit no topic are matched against the product FAQ and
//! finally answered with a generic product summary.

use crate::format::{format_inr, format_number};
use crate::models::{Faq, Product};
use std::fmt::Write;

/// Question categories answered from structured fields, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Eligibility,
    Documents,
    Prepayment,
    InterestRate,
    Tenure,
    Fees,
    Disbursal,
    CreditScore,
    Income,
}

impl Topic {
    /// Every topic, in the order they are tried.
    pub const PRIORITY: [Topic; 9] = [
        Topic::Eligibility,
        Topic::Documents,
        Topic::Prepayment,
        Topic::InterestRate,
        Topic::Tenure,
        Topic::Fees,
        Topic::Disbursal,
        Topic::CreditScore,
        Topic::Income,
    ];

    /// Lower-case substrings that select this topic.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Eligibility => &["eligib", "requirement", "qualify"],
            Topic::Documents => &["document", "doc", "paper"],
            Topic::Prepayment => &["prepay", "pre-pay", "early"],
            Topic::InterestRate => &["interest", "rate", "apr"],
            Topic::Tenure => &["tenure", "duration", "period", "long"],
            Topic::Fees => &["fee", "processing", "charge"],
            Topic::Disbursal => &["disburs", "fast", "quick", "time"],
            Topic::CreditScore => &["credit", "cibil", "score"],
            Topic::Income => &["income", "salary", "earn"],
        }
    }

    /// Whether an already lower-cased question mentions this topic.
    pub fn matches(self, lowered_question: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| lowered_question.contains(keyword))
    }

    /// Answers the topic from the product's structured fields.
    pub fn answer(self, product: &Product) -> String {
        match self {
            Topic::Eligibility => eligibility_answer(product),
            Topic::Documents => documents_answer(product),
            Topic::Prepayment => prepayment_answer(product),
            Topic::InterestRate => interest_rate_answer(product),
            Topic::Tenure => tenure_answer(product),
            Topic::Fees => fees_answer(product),
            Topic::Disbursal => disbursal_answer(product),
            Topic::CreditScore => credit_score_answer(product),
            Topic::Income => income_answer(product),
        }
    }
}

/// First topic, in priority order, whose keywords appear in the question.
pub fn classify(question: &str) -> Option<Topic> {
    let lowered = question.to_lowercase();
    Topic::PRIORITY
        .into_iter()
        .find(|topic| topic.matches(&lowered))
}

/// Strategy for picking an FAQ entry that answers a free-form question.
pub trait FaqMatcher: Send + Sync {
    fn find_match<'a>(&self, question: &str, faq: &'a [Faq]) -> Option<&'a Faq>;
}

/// Matches on shared words between the question and each FAQ question.
///
/// Words are split on spaces and only those longer than `min_word_len`
/// characters count. A question word overlaps an FAQ word when either contains
/// the other. The first FAQ entry with at least `min_overlap` overlapping
/// question words wins; later entries are not compared.
#[derive(Debug, Clone, Copy)]
pub struct KeywordOverlapMatcher {
    pub min_word_len: usize,
    pub min_overlap: usize,
}

impl Default for KeywordOverlapMatcher {
    fn default() -> Self {
        Self {
            min_word_len: 3,
            min_overlap: 2,
        }
    }
}

impl KeywordOverlapMatcher {
    fn significant_words(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(' ')
            .filter(|word| word.chars().count() > self.min_word_len)
            .map(str::to_string)
            .collect()
    }

    fn overlap(&self, question_words: &[String], faq_question: &str) -> usize {
        let faq_words = self.significant_words(faq_question);
        question_words
            .iter()
            .filter(|word| {
                faq_words
                    .iter()
                    .any(|fw| fw.contains(word.as_str()) || word.contains(fw.as_str()))
            })
            .count()
    }
}

impl FaqMatcher for KeywordOverlapMatcher {
    fn find_match<'a>(&self, question: &str, faq: &'a [Faq]) -> Option<&'a Faq> {
        let question_words = self.significant_words(question);
        faq.iter()
            .find(|entry| self.overlap(&question_words, &entry.question) >= self.min_overlap)
    }
}

/// Rule-based responder: topic table, then FAQ lookup, then product summary.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedResponder<M = KeywordOverlapMatcher> {
    matcher: M,
}

impl<M: FaqMatcher> RuleBasedResponder<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Answers `question` about `product`. Pure: equal inputs give equal output.
    pub fn respond(&self, product: &Product, question: &str) -> String {
        if let Some(topic) = classify(question) {
            return topic.answer(product);
        }

        if let Some(entry) = self.matcher.find_match(question, &product.faq) {
            return entry.answer.clone();
        }

        summary_response(product)
    }
}

/// Answers with the default responder configuration.
pub fn generate_smart_response(product: &Product, question: &str) -> String {
    RuleBasedResponder::<KeywordOverlapMatcher>::default().respond(product, question)
}

/// Generic overview used when nothing more specific applies.
pub fn summary_response(product: &Product) -> String {
    format!(
        "I can help you with information about the {name} from {bank}.\n\n\
         Here's what I know about this product:\n\
         - Interest Rate: {apr}% APR\n\
         - Minimum Income Required: ₹{income}/month\n\
         - Minimum Credit Score: {score}\n\
         - Tenure: {min} to {max} months\n\n\
         Please feel free to ask me specific questions about eligibility, documentation, fees, or any other aspect of this loan product.",
        name = product.name,
        bank = product.bank,
        apr = format_number(product.rate_apr),
        income = format_inr(product.min_income),
        score = product.min_credit_score,
        min = product.tenure_min_months,
        max = product.tenure_max_months,
    )
}

fn bullet_list(items: &[String]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "• {}", item);
    }
    out
}

fn eligibility_answer(product: &Product) -> String {
    let mut response = format!(
        "To be eligible for the {}, you need to meet the following requirements:\n\n",
        product.name
    );
    let _ = writeln!(response, "• Minimum Credit Score: {}", product.min_credit_score);
    let _ = writeln!(
        response,
        "• Minimum Income: ₹{}/month",
        format_inr(product.min_income)
    );

    let criteria = &product.terms.eligibility_criteria;
    if !criteria.is_empty() {
        response.push_str("\nAdditional eligibility criteria:\n");
        response.push_str(&bullet_list(criteria));
    }
    response
}

fn documents_answer(product: &Product) -> String {
    let docs = &product.terms.required_documents;
    if docs.is_empty() {
        return format!(
            "The documentation requirement for this loan is {}. Please contact the bank for a complete list of required documents.",
            product.docs_level
        );
    }
    format!(
        "The required documents for the {} are:\n\n{}",
        product.name,
        bullet_list(docs)
    )
}

fn prepayment_answer(product: &Product) -> String {
    let mut response = if product.prepayment_allowed {
        format!("Yes, prepayment is allowed for the {}.\n\n", product.name)
    } else {
        format!("No, prepayment is not allowed for the {}.\n\n", product.name)
    };
    if let Some(penalty) = &product.terms.prepayment_penalty {
        let _ = write!(response, "Prepayment terms: {}", penalty);
    }
    response
}

fn interest_rate_answer(product: &Product) -> String {
    let label = if product.rate_apr <= 10.0 {
        "a competitive rate"
    } else {
        "the standard rate"
    };
    format!(
        "The {} offers an interest rate of {}% APR. This is {} for {} loans.",
        product.name,
        format_number(product.rate_apr),
        label,
        product.loan_type
    )
}

fn tenure_answer(product: &Product) -> String {
    format!(
        "The {} offers flexible tenure options ranging from {} months to {} months ({} to {} years). You can choose a tenure that best fits your repayment capacity.",
        product.name,
        product.tenure_min_months,
        product.tenure_max_months,
        product.tenure_min_months / 12,
        product.tenure_max_months / 12
    )
}

fn fees_answer(product: &Product) -> String {
    let mut response = if product.processing_fee_pct == 0.0 {
        format!(
            "Great news! The {} has zero processing fee.\n\n",
            product.name
        )
    } else {
        format!(
            "The processing fee for {} is {}% of the loan amount.\n\n",
            product.name,
            format_number(product.processing_fee_pct)
        )
    };
    if let Some(late_fee) = &product.terms.late_payment_fee {
        let _ = write!(response, "Late payment fee: {}", late_fee);
    }
    response
}

fn disbursal_answer(product: &Product) -> String {
    let mut response = format!(
        "The {} has {} disbursal speed.\n\n",
        product.name, product.disbursal_speed
    );
    if let Some(processing_time) = &product.terms.processing_time {
        let _ = write!(response, "Processing time: {}", processing_time);
    }
    response
}

fn credit_score_answer(product: &Product) -> String {
    let qualifier = if product.min_credit_score <= 650 {
        "lower credit score is acceptable for this product, making it more accessible"
    } else {
        "good credit score is required for this product"
    };
    format!(
        "The minimum credit score required for the {} is {}. A {}.",
        product.name, product.min_credit_score, qualifier
    )
}

fn income_answer(product: &Product) -> String {
    let mut response = format!(
        "The minimum income requirement for the {} is ₹{}/month.",
        product.name,
        format_inr(product.min_income)
    );
    if product.min_income == 0.0 {
        response.push_str(
            " This product has no minimum income requirement, making it accessible for students and others.",
        );
    }
    response
}
