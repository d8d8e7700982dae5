//! Grounded context for the product Q&A model.
//!
//! The prompt carries every structured field of one product plus its FAQ and
//! terms. Optional terms that are absent are left out entirely rather than
//! rendered as placeholders, so the model never sees a cue to invent them.

use crate::format::{format_inr, format_number};
use crate::models::Product;

/// Reply the model is seeded with after the grounding prompt.
pub const GROUNDING_ACKNOWLEDGEMENT: &str = "I understand. I will only answer questions about this specific loan product using the provided data. I will not make up any information.";

const HEADER: &str = "You are a helpful loan assistant. You MUST only answer questions about the following loan product.
Do NOT make up any information. If the answer is not in the provided data, say \"I don't have that specific information about this product.\"";

const INSTRUCTIONS: &str = "Instructions:
1. Only answer questions about THIS specific loan product
2. Use the data provided above to answer questions
3. Be concise and helpful
4. If asked about something not in the data, politely say you don't have that information
5. Format responses clearly with bullet points where appropriate
6. Always mention the product name when relevant";

/// Builds the system prompt that grounds the model to `product`.
pub fn build_system_prompt(product: &Product) -> String {
    let terms = &product.terms;
    let mut sections: Vec<String> = Vec::new();

    sections.push(HEADER.to_string());
    sections.push("=== LOAN PRODUCT DATA ===".to_string());

    sections.push(format!(
        "Product Name: {}\nBank: {}\nLoan Type: {}\nSummary: {}",
        product.name, product.bank, product.loan_type, product.summary
    ));

    let mut financial = vec![
        "FINANCIAL DETAILS:".to_string(),
        format!("- Interest Rate (APR): {}%", format_number(product.rate_apr)),
        format!(
            "- Minimum Income Required: ₹{}/month",
            format_inr(product.min_income)
        ),
        format!("- Minimum Credit Score: {}", product.min_credit_score),
        format!(
            "- Tenure: {} to {} months",
            product.tenure_min_months, product.tenure_max_months
        ),
        format!(
            "- Processing Fee: {}%",
            format_number(product.processing_fee_pct)
        ),
        format!(
            "- Prepayment Allowed: {}",
            if product.prepayment_allowed { "Yes" } else { "No" }
        ),
    ];
    if let Some(penalty) = &terms.prepayment_penalty {
        financial.push(format!("- Prepayment Penalty: {}", penalty));
    }
    sections.push(financial.join("\n"));

    let mut disbursal = vec![
        "DISBURSAL & PROCESSING:".to_string(),
        format!("- Disbursal Speed: {}", product.disbursal_speed),
        format!("- Documentation Level: {}", product.docs_level),
    ];
    if let Some(processing_time) = &terms.processing_time {
        disbursal.push(format!("- Processing Time: {}", processing_time));
    }
    sections.push(disbursal.join("\n"));

    if !terms.eligibility_criteria.is_empty() {
        sections.push(format!(
            "ELIGIBILITY CRITERIA:\n{}",
            terms.eligibility_criteria.join(", ")
        ));
    }

    if !terms.required_documents.is_empty() {
        sections.push(format!(
            "REQUIRED DOCUMENTS:\n{}",
            terms.required_documents.join(", ")
        ));
    }

    if let Some(late_fee) = &terms.late_payment_fee {
        sections.push(format!("LATE PAYMENT FEE: {}", late_fee));
    }

    if !product.faq.is_empty() {
        let faq = product
            .faq
            .iter()
            .map(|f| format!("Q: {}\nA: {}", f.question, f.answer))
            .collect::<Vec<_>>()
            .join("\n\n");
        sections.push(format!("FREQUENTLY ASKED QUESTIONS:\n{}", faq));
    }

    sections.push("=== END OF PRODUCT DATA ===".to_string());
    sections.push(INSTRUCTIONS.to_string());

    sections.join("\n\n")
}
