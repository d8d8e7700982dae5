//! Number formatting shared by badges, prompts and rule-based answers.

/// Formats an amount in rupees with Indian digit grouping, e.g. `1,50,000`.
///
/// Fractional paise are kept to at most two digits and trailing zeros are dropped.
pub fn format_inr(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction > 0 {
        let frac = format!("{:02}", fraction);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

/// Compact income label used on badges: `1.5L`, `25K`, `800`.
pub fn format_income_short(income: f64) -> String {
    if income >= 100_000.0 {
        let lakhs = (income / 100_000.0 * 10.0).round() / 10.0;
        format!("{:.1}L", lakhs)
    } else if income >= 1_000.0 {
        format!("{}K", (income / 1_000.0).round() as u64)
    } else {
        format!("{}", income.round() as u64)
    }
}

/// Shortest decimal rendering of a rate or percentage: `10.5`, `12`, `0.5`.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}
