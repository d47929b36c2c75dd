//! Amount formatting.
//!
//! All amounts are integer minor units (hundredths).

/// Formats minor units as a decimal string, e.g. `1250` as `"12.50"`.
pub fn format_minor(amount: u64) -> String {
    format!("{}.{:02}", amount / 100, amount % 100)
}

/// Adds up amounts, stopping at `u64::MAX` instead of wrapping.
pub fn sum_minor<I: IntoIterator<Item = u64>>(amounts: I) -> u64 {
    amounts.into_iter().fold(0, u64::saturating_add)
}
