//! Derived figures shown in the result view and the exported image.

use crate::models::NegotiableItem;

/// Sums over the current item list. Recomputed on every change, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub current: f64,
    pub target: f64,
    pub diff: f64,
}

impl Totals {
    pub fn from_items(items: &[NegotiableItem]) -> Self {
        let current: f64 = items.iter().map(|i| i.current).sum();
        let target: f64 = items.iter().map(|i| i.target).sum();
        Self {
            current,
            target,
            diff: current - target,
        }
    }

    /// Quoted and fair totals side by side, e.g. `見積額: 20,000円 / 適正価格: 10,000円`.
    pub fn breakdown(&self) -> String {
        format!(
            "見積額: {}円 / 適正価格: {}円",
            format_amount(self.current),
            format_amount(self.target)
        )
    }
}

/// What one item row displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRowModel {
    pub overpriced: bool,
    pub badge: &'static str,
    pub name: String,
    /// Negotiation argument, shown for overpriced rows only.
    pub reason: Option<String>,
    /// Struck-through current price, shown for overpriced rows only.
    pub struck_current: Option<String>,
    pub target: String,
}

impl ItemRowModel {
    pub fn new(item: &NegotiableItem) -> Self {
        let overpriced = item.is_overpriced();
        Self {
            overpriced,
            badge: if overpriced { "!" } else { "✓" },
            name: item.name.clone(),
            reason: overpriced.then(|| item.reason.clone()),
            struck_current: overpriced.then(|| format_amount(item.current)),
            target: format_amount(item.target),
        }
    }
}

/// Formats an amount with thousands separators and at most three fraction
/// digits, e.g. `20000` → `20,000`, `1234.5` → `1,234.5`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let fixed = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if negative {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
