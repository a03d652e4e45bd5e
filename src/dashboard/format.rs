/// Shown in place of the table when there are no villas
pub const EMPTY_LIST_MESSAGE: &str = "No villas found. Add one to get started!";

const PREVIEW_CHARS: usize = 40;

/// Render an amount as Indonesian rupiah, e.g. `Rp 1.250.000,5`
pub fn format_rupiah(amount: f64) -> String {
    let scaled = (amount.abs() * 1000.0).round() as u64;
    let (whole, fraction) = (scaled / 1000, scaled % 1000);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if fraction > 0 {
        let fraction = format!("{:03}", fraction);
        grouped.push(',');
        grouped.push_str(fraction.trim_end_matches('0'));
    }

    let sign = if amount < 0.0 && scaled > 0 { "-" } else { "" };
    format!("Rp {}{}", sign, grouped)
}

pub fn description_preview(description: &str) -> String {
    let preview: String = description.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", preview)
}

pub fn availability_label(is_available: bool) -> &'static str {
    if is_available {
        "Available"
    } else {
        "Rented"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupiah_groups_thousands_with_dots() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(950.0), "Rp 950");
        assert_eq!(format_rupiah(500_000.0), "Rp 500.000");
        assert_eq!(format_rupiah(12_500_000.0), "Rp 12.500.000");
    }

    #[test]
    fn rupiah_keeps_up_to_three_decimals() {
        assert_eq!(format_rupiah(1234.5), "Rp 1.234,5");
        assert_eq!(format_rupiah(0.125), "Rp 0,125");
        assert_eq!(format_rupiah(999.9999), "Rp 1.000");
        assert_eq!(format_rupiah(-2500.0), "Rp -2.500");
    }

    #[test]
    fn preview_truncates_on_characters() {
        let long = "Tropical villa with infinity pool overlooking the jungle";
        assert_eq!(
            description_preview(long),
            "Tropical villa with infinity pool overlo..."
        );
        assert_eq!(description_preview("Cozy"), "Cozy...");
        assert_eq!(description_preview(&"é".repeat(50)).chars().count(), 43);
    }

    #[test]
    fn availability_labels() {
        assert_eq!(availability_label(true), "Available");
        assert_eq!(availability_label(false), "Rented");
    }
}
