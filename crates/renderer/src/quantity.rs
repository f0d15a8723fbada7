/// Format a consumed quantity, e.g. `"150.0 ml"` or `"1.2 L"`.
///
/// Millilitre values of a litre or more switch to litres; any other unit is
/// printed as-is.
pub fn format_quantity(value: f64, unit: &str, precision: usize) -> String {
    if unit.eq_ignore_ascii_case("ml") && value >= 1000.0 {
        format!("{:.*} L", precision, value / 1000.0)
    } else {
        format!("{:.*} {}", precision, value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_millilitres() {
        assert_eq!(format_quantity(150.0, "ml", 1), "150.0 ml");
    }

    #[test]
    fn format_litres() {
        assert_eq!(format_quantity(1250.0, "ml", 2), "1.25 L");
    }

    #[test]
    fn format_other_unit() {
        assert_eq!(format_quantity(2500.0, "g", 0), "2500 g");
    }
}
