// src/utils/format.rs

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("Quantidade negativa não suportada: {0}")]
    NegativeQuantity(Decimal),
}

/// `1234.5` -> `"$1,234.50"`, `-3` -> `"-$3.00"`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Remove zeros à direita: 1.500 -> 1.5, 2.000 -> 2
fn trim_number(value: Decimal) -> String {
    value.round_dp(3).normalize().to_string()
}

/// Formata uma quantidade na unidade do produto.
///
/// Gramas e mililitros sobem para kg/L a partir de 1000 (`999g`, `1kg`, `1.5L`).
/// Unidades de contagem ficam separadas por espaço (`3 unidad`).
pub fn format_quantity(quantity: Decimal, unit: &str) -> Result<String, FormatError> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(FormatError::NegativeQuantity(quantity));
    }

    // Arredonda antes de escolher a unidade: 999.9996g vira 1kg
    let quantity = quantity.round_dp(3);
    let thousand = Decimal::from(1000);
    let formatted = match unit.trim().to_lowercase().as_str() {
        "g" if quantity >= thousand => format!("{}kg", trim_number(quantity / thousand)),
        "g" => format!("{}g", trim_number(quantity)),
        "ml" if quantity >= thousand => format!("{}L", trim_number(quantity / thousand)),
        "ml" => format!("{}ml", trim_number(quantity)),
        "kg" => format!("{}kg", trim_number(quantity)),
        "l" => format!("{}L", trim_number(quantity)),
        "" => trim_number(quantity),
        other => format!("{} {}", trim_number(quantity), other),
    };

    Ok(formatted)
}

// Situação do estoque em relação aos limites do produto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    SinStock,
    Bajo,
    Normal,
    Exceso,
}

impl StockStatus {
    /// Limites zerados significam "sem limite".
    pub fn of(total: Decimal, minimo: Decimal, maximo: Decimal) -> Self {
        if total <= Decimal::ZERO {
            StockStatus::SinStock
        } else if minimo > Decimal::ZERO && total <= minimo {
            StockStatus::Bajo
        } else if maximo > Decimal::ZERO && total > maximo {
            StockStatus::Exceso
        } else {
            StockStatus::Normal
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StockStatus::SinStock => "red",
            StockStatus::Bajo => "amber",
            StockStatus::Normal => "green",
            StockStatus::Exceso => "blue",
        }
    }

    pub fn is_low(self) -> bool {
        matches!(self, StockStatus::SinStock | StockStatus::Bajo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_basic() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec("4.5")), "$4.50");
        assert_eq!(format_currency(dec("999.999")), "$1,000.00");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(dec("-3")), "-$3.00");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_quantity_unit_thresholds() {
        assert_eq!(format_quantity(dec("999"), "g").unwrap(), "999g");
        assert_eq!(format_quantity(dec("1000"), "g").unwrap(), "1kg");
        assert_eq!(format_quantity(dec("1500"), "g").unwrap(), "1.5kg");
        assert_eq!(format_quantity(dec("999"), "ml").unwrap(), "999ml");
        assert_eq!(format_quantity(dec("1500"), "ml").unwrap(), "1.5L");
    }

    #[test]
    fn test_quantity_rounding_crosses_threshold() {
        assert_eq!(format_quantity(dec("999.9996"), "g").unwrap(), "1kg");
        assert_eq!(format_quantity(dec("999.9996"), "ml").unwrap(), "1L");
        assert_eq!(format_quantity(dec("999.9994"), "g").unwrap(), "999.999g");
    }

    #[test]
    fn test_quantity_zero_and_counts() {
        assert_eq!(format_quantity(Decimal::ZERO, "g").unwrap(), "0g");
        assert_eq!(format_quantity(dec("3.000"), "unidad").unwrap(), "3 unidad");
        assert_eq!(format_quantity(dec("2.50"), "KG").unwrap(), "2.5kg");
    }

    #[test]
    fn test_quantity_negative_is_rejected() {
        assert_eq!(
            format_quantity(dec("-1"), "g"),
            Err(FormatError::NegativeQuantity(dec("-1")))
        );
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(StockStatus::of(Decimal::ZERO, dec("5"), dec("50")), StockStatus::SinStock);
        assert_eq!(StockStatus::of(dec("5"), dec("5"), dec("50")), StockStatus::Bajo);
        assert_eq!(StockStatus::of(dec("20"), dec("5"), dec("50")), StockStatus::Normal);
        assert_eq!(StockStatus::of(dec("51"), dec("5"), dec("50")), StockStatus::Exceso);
        // Sem limites configurados
        assert_eq!(StockStatus::of(dec("1000"), Decimal::ZERO, Decimal::ZERO), StockStatus::Normal);
    }

    #[test]
    fn test_stock_status_colors() {
        assert_eq!(StockStatus::SinStock.color(), "red");
        assert_eq!(StockStatus::Bajo.color(), "amber");
        assert!(StockStatus::Bajo.is_low());
        assert!(!StockStatus::Exceso.is_low());
    }
}
