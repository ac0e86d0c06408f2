//! Locale-aware parsing of raw page text into typed values.
//!
//! The target storefront renders Brazilian-Portuguese formats: decimal-comma
//! money with a currency prefix (`R$ 1.234,56`), compact quantity markers
//! (`x2`), and count banners (`38 Produtos`). The parsers here accept those
//! alongside the plain-ASCII equivalents so fixtures and future markets keep
//! working.

use crate::extract::types::Availability;
use thiserror::Error;

/// A field value that could not be parsed; recorded as an item warning, never
/// a hard failure
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(String);

/// Parse a money amount from display text.
///
/// Handles currency symbols/codes, thousands separators, and both decimal
/// comma and decimal point. When both separators appear the rightmost one is
/// the decimal separator; a lone separator followed by exactly three digits
/// is read as a thousands separator.
pub fn parse_money(raw: &str) -> Result<f64, ParseError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .collect();

    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(ParseError(format!("no amount in {:?}", raw)));
    }

    let negative = cleaned.starts_with('-');
    let digits_and_seps: String = cleaned.chars().filter(|c| *c != '-').collect();

    let last_dot = digits_and_seps.rfind('.');
    let last_comma = digits_and_seps.rfind(',');

    let decimal_sep = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(position), None) => separator_if_decimal(&digits_and_seps, position, '.'),
        (None, Some(position)) => separator_if_decimal(&digits_and_seps, position, ','),
        (None, None) => None,
    };

    let mut normalized = String::with_capacity(digits_and_seps.len());
    for (index, c) in digits_and_seps.char_indices() {
        match c {
            '.' | ',' => {
                if Some(c) == decimal_sep && Some(index) == digits_and_seps.rfind(c) {
                    normalized.push('.');
                }
                // other separators are grouping, dropped
            }
            digit => normalized.push(digit),
        }
    }

    let value: f64 = normalized
        .parse()
        .map_err(|_| ParseError(format!("unparseable amount {:?}", raw)))?;
    Ok(if negative { -value } else { value })
}

/// A separator is decimal unless it is followed by exactly three digits with
/// at least one digit before it (the `1.234` grouping shape)
fn separator_if_decimal(text: &str, position: usize, sep: char) -> Option<char> {
    let after = &text[position + 1..];
    let grouping = after.len() == 3
        && after.chars().all(|c| c.is_ascii_digit())
        && text[..position].chars().any(|c| c.is_ascii_digit());
    if grouping { None } else { Some(sep) }
}

/// Parse a quantity from display text: `"x2"`, `"2"`, `"2 un"`, `"Qtd: 2"`
pub fn parse_quantity(raw: &str) -> Result<u32, ParseError> {
    first_number(raw).ok_or_else(|| ParseError(format!("no quantity in {:?}", raw)))
}

/// Parse an item count from a banner like `"38 Produtos"` or `"38 items"`
pub fn parse_count(raw: &str) -> Result<u32, ParseError> {
    first_number(raw).ok_or_else(|| ParseError(format!("no count in {:?}", raw)))
}

fn first_number(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Classify an availability marker. Unrecognized text maps to `Unknown`
/// rather than failing; absence of any marker is the caller's signal for
/// `Available`.
pub fn parse_availability(raw: &str) -> Availability {
    let lowered = raw.to_lowercase();

    const OUT_OF_STOCK: &[&str] = &[
        "indisponível",
        "indisponivel",
        "esgotado",
        "sem estoque",
        "out of stock",
        "unavailable",
        "sold out",
    ];
    const AVAILABLE: &[&str] = &["disponível", "disponivel", "em estoque", "in stock", "available"];

    if OUT_OF_STOCK.iter().any(|marker| lowered.contains(marker)) {
        return Availability::OutOfStock;
    }
    if AVAILABLE.iter().any(|marker| lowered.contains(marker)) {
        return Availability::Available;
    }
    Availability::Unknown
}
