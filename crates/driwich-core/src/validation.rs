//! # Validation Module
//!
//! Field checks shared by every front end that feeds the stores.
//!
//! ```text
//! operator input ──► validate_* (this module) ──► typed value ──► store
//!                          │
//!                          └── ValidationError, nothing stored
//! ```
//!
//! The stores themselves only keep structural rules (one line per product,
//! quantity of at least one, no empty orders). Anything about what a
//! human typed is checked here.
//!
//! ## Usage
//! ```rust
//! use driwich_core::validation::{validate_price, validate_quantity};
//!
//! let price = validate_price("4.99").unwrap();
//! assert_eq!(price.cents(), 499);
//! assert!(validate_quantity(0).is_err());
//! ```

use std::net::IpAddr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::settings::PrinterSettings;
use crate::types::{NewProduct, TaxRate};
use crate::MAX_ITEM_QUANTITY;

pub type ValidationResult<T> = Result<T, ValidationError>;

fn out_of_range(field: &str, min: i64, max: i64) -> ValidationError {
    ValidationError::OutOfRange { field: field.into(), min, max }
}

fn malformed(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat { field: field.into(), reason: reason.into() }
}

/// Non-blank and at most `max` characters once trimmed.
fn text_field(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Required { field: field.into() })
    } else if value.chars().count() > max {
        Err(ValidationError::TooLong { field: field.into(), max })
    } else {
        Ok(())
    }
}

// =============================================================================
// Product Validators
// =============================================================================

/// Product names are required and at most 100 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    text_field("name", name, 100)
}

/// Categories are required and at most 50 characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    text_field("category", category, 50)
}

/// Parses a price typed by the operator.
///
/// ```rust
/// use driwich_core::validation::validate_price;
///
/// assert_eq!(validate_price("12").unwrap().cents(), 1200);
/// assert!(validate_price("").is_err());
/// assert!(validate_price("free").is_err());
/// ```
pub fn validate_price(input: &str) -> ValidationResult<Money> {
    Money::parse(input)
}

/// Checks a whole product form.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    if product.price.is_negative() {
        return Err(out_of_range("price", 0, i64::MAX));
    }
    Ok(())
}

impl NewProduct {
    /// Shorthand for [`validate_new_product`].
    pub fn validate(&self) -> ValidationResult<()> {
        validate_new_product(self)
    }
}

// =============================================================================
// Cart Validators
// =============================================================================

/// A cart quantity: `1..=MAX_ITEM_QUANTITY`.
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    let max = i64::from(MAX_ITEM_QUANTITY);
    match qty {
        i64::MIN..=0 => Err(ValidationError::MustBePositive { field: "quantity".into() }),
        q if q > max => Err(out_of_range("quantity", 1, max)),
        q => Ok(q as u32),
    }
}

// =============================================================================
// Settings Validators
// =============================================================================

pub fn validate_shop_name(name: &str) -> ValidationResult<()> {
    text_field("shop name", name, 32)
}

/// Three ASCII letters, e.g. `USD`.
pub fn validate_currency(code: &str) -> ValidationResult<()> {
    text_field("currency", code, 3)?;
    let code = code.trim();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(malformed("currency", "must be a 3-letter code such as USD"))
    }
}

/// Parses a tax rate given as a percentage, e.g. `"8.25"`.
pub fn validate_tax_rate(input: &str) -> ValidationResult<TaxRate> {
    let pct: f64 = input
        .trim()
        .parse()
        .map_err(|_| malformed("tax rate", "must be a number"))?;

    // NaN fails the range check as well
    if (0.0..=100.0).contains(&pct) {
        Ok(TaxRate::from_percentage(pct))
    } else {
        Err(out_of_range("tax rate", 0, 100))
    }
}

pub fn validate_ip_address(ip: &str) -> ValidationResult<IpAddr> {
    text_field("ip address", ip, 45)?;
    ip.trim()
        .parse()
        .map_err(|_| malformed("ip address", "must be an IPv4 or IPv6 address"))
}

/// Ports are 1-65535.
pub fn validate_port(port: i64) -> ValidationResult<u16> {
    match u16::try_from(port) {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(out_of_range("port", 1, i64::from(u16::MAX))),
    }
}

pub fn validate_printer_settings(printer: &PrinterSettings) -> ValidationResult<()> {
    validate_port(i64::from(printer.port))?;
    validate_ip_address(&printer.ip_address)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
