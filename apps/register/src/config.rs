//! # Start-up Configuration
//!
//! Environment overrides applied on top of `AppSettings::default()`.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`DRIWICH_*`)
//! 2. Defaults (`driwich_core::AppSettings::default`)
//!
//! | Variable                   | Effect                                    |
//! |----------------------------|-------------------------------------------|
//! | `DRIWICH_SHOP_NAME`        | shop name on receipts                     |
//! | `DRIWICH_CURRENCY`         | ISO code, e.g. `EUR`                      |
//! | `DRIWICH_TAX_RATE`         | percent, e.g. `8.25`                      |
//! | `DRIWICH_RECEIPT_FOOTER`   | footer text; empty clears it              |
//! | `DRIWICH_PRINTER_ADDR`     | `ip:port` (or bare ip); enables printing  |
//! | `DRIWICH_PRINTER_SIMULATE` | `1`/`true` logs receipts instead          |
//!
//! Values that fail validation are logged and skipped; the register still
//! starts.

use std::net::{IpAddr, SocketAddr};

use driwich_core::settings::DEFAULT_PRINTER_PORT;
use driwich_core::validation::{validate_currency, validate_shop_name, validate_tax_rate};
use driwich_core::{PrinterSettings, SettingsPatch, ValidationError};
use tracing::warn;

pub const ENV_SHOP_NAME: &str = "DRIWICH_SHOP_NAME";
pub const ENV_CURRENCY: &str = "DRIWICH_CURRENCY";
pub const ENV_TAX_RATE: &str = "DRIWICH_TAX_RATE";
pub const ENV_RECEIPT_FOOTER: &str = "DRIWICH_RECEIPT_FOOTER";
pub const ENV_PRINTER_ADDR: &str = "DRIWICH_PRINTER_ADDR";
pub const ENV_PRINTER_SIMULATE: &str = "DRIWICH_PRINTER_SIMULATE";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterConfig {
    /// Overrides to apply to the default settings.
    pub settings: SettingsPatch,
    /// Use the logging printer instead of the network one.
    pub simulate_printer: bool,
}

impl RegisterConfig {
    pub fn from_env() -> Self {
        RegisterConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = RegisterConfig::default();

        if let Some(name) = lookup(ENV_SHOP_NAME) {
            match validate_shop_name(&name) {
                Ok(()) => config.settings.shop_name = Some(name.trim().to_string()),
                Err(e) => warn!(var = ENV_SHOP_NAME, error = %e, "ignoring override"),
            }
        }

        if let Some(currency) = lookup(ENV_CURRENCY) {
            match validate_currency(&currency) {
                Ok(()) => config.settings.currency = Some(currency.trim().to_uppercase()),
                Err(e) => warn!(var = ENV_CURRENCY, error = %e, "ignoring override"),
            }
        }

        if let Some(rate) = lookup(ENV_TAX_RATE) {
            match validate_tax_rate(&rate) {
                Ok(rate) => config.settings.tax_rate = Some(rate),
                Err(e) => warn!(var = ENV_TAX_RATE, error = %e, "ignoring override"),
            }
        }

        if let Some(footer) = lookup(ENV_RECEIPT_FOOTER) {
            let footer = footer.trim();
            config.settings.receipt_footer = Some((!footer.is_empty()).then(|| footer.to_string()));
        }

        if let Some(addr) = lookup(ENV_PRINTER_ADDR) {
            match parse_printer_addr(&addr) {
                Ok(printer) => config.settings.printer = Some(printer),
                Err(e) => warn!(var = ENV_PRINTER_ADDR, error = %e, "ignoring override"),
            }
        }

        if let Some(flag) = lookup(ENV_PRINTER_SIMULATE) {
            config.simulate_printer = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }
}

/// Parses `ip:port`, `[v6]:port` or a bare ip (port 9100) into enabled
/// printer settings.
pub fn parse_printer_addr(input: &str) -> Result<PrinterSettings, ValidationError> {
    let input = input.trim();

    if let Ok(addr) = input.parse::<SocketAddr>() {
        if addr.port() == 0 {
            return Err(ValidationError::OutOfRange {
                field: "port".to_string(),
                min: 1,
                max: u16::MAX as i64,
            });
        }
        return Ok(PrinterSettings::enabled(addr.ip().to_string(), addr.port()));
    }

    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(PrinterSettings::enabled(ip.to_string(), DEFAULT_PRINTER_PORT));
    }

    Err(ValidationError::InvalidFormat {
        field: "printer address".to_string(),
        reason: "expected ip:port, e.g. 192.168.1.50:9100".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RegisterConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RegisterConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_no_vars_means_no_overrides() {
        let config = config(&[]);
        assert!(config.settings.is_empty());
        assert!(!config.simulate_printer);
    }

    #[test]
    fn test_overrides_are_collected() {
        let config = config(&[
            (ENV_SHOP_NAME, "Kebab Hut"),
            (ENV_CURRENCY, "eur"),
            (ENV_TAX_RATE, "8.25"),
            (ENV_PRINTER_ADDR, "10.0.0.7:9101"),
            (ENV_PRINTER_SIMULATE, "true"),
        ]);

        assert_eq!(config.settings.shop_name.as_deref(), Some("Kebab Hut"));
        assert_eq!(config.settings.currency.as_deref(), Some("EUR"));
        assert_eq!(config.settings.tax_rate.map(|r| r.bps()), Some(825));
        assert_eq!(
            config.settings.printer,
            Some(PrinterSettings::enabled("10.0.0.7", 9101))
        );
        assert!(config.simulate_printer);
    }

    #[test]
    fn test_invalid_values_are_skipped() {
        let config = config(&[
            (ENV_CURRENCY, "dollars"),
            (ENV_TAX_RATE, "-3"),
            (ENV_PRINTER_ADDR, "printer.local"),
        ]);
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_empty_footer_clears() {
        let config = config(&[(ENV_RECEIPT_FOOTER, "  ")]);
        assert_eq!(config.settings.receipt_footer, Some(None));
    }

    #[test]
    fn test_parse_printer_addr() {
        assert_eq!(
            parse_printer_addr("192.168.1.50").unwrap(),
            PrinterSettings::enabled("192.168.1.50", 9100)
        );
        assert_eq!(
            parse_printer_addr("[::1]:9200").unwrap(),
            PrinterSettings::enabled("::1", 9200)
        );
        assert!(parse_printer_addr("10.0.0.1:0").is_err());
        assert!(parse_printer_addr("10.0.0.1:99999").is_err());
    }
}
