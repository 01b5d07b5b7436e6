//! # Settings Store
//!
//! Shop configuration: name, currency, tax rate, receipt footer and the
//! receipt printer.
//!
//! ## Update Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  current:  { shop: "Driwich", currency: "USD", printer: {A, 9100, off} }│
//! │  patch:    { printer: {B, 9101, on} }                                   │
//! │                                                                         │
//! │  result:   { shop: "Driwich", currency: "USD", printer: {B, 9101, on} } │
//! │                                                                         │
//! │  Top-level fields left out of the patch are kept. A nested printer     │
//! │  block is replaced wholesale, never merged field by field.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::types::TaxRate;
use crate::validation::{self, ValidationResult};

/// Raw TCP port most receipt printers listen on.
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

// =============================================================================
// Settings Types
// =============================================================================

/// Network receipt printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrinterSettings {
    pub ip_address: String,
    /// 1-65535.
    pub port: u16,
    pub is_enabled: bool,
}

impl Default for PrinterSettings {
    /// Disabled, pointed at `192.168.1.1:9100`.
    fn default() -> Self {
        PrinterSettings {
            ip_address: "192.168.1.1".to_string(),
            port: DEFAULT_PRINTER_PORT,
            is_enabled: false,
        }
    }
}

impl PrinterSettings {
    pub fn enabled(ip_address: impl Into<String>, port: u16) -> Self {
        PrinterSettings {
            ip_address: ip_address.into(),
            port,
            is_enabled: true,
        }
    }

    /// `ip:port`, as handed to the transport.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }
}

/// Process-wide shop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub printer: PrinterSettings,
    pub shop_name: String,
    pub receipt_footer: Option<String>,
    /// ISO 4217 code.
    pub currency: String,
    pub tax_rate: TaxRate,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            printer: PrinterSettings::default(),
            shop_name: "Driwich".to_string(),
            receipt_footer: Some("Thank you for your order!".to_string()),
            currency: "USD".to_string(),
            tax_rate: TaxRate::zero(),
        }
    }
}

// =============================================================================
// Settings Patch
// =============================================================================

/// A partial update. `None` means "leave as is".
///
/// `receipt_footer` is doubly optional so a patch can clear the footer:
/// `Some(None)` removes it, `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer: Option<PrinterSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub receipt_footer: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<TaxRate>,
}

/// A present key, even `null`, becomes `Some(..)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SettingsPatch {
    pub fn printer(mut self, printer: PrinterSettings) -> Self {
        self.printer = Some(printer);
        self
    }

    pub fn shop_name(mut self, name: impl Into<String>) -> Self {
        self.shop_name = Some(name.into());
        self
    }

    pub fn receipt_footer(mut self, footer: Option<String>) -> Self {
        self.receipt_footer = Some(footer);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &SettingsPatch::default()
    }

    /// Checks the fields the patch carries.
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(printer) = &self.printer {
            validation::validate_printer_settings(printer)?;
        }
        if let Some(name) = &self.shop_name {
            validation::validate_shop_name(name)?;
        }
        if let Some(currency) = &self.currency {
            validation::validate_currency(currency)?;
        }
        Ok(())
    }
}

// =============================================================================
// Settings Store
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStore {
    settings: AppSettings,
}

impl SettingsStore {
    /// Starts from [`AppSettings::default`].
    pub fn new() -> Self {
        SettingsStore::default()
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        SettingsStore { settings }
    }

    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    /// Shallow-merges `patch` into the current settings.
    pub fn update(&mut self, patch: SettingsPatch) -> &AppSettings {
        let SettingsPatch {
            printer,
            shop_name,
            receipt_footer,
            currency,
            tax_rate,
        } = patch;

        if let Some(printer) = printer {
            info!(
                address = %printer.address(),
                enabled = printer.is_enabled,
                "printer settings replaced"
            );
            self.settings.printer = printer;
        }
        if let Some(shop_name) = shop_name {
            self.settings.shop_name = shop_name;
        }
        if let Some(receipt_footer) = receipt_footer {
            self.settings.receipt_footer = receipt_footer;
        }
        if let Some(currency) = currency {
            self.settings.currency = currency;
        }
        if let Some(tax_rate) = tax_rate {
            self.settings.tax_rate = tax_rate;
        }

        debug!(settings = ?self.settings, "settings updated");
        &self.settings
    }

    /// Like [`SettingsStore::update`], but refuses an invalid patch and
    /// leaves the settings untouched.
    pub fn try_update(&mut self, patch: SettingsPatch) -> ValidationResult<&AppSettings> {
        patch.validate()?;
        Ok(self.update(patch))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_defaults() {
        let store = SettingsStore::new();
        let settings = store.get();

        assert_eq!(settings.shop_name, "Driwich");
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.receipt_footer.as_deref(), Some("Thank you for your order!"));
        assert!(settings.tax_rate.is_zero());
        assert!(!settings.printer.is_enabled);
        assert_eq!(settings.printer.port, 9100);
    }

    #[test]
    fn test_update_keeps_omitted_fields() {
        let mut store = SettingsStore::new();
        store.update(SettingsPatch::default().shop_name("Falafel Corner"));

        let settings = store.get();
        assert_eq!(settings.shop_name, "Falafel Corner");
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.printer, PrinterSettings::default());
    }

    #[test]
    fn test_update_replaces_printer_wholesale() {
        let mut store = SettingsStore::new();
        let printer = PrinterSettings::enabled("10.0.0.42", 9101);
        store.update(SettingsPatch::default().printer(printer.clone()));

        assert_eq!(store.get().printer, printer);
        assert_eq!(store.get().shop_name, "Driwich");
    }

    #[test]
    fn test_update_can_clear_footer() {
        let mut store = SettingsStore::new();
        store.update(SettingsPatch::default().receipt_footer(None));
        assert_eq!(store.get().receipt_footer, None);

        store.update(SettingsPatch::default().tax_rate(TaxRate::from_bps(500)));
        assert_eq!(store.get().receipt_footer, None);
        assert_eq!(store.get().tax_rate.bps(), 500);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut store = SettingsStore::new();
        let before = store.get().clone();
        assert!(SettingsPatch::default().is_empty());
        store.update(SettingsPatch::default());
        assert_eq!(store.get(), &before);
    }

    #[test]
    fn test_try_update_rejects_invalid_patch() {
        let mut store = SettingsStore::new();
        let before = store.get().clone();

        let bad_port = SettingsPatch::default()
            .shop_name("New Name")
            .printer(PrinterSettings::enabled("10.0.0.42", 0));
        assert!(matches!(
            store.try_update(bad_port),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(store.get(), &before);

        assert!(store.try_update(SettingsPatch::default().shop_name("  ")).is_err());
        assert!(store.try_update(SettingsPatch::default().currency("dollars")).is_err());

        let ok = store.try_update(SettingsPatch::default().currency("EUR")).unwrap();
        assert_eq!(ok.currency, "EUR");
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"shopName":"Kebab Hut","receiptFooter":null}"#).unwrap();
        assert_eq!(patch.shop_name.as_deref(), Some("Kebab Hut"));
        assert_eq!(patch.receipt_footer, Some(None));
        assert_eq!(patch.printer, None);

        let patch: SettingsPatch = serde_json::from_str(
            r#"{"printer":{"ipAddress":"10.1.1.5","port":9100,"isEnabled":true}}"#,
        )
        .unwrap();
        assert_eq!(patch.printer, Some(PrinterSettings::enabled("10.1.1.5", 9100)));
        assert_eq!(patch.receipt_footer, None);
    }
}
