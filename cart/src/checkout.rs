//! Checkout form validation and order snapshot.

use crate::error::CartError;
use crate::summary::CartDisplay;
use crate::types::CartItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_auth::utils::is_valid_email;

/// Billing details entered on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutDetails {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Company, optional.
    #[serde(default)]
    pub company: Option<String>,
    /// Country.
    pub country: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Mobile number.
    pub mobile: String,
    /// Email, optional.
    #[serde(default)]
    pub email: Option<String>,
    /// Order notes, optional.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutDetails {
    /// Check required fields and the email format.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] listing every offending field.
    pub fn validate(&self) -> Result<(), CartError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("country", &self.country),
            ("mobile", &self.mobile),
        ];

        let mut invalid: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| (*field).to_string())
            .collect();

        let email = self.email.as_deref().map_or("", str::trim);
        if !email.is_empty() && !is_valid_email(email) {
            invalid.push("email".to_string());
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(CartError::Validation(invalid))
        }
    }
}

/// Confirmed cart plus billing details, handed to the order submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    /// Billing details.
    pub details: CheckoutDetails,
    /// Lines at submission time.
    pub items: Vec<CartItem>,
    /// Totals at submission time.
    pub totals: CartDisplay,
    /// When the order was submitted.
    pub submitted_at: DateTime<Utc>,
}
