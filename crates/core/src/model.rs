//! Shipping method domain models.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CountryScope, Price, ShippingMethodCountryId, ShippingMethodId};

/// Errors that can occur when building a [`ShippingMethod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodError {
    /// The name is empty or whitespace.
    #[error("shipping method name cannot be empty")]
    EmptyName,
    /// The name is too long.
    #[error("shipping method name must be at most {max} characters")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A way of shipping an order, e.g. "Standard" or "Express".
///
/// Prices live in [`ShippingMethodCountry`] records owned by the method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    /// Unique method ID.
    pub id: ShippingMethodId,
    /// Display name.
    pub name: String,
    /// Free-text description (may be empty).
    #[serde(default)]
    pub description: String,
}

impl ShippingMethod {
    /// Maximum length of a method name.
    pub const MAX_NAME_LENGTH: usize = 100;

    /// Create a method with an empty description.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or longer than
    /// [`Self::MAX_NAME_LENGTH`] characters.
    pub fn new(id: ShippingMethodId, name: impl Into<String>) -> Result<Self, MethodError> {
        let method = Self {
            id,
            name: name.into(),
            description: String::new(),
        };
        method.validate()?;
        Ok(method)
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the name constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or too long.
    pub fn validate(&self) -> Result<(), MethodError> {
        if self.name.trim().is_empty() {
            return Err(MethodError::EmptyName);
        }
        if self.name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(MethodError::NameTooLong {
                max: Self::MAX_NAME_LENGTH,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The price of a shipping method for one country, or for the rest of the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethodCountry {
    /// Unique record ID.
    pub id: ShippingMethodCountryId,
    /// Method this price belongs to.
    pub shipping_method_id: ShippingMethodId,
    /// Destination the price applies to.
    pub country: CountryScope,
    /// Flat shipping price.
    pub price: Price,
}

impl ShippingMethodCountry {
    /// Label combining the method name and the destination, e.g.
    /// `"Standard DE"` or `"Standard Rest of World"`.
    #[must_use]
    pub fn label(&self, method: &ShippingMethod) -> String {
        format!("{} {}", method.name, self.country)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CountryCode, CurrencyCode};

    #[test]
    fn test_new_method() {
        let method = ShippingMethod::new(ShippingMethodId::new(1), "Standard")
            .unwrap()
            .with_description("3-5 business days");
        assert_eq!(method.to_string(), "Standard");
        assert_eq!(method.description, "3-5 business days");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            ShippingMethod::new(ShippingMethodId::new(1), "  "),
            Err(MethodError::EmptyName)
        );
    }

    #[test]
    fn test_long_name_rejected() {
        let name = "x".repeat(ShippingMethod::MAX_NAME_LENGTH + 1);
        assert!(matches!(
            ShippingMethod::new(ShippingMethodId::new(1), name),
            Err(MethodError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_description_defaults_to_empty() {
        let method: ShippingMethod = serde_json::from_str(r#"{"id": 2, "name": "Express"}"#).unwrap();
        assert!(method.description.is_empty());
    }

    #[test]
    fn test_record_label() {
        let method = ShippingMethod::new(ShippingMethodId::new(1), "Standard").unwrap();
        let mut record = ShippingMethodCountry {
            id: ShippingMethodCountryId::new(1),
            shipping_method_id: method.id,
            country: CountryScope::Country(CountryCode::parse("DE").unwrap()),
            price: Price::from_cents(1000, CurrencyCode::EUR),
        };
        assert_eq!(record.label(&method), "Standard DE");

        record.country = CountryScope::Any;
        assert_eq!(record.label(&method), "Standard Rest of World");
    }
}
