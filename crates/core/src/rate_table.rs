//! In-memory table of shipping methods and their per-country prices.
//!
//! The table enforces the integrity rules the resolver relies on:
//!
//! - every price record belongs to a known method
//! - at most one record per (method, country scope), so at most one
//!   "Rest of World" record per method
//! - all prices share the table's currency and are not negative
//!
//! Removing a method removes its price records with it.
//!
//! ## Document Format
//!
//! Tables can be loaded from a [`RateTableDocument`], e.g. in YAML:
//!
//! ```yaml
//! methods:
//!   - id: 1
//!     name: Standard
//!     description: 3-5 business days
//!     prices:
//!       - country: DE
//!         price: "10.00"
//!       - country: ""      # Rest of World
//!         price: "5.00"
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{MethodError, ShippingMethod, ShippingMethodCountry};
use crate::resolver::{RateResolver, ResolvedRates};
use crate::types::{
    CountryScope, CurrencyCode, Price, PriceRange, ShippingMethodCountryId, ShippingMethodId,
};

/// Errors raised when a change would break the table's invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RateTableError {
    /// A method with this ID already exists.
    #[error("shipping method {0} already exists")]
    DuplicateMethod(ShippingMethodId),
    /// No method with this ID exists.
    #[error("unknown shipping method {0}")]
    UnknownMethod(ShippingMethodId),
    /// No price record with this ID exists.
    #[error("unknown shipping price record {0}")]
    UnknownRate(ShippingMethodCountryId),
    /// The method already has a price for this country scope.
    #[error("shipping method {method_id} already has a price for {country}")]
    DuplicateCountry {
        /// Owning method.
        method_id: ShippingMethodId,
        /// Conflicting scope.
        country: CountryScope,
    },
    /// The price is in another currency than the table.
    #[error("price currency {found} does not match table currency {expected}")]
    CurrencyMismatch {
        /// Table currency.
        expected: CurrencyCode,
        /// Currency of the rejected price.
        found: CurrencyCode,
    },
    /// No record IDs are left to assign.
    #[error("no shipping price record IDs left")]
    RateIdsExhausted,
    /// The price is below zero.
    #[error("shipping price cannot be negative: {0}")]
    NegativePrice(Decimal),
    /// The method itself is invalid.
    #[error("invalid shipping method {method_id}: {source}")]
    InvalidMethod {
        /// Offending method.
        method_id: ShippingMethodId,
        /// Validation failure.
        #[source]
        source: MethodError,
    },
}

/// Shipping methods and their prices, all in one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRateTable {
    currency: CurrencyCode,
    methods: BTreeMap<ShippingMethodId, ShippingMethod>,
    records: Vec<ShippingMethodCountry>,
    next_rate_id: i32,
}

impl CountryRateTable {
    /// Create an empty table priced in `currency`.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            methods: BTreeMap::new(),
            records: Vec::new(),
            next_rate_id: 1,
        }
    }

    /// Currency of every price in the table.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Add a shipping method.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is invalid or its ID is taken.
    pub fn add_method(&mut self, method: ShippingMethod) -> Result<(), RateTableError> {
        method
            .validate()
            .map_err(|source| RateTableError::InvalidMethod {
                method_id: method.id,
                source,
            })?;

        if self.methods.contains_key(&method.id) {
            return Err(RateTableError::DuplicateMethod(method.id));
        }

        debug!(method_id = %method.id, name = %method.name, "Added shipping method");
        self.methods.insert(method.id, method);
        Ok(())
    }

    /// Remove a shipping method together with all of its prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the method does not exist.
    pub fn remove_method(
        &mut self,
        method_id: ShippingMethodId,
    ) -> Result<ShippingMethod, RateTableError> {
        let method = self
            .methods
            .remove(&method_id)
            .ok_or(RateTableError::UnknownMethod(method_id))?;

        let before = self.records.len();
        self.records.retain(|r| r.shipping_method_id != method_id);

        info!(
            method_id = %method_id,
            removed_prices = before - self.records.len(),
            "Removed shipping method"
        );
        Ok(method)
    }

    /// Add a price for `method_id` in `country`, returning the new record ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is unknown, already has a price for
    /// this scope, the price is negative or in a foreign currency, or no
    /// record IDs are left.
    pub fn add_rate(
        &mut self,
        method_id: ShippingMethodId,
        country: CountryScope,
        price: Price,
    ) -> Result<ShippingMethodCountryId, RateTableError> {
        if !self.methods.contains_key(&method_id) {
            return Err(RateTableError::UnknownMethod(method_id));
        }
        self.check_price(price)?;

        if self
            .records
            .iter()
            .any(|r| r.shipping_method_id == method_id && r.country == country)
        {
            return Err(RateTableError::DuplicateCountry { method_id, country });
        }

        let id = ShippingMethodCountryId::new(self.next_rate_id);
        self.next_rate_id = self
            .next_rate_id
            .checked_add(1)
            .ok_or(RateTableError::RateIdsExhausted)?;

        debug!(method_id = %method_id, record_id = %id, country = %country, "Added shipping price");
        self.records.push(ShippingMethodCountry {
            id,
            shipping_method_id: method_id,
            country,
            price,
        });
        Ok(id)
    }

    /// Replace the price of an existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is unknown or the price is invalid.
    pub fn update_price(
        &mut self,
        rate_id: ShippingMethodCountryId,
        price: Price,
    ) -> Result<(), RateTableError> {
        self.check_price(price)?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == rate_id)
            .ok_or(RateTableError::UnknownRate(rate_id))?;
        record.price = price;
        Ok(())
    }

    /// Remove a single price record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is unknown.
    pub fn remove_rate(
        &mut self,
        rate_id: ShippingMethodCountryId,
    ) -> Result<ShippingMethodCountry, RateTableError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == rate_id)
            .ok_or(RateTableError::UnknownRate(rate_id))?;
        Ok(self.records.remove(index))
    }

    /// Look up a method by ID.
    #[must_use]
    pub fn method(&self, method_id: ShippingMethodId) -> Option<&ShippingMethod> {
        self.methods.get(&method_id)
    }

    /// All methods in ID order.
    pub fn methods(&self) -> impl Iterator<Item = &ShippingMethod> {
        self.methods.values()
    }

    /// All price records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ShippingMethodCountry] {
        &self.records
    }

    /// Price records belonging to one method, in insertion order.
    pub fn rates_for_method(
        &self,
        method_id: ShippingMethodId,
    ) -> impl Iterator<Item = &ShippingMethodCountry> {
        self.records
            .iter()
            .filter(move |r| r.shipping_method_id == method_id)
    }

    /// The best matching record for `country` under `method_id`: the
    /// country's own record if there is one, otherwise the wildcard.
    #[must_use]
    pub fn lookup(
        &self,
        method_id: ShippingMethodId,
        country: &CountryScope,
    ) -> Option<&ShippingMethodCountry> {
        RateResolver::new()
            .resolve(self.rates_for_method(method_id), country)
            .get(method_id)
    }

    /// Resolve every method for `country`.
    #[must_use]
    pub fn resolve(&self, country: &CountryScope) -> ResolvedRates<'_> {
        RateResolver::new().resolve(&self.records, country)
    }

    /// Display names of the scopes a method has prices for.
    #[must_use]
    pub fn countries(&self, method_id: ShippingMethodId) -> Vec<String> {
        self.rates_for_method(method_id)
            .map(|r| r.country.to_string())
            .collect()
    }

    /// Cheapest and most expensive price of a method, or `None` if it has
    /// no prices.
    #[must_use]
    pub fn price_range(&self, method_id: ShippingMethodId) -> Option<PriceRange> {
        PriceRange::from_prices(self.rates_for_method(method_id).map(|r| r.price))
    }

    fn check_price(&self, price: Price) -> Result<(), RateTableError> {
        if price.currency_code != self.currency {
            return Err(RateTableError::CurrencyMismatch {
                expected: self.currency,
                found: price.currency_code,
            });
        }
        if price.is_negative() {
            return Err(RateTableError::NegativePrice(price.amount));
        }
        Ok(())
    }
}

/// Serializable description of a rate table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTableDocument {
    /// Methods with their prices.
    #[serde(default)]
    pub methods: Vec<MethodDocument>,
}

/// A method and its prices within a [`RateTableDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDocument {
    /// Method ID.
    pub id: ShippingMethodId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Prices by destination.
    #[serde(default)]
    pub prices: Vec<PriceDocument>,
}

/// One price within a [`MethodDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDocument {
    /// Destination; `""` or `"*"` for the rest of the world.
    #[serde(default = "any_country")]
    pub country: CountryScope,
    /// Amount in the table currency.
    pub price: Decimal,
}

const fn any_country() -> CountryScope {
    CountryScope::Any
}

impl RateTableDocument {
    /// Build a validated table priced in `currency`.
    ///
    /// Record IDs are assigned in document order, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn into_table(self, currency: CurrencyCode) -> Result<CountryRateTable, RateTableError> {
        let mut table = CountryRateTable::new(currency);

        for method in self.methods {
            let id = method.id;
            table.add_method(ShippingMethod {
                id,
                name: method.name,
                description: method.description,
            })?;

            for price in method.prices {
                table.add_rate(id, price.country, Price::new(price.price, currency))?;
            }
        }

        info!(
            methods = table.methods.len(),
            prices = table.records.len(),
            currency = %currency,
            "Loaded rate table"
        );
        Ok(table)
    }
}

impl From<&CountryRateTable> for RateTableDocument {
    fn from(table: &CountryRateTable) -> Self {
        Self {
            methods: table
                .methods()
                .map(|method| MethodDocument {
                    id: method.id,
                    name: method.name.clone(),
                    description: method.description.clone(),
                    prices: table
                        .rates_for_method(method.id)
                        .map(|r| PriceDocument {
                            country: r.country,
                            price: r.price.amount,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
