//! Per-destination rate resolution.
//!
//! A method may carry a price for a specific country and a "Rest of World"
//! price at the same time. For a given destination the resolver keeps exactly
//! one of them per method: the country-specific record wins over the wildcard,
//! and methods with neither are left out (shipping not offered there).

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::model::ShippingMethodCountry;
use crate::types::{CountryScope, ShippingMethodId};

/// Selects one applicable price record per shipping method.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateResolver;

/// Candidates for a single method.
#[derive(Debug, Default)]
struct MethodCandidates<'a> {
    specific: Option<&'a ShippingMethodCountry>,
    wildcard: Option<&'a ShippingMethodCountry>,
}

impl<'a> MethodCandidates<'a> {
    fn offer(&mut self, record: &'a ShippingMethodCountry) {
        let slot = if record.country.is_any() {
            &mut self.wildcard
        } else {
            &mut self.specific
        };

        if let Some(existing) = *slot {
            warn!(
                method_id = %record.shipping_method_id,
                kept = %existing.id,
                ignored = %record.id,
                country = %record.country,
                "Duplicate shipping price for method and country"
            );
        } else {
            *slot = Some(record);
        }
    }

    fn select(self) -> Option<&'a ShippingMethodCountry> {
        self.specific.or(self.wildcard)
    }
}

impl RateResolver {
    /// Create a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve `records` for the `target` destination.
    ///
    /// Records whose scope is neither `target` nor the wildcard are ignored.
    /// The result holds at most one record per method, ordered by method ID.
    ///
    /// # Example
    ///
    /// ```
    /// use shiprate_core::{
    ///     CountryScope, CurrencyCode, Price, RateResolver, ShippingMethodCountry,
    ///     ShippingMethodCountryId, ShippingMethodId,
    /// };
    ///
    /// let method = ShippingMethodId::new(1);
    /// let records = vec![
    ///     ShippingMethodCountry {
    ///         id: ShippingMethodCountryId::new(1),
    ///         shipping_method_id: method,
    ///         country: "DE".parse().unwrap(),
    ///         price: Price::from_cents(1000, CurrencyCode::EUR),
    ///     },
    ///     ShippingMethodCountry {
    ///         id: ShippingMethodCountryId::new(2),
    ///         shipping_method_id: method,
    ///         country: CountryScope::Any,
    ///         price: Price::from_cents(500, CurrencyCode::EUR),
    ///     },
    /// ];
    ///
    /// let resolver = RateResolver::new();
    /// let de = resolver.resolve(&records, &"DE".parse().unwrap());
    /// assert_eq!(de.get(method).unwrap().price, Price::from_cents(1000, CurrencyCode::EUR));
    ///
    /// let fr = resolver.resolve(&records, &"FR".parse().unwrap());
    /// assert_eq!(fr.get(method).unwrap().price, Price::from_cents(500, CurrencyCode::EUR));
    /// ```
    #[instrument(skip_all, fields(destination = %target))]
    pub fn resolve<'a, I>(&self, records: I, target: &CountryScope) -> ResolvedRates<'a>
    where
        I: IntoIterator<Item = &'a ShippingMethodCountry>,
    {
        let mut candidates: BTreeMap<ShippingMethodId, MethodCandidates<'a>> = BTreeMap::new();

        for record in records {
            if record.country.covers(target) {
                candidates
                    .entry(record.shipping_method_id)
                    .or_default()
                    .offer(record);
            }
        }

        let rates: BTreeMap<_, _> = candidates
            .into_iter()
            .filter_map(|(method_id, slot)| {
                let chosen = slot.select()?;
                debug!(
                    method_id = %method_id,
                    record_id = %chosen.id,
                    country = %chosen.country,
                    "Resolved shipping price"
                );
                Some((method_id, chosen))
            })
            .collect();

        debug!(methods = rates.len(), "Resolution complete");
        ResolvedRates { rates }
    }
}

/// Result of a resolution: at most one record per shipping method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRates<'a> {
    rates: BTreeMap<ShippingMethodId, &'a ShippingMethodCountry>,
}

impl<'a> ResolvedRates<'a> {
    /// The record chosen for `method_id`, or `None` if the method does not
    /// ship to the destination.
    #[must_use]
    pub fn get(&self, method_id: ShippingMethodId) -> Option<&'a ShippingMethodCountry> {
        self.rates.get(&method_id).copied()
    }

    /// Number of methods with a price.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no method ships to the destination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Chosen records in method ID order.
    pub fn iter(&self) -> impl Iterator<Item = &'a ShippingMethodCountry> + '_ {
        self.rates.values().copied()
    }

    /// Methods with a price, in ID order.
    pub fn method_ids(&self) -> impl Iterator<Item = ShippingMethodId> + '_ {
        self.rates.keys().copied()
    }

    /// Keep only the methods in `candidates`.
    #[must_use]
    pub fn retain_methods(mut self, candidates: &[ShippingMethodId]) -> Self {
        self.rates.retain(|id, _| candidates.contains(id));
        self
    }

    /// Consume the result, returning the chosen records in method ID order.
    #[must_use]
    pub fn into_records(self) -> Vec<&'a ShippingMethodCountry> {
        self.rates.into_values().collect()
    }
}
