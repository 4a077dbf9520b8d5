//! Shiprate Core - shipping method prices and their resolution.
//!
//! This crate provides the pricing rules used by the `shiprate` CLI and by
//! any storefront that embeds them:
//!
//! - [`rate_table`] - shipping methods and their per-country prices
//! - [`resolver`] - one applicable price per method for a destination
//! - [`surcharge`] - mass-based pricing driven by a region schedule
//! - [`quote`] - the flat-rate and mass-based pricing paths
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Loading tables from files and persisting them is
//! left to the caller.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, country codes and prices
//! - [`model`] - Shipping method domain models
//! - [`region`] - Time-varying region membership

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod model;
pub mod quote;
pub mod rate_table;
pub mod region;
pub mod resolver;
pub mod surcharge;
pub mod types;

pub use model::{MethodError, ShippingMethod, ShippingMethodCountry};
pub use quote::{PricingPath, ShippingQuote, flat_rate_quote, mass_based_quote, quote, quote_all};
pub use rate_table::{CountryRateTable, RateTableDocument, RateTableError};
pub use region::{RegionMembership, RegionTable, RegionTableError};
pub use resolver::{RateResolver, ResolvedRates};
pub use surcharge::{
    MassBasedSurchargeCalculator, RateBasis, RegionTier, ShipmentItem, ShipmentLine,
    SurchargeBreakdown, SurchargeError, SurchargeSchedule,
};
pub use types::*;
