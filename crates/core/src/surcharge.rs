//! Mass-based shipping prices.
//!
//! When the contents of a shipment are known, its price can be computed from
//! the total mass and the destination instead of the flat per-country price.
//! The rate per unit of mass comes from a [`SurchargeSchedule`]:
//!
//! 1. the domestic country pays the domestic rate
//! 2. otherwise the first tier whose region contains the destination at the
//!    reference time applies
//! 3. otherwise the fallback rate applies
//!
//! The built-in schedule charges 1.0 per kg within `DE`, 1.5 per kg within
//! the EU and 2.0 per kg elsewhere.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::region::{EU_REGION, RegionTable, RegionTableError};
use crate::types::{CountryCode, CurrencyCode, Price};

/// Errors from surcharge schedules and calculations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SurchargeError {
    /// A line item has a negative unit mass.
    #[error("line {index} has a negative unit mass: {mass}")]
    NegativeMass {
        /// Position of the line in the input.
        index: usize,
        /// The rejected mass.
        mass: Decimal,
    },
    /// Mass or price does not fit in a decimal.
    #[error("shipment mass or price is too large")]
    Overflow,
    /// A rate in the schedule is negative.
    #[error("rate for {basis} cannot be negative: {rate}")]
    NegativeRate {
        /// What the rate applies to.
        basis: String,
        /// The rejected rate.
        rate: Decimal,
    },
    /// A tier refers to a region missing from the region table.
    #[error("rate tier refers to unknown region: {0}")]
    UnknownRegion(String),
    /// The region table is invalid.
    #[error(transparent)]
    Region(#[from] RegionTableError),
}

/// One line of a shipment: a quantity of identical items.
pub trait ShipmentLine {
    /// Number of items.
    fn quantity(&self) -> u32;
    /// Mass of a single item.
    fn unit_mass(&self) -> Decimal;
}

/// A plain shipment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentItem {
    /// Number of items.
    pub quantity: u32,
    /// Mass of a single item.
    pub unit_mass: Decimal,
}

impl ShipmentItem {
    /// Create a line.
    #[must_use]
    pub const fn new(quantity: u32, unit_mass: Decimal) -> Self {
        Self {
            quantity,
            unit_mass,
        }
    }
}

impl ShipmentLine for ShipmentItem {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn unit_mass(&self) -> Decimal {
        self.unit_mass
    }
}

impl<T: ShipmentLine + ?Sized> ShipmentLine for &T {
    fn quantity(&self) -> u32 {
        (**self).quantity()
    }

    fn unit_mass(&self) -> Decimal {
        (**self).unit_mass()
    }
}

/// Rate per unit of mass for destinations in a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTier {
    /// Region code in the schedule's region table.
    pub region: String,
    /// Rate per unit of mass.
    pub rate: Decimal,
}

/// Why a rate was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "region", rename_all = "snake_case")]
pub enum RateBasis {
    /// The destination is the domestic country.
    Domestic,
    /// The destination belongs to this region.
    Region(String),
    /// No other rule matched.
    Fallback,
}

impl fmt::Display for RateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domestic => f.write_str("domestic"),
            Self::Region(region) => write!(f, "region {region}"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Rate rules for mass-based pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeSchedule {
    /// Country charged the domestic rate.
    pub domestic_country: CountryCode,
    /// Rate per unit of mass for domestic shipments.
    pub domestic_rate: Decimal,
    /// Region tiers, checked in order.
    #[serde(default)]
    pub tiers: Vec<RegionTier>,
    /// Rate per unit of mass when nothing else matches.
    pub fallback_rate: Decimal,
    /// Region memberships the tiers refer to.
    #[serde(default)]
    pub regions: RegionTable,
}

impl Default for SurchargeSchedule {
    fn default() -> Self {
        Self {
            domestic_country: CountryCode::from_ascii(*b"DE"),
            domestic_rate: Decimal::ONE,
            tiers: vec![RegionTier {
                region: EU_REGION.to_owned(),
                rate: Decimal::new(15, 1),
            }],
            fallback_rate: Decimal::TWO,
            regions: RegionTable::builtin(),
        }
    }
}

impl SurchargeSchedule {
    /// Check rates and region references.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate is negative, a tier names an unknown
    /// region, or the region table is invalid.
    pub fn validate(&self) -> Result<(), SurchargeError> {
        self.regions.validate()?;

        check_rate("domestic", self.domestic_rate)?;
        check_rate("fallback", self.fallback_rate)?;

        for tier in &self.tiers {
            if !self.regions.contains_region(&tier.region) {
                return Err(SurchargeError::UnknownRegion(tier.region.clone()));
            }
            check_rate(&format!("region {}", tier.region), tier.rate)?;
        }
        Ok(())
    }

    /// Rate per unit of mass for `destination` at `at`.
    #[must_use]
    pub fn rate_for(&self, destination: &CountryCode, at: DateTime<Utc>) -> (Decimal, RateBasis) {
        if *destination == self.domestic_country {
            return (self.domestic_rate, RateBasis::Domestic);
        }

        self.tiers
            .iter()
            .find(|tier| self.regions.is_member(&tier.region, destination, at))
            .map_or((self.fallback_rate, RateBasis::Fallback), |tier| {
                (tier.rate, RateBasis::Region(tier.region.clone()))
            })
    }
}

fn check_rate(basis: &str, rate: Decimal) -> Result<(), SurchargeError> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(SurchargeError::NegativeRate {
            basis: basis.to_owned(),
            rate,
        });
    }
    Ok(())
}

/// Details of a mass-based price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBreakdown {
    /// Sum of quantity times unit mass.
    pub total_mass: Decimal,
    /// Rate per unit of mass that was applied.
    pub rate: Decimal,
    /// Rule that selected the rate.
    pub basis: RateBasis,
    /// Resulting price.
    pub price: Price,
}

/// Prices shipments by mass and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassBasedSurchargeCalculator {
    schedule: SurchargeSchedule,
    currency: CurrencyCode,
}

impl MassBasedSurchargeCalculator {
    /// Create a calculator producing prices in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule does not validate.
    pub fn new(schedule: SurchargeSchedule, currency: CurrencyCode) -> Result<Self, SurchargeError> {
        schedule.validate()?;
        Ok(Self { schedule, currency })
    }

    /// Calculator using the built-in schedule.
    #[must_use]
    pub fn with_default_schedule(currency: CurrencyCode) -> Self {
        Self {
            schedule: SurchargeSchedule::default(),
            currency,
        }
    }

    /// The schedule in use.
    #[must_use]
    pub const fn schedule(&self) -> &SurchargeSchedule {
        &self.schedule
    }

    /// Currency of calculated prices.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Total mass of the shipment.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit mass is negative or the sum overflows.
    pub fn total_mass<L: ShipmentLine>(lines: &[L]) -> Result<Decimal, SurchargeError> {
        lines
            .iter()
            .enumerate()
            .try_fold(Decimal::ZERO, |total, (index, line)| {
                let mass = line.unit_mass();
                if mass.is_sign_negative() && !mass.is_zero() {
                    return Err(SurchargeError::NegativeMass { index, mass });
                }
                Decimal::from(line.quantity())
                    .checked_mul(mass)
                    .and_then(|line_mass| total.checked_add(line_mass))
                    .ok_or(SurchargeError::Overflow)
            })
    }

    /// Price the shipment and explain how the price was reached.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit mass is negative or the arithmetic overflows.
    #[instrument(skip_all, fields(lines = lines.len(), destination = %destination, at = %at))]
    pub fn breakdown<L: ShipmentLine>(
        &self,
        lines: &[L],
        destination: &CountryCode,
        at: DateTime<Utc>,
    ) -> Result<SurchargeBreakdown, SurchargeError> {
        let total_mass = Self::total_mass(lines)?;
        let (rate, basis) = self.schedule.rate_for(destination, at);
        let amount = rate.checked_mul(total_mass).ok_or(SurchargeError::Overflow)?;
        let price = Price::new(amount, self.currency).rounded();

        debug!(%total_mass, %rate, %basis, %price, "Calculated mass-based price");
        Ok(SurchargeBreakdown {
            total_mass,
            rate,
            basis,
            price,
        })
    }

    /// Price the shipment for `destination` as of `at`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    /// use shiprate_core::{CurrencyCode, MassBasedSurchargeCalculator, ShipmentItem};
    ///
    /// let calculator = MassBasedSurchargeCalculator::with_default_schedule(CurrencyCode::EUR);
    /// let items = [
    ///     ShipmentItem::new(2, Decimal::new(30, 1)),
    ///     ShipmentItem::new(1, Decimal::new(40, 1)),
    /// ];
    ///
    /// let price = calculator
    ///     .calculate(&items, &"US".parse().unwrap(), Utc::now())
    ///     .unwrap();
    /// assert_eq!(price.amount, Decimal::new(20, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if a unit mass is negative or the arithmetic overflows.
    pub fn calculate<L: ShipmentLine>(
        &self,
        lines: &[L],
        destination: &CountryCode,
        at: DateTime<Utc>,
    ) -> Result<Price, SurchargeError> {
        self.breakdown(lines, destination, at).map(|b| b.price)
    }

    /// Price the shipment as of the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit mass is negative or the arithmetic overflows.
    pub fn calculate_now<L: ShipmentLine>(
        &self,
        lines: &[L],
        destination: &CountryCode,
    ) -> Result<Price, SurchargeError> {
        self.calculate(lines, destination, Utc::now())
    }
}
