//! Time-varying region membership.
//!
//! A region (e.g. a customs union) is a set of countries that share a
//! shipping rate tier. Membership can start and end at fixed instants, so a
//! country leaving a region is a data change rather than a code change.
//!
//! ## YAML Format
//!
//! ```yaml
//! EU:
//!   - country: DE
//!   - country: GB
//!     until: 2019-04-01T00:00:00Z
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CountryCode;

/// Code of the built-in European Union region.
pub const EU_REGION: &str = "EU";

/// Countries in the built-in European Union region.
pub const EU_MEMBERS: [&str; 28] = [
    "AT", "BE", "BG", "CY", "CZ", "DK", "DE", "EE", "ES", "FI", "FR", "GB", "GR", "HR", "HU",
    "IE", "IT", "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Unix timestamp of 2019-04-01T00:00:00Z, when GB stops counting as an
/// EU member in the built-in table.
pub const GB_EU_EXIT_TIMESTAMP: i64 = 1_554_076_800;

/// Errors found while validating a [`RegionTable`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionTableError {
    /// A region code is empty or whitespace.
    #[error("region code cannot be empty")]
    EmptyRegionCode,
    /// A membership window ends before (or when) it starts.
    #[error("membership of {country} in {region} ends before it starts")]
    InvalidWindow {
        /// Region code.
        region: String,
        /// Member country.
        country: CountryCode,
    },
}

/// One country's membership of a region, optionally bounded in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMembership {
    /// Member country.
    pub country: CountryCode,
    /// Membership starts at this instant (inclusive); unbounded if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Membership ends at this instant (exclusive); unbounded if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl RegionMembership {
    /// Membership without time bounds.
    #[must_use]
    pub const fn permanent(country: CountryCode) -> Self {
        Self {
            country,
            from: None,
            until: None,
        }
    }

    /// Returns true if the membership is in effect at `at`.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.until.is_none_or(|until| at < until)
    }
}

/// Region code to member countries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: BTreeMap<String, Vec<RegionMembership>>,
}

impl RegionTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// The built-in table: the EU with GB leaving at 2019-04-01T00:00:00Z.
    #[must_use]
    pub fn builtin() -> Self {
        let gb_exit = DateTime::<Utc>::from_timestamp(GB_EU_EXIT_TIMESTAMP, 0);
        let members = EU_MEMBERS
            .iter()
            .filter_map(|code| CountryCode::parse(code).ok())
            .map(|country| RegionMembership {
                country,
                from: None,
                until: (country.as_str() == "GB").then_some(gb_exit).flatten(),
            })
            .collect();

        let mut table = Self::new();
        table.regions.insert(EU_REGION.to_owned(), members);
        table
    }

    /// Add or replace a region.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or a window is inverted.
    pub fn insert_region(
        &mut self,
        code: impl Into<String>,
        members: Vec<RegionMembership>,
    ) -> Result<(), RegionTableError> {
        let code = code.into();
        validate_region(&code, &members)?;
        self.regions.insert(code, members);
        Ok(())
    }

    /// Returns true if the region exists.
    #[must_use]
    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    /// Region codes in sorted order.
    pub fn region_codes(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Returns true if `country` belongs to `region` at `at`.
    #[must_use]
    pub fn is_member(&self, region: &str, country: &CountryCode, at: DateTime<Utc>) -> bool {
        self.regions.get(region).is_some_and(|members| {
            members
                .iter()
                .any(|m| m.country == *country && m.is_active_at(at))
        })
    }

    /// Members of `region` at `at`, in table order.
    #[must_use]
    pub fn members_at(&self, region: &str, at: DateTime<Utc>) -> Vec<CountryCode> {
        self.regions
            .get(region)
            .map(|members| {
                members
                    .iter()
                    .filter(|m| m.is_active_at(at))
                    .map(|m| m.country)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Regions `country` belongs to at `at`.
    #[must_use]
    pub fn regions_for(&self, country: &CountryCode, at: DateTime<Utc>) -> Vec<&str> {
        self.region_codes()
            .filter(|region| self.is_member(region, country, at))
            .collect()
    }

    /// Check every region.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), RegionTableError> {
        self.regions
            .iter()
            .try_for_each(|(code, members)| validate_region(code, members))
    }
}

fn validate_region(code: &str, members: &[RegionMembership]) -> Result<(), RegionTableError> {
    if code.trim().is_empty() {
        return Err(RegionTableError::EmptyRegionCode);
    }
    for member in members {
        if let (Some(from), Some(until)) = (member.from, member.until) {
            if until <= from {
                return Err(RegionTableError::InvalidWindow {
                    region: code.to_owned(),
                    country: member.country,
                });
            }
        }
    }
    Ok(())
}
