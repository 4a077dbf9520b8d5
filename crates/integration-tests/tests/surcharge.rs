//! Integration tests for mass-based surcharges.
//!
//! The built-in schedule charges 1.0 per unit of mass to Germany, 1.5 to EU
//! members and 2.0 elsewhere. GB leaves the EU tier at 2019-04-01T00:00:00Z.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use shiprate_core::{
    CurrencyCode, MassBasedSurchargeCalculator, RateBasis, RegionMembership, RegionTable,
    RegionTier, ShipmentItem, SurchargeError, SurchargeSchedule,
};
use shiprate_integration_tests::{country, fixture, utc};

fn calculator() -> MassBasedSurchargeCalculator {
    MassBasedSurchargeCalculator::with_default_schedule(CurrencyCode::EUR)
}

fn items() -> Vec<ShipmentItem> {
    vec![
        ShipmentItem::new(2, Decimal::new(30, 1)),
        ShipmentItem::new(1, Decimal::new(40, 1)),
    ]
}

// =============================================================================
// Rates by Destination
// =============================================================================

#[test]
fn test_domestic_eu_and_fallback_rates() {
    let calculator = calculator();
    let at = utc(2019, 1, 15);
    let items = items();

    assert_eq!(
        MassBasedSurchargeCalculator::total_mass(&items).unwrap(),
        Decimal::new(10, 0)
    );

    let de = calculator.calculate(&items, &country("DE"), at).unwrap();
    let fr = calculator.calculate(&items, &country("FR"), at).unwrap();
    let us = calculator.calculate(&items, &country("US"), at).unwrap();

    assert_eq!(de.amount, Decimal::new(1000, 2));
    assert_eq!(fr.amount, Decimal::new(1500, 2));
    assert_eq!(us.amount, Decimal::new(2000, 2));
    assert_eq!(de.currency_code, CurrencyCode::EUR);
}

#[test]
fn test_breakdown_reports_basis() {
    let breakdown = calculator()
        .breakdown(&items(), &country("PL"), utc(2020, 6, 1))
        .unwrap();

    assert_eq!(breakdown.total_mass, Decimal::new(10, 0));
    assert_eq!(breakdown.rate, Decimal::new(15, 1));
    assert_eq!(breakdown.basis, RateBasis::Region("EU".to_owned()));
}

#[test]
fn test_empty_shipment_costs_nothing() {
    let empty: Vec<ShipmentItem> = Vec::new();
    let price = calculator()
        .calculate(&empty, &country("US"), utc(2020, 1, 1))
        .unwrap();
    assert!(price.amount.is_zero());
}

#[test]
fn test_negative_mass_rejected() {
    let lines = [
        ShipmentItem::new(1, Decimal::ONE),
        ShipmentItem::new(1, Decimal::new(-5, 1)),
    ];
    let err = calculator()
        .calculate(&lines, &country("DE"), utc(2020, 1, 1))
        .unwrap_err();
    assert!(matches!(err, SurchargeError::NegativeMass { index: 1, .. }));
}

// =============================================================================
// GB Cutoff
// =============================================================================

#[test]
fn test_gb_before_cutoff_uses_eu_rate() {
    let just_before = Utc.with_ymd_and_hms(2019, 3, 31, 23, 59, 59).unwrap();
    let price = calculator()
        .calculate(&[ShipmentItem::new(1, Decimal::ONE)], &country("GB"), just_before)
        .unwrap();
    assert_eq!(price.amount, Decimal::new(150, 2));
}

#[test]
fn test_gb_at_and_after_cutoff_uses_fallback_rate() {
    let cutoff = utc(2019, 4, 1);
    let line = [ShipmentItem::new(1, Decimal::ONE)];

    for at in [cutoff, cutoff + Duration::days(1), utc(2024, 1, 1)] {
        let breakdown = calculator().breakdown(&line, &country("GB"), at).unwrap();
        assert_eq!(breakdown.price.amount, Decimal::new(200, 2), "at {at}");
        assert_eq!(breakdown.basis, RateBasis::Fallback);
    }
}

#[test]
fn test_builtin_region_table_membership() {
    let regions = RegionTable::builtin();
    assert_eq!(regions.members_at("EU", utc(2019, 1, 1)).len(), 28);
    assert_eq!(regions.members_at("EU", utc(2019, 4, 1)).len(), 27);
    assert!(regions.is_member("EU", &country("DE"), utc(2030, 1, 1)));
}

// =============================================================================
// Custom Schedules
// =============================================================================

#[test]
fn test_schedule_from_fixture() {
    let schedule: SurchargeSchedule = serde_yaml::from_str(&fixture("surcharge.yaml")).unwrap();
    let calculator = MassBasedSurchargeCalculator::new(schedule, CurrencyCode::EUR).unwrap();
    let line = [ShipmentItem::new(4, Decimal::ONE)];

    // Only four EU members are listed, so Italy falls back.
    let it = calculator.breakdown(&line, &country("IT"), utc(2020, 1, 1)).unwrap();
    assert_eq!(it.basis, RateBasis::Fallback);
    assert_eq!(it.price.amount, Decimal::new(800, 2));

    let at = calculator.breakdown(&line, &country("AT"), utc(2020, 1, 1)).unwrap();
    assert_eq!(at.price.amount, Decimal::new(600, 2));

    let gb = calculator.breakdown(&line, &country("GB"), utc(2019, 3, 1)).unwrap();
    assert_eq!(gb.basis, RateBasis::Region("EU".to_owned()));
}

#[test]
fn test_first_matching_tier_wins() {
    let mut regions = RegionTable::new();
    regions
        .insert_region("DACH", vec![RegionMembership::permanent(country("AT"))])
        .unwrap();
    regions
        .insert_region("EU", vec![RegionMembership::permanent(country("AT"))])
        .unwrap();

    let schedule = SurchargeSchedule {
        domestic_country: country("DE"),
        domestic_rate: Decimal::ONE,
        tiers: vec![
            RegionTier {
                region: "DACH".to_owned(),
                rate: Decimal::new(12, 1),
            },
            RegionTier {
                region: "EU".to_owned(),
                rate: Decimal::new(15, 1),
            },
        ],
        fallback_rate: Decimal::TWO,
        regions,
    };

    let (rate, basis) = schedule.rate_for(&country("AT"), utc(2020, 1, 1));
    assert_eq!(rate, Decimal::new(12, 1));
    assert_eq!(basis, RateBasis::Region("DACH".to_owned()));
}

#[test]
fn test_tier_with_unknown_region_rejected() {
    let schedule = SurchargeSchedule {
        tiers: vec![RegionTier {
            region: "EEA".to_owned(),
            rate: Decimal::ONE,
        }],
        ..SurchargeSchedule::default()
    };
    let err = MassBasedSurchargeCalculator::new(schedule, CurrencyCode::EUR).unwrap_err();
    assert_eq!(err, SurchargeError::UnknownRegion("EEA".to_owned()));
}
