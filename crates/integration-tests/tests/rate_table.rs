//! Integration tests for the country rate table and its YAML document form.

#![allow(clippy::unwrap_used)]

use shiprate_core::{
    CountryRateTable, CountryScope, CurrencyCode, Price, RateTableDocument, RateTableError,
    ShippingMethod, ShippingMethodId,
};
use shiprate_integration_tests::{eur, fixture, scope};

fn standard_table() -> (CountryRateTable, ShippingMethodId) {
    let mut table = CountryRateTable::new(CurrencyCode::EUR);
    let method = ShippingMethodId::new(1);
    table
        .add_method(ShippingMethod::new(method, "Standard").unwrap())
        .unwrap();
    (table, method)
}

// =============================================================================
// Uniqueness
// =============================================================================

#[test]
fn test_duplicate_country_rejected() {
    let (mut table, method) = standard_table();
    table.add_rate(method, scope("DE"), eur(1000)).unwrap();

    let err = table.add_rate(method, scope("de"), eur(1200)).unwrap_err();
    assert_eq!(
        err,
        RateTableError::DuplicateCountry {
            method_id: method,
            country: scope("DE"),
        }
    );
    assert_eq!(table.records().len(), 1);
}

#[test]
fn test_second_wildcard_rejected() {
    let (mut table, method) = standard_table();
    table.add_rate(method, CountryScope::Any, eur(500)).unwrap();

    let err = table.add_rate(method, scope("*"), eur(600)).unwrap_err();
    assert!(matches!(err, RateTableError::DuplicateCountry { .. }));
}

#[test]
fn test_same_country_on_different_methods_allowed() {
    let (mut table, standard) = standard_table();
    let express = ShippingMethodId::new(2);
    table
        .add_method(ShippingMethod::new(express, "Express").unwrap())
        .unwrap();

    table.add_rate(standard, scope("DE"), eur(1000)).unwrap();
    table.add_rate(express, scope("DE"), eur(2500)).unwrap();
    assert_eq!(table.records().len(), 2);
}

#[test]
fn test_rate_for_unknown_method_rejected() {
    let (mut table, _) = standard_table();
    let err = table
        .add_rate(ShippingMethodId::new(99), scope("DE"), eur(100))
        .unwrap_err();
    assert_eq!(err, RateTableError::UnknownMethod(ShippingMethodId::new(99)));
}

#[test]
fn test_foreign_currency_rejected() {
    let (mut table, method) = standard_table();
    let err = table
        .add_rate(method, scope("GB"), Price::from_cents(500, CurrencyCode::GBP))
        .unwrap_err();
    assert!(matches!(err, RateTableError::CurrencyMismatch { .. }));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_remove_method_cascades() {
    let (mut table, method) = standard_table();
    let other = ShippingMethodId::new(2);
    table
        .add_method(ShippingMethod::new(other, "Express").unwrap())
        .unwrap();
    table.add_rate(method, scope("DE"), eur(1000)).unwrap();
    table.add_rate(method, CountryScope::Any, eur(500)).unwrap();
    table.add_rate(other, scope("DE"), eur(2500)).unwrap();

    let removed = table.remove_method(method).unwrap();
    assert_eq!(removed.name, "Standard");
    assert_eq!(table.records().len(), 1);
    assert!(table.resolve(&scope("DE")).get(method).is_none());
    assert_eq!(table.rates_for_method(method).count(), 0);
}

#[test]
fn test_update_and_remove_rate() {
    let (mut table, method) = standard_table();
    let de = table.add_rate(method, scope("DE"), eur(1000)).unwrap();
    table.add_rate(method, CountryScope::Any, eur(500)).unwrap();

    table.update_price(de, eur(900)).unwrap();
    assert_eq!(table.lookup(method, &scope("DE")).unwrap().price, eur(900));

    table.remove_rate(de).unwrap();
    assert_eq!(table.lookup(method, &scope("DE")).unwrap().price, eur(500));

    // The freed scope can be priced again.
    table.add_rate(method, scope("DE"), eur(800)).unwrap();
    assert!(matches!(
        table.remove_rate(de),
        Err(RateTableError::UnknownRate(_))
    ));
}

#[test]
fn test_countries_and_price_range() {
    let (mut table, method) = standard_table();
    table.add_rate(method, scope("DE"), eur(1000)).unwrap();
    table.add_rate(method, CountryScope::Any, eur(500)).unwrap();
    table.add_rate(method, scope("AT"), eur(1200)).unwrap();

    assert_eq!(table.countries(method), vec!["DE", "Rest of World", "AT"]);
    let range = table.price_range(method).unwrap();
    assert_eq!(range.min, eur(500));
    assert_eq!(range.max, eur(1200));
    assert_eq!(range.to_string(), "€5.00 - €12.00");
}

// =============================================================================
// Documents
// =============================================================================

#[test]
fn test_fixture_document_loads() {
    let document: RateTableDocument = serde_yaml::from_str(&fixture("rates.yaml")).unwrap();
    let table = document.into_table(CurrencyCode::EUR).unwrap();

    assert_eq!(table.methods().count(), 3);
    assert_eq!(table.records().len(), 5);
    assert_eq!(
        table.method(ShippingMethodId::new(1)).unwrap().description,
        "3-5 business days"
    );
}

#[test]
fn test_fixture_resolution_scenarios() {
    let document: RateTableDocument = serde_yaml::from_str(&fixture("rates.yaml")).unwrap();
    let table = document.into_table(CurrencyCode::EUR).unwrap();

    let de = table.resolve(&scope("DE"));
    assert_eq!(de.len(), 3);
    assert_eq!(de.get(ShippingMethodId::new(1)).unwrap().price, eur(1000));

    let fr = table.resolve(&scope("FR"));
    assert_eq!(fr.len(), 2);
    assert_eq!(fr.get(ShippingMethodId::new(1)).unwrap().price, eur(500));
    assert_eq!(fr.get(ShippingMethodId::new(2)).unwrap().price, eur(500));
    assert!(fr.get(ShippingMethodId::new(3)).is_none());
}

#[test]
fn test_document_round_trip_keeps_wildcard() {
    let document: RateTableDocument = serde_yaml::from_str(&fixture("rates.yaml")).unwrap();
    let table = document.into_table(CurrencyCode::EUR).unwrap();

    let yaml = serde_yaml::to_string(&RateTableDocument::from(&table)).unwrap();
    let reloaded: RateTableDocument = serde_yaml::from_str(&yaml).unwrap();
    let reloaded = reloaded.into_table(CurrencyCode::EUR).unwrap();

    assert_eq!(reloaded.records(), table.records());
}

#[test]
fn test_document_with_duplicate_scope_rejected() {
    let yaml = r"
methods:
  - id: 1
    name: Standard
    prices:
      - country: ''
        price: 5
      - country: '*'
        price: 6
";
    let document: RateTableDocument = serde_yaml::from_str(yaml).unwrap();
    assert!(matches!(
        document.into_table(CurrencyCode::EUR),
        Err(RateTableError::DuplicateCountry { .. })
    ));
}
