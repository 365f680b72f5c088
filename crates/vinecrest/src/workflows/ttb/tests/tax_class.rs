use crate::workflows::ttb::tax_class::{determine_tax_class, TaxClass, WineType};

#[test]
fn still_wine_bands_split_at_sixteen_and_twenty_one() {
    assert_eq!(
        determine_tax_class(WineType::Still, Some(13.5)),
        TaxClass::TableWine16
    );
    assert_eq!(
        determine_tax_class(WineType::Still, Some(16.0)),
        TaxClass::TableWine16
    );
    assert_eq!(
        determine_tax_class(WineType::Still, Some(16.01)),
        TaxClass::TableWine21
    );
    assert_eq!(
        determine_tax_class(WineType::Still, Some(21.0)),
        TaxClass::TableWine21
    );
    assert_eq!(
        determine_tax_class(WineType::Still, Some(22.5)),
        TaxClass::TableWine24
    );
}

#[test]
fn unmeasured_alcohol_falls_into_lowest_band() {
    assert_eq!(determine_tax_class(WineType::Still, None), TaxClass::TableWine16);
    assert_eq!(
        determine_tax_class(WineType::Still, Some(0.0)),
        TaxClass::TableWine16
    );
    assert_eq!(
        determine_tax_class(WineType::HardCider, None),
        TaxClass::HardCider
    );
}

#[test]
fn effervescent_styles_ignore_alcohol() {
    assert_eq!(
        determine_tax_class(WineType::SparklingBottleFermented, Some(12.0)),
        TaxClass::SparklingBf
    );
    assert_eq!(
        determine_tax_class(WineType::SparklingBulkProcess, Some(18.0)),
        TaxClass::SparklingBp
    );
    assert_eq!(
        determine_tax_class(WineType::ArtificiallyCarbonated, None),
        TaxClass::ArtificiallyCarbonated
    );
}

#[test]
fn strong_cider_is_taxed_as_still_wine() {
    assert_eq!(
        determine_tax_class(WineType::HardCider, Some(6.9)),
        TaxClass::HardCider
    );
    assert_eq!(
        determine_tax_class(WineType::HardCider, Some(9.5)),
        TaxClass::TableWine16
    );
}

#[test]
fn keys_match_report_column_names() {
    let keys: Vec<&str> = TaxClass::ordered().into_iter().map(TaxClass::key).collect();
    assert_eq!(
        keys,
        vec![
            "table_wine_16",
            "table_wine_21",
            "table_wine_24",
            "artificially_carbonated",
            "sparkling_bf",
            "sparkling_bp",
            "hard_cider",
        ]
    );
    for class in TaxClass::ordered() {
        let json = serde_json::to_value(class).expect("serialize");
        assert_eq!(json, class.key());
        assert_eq!(TaxClass::from_key(class.key()), Some(class));
    }
}

#[test]
fn wine_type_keys_accept_cellar_aliases() {
    assert_eq!(WineType::from_key("Red"), Some(WineType::Still));
    assert_eq!(
        WineType::from_key("methode-champenoise"),
        Some(WineType::SparklingBottleFermented)
    );
    assert_eq!(WineType::from_key("Cider"), Some(WineType::HardCider));
    assert_eq!(WineType::from_key("mead"), None);
}
