use cnpj_scan_core::cnpj::{
    check_length, strip_formatting, validate_form, Cnpj, CnpjError, CnpjRegistry,
    InMemoryRegistry,
};

#[test]
fn thirteen_digits_are_rejected() {
    assert_eq!(
        check_length("1234567890123"),
        Err(CnpjError::InvalidLength { found: 13 })
    );
    assert!(Cnpj::parse("1234567890123").is_err());
}

#[test]
fn fourteen_digits_pass_length_check_regardless_of_checksum() {
    assert_eq!(check_length("12345678000199"), Ok(()));
    let cnpj = Cnpj::parse("12345678000199").unwrap();
    assert!(!cnpj.mod11_check_digits());
}

#[test]
fn non_digits_are_rejected() {
    assert_eq!(Cnpj::parse("12.345.678/000"), Err(CnpjError::NonDigit));
}

#[test]
fn placeholder_check_only_compares_digit_pairs() {
    // Last two digits repeat the two before them: accepted by the placeholder.
    let fake = Cnpj::parse("12345678009999").unwrap();
    assert!(fake.placeholder_check_digits());
    assert!(!fake.mod11_check_digits());

    let real = Cnpj::parse("11222333000181").unwrap();
    assert!(real.mod11_check_digits());
    assert!(!real.placeholder_check_digits());
}

#[test]
fn formatting_helpers() {
    let cnpj = Cnpj::parse("11222333000181").unwrap();
    assert_eq!(cnpj.formatted(), "11.222.333/0001-81");
    assert_eq!(strip_formatting("11.222.333/0001-81 extra 99"), "11222333000181");

    let padded = Cnpj::from_value(191).unwrap();
    assert_eq!(padded.to_string(), "00000000000191");
    assert!(Cnpj::from_value(100_000_000_000_000).is_err());
}

#[test]
fn form_validation_checks_headquarters_root() {
    let ok = validate_form("11222333000281", Some("11222333000181")).unwrap();
    assert!(!ok.placeholder_ok);

    let err = validate_form("99222333000281", Some("11222333000181")).unwrap_err();
    assert!(matches!(err, CnpjError::NotABranchOf { .. }));

    // An empty headquarters field is ignored.
    assert!(validate_form("11222333000181", Some("")).unwrap().mod11_ok);
}

#[test]
fn in_memory_registry_lists_branches_by_root_key() {
    let registry: InMemoryRegistry = [
        "11222333000181",
        "11222333000262",
        "11222333010181",
        "44555666000100",
    ]
    .iter()
    .map(|s| Cnpj::parse(s).unwrap())
    .collect();

    let hq = Cnpj::parse("11222333000181").unwrap();
    assert!(registry.exists(hq).unwrap());
    assert!(!registry
        .exists(Cnpj::parse("11222333000999").unwrap())
        .unwrap());

    let branches = registry.branches(hq).unwrap();
    let listed: Vec<String> = branches.iter().map(Cnpj::to_string).collect();
    // value / 10_000 keeps the first two branch digits, so 0101 is not a sibling.
    assert_eq!(listed, vec!["11222333000181", "11222333000262"]);
}
