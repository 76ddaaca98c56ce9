//! End-to-end scenarios through the public API

use iban_validator::{ErrorKind, IbanAccount};

fn valid_ibans() -> Vec<&'static str> {
    vec![
        "NL58ABNA0000000001",
        "NL91ABNA0417164300",
        "GB82WEST12345698765432",
        "DE89370400440532013000",
        "CZ6508000000192000145399",
        "AL47212110090000000235698741",
        "BE68539007547034",
        "KZ86125KZT5004100100",
        "MU17BOMM0101101030300200000MUR",
        "NO9386011117947",
        "SC18SSCB11010000000000001497USD",
        "BR1800360305000010009795493C1",
        "FR1420041010050500013M02606",
        "IT60X0542811101000000123456",
        "ES9121000418450200051332",
        "CH9300762011623852957",
    ]
}

#[test]
fn test_valid_ibans_pass() {
    for iban in valid_ibans() {
        let account = IbanAccount::new(iban);
        assert!(account.validate().is_ok(), "{} => validation failed", iban);
        assert!(account.is_valid());
    }
}

#[test]
fn test_invalid_ibans_fail() {
    let invalid = vec![
        ("BK561910000001234383", ErrorKind::UnsupportedCountry),
        ("AL472121100900000002356987410", ErrorKind::InvalidLength),
        ("CZa50800000k192000145399", ErrorKind::InvalidFormat),
        ("AA00000000000000", ErrorKind::InvalidChecksum),
        ("NL58ABAN0000000001", ErrorKind::InvalidChecksum),
        ("", ErrorKind::UnsupportedCountry),
        ("!!!", ErrorKind::UnsupportedCountry),
        ("NL", ErrorKind::InvalidLength),
    ];

    for (iban, kind) in invalid {
        let account = IbanAccount::new(iban);
        assert!(!account.is_valid(), "{} => should fail", iban);
        assert_eq!(account.validate().unwrap_err().kind(), kind, "{}", iban);
    }
}

#[test]
fn test_strict_messages() {
    let cases = vec![
        (
            "BK561910000001234383",
            "IBAN (BK561910000001234383) country code not valid or not supported",
        ),
        (
            "AL472121100900000002356987410",
            "IBAN (AL472121100900000002356987410) length is invalid",
        ),
        (
            "CZa50800000k192000145399",
            "IBAN (CZA50800000K192000145399) format is invalid",
        ),
        (
            "AA00000000000000",
            "IBAN (AA00000000000000) checksum is invalid",
        ),
    ];

    for (iban, message) in cases {
        let err = IbanAccount::new(iban).validate().unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_sanitized_input_validates() {
    let inputs = vec![
        "NL 58 ABNA 0000 0000 01",
        "NL-58-ABNA-0000-0000-01",
        "{NL}[58](ABNA)<0000>\"0000\"`01`",
        "!@NL#$58%^ABNA&*0000;|0000,.01/:",
        "nl58abna0000000001",
    ];

    for input in inputs {
        let account = IbanAccount::new(input);
        assert_eq!(account.normalized(), "NL58ABNA0000000001", "{}", input);
        assert!(account.is_valid(), "{} => failed to sanitize", input);
    }
}

#[test]
fn test_netherlands_decomposition() {
    let account = IbanAccount::new("NL58ABNA0000000001");

    assert_eq!(account.country_code(), "NL");
    assert_eq!(account.checksum(), "58");
    assert_eq!(account.account_identification(), "ABNA0000000001");
    assert_eq!(account.institute_identification(), "ABNA");
    assert_eq!(account.bank_account_number().unwrap(), "0000000001");
    assert_eq!(account.format(), "NL58 ABNA 0000 0000 01");
}

#[test]
fn test_format_round_trip() {
    for iban in valid_ibans() {
        let account = IbanAccount::new(iban);
        let reparsed = IbanAccount::new(account.format());
        assert_eq!(reparsed.normalized(), account.normalized());
        assert!(reparsed.is_valid(), "{} => round trip failed", iban);
    }
}

#[test]
fn test_accounts_are_independent() {
    let good = IbanAccount::new("NL58ABNA0000000001");
    let bad = IbanAccount::new("AA00000000000000");

    assert!(bad.validate().is_err());
    assert!(good.validate().is_ok());
    assert!(bad.validate().is_err());
}

#[test]
fn test_validate_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                valid_ibans()
                    .into_iter()
                    .all(|iban| IbanAccount::new(iban).is_valid())
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
