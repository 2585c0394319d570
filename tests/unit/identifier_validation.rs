//! GSTIN acceptance and company id normalization through the public API

use gstr2a_puller::identifier::{is_valid_gstin, normalize_company_id, Gstin, GstinError};
use gstr2a_puller::CompanyRecord;

#[test]
fn test_well_formed_gstins_accepted() {
    for gstin in [
        "19AADCG0737G1ZQ",
        "27AAPFU0939F1ZV",
        "29ABCDE1234F2Z5",
        "07AAACB2230M1ZX",
        "33aabct3518q1zv",
    ] {
        assert!(is_valid_gstin(gstin), "{gstin} should be accepted");
    }
}

#[test]
fn test_wrong_length_rejected() {
    for gstin in ["", "19AADCG0737G1Z", "19AADCG0737G1ZQQ"] {
        assert!(matches!(
            Gstin::parse(gstin),
            Err(GstinError::InvalidLength { .. })
        ));
    }
}

#[test]
fn test_structure_violations_rejected() {
    for gstin in [
        "A9AADCG0737G1ZQ", // state code not numeric
        "1912345G0737G1ZQ",
        "19AADCG07X7G1ZQ", // letter in the numeric block
        "19AADCG0737G0ZQ", // entity number 0
        "19AADCG0737G1YQ", // 14th character must be Z
        "19AADCG0737G1Z-",
    ] {
        assert!(!is_valid_gstin(gstin), "{gstin} should be rejected");
    }
}

#[test]
fn test_company_id_forms() {
    assert_eq!(normalize_company_id("3372"), "oc-3372");
    assert_eq!(normalize_company_id("3372.0"), "oc-3372");
    assert_eq!(normalize_company_id("oc-3372"), "oc-3372");
    assert_eq!(normalize_company_id("   "), "");
}

#[test]
fn test_company_record_keeps_invalid_gstin_for_later() {
    let record = CompanyRecord::new("12", "Broken", "not a gstin");
    assert_eq!(record.gstin, "NOT A GSTIN");
    assert!(!record.has_valid_gstin());
}
