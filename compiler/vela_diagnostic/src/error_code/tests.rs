use super::*;

#[test]
fn display_matches_as_str() {
    for code in ErrorCode::ALL {
        assert_eq!(code.to_string(), code.as_str());
    }
}

#[test]
fn classification_is_exclusive() {
    for code in ErrorCode::ALL {
        assert_ne!(code.is_codegen_error(), code.is_internal_error(), "{code}");
    }
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!("e5002".parse::<ErrorCode>(), Ok(ErrorCode::E5002));
    assert_eq!("E9001".parse::<ErrorCode>(), Ok(ErrorCode::E9001));
    assert_eq!("E1234".parse::<ErrorCode>(), Err(()));
}
