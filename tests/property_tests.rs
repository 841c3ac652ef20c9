//! Property-based tests for TupleValue and IteratorType using proptest

use proptest::prelude::*;
use tarantool_api::prelude::*;

// ============================================================================
// TupleValue Conversion Tests
// ============================================================================

proptest! {
    /// Signed integers keep their value and type
    #[test]
    fn test_i64_conversion(value in any::<i64>()) {
        let val = TupleValue::from(value);
        prop_assert_eq!(val.as_i64(), Some(value));
        prop_assert_eq!(val.type_name(), "int");
        prop_assert!(!val.is_nil());
    }

    /// Unsigned integers normalize to Int whenever they fit
    #[test]
    fn test_u64_normalization(value in any::<u64>()) {
        let val = TupleValue::from(value);
        prop_assert_eq!(val.as_u64(), Some(value));
        if value <= i64::MAX as u64 {
            prop_assert_eq!(val, TupleValue::Int(value as i64));
        } else {
            prop_assert_eq!(val, TupleValue::UInt(value));
        }
    }

    /// Strings are borrowed back unchanged
    #[test]
    fn test_string_conversion(value in ".*") {
        let val = TupleValue::from(value.as_str());
        prop_assert_eq!(val.as_str(), Some(value.as_str()));
        prop_assert_eq!(val.to_string(), value);
    }

    /// A tuple of strings and integers survives the untagged JSON shape
    #[test]
    fn test_tuple_json_shape(id in "[a-z0-9-]{1,16}", n in any::<i64>(), flag in any::<bool>()) {
        let row: Tuple = tuple![id.clone(), n, flag];
        let json = serde_json::to_value(&row).unwrap();
        prop_assert_eq!(json.clone(), serde_json::json!([id, n, flag]));

        let back: Tuple = serde_json::from_value(json).unwrap();
        prop_assert_eq!(back, row);
    }

    /// Nil is produced for absent optionals only
    #[test]
    fn test_option_conversion(value in proptest::option::of(any::<i32>())) {
        let val = TupleValue::from(value);
        prop_assert_eq!(val.is_nil(), value.is_none());
    }
}

// ============================================================================
// IteratorType Parsing Tests
// ============================================================================

proptest! {
    /// Every valid code parses from its decimal form and its name
    #[test]
    fn test_iterator_code_and_name(code in 0u32..12) {
        let it = IteratorType::try_from(code).unwrap();
        prop_assert_eq!(it.code(), code);
        prop_assert_eq!(code.to_string().parse::<IteratorType>().unwrap(), it);
        prop_assert_eq!(it.to_str().to_lowercase().parse::<IteratorType>().unwrap(), it);
    }

    /// Codes outside the protocol range are rejected
    #[test]
    fn test_iterator_invalid_code(code in 12u32..) {
        prop_assert!(IteratorType::try_from(code).is_err());
    }
}
