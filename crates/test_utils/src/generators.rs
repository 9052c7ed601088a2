//! Property-Based Test Generators
//!
//! Proptest strategies for request input, both well-formed and malformed.

use proptest::prelude::*;

/// Strategy for latitudes inside [-90, 90], rendered as strings
pub fn latitude_string_strategy() -> impl Strategy<Value = String> {
    (-90.0f64..=90.0f64).prop_map(|v| format!("{:.5}", v))
}

/// Strategy for longitudes inside [-180, 180], rendered as strings
pub fn longitude_string_strategy() -> impl Strategy<Value = String> {
    (-180.0f64..=180.0f64).prop_map(|v| format!("{:.5}", v))
}

/// Strategy for a well-formed `[lat, lng]` pair
pub fn coordinate_pair_strategy() -> impl Strategy<Value = [String; 2]> {
    (latitude_string_strategy(), longitude_string_strategy()).prop_map(|(lat, lng)| [lat, lng])
}

/// Strategy for latitudes outside the valid range
pub fn out_of_range_latitude_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (90.001f64..1_000.0f64).prop_map(|v| format!("{:.3}", v)),
        (-1_000.0f64..-90.001f64).prop_map(|v| format!("{:.3}", v)),
    ]
}

/// Strategy for 1-based page or limit values accepted by the listing
pub fn valid_page_value_strategy() -> impl Strategy<Value = u32> {
    1u32..10_000u32
}

/// Strategy for strings that are not integers
pub fn non_integer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,8}",
        (1u32..1000u32, 1u32..9u32).prop_map(|(whole, frac)| format!("{}.{}", whole, frac)),
        Just(String::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_orders::{Coordinates, PageRequest};

    proptest! {
        #[test]
        fn generated_pairs_parse(pair in coordinate_pair_strategy()) {
            prop_assert!(Coordinates::parse("Origin", &pair).is_ok());
        }

        #[test]
        fn out_of_range_latitudes_rejected(lat in out_of_range_latitude_strategy()) {
            let err = Coordinates::parse("Origin", &[lat, "0".to_string()]).unwrap_err();
            prop_assert_eq!(err.to_string(), "Origin latitude must be between -90 and 90");
        }

        #[test]
        fn generated_pages_validate(
            page in valid_page_value_strategy(),
            limit in valid_page_value_strategy(),
        ) {
            let request = PageRequest::new(page.into(), limit.into()).unwrap();
            prop_assert_eq!(request.page(), u64::from(page));
        }

        #[test]
        fn non_integers_are_rejected(raw in non_integer_strategy()) {
            prop_assert!(PageRequest::parse(Some(raw.as_str()), Some("1")).is_err());
        }
    }
}
