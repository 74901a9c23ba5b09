//! Dimension classification from topology names.
//!
//! A multi-dimensional topology is named by its per-dimension parts joined
//! with `_`, each part starting with the dimension type:
//! `tRing_nDirect_ppSwitch` is a `t`, an `n` and a `pp` dimension.

use cl_dataset::DimensionClass;

const DIMENSION_SEPARATOR: char = '_';

/// Checked in order; `pp` must come before `p`.
const PREFIX_RULES: [(&str, DimensionClass); 4] = [
    ("pp", DimensionClass::Pp),
    ("p", DimensionClass::P),
    ("n", DimensionClass::N),
    ("t", DimensionClass::T),
];

/// The topology name part describing dimension `index`.
pub fn dimension_token(topology: &str, index: usize) -> Option<&str> {
    topology.split(DIMENSION_SEPARATOR).nth(index)
}

pub fn dimension_count(topology: &str) -> usize {
    topology.split(DIMENSION_SEPARATOR).count()
}

pub fn classify_token(token: &str) -> Option<DimensionClass> {
    PREFIX_RULES
        .iter()
        .find(|(prefix, _)| token.starts_with(*prefix))
        .map(|(_, class)| *class)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pp_prefix_always_classifies_as_pp(rest in "[A-Za-z0-9]{0,12}") {
            prop_assert_eq!(classify_token(&format!("pp{rest}")), Some(DimensionClass::Pp));
        }
    }
}
