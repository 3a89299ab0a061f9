//! Map a free-text vehicle or model name onto a bookable `VehicleClass`.

use crate::types::VehicleClass;

const FIRST_TOKENS: &[&str] = &["first", "s class", "s klasse", "maybach"];
const XL_TOKENS: &[&str] = &[
    "xl",
    "xxl",
    "extra large",
    "v class",
    "v klasse",
    "van",
    "minivan",
    "vito",
    "sprinter",
];

impl VehicleClass {
    /// Case-insensitive, word-aligned token match. Punctuation counts as a
    /// word break, so "S-Class" and "s class" are the same token but
    /// "Business Class" does not contain "s class". A token may carry a
    /// plural "s" ("Minivans").
    pub fn classify(name: &str) -> VehicleClass {
        let normalized = normalize(name);
        let has = |tokens: &[&str]| {
            tokens.iter().any(|t| {
                normalized.contains(&format!(" {t} ")) || normalized.contains(&format!(" {t}s "))
            })
        };

        if has(FIRST_TOKENS) {
            VehicleClass::First
        } else if has(XL_TOKENS) {
            VehicleClass::Xl
        } else {
            VehicleClass::Business
        }
    }
}

/// Lowercase, fold non-alphanumerics to single spaces, pad both ends.
fn normalize(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mercedes_models() {
        assert_eq!(VehicleClass::classify("Mercedes S-Class"), VehicleClass::First);
        assert_eq!(VehicleClass::classify("Mercedes V-Class"), VehicleClass::Xl);
        assert_eq!(VehicleClass::classify("Mercedes E-Class"), VehicleClass::Business);
    }

    #[test]
    fn category_names() {
        assert_eq!(VehicleClass::classify("First Class"), VehicleClass::First);
        assert_eq!(VehicleClass::classify("Business Class"), VehicleClass::Business);
        assert_eq!(VehicleClass::classify("Business XL"), VehicleClass::Xl);
        assert_eq!(VehicleClass::classify("MINIVAN"), VehicleClass::Xl);
    }

    #[test]
    fn extra_large_and_plurals_are_xl() {
        assert_eq!(VehicleClass::classify("Extra-Large Sedan"), VehicleClass::Xl);
        assert_eq!(VehicleClass::classify("Extra Large"), VehicleClass::Xl);
        assert_eq!(VehicleClass::classify("Minivans"), VehicleClass::Xl);
        assert_eq!(VehicleClass::classify("VW Vans"), VehicleClass::Xl);
        assert_eq!(VehicleClass::classify("Mercedes Sprinters"), VehicleClass::Xl);
    }

    #[test]
    fn tokens_must_be_whole_words() {
        assert_eq!(VehicleClass::classify("Aston Martin Vantage"), VehicleClass::Business);
        assert_eq!(VehicleClass::classify("Firstline sedan"), VehicleClass::Business);
    }

    #[test]
    fn empty_name_is_business() {
        assert_eq!(VehicleClass::classify(""), VehicleClass::Business);
        assert_eq!(VehicleClass::classify("   "), VehicleClass::Business);
    }

    #[test]
    fn first_wins_over_xl() {
        assert_eq!(VehicleClass::classify("First Class Van"), VehicleClass::First);
    }
}
