use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::PregnancyStatus;

/// Offspring are weaned this many days after delivery
pub const WEANING_OFFSET_DAYS: i64 = 21;

const PAIR_ID_PREFIX: &str = "Pair ";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreedingPair {
    pub pair_id: String,
    pub male_id: String,
    pub female_id: String,
    pub date_set_up: NaiveDate,
    pub pregnancy_status: PregnancyStatus,
    pub expected_delivery: Option<NaiveDate>,
    pub litter_size: u32,
}

impl BreedingPair {
    /// A freshly set up pair: not pregnant, no delivery date, empty litter
    pub fn new(pair_number: u64, male_id: String, female_id: String, date_set_up: NaiveDate) -> Self {
        Self {
            pair_id: Self::generate_id(pair_number),
            male_id,
            female_id,
            date_set_up,
            pregnancy_status: PregnancyStatus::NotPregnant,
            expected_delivery: None,
            litter_size: 0,
        }
    }

    pub fn generate_id(pair_number: u64) -> String {
        format!("{}{}", PAIR_ID_PREFIX, pair_number)
    }

    /// Extract N from an id of the form "Pair N"
    pub fn parse_pair_number(pair_id: &str) -> Option<u64> {
        pair_id
            .trim()
            .strip_prefix(PAIR_ID_PREFIX)
            .and_then(|n| n.trim().parse::<u64>().ok())
    }

    pub fn weaning_date(&self) -> Option<NaiveDate> {
        weaning_date(self.expected_delivery)
    }
}

/// Weaning happens a fixed number of days after the expected delivery.
pub fn weaning_date(expected_delivery: Option<NaiveDate>) -> Option<NaiveDate> {
    expected_delivery.map(|delivery| delivery + Duration::days(WEANING_OFFSET_DAYS))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BreedingError {
    #[error("Breeding pair not found: {0}")]
    PairNotFound(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weaning_date_is_three_weeks_after_delivery() {
        assert_eq!(weaning_date(Some(date(2024, 1, 22))), Some(date(2024, 2, 12)));
        assert_eq!(weaning_date(Some(date(2024, 2, 20))), Some(date(2024, 3, 12)));
        assert_eq!(weaning_date(None), None);
    }

    #[test]
    fn test_new_pair_defaults() {
        let pair = BreedingPair::new(4, "M004".to_string(), "F004".to_string(), date(2024, 3, 1));

        assert_eq!(pair.pair_id, "Pair 4");
        assert_eq!(pair.pregnancy_status, PregnancyStatus::NotPregnant);
        assert_eq!(pair.expected_delivery, None);
        assert_eq!(pair.litter_size, 0);
        assert_eq!(pair.weaning_date(), None);
    }

    #[test]
    fn test_parse_pair_number() {
        assert_eq!(BreedingPair::parse_pair_number("Pair 12"), Some(12));
        assert_eq!(BreedingPair::parse_pair_number(" Pair 3 "), Some(3));
        assert_eq!(BreedingPair::parse_pair_number("Cage 3"), None);
        assert_eq!(BreedingPair::parse_pair_number("Pair x"), None);
    }
}
