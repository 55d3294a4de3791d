//! Breeding table presentation logic.
//!
//! Turns the stored pairs into what the screens show: the recent-pairs table
//! with derived weaning dates, the choices offered by the status update form,
//! and the series behind the litter size charts. Everything here is a pure
//! function of the pair list.

use chrono::NaiveDate;
use shared::{
    BreedingTableResponse, BreedingTableRow, LitterChartResponse, LitterPoint, LitterSeries,
    PairChoicesResponse, StatusLitterBar,
};
use std::collections::HashSet;

use crate::domain::models::breeding_pair::BreedingPair;

pub const DATE_SET_UP_SERIES: &str = "Date Set Up";
pub const EXPECTED_DELIVERY_SERIES: &str = "Expected Delivery";
pub const WEANING_DATE_SERIES: &str = "Weaning Date";

#[derive(Debug, Clone, PartialEq)]
pub struct BreedingTableConfig {
    /// Rows shown when the caller does not ask for a specific count
    pub default_row_limit: usize,
    /// How many of the latest pairs feed the status/litter bar chart
    pub chart_window: usize,
}

impl Default for BreedingTableConfig {
    fn default() -> Self {
        Self {
            default_row_limit: 5,
            chart_window: 10,
        }
    }
}

#[derive(Clone)]
pub struct BreedingTableService {
    config: BreedingTableConfig,
}

impl BreedingTableService {
    pub fn new() -> Self {
        Self {
            config: BreedingTableConfig::default(),
        }
    }

    pub fn with_config(config: BreedingTableConfig) -> Self {
        Self { config }
    }

    fn format_date(date: Option<NaiveDate>) -> String {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn format_row(&self, pair: &BreedingPair) -> BreedingTableRow {
        BreedingTableRow {
            pair_id: pair.pair_id.clone(),
            male_id: pair.male_id.clone(),
            female_id: pair.female_id.clone(),
            date_set_up: Self::format_date(Some(pair.date_set_up)),
            pregnancy_status: pair.pregnancy_status.to_string(),
            expected_delivery: Self::format_date(pair.expected_delivery),
            litter_size: pair.litter_size,
            weaning_date: Self::format_date(pair.weaning_date()),
        }
    }

    /// The most recent `limit` pairs (default from config), oldest first
    pub fn build_table(&self, pairs: &[BreedingPair], limit: Option<usize>) -> BreedingTableResponse {
        let limit = limit.unwrap_or(self.config.default_row_limit);
        let start = pairs.len().saturating_sub(limit);

        BreedingTableResponse {
            rows: pairs[start..].iter().map(|pair| self.format_row(pair)).collect(),
            total_pairs: pairs.len(),
        }
    }

    /// Pair ids for the update form, most recently added first, each id once
    pub fn pair_choices(&self, pairs: &[BreedingPair]) -> PairChoicesResponse {
        let mut seen = HashSet::new();
        let pair_ids = pairs
            .iter()
            .rev()
            .filter(|pair| seen.insert(pair.pair_id.as_str()))
            .map(|pair| pair.pair_id.clone())
            .collect();

        PairChoicesResponse { pair_ids }
    }

    /// Bars: litter size by status over the latest pairs.
    /// Lines: litter size against each of the three dates, sorted by date,
    /// leaving out pairs where that date is unset.
    pub fn litter_chart(&self, pairs: &[BreedingPair]) -> LitterChartResponse {
        let start = pairs.len().saturating_sub(self.config.chart_window);
        let status_bars = pairs[start..]
            .iter()
            .map(|pair| StatusLitterBar {
                pair_id: pair.pair_id.clone(),
                pregnancy_status: pair.pregnancy_status,
                litter_size: pair.litter_size,
            })
            .collect();

        let date_series = vec![
            Self::series(DATE_SET_UP_SERIES, pairs, |pair| Some(pair.date_set_up)),
            Self::series(EXPECTED_DELIVERY_SERIES, pairs, |pair| pair.expected_delivery),
            Self::series(WEANING_DATE_SERIES, pairs, |pair| pair.weaning_date()),
        ];

        LitterChartResponse {
            status_bars,
            date_series,
        }
    }

    fn series<F>(label: &str, pairs: &[BreedingPair], date_of: F) -> LitterSeries
    where
        F: Fn(&BreedingPair) -> Option<NaiveDate>,
    {
        let mut points: Vec<(NaiveDate, u32)> = pairs
            .iter()
            .filter_map(|pair| date_of(pair).map(|date| (date, pair.litter_size)))
            .collect();
        points.sort_by_key(|(date, _)| *date);

        LitterSeries {
            label: label.to_string(),
            points: points
                .into_iter()
                .map(|(date, litter_size)| LitterPoint {
                    date: date.format("%Y-%m-%d").to_string(),
                    litter_size,
                })
                .collect(),
        }
    }
}

impl Default for BreedingTableService {
    fn default() -> Self {
        Self::new()
    }
}
