//! # CSV Breeding Repository
//!
//! Stores breeding pairs in `breeding_data.csv` at the root of the data
//! directory, one row per pair in insertion order.
//!
//! ## CSV Format
//!
//! ```csv
//! Breeding Pair,Male ID,Female ID,Date Set Up,Pregnancy Status,Expected Delivery,Litter Size
//! Pair 1,M001,F001,2024-01-01,Pregnant,2024-01-22,8
//! Pair 2,M002,F002,2024-01-05,Not Pregnant,,0
//! ```
//!
//! The weaning date is derived and never written. Extra columns in older files
//! (such as a stored `Weaning Date`) are ignored on read.
//!
//! Pair numbers come from `breeding_sequence.yaml`, which records the last
//! number handed out:
//!
//! ```yaml
//! last_pair_number: 3
//! updated_at: "2024-01-10T09:00:00Z"
//! ```
//!
//! ## Failure handling
//!
//! - Missing file: empty table.
//! - Unreadable or malformed file: logged as an error and replaced in memory by
//!   a fixed three-row sample table. The file itself is left untouched until the
//!   next write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use shared::PregnancyStatus;
use std::fs;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::connection::CsvConnection;
use crate::domain::models::breeding_pair::BreedingPair;
use crate::storage::traits::BreedingStorage;

pub const BREEDING_HEADER: [&str; 7] = [
    "Breeding Pair",
    "Male ID",
    "Female ID",
    "Date Set Up",
    "Pregnancy Status",
    "Expected Delivery",
    "Litter Size",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// CSV record structure for breeding pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BreedingRecord {
    #[serde(rename = "Breeding Pair")]
    pair_id: String,
    #[serde(rename = "Male ID")]
    male_id: String,
    #[serde(rename = "Female ID")]
    female_id: String,
    #[serde(rename = "Date Set Up")]
    date_set_up: String,
    #[serde(rename = "Pregnancy Status")]
    pregnancy_status: String,
    #[serde(rename = "Expected Delivery")]
    expected_delivery: String,
    #[serde(rename = "Litter Size")]
    litter_size: String,
}

impl From<&BreedingPair> for BreedingRecord {
    fn from(pair: &BreedingPair) -> Self {
        BreedingRecord {
            pair_id: pair.pair_id.clone(),
            male_id: pair.male_id.clone(),
            female_id: pair.female_id.clone(),
            date_set_up: pair.date_set_up.format(DATE_FORMAT).to_string(),
            pregnancy_status: pair.pregnancy_status.to_string(),
            expected_delivery: pair
                .expected_delivery
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            litter_size: pair.litter_size.to_string(),
        }
    }
}

impl TryFrom<BreedingRecord> for BreedingPair {
    type Error = anyhow::Error;

    fn try_from(record: BreedingRecord) -> Result<Self> {
        let date_set_up = parse_stored_date(&record.date_set_up)?
            .ok_or_else(|| anyhow::anyhow!("{}: missing Date Set Up", record.pair_id))?;
        let pregnancy_status = record
            .pregnancy_status
            .parse::<PregnancyStatus>()
            .map_err(|e| anyhow::anyhow!("{}: {}", record.pair_id, e))?;
        let expected_delivery = parse_stored_date(&record.expected_delivery)?;
        let litter_size = parse_litter_size(&record.litter_size)
            .with_context(|| format!("{}: bad Litter Size '{}'", record.pair_id, record.litter_size))?;

        Ok(BreedingPair {
            pair_id: record.pair_id,
            male_id: record.male_id,
            female_id: record.female_id,
            date_set_up,
            pregnancy_status,
            expected_delivery,
            litter_size,
        })
    }
}

/// Empty or null-like cells are `None`. A trailing time part is ignored.
fn parse_stored_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("nat") {
        return Ok(None);
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map(Some)
        .with_context(|| format!("Invalid date '{}'", raw))
}

/// Litter sizes may have been written as floats ("6.0"); anything negative or fractional is rejected.
fn parse_litter_size(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }
    let value = raw.parse::<f64>()?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        anyhow::bail!("litter size must be a non-negative whole number");
    }
    Ok(value as u32)
}

/// Pair number bookkeeping kept next to the table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct BreedingSequence {
    last_pair_number: u64,
    updated_at: String,
}

/// The table shown when the stored one cannot be read
pub fn sample_breeding_pairs() -> Vec<BreedingPair> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        BreedingPair {
            pair_id: "Pair 1".to_string(),
            male_id: "M001".to_string(),
            female_id: "F001".to_string(),
            date_set_up: date(2024, 1, 1),
            pregnancy_status: PregnancyStatus::Pregnant,
            expected_delivery: Some(date(2024, 1, 22)),
            litter_size: 8,
        },
        BreedingPair {
            pair_id: "Pair 2".to_string(),
            male_id: "M002".to_string(),
            female_id: "F002".to_string(),
            date_set_up: date(2024, 1, 5),
            pregnancy_status: PregnancyStatus::NotPregnant,
            expected_delivery: None,
            litter_size: 0,
        },
        BreedingPair {
            pair_id: "Pair 3".to_string(),
            male_id: "M003".to_string(),
            female_id: "F003".to_string(),
            date_set_up: date(2024, 1, 10),
            pregnancy_status: PregnancyStatus::Pregnant,
            expected_delivery: Some(date(2024, 2, 1)),
            litter_size: 6,
        },
    ]
}

#[derive(Clone)]
pub struct BreedingRepository {
    connection: CsvConnection,
    write_lock: Arc<Mutex<()>>,
}

impl BreedingRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Strict parse of the stored table. Errors on any malformed row.
    fn parse_pairs(content: &str) -> Result<Vec<BreedingPair>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(content.as_bytes());

        let mut pairs = Vec::new();
        for result in reader.deserialize::<BreedingRecord>() {
            let record = result?;
            pairs.push(BreedingPair::try_from(record)?);
        }
        Ok(pairs)
    }

    /// Read the table, falling back to the sample data when the file is unusable
    fn read_pairs(&self) -> Vec<BreedingPair> {
        let path = self.connection.breeding_file_path();
        if !path.exists() {
            debug!("No breeding file at {}, starting with an empty table", path.display());
            return Vec::new();
        }

        let loaded = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|content| {
                if content.trim().is_empty() {
                    Ok(Vec::new())
                } else {
                    Self::parse_pairs(&content)
                }
            });

        match loaded {
            Ok(pairs) => {
                debug!("Loaded {} breeding pairs from {}", pairs.len(), path.display());
                pairs
            }
            Err(e) => {
                error!(
                    "Breeding data at {} is unreadable ({:#}); substituting the built-in sample table",
                    path.display(),
                    e
                );
                sample_breeding_pairs()
            }
        }
    }

    fn write_pairs(&self, pairs: &[BreedingPair]) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(BREEDING_HEADER)?;
        for pair in pairs {
            writer.serialize(BreedingRecord::from(pair))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush breeding CSV: {}", e))?;

        self.connection
            .write_atomically(&self.connection.breeding_file_path(), &bytes)?;
        debug!("Wrote {} breeding pairs", pairs.len());
        Ok(())
    }

    /// A corrupt sequence file counts as empty; the table's own highest
    /// pair number then keeps allocation from going backwards.
    fn read_sequence(&self) -> Result<BreedingSequence> {
        let path = self.connection.breeding_sequence_file_path();
        if !path.exists() {
            return Ok(BreedingSequence::default());
        }
        let yaml = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match serde_yaml::from_str(&yaml) {
            Ok(sequence) => Ok(sequence),
            Err(e) => {
                error!(
                    "Invalid pair sequence file {}: {}. Continuing from the table's highest pair number.",
                    path.display(),
                    e
                );
                Ok(BreedingSequence::default())
            }
        }
    }

    fn write_sequence(&self, sequence: &BreedingSequence) -> Result<()> {
        let yaml = serde_yaml::to_string(sequence)?;
        self.connection
            .write_atomically(&self.connection.breeding_sequence_file_path(), yaml.as_bytes())
    }
}

#[async_trait]
impl BreedingStorage for BreedingRepository {
    async fn list_pairs(&self) -> Result<Vec<BreedingPair>> {
        Ok(self.read_pairs())
    }

    async fn allocate_pair_number(&self) -> Result<u64> {
        let _guard = self.write_lock.lock().await;

        let highest_in_table = self
            .read_pairs()
            .iter()
            .filter_map(|pair| BreedingPair::parse_pair_number(&pair.pair_id))
            .max()
            .unwrap_or(0);
        let sequence = self.read_sequence()?;
        let next = sequence.last_pair_number.max(highest_in_table) + 1;

        self.write_sequence(&BreedingSequence {
            last_pair_number: next,
            updated_at: Utc::now().to_rfc3339(),
        })?;

        debug!("Allocated pair number {}", next);
        Ok(next)
    }

    async fn store_pair(&self, pair: &BreedingPair) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut pairs = self.read_pairs();
        pairs.push(pair.clone());
        self.write_pairs(&pairs)?;

        info!("Stored breeding pair {} ({} x {})", pair.pair_id, pair.male_id, pair.female_id);
        Ok(())
    }

    async fn update_pair_status(
        &self,
        pair_id: &str,
        status: PregnancyStatus,
        expected_delivery: Option<NaiveDate>,
        litter_size: u32,
    ) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut pairs = self.read_pairs();
        let mut updated = 0;
        for pair in pairs.iter_mut().filter(|pair| pair.pair_id == pair_id) {
            pair.pregnancy_status = status;
            pair.expected_delivery = expected_delivery;
            pair.litter_size = litter_size;
            updated += 1;
        }

        if updated > 0 {
            self.write_pairs(&pairs)?;
            info!("Updated {} row(s) for {}", updated, pair_id);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pair(number: u64, male: &str, female: &str) -> BreedingPair {
        BreedingPair::new(number, male.to_string(), female.to_string(), date(2024, 3, 1))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_table() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        assert!(repo.list_pairs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_written_file_has_exact_header_and_empty_delivery_cell() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        repo.store_pair(&pair(1, "M001", "F001")).await.unwrap();

        let content = fs::read_to_string(env.connection.breeding_file_path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("Breeding Pair,Male ID,Female ID,Date Set Up,Pregnancy Status,Expected Delivery,Litter Size")
        );
        assert_eq!(lines.next(), Some("Pair 1,M001,F001,2024-03-01,Not Pregnant,,0"));
    }

    #[tokio::test]
    async fn test_round_trip_preserves_every_field() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        let mut pregnant = pair(1, "M001", "F001");
        pregnant.pregnancy_status = PregnancyStatus::Pregnant;
        pregnant.expected_delivery = Some(date(2024, 3, 21));
        pregnant.litter_size = 7;
        let open = pair(2, "M, \"quoted\"", "F002");

        repo.store_pair(&pregnant).await.unwrap();
        repo.store_pair(&open).await.unwrap();

        let reopened = BreedingRepository::new(env.connection.clone());
        assert_eq!(reopened.list_pairs().await.unwrap(), vec![pregnant, open]);
    }

    #[tokio::test]
    async fn test_reads_files_with_extra_columns_and_timestamps() {
        let env = TestEnvironment::new().await.unwrap();
        fs::write(
            env.connection.breeding_file_path(),
            "Breeding Pair,Male ID,Female ID,Date Set Up,Pregnancy Status,Expected Delivery,Litter Size,Weaning Date\n\
             Pair 1,M001,F001,2024-01-01 00:00:00,Pregnant,2024-01-22 00:00:00,8.0,2024-02-12\n\
             Pair 2,M002,F002,2024-01-05,Not Pregnant,,0,\n",
        )
        .unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        let pairs = repo.list_pairs().await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].date_set_up, date(2024, 1, 1));
        assert_eq!(pairs[0].expected_delivery, Some(date(2024, 1, 22)));
        assert_eq!(pairs[0].litter_size, 8);
        assert_eq!(pairs[1].expected_delivery, None);
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back_to_sample_table() {
        let env = TestEnvironment::new().await.unwrap();
        fs::write(
            env.connection.breeding_file_path(),
            "Breeding Pair,Male ID\nPair 1,M001\n",
        )
        .unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        let pairs = repo.list_pairs().await.unwrap();
        assert_eq!(pairs, sample_breeding_pairs());
        assert_eq!(pairs[0].weaning_date(), Some(date(2024, 2, 12)));
    }

    #[tokio::test]
    async fn test_bad_status_value_falls_back_to_sample_table() {
        let env = TestEnvironment::new().await.unwrap();
        fs::write(
            env.connection.breeding_file_path(),
            format!("{}\nPair 1,M001,F001,2024-01-01,Maybe,,0\n", BREEDING_HEADER.join(",")),
        )
        .unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        assert_eq!(repo.list_pairs().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_changes_only_matching_rows() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = BreedingRepository::new(env.connection.clone());
        let first = pair(1, "M001", "F001");
        let second = pair(2, "M002", "F002");
        repo.store_pair(&first).await.unwrap();
        repo.store_pair(&second).await.unwrap();

        let updated = repo
            .update_pair_status("Pair 2", PregnancyStatus::Pregnant, Some(date(2024, 3, 1)), 6)
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let pairs = repo.list_pairs().await.unwrap();
        assert_eq!(pairs[0], first);
        assert_eq!(pairs[1].pregnancy_status, PregnancyStatus::Pregnant);
        assert_eq!(pairs[1].expected_delivery, Some(date(2024, 3, 1)));
        assert_eq!(pairs[1].litter_size, 6);
        assert_eq!(pairs[1].male_id, "M002");
    }

    #[tokio::test]
    async fn test_update_touches_every_row_sharing_an_id() {
        let env = TestEnvironment::new().await.unwrap();
        fs::write(
            env.connection.breeding_file_path(),
            format!(
                "{}\nPair 1,M001,F001,2024-01-01,Not Pregnant,,0\nPair 1,M009,F009,2024-01-02,Not Pregnant,,0\n",
                BREEDING_HEADER.join(",")
            ),
        )
        .unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        let updated = repo
            .update_pair_status("Pair 1", PregnancyStatus::Pregnant, None, 3)
            .await
            .unwrap();
        assert_eq!(updated, 2);
    }

    #[tokio::test]
    async fn test_update_unknown_pair_writes_nothing() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        let updated = repo
            .update_pair_status("Pair 9", PregnancyStatus::Pregnant, None, 3)
            .await
            .unwrap();
        assert_eq!(updated, 0);
        assert!(!env.connection.breeding_file_path().exists());
    }

    #[tokio::test]
    async fn test_pair_numbers_are_monotonic_and_never_reused() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        assert_eq!(repo.allocate_pair_number().await.unwrap(), 1);
        assert_eq!(repo.allocate_pair_number().await.unwrap(), 2);

        // Table written by hand with a higher id than the sequence knows about
        fs::write(
            env.connection.breeding_file_path(),
            format!("{}\nPair 7,M007,F007,2024-01-01,Not Pregnant,,0\n", BREEDING_HEADER.join(",")),
        )
        .unwrap();
        assert_eq!(repo.allocate_pair_number().await.unwrap(), 8);

        // Rows disappearing does not bring numbers back
        fs::remove_file(env.connection.breeding_file_path()).unwrap();
        assert_eq!(repo.allocate_pair_number().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_corrupt_sequence_file_falls_back_to_table() {
        let env = TestEnvironment::new().await.unwrap();
        fs::write(
            env.connection.breeding_file_path(),
            format!("{}\nPair 4,M004,F004,2024-01-01,Not Pregnant,,0\n", BREEDING_HEADER.join(",")),
        )
        .unwrap();
        fs::write(env.connection.breeding_sequence_file_path(), "last_pair_number: [oops\n").unwrap();
        let repo = BreedingRepository::new(env.connection.clone());

        assert_eq!(repo.allocate_pair_number().await.unwrap(), 5);

        // The sequence file is rewritten in good shape
        let yaml = fs::read_to_string(env.connection.breeding_sequence_file_path()).unwrap();
        let sequence: BreedingSequence = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(sequence.last_pair_number, 5);
        assert_eq!(repo.allocate_pair_number().await.unwrap(), 6);
    }

    #[test]
    fn test_parse_litter_size() {
        assert_eq!(parse_litter_size("6").unwrap(), 6);
        assert_eq!(parse_litter_size("6.0").unwrap(), 6);
        assert_eq!(parse_litter_size("").unwrap(), 0);
        assert!(parse_litter_size("-1").is_err());
        assert!(parse_litter_size("2.5").is_err());
        assert!(parse_litter_size("many").is_err());
    }
}
