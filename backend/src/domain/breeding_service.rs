use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::breeding::{
    AddBreedingPairCommand, AddBreedingPairResult, UpdatePregnancyStatusCommand,
    UpdatePregnancyStatusResult,
};
use crate::domain::models::breeding_pair::{BreedingError, BreedingPair};
use crate::storage::csv::{BreedingRepository, CsvConnection};
use crate::storage::traits::{BreedingStorage, Connection};

/// Breeding pair bookkeeping
#[derive(Clone)]
pub struct BreedingService {
    breeding_repository: BreedingRepository,
}

impl BreedingService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            breeding_repository: csv_conn.create_breeding_repository(),
        }
    }

    /// All pairs in the order they were set up
    pub async fn list_pairs(&self) -> Result<Vec<BreedingPair>> {
        self.breeding_repository.list_pairs().await
    }

    /// Set up a new pair: not pregnant, no delivery date, empty litter.
    pub async fn add_pair(&self, command: AddBreedingPairCommand) -> Result<AddBreedingPairResult> {
        let date_set_up = command
            .date_set_up
            .unwrap_or_else(|| Local::now().date_naive());
        let pair_number = self.breeding_repository.allocate_pair_number().await?;

        let pair = BreedingPair::new(
            pair_number,
            command.male_id.trim().to_string(),
            command.female_id.trim().to_string(),
            date_set_up,
        );
        self.breeding_repository.store_pair(&pair).await?;

        info!("Added breeding pair {}", pair.pair_id);
        Ok(AddBreedingPairResult {
            pair,
            success_message: "New breeding pair added!".to_string(),
        })
    }

    /// Overwrite status, expected delivery and litter size of a pair.
    /// Fails with `BreedingError::PairNotFound` if no row carries `pair_id`.
    pub async fn update_status(
        &self,
        command: UpdatePregnancyStatusCommand,
    ) -> Result<UpdatePregnancyStatusResult> {
        info!(
            "Updating {} to {} (delivery {:?}, litter {})",
            command.pair_id, command.pregnancy_status, command.expected_delivery, command.litter_size
        );

        let updated_count = self
            .breeding_repository
            .update_pair_status(
                &command.pair_id,
                command.pregnancy_status,
                command.expected_delivery,
                command.litter_size,
            )
            .await?;

        if updated_count == 0 {
            warn!("No breeding pair with id {}", command.pair_id);
            return Err(BreedingError::PairNotFound(command.pair_id).into());
        }
        if updated_count > 1 {
            warn!("{} rows share id {}; all were updated", updated_count, command.pair_id);
        }

        Ok(UpdatePregnancyStatusResult {
            pair_id: command.pair_id,
            updated_count,
            success_message: "Pregnancy status updated!".to_string(),
        })
    }
}
