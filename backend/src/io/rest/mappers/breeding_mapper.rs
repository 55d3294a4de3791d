use chrono::NaiveDate;
use shared::{
    AddBreedingPairRequest, AddBreedingPairResponse, BreedingPair as BreedingPairDto,
    UpdatePregnancyStatusRequest, UpdatePregnancyStatusResponse,
};

use crate::domain::commands::breeding::{
    AddBreedingPairCommand, AddBreedingPairResult, UpdatePregnancyStatusCommand,
    UpdatePregnancyStatusResult,
};
use crate::domain::models::breeding_pair::{BreedingError, BreedingPair};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct BreedingMapper;

impl BreedingMapper {
    /// Parse an optional ISO date; blank counts as absent
    pub fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, BreedingError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Some)
                .map_err(|_| BreedingError::InvalidDate(value.to_string())),
            None => Ok(None),
        }
    }

    fn format_date(date: NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Convert a domain BreedingPair to the shared DTO, filling in the weaning date
    pub fn to_dto(domain: BreedingPair) -> BreedingPairDto {
        let weaning_date = domain.weaning_date().map(Self::format_date);
        BreedingPairDto {
            pair_id: domain.pair_id,
            male_id: domain.male_id,
            female_id: domain.female_id,
            date_set_up: Self::format_date(domain.date_set_up),
            pregnancy_status: domain.pregnancy_status,
            expected_delivery: domain.expected_delivery.map(Self::format_date),
            litter_size: domain.litter_size,
            weaning_date,
        }
    }

    pub fn to_dto_list(pairs: Vec<BreedingPair>) -> Vec<BreedingPairDto> {
        pairs.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_add_command(request: AddBreedingPairRequest) -> Result<AddBreedingPairCommand, BreedingError> {
        Ok(AddBreedingPairCommand {
            male_id: request.male_id,
            female_id: request.female_id,
            date_set_up: Self::parse_date(request.date_set_up.as_deref())?,
        })
    }

    pub fn to_add_response(result: AddBreedingPairResult) -> AddBreedingPairResponse {
        AddBreedingPairResponse {
            pair: Self::to_dto(result.pair),
            success_message: result.success_message,
        }
    }

    pub fn to_update_command(
        pair_id: String,
        request: UpdatePregnancyStatusRequest,
    ) -> Result<UpdatePregnancyStatusCommand, BreedingError> {
        Ok(UpdatePregnancyStatusCommand {
            pair_id,
            pregnancy_status: request.pregnancy_status,
            expected_delivery: Self::parse_date(request.expected_delivery.as_deref())?,
            litter_size: request.litter_size,
        })
    }

    pub fn to_update_response(result: UpdatePregnancyStatusResult) -> UpdatePregnancyStatusResponse {
        UpdatePregnancyStatusResponse {
            pair_id: result.pair_id,
            updated_count: result.updated_count,
            success_message: result.success_message,
        }
    }
}
