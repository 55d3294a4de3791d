pub mod breeding_mapper;
pub mod reminder_mapper;
