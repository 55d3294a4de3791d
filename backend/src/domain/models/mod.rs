pub mod breeding_pair;
pub mod credential;
pub mod reminder;
pub mod session;
