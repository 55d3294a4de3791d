//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Handlers live
//! in `rest`, one file per resource, each exposing a `router()` that the
//! crate root nests under `/api`.

pub mod rest;
