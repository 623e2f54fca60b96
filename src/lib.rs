//! IN100 Benefit Lookup API Library
//!
//! This library provides the core functionality for the IN100 benefit
//! lookup service: querying the external balance API, normalizing the raw
//! payload into a display-ready record, enriching it with bank registry
//! data, persisting a denormalized copy and exposing presentation/export
//! adapters over HTTP.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `export`: Presentation rows and clipboard serialization.
//! - `format`: Display formatting for dates, currency and age.
//! - `handlers`: HTTP request handlers and shared state.
//! - `lookup`: Query orchestration state machine.
//! - `models`: Raw, normalized and persistence data models.
//! - `normalize`: The raw → display record normalizer.
//! - `services`: External service clients (IN100, bank registry, persistence).
//! - `translate`: Coded enum → display label translators.

pub mod config;
pub mod errors;
pub mod export;
pub mod format;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod services;
pub mod translate;
