//! Client-local persistence adapters.

pub mod profile_json;

pub use profile_json::ProfileJson;
