pub mod assembly;
pub mod config;
pub mod number;
pub mod pipeline;
pub mod query;
pub mod random;
pub mod store;
pub mod validate;
pub mod wikidata;
