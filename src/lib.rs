pub mod error;
pub mod features;
pub mod fetch;
pub mod ingest;
pub mod locations;
pub mod model;
pub mod output;
pub mod planner;
pub mod selector;
pub mod shipment;
pub mod simulate;
