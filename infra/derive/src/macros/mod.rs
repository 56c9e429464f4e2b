pub mod error;
pub mod event_map;
