//! Data models: the delivery record and the rule file.

pub mod config;
pub mod record;

pub use config::RuleConfig;
pub use record::{
    Closing, DeliveryRecord, EmptiesConfirmation, EmptiesDetail, EmptiesSummary, GoodsLine,
    GoodsTotal, StopTimestamps, TemperatureReading,
};
