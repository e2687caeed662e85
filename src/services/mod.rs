pub mod badges;
pub mod calendar;
pub mod contests;
pub mod heatmap;
pub mod judge;
pub mod quotes;
pub mod revision_queue;
pub mod rollover;
pub mod scoring;
pub mod tracker;
