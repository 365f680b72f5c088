//! Lot readiness scoring and TTB wine-premises reporting for winery production.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
