//! staffing-core: team analytics over an employee roster.
//!
//! Profiles, candidate matching, narrative team analysis, effectiveness,
//! capacity forecasting and skill gaps. Entry point for hosts is
//! `analytics_service::AnalyticsService`.

pub mod analytics_service;
pub mod capacity;
pub mod clock;
pub mod config;
pub mod effectiveness;
pub mod employee;
pub mod error;
pub mod match_scorer;
pub mod profile_aggregator;
pub mod rng;
pub mod roster;
pub mod skill_gap;
pub mod store;
pub mod team_analysis;
pub mod team_analyzer;
pub mod team_profile;
pub mod types;
