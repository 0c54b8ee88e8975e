pub mod adcs;
pub mod api;
pub mod auth;
pub mod bcee;
pub mod bdii;
pub mod bpoc;
pub mod config;
pub mod controller;
pub mod domain;
pub mod flags;
pub mod moderation;
pub mod repo;
pub mod telemetry;
