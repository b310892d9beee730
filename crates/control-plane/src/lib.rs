// NightCtrl Control Plane Library
// Decision: Shared library for binaries (API server, seed tool, OpenAPI export) and integration tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Environment configuration
pub mod config;

// Services layer
pub mod services;
pub use services::{EventService, InsightService};

// Storage layer
pub mod storage;

// Demo data generator
pub mod seed;

// OpenAPI spec generation
pub mod openapi;
