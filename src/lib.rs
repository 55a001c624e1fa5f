// Blog API - CRUD REST service for authors, pages and comments

// Ent Framework - Entity trait, schema system and form binding
pub mod ent_framework;

// Core types and primitives
pub mod core;

// Infrastructure - persistence gateway and unit of work
pub mod infrastructure;

// Schema Definitions - one validation schema per entity type
pub mod schemas;

pub mod entities;
pub mod models;

// Request handling
pub mod handlers;
pub mod controllers;

// Application shell
pub mod app_state;
pub mod config;
pub mod data_seeder;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
