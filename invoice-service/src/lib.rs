//! Invoice Service - create, update and delete invoices for the admin dashboard.

pub mod actions;
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod validation;
