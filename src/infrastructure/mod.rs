//! Infrastructure layer - gateway adapters, harness and services

pub mod dataset;
pub mod gateway;
pub mod harness;
pub mod logging;
pub mod services;
