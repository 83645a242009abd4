//! Controllers de la API
//!
//! Orquestan repositorios y servicios hacia los DTOs de respuesta.

pub mod dashboard_controller;
pub mod task_controller;
pub mod technician_controller;
pub mod vehicle_controller;
