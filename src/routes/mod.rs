//! Routers de la API
//!
//! Un router por recurso, montados bajo /api (y /uploads para servir
//! las fotos almacenadas).

pub mod dashboard_routes;
pub mod task_routes;
pub mod technician_routes;
pub mod upload_routes;
pub mod vehicle_routes;
