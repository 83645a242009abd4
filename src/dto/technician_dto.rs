//! DTOs de técnicos

use crate::models::technician::Technician;
use serde::Serialize;

/// Técnico con su carga activa actual
#[derive(Debug, Serialize)]
pub struct TechnicianResponse {
    pub id: i64,
    pub name: String,
    pub depot: String,
    pub active_tasks: i64,
}

impl TechnicianResponse {
    pub fn with_load(technician: Technician, active_tasks: i64) -> Self {
        Self {
            id: technician.id,
            name: technician.name,
            depot: technician.depot,
            active_tasks,
        }
    }
}
