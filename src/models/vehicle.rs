//! Modelo de Vehicle
//!
//! Mapea la tabla `vehicles`. Los vehículos se crean por seed o por un
//! flujo de gestión externo; el motor de planificación solo los lee.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehículo de la flota. El id es una clave estable legible ("TRK-001").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: String,
    pub vehicle_type: String,
    pub depot: String,
    pub mileage: i64,
    pub last_service: NaiveDate,
    /// Etiqueta de cadencia ("Weekly", "Bi-weekly", "Monthly"). Cualquier
    /// otra etiqueta cae al intervalo por defecto del catálogo.
    pub service_interval: String,
}
