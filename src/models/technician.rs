//! Modelo de Technician
//!
//! Mapea la tabla `technicians`. Solo lectura para el motor de asignación.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Technician {
    pub id: i64,
    pub name: String,
    pub depot: String,
}
