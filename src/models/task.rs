//! Modelo de Task y sus hijos
//!
//! Una tarea de mantenimiento referencia exactamente un vehículo y, una vez
//! asignada, un técnico. El estado es un string libre con valores estándar
//! `pending` / `completed`; el motor no valida valores adicionales (se
//! registran en el log en lugar de rechazarse).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub vehicle_id: String,
    pub scheduled_date: NaiveDate,
    pub assigned_tech_id: Option<i64>,
    /// Depot copiado del vehículo en el momento de la creación; no se
    /// re-deriva después aunque el vehículo cambie de depot.
    pub depot: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub signature: Option<String>,
}

/// Solicitud de creación emitida por el generador de tareas. El llamador
/// la persiste antes de cualquier lectura dependiente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    pub vehicle_id: String,
    pub scheduled_date: NaiveDate,
    pub depot: String,
    pub status: String,
}

/// Pieza consumida al completar una tarea. El conjunto completo se
/// reemplaza en cada envío de completado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskPart {
    pub id: i64,
    pub task_id: i64,
    pub part_name: String,
    pub qty: i64,
}

/// Foto de evidencia. Append-only: nunca se reemplazan las anteriores.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskPhoto {
    pub id: i64,
    pub task_id: i64,
    pub kind: String,
    pub filename: String,
}

/// Los dos tipos fijos de foto de evidencia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Before,
    After,
}

impl PhotoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoKind::Before => "before",
            PhotoKind::After => "after",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "before" => Some(PhotoKind::Before),
            "after" => Some(PhotoKind::After),
            _ => None,
        }
    }
}
