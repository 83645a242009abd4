//! DTOs del panel de control

use crate::repositories::task_repository::{GalleryRow, WorkloadRow};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WorkloadEntry {
    pub name: String,
    pub active: i64,
}

impl From<WorkloadRow> for WorkloadEntry {
    fn from(row: WorkloadRow) -> Self {
        Self {
            name: row.name,
            active: row.active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryItem {
    pub task_id: i64,
    pub vehicle_id: String,
    pub filename: String,
}

impl From<GalleryRow> for GalleryItem {
    fn from(row: GalleryRow) -> Self {
        Self {
            task_id: row.task_id,
            vehicle_id: row.vehicle_id,
            filename: row.filename,
        }
    }
}

/// Resumen del estado de la flota para el panel
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub overdue: i64,
    pub workload: Vec<WorkloadEntry>,
    pub gallery: Vec<GalleryItem>,
}
