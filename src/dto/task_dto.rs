//! DTOs de tareas y envoltorio genérico de la API

use crate::models::task::{Task, TaskPart, TaskPhoto};
use crate::repositories::task_repository::TaskWithContext;
use serde::{Deserialize, Serialize};

/// Respuesta genérica de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Tarea con su contexto unido, para listados
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub depot: String,
    pub scheduled_date: String,
    pub assigned_tech_id: Option<i64>,
    pub tech_name: Option<String>,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub signature: Option<String>,
}

impl From<TaskWithContext> for TaskResponse {
    fn from(task: TaskWithContext) -> Self {
        Self {
            id: task.id,
            vehicle_id: task.vehicle_id,
            vehicle_type: task.vehicle_type,
            depot: task.depot,
            scheduled_date: task.scheduled_date.to_string(),
            assigned_tech_id: task.assigned_tech_id,
            tech_name: task.tech_name,
            status: task.status,
            created_at: task.created_at.to_rfc3339(),
            completed_at: task.completed_at.map(|t| t.to_rfc3339()),
            signature: task.signature,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskPartResponse {
    pub part_name: String,
    pub qty: i64,
}

impl From<TaskPart> for TaskPartResponse {
    fn from(part: TaskPart) -> Self {
        Self {
            part_name: part.part_name,
            qty: part.qty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskPhotoResponse {
    pub kind: String,
    pub filename: String,
}

impl From<TaskPhoto> for TaskPhotoResponse {
    fn from(photo: TaskPhoto) -> Self {
        Self {
            kind: photo.kind,
            filename: photo.filename,
        }
    }
}

/// Detalle de una tarea con piezas y fotos
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    pub id: i64,
    pub vehicle_id: String,
    pub depot: String,
    pub scheduled_date: String,
    pub assigned_tech_id: Option<i64>,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub signature: Option<String>,
    pub parts: Vec<TaskPartResponse>,
    pub photos: Vec<TaskPhotoResponse>,
}

impl TaskDetailResponse {
    pub fn from_parts(task: Task, parts: Vec<TaskPart>, photos: Vec<TaskPhoto>) -> Self {
        Self {
            id: task.id,
            vehicle_id: task.vehicle_id,
            depot: task.depot,
            scheduled_date: task.scheduled_date.to_string(),
            assigned_tech_id: task.assigned_tech_id,
            status: task.status,
            created_at: task.created_at.to_rfc3339(),
            completed_at: task.completed_at.map(|t| t.to_rfc3339()),
            signature: task.signature,
            parts: parts.into_iter().map(TaskPartResponse::from).collect(),
            photos: photos.into_iter().map(TaskPhotoResponse::from).collect(),
        }
    }
}

/// Request del disparador de generación; `today` permite ejecuciones
/// deterministas (formato `YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize)]
pub struct GenerateTasksRequest {
    pub today: Option<String>,
}

/// Reporte del disparador de generación
#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub created: usize,
}

/// Reporte del lote de auto-asignación; `skipped` cuenta las tareas que
/// quedaron sin técnico por falta de capacidad (no es un error).
#[derive(Debug, Serialize)]
pub struct AssignmentReport {
    pub assigned: usize,
    pub skipped: usize,
}
