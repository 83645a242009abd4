use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::technician_controller::TechnicianController;
use crate::dto::task_dto::TaskResponse;
use crate::dto::technician_dto::TechnicianResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_technician_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_technicians))
        .route("/:id/tasks", get(technician_tasks))
}

async fn list_technicians(
    State(state): State<AppState>,
) -> Result<Json<Vec<TechnicianResponse>>, AppError> {
    let controller = TechnicianController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn technician_tasks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let controller = TechnicianController::new(state.pool.clone());
    let response = controller.open_tasks(id).await?;
    Ok(Json(response))
}
