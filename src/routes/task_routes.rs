use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;

use crate::controllers::task_controller::{CompletionForm, TaskController, UploadedPhoto};
use crate::dto::task_dto::{
    ApiResponse, AssignmentReport, GenerateTasksRequest, GenerationReport, TaskDetailResponse,
    TaskResponse,
};
use crate::models::task::PhotoKind;
use crate::services::completion_service::PartSelection;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_task_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks))
        .route("/generate", post(generate_tasks))
        .route("/auto-assign", post(auto_assign))
        .route("/:id", get(get_task))
        .route("/:id/complete", post(complete_task))
}

fn controller(state: &AppState) -> TaskController {
    TaskController::new(
        state.pool.clone(),
        state.catalog.clone(),
        state.storage.clone(),
    )
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let response = controller(&state).list().await?;
    Ok(Json(response))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDetailResponse>, AppError> {
    let response = controller(&state).detail(id).await?;
    Ok(Json(response))
}

async fn generate_tasks(
    State(state): State<AppState>,
    body: Option<Json<GenerateTasksRequest>>,
) -> Result<Json<ApiResponse<GenerationReport>>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let response = controller(&state).generate(request.today).await?;
    Ok(Json(response))
}

async fn auto_assign(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AssignmentReport>>, AppError> {
    let response = controller(&state).auto_assign().await?;
    Ok(Json(response))
}

/// Formulario de completado (multipart): campos `signature`, `status`,
/// `parts` repetido, `qty_<pieza con espacios como guiones bajos>` y los
/// archivos `before` / `after`.
async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<TaskDetailResponse>>, AppError> {
    let mut signature = String::new();
    let mut status: Option<String> = None;
    let mut selected_parts: Vec<String> = Vec::new();
    let mut quantities: HashMap<String, String> = HashMap::new();
    let mut uploads: Vec<UploadedPhoto> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "signature" => {
                signature = field.text().await.map_err(multipart_error)?.trim().to_string();
            }
            "status" => {
                let value = field.text().await.map_err(multipart_error)?;
                if !value.trim().is_empty() {
                    status = Some(value.trim().to_string());
                }
            }
            "parts" => {
                selected_parts.push(field.text().await.map_err(multipart_error)?);
            }
            "before" | "after" => {
                // from_field_name no puede fallar aquí, el match ya filtró
                let Some(kind) = PhotoKind::from_field_name(&name) else {
                    continue;
                };
                let original_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                if !original_name.is_empty() && !data.is_empty() {
                    uploads.push(UploadedPhoto {
                        kind,
                        original_name,
                        data: data.to_vec(),
                    });
                }
            }
            other if other.starts_with("qty_") => {
                let key = other.trim_start_matches("qty_").to_string();
                quantities.insert(key, field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    // La cantidad de cada pieza viaja en un campo con el nombre de la
    // pieza y los espacios como guiones bajos.
    let parts = selected_parts
        .into_iter()
        .map(|part_name| {
            let quantity = quantities.get(&part_name.replace(' ', "_")).cloned();
            PartSelection {
                name: part_name,
                quantity,
            }
        })
        .collect();

    let form = CompletionForm {
        signature,
        status,
        parts,
        uploads,
    };

    let response = controller(&state).complete(id, form).await?;
    Ok(Json(response))
}

fn multipart_error(error: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart payload: {}", error))
}
