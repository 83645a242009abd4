use crate::config::MaintenanceCatalog;
use crate::dto::task_dto::{
    ApiResponse, AssignmentReport, GenerationReport, TaskDetailResponse, TaskResponse,
};
use crate::models::task::PhotoKind;
use crate::repositories::task_repository::TaskRepository;
use crate::services::assignment_service::AssignmentService;
use crate::services::completion_service::{
    CompletionService, CompletionSubmission, PartSelection, PhotoAttachment,
};
use crate::services::photo_storage::PhotoStorage;
use crate::services::scheduling_service::SchedulingService;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_date;
use chrono::Utc;
use sqlx::PgPool;

/// Archivo subido en el formulario de completado
pub struct UploadedPhoto {
    pub kind: PhotoKind,
    pub original_name: String,
    pub data: Vec<u8>,
}

/// Campos ya extraídos del formulario multipart de completado
#[derive(Default)]
pub struct CompletionForm {
    pub signature: String,
    pub status: Option<String>,
    pub parts: Vec<PartSelection>,
    pub uploads: Vec<UploadedPhoto>,
}

pub struct TaskController {
    pool: PgPool,
    catalog: MaintenanceCatalog,
    storage: PhotoStorage,
}

impl TaskController {
    pub fn new(pool: PgPool, catalog: MaintenanceCatalog, storage: PhotoStorage) -> Self {
        Self {
            pool,
            catalog,
            storage,
        }
    }

    /// Disparador de generación. `today_override` permite ejecuciones
    /// manuales deterministas; sin él se usa el reloj del sistema.
    pub async fn generate(
        &self,
        today_override: Option<String>,
    ) -> AppResult<ApiResponse<GenerationReport>> {
        let today = match today_override {
            Some(raw) => validate_date(&raw).map_err(|_| {
                AppError::Validation(format!(
                    "Fecha inválida '{}', se espera formato YYYY-MM-DD",
                    raw
                ))
            })?,
            None => Utc::now().date_naive(),
        };

        let service = SchedulingService::new(self.pool.clone(), self.catalog.clone());
        let created = service.run_generation(today).await?;

        Ok(ApiResponse::success_with_message(
            GenerationReport { created },
            format!("Se generaron {} tarea(s) para el próximo mes", created),
        ))
    }

    pub async fn auto_assign(&self) -> AppResult<ApiResponse<AssignmentReport>> {
        let service = AssignmentService::new(self.pool.clone(), self.catalog.clone());
        let outcome = service.run_auto_assign().await?;

        let assigned = outcome.assignments.len();
        Ok(ApiResponse::success_with_message(
            AssignmentReport {
                assigned,
                skipped: outcome.skipped,
            },
            format!("Se auto-asignaron {} tarea(s)", assigned),
        ))
    }

    pub async fn list(&self) -> AppResult<Vec<TaskResponse>> {
        let tasks = TaskRepository::new(self.pool.clone())
            .list_with_context()
            .await?;

        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    pub async fn detail(&self, task_id: i64) -> AppResult<TaskDetailResponse> {
        let repository = TaskRepository::new(self.pool.clone());
        let task = repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| not_found_error("Task", &task_id.to_string()))?;

        let parts = repository.list_parts(task_id).await?;
        let photos = repository.list_photos(task_id).await?;
        Ok(TaskDetailResponse::from_parts(task, parts, photos))
    }

    /// Envío de completado: guarda los binarios aceptados, aplica la
    /// transición y devuelve el detalle resultante.
    pub async fn complete(
        &self,
        task_id: i64,
        form: CompletionForm,
    ) -> AppResult<ApiResponse<TaskDetailResponse>> {
        let repository = TaskRepository::new(self.pool.clone());
        repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| not_found_error("Task", &task_id.to_string()))?;

        let now = Utc::now();

        // Persistir los binarios antes de adjuntar las referencias; los
        // archivos rechazados devuelven None y se ignoran.
        let mut photos = Vec::new();
        for upload in &form.uploads {
            if let Some(filename) = self
                .storage
                .store(task_id, upload.kind, &upload.original_name, &upload.data, now)
                .await?
            {
                photos.push(PhotoAttachment {
                    kind: upload.kind,
                    filename,
                });
            }
        }

        let submission = CompletionSubmission {
            status: form.status,
            signature: form.signature,
            parts: form.parts,
            photos,
        };

        let service = CompletionService::new(self.pool.clone());
        let task = service.complete_task(task_id, submission, now).await?;

        let parts = repository.list_parts(task_id).await?;
        let task_photos = repository.list_photos(task_id).await?;

        Ok(ApiResponse::success_with_message(
            TaskDetailResponse::from_parts(task, parts, task_photos),
            "Tarea actualizada exitosamente".to_string(),
        ))
    }
}
