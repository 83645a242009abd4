use crate::dto::task_dto::TaskResponse;
use crate::dto::technician_dto::TechnicianResponse;
use crate::repositories::task_repository::TaskRepository;
use crate::repositories::technician_repository::TechnicianRepository;
use crate::utils::errors::{not_found_error, AppResult};
use sqlx::PgPool;

pub struct TechnicianController {
    technicians: TechnicianRepository,
    tasks: TaskRepository,
}

impl TechnicianController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            technicians: TechnicianRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool),
        }
    }

    /// Listado alfabético con la carga activa de cada técnico
    pub async fn list(&self) -> AppResult<Vec<TechnicianResponse>> {
        let technicians = self.technicians.list_by_name().await?;
        let counts = self.tasks.active_counts().await?;

        Ok(technicians
            .into_iter()
            .map(|technician| {
                let active = counts.get(&technician.id).copied().unwrap_or(0);
                TechnicianResponse::with_load(technician, active)
            })
            .collect())
    }

    /// Tareas abiertas de un técnico, las más próximas primero
    pub async fn open_tasks(&self, technician_id: i64) -> AppResult<Vec<TaskResponse>> {
        self.technicians
            .find_by_id(technician_id)
            .await?
            .ok_or_else(|| not_found_error("Technician", &technician_id.to_string()))?;

        let tasks = self.tasks.list_open_for_technician(technician_id).await?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }
}
