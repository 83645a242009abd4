use crate::dto::dashboard_dto::{DashboardResponse, GalleryItem, WorkloadEntry};
use crate::models::task::{STATUS_COMPLETED, STATUS_PENDING};
use crate::repositories::task_repository::TaskRepository;
use crate::utils::errors::AppResult;
use chrono::NaiveDate;
use sqlx::PgPool;

/// Tamaño de la galería de fotos recientes del panel
const GALLERY_LIMIT: i64 = 8;

pub struct DashboardController {
    tasks: TaskRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tasks: TaskRepository::new(pool),
        }
    }

    pub async fn overview(&self, today: NaiveDate) -> AppResult<DashboardResponse> {
        let total_tasks = self.tasks.total_count().await?;
        let completed_tasks = self.tasks.count_by_status(STATUS_COMPLETED).await?;
        let pending_tasks = self.tasks.count_by_status(STATUS_PENDING).await?;
        let overdue = self.tasks.overdue_count(today).await?;

        let workload = self
            .tasks
            .workload_by_technician()
            .await?
            .into_iter()
            .map(WorkloadEntry::from)
            .collect();

        let gallery = self
            .tasks
            .latest_after_photos(GALLERY_LIMIT)
            .await?
            .into_iter()
            .map(GalleryItem::from)
            .collect();

        Ok(DashboardResponse {
            total_tasks,
            completed_tasks,
            pending_tasks,
            overdue,
            workload,
            gallery,
        })
    }
}
