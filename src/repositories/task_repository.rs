use crate::models::task::{NewTaskRequest, PhotoKind, Task, TaskPart, TaskPhoto, STATUS_COMPLETED};
use crate::utils::errors::AppResult;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;

/// Fila de tarea con el contexto del vehículo y el técnico ya unido,
/// para los listados de consulta.
#[derive(Debug, sqlx::FromRow)]
pub struct TaskWithContext {
    pub id: i64,
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub depot: String,
    pub scheduled_date: NaiveDate,
    pub assigned_tech_id: Option<i64>,
    pub tech_name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub signature: Option<String>,
}

/// Carga activa por técnico para el panel de control.
#[derive(Debug, sqlx::FromRow)]
pub struct WorkloadRow {
    pub name: String,
    pub active: i64,
}

/// Foto "after" reciente de una tarea completada, para la galería.
#[derive(Debug, sqlx::FromRow)]
pub struct GalleryRow {
    pub task_id: i64,
    pub vehicle_id: String,
    pub filename: String,
}

pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    /// Pares (vehículo, fecha programada) de TODAS las tareas, sin importar
    /// su estado. Es el snapshot que consulta el generador para suprimir
    /// duplicados.
    pub async fn scheduled_pairs(&self) -> AppResult<Vec<(String, NaiveDate)>> {
        let pairs = sqlx::query_as::<_, (String, NaiveDate)>(
            "SELECT vehicle_id, scheduled_date FROM tasks",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(pairs)
    }

    /// Insertar las solicitudes emitidas por el generador en una sola
    /// transacción, de modo que una ejecución repetida vea el lote completo.
    pub async fn insert_many(&self, requests: &[NewTaskRequest]) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;

        for request in requests {
            sqlx::query(
                r#"
                INSERT INTO tasks(vehicle_id, scheduled_date, depot, status)
                VALUES($1, $2, $3, $4)
                "#,
            )
            .bind(&request.vehicle_id)
            .bind(request.scheduled_date)
            .bind(&request.depot)
            .bind(&request.status)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(requests.len())
    }

    /// Tareas sin asignar y no completadas, en orden ascendente de id
    /// (orden de creación). El motor de asignación depende de este orden.
    pub async fn list_unassigned_active(&self) -> AppResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE assigned_tech_id IS NULL AND status != $1
            ORDER BY id ASC
            "#,
        )
        .bind(STATUS_COMPLETED)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Conteo de tareas activas por técnico al inicio del lote de asignación.
    pub async fn active_counts(&self) -> AppResult<HashMap<i64, i64>> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT assigned_tech_id, COUNT(*) FROM tasks
            WHERE assigned_tech_id IS NOT NULL AND status != $1
            GROUP BY assigned_tech_id
            "#,
        )
        .bind(STATUS_COMPLETED)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Tareas activas de un técnico concreto (vista de técnicos).
    pub async fn active_count(&self, technician_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE assigned_tech_id = $1 AND status != $2",
        )
        .bind(technician_id)
        .bind(STATUS_COMPLETED)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Aplicar las decisiones de un lote de asignación en una sola
    /// transacción. Solo muta la referencia al técnico, nunca el estado.
    pub async fn assign_many(&self, assignments: &[(i64, i64)]) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;

        for (task_id, technician_id) in assignments {
            sqlx::query("UPDATE tasks SET assigned_tech_id = $2 WHERE id = $1")
                .bind(task_id)
                .bind(technician_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(assignments.len())
    }

    /// Transición de completado como unidad de trabajo: reemplaza el
    /// conjunto de piezas, añade las fotos aceptadas y muta la tarea, todo
    /// en una transacción.
    pub async fn apply_completion(
        &self,
        task_id: i64,
        status: &str,
        completed_at: DateTime<Utc>,
        signature: &str,
        parts: &[(String, i64)],
        photos: &[(PhotoKind, String)],
    ) -> AppResult<Task> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM task_parts WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        for (part_name, qty) in parts {
            sqlx::query("INSERT INTO task_parts(task_id, part_name, qty) VALUES($1, $2, $3)")
                .bind(task_id)
                .bind(part_name)
                .bind(qty)
                .execute(&mut *tx)
                .await?;
        }

        for (kind, filename) in photos {
            sqlx::query("INSERT INTO task_photos(task_id, kind, filename) VALUES($1, $2, $3)")
                .bind(task_id)
                .bind(kind.as_str())
                .bind(filename)
                .execute(&mut *tx)
                .await?;
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET status = $2, completed_at = $3, signature = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(task_id)
        .bind(status)
        .bind(completed_at)
        .bind(signature)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    pub async fn list_with_context(&self) -> AppResult<Vec<TaskWithContext>> {
        let tasks = sqlx::query_as::<_, TaskWithContext>(
            r#"
            SELECT t.id, t.vehicle_id, v.vehicle_type, t.depot, t.scheduled_date,
                   t.assigned_tech_id, te.name AS tech_name, t.status,
                   t.created_at, t.completed_at, t.signature
            FROM tasks t
            JOIN vehicles v ON v.id = t.vehicle_id
            LEFT JOIN technicians te ON te.id = t.assigned_tech_id
            ORDER BY t.scheduled_date DESC, t.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Tareas abiertas de un técnico, las más próximas primero.
    pub async fn list_open_for_technician(
        &self,
        technician_id: i64,
    ) -> AppResult<Vec<TaskWithContext>> {
        let tasks = sqlx::query_as::<_, TaskWithContext>(
            r#"
            SELECT t.id, t.vehicle_id, v.vehicle_type, t.depot, t.scheduled_date,
                   t.assigned_tech_id, te.name AS tech_name, t.status,
                   t.created_at, t.completed_at, t.signature
            FROM tasks t
            JOIN vehicles v ON v.id = t.vehicle_id
            LEFT JOIN technicians te ON te.id = t.assigned_tech_id
            WHERE t.assigned_tech_id = $1 AND t.status != $2
            ORDER BY t.scheduled_date ASC
            "#,
        )
        .bind(technician_id)
        .bind(STATUS_COMPLETED)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn list_parts(&self, task_id: i64) -> AppResult<Vec<TaskPart>> {
        let parts =
            sqlx::query_as::<_, TaskPart>("SELECT * FROM task_parts WHERE task_id = $1 ORDER BY id")
                .bind(task_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(parts)
    }

    pub async fn list_photos(&self, task_id: i64) -> AppResult<Vec<TaskPhoto>> {
        let photos = sqlx::query_as::<_, TaskPhoto>(
            "SELECT * FROM task_photos WHERE task_id = $1 ORDER BY id",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    pub async fn total_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn count_by_status(&self, status: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Tareas no completadas cuya fecha programada ya pasó.
    pub async fn overdue_count(&self, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE status != $1 AND scheduled_date < $2",
        )
        .bind(STATUS_COMPLETED)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Distribución de carga activa por técnico, ordenada por nombre.
    pub async fn workload_by_technician(&self) -> AppResult<Vec<WorkloadRow>> {
        let rows = sqlx::query_as::<_, WorkloadRow>(
            r#"
            SELECT technicians.name, COUNT(tasks.id) AS active
            FROM technicians
            LEFT JOIN tasks ON tasks.assigned_tech_id = technicians.id AND tasks.status != $1
            GROUP BY technicians.id, technicians.name
            ORDER BY technicians.name
            "#,
        )
        .bind(STATUS_COMPLETED)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Últimas fotos "after" de tareas completadas para la galería.
    pub async fn latest_after_photos(&self, limit: i64) -> AppResult<Vec<GalleryRow>> {
        let rows = sqlx::query_as::<_, GalleryRow>(
            r#"
            SELECT t.id AS task_id, v.id AS vehicle_id, tp.filename
            FROM tasks t
            JOIN vehicles v ON v.id = t.vehicle_id
            JOIN task_photos tp ON tp.task_id = t.id AND tp.kind = $1
            WHERE t.status = $2
            ORDER BY t.completed_at DESC
            LIMIT $3
            "#,
        )
        .bind(PhotoKind::After.as_str())
        .bind(STATUS_COMPLETED)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
