use crate::models::technician::Technician;
use crate::utils::errors::AppResult;
use sqlx::PgPool;

pub struct TechnicianRepository {
    pool: PgPool,
}

impl TechnicianRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listado en orden estable de id. El motor de asignación depende de
    /// este orden para el desempate "primero en el orden de entrada".
    pub async fn list_all(&self) -> AppResult<Vec<Technician>> {
        let technicians = sqlx::query_as::<_, Technician>("SELECT * FROM technicians ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(technicians)
    }

    /// Listado alfabético para las vistas de consulta.
    pub async fn list_by_name(&self) -> AppResult<Vec<Technician>> {
        let technicians =
            sqlx::query_as::<_, Technician>("SELECT * FROM technicians ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(technicians)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Technician>> {
        let technician =
            sqlx::query_as::<_, Technician>("SELECT * FROM technicians WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(technician)
    }
}
