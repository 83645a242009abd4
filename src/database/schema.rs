//! Schema y seed de la base de datos
//!
//! Crea las tablas si no existen y siembra la flota de demostración la
//! primera vez que arranca el servicio (solo si la tabla de vehículos está
//! vacía).

use crate::utils::errors::AppResult;
use sqlx::PgPool;
use tracing::info;

/// Crear las tablas del sistema si no existen
pub async fn init_schema(pool: &PgPool) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicles(
            id TEXT PRIMARY KEY,
            vehicle_type TEXT NOT NULL,
            depot TEXT NOT NULL,
            mileage BIGINT NOT NULL DEFAULT 0,
            last_service DATE NOT NULL,
            service_interval TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS technicians(
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            depot TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks(
            id BIGSERIAL PRIMARY KEY,
            vehicle_id TEXT NOT NULL REFERENCES vehicles(id),
            scheduled_date DATE NOT NULL,
            assigned_tech_id BIGINT REFERENCES technicians(id),
            depot TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            completed_at TIMESTAMPTZ,
            signature TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS task_parts(
            id BIGSERIAL PRIMARY KEY,
            task_id BIGINT NOT NULL REFERENCES tasks(id),
            part_name TEXT NOT NULL,
            qty BIGINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS task_photos(
            id BIGSERIAL PRIMARY KEY,
            task_id BIGINT NOT NULL REFERENCES tasks(id),
            kind TEXT NOT NULL,
            filename TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("✅ Schema de base de datos verificado");
    Ok(())
}

/// Sembrar vehículos y técnicos de demostración si las tablas están vacías
pub async fn seed_demo_data(pool: &PgPool) -> AppResult<()> {
    let vehicle_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(pool)
        .await?;

    if vehicle_count == 0 {
        let vehicles: [(&str, &str, &str, i64, &str, &str); 10] = [
            ("TRK-001", "Truck", "Depot A", 125000, "2025-08-01", "Weekly"),
            ("VAN-205", "Van", "Depot A", 78000, "2025-08-10", "Bi-weekly"),
            ("MOTO-011", "Motorcycle", "Depot B", 15000, "2025-08-05", "Monthly"),
            ("CAR-078", "Car", "Depot B", 64000, "2025-08-12", "Weekly"),
            ("TRK-009", "Truck", "Depot A", 220000, "2025-08-07", "Monthly"),
            ("VAN-112", "Van", "Field Office", 54000, "2025-08-03", "Bi-weekly"),
            ("CAR-222", "Car", "Field Office", 33000, "2025-08-15", "Weekly"),
            ("TRK-104", "Truck", "Depot B", 98000, "2025-08-09", "Monthly"),
            ("MOTO-044", "Motorcycle", "Depot A", 8000, "2025-08-13", "Bi-weekly"),
            ("CAR-305", "Car", "Depot B", 45500, "2025-08-02", "Monthly"),
        ];

        for (id, vehicle_type, depot, mileage, last_service, service_interval) in vehicles {
            sqlx::query(
                r#"
                INSERT INTO vehicles(id, vehicle_type, depot, mileage, last_service, service_interval)
                VALUES($1, $2, $3, $4, $5::date, $6)
                "#,
            )
            .bind(id)
            .bind(vehicle_type)
            .bind(depot)
            .bind(mileage)
            .bind(last_service)
            .bind(service_interval)
            .execute(pool)
            .await?;
        }

        info!("🚚 Seed: {} vehículos de demostración creados", vehicles.len());
    }

    let tech_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM technicians")
        .fetch_one(pool)
        .await?;

    if tech_count == 0 {
        let technicians = [
            ("Aarav", "Depot A"),
            ("Isha", "Depot A"),
            ("Vihaan", "Depot B"),
            ("Sara", "Field Office"),
        ];

        for (name, depot) in technicians {
            sqlx::query("INSERT INTO technicians(name, depot) VALUES($1, $2)")
                .bind(name)
                .bind(depot)
                .execute(pool)
                .await?;
        }

        info!("🔧 Seed: {} técnicos de demostración creados", technicians.len());
    }

    Ok(())
}
