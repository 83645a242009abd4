//! Generador de tareas de mantenimiento
//!
//! Deriva, para cada vehículo, si toca una tarea dentro del horizonte de
//! exploración (`hoy <= próximo vencimiento <= hoy + horizonte`, ambos
//! extremos incluidos) y suprime duplicados consultando al colaborador de
//! búsqueda de tareas existentes. La función central es pura: la fecha
//! "hoy" siempre la inyecta el llamador, nunca se lee el reloj aquí.

use crate::config::MaintenanceCatalog;
use crate::models::task::{NewTaskRequest, STATUS_PENDING};
use crate::models::vehicle::Vehicle;
use crate::repositories::task_repository::TaskRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppResult;
use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::{info, warn};

/// Calcula las solicitudes de tarea a emitir para un lote de vehículos.
///
/// `task_exists(vehicle_id, fecha)` es el colaborador de búsqueda: informa
/// si ya hay alguna tarea para ese par exacto, sin importar su estado.
/// Invocar dos veces seguidas con la salida de la primera ya persistida
/// produce cero solicitudes nuevas (contrato de idempotencia).
pub fn generate_due_tasks<F>(
    vehicles: &[Vehicle],
    catalog: &MaintenanceCatalog,
    task_exists: F,
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<NewTaskRequest>
where
    F: Fn(&str, NaiveDate) -> bool,
{
    let horizon_end = today + Duration::days(horizon_days);
    let mut requests = Vec::new();

    for vehicle in vehicles {
        let step = Duration::days(catalog.interval_days(&vehicle.service_interval));
        let next_due = vehicle.last_service + step;

        if next_due < today {
            // Registro obsoleto: no se genera retroactivamente ni se corrige.
            warn!(
                "⚠️ Vehículo {} con vencimiento pasado ({}) — sin tarea generada",
                vehicle.id, next_due
            );
            continue;
        }

        if next_due > horizon_end {
            continue;
        }

        if task_exists(&vehicle.id, next_due) {
            continue;
        }

        requests.push(NewTaskRequest {
            vehicle_id: vehicle.id.clone(),
            scheduled_date: next_due,
            depot: vehicle.depot.clone(),
            status: STATUS_PENDING.to_string(),
        });
    }

    requests
}

/// Orquesta una ejecución de generación contra el almacén.
pub struct SchedulingService {
    vehicles: VehicleRepository,
    tasks: TaskRepository,
    catalog: MaintenanceCatalog,
}

impl SchedulingService {
    pub fn new(pool: PgPool, catalog: MaintenanceCatalog) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool),
            catalog,
        }
    }

    /// Ejecuta una generación con la fecha inyectada por el llamador y
    /// persiste el lote completo antes de devolver el conteo.
    pub async fn run_generation(&self, today: NaiveDate) -> AppResult<usize> {
        let vehicles = self.vehicles.list_all().await?;
        let existing: HashSet<(String, NaiveDate)> =
            self.tasks.scheduled_pairs().await?.into_iter().collect();

        let requests = generate_due_tasks(
            &vehicles,
            &self.catalog,
            |vehicle_id, date| existing.contains(&(vehicle_id.to_string(), date)),
            today,
            self.catalog.horizon_days,
        );

        let created = self.tasks.insert_many(&requests).await?;
        info!(
            "📅 Generación: {} tarea(s) nuevas dentro de un horizonte de {} días",
            created, self.catalog.horizon_days
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str, depot: &str, last_service: NaiveDate, interval: &str) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            vehicle_type: "Truck".to_string(),
            depot: depot.to_string(),
            mileage: 50_000,
            last_service,
            service_interval: interval.to_string(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn no_tasks(_vehicle_id: &str, _date: NaiveDate) -> bool {
        false
    }

    #[test]
    fn due_exactly_today_is_generated() {
        let catalog = MaintenanceCatalog::default();
        let vehicles = vec![vehicle("TRK-001", "Depot A", d(2025, 8, 1), "Weekly")];

        let requests =
            generate_due_tasks(&vehicles, &catalog, no_tasks, d(2025, 8, 8), 30);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].vehicle_id, "TRK-001");
        assert_eq!(requests[0].scheduled_date, d(2025, 8, 8));
        assert_eq!(requests[0].depot, "Depot A");
        assert_eq!(requests[0].status, STATUS_PENDING);
    }

    #[test]
    fn due_one_day_in_the_past_is_not_generated() {
        let catalog = MaintenanceCatalog::default();
        let vehicles = vec![vehicle("TRK-001", "Depot A", d(2025, 8, 1), "Weekly")];

        // próximo vencimiento = 8 de agosto, hoy = 9 de agosto
        let requests =
            generate_due_tasks(&vehicles, &catalog, no_tasks, d(2025, 8, 9), 30);

        assert!(requests.is_empty());
    }

    #[test]
    fn due_on_horizon_end_is_generated() {
        let catalog = MaintenanceCatalog::default();
        // Monthly: vencimiento = 1 sep; hoy = 2 ago; horizonte termina el 1 sep
        let vehicles = vec![vehicle("CAR-305", "Depot B", d(2025, 8, 2), "Monthly")];

        let requests =
            generate_due_tasks(&vehicles, &catalog, no_tasks, d(2025, 8, 2), 30);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].scheduled_date, d(2025, 9, 1));
    }

    #[test]
    fn due_one_day_beyond_horizon_is_not_generated() {
        let catalog = MaintenanceCatalog::default();
        // Monthly: vencimiento = 1 sep; hoy = 1 ago; horizonte termina el 31 ago
        let vehicles = vec![vehicle("CAR-305", "Depot B", d(2025, 8, 2), "Monthly")];

        let requests =
            generate_due_tasks(&vehicles, &catalog, no_tasks, d(2025, 8, 1), 30);

        assert!(requests.is_empty());
    }

    #[test]
    fn existing_task_suppresses_duplicate_regardless_of_status() {
        let catalog = MaintenanceCatalog::default();
        let vehicles = vec![vehicle("TRK-001", "Depot A", d(2025, 8, 1), "Weekly")];

        // El colaborador responde por pares (vehículo, fecha) sin mirar el
        // estado, así que una tarea completada también suprime.
        let requests = generate_due_tasks(
            &vehicles,
            &catalog,
            |vehicle_id, date| vehicle_id == "TRK-001" && date == d(2025, 8, 8),
            d(2025, 8, 8),
            30,
        );

        assert!(requests.is_empty());
    }

    #[test]
    fn second_run_after_persisting_is_idempotent() {
        let catalog = MaintenanceCatalog::default();
        let vehicles = vec![
            vehicle("TRK-001", "Depot A", d(2025, 8, 1), "Weekly"),
            vehicle("VAN-205", "Depot A", d(2025, 8, 1), "Bi-weekly"),
        ];
        let today = d(2025, 8, 5);

        let mut persisted: HashSet<(String, NaiveDate)> = HashSet::new();
        let first = generate_due_tasks(
            &vehicles,
            &catalog,
            |v, date| persisted.contains(&(v.to_string(), date)),
            today,
            30,
        );
        assert_eq!(first.len(), 2);

        for request in &first {
            persisted.insert((request.vehicle_id.clone(), request.scheduled_date));
        }

        let second = generate_due_tasks(
            &vehicles,
            &catalog,
            |v, date| persisted.contains(&(v.to_string(), date)),
            today,
            30,
        );
        assert!(second.is_empty());
    }

    #[test]
    fn stale_vehicle_far_in_the_past_is_skipped() {
        let catalog = MaintenanceCatalog::default();
        let vehicles = vec![vehicle("TRK-009", "Depot A", d(2024, 1, 1), "Monthly")];

        let requests =
            generate_due_tasks(&vehicles, &catalog, no_tasks, d(2025, 8, 7), 30);

        assert!(requests.is_empty());
    }

    #[test]
    fn unknown_interval_tag_uses_default_cadence() {
        let catalog = MaintenanceCatalog::default();
        let vehicles = vec![vehicle("CAR-078", "Depot B", d(2025, 8, 1), "Quarterly")];

        // "Quarterly" no está en el catálogo: cae a 30 días
        let requests =
            generate_due_tasks(&vehicles, &catalog, no_tasks, d(2025, 8, 15), 30);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].scheduled_date, d(2025, 8, 31));
    }

    #[test]
    fn mixed_fleet_only_due_vehicles_emit() {
        let catalog = MaintenanceCatalog::default();
        let today = d(2025, 8, 20);
        let vehicles = vec![
            // vencida hace tiempo: omitida
            vehicle("TRK-001", "Depot A", d(2025, 8, 1), "Weekly"),
            // vence el 24 ago: dentro del horizonte
            vehicle("VAN-205", "Depot A", d(2025, 8, 10), "Bi-weekly"),
            // vence el 4 sep: dentro del horizonte
            vehicle("MOTO-011", "Depot B", d(2025, 8, 5), "Monthly"),
        ];

        let requests = generate_due_tasks(&vehicles, &catalog, no_tasks, today, 30);

        let ids: Vec<&str> = requests.iter().map(|r| r.vehicle_id.as_str()).collect();
        assert_eq!(ids, vec!["VAN-205", "MOTO-011"]);
    }
}
