//! Motor de auto-asignación
//!
//! Asigna tareas sin técnico aplicando la política de afinidad de depot,
//! límite de capacidad y menor carga. El lote es secuencial: cada
//! asignación queda visible en el contador antes de evaluar la siguiente
//! tarea de la misma ejecución. Quedarse sin capacidad no es un error:
//! la tarea se omite y se reporta como contador.

use crate::config::MaintenanceCatalog;
use crate::models::task::Task;
use crate::models::technician::Technician;
use crate::repositories::task_repository::TaskRepository;
use crate::repositories::technician_repository::TechnicianRepository;
use crate::utils::errors::AppResult;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, warn};

/// Contador de tareas activas por técnico durante un lote de asignación.
///
/// Se siembra con un conteo fresco del almacén al inicio del lote y se
/// incrementa con cada decisión, el equivalente en proceso a recontar
/// antes de cada tarea.
#[derive(Debug)]
pub struct WorkloadTracker {
    counts: HashMap<i64, i64>,
}

impl WorkloadTracker {
    pub fn new(initial: HashMap<i64, i64>) -> Self {
        Self { counts: initial }
    }

    pub fn active_count(&self, technician_id: i64) -> i64 {
        self.counts.get(&technician_id).copied().unwrap_or(0)
    }

    pub fn record_assignment(&mut self, technician_id: i64) {
        *self.counts.entry(technician_id).or_insert(0) += 1;
    }
}

/// Decisión de asignación aplicada a una tarea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub task_id: i64,
    pub technician_id: i64,
}

/// Resultado de un lote: pares aplicados y tareas que quedaron sin asignar.
#[derive(Debug, Default)]
pub struct AssignmentOutcome {
    pub assignments: Vec<Assignment>,
    pub skipped: usize,
}

/// Aplica la política una vez por tarea, en el orden de entrada (id
/// ascendente según lo carga el repositorio):
///
/// 1. candidatos = técnicos del mismo depot con carga < límite;
/// 2. si no hay, candidatos = todos los técnicos con carga < límite;
/// 3. si tampoco hay, la tarea se omite (registrada, nunca error);
/// 4. gana la menor carga; empate → primero en el orden de entrada.
pub fn auto_assign(
    tasks: &[Task],
    technicians: &[Technician],
    workload: &mut WorkloadTracker,
    capacity_limit: i64,
) -> AssignmentOutcome {
    let mut outcome = AssignmentOutcome::default();

    for task in tasks {
        let same_depot: Vec<&Technician> = technicians
            .iter()
            .filter(|t| t.depot == task.depot && workload.active_count(t.id) < capacity_limit)
            .collect();

        let pool = if same_depot.is_empty() {
            technicians
                .iter()
                .filter(|t| workload.active_count(t.id) < capacity_limit)
                .collect()
        } else {
            same_depot
        };

        // min_by_key conserva el primero entre mínimos iguales, lo que
        // materializa el desempate "primero en el orden de entrada".
        let chosen = match pool.into_iter().min_by_key(|t| workload.active_count(t.id)) {
            Some(technician) => technician,
            None => {
                warn!(
                    "⏭️ Tarea {} ({}) sin técnico con capacidad — queda sin asignar",
                    task.id, task.depot
                );
                outcome.skipped += 1;
                continue;
            }
        };

        workload.record_assignment(chosen.id);
        outcome.assignments.push(Assignment {
            task_id: task.id,
            technician_id: chosen.id,
        });
    }

    outcome
}

/// Orquesta un lote de auto-asignación contra el almacén.
pub struct AssignmentService {
    tasks: TaskRepository,
    technicians: TechnicianRepository,
    catalog: MaintenanceCatalog,
}

impl AssignmentService {
    pub fn new(pool: PgPool, catalog: MaintenanceCatalog) -> Self {
        Self {
            tasks: TaskRepository::new(pool.clone()),
            technicians: TechnicianRepository::new(pool),
            catalog,
        }
    }

    pub async fn run_auto_assign(&self) -> AppResult<AssignmentOutcome> {
        let tasks = self.tasks.list_unassigned_active().await?;
        let technicians = self.technicians.list_all().await?;
        let mut workload = WorkloadTracker::new(self.tasks.active_counts().await?);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, self.catalog.capacity_limit);

        let pairs: Vec<(i64, i64)> = outcome
            .assignments
            .iter()
            .map(|a| (a.task_id, a.technician_id))
            .collect();
        self.tasks.assign_many(&pairs).await?;

        info!(
            "🧰 Auto-asignación: {} tarea(s) asignadas, {} sin capacidad",
            outcome.assignments.len(),
            outcome.skipped
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::STATUS_PENDING;
    use chrono::{NaiveDate, Utc};

    fn task(id: i64, depot: &str) -> Task {
        Task {
            id,
            vehicle_id: format!("VEH-{:03}", id),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 8, 7).unwrap(),
            assigned_tech_id: None,
            depot: depot.to_string(),
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
            completed_at: None,
            signature: None,
        }
    }

    fn technician(id: i64, name: &str, depot: &str) -> Technician {
        Technician {
            id,
            name: name.to_string(),
            depot: depot.to_string(),
        }
    }

    fn tracker(initial: &[(i64, i64)]) -> WorkloadTracker {
        WorkloadTracker::new(initial.iter().copied().collect())
    }

    #[test]
    fn prefers_same_depot_technician() {
        let tasks = vec![task(1, "Depot X")];
        let technicians = vec![
            technician(1, "A", "Depot X"),
            technician(2, "B", "Depot Y"),
        ];
        let mut workload = tracker(&[]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert_eq!(
            outcome.assignments,
            vec![Assignment { task_id: 1, technician_id: 1 }]
        );
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn falls_back_to_any_depot_when_no_local_candidate() {
        let tasks = vec![task(1, "Depot X")];
        let technicians = vec![technician(2, "B", "Depot Y")];
        let mut workload = tracker(&[]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert_eq!(
            outcome.assignments,
            vec![Assignment { task_id: 1, technician_id: 2 }]
        );
    }

    #[test]
    fn falls_back_when_local_candidates_are_at_capacity() {
        let tasks = vec![task(1, "Depot X")];
        let technicians = vec![
            technician(1, "A", "Depot X"),
            technician(2, "B", "Depot Y"),
        ];
        // A ya está al límite, así que el pool local queda vacío
        let mut workload = tracker(&[(1, 3)]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert_eq!(
            outcome.assignments,
            vec![Assignment { task_id: 1, technician_id: 2 }]
        );
    }

    #[test]
    fn least_loaded_technician_wins() {
        let tasks = vec![task(1, "Depot X")];
        let technicians = vec![
            technician(1, "A", "Depot X"),
            technician(3, "C", "Depot X"),
        ];
        let mut workload = tracker(&[(1, 1)]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert_eq!(
            outcome.assignments,
            vec![Assignment { task_id: 1, technician_id: 3 }]
        );
    }

    #[test]
    fn tie_broken_by_input_order() {
        let tasks = vec![task(1, "Depot D1")];
        let technicians = vec![
            technician(10, "T1", "Depot D1"),
            technician(20, "T2", "Depot D1"),
        ];
        let mut workload = tracker(&[]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        // Empatados a cero: gana el primero del listado
        assert_eq!(
            outcome.assignments,
            vec![Assignment { task_id: 1, technician_id: 10 }]
        );
    }

    #[test]
    fn assignments_are_visible_within_the_same_run() {
        let tasks = vec![task(1, "Depot X"), task(2, "Depot X")];
        let technicians = vec![
            technician(1, "A", "Depot X"),
            technician(2, "B", "Depot X"),
        ];
        let mut workload = tracker(&[]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        // La primera asignación sube la carga de A, así que la segunda
        // tarea cae en B por menor carga.
        assert_eq!(
            outcome.assignments,
            vec![
                Assignment { task_id: 1, technician_id: 1 },
                Assignment { task_id: 2, technician_id: 2 },
            ]
        );
    }

    #[test]
    fn capacity_limit_bounds_final_load() {
        let tasks: Vec<Task> = (1..=5).map(|id| task(id, "Depot X")).collect();
        let technicians = vec![technician(1, "A", "Depot X")];
        let mut workload = tracker(&[]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert_eq!(outcome.assignments.len(), 3);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(workload.active_count(1), 3);
    }

    #[test]
    fn preexisting_load_counts_against_capacity() {
        let tasks = vec![task(1, "Depot X"), task(2, "Depot X")];
        let technicians = vec![technician(1, "A", "Depot X")];
        let mut workload = tracker(&[(1, 2)]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        // Solo queda un hueco de capacidad
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(workload.active_count(1), 3);
    }

    #[test]
    fn no_technicians_leaves_everything_unassigned() {
        let tasks = vec![task(1, "Depot X"), task(2, "Depot Y")];
        let technicians: Vec<Technician> = Vec::new();
        let mut workload = tracker(&[]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.skipped, 2);
    }

    #[test]
    fn generation_then_assignment_end_to_end() {
        use crate::config::MaintenanceCatalog;
        use crate::models::vehicle::Vehicle;
        use crate::services::scheduling_service::generate_due_tasks;
        use std::collections::HashSet;

        let catalog = MaintenanceCatalog::default();
        let day0 = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let day7 = day0 + chrono::Duration::days(7);

        let fleet = vec![Vehicle {
            id: "V1".to_string(),
            vehicle_type: "Truck".to_string(),
            depot: "D1".to_string(),
            mileage: 0,
            last_service: day0,
            service_interval: "Weekly".to_string(),
        }];

        let mut persisted: HashSet<(String, NaiveDate)> = HashSet::new();
        let requests = generate_due_tasks(
            &fleet,
            &catalog,
            |v, d| persisted.contains(&(v.to_string(), d)),
            day7,
            catalog.horizon_days,
        );
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].scheduled_date, day7);

        // Con el primer lote persistido, la repetición no genera nada
        for request in &requests {
            persisted.insert((request.vehicle_id.clone(), request.scheduled_date));
        }
        let rerun = generate_due_tasks(
            &fleet,
            &catalog,
            |v, d| persisted.contains(&(v.to_string(), d)),
            day7,
            catalog.horizon_days,
        );
        assert!(rerun.is_empty());

        // Persistencia simulada: la solicitud pasa a ser la tarea 1
        let tasks: Vec<Task> = requests
            .iter()
            .enumerate()
            .map(|(index, request)| Task {
                id: index as i64 + 1,
                vehicle_id: request.vehicle_id.clone(),
                scheduled_date: request.scheduled_date,
                assigned_tech_id: None,
                depot: request.depot.clone(),
                status: request.status.clone(),
                created_at: Utc::now(),
                completed_at: None,
                signature: None,
            })
            .collect();

        let technicians = vec![
            technician(1, "T1", "D1"),
            technician(2, "T2", "D1"),
        ];
        let mut workload = tracker(&[]);
        let outcome = auto_assign(&tasks, &technicians, &mut workload, catalog.capacity_limit);

        // Empate a cero entre T1 y T2: gana T1 por orden de entrada
        assert_eq!(
            outcome.assignments,
            vec![Assignment { task_id: 1, technician_id: 1 }]
        );
    }

    #[test]
    fn spreads_load_across_depots_under_pressure() {
        // Seis tareas en Depot X con dos técnicos locales y uno remoto:
        // los locales se llenan hasta el límite y el resto cae al remoto.
        let tasks: Vec<Task> = (1..=6).map(|id| task(id, "Depot X")).collect();
        let technicians = vec![
            technician(1, "A", "Depot X"),
            technician(2, "B", "Depot X"),
            technician(3, "C", "Depot Y"),
        ];
        let mut workload = tracker(&[(1, 2), (2, 2)]);

        let outcome = auto_assign(&tasks, &technicians, &mut workload, 3);

        assert_eq!(outcome.assignments.len(), 5);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(workload.active_count(1), 3);
        assert_eq!(workload.active_count(2), 3);
        assert_eq!(workload.active_count(3), 3);
    }
}
