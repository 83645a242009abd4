//! Transición de completado de tareas
//!
//! Única operación que muta el estado además de la asignación: valida la
//! tarea, normaliza cantidades de piezas, reemplaza el conjunto de piezas
//! completo, añade las fotos aceptadas (append-only) y registra estado,
//! firma y marca temporal de completado. El instante "ahora" lo inyecta
//! el llamador.

use crate::models::task::{PhotoKind, Task, STATUS_COMPLETED, STATUS_PENDING};
use crate::repositories::task_repository::TaskRepository;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::allowed_file;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

/// Pieza seleccionada en el envío de completado, con la cantidad tal cual
/// llegó del formulario (puede faltar o no ser numérica).
#[derive(Debug, Clone)]
pub struct PartSelection {
    pub name: String,
    pub quantity: Option<String>,
}

/// Referencia de foto ya subida, lista para adjuntar si pasa el filtro de
/// extensión.
#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    pub kind: PhotoKind,
    pub filename: String,
}

/// Datos de un envío de completado.
#[derive(Debug, Clone, Default)]
pub struct CompletionSubmission {
    /// Estado solicitado; vacío o ausente cae a `completed`.
    pub status: Option<String>,
    pub signature: String,
    pub parts: Vec<PartSelection>,
    pub photos: Vec<PhotoAttachment>,
}

/// Normaliza una cantidad enviada: lo que no se pueda leer como entero
/// positivo se convierte en 1, y nunca baja de 1.
pub fn coerce_quantity(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1)
}

/// Resuelve las selecciones a un conjunto (nombre, cantidad) sin
/// duplicados. Si una pieza se repite en el envío, la última cantidad gana.
pub fn resolve_parts(selections: &[PartSelection]) -> Vec<(String, i64)> {
    let mut resolved: Vec<(String, i64)> = Vec::new();

    for selection in selections {
        let qty = coerce_quantity(selection.quantity.as_deref());
        match resolved.iter_mut().find(|(name, _)| *name == selection.name) {
            Some(entry) => entry.1 = qty,
            None => resolved.push((selection.name.clone(), qty)),
        }
    }

    resolved
}

/// Filtra las fotos al conjunto aceptado; las rechazadas se registran y se
/// descartan en silencio, nunca son un error.
pub fn accepted_photos(photos: &[PhotoAttachment]) -> Vec<(PhotoKind, String)> {
    let mut accepted = Vec::new();

    for photo in photos {
        if allowed_file(&photo.filename) {
            accepted.push((photo.kind, photo.filename.clone()));
        } else {
            warn!(
                "🚫 Foto '{}' ({}) ignorada: extensión no aceptada",
                photo.filename,
                photo.kind.as_str()
            );
        }
    }

    accepted
}

pub struct CompletionService {
    tasks: TaskRepository,
}

impl CompletionService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tasks: TaskRepository::new(pool),
        }
    }

    /// Aplica la transición de completado. Falla con `NotFound` si la
    /// tarea no existe; un reenvío posterior está permitido y simplemente
    /// sobrescribe estado, firma y piezas (las fotos se acumulan).
    pub async fn complete_task(
        &self,
        task_id: i64,
        submission: CompletionSubmission,
        now: DateTime<Utc>,
    ) -> AppResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| not_found_error("Task", &task_id.to_string()))?;

        let status = submission
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(STATUS_COMPLETED)
            .to_string();

        if status != STATUS_PENDING && status != STATUS_COMPLETED {
            // Permisividad heredada: se acepta tal cual, pero queda rastro.
            warn!("📋 Tarea {}: estado no estándar '{}'", task_id, status);
        }

        let parts = resolve_parts(&submission.parts);
        let photos = accepted_photos(&submission.photos);

        let task = self
            .tasks
            .apply_completion(
                task_id,
                &status,
                now,
                submission.signature.trim(),
                &parts,
                &photos,
            )
            .await?;

        info!(
            "✅ Tarea {} actualizada: estado '{}', {} pieza(s), {} foto(s) nuevas",
            task_id,
            status,
            parts.len(),
            photos.len()
        );
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(name: &str, quantity: Option<&str>) -> PartSelection {
        PartSelection {
            name: name.to_string(),
            quantity: quantity.map(|q| q.to_string()),
        }
    }

    #[test]
    fn quantity_is_coerced_to_positive_integer() {
        assert_eq!(coerce_quantity(Some("4")), 4);
        assert_eq!(coerce_quantity(Some(" 2 ")), 2);
        assert_eq!(coerce_quantity(Some("abc")), 1);
        assert_eq!(coerce_quantity(Some("")), 1);
        assert_eq!(coerce_quantity(Some("0")), 1);
        assert_eq!(coerce_quantity(Some("-5")), 1);
        assert_eq!(coerce_quantity(Some("2.5")), 1);
        assert_eq!(coerce_quantity(None), 1);
    }

    #[test]
    fn resolve_keeps_selection_order() {
        let parts = resolve_parts(&[
            selection("Brake pads", Some("2")),
            selection("Engine oil", None),
            selection("Coolant", Some("abc")),
        ]);

        assert_eq!(
            parts,
            vec![
                ("Brake pads".to_string(), 2),
                ("Engine oil".to_string(), 1),
                ("Coolant".to_string(), 1),
            ]
        );
    }

    #[test]
    fn repeated_part_takes_last_quantity() {
        let parts = resolve_parts(&[
            selection("Tires", Some("2")),
            selection("Tires", Some("4")),
        ]);

        assert_eq!(parts, vec![("Tires".to_string(), 4)]);
    }

    #[test]
    fn unselected_parts_are_absent_not_zero() {
        let parts = resolve_parts(&[selection("Oil filter", Some("1"))]);

        assert_eq!(parts.len(), 1);
        assert!(parts.iter().all(|(_, qty)| *qty >= 1));
    }

    #[test]
    fn resubmission_set_stands_alone() {
        // El reemplazo es total: la resolución del segundo envío no
        // arrastra nada del primero.
        let first = resolve_parts(&[
            selection("Oil filter", Some("1")),
            selection("Brake pads", Some("2")),
        ]);
        let second = resolve_parts(&[selection("Coolant", Some("3"))]);

        assert_eq!(first.len(), 2);
        assert_eq!(second, vec![("Coolant".to_string(), 3)]);
    }

    #[test]
    fn photos_with_bad_extension_are_dropped() {
        let photos = accepted_photos(&[
            PhotoAttachment {
                kind: PhotoKind::Before,
                filename: "task9_before_20250807103000.png".to_string(),
            },
            PhotoAttachment {
                kind: PhotoKind::After,
                filename: "notes.txt".to_string(),
            },
        ]);

        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].0, PhotoKind::Before);
    }
}
