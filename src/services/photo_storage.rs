//! Almacenamiento de fotos de evidencia
//!
//! Colaborador de almacenamiento: persiste el binario subido bajo un
//! nombre único generado y devuelve ese nombre para guardarlo como
//! `TaskPhoto`. Solo se acepta el archivo por su nombre, nunca se
//! inspecciona el contenido.

use crate::models::task::PhotoKind;
use crate::utils::errors::AppResult;
use crate::utils::validation::{allowed_file, file_extension};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Crear el directorio de subida si no existe (se llama en el arranque)
    pub async fn ensure_root(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Nombre único generado: `task{id}_{kind}_{YYYYMMDDHHMMSS}.{ext}`
    pub fn storage_name(
        task_id: i64,
        kind: PhotoKind,
        now: DateTime<Utc>,
        original_name: &str,
    ) -> Option<String> {
        let ext = file_extension(original_name)?;
        Some(format!(
            "task{}_{}_{}.{}",
            task_id,
            kind.as_str(),
            now.format("%Y%m%d%H%M%S"),
            ext
        ))
    }

    /// Persistir un archivo subido. Devuelve `None` (no un error) si el
    /// nombre original no pasa el filtro de extensión.
    pub async fn store(
        &self,
        task_id: i64,
        kind: PhotoKind,
        original_name: &str,
        data: &[u8],
        now: DateTime<Utc>,
    ) -> AppResult<Option<String>> {
        if !allowed_file(original_name) {
            warn!(
                "🚫 Subida '{}' ignorada: extensión no aceptada",
                original_name
            );
            return Ok(None);
        }

        let filename = match Self::storage_name(task_id, kind, now, original_name) {
            Some(name) => name,
            None => return Ok(None),
        };

        tokio::fs::write(self.root.join(&filename), data).await?;
        info!("📷 Foto guardada: {}", filename);
        Ok(Some(filename))
    }

    /// Ruta de un archivo ya almacenado. Rechaza nombres con separadores o
    /// componentes de subida de directorio.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        Some(self.root.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn storage_name_follows_pattern() {
        let now = Utc.with_ymd_and_hms(2025, 8, 7, 10, 30, 0).unwrap();

        let name = PhotoStorage::storage_name(42, PhotoKind::Before, now, "evidencia.JPG");
        assert_eq!(name.as_deref(), Some("task42_before_20250807103000.jpg"));

        let name = PhotoStorage::storage_name(7, PhotoKind::After, now, "final.webp");
        assert_eq!(name.as_deref(), Some("task7_after_20250807103000.webp"));
    }

    #[test]
    fn storage_name_requires_extension() {
        let now = Utc.with_ymd_and_hms(2025, 8, 7, 10, 30, 0).unwrap();
        assert!(PhotoStorage::storage_name(1, PhotoKind::Before, now, "sinextension").is_none());
    }

    #[test]
    fn path_for_rejects_traversal() {
        let storage = PhotoStorage::new("uploads");

        assert!(storage.path_for("task1_before_20250807103000.png").is_some());
        assert!(storage.path_for("../secrets.txt").is_none());
        assert!(storage.path_for("a/b.png").is_none());
        assert!(storage.path_for("a\\b.png").is_none());
        assert!(storage.path_for("").is_none());
    }

    #[tokio::test]
    async fn store_writes_accepted_files_and_skips_rejected() {
        let root = std::env::temp_dir().join(format!("fleet_photos_{}", std::process::id()));
        let storage = PhotoStorage::new(&root);
        storage.ensure_root().await.unwrap();

        let now = Utc.with_ymd_and_hms(2025, 8, 7, 10, 30, 0).unwrap();

        let stored = storage
            .store(3, PhotoKind::After, "after.png", b"imagen", now)
            .await
            .unwrap();
        assert_eq!(stored.as_deref(), Some("task3_after_20250807103000.png"));
        assert!(root.join("task3_after_20250807103000.png").exists());

        let rejected = storage
            .store(3, PhotoKind::After, "after.exe", b"binario", now)
            .await
            .unwrap();
        assert!(rejected.is_none());

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
