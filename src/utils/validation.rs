//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use std::collections::HashSet;
use validator::ValidationError;

lazy_static! {
    /// Extensiones aceptadas para fotos de evidencia. Solo se comprueba el
    /// nombre del archivo, nunca el contenido.
    static ref ALLOWED_EXTENSIONS: HashSet<&'static str> =
        ["png", "jpg", "jpeg", "gif", "webp"].iter().copied().collect();
}

/// Comprobar si un nombre de archivo tiene una extensión de imagen aceptada
pub fn allowed_file(filename: &str) -> bool {
    match file_extension(filename) {
        Some(ext) => ALLOWED_EXTENSIONS.contains(ext.as_str()),
        None => false,
    }
}

/// Extensión en minúsculas de un nombre de archivo, si tiene alguna
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_image_extensions() {
        assert!(allowed_file("evidence.png"));
        assert!(allowed_file("evidence.JPG"));
        assert!(allowed_file("before.shot.jpeg"));
        assert!(allowed_file("anim.gif"));
        assert!(allowed_file("modern.webp"));
    }

    #[test]
    fn rejects_other_names() {
        assert!(!allowed_file("report.pdf"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("trailing."));
        assert!(!allowed_file(""));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("photo.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(file_extension("nodot"), None);
    }

    #[test]
    fn parses_iso_dates() {
        assert!(validate_date("2025-08-07").is_ok());
        assert!(validate_date("07/08/2025").is_err());
        assert!(validate_date("not-a-date").is_err());
    }
}
