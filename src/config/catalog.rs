//! Catálogo de mantenimiento
//!
//! Tabla de configuración inyectada en el motor: cadencias de servicio,
//! lista fija de piezas, horizonte de generación y límite de capacidad por
//! técnico. Se construye una vez en el arranque y se pasa por `AppState`,
//! de modo que los tests pueden ejecutar catálogos alternativos.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct MaintenanceCatalog {
    intervals: HashMap<String, i64>,
    /// Cadencia aplicada a etiquetas no reconocidas. Nunca es un error.
    pub default_interval_days: i64,
    pub parts: Vec<String>,
    pub horizon_days: i64,
    pub capacity_limit: i64,
}

impl Default for MaintenanceCatalog {
    fn default() -> Self {
        let mut intervals = HashMap::new();
        intervals.insert("Weekly".to_string(), 7);
        intervals.insert("Bi-weekly".to_string(), 14);
        intervals.insert("Monthly".to_string(), 30);

        Self {
            intervals,
            default_interval_days: 30,
            parts: [
                "Oil filter",
                "Brake pads",
                "Tires",
                "Air filter",
                "Spark plugs",
                "Coolant",
                "Engine oil",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            horizon_days: 30,
            capacity_limit: 3,
        }
    }
}

impl MaintenanceCatalog {
    /// Duración en días de una etiqueta de cadencia. Etiqueta desconocida
    /// cae al valor por defecto (fail-soft).
    pub fn interval_days(&self, tag: &str) -> i64 {
        self.intervals
            .get(tag)
            .copied()
            .unwrap_or(self.default_interval_days)
    }

    #[cfg(test)]
    pub fn with_interval(mut self, tag: &str, days: i64) -> Self {
        self.intervals.insert(tag.to_string(), days);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_interval_tags() {
        let catalog = MaintenanceCatalog::default();
        assert_eq!(catalog.interval_days("Weekly"), 7);
        assert_eq!(catalog.interval_days("Bi-weekly"), 14);
        assert_eq!(catalog.interval_days("Monthly"), 30);
    }

    #[test]
    fn unknown_tag_falls_back_to_default() {
        let catalog = MaintenanceCatalog::default();
        assert_eq!(catalog.interval_days("Quarterly"), 30);
        assert_eq!(catalog.interval_days(""), 30);
    }

    #[test]
    fn alternate_catalog_is_injectable() {
        let catalog = MaintenanceCatalog::default().with_interval("Daily", 1);
        assert_eq!(catalog.interval_days("Daily"), 1);
        assert_eq!(catalog.interval_days("Weekly"), 7);
    }
}
