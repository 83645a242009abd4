//! Módulo de base de datos
//!
//! Maneja la conexión, el schema y el seed de datos con PostgreSQL

pub mod connection;
pub mod schema;

pub use connection::DatabaseConnection;
