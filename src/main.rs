mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use config::MaintenanceCatalog;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Fleet Maintenance - Motor de planificación y asignación");
    info!("==========================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Schema y datos de demostración
    database::schema::init_schema(&pool).await?;
    database::schema::seed_demo_data(&pool).await?;

    let config = EnvironmentConfig::default();
    let catalog = MaintenanceCatalog::default();
    let app_state = AppState::new(pool, config.clone(), catalog);

    // Directorio de subida de fotos
    app_state.storage.ensure_root().await?;

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    // Crear router de la API
    let app = Router::new()
        .route("/test", get(test_endpoint))
        .route("/api/parts", get(parts_catalog))
        .nest("/api/tasks", routes::task_routes::create_task_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest(
            "/api/technicians",
            routes::technician_routes::create_technician_router(),
        )
        .nest(
            "/api/dashboard",
            routes::dashboard_routes::create_dashboard_router(),
        )
        .nest("/uploads", routes::upload_routes::create_upload_router())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📅 Endpoints - Tasks:");
    info!("   GET  /api/tasks - Listar tareas");
    info!("   GET  /api/tasks/:id - Detalle de tarea (piezas y fotos)");
    info!("   POST /api/tasks/generate - Generar tareas del horizonte");
    info!("   POST /api/tasks/auto-assign - Auto-asignar tareas pendientes");
    info!("   POST /api/tasks/:id/complete - Completar tarea (multipart)");
    info!("🚗 Endpoints - Vehicles:");
    info!("   GET  /api/vehicles - Listar vehículos");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("🔧 Endpoints - Technicians:");
    info!("   GET  /api/technicians - Listar técnicos con carga activa");
    info!("   GET  /api/technicians/:id/tasks - Tareas abiertas del técnico");
    info!("📊 Endpoints - Dashboard:");
    info!("   GET  /api/dashboard - Resumen de flota y galería");
    info!("📷 Endpoints - Uploads:");
    info!("   GET  /uploads/:filename - Servir foto almacenada");
    info!("🧾 Endpoints - Catálogo:");
    info!("   GET  /api/parts - Lista fija de piezas");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Catálogo fijo de piezas para el formulario de completado
async fn parts_catalog(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<Vec<String>> {
    Json(state.catalog.parts.clone())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API de mantenimiento de flota funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
