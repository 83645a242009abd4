//! DTOs de vehículos

use crate::models::vehicle::Vehicle;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub vehicle_type: String,
    pub depot: String,
    pub mileage: i64,
    pub last_service: String,
    pub service_interval: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_type: vehicle.vehicle_type,
            depot: vehicle.depot,
            mileage: vehicle.mileage,
            last_service: vehicle.last_service.to_string(),
            service_interval: vehicle.service_interval,
        }
    }
}
