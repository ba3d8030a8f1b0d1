pub mod geolocation;
pub mod health;
pub mod index;

pub use geolocation::{GeolocationApi, geolocation_routes};
pub use health::{HealthService, health_routes};
pub use index::{not_found, root};
