pub mod db;
pub mod routes;
mod startup;
mod utils;

pub use db::{
    ClimateAccess, ClimateData, Precipitation, Station, StationActivity, TemperatureObservation,
    TemperatureStats,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
