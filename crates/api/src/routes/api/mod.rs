mod error;
pub mod precipitation;
pub mod stations;
pub mod temperature;
pub mod tobs;

pub use error::{ApiError, ErrorBody};
pub use precipitation::{
    precipitation, year_before, PrecipitationByDate, PRECIPITATION_WINDOW_DAYS,
};
pub use stations::stations;
pub use temperature::{parse_path_date, temperature_between, temperature_from};
pub use tobs::{tobs, TemperaturesByDate};
