/// Plain text listing of the available routes.
pub const ROUTE_LISTING: &str = "\
Available Routes:
/api/v1.0/precipitation       -     Get precipitation data for the last year of measurements.
/api/v1.0/stations            -     Get a list of station data.
/api/v1.0/tobs                -     Get temperature data from the most active station.
/api/v1.0/[start]             -     Get temperature stats from a start date onwards. FORMAT YYYY-MM-DD
/api/v1.0/[start]/[end]       -     Get temperature stats in a date range. FORMAT YYYY-MM-DD
/docs                         -     API documentation.
";

pub async fn index_handler() -> &'static str {
    ROUTE_LISTING
}
