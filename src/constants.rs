/// Prefix carried by every log line emitted by the service.
pub const API_NAME: &str = "[carzone-api]";

/// Earliest model year accepted for a car (Benz Patent-Motorwagen).
pub const MIN_CAR_YEAR: i32 = 1886;

/// Fuel types accepted on car requests.
///
/// "Persol" is a misspelling of "Petrol" that existing clients still send.
pub const FUEL_TYPES: [&str; 5] = ["Petrol", "Persol", "Diesel", "Electric", "Hybrid"];
