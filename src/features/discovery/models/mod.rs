pub mod geocoded_point;

pub use geocoded_point::{GeocodedPoint, GeocodingSource};
