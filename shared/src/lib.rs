pub mod city;
pub mod geo;
pub mod sheet;

pub use city::City;
pub use geo::{BoundarySet, MapProjection};
pub use sheet::{CommaSplit, LoadError, ParsedCities, SplitFields, parse_cities};
