//! Southern California locations for test fixtures.

use tour_planner::location::Location;

pub fn los_angeles() -> Location {
    Location::new("Los Angeles", 34.0522, -118.2437)
}

pub fn san_diego() -> Location {
    Location::new("San Diego", 32.7157, -117.1611)
}

pub fn irvine() -> Location {
    Location::new("Irvine", 33.6846, -117.8265)
}

pub fn santa_ana() -> Location {
    Location::new("Santa Ana", 33.7455, -117.8677)
}

pub fn long_beach() -> Location {
    Location::new("Long Beach", 33.7701, -118.1937)
}

pub fn pasadena() -> Location {
    Location::new("Pasadena", 34.1478, -118.1445)
}

pub fn malibu() -> Location {
    Location::new("Malibu", 34.0259, -118.7798)
}

pub fn ventura() -> Location {
    Location::new("Ventura", 34.2746, -119.2290)
}

/// The first `n` cities, Los Angeles first.
pub fn cities(n: usize) -> Vec<Location> {
    vec![
        los_angeles(),
        san_diego(),
        irvine(),
        santa_ana(),
        long_beach(),
        pasadena(),
        malibu(),
        ventura(),
    ]
    .into_iter()
    .take(n)
    .collect()
}
