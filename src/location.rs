//! Named locations and the catalog they are selected from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::traits::LocationLookup;

/// A named location with coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Fixed set of selectable locations, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationCatalog {
    /// Builds a catalog, rejecting duplicate names.
    pub fn new(locations: Vec<Location>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(locations.len());
        for (i, location) in locations.iter().enumerate() {
            if index.insert(location.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateLocation(location.name.clone()));
            }
        }
        Ok(Self { locations, index })
    }

    /// The Southern California cities offered by the desktop app.
    pub fn southern_california() -> Self {
        let locations = vec![
            Location::new("Los Angeles", 34.0522, -118.2437),
            Location::new("San Diego", 32.7157, -117.1611),
            Location::new("Irvine", 33.6846, -117.8265),
            Location::new("Santa Ana", 33.7455, -117.8677),
            Location::new("Long Beach", 33.7701, -118.1937),
            Location::new("Pasadena", 34.1478, -118.1445),
            Location::new("Malibu", 34.0259, -118.7798),
            Location::new("Ventura", 34.2746, -119.2290),
        ];
        let index = locations
            .iter()
            .enumerate()
            .map(|(i, location)| (location.name.clone(), i))
            .collect();
        Self { locations, index }
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.index.get(name).map(|&i| &self.locations[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|location| location.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl LocationLookup for LocationCatalog {
    fn location(&self, name: &str) -> Option<&Location> {
        self.get(name)
    }
}
