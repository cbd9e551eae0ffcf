//! Turns a solved visiting order into renderable legs and an itinerary label.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::PlannerError;
use crate::location::Location;
use crate::matrix::GeometryTable;
use crate::polyline::Polyline;
use crate::solver::Assignment;

/// One drawable edge of the tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLeg {
    pub from: Location,
    pub to: Location,
    pub path: Polyline,
}

/// Everything a map collaborator needs to draw one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    /// Locations in visiting order; the last one connects back to the first.
    pub tour: Vec<Location>,
    /// Consecutive edges including the closing one. Empty for a single stop.
    pub legs: Vec<RenderedLeg>,
    pub itinerary: String,
    /// Assignment cost the itinerary reports.
    pub cost: f64,
}

impl RenderPlan {
    /// GeoJSON `FeatureCollection` with one point per stop and one line
    /// string per leg. The itinerary rides along as a foreign member.
    pub fn to_geojson(&self) -> Value {
        let stops = self.tour.iter().enumerate().map(|(position, location)| {
            json!({
                "type": "Feature",
                "properties": { "name": location.name, "position": position },
                "geometry": { "type": "Point", "coordinates": [location.lng, location.lat] },
            })
        });
        let legs = self.legs.iter().map(|leg| {
            let coordinates: Vec<[f64; 2]> =
                leg.path.points().iter().map(|&(lat, lng)| [lng, lat]).collect();
            json!({
                "type": "Feature",
                "properties": { "from": leg.from.name, "to": leg.to.name },
                "geometry": { "type": "LineString", "coordinates": coordinates },
            })
        });

        json!({
            "type": "FeatureCollection",
            "itinerary": self.itinerary,
            "features": stops.chain(legs).collect::<Vec<_>>(),
        })
    }
}

/// Maps `assignment.order` back to `locations` and stitches the stored leg
/// geometries, closing the loop from the last stop to the first.
///
/// `geometry` must be indexed like `locations`. Geometries are decoded with
/// `precision` decimal digits and reversed where the tour walks a pair against
/// the direction it was routed in, so every path starts at `from`.
pub fn assemble(
    assignment: &Assignment,
    locations: &[Location],
    geometry: &GeometryTable,
    precision: u32,
) -> Result<RenderPlan, PlannerError> {
    let n = assignment.order.len();
    if n != locations.len() {
        return Err(PlannerError::InvalidOrder(format!(
            "{} positions for {} locations",
            n,
            locations.len()
        )));
    }
    if let Some(&index) = assignment.order.iter().find(|&&index| index >= n) {
        return Err(PlannerError::InvalidOrder(format!(
            "index {} out of range",
            index
        )));
    }

    let tour: Vec<Location> = assignment
        .order
        .iter()
        .map(|&index| locations[index].clone())
        .collect();

    let mut legs = Vec::with_capacity(n);
    if n > 1 {
        for k in 0..n {
            let from = assignment.order[k];
            let to = assignment.order[(k + 1) % n];
            let encoded = geometry.get(from, to).ok_or_else(|| PlannerError::MissingGeometry {
                from: locations[from].name.clone(),
                to: locations[to].name.clone(),
            })?;
            let mut points = Polyline::decode(encoded, precision)?.into_points();
            if geometry.origin(from, to) != Some(from) {
                points.reverse();
            }
            legs.push(RenderedLeg {
                from: locations[from].clone(),
                to: locations[to].clone(),
                path: Polyline::new(points),
            });
        }
    }

    let names: Vec<&str> = tour.iter().map(|location| location.name.as_str()).collect();
    let itinerary = format!(
        "{} | Total Distance: {} meters",
        names.join(" --> "),
        assignment.cost
    );

    Ok(RenderPlan {
        tour,
        legs,
        itinerary,
        cost: assignment.cost,
    })
}
