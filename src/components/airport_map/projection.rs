//! Mercator projection fit to a fixed viewport, and path generation.

use std::f64::consts::FRAC_PI_4;

use geojson::{FeatureCollection, Geometry, Value};

use super::types::Point;

/// Latitude beyond which Mercator diverges; inputs are clipped to it.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A Mercator projection with a uniform scale and a screen translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
	pub scale: f64,
	pub translate: (f64, f64),
}

impl Default for Mercator {
	fn default() -> Self {
		Self {
			scale: 961.0 / std::f64::consts::TAU,
			translate: (480.0, 250.0),
		}
	}
}

/// Unit-scale Mercator with y pointing down.
fn raw(lon: f64, lat: f64) -> (f64, f64) {
	let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
	(lon.to_radians(), -(FRAC_PI_4 + phi / 2.0).tan().ln())
}

impl Mercator {
	pub fn project(&self, lon: f64, lat: f64) -> Point {
		let (x, y) = raw(lon, lat);
		Point::new(
			x * self.scale + self.translate.0,
			y * self.scale + self.translate.1,
		)
	}

	/// Chooses scale and translation so the projected bounds of `collection`
	/// fill `extent` (`[[x0, y0], [x1, y1]]`) and are centered in it.
	pub fn fit_extent(extent: [[f64; 2]; 2], collection: &FeatureCollection) -> Self {
		let [[ex0, ey0], [ex1, ey1]] = extent;
		let (w, h) = (ex1 - ex0, ey1 - ey0);

		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
			for line in lines(&geometry.value) {
				for p in line {
					let (x, y) = raw(p[0], p[1]);
					bounds = Some(match bounds {
						None => (x, y, x, y),
						Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
					});
				}
			}
		}
		let Some((x0, y0, x1, y1)) = bounds else {
			return Self {
				translate: (ex0 + w / 2.0, ey0 + h / 2.0),
				..Self::default()
			};
		};

		let (bw, bh) = (x1 - x0, y1 - y0);
		let k = match (bw > 0.0, bh > 0.0) {
			(true, true) => (w / bw).min(h / bh),
			(true, false) => w / bw,
			(false, true) => h / bh,
			(false, false) => Self::default().scale,
		};
		Self {
			scale: k,
			translate: (
				ex0 + (w - k * (x1 + x0)) / 2.0,
				ey0 + (h - k * (y1 + y0)) / 2.0,
			),
		}
	}

	/// Projects every ring or line of `geometry` into screen space.
	pub fn path(&self, geometry: &Geometry) -> Vec<Vec<Point>> {
		lines(&geometry.value)
			.into_iter()
			.map(|line| line.iter().map(|p| self.project(p[0], p[1])).collect())
			.collect()
	}
}

/// Flattens a geometry into its coordinate sequences.
fn lines(value: &Value) -> Vec<&Vec<Vec<f64>>> {
	match value {
		Value::LineString(line) => vec![line],
		Value::MultiLineString(lines) | Value::Polygon(lines) => lines.iter().collect(),
		Value::MultiPolygon(polygons) => polygons.iter().flatten().collect(),
		Value::GeometryCollection(members) => {
			members.iter().flat_map(|g| lines(&g.value)).collect()
		}
		Value::Point(_) | Value::MultiPoint(_) => Vec::new(),
	}
}

/// Even-odd point-in-polygon over a set of projected rings.
pub fn rings_contain(rings: &[Vec<Point>], p: Point) -> bool {
	let mut inside = false;
	for ring in rings {
		let n = ring.len();
		if n < 3 {
			continue;
		}
		let mut j = n - 1;
		for i in 0..n {
			let (a, b) = (ring[i], ring[j]);
			if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
				inside = !inside;
			}
			j = i;
		}
	}
	inside
}

#[cfg(test)]
mod tests {
	use geojson::Feature;

	use super::*;

	fn collection(rings: Vec<Vec<Vec<f64>>>) -> FeatureCollection {
		FeatureCollection {
			bbox: None,
			features: vec![Feature {
				bbox: None,
				geometry: Some(Geometry::new(Value::Polygon(rings))),
				id: None,
				properties: None,
				foreign_members: None,
			}],
			foreign_members: None,
		}
	}

	#[test]
	fn fit_keeps_bounds_inside_extent() {
		let fc = collection(vec![vec![
			vec![-170.0, -60.0],
			vec![170.0, -60.0],
			vec![170.0, 75.0],
			vec![-170.0, 75.0],
			vec![-170.0, -60.0],
		]]);
		let proj = Mercator::fit_extent([[0.0, 0.0], [1000.0, 500.0]], &fc);

		let corners = [(-170.0, -60.0), (170.0, -60.0), (170.0, 75.0), (-170.0, 75.0)];
		let projected: Vec<Point> = corners.iter().map(|&(lon, lat)| proj.project(lon, lat)).collect();
		for p in &projected {
			assert!((-1e-6..=1000.0 + 1e-6).contains(&p.x), "{p:?}");
			assert!((-1e-6..=500.0 + 1e-6).contains(&p.y), "{p:?}");
		}
		// one dimension is filled exactly
		let width = projected[1].x - projected[0].x;
		let height = projected[0].y - projected[2].y;
		assert!((width - 1000.0).abs() < 1e-6 || (height - 500.0).abs() < 1e-6);
		// north is up
		assert!(projected[2].y < projected[1].y);
	}

	#[test]
	fn polar_latitudes_stay_finite() {
		let proj = Mercator::default();
		let p = proj.project(0.0, -90.0);
		assert!(p.y.is_finite());
	}

	#[test]
	fn empty_collection_centers_origin() {
		let fc = FeatureCollection {
			bbox: None,
			features: Vec::new(),
			foreign_members: None,
		};
		let proj = Mercator::fit_extent([[0.0, 0.0], [1000.0, 500.0]], &fc);
		let origin = proj.project(0.0, 0.0);
		assert!(origin.distance(Point::new(500.0, 250.0)) < 1e-9);
	}

	#[test]
	fn even_odd_containment() {
		let square = vec![
			Point::new(0.0, 0.0),
			Point::new(10.0, 0.0),
			Point::new(10.0, 10.0),
			Point::new(0.0, 10.0),
		];
		let hole = vec![
			Point::new(4.0, 4.0),
			Point::new(6.0, 4.0),
			Point::new(6.0, 6.0),
			Point::new(4.0, 6.0),
		];
		let rings = vec![square, hole];
		assert!(rings_contain(&rings, Point::new(1.0, 1.0)));
		assert!(!rings_contain(&rings, Point::new(5.0, 5.0)));
		assert!(!rings_contain(&rings, Point::new(11.0, 5.0)));
	}
}
