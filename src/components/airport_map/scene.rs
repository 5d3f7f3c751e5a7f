//! Rendered elements bound one-to-one to the dataset.

use geojson::{FeatureCollection, Geometry};

use super::projection::{Mercator, rings_contain};
use super::types::Point;

#[derive(Clone, Debug)]
pub struct CountryShape {
	pub name: String,
	pub rings: Vec<Vec<Point>>,
}

#[derive(Clone, Debug)]
pub struct LinkLine {
	pub source: usize,
	pub target: usize,
	pub start: Point,
	pub end: Point,
}

#[derive(Clone, Debug)]
pub struct NodeCircle {
	pub name: String,
	pub radius: f64,
	pub center: Point,
}

/// Back-to-front: countries, border mesh, links, nodes.
#[derive(Clone, Debug)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub countries: Vec<CountryShape>,
	pub country_opacity: f64,
	pub borders: Vec<Vec<Point>>,
	pub links: Vec<LinkLine>,
	pub nodes: Vec<NodeCircle>,
}

impl Scene {
	/// Projects the static map layers once and creates one circle per node
	/// and one line per link. Countries start hidden.
	pub fn new(
		(width, height): (f64, f64),
		projection: &Mercator,
		countries: &FeatureCollection,
		borders: &Geometry,
		nodes: Vec<(String, f64)>,
		links: &[(usize, usize)],
	) -> Self {
		let countries = countries
			.features
			.iter()
			.map(|f| CountryShape {
				name: f
					.property("name")
					.and_then(|v| v.as_str())
					.unwrap_or_default()
					.to_string(),
				rings: f.geometry.as_ref().map(|g| projection.path(g)).unwrap_or_default(),
			})
			.collect();

		Self {
			width,
			height,
			countries,
			country_opacity: 0.0,
			borders: projection.path(borders),
			links: links
				.iter()
				.map(|&(source, target)| LinkLine {
					source,
					target,
					start: Point::default(),
					end: Point::default(),
				})
				.collect(),
			nodes: nodes
				.into_iter()
				.map(|(name, radius)| NodeCircle {
					name,
					radius,
					center: Point::default(),
				})
				.collect(),
		}
	}

	/// Keeps a circle of `radius` fully inside the viewport.
	pub fn clamp(&self, p: Point, radius: f64) -> Point {
		Point::new(
			p.x.min(self.width - radius).max(radius),
			p.y.min(self.height - radius).max(radius),
		)
	}

	/// Moves every element to `positions` (one per node). Circles are clamped
	/// into the viewport; link endpoints follow the unclamped positions.
	pub fn set_positions(&mut self, positions: &[Point]) {
		for i in 0..self.nodes.len() {
			let center = self.clamp(positions[i], self.nodes[i].radius);
			self.nodes[i].center = center;
		}
		for link in &mut self.links {
			link.start = positions[link.source];
			link.end = positions[link.target];
		}
	}

	/// Topmost circle under `p`.
	pub fn node_at(&self, p: Point) -> Option<usize> {
		self.nodes
			.iter()
			.rposition(|n| n.center.distance(p) <= n.radius)
	}

	pub fn country_at(&self, p: Point) -> Option<usize> {
		self.countries
			.iter()
			.rposition(|c| rings_contain(&c.rings, p))
	}
}

#[cfg(test)]
mod tests {
	use geojson::Value;
	use proptest::prelude::*;

	use super::*;

	fn scene(radii: &[f64]) -> Scene {
		let empty = FeatureCollection {
			bbox: None,
			features: Vec::new(),
			foreign_members: None,
		};
		let nodes = radii.iter().enumerate().map(|(i, &r)| (format!("N{i}"), r)).collect();
		Scene::new(
			(1000.0, 500.0),
			&Mercator::default(),
			&empty,
			&Geometry::new(Value::MultiLineString(Vec::new())),
			nodes,
			&[(0, 1)],
		)
	}

	#[test]
	fn links_follow_raw_positions() {
		let mut s = scene(&[4.0, 12.0]);
		s.set_positions(&[Point::new(-50.0, 20.0), Point::new(300.0, 200.0)]);
		assert_eq!(s.nodes[0].center, Point::new(4.0, 20.0));
		assert_eq!(s.links[0].start, Point::new(-50.0, 20.0));
		assert_eq!(s.links[0].end, Point::new(300.0, 200.0));
	}

	#[test]
	fn picks_topmost_circle() {
		let mut s = scene(&[10.0, 10.0]);
		s.set_positions(&[Point::new(100.0, 100.0), Point::new(105.0, 100.0)]);
		assert_eq!(s.node_at(Point::new(103.0, 100.0)), Some(1));
		assert_eq!(s.node_at(Point::new(92.0, 100.0)), Some(0));
		assert_eq!(s.node_at(Point::new(400.0, 400.0)), None);
	}

	proptest! {
		#[test]
		fn centers_stay_inside_viewport(
			x in -1.0e4f64..1.0e4,
			y in -1.0e4f64..1.0e4,
			r in 4.0f64..=12.0,
		) {
			let mut s = scene(&[r, r]);
			s.set_positions(&[Point::new(x, y), Point::new(y, x)]);
			for n in &s.nodes {
				prop_assert!(n.center.x >= r && n.center.x <= 1000.0 - r);
				prop_assert!(n.center.y >= r && n.center.y <= 500.0 - r);
			}
		}
	}
}
