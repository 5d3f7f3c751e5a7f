use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// One airport as it appears in `airports.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct AirportRecord {
	pub name: String,
	pub longitude: f64,
	pub latitude: f64,
	pub passengers: f64,
}

/// A route endpoint, given either as a node index or a node name.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LinkEndpoint {
	Index(usize),
	Name(String),
}

impl fmt::Display for LinkEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Index(i) => write!(f, "#{i}"),
			Self::Name(name) => write!(f, "{name:?}"),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct RouteRecord {
	pub source: LinkEndpoint,
	pub target: LinkEndpoint,
}

/// The node/link graph dataset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AirportData {
	pub nodes: Vec<AirportRecord>,
	pub links: Vec<RouteRecord>,
}

impl AirportData {
	/// Resolves an endpoint to a node index, if it names a node that exists.
	pub fn resolve(&self, endpoint: &LinkEndpoint) -> Option<usize> {
		match endpoint {
			LinkEndpoint::Index(i) => (*i < self.nodes.len()).then_some(*i),
			LinkEndpoint::Name(name) => self.nodes.iter().position(|n| &n.name == name),
		}
	}
}

/// A screen-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn lerp(self, to: Point, t: f64) -> Point {
		Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Which coordinate regime drives rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
	#[default]
	Force,
	Map,
}

impl Mode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Force => "force",
			Self::Map => "map",
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Mode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"force" => Ok(Self::Force),
			"map" => Ok(Self::Map),
			other => Err(format!("unknown chart type {other:?}")),
		}
	}
}
