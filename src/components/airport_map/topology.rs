//! TopoJSON decoding into `geojson` features and border meshes.

use std::collections::{HashMap, HashSet};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature};
use serde::Deserialize;

use super::error::TopologyError;

type Ring = Vec<Vec<f64>>;

#[derive(Clone, Debug, Deserialize)]
pub struct Transform {
	pub scale: [f64; 2],
	pub translate: [f64; 2],
}

/// A geometry inside a topology object. `kind` is `None` for null geometries.
#[derive(Clone, Debug, Deserialize)]
pub struct TopoGeometry {
	#[serde(rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub id: Option<serde_json::Value>,
	#[serde(default)]
	pub properties: Option<JsonObject>,
	#[serde(default)]
	pub arcs: serde_json::Value,
	#[serde(default)]
	pub geometries: Vec<TopoGeometry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Topology {
	#[serde(default)]
	pub transform: Option<Transform>,
	pub objects: HashMap<String, TopoGeometry>,
	pub arcs: Vec<Vec<Vec<f64>>>,
}

impl Topology {
	fn object(&self, name: &str) -> Result<&TopoGeometry, TopologyError> {
		self.objects
			.get(name)
			.ok_or_else(|| TopologyError::MissingObject(name.to_string()))
	}

	/// Absolute coordinates of arc `index`, reversed for negative indices.
	fn arc(&self, index: i64) -> Result<Ring, TopologyError> {
		let slot = (if index < 0 { !index } else { index }) as usize;
		let raw = self
			.arcs
			.get(slot)
			.ok_or(TopologyError::ArcOutOfRange(index))?;

		let mut points = Vec::with_capacity(raw.len());
		let (mut x, mut y) = (0.0, 0.0);
		for p in raw {
			let (px, py) = (p.first().copied().unwrap_or(0.0), p.get(1).copied().unwrap_or(0.0));
			points.push(match &self.transform {
				Some(t) => {
					// quantized arcs are delta-encoded
					x += px;
					y += py;
					vec![x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
				}
				None => vec![px, py],
			});
		}
		if index < 0 {
			points.reverse();
		}
		Ok(points)
	}

	fn line(&self, arcs: &[i64]) -> Result<Ring, TopologyError> {
		let mut points: Ring = Vec::new();
		for &index in arcs {
			let arc = self.arc(index)?;
			// consecutive arcs share their joining point
			points.pop();
			points.extend(arc);
		}
		Ok(points)
	}

	fn rings(&self, arcs: &[Vec<i64>]) -> Result<Vec<Ring>, TopologyError> {
		arcs.iter().map(|ring| self.line(ring)).collect()
	}

	fn geometry(&self, geom: &TopoGeometry) -> Result<Option<Geometry>, TopologyError> {
		let Some(kind) = geom.kind.as_deref() else {
			return Ok(None);
		};
		let malformed = |_| TopologyError::MalformedArcs(kind.to_string());
		let value = match kind {
			"LineString" => {
				let arcs: Vec<i64> = serde_json::from_value(geom.arcs.clone()).map_err(malformed)?;
				Value::LineString(self.line(&arcs)?)
			}
			"MultiLineString" | "Polygon" => {
				let arcs: Vec<Vec<i64>> =
					serde_json::from_value(geom.arcs.clone()).map_err(malformed)?;
				let rings = self.rings(&arcs)?;
				if kind == "Polygon" {
					Value::Polygon(rings)
				} else {
					Value::MultiLineString(rings)
				}
			}
			"MultiPolygon" => {
				let arcs: Vec<Vec<Vec<i64>>> =
					serde_json::from_value(geom.arcs.clone()).map_err(malformed)?;
				let polygons = arcs
					.iter()
					.map(|poly| self.rings(poly))
					.collect::<Result<_, _>>()?;
				Value::MultiPolygon(polygons)
			}
			other => return Err(TopologyError::UnsupportedGeometry(other.to_string())),
		};
		Ok(Some(Geometry::new(value)))
	}

	fn feature_of(&self, geom: &TopoGeometry) -> Result<Feature, TopologyError> {
		let id = match &geom.id {
			Some(serde_json::Value::String(s)) => Some(feature::Id::String(s.clone())),
			Some(serde_json::Value::Number(n)) => Some(feature::Id::Number(n.clone())),
			_ => None,
		};
		Ok(Feature {
			bbox: None,
			geometry: self.geometry(geom)?,
			id,
			properties: geom.properties.clone(),
			foreign_members: None,
		})
	}

	/// Converts the named object into features. A geometry collection yields
	/// one feature per member.
	pub fn feature(&self, name: &str) -> Result<FeatureCollection, TopologyError> {
		let object = self.object(name)?;
		let features = if object.kind.as_deref() == Some("GeometryCollection") {
			object
				.geometries
				.iter()
				.map(|g| self.feature_of(g))
				.collect::<Result<_, _>>()?
		} else {
			vec![self.feature_of(object)?]
		};
		Ok(FeatureCollection {
			bbox: None,
			features,
			foreign_members: None,
		})
	}

	/// Every arc used by the named object, each emitted once, as one
	/// multi-line geometry.
	pub fn mesh(&self, name: &str) -> Result<Geometry, TopologyError> {
		let object = self.object(name)?;
		let mut order = Vec::new();
		collect_arcs(object, &mut order);

		let mut seen = HashSet::new();
		let mut lines = Vec::new();
		for index in order {
			let slot = if index < 0 { !index } else { index };
			if seen.insert(slot) {
				lines.push(self.arc(slot)?);
			}
		}
		Ok(Geometry::new(Value::MultiLineString(lines)))
	}
}

fn collect_arcs(geom: &TopoGeometry, out: &mut Vec<i64>) {
	fn walk(value: &serde_json::Value, out: &mut Vec<i64>) {
		match value {
			serde_json::Value::Number(n) => out.extend(n.as_i64()),
			serde_json::Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
			_ => {}
		}
	}
	walk(&geom.arcs, out);
	for child in &geom.geometries {
		collect_arcs(child, out);
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// Two unit squares side by side sharing the edge x = 1.
	pub(crate) const TWO_SQUARES: &str = r#"{
		"type": "Topology",
		"transform": {"scale": [1, 1], "translate": [0, 0]},
		"objects": {
			"countries": {
				"type": "GeometryCollection",
				"geometries": [
					{"type": "Polygon", "arcs": [[0, 1]], "id": "A", "properties": {"name": "Westland"}},
					{"type": "Polygon", "arcs": [[-1, 2]], "properties": {"name": "Eastland"}},
					{"type": null, "properties": {"name": "Nowhere"}}
				]
			}
		},
		"arcs": [
			[[1, 0], [0, 1]],
			[[1, 1], [-1, 0], [0, -1], [1, 0]],
			[[1, 0], [1, 0], [0, 1], [-1, 0]]
		]
	}"#;

	fn two_squares() -> Topology {
		serde_json::from_str(TWO_SQUARES).unwrap()
	}

	#[test]
	fn decodes_quantized_arcs() {
		let topo = two_squares();
		assert_eq!(topo.arc(0).unwrap(), vec![vec![1.0, 0.0], vec![1.0, 1.0]]);
		assert_eq!(topo.arc(-1).unwrap(), vec![vec![1.0, 1.0], vec![1.0, 0.0]]);
		assert_eq!(topo.arc(7), Err(TopologyError::ArcOutOfRange(7)));
	}

	#[test]
	fn stitches_polygon_rings() {
		let countries = two_squares().feature("countries").unwrap();
		assert_eq!(countries.features.len(), 3);

		let west = &countries.features[0];
		assert_eq!(west.property("name").and_then(|v| v.as_str()), Some("Westland"));
		assert_eq!(west.id, Some(feature::Id::String("A".into())));
		let Some(Value::Polygon(rings)) = west.geometry.as_ref().map(|g| &g.value) else {
			panic!("expected polygon");
		};
		assert_eq!(
			rings[0],
			vec![
				vec![1.0, 0.0],
				vec![1.0, 1.0],
				vec![0.0, 1.0],
				vec![0.0, 0.0],
				vec![1.0, 0.0],
			]
		);

		assert!(countries.features[2].geometry.is_none());
	}

	#[test]
	fn mesh_emits_shared_arcs_once() {
		let mesh = two_squares().mesh("countries").unwrap();
		let Value::MultiLineString(lines) = mesh.value else {
			panic!("expected lines");
		};
		assert_eq!(lines.len(), 3);
	}

	#[test]
	fn missing_object_is_an_error() {
		let err = two_squares().feature("land").unwrap_err();
		assert_eq!(err, TopologyError::MissingObject("land".into()));
	}

	#[test]
	fn plain_coordinates_without_transform() {
		let topo: Topology = serde_json::from_str(
			r#"{"type": "Topology", "objects": {"line": {"type": "LineString", "arcs": [0]}},
			"arcs": [[[10.5, 20.0], [11.5, 21.0]]]}"#,
		)
		.unwrap();
		let fc = topo.feature("line").unwrap();
		let geometry = fc.features[0].geometry.clone().unwrap();
		assert_eq!(
			geometry.value,
			Value::LineString(vec![vec![10.5, 20.0], vec![11.5, 21.0]])
		);
	}
}
