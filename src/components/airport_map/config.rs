/// Everything the airport map needs to know up front.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
	/// Viewport width in logical units.
	pub width: f64,
	/// Viewport height in logical units.
	pub height: f64,
	/// Circle radius for the least and the busiest airport.
	pub radius_range: (f64, f64),
	/// Length of a layout switch animation, in seconds.
	pub transition_secs: f64,
	/// Energy given to the simulation when it resumes after the map.
	pub restart_alpha: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	/// Repulsion between nodes, in `force_graph` units.
	pub charge: f32,
	/// Keep circles from overlapping.
	pub collide: bool,
	pub airports_url: String,
	pub world_url: String,
	/// Name of the country collection inside the world topology.
	pub countries_object: String,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self {
			width: 1000.0,
			height: 500.0,
			radius_range: (4.0, 12.0),
			transition_secs: 0.5,
			restart_alpha: 0.2,
			drag_alpha_target: 0.3,
			charge: 150.0,
			collide: false,
			airports_url: "airports.json".into(),
			world_url: "world-110m.json".into(),
			countries_object: "countries".into(),
		}
	}
}
