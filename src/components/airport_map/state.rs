use log::{debug, info, warn};

use super::config::MapConfig;
use super::error::LoadError;
use super::loader::Datasets;
use super::projection::Mercator;
use super::scale::LinearScale;
use super::scene::Scene;
use super::simulation::Simulation;
use super::transition::Transition;
use super::types::{LinkEndpoint, Mode, Point};

/// The simulation restart owed after returning to the force layout. Only
/// honoured while `token` is still the current switch.
#[derive(Clone, Copy, Debug)]
struct DeferredRestart {
	token: u64,
	due: f64,
}

/// Owns the mode, the simulation and the scene. Every position write goes
/// through here: simulation steps in force mode, the switch routine, drags.
pub struct LayoutController {
	config: MapConfig,
	mode: Mode,
	simulation: Simulation,
	projected: Vec<Point>,
	rendered: Vec<Point>,
	scene: Scene,
	transition: Option<Transition>,
	restart: Option<DeferredRestart>,
	token: u64,
	clock: f64,
	drag: Option<usize>,
	pointer: Option<Point>,
}

impl LayoutController {
	/// Builds the scene from loaded data and starts the force layout.
	pub fn new(data: &Datasets, config: MapConfig) -> Result<Self, LoadError> {
		let airports = &data.airports;
		let countries = data.world.feature(&config.countries_object)?;
		let borders = data.world.mesh(&config.countries_object)?;

		let links = airports
			.links
			.iter()
			.enumerate()
			.map(|(index, link)| {
				let resolve = |endpoint: &LinkEndpoint| {
					airports
						.resolve(endpoint)
						.ok_or_else(|| LoadError::UnresolvedLink {
							index,
							endpoint: endpoint.clone(),
						})
				};
				Ok::<_, LoadError>((resolve(&link.source)?, resolve(&link.target)?))
			})
			.collect::<Result<Vec<_>, LoadError>>()?;

		let scale = LinearScale::from_extent(
			airports.nodes.iter().map(|n| n.passengers),
			config.radius_range,
		);
		let radii: Vec<f64> = airports.nodes.iter().map(|n| scale.apply(n.passengers)).collect();

		let (width, height) = (config.width, config.height);
		let projection = Mercator::fit_extent([[0.0, 0.0], [width, height]], &countries);
		let projected = airports
			.nodes
			.iter()
			.map(|n| projection.project(n.longitude, n.latitude))
			.collect();

		let mut simulation = Simulation::new(
			&radii,
			&links,
			Point::new(width / 2.0, height / 2.0),
			config.charge,
			config.collide,
		);
		simulation.restart();

		let mut scene = Scene::new(
			(width, height),
			&projection,
			&countries,
			&borders,
			airports
				.nodes
				.iter()
				.zip(&radii)
				.map(|(n, &r)| (n.name.clone(), r))
				.collect(),
			&links,
		);
		let rendered = simulation.positions().to_vec();
		scene.set_positions(&rendered);

		info!(
			"scene ready: {} countries, {} routes, {} airports",
			scene.countries.len(),
			scene.links.len(),
			scene.nodes.len()
		);

		Ok(Self {
			config,
			mode: Mode::Force,
			simulation,
			projected,
			rendered,
			scene,
			transition: None,
			restart: None,
			token: 0,
			clock: 0.0,
			drag: None,
			pointer: None,
		})
	}

	#[cfg(test)]
	pub fn mode(&self) -> Mode {
		self.mode
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	#[cfg(test)]
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	#[cfg(test)]
	pub fn is_transitioning(&self) -> bool {
		self.transition.is_some()
	}

	/// Advances the frame clock: the running transition, any restart that
	/// has come due, then one simulation step while the force layout is live.
	pub fn tick(&mut self, dt: f64) {
		self.clock += dt;

		if let Some(transition) = &mut self.transition {
			transition.advance(dt);
			self.rendered = transition.sample();
			if transition.is_finished() {
				self.transition = None;
			}
		}

		if let Some(restart) = self.restart {
			if restart.token != self.token {
				self.restart = None;
			} else if self.clock >= restart.due {
				self.restart = None;
				self.simulation.set_alpha(self.config.restart_alpha);
				self.simulation.restart();
			}
		}

		if self.mode == Mode::Force
			&& self.transition.is_none()
			&& self.simulation.tick(dt as f32)
		{
			self.rendered.copy_from_slice(self.simulation.positions());
		}

		self.scene.set_positions(&self.rendered);
	}

	/// Switches the layout. Selecting the current mode does nothing. A switch
	/// supersedes any transition or deferred restart still in flight; the new
	/// animation starts from whatever is on screen.
	pub fn set_mode(&mut self, mode: Mode) -> bool {
		if mode == self.mode {
			return false;
		}
		self.token += 1;
		self.restart = None;
		if let Some(i) = self.drag.take() {
			self.simulation.unpin(i);
			self.simulation.set_alpha_target(0.0);
		}
		self.mode = mode;
		let duration = self.config.transition_secs;

		match mode {
			Mode::Map => {
				self.simulation.stop();
				for (i, &p) in self.projected.iter().enumerate() {
					self.simulation.pin(i, p);
				}
				self.scene.country_opacity = 1.0;
				self.transition = Some(Transition::new(
					self.rendered.clone(),
					self.projected.clone(),
					duration,
				));
			}
			Mode::Force => {
				self.scene.country_opacity = 0.0;
				self.simulation.unpin_all();
				self.transition = Some(Transition::new(
					self.rendered.clone(),
					self.simulation.positions().to_vec(),
					duration,
				));
				self.restart = Some(DeferredRestart {
					token: self.token,
					due: self.clock + duration,
				});
			}
		}
		info!("layout switched to {mode}");
		true
	}

	/// Starts dragging node `i`. Refused unless the force layout is active
	/// and settled: nodes animating between layouts cannot be grabbed.
	pub fn drag_start(&mut self, i: usize) -> bool {
		if self.mode != Mode::Force {
			warn!("ignoring drag on {:?} in {} mode", self.scene.nodes[i].name, self.mode);
			return false;
		}
		if self.transition.is_some() {
			debug!("ignoring drag on {:?} during a layout switch", self.scene.nodes[i].name);
			return false;
		}
		if self.drag.is_none() {
			self.simulation.set_alpha_target(self.config.drag_alpha_target);
			self.simulation.restart();
		}
		if let Some(prev) = self.drag.replace(i) {
			self.simulation.unpin(prev);
		}
		self.simulation.pin(i, self.simulation.position(i));
		debug!("drag started on {:?}", self.scene.nodes[i].name);
		true
	}

	pub fn drag_move(&mut self, to: Point) {
		if let Some(i) = self.drag {
			self.simulation.pin(i, to);
		}
	}

	pub fn drag_end(&mut self) {
		if let Some(i) = self.drag.take() {
			self.simulation.set_alpha_target(0.0);
			self.simulation.unpin(i);
			debug!("drag ended on {:?}", self.scene.nodes[i].name);
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.drag.is_some()
	}

	pub fn node_at(&self, p: Point) -> Option<usize> {
		self.scene.node_at(p)
	}

	pub fn set_pointer(&mut self, p: Option<Point>) {
		self.pointer = p;
	}

	/// Label under the pointer: an airport, or a country while the map shows.
	pub fn hover_label(&self) -> Option<(&str, Point)> {
		let p = self.pointer?;
		if let Some(i) = self.scene.node_at(p) {
			return Some((&self.scene.nodes[i].name, p));
		}
		if self.scene.country_opacity > 0.0 {
			let i = self.scene.country_at(p)?;
			return Some((&self.scene.countries[i].name, p));
		}
		None
	}
}
