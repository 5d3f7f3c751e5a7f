//! Force layout over the airport nodes.
//!
//! Charge and spring forces come from `force_graph`. On top of that the
//! engine keeps an `alpha` energy that cools every step and stops the
//! simulation once it drops below [`ALPHA_MIN`], a centering pass toward the
//! viewport midpoint, and an optional collision pass sized by node radius.
//! Pins are recorded immediately but only written into the graph on the next
//! step, so pinning a stopped simulation never disturbs its coordinates.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::Point;

pub const ALPHA_MIN: f64 = 0.001;

/// Cools `alpha` from 1 to [`ALPHA_MIN`] in roughly 300 steps.
pub fn default_alpha_decay() -> f64 {
	1.0 - ALPHA_MIN.powf(1.0 / 300.0)
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub slot: usize,
}

pub struct Simulation {
	graph: ForceGraph<NodeInfo, ()>,
	positions: Vec<Point>,
	pins: Vec<Option<Point>>,
	radii: Vec<f64>,
	center: Point,
	collide: bool,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
}

impl Simulation {
	/// Seeds nodes on a phyllotaxis spiral around `center`.
	pub fn new(
		radii: &[f64],
		links: &[(usize, usize)],
		center: Point,
		charge: f32,
		collide: bool,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: charge,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let golden_angle = PI * (3.0 - 5f64.sqrt());

		let mut handles: Vec<DefaultNodeIdx> = Vec::with_capacity(radii.len());
		let mut positions = Vec::with_capacity(radii.len());
		for slot in 0..radii.len() {
			let (r, angle) = (10.0 * (0.5 + slot as f64).sqrt(), slot as f64 * golden_angle);
			let p = Point::new(center.x + r * angle.cos(), center.y + r * angle.sin());
			handles.push(graph.add_node(NodeData {
				x: p.x as f32,
				y: p.y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo { slot },
			}));
			positions.push(p);
		}
		for &(src, tgt) in links {
			graph.add_edge(handles[src], handles[tgt], EdgeData::default());
		}

		Self {
			graph,
			pins: vec![None; positions.len()],
			positions,
			radii: radii.to_vec(),
			center,
			collide,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: default_alpha_decay(),
			running: false,
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	pub fn restart(&mut self) {
		if !self.running {
			debug!("simulation restarted at alpha {:.3}", self.alpha);
		}
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Last simulated position of node `i`.
	pub fn position(&self, i: usize) -> Point {
		self.positions[i]
	}

	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	pub fn pin(&mut self, i: usize, at: Point) {
		self.pins[i] = Some(at);
	}

	pub fn unpin(&mut self, i: usize) {
		self.pins[i] = None;
	}

	pub fn unpin_all(&mut self) {
		self.pins.iter_mut().for_each(|p| *p = None);
	}

	#[cfg(test)]
	pub fn pin_of(&self, i: usize) -> Option<Point> {
		self.pins[i]
	}

	/// Advances one step. Returns whether positions moved.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		let pins = &self.pins;
		self.graph.visit_nodes_mut(|node| {
			let pin = pins[node.data.user_data.slot];
			node.data.is_anchor = pin.is_some();
			if let Some(p) = pin {
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
			}
		});
		self.graph.update(dt * self.alpha as f32);
		self.graph.visit_nodes(|node| {
			self.positions[node.data.user_data.slot] =
				Point::new(node.x() as f64, node.y() as f64);
		});

		self.apply_center();
		if self.collide {
			self.apply_collide();
		}

		let positions = &self.positions;
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				let p = positions[node.data.user_data.slot];
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
			}
		});

		if self.alpha < ALPHA_MIN {
			self.running = false;
			debug!("simulation cooled down");
		}
		true
	}

	/// Translates free nodes so the mean position sits on the center.
	fn apply_center(&mut self) {
		if self.positions.is_empty() {
			return;
		}
		let n = self.positions.len() as f64;
		let (sx, sy) = self
			.positions
			.iter()
			.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
		let (dx, dy) = (sx / n - self.center.x, sy / n - self.center.y);
		for (p, pin) in self.positions.iter_mut().zip(&self.pins) {
			if pin.is_none() {
				p.x -= dx;
				p.y -= dy;
			}
		}
	}

	/// Pushes overlapping circles apart. A pinned node never moves, so the
	/// free one takes the whole correction.
	fn apply_collide(&mut self) {
		let n = self.positions.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (self.positions[i], self.positions[j]);
				let min = self.radii[i] + self.radii[j];
				let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min {
					continue;
				}
				if dist < 1e-9 {
					// coincident: separate along a fixed axis
					(dx, dy, dist) = (1.0, 0.0, 1.0);
				}
				let overlap = (min - dist) / dist;
				let (fi, fj) = match (self.pins[i].is_some(), self.pins[j].is_some()) {
					(false, false) => (0.5, 0.5),
					(true, false) => (0.0, 1.0),
					(false, true) => (1.0, 0.0),
					(true, true) => (0.0, 0.0),
				};
				self.positions[i].x -= dx * overlap * fi;
				self.positions[i].y -= dy * overlap * fi;
				self.positions[j].x += dx * overlap * fj;
				self.positions[j].y += dy * overlap * fj;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn triangle() -> Simulation {
		Simulation::new(
			&[4.0, 8.0, 12.0],
			&[(0, 1), (1, 2)],
			Point::new(500.0, 250.0),
			150.0,
			true,
		)
	}

	#[test]
	fn stopped_simulation_does_not_move() {
		let mut sim = triangle();
		let before = sim.positions().to_vec();
		assert!(!sim.tick(0.016));
		assert_eq!(sim.positions(), before.as_slice());
	}

	#[test]
	fn pinned_node_holds_its_pin() {
		let mut sim = triangle();
		sim.restart();
		let pin = Point::new(100.0, 120.0);
		sim.pin(1, pin);
		for _ in 0..20 {
			sim.tick(0.016);
		}
		assert_eq!(sim.position(1), Point::new(100.0, 120.0));
		assert_eq!(sim.pin_of(1), Some(pin));
	}

	#[test]
	fn pins_do_not_touch_a_stopped_layout() {
		let mut sim = triangle();
		let before = sim.position(0);
		sim.pin(0, Point::new(1.0, 1.0));
		sim.tick(0.016);
		assert_eq!(sim.position(0), before);
		sim.unpin_all();
		assert!((0..sim.len()).all(|i| sim.pin_of(i).is_none()));
	}

	#[test]
	fn cools_down_and_reheats() {
		let mut sim = triangle();
		sim.restart();
		for _ in 0..400 {
			sim.tick(0.016);
		}
		assert!(!sim.is_running());
		assert!(sim.alpha() < ALPHA_MIN);

		sim.set_alpha(0.2);
		sim.restart();
		assert!(sim.tick(0.016));
		assert!(sim.alpha() > ALPHA_MIN);
	}

	#[test]
	fn alpha_target_keeps_it_warm() {
		let mut sim = triangle();
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..1000 {
			sim.tick(0.016);
		}
		assert!(sim.is_running());
		assert!((sim.alpha() - 0.3).abs() < 0.01);
	}

	#[test]
	fn free_nodes_stay_centered() {
		let mut sim = triangle();
		sim.restart();
		for _ in 0..50 {
			sim.tick(0.016);
		}
		let n = sim.len() as f64;
		let (mx, my) = sim
			.positions()
			.iter()
			.fold((0.0, 0.0), |(x, y), p| (x + p.x / n, y + p.y / n));
		assert!((mx - 500.0).abs() < 1e-3 && (my - 250.0).abs() < 1e-3);
	}

	#[test]
	fn collision_separates_overlapping_circles() {
		let radii = [12.0; 20];
		let mut sim = Simulation::new(&radii, &[], Point::new(500.0, 250.0), 0.0, true);
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..300 {
			sim.tick(0.016);
		}

		let p = sim.positions();
		let closest = (0..p.len())
			.flat_map(|i| ((i + 1)..p.len()).map(move |j| (i, j)))
			.map(|(i, j)| p[i].distance(p[j]) - (radii[i] + radii[j]))
			.fold(f64::INFINITY, f64::min);
		assert!(closest > -1e-2, "closest pair overlaps by {}", -closest);
	}
}
