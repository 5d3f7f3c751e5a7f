use super::types::Point;

/// Cubic ease-in-out.
fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// A fixed-duration interpolation of every node position from one snapshot
/// to another. Driven by the frame clock rather than timers.
#[derive(Clone, Debug)]
pub struct Transition {
	from: Vec<Point>,
	to: Vec<Point>,
	elapsed: f64,
	duration: f64,
}

impl Transition {
	pub fn new(from: Vec<Point>, to: Vec<Point>, duration: f64) -> Self {
		debug_assert_eq!(from.len(), to.len());
		Self {
			from,
			to,
			elapsed: 0.0,
			duration,
		}
	}

	pub fn advance(&mut self, dt: f64) {
		self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
	}

	pub fn is_finished(&self) -> bool {
		self.elapsed >= self.duration
	}

	pub fn progress(&self) -> f64 {
		if self.duration <= 0.0 {
			1.0
		} else {
			ease_cubic_in_out(self.elapsed / self.duration)
		}
	}

	/// Positions at the current point of the animation.
	pub fn sample(&self) -> Vec<Point> {
		if self.is_finished() {
			return self.to.clone();
		}
		let t = self.progress();
		self.from
			.iter()
			.zip(&self.to)
			.map(|(a, b)| a.lerp(*b, t))
			.collect()
	}
}
