//! Linear mapping from passenger counts to circle radii.

/// A clamped linear scale from `domain` onto `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	pub domain: (f64, f64),
	pub range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// Builds a scale whose domain is the `[min, max]` extent of `values`.
	/// Non-finite values are ignored; an empty input gives `[0, 0]`.
	pub fn from_extent<I>(values: I, range: (f64, f64)) -> Self
	where
		I: IntoIterator<Item = f64>,
	{
		let extent = values
			.into_iter()
			.filter(|v| v.is_finite())
			.fold(None, |acc: Option<(f64, f64)>, v| match acc {
				None => Some((v, v)),
				Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
			});
		Self::new(extent.unwrap_or((0.0, 0.0)), range)
	}

	/// Maps `value` into the range. A zero-width domain maps everything to the
	/// middle of the range.
	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		let width = d1 - d0;
		let t = if width == 0.0 || !width.is_finite() {
			0.5
		} else {
			((value - d0) / width).clamp(0.0, 1.0)
		};
		r0 + (r1 - r0) * t
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn extremes_map_to_range_ends() {
		let scale = LinearScale::from_extent([10.0, 1000.0, 505.0], (4.0, 12.0));
		assert_eq!(scale.domain, (10.0, 1000.0));
		assert_eq!(scale.apply(10.0), 4.0);
		assert_eq!(scale.apply(1000.0), 12.0);
		assert_eq!(scale.apply(505.0), 8.0);
	}

	#[test]
	fn equal_counts_give_one_radius() {
		let scale = LinearScale::from_extent([100.0; 5], (4.0, 12.0));
		let radii: Vec<f64> = [100.0; 5].iter().map(|&p| scale.apply(p)).collect();
		assert!(radii.iter().all(|r| *r == radii[0]));
		assert!(radii[0].is_finite());
	}

	#[test]
	fn empty_input_does_not_panic() {
		let scale = LinearScale::from_extent(std::iter::empty(), (4.0, 12.0));
		assert_eq!(scale.apply(3.0), 8.0);
	}

	proptest! {
		#[test]
		fn radius_is_bounded_and_monotonic(
			mut counts in prop::collection::vec(0.0f64..1.0e9, 1..64),
		) {
			let scale = LinearScale::from_extent(counts.iter().copied(), (4.0, 12.0));
			counts.sort_by(f64::total_cmp);
			let radii: Vec<f64> = counts.iter().map(|&c| scale.apply(c)).collect();
			for r in &radii {
				prop_assert!((4.0..=12.0).contains(r));
			}
			for pair in radii.windows(2) {
				prop_assert!(pair[0] <= pair[1]);
			}
		}
	}
}
