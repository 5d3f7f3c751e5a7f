use thiserror::Error;

use super::types::LinkEndpoint;

/// Failures while turning a TopoJSON object into geometry.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
	#[error("topology has no object named {0:?}")]
	MissingObject(String),
	#[error("arc index {0} is out of range")]
	ArcOutOfRange(i64),
	#[error("unsupported geometry type {0:?}")]
	UnsupportedGeometry(String),
	#[error("malformed arcs on {0} geometry")]
	MalformedArcs(String),
}

/// Anything that aborts startup. There is no partial rendering.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("failed to fetch {url}: {reason}")]
	Fetch { url: String, reason: String },
	#[error("{url} answered with HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("failed to decode {what}")]
	Decode {
		what: &'static str,
		#[source]
		source: serde_json::Error,
	},
	#[error(transparent)]
	Topology(#[from] TopologyError),
	#[error("route {index} references unknown airport {endpoint}")]
	UnresolvedLink { index: usize, endpoint: LinkEndpoint },
}
