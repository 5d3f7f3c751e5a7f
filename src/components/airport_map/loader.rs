use futures_util::future::try_join;
use gloo_net::http::Request;
use log::info;

use super::error::LoadError;
use super::topology::Topology;
use super::types::AirportData;

/// Both inputs, available only once both have arrived.
#[derive(Clone, Debug)]
pub struct Datasets {
	pub airports: AirportData,
	pub world: Topology,
}

pub fn parse_airports(text: &str) -> Result<AirportData, LoadError> {
	serde_json::from_str(text).map_err(|source| LoadError::Decode {
		what: "airport graph",
		source,
	})
}

pub fn parse_topology(text: &str) -> Result<Topology, LoadError> {
	serde_json::from_str(text).map_err(|source| LoadError::Decode {
		what: "world topology",
		source,
	})
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
	let fetch_err = |e: gloo_net::Error| LoadError::Fetch {
		url: url.to_string(),
		reason: e.to_string(),
	};
	let resp = Request::get(url).send().await.map_err(fetch_err)?;
	if !resp.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: resp.status(),
		});
	}
	resp.text().await.map_err(fetch_err)
}

/// Fetches both datasets concurrently. Either failure fails the whole load.
pub async fn load_datasets(airports_url: &str, world_url: &str) -> Result<Datasets, LoadError> {
	let (airports, world) = try_join(
		async { parse_airports(&fetch_text(airports_url).await?) },
		async { parse_topology(&fetch_text(world_url).await?) },
	)
	.await?;
	info!(
		"loaded {} airports, {} routes and {} topology objects",
		airports.nodes.len(),
		airports.links.len(),
		world.objects.len()
	);
	Ok(Datasets { airports, world })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decode_errors_name_the_dataset() {
		let err = parse_airports("{\"nodes\": 3}").unwrap_err();
		assert!(matches!(err, LoadError::Decode { what: "airport graph", .. }));
		assert_eq!(err.to_string(), "failed to decode airport graph");

		let err = parse_topology("[]").unwrap_err();
		assert!(matches!(err, LoadError::Decode { what: "world topology", .. }));
	}

	#[test]
	fn parses_both_inputs() {
		let airports = parse_airports(
			r#"{"nodes": [{"name": "A", "longitude": 1, "latitude": 2, "passengers": 3}], "links": []}"#,
		)
		.unwrap();
		assert_eq!(airports.nodes[0].name, "A");

		let world = parse_topology(crate::components::airport_map::topology::tests::TWO_SQUARES).unwrap();
		assert!(world.objects.contains_key("countries"));
	}
}
