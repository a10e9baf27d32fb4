//! Input data for the relationship diagram, as emitted by the API layer.

use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer};

/// Queue disposition of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
	/// An editor has picked it up.
	Assigned,
	/// Being edited.
	InProgress,
	/// Editing finished.
	Done,
}

impl Disposition {
	/// Parse a disposition, warning about (and discarding) unknown values.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"" => None,
			"assigned" => Some(Disposition::Assigned),
			"in_progress" => Some(Disposition::InProgress),
			"done" => Some(Disposition::Done),
			other => {
				warn!("Unable to parse disposition: {other:?}");
				None
			}
		}
	}

	/// Lowercase phrase for tooltips.
	pub fn describe(self) -> &'static str {
		match self {
			Disposition::Assigned => "assigned",
			Disposition::InProgress => "in progress",
			Disposition::Done => "done",
		}
	}
}

fn deserialize_disposition<'de, D>(deserializer: D) -> Result<Option<Disposition>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;
	Ok(raw.as_deref().and_then(Disposition::parse))
}

/// Kind of a directed reference between two documents.
///
/// Kinds the renderer has no style for are kept in `Unknown` so they can
/// still be drawn with the fallback colour.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Relationship {
	/// `refqueue`: normative reference to a document queued for publication.
	RefQueue,
	/// `not-received`: normative reference to a document still in draft state.
	NotReceived,
	/// `withdrawnref`: normative reference to a document withdrawn from the queue.
	WithdrawnRef,
	/// `relinfo`: informative relation.
	RelInfo,
	/// `refnorm`: normative reference.
	RefNorm,
	/// Any other kind, kept verbatim.
	Unknown(String),
}

impl Relationship {
	/// Every kind with its own colour.
	pub const KNOWN: [Relationship; 5] = [
		Relationship::RefQueue,
		Relationship::NotReceived,
		Relationship::WithdrawnRef,
		Relationship::RelInfo,
		Relationship::RefNorm,
	];

	/// Wire name.
	pub fn as_str(&self) -> &str {
		match self {
			Relationship::RefQueue => "refqueue",
			Relationship::NotReceived => "not-received",
			Relationship::WithdrawnRef => "withdrawnref",
			Relationship::RelInfo => "relinfo",
			Relationship::RefNorm => "refnorm",
			Relationship::Unknown(raw) => raw,
		}
	}

	/// Phrase used between the two document names in tooltips.
	pub fn human(&self) -> &str {
		match self {
			Relationship::RefQueue => "has ref queue to",
			Relationship::NotReceived => "has not received to",
			Relationship::WithdrawnRef => "has withdrawn ref to",
			Relationship::RelInfo => "has rel info to",
			Relationship::RefNorm => "has ref norm to",
			Relationship::Unknown(raw) => raw,
		}
	}

	/// Safe to use as an svg id fragment.
	pub fn slug(&self) -> String {
		self.as_str()
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
			.collect()
	}
}

impl From<String> for Relationship {
	fn from(value: String) -> Self {
		match value.as_str() {
			"refqueue" => Relationship::RefQueue,
			"not-received" => Relationship::NotReceived,
			"withdrawnref" => Relationship::WithdrawnRef,
			"relinfo" => Relationship::RelInfo,
			"refnorm" => Relationship::RefNorm,
			_ => Relationship::Unknown(value),
		}
	}
}

impl From<&str> for Relationship {
	fn from(value: &str) -> Self {
		Relationship::from(value.to_owned())
	}
}

impl fmt::Display for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A document in the graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeParam {
	/// Unique identifier (the draft name). Referenced by links.
	pub id: String,
	/// Optional in-app link target, e.g. `/docs/draft-foo`.
	#[serde(default)]
	pub url: Option<String>,
	/// Publication number, rendered as the first label line.
	#[serde(default)]
	pub rfc_number: Option<u32>,
	/// Already published as an RFC.
	#[serde(default)]
	pub is_rfc: bool,
	/// Whether the editor has received it; unknown when absent.
	#[serde(default)]
	pub is_received: Option<bool>,
	/// Queue disposition. Unrecognized values deserialize to `None`.
	#[serde(default, deserialize_with = "deserialize_disposition")]
	pub disposition: Option<Disposition>,
}

impl NodeParam {
	/// A node with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}
}

/// A directed, kind-tagged edge between two node ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinkParam {
	/// Id of the referencing node.
	pub source: String,
	/// Id of the referenced node.
	pub target: String,
	/// Relationship kind.
	pub rel: Relationship,
}

impl LinkParam {
	/// A `source` -> `target` link of kind `rel`.
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		rel: impl Into<Relationship>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			rel: rel.into(),
		}
	}
}

/// Complete diagram input: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DataParam {
	/// Documents; ids should be unique.
	#[serde(default)]
	pub nodes: Vec<NodeParam>,
	/// References between documents, by id.
	#[serde(default)]
	pub links: Vec<LinkParam>,
}

/// Mutually exclusive display state of a document, most specific first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeState {
	/// Published as an RFC.
	Published,
	/// Disposition done.
	Done,
	/// Disposition in progress.
	InProgress,
	/// Disposition assigned.
	Assigned,
	/// No disposition, not received.
	NotReceived,
	/// No disposition, received.
	Received,
	/// Nothing known.
	Unknown,
}

impl NodeState {
	/// The most specific state that applies to `param`.
	pub fn of(param: &NodeParam) -> Self {
		if param.is_rfc {
			return NodeState::Published;
		}
		match (param.disposition, param.is_received) {
			(Some(Disposition::Done), _) => NodeState::Done,
			(Some(Disposition::InProgress), _) => NodeState::InProgress,
			(Some(Disposition::Assigned), _) => NodeState::Assigned,
			(None, Some(false)) => NodeState::NotReceived,
			(None, Some(true)) => NodeState::Received,
			(None, None) => NodeState::Unknown,
		}
	}
}

/// Fixed graph showing every relationship kind and reception state.
pub fn legend_data() -> DataParam {
	let hub = "draft-one-with-rfc";
	let nodes = vec![
		NodeParam {
			is_rfc: true,
			rfc_number: Some(100),
			..NodeParam::new(hub)
		},
		NodeParam::new("draft-one-without-rfc"),
		NodeParam {
			is_received: Some(false),
			..NodeParam::new("draft-is-not-received")
		},
		NodeParam {
			is_received: Some(true),
			..NodeParam::new("draft-is-received")
		},
		NodeParam {
			is_received: Some(true),
			..NodeParam::new("draft-refnorm-target")
		},
		NodeParam {
			is_received: Some(true),
			..NodeParam::new("draft-refqueue-target")
		},
		NodeParam {
			is_received: Some(true),
			..NodeParam::new("draft-relinfo-target")
		},
		NodeParam {
			is_received: Some(true),
			..NodeParam::new("draft-withdrawnref-target")
		},
	];
	let links = vec![
		LinkParam::new(hub, "draft-is-not-received", Relationship::NotReceived),
		LinkParam::new(hub, "draft-refnorm-target", Relationship::RefNorm),
		LinkParam::new(hub, "draft-refqueue-target", Relationship::RefQueue),
		LinkParam::new(hub, "draft-relinfo-target", Relationship::RelInfo),
		LinkParam::new(hub, "draft-withdrawnref-target", Relationship::WithdrawnRef),
		LinkParam::new(hub, "draft-is-received", Relationship::RefNorm),
	];
	DataParam { nodes, links }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_api_payload() {
		let json = r#"{
			"nodes": [
				{"id": "draft-a", "isRfc": true, "rfcNumber": 9000, "url": "/docs/draft-a"},
				{"id": "draft-b", "isReceived": false, "disposition": "in_progress"},
				{"id": "draft-c", "disposition": "bogus"}
			],
			"links": [
				{"source": "draft-a", "target": "draft-b", "rel": "refqueue"},
				{"source": "draft-b", "target": "draft-c", "rel": "downref"}
			]
		}"#;
		let data: DataParam = serde_json::from_str(json).unwrap();

		assert_eq!(data.nodes[0].rfc_number, Some(9000));
		assert!(data.nodes[0].is_rfc);
		assert_eq!(data.nodes[1].disposition, Some(Disposition::InProgress));
		assert_eq!(data.nodes[1].is_received, Some(false));
		assert_eq!(data.nodes[2].disposition, None);
		assert_eq!(data.links[0].rel, Relationship::RefQueue);
		assert_eq!(data.links[1].rel, Relationship::Unknown("downref".into()));
	}

	#[test]
	fn node_state_priority() {
		let mut param = NodeParam {
			is_rfc: true,
			is_received: Some(false),
			disposition: Some(Disposition::Assigned),
			..NodeParam::new("x")
		};
		assert_eq!(NodeState::of(&param), NodeState::Published);

		param.is_rfc = false;
		assert_eq!(NodeState::of(&param), NodeState::Assigned);

		param.disposition = Some(Disposition::Done);
		assert_eq!(NodeState::of(&param), NodeState::Done);

		param.disposition = None;
		assert_eq!(NodeState::of(&param), NodeState::NotReceived);

		param.is_received = Some(true);
		assert_eq!(NodeState::of(&param), NodeState::Received);

		param.is_received = None;
		assert_eq!(NodeState::of(&param), NodeState::Unknown);
	}

	#[test]
	fn relationship_round_trips_through_str() {
		for rel in Relationship::KNOWN {
			assert_eq!(Relationship::from(rel.as_str()), rel);
		}
		assert_eq!(Relationship::from("odd kind").slug(), "odd_kind");
	}

	#[test]
	fn legend_covers_every_known_relationship() {
		let legend = legend_data();
		for rel in Relationship::KNOWN {
			assert!(legend.links.iter().any(|l| l.rel == rel), "{rel} missing");
		}
	}
}
