//! JSON export of final node histories.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use meshchat_core::{Network, Node};
use serde::Serialize;
use thiserror::Error;

/// Failure writing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Could not create or flush the output file
    #[error("report I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Serialization failed
    #[error("report encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every node in creation order, with neighbors and history.
#[derive(Debug, Serialize)]
pub struct HistoryReport<'a> {
    nodes: Vec<&'a Node>,
}

impl<'a> HistoryReport<'a> {
    /// Borrow the nodes of `network`.
    pub fn new(network: &'a Network) -> Self {
        Self { nodes: network.nodes().collect() }
    }

    /// Write pretty-printed JSON to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the report into it.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use meshchat_core::{Environment, Message, propagate};
    use meshchat_harness::SimEnv;
    use serde_json::Value;

    use super::*;

    fn linked_pair() -> Network {
        let env = SimEnv::with_seed(4);
        let mut network = Network::with_isolated_nodes(3, &env);
        let [a, b] = [network.node_ids()[0], network.node_ids()[1]];
        network.connect(a, b).unwrap();
        propagate(&mut network, a, Message::new("Hello!", a, env.now())).unwrap();
        network
    }

    #[test]
    fn report_lists_nodes_in_creation_order() {
        let network = linked_pair();
        let mut buffer = Vec::new();
        HistoryReport::new(&network).write_to(&mut buffer).unwrap();

        let json: Value = serde_json::from_slice(&buffer).unwrap();
        let nodes = json["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);

        let ids: Vec<String> = network.node_ids().iter().map(ToString::to_string).collect();
        for (node, id) in nodes.iter().zip(&ids) {
            assert_eq!(node["id"], Value::String(id.clone()));
        }

        assert_eq!(nodes[0]["connected"], Value::Bool(true));
        assert_eq!(nodes[1]["neighbors"][0], Value::String(ids[0].clone()));
        assert_eq!(nodes[1]["history"][0]["content"], "Hello!");
        assert_eq!(nodes[2]["connected"], Value::Bool(false));
        assert!(nodes[2]["history"].as_array().unwrap().is_empty());
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("histories.json");

        let network = linked_pair();
        HistoryReport::new(&network).save(&path).unwrap();

        let json: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("histories.json");

        let network = linked_pair();
        let err = HistoryReport::new(&network).save(&path).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
