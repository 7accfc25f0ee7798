//! Report generation for search results.
//!
//! Generates human-readable summaries, JSON reports, GraphViz DOT renderings
//! of a walk over the topology, and step-by-step playback frames.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::search::{SearchOutcome, Visit};
use crate::topology::Topology;
use crate::trials::{SearchParams, TrialSummary};

/// Run metadata attached to JSON reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub config_path: String,
    pub total_nodes: usize,
    pub total_edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ReportMetadata {
    pub fn new(config_path: &Path, topology: &Topology, seed: Option<u64>) -> Self {
        Self {
            generated_at: Utc::now(),
            config_path: config_path.display().to_string(),
            total_nodes: topology.len(),
            total_edges: topology.edges().len(),
            seed,
        }
    }
}

/// Full report of one search invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub metadata: ReportMetadata,
    pub params: SearchParams,
    pub outcome: SearchOutcome,
}

/// Full report of a batch of trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialReport {
    pub metadata: ReportMetadata,
    pub summary: TrialSummary,
}

/// Human-readable summary of one search
pub fn format_outcome(outcome: &SearchOutcome) -> String {
    let mut lines = vec![
        format!("Algorithm: {}", outcome.strategy),
        format!("Messages exchanged: {}", outcome.messages),
        format!("Nodes involved: {}", outcome.nodes_touched),
    ];
    match &outcome.found_at {
        Some(node) => lines.push(format!("Resource found at node '{}'", node)),
        None => lines.push("Resource not found".to_string()),
    }
    lines.join("\n")
}

/// Human-readable summary of a trial batch
pub fn format_summary(summary: &TrialSummary) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("=".repeat(60));
    lines.push(format!(
        "{} x{} from '{}' for '{}' (TTL {})",
        summary.params.strategy,
        summary.trials,
        summary.params.start,
        summary.params.target,
        summary.params.ttl
    ));
    lines.push("=".repeat(60));
    lines.push(format!(
        "Success rate: {:.1}% ({}/{})",
        summary.success_rate * 100.0,
        summary.successes,
        summary.trials
    ));
    lines.push(format!(
        "Messages:       min {:>4}  max {:>4}  mean {:>7.2}",
        summary.messages.min, summary.messages.max, summary.messages.mean
    ));
    lines.push(format!(
        "Nodes involved: min {:>4}  max {:>4}  mean {:>7.2}",
        summary.nodes_touched.min, summary.nodes_touched.max, summary.nodes_touched.mean
    ));
    lines.push(format!("Base seed: {}", summary.base_seed));
    lines.join("\n")
}

/// Step-by-step playback lines for a walk history
pub fn playback_frames(history: &[Visit]) -> Vec<String> {
    history
        .iter()
        .enumerate()
        .map(|(i, visit)| {
            format!(
                "Step {}/{}: '{}' {}",
                i + 1,
                history.len(),
                visit.node,
                if visit.found { "found" } else { "-" }
            )
        })
        .collect()
}

/// Generate GraphViz DOT for the topology with a walk history highlighted.
///
/// Visited nodes are yellow, the node where the target was found is green,
/// and edges traversed by the walk are bold.
pub fn generate_dot(topology: &Topology, history: &[Visit]) -> String {
    let visited: HashSet<&str> = history.iter().map(|v| v.node.as_str()).collect();
    let found: HashSet<&str> = history
        .iter()
        .filter(|v| v.found)
        .map(|v| v.node.as_str())
        .collect();
    let traversed: HashSet<(&str, &str)> = history
        .windows(2)
        .flat_map(|pair| {
            let (a, b) = (pair[0].node.as_str(), pair[1].node.as_str());
            [(a, b), (b, a)]
        })
        .collect();

    let mut dot = String::new();
    dot.push_str("graph Overlay {\n");
    dot.push_str("    node [shape=circle, style=filled];\n");
    dot.push_str(&format!("    label=\"{} steps\";\n", history.len()));
    dot.push_str("    labelloc=t;\n\n");

    for (name, state) in topology.nodes() {
        let color = if found.contains(&name) {
            "green"
        } else if visited.contains(&name) {
            "yellow"
        } else {
            "lightgray"
        };
        let id = dot_escape(name);
        let label = if state.resources.is_empty() {
            id.clone()
        } else {
            let resources: Vec<String> = state.resources.iter().map(|r| dot_escape(r)).collect();
            format!("{}\\n[{}]", id, resources.join(","))
        };
        dot.push_str(&format!(
            "    \"{}\" [label=\"{}\", fillcolor={}];\n",
            id, label, color
        ));
    }

    dot.push('\n');

    for (a, b) in topology.edges() {
        let style = if traversed.contains(&(a.as_str(), b.as_str())) {
            " [penwidth=3]"
        } else {
            ""
        };
        dot.push_str(&format!(
            "    \"{}\" -- \"{}\"{};\n",
            dot_escape(a),
            dot_escape(b),
            style
        ));
    }

    dot.push_str("}\n");
    dot
}

/// Escape a value for use inside a double-quoted DOT string
fn dot_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write any serializable report as pretty JSON
pub fn write_json_report<T: Serialize>(report: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Write a DOT rendering to disk
pub fn write_dot(topology: &Topology, history: &[Visit], output_path: &Path) -> Result<()> {
    fs::write(output_path, generate_dot(topology, history))
        .with_context(|| format!("Failed to write DOT file to {}", output_path.display()))?;

    log::info!("DOT rendering written to {}", output_path.display());
    Ok(())
}
