//! Minimal dot reader/writer for the dialect exchanged with the layout and
//! coloring tools: one node statement per line with a bracketed attribute
//! list, plain `a -- b` edges, integer node ids.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::formats::read_to_string;
use crate::graph::{Graph, NodeId};

static NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"?(\d+)"?\s*\[(.*)\]"#).unwrap());
static EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"?(\d+)"?\s*--\s*"?(\d+)"?"#).unwrap());

/// Write a sub-graph (or the merged graph) as dot input for gvmap: filled
/// nodes with fixed positions and a single `cluster` attribute carrying the
/// primary cluster only.
pub fn write_dot(graph: &Graph, path: &Path) -> PartanimResult<()> {
    use anyhow::Context as _;
    use std::io::Write as _;

    info!(file = %path.display(), "writing dot file");
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut w = std::io::BufWriter::new(file);

    let io = |e: std::io::Error| {
        PartanimError::format(format!("{}: write failed: {e}", path.display()))
    };

    writeln!(w, "graph G {{").map_err(io)?;
    writeln!(w, "  node [style=filled, shape=circle];").map_err(io)?;
    for (id, attrs) in graph.nodes() {
        let mut fields = Vec::new();
        if let Some((x, y)) = attrs.pos {
            fields.push(format!("pos=\"{x},{y}\""));
        }
        if let Some(cluster) = attrs.primary_cluster() {
            fields.push(format!("cluster=\"{cluster}\""));
        }
        if let Some(color) = &attrs.fillcolor {
            fields.push(format!("fillcolor=\"{color}\""));
        }
        fields.push(format!("width=\"{}\"", attrs.size / 72.0));
        writeln!(w, "  {id} [{}];", fields.join(", ")).map_err(io)?;
    }
    for (a, b, _) in graph.edges() {
        writeln!(w, "  {a} -- {b};").map_err(io)?;
    }
    writeln!(w, "}}").map_err(io)?;
    w.flush().map_err(io)?;
    Ok(())
}

/// Read a dot network (node statements + `--` edges) into a graph, keeping
/// the attributes this pipeline understands.
pub fn read_dot(path: &Path) -> PartanimResult<Graph> {
    info!(file = %path.display(), "reading dot file");
    let text = read_to_string(path)?;
    let mut graph = Graph::new();
    for line in statements(&text) {
        if let Some(caps) = EDGE_RE.captures(&line) {
            let a = parse_id(&caps[1], path)?;
            let b = parse_id(&caps[2], path)?;
            graph.add_edge(a, b, 1.0);
        } else if let Some(caps) = NODE_RE.captures(&line) {
            let id = parse_id(&caps[1], path)?;
            let attrs_text = caps[2].to_string();
            let attrs = graph.add_node(id);
            if let Some(pos) = attr_value(&attrs_text, "pos") {
                attrs.pos = parse_pos(&pos);
            }
            if let Some(color) = attr_value(&attrs_text, "fillcolor") {
                attrs.fillcolor = Some(color);
            }
            if let Some(cluster) = attr_value(&attrs_text, "cluster") {
                if let Ok(c) = cluster.parse() {
                    attrs.clusters = vec![c];
                }
            }
        }
    }
    Ok(graph)
}

/// Extract one attribute per node from a dot file, e.g. the `fillcolor` a
/// coloring run attached or the `pos` a layout run computed. Non-numeric
/// statement names (`graph`, `node`, `edge` defaults) are skipped; values are
/// returned unquoted.
pub fn read_node_attribute(
    path: &Path,
    attribute: &str,
) -> PartanimResult<BTreeMap<NodeId, String>> {
    let text = read_to_string(path)?;
    let mut out = BTreeMap::new();
    for line in statements(&text) {
        if EDGE_RE.is_match(&line) {
            continue;
        }
        let Some(caps) = NODE_RE.captures(&line) else {
            continue;
        };
        let id = parse_id(&caps[1], path)?;
        if let Some(value) = attr_value(&caps[2], attribute) {
            out.insert(id, value);
        }
    }
    Ok(out)
}

/// Positions from a layout dot file, parsed as `(x, y)`.
pub fn read_positions(path: &Path) -> PartanimResult<BTreeMap<NodeId, (f64, f64)>> {
    let raw = read_node_attribute(path, "pos")?;
    let mut out = BTreeMap::new();
    for (id, value) in raw {
        let pos = parse_pos(&value).ok_or_else(|| {
            PartanimError::format(format!(
                "{}: node {id}: invalid pos '{value}'",
                path.display()
            ))
        })?;
        out.insert(id, pos);
    }
    Ok(out)
}

/// Logical dot statements: newlines inside a bracketed attribute list are
/// collapsed first, so wrapped node statements parse as one line.
fn statements(text: &str) -> Vec<String> {
    let mut collapsed = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '[' => {
                depth += 1;
                collapsed.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                collapsed.push(ch);
            }
            '\n' if depth > 0 => collapsed.push(' '),
            _ => collapsed.push(ch),
        }
    }
    collapsed
        .lines()
        .flat_map(|l| l.split(';'))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_id(s: &str, path: &Path) -> PartanimResult<NodeId> {
    s.parse().map_err(|_| {
        PartanimError::format(format!(
            "{}: node id '{s}' does not fit the integer id space",
            path.display()
        ))
    })
}

fn attr_value(attrs_text: &str, attribute: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"(?:^|[,\s\[]){}\s*=\s*("[^"]*"|[^,\]\s]+)"#,
        regex::escape(attribute)
    ))
    .ok()?;
    let caps = re.captures(attrs_text)?;
    Some(caps[1].trim_matches('"').to_string())
}

fn parse_pos(value: &str) -> Option<(f64, f64)> {
    let value = value.trim_end_matches('!');
    let (x, y) = value.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}
