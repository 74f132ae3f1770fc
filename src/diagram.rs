//! Renders the "Web Service" architecture diagram to a PNG file.
//!
//! The topology is fixed: a load balancer feeds a compute node, which talks to two databases,
//! which both feed an API gateway. Nodes are laid out left to right by rank.

use crate::utils::diagram_filename;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

const NODE_WIDTH: f32 = 120.0;
const NODE_HEIGHT: f32 = 60.0;
const RANK_GAP: f32 = 80.0;
const ROW_GAP: f32 = 40.0;
const MARGIN: f32 = 40.0;
const TITLE_HEIGHT: f32 = 40.0;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("unknown node `{0}` in edge")]
    UnknownNode(String),

    #[error("topology contains a cycle")]
    Cycle,

    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("failed to allocate a {0}x{1} pixmap")]
    PixmapAlloc(u32, u32),

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of infrastructure a node stands for; decides its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    LoadBalancer,
    Compute,
    Database,
    ApiGateway,
}

impl NodeKind {
    fn fill(&self) -> &'static str {
        match self {
            NodeKind::LoadBalancer => "#8c4fff",
            NodeKind::Compute => "#ed7100",
            NodeKind::Database => "#3b48cc",
            NodeKind::ApiGateway => "#e7157b",
        }
    }

    fn caption(&self) -> &'static str {
        match self {
            NodeKind::LoadBalancer => "ELB",
            NodeKind::Compute => "EC2",
            NodeKind::Database => "RDS",
            NodeKind::ApiGateway => "API Gateway",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub label: String,
    pub kind: NodeKind,
}

/// A titled directed graph of nodes
#[derive(Debug, Clone)]
pub struct Topology {
    pub title: String,
    pub nodes: Vec<Node>,
    /// Edges as indices into `nodes`
    pub edges: Vec<(usize, usize)>,
}

impl Topology {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node and returns its index
    pub fn node(&mut self, label: &str, kind: NodeKind) -> usize {
        self.nodes.push(Node {
            label: label.to_string(),
            kind,
        });
        self.nodes.len() - 1
    }

    /// Connects every node of each stage to every node of the next stage
    pub fn chain(&mut self, stages: &[&[usize]]) {
        for pair in stages.windows(2) {
            for &from in pair[0] {
                for &to in pair[1] {
                    self.edges.push((from, to));
                }
            }
        }
    }

    /// The fixed "Web Service" topology
    pub fn web_service() -> Self {
        let mut topology = Self::new("Web Service");
        let lb = topology.node("lb", NodeKind::LoadBalancer);
        let web = topology.node("web", NodeKind::Compute);
        let userdb = topology.node("userdb", NodeKind::Database);
        let userdb2 = topology.node("userdb2", NodeKind::Database);
        let dds = topology.node("dds", NodeKind::ApiGateway);
        topology.chain(&[&[lb], &[web], &[userdb, userdb2], &[dds]]);
        topology
    }

    /// Longest-path rank of every node; sources sit in rank 0
    pub fn ranks(&self) -> Result<Vec<usize>, DiagramError> {
        for &(from, to) in &self.edges {
            for idx in [from, to] {
                if idx >= self.nodes.len() {
                    return Err(DiagramError::UnknownNode(idx.to_string()));
                }
            }
        }

        let mut ranks = vec![0; self.nodes.len()];
        for _ in 0..=self.nodes.len() {
            let mut changed = false;
            for &(from, to) in &self.edges {
                if ranks[to] < ranks[from] + 1 {
                    ranks[to] = ranks[from] + 1;
                    changed = true;
                }
            }
            if !changed {
                return Ok(ranks);
            }
        }

        Err(DiagramError::Cycle)
    }

    /// Renders the topology as an SVG document
    pub fn to_svg(&self) -> Result<String, DiagramError> {
        let layout = Layout::compute(self)?;
        let mut svg = String::new();

        // Writing into a String cannot fail
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = layout.width,
            h = layout.height,
        );
        svg.push_str(
            r##"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto"><path d="M0,0 L10,5 L0,10 z" fill="#7b8894"/></marker></defs>"##,
        );
        let _ = write!(
            svg,
            r##"<rect width="{}" height="{}" fill="#ffffff"/>"##,
            layout.width, layout.height
        );

        for &(from, to) in &self.edges {
            let (x1, y1) = layout.positions[from];
            let (x2, y2) = layout.positions[to];
            let _ = write!(
                svg,
                r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#7b8894" stroke-width="2" marker-end="url(#arrow)"/>"##,
                x1 + NODE_WIDTH,
                y1 + NODE_HEIGHT / 2.0,
                x2,
                y2 + NODE_HEIGHT / 2.0,
            );
        }

        for (node, &(x, y)) in self.nodes.iter().zip(&layout.positions) {
            let _ = write!(
                svg,
                r##"<rect x="{x}" y="{y}" width="{NODE_WIDTH}" height="{NODE_HEIGHT}" rx="8" fill="{}"/>"##,
                node.kind.fill(),
            );
            let _ = write!(
                svg,
                r##"<text x="{}" y="{}" font-family="sans-serif" font-size="11" fill="#ffffff" text-anchor="middle">{}</text>"##,
                x + NODE_WIDTH / 2.0,
                y + 22.0,
                node.kind.caption(),
            );
            let _ = write!(
                svg,
                r##"<text x="{}" y="{}" font-family="sans-serif" font-size="14" fill="#ffffff" text-anchor="middle">{}</text>"##,
                x + NODE_WIDTH / 2.0,
                y + 44.0,
                escape_xml(&node.label),
            );
        }

        let _ = write!(
            svg,
            r##"<text x="{}" y="{}" font-family="sans-serif" font-size="18" fill="#232f3e" text-anchor="middle">{}</text>"##,
            layout.width / 2.0,
            layout.height - MARGIN / 2.0,
            escape_xml(&self.title),
        );
        svg.push_str("</svg>");

        Ok(svg)
    }
}

/// Top-left corner of every node plus the canvas size
struct Layout {
    positions: Vec<(f32, f32)>,
    width: f32,
    height: f32,
}

impl Layout {
    fn compute(topology: &Topology) -> Result<Self, DiagramError> {
        let ranks = topology.ranks()?;
        let rank_count = ranks.iter().max().map_or(0, |r| r + 1);

        let mut rows: HashMap<usize, usize> = HashMap::new();
        let mut row_of = Vec::with_capacity(ranks.len());
        for &rank in &ranks {
            let row = rows.entry(rank).or_insert(0);
            row_of.push(*row);
            *row += 1;
        }
        let max_rows = rows.values().copied().max().unwrap_or(0);

        let column_height =
            |n: usize| n as f32 * NODE_HEIGHT + n.saturating_sub(1) as f32 * ROW_GAP;
        let tallest = column_height(max_rows);

        let positions = ranks
            .iter()
            .zip(&row_of)
            .map(|(&rank, &row)| {
                // Centre shorter columns against the tallest one
                let offset = (tallest - column_height(rows[&rank])) / 2.0;
                let x = MARGIN + rank as f32 * (NODE_WIDTH + RANK_GAP);
                let y = MARGIN + offset + row as f32 * (NODE_HEIGHT + ROW_GAP);
                (x, y)
            })
            .collect();

        let width = MARGIN * 2.0
            + rank_count as f32 * NODE_WIDTH
            + rank_count.saturating_sub(1) as f32 * RANK_GAP;
        let height = MARGIN * 2.0 + tallest + TITLE_HEIGHT;

        Ok(Self {
            positions,
            width: width.max(MARGIN * 2.0),
            height,
        })
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Rasterizes an SVG document into PNG bytes
pub fn svg_to_png(svg: &str) -> Result<Vec<u8>, DiagramError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let width_px = size.width().ceil().max(1.0) as u32;
    let height_px = size.height().ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px)
        .ok_or(DiagramError::PixmapAlloc(width_px, height_px))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| DiagramError::Encode(e.to_string()))
}

/// Renders a topology to a PNG file and returns the path written.
///
/// Without an explicit output the file is named after the title in the current directory.
pub fn render(topology: &Topology, output: Option<&Path>) -> Result<PathBuf, DiagramError> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.png", diagram_filename(&topology.title))),
    };

    let svg = topology.to_svg()?;
    let png = svg_to_png(&svg)?;
    std::fs::write(&path, png)?;

    ::log::info!("Wrote diagram \"{}\" to {}", topology.title, path.display());
    Ok(path)
}
