//! Scene boundary
//!
//! `Scene` is the retained-mode 2D graph the demos draw into, in pixel units.
//! Nodes are created with a style and a position, mutated every frame and
//! removed together with their children. `SceneGraph` keeps the graph in
//! memory; the browser reads it back as a JSON snapshot and paints it.

mod graph;
mod snapshot;

pub use graph::SceneGraph;
pub use snapshot::{NodeSnapshot, SceneSnapshot};

use serde::{Deserialize, Serialize};

use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Node geometry, local to the node position.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeShape {
    Group,
    /// Centered on the node position.
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
    Ellipse { rx: f32, ry: f32 },
    Line { from: Vec2, to: Vec2 },
    Path { points: Vec<Vec2>, closed: bool, smooth: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub opacity: f32,
    pub hidden: bool,
}

impl Style {
    pub fn filled(fill: Color) -> Self {
        Self { fill: Some(fill), ..Self::default() }
    }

    /// Fill with the usual black outline.
    pub fn outlined(fill: Color) -> Self {
        Self { fill: Some(fill), stroke: Some(Color::BLACK), ..Self::default() }
    }

    pub fn stroked(stroke: Color, width: f32) -> Self {
        Self { stroke: Some(stroke), stroke_width: width, ..Self::default() }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            hidden: false,
        }
    }
}

pub trait Scene {
    /// Add a node under `parent` (or at the root). `at` is relative to the parent.
    fn add(&mut self, parent: Option<NodeId>, shape: NodeShape, style: Style, at: Vec2) -> NodeId;

    fn set_position(&mut self, node: NodeId, at: Vec2);

    fn position(&self, node: NodeId) -> Option<Vec2>;

    /// Rotate by a delta, in degrees.
    fn rotate(&mut self, node: NodeId, delta_degrees: f32);

    fn rotation(&self, node: NodeId) -> Option<f32>;

    fn set_opacity(&mut self, node: NodeId, opacity: f32);

    fn opacity(&self, node: NodeId) -> Option<f32>;

    fn set_fill(&mut self, node: NodeId, fill: Color);

    fn fill(&self, node: NodeId) -> Option<Color>;

    /// Move the endpoints of a `Line` node.
    fn set_line(&mut self, node: NodeId, from: Vec2, to: Vec2);

    /// Replace the points of a `Path` node.
    fn set_points(&mut self, node: NodeId, points: &[Vec2]);

    /// Resize a `Circle` (or both radii of an `Ellipse`).
    fn set_radius(&mut self, node: NodeId, radius: f32);

    /// Remove a node and its whole subtree. Returns false when already gone.
    fn remove(&mut self, node: NodeId) -> bool;

    fn contains(&self, node: NodeId) -> bool;

    fn node_count(&self) -> usize;

    /// Paint-ordered copy of every live node, for the browser painter.
    fn snapshot(&self) -> SceneSnapshot;
}
