use std::collections::BTreeMap;

use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;

use super::{NodeId, NodeShape, Scene, SceneSnapshot, Style};

pub(super) struct Node {
    pub(super) parent: Option<u32>,
    pub(super) children: Vec<u32>,
    pub(super) shape: NodeShape,
    pub(super) style: Style,
    pub(super) position: Vec2,
    /// Degrees
    pub(super) rotation: f32,
}

/// In-memory retained scene graph. Ids grow monotonically, so id order is paint order.
pub struct SceneGraph {
    pub(super) nodes: BTreeMap<u32, Node>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn shape(&self, node: NodeId) -> Option<&NodeShape> {
        self.nodes.get(&node.0).map(|n| &n.shape)
    }

    pub fn style(&self, node: NodeId) -> Option<Style> {
        self.nodes.get(&node.0).map(|n| n.style)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node.0)
            .map(|n| n.children.iter().map(|&c| NodeId(c)).collect())
            .unwrap_or_default()
    }

    fn collect_subtree(&self, root: u32, out: &mut Vec<u32>) {
        out.push(root);
        if let Some(node) = self.nodes.get(&root) {
            for &child in node.children.iter() {
                self.collect_subtree(child, out);
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SceneGraph {
    fn add(&mut self, parent: Option<NodeId>, shape: NodeShape, style: Style, at: Vec2) -> NodeId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        // A dangling parent handle puts the node at the root.
        let parent = parent.map(|p| p.0).filter(|p| self.nodes.contains_key(p));
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }

        self.nodes.insert(
            id,
            Node {
                parent,
                children: Vec::new(),
                shape,
                style,
                position: at,
                rotation: 0.0,
            },
        );
        NodeId(id)
    }

    fn set_position(&mut self, node: NodeId, at: Vec2) {
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.position = at;
        }
    }

    fn position(&self, node: NodeId) -> Option<Vec2> {
        self.nodes.get(&node.0).map(|n| n.position)
    }

    fn rotate(&mut self, node: NodeId, delta_degrees: f32) {
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.rotation += delta_degrees;
        }
    }

    fn rotation(&self, node: NodeId) -> Option<f32> {
        self.nodes.get(&node.0).map(|n| n.rotation)
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.style.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn opacity(&self, node: NodeId) -> Option<f32> {
        self.nodes.get(&node.0).map(|n| n.style.opacity)
    }

    fn set_fill(&mut self, node: NodeId, fill: Color) {
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.style.fill = Some(fill);
        }
    }

    fn fill(&self, node: NodeId) -> Option<Color> {
        self.nodes.get(&node.0).and_then(|n| n.style.fill)
    }

    fn set_line(&mut self, node: NodeId, from: Vec2, to: Vec2) {
        if let Some(Node { shape: NodeShape::Line { from: f, to: t }, .. }) = self.nodes.get_mut(&node.0) {
            *f = from;
            *t = to;
        }
    }

    fn set_points(&mut self, node: NodeId, points: &[Vec2]) {
        if let Some(Node { shape: NodeShape::Path { points: p, .. }, .. }) = self.nodes.get_mut(&node.0) {
            p.clear();
            p.extend_from_slice(points);
        }
    }

    fn set_radius(&mut self, node: NodeId, radius: f32) {
        match self.nodes.get_mut(&node.0).map(|n| &mut n.shape) {
            Some(NodeShape::Circle { radius: r }) => *r = radius,
            Some(NodeShape::Ellipse { rx, ry }) => {
                *rx = radius;
                *ry = radius;
            }
            _ => {}
        }
    }

    fn remove(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes.get(&node.0).map(|n| n.parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|&c| c != node.0);
        }

        let mut doomed = Vec::new();
        self.collect_subtree(node.0, &mut doomed);
        for id in doomed {
            self.nodes.remove(&id);
        }
        true
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node.0)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn snapshot(&self) -> SceneSnapshot {
        self.paint_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_takes_the_subtree() {
        let mut scene = SceneGraph::new();
        let group = scene.add(None, NodeShape::Group, Style::default(), Vec2::new(10.0, 10.0));
        let circle = scene.add(
            Some(group),
            NodeShape::Circle { radius: 5.0 },
            Style::filled(Color::RED),
            Vec2::zero(),
        );
        let other = scene.add(None, NodeShape::Circle { radius: 1.0 }, Style::default(), Vec2::zero());

        assert_eq!(scene.children(group), vec![circle]);
        assert!(scene.remove(group));
        assert!(!scene.contains(circle));
        assert!(scene.contains(other));
        assert!(!scene.remove(group));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn removing_child_detaches_from_parent() {
        let mut scene = SceneGraph::new();
        let group = scene.add(None, NodeShape::Group, Style::default(), Vec2::zero());
        let child = scene.add(Some(group), NodeShape::Group, Style::default(), Vec2::zero());
        assert!(scene.remove(child));
        assert!(scene.children(group).is_empty());
    }

    #[test]
    fn rotation_accumulates_deltas() {
        let mut scene = SceneGraph::new();
        let n = scene.add(None, NodeShape::Rect { width: 4.0, height: 2.0 }, Style::default(), Vec2::zero());
        scene.rotate(n, 30.0);
        scene.rotate(n, -10.0);
        assert_eq!(scene.rotation(n), Some(20.0));
    }

    #[test]
    fn shape_specific_setters_ignore_other_shapes() {
        let mut scene = SceneGraph::new();
        let line = scene.add(
            None,
            NodeShape::Line { from: Vec2::zero(), to: Vec2::zero() },
            Style::stroked(Color::BLACK, 4.0),
            Vec2::zero(),
        );
        scene.set_line(line, Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        scene.set_radius(line, 9.0);
        assert_eq!(
            scene.shape(line),
            Some(&NodeShape::Line { from: Vec2::new(1.0, 2.0), to: Vec2::new(3.0, 4.0) })
        );

        let eye = scene.add(None, NodeShape::Ellipse { rx: 1.0, ry: 1.0 }, Style::default(), Vec2::zero());
        scene.set_radius(eye, 3.0);
        assert_eq!(scene.shape(eye), Some(&NodeShape::Ellipse { rx: 3.0, ry: 3.0 }));
    }

    #[test]
    fn opacity_is_clamped() {
        let mut scene = SceneGraph::new();
        let n = scene.add(None, NodeShape::Group, Style::default(), Vec2::zero());
        scene.set_opacity(n, 1.7);
        assert_eq!(scene.opacity(n), Some(1.0));
    }
}
