use serde::Serialize;

use super::graph::SceneGraph;
use super::{NodeShape, Scene};

/// One node as the browser painter sees it. Positions are parent-relative.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    #[serde(flatten)]
    pub shape: NodeShape,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub opacity: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

impl SceneGraph {
    /// Flat, paint-ordered copy of the graph (parents before children).
    pub(super) fn paint_order(&self) -> SceneSnapshot {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (&id, node) in self.nodes.iter() {
            if node.parent.is_none() {
                self.push_subtree(id, &mut nodes);
            }
        }
        SceneSnapshot { nodes }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Scene::snapshot(self))
    }

    fn push_subtree(&self, id: u32, out: &mut Vec<NodeSnapshot>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push(NodeSnapshot {
            id,
            parent: node.parent,
            shape: node.shape.clone(),
            x: node.position.x,
            y: node.position.y,
            rotation: node.rotation,
            fill: node.style.fill.map(|c| c.css()),
            stroke: node.style.stroke.map(|c| c.css()),
            stroke_width: node.style.stroke_width,
            opacity: node.style.opacity,
            hidden: node.style.hidden,
        });
        for &child in node.children.iter() {
            self.push_subtree(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Vec2;
    use crate::domain::palette::Color;
    use crate::systems::scene::{Scene, Style};

    #[test]
    fn children_follow_their_parent() {
        let mut scene = SceneGraph::new();
        let a = scene.add(None, NodeShape::Group, Style::default(), Vec2::new(1.0, 2.0));
        let b = scene.add(None, NodeShape::Circle { radius: 3.0 }, Style::filled(Color::RED), Vec2::zero());
        let a_child = scene.add(Some(a), NodeShape::Rect { width: 1.0, height: 1.0 }, Style::default(), Vec2::zero());

        let ids: Vec<u32> = scene.snapshot().nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a.0, a_child.0, b.0]);
    }

    #[test]
    fn json_carries_shape_tag_and_css_colors() {
        let mut scene = SceneGraph::new();
        scene.add(None, NodeShape::Circle { radius: 3.0 }, Style::outlined(Color::RED), Vec2::new(5.0, 6.0));
        let json = scene.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let node = &value["nodes"][0];
        assert_eq!(node["type"], "circle");
        assert_eq!(node["radius"], 3.0);
        assert_eq!(node["fill"], "#ff0000");
        assert_eq!(node["stroke"], "#000000");
        assert!(node.get("parent").is_none());
        assert!(node.get("hidden").is_none());
    }
}
