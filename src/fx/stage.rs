//! Retained element container
//!
//! A [`Stage`] is the subtree a field owns: spawned elements are appended to
//! it and removed either one at a time when their animation completes or all
//! at once when the field is torn down.

use std::collections::BTreeMap;

/// Handle to an element on a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// What an element draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    /// Round dot, `size` px across
    Particle { size: f32 },
    /// A single character
    Glyph { symbol: char, font_size: f32 },
}

/// One visual node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    /// Anchor position in px from the stage's left/top edge
    pub left: f32,
    pub top: f32,
    pub opacity: f32,
    /// Current animated offset from the anchor
    pub translate: (f32, f32),
}

impl Element {
    pub fn new(kind: ElementKind, left: f32, top: f32, opacity: f32) -> Self {
        Self {
            kind,
            left,
            top,
            opacity,
            translate: (0.0, 0.0),
        }
    }

    /// Rendered position after the animated offset
    pub fn position(&self) -> (f32, f32) {
        (self.left + self.translate.0, self.top + self.translate.1)
    }
}

/// Container of elements with a fixed pixel size
#[derive(Debug, Clone)]
pub struct Stage {
    width: f32,
    height: f32,
    next_id: u64,
    nodes: BTreeMap<NodeId, Element>,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            next_id: 0,
            nodes: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Append an element and return its handle
    pub fn append(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, element);
        id
    }

    /// Remove one element; `false` if it was already gone
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.nodes.remove(&id).is_some()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn child_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every element, returning how many were present
    pub fn clear(&mut self) -> usize {
        let count = self.nodes.len();
        self.nodes.clear();
        count
    }

    /// Elements in append order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.nodes.iter().map(|(id, el)| (*id, el))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> Element {
        Element::new(ElementKind::Particle { size: 2.0 }, 10.0, 20.0, 0.5)
    }

    #[test]
    fn test_append_and_remove() {
        let mut stage = Stage::new(100.0, 50.0);
        let a = stage.append(dot());
        let b = stage.append(dot());
        assert_ne!(a, b);
        assert_eq!(stage.child_count(), 2);

        assert!(stage.remove(a));
        assert!(!stage.remove(a));
        assert!(!stage.contains(a));
        assert!(stage.contains(b));
    }

    #[test]
    fn test_clear_counts_removed() {
        let mut stage = Stage::new(100.0, 50.0);
        for _ in 0..5 {
            stage.append(dot());
        }
        assert_eq!(stage.clear(), 5);
        assert!(stage.is_empty());
        assert_eq!(stage.clear(), 0);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut stage = Stage::new(100.0, 50.0);
        let a = stage.append(dot());
        stage.clear();
        let b = stage.append(dot());
        assert_ne!(a, b);
    }

    #[test]
    fn test_element_position() {
        let mut el = dot();
        el.translate = (5.0, -5.0);
        assert_eq!(el.position(), (15.0, 15.0));
    }
}
