/// One nonzero feature of an instance.
///
/// Indices are 1-based; a node with index `-1` terminates an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureNode {
    pub index: i32,
    pub value: f64,
}

impl FeatureNode {
    /// Sentinel closing every instance's feature list
    pub const TERMINATOR: FeatureNode = FeatureNode {
        index: -1,
        value: 0.0,
    };

    pub const fn new(index: i32, value: f64) -> Self {
        Self { index, value }
    }

    pub fn is_terminator(&self) -> bool {
        self.index == -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator() {
        assert!(FeatureNode::TERMINATOR.is_terminator());
        assert!(!FeatureNode::new(1, -1.0).is_terminator());
    }
}
