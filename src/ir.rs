use serde::{Deserialize, Serialize};

/// Role of a node in the two-level mind map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Topic,
    Branch,
    Child,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Topic => "topic",
            NodeType::Branch => "branch",
            NodeType::Child => "child",
        }
    }
}

/// Canonical mind map tree, produced once at ingestion.
///
/// Branches and children remember the index they had in the incoming spec so
/// that output keys stay stable when malformed siblings are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindMap {
    pub topic: String,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub index: usize,
    pub label: String,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub index: usize,
    pub label: String,
}

impl MindMap {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            branches: Vec::new(),
        }
    }

    /// Appends a branch whose original index is its position in the list.
    pub fn push_branch<I, S>(&mut self, label: impl Into<String>, children: I) -> &mut Branch
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.branches.len();
        let children = children
            .into_iter()
            .enumerate()
            .map(|(index, label)| Child {
                index,
                label: label.into(),
            })
            .collect();
        self.branches.push(Branch {
            index,
            label: label.into(),
            children,
        });
        let last = self.branches.len() - 1;
        &mut self.branches[last]
    }

    pub fn with_branch<I, S>(mut self, label: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_branch(label, children);
        self
    }

    pub fn child_count(&self) -> usize {
        self.branches.iter().map(|branch| branch.children.len()).sum()
    }
}

pub fn topic_id() -> String {
    NodeType::Topic.as_str().to_string()
}

pub fn branch_id(branch_index: usize) -> String {
    format!("branch_{branch_index}")
}

pub fn child_id(branch_index: usize, child_index: usize) -> String {
    format!("child_{branch_index}_{child_index}")
}
