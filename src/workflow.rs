// codegen-preview: Workflow definition types and the bundled sample workflow

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: String,
    #[serde(rename = "tools_to_use")]
    pub tools: Vec<ToolInvocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_id: i64,
    pub tool_name: String,
    pub tool_params: ToolParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParams {
    pub items: Vec<ToolParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParam {
    pub field_name: String,
    pub user_dependent: bool,
}

/// Directed edge between two nodes, referenced by `node_id`.
///
/// Referential integrity is not checked here; the generation service owns that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: String,
    pub to: String,
    pub conditional_routing: String,
}

impl WorkflowDefinition {
    /// The fixed workflow this client previews code for.
    pub fn sample() -> Self {
        Self {
            nodes: vec![
                Node {
                    node_id: "node1".into(),
                    tools: vec![ToolInvocation {
                        tool_id: 1,
                        tool_name: "EmailSender".into(),
                        tool_params: ToolParams::new(&[
                            ("user_email", true),
                            ("user_name", true),
                            ("template_id", false),
                        ]),
                    }],
                },
                Node {
                    node_id: "node2".into(),
                    tools: vec![ToolInvocation {
                        tool_id: 2,
                        tool_name: "LeaveRequest".into(),
                        tool_params: ToolParams::new(&[
                            ("employee_name", true),
                            ("requested_days", true),
                            ("current_reason", false),
                        ]),
                    }],
                },
            ],
            connections: vec![Connection {
                from_node: "node1".into(),
                to: "node2".into(),
                conditional_routing: "success".into(),
            }],
        }
    }

    /// Field names the caller has to supply at execution time, in node order.
    pub fn user_dependent_fields(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flat_map(|n| n.tools.iter())
            .flat_map(|t| t.tool_params.items.iter())
            .filter(|p| p.user_dependent)
            .map(|p| p.field_name.as_str())
            .collect()
    }
}

impl ToolParams {
    fn new(items: &[(&str, bool)]) -> Self {
        Self {
            items: items
                .iter()
                .map(|(name, dep)| ToolParam {
                    field_name: (*name).to_string(),
                    user_dependent: *dep,
                })
                .collect(),
        }
    }
}
