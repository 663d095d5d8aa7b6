// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port descriptors and the connection-legality oracle.

use serde::{Deserialize, Serialize};

/// Port role on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// Incoming control-sequencing wire
    #[serde(rename = "flow-in")]
    FlowIn,
    /// Outgoing control-sequencing wire
    #[serde(rename = "flow-out")]
    FlowOut,
    /// Incoming value wire
    #[serde(rename = "data-in")]
    DataIn,
    /// Outgoing value wire
    #[serde(rename = "data-out")]
    DataOut,
}

impl PortKind {
    /// Whether this is a flow-kind port
    pub fn is_flow(self) -> bool {
        matches!(self, Self::FlowIn | Self::FlowOut)
    }

    /// Whether this is a data-kind port
    pub fn is_data(self) -> bool {
        matches!(self, Self::DataIn | Self::DataOut)
    }

    /// Whether wires terminate at this port
    pub fn is_input(self) -> bool {
        matches!(self, Self::FlowIn | Self::DataIn)
    }

    /// Whether wires originate from this port
    pub fn is_output(self) -> bool {
        matches!(self, Self::FlowOut | Self::DataOut)
    }

    /// The kind a wire from/to this port must land on
    pub fn opposite(self) -> Self {
        match self {
            Self::FlowIn => Self::FlowOut,
            Self::FlowOut => Self::FlowIn,
            Self::DataIn => Self::DataOut,
            Self::DataOut => Self::DataIn,
        }
    }
}

/// Value type carried by a data port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// String value
    String,
    /// 3D vector
    Vector3,
    /// Entity reference
    Entity,
    /// Globally unique identifier
    Guid,
    /// List of values
    List,
    /// Enumerated value
    Enum,
    /// Faction/camp reference
    Camp,
    /// Configuration table id
    ConfigId,
    /// Component id
    ComponentId,
    /// Wildcard, connects to every data type
    Any,
}

/// A port on a node definition
///
/// Descriptors are owned by the node-definition catalog and referenced by
/// id from document nodes; they are never copied into the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDescriptor {
    /// Port id, unique within its definition
    pub id: String,
    /// Display label
    pub label: String,
    /// Port role
    pub kind: PortKind,
    /// Value type (data ports only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    /// Allowlist of accepted source value types (data-in ports only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepts: Vec<ValueType>,
    /// Whether more than one incoming wire may terminate here
    #[serde(default)]
    pub allow_multiple_connections: bool,
    /// Literal default for unconnected data-in ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Whether the port may be left unwired
    #[serde(default)]
    pub optional: bool,
}

impl PortDescriptor {
    /// Create a flow port
    pub fn flow(id: impl Into<String>, label: impl Into<String>, kind: PortKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            value_type: None,
            accepts: Vec::new(),
            allow_multiple_connections: false,
            default_value: None,
            optional: false,
        }
    }

    /// Create a data port
    pub fn data(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: PortKind,
        value_type: ValueType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            value_type: Some(value_type),
            accepts: Vec::new(),
            allow_multiple_connections: false,
            default_value: None,
            optional: false,
        }
    }

    /// Restrict the accepted source value types
    pub fn with_accepts(mut self, accepts: impl Into<Vec<ValueType>>) -> Self {
        self.accepts = accepts.into();
        self
    }

    /// Allow multiple incoming wires
    pub fn multi(mut self) -> Self {
        self.allow_multiple_connections = true;
        self
    }

    /// Set the literal default value
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Decide whether a directed wire from `source` to `target` is legal.
///
/// Consulted live during a connection drag (to compute the disabled-port
/// highlight set) and again at commit time. Pure; no document state.
pub fn can_connect(source: &PortDescriptor, target: &PortDescriptor) -> bool {
    if source.kind == target.kind {
        return false;
    }

    if source.kind.is_flow() && target.kind.is_flow() {
        return source.kind == PortKind::FlowOut && target.kind == PortKind::FlowIn;
    }

    if source.kind.is_data() && target.kind.is_data() {
        if source.kind != PortKind::DataOut || target.kind != PortKind::DataIn {
            return false;
        }
        let source_type = source.value_type.unwrap_or(ValueType::Any);
        let target_type = target.value_type.unwrap_or(ValueType::Any);
        if !target.accepts.is_empty() {
            return target.accepts.contains(&source_type);
        }
        if source_type == ValueType::Any || target_type == ValueType::Any {
            return true;
        }
        return source_type == target_type;
    }

    // Mixed flow/data
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_out(value_type: ValueType) -> PortDescriptor {
        PortDescriptor::data("out", "Out", PortKind::DataOut, value_type)
    }

    fn data_in(value_type: ValueType) -> PortDescriptor {
        PortDescriptor::data("in", "In", PortKind::DataIn, value_type)
    }

    #[test]
    fn test_identical_kinds_never_connect() {
        let kinds = [
            PortKind::FlowIn,
            PortKind::FlowOut,
            PortKind::DataIn,
            PortKind::DataOut,
        ];
        for kind in kinds {
            let a = PortDescriptor::flow("a", "A", kind);
            let b = PortDescriptor::flow("b", "B", kind);
            assert!(!can_connect(&a, &b), "{kind:?} paired with itself");
        }
    }

    #[test]
    fn test_flow_direction() {
        let out = PortDescriptor::flow("o", "O", PortKind::FlowOut);
        let inp = PortDescriptor::flow("i", "I", PortKind::FlowIn);
        assert!(can_connect(&out, &inp));
        assert!(!can_connect(&inp, &out));
    }

    #[test]
    fn test_data_type_gate() {
        assert!(!can_connect(&data_out(ValueType::Int), &data_in(ValueType::Float)));
        assert!(can_connect(&data_out(ValueType::Int), &data_in(ValueType::Int)));
        assert!(can_connect(&data_out(ValueType::Any), &data_in(ValueType::Float)));
        assert!(can_connect(&data_out(ValueType::Int), &data_in(ValueType::Any)));
    }

    #[test]
    fn test_accepts_list_overrides_value_type() {
        let target = data_in(ValueType::Float)
            .with_accepts([ValueType::Int, ValueType::Float]);
        assert!(can_connect(&data_out(ValueType::Int), &target));
        assert!(can_connect(&data_out(ValueType::Float), &target));
        assert!(!can_connect(&data_out(ValueType::String), &target));
        // An explicit allowlist wins even over Any sources
        assert!(!can_connect(&data_out(ValueType::Any), &target));
    }

    #[test]
    fn test_data_direction() {
        // data-in -> data-out is never legal even with matching types
        assert!(!can_connect(&data_in(ValueType::Int), &data_out(ValueType::Int)));
    }

    #[test]
    fn test_mixed_kinds_never_connect() {
        let flow_out = PortDescriptor::flow("f", "F", PortKind::FlowOut);
        assert!(!can_connect(&flow_out, &data_in(ValueType::Any)));
        assert!(!can_connect(&data_out(ValueType::Any), &PortDescriptor::flow("f", "F", PortKind::FlowIn)));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(PortKind::FlowIn.opposite(), PortKind::FlowOut);
        assert_eq!(PortKind::DataOut.opposite(), PortKind::DataIn);
    }
}
