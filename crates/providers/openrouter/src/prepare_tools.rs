use serde_json::{json, Map, Value};

use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::parts::Dialect;

pub struct PreparedTools {
    pub tools: Option<Vec<Value>>,
    pub tool_choice: Option<Value>,
    pub warnings: Vec<v2t::CallWarning>,
}

fn function_definition(tool: &v2t::FunctionTool, dialect: Dialect) -> Value {
    let mut def = Map::new();
    if dialect == Dialect::Responses {
        def.insert("type".into(), json!("function"));
    }
    def.insert("name".into(), json!(tool.name));
    if let Some(description) = &tool.description {
        def.insert("description".into(), json!(description));
    }
    def.insert("parameters".into(), tool.input_schema.clone());
    if let Some(strict) = tool.strict {
        def.insert("strict".into(), json!(strict));
    }
    match dialect {
        Dialect::Chat => json!({ "type": "function", "function": Value::Object(def) }),
        Dialect::Responses => Value::Object(def),
    }
}

/// Map unified tools and tool choice onto the dialect's wire shape.
///
/// Provider-defined tools have no generic wire form and are reported as
/// warnings. No `tool_choice` is sent without tools.
pub fn prepare_tools(
    tools: &[v2t::Tool],
    tool_choice: &Option<v2t::ToolChoice>,
    dialect: Dialect,
) -> PreparedTools {
    let mut warnings: Vec<v2t::CallWarning> = vec![];
    let definitions: Vec<Value> = tools
        .iter()
        .filter_map(|tool| match tool {
            v2t::Tool::Function(f) => Some(function_definition(f, dialect)),
            v2t::Tool::Provider(p) => {
                warnings.push(v2t::CallWarning::UnsupportedTool {
                    tool_name: p.name.clone(),
                    details: Some(format!("provider tool {} is not supported", p.id)),
                });
                None
            }
        })
        .collect();

    if definitions.is_empty() {
        return PreparedTools {
            tools: None,
            tool_choice: None,
            warnings,
        };
    }

    let tool_choice = tool_choice.as_ref().map(|choice| match choice {
        v2t::ToolChoice::Auto => json!("auto"),
        v2t::ToolChoice::None => json!("none"),
        v2t::ToolChoice::Required => json!("required"),
        v2t::ToolChoice::Tool { name } => match dialect {
            Dialect::Chat => json!({ "type": "function", "function": { "name": name } }),
            Dialect::Responses => json!({ "type": "function", "name": name }),
        },
    });

    PreparedTools {
        tools: Some(definitions),
        tool_choice,
        warnings,
    }
}
