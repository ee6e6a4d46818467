pub mod news_search;
pub mod stock_price;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::llm::ToolSpec;

pub use news_search::NewsSearchTool;
pub use stock_price::StockPriceTool;

/// A capability an agent can invoke through function calling.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name, `[a-zA-Z0-9_-]+`
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema for the arguments object
    fn parameters(&self) -> Value;

    async fn call(&self, args: Value) -> Result<String, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Schema for an object of required string fields
pub fn string_params(fields: &[(&str, &str)]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Read a string argument. A bare JSON string is accepted as the value of `field`.
pub fn string_arg(tool: &str, args: &Value, field: &str) -> Result<String, ToolError> {
    let value = match args {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(field).and_then(Value::as_str),
        _ => None,
    };

    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidArguments {
            tool: tool.to_string(),
            reason: format!("missing string field '{}'", field),
        })
}

/// Optional string argument; absent or blank yields an empty string.
pub fn optional_string_arg(args: &Value, field: &str) -> String {
    args.get(field)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Decode the raw arguments the model produced. Non-JSON text is passed through as a string.
pub fn parse_arguments(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
