// Model Context Protocol message types used by the stdio server.

pub mod protocol {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    pub const JSONRPC_VERSION: &str = "2.0";
    pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct JsonRpcRequest {
        pub jsonrpc: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<Value>,
        pub method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub params: Option<Value>,
    }

    impl JsonRpcRequest {
        /// Notifications carry no id and must not be answered.
        pub fn is_notification(&self) -> bool {
            self.id.is_none()
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct JsonRpcResponse {
        pub jsonrpc: String,
        pub id: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub result: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub error: Option<JsonRpcError>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct JsonRpcError {
        pub code: i32,
        pub message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub data: Option<Value>,
    }

    impl JsonRpcResponse {
        pub fn success(id: Option<Value>, result: Value) -> Self {
            Self {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                result: Some(result),
                error: None,
            }
        }

        pub fn error(id: Option<Value>, code: i32, message: &str, data: Option<Value>) -> Self {
            Self {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code,
                    message: message.to_string(),
                    data,
                }),
            }
        }
    }
}

pub mod tools {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Tool {
        pub name: String,
        pub description: String,
        pub input_schema: Value,
    }

    /// Result of `tools/call`: the projection as JSON text plus the same
    /// value as structured content.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CallToolResult {
        pub content: Vec<TextContent>,
        pub structured_content: Value,
        pub is_error: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TextContent {
        #[serde(rename = "type")]
        pub kind: String,
        pub text: String,
    }

    impl CallToolResult {
        pub fn from_value(value: Value) -> serde_json::Result<Self> {
            let text = serde_json::to_string(&value)?;
            let structured_content = match value {
                Value::Object(_) => value,
                // structuredContent must be an object; wrap list results.
                other => serde_json::json!({ "result": other }),
            };

            Ok(Self {
                content: vec![TextContent {
                    kind: "text".to_string(),
                    text,
                }],
                structured_content,
                is_error: false,
            })
        }
    }
}

pub mod resources {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResourceTemplate {
        pub uri_template: String,
        pub name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub mime_type: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResourceContents {
        pub uri: String,
        pub mime_type: String,
        pub text: String,
    }
}
