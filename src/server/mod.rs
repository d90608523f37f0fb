use anyhow::Result;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{GitHubError, OperationError};
use crate::github::{GitHubClient, GitHubConfig};
use crate::mcp_core::protocol::*;
use crate::mcp_core::tools::CallToolResult;
use crate::resources::ResourceRegistry;
use crate::tools::{GitHubAdapter, ToolRegistry};

pub const SERVER_NAME: &str = "github-tools-mcp";

pub struct GitHubMcpServer {
    tools: ToolRegistry,
    resources: ResourceRegistry,
    config: GitHubServerConfig,
}

#[derive(Clone)]
pub struct GitHubServerConfig {
    pub version: String,
    pub host: Option<String>,
    pub token: Option<String>,
    pub enabled_toolsets: Vec<String>,
    pub read_only: bool,
    pub enable_command_logging: bool,
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for GitHubServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubServerConfig")
            .field("version", &self.version)
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("enabled_toolsets", &self.enabled_toolsets)
            .field("read_only", &self.read_only)
            .field("enable_command_logging", &self.enable_command_logging)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GitHubMcpServer {
    pub fn new(config: GitHubServerConfig) -> std::result::Result<Self, GitHubError> {
        let github_config = GitHubConfig {
            token: config.token.clone(),
            host: config.host.clone(),
            user_agent: format!("{}/{}", SERVER_NAME, config.version),
        };

        let github_client = Arc::new(GitHubClient::new(github_config)?);
        Ok(Self::with_client(config, github_client))
    }

    /// Builds the server around an existing client handle.
    pub fn with_client(config: GitHubServerConfig, github_client: Arc<GitHubClient>) -> Self {
        let adapter = GitHubAdapter::new(github_client);
        let tools = ToolRegistry::new(&config.enabled_toolsets, config.read_only, adapter.clone());
        let resources = ResourceRegistry::new(adapter);

        for toolset in tools.get_toolset_names() {
            debug!("Toolset {} enabled: {:?}", toolset, tools.get_toolset_tools(&toolset));
        }

        Self {
            tools,
            resources,
            config,
        }
    }

    /// Handles one JSON-RPC message. Notifications yield no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if self.config.enable_command_logging {
            debug!("Request: {:?}", request);
        }

        if request.is_notification() {
            debug!("Received notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
            "tools/list" => self.handle_list_tools(request),
            "tools/call" => self.handle_call_tool(request).await,
            "resources/list" => JsonRpcResponse::success(request.id, serde_json::json!({ "resources": [] })),
            "resources/templates/list" => self.handle_list_resource_templates(request),
            "resources/read" => self.handle_read_resource(request).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::error(request.id, METHOD_NOT_FOUND, "Method not found", None)
            }
        };

        if self.config.enable_command_logging {
            debug!("Response: {:?}", response);
        }

        Some(response)
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": self.config.version
            }
        });

        JsonRpcResponse::success(request.id, result)
    }

    fn handle_list_tools(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "tools": self.tools.list_tools()
        });
        JsonRpcResponse::success(request.id, result)
    }

    async fn handle_call_tool(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = request.params.unwrap_or_default();

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name,
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    INVALID_PARAMS,
                    "Invalid params: missing tool name",
                    None,
                );
            }
        };

        let arguments = params
            .get("arguments")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let call = self.tools.call_tool(tool_name, arguments);
        match self.with_timeout(tool_name, call).await {
            Ok(value) => match CallToolResult::from_value(value).and_then(serde_json::to_value) {
                Ok(result) => JsonRpcResponse::success(request.id, result),
                Err(e) => JsonRpcResponse::error(
                    request.id,
                    INTERNAL_ERROR,
                    "Failed to encode tool result",
                    Some(serde_json::json!({"error": e.to_string()})),
                ),
            },
            Err(e) => {
                error!("Tool call failed: {}", e);
                operation_error_response(request.id, &e, "Tool execution failed")
            }
        }
    }

    fn handle_list_resource_templates(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "resourceTemplates": self.resources.list_templates()
        });
        JsonRpcResponse::success(request.id, result)
    }

    async fn handle_read_resource(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = request.params.unwrap_or_default();

        let uri = match params.get("uri").and_then(|v| v.as_str()) {
            Some(uri) => uri,
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    INVALID_PARAMS,
                    "Invalid params: missing resource URI",
                    None,
                );
            }
        };

        match self.with_timeout(uri, self.resources.read_resource(uri)).await {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => {
                error!("Resource read failed: {}", e);
                operation_error_response(request.id, &e, "Resource read failed")
            }
        }
    }

    async fn with_timeout<F>(&self, target: &str, call: F) -> std::result::Result<Value, OperationError>
    where
        F: Future<Output = std::result::Result<Value, OperationError>>,
    {
        let Some(limit) = self.config.request_timeout else {
            return call.await;
        };

        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(OperationError::new(
                "request",
                target.to_string(),
                GitHubError::RemoteUnavailable(format!("timed out after {:?}", limit)),
            )),
        }
    }

    pub async fn run_stdio(self: Arc<Self>) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        info!("GitHub MCP Server running on stdio");
        self.serve(stdin, stdout).await
    }

    /// Reads newline-delimited JSON-RPC requests from `reader` until EOF,
    /// handling each on its own task, and writes responses to `writer`.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(64);

        let writer_task = tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                let response_json = serde_json::to_string(&response)?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<_, anyhow::Error>(())
        });

        let mut lines = reader.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => {
                    let server = self.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(response) = server.handle_request(request).await {
                            if tx.send(response).await.is_err() {
                                warn!("Response dropped: writer closed");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to parse JSON-RPC request: {}", e);
                    let error_response = JsonRpcResponse::error(
                        None,
                        PARSE_ERROR,
                        "Parse error",
                        Some(serde_json::json!({"error": e.to_string()})),
                    );
                    if tx.send(error_response).await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(tx);
        writer_task.await??;
        Ok(())
    }
}

fn operation_error_response(id: Option<Value>, err: &OperationError, message: &str) -> JsonRpcResponse {
    let code = if err.is_validation() { INVALID_PARAMS } else { INTERNAL_ERROR };

    JsonRpcResponse::error(
        id,
        code,
        message,
        Some(serde_json::json!({
            "kind": err.kind(),
            "operation": err.operation,
            "input": err.input,
            "error": err.to_string()
        })),
    )
}

pub fn required_param<T>(args: &Map<String, Value>, name: &str) -> std::result::Result<T, GitHubError>
where
    T: serde::de::DeserializeOwned,
{
    let value = args
        .get(name)
        .filter(|value| !value.is_null())
        .ok_or_else(|| GitHubError::Validation(format!("Missing required parameter: {}", name)))?;

    serde_json::from_value(value.clone())
        .map_err(|_| GitHubError::Validation(format!("Parameter '{}' has invalid type", name)))
}

pub fn optional_param<T>(args: &Map<String, Value>, name: &str) -> std::result::Result<Option<T>, GitHubError>
where
    T: serde::de::DeserializeOwned,
{
    match args.get(name) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(
            serde_json::from_value(value.clone())
                .map_err(|_| GitHubError::Validation(format!("Parameter '{}' has invalid type", name)))?,
        )),
    }
}

pub fn optional_param_with_default<T>(
    args: &Map<String, Value>,
    name: &str,
    default: T,
) -> std::result::Result<T, GitHubError>
where
    T: serde::de::DeserializeOwned,
{
    match optional_param(args, name)? {
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Reads a non-negative integer count. Integral floats such as `5.0` are
/// accepted since some clients send every number as a double.
pub fn limit_param(args: &Map<String, Value>, name: &str, default: usize) -> std::result::Result<usize, GitHubError> {
    let invalid = || GitHubError::Validation(format!("Parameter '{}' must be a non-negative integer", name));

    match args.get(name) {
        Some(Value::Null) | None => Ok(default),
        Some(Value::Number(number)) => {
            if let Some(n) = number.as_u64() {
                return usize::try_from(n).map_err(|_| invalid());
            }
            match number.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as usize),
                _ => Err(invalid()),
            }
        }
        Some(_) => Err(invalid()),
    }
}
