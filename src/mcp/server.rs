/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Routes tool calls to the tracker tools
/// 3. Sends JSON-RPC responses to stdout

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::domain::today_key;
use crate::mcp::protocol::*;
use crate::tools::{self, ToolError, ToolResponse};
use crate::{ServerError, StreakTrackerServer};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying tracker server
    tracker: StreakTrackerServer,
    /// Whether the client has sent its `initialized` notification
    initialized: bool,
}

/// Build a tool definition whose input schema is derived from its parameter type
fn tool<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schema_for!(T))
        .unwrap_or_else(|_| json!({"type": "object"}));

    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::CreateItemParams>(
            "item_create",
            "Create a habit or supplement to track",
        ),
        tool::<tools::ToggleItemParams>(
            "item_toggle",
            "Mark an item done for today or a past date, or undo it if already done",
        ),
        tool::<tools::StatusParams>(
            "item_status",
            "Show streaks, this period's completion and the last 7 days for one or all items",
        ),
        tool::<tools::ListItemsParams>(
            "item_list",
            "List tracked items with their schedule and streaks",
        ),
        tool::<tools::UpdateItemParams>(
            "item_update",
            "Rename an item, change its frequency or schedule, or pause it",
        ),
        tool::<tools::DeleteItemParams>(
            "item_delete",
            "Delete an item together with its completion history",
        ),
        tool::<tools::WaterLogParams>(
            "water_log",
            "Add water intake in millilitres for today or a past date",
        ),
        tool::<tools::WaterStatusParams>(
            "water_status",
            "Show today's water intake against the daily target, optionally setting a new target",
        ),
    ]
}

/// Deserialize tool arguments, run the tool, and wrap its outcome
///
/// Arguments that don't fit the tool's parameter type are a protocol error;
/// anything the tool itself rejects is reported as an error result.
fn run_tool<P, R, F>(arguments: Map<String, Value>, call: F) -> Result<ToolCallResult, JsonRpcError>
where
    P: DeserializeOwned,
    R: ToolResponse,
    F: FnOnce(P) -> Result<R, ToolError>,
{
    let params: P = serde_json::from_value(Value::Object(arguments)).map_err(|e| JsonRpcError {
        code: error_codes::INVALID_PARAMS,
        message: format!("Invalid arguments: {}", e),
        data: None,
    })?;

    match call(params) {
        Ok(response) => {
            let structured = serde_json::to_value(&response).map_err(|e| JsonRpcError {
                code: error_codes::INTERNAL_ERROR,
                message: format!("Failed to serialize tool response: {}", e),
                data: None,
            })?;
            Ok(ToolCallResult::success(response.message().to_string(), Some(structured)))
        }
        Err(e) => {
            debug!("Tool returned an error: {}", e);
            Ok(ToolCallResult::error(e.to_string()))
        }
    }
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tracker: StreakTrackerServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        // Write response + newline
                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub(crate) async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request.method);
            return None;
        };

        Some(self.handle_request(id, request).await)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({"tools": tool_definitions()})),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(init)) => info!(
                "MCP client connected: {} {} (protocol {})",
                init.client_info.name, init.client_info.version, init.protocol_version
            ),
            Some(Err(e)) => warn!("MCP client connected with unreadable initialize params: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Streak Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Self::respond(id, &result)
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            debug!("tools/call '{}' received before the initialized notification", tool_params.name);
        }

        let storage = self.tracker.storage();
        let water_target_ml = self.tracker.config().water_target_ml;
        let today = today_key();
        let args = tool_params.arguments;

        let outcome = match tool_params.name.as_str() {
            "item_create" => run_tool(args, |p| tools::create_item(storage, p, today)),
            "item_toggle" => run_tool(args, |p| tools::toggle_item(storage, p, today)),
            "item_status" => run_tool(args, |p| tools::get_item_status(storage, p, today)),
            "item_list" => run_tool(args, |p| tools::list_items(storage, p, today)),
            "item_update" => run_tool(args, |p| tools::update_item(storage, p)),
            "item_delete" => run_tool(args, |p| tools::delete_item(storage, p)),
            "water_log" => {
                run_tool(args, |p| tools::log_water(storage, p, today, water_target_ml))
            }
            "water_status" => {
                run_tool(args, |p| tools::get_water_status(storage, p, today, water_target_ml))
            }
            other => Ok(ToolCallResult::error(format!("Unknown tool: {}", other))),
        };

        match outcome {
            Ok(result) => Self::respond(id, &result),
            Err(e) => JsonRpcResponse::error(id, e.code, e.message, e.data),
        }
    }

    fn respond<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize result: {}", e),
                None,
            ),
        }
    }
}
