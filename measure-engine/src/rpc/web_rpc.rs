use crate::tools::measure::{InputSource, MeasureInput, MeasureTool};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tree_measure::{DisplayUnit, MeasureEvent};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the web frontend
/// and Bevy. Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Take the queued notification method names, oldest first.
    #[cfg(test)]
    pub fn drain_notification_methods(&mut self) -> Vec<String> {
        self.outgoing_notifications
            .drain(..)
            .map(|notification| notification.method)
            .collect()
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut measure_tool: Option<ResMut<MeasureTool>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut measure_inputs: EventWriter<MeasureInput>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);

                if let Some(response) = handle_rpc_request(
                    &request,
                    measure_tool.as_deref_mut(),
                    &mut measure_inputs,
                ) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    measure_tool: Option<&mut MeasureTool>,
    measure_inputs: &mut EventWriter<MeasureInput>,
) -> Option<RpcResponse> {
    // Requests without an ID are notifications and get no response, but
    // their side effects still apply.
    let result = match request.method.as_str() {
        "capture_point" => handle_capture_point(&request.params, measure_tool, measure_inputs),
        "reset_measurement" => handle_reset_measurement(measure_tool, measure_inputs),
        "get_measurement" => handle_get_measurement(measure_tool),
        "set_display_unit" => handle_set_display_unit(&request.params, measure_tool),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                request.id.clone()?,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn require_session(measure_tool: Option<&mut MeasureTool>) -> Result<&mut MeasureTool, RpcError> {
    measure_tool.ok_or_else(|| RpcError::internal_error("Measurement session not ready"))
}

/// Queue a capture at viewport coordinates. The result reports acceptance
/// only; the outcome arrives as a notification.
fn handle_capture_point(
    params: &serde_json::Value,
    measure_tool: Option<&mut MeasureTool>,
    measure_inputs: &mut EventWriter<MeasureInput>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct CapturePointParams {
        x: f32,
        y: f32,
    }

    let point = serde_json::from_value::<CapturePointParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected numeric 'x' and 'y' parameters"))?;
    let location = Vec2::new(point.x, point.y);
    if !location.is_finite() {
        return Err(RpcError::invalid_params("Capture location must be finite"));
    }
    require_session(measure_tool)?;

    measure_inputs.write(MeasureInput::new(
        MeasureEvent::Capture { location },
        InputSource::Rpc,
    ));

    Ok(serde_json::json!({ "queued": true }))
}

fn handle_reset_measurement(
    measure_tool: Option<&mut MeasureTool>,
    measure_inputs: &mut EventWriter<MeasureInput>,
) -> Result<serde_json::Value, RpcError> {
    require_session(measure_tool)?;
    measure_inputs.write(MeasureInput::new(MeasureEvent::Reset, InputSource::Rpc));
    Ok(serde_json::json!({ "queued": true }))
}

fn handle_get_measurement(
    measure_tool: Option<&mut MeasureTool>,
) -> Result<serde_json::Value, RpcError> {
    Ok(require_session(measure_tool)?.snapshot())
}

fn handle_set_display_unit(
    params: &serde_json::Value,
    measure_tool: Option<&mut MeasureTool>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct DisplayUnitParams {
        unit: String,
    }

    let unit_params = serde_json::from_value::<DisplayUnitParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'unit' parameter"))?;
    let unit = DisplayUnit::from_string(&unit_params.unit)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown unit: {}", unit_params.unit)))?;

    let measure_tool = require_session(measure_tool)?;
    measure_tool.controller.set_display_unit(unit);
    info!("Display unit set to {:?}", unit);

    Ok(serde_json::json!({
        "unit": unit,
        "formatted": measure_tool.controller.formatted_distance(),
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window hosting the iframe.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
