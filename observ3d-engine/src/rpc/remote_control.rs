use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::engine::director::Director;
use crate::engine::director::events::DirectorEvent;
use crate::engine::systems::director_systems::DirectorNotice;
use crate::error::ViewerError;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: -32600,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(json!({ "method": method })),
        }
    }

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

impl From<ViewerError> for RpcError {
    fn from(error: ViewerError) -> Self {
        match &error {
            ViewerError::UnknownMethod(method) => RpcError::method_not_found(method),
            ViewerError::UnknownEntity { .. }
            | ViewerError::DisabledEntity { .. }
            | ViewerError::InvalidParams(_) => {
                RpcError::invalid_params(&error.to_string())
            }
            _ => RpcError::internal_error(&error.to_string()),
        }
    }
}

/// Resource queueing remote control traffic.
///
/// A transport pushes raw JSON text in and takes serialized replies out; the
/// plugin systems do everything in between once per frame.
#[derive(Resource, Default)]
pub struct RemoteControl {
    incoming: Vec<String>,
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl RemoteControl {
    pub fn push_incoming(&mut self, message: impl Into<String>) {
        self.incoming.push(message.into());
    }

    /// Send notification to the remote side without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Messages waiting for the transport.
    pub fn pending_outgoing(&self) -> usize {
        self.outgoing_notifications.len() + self.outgoing_responses.len()
    }

    /// Serialized outgoing messages, notifications first.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        let notifications = self
            .outgoing_notifications
            .drain(..)
            .filter_map(|n| to_json(&n));
        let responses = self.outgoing_responses.drain(..).filter_map(|r| to_json(&r));
        notifications.chain(responses).collect()
    }

    /// Handle every queued message against the director.
    pub fn process(&mut self, director: &mut Director) {
        for message in std::mem::take(&mut self.incoming) {
            if let Some(response) = handle_rpc_message(&message, director) {
                self.queue_response(response);
            }
        }
    }
}

fn to_json<T: Serialize>(message: &T) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            None
        }
    }
}

/// Plugin wiring remote control into the app.
pub struct RemoteControlPlugin;

impl Plugin for RemoteControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RemoteControl>().add_systems(
            Update,
            (handle_remote_messages, forward_director_events).chain(),
        );

        #[cfg(target_arch = "wasm32")]
        app.add_plugins(super::web_bridge::WebBridgePlugin);

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(PostUpdate, log_outgoing_messages);
    }
}

/// Native builds have no embedding page; replies and notifications end in the log.
#[cfg(not(target_arch = "wasm32"))]
fn log_outgoing_messages(mut remote: ResMut<RemoteControl>) {
    for json in remote.take_outgoing() {
        debug!("Remote control outgoing: {}", json);
    }
}

fn handle_remote_messages(
    mut remote: ResMut<RemoteControl>,
    director: Option<ResMut<Director>>,
) {
    let Some(mut director) = director else {
        return;
    };
    remote.process(&mut director);
}

fn forward_director_events(
    mut notices: EventReader<DirectorNotice>,
    mut remote: ResMut<RemoteControl>,
) {
    for notice in notices.read() {
        if let Some((method, params)) = notification_for(&notice.0) {
            remote.send_notification(method, params);
        }
    }
}

/// Remote notification for a director event, when it has one.
pub fn notification_for(event: &DirectorEvent) -> Option<(&'static str, Value)> {
    match event {
        DirectorEvent::CameraChanged { id } => Some(("camera_changed", json!({ "id": id }))),
        DirectorEvent::OutputChanged { id, kind } => {
            Some(("output_changed", json!({ "id": id, "kind": kind })))
        }
        DirectorEvent::RenderSizeChanged { width, height } => Some((
            "render_size_changed",
            json!({ "width": width, "height": height }),
        )),
        DirectorEvent::TransitionCompleted { destination } => Some((
            "transition_completed",
            json!({ "destination": destination }),
        )),
        _ => None,
    }
}

/// Parse one raw message and handle it.
///
/// Notifications (no id) are executed without a reply; unparseable text is
/// logged and dropped.
pub fn handle_rpc_message(message: &str, director: &mut Director) -> Option<RpcResponse> {
    match serde_json::from_str::<RpcRequest>(message) {
        Ok(request) => handle_rpc_request(&request, director),
        Err(parse_error) => {
            warn!("Dropping unparseable RPC message: {}", parse_error);
            None
        }
    }
}

/// Handle individual RPC request and generate response based on method.
pub fn handle_rpc_request(request: &RpcRequest, director: &mut Director) -> Option<RpcResponse> {
    if request.jsonrpc != "2.0" {
        let id = request.id.clone()?;
        return Some(error_response(
            id,
            RpcError::invalid_request("Expected jsonrpc 2.0"),
        ));
    }

    let result = dispatch(&request.method, &request.params, director);
    if let Err(e) = &result {
        warn!("RPC {} failed: {}", request.method, e);
    }

    // Only requests with ids get responses.
    let id = request.id.clone()?;
    Some(match result {
        Ok(value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(value),
            error: None,
            id: Some(id),
        },
        Err(error) => error_response(id, error.into()),
    })
}

fn dispatch(method: &str, params: &Value, director: &mut Director) -> Result<Value, ViewerError> {
    match method {
        "get_cameras" => Ok(json!({
            "cameras": director.available_cameras(),
            "active": director.active_camera_id(),
        })),
        "get_outputs" => Ok(json!({
            "outputs": director.available_outputs(),
            "active": director.active_output_id(),
        })),
        "activate_camera" => {
            let id = id_param(params)?;
            if !director.activate_camera(&id) {
                return Err(refused("camera", director.camera(&id).is_some(), id));
            }
            Ok(json!({ "success": true, "active": director.active_camera_id() }))
        }
        "activate_output" => {
            let id = id_param(params)?;
            if !director.activate_output(&id) {
                return Err(refused("output", director.output(&id).is_some(), id));
            }
            Ok(json!({ "success": true, "active": director.active_output_id() }))
        }
        "deactivate_cameras" => {
            director.deactivate_all_cameras();
            Ok(json!({ "success": true }))
        }
        "go_to_camera" => {
            let id = id_param(params)?;
            if !director.go_to(&id, None) {
                return Err(refused("camera", director.camera(&id).is_some(), id));
            }
            Ok(json!({
                "success": true,
                "transitioning": director.is_transitioning(),
            }))
        }
        "get_state" => Ok(state_of(director)),
        other => Err(ViewerError::UnknownMethod(other.to_string())),
    }
}

fn state_of(director: &Director) -> Value {
    let (width, height) = director.render_size();
    let transition = director.transition().map(|t| {
        json!({
            "destination": t.destination,
            "path": t.plan.kind,
            "elapsed": t.elapsed,
            "duration": t.plan.duration(),
        })
    });
    json!({
        "camera": director.active_camera_id(),
        "output": director.active_output_id(),
        "transition": transition,
        "render_size": { "width": width, "height": height },
    })
}

fn id_param(params: &Value) -> Result<String, ViewerError> {
    #[derive(Deserialize)]
    struct IdParams {
        id: String,
    }

    serde_json::from_value::<IdParams>(params.clone())
        .map(|p| p.id)
        .map_err(|_| ViewerError::InvalidParams("Expected 'id' parameter".to_string()))
}

/// Why an activation was refused: the id is registered but disabled, or
/// it is not registered at all.
fn refused(family: &'static str, registered: bool, id: String) -> ViewerError {
    if registered {
        ViewerError::DisabledEntity { family, id }
    } else {
        ViewerError::UnknownEntity { family, id }
    }
}

fn error_response(id: Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}
