use crate::engine::core::app_state::{AppState, FrameSet};
use crate::engine::morph::progress::{
    MorphAction, MorphProgress, MorphSource, MorphState, MorphStateRequest,
};
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::tools::gesture::capture::GestureTracker;
use crate::tools::gesture::landmarks::LandmarkFrame;
use crate::tools::gesture::systems::{GestureTrackingRequest, LandmarkFrameEvent, TrackingAction};
use crate::tools::ornaments::drag::OrnamentInteraction;
use crate::tools::ornaments::state::{OrnamentRegistry, PhotoListEvent, PhotoSource};
use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 request structure. Requests without an `id` are notifications.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// One-way message to the frontend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Outgoing message buffers, flushed once per frame after the output set.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge to the hosting page.
///
/// Incoming messages are only drained once the app is running, so anything
/// the frontend sends during loading waits in the queue.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    (process_incoming_messages, handle_rpc_messages)
                        .chain()
                        .before(FrameSet::Input)
                        .run_if(in_state(AppState::Running)),
                    send_outgoing_messages.after(FrameSet::Output),
                ),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::{Arc, Mutex};

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(err) =
                window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", err);
            }
        }
        None => error!("Window object not available"),
    }

    // JS owns the closure from here on.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Raw message strings received by the browser listener.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

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

/// A request decoded into something the engine can act on.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCommand {
    SetMorphState(MorphState),
    ToggleMorphState,
    SetPhotos(Vec<PhotoSource>),
    AddPhoto(PhotoSource),
    RemovePhoto(PhotoSource),
    SetGestureTracking(bool),
    HandLandmarks(LandmarkFrame),
    GetSceneState,
    GetFps,
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: &serde_json::Value,
    expected: &str,
) -> Result<T, RpcError> {
    serde_json::from_value::<T>(params.clone()).map_err(|_| RpcError::invalid_params(expected))
}

/// Decode a request's method and parameters.
pub fn parse_command(request: &RpcRequest) -> Result<RpcCommand, RpcError> {
    #[derive(Deserialize)]
    struct StateParams {
        state: MorphState,
    }
    #[derive(Deserialize)]
    struct PhotosParams {
        sources: Vec<PhotoSource>,
    }
    #[derive(Deserialize)]
    struct PhotoParams {
        source: PhotoSource,
    }
    #[derive(Deserialize)]
    struct TrackingParams {
        enabled: bool,
    }

    let params = &request.params;
    let command = match request.method.as_str() {
        "set_morph_state" => {
            let parsed: StateParams =
                parse_params(params, "Expected 'state' of 'axis_shape' or 'scattered'")?;
            RpcCommand::SetMorphState(parsed.state)
        }
        "toggle_morph_state" => RpcCommand::ToggleMorphState,
        "set_photos" => {
            let parsed: PhotosParams = parse_params(params, "Expected 'sources' array")?;
            RpcCommand::SetPhotos(parsed.sources)
        }
        "add_photo" => {
            let parsed: PhotoParams = parse_params(params, "Expected 'source' parameter")?;
            RpcCommand::AddPhoto(parsed.source)
        }
        "remove_photo" => {
            let parsed: PhotoParams = parse_params(params, "Expected 'source' parameter")?;
            RpcCommand::RemovePhoto(parsed.source)
        }
        "set_gesture_tracking" => {
            let parsed: TrackingParams = parse_params(params, "Expected 'enabled' boolean")?;
            RpcCommand::SetGestureTracking(parsed.enabled)
        }
        "hand_landmarks" => {
            let frame: LandmarkFrame = parse_params(params, "Expected 'hands' landmark array")?;
            RpcCommand::HandLandmarks(frame)
        }
        "get_scene_state" => RpcCommand::GetSceneState,
        "get_fps" => RpcCommand::GetFps,
        _ => return Err(RpcError::method_not_found(&request.method)),
    };

    Ok(command)
}

/// Event writers for every engine-side effect of an RPC command.
#[derive(SystemParam)]
pub struct RpcEventWriters<'w> {
    morph: EventWriter<'w, MorphStateRequest>,
    photos: EventWriter<'w, PhotoListEvent>,
    tracking: EventWriter<'w, GestureTrackingRequest>,
    landmarks: EventWriter<'w, LandmarkFrameEvent>,
}

/// Read-only view of the scene for query methods.
#[derive(SystemParam)]
pub struct SceneSnapshot<'w> {
    diagnostics: Res<'w, DiagnosticsStore>,
    morph: Res<'w, MorphProgress>,
    registry: Res<'w, OrnamentRegistry>,
    tracker: Res<'w, GestureTracker>,
    interaction: Res<'w, OrnamentInteraction>,
}

/// Reply to `get_scene_state`.
#[derive(Serialize, Debug)]
pub struct SceneState<'a> {
    pub progress: f32,
    pub target: MorphState,
    pub ornaments: usize,
    pub photos: &'a [PhotoSource],
    pub gesture_tracking: bool,
    pub dragging: bool,
}

impl SceneSnapshot<'_> {
    fn scene_state(&self) -> Result<serde_json::Value, RpcError> {
        let state = SceneState {
            progress: self.morph.progress(),
            target: self.morph.target(),
            ornaments: self.registry.len(),
            photos: self.registry.sources(),
            gesture_tracking: self.tracker.is_enabled(),
            dragging: self.interaction.is_dragging(),
        };
        serde_json::to_value(state).map_err(|err| RpcError::internal_error(&err.to_string()))
    }
}

/// Morph target and photo list as they will be once the requests written so
/// far this frame are applied. Replies are computed against this, so two
/// toggles in one batch report two different states.
#[derive(Debug, Clone, PartialEq)]
struct PendingScene {
    target: MorphState,
    photos: Vec<PhotoSource>,
}

impl PendingScene {
    fn new(target: MorphState, photos: &[PhotoSource]) -> Self {
        Self {
            target,
            photos: photos.to_vec(),
        }
    }

    fn toggle(&mut self) -> MorphState {
        self.target = self.target.toggled();
        self.target
    }

    fn replace(&mut self, sources: &[PhotoSource]) {
        self.photos.clear();
        for source in sources {
            if !self.photos.contains(source) {
                self.photos.push(source.clone());
            }
        }
    }

    /// Returns true when the source was not yet present.
    fn add(&mut self, source: &PhotoSource) -> bool {
        if self.photos.contains(source) {
            return false;
        }
        self.photos.push(source.clone());
        true
    }

    /// Returns true when the source was present.
    fn remove(&mut self, source: &PhotoSource) -> bool {
        let before = self.photos.len();
        self.photos.retain(|s| s != source);
        self.photos.len() != before
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut writers: RpcEventWriters,
    snapshot: SceneSnapshot,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let mut pending = PendingScene::new(snapshot.morph.target(), snapshot.registry.sources());
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                if let Some(response) =
                    handle_rpc_request(&request, &mut writers, &snapshot, &mut pending)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Apply one request. Only requests carrying an `id` get a response.
fn handle_rpc_request(
    request: &RpcRequest,
    writers: &mut RpcEventWriters,
    snapshot: &SceneSnapshot,
    pending: &mut PendingScene,
) -> Option<RpcResponse> {
    let result = parse_command(request).and_then(|command| {
        if !matches!(command, RpcCommand::HandLandmarks(_)) {
            debug!("RPC {}", request.method);
        }
        execute_command(command, writers, snapshot, pending)
    });

    if let Err(error) = &result {
        warn!("RPC {} failed: {}", request.method, error.message);
    }

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => create_error_response(id, error),
    })
}

fn execute_command(
    command: RpcCommand,
    writers: &mut RpcEventWriters,
    snapshot: &SceneSnapshot,
    pending: &mut PendingScene,
) -> Result<serde_json::Value, RpcError> {
    let result = match command {
        RpcCommand::SetMorphState(state) => {
            pending.target = state;
            writers.morph.write(MorphStateRequest {
                action: MorphAction::Set(state),
                source: MorphSource::Rpc,
            });
            serde_json::json!({ "success": true, "state": state })
        }
        RpcCommand::ToggleMorphState => {
            let state = pending.toggle();
            writers.morph.write(MorphStateRequest {
                action: MorphAction::Toggle,
                source: MorphSource::Rpc,
            });
            serde_json::json!({ "success": true, "state": state })
        }
        RpcCommand::SetPhotos(sources) => {
            let count = sources.len();
            pending.replace(&sources);
            writers.photos.write(PhotoListEvent::Replace(sources));
            serde_json::json!({ "success": true, "count": count })
        }
        RpcCommand::AddPhoto(source) => {
            let added = pending.add(&source);
            writers.photos.write(PhotoListEvent::Add(source));
            serde_json::json!({ "success": true, "added": added })
        }
        RpcCommand::RemovePhoto(source) => {
            let removed = pending.remove(&source);
            writers.photos.write(PhotoListEvent::Remove(source));
            serde_json::json!({ "success": true, "removed": removed })
        }
        RpcCommand::SetGestureTracking(enabled) => {
            writers.tracking.write(GestureTrackingRequest {
                action: if enabled {
                    TrackingAction::Enable
                } else {
                    TrackingAction::Disable
                },
            });
            serde_json::json!({ "success": true, "enabled": enabled })
        }
        RpcCommand::HandLandmarks(frame) => {
            writers.landmarks.write(LandmarkFrameEvent(frame));
            serde_json::json!({ "success": true })
        }
        RpcCommand::GetSceneState => snapshot.scene_state()?,
        RpcCommand::GetFps => serde_json::json!({ "fps": smoothed_fps(&snapshot.diagnostics) }),
    };
    Ok(result)
}

fn create_error_response(id: serde_json::Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications, then responses.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

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
        let _ = message;
    }
}
