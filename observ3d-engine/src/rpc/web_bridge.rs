//! `postMessage` transport for web builds embedded in an iframe.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, window};

use super::remote_control::RemoteControl;

/// Raw messages received from the parent window since the last frame.
#[derive(Resource, Clone, Default)]
struct InboundQueue(Arc<Mutex<Vec<String>>>);

/// Moves JSON-RPC text between the parent window and [`RemoteControl`].
pub struct WebBridgePlugin;

impl Plugin for WebBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_message_listener)
            .add_systems(PreUpdate, forward_inbound)
            .add_systems(PostUpdate, post_outbound);
    }
}

fn setup_message_listener(mut commands: Commands) {
    let queue = InboundQueue::default();
    let sink = queue.0.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Ok(data) = event.data().dyn_into::<js_sys::JsString>() else {
            return;
        };
        let message: String = data.into();
        if !message.contains("jsonrpc") {
            return;
        }
        if let Ok(mut pending) = sink.lock() {
            pending.push(message);
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) =
                window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => warn!("No window; remote control disabled"),
    }

    // Listener lives for the page lifetime.
    closure.forget();
    commands.insert_resource(queue);
}

fn forward_inbound(queue: Option<Res<InboundQueue>>, mut remote: ResMut<RemoteControl>) {
    let Some(queue) = queue else {
        return;
    };
    let Ok(mut pending) = queue.0.lock() else {
        return;
    };
    for message in pending.drain(..) {
        remote.push_incoming(message);
    }
}

fn post_outbound(mut remote: ResMut<RemoteControl>) {
    let outgoing = remote.take_outgoing();
    if outgoing.is_empty() {
        return;
    }
    let Some(parent) = window().and_then(|w| w.parent().ok().flatten()) else {
        warn!("No parent window; dropping {} messages", outgoing.len());
        return;
    };
    for json in outgoing {
        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
            error!("Failed to send message to parent: {:?}", e);
        }
    }
}
