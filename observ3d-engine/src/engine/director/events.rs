use serde::{Deserialize, Serialize};

use crate::engine::entity::lifecycle::{EntityFamily, EntityId, LifecyclePhase};
use crate::engine::transition::planner::PathKind;

/// Everything the director announces, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DirectorEvent {
    Lifecycle {
        family: EntityFamily,
        id: EntityId,
        phase: LifecyclePhase,
    },
    CameraChanged {
        id: EntityId,
    },
    OutputChanged {
        id: EntityId,
        kind: String,
    },
    RenderSizeChanged {
        width: u32,
        height: u32,
    },
    TransitionStarted {
        destination: EntityId,
        path: PathKind,
        duration: f32,
    },
    TransitionCompleted {
        destination: EntityId,
    },
}

/// Operations observers may ask for while an event is being delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum DirectorRequest {
    ActivateCamera { id: EntityId },
    ActivateOutput { id: EntityId },
    DeactivateCameras,
    DeactivateOutputs,
    GoTo { id: EntityId },
}

/// Requests collected during one dispatch.
#[derive(Debug, Default)]
pub struct RequestQueue {
    requests: Vec<DirectorRequest>,
}

impl RequestQueue {
    pub fn push(&mut self, request: DirectorRequest) {
        self.requests.push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, DirectorRequest> {
        self.requests.drain(..)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Observer = Box<dyn FnMut(&DirectorEvent, &mut RequestQueue) + Send + Sync>;

/// Synchronous observer list. Observers are called in subscription order.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl EventBus {
    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn dispatch(&mut self, event: &DirectorEvent, requests: &mut RequestQueue) {
        for (_, observer) in &mut self.observers {
            observer(event, requests);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::default();

        for tag in ["first", "second"] {
            let seen = seen.clone();
            bus.subscribe(Box::new(move |_, _| seen.lock().unwrap().push(tag)));
        }

        let mut requests = RequestQueue::default();
        bus.dispatch(&DirectorEvent::CameraChanged { id: "a".into() }, &mut requests);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::default();
        let counter = count.clone();
        let id = bus.subscribe(Box::new(move |_, _| *counter.lock().unwrap() += 1));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());

        let mut requests = RequestQueue::default();
        bus.dispatch(&DirectorEvent::CameraChanged { id: "a".into() }, &mut requests);
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_observers_queue_requests() {
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(|event, requests| {
            if let DirectorEvent::CameraChanged { id } = event {
                requests.push(DirectorRequest::GoTo { id: id.clone() });
            }
        }));

        let mut requests = RequestQueue::default();
        bus.dispatch(&DirectorEvent::CameraChanged { id: "map".into() }, &mut requests);
        assert_eq!(
            requests.drain().collect::<Vec<_>>(),
            vec![DirectorRequest::GoTo { id: "map".into() }]
        );
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(DirectorEvent::RenderSizeChanged {
            width: 800,
            height: 600,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "render_size_changed", "width": 800, "height": 600 })
        );
    }
}
