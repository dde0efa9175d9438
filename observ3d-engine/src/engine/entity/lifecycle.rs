use serde::{Deserialize, Serialize};
use std::any::Any;

/// Identifier of a registered camera or output, unique within its registry.
pub type EntityId = String;

/// The three observable phases of an activation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    PreActivate,
    Activated,
    Deactivated,
}

/// Which coordinator an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFamily {
    Camera,
    Output,
}

/// One lifecycle step performed by a coordinator, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub family: EntityFamily,
    pub id: EntityId,
    pub phase: LifecyclePhase,
    /// Set on `Deactivated` when the entity was the coordinator's active slot.
    pub was_active_slot: bool,
}

/// Activation state shared by every camera and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    id: EntityId,
    active: bool,
    enabled: bool,
    is_default: bool,
    hidden: bool,
}

impl Lifecycle {
    /// An empty id asks the registry to generate one on registration.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            active: false,
            enabled: true,
            is_default: false,
            hidden: false,
        }
    }

    /// Mark as the preferred choice when a coordinator starts.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Exclude from listings and from the start-up choice.
    pub fn as_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// A unit with on/off semantics driven by a coordinator.
///
/// Activation state is only ever changed by the owning coordinator, which
/// guarantees the PreActivate → Activated ordering; the hooks let an
/// implementation react to its own transitions.
pub trait Activatable: Any + Send + Sync {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Stable, fully qualified type name used for persistence and lookups.
    fn kind(&self) -> &'static str;

    fn on_pre_activate(&mut self) {}

    fn on_activated(&mut self) {}

    fn on_deactivated(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn id(&self) -> &str {
        self.lifecycle().id()
    }

    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }
}

/// Implements `Activatable` for a type holding a `lifecycle: Lifecycle` field.
///
/// Lifecycle hooks may be supplied in a trailing block.
#[macro_export]
macro_rules! impl_activatable {
    ($ty:ty { $($hooks:tt)* }) => {
        impl $crate::engine::entity::lifecycle::Activatable for $ty {
            fn lifecycle(&self) -> &$crate::engine::entity::lifecycle::Lifecycle {
                &self.lifecycle
            }

            fn lifecycle_mut(&mut self) -> &mut $crate::engine::entity::lifecycle::Lifecycle {
                &mut self.lifecycle
            }

            fn kind(&self) -> &'static str {
                std::any::type_name::<$ty>()
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }

            $($hooks)*
        }
    };
    ($ty:ty) => {
        $crate::impl_activatable!($ty {});
    };
}

/// Last path segment of a kind, lower-cased, for generated ids.
pub fn short_kind(kind: &str) -> String {
    let path = kind.split('<').next().unwrap_or(kind);
    let name = path.rsplit("::").next().unwrap_or(path);
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_defaults() {
        let lifecycle = Lifecycle::new("orbit");
        assert_eq!(lifecycle.id(), "orbit");
        assert!(!lifecycle.is_active());
        assert!(lifecycle.is_enabled());
        assert!(!lifecycle.is_default());
        assert!(!lifecycle.is_hidden());
    }

    #[test]
    fn test_lifecycle_builders() {
        let lifecycle = Lifecycle::new("map").as_default().as_hidden();
        assert!(lifecycle.is_default());
        assert!(lifecycle.is_hidden());
    }

    #[test]
    fn test_short_kind() {
        assert_eq!(
            short_kind("observ3d_engine::engine::camera::orbital::OrbitalCamera"),
            "orbitalcamera"
        );
        assert_eq!(short_kind("Plain"), "plain");
        assert_eq!(short_kind("a::Wrapper<b::Inner>"), "wrapper");
    }
}
