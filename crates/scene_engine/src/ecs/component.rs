//! Components and the behaviour dispatch seam
//!
//! A [`Component`] wraps one [`ComponentKind`] variant together with the
//! bookkeeping every component shares: the enabled flag, the owning entity,
//! whether the start hook has run, and the collider registry handle for
//! collider variants. Per-variant behaviour is reached through the
//! [`Behaviour`] trait.

use std::any::Any;
use std::fmt;

use super::components::{
    BoxCollider, CameraFollow, CapsuleCollider, Collider, CollisionReaction, MeshCollider,
    MovementController,
};
use super::entity::{EntityId, Material};
use super::inspector::Inspector;
use crate::assets::GeometryHandle;
use crate::debug::DebugDraw;
use crate::foundation::math::{Transform, Vec3};
use crate::input::InputState;
use crate::physics::registry::ColliderHandle;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};
use crate::scene::Camera;

/// The other participant in a collision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// The other entity
    pub entity: EntityId,
    /// The other entity's name at the time of the collision
    pub name: String,
}

/// Mutable view of the entity that owns a component
///
/// Built by splitting the entity so its component list stays borrowable
/// while a single component runs.
pub struct Owner<'a> {
    /// Owning entity
    pub id: EntityId,
    /// Entity name
    pub name: &'a str,
    /// Entity transform
    pub transform: &'a mut Transform,
    /// Entity material
    pub material: &'a mut Material,
    /// Entity geometry, if any
    pub geometry: Option<&'a GeometryHandle>,
}

/// Everything a component can touch during its per-frame update
pub struct UpdateContext<'a> {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Input held this frame
    pub input: &'a InputState,
    /// The owning entity
    pub owner: Owner<'a>,
    /// The scene's active camera
    pub camera: &'a mut Camera,
    move_request: Option<Vec3>,
}

impl<'a> UpdateContext<'a> {
    /// Create a context for one component update
    pub fn new(delta_time: f32, input: &'a InputState, owner: Owner<'a>, camera: &'a mut Camera) -> Self {
        Self {
            delta_time,
            input,
            owner,
            camera,
            move_request: None,
        }
    }

    /// Ask the scene to move the owner by `delta`, subject to collision
    /// resolution. Requests made during one update accumulate.
    pub fn request_move(&mut self, delta: Vec3) {
        *self.move_request.get_or_insert_with(Vec3::zeros) += delta;
    }

    /// The accumulated movement request, if any
    pub fn take_move_request(&mut self) -> Option<Vec3> {
        self.move_request.take()
    }
}

/// Per-variant component behaviour
///
/// Every hook has a no-op default so variants only implement what they use.
pub trait Behaviour {
    /// Serialization tag, e.g. `"BoxColliderComponent"`
    fn type_name(&self) -> &'static str;

    /// Human-readable name, e.g. `"Box Collider"`
    fn display_name(&self) -> &'static str {
        self.type_name()
    }

    /// Runs once, after the owner reference is set
    fn start(&mut self, _owner: &mut Owner<'_>) {}

    /// Runs every frame while enabled
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Runs when the owner takes part in a confirmed overlap. Fires before
    /// the mover's displacement is committed or rejected.
    fn on_collision(&mut self, _owner: &mut Owner<'_>, _other: &Contact) {}

    /// Emit debug shapes
    fn draw_gizmos(&self, _transform: &Transform, _draw: &mut DebugDraw) {}

    /// Expose editable properties
    fn inspect(&mut self, _ui: &mut dyn Inspector) {}

    /// Write the component's field block
    fn save(&self, _out: &mut FieldWriter) {}

    /// Read the component's field block
    fn load(&mut self, _input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        Ok(())
    }
}

/// User-defined behaviour
///
/// Implemented automatically for every `Behaviour + Clone + 'static` type.
pub trait Script: Behaviour {
    /// Deep copy preserving the concrete type
    fn clone_script(&self) -> Box<dyn Script>;
    /// Downcast support
    fn as_any(&self) -> &dyn Any;
    /// Mutable downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// View as the behaviour seam
    fn as_behaviour(&self) -> &dyn Behaviour;
    /// Mutable view as the behaviour seam
    fn as_behaviour_mut(&mut self) -> &mut dyn Behaviour;
}

impl<T> Script for T
where
    T: Behaviour + Clone + 'static,
{
    fn clone_script(&self) -> Box<dyn Script> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_behaviour(&self) -> &dyn Behaviour {
        self
    }

    fn as_behaviour_mut(&mut self) -> &mut dyn Behaviour {
        self
    }
}

impl fmt::Debug for dyn Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.type_name())
    }
}

/// The closed set of component variants
#[derive(Debug)]
pub enum ComponentKind {
    /// Oriented box collider
    BoxCollider(BoxCollider),
    /// Capsule collider
    CapsuleCollider(CapsuleCollider),
    /// Triangle mesh collider
    MeshCollider(MeshCollider),
    /// WASD movement with collision resolution
    MovementController(MovementController),
    /// Camera that trails its owner
    CameraFollow(CameraFollow),
    /// Colour flash on collision
    CollisionReaction(CollisionReaction),
    /// User behaviour
    Script(Box<dyn Script>),
}

impl ComponentKind {
    /// Dispatch to the variant's behaviour
    pub fn behaviour(&self) -> &dyn Behaviour {
        match self {
            Self::BoxCollider(c) => c,
            Self::CapsuleCollider(c) => c,
            Self::MeshCollider(c) => c,
            Self::MovementController(c) => c,
            Self::CameraFollow(c) => c,
            Self::CollisionReaction(c) => c,
            Self::Script(s) => s.as_behaviour(),
        }
    }

    /// Mutable dispatch to the variant's behaviour
    pub fn behaviour_mut(&mut self) -> &mut dyn Behaviour {
        match self {
            Self::BoxCollider(c) => c,
            Self::CapsuleCollider(c) => c,
            Self::MeshCollider(c) => c,
            Self::MovementController(c) => c,
            Self::CameraFollow(c) => c,
            Self::CollisionReaction(c) => c,
            Self::Script(s) => s.as_behaviour_mut(),
        }
    }

    /// Collider view for collider variants
    pub fn as_collider(&self) -> Option<&dyn Collider> {
        match self {
            Self::BoxCollider(c) => Some(c as &dyn Collider),
            Self::CapsuleCollider(c) => Some(c as &dyn Collider),
            Self::MeshCollider(c) => Some(c as &dyn Collider),
            _ => None,
        }
    }

    /// Deep copy of the variant and its fields
    pub fn duplicate(&self) -> Self {
        match self {
            Self::BoxCollider(c) => Self::BoxCollider(c.clone()),
            Self::CapsuleCollider(c) => Self::CapsuleCollider(c.clone()),
            Self::MeshCollider(c) => Self::MeshCollider(c.clone()),
            Self::MovementController(c) => Self::MovementController(c.clone()),
            Self::CameraFollow(c) => Self::CameraFollow(c.clone()),
            Self::CollisionReaction(c) => Self::CollisionReaction(c.clone()),
            Self::Script(s) => Self::Script(s.clone_script()),
        }
    }
}

/// Typed access to one built-in variant
pub trait ComponentVariant: Sized + 'static {
    /// Borrow the variant out of a kind
    fn from_kind(kind: &ComponentKind) -> Option<&Self>;
    /// Mutably borrow the variant out of a kind
    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self>;
    /// Wrap into a kind
    fn into_kind(self) -> ComponentKind;
}

macro_rules! component_variants {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl ComponentVariant for $variant {
                fn from_kind(kind: &ComponentKind) -> Option<&Self> {
                    match kind {
                        ComponentKind::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self> {
                    match kind {
                        ComponentKind::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_kind(self) -> ComponentKind {
                    ComponentKind::$variant(self)
                }
            }

            impl From<$variant> for Component {
                fn from(variant: $variant) -> Self {
                    Component::new(variant.into_kind())
                }
            }
        )+
    };
}

component_variants!(
    BoxCollider,
    CapsuleCollider,
    MeshCollider,
    MovementController,
    CameraFollow,
    CollisionReaction,
);

/// A behaviour unit attached to an entity
#[derive(Debug)]
pub struct Component {
    enabled: bool,
    started: bool,
    owner: Option<EntityId>,
    collider: Option<ColliderHandle>,
    kind: ComponentKind,
}

impl Component {
    /// Wrap a variant; the component starts enabled and unattached
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            enabled: true,
            started: false,
            owner: None,
            collider: None,
            kind,
        }
    }

    /// Wrap a user script
    pub fn script<S: Script + 'static>(script: S) -> Self {
        Self::new(ComponentKind::Script(Box::new(script)))
    }

    /// Whether the component participates in updates, collisions and gizmos
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the component
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the start hook has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Owning entity, once attached
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Registry handle for an attached collider
    pub fn collider_handle(&self) -> Option<ColliderHandle> {
        self.collider
    }

    /// The wrapped variant
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The wrapped variant, mutably
    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// Serialization tag
    pub fn type_name(&self) -> &'static str {
        self.kind.behaviour().type_name()
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        self.kind.behaviour().display_name()
    }

    /// Collider view for collider variants
    pub fn as_collider(&self) -> Option<&dyn Collider> {
        self.kind.as_collider()
    }

    /// Collider view, only while enabled
    pub fn active_collider(&self) -> Option<&dyn Collider> {
        if self.enabled {
            self.kind.as_collider()
        } else {
            None
        }
    }

    /// Borrow as a concrete built-in variant
    pub fn get<T: ComponentVariant>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    /// Mutably borrow as a concrete built-in variant
    pub fn get_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    /// Borrow as a concrete script type
    pub fn get_script<T: 'static>(&self) -> Option<&T> {
        match &self.kind {
            ComponentKind::Script(s) => s.as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Mutably borrow as a concrete script type
    pub fn get_script_mut<T: 'static>(&mut self) -> Option<&mut T> {
        match &mut self.kind {
            ComponentKind::Script(s) => s.as_any_mut().downcast_mut(),
            _ => None,
        }
    }

    /// Deep copy: same variant, fields and enabled flag, but unattached,
    /// unstarted and without a registry record
    pub fn duplicate(&self) -> Self {
        Self {
            enabled: self.enabled,
            ..Self::new(self.kind.duplicate())
        }
    }

    pub(crate) fn attach(&mut self, owner: EntityId, collider: Option<ColliderHandle>) {
        self.owner = Some(owner);
        self.collider = collider;
    }

    pub(crate) fn detach(&mut self) -> Option<ColliderHandle> {
        self.owner = None;
        self.collider.take()
    }

    /// Run the start hook unless it already ran
    pub(crate) fn start(&mut self, owner: &mut Owner<'_>) {
        if !self.started {
            self.started = true;
            self.kind.behaviour_mut().start(owner);
        }
    }

    pub(crate) fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.enabled {
            self.kind.behaviour_mut().update(ctx);
        }
    }

    pub(crate) fn notify(&mut self, owner: &mut Owner<'_>, contact: &Contact) {
        if self.enabled {
            self.kind.behaviour_mut().on_collision(owner, contact);
        }
    }

    pub(crate) fn draw_gizmos(&self, transform: &Transform, draw: &mut DebugDraw) {
        if self.enabled {
            self.kind.behaviour().draw_gizmos(transform, draw);
        }
    }
}

impl From<ComponentKind> for Component {
    fn from(kind: ComponentKind) -> Self {
        Self::new(kind)
    }
}
