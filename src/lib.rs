//! # sprig-dom
//!
//! A virtual-DOM rendering engine: declarative descriptor trees diffed
//! against a mutable live tree, with stateful components, batched
//! re-renders and keyed child reconciliation.
//!
//! ## Architecture
//!
//! The live tree is an index-based arena ([`dom`]); engine metadata (the
//! attribute cache, owning component, cached tag names) lives in a side
//! table on the node records, never in user-visible attributes. Descriptors
//! ([`vnode`]) are plain immutable values built with [`h`]. Rendering walks
//! descriptor and live tree together:
//!
//! ```text
//! h() descriptors → diff/idiff → live tree mutations
//!                      ↕
//!            component lifecycle + batched render queue
//! ```
//!
//! State changes are applied immediately but rendered in batches: the first
//! `set_state` of a batch schedules one flush through the deferral substrate
//! in [`options`], which the host drains at its next checkpoint via
//! [`run_deferred`].
//!
//! ## Modules
//!
//! - [`types`] - Core value types (Value, Props, Key, events)
//! - [`vnode`] - Descriptors and the `h`/`create_element` builder
//! - [`dom`] - The live tree arena and its mutation surface
//! - [`component`] - The Component trait, instances, recycle pool
//! - [`render`] - Reconciler, attribute synchronizer, render queue
//! - [`options`] - Engine configuration, observers, deferral

pub mod component;
pub mod dom;
pub mod options;
pub mod render;
pub mod types;
pub mod vnode;

pub use types::{
    Event, EventHandler, Key, Props, RefCallback, RefTarget, RenderMode, StyleValue, Value,
};

pub use vnode::{ChildArg, NodeName, VChild, VNode, clone_element, create_element};

/// The conventional short alias for [`create_element`].
pub use vnode::create_element as h;

pub use dom::{NodeId, to_html};

pub use component::{
    Component, ComponentInstance, ComponentType, InstanceRef, StateUpdate, StatusFlags, Updater,
    force_update, set_state,
};

pub use render::{render, render_into};

pub use options::{
    defer, pending_deferred, reset_options, run_deferred, set_after_mount, set_after_update,
    set_before_unmount, set_debounce_rendering, set_event_interceptor, set_on_element_created,
    set_sync_component_updates,
};
