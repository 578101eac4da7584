use std::collections::BTreeMap;

use crate::foundation::core::Rect;
use crate::viewport::state::Measurements;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Debounce delays for [`ChangeObserver`].
///
/// Orientation gets the longest delay because host rotation reports
/// intermediate, incorrect dimensions before settling.
#[serde(default)]
pub struct ObserverConfig {
    /// Delay for per-container geometry events.
    pub container_delay_ms: u64,
    /// Delay for document-wide resize and breakpoint-attribute events.
    pub resize_delay_ms: u64,
    /// Delay for orientation changes.
    pub orientation_delay_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            container_delay_ms: 50,
            resize_delay_ms: 100,
            orientation_delay_ms: 300,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Per-binding options supplied at `observe` time.
#[serde(default)]
pub struct ObserveOptions {
    /// Override of the container geometry debounce delay.
    pub delay_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
/// A geometry-affecting host event injected into the observer.
pub enum GeometryEvent {
    /// One observed container changed size.
    Container {
        /// Container id.
        id: String,
        /// New measured bounds.
        bounds: Rect,
    },
    /// The viewport was resized.
    GlobalResize {
        /// Fresh viewport measurements.
        measurements: Measurements,
    },
    /// The host reported an orientation change.
    Orientation {
        /// Fresh viewport measurements.
        measurements: Measurements,
    },
    /// A breakpoint-bearing attribute mutated. Funnelled through the
    /// `"global-resize"` debounce id alongside resizes.
    BreakpointAttribute {
        /// New attribute value.
        value: String,
        /// Fresh viewport measurements.
        measurements: Measurements,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What caused a callback invocation.
pub enum ChangeTrigger {
    /// First synchronous fire right after `observe`.
    Initial,
    /// Debounced per-container geometry change.
    ContainerGeometry,
    /// Debounced document-wide resize or breakpoint mutation.
    GlobalResize,
    /// Debounced orientation change.
    Orientation,
    /// Synchronous `force_update`, bypassing debounce.
    Forced,
}

#[derive(Clone, Debug)]
/// Payload delivered to a registered callback.
pub struct ChangeNotice {
    /// The observed container this notice is for.
    pub container_id: String,
    /// Latest known bounds of that container, when a geometry event carried
    /// them.
    pub bounds: Option<Rect>,
    /// Viewport measurements from the last event in the debounce window.
    pub measurements: Option<Measurements>,
    /// What fired the callback.
    pub trigger: ChangeTrigger,
    /// True exactly once, on the immediate fire after `observe`.
    pub initial: bool,
}

/// Registered recompute callback.
pub type ChangeCallback = Box<dyn FnMut(&ChangeNotice)>;

struct Binding {
    id: String,
    callback: ChangeCallback,
    options: ObserveOptions,
    latest_bounds: Option<Rect>,
    // Set when the host failed to attach a per-container watcher; the
    // binding then only hears document-wide events.
    global_only: bool,
}

#[derive(Clone, Debug)]
enum PendingPayload {
    Container { id: String, bounds: Rect },
    Global {
        trigger: ChangeTrigger,
        measurements: Measurements,
    },
}

#[derive(Clone, Debug)]
struct PendingFire {
    deadline: u64,
    payload: PendingPayload,
}

/// Debounced dispatcher of geometry-change events to registered callbacks.
///
/// Host adapters inject raw events through [`ChangeObserver::ingest`] and
/// drive time by calling [`ChangeObserver::run_due`]; there is no hidden
/// clock or timer thread. Debounce state is a deadline map keyed by a stable
/// id per source (`container:<id>`, `"global-resize"`, `"orientation"`); a
/// new event within an active window replaces both the deadline and the
/// stored payload, so only the most recent trigger in the window survives.
pub struct ChangeObserver {
    config: ObserverConfig,
    bindings: Vec<Binding>,
    pending: BTreeMap<String, PendingFire>,
}

impl std::fmt::Debug for ChangeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeObserver")
            .field("config", &self.config)
            .field(
                "bindings",
                &self.bindings.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
            )
            .field("pending", &self.pending)
            .finish()
    }
}

impl ChangeObserver {
    /// Create an observer with the given debounce delays.
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            bindings: Vec::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Register a callback for a container, replacing any prior binding for
    /// the same id (its registration position is kept).
    ///
    /// The callback fires once immediately with `initial = true`, so callers
    /// do not special-case first paint.
    pub fn observe(
        &mut self,
        container_id: impl Into<String>,
        mut callback: ChangeCallback,
        options: ObserveOptions,
    ) {
        let container_id = container_id.into();
        let notice = ChangeNotice {
            container_id: container_id.clone(),
            bounds: None,
            measurements: None,
            trigger: ChangeTrigger::Initial,
            initial: true,
        };
        callback(&notice);

        let binding = Binding {
            id: container_id.clone(),
            callback,
            options,
            latest_bounds: None,
            global_only: false,
        };
        if let Some(existing) = self.bindings.iter_mut().find(|b| b.id == container_id) {
            *existing = binding;
        } else {
            self.bindings.push(binding);
        }
    }

    /// Remove a binding and cancel its pending debounce timer.
    ///
    /// Unknown ids are a no-op.
    pub fn unobserve(&mut self, container_id: &str) {
        self.bindings.retain(|b| b.id != container_id);
        self.pending.remove(&container_debounce_id(container_id));
    }

    /// Record that the host could not attach a per-container watcher.
    ///
    /// The binding degrades to the coarser global-resize-only strategy.
    pub fn attach_failed(&mut self, container_id: &str) {
        if let Some(binding) = self.bindings.iter_mut().find(|b| b.id == container_id) {
            binding.global_only = true;
            tracing::warn!(
                container = container_id,
                "container watcher failed to attach; falling back to global resize only"
            );
        }
    }

    /// Inject a host event, scheduling (or rescheduling) its debounce timer.
    pub fn ingest(&mut self, event: GeometryEvent, now: u64) {
        let (debounce_id, delay, payload) = match event {
            GeometryEvent::Container { id, bounds } => {
                let Some(binding) = self.bindings.iter().find(|b| b.id == id) else {
                    tracing::warn!(container = %id, "geometry event for unobserved container");
                    return;
                };
                if binding.global_only {
                    return;
                }
                let delay = binding.options.delay_ms.unwrap_or(self.config.container_delay_ms);
                (
                    container_debounce_id(&id),
                    delay,
                    PendingPayload::Container { id, bounds },
                )
            }
            GeometryEvent::GlobalResize { measurements } => (
                "global-resize".to_string(),
                self.config.resize_delay_ms,
                PendingPayload::Global {
                    trigger: ChangeTrigger::GlobalResize,
                    measurements,
                },
            ),
            GeometryEvent::BreakpointAttribute { measurements, .. } => (
                "global-resize".to_string(),
                self.config.resize_delay_ms,
                PendingPayload::Global {
                    trigger: ChangeTrigger::GlobalResize,
                    measurements,
                },
            ),
            GeometryEvent::Orientation { measurements } => (
                "orientation".to_string(),
                self.config.orientation_delay_ms,
                PendingPayload::Global {
                    trigger: ChangeTrigger::Orientation,
                    measurements,
                },
            ),
        };

        // Classic debounce: the newest event in the window owns the timer.
        self.pending.insert(
            debounce_id,
            PendingFire {
                deadline: now.saturating_add(delay),
                payload,
            },
        );
    }

    /// Fire every debounce timer whose deadline has passed.
    ///
    /// Within one call, document-wide fires notify all observed containers in
    /// their registration order. Returns the number of callback invocations.
    pub fn run_due(&mut self, now: u64) -> usize {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, fire)| fire.deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();

        let mut invocations = 0;
        for id in due {
            let Some(fire) = self.pending.remove(&id) else {
                continue;
            };
            match fire.payload {
                PendingPayload::Container { id, bounds } => {
                    if let Some(idx) = self.bindings.iter().position(|b| b.id == id) {
                        self.bindings[idx].latest_bounds = Some(bounds);
                        let notice = ChangeNotice {
                            container_id: id,
                            bounds: Some(bounds),
                            measurements: None,
                            trigger: ChangeTrigger::ContainerGeometry,
                            initial: false,
                        };
                        (self.bindings[idx].callback)(&notice);
                        invocations += 1;
                    }
                }
                PendingPayload::Global {
                    trigger,
                    measurements,
                } => {
                    for idx in 0..self.bindings.len() {
                        let notice = ChangeNotice {
                            container_id: self.bindings[idx].id.clone(),
                            bounds: self.bindings[idx].latest_bounds,
                            measurements: Some(measurements),
                            trigger,
                            initial: false,
                        };
                        (self.bindings[idx].callback)(&notice);
                        invocations += 1;
                    }
                }
            }
        }
        invocations
    }

    /// Invoke every registered callback once, synchronously, bypassing
    /// debounce. Idempotent; pending timers are left untouched.
    pub fn force_update(&mut self) -> usize {
        for idx in 0..self.bindings.len() {
            let notice = ChangeNotice {
                container_id: self.bindings[idx].id.clone(),
                bounds: self.bindings[idx].latest_bounds,
                measurements: None,
                trigger: ChangeTrigger::Forced,
                initial: false,
            };
            (self.bindings[idx].callback)(&notice);
        }
        self.bindings.len()
    }

    /// Ids of observed containers in registration order.
    pub fn observed(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.id.as_str()).collect()
    }

    /// Whether any debounce timer is currently armed.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

fn container_debounce_id(container_id: &str) -> String {
    format!("container:{container_id}")
}

#[cfg(test)]
#[path = "../../tests/unit/observer/change.rs"]
mod tests;
