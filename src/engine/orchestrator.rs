use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::cache::lru::{CacheConfig, ResultCache, cache_key};
use crate::foundation::core::{Breakpoint, Point, Rect, Role, Size, StyleTokens, px};
use crate::foundation::error::TessellaResult;
use crate::foundation::math;
use crate::grid::layout::grid_rects;
use crate::observer::change::{
    ChangeNotice, ChangeObserver, GeometryEvent, ObserveOptions, ObserverConfig,
};
use crate::partition::tree::{NodeId, PartitionTree, SplitStrategy};
use crate::position::resolver::place;
use crate::scale::resolver::{DensityHints, ScaleConfig, ScaleResolution, ScaleResolver};
use crate::spec::model::LayoutSpec;
use crate::viewport::state::{Measurements, ViewportCalculator, ViewportConfig, ViewportDescriptor};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Aggregate configuration for [`LayoutEngine`], one section per component.
///
/// No globals: every component receives its section explicitly at
/// construction.
#[serde(default)]
pub struct EngineConfig {
    /// Viewport calculator thresholds.
    pub viewport: ViewportConfig,
    /// Scale resolver bases and multipliers.
    pub scale: ScaleConfig,
    /// Result cache bounds.
    pub cache: CacheConfig,
    /// Observer debounce delays.
    pub observer: ObserverConfig,
    /// Fluid font scaling parameters.
    pub fluid_font: FluidFontConfig,
    /// Normalized leaf-weight spread that triggers a partition rebuild.
    pub rebalance_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            scale: ScaleConfig::default(),
            cache: CacheConfig::default(),
            observer: ObserverConfig::default(),
            fluid_font: FluidFontConfig::default(),
            rebalance_threshold: 0.15,
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Fluid font scale derived from viewport width.
#[serde(default)]
pub struct FluidFontConfig {
    /// Fraction of viewport width contributing to the font size.
    pub width_ratio: f64,
    /// Font size floor in pixels.
    pub min_px: f64,
    /// Font size ceiling in pixels.
    pub max_px: f64,
}

impl Default for FluidFontConfig {
    fn default() -> Self {
        Self {
            width_ratio: 0.011,
            min_px: 14.0,
            max_px: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
/// Timing and footprint metrics carried by engine events.
pub struct TimingMetrics {
    /// Duration of the last recompute in milliseconds.
    pub compute_ms: f64,
    /// Total recomputes since construction.
    pub recompute_count: u64,
    /// Live result-cache entries.
    pub cache_entries: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Lifecycle event kinds emitted by the engine.
pub enum EngineEventKind {
    /// First successful layout computation.
    Ready,
    /// Any subsequent layout recomputation.
    LayoutChanged,
}

#[derive(Clone, Debug)]
/// Lifecycle event delivered to registered listeners.
pub struct EngineEvent {
    /// Event kind.
    pub kind: EngineEventKind,
    /// Descriptor the layout was computed from.
    pub descriptor: ViewportDescriptor,
    /// Timing metrics for the cycle.
    pub metrics: TimingMetrics,
}

/// Listener for engine lifecycle events.
pub type EventListener = Box<dyn FnMut(&EngineEvent)>;

#[derive(Clone, Debug)]
/// Result of one layout cycle: the descriptor plus the token set the caller
/// applies to the rendering layer.
pub struct LayoutUpdate {
    /// Fresh viewport descriptor.
    pub descriptor: ViewportDescriptor,
    /// Named style tokens (region heights, split widths, gutter, measure,
    /// columns, fluid font size).
    pub tokens: StyleTokens,
}

#[derive(Debug, Default)]
struct PerfMonitor {
    recompute_count: u64,
    last_compute_ms: f64,
}

impl PerfMonitor {
    fn record(&mut self, elapsed_ms: f64) {
        self.recompute_count += 1;
        self.last_compute_ms = elapsed_ms;
    }

    fn snapshot(&self, cache_entries: usize) -> TimingMetrics {
        TimingMetrics {
            compute_ms: self.last_compute_ms,
            recompute_count: self.recompute_count,
            cache_entries,
        }
    }
}

/// Top-level layout driver for one page.
///
/// Owns the spec, the viewport calculator, the scale resolver, the result
/// cache, and the page's single [`ChangeObserver`]. Host adapters feed
/// events through [`LayoutEngine::notify`] and drive debounced work with
/// [`LayoutEngine::pump`]; every cycle re-measures the viewport, derives
/// region geometry, and returns the token set for the caller to apply.
/// Region recomputation always completes before element placement for the
/// same cycle, by sequencing.
pub struct LayoutEngine {
    config: EngineConfig,
    spec: LayoutSpec,
    calculator: ViewportCalculator,
    resolver: ScaleResolver,
    cache: ResultCache<Vec<Rect>>,
    observer: ChangeObserver,
    inbox: Rc<RefCell<Vec<ChangeNotice>>>,
    listeners: Vec<EventListener>,
    perf: PerfMonitor,
    partition: Option<PartitionTree>,
    last_measurements: Option<Measurements>,
    last_descriptor: Option<ViewportDescriptor>,
    ready_emitted: bool,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("observer", &self.observer)
            .field("last_descriptor", &self.last_descriptor)
            .field("ready_emitted", &self.ready_emitted)
            .finish()
    }
}

impl LayoutEngine {
    /// Build an engine from an explicit configuration and a validated spec.
    pub fn new(config: EngineConfig, spec: LayoutSpec) -> TessellaResult<Self> {
        spec.validate()?;

        let inbox: Rc<RefCell<Vec<ChangeNotice>>> = Rc::new(RefCell::new(Vec::new()));
        let mut observer = ChangeObserver::new(config.observer);
        let sink = Rc::clone(&inbox);
        // The whole-document binding: every document-wide event funnels into
        // the engine's inbox, drained by `pump`.
        observer.observe(
            "document",
            Box::new(move |notice| sink.borrow_mut().push(notice.clone())),
            ObserveOptions::default(),
        );
        // Drop the initial synchronous fire: it carries no measurements and
        // the first real cycle is driven by `bootstrap`.
        inbox.borrow_mut().clear();

        Ok(Self {
            calculator: ViewportCalculator::new(config.viewport),
            resolver: ScaleResolver::new(config.scale.clone()),
            cache: ResultCache::new(config.cache),
            observer,
            inbox,
            listeners: Vec::new(),
            perf: PerfMonitor::default(),
            partition: None,
            last_measurements: None,
            last_descriptor: None,
            ready_emitted: false,
            config,
            spec,
        })
    }

    /// Register a lifecycle event listener.
    pub fn on_event(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Run the first layout cycle from initial measurements, emitting
    /// `Ready`.
    pub fn bootstrap(&mut self, measurements: Measurements) -> LayoutUpdate {
        self.handle_change(measurements)
    }

    /// Inject a host geometry event into the observer.
    pub fn notify(&mut self, event: GeometryEvent, now: u64) {
        self.observer.ingest(event, now);
    }

    /// Fire due debounce timers and run a layout cycle per resulting notice.
    ///
    /// Notices without fresh measurements (container geometry, forced
    /// replays) reuse the last known viewport measurements; they are skipped
    /// with a warning when nothing has been measured yet.
    pub fn pump(&mut self, now: u64) -> Vec<LayoutUpdate> {
        self.observer.run_due(now);
        let notices: Vec<ChangeNotice> = self.inbox.borrow_mut().drain(..).collect();

        let mut updates = Vec::new();
        for notice in notices {
            let Some(measurements) = notice.measurements.or(self.last_measurements) else {
                tracing::warn!(
                    container = %notice.container_id,
                    "change notice before any measurement; skipping"
                );
                continue;
            };
            updates.push(self.handle_change(measurements));
        }
        updates
    }

    /// Clear the result cache and replay every observed callback once,
    /// synchronously. Idempotent.
    pub fn force_update(&mut self, now: u64) -> Vec<LayoutUpdate> {
        self.cache.clear();
        self.observer.force_update();
        // Forced notices carry no measurements; pump falls back to the last
        // known ones.
        self.pump(now)
    }

    /// One full layout cycle: measure, derive region geometry, publish
    /// tokens, emit lifecycle events.
    #[tracing::instrument(skip(self))]
    pub fn handle_change(&mut self, measurements: Measurements) -> LayoutUpdate {
        let started = Instant::now();
        let descriptor = self.calculator.calculate(measurements);
        let tokens = self.region_tokens(&descriptor);

        self.last_measurements = Some(measurements);
        self.last_descriptor = Some(descriptor);
        self.perf.record(started.elapsed().as_secs_f64() * 1000.0);

        let kind = if self.ready_emitted {
            EngineEventKind::LayoutChanged
        } else {
            self.ready_emitted = true;
            EngineEventKind::Ready
        };
        let event = EngineEvent {
            kind,
            descriptor,
            metrics: self.perf.snapshot(self.cache.len()),
        };
        for listener in &mut self.listeners {
            listener(&event);
        }

        LayoutUpdate { descriptor, tokens }
    }

    /// Derive the full token set for one descriptor.
    fn region_tokens(&self, descriptor: &ViewportDescriptor) -> StyleTokens {
        let mut tokens = StyleTokens::new();

        for (name, region) in &self.spec.layout.regions {
            let mut ratio = region.ratio;
            if let Some([lo, hi]) = region.ratio_range {
                ratio = math::clamp(ratio, lo, hi);
            }
            let mut height = ratio * descriptor.height;
            if let Some(max) = region.max_height {
                height = height.min(max);
            }
            // Pixel floor wins over the ceiling and the ratio.
            if let Some(min) = region.min_height {
                height = height.max(min);
            }
            tokens.insert(format!("--region-{name}-height"), px(height));
        }

        self.split_tokens(descriptor, &mut tokens);

        tokens.insert("--measure".to_string(), px(descriptor.measure));
        tokens.insert("--gutter".to_string(), px(descriptor.gutter));
        tokens.insert("--columns".to_string(), descriptor.columns.to_string());
        tokens.insert(
            "--header-height".to_string(),
            px(descriptor.header_height),
        );

        let fluid = &self.config.fluid_font;
        tokens.insert(
            "--font-fluid".to_string(),
            px(math::clamp(
                descriptor.width * fluid.width_ratio,
                fluid.min_px,
                fluid.max_px,
            )),
        );

        tokens
    }

    /// Main-split widths: ratios with pixel floors; when both floors cannot
    /// hold, the left side yields.
    fn split_tokens(&self, descriptor: &ViewportDescriptor, tokens: &mut StyleTokens) {
        let split = &self.spec.layout.main_split;
        if split.is_empty() {
            return;
        }
        let width = descriptor.width;
        let left = split.get("left");
        let right = split.get("right");

        let mut left_w = left
            .map(|s| (s.ratio * width).max(s.min_px.unwrap_or(0.0)))
            .unwrap_or_else(|| {
                right
                    .map(|s| width - (s.ratio * width).max(s.min_px.unwrap_or(0.0)))
                    .unwrap_or(width / 2.0)
            });
        let mut right_w = (width - left_w).max(0.0);
        if let Some(right_spec) = right
            && let Some(min_px) = right_spec.min_px
            && right_w < min_px
        {
            right_w = min_px.min(width);
            left_w = (width - right_w).max(0.0);
        }

        tokens.insert("--split-left-width".to_string(), px(left_w));
        tokens.insert("--split-right-width".to_string(), px(right_w));
    }

    /// Place one named element inside a container per the spec's position
    /// entry.
    ///
    /// Returns `None` (with a warning) for unknown element ids or before the
    /// first measurement; layout for other elements proceeds regardless.
    pub fn place_element(
        &self,
        element_id: &str,
        container: Rect,
        element_size: Size,
    ) -> Option<Point> {
        let Some(position) = self.spec.positions.get(element_id) else {
            tracing::warn!(element = element_id, "no position spec for element; skipping");
            return None;
        };
        let Some(descriptor) = self.last_descriptor.as_ref() else {
            tracing::warn!(element = element_id, "placement requested before first measurement");
            return None;
        };
        Some(place(position, container, descriptor, element_size))
    }

    /// Item rectangles for a configured grid, consulting the result cache.
    ///
    /// Unknown grid ids, disabled grids, and calls before the first
    /// measurement yield an empty vector with a warning.
    pub fn grid_items(
        &mut self,
        grid_id: &str,
        container: Rect,
        item_count: usize,
        now: u64,
    ) -> Vec<Rect> {
        let Some(grid_spec) = self.spec.quad_tree.get(grid_id) else {
            tracing::warn!(grid = grid_id, "no grid spec for id; skipping");
            return Vec::new();
        };
        let Some(descriptor) = self.last_descriptor.as_ref() else {
            tracing::warn!(grid = grid_id, "grid layout requested before first measurement");
            return Vec::new();
        };

        let key = cache_key(
            grid_id,
            container,
            descriptor.breakpoint,
            descriptor.orientation,
            &(grid_spec, item_count),
        );
        if let Some(cached) = self.cache.get(&key, now) {
            tracing::debug!(grid = grid_id, "grid layout served from cache");
            return cached.clone();
        }

        let rects = grid_rects(grid_spec, item_count, container, descriptor.breakpoint);
        self.cache.set(key, rects.clone(), now);
        rects
    }

    /// Resolve the content scale and token bundle for one container at the
    /// current breakpoint (desktop before the first measurement).
    pub fn container_scale(
        &self,
        role: Role,
        rect: Rect,
        hints: DensityHints,
    ) -> ScaleResolution {
        let breakpoint = self
            .last_descriptor
            .as_ref()
            .map(|d| d.breakpoint)
            .unwrap_or(Breakpoint::Desktop);
        self.resolver.resolve(role, rect, breakpoint, hints)
    }

    /// Build (or replace) the page's top-level partition tree over a root
    /// rectangle and split it once with the given strategy.
    ///
    /// The tree's rounding increment follows the current device pixel ratio.
    pub fn build_partition(
        &mut self,
        root: Rect,
        strategy: SplitStrategy,
        weights: Option<&[f64]>,
    ) -> TessellaResult<Vec<NodeId>> {
        let increment = self
            .last_descriptor
            .as_ref()
            .map(|d| 1.0 / d.dpr)
            .unwrap_or(1.0);
        let mut tree = PartitionTree::with_increment(root, increment);
        let ids = tree.split(NodeId(0), strategy, weights)?;
        self.partition = Some(tree);
        Ok(ids)
    }

    /// The page partition tree, if one has been built.
    pub fn partition(&self) -> Option<&PartitionTree> {
        self.partition.as_ref()
    }

    /// Mutable access to the page partition tree, for role and weight
    /// assignment.
    pub fn partition_mut(&mut self) -> Option<&mut PartitionTree> {
        self.partition.as_mut()
    }

    /// Rebuild the partition from fresh leaf weights when they have drifted
    /// past the configured rebalance threshold.
    ///
    /// Returns the new leaf ids when a rebuild happened, `None` when the
    /// tree was still balanced (or absent).
    pub fn rebalance_partition(
        &mut self,
        weights: &[f64],
    ) -> TessellaResult<Option<Vec<NodeId>>> {
        let threshold = self.config.rebalance_threshold;
        match self.partition.as_mut() {
            Some(tree) if tree.needs_rebalance(threshold) => {
                let ids = tree.rebuild(weights)?;
                self.cache.clear();
                Ok(Some(ids))
            }
            _ => Ok(None),
        }
    }

    /// Register a container with the page observer.
    pub fn observe_container(&mut self, container_id: &str, options: ObserveOptions) {
        let sink = Rc::clone(&self.inbox);
        self.observer.observe(
            container_id,
            Box::new(move |notice| sink.borrow_mut().push(notice.clone())),
            options,
        );
        // The initial fire lands in the inbox; the next pump recomputes.
    }

    /// Remove a container binding.
    pub fn unobserve_container(&mut self, container_id: &str) {
        self.observer.unobserve(container_id);
    }

    /// Report a failed host watcher attach; the binding degrades to
    /// global-resize-only.
    pub fn watcher_attach_failed(&mut self, container_id: &str) {
        self.observer.attach_failed(container_id);
    }

    /// Last computed viewport descriptor, if any cycle has run.
    pub fn descriptor(&self) -> Option<&ViewportDescriptor> {
        self.last_descriptor.as_ref()
    }

    /// The active layout spec.
    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    /// Replace the spec (hot reload), clearing the cache.
    pub fn set_spec(&mut self, spec: LayoutSpec) -> TessellaResult<()> {
        spec.validate()?;
        self.spec = spec;
        self.cache.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/orchestrator.rs"]
mod tests;
