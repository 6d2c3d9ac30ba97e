//! RecyclerList - a virtualized list driving a [`DispatchAdapter`].
//!
//! Only items intersecting the viewport hold a surface. Each layout pass
//! returns every attached surface to a per-view-type pool and then attaches
//! surfaces for the visible positions, taking from the pool when a surface of
//! the right view type is available and asking the adapter to create one
//! otherwise. The number of surfaces ever created for a view type therefore
//! equals the peak number of items of that type visible at once.
//!
//! Heights are unknown until an item has been bound and measured. Unmeasured
//! items count as one row, which can only underestimate, so the item found
//! for the scroll offset still covers it after measurement.

use super::height_index::HeightIndex;
use crate::adapter::{BindOutcome, DispatchAdapter, TaggedSurface};
use crate::error::DispatchError;
use crate::registry::ViewType;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Height assumed for items not yet measured.
const ESTIMATED_HEIGHT: usize = 1;

/// Surfaces that can report how many rows they occupy once bound.
pub trait Measure {
    /// Rows occupied. Values below 1 are treated as 1.
    fn height(&self) -> usize;
}

/// A surface attached to a visible position.
#[derive(Debug)]
pub struct Attached<S> {
    position: usize,
    row: usize,
    skip: usize,
    surface: TaggedSurface<S>,
}

impl<S> Attached<S> {
    /// Item position this surface shows.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Viewport row where the visible part of the surface starts.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Rows of the surface scrolled off above the viewport.
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// The bound surface.
    pub fn surface(&self) -> &TaggedSurface<S> {
        &self.surface
    }
}

/// Surface lifecycle counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecyclerStats {
    /// Surfaces created through the adapter.
    pub created: usize,
    /// Pooled surfaces reused for a position.
    pub reused: usize,
    /// Successful binds.
    pub binds: usize,
    /// Binds that had to replace a mismatched surface.
    pub recreated: usize,
    created_by_type: HashMap<ViewType, usize>,
    peak_visible_by_type: HashMap<ViewType, usize>,
}

impl RecyclerStats {
    /// Surfaces created for `view_type`.
    pub fn created_for(&self, view_type: ViewType) -> usize {
        self.created_by_type.get(&view_type).copied().unwrap_or(0)
    }

    /// Largest number of `view_type` items visible in a single layout pass.
    pub fn peak_visible_for(&self, view_type: ViewType) -> usize {
        self.peak_visible_by_type
            .get(&view_type)
            .copied()
            .unwrap_or(0)
    }
}

/// Virtualized list with a per-view-type surface pool.
#[derive(Debug)]
pub struct RecyclerList<S> {
    pool: HashMap<ViewType, Vec<TaggedSurface<S>>>,
    attached: Vec<Attached<S>>,
    heights: HeightIndex,
    /// Adapter generation the height index was built for.
    generation: Option<u64>,
    scroll: usize,
    viewport_height: usize,
    pinned_to_bottom: bool,
    /// Measure the last page before the next layout pass.
    tail_pending: bool,
    stats: RecyclerStats,
}

impl<S: Measure> RecyclerList<S> {
    /// Create an empty list with the given viewport height in rows.
    pub fn new(viewport_height: usize) -> Self {
        Self {
            pool: HashMap::new(),
            attached: Vec::new(),
            heights: HeightIndex::new(),
            generation: None,
            scroll: 0,
            viewport_height,
            pinned_to_bottom: false,
            tail_pending: false,
            stats: RecyclerStats::default(),
        }
    }

    /// Lay out the viewport against `adapter`.
    ///
    /// Detects item replacement through the adapter's generation and rebuilds
    /// the height index when it changes.
    ///
    /// # Errors
    ///
    /// Propagates any [`DispatchError`] from creating or binding surfaces.
    pub fn layout(&mut self, adapter: &DispatchAdapter<S>) -> Result<(), DispatchError> {
        if self.generation != Some(adapter.generation())
            || self.heights.len() != adapter.item_count()
        {
            self.heights = HeightIndex::with_len(adapter.item_count(), ESTIMATED_HEIGHT);
            self.generation = Some(adapter.generation());
            self.tail_pending |= self.pinned_to_bottom;
            debug!(items = adapter.item_count(), "Height index rebuilt");
        }

        if self.tail_pending {
            self.measure_tail(adapter)?;
            self.tail_pending = false;
        }

        self.layout_pass(adapter)?;
        // Each extra pass measures at least one more item.
        let mut passes = 1;
        while self.pinned_to_bottom
            && self.scroll < self.max_scroll()
            && passes <= adapter.item_count()
        {
            self.layout_pass(adapter)?;
            passes += 1;
        }
        Ok(())
    }

    /// Bind and measure items from the last one upwards until they fill the
    /// viewport, so the bottom page is laid out with real heights.
    ///
    /// The measured items are exactly the ones the following pass shows, so
    /// this never creates more surfaces than that pass needs.
    fn measure_tail(&mut self, adapter: &DispatchAdapter<S>) -> Result<(), DispatchError> {
        self.recycle_attached();

        let mut measured = Vec::new();
        let mut filled = 0;
        let mut position = adapter.item_count();
        while position > 0 && filled < self.viewport_height {
            position -= 1;
            let view_type = adapter.type_id_at(position)?;
            let mut surface = self.obtain(adapter, view_type)?;
            self.bind(adapter, &mut surface, position)?;

            let height = surface.get().height().max(1);
            self.heights.set(position, height);
            filled += height;
            measured.push(surface);
        }

        trace!(from = position, filled, "Measured bottom page");
        for surface in measured {
            self.pool.entry(surface.view_type()).or_default().push(surface);
        }
        Ok(())
    }

    fn layout_pass(&mut self, adapter: &DispatchAdapter<S>) -> Result<(), DispatchError> {
        self.recycle_attached();
        self.scroll = if self.pinned_to_bottom {
            self.max_scroll()
        } else {
            self.scroll.min(self.max_scroll())
        };

        if self.viewport_height == 0 {
            return Ok(());
        }
        let Some(first) = self.heights.lower_bound(self.scroll) else {
            return Ok(());
        };

        let bottom = self.scroll + self.viewport_height;
        let mut top = self.heights.offset_of(first);
        let mut visible_by_type: HashMap<ViewType, usize> = HashMap::new();
        let mut position = first;

        while position < adapter.item_count() && top < bottom {
            let view_type = adapter.type_id_at(position)?;
            let mut surface = self.obtain(adapter, view_type)?;

            self.bind(adapter, &mut surface, position)?;

            let height = surface.get().height().max(1);
            self.heights.set(position, height);
            *visible_by_type.entry(surface.view_type()).or_default() += 1;

            let skip = self.scroll.saturating_sub(top);
            self.attached.push(Attached {
                position,
                row: top + skip - self.scroll,
                skip,
                surface,
            });

            top += height;
            position += 1;
        }

        for (view_type, count) in visible_by_type {
            let peak = self.stats.peak_visible_by_type.entry(view_type).or_default();
            *peak = (*peak).max(count);
        }
        trace!(
            scroll = self.scroll,
            attached = self.attached.len(),
            "Layout pass complete"
        );
        Ok(())
    }

    /// Take a pooled surface for `view_type`, or create one.
    fn obtain(
        &mut self,
        adapter: &DispatchAdapter<S>,
        view_type: ViewType,
    ) -> Result<TaggedSurface<S>, DispatchError> {
        if let Some(surface) = self.pool.get_mut(&view_type).and_then(Vec::pop) {
            self.stats.reused += 1;
            return Ok(surface);
        }
        let surface = adapter.create_surface(view_type)?;
        self.stats.created += 1;
        *self.stats.created_by_type.entry(view_type).or_default() += 1;
        Ok(surface)
    }

    fn bind(
        &mut self,
        adapter: &DispatchAdapter<S>,
        surface: &mut TaggedSurface<S>,
        position: usize,
    ) -> Result<(), DispatchError> {
        if let BindOutcome::Recreated { .. } = adapter.bind_surface(surface, position)? {
            self.stats.recreated += 1;
        }
        self.stats.binds += 1;
        Ok(())
    }

    /// Return every attached surface to the pool under its own tag.
    fn recycle_attached(&mut self) {
        for attached in self.attached.drain(..) {
            self.pool
                .entry(attached.surface.view_type())
                .or_default()
                .push(attached.surface);
        }
    }

    /// Forget measured heights so the next layout rebuilds them.
    ///
    /// Generation changes are picked up automatically; call this when items
    /// kept their positions but their content changed height.
    pub fn notify_items_changed(&mut self) {
        self.generation = None;
    }

    /// Largest valid scroll offset for the current height estimates.
    pub fn max_scroll(&self) -> usize {
        self.heights.total().saturating_sub(self.viewport_height)
    }

    /// Scroll by `delta` rows (negative scrolls up). Clamped on next layout.
    pub fn scroll_by(&mut self, delta: isize) {
        self.pinned_to_bottom = false;
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
    }

    /// Scroll to the first row.
    pub fn scroll_to_top(&mut self) {
        self.pinned_to_bottom = false;
        self.scroll = 0;
    }

    /// Scroll to the last page, following measurement on the next layout.
    pub fn scroll_to_bottom(&mut self) {
        self.pinned_to_bottom = true;
        self.tail_pending = true;
        self.scroll = self.max_scroll();
    }

    /// Current scroll offset in rows.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Change the viewport height in rows.
    pub fn set_viewport_height(&mut self, height: usize) {
        if height != self.viewport_height {
            self.tail_pending |= self.pinned_to_bottom;
        }
        self.viewport_height = height;
    }

    /// Viewport height in rows.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Surfaces attached by the last layout, top to bottom.
    pub fn attached(&self) -> &[Attached<S>] {
        &self.attached
    }

    /// Position of the first attached item, if any.
    pub fn first_visible(&self) -> Option<usize> {
        self.attached.first().map(Attached::position)
    }

    /// Surfaces waiting in the pool for `view_type`.
    pub fn pooled(&self, view_type: ViewType) -> usize {
        self.pool.get(&view_type).map_or(0, Vec::len)
    }

    /// Total rows under current height estimates.
    pub fn total_height(&self) -> usize {
        self.heights.total()
    }

    /// Lifecycle counters.
    pub fn stats(&self) -> &RecyclerStats {
        &self.stats
    }
}
