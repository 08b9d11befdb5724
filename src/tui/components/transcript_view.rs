//! # TranscriptView Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display the entry list with cached per-entry heights
//! - Re-pin the viewport to the bottom on every append (manual scrolling
//!   unpins; scrolling back past the end re-pins)
//! - Track per-entry reveal timestamps for the fade-in ramp
//!
//! `TranscriptView` is a transient component (created each frame) wrapping
//! `&mut TranscriptViewState` (persistent state) and the transcript (props).
//! Entries are immutable once appended, so cached heights only ever need
//! recomputing when the width changes or the transcript is replaced.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// How long a freshly appended entry takes to reach full color.
pub const FADE_DURATION: Duration = Duration::from_millis(300);

/// Layout, scroll, and fade state for the transcript view.
/// Must be persisted in the parent TuiState.
pub struct TranscriptViewState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on render.
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames).
    pub viewport_height: u16,
    /// When each entry was first seen, indexed like the transcript.
    appeared_at: Vec<Instant>,
}

impl Default for TranscriptViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            appeared_at: Vec::new(),
        }
    }

    /// Record reveal timestamps for entries seen for the first time.
    /// Returns true when the transcript grew since the last call.
    pub(crate) fn sync_entries(&mut self, entry_count: usize) -> bool {
        if entry_count < self.appeared_at.len() {
            // Transcript was replaced (reset); survivors restart their fade.
            self.appeared_at.clear();
        }
        let grew = entry_count > self.appeared_at.len();
        self.appeared_at.resize(entry_count, Instant::now());
        grew
    }

    /// Reveal progress for an entry, `0.0..=1.0`.
    pub fn fade_progress(&self, index: usize) -> f32 {
        match self.appeared_at.get(index) {
            Some(at) => {
                (at.elapsed().as_secs_f32() / FADE_DURATION.as_secs_f32()).min(1.0)
            }
            None => 1.0,
        }
    }

    /// True while any entry is still mid-fade (drives the animation clock).
    pub fn has_active_fade(&self) -> bool {
        self.appeared_at
            .last()
            .is_some_and(|at| at.elapsed() < FADE_DURATION)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let total: u16 = self.layout.heights.iter().sum();
        let max_y = total.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if a scroll-down landed at (or past) the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total: u16 = self.layout.heights.iter().sum();
        let max_y = total.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for TranscriptViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Scrollable transcript component, created fresh each frame.
pub struct TranscriptView<'a> {
    pub state: &'a mut TranscriptViewState,
    pub transcript: &'a Transcript,
}

impl<'a> TranscriptView<'a> {
    pub fn new(state: &'a mut TranscriptViewState, transcript: &'a Transcript) -> Self {
        Self { state, transcript }
    }
}

impl<'a> Component for TranscriptView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column
        let entries = self.transcript.entries();

        // Every append re-pins the view to the bottom, even if the user had
        // scrolled away.
        if self.state.sync_entries(entries.len()) {
            self.state.stick_to_bottom = true;
        }

        // Refresh the height cache for anything not reusable.
        let reusable = self.state.layout.reusable_count(entries.len(), content_width);
        self.state.layout.heights.truncate(reusable);
        for entry in entries.iter().skip(reusable) {
            self.state
                .layout
                .heights
                .push(Message::calculate_height(entry, content_width));
        }
        self.state.layout.rebuild_prefix_heights();
        self.state.layout.update_metadata(entries.len(), content_width);

        let total_height: u16 = self.state.layout.heights.iter().sum();

        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = if visible.start > 0 {
            self.state.layout.prefix_heights[visible.start - 1]
        } else {
            0
        };

        for i in visible {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y, content_width, height);
            let fade = self.state.fade_progress(i);
            scroll_view.render_widget(Message::new(&entries[i], fade), rect);
            y += height;
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Cached per-entry heights. Entries never change after append, so a cached
/// height is valid until the width changes or the transcript shrinks (reset).
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
        }
    }

    pub fn reusable_count(&self, entry_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        if entry_count < self.entry_count {
            // Fewer entries than cached → transcript was replaced.
            return 0;
        }
        self.heights.len().min(entry_count)
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16) {
        self.entry_count = entry_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_reuses_on_append_and_invalidates_on_width_change() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3, 3];
        cache.update_metadata(3, 80);

        // Same shape → everything reusable
        assert_eq!(cache.reusable_count(3, 80), 3);
        // One appended → old three still valid
        assert_eq!(cache.reusable_count(4, 80), 3);
        // Width changed → recompute all
        assert_eq!(cache.reusable_count(3, 40), 0);
        // Transcript shrank (reset) → recompute all
        assert_eq!(cache.reusable_count(1, 80), 0);
    }

    #[test]
    fn prefix_heights_accumulate() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 5, 2];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 8, 10]);
    }

    #[test]
    fn visible_range_selects_overlapping_entries() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 10]; // 100 rows of content
        cache.rebuild_prefix_heights();

        // Viewport rows 40..60 (+30 row buffer in total) should not include
        // the very first or very last entries.
        let range = cache.visible_range(40, 20);
        assert!(range.start > 0);
        assert!(range.end <= 10);
        assert!(range.contains(&4));
        assert!(range.contains(&5));
    }

    #[test]
    fn sync_marks_growth_and_restarts_on_shrink() {
        let mut state = TranscriptViewState::new();
        assert!(!state.sync_entries(0));
        assert!(state.sync_entries(2));
        assert!(!state.sync_entries(2));
        // Reset: fewer entries than tracked, then growth again
        assert!(state.sync_entries(1));
    }

    #[test]
    fn fresh_entries_fade_in() {
        let mut state = TranscriptViewState::new();
        state.sync_entries(1);
        assert!(state.fade_progress(0) < 1.0);
        assert!(state.has_active_fade());
        // Untracked indices are treated as fully revealed
        assert_eq!(state.fade_progress(5), 1.0);
    }

    #[test]
    fn scroll_up_unpins() {
        let mut state = TranscriptViewState::new();
        assert!(state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn scroll_down_at_bottom_repins() {
        let mut state = TranscriptViewState::new();
        state.layout.heights = vec![2, 2];
        state.viewport_height = 10; // everything fits → always "at bottom"
        state.stick_to_bottom = false;
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }
}
