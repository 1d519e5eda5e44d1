//! Independently clamped pane widths

/// Resizable panes of the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Repository/workspace list on the left
    Sidebar,
    /// File explorer on the right
    Explorer,
}

/// A width and the range it is kept in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneWidth {
    pub width: i32,
    pub min: i32,
    pub max: i32,
}

impl PaneWidth {
    /// Bounds are normalized so `min <= max`, and the width is clamped into them
    pub fn new(width: i32, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            width: width.clamp(min, max),
            min,
            max,
        }
    }

    /// Apply a drag delta; the result never leaves `[min, max]`
    pub fn resize(&mut self, delta: i32) -> i32 {
        self.width = self.width.saturating_add(delta).clamp(self.min, self.max);
        self.width
    }
}

/// Widths of the sidebar and the file explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstraints {
    sidebar: PaneWidth,
    explorer: PaneWidth,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self::new(PaneWidth::new(288, 200, 500), PaneWidth::new(256, 200, 500))
    }
}

impl LayoutConstraints {
    pub fn new(sidebar: PaneWidth, explorer: PaneWidth) -> Self {
        Self {
            sidebar: PaneWidth::new(sidebar.width, sidebar.min, sidebar.max),
            explorer: PaneWidth::new(explorer.width, explorer.min, explorer.max),
        }
    }

    pub fn resize(&mut self, pane: Pane, delta: i32) -> i32 {
        self.pane_mut(pane).resize(delta)
    }

    pub fn width(&self, pane: Pane) -> i32 {
        self.pane(pane).width
    }

    pub fn pane(&self, pane: Pane) -> &PaneWidth {
        match pane {
            Pane::Sidebar => &self.sidebar,
            Pane::Explorer => &self.explorer,
        }
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut PaneWidth {
        match pane {
            Pane::Sidebar => &mut self.sidebar,
            Pane::Explorer => &mut self.explorer,
        }
    }
}
