use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One dashboard panel: shown or hidden, placed by `order`.
///
/// Within a layout the `order` values always form the dense sequence
/// `0..n`; every mutation reindexes after moving entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    pub title: String,
    pub visible: bool,
    pub order: usize,
}

/// A user's dashboard arrangement, persisted per (userId, userRole).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub widgets: Vec<WidgetConfig>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Drag gesture tracking. `drag_over` while dragging reorders the
/// layout and stays in `Dragging` until the gesture ends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source_id: String,
    },
}

const DEFAULT_WIDGETS: [(&str, &str); 6] = [
    ("stats", "Statistics Overview"),
    ("requests", "Pending Requests"),
    ("visits", "School Visits"),
    ("activities", "Recent Activities"),
    ("staff", "Staff Overview"),
    ("calendar", "Calendar"),
];

impl DashboardLayout {
    /// The fixed starter configuration: six widgets, all visible, in
    /// their canonical order.
    pub fn default_set(now: OffsetDateTime) -> Self {
        let widgets = DEFAULT_WIDGETS
            .iter()
            .enumerate()
            .map(|(order, (id, title))| WidgetConfig {
                id: (*id).to_string(),
                title: (*title).to_string(),
                visible: true,
                order,
            })
            .collect();
        Self {
            widgets,
            last_modified: now,
        }
    }

    /// Restore persisted order (storage is not trusted to keep the
    /// array sorted).
    pub fn sort_by_order(&mut self) {
        self.widgets.sort_by_key(|widget| widget.order);
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.widgets.iter().position(|widget| widget.id == id)
    }

    /// Widgets the dashboard should render, in display order.
    pub fn visible_widgets(&self) -> Vec<WidgetConfig> {
        let mut visible: Vec<WidgetConfig> = self
            .widgets
            .iter()
            .filter(|widget| widget.visible)
            .cloned()
            .collect();
        visible.sort_by_key(|widget| widget.order);
        visible
    }

    /// Flip visibility for `id`. Order values are untouched. Returns
    /// whether anything changed (unknown id is a no-op).
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.widgets.iter_mut().find(|widget| widget.id == id) {
            Some(widget) => {
                widget.visible = !widget.visible;
                true
            }
            None => false,
        }
    }

    /// Move `id` one slot up or down, clamped at the ends. Unknown id
    /// or a move past the boundary is a no-op.
    pub fn move_widget(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(position) = self.position_of(id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up => position.saturating_sub(1),
            MoveDirection::Down => (position + 1).min(self.widgets.len() - 1),
        };
        if target == position {
            return false;
        }
        let widget = self.widgets.remove(position);
        self.widgets.insert(target, widget);
        self.reindex();
        true
    }

    /// Move the widget at `from` to slot `to` (clamped). An
    /// out-of-range `from` is a no-op.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.widgets.len() {
            return false;
        }
        let to = to.min(self.widgets.len() - 1);
        if from == to {
            return false;
        }
        let widget = self.widgets.remove(from);
        self.widgets.insert(to, widget);
        self.reindex();
        true
    }

    fn reindex(&mut self) {
        for (position, widget) in self.widgets.iter_mut().enumerate() {
            widget.order = position;
        }
    }
}
