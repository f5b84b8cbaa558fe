use serde::{Deserialize, Serialize};

/// Full game state as reported by the server after every request.
///
/// `grid` is addressed `grid[x][y]` by the server, while its outer length is
/// the number of display rows. The renderer relies on both conventions, so
/// lookups go through [`Snapshot::stack_at`] rather than indexing directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Vec<Vec<Vec<String>>>,
    pub position_x: i64,
    pub position_y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding: Option<String>,
    #[serde(default)]
    pub won: bool,
}

impl Snapshot {
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self, y: usize) -> usize {
        self.grid.get(y).map_or(0, Vec::len)
    }

    /// Stack stored at `grid[x][y]`. Missing indices (non-square grids) read as empty.
    pub fn stack_at(&self, x: usize, y: usize) -> &[String] {
        self.grid
            .get(x)
            .and_then(|column| column.get(y))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn agent_at(&self, x: usize, y: usize) -> bool {
        i64::try_from(x).is_ok_and(|x| x == self.position_x)
            && i64::try_from(y).is_ok_and(|y| y == self.position_y)
    }

    /// Held item, treating an empty identifier the same as nothing held.
    pub fn held(&self) -> Option<&str> {
        self.holding.as_deref().filter(|color| !color.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl Command {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        let direction = direction.into();
        self.direction = (!direction.is_empty()).then_some(direction);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod actions {
    pub const MOVE: &str = "move";
    pub const PICK_UP: &str = "pick_up";
    pub const DROP: &str = "drop";
}

pub mod directions {
    pub const UP: &str = "up";
    pub const DOWN: &str = "down";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";

    pub const ALL: [&str; 4] = [UP, DOWN, LEFT, RIGHT];
}

pub mod targets {
    pub const GRID: &str = "grid";
    pub const HOLDING: &str = "holding";
    pub const MESSAGE: &str = "message";
    pub const CONTROLS: &str = "controls";
    pub const EXPORT_BTN: &str = "export-btn";
}

pub mod paths {
    pub const STATE: &str = "state";
    pub const COMMAND: &str = "command";
    pub const EXPORT: &str = "export";
}
