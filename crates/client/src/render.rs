use crate::notifier::Notifier;
use crate::view::{Document, Element};
use gridbot_protocol::{targets, Snapshot};

pub const EMPTY_LABEL: &str = "Empty";

/// Redraws the page from `snapshot`. Nothing from the previous view survives
/// except the message region, which only changes when the snapshot is a win.
pub fn render(doc: &mut Document, notifier: &mut Notifier, snapshot: &Snapshot) {
    if let Some(grid) = doc.get_mut(targets::GRID) {
        draw_grid(grid, snapshot);
    }
    if let Some(holding) = doc.get_mut(targets::HOLDING) {
        draw_holding(holding, snapshot.held());
    }
    if snapshot.won {
        notifier.show_success(doc);
    }
}

fn draw_grid(grid: &mut Element, snapshot: &Snapshot) {
    grid.clear();
    for y in 0..snapshot.rows() {
        for x in 0..snapshot.cols(y) {
            let mut cell = Element::div()
                .with_class_name("cell")
                .with_data("x", &x.to_string())
                .with_data("y", &y.to_string());

            // Stacks are stored column-first while the loops run row-major.
            for color in snapshot.stack_at(x, y) {
                cell.append(marker(color));
            }

            if snapshot.agent_at(x, y) {
                cell.append(Element::div().with_class_name("robot"));
            }

            grid.append(cell);
        }
    }
}

fn draw_holding(holding: &mut Element, held: Option<&str>) {
    holding.clear();
    match held {
        Some(color) => {
            holding.remove_class("empty");
            holding.append(marker(color));
        }
        None => {
            holding.add_class("empty");
            holding.set_text(EMPTY_LABEL);
        }
    }
}

fn marker(color: &str) -> Element {
    let mut el = Element::div().with_class_name("circle");
    el.add_class(color);
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::SUCCESS_MESSAGE;

    fn snapshot(grid: Vec<Vec<Vec<&str>>>, x: i64, y: i64) -> Snapshot {
        Snapshot {
            grid: grid
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|stack| stack.into_iter().map(str::to_string).collect())
                        .collect()
                })
                .collect(),
            position_x: x,
            position_y: y,
            holding: None,
            won: false,
        }
    }

    fn colors(cell: &Element) -> Vec<String> {
        cell.children
            .iter()
            .filter(|c| c.has_class("circle"))
            .map(|c| c.classes[1].clone())
            .collect()
    }

    fn has_agent(cell: &Element) -> bool {
        cell.children.iter().any(|c| c.has_class("robot"))
    }

    fn square() -> Snapshot {
        snapshot(
            vec![
                vec![vec!["red"], vec!["green"], vec!["green"]],
                vec![vec!["blue"], vec!["red"], vec!["blue"]],
                vec![vec!["green"], vec!["blue"], vec!["red", "green"]],
            ],
            0,
            0,
        )
    }

    #[test]
    fn render_is_idempotent() {
        let mut doc = Document::new();
        let mut notifier = Notifier::default();
        let mut state = square();
        state.holding = Some("blue".into());

        render(&mut doc, &mut notifier, &state);
        let first = doc.to_json();
        render(&mut doc, &mut notifier, &state);
        assert_eq!(first, doc.to_json());
    }

    #[test]
    fn one_cell_per_coordinate_in_row_major_order() {
        let mut doc = Document::new();
        render(&mut doc, &mut Notifier::default(), &square());
        let cells = &doc.get(targets::GRID).unwrap().children;
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[1].data("x"), Some("1"));
        assert_eq!(cells[1].data("y"), Some("0"));
        assert_eq!(cells[3].data("x"), Some("0"));
        assert_eq!(cells[3].data("y"), Some("1"));
    }

    #[test]
    fn stacks_are_read_transposed() {
        // Three rows of four columns; only grid[2][0] holds anything.
        let mut grid = vec![vec![vec![]; 4]; 3];
        grid[2][0] = vec!["red"];
        let mut doc = Document::new();
        render(&mut doc, &mut Notifier::default(), &snapshot(grid, 9, 9));

        assert_eq!(colors(doc.cell_at(2, 0).unwrap()), ["red"]);
        assert!(colors(doc.cell_at(0, 2).unwrap()).is_empty());
        // x = 3 has no grid[3]; the cell exists and is empty.
        assert!(colors(doc.cell_at(3, 0).unwrap()).is_empty());
        assert_eq!(doc.get(targets::GRID).unwrap().children.len(), 12);
    }

    #[test]
    fn stack_order_is_preserved() {
        let mut doc = Document::new();
        render(&mut doc, &mut Notifier::default(), &square());
        assert_eq!(colors(doc.cell_at(2, 2).unwrap()), ["red", "green"]);
    }

    #[test]
    fn agent_placement_is_not_transposed() {
        let grid = vec![vec![vec![]; 2]; 4];
        let mut doc = Document::new();
        render(&mut doc, &mut Notifier::default(), &snapshot(grid, 1, 3));

        assert!(has_agent(doc.cell_at(1, 3).unwrap()));
        let agents = doc
            .get(targets::GRID)
            .unwrap()
            .children
            .iter()
            .filter(|c| has_agent(c))
            .count();
        assert_eq!(agents, 1);
    }

    #[test]
    fn agent_comes_after_the_stack() {
        let mut doc = Document::new();
        render(&mut doc, &mut Notifier::default(), &square());
        let cell = doc.cell_at(0, 0).unwrap();
        assert!(cell.children[0].has_class("red"));
        assert!(cell.children[1].has_class("robot"));
    }

    #[test]
    fn empty_grid_renders_nothing() {
        let mut doc = Document::new();
        let mut notifier = Notifier::default();
        render(&mut doc, &mut notifier, &square());
        render(&mut doc, &mut notifier, &snapshot(vec![], 0, 0));
        assert!(doc.get(targets::GRID).unwrap().children.is_empty());

        render(&mut doc, &mut notifier, &snapshot(vec![vec![], vec![]], 0, 0));
        assert!(doc.get(targets::GRID).unwrap().children.is_empty());
    }

    #[test]
    fn holding_toggles_between_label_and_marker() {
        let mut doc = Document::new();
        let mut notifier = Notifier::default();
        let mut state = square();

        render(&mut doc, &mut notifier, &state);
        let holding = doc.get(targets::HOLDING).unwrap();
        assert!(holding.has_class("empty"));
        assert_eq!(holding.text, EMPTY_LABEL);
        assert!(holding.children.is_empty());

        state.holding = Some("blue".into());
        render(&mut doc, &mut notifier, &state);
        let holding = doc.get(targets::HOLDING).unwrap();
        assert!(!holding.has_class("empty"));
        assert!(holding.text.is_empty());
        assert_eq!(holding.children.len(), 1);
        assert_eq!(holding.children[0].class_name(), "circle blue");
    }

    #[test]
    fn win_message_survives_a_later_non_winning_render() {
        let mut doc = Document::new();
        let mut notifier = Notifier::default();
        let mut state = square();

        state.won = true;
        render(&mut doc, &mut notifier, &state);
        state.won = false;
        render(&mut doc, &mut notifier, &state);

        let message = doc.get(targets::MESSAGE).unwrap();
        assert_eq!(message.text, SUCCESS_MESSAGE);
        assert_eq!(message.class_name(), "message show success");
    }

    #[test]
    fn non_winning_render_leaves_message_alone() {
        let mut doc = Document::new();
        let mut notifier = Notifier::default();
        render(&mut doc, &mut notifier, &square());
        assert_eq!(doc.get(targets::MESSAGE).unwrap().class_name(), "message");
    }

    #[tokio::test(start_paused = true)]
    async fn repaint_keeps_a_shown_error_and_its_clear() {
        let mut doc = Document::new();
        let mut notifier = Notifier::default();
        notifier.show_error(&mut doc, "Command failed: blocked");
        let deadline = notifier.deadline();

        render(&mut doc, &mut notifier, &square());

        let message = doc.get(targets::MESSAGE).unwrap();
        assert_eq!(message.text, "Command failed: blocked");
        assert_eq!(message.class_name(), "message show");
        assert!(deadline.is_some());
        assert_eq!(notifier.deadline(), deadline);
    }
}
