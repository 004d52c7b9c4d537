//! Translate crossterm mouse events into effect input.

use backdrop_core::{InputEvent, Key, Vec2};
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Stateful mapper: remembers the cell size and whether attract mode is
/// currently held by Shift or toggled on from the keyboard.
#[derive(Debug, Clone)]
pub struct InputMapper {
    cell_width: f32,
    cell_height: f32,
    shift: bool,
    attract_toggle: bool,
}

impl InputMapper {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
            shift: false,
            attract_toggle: false,
        }
    }

    /// Whether attract mode is currently on.
    pub fn is_attracting(&self) -> bool {
        self.shift || self.attract_toggle
    }

    /// Surface position of the centre of a cell.
    pub fn cell_center(&self, column: u16, row: u16) -> Vec2 {
        Vec2::new(
            (f32::from(column) + 0.5) * self.cell_width,
            (f32::from(row) + 0.5) * self.cell_height,
        )
    }

    /// Key event for a change in attract state, if any.
    fn attract_change(&self, was: bool) -> Option<InputEvent> {
        match (was, self.is_attracting()) {
            (false, true) => Some(InputEvent::KeyDown(Key::Shift)),
            (true, false) => Some(InputEvent::KeyUp(Key::Shift)),
            _ => None,
        }
    }

    /// Flip the keyboard attract toggle.
    pub fn toggle_attract(&mut self) -> Option<InputEvent> {
        let was = self.is_attracting();
        self.attract_toggle = !self.attract_toggle;
        self.attract_change(was)
    }

    pub fn map_mouse(&mut self, mouse: MouseEvent) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let was = self.is_attracting();
        self.shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
        events.extend(self.attract_change(was));

        let pos = self.cell_center(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => events.push(InputEvent::Move(pos)),
            MouseEventKind::Down(MouseButton::Left) => {
                events.push(InputEvent::Press(pos));
                events.push(InputEvent::Click(pos));
            }
            MouseEventKind::Up(MouseButton::Left) => events.push(InputEvent::Release),
            _ => {}
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column: 2,
            row: 1,
            modifiers,
        }
    }

    #[test]
    fn test_positions_are_cell_centres() {
        let mut mapper = InputMapper::new(8.0, 16.0);
        let events = mapper.map_mouse(mouse(MouseEventKind::Moved, KeyModifiers::NONE));
        assert_eq!(events, vec![InputEvent::Move(Vec2::new(20.0, 24.0))]);
    }

    #[test]
    fn test_left_button_maps_to_press_click_release() {
        let mut mapper = InputMapper::new(8.0, 16.0);
        let pos = Vec2::new(20.0, 24.0);
        assert_eq!(
            mapper.map_mouse(mouse(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE)),
            vec![InputEvent::Press(pos), InputEvent::Click(pos)]
        );
        assert_eq!(
            mapper.map_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), KeyModifiers::NONE)),
            vec![InputEvent::Move(pos)]
        );
        assert_eq!(
            mapper.map_mouse(mouse(MouseEventKind::Up(MouseButton::Left), KeyModifiers::NONE)),
            vec![InputEvent::Release]
        );
        assert!(
            mapper
                .map_mouse(mouse(MouseEventKind::ScrollUp, KeyModifiers::NONE))
                .is_empty()
        );
    }

    #[test]
    fn test_shift_on_mouse_events_toggles_attract() {
        let mut mapper = InputMapper::new(8.0, 16.0);
        let events = mapper.map_mouse(mouse(MouseEventKind::Moved, KeyModifiers::SHIFT));
        assert_eq!(events[0], InputEvent::KeyDown(Key::Shift));
        let events = mapper.map_mouse(mouse(MouseEventKind::Moved, KeyModifiers::SHIFT));
        assert_eq!(events.len(), 1);
        let events = mapper.map_mouse(mouse(MouseEventKind::Moved, KeyModifiers::NONE));
        assert_eq!(events[0], InputEvent::KeyUp(Key::Shift));
    }

    #[test]
    fn test_keyboard_toggle_holds_attract() {
        let mut mapper = InputMapper::new(8.0, 16.0);
        assert_eq!(mapper.toggle_attract(), Some(InputEvent::KeyDown(Key::Shift)));
        // releasing Shift does not end a toggled attract
        mapper.map_mouse(mouse(MouseEventKind::Moved, KeyModifiers::SHIFT));
        let events = mapper.map_mouse(mouse(MouseEventKind::Moved, KeyModifiers::NONE));
        assert_eq!(events.len(), 1);
        assert_eq!(mapper.toggle_attract(), Some(InputEvent::KeyUp(Key::Shift)));
    }
}
