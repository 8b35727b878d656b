use egui::{Context, Event, PointerButton, Pos2, Rect};
use log::debug;

use super::{ContactId, TouchAction, TouchBatch, TouchSample};

/// Contact id used for the primary mouse button
pub const MOUSE_CONTACT: ContactId = u64::MAX;

/// Converts raw egui input into [`TouchBatch`]es in canvas coordinates.
///
/// Touch events take precedence: once a touch device has reported, the
/// pointer events egui synthesizes from touches are ignored.
#[derive(Debug)]
pub struct TouchInputHandler {
    canvas_rect: Rect,
    /// Active contacts in the order they went down
    active: Vec<TouchSample>,
    touch_seen: bool,
    last_mouse_pos: Option<Pos2>,
}

impl Default for TouchInputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchInputHandler {
    pub fn new() -> Self {
        Self {
            canvas_rect: Rect::EVERYTHING,
            active: Vec::new(),
            touch_seen: false,
            last_mouse_pos: None,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Collect this frame's events from the egui context
    pub fn process_input(&mut self, ctx: &Context) -> Vec<TouchBatch> {
        let events = ctx.input(|input| input.events.clone());
        self.process_events(&events)
    }

    pub fn process_events(&mut self, events: &[Event]) -> Vec<TouchBatch> {
        let mut batches = Vec::new();
        for event in events {
            let batch = match event {
                Event::Touch { id, phase, pos, .. } => {
                    self.touch_seen = true;
                    self.on_touch(id.0, *phase, *pos)
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } if !self.touch_seen => {
                    let phase = if *pressed {
                        egui::TouchPhase::Start
                    } else {
                        egui::TouchPhase::End
                    };
                    self.on_mouse(phase, *pos)
                }
                Event::PointerMoved(pos) if !self.touch_seen => self.on_mouse(egui::TouchPhase::Move, *pos),
                // Leaving the window ends the drag so the stroke is kept
                Event::PointerGone if !self.touch_seen => match self.last_mouse_pos {
                    Some(pos) => self.on_mouse(egui::TouchPhase::End, pos),
                    None => None,
                },
                _ => None,
            };
            batches.extend(batch);
        }
        batches
    }

    fn on_mouse(&mut self, phase: egui::TouchPhase, pos: Pos2) -> Option<TouchBatch> {
        self.last_mouse_pos = Some(pos);
        self.on_touch(MOUSE_CONTACT, phase, pos)
    }

    fn local(&self, pos: Pos2) -> Pos2 {
        pos - self.canvas_rect.min.to_vec2()
    }

    fn on_touch(&mut self, id: ContactId, phase: egui::TouchPhase, pos: Pos2) -> Option<TouchBatch> {
        let index = self.active.iter().position(|sample| sample.id == id);
        let local = if self.canvas_rect == Rect::EVERYTHING {
            pos
        } else {
            self.local(pos)
        };

        match (phase, index) {
            (egui::TouchPhase::Start, None) => {
                if !self.canvas_rect.contains(pos) {
                    return None;
                }
                self.active.push(TouchSample { id, pos: local });
                let action = if self.active.len() == 1 {
                    TouchAction::Down
                } else {
                    TouchAction::PointerDown
                };
                debug!("Contact {} down ({} active)", id, self.active.len());
                Some(TouchBatch::new(action, self.active.len() - 1, self.active.clone()))
            }
            (egui::TouchPhase::Move, Some(index)) => {
                self.active[index].pos = local;
                Some(TouchBatch::new(TouchAction::Move, index, self.active.clone()))
            }
            (egui::TouchPhase::End | egui::TouchPhase::Cancel, Some(index)) => {
                self.active[index].pos = local;
                let action = match phase {
                    egui::TouchPhase::Cancel => TouchAction::Cancel,
                    _ if self.active.len() == 1 => TouchAction::Up,
                    _ => TouchAction::PointerUp,
                };
                let batch = TouchBatch::new(action, index, self.active.clone());
                self.active.remove(index);
                debug!("Contact {} up ({} active)", id, self.active.len());
                Some(batch)
            }
            // Repeated start, or movement of a contact that began off-canvas
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{TouchDeviceId, TouchId, TouchPhase, pos2};

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: pos2(x, y),
            force: None,
        }
    }

    #[test]
    fn test_two_finger_sequence() {
        let mut handler = TouchInputHandler::new();
        let batches = handler.process_events(&[
            touch(1, TouchPhase::Start, 10.0, 10.0),
            touch(2, TouchPhase::Start, 50.0, 50.0),
            touch(2, TouchPhase::Move, 60.0, 50.0),
            touch(2, TouchPhase::End, 60.0, 50.0),
            touch(1, TouchPhase::End, 10.0, 10.0),
        ]);

        let actions: Vec<TouchAction> = batches.iter().map(|batch| batch.action).collect();
        assert_eq!(
            actions,
            vec![
                TouchAction::Down,
                TouchAction::PointerDown,
                TouchAction::Move,
                TouchAction::PointerUp,
                TouchAction::Up,
            ]
        );
        assert_eq!(batches[1].action_index, 1);
        assert_eq!(batches[2].samples.len(), 2);
        assert_eq!(batches[2].samples[1].pos, pos2(60.0, 50.0));
        assert_eq!(batches[4].samples.len(), 1);
        assert_eq!(handler.active.len(), 0);
    }

    #[test]
    fn test_positions_are_canvas_relative() {
        let mut handler = TouchInputHandler::new();
        handler.set_canvas_rect(Rect::from_min_size(pos2(100.0, 40.0), egui::vec2(200.0, 200.0)));
        let batches = handler.process_events(&[
            touch(1, TouchPhase::Start, 5.0, 5.0),
            touch(2, TouchPhase::Start, 110.0, 60.0),
        ]);

        // The first touch is outside the canvas and never becomes a contact
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].action, TouchAction::Down);
        assert_eq!(batches[0].samples[0].pos, pos2(10.0, 20.0));
    }

    #[test]
    fn test_mouse_drag_uses_mouse_contact() {
        let mut handler = TouchInputHandler::new();
        let batches = handler.process_events(&[
            Event::PointerMoved(pos2(1.0, 1.0)),
            Event::PointerButton {
                pos: pos2(1.0, 1.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::default(),
            },
            Event::PointerMoved(pos2(30.0, 1.0)),
            Event::PointerButton {
                pos: pos2(30.0, 1.0),
                button: PointerButton::Primary,
                pressed: false,
                modifiers: egui::Modifiers::default(),
            },
        ]);

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|batch| batch.samples[0].id == MOUSE_CONTACT));
        assert_eq!(batches[2].action, TouchAction::Up);
    }

    #[test]
    fn test_pointer_gone_ends_mouse_drag() {
        let mut handler = TouchInputHandler::new();
        let batches = handler.process_events(&[
            Event::PointerButton {
                pos: pos2(5.0, 5.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::default(),
            },
            Event::PointerMoved(pos2(40.0, 5.0)),
            Event::PointerGone,
        ]);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].action, TouchAction::Up);
        assert_eq!(batches[2].samples[0].pos, pos2(40.0, 5.0));
        assert!(handler.active.is_empty());
    }

    #[test]
    fn test_synthesized_pointer_events_ignored_after_touch() {
        let mut handler = TouchInputHandler::new();
        let batches = handler.process_events(&[
            touch(4, TouchPhase::Start, 10.0, 10.0),
            Event::PointerButton {
                pos: pos2(10.0, 10.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::default(),
            },
        ]);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].samples[0].id, 4);
    }
}
