use std::collections::HashMap;

use egui::Pos2;
use log::debug;

use crate::curve::Curve;
use crate::input::{ContactId, TouchSample};
use crate::raster::RasterSurface;
use crate::style::StrokeStyle;

/// Minimum movement along either axis before a curve is extended
pub const TOUCH_TOLERANCE: f32 = 10.0;

#[derive(Debug, Clone, Default)]
struct Contact {
    curve: Curve,
    /// Last committed point, the control anchor of the next segment
    last: Pos2,
}

/// Per-contact stroke state.
///
/// Entries are created on the first start of an id and kept after the contact
/// ends: only the curve is emptied, so a later contact reusing the id picks up
/// the same entry. Memory therefore grows with the number of distinct ids seen
/// since the last [`ContactTracker::clear`].
#[derive(Debug)]
pub struct ContactTracker {
    contacts: HashMap<ContactId, Contact>,
    tolerance: f32,
}

impl Default for ContactTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::with_tolerance(TOUCH_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            contacts: HashMap::new(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Begin (or restart) the curve of `id` at `pos`
    pub fn touch_start(&mut self, id: ContactId, pos: Pos2) {
        let contact = self.contacts.entry(id).or_default();
        if !contact.curve.is_empty() {
            debug!("Contact {} restarted with {} pending commands", id, contact.curve.len());
        }
        contact.curve.move_to(pos);
        contact.last = pos;
        debug!("Contact {} started at ({}, {})", id, pos.x, pos.y);
    }

    /// Extend the curve of `id` towards `pos`.
    ///
    /// The new segment uses the last committed point as control and ends
    /// halfway to `pos`. Movement below the tolerance on both axes is
    /// dropped. Returns whether the curve grew.
    pub fn touch_move(&mut self, id: ContactId, pos: Pos2) -> bool {
        let Some(contact) = self.contacts.get_mut(&id) else {
            return false;
        };
        let dx = (pos.x - contact.last.x).abs();
        let dy = (pos.y - contact.last.y).abs();
        if dx < self.tolerance && dy < self.tolerance {
            return false;
        }

        let last = contact.last;
        contact
            .curve
            .quad_to(last, Pos2::new((pos.x + last.x) / 2.0, (pos.y + last.y) / 2.0));
        contact.last = pos;
        true
    }

    /// Apply a move to every contact in the batch, returning how many curves grew
    pub fn touch_move_all(&mut self, samples: &[TouchSample]) -> usize {
        samples
            .iter()
            .filter(|sample| self.touch_move(sample.id, sample.pos))
            .count()
    }

    /// Flatten the curve of `id` into `raster` and empty it.
    ///
    /// The entry and its last point stay in place. Returns whether `id` was
    /// tracked.
    pub fn touch_end(&mut self, id: ContactId, raster: &mut RasterSurface, style: &StrokeStyle) -> bool {
        let Some(contact) = self.contacts.get_mut(&id) else {
            debug!("Ignoring end of untracked contact {}", id);
            return false;
        };
        raster.flatten(&contact.curve, style);
        contact.curve.reset();
        debug!("Contact {} ended", id);
        true
    }

    /// Forget every contact and wipe the raster back to its background
    pub fn clear(&mut self, raster: &mut RasterSurface) {
        self.contacts.clear();
        raster.clear();
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.contacts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn curve(&self, id: ContactId) -> Option<&Curve> {
        self.contacts.get(&id).map(|contact| &contact.curve)
    }

    pub fn last_point(&self, id: ContactId) -> Option<Pos2> {
        self.contacts.get(&id).map(|contact| contact.last)
    }

    /// All tracked curves, in no particular order
    pub fn curves(&self) -> impl Iterator<Item = (ContactId, &Curve)> + '_ {
        self.contacts.iter().map(|(id, contact)| (*id, &contact.curve))
    }
}
