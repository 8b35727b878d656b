use egui::Pos2;

/// One command of a freehand path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new sub-path
    MoveTo(Pos2),
    /// Quadratic segment from the current end through `ctrl` to `to`
    QuadTo { ctrl: Pos2, to: Pos2 },
}

/// The smoothed path drawn by one contact.
///
/// A curve is mutated in place for its whole life: extended while the contact
/// moves, then emptied with [`Curve::reset`] once it has been flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    commands: Vec<PathCommand>,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, pos: Pos2) {
        self.commands.push(PathCommand::MoveTo(pos));
    }

    pub fn quad_to(&mut self, ctrl: Pos2, to: Pos2) {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every command, keeping the allocation for the next stroke
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Where the next segment would start
    pub fn current_end(&self) -> Option<Pos2> {
        self.commands.last().map(|command| match *command {
            PathCommand::MoveTo(pos) => pos,
            PathCommand::QuadTo { to, .. } => to,
        })
    }

    /// Build a rasterizable path.
    ///
    /// Returns `None` when there is nothing to stroke, which includes a curve
    /// holding only move-to commands.
    pub fn to_path(&self) -> Option<tiny_skia::Path> {
        let mut builder = tiny_skia::PathBuilder::with_capacity(self.commands.len(), self.commands.len() * 2);
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(pos) => builder.move_to(pos.x, pos.y),
                PathCommand::QuadTo { ctrl, to } => builder.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            }
        }
        builder.finish()
    }
}
