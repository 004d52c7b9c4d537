//! Backdrop session: one effect bound to a surface between attach and detach.

use backdrop_core::{Effect, EffectKind, InputEvent, Surface};

use crate::settings::{EffectSettings, create_effect};

/// What a call to [`Backdrop::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// No surface was available this frame.
    SkippedNoSurface,
    /// The surface has no area yet.
    SkippedZeroArea,
    /// The session is not attached.
    Detached,
}

/// Drives a single effect: routes input, resizes on demand and runs
/// step + render once per tick.
pub struct Backdrop {
    effect: Box<dyn Effect>,
    settings: EffectSettings,
    seed: u64,
    /// Last known surface width.
    width: f32,
    /// Last known surface height.
    height: f32,
    attached: bool,
}

impl Backdrop {
    pub fn new(kind: EffectKind, settings: EffectSettings, seed: u64) -> Self {
        Self {
            effect: create_effect(kind, &settings, seed),
            settings,
            seed,
            width: 0.0,
            height: 0.0,
            attached: false,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.effect.kind()
    }

    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Last known surface size.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Start ticking against a surface of the given size. A zero-area size
    /// defers initialization until a positive size arrives.
    pub fn attach(&mut self, width: f32, height: f32) {
        self.attached = true;
        self.width = width;
        self.height = height;
        self.effect.resize(width, height);
        tracing::info!(effect = %self.kind(), width, height, "backdrop attached");
    }

    /// Stop ticking and drop input routing.
    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            tracing::info!(effect = %self.kind(), "backdrop detached");
        }
    }

    /// Route one input event to the effect. Ignored while detached.
    pub fn dispatch(&mut self, event: &InputEvent) {
        if !self.attached {
            return;
        }
        if let InputEvent::Resize { width, height } = *event {
            self.width = width;
            self.height = height;
        }
        self.effect.handle_event(event);
    }

    /// Replace the running effect, re-initialized for the current size.
    pub fn switch(&mut self, kind: EffectKind) {
        let from = self.kind();
        self.effect = create_effect(kind, &self.settings, self.seed);
        if self.attached {
            self.effect.resize(self.width, self.height);
        }
        tracing::info!(%from, to = %kind, "switched effect");
    }

    /// Advance one frame: follow surface size changes, step, then paint.
    pub fn tick(&mut self, surface: Option<&mut dyn Surface>) -> TickOutcome {
        if !self.attached {
            return TickOutcome::Detached;
        }
        let Some(surface) = surface else {
            return TickOutcome::SkippedNoSurface;
        };
        let (width, height) = (surface.width(), surface.height());
        if width != self.width || height != self.height {
            tracing::debug!(width, height, "surface size changed");
            self.width = width;
            self.height = height;
            self.effect.resize(width, height);
        }
        if width * height <= 0.0 {
            return TickOutcome::SkippedZeroArea;
        }
        surface.clear();
        self.effect.step();
        self.effect.render(surface);
        TickOutcome::Rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{DrawList, Vec2};

    fn session(kind: EffectKind) -> Backdrop {
        Backdrop::new(kind, EffectSettings::default(), 7)
    }

    #[test]
    fn test_detached_session_does_nothing() {
        let mut backdrop = session(EffectKind::Particles);
        let mut list = DrawList::new(800.0, 600.0);
        assert_eq!(backdrop.tick(Some(&mut list)), TickOutcome::Detached);
        assert!(list.is_empty());
        backdrop.dispatch(&InputEvent::Resize {
            width: 800.0,
            height: 600.0,
        });
        assert_eq!(backdrop.effect().entity_count(), 0);
    }

    #[test]
    fn test_tick_outcomes() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mut backdrop = session(EffectKind::Particles);
        backdrop.attach(0.0, 0.0);
        assert_eq!(backdrop.tick(None), TickOutcome::SkippedNoSurface);

        let mut empty = DrawList::new(0.0, 600.0);
        assert_eq!(backdrop.tick(Some(&mut empty)), TickOutcome::SkippedZeroArea);
        assert_eq!(backdrop.effect().entity_count(), 0);

        let mut list = DrawList::new(800.0, 600.0);
        assert_eq!(backdrop.tick(Some(&mut list)), TickOutcome::Rendered);
        assert_eq!(backdrop.size(), (800.0, 600.0));
        assert_eq!(backdrop.effect().entity_count(), 60);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_tick_clears_previous_frame() {
        let mut backdrop = session(EffectKind::Nebula);
        backdrop.attach(400.0, 300.0);
        let mut list = DrawList::new(400.0, 300.0);
        backdrop.tick(Some(&mut list));
        let first = list.commands().len();
        backdrop.tick(Some(&mut list));
        assert_eq!(list.commands().len(), first);
    }

    #[test]
    fn test_detach_stops_routing() {
        let mut backdrop = session(EffectKind::Orbit);
        backdrop.attach(800.0, 600.0);
        backdrop.detach();
        assert!(!backdrop.is_attached());
        backdrop.dispatch(&InputEvent::Resize {
            width: 100.0,
            height: 100.0,
        });
        assert_eq!(backdrop.size(), (800.0, 600.0));
        let mut list = DrawList::new(800.0, 600.0);
        assert_eq!(backdrop.tick(Some(&mut list)), TickOutcome::Detached);
    }

    #[test]
    fn test_switch_reinitializes_at_current_size() {
        let mut backdrop = session(EffectKind::Particles);
        backdrop.attach(800.0, 600.0);
        backdrop.dispatch(&InputEvent::Click(Vec2::new(10.0, 10.0)));
        backdrop.switch(EffectKind::Orbit);
        assert_eq!(backdrop.kind(), EffectKind::Orbit);
        assert_eq!(backdrop.effect().entity_count(), 150);
        let mut list = DrawList::new(800.0, 600.0);
        assert_eq!(backdrop.tick(Some(&mut list)), TickOutcome::Rendered);
    }
}
