#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownKind {
    MapChange,
    Respawn,
}

/// A single on-screen countdown; starting a new one replaces whatever was
/// running.
#[derive(Debug, Default)]
pub struct Countdown {
    kind: Option<CountdownKind>,
    remaining: f64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, kind: CountdownKind, secs: f64) {
        self.kind = Some(kind);
        self.remaining = secs;
    }

    pub fn active(&self) -> bool {
        self.kind.is_some()
    }

    pub fn kind(&self) -> Option<CountdownKind> {
        self.kind
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Returns the kind when the countdown expires on this tick.
    pub fn update(&mut self, dt: f64) -> Option<CountdownKind> {
        let kind = self.kind?;
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.kind = None;
            self.remaining = 0.0;
            return Some(kind);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once() {
        let mut countdown = Countdown::new();
        countdown.start(CountdownKind::Respawn, 1.0);

        assert_eq!(countdown.update(0.5), None);
        assert_eq!(countdown.update(0.6), Some(CountdownKind::Respawn));
        assert_eq!(countdown.update(0.5), None);
        assert!(!countdown.active());
    }
}
