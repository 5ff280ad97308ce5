//! Scripted demo input.
//!
//! A deterministic timed key sequence that stands in for live devices, so
//! the demo exercises every movement mechanic the same way on every run.
//! Each phase holds a set of keys for its duration; the input mapper turns
//! the holds into level and edge events exactly as it would for a keyboard.

use slipgate_sim::input::KeyCode;

/// One timed phase of the demo: a label and the keys held throughout.
#[derive(Debug, Clone, Copy)]
pub struct DemoPhase {
    /// Human-readable phase name for the log
    pub label: &'static str,
    /// Phase length in seconds
    pub duration: f32,
    /// Keys held for the whole phase
    pub keys: &'static [KeyCode],
}

/// Timed key sequence addressed by elapsed seconds.
#[derive(Debug, Clone)]
pub struct DemoScript {
    phases: Vec<DemoPhase>,
}

impl Default for DemoScript {
    fn default() -> Self {
        Self::standard()
    }
}

#[allow(dead_code)]
impl DemoScript {
    /// The standard six second tour: walk each direction, sprint, jump,
    /// hover and glide in fly mode, drop out, and coast to a stop.
    ///
    /// The fly toggle key appears in two non-adjacent phases; the release
    /// in between re-arms the edge so the second press toggles back off.
    #[must_use]
    pub fn standard() -> Self {
        use KeyCode::{LShift, Space, A, D, F, S, W};

        Self::from_phases(vec![
            DemoPhase {
                label: "walk forward",
                duration: 0.5,
                keys: &[W],
            },
            DemoPhase {
                label: "walk back",
                duration: 0.5,
                keys: &[S],
            },
            DemoPhase {
                label: "strafe left",
                duration: 0.5,
                keys: &[A],
            },
            DemoPhase {
                label: "strafe right",
                duration: 0.5,
                keys: &[D],
            },
            DemoPhase {
                label: "sprint forward",
                duration: 1.0,
                keys: &[W, LShift],
            },
            DemoPhase {
                label: "jump on the run",
                duration: 0.5,
                keys: &[W, Space],
            },
            DemoPhase {
                label: "hover in fly mode",
                duration: 0.5,
                keys: &[F],
            },
            DemoPhase {
                label: "glide forward",
                duration: 0.5,
                keys: &[W],
            },
            DemoPhase {
                label: "drop out of fly",
                duration: 0.5,
                keys: &[F],
            },
            DemoPhase {
                label: "coast to a stop",
                duration: 1.0,
                keys: &[],
            },
        ])
    }

    /// Build a script from explicit phases.
    #[must_use]
    pub fn from_phases(phases: Vec<DemoPhase>) -> Self {
        Self { phases }
    }

    /// Total script length in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.phases.iter().map(|phase| phase.duration).sum()
    }

    /// Whether the script has run out at elapsed time `t`.
    #[must_use]
    pub fn is_finished(&self, t: f32) -> bool {
        t >= self.duration()
    }

    /// The phase active at elapsed time `t`, if any.
    /// Phase spans are half-open: a phase owns `[start, start + duration)`.
    #[must_use]
    pub fn phase_at(&self, t: f32) -> Option<&DemoPhase> {
        if t < 0.0 {
            return None;
        }
        let mut start = 0.0;
        for phase in &self.phases {
            if t < start + phase.duration {
                return Some(phase);
            }
            start += phase.duration;
        }
        None
    }

    /// Keys held at elapsed time `t`. Empty once the script has run out.
    #[must_use]
    pub fn keys_at(&self, t: f32) -> &[KeyCode] {
        self.phase_at(t).map_or(&[], |phase| phase.keys)
    }

    /// Label of the active phase, for the log.
    #[must_use]
    pub fn label_at(&self, t: f32) -> Option<&'static str> {
        self.phase_at(t).map(|phase| phase.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_script_duration() {
        let script = DemoScript::standard();
        assert!((script.duration() - 6.0).abs() < 1e-6);
        assert!(!script.is_finished(5.9));
        assert!(script.is_finished(6.0));
    }

    #[test]
    fn test_phase_lookup() {
        let script = DemoScript::standard();

        assert!(script.keys_at(0.1).contains(&KeyCode::W));
        assert!(script.keys_at(2.5).contains(&KeyCode::LShift));
        assert!(script.keys_at(3.2).contains(&KeyCode::Space));
        assert!(script.keys_at(5.5).is_empty());
    }

    #[test]
    fn test_phase_boundaries_are_half_open() {
        let script = DemoScript::standard();

        // Exactly at 0.5 the second phase owns the instant
        assert_eq!(script.label_at(0.5), Some("walk back"));
        assert_eq!(script.label_at(0.0), Some("walk forward"));
    }

    #[test]
    fn test_fly_toggle_key_released_between_presses() {
        let script = DemoScript::standard();

        assert!(script.keys_at(3.7).contains(&KeyCode::F));
        assert!(!script.keys_at(4.2).contains(&KeyCode::F));
        assert!(script.keys_at(4.7).contains(&KeyCode::F));
    }

    #[test]
    fn test_past_end_is_idle() {
        let script = DemoScript::standard();

        assert!(script.keys_at(100.0).is_empty());
        assert_eq!(script.label_at(100.0), None);
        assert!(script.phase_at(-1.0).is_none());
    }

    #[test]
    fn test_custom_phases() {
        let script = DemoScript::from_phases(vec![DemoPhase {
            label: "only phase",
            duration: 2.0,
            keys: &[KeyCode::D],
        }]);

        assert_eq!(script.duration(), 2.0);
        assert_eq!(script.label_at(1.9), Some("only phase"));
        assert!(script.keys_at(2.0).is_empty());
    }
}
