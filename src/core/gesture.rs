// Gesture state machine: turns per-sample geometry into debounced events
//
// Three timing sub-machines (drag-pinch, tap-pinch, V-sign hold-latch)
// share one sample's geometry but gate each other: drag and V-sign
// suppress tap recognition, drag and the drag pinch suppress the V-sign
// latch. At most one discrete event leaves per sample; the heartbeat only
// fires when nothing else was sent within the heartbeat interval.

use crate::core::config::TrackerConfig;
use crate::core::geometry::dist;
use crate::core::pointer::PointerFilter;
use crate::core::shape::{self, PalmStabilizer};
use crate::models::event::{GestureKind, OutputEvent, PointerState};
use crate::models::sample::{HandLandmark, PointerSource, Sample};

/// Result of feeding one sample into the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    /// Always-current pointer report for the display overlay
    pub pointer: PointerState,
    /// Zero-or-one event for the transport boundary
    pub event: Option<OutputEvent>,
}

/// The composite tracker. Owns all filter memory, timers, and latches;
/// visited by exactly one logical thread. All timing is keyed off the
/// sample's monotonic timestamp, never wall clock.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: TrackerConfig,
    source: PointerSource,
    filter: PointerFilter,
    stabilizer: PalmStabilizer,

    // Authoritative (move-gated) pointer position
    send_x: f32,
    send_y: f32,
    last_send_ms: i64,

    // Drag-pinch machine (thumb-index)
    dragging: bool,
    pinch_down: bool,
    pinch_start_ms: i64,
    drag_hold_sent: bool,

    // Tap-pinch machine (thumb-middle)
    mid_down: bool,
    mid_start_ms: i64,

    // Hold-latch machine (V-sign)
    v_start_ms: Option<i64>,
    v_latched: bool,

    // Per-action-class debounce
    last_left_ms: i64,
    last_right_ms: i64,
}

impl GestureTracker {
    pub fn new(config: TrackerConfig, source: PointerSource) -> Self {
        let filter = PointerFilter::new(&config);
        let stabilizer = PalmStabilizer::new(config.open_stable_frames);
        Self {
            config,
            source,
            filter,
            stabilizer,
            send_x: 0.5,
            send_y: 0.5,
            last_send_ms: 0,
            dragging: false,
            pinch_down: false,
            pinch_start_ms: 0,
            drag_hold_sent: false,
            mid_down: false,
            mid_start_ms: 0,
            v_start_ms: None,
            v_latched: false,
            last_left_ms: 0,
            last_right_ms: 0,
        }
    }

    /// Whether a drag is currently latched
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed one sample. Samples must arrive in timestamp order; the EMA
    /// filter and every timer assume it.
    pub fn step(&mut self, sample: &Sample) -> StepOutput {
        let now = sample.timestamp_ms;

        // Hand not detected: hold position, report tracking lost, touch
        // no timers. The next detection resumes where we left off.
        let hand = match sample.hand() {
            Some(hand) => hand,
            None => {
                return StepOutput {
                    pointer: PointerState {
                        x: self.send_x,
                        y: self.send_y,
                        tracking: false,
                    },
                    event: None,
                }
            }
        };

        let (raw_x, raw_y) = self.source.pick(hand);
        let (mapped_x, mapped_y) = self.filter.apply(raw_x, raw_y);

        let flags = shape::classify(hand);
        let open_stable = self.stabilizer.update(flags.open_palm());
        let v_sign = flags.v_sign();

        let thumb = hand[HandLandmark::ThumbTip.index()];
        let drag_dist = dist(thumb, hand[HandLandmark::IndexFingerTip.index()]);
        let tap_dist = dist(thumb, hand[HandLandmark::MiddleFingerTip.index()]);

        // Hysteresis: a pinch enters below the on-threshold and exits only
        // above the off-threshold, so chatter around one boundary cannot
        // toggle it.
        let pinch_now = if self.pinch_down {
            drag_dist < self.config.drag_pinch_off
        } else {
            drag_dist < self.config.drag_pinch_on
        };
        let mid_now = if self.mid_down {
            tap_dist < self.config.tap_pinch_off
        } else {
            tap_dist < self.config.tap_pinch_on
        };

        // Discrete events carry the position as it stood when the gesture
        // resolved, before this sample's move-gate update.
        let event_x = self.send_x;
        let event_y = self.send_y;
        let mut kind: Option<GestureKind> = None;

        // Tap (left action): suppressed while a drag is latched or the
        // drag pinch is closed, and whenever the hand shapes a V-sign.
        let allow_left = !self.dragging && !pinch_now && !v_sign;
        if allow_left {
            if mid_now && !self.mid_down {
                self.mid_down = true;
                self.mid_start_ms = now;
            } else if !mid_now && self.mid_down {
                let held = now - self.mid_start_ms;
                self.mid_down = false;
                if held <= self.config.tap_max_ms
                    && now - self.last_left_ms >= self.config.left_cooldown_ms
                {
                    kind = Some(GestureKind::PinchTap);
                    self.last_left_ms = now;
                }
                // Slower releases are failed taps; intentionally silent.
            }
        } else {
            self.mid_down = false;
        }

        // Hold-latch (right action): fires once per continuous V-sign hold
        // and re-arms only after the hand leaves the shape.
        if !self.dragging && !pinch_now && v_sign {
            let start = *self.v_start_ms.get_or_insert(now);
            let held = now - start >= self.config.v_sign_hold_ms;
            if held
                && !self.v_latched
                && now - self.last_right_ms >= self.config.right_cooldown_ms
            {
                self.v_latched = true;
                kind = Some(GestureKind::RightClick);
                self.last_right_ms = now;
            }
        } else {
            self.v_start_ms = None;
            self.v_latched = false;
        }

        // Drag machine
        if pinch_now && !self.pinch_down {
            self.pinch_down = true;
            self.pinch_start_ms = now;
            self.drag_hold_sent = false;
        } else if pinch_now && self.pinch_down {
            let held = now - self.pinch_start_ms >= self.config.drag_hold_ms;
            if held && !self.drag_hold_sent {
                self.drag_hold_sent = true;
                self.dragging = true;
                kind = Some(GestureKind::PinchHold);
            }
        } else if !pinch_now && self.pinch_down {
            self.pinch_down = false;
            if self.dragging {
                self.dragging = false;
                kind = Some(GestureKind::PinchRelease);
            }
            // A release before the hold threshold is an aborted drag;
            // no event.
            self.drag_hold_sent = false;
        }

        // Move gate: coarse relocation needs a stabilized open palm or an
        // active/pending drag. Tap and hold gestures keep the pointer
        // parked on its target.
        if open_stable || self.dragging || self.pinch_down {
            self.send_x = mapped_x;
            self.send_y = mapped_y;
        }

        let event = if let Some(kind) = kind {
            self.last_send_ms = now;
            Some(OutputEvent {
                x: event_x,
                y: event_y,
                kind,
                tracking: true,
                timestamp_ms: now,
            })
        } else if now - self.last_send_ms >= self.config.heartbeat_interval_ms {
            // Heartbeat keeps the remote pointer fresh between gestures
            self.last_send_ms = now;
            Some(OutputEvent {
                x: self.send_x,
                y: self.send_y,
                kind: GestureKind::None,
                tracking: true,
                timestamp_ms: now,
            })
        } else {
            None
        };

        StepOutput {
            pointer: PointerState {
                x: self.send_x,
                y: self.send_y,
                tracking: true,
            },
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample::{Keypoint, PointerSource, KEYPOINT_COUNT};

    /// Synthetic hand builder. Geometry is arranged so each quantity the
    /// tracker reads can be set independently:
    /// - thumb tip is placed `drag_dist` from the index tip,
    /// - middle tip is placed `tap_dist` from the thumb tip,
    /// - finger extension flags are forced by putting the pip either at
    ///   the wrist-tip midpoint (extended) or on the tip (curled).
    struct Hand {
        index_tip: Keypoint,
        drag_dist: f32,
        tap_dist: f32,
        index_ext: bool,
        middle_ext: bool,
        ring_ext: bool,
        pinky_ext: bool,
    }

    impl Default for Hand {
        fn default() -> Self {
            Self {
                index_tip: Keypoint::new(0.5, 0.2),
                drag_dist: 0.30,
                tap_dist: 0.30,
                index_ext: false,
                middle_ext: false,
                ring_ext: false,
                pinky_ext: false,
            }
        }
    }

    impl Hand {
        fn open_palm() -> Self {
            Self {
                index_ext: true,
                middle_ext: true,
                ring_ext: true,
                pinky_ext: true,
                ..Self::default()
            }
        }

        fn v_sign() -> Self {
            Self {
                index_ext: true,
                middle_ext: true,
                ..Self::default()
            }
        }

        fn drag(drag_dist: f32) -> Self {
            Self {
                drag_dist,
                ..Self::default()
            }
        }

        fn tap(tap_dist: f32) -> Self {
            Self {
                tap_dist,
                ..Self::default()
            }
        }

        fn build(&self) -> Vec<Keypoint> {
            let wrist = Keypoint::new(0.5, 0.5);
            let mut p = vec![wrist; KEYPOINT_COUNT];

            let index_tip = self.index_tip;
            let thumb_tip = Keypoint::new(index_tip.x + self.drag_dist, index_tip.y);
            let middle_tip = Keypoint::new(thumb_tip.x, thumb_tip.y + self.tap_dist);
            let ring_tip = Keypoint::new(0.75, 0.30);
            let pinky_tip = Keypoint::new(0.80, 0.35);

            p[HandLandmark::ThumbTip.index()] = thumb_tip;
            let fingers = [
                (6usize, 8usize, index_tip, self.index_ext),
                (10, 12, middle_tip, self.middle_ext),
                (14, 16, ring_tip, self.ring_ext),
                (18, 20, pinky_tip, self.pinky_ext),
            ];
            for (pip, tip, tip_pos, extended) in fingers {
                p[tip] = tip_pos;
                p[pip] = if extended {
                    Keypoint::new((wrist.x + tip_pos.x) / 2.0, (wrist.y + tip_pos.y) / 2.0)
                } else {
                    tip_pos
                };
            }
            p
        }

        fn sample(&self, timestamp_ms: i64) -> Sample {
            Sample::new(timestamp_ms, Some(self.build()))
        }
    }

    fn tracker() -> GestureTracker {
        GestureTracker::new(TrackerConfig::default(), PointerSource::IndexTip)
    }

    fn discrete_kinds(outputs: &[StepOutput]) -> Vec<GestureKind> {
        outputs
            .iter()
            .filter_map(|o| o.event)
            .map(|e| e.kind)
            .filter(|k| *k != GestureKind::None)
            .collect()
    }

    #[test]
    fn test_no_hand_reports_tracking_lost() {
        let mut t = tracker();
        let out = t.step(&Sample::empty(100));
        assert!(!out.pointer.tracking);
        assert_eq!(out.pointer.x, 0.5);
        assert_eq!(out.pointer.y, 0.5);
        assert!(out.event.is_none());
    }

    #[test]
    fn test_tap_scenario() {
        // Thumb-middle distance 0.10 -> 0.04 (press) -> 0.04 -> 0.10
        // (release after 150ms): one PINCH_TAP at the release sample.
        let mut t = tracker();
        let outputs = vec![
            t.step(&Hand::tap(0.10).sample(0)),
            t.step(&Hand::tap(0.04).sample(10)),
            t.step(&Hand::tap(0.04).sample(110)),
            t.step(&Hand::tap(0.10).sample(160)),
        ];
        assert_eq!(discrete_kinds(&outputs), vec![GestureKind::PinchTap]);
        let tap = outputs[3].event.unwrap();
        assert_eq!(tap.kind, GestureKind::PinchTap);
        assert_eq!(tap.timestamp_ms, 160);
        assert!(tap.tracking);
    }

    #[test]
    fn test_tap_release_at_150ms_stamps_release_time() {
        // Press at t=0, release at t=150: exactly one PINCH_TAP, stamped
        // with the release sample's timestamp.
        let mut t = tracker();
        let outputs = vec![
            t.step(&Hand::tap(0.04).sample(0)),
            t.step(&Hand::tap(0.04).sample(80)),
            t.step(&Hand::tap(0.10).sample(150)),
        ];
        assert_eq!(discrete_kinds(&outputs), vec![GestureKind::PinchTap]);
        assert_eq!(outputs[2].event.unwrap().timestamp_ms, 150);
    }

    #[test]
    fn test_tap_timing_boundary() {
        // Held exactly tap_max_ms: valid tap.
        let mut t = tracker();
        let outputs = vec![
            t.step(&Hand::tap(0.04).sample(0)),
            t.step(&Hand::tap(0.10).sample(190)),
        ];
        assert_eq!(discrete_kinds(&outputs), vec![GestureKind::PinchTap]);

        // One millisecond longer: silent.
        let mut t = tracker();
        let outputs = vec![
            t.step(&Hand::tap(0.04).sample(0)),
            t.step(&Hand::tap(0.10).sample(191)),
        ];
        assert!(discrete_kinds(&outputs).is_empty());
    }

    #[test]
    fn test_tap_cooldown_debounces_repeats() {
        let mut t = tracker();
        let mut outputs = vec![
            t.step(&Hand::tap(0.04).sample(100)),
            t.step(&Hand::tap(0.10).sample(150)), // first tap
        ];
        // Immediate second press/release inside the 60ms cooldown
        outputs.push(t.step(&Hand::tap(0.04).sample(160)));
        outputs.push(t.step(&Hand::tap(0.10).sample(180)));
        assert_eq!(discrete_kinds(&outputs), vec![GestureKind::PinchTap]);
    }

    #[test]
    fn test_drag_scenario() {
        // Pinch below 0.052 at t=0, held through t=300, released above
        // 0.070 at t=400: PINCH_HOLD once at t=260, PINCH_RELEASE at t=400.
        let mut t = tracker();
        let outputs = vec![
            t.step(&Hand::drag(0.10).sample(-50)),
            t.step(&Hand::drag(0.04).sample(0)),
            t.step(&Hand::drag(0.04).sample(100)),
            t.step(&Hand::drag(0.04).sample(260)),
            t.step(&Hand::drag(0.04).sample(300)),
            t.step(&Hand::drag(0.10).sample(400)),
        ];
        assert_eq!(
            discrete_kinds(&outputs),
            vec![GestureKind::PinchHold, GestureKind::PinchRelease]
        );
        assert_eq!(outputs[3].event.unwrap().timestamp_ms, 260);
        assert_eq!(outputs[5].event.unwrap().timestamp_ms, 400);
        assert!(!t.is_dragging());
    }

    #[test]
    fn test_aborted_drag_is_silent() {
        // Released before the 260ms hold threshold: no events at all.
        let mut t = tracker();
        let outputs = vec![
            t.step(&Hand::drag(0.04).sample(0)),
            t.step(&Hand::drag(0.04).sample(100)),
            t.step(&Hand::drag(0.10).sample(200)),
        ];
        assert!(discrete_kinds(&outputs).is_empty());
    }

    #[test]
    fn test_drag_hysteresis_band_does_not_toggle() {
        let mut t = tracker();
        // 0.060 sits between on (0.052) and off (0.070): entering the band
        // from above must not start a pinch.
        t.step(&Hand::drag(0.10).sample(0));
        t.step(&Hand::drag(0.060).sample(50));
        t.step(&Hand::drag(0.060).sample(400));
        assert!(!t.pinch_down);

        // After a real entry below 0.052, the band must not release it.
        t.step(&Hand::drag(0.04).sample(500));
        assert!(t.pinch_down);
        t.step(&Hand::drag(0.060).sample(550));
        t.step(&Hand::drag(0.060).sample(900));
        assert!(t.pinch_down);

        // Only crossing above 0.070 releases.
        t.step(&Hand::drag(0.075).sample(950));
        assert!(!t.pinch_down);
    }

    #[test]
    fn test_right_click_latches_once() {
        let mut t = tracker();
        // Cooldown is measured from t=0, so run the hold late enough.
        let outputs: Vec<StepOutput> = (0..80)
            .map(|i| t.step(&Hand::v_sign().sample(400 + i * 20)))
            .collect();
        assert_eq!(discrete_kinds(&outputs), vec![GestureKind::RightClick]);
        // Fires at the first sample at/after 320ms of hold
        let rc = outputs.iter().find_map(|o| o.event.filter(|e| e.kind == GestureKind::RightClick)).unwrap();
        assert_eq!(rc.timestamp_ms, 720);
    }

    #[test]
    fn test_right_click_rearms_after_leaving_shape() {
        let mut t = tracker();
        let mut outputs = Vec::new();
        for i in 0..30 {
            outputs.push(t.step(&Hand::v_sign().sample(400 + i * 20)));
        }
        // Drop the shape, wait out the cooldown, hold again.
        outputs.push(t.step(&Hand::open_palm().sample(1100)));
        for i in 0..30 {
            outputs.push(t.step(&Hand::v_sign().sample(1400 + i * 20)));
        }
        assert_eq!(
            discrete_kinds(&outputs),
            vec![GestureKind::RightClick, GestureKind::RightClick]
        );
    }

    #[test]
    fn test_dragging_suppresses_tap_and_right_click() {
        let mut t = tracker();
        // Latch a drag.
        t.step(&Hand::drag(0.04).sample(0));
        let out = t.step(&Hand::drag(0.04).sample(260));
        assert_eq!(out.event.unwrap().kind, GestureKind::PinchHold);
        assert!(t.is_dragging());

        // Keep the drag pinch closed while shaping a V-sign and closing
        // the tap pinch: neither secondary machine may fire.
        let hostile = Hand {
            drag_dist: 0.04,
            tap_dist: 0.03,
            index_ext: true,
            middle_ext: true,
            ..Hand::default()
        };
        let mut outputs = Vec::new();
        for i in 1..60 {
            outputs.push(t.step(&hostile.sample(260 + i * 20)));
        }
        assert!(discrete_kinds(&outputs).is_empty());
        assert!(t.is_dragging());
    }

    #[test]
    fn test_v_sign_suppresses_tap() {
        let mut t = tracker();
        // V-sign shape with the tap pinch closing and opening quickly:
        // the left gate is closed the whole time.
        let v_tap = Hand {
            tap_dist: 0.03,
            index_ext: true,
            middle_ext: true,
            ..Hand::default()
        };
        let mut outputs = vec![
            t.step(&v_tap.sample(0)),
            t.step(&v_tap.sample(50)),
        ];
        let v_open = Hand {
            tap_dist: 0.10,
            index_ext: true,
            middle_ext: true,
            ..Hand::default()
        };
        outputs.push(t.step(&v_open.sample(100)));
        assert!(discrete_kinds(&outputs).is_empty());
    }

    #[test]
    fn test_move_gate_blocks_closed_hand() {
        let mut t = tracker();
        // Closed hand sweeping across the frame: pointer must not move.
        for i in 0..20 {
            let hand = Hand {
                index_tip: Keypoint::new(0.2 + i as f32 * 0.03, 0.3),
                ..Hand::default()
            };
            let out = t.step(&hand.sample(i * 20));
            assert_eq!(out.pointer.x, 0.5);
            assert_eq!(out.pointer.y, 0.5);
        }
    }

    #[test]
    fn test_stable_open_palm_unlocks_movement() {
        let mut t = tracker();
        let hand = Hand {
            index_tip: Keypoint::new(0.75, 0.3),
            ..Hand::open_palm()
        };
        // First two samples: stabilizer not satisfied yet, pointer parked.
        let out = t.step(&hand.sample(0));
        assert_eq!(out.pointer.x, 0.5);
        let out = t.step(&hand.sample(20));
        assert_eq!(out.pointer.x, 0.5);
        // Third consecutive open-palm sample unlocks relocation.
        let out = t.step(&hand.sample(40));
        assert!(out.pointer.x > 0.5);
    }

    #[test]
    fn test_pointer_moves_while_dragging() {
        let mut t = tracker();
        t.step(&Hand::drag(0.04).sample(0));
        t.step(&Hand::drag(0.04).sample(260)); // PINCH_HOLD
        let hand = Hand {
            index_tip: Keypoint::new(0.7, 0.3),
            ..Hand::drag(0.04)
        };
        let out = t.step(&hand.sample(280));
        assert!(out.pointer.x > 0.5, "drag must carry the pointer");
    }

    #[test]
    fn test_heartbeat_cadence() {
        let mut t = tracker();
        // Open palm, no gestures, samples every 10ms for 500ms.
        let mut beats = Vec::new();
        for i in 0..50 {
            let out = t.step(&Hand::open_palm().sample(i * 10));
            if let Some(e) = out.event {
                assert_eq!(e.kind, GestureKind::None);
                beats.push(e.timestamp_ms);
            }
        }
        assert!(beats.len() >= 12, "expected ~30Hz, got {} beats", beats.len());
        for pair in beats.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap <= 40, "heartbeat gap {}ms exceeds the staleness bound", gap);
        }
    }

    #[test]
    fn test_discrete_event_resets_heartbeat_clock() {
        let mut t = tracker();
        t.step(&Hand::tap(0.04).sample(100));
        let out = t.step(&Hand::tap(0.10).sample(150));
        assert_eq!(out.event.unwrap().kind, GestureKind::PinchTap);

        // Next sample 10ms later: heartbeat clock was refreshed by the tap.
        let out = t.step(&Hand::tap(0.10).sample(160));
        assert!(out.event.is_none());
        // And fires again once the interval elapses.
        let out = t.step(&Hand::tap(0.10).sample(190));
        assert_eq!(out.event.unwrap().kind, GestureKind::None);
    }

    #[test]
    fn test_at_most_one_event_per_sample() {
        // Sweep an adversarial mix of shapes and distances; step returns
        // at most one event by construction, so assert no panic paths and
        // that every emitted position stays in range.
        let mut t = tracker();
        let hands = [
            Hand::open_palm(),
            Hand::v_sign(),
            Hand::drag(0.04),
            Hand::tap(0.04),
            Hand::drag(0.10),
            Hand::tap(0.10),
        ];
        for i in 0..600 {
            let hand = &hands[i % hands.len()];
            let out = t.step(&hand.sample((i as i64) * 16));
            if let Some(e) = out.event {
                assert!((0.0..=1.0).contains(&e.x));
                assert!((0.0..=1.0).contains(&e.y));
            }
        }
    }

    #[test]
    fn test_tracking_loss_preserves_state() {
        let mut t = tracker();
        t.step(&Hand::drag(0.04).sample(0));
        t.step(&Hand::drag(0.04).sample(260)); // dragging
        assert!(t.is_dragging());

        // Detector dropout must not release the drag or fire events.
        let out = t.step(&Sample::empty(280));
        assert!(out.event.is_none());
        assert!(!out.pointer.tracking);
        assert!(t.is_dragging());

        // Hand returns with the pinch open: normal release.
        let out = t.step(&Hand::drag(0.10).sample(300));
        assert_eq!(out.event.unwrap().kind, GestureKind::PinchRelease);
    }
}
