//! The background click loop.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use enigo::{Enigo, MouseControllable};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::Rng;
use tracing::info;

use crate::settings::{ClickButton, ClickKind, ClickPlan};

static ENIGO: Lazy<Mutex<Enigo>> = Lazy::new(|| Mutex::new(Enigo::new()));

/// Seam between the loop and the OS pointer, so the loop is testable without
/// moving the real mouse.
pub trait PointerDriver: Send {
    fn move_to(&mut self, x: i32, y: i32);
    fn click(&mut self, button: ClickButton);
}

/// Production driver backed by the shared enigo handle.
pub struct EnigoDriver;

impl PointerDriver for EnigoDriver {
    fn move_to(&mut self, x: i32, y: i32) {
        ENIGO.lock().mouse_move_to(x, y);
    }

    fn click(&mut self, button: ClickButton) {
        let mut en = ENIGO.lock();
        match button {
            ClickButton::Left => en.mouse_click(enigo::MouseButton::Left),
            ClickButton::Right => en.mouse_click(enigo::MouseButton::Right),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Countdown,
    Clicking,
}

const PHASE_COUNTDOWN: u8 = 0;
const PHASE_CLICKING: u8 = 1;

/// Handle to one running click worker. Dropping the handle does not stop the
/// worker; call [`ClickJob::stop`].
pub struct ClickJob {
    running: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    clicks: Arc<AtomicU64>,
    cps_bits: Arc<AtomicU32>,
    phase: Arc<AtomicU8>,
}

impl ClickJob {
    pub fn spawn(plan: ClickPlan, mut driver: impl PointerDriver + 'static) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let paused = Arc::new(AtomicBool::new(false));
        let clicks = Arc::new(AtomicU64::new(0));
        let cps_bits = Arc::new(AtomicU32::new(0));
        let phase = Arc::new(AtomicU8::new(PHASE_COUNTDOWN));

        let job = Self {
            running: Arc::clone(&running),
            paused: Arc::clone(&paused),
            clicks: Arc::clone(&clicks),
            cps_bits: Arc::clone(&cps_bits),
            phase: Arc::clone(&phase),
        };

        thread::spawn(move || {
            if !plan.pre_start_delay.is_zero() {
                sleep_responsive(plan.pre_start_delay, &running);
            }
            phase.store(PHASE_CLICKING, Ordering::Relaxed);

            let mut rng = rand::thread_rng();
            let started = Instant::now();
            let mut done: u64 = 0;

            while running.load(Ordering::Relaxed) {
                while paused.load(Ordering::Relaxed) && running.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(100));
                }
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                if let Some(limit) = plan.repeat_limit {
                    if done >= limit {
                        break;
                    }
                }

                if let Some((x, y)) = plan.position {
                    driver.move_to(x, y);
                }
                driver.click(plan.button);
                if plan.kind == ClickKind::Double {
                    thread::sleep(Duration::from_millis(10));
                    driver.click(plan.button);
                }

                done += 1;
                clicks.store(done, Ordering::Relaxed);
                if done % 10 == 0 {
                    let elapsed = started.elapsed().as_secs_f32();
                    if elapsed > 0.0 {
                        cps_bits.store((done as f32 / elapsed).to_bits(), Ordering::Relaxed);
                    }
                }

                let wait = match plan.random_range {
                    Some((min, max)) => {
                        let secs = rng.gen_range(min.as_secs_f64()..=max.as_secs_f64());
                        Duration::from_secs_f64(secs)
                    }
                    None => plan.interval,
                };
                sleep_responsive(wait, &running);
            }

            running.store(false, Ordering::Relaxed);
            paused.store(false, Ordering::Relaxed);
            info!(clicks = done, "click loop finished");
        });

        job
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Flip the pause flag; returns the new paused state.
    pub fn toggle_pause(&self) -> bool {
        let now_paused = !self.paused.load(Ordering::Relaxed);
        self.paused.store(now_paused, Ordering::Relaxed);
        now_paused
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn clicks_done(&self) -> u64 {
        self.clicks.load(Ordering::Relaxed)
    }

    /// Measured clicks per second, available once ten clicks have landed.
    pub fn measured_cps(&self) -> Option<f32> {
        let bits = self.cps_bits.load(Ordering::Relaxed);
        (bits != 0).then(|| f32::from_bits(bits))
    }

    pub fn phase(&self) -> Phase {
        match self.phase.load(Ordering::Relaxed) {
            PHASE_COUNTDOWN => Phase::Countdown,
            _ => Phase::Clicking,
        }
    }
}

// Sleep in short slices so a cleared running flag is honored within ~50 ms
// even for multi-second intervals.
fn sleep_responsive(total: Duration, running: &AtomicBool) {
    let slice = Duration::from_millis(50);
    let mut remaining = total;
    while !remaining.is_zero() {
        if !running.load(Ordering::Relaxed) {
            return;
        }
        let step = remaining.min(slice);
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct StubDriver {
        clicks: Arc<AtomicU64>,
        moves: Arc<Mutex<Vec<(i32, i32)>>>,
    }

    impl PointerDriver for StubDriver {
        fn move_to(&mut self, x: i32, y: i32) {
            self.moves.lock().push((x, y));
        }

        fn click(&mut self, _button: ClickButton) {
            self.clicks.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn plan(interval_ms: u64) -> ClickPlan {
        ClickPlan {
            interval: Duration::from_millis(interval_ms),
            random_range: None,
            pre_start_delay: Duration::ZERO,
            kind: ClickKind::Single,
            button: ClickButton::Left,
            position: None,
            repeat_limit: None,
        }
    }

    fn wait_until(deadline_ms: u64, mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        check()
    }

    #[test]
    fn test_repeat_limit_stops_the_worker() {
        let driver = StubDriver::default();
        let counted = Arc::clone(&driver.clicks);
        let job = ClickJob::spawn(
            ClickPlan {
                interval: Duration::from_millis(1),
                repeat_limit: Some(5),
                ..plan(1)
            },
            driver,
        );

        assert!(wait_until(2000, || !job.is_running()));
        assert_eq!(job.clicks_done(), 5);
        assert_eq!(counted.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_double_click_hits_the_driver_twice_per_iteration() {
        let driver = StubDriver::default();
        let counted = Arc::clone(&driver.clicks);
        let job = ClickJob::spawn(
            ClickPlan {
                kind: ClickKind::Double,
                repeat_limit: Some(3),
                ..plan(1)
            },
            driver,
        );

        assert!(wait_until(2000, || !job.is_running()));
        assert_eq!(job.clicks_done(), 3);
        assert_eq!(counted.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_fixed_position_moves_before_every_click() {
        let driver = StubDriver::default();
        let moves = Arc::clone(&driver.moves);
        let job = ClickJob::spawn(
            ClickPlan {
                position: Some((640, 360)),
                repeat_limit: Some(2),
                ..plan(1)
            },
            driver,
        );

        assert!(wait_until(2000, || !job.is_running()));
        assert_eq!(*moves.lock(), vec![(640, 360), (640, 360)]);
    }

    #[test]
    fn test_stop_halts_an_endless_job() {
        let driver = StubDriver::default();
        let job = ClickJob::spawn(plan(10), driver);

        assert!(wait_until(2000, || job.clicks_done() > 0));
        job.stop();
        assert!(wait_until(2000, || !job.is_running()));
    }

    #[test]
    fn test_pause_freezes_the_click_count() {
        let driver = StubDriver::default();
        let job = ClickJob::spawn(plan(10), driver);

        assert!(wait_until(2000, || job.clicks_done() > 0));
        assert!(job.toggle_pause());
        // Let an in-flight iteration drain into the pause loop.
        thread::sleep(Duration::from_millis(200));
        let frozen = job.clicks_done();
        thread::sleep(Duration::from_millis(300));
        assert_eq!(job.clicks_done(), frozen);

        assert!(!job.toggle_pause());
        assert!(wait_until(2000, || job.clicks_done() > frozen));
        job.stop();
    }

    #[test]
    fn test_countdown_phase_is_visible() {
        let driver = StubDriver::default();
        let job = ClickJob::spawn(
            ClickPlan {
                pre_start_delay: Duration::from_millis(300),
                ..plan(10)
            },
            driver,
        );

        assert_eq!(job.phase(), Phase::Countdown);
        assert!(wait_until(2000, || job.phase() == Phase::Clicking));
        job.stop();
    }
}
