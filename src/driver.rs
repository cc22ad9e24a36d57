//! Glue between a host's periodic callback and a [`Scheduler`].

use std::time::Duration;

use tracing::debug;

use crate::{Display, Phase, Scheduler, TickError, TickOutcome};

/// Owns a scheduler, its display collaborator and the nominal tick period.
///
/// Hosts with a repeating task call [`tick`](TickDriver::tick) from it and
/// cancel the task once it returns [`Phase::Stopped`]. Hosts that own their
/// own loop can use [`run`](TickDriver::run) instead.
#[derive(Debug)]
pub struct TickDriver<P, R, D> {
    scheduler: Scheduler<P, R>,
    display: D,
    period: Duration,
}

impl<P: Clone, R, D: Display<P, R>> TickDriver<P, R, D> {
    /// Create a driver ticking `scheduler` every `period`.
    pub fn new(scheduler: Scheduler<P, R>, display: D, period: Duration) -> Self {
        Self {
            scheduler,
            display,
            period,
        }
    }

    /// Nominal time between ticks.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Get the driven scheduler.
    pub fn scheduler(&self) -> &Scheduler<P, R> {
        &self.scheduler
    }

    /// Get the display collaborator.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Stop the scheduler; see [`Scheduler::cancel`].
    pub fn cancel(&mut self) {
        self.scheduler.cancel();
    }

    /// Forward one nominal period to the scheduler.
    pub fn tick(&mut self) -> Result<TickOutcome, TickError<D::Error>> {
        self.scheduler.on_tick(self.period, &mut self.display)
    }

    /// Tick until the scheduler stops, calling `wait(period)` before each tick.
    ///
    /// A cancel made through a [`CancelHandle`](crate::CancelHandle) ends the
    /// run without another tick but is still reported to hooks.
    ///
    /// Returns the number of ticks delivered. A display failure ends the run
    /// and is returned as-is; the scheduler can be resumed with another call.
    pub fn run<W>(&mut self, mut wait: W) -> Result<usize, TickError<D::Error>>
    where
        W: FnMut(Duration),
    {
        let mut ticks = 0;
        while self.scheduler.phase() != Phase::Stopped {
            wait(self.period);
            self.tick()?;
            ticks += 1;
        }
        self.scheduler.apply_pending_cancel();
        debug!(ticks, reason = ?self.scheduler.stop_reason(), "driver finished");
        Ok(ticks)
    }

    /// Give back the scheduler and display.
    pub fn into_parts(self) -> (Scheduler<P, R>, D) {
        (self.scheduler, self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Frame, Hook, HookEvent, Playlist, StopReason};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn driver(
        durations: &[u64],
        fail_at: Option<usize>,
    ) -> TickDriver<usize, &'static str, impl FnMut(&usize, &[&'static str]) -> Result<(), usize>> {
        let playlist: Playlist<usize> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| Frame::new(i, ms(*d)))
            .collect();
        let scheduler = Scheduler::new(playlist, ["console"]).unwrap();
        let display = move |frame: &usize, _: &[&'static str]| match fail_at {
            Some(bad) if bad == *frame => Err(*frame),
            _ => Ok(()),
        };
        TickDriver::new(scheduler, display, ms(50))
    }

    #[test]
    fn test_run_to_completion() {
        let mut driver = driver(&[100, 100], None);
        let mut waited = Duration::ZERO;

        let ticks = driver.run(|d| waited += d).unwrap();

        // first frame on tick 1, second after 100ms, then one tick to notice the end
        assert_eq!(ticks, 4);
        assert_eq!(waited, ms(200));
        assert_eq!(driver.scheduler().stop_reason(), Some(StopReason::Completed));
    }

    #[test]
    fn test_run_stops_on_display_error() {
        let mut driver = driver(&[50, 50, 50], Some(1));

        let err = driver.run(|_| {}).unwrap_err();
        assert_eq!(err.display_error(), Some(&1));
        assert_eq!(driver.scheduler().position(), 1);
        assert_eq!(driver.scheduler().phase(), Phase::Playing);
    }

    #[test]
    fn test_tick_after_cancel() {
        let mut driver = driver(&[100], None);
        driver.cancel();

        let outcome = driver.tick().unwrap();
        assert_eq!(outcome.phase, Phase::Stopped);
        assert_eq!(driver.run(|_| {}).unwrap(), 0);

        let (scheduler, _) = driver.into_parts();
        assert_eq!(scheduler.stop_reason(), Some(StopReason::Cancelled));
    }

    #[test]
    fn test_run_reports_handle_cancel_to_hooks() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let playlist: Playlist<usize> = Playlist::new(vec![Frame::new(0, ms(100))]).looping(true);
        let scheduler = Scheduler::new(playlist, [1u8])
            .unwrap()
            .with_hook(Hook::observe(move |e| sink.borrow_mut().push(e)));
        let display = |_: &usize, _: &[u8]| -> Result<(), ()> { Ok(()) };
        let mut driver = TickDriver::new(scheduler, display, ms(50));
        let handle = driver.scheduler().cancel_handle();

        driver.tick().unwrap();
        handle.cancel();

        assert_eq!(driver.run(|_| {}).unwrap(), 0);
        assert_eq!(
            events.borrow().last(),
            Some(&HookEvent::Stopped(StopReason::Cancelled))
        );
    }
}
