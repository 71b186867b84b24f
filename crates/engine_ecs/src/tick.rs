//! Fixed-timestep tick loop.
//!
//! Drives an [`Ecs`] at a configured rate. Each iteration runs one
//! [`Ecs::update`] with the fixed timestep as `dt`, hands the ECS to an
//! optional after-tick hook (rendering, inspection), and then sleeps off the
//! remainder of the tick budget.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::ecs::Ecs;
use crate::error::EcsError;

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl TickConfig {
    /// Check that the tick rate is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidTickRate`] if the rate is not finite, not
    /// strictly positive, or so small that one tick overflows [`Duration`].
    pub fn validate(&self) -> Result<(), EcsError> {
        self.try_tick_duration().map(|_| ())
    }

    /// The fixed duration of one tick.
    ///
    /// Falls back to [`Duration::MAX`] for a rate that fails
    /// [`TickConfig::validate`].
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.try_tick_duration().unwrap_or(Duration::MAX)
    }

    fn try_tick_duration(&self) -> Result<Duration, EcsError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(EcsError::InvalidTickRate(self.tick_rate));
        }
        Duration::try_from_secs_f64(1.0 / self.tick_rate)
            .map_err(|_| EcsError::InvalidTickRate(self.tick_rate))
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

/// Runs an [`Ecs`] at a fixed rate.
#[derive(Debug)]
pub struct TickLoop {
    /// Tick configuration.
    config: TickConfig,
    /// The ECS being driven.
    ecs: Ecs,
}

impl TickLoop {
    /// Create a new tick loop around `ecs`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidTickRate`] for an unusable configuration.
    pub fn new(config: TickConfig, ecs: Ecs) -> Result<Self, EcsError> {
        config.validate()?;
        Ok(Self { config, ecs })
    }

    /// Returns a reference to the ECS.
    #[must_use]
    pub fn ecs(&self) -> &Ecs {
        &self.ecs
    }

    /// Consume the loop and return the ECS.
    #[must_use]
    pub fn into_ecs(self) -> Ecs {
        self.ecs
    }

    /// Run a single tick with the fixed timestep.
    ///
    /// # Errors
    ///
    /// Propagates [`EcsError::SystemFailed`] from [`Ecs::update`].
    pub fn tick(&mut self) -> Result<(), EcsError> {
        let dt = self.config.tick_duration().as_secs_f64();
        self.ecs.update(dt)
    }

    /// Run until `max_ticks` is reached (or forever if it is 0).
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first failing tick.
    pub fn run(&mut self) -> Result<(), EcsError> {
        self.run_with(|_| {})
    }

    /// Like [`TickLoop::run`], calling `after_tick` with the ECS after every
    /// successful tick. The hook sees the world between ticks, after the
    /// destruction drain, and cannot mutate it.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first failing tick.
    pub fn run_with<F>(&mut self, mut after_tick: F) -> Result<(), EcsError>
    where
        F: FnMut(&Ecs),
    {
        let tick_duration = self.config.tick_duration();
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            systems = self.ecs.systems().system_count(),
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.tick()?;
            after_tick(&self.ecs);

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(
                    ticks = tick_count,
                    entities = self.ecs.world().entity_count(),
                    "tick loop complete"
                );
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.ecs.tick_id(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
            debug!(tick_id = self.ecs.tick_id(), "tick finished");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use anyhow::anyhow;
    use engine_component::{Component, SystemQuery};

    use super::*;
    use crate::config::SystemConfig;
    use crate::system::FnSystem;

    struct Marker;
    impl Component for Marker {
        fn type_name() -> &'static str {
            "Marker"
        }
    }

    fn fast(max_ticks: u64) -> TickConfig {
        TickConfig {
            tick_rate: 1000.0,
            max_ticks,
        }
    }

    #[test]
    fn test_invalid_tick_rates_rejected() {
        let tiny = [1e-30, 1e-300, f64::MIN_POSITIVE / 4.0];
        for rate in [0.0, -5.0, f64::NAN, f64::INFINITY].into_iter().chain(tiny) {
            let config = TickConfig {
                tick_rate: rate,
                max_ticks: 1,
            };
            assert!(matches!(
                TickLoop::new(config, Ecs::new()),
                Err(EcsError::InvalidTickRate(_))
            ));
        }
        assert!(TickConfig::default().validate().is_ok());
        let slow = TickConfig {
            tick_rate: 0.5,
            max_ticks: 1,
        };
        assert!(slow.validate().is_ok());
        assert_eq!(slow.tick_duration(), Duration::from_secs(2));

        let overflowing = TickConfig {
            tick_rate: 1e-300,
            max_ticks: 1,
        };
        assert_eq!(overflowing.tick_duration(), Duration::MAX);
    }

    #[test]
    fn test_tick_uses_fixed_dt() {
        let seen_dt = Rc::new(Cell::new(0.0));
        let mut ecs = Ecs::new();
        let e = ecs.world_mut().create_entity();
        ecs.world_mut().add_component(e, Marker);
        let seen = Rc::clone(&seen_dt);
        ecs.register_system(FnSystem::new(
            SystemConfig::new("dt", SystemQuery::any().with::<Marker>()),
            move |ctx| {
                seen.set(ctx.dt);
                Ok(())
            },
        ))
        .unwrap();

        let mut tick_loop = TickLoop::new(fast(0), ecs).unwrap();
        tick_loop.tick().unwrap();
        assert!((seen_dt.get() - 0.001).abs() < 1e-9);
        assert_eq!(tick_loop.ecs().tick_id(), 1);
    }

    #[test]
    fn test_run_limited_ticks() {
        let mut tick_loop = TickLoop::new(fast(5), Ecs::new()).unwrap();
        let mut hook_calls = 0;
        tick_loop.run_with(|_| hook_calls += 1).unwrap();
        assert_eq!(tick_loop.ecs().tick_id(), 5);
        assert_eq!(hook_calls, 5);
    }

    #[test]
    fn test_run_stops_on_failure() {
        let mut ecs = Ecs::new();
        let e = ecs.world_mut().create_entity();
        ecs.world_mut().add_component(e, Marker);
        ecs.register_system(FnSystem::new(
            SystemConfig::new("fails-on-3", SystemQuery::any().with::<Marker>()),
            |ctx| {
                if ctx.tick_id == 3 {
                    return Err(anyhow!("tick three"));
                }
                Ok(())
            },
        ))
        .unwrap();

        let mut tick_loop = TickLoop::new(fast(10), ecs).unwrap();
        let err = tick_loop.run().unwrap_err();
        assert!(matches!(err, EcsError::SystemFailed { tick_id: 3, .. }));
        assert_eq!(tick_loop.into_ecs().tick_id(), 3);
    }
}
