//! Aggregates the "business logic" layer.

pub mod alert;
pub mod cancel;
pub mod color;
pub mod config;
pub mod constants;
pub mod controller;
pub mod decimal;
pub mod error;
pub mod events;
pub mod series;
pub mod session;

// re-export frequently-used items for convenience
pub use alert::{Alert, BannerColors, BannerStyle};
pub use cancel::{CancelToken, Generations, Interrupt, Never};
pub use color::{ColorError, Rgb};
pub use config::{ChartPolicy, Config, ConfigBuilder, Variant};
pub use constants::{HARD_MAX_POWER, INITIAL_APPROXIMATION, INITIAL_POWER, OUTPUT_DIGITS};
pub use controller::{ChartPoint, Command, Controller, Event, State, Update};
pub use decimal::Decimal;
pub use error::{AppError, ConfigError, ControllerError, SeriesError};
pub use series::{Accumulator, Mode, Sample, SampleCache, Stats};
pub use session::{Outcome, Session, SessionSender};
