//! Rover behaviors
//!
//! Listed from highest to lowest priority in the standard chain:
//!
//! | Letter | Behavior              | Claims the token                 |
//! |--------|-----------------------|----------------------------------|
//! | `P`    | [`Position`]          | never                            |
//! | `B`    | [`CollisionRecovery`] | while recovering from a bump     |
//! | `N`    | [`Navigator`]         | in manual drive or while turning |
//! | `C`    | [`CruiseControl`]     | whenever nothing else has        |
//! | `M`    | [`MotorDriver`]       | never (terminal driver)          |
//! | `L`    | [`LedDriver`]         | never (terminal driver)          |
//! | `W`    | [`WaypointManager`]   | not in the chain                 |
//!
//! Behaviors share the pose through a `Cell<Pose>` written by
//! [`Position`] and the encoder counts through [`EncoderCounts`]. Both live
//! outside the controller and are borrowed for its lifetime.

pub mod collision_recovery;
pub mod cruise_control;
pub mod led_driver;
pub mod motor_driver;
pub mod navigator;
pub mod position;
pub mod waypoints;

pub use collision_recovery::{CollisionRecovery, RecoveryState};
pub use cruise_control::{CruiseControl, Gains};
pub use led_driver::{LedDriver, LedPair};
pub use motor_driver::{MotorChannel, MotorDriver};
pub use navigator::{NavState, Navigator};
pub use position::{EncoderCounts, Pose, Position};
pub use waypoints::{Waypoint, WaypointError, WaypointManager};
