//! Jeepney journey planner.
//!
//! This module answers: "which jeepney (or pair of jeepneys) gets me from
//! here to there?"
//!
//! Routes passing within walking distance of both ends are tried as single
//! rides first, forward along the line and then looping around past the
//! terminal. Only when no direct ride exists (or the caller asks for
//! alternatives) are pairs of routes searched for a transfer point.

mod config;
mod direct;
mod fare;
mod proximity;
mod rank;
mod resolver;
mod search;
mod transfer;


pub use config::{
    ConfigError, DEFAULT_MAX_RESULTS, DEFAULT_PROXIMITY_THRESHOLD_M, DEFAULT_SAMPLE_STEP,
    DEFAULT_TRANSFER_TOLERANCE_M, PlannerConfig,
};
pub use direct::{ForwardResolver, LoopAroundResolver};
pub use fare::FareModel;
pub use proximity::{SharedRoute, find_routes_near, shared_routes};
pub use rank::rank_itineraries;
pub use resolver::{PlanContext, Resolve, Strategy};
pub use search::{PlanError, PlanRequest, PlanResult, Planner};
pub use transfer::TransferResolver;
