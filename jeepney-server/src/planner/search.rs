//! Journey planning.
//!
//! Runs both proximity searches, then the resolver strategies in order,
//! and ranks whatever they find.

use tracing::debug;

use crate::domain::{Coordinate, Itinerary};
use crate::store::{GeometryStore, StoreError};

use super::config::PlannerConfig;
use super::proximity::find_routes_near;
use super::rank::rank_itineraries;
use super::resolver::{PlanContext, Resolve, Strategy};

/// Error from journey planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// The request is missing or has a malformed coordinate
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),

    /// A geometry store query failed
    #[error("geometry store query failed: {0}")]
    Store(#[from] StoreError),

    /// A candidate itinerary failed validation
    #[error("invalid itinerary: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// Planning took longer than the configured timeout
    #[error("journey planning timed out")]
    Timeout,
}

impl PlanError {
    /// True if retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlanError::Store(e) => e.is_retryable(),
            PlanError::Timeout => true,
            _ => false,
        }
    }
}

/// Request for journey planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    /// Where the rider starts.
    pub origin: Coordinate,

    /// Where the rider wants to go.
    pub destination: Coordinate,

    /// Also look for transfer trips when a direct trip exists.
    pub include_transfers: bool,
}

impl PlanRequest {
    /// Create a new plan request. Transfers are only searched when no
    /// direct trip exists.
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            include_transfers: false,
        }
    }

    /// Request transfer alternatives even when a direct trip exists.
    pub fn with_transfers(mut self, include_transfers: bool) -> Self {
        self.include_transfers = include_transfers;
        self
    }
}

/// Result of journey planning.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Found itineraries, ranked best-first.
    pub itineraries: Vec<Itinerary>,

    /// Names of the strategies that ran, in order.
    pub strategies_run: Vec<&'static str>,

    /// Number of candidates found before truncation.
    pub candidates_found: usize,
}

impl PlanResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            itineraries: Vec::new(),
            strategies_run: Vec::new(),
            candidates_found: 0,
        }
    }

    /// True if no itinerary was found.
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }
}

/// Journey planner over a geometry store.
pub struct Planner<'a, S: GeometryStore> {
    store: &'a S,
    config: &'a PlannerConfig,
    strategies: Vec<Strategy>,
}

impl<'a, S: GeometryStore> Planner<'a, S> {
    /// Create a new planner with the default strategy order.
    pub fn new(store: &'a S, config: &'a PlannerConfig) -> Self {
        Self {
            store,
            config,
            strategies: Strategy::default_order(),
        }
    }

    /// Plan journeys from origin to destination.
    ///
    /// An empty result means no route serves the trip; it is not an error.
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        tokio::time::timeout(self.config.search_timeout(), self.run(request))
            .await
            .map_err(|_| PlanError::Timeout)?
    }

    async fn run(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        let threshold = self.config.proximity_threshold_m;
        let (origin_matches, destination_matches) = tokio::try_join!(
            find_routes_near(self.store, request.origin, threshold),
            find_routes_near(self.store, request.destination, threshold),
        )?;

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            origin_routes = origin_matches.len(),
            destination_routes = destination_matches.len(),
            "proximity search complete"
        );

        if origin_matches.is_empty() || destination_matches.is_empty() {
            debug!("no route passes near one end of the trip");
            return Ok(PlanResult::empty());
        }

        let ctx = PlanContext {
            origin: request.origin,
            destination: request.destination,
            origin_matches,
            destination_matches,
            include_transfers: request.include_transfers,
        };

        let mut found: Vec<Itinerary> = Vec::new();
        let mut strategies_run = Vec::new();

        for strategy in &self.strategies {
            let have_direct = found.iter().any(|i| !i.is_transfer());
            let skip = if strategy.is_transfer() {
                have_direct && !ctx.include_transfers
            } else {
                have_direct
            };
            if skip || !strategy.can_handle(&ctx) {
                continue;
            }

            let itineraries = strategy.resolve(self.store, &ctx, self.config).await?;
            debug!(
                strategy = strategy.name(),
                found = itineraries.len(),
                "strategy complete"
            );
            strategies_run.push(strategy.name());
            found.extend(itineraries);
        }

        let candidates_found = found.len();
        let itineraries = rank_itineraries(found, self.config.max_results);
        if itineraries.is_empty() {
            debug!("no itinerary found");
        }

        Ok(PlanResult {
            itineraries,
            strategies_run,
            candidates_found,
        })
    }
}
