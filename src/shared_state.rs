use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::simulation::{Pagination, SimulationQuery, SimulationRecord};
use crate::services::estimator::Estimator;
use crate::services::region::normalize_location;

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub struct AppState {
    pub estimator: Arc<Estimator>,
    /// Recent simulations, newest first
    pub simulations: Arc<RwLock<VecDeque<SimulationRecord>>>,
    pub history_capacity: usize,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(estimator: Estimator, history_capacity: usize) -> Self {
        Self {
            estimator: Arc::new(estimator),
            simulations: Arc::new(RwLock::new(VecDeque::new())),
            history_capacity: history_capacity.max(1),
            started_at: Instant::now(),
        }
    }

    pub fn record(&self, record: SimulationRecord) -> Result<(), ApiError> {
        let mut history = self
            .simulations
            .write()
            .map_err(|_| ApiError::Internal("simulation history lock poisoned".to_string()))?;
        history.push_front(record);
        history.truncate(self.history_capacity);
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<SimulationRecord>, ApiError> {
        let history = self
            .simulations
            .read()
            .map_err(|_| ApiError::Internal("simulation history lock poisoned".to_string()))?;
        Ok(history.iter().find(|r| r.id == id).cloned())
    }

    pub fn len(&self) -> Result<usize, ApiError> {
        let history = self
            .simulations
            .read()
            .map_err(|_| ApiError::Internal("simulation history lock poisoned".to_string()))?;
        Ok(history.len())
    }

    pub fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.len()? == 0)
    }

    pub fn list(&self, query: &SimulationQuery) -> Result<(Vec<SimulationRecord>, Pagination), ApiError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let location = query
            .location
            .as_deref()
            .map(normalize_location)
            .filter(|l| !l.is_empty());

        let history = self
            .simulations
            .read()
            .map_err(|_| ApiError::Internal("simulation history lock poisoned".to_string()))?;

        let matching: Vec<&SimulationRecord> = history
            .iter()
            .filter(|r| query.installation_type.is_none_or(|t| r.input.installation_type == t))
            .filter(|r| {
                location
                    .as_ref()
                    .is_none_or(|needle| normalize_location(&r.input.location).contains(needle.as_str()))
            })
            .collect();

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        let pagination = Pagination { page, limit, total, total_pages: total.div_ceil(limit) };
        Ok((items, pagination))
    }
}

/// Router state. Handlers extract `State<AppState>` and/or `State<Config>`
/// through `FromRef`, so a single `.with_state(shared)` covers both.
#[derive(Clone)]
pub struct SharedState {
    pub app: AppState,
    pub config: Config,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app.clone()
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Self {
        shared.config.clone()
    }
}
