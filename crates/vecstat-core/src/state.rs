//! Session state for interactive front ends.
//!
//! The whole browsing session is one immutable [`SessionState`] snapshot.
//! Front ends dispatch [`Action`]s through [`reduce`] and render the result.

use crate::chart::ChartType;
use crate::data_source::{FetchRequest, SourceError, DEFAULT_OBSERVATION_COUNT};
use crate::{Catalog, NormalizedSeries, SeriesIdentifier, VectorEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub catalog: Catalog,
    pub selected: Vec<VectorEntry>,
    pub chart_type: ChartType,
    pub latest_n: u32,
    pub loading: bool,
    pub series: Vec<NormalizedSeries>,
    /// Last user-visible error; cleared when a new fetch starts.
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            selected: Vec::new(),
            chart_type: ChartType::default(),
            latest_n: DEFAULT_OBSERVATION_COUNT,
            loading: false,
            series: Vec::new(),
            error: None,
        }
    }
}

impl SessionState {
    /// Fetching is allowed only when nothing is in flight and something is selected.
    pub fn can_fetch(&self) -> bool {
        !self.loading && !self.selected.is_empty()
    }

    pub fn selected_ids(&self) -> Vec<SeriesIdentifier> {
        self.selected
            .iter()
            .map(|entry| entry.vector_id.clone())
            .collect()
    }

    pub fn fetch_request(&self) -> Result<FetchRequest, SourceError> {
        FetchRequest::new(self.selected_ids(), self.latest_n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CatalogLoaded(Catalog),
    CatalogFailed(String),
    AddVector(VectorEntry),
    RemoveVector(SeriesIdentifier),
    SetChartType(ChartType),
    SetLatestN(u32),
    FetchStarted,
    FetchSucceeded(Vec<NormalizedSeries>),
    FetchFailed(String),
}

pub fn reduce(state: &SessionState, action: Action) -> SessionState {
    let mut next = state.clone();
    match action {
        Action::CatalogLoaded(catalog) => next.catalog = catalog,
        Action::CatalogFailed(message) => {
            next.catalog = Catalog::default();
            next.error = Some(message);
        }
        Action::AddVector(entry) => {
            if !next
                .selected
                .iter()
                .any(|selected| selected.vector_id == entry.vector_id)
            {
                next.selected.push(entry);
            }
        }
        Action::RemoveVector(vector_id) => {
            next.selected.retain(|selected| selected.vector_id != vector_id);
        }
        Action::SetChartType(chart_type) => next.chart_type = chart_type,
        Action::SetLatestN(latest_n) => {
            next.latest_n = if latest_n == 0 {
                DEFAULT_OBSERVATION_COUNT
            } else {
                latest_n
            };
        }
        Action::FetchStarted => {
            next.error = None;
            next.loading = true;
        }
        Action::FetchSucceeded(series) => {
            next.series = series;
            next.loading = false;
        }
        Action::FetchFailed(message) => {
            next.error = Some(message);
            next.loading = false;
        }
    }
    next
}
