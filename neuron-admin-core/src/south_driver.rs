use neuron_admin_client::NodeApi;
use neuron_admin_common::Notifier;
use neuron_admin_error::NAResult;
use neuron_admin_models::{
    domain::prelude::{
        DriverSortKey, NodeQuery, NodeStatus, PageParams, PageResult, SortOrder, SouthDriver,
    },
    enums::node::NodeLogLevel,
};
use std::{collections::HashMap, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

fn sort_text(driver: &SouthDriver, key: DriverSortKey) -> String {
    match key {
        DriverSortKey::Name => driver.name.to_lowercase(),
        DriverSortKey::Plugin => driver.plugin.to_lowercase(),
        DriverSortKey::Running => driver.running.as_str().to_lowercase(),
        DriverSortKey::Link => driver.link.as_str().to_lowercase(),
    }
}

/// South driver list with client-side sorting and paging.
///
/// Rows are kept in fetch order; sorting only reorders the view, so clearing
/// the sort restores the order the gateway returned.
pub struct SouthDriverList<A, N> {
    api: A,
    notifier: N,
    query: NodeQuery,
    rows: Vec<SouthDriver>,
    view: Vec<usize>,
    sort: Option<(DriverSortKey, SortOrder)>,
}

impl<A, N> SouthDriverList<A, N>
where
    A: NodeApi,
    N: Notifier,
{
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            query: NodeQuery::default(),
            rows: Vec::new(),
            view: Vec::new(),
            sort: None,
        }
    }

    /// Fetch the south nodes matching `query` and their current states.
    #[instrument(name = "load-south-drivers", skip(self))]
    pub async fn load(&mut self, query: NodeQuery) -> NAResult<()> {
        let nodes = self.api.south_nodes(&query).await?;
        self.query = query;
        self.rows = nodes.into_iter().map(SouthDriver::placeholder).collect();
        self.view = (0..self.rows.len()).collect();
        debug!("Loaded {} south driver(s)", self.rows.len());
        self.refresh_status().await
    }

    #[inline]
    pub fn query(&self) -> &NodeQuery {
        &self.query
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in the current view order.
    pub fn drivers(&self) -> Vec<SouthDriver> {
        self.view.iter().map(|&i| self.rows[i].clone()).collect()
    }

    pub fn sort_by(&mut self, key: DriverSortKey, order: SortOrder) {
        self.sort = Some((key, order));
        self.apply_sort();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.view = (0..self.rows.len()).collect();
    }

    fn apply_sort(&mut self) {
        let Some((key, order)) = self.sort else {
            return;
        };
        let rows = &self.rows;
        self.view.sort_by(|&a, &b| {
            let ord = sort_text(&rows[a], key).cmp(&sort_text(&rows[b], key));
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
            .then(a.cmp(&b))
        });
    }

    pub fn page(&self, params: PageParams) -> PageResult<SouthDriver> {
        PageResult::paginate(&self.drivers(), params)
    }

    /// Re-fetch runtime states. Nodes without a reported state keep theirs.
    pub async fn refresh_status(&mut self) -> NAResult<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let states: HashMap<String, NodeStatus> = self
            .api
            .node_states(None)
            .await?
            .into_iter()
            .map(|s| (s.node.clone(), s))
            .collect();
        for row in self.rows.iter_mut() {
            if let Some(state) = states.get(&row.name) {
                row.running = state.running;
                row.link = state.link;
            }
        }
        self.apply_sort();
        Ok(())
    }

    /// Refresh states every `period` until `shutdown` is cancelled, calling
    /// `on_refresh` after each successful refresh.
    pub async fn watch<F>(&mut self, period: Duration, shutdown: CancellationToken, mut on_refresh: F)
    where
        F: FnMut(&Self),
    {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.refresh_status().await {
                        Ok(()) => on_refresh(&*self),
                        Err(e) => warn!("Failed to refresh south driver states: {e}"),
                    }
                }
                _ = shutdown.cancelled() => {
                    debug!("South driver status watch cancelled");
                    break;
                }
            }
        }
    }

    /// Delete a driver and reload the list.
    pub async fn delete_driver(&mut self, name: &str) -> NAResult<()> {
        self.api.delete_node(name).await?;
        info!("South driver `{name}` deleted");
        self.notifier.success(format!("South driver `{name}` deleted"));
        self.load(self.query.clone()).await
    }

    /// Switch a driver's log level to debug and reload the list.
    pub async fn enable_debug_log(&mut self, name: &str) -> NAResult<()> {
        self.api.set_node_log_level(name, NodeLogLevel::Debug).await?;
        info!("Debug log enabled for `{name}`");
        self.notifier
            .success(format!("Log level of `{name}` set to debug"));
        self.load(self.query.clone()).await
    }
}

