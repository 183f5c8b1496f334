use crate::bridge::model::{GrowthModel, QueryRequest, QueryResponse};
use crate::workflow::context::QueryContext;
use crate::workflow::handler::handle_query;
use log::info;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use warp::Filter;

type SharedModel = Arc<RwLock<GrowthModel>>;

/// HTTP endpoint that answers queries and hands the latest chart to the visualizer.
pub struct GrowthBridge {
    state: SharedModel,
}

impl GrowthBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(GrowthModel::default())),
        }
    }

    pub fn routes(
        &self,
        context: Arc<QueryContext>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let context_filter = warp::any().map(move || context.clone());

        let growth_route = warp::path("growth")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(|state: SharedModel| async move {
                let model = state.read().await.clone();
                Ok::<_, Infallible>(warp::reply::json(&model))
            });

        let query_route = warp::path("query")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(context_filter.clone())
            .and(state_filter)
            .and_then(
                |request: QueryRequest, context: Arc<QueryContext>, state: SharedModel| async move {
                    let reply = handle_query(&context, request.tokens.as_slice()).await;
                    let points = match reply.growth.as_ref() {
                        Some(report) => {
                            *state.write().await = GrowthModel::from(report);
                            info!(
                                "[bridge] {} -> {} points",
                                report.location,
                                report.coordinates.len()
                            );
                            report.coordinates.len()
                        }
                        None => 0,
                    };
                    Ok::<_, Infallible>(warp::reply::json(&QueryResponse {
                        reply: reply.text,
                        points,
                    }))
                },
            );

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(context_filter)
            .map(|context: Arc<QueryContext>| warp::reply::json(&context.metrics.snapshot()));

        growth_route.or(query_route).or(metrics_route)
    }

    /// Starts serving on the current runtime.
    pub fn spawn(&self, context: Arc<QueryContext>, address: SocketAddr) -> JoinHandle<()> {
        let routes = self.routes(context);
        self.publish_status(&format!("listening on http://{}", address));
        tokio::spawn(warp::serve(routes).run(address))
    }

    pub async fn publish(&self, model: GrowthModel) {
        info!(
            "[bridge] {} growth points: {}",
            model.location,
            model.coordinates.len()
        );
        *self.state.write().await = model;
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }

    pub async fn snapshot(&self) -> GrowthModel {
        self.state.read().await.clone()
    }
}

impl Default for GrowthBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RecordSource;
    use crate::workflow::config::BotConfig;
    use growthcore::telemetry::MetricsSnapshot;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn context() -> (Arc<QueryContext>, NamedTempFile) {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"[
                {"date": 20200302, "positive": 40, "positiveIncrease": 20},
                {"date": 20200301, "positive": 20, "positiveIncrease": 20}
            ]"#,
        )
        .unwrap();
        let source = RecordSource::Offline(temp.path().to_path_buf());
        let context = QueryContext::new(BotConfig::default(), source).unwrap();
        (Arc::new(context), temp)
    }

    #[tokio::test]
    async fn query_route_publishes_plot() {
        let (context, _file) = context();
        let bridge = GrowthBridge::new();
        let routes = bridge.routes(context);

        let response = warp::test::request()
            .method("POST")
            .path("/query")
            .json(&serde_json::json!({"tokens": ["oh", "plot"]}))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), 200);
        let body: QueryResponse = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.reply, "There are 40 positive cases in OHIO =(");
        assert_eq!(body.points, 1);

        let model = bridge.snapshot().await;
        assert_eq!(model.location, "Ohio");
        assert_eq!(model.coordinates.len(), 1);

        let response = warp::test::request()
            .method("GET")
            .path("/growth")
            .reply(&routes)
            .await;
        let served: GrowthModel = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(served, model);
    }

    #[tokio::test]
    async fn text_only_query_leaves_chart_untouched() {
        let (context, _file) = context();
        let bridge = GrowthBridge::new();
        let routes = bridge.routes(context);

        let response = warp::test::request()
            .method("POST")
            .path("/query")
            .json(&serde_json::json!({"tokens": ["oh"]}))
            .reply(&routes)
            .await;
        let body: QueryResponse = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.points, 0);
        assert_eq!(bridge.snapshot().await, GrowthModel::default());
    }

    #[tokio::test]
    async fn metrics_route_reports_counts() {
        let (context, _file) = context();
        let bridge = GrowthBridge::new();
        let routes = bridge.routes(context.clone());
        handle_query(&context, &["zz"]).await;

        let response = warp::test::request()
            .method("GET")
            .path("/metrics")
            .reply(&routes)
            .await;
        let snapshot: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(snapshot["failed"], 1);
        assert_eq!(
            context.metrics.snapshot(),
            MetricsSnapshot {
                served: 0,
                failed: 1,
                skipped_records: 0,
            }
        );
    }

    #[tokio::test]
    async fn publish_replaces_model() {
        let bridge = GrowthBridge::new();
        let model = GrowthModel {
            location: "united_states".into(),
            current_positive: 7,
            coordinates: Vec::new(),
            notes: vec!["nothing to plot".into()],
        };
        bridge.publish(model.clone()).await;
        assert_eq!(bridge.snapshot().await, model);
    }
}
