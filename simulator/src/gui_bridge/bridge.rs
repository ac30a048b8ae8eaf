use crate::generator::profile::{generate_with, FlightProfileConfig, MAX_PROFILE_TICKS};
use crate::gui_bridge::model::{RangeRequest, VisualizationModel};
use crate::workflow::runner::{Runner, WorkflowResult};
use anyhow::Result;
use flightcore::telemetry::MetricsRecorder;
use log::{error, info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    hyper::body::Bytes,
    reply::{Json, WithStatus},
    Filter, Rejection, Reply,
};

type SharedModel = Arc<RwLock<VisualizationModel>>;

const MAX_CSV_BYTES: u64 = 64 * 1024 * 1024;

fn read_model(state: &SharedModel) -> RwLockReadGuard<'_, VisualizationModel> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_model(state: &SharedModel) -> RwLockWriteGuard<'_, VisualizationModel> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store_result(
    state: &SharedModel,
    recorder: &MetricsRecorder,
    result: WorkflowResult,
) -> serde_json::Value {
    recorder.record_run(result.anomalies.len());
    let body = json!({
        "status": "ok",
        "observations": result.series.len(),
        "anomalies": result.anomalies.len(),
    });

    let mut guard = write_model(state);
    *guard = VisualizationModel {
        series: result.series,
        anomalies: result.anomalies,
        full_summary: result.full_summary,
        run_metrics: recorder.snapshot(),
    };
    body
}

fn ok_reply(body: serde_json::Value) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&body), StatusCode::OK)
}

fn bad_request(recorder: &MetricsRecorder, message: String) -> WithStatus<Json> {
    warn!("request rejected: {}", message);
    recorder.record_failure();
    warp::reply::with_status(
        warp::reply::json(&json!({ "status": "error", "message": message })),
        StatusCode::BAD_REQUEST,
    )
}

/// HTTP surface for the presentation layer.
///
/// `GET /payload` returns the latest model, `POST /ingest` takes raw CSV,
/// `POST /ingest-demo` takes a profile config and `POST /range` returns a
/// range digest over the latest series.
pub fn routes(
    state: SharedModel,
    runner: Arc<Runner>,
    recorder: Arc<MetricsRecorder>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());
    let recorder_filter = warp::any().map(move || recorder.clone());

    let get_route = warp::path("payload")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and(recorder_filter.clone())
        .map(|state: SharedModel, recorder: Arc<MetricsRecorder>| {
            let mut model = read_model(&state).clone();
            model.run_metrics = recorder.snapshot();
            warp::reply::json(&model)
        });

    let csv_route = warp::path("ingest")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_CSV_BYTES))
        .and(warp::body::bytes())
        .and(state_filter.clone())
        .and(runner_filter.clone())
        .and(recorder_filter.clone())
        .map(
            |body: Bytes,
             state: SharedModel,
             runner: Arc<Runner>,
             recorder: Arc<MetricsRecorder>| {
                match std::str::from_utf8(&body) {
                    Ok(raw) => {
                        let series = runner.ingest_text(raw);
                        ok_reply(store_result(&state, &recorder, runner.execute(series)))
                    }
                    Err(err) => {
                        bad_request(&recorder, format!("body is not valid UTF-8: {}", err))
                    }
                }
            },
        );

    let demo_route = warp::path("ingest-demo")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and(runner_filter.clone())
        .and(recorder_filter)
        .map(
            |config: FlightProfileConfig,
             state: SharedModel,
             runner: Arc<Runner>,
             recorder: Arc<MetricsRecorder>| {
                let ticks = config.total_ticks();
                if ticks > MAX_PROFILE_TICKS {
                    return bad_request(
                        &recorder,
                        format!(
                            "profile asks for {} samples; the limit is {}",
                            ticks, MAX_PROFILE_TICKS
                        ),
                    );
                }
                let series = generate_with(&config);
                ok_reply(store_result(&state, &recorder, runner.execute(series)))
            },
        );

    let range_route = warp::path("range")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .and(runner_filter)
        .map(
            |request: RangeRequest, state: SharedModel, runner: Arc<Runner>| {
                let guard = read_model(&state);
                let summary = runner.summarize_range(
                    &guard.series,
                    &request.metrics,
                    request.start,
                    request.end,
                );
                warp::reply::json(&json!({ "summary": summary }))
            },
        );

    get_route.or(csv_route).or(demo_route).or(range_route)
}

/// Bridge that hosts the HTTP endpoint and keeps the latest pipeline output.
pub struct GuiBridge {
    state: SharedModel,
    recorder: Arc<MetricsRecorder>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state: SharedModel = Arc::new(RwLock::new(VisualizationModel::default()));
        let recorder = Arc::new(MetricsRecorder::new());
        let bind: SocketAddr = runner.config().bridge.bind;
        let filter = routes(state.clone(), runner, recorder.clone());

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("bridge runtime failed to start: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(filter).try_bind_ephemeral(bind) {
                    Ok((addr, server)) => {
                        info!("bridge listening on {}", addr);
                        server.await;
                    }
                    Err(err) => error!("bridge failed to bind {}: {}", bind, err),
                }
            });
        });

        Self { state, recorder }
    }

    pub fn publish(&self, result: WorkflowResult) -> Result<()> {
        store_result(&self.state, &self.recorder, result);
        let guard = read_model(&self.state);
        info!(
            "[GUI] series points: {}, anomalies: {}",
            guard.series.len(),
            guard.anomalies.len()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        read_model(&self.state).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;

    fn runner() -> Arc<Runner> {
        let mut cfg = WorkflowConfig::from_args(Some(5), None);
        cfg.bridge.bind = SocketAddr::from(([127, 0, 0, 1], 0));
        Arc::new(Runner::new(cfg).unwrap())
    }

    fn fresh_routes() -> (
        SharedModel,
        Arc<MetricsRecorder>,
        impl Filter<Extract = impl Reply, Error = Rejection> + Clone,
    ) {
        let state: SharedModel = Arc::new(RwLock::new(VisualizationModel::default()));
        let recorder = Arc::new(MetricsRecorder::new());
        let filter = routes(state.clone(), runner(), recorder.clone());
        (state, recorder, filter)
    }

    #[test]
    fn gui_bridge_updates_state() {
        let runner = runner();
        let gui = GuiBridge::new(runner.clone());
        let result = runner.execute(runner.ingest_text("time,altitude\n0,1\n1,2\n"));
        gui.publish(result).unwrap();

        let snapshot = gui.snapshot();
        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(snapshot.run_metrics.runs, 1);
    }

    #[tokio::test]
    async fn csv_ingest_then_payload() {
        let (state, _recorder, filter) = fresh_routes();

        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .body("time,altitude\n0,100\n1,150\n2,abc\n")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_model(&state).series.len(), 2);

        let response = warp::test::request()
            .method("GET")
            .path("/payload")
            .reply(&filter)
            .await;
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["series"]["observations"][1]["altitude"], 150.0);
        assert_eq!(body["run_metrics"]["runs"], 1);
    }

    #[tokio::test]
    async fn invalid_utf8_is_counted_as_failure() {
        let (_state, recorder, filter) = fresh_routes();
        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .body(vec![0xff, 0xfe, 0x00])
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(recorder.snapshot().failures, 1);
    }

    #[tokio::test]
    async fn oversized_demo_profile_is_rejected() {
        let (state, recorder, filter) = fresh_routes();
        let response = warp::test::request()
            .method("POST")
            .path("/ingest-demo")
            .json(&json!({
                "duration_secs": u32::MAX,
                "ticks_per_second": u32::MAX,
            }))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(recorder.snapshot().failures, 1);
        assert_eq!(recorder.snapshot().runs, 0);
        assert!(read_model(&state).series.is_empty());
    }

    #[tokio::test]
    async fn demo_ingest_then_range_digest() {
        let (state, _recorder, filter) = fresh_routes();
        let response = warp::test::request()
            .method("POST")
            .path("/ingest-demo")
            .json(&json!({ "duration_secs": 20, "seed": 9 }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_model(&state).series.len(), 201);

        let response = warp::test::request()
            .method("POST")
            .path("/range")
            .json(&json!({ "metrics": ["velocity"], "start": 0, "end": 11 }))
            .reply(&filter)
            .await;
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        let summary = body["summary"].as_str().unwrap();
        assert!(summary.starts_with("Time range: T+0.0s to T+1.1s"));
        assert_eq!(summary.lines().filter(|l| l.starts_with("@ T+")).count(), 6);
    }
}
