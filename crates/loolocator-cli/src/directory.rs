//! Command handlers that talk to the directory service.
//!
//! Called from `main` once configuration and logging are set up.

use loolocator_client::DirectoryClient;
use loolocator_core::{AppConfig, WashroomId, DEMO_ORIGIN};
use loolocator_engine::{
    GeoLocationProvider, RawPosition, RecordingSurface, ResultStatus, SearchState, Session,
    StaticPosition,
};

use crate::render;
use crate::NearestArgs;

fn build_client(config: &AppConfig) -> anyhow::Result<DirectoryClient> {
    DirectoryClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build directory client: {e}"))
}

/// Position used when no coordinates are given on the command line.
fn origin_position(args: &NearestArgs) -> RawPosition {
    match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => RawPosition {
            latitude,
            longitude,
        },
        _ => {
            tracing::info!(origin = %DEMO_ORIGIN, "no position given; using demo origin");
            RawPosition {
                latitude: DEMO_ORIGIN.latitude(),
                longitude: DEMO_ORIGIN.longitude(),
            }
        }
    }
}

/// Runs one search session and prints the result list.
///
/// The map is drawn onto a headless surface whose operations are logged at
/// debug level. When the map key cannot be fetched the map is skipped and
/// the list is still printed.
///
/// # Errors
///
/// Returns an error for an unsupported radius, an unusable position, a
/// failed query, or a `--select` index past the end of the list.
pub(crate) async fn run_nearest(config: &AppConfig, args: &NearestArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let provider =
        GeoLocationProvider::from_config(Some(StaticPosition(origin_position(args))), config);
    let mut session: Session<DirectoryClient, StaticPosition, RecordingSurface> =
        Session::new(client.clone(), provider, config.result_limit);

    match client.fetch_map_key().await {
        Ok(_key) => session.attach_map(RecordingSurface::new()),
        Err(e) => session.map_unavailable(e),
    }

    let params = session.set_filters(args.radius, args.accessible)?;
    if let Err(e) = session.locate().await {
        anyhow::bail!(e);
    }

    let failure = query_failure(&session.results().snapshot());
    if let (Some(detail), Some(_)) = (&failure, args.select) {
        anyhow::bail!("cannot select a result: {detail}");
    }

    if let Some(n) = args.select {
        let snapshot = session.results().snapshot();
        let id = usize::try_from(n - 1)
            .ok()
            .and_then(|i| snapshot.records().get(i))
            .map(|record| record.id.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "cannot select result {n}: only {} result(s) found",
                    snapshot.records().len()
                )
            })?;
        session.select(Some(&id));
    }

    let snapshot = session.results().snapshot();
    println!("{}", render::result_list(&snapshot, params));

    if let Some(record) = snapshot.selected_record() {
        println!();
        println!("{}", render::detail(record));
    }

    match (session.map(), session.map_error()) {
        (Some(map), _) => {
            tracing::info!(
                markers = map.marker_count(),
                operations = map.surface().ops().len(),
                "map updated"
            );
        }
        (None, Some(err)) => println!("\n{err}"),
        (None, None) => {}
    }

    if let Some(detail) = failure {
        anyhow::bail!(detail);
    }
    Ok(())
}

/// Underlying cause of a failed search, or `None` if the search settled
/// without error.
pub(crate) fn query_failure(snapshot: &SearchState) -> Option<String> {
    (snapshot.status() == ResultStatus::Error).then(|| {
        snapshot.error().map_or_else(
            || "nearest query failed".to_string(),
            |failure| failure.detail.clone(),
        )
    })
}

/// Prints the full record for one washroom.
///
/// # Errors
///
/// Returns an error if the id is unknown or the service call fails.
pub(crate) async fn run_show(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let record = client.get_washroom(&WashroomId::new(id)).await?;
    println!("{}", render::detail(&record));
    Ok(())
}

/// Prints the service health report.
///
/// # Errors
///
/// Returns an error if the service is unreachable or reports itself
/// unhealthy.
pub(crate) async fn run_health(config: &AppConfig) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let health = client.health().await?;
    println!("{}: {}", health.service, health.status);
    if !health.is_healthy() {
        anyhow::bail!("directory service reports status '{}'", health.status);
    }
    Ok(())
}
