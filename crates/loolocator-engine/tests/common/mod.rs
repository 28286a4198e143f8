//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::Mutex;

use loolocator_client::QueryError;
use loolocator_core::{Coordinate, SearchParameters, WashroomId, WashroomRecord};
use loolocator_engine::{PlatformError, PositionRequest, PositionSource, RawPosition, WashroomDirectory};
use tokio::sync::oneshot;

pub type Outcome = Result<Vec<WashroomRecord>, QueryError>;

pub enum Reply {
    Now(Outcome),
    Later(oneshot::Receiver<Outcome>),
}

/// Directory that answers from a script and records every call.
///
/// An exhausted script answers with an empty result set.
#[derive(Default)]
pub struct ScriptedDirectory {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Coordinate, SearchParameters)>>,
}

impl ScriptedDirectory {
    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_now(&self, outcome: Outcome) {
        self.push(Reply::Now(outcome));
    }

    pub fn push_later(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Later(rx));
        tx
    }

    pub fn calls(&self) -> Vec<(Coordinate, SearchParameters)> {
        self.calls.lock().unwrap().clone()
    }
}

impl WashroomDirectory for ScriptedDirectory {
    async fn nearest(
        &self,
        origin: Coordinate,
        params: SearchParameters,
        _limit: NonZeroU32,
    ) -> Outcome {
        self.calls.lock().unwrap().push((origin, params));
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            None => Ok(Vec::new()),
            Some(Reply::Now(outcome)) => outcome,
            Some(Reply::Later(rx)) => rx.await.unwrap_or_else(|_| Ok(Vec::new())),
        }
    }
}

/// Platform source that always refuses permission.
pub struct DeniedSource;

impl PositionSource for DeniedSource {
    async fn current_position(&self, _request: PositionRequest) -> Result<RawPosition, PlatformError> {
        Err(PlatformError::PermissionDenied)
    }
}

pub const TIMES_SQUARE: RawPosition = RawPosition {
    latitude: 40.7589,
    longitude: -73.9851,
};

pub fn origin() -> Coordinate {
    Coordinate::new(TIMES_SQUARE.latitude, TIMES_SQUARE.longitude).unwrap()
}

pub fn washroom(id: &str, distance: f64) -> WashroomRecord {
    WashroomRecord {
        id: WashroomId::new(id),
        name: format!("Washroom {id}"),
        address: "New York, NY".to_string(),
        description: None,
        location: Coordinate::new(40.7589 + distance / 111_000.0, -73.9851).unwrap(),
        rating: 4.2,
        hours: "24/7".to_string(),
        accessibility: true,
        verified: true,
        amenities: Vec::new(),
        distance_meters: Some(distance),
    }
}

pub fn server_error() -> QueryError {
    QueryError::Service {
        status: 500,
        url: "http://directory.test/api/washrooms/nearest".to_string(),
    }
}
