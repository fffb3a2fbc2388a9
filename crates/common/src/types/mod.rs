use serde::Serialize;

/// Body of the `/health` endpoint.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}
