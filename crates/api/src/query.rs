//! Query-string parameter types shared by list endpoints.

use serde::Deserialize;
use stringdesk_core::types::DbId;

/// `GET /string-jobs?status=&tournamentId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringJobQuery {
    pub status: Option<String>,
    pub tournament_id: Option<DbId>,
}

/// `GET /racquets?playerId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RacquetQuery {
    pub player_id: Option<DbId>,
}

/// `GET /dashboard/distribution?tournamentId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentFilter {
    pub tournament_id: Option<DbId>,
}
