//! Distance filtering and ranking of directory candidates.

use haven_core::geo::{self, GeoCoordinate};

use crate::directory::LocationRecord;
use crate::types::{LocalResource, ResourceKind};

/// Candidates farther than this are never shown as "nearby".
pub const MATCH_RADIUS_MI: f64 = 25.0;
/// Upper bound on the ranked local list.
pub const MAX_LOCAL_RESULTS: usize = 10;
/// Substituted for a missing website so callers never null-check the field.
pub const FALLBACK_WEBSITE: &str = "Not available";
/// Substituted for a missing phone number, same contract as the website.
pub const FALLBACK_PHONE: &str = "Not available";

/// Ranks `candidates` by distance from `origin`.
///
/// Keeps everything within [`MATCH_RADIUS_MI`], sorted nearest-first and
/// truncated to [`MAX_LOCAL_RESULTS`]. The directory's category string
/// doubles as the result description.
#[must_use]
pub fn nearby(origin: &GeoCoordinate, candidates: &[LocationRecord]) -> Vec<LocalResource> {
    let mut matched: Vec<LocalResource> = candidates
        .iter()
        .filter_map(|record| {
            let distance =
                geo::haversine(origin.lat, origin.lng, record.latitude, record.longitude);
            if distance.mi > MATCH_RADIUS_MI {
                return None;
            }
            Some(LocalResource {
                name: record.name.clone(),
                description: record.kind.clone(),
                website: record
                    .website
                    .clone()
                    .unwrap_or_else(|| FALLBACK_WEBSITE.to_owned()),
                phone: record
                    .phone
                    .clone()
                    .unwrap_or_else(|| FALLBACK_PHONE.to_owned()),
                distance_km: distance.km,
                distance_mi: distance.mi,
                kind: ResourceKind::Local,
            })
        })
        .collect();

    matched.sort_by(|a, b| a.distance_mi.total_cmp(&b.distance_mi));
    matched.truncate(MAX_LOCAL_RESULTS);
    matched
}
