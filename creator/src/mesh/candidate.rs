use std::cmp::Ordering;

use super::edge::EdgeId;
use super::triangle::FaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Edge(EdgeId),
    Triangle(FaceId),
}

/// Heap entry: a hull entity keyed by the circumradius it had when pushed.
/// Entries are never removed eagerly; they go stale when a referenced
/// entity leaves the hull and are discarded at pop time.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub radius: f64,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn edge(radius: f64, e: EdgeId) -> Self {
        Candidate {
            radius,
            kind: CandidateKind::Edge(e),
        }
    }

    pub fn triangle(radius: f64, f: FaceId) -> Self {
        Candidate {
            radius,
            kind: CandidateKind::Triangle(f),
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.radius == other.radius
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.radius
            .partial_cmp(&other.radius)
            .unwrap_or_else(|| panic!("NaN circumradius in candidate heap"))
    }
}
