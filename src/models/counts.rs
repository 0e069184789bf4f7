use std::ops::AddAssign;

use serde::Serialize;

/// The eight QC counters tracked per hour and per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QcCounts {
    pub post_qc: u64,
    pub post_approved: u64,
    pub post_skipped: u64,
    pub post_reannotated: u64,
    pub comment_qc: u64,
    pub comment_approved: u64,
    pub comment_skipped: u64,
    pub comment_reannotated: u64,
}

impl QcCounts {
    pub const COLUMNS: [&'static str; 8] = [
        "post_qc",
        "post_approved",
        "post_skipped",
        "post_reannotated",
        "comment_qc",
        "comment_approved",
        "comment_skipped",
        "comment_reannotated",
    ];

    /// Build from values in [`Self::COLUMNS`] order.
    pub fn from_array(values: [u64; 8]) -> Self {
        let [post_qc, post_approved, post_skipped, post_reannotated, comment_qc, comment_approved, comment_skipped, comment_reannotated] =
            values;
        Self {
            post_qc,
            post_approved,
            post_skipped,
            post_reannotated,
            comment_qc,
            comment_approved,
            comment_skipped,
            comment_reannotated,
        }
    }

    pub fn to_array(&self) -> [u64; 8] {
        [
            self.post_qc,
            self.post_approved,
            self.post_skipped,
            self.post_reannotated,
            self.comment_qc,
            self.comment_approved,
            self.comment_skipped,
            self.comment_reannotated,
        ]
    }

    pub fn is_zero(&self) -> bool {
        self.to_array().iter().all(|v| *v == 0)
    }
}

impl AddAssign for QcCounts {
    fn add_assign(&mut self, rhs: Self) {
        let mut sum = self.to_array();
        for (acc, v) in sum.iter_mut().zip(rhs.to_array()) {
            *acc = acc.saturating_add(v);
        }
        *self = Self::from_array(sum);
    }
}
