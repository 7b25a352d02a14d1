//! Bulk deletion: one delete attempt per selected post, in selection order,
//! best-effort. One post's failure never aborts the rest of the sweep, and
//! nothing is retried.

use crate::listing::Post;
use async_trait::async_trait;

/// What one delete attempt amounted to.
///
/// `Unconfirmed` means the delete control was clicked but no confirmation
/// dialog appeared within the wait window. Whether the click actually deleted
/// the post is unknowable from here; the variant carries that ambiguity
/// instead of resolving it either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Confirmed,
    Unconfirmed,
    ControlMissing,
    Failed(String),
}

/// Deletes a single post by identifier. Implementations catch their own
/// errors and report them as [`DeleteOutcome::Failed`].
#[async_trait]
pub trait PostDeleter {
    async fn delete_post(&self, id: &str) -> DeleteOutcome;
}

/// Per-outcome tallies for one sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub confirmed: usize,
    pub unconfirmed: usize,
    pub control_missing: usize,
    pub failed: usize,
}

impl SweepReport {
    pub fn attempted(&self) -> usize {
        self.confirmed + self.unconfirmed + self.control_missing + self.failed
    }

    fn record(&mut self, outcome: &DeleteOutcome) {
        match outcome {
            DeleteOutcome::Confirmed => self.confirmed += 1,
            DeleteOutcome::Unconfirmed => self.unconfirmed += 1,
            DeleteOutcome::ControlMissing => self.control_missing += 1,
            DeleteOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Delete each post in order and tally the outcomes.
pub async fn run<D: PostDeleter + ?Sized>(deleter: &D, posts: &[Post]) -> SweepReport {
    let mut report = SweepReport::default();

    for post in posts {
        tracing::info!(id = %post.id, title = %post.title, "deleting post");
        let outcome = deleter.delete_post(&post.id).await;

        match &outcome {
            DeleteOutcome::Confirmed => {
                tracing::info!(id = %post.id, "deletion confirmed");
            }
            DeleteOutcome::Unconfirmed => {
                tracing::warn!(
                    id = %post.id,
                    "no confirmation dialog appeared; deletion could not be verified"
                );
            }
            DeleteOutcome::ControlMissing => {
                tracing::error!(id = %post.id, "delete button not found");
            }
            DeleteOutcome::Failed(message) => {
                tracing::error!(id = %post.id, error = %message, "failed to delete post");
            }
        }

        report.record(&outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn post(id: &str) -> Post {
        Post {
            title: format!("post {id}"),
            id: id.to_string(),
        }
    }

    /// Records every attempted id; ids in `fail` report a failure, ids in
    /// `unconfirmed` report a click without a dialog.
    #[derive(Default)]
    struct FakeDeleter {
        attempted: Mutex<Vec<String>>,
        fail: Vec<String>,
        unconfirmed: Vec<String>,
    }

    #[async_trait]
    impl PostDeleter for FakeDeleter {
        async fn delete_post(&self, id: &str) -> DeleteOutcome {
            self.attempted.lock().unwrap().push(id.to_string());
            if self.fail.iter().any(|f| f == id) {
                DeleteOutcome::Failed("boom".to_string())
            } else if self.unconfirmed.iter().any(|u| u == id) {
                DeleteOutcome::Unconfirmed
            } else {
                DeleteOutcome::Confirmed
            }
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_sweep() {
        let deleter = FakeDeleter {
            fail: vec!["b".to_string()],
            ..FakeDeleter::default()
        };
        let posts = vec![post("a"), post("b"), post("c")];

        let report = run(&deleter, &posts).await;

        assert_eq!(
            *deleter.attempted.lock().unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(report.confirmed, 2);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn empty_selection_deletes_nothing() {
        let deleter = FakeDeleter::default();

        let report = run(&deleter, &[]).await;

        assert!(deleter.attempted.lock().unwrap().is_empty());
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn report_partitions_every_attempt() {
        let deleter = FakeDeleter {
            fail: vec!["x".to_string()],
            unconfirmed: vec!["y".to_string()],
            ..FakeDeleter::default()
        };
        let posts = vec![post("x"), post("y"), post("z")];

        let report = run(&deleter, &posts).await;

        assert_eq!(report.attempted(), posts.len());
        assert_eq!(report.confirmed, 1);
        assert_eq!(report.unconfirmed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.control_missing, 0);
    }

    #[tokio::test]
    async fn deletions_run_in_selection_order() {
        let deleter = FakeDeleter::default();
        let posts = vec![post("3"), post("1"), post("2")];

        run(&deleter, &posts).await;

        assert_eq!(
            *deleter.attempted.lock().unwrap(),
            vec!["3".to_string(), "1".to_string(), "2".to_string()]
        );
    }
}
