//! In-memory sink that records deliveries instead of performing I/O.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::Notifier;

/// Records every delivered message.
///
/// Clones share the same record, so a test can keep one handle while the
/// tracker owns another.
///
/// # Example
///
/// ```
/// use progress_tracker::notifier::RecordingNotifier;
///
/// let chat = RecordingNotifier::<String>::new();
/// let handle = chat.clone();
/// assert_eq!(handle.count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingNotifier<M> {
    delivered: Arc<Mutex<Vec<M>>>,
    succeed: bool,
}

impl<M> RecordingNotifier<M> {
    /// Creates a recorder whose deliveries succeed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delivered: Arc::new(Mutex::new(Vec::new())),
            succeed: true,
        }
    }

    /// Creates a recorder whose deliveries are recorded but report failure.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::new()
        }
    }

    /// Number of delivery attempts so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<M: Clone> RecordingNotifier<M> {
    /// Messages delivered so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<M> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<M> Default for RecordingNotifier<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M> Notifier for RecordingNotifier<M>
where
    M: Clone + Send + Sync + 'static,
{
    type Message = M;

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, message: &M) -> bool {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        self.succeed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_messages_across_clones() {
        let notifier = RecordingNotifier::<String>::new();
        let handle = notifier.clone();

        assert!(notifier.deliver(&"first".to_string()).await);
        assert!(notifier.deliver(&"second".to_string()).await);

        assert_eq!(handle.count(), 2);
        assert_eq!(handle.messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_still_records() {
        let notifier = RecordingNotifier::<u32>::failing();

        assert!(!notifier.deliver(&1_u32).await);
        assert_eq!(notifier.messages(), vec![1]);
    }
}
