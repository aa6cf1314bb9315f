//! Backward pagination through a conversation feed.

use crate::error::{ReportError, Stage};
use crate::model::FeedEvent;
use crate::session::{FeedPage, FeedQuery, Session};
use crate::window::DateWindow;
use tracing::{debug, info};

/// Requests feed pages from newest to oldest and keeps the conference-call items.
pub struct FeedPaginator<'a, S> {
    session: &'a S,
    shape: FeedQuery,
}

impl<'a, S: Session> FeedPaginator<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self {
            session,
            shape: FeedQuery::default(),
        }
    }

    /// Overrides the page-shape parameters. The anchor field is ignored.
    pub fn with_page_shape(mut self, shape: FeedQuery) -> Self {
        self.shape = shape;
        self
    }

    /// Collects RTC items page by page until the feed origin or the window start.
    ///
    /// The page that reaches back to the window start is kept whole; older pages
    /// are never requested. Events come back newest first.
    pub async fn collect_calls_since(
        &self,
        conversation_id: &str,
        window: &DateWindow,
    ) -> Result<Vec<FeedEvent>, ReportError> {
        let boundary = window.start().map(|start| start.timestamp_millis());
        let mut events = Vec::new();
        let mut anchor: Option<i64> = None;
        let mut pages = 0usize;

        loop {
            debug!(page = pages, anchor, "requesting feed page");
            let FeedPage {
                threads,
                has_older_threads,
            } = self
                .session
                .feed_page(conversation_id, &self.shape.anchored(anchor))
                .await
                .map_err(ReportError::transport(Stage::Feed))?;
            pages += 1;

            let mut oldest: Option<i64> = None;
            for item in threads.into_iter().filter_map(|thread| thread.parent_item) {
                if let Some(created) = item.creation_time {
                    oldest = Some(oldest.map_or(created, |o| o.min(created)));
                }
                match FeedEvent::from_item(item) {
                    Some(event) if event.is_conference_call() => events.push(event),
                    Some(_) => {}
                    None => debug!("skipping feed item without id or creation time"),
                }
            }

            let Some(oldest) = oldest else {
                debug!(page = pages, "empty feed page, treating as feed origin");
                break;
            };
            if !has_older_threads {
                break;
            }
            if boundary.is_some_and(|start| oldest <= start) {
                debug!(page = pages, oldest, "reached date window start");
                break;
            }
            if let Some(previous) = anchor {
                if oldest >= previous {
                    return Err(ReportError::PaginationStalled {
                        previous,
                        anchor: oldest,
                    });
                }
            }
            anchor = Some(oldest);
        }

        info!(calls = events.len(), pages, "collected conference calls from feed");
        Ok(events)
    }
}
