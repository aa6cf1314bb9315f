//! Conversation roster collection.

use crate::error::{ReportError, Stage};
use crate::model::Member;
use crate::session::{ParticipantQuery, Session};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Pages through the conversation's participant list.
pub struct ParticipantCollector<'a, S> {
    session: &'a S,
    page_size: u32,
}

impl<'a, S: Session> ParticipantCollector<'a, S> {
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    pub fn new(session: &'a S) -> Self {
        Self {
            session,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns every member in arrival order, without `exclude_member_id`.
    ///
    /// A member repeated across pages is kept once. Any failed page fails the
    /// whole collection, as does a page that claims more results without a new
    /// cursor.
    pub async fn collect_all(
        &self,
        conversation_id: &str,
        exclude_member_id: &str,
    ) -> Result<Vec<Member>, ReportError> {
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        let mut query = ParticipantQuery {
            page_size: self.page_size,
            search_pointer: None,
        };
        let mut pages = 0usize;

        loop {
            debug!(page = pages, cursor = ?query.search_pointer, "requesting participant page");
            let page = self
                .session
                .participants_page(conversation_id, &query)
                .await
                .map_err(ReportError::transport(Stage::Roster))?;
            pages += 1;

            let received = page.participants.len();
            for member in page.participants {
                if member.id != exclude_member_id && seen.insert(member.id.clone()) {
                    members.push(member);
                }
            }

            if !page.has_more {
                break;
            }
            if received == 0 {
                warn!(page = pages, "empty participant page claims more results, stopping");
                break;
            }
            match page.search_pointer {
                Some(next) if query.search_pointer.as_ref() != Some(&next) => {
                    query.search_pointer = Some(next);
                }
                cursor => return Err(ReportError::RosterStalled { cursor }),
            }
        }

        info!(members = members.len(), pages, "collected conversation roster");
        Ok(members)
    }
}
