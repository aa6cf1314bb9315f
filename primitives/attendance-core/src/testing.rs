//! Scripted in-memory session for pipeline tests.

use crate::error::TransportError;
use crate::model::Member;
use crate::session::{
    FeedItem, FeedPage, FeedQuery, FeedThread, ParticipantPage, ParticipantQuery, RtcItem,
    RtcParticipant, Session,
};
use std::cell::RefCell;
use std::collections::VecDeque;

pub const BOT_ID: &str = "bot";

/// Serves queued pages in order and records every query it receives.
#[derive(Default)]
pub struct ScriptedSession {
    participant_pages: RefCell<VecDeque<Result<ParticipantPage, TransportError>>>,
    feed_pages: RefCell<VecDeque<Result<FeedPage, TransportError>>>,
    pub participant_queries: RefCell<Vec<ParticipantQuery>>,
    pub feed_queries: RefCell<Vec<FeedQuery>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(self, members: &[Member], has_more: bool) -> Self {
        let cursor = self.participant_pages.borrow().len();
        self.participant_pages.borrow_mut().push_back(Ok(ParticipantPage {
            participants: members.to_vec(),
            has_more,
            search_pointer: has_more.then(|| format!("cursor-{cursor}")),
        }));
        self
    }

    pub fn participant_page(self, page: ParticipantPage) -> Self {
        self.participant_pages.borrow_mut().push_back(Ok(page));
        self
    }

    pub fn participants_fail(self) -> Self {
        self.participant_pages
            .borrow_mut()
            .push_back(Err(TransportError::new("participants unavailable")));
        self
    }

    pub fn feed(self, threads: Vec<FeedThread>, has_older_threads: bool) -> Self {
        self.feed_pages.borrow_mut().push_back(Ok(FeedPage {
            threads,
            has_older_threads,
        }));
        self
    }

    pub fn feed_fail(self) -> Self {
        self.feed_pages
            .borrow_mut()
            .push_back(Err(TransportError::new("feed unavailable")));
        self
    }
}

impl Session for ScriptedSession {
    fn own_member_id(&self) -> &str {
        BOT_ID
    }

    async fn participants_page(
        &self,
        _conversation_id: &str,
        query: &ParticipantQuery,
    ) -> Result<ParticipantPage, TransportError> {
        self.participant_queries.borrow_mut().push(query.clone());
        self.participant_pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no participant page scripted")))
    }

    async fn feed_page(
        &self,
        _conversation_id: &str,
        query: &FeedQuery,
    ) -> Result<FeedPage, TransportError> {
        self.feed_queries.borrow_mut().push(query.clone());
        self.feed_pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no feed page scripted")))
    }
}

pub fn member(id: &str) -> Member {
    Member::new(id, format!("Name {id}"))
}

pub fn text_thread(id: &str, created: i64) -> FeedThread {
    FeedThread {
        parent_item: Some(FeedItem {
            item_id: Some(id.to_string()),
            kind: Some("TEXT".to_string()),
            creation_time: Some(created),
            rtc: None,
        }),
    }
}

pub fn rtc_thread(id: &str, created: i64, state: &str, participants: Option<&[&str]>) -> FeedThread {
    FeedThread {
        parent_item: Some(FeedItem {
            item_id: Some(id.to_string()),
            kind: Some("RTC".to_string()),
            creation_time: Some(created),
            rtc: Some(RtcItem {
                kind: Some(state.to_string()),
                rtc_participants: participants.map(|ids| {
                    ids.iter()
                        .map(|id| RtcParticipant {
                            user_id: id.to_string(),
                            display_name: Some(format!("Name {id}")),
                        })
                        .collect()
                }),
            }),
        }),
    }
}
