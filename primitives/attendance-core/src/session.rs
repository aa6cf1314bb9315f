//! The seam between the pipeline and the remote platform.
//!
//! Page types mirror the platform's JSON so that a transport can deserialize
//! responses straight into them. Every field the pipeline does not strictly
//! need to page forward is optional; malformed items are skipped downstream
//! rather than failing the run.

use crate::error::TransportError;
use crate::model::Member;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Authenticated access to one platform account.
///
/// Requests are issued one at a time; implementations need not be `Sync`.
pub trait Session {
    /// Member id of the authenticated account.
    fn own_member_id(&self) -> &str;

    fn participants_page(
        &self,
        conversation_id: &str,
        query: &ParticipantQuery,
    ) -> impl Future<Output = Result<ParticipantPage, TransportError>>;

    fn feed_page(
        &self,
        conversation_id: &str,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<FeedPage, TransportError>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantQuery {
    pub page_size: u32,
    /// Cursor returned by the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_pointer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPage {
    #[serde(default)]
    pub participants: Vec<Member>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub search_pointer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    /// Only threads older than this creation time (ms since epoch); unset for the newest page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub min_total_items: u32,
    pub max_total_unread: u32,
    pub comments_per_thread: u32,
    pub max_unread_per_thread: u32,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            timestamp: None,
            min_total_items: 25,
            max_total_unread: 25,
            comments_per_thread: 1,
            max_unread_per_thread: 1,
        }
    }
}

impl FeedQuery {
    pub fn anchored(&self, timestamp: Option<i64>) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    #[serde(default)]
    pub threads: Vec<FeedThread>,
    #[serde(default)]
    pub has_older_threads: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedThread {
    #[serde(default)]
    pub parent_item: Option<FeedItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub creation_time: Option<i64>,
    #[serde(default)]
    pub rtc: Option<RtcItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcItem {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub rtc_participants: Option<Vec<RtcParticipant>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcParticipant {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
