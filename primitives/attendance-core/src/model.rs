//! Domain types shared by the pipeline stages.

use crate::session::{FeedItem, RtcItem};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Wire tag of feed items that represent a real-time call.
pub const RTC_ITEM_TYPE: &str = "RTC";

/// Wire tag of an RTC item whose call has concluded.
pub const RTC_ENDED: &str = "ENDED";

/// A conversation member. Identity is the id; display names are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "userId")]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemType {
    Rtc,
    Other(String),
}

impl ItemType {
    fn from_wire(tag: &str) -> Self {
        if tag == RTC_ITEM_TYPE {
            ItemType::Rtc
        } else {
            ItemType::Other(tag.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtcState {
    Ended,
    Other(String),
}

/// A participant recorded on a call. The platform may omit the display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParticipant {
    pub id: String,
    pub display_name: Option<String>,
}

impl CallParticipant {
    pub fn new(id: impl Into<String>, display_name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcInfo {
    pub state: RtcState,
    /// `None` when the platform sent no participant list at all.
    pub participants: Option<Vec<CallParticipant>>,
}

impl RtcInfo {
    fn from_wire(rtc: RtcItem) -> Self {
        let state = match rtc.kind.as_deref() {
            Some(RTC_ENDED) => RtcState::Ended,
            Some(other) => RtcState::Other(other.to_string()),
            None => RtcState::Other(String::new()),
        };
        let participants = rtc.rtc_participants.map(|list| {
            list.into_iter()
                .map(|p| CallParticipant {
                    id: p.user_id,
                    display_name: p.display_name,
                })
                .collect()
        });
        Self {
            state,
            participants,
        }
    }
}

/// A parent item of a feed thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub id: String,
    pub item_type: ItemType,
    pub timestamp: DateTime<Utc>,
    pub rtc: Option<RtcInfo>,
}

impl FeedEvent {
    /// Converts a wire item, returning `None` when the id or creation time is missing.
    pub fn from_item(item: FeedItem) -> Option<Self> {
        let id = item.item_id?;
        let timestamp = DateTime::from_timestamp_millis(item.creation_time?)?;
        Some(Self {
            id,
            item_type: ItemType::from_wire(item.kind.as_deref().unwrap_or_default()),
            timestamp,
            rtc: item.rtc.map(RtcInfo::from_wire),
        })
    }

    /// An RTC-typed item carrying call data, whatever the call state.
    pub fn is_conference_call(&self) -> bool {
        self.item_type == ItemType::Rtc && self.rtc.is_some()
    }

    pub fn is_ended_call(&self) -> bool {
        self.is_conference_call()
            && self
                .rtc
                .as_ref()
                .is_some_and(|rtc| rtc.state == RtcState::Ended)
    }
}

/// An ended call with its position in the extracted call list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub index: usize,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub participants: Option<Vec<CallParticipant>>,
}

/// One CSV data row. Whether the member attended is given by the report it lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub call_index: usize,
    pub timestamp: DateTime<Utc>,
    pub name: String,
}
