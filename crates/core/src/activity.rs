//! Read-time activity feeds.
//!
//! Feeds are projections over projects' messages, change requests, and
//! status fields; nothing here is stored. Read state lives on the
//! underlying [`Message`](crate::project::Message) or, for derived items, in
//! a [`NotificationReceipt`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::change_request::{ChangeRequestStatus, Priority};
use crate::error::CoreError;
use crate::notification::preview;
use crate::phase::Phase;
use crate::project::{MessageSender, Project};
use crate::types::{ProjectId, Timestamp};

const MESSAGE_KEY_PREFIX: &str = "message:";
const CHANGE_REQUEST_KEY_PREFIX: &str = "change_request:";
const COMPLETED_KEY_PREFIX: &str = "completed:";
const STATUS_KEY_PREFIX: &str = "status:";

/// Hex characters of the fact hash kept in a status item key.
const STATUS_KEY_HASH_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Message,
    ChangeRequest,
    DesignReady,
    PaymentDue,
    WebsiteLive,
    ChangeRequestCompleted,
}

/// Developer feed filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityFilter {
    #[default]
    All,
    Message,
    ChangeRequest,
}

impl ActivityFilter {
    fn admits(self, kind: ActivityType) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Message => kind == ActivityType::Message,
            ActivityFilter::ChangeRequest => kind == ActivityType::ChangeRequest,
        }
    }
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    /// Stable key, used to mark the item read.
    pub key: String,
    pub project_id: ProjectId,
    pub customer_name: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub action_required: bool,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Durable read marker for a derived feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub project_id: ProjectId,
    pub item_key: String,
    pub read_at: Timestamp,
}

/// What an item key points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// A chat message; read state is `Message.read`.
    Message(String),
    /// An open change request; read state follows its status.
    ChangeRequest(String),
    /// Anything else; read state is a receipt keyed by the whole item key.
    Derived(String),
}

/// Split an item key into what it refers to.
pub fn parse_item_key(key: &str) -> Result<ItemRef, CoreError> {
    if let Some(id) = key.strip_prefix(MESSAGE_KEY_PREFIX) {
        return Ok(ItemRef::Message(id.to_string()));
    }
    if let Some(id) = key
        .strip_prefix(CHANGE_REQUEST_KEY_PREFIX)
        .filter(|id| !id.is_empty())
    {
        return Ok(ItemRef::ChangeRequest(id.to_string()));
    }
    let known = [
        COMPLETED_KEY_PREFIX,
        STATUS_KEY_PREFIX,
    ];
    if known
        .iter()
        .any(|prefix| key.strip_prefix(prefix).is_some_and(|rest| !rest.is_empty()))
    {
        Ok(ItemRef::Derived(key.to_string()))
    } else {
        Err(CoreError::Validation(format!("Unknown activity item key '{key}'")))
    }
}

/// Stable key for a status-derived fact. Changing the underlying URL yields
/// a new key, so the item re-surfaces as unread.
pub fn status_item_key(kind: ActivityType, fact: &str) -> String {
    let digest = Sha256::digest(format!("{kind:?}|{fact}").as_bytes());
    let hex = format!("{digest:x}");
    format!("{STATUS_KEY_PREFIX}{}", &hex[..STATUS_KEY_HASH_LEN])
}

// ---------------------------------------------------------------------------
// Developer feed
// ---------------------------------------------------------------------------

/// Feed for the developer dashboard across all projects.
///
/// Collects unread client messages and open change requests. A change
/// request counts as unread while it is still `pending`.
pub fn developer_feed(
    projects: &[Project],
    filter: ActivityFilter,
    unread_only: bool,
) -> Vec<ActivityItem> {
    let mut items = Vec::new();

    for project in projects {
        for message in project
            .messages
            .iter()
            .filter(|m| m.from == MessageSender::Client && !m.read)
        {
            items.push(ActivityItem {
                key: format!("{MESSAGE_KEY_PREFIX}{}", message.id),
                project_id: project.id.clone(),
                customer_name: project.customer.name.clone(),
                kind: ActivityType::Message,
                title: format!("Message from {}", project.customer.name),
                body: preview(&message.text),
                read: message.read,
                action_required: true,
                created_at: message.created_at,
                priority: None,
                url: None,
            });
        }

        for cr in project.change_requests.iter().filter(|cr| cr.status.is_open()) {
            items.push(ActivityItem {
                key: format!("{CHANGE_REQUEST_KEY_PREFIX}{}", cr.id),
                project_id: project.id.clone(),
                customer_name: project.customer.name.clone(),
                kind: ActivityType::ChangeRequest,
                title: format!(
                    "{} change request from {}",
                    capitalize(cr.priority.as_str()),
                    project.customer.name
                ),
                body: preview(&cr.request),
                read: cr.status != ChangeRequestStatus::Pending,
                action_required: true,
                created_at: cr.created_at,
                priority: Some(cr.priority),
                url: None,
            });
        }
    }

    finish(items, |item| filter.admits(item.kind), unread_only)
}

// ---------------------------------------------------------------------------
// Customer feed
// ---------------------------------------------------------------------------

/// Feed for one customer's dashboard.
///
/// `receipts` holds the item keys the customer already marked read.
pub fn customer_feed(
    project: &Project,
    receipts: &HashSet<String>,
    unread_only: bool,
) -> Vec<ActivityItem> {
    let mut items = Vec::new();

    if let Some((kind, url, title, body, action_required)) = status_fact(project) {
        let key = status_item_key(kind, url);
        items.push(ActivityItem {
            read: receipts.contains(&key),
            key,
            project_id: project.id.clone(),
            customer_name: project.customer.name.clone(),
            kind,
            title: title.to_string(),
            body: body.to_string(),
            action_required,
            created_at: project.updated_at,
            priority: None,
            url: Some(url.to_string()),
        });
    }

    for message in project
        .messages
        .iter()
        .filter(|m| m.from == MessageSender::Developer && !m.read)
    {
        items.push(ActivityItem {
            key: format!("{MESSAGE_KEY_PREFIX}{}", message.id),
            project_id: project.id.clone(),
            customer_name: project.customer.name.clone(),
            kind: ActivityType::Message,
            title: "New message from your developer".to_string(),
            body: preview(&message.text),
            read: message.read,
            action_required: false,
            created_at: message.created_at,
            priority: None,
            url: None,
        });
    }

    for cr in project.change_requests.iter().filter(|cr| {
        cr.status == ChangeRequestStatus::Completed && cr.response.is_some()
    }) {
        let key = format!("{COMPLETED_KEY_PREFIX}{}", cr.id);
        items.push(ActivityItem {
            read: receipts.contains(&key),
            key,
            project_id: project.id.clone(),
            customer_name: project.customer.name.clone(),
            kind: ActivityType::ChangeRequestCompleted,
            title: "Your change request is done".to_string(),
            body: cr.response.as_deref().map(preview).unwrap_or_default(),
            action_required: false,
            created_at: cr.completed_at.unwrap_or(cr.created_at),
            priority: Some(cr.priority),
            url: None,
        });
    }

    finish(items, |_| true, unread_only)
}

/// The single status-derived item a project currently implies, if any.
fn status_fact(project: &Project) -> Option<(ActivityType, &str, &'static str, &'static str, bool)> {
    match project.phase {
        Phase::Feedback => project.design_preview_url.as_deref().map(|url| {
            (
                ActivityType::DesignReady,
                url,
                "Your design is ready",
                "Review the design preview and send us your feedback.",
                true,
            )
        }),
        Phase::Payment => project.payment_url.as_deref().map(|url| {
            (
                ActivityType::PaymentDue,
                url,
                "Payment due",
                "Complete the payment so we can launch your website.",
                true,
            )
        }),
        Phase::Live => project.live_url.as_deref().map(|url| {
            (
                ActivityType::WebsiteLive,
                url,
                "Your website is live",
                "Your website is online.",
                false,
            )
        }),
        Phase::Onboarding | Phase::Design | Phase::Revisie | Phase::Review => None,
    }
}

/// Keys of every unread item in `items`.
pub fn unread_keys(items: &[ActivityItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| !item.read)
        .map(|item| item.key.clone())
        .collect()
}

fn finish(
    mut items: Vec<ActivityItem>,
    admit: impl Fn(&ActivityItem) -> bool,
    unread_only: bool,
) -> Vec<ActivityItem> {
    items.retain(|item| admit(item) && (!unread_only || !item.read));
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_request::ChangeRequest;
    use crate::package::PackageType;
    use crate::project::{CreateProject, Customer, Message};
    use chrono::{Duration, TimeZone, Utc};

    fn base_time() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 5, 9, 0, 0).unwrap()
    }

    fn project(id: &str, name: &str) -> Project {
        Project::new(
            id.to_string(),
            CreateProject {
                service_type: "website".into(),
                package_type: PackageType::Starter,
                customer: Customer {
                    name: name.into(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    phone: None,
                    company_name: None,
                },
                revisions_total: None,
            },
            5,
            base_time(),
        )
    }

    fn message(id: &str, from: MessageSender, minutes: i64, read: bool) -> Message {
        Message {
            id: id.into(),
            from,
            text: format!("text {id}"),
            created_at: base_time() + Duration::minutes(minutes),
            read,
        }
    }

    fn change_request(id: &str, status: ChangeRequestStatus, minutes: i64) -> ChangeRequest {
        ChangeRequest {
            id: id.into(),
            created_at: base_time() + Duration::minutes(minutes),
            request: format!("request {id}"),
            priority: Priority::Urgent,
            status,
            response: None,
            completed_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Developer feed
    // -----------------------------------------------------------------------

    fn developer_fixture() -> Vec<Project> {
        let mut a = project("AAAA1111", "Ann");
        a.messages = vec![
            message("m1", MessageSender::Client, 10, false),
            message("m2", MessageSender::Client, 20, true),
            message("m3", MessageSender::Developer, 30, false),
        ];
        a.change_requests = vec![
            change_request("c1", ChangeRequestStatus::Pending, 15),
            change_request("c2", ChangeRequestStatus::Completed, 40),
        ];

        let mut b = project("BBBB2222", "Bob");
        b.change_requests = vec![change_request("c3", ChangeRequestStatus::InProgress, 25)];
        vec![a, b]
    }

    #[test]
    fn developer_feed_collects_unread_client_messages_and_open_requests() {
        let feed = developer_feed(&developer_fixture(), ActivityFilter::All, false);
        let keys: Vec<_> = feed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["change_request:c3", "change_request:c1", "message:m1"]
        );
        assert!(feed.iter().all(|i| i.action_required));
    }

    #[test]
    fn developer_feed_filters_by_type() {
        let projects = developer_fixture();
        let messages = developer_feed(&projects, ActivityFilter::Message, false);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, ActivityType::Message);

        let requests = developer_feed(&projects, ActivityFilter::ChangeRequest, false);
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn developer_feed_unread_only_drops_in_progress() {
        let feed = developer_feed(&developer_fixture(), ActivityFilter::All, true);
        assert!(feed.iter().all(|i| !i.read));
        assert!(!feed.iter().any(|i| i.key == "change_request:c3"));
    }

    // -----------------------------------------------------------------------
    // Customer feed
    // -----------------------------------------------------------------------

    #[test]
    fn customer_feed_derives_design_ready() {
        let mut p = project("AAAA1111", "Ann");
        p.phase = Phase::Feedback;
        p.design_preview_url = Some("https://preview.example/a".into());

        let feed = customer_feed(&p, &HashSet::new(), false);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, ActivityType::DesignReady);
        assert!(feed[0].action_required);
        assert!(!feed[0].read);
    }

    #[test]
    fn customer_feed_requires_both_phase_and_link() {
        let mut p = project("AAAA1111", "Ann");
        p.phase = Phase::Payment;
        assert!(customer_feed(&p, &HashSet::new(), false).is_empty());

        p.payment_url = Some("https://pay.example/a".into());
        let feed = customer_feed(&p, &HashSet::new(), false);
        assert_eq!(feed[0].kind, ActivityType::PaymentDue);

        p.phase = Phase::Review;
        assert!(customer_feed(&p, &HashSet::new(), false).is_empty());
    }

    #[test]
    fn receipt_marks_status_item_read_until_fact_changes() {
        let mut p = project("AAAA1111", "Ann");
        p.phase = Phase::Live;
        p.live_url = Some("https://ann.example".into());

        let key = customer_feed(&p, &HashSet::new(), false)[0].key.clone();
        let receipts: HashSet<String> = [key].into_iter().collect();
        assert!(customer_feed(&p, &receipts, false)[0].read);
        assert!(customer_feed(&p, &receipts, true).is_empty());

        p.live_url = Some("https://www.ann.example".into());
        assert!(!customer_feed(&p, &receipts, false)[0].read);
    }

    #[test]
    fn customer_feed_includes_developer_messages_and_answered_requests() {
        let mut p = project("AAAA1111", "Ann");
        p.messages = vec![
            message("m1", MessageSender::Developer, 5, false),
            message("m2", MessageSender::Client, 6, false),
        ];
        let mut done = change_request("c1", ChangeRequestStatus::Completed, 1);
        done.response = Some("Logo swapped".into());
        done.completed_at = Some(base_time() + Duration::minutes(50));
        let unanswered = change_request("c2", ChangeRequestStatus::Completed, 2);
        p.change_requests = vec![done, unanswered];

        let feed = customer_feed(&p, &HashSet::new(), false);
        let keys: Vec<_> = feed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["completed:c1", "message:m1"]);
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    #[test]
    fn item_keys_parse() {
        assert_eq!(
            parse_item_key("message:abc").unwrap(),
            ItemRef::Message("abc".into())
        );
        assert_eq!(
            parse_item_key("completed:c1").unwrap(),
            ItemRef::Derived("completed:c1".into())
        );
        assert_eq!(
            parse_item_key("change_request:cr1").unwrap(),
            ItemRef::ChangeRequest("cr1".into())
        );
        assert!(parse_item_key("change_request:").is_err());
        assert!(parse_item_key("bogus").is_err());
        assert!(parse_item_key("status:").is_err());
    }

    #[test]
    fn status_keys_are_stable_and_fact_specific() {
        let a = status_item_key(ActivityType::DesignReady, "https://x");
        assert_eq!(a, status_item_key(ActivityType::DesignReady, "https://x"));
        assert_ne!(a, status_item_key(ActivityType::DesignReady, "https://y"));
        assert_ne!(a, status_item_key(ActivityType::WebsiteLive, "https://x"));
        assert_eq!(a.len(), STATUS_KEY_PREFIX.len() + STATUS_KEY_HASH_LEN);
    }
}
