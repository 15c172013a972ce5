//! Read access to the external calendar.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use crate::utils::datetime::to_local_naive;

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Start or end of an event: a precise instant or a whole day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl EventTime {
    /// Local wall-clock time; all-day values start at local midnight.
    pub fn to_local_naive(&self) -> NaiveDateTime {
        match self {
            EventTime::DateTime(dt) => to_local_naive(dt),
            EventTime::Date(date) => date.and_time(NaiveTime::MIN),
        }
    }
}

/// One event as listed by the calendar provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub organizer: Option<String>,
    pub status: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Events overlapping `[from, to)`, recurring events expanded.
    async fn fetch_events(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<RemoteEvent>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: String,
    status: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<GoogleEventTime>,
    end: Option<GoogleEventTime>,
    organizer: Option<GoogleOrganizer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    date_time: Option<DateTime<FixedOffset>>,
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct GoogleOrganizer {
    email: Option<String>,
}

impl GoogleEventTime {
    fn into_event_time(self) -> Option<EventTime> {
        match (self.date_time, self.date) {
            (Some(dt), _) => Some(EventTime::DateTime(dt)),
            (None, Some(date)) => Some(EventTime::Date(date)),
            (None, None) => None,
        }
    }
}

impl TryFrom<GoogleEvent> for RemoteEvent {
    type Error = anyhow::Error;

    fn try_from(event: GoogleEvent) -> Result<Self> {
        let start = event
            .start
            .and_then(GoogleEventTime::into_event_time)
            .ok_or_else(|| anyhow!("event {} has no start time", event.id))?;
        let end = event
            .end
            .and_then(GoogleEventTime::into_event_time)
            .ok_or_else(|| anyhow!("event {} has no end time", event.id))?;

        Ok(RemoteEvent {
            title: event.summary.unwrap_or_else(|| "Без названия".to_string()),
            description: event.description,
            location: event.location,
            start,
            end,
            organizer: event.organizer.and_then(|o| o.email),
            status: event.status.unwrap_or_else(|| "confirmed".to_string()),
            id: event.id,
        })
    }
}

/// Google Calendar `events.list` over REST with a pre-issued access token.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
    calendar_id: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(calendar_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::with_base_url(GOOGLE_CALENDAR_API, calendar_id, access_token)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        calendar_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            calendar_id: calendar_id.into(),
            access_token: access_token.into(),
        }
    }

    fn events_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid calendar API url '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("calendar API url cannot be a base"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    async fn fetch_page(
        &self,
        url: &Url,
        from: &str,
        to: &str,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let mut query = vec![
            ("timeMin", from),
            ("timeMax", to),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
            ("maxResults", "250"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let page = self
            .http
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await
            .context("calendar request failed")?
            .error_for_status()
            .context("calendar API returned an error")?
            .json::<EventsPage>()
            .await
            .context("malformed calendar response")?;

        Ok(page)
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarClient {
    async fn fetch_events(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<RemoteEvent>> {
        let url = self.events_url()?;
        let (from, to) = (from.to_rfc3339(), to.to_rfc3339());
        tracing::info!(
            "Fetching events from {} to {} (calendar {})",
            from, to, self.calendar_id
        );

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.fetch_page(&url, &from, &to, page_token.as_deref()).await?;
            for item in page.items {
                match RemoteEvent::try_from(item) {
                    Ok(event) => events.push(event),
                    Err(e) => tracing::warn!("Skipping calendar item: {}", e),
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!("Fetched {} events from the calendar", events.len());
        Ok(events)
    }
}
