//! Event log queries

use super::filter::EventFilter;
use super::record::EventRecord;
use crate::endpoint::{self, BaseUrl};
use crate::session::Session;
use crate::{Result, VManageError};
use tracing::debug;
use url::Url;

impl Session {
    /// Query the event log of the controller at `base_url`
    pub async fn query_events(
        &self,
        base_url: &str,
        filter: &EventFilter,
    ) -> Result<Vec<EventRecord>> {
        let base_url = BaseUrl::parse(base_url)?;
        self.query_events_at(&base_url, filter).await
    }

    /// Query the event log of the controller this session logged in to
    pub async fn events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>> {
        self.query_events_at(self.base_url(), filter).await
    }

    async fn query_events_at(
        &self,
        base_url: &BaseUrl,
        filter: &EventFilter,
    ) -> Result<Vec<EventRecord>> {
        let url = event_url(base_url, filter)?;

        let raw = self.fetch_url(url).await.map_err(VManageError::query)?;
        let records = raw
            .into_iter()
            .map(EventRecord::from_raw)
            .collect::<Result<Vec<_>>>()
            .map_err(VManageError::query)?;

        debug!("Event query returned {} records", records.len());
        Ok(records)
    }
}

/// `{base}dataservice/event?query=<url-encoded filter>`
pub fn event_url(base_url: &BaseUrl, filter: &EventFilter) -> Result<Url> {
    let mut url = base_url.join(endpoint::EVENT_PATH)?;
    url.query_pairs_mut()
        .append_pair("query", &filter.to_query_json()?);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_event_url_encodes_filter() {
        let base = BaseUrl::parse("https://vmanage.example.com:8443").unwrap();
        let filter = EventFilter::default();
        let url = event_url(&base, &filter).unwrap();

        assert_eq!(url.path(), "/dataservice/event");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "query");
        assert_eq!(value, filter.to_query_json().unwrap());
        assert!(!url.query().unwrap().contains('"'));
    }

    #[tokio::test]
    async fn test_query_events() {
        let server = MockServer::start().await;
        let session = testing::session(&server).await;
        let filter = EventFilter::builder()
            .hours(2)
            .system_ip("10.255.0.1")
            .build();

        Mock::given(method("GET"))
            .and(path("/dataservice/event"))
            .and(query_param("query", filter.to_query_json().unwrap().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "entry_time": 0,
                    "eventname": "control-connection-state-change",
                    "system_ip": "10.255.0.1",
                    "details": "{\"peer-type\":\"vsmart\"}"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = session.events(&filter).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp.unwrap().timestamp_millis(), 0);
        assert_eq!(records[0].event_details, Some(json!({"peer-type": "vsmart"})));
        assert_eq!(records[0].event_name(), Some("control-connection-state-change"));
    }

    #[tokio::test]
    async fn test_query_events_empty() {
        let server = MockServer::start().await;
        let session = testing::session(&server).await;

        Mock::given(method("GET"))
            .and(path("/dataservice/event"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let records = session.events(&EventFilter::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_events_blank_payload() {
        let server = MockServer::start().await;
        let session = testing::session(&server).await;

        Mock::given(method("GET"))
            .and(path("/dataservice/event"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ""})))
            .mount(&server)
            .await;

        let records = session.events(&EventFilter::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_wraps_fetch_failure() {
        let server = MockServer::start().await;
        let session = testing::session(&server).await;

        Mock::given(method("GET"))
            .and(path("/dataservice/event"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
            .mount(&server)
            .await;

        let err = session.events(&EventFilter::default()).await.unwrap_err();
        match err {
            VManageError::Query(inner) => assert!(matches!(*inner, VManageError::Fetch(_))),
            other => panic!("expected query error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_rejects_insecure_base() {
        let server = MockServer::start().await;
        let session = testing::session(&server).await;

        let err = session
            .query_events(&server.uri(), &EventFilter::default())
            .await
            .unwrap_err();
        assert!(err.is_url_error());
    }
}
