// InfluxDB line-protocol encoding and the HTTP writer.
//
// One report accumulates into one `LineBatch`, committed with a single
// POST after the channel drains. Supports both the v1 (`/write?db=`)
// and v2 (`/api/v2/write?org=&bucket=`) write paths.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

use unipoll_core::{FieldValue, Point, PollerError};

/// Accumulates encoded points for one report.
#[derive(Debug, Default)]
pub(crate) struct LineBatch {
    buf: String,
    pub points: usize,
}

impl LineBatch {
    /// Encode one point and append it to the batch.
    ///
    /// A point without fields cannot be represented in line protocol;
    /// that is the one encoding failure mode.
    pub fn add(&mut self, point: &Point, default_ts: DateTime<Utc>) -> Result<(), PollerError> {
        if point.fields.is_empty() {
            return Err(PollerError::Sink(format!(
                "point {} has no fields",
                point.table
            )));
        }

        self.buf.push_str(&escape_measurement(&point.table));

        for (key, value) in &point.tags {
            self.buf.push(',');
            self.buf.push_str(&escape_tag(key));
            self.buf.push('=');
            self.buf.push_str(&escape_tag(value));
        }

        let mut first = true;
        for (key, value) in &point.fields {
            self.buf.push(if first { ' ' } else { ',' });
            first = false;

            self.buf.push_str(&escape_tag(key));
            self.buf.push('=');
            encode_field(&mut self.buf, value);
        }

        let ts = point.ts.unwrap_or(default_ts);
        self.buf.push(' ');
        self.buf
            .push_str(&ts.timestamp_nanos_opt().unwrap_or_default().to_string());
        self.buf.push('\n');

        self.points += 1;

        Ok(())
    }

    pub fn body(&self) -> &str {
        &self.buf
    }
}

fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_tag(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

fn encode_field(buf: &mut String, value: &FieldValue) {
    match value {
        FieldValue::F64(v) => buf.push_str(&v.to_string()),
        FieldValue::I64(v) => {
            buf.push_str(&v.to_string());
            buf.push('i');
        }
        FieldValue::Bool(v) => buf.push_str(if *v { "true" } else { "false" }),
        FieldValue::Text(v) => {
            buf.push('"');
            buf.push_str(&v.replace('\\', "\\\\").replace('"', "\\\""));
            buf.push('"');
        }
    }
}

// ── HTTP writer ──────────────────────────────────────────────────────

/// Which write path the configured server speaks.
#[derive(Debug, Clone)]
pub(crate) enum ServerVersion {
    V1 {
        db: String,
        user: String,
        pass: String,
    },
    V2 {
        org: String,
        bucket: String,
        token: String,
    },
}

/// Commits line-protocol batches over HTTP.
pub(crate) struct InfluxWriter {
    http: reqwest::Client,
    url: Url,
    version: ServerVersion,
}

impl InfluxWriter {
    pub fn new(url: Url, version: ServerVersion, verify_ssl: bool) -> Result<Self, PollerError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PollerError::Sink(format!("building influx client: {e}")))?;

        Ok(Self { http, url, version })
    }

    fn write_url(&self) -> Result<Url, PollerError> {
        let join = |path: &str| {
            self.url
                .join(path)
                .map_err(|e| PollerError::Sink(format!("influx url: {e}")))
        };

        match &self.version {
            ServerVersion::V1 { db, user, pass } => {
                let mut url = join("write")?;
                url.query_pairs_mut()
                    .append_pair("db", db)
                    .append_pair("u", user)
                    .append_pair("p", pass)
                    .append_pair("precision", "ns");
                Ok(url)
            }
            ServerVersion::V2 { org, bucket, .. } => {
                let mut url = join("api/v2/write")?;
                url.query_pairs_mut()
                    .append_pair("org", org)
                    .append_pair("bucket", bucket)
                    .append_pair("precision", "ns");
                Ok(url)
            }
        }
    }

    /// Commit one batch. Called exactly once per report.
    pub async fn write(&self, batch: &LineBatch) -> Result<(), PollerError> {
        if batch.points == 0 {
            return Ok(());
        }

        let mut req = self
            .http
            .post(self.write_url()?)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(batch.body().to_owned());

        if let ServerVersion::V2 { token, .. } = &self.version {
            req = req.header("Authorization", format!("Token {token}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| PollerError::Sink(format!("influxdb write: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PollerError::Sink(format!(
                "influxdb write: HTTP {status}: {}",
                body.trim()
            )));
        }

        Ok(())
    }

    /// Health probe: `/ping` answers 204 on both server generations.
    pub async fn ping(&self) -> Result<(), PollerError> {
        let url = self
            .url
            .join("ping")
            .map_err(|e| PollerError::Sink(format!("influx url: {e}")))?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PollerError::Sink(format!("influxdb ping: {e}")))?;

        match resp.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            status => Err(PollerError::Sink(format!("influxdb ping: HTTP {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use unipoll_core::point::{fields, tags};

    fn ts() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("ts")
    }

    #[test]
    fn encodes_tags_fields_and_timestamp() {
        let mut batch = LineBatch::default();
        let point = Point {
            table: "usw".into(),
            tags: tags([("mac", "aa:bb".to_owned()), ("site name", "home lab".to_owned())]),
            fields: fields([
                ("rx_bytes", FieldValue::I64(42)),
                ("cpu", FieldValue::F64(1.5)),
                ("up", FieldValue::Bool(true)),
                ("ip", FieldValue::Text("10.0.0.2".into())),
            ]),
            ts: None,
        };

        batch.add(&point, ts()).expect("encode");

        assert_eq!(
            batch.body(),
            "usw,mac=aa:bb,site\\ name=home\\ lab cpu=1.5,ip=\"10.0.0.2\",rx_bytes=42i,up=true 1700000000000000000\n"
        );
        assert_eq!(batch.points, 1);
    }

    #[test]
    fn fieldless_point_is_an_error() {
        let mut batch = LineBatch::default();
        assert!(batch.add(&Point::new("empty"), ts()).is_err());
        assert_eq!(batch.points, 0);
    }

    #[test]
    fn string_fields_escape_quotes() {
        let mut batch = LineBatch::default();
        let point = Point {
            table: "unifi_events".into(),
            fields: fields([("msg", FieldValue::Text("say \"hi\"".into()))]),
            ..Point::default()
        };

        batch.add(&point, ts()).expect("encode");
        assert!(batch.body().contains("msg=\"say \\\"hi\\\"\""));
    }
}
