use crate::config::SentinelConfig;
use crate::error::{AgroRiskError, Result};
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

const HUB_URL: &str = "https://services.sentinel-hub.com";

/// WMS bounding box in EPSG:4326 axis order: south, west, north, east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl FromStr for BoundingBox {
    type Err = AgroRiskError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| AgroRiskError::InvalidData(format!("bbox '{}': {}", s, e)))?;

        let [south, west, north, east] = parts[..] else {
            return Err(AgroRiskError::InvalidData(format!(
                "bbox '{}' must have 4 values: south,west,north,east",
                s
            )));
        };

        if south >= north || west >= east {
            return Err(AgroRiskError::InvalidData(format!(
                "bbox '{}' is empty or inverted",
                s
            )));
        }

        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// Inclusive acquisition date range, `YYYY-MM-DD/YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FromStr for TimeRange {
    type Err = AgroRiskError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('/').ok_or_else(|| {
            AgroRiskError::InvalidData(format!("time range '{}' must be start/end", s))
        })?;

        let parse = |d: &str| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|e| AgroRiskError::InvalidData(format!("date '{}': {}", d, e)))
        };
        let start = parse(start)?;
        let end = parse(end)?;

        if start > end {
            return Err(AgroRiskError::InvalidData(format!(
                "time range '{}' ends before it starts",
                s
            )));
        }

        Ok(Self { start, end })
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// What to request from the WMS endpoint.
#[derive(Debug, Clone)]
pub struct NdviRequest {
    pub bbox: BoundingBox,
    pub size_px: u32,
    pub time: TimeRange,
}

impl NdviRequest {
    pub fn from_config(config: &SentinelConfig) -> Result<Self> {
        Ok(Self {
            bbox: config.bbox.parse()?,
            size_px: config.size_px,
            time: config.time_range.parse()?,
        })
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth2 client-credentials client for Sentinel Hub NDVI rasters.
pub struct SentinelHubClient {
    client: reqwest::Client,
    config: SentinelConfig,
    hub_url: String,
}

impl SentinelHubClient {
    pub fn new(config: SentinelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            hub_url: HUB_URL.to_string(),
        }
    }

    pub async fn access_token(&self) -> Result<String> {
        let payload = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };

        let response = self
            .client
            .post(format!("{}/oauth/token", self.hub_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AgroRiskError::DataSourceUnavailable(format!("Sentinel Hub: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgroRiskError::DataSourceUnavailable(format!(
                "Sentinel Hub token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AgroRiskError::DataSourceUnavailable(format!(
                "Failed to parse Sentinel Hub token response: {}",
                e
            ))
        })?;

        Ok(token.access_token)
    }

    /// WMS GetMap URL for a rendered NDVI PNG.
    pub fn ndvi_url(&self, request: &NdviRequest) -> Result<Url> {
        let base = format!("{}/ogc/wms/{}", self.hub_url, self.config.instance_id);
        let size = request.size_px.to_string();
        let bbox = request.bbox.to_string();
        let time = request.time.to_string();

        let params = [
            ("SERVICE", "WMS"),
            ("REQUEST", "GetMap"),
            ("LAYERS", "NDVI"),
            ("MAXCC", "20"),
            ("WIDTH", size.as_str()),
            ("HEIGHT", size.as_str()),
            ("BBOX", bbox.as_str()),
            ("FORMAT", "image/png"),
            ("CRS", "EPSG:4326"),
            ("TIME", time.as_str()),
            ("SHOWLOGO", "false"),
        ];

        Url::parse_with_params(&base, &params)
            .map_err(|e| AgroRiskError::Config(format!("Invalid Sentinel Hub URL: {}", e)))
    }

    pub async fn fetch_ndvi(&self, token: &str, request: &NdviRequest) -> Result<Vec<u8>> {
        let url = self.ndvi_url(request)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AgroRiskError::DataSourceUnavailable(format!("Sentinel Hub: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgroRiskError::DataSourceUnavailable(format!(
                "Sentinel Hub WMS returned {}: {}",
                status, body
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Authenticate, fetch the raster and write the raw bytes to `path`.
    pub async fn download(&self, request: &NdviRequest, path: &Path) -> Result<usize> {
        let token = self.access_token().await?;
        let bytes = self.fetch_ndvi(&token, request).await?;
        tokio::fs::write(path, &bytes).await?;
        tracing::info!("NDVI image saved to {:?} ({} bytes)", path, bytes.len());
        Ok(bytes.len())
    }
}
