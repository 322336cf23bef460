use crate::domain_model::{Credential, ItemId, SearchFilters, SearchItem, SiteId};
use crate::domain_port::{GatewayError, SearchGateway};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Official MercadoLibre search API, first page only. One outbound GET per
/// call; no internal pagination or retries.
pub struct MeliSearchGateway {
    http: reqwest::Client,
    api_base: String,
    sort: String,
    limit: u32,
}

impl MeliSearchGateway {
    pub fn try_new(
        api_base: impl Into<String>,
        sort: impl Into<String>,
        limit: u32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(MeliSearchGateway {
            http,
            api_base: api_base.into(),
            sort: sort.into(),
            limit,
        })
    }
}

#[async_trait::async_trait]
impl SearchGateway for MeliSearchGateway {
    async fn search(
        &self,
        query: &str,
        site: &SiteId,
        filters: &SearchFilters,
        credential: &Credential,
    ) -> Result<Vec<SearchItem>, GatewayError> {
        let url = format!("{}/sites/{}/search", self.api_base, site);
        let limit = self.limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("sort", self.sort.as_str()),
                ("limit", limit.as_str()),
            ])
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let page: SearchPage = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;
        debug!("search '{}' on {} returned {} result(s)", query, site, page.results.len());

        let items: Vec<SearchItem> = page.results.into_iter().map(RawItem::normalize).collect();
        Ok(filters.apply(items))
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<RawItem>,
}

/// Provider result shape, reduced to the fields we surface.
#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    title: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    currency_id: Option<String>,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    shipping: Option<RawShipping>,
}

#[derive(Debug, Deserialize)]
struct RawShipping {
    #[serde(default)]
    free_shipping: bool,
}

impl RawItem {
    fn normalize(self) -> SearchItem {
        SearchItem {
            id: ItemId(self.id),
            title: self.title,
            price: self.price,
            currency_id: self.currency_id,
            permalink: self.permalink,
            thumbnail: self.thumbnail,
            condition: self.condition,
            free_shipping: self.shipping.map(|s| s.free_shipping),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_a_provider_result_page() {
        let payload = serde_json::json!({
            "site_id": "MCO",
            "paging": { "total": 1, "limit": 20 },
            "results": [{
                "id": "MCO123",
                "title": "Raspberry Pi 4",
                "price": 250000.0,
                "currency_id": "COP",
                "permalink": "https://articulo.mercadolibre.com.co/MCO123",
                "thumbnail": "https://http2.mlstatic.com/MCO123.jpg",
                "condition": "new",
                "shipping": { "free_shipping": true },
                "unrelated_field": 42
            }]
        });

        let page: SearchPage = serde_json::from_value(payload).unwrap();
        let items: Vec<SearchItem> = page.results.into_iter().map(RawItem::normalize).collect();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id.0, "MCO123");
        assert_eq!(item.price, 250000.0);
        assert_eq!(item.condition.as_deref(), Some("new"));
        assert_eq!(item.free_shipping, Some(true));
    }

    #[test]
    fn missing_optional_fields_do_not_fail_normalization() {
        let payload = serde_json::json!({
            "results": [{ "id": "MCO9", "title": "bare item" }]
        });
        let page: SearchPage = serde_json::from_value(payload).unwrap();
        let item = page.results.into_iter().map(RawItem::normalize).next().unwrap();
        assert_eq!(item.price, 0.0);
        assert!(item.free_shipping.is_none());
    }
}
