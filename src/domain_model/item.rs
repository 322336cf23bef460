use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned listing id, globally unique per provider.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace site, e.g. "MCO" for Colombia.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SiteId(pub String);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One normalized search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: ItemId,
    pub title: String,
    pub price: f64,
    pub currency_id: Option<String>,
    pub permalink: String,
    pub thumbnail: Option<String>,
    pub condition: Option<String>,
    pub free_shipping: Option<bool>,
}

/// Client-side post-filters over a normalized batch. Applying them never
/// reorders the batch or touches provider semantics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub condition: Option<String>,
    pub shipping: Option<String>,
}

impl SearchFilters {
    pub fn apply(&self, items: Vec<SearchItem>) -> Vec<SearchItem> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }

    fn matches(&self, item: &SearchItem) -> bool {
        if let Some(min) = self.min_price {
            if item.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            // max is inclusive
            if item.price > max {
                return false;
            }
        }
        if let Some(wanted) = &self.condition {
            match &item.condition {
                Some(condition) if condition.eq_ignore_ascii_case(wanted) => {}
                _ => return false,
            }
        }
        if let Some(shipping) = &self.shipping {
            if wants_free_shipping(shipping) && item.free_shipping != Some(true) {
                return false;
            }
        }
        true
    }
}

fn wants_free_shipping(value: &str) -> bool {
    value.eq_ignore_ascii_case("free") || value.eq_ignore_ascii_case("gratis")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64) -> SearchItem {
        SearchItem {
            id: ItemId(id.to_string()),
            title: format!("item {id}"),
            price,
            currency_id: Some("COP".to_string()),
            permalink: format!("https://example.com/{id}"),
            thumbnail: None,
            condition: Some("new".to_string()),
            free_shipping: Some(false),
        }
    }

    #[test]
    fn max_price_is_inclusive_and_order_preserving() {
        let filters = SearchFilters {
            max_price: Some(300.0),
            ..Default::default()
        };
        let batch = vec![item("a", 100.0), item("b", 250.0), item("c", 500.0)];
        let kept = filters.apply(batch);
        let prices: Vec<f64> = kept.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![100.0, 250.0]);
    }

    #[test]
    fn boundary_price_is_kept() {
        let filters = SearchFilters {
            max_price: Some(250.0),
            ..Default::default()
        };
        assert_eq!(filters.apply(vec![item("b", 250.0)]).len(), 1);
    }

    #[test]
    fn condition_filter_is_case_insensitive() {
        let filters = SearchFilters {
            condition: Some("NEW".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.apply(vec![item("a", 10.0)]).len(), 1);

        let filters = SearchFilters {
            condition: Some("used".to_string()),
            ..Default::default()
        };
        assert!(filters.apply(vec![item("a", 10.0)]).is_empty());
    }

    #[test]
    fn free_shipping_filter_requires_the_flag() {
        let filters = SearchFilters {
            shipping: Some("free".to_string()),
            ..Default::default()
        };
        let mut free = item("a", 10.0);
        free.free_shipping = Some(true);
        let kept = filters.apply(vec![free, item("b", 10.0)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.0, "a");
    }
}
