//! In-process product browse pipeline.
//!
//! Storefront browsing filters, sorts and paginates the already-loaded
//! product list in memory; result sets are small enough that a single
//! pass per criterion is the whole story.

use crate::entities::product;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSort {
    LowToHigh,
    HighToLow,
}

/// Storefront browse parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    pub category: Option<String>,
    /// Whole-star filter: keeps products with rating in [r, r+1)
    pub rating: Option<i32>,
    pub search: Option<String>,
    pub low_price: Option<Decimal>,
    pub high_price: Option<Decimal>,
    pub sort: Option<PriceSort>,
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

/// Chainable filter pipeline over a product list.
#[derive(Debug)]
pub struct ProductQuery {
    products: Vec<product::Model>,
}

impl ProductQuery {
    pub fn new(products: Vec<product::Model>) -> Self {
        Self { products }
    }

    pub fn filter_category(mut self, category: Option<&str>) -> Self {
        if let Some(category) = category {
            self.products.retain(|p| p.category == category);
        }
        self
    }

    /// Keeps products whose rating falls in the whole-star band [r, r+1).
    pub fn filter_rating(mut self, rating: Option<i32>) -> Self {
        if let Some(rating) = rating {
            let low = Decimal::from(rating);
            let high = Decimal::from(rating + 1);
            self.products.retain(|p| p.rating >= low && p.rating < high);
        }
        self
    }

    /// Case-insensitive substring match on the product name.
    pub fn filter_search(mut self, term: Option<&str>) -> Self {
        if let Some(term) = term {
            let needle = term.to_uppercase();
            self.products
                .retain(|p| p.name.to_uppercase().contains(&needle));
        }
        self
    }

    /// Inclusive price range; either bound may be absent.
    pub fn filter_price(mut self, low: Option<Decimal>, high: Option<Decimal>) -> Self {
        if let Some(low) = low {
            self.products.retain(|p| p.price >= low);
        }
        if let Some(high) = high {
            self.products.retain(|p| p.price <= high);
        }
        self
    }

    pub fn sort_price(mut self, sort: Option<PriceSort>) -> Self {
        match sort {
            Some(PriceSort::LowToHigh) => self.products.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(PriceSort::HighToLow) => self.products.sort_by(|a, b| b.price.cmp(&a.price)),
            None => {}
        }
        self
    }

    /// Number of products matching the filters applied so far.
    pub fn count(&self) -> usize {
        self.products.len()
    }

    /// One-based pagination over the filtered list.
    pub fn paginate(self, page: u64, per_page: u64) -> Vec<product::Model> {
        let skip = (page.saturating_sub(1) * per_page) as usize;
        self.products
            .into_iter()
            .skip(skip)
            .take(per_page as usize)
            .collect()
    }

    pub fn into_inner(self) -> Vec<product::Model> {
        self.products
    }
}

/// Applies the full browse pipeline; returns the page and the total
/// matching count (before pagination).
pub fn browse(
    products: Vec<product::Model>,
    query: &BrowseQuery,
    per_page: u64,
) -> (Vec<product::Model>, usize) {
    let filtered = ProductQuery::new(products)
        .filter_category(query.category.as_deref())
        .filter_rating(query.rating)
        .filter_price(query.low_price, query.high_price)
        .filter_search(query.search.as_deref())
        .sort_price(query.sort);

    let total = filtered.count();
    let page = filtered.paginate(query.page.max(1), per_page);
    (page, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn product(name: &str, category: &str, price: Decimal, rating: Decimal) -> product::Model {
        product::Model {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            shop_name: "Test Shop".to_string(),
            category: category.to_string(),
            description: String::new(),
            brand: "Acme".to_string(),
            price,
            discount: 0,
            stock: 10,
            rating,
            images: serde_json::json!([]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture() -> Vec<product::Model> {
        vec![
            product("Blue Kettle", "kitchen", dec!(40), dec!(4.5)),
            product("Red Kettle", "kitchen", dec!(25), dec!(3.9)),
            product("Desk Lamp", "office", dec!(60), dec!(4.0)),
            product("Notebook", "office", dec!(5), dec!(2.2)),
        ]
    }

    #[test]
    fn category_filter_keeps_exact_matches() {
        let result = ProductQuery::new(fixture())
            .filter_category(Some("kitchen"))
            .into_inner();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.category == "kitchen"));
    }

    #[test]
    fn rating_filter_is_half_open_band() {
        // rating 4 keeps [4, 5): 4.5 and 4.0, not 3.9
        let result = ProductQuery::new(fixture())
            .filter_rating(Some(4))
            .into_inner();
        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Kettle", "Desk Lamp"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let result = ProductQuery::new(fixture())
            .filter_search(Some("kettle"))
            .into_inner();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn price_range_is_inclusive() {
        let result = ProductQuery::new(fixture())
            .filter_price(Some(dec!(25)), Some(dec!(60)))
            .into_inner();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn sorting_orders_by_price() {
        let result = ProductQuery::new(fixture())
            .sort_price(Some(PriceSort::LowToHigh))
            .into_inner();
        let prices: Vec<_> = result.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![dec!(5), dec!(25), dec!(40), dec!(60)]);
    }

    #[test]
    fn pagination_reports_pre_page_total() {
        let query = BrowseQuery {
            sort: Some(PriceSort::HighToLow),
            page: 2,
            ..Default::default()
        };
        let (page, total) = browse(fixture(), &query, 3);
        assert_eq!(total, 4);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].price, dec!(5));
    }

    #[test]
    fn filters_compose() {
        let query = BrowseQuery {
            category: Some("office".to_string()),
            low_price: Some(dec!(10)),
            ..Default::default()
        };
        let (page, total) = browse(fixture(), &query, 16);
        assert_eq!(total, 1);
        assert_eq!(page[0].name, "Desk Lamp");
    }
}
