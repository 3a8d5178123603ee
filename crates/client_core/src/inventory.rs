//! Values derived from the loaded product list for display.

use shared::domain::Product;

/// Visual bucket for a stock quantity. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockTier {
    Low,
    Medium,
    High,
}

impl StockTier {
    pub const MEDIUM_FROM: i64 = 10;
    pub const HIGH_FROM: i64 = 30;

    pub fn for_stock(stock: i64) -> Self {
        if stock < Self::MEDIUM_FROM {
            Self::Low
        } else if stock < Self::HIGH_FROM {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InventoryStats {
    pub product_count: usize,
    pub total_value: f64,
    pub total_stock: i64,
}

impl InventoryStats {
    pub fn compute(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |acc, product| Self {
            product_count: acc.product_count + 1,
            total_value: acc.total_value + product.price * product.stock as f64,
            total_stock: acc.total_stock.saturating_add(product.stock),
        })
    }
}

/// One table row: the product plus its display tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub product: Product,
    pub tier: StockTier,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
            tier: StockTier::for_stock(product.stock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ProductId;

    fn product(price: f64, stock: i64) -> Product {
        Product {
            id: ProductId(1),
            name: "item".into(),
            price,
            description: None,
            stock,
            created_at: None,
        }
    }

    #[test]
    fn stock_tier_boundaries() {
        assert_eq!(StockTier::for_stock(0), StockTier::Low);
        assert_eq!(StockTier::for_stock(9), StockTier::Low);
        assert_eq!(StockTier::for_stock(10), StockTier::Medium);
        assert_eq!(StockTier::for_stock(29), StockTier::Medium);
        assert_eq!(StockTier::for_stock(30), StockTier::High);
    }

    #[test]
    fn stats_sum_value_and_stock() {
        let stats = InventoryStats::compute(&[product(10.0, 2), product(5.0, 3)]);
        assert_eq!(stats.product_count, 2);
        assert_eq!(stats.total_value, 35.0);
        assert_eq!(stats.total_stock, 5);
    }

    #[test]
    fn stats_stock_total_saturates_instead_of_overflowing() {
        let huge = i64::MAX / 2 + 1;
        let stats = InventoryStats::compute(&[product(1.0, huge), product(1.0, huge)]);
        assert_eq!(stats.product_count, 2);
        assert_eq!(stats.total_stock, i64::MAX);
        assert!(stats.total_value.is_finite());
    }

    #[test]
    fn stats_of_empty_list_are_zero() {
        let stats = InventoryStats::compute(&[]);
        assert_eq!(stats, InventoryStats::default());
        assert_eq!(stats.product_count, 0);
        assert_eq!(stats.total_value, 0.0);
        assert_eq!(stats.total_stock, 0);
    }
}
