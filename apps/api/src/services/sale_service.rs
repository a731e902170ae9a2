//! Sale transaction processor.
//!
//! Validates sale lines up front, then hands them to
//! [`SaleRepository::record_sale`](tally_db::SaleRepository::record_sale),
//! which does all the work inside one database transaction.

use tally_core::validation::{validate_id, validate_sale_lines};
use tally_core::{CoreError, CoreResult, Money, SaleDetails, SaleLine};
use tally_db::{Database, DbError};
use tracing::{info, warn};

use super::store_error;

/// Sale recording and reporting.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Records a sale for `manager_id` and returns its id.
    ///
    /// Either the header, every position and every stock decrement are
    /// committed together, or nothing is.
    pub async fn record_sale(
        &self,
        manager_id: i64,
        customer_id: i64,
        lines: &[SaleLine],
    ) -> CoreResult<i64> {
        validate_id("customer_id", customer_id)?;
        validate_sale_lines(lines)?;

        let sale_id = self
            .db
            .sales()
            .record_sale(manager_id, customer_id, lines)
            .await
            .map_err(|e| match e {
                DbError::NotFound { entity, id } if entity == "Customer" => {
                    CoreError::CustomerNotFound(id)
                }
                DbError::NotFound { entity, id } if entity == "Product" => {
                    CoreError::ProductNotFound(id)
                }
                DbError::StockExhausted {
                    product_id,
                    available,
                    requested,
                } => {
                    warn!(product_id, available, requested, "Sale rejected: insufficient stock");
                    CoreError::InsufficientStock {
                        product_id,
                        available,
                        requested,
                    }
                }
                other => store_error("record sale", other),
            })?;

        info!(sale_id, manager_id, customer_id, positions = lines.len(), "Sale recorded");

        Ok(sale_id)
    }

    /// Sum of `qty * price` over every position of the manager's sales.
    ///
    /// A manager without sales gets `NoSales` rather than zero.
    pub async fn manager_sales_total(&self, manager_id: i64) -> CoreResult<Money> {
        self.db
            .sales()
            .manager_total(manager_id)
            .await
            .map_err(|e| store_error("sales total", e))?
            .ok_or(CoreError::NoSales(manager_id))
    }

    /// One sale with its positions, visible only to the manager who made it.
    pub async fn get_sale(&self, manager_id: i64, sale_id: i64) -> CoreResult<SaleDetails> {
        let sales = self.db.sales();

        let sale = sales
            .get_by_id(sale_id)
            .await
            .map_err(|e| store_error("get sale", e))?
            .filter(|sale| sale.manager_id == manager_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        let positions = sales
            .get_positions(sale_id)
            .await
            .map_err(|e| store_error("get sale positions", e))?;

        Ok(SaleDetails::new(sale, positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{ValidationError, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE};
    use tally_db::testing::{
        fixture_database, fixture_database_with, TempDbFile, ADMIN_ID, CASHIER_ID, CUSTOMER_ID,
        PRODUCT_ID, SECOND_PRODUCT_ID,
    };
    use tally_db::DbConfig;

    async fn service() -> SaleService {
        SaleService::new(fixture_database().await.unwrap())
    }

    fn line(product_id: i64, quantity: i64, price: i64) -> SaleLine {
        SaleLine::new(product_id, quantity, Money::from_minor(price))
    }

    async fn stock(service: &SaleService, id: i64) -> i64 {
        service.db.products().stock(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_record_sale_decrements_stock() {
        let service = service().await;

        let sale_id = service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(PRODUCT_ID, 3, 100)])
            .await
            .unwrap();

        assert_eq!(stock(&service, PRODUCT_ID).await, 2);

        let details = service.get_sale(ADMIN_ID, sale_id).await.unwrap();
        assert_eq!(details.positions.len(), 1);
        assert_eq!(details.positions[0].qty, 3);
        assert_eq!(details.positions[0].price, Money::from_minor(100));
        assert_eq!(details.total, Money::from_minor(300));
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back() {
        let service = service().await;

        let err = service
            .record_sale(
                ADMIN_ID,
                CUSTOMER_ID,
                &[line(PRODUCT_ID, 2, 100), line(404, 1, 10)],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(ref id) if id == "404"));
        assert_eq!(stock(&service, PRODUCT_ID).await, 5);
        assert_eq!(service.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock() {
        let service = service().await;

        let err = service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(PRODUCT_ID, 6, 100)])
            .await
            .unwrap_err();

        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, PRODUCT_ID);
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock(&service, PRODUCT_ID).await, 5);
        assert_eq!(service.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let service = service().await;

        let err = service
            .record_sale(ADMIN_ID, 999, &[line(PRODUCT_ID, 1, 100)])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::CustomerNotFound(_)));
        assert_eq!(stock(&service, PRODUCT_ID).await, 5);
    }

    #[tokio::test]
    async fn test_invalid_lines_rejected_before_storage() {
        let service = service().await;

        let err = service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));

        let err = service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(PRODUCT_ID, 0, 100)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(PRODUCT_ID, 1, -1)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_manager_sales_total() {
        let service = service().await;

        let err = service.manager_sales_total(ADMIN_ID).await.unwrap_err();
        assert!(matches!(err, CoreError::NoSales(id) if id == ADMIN_ID));

        service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(PRODUCT_ID, 3, 100)])
            .await
            .unwrap();
        service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(SECOND_PRODUCT_ID, 2, 350)])
            .await
            .unwrap();

        let total = service.manager_sales_total(ADMIN_ID).await.unwrap();
        assert_eq!(total, Money::from_minor(1000));

        assert!(matches!(
            service.manager_sales_total(CASHIER_ID).await,
            Err(CoreError::NoSales(_))
        ));
    }

    #[tokio::test]
    async fn test_get_sale_hides_other_managers_sales() {
        let service = service().await;

        let sale_id = service
            .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(PRODUCT_ID, 1, 100)])
            .await
            .unwrap();

        let err = service.get_sale(CASHIER_ID, sale_id).await.unwrap_err();
        assert!(matches!(err, CoreError::SaleNotFound(_)));

        let err = service.get_sale(ADMIN_ID, 999).await.unwrap_err();
        assert!(matches!(err, CoreError::SaleNotFound(_)));
    }

    #[tokio::test]
    async fn test_huge_price_rejected_before_storage() {
        let service = service().await;

        let err = service
            .record_sale(
                ADMIN_ID,
                CUSTOMER_ID,
                &[line(PRODUCT_ID, 2, i64::MAX / 2 + 1)],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, max, .. })
                if field == "price" && max == MAX_UNIT_PRICE
        ));
        assert_eq!(stock(&service, PRODUCT_ID).await, 5);
        assert_eq!(service.db.sales().count().await.unwrap(), 0);
        assert!(matches!(
            service.manager_sales_total(ADMIN_ID).await,
            Err(CoreError::NoSales(_))
        ));
    }

    #[tokio::test]
    async fn test_largest_allowed_line_keeps_exact_totals() {
        let service = service().await;
        service
            .db
            .products()
            .update(
                PRODUCT_ID,
                &tally_core::ProductInput {
                    id: Some(PRODUCT_ID),
                    name: "Milk".to_string(),
                    price: Money::from_minor(100),
                    qty: MAX_ITEM_QUANTITY,
                    active: true,
                },
            )
            .await
            .unwrap();

        let sale_id = service
            .record_sale(
                ADMIN_ID,
                CUSTOMER_ID,
                &[line(PRODUCT_ID, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE)],
            )
            .await
            .unwrap();

        let expected = Money::from_minor(MAX_UNIT_PRICE * MAX_ITEM_QUANTITY);
        assert_eq!(service.manager_sales_total(ADMIN_ID).await.unwrap(), expected);
        assert_eq!(service.get_sale(ADMIN_ID, sale_id).await.unwrap().total, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() {
        let file = TempDbFile::new("sale-service");
        let db = fixture_database_with(DbConfig::new(file.path()).max_connections(8))
            .await
            .unwrap();
        let service = SaleService::new(db.clone());

        // 8 sales of 3 loaves against a stock of 20: six fit
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .record_sale(ADMIN_ID, CUSTOMER_ID, &[line(SECOND_PRODUCT_ID, 3, 350)])
                        .await
                })
            })
            .collect();

        let mut recorded = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => recorded += 1,
                Err(CoreError::InsufficientStock { requested: 3, .. }) => refused += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(recorded, 6);
        assert_eq!(refused, 2);
        assert_eq!(stock(&service, SECOND_PRODUCT_ID).await, 2);
        assert_eq!(
            service.manager_sales_total(ADMIN_ID).await.unwrap(),
            Money::from_minor(6 * 3 * 350)
        );

        db.close().await;
    }
}
