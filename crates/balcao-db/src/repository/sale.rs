//! # Sale Repository
//!
//! Database operations for sales and the items they own.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── create() → Sale { total: 0.0, finalized: false }               │
//! │         sale_time = São Paulo wall clock, no offset                    │
//! │                                                                         │
//! │  2. EDIT ITEMS (one transaction each)                                  │
//! │     └── add_item() / update_item() / remove_item() / clear_items()     │
//! │         subtotal = quantity × unit_price                               │
//! │         total    = Σ subtotal                                          │
//! │                                                                         │
//! │  3. FINALIZE                                                           │
//! │     └── finalize() → Sale { finalized: true, customer, payment }       │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → items first, then the sale, same transaction        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every item mutation recomputes the affected subtotal and the sale total
//! before committing, so stored totals never drift from the items.
//! [`SaleRepository::recompute_total`] stays available for rows written by
//! other means.

use chrono_tz::Tz;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use balcao_core::clock;
use balcao_core::{NewSale, NewSaleItem, Sale, SaleCheckout, SaleItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    sale_timezone: Tz,
}

impl SaleRepository {
    /// Creates a new SaleRepository stamping sales in `sale_timezone`.
    pub fn new(pool: SqlitePool, sale_timezone: Tz) -> Self {
        SaleRepository {
            pool,
            sale_timezone,
        }
    }

    /// Opens a new sale.
    ///
    /// When the draft has no sale time, the current civil time of the
    /// configured zone is used.
    pub async fn create(&self, draft: NewSale) -> DbResult<Sale> {
        let tz = self.sale_timezone;
        let sale = draft.open(|| clock::sale_time_now_in(tz))?;

        debug!(id = %sale.id, sale_time = ?sale.sale_time, "Creating sale");

        let mut conn = self.pool.acquire().await?;
        insert_sale(&mut conn, &sale).await?;

        Ok(sale)
    }

    /// Gets a sale by ID, with its items in insertion order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        fetch_sale(&mut conn, id).await
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, sale_id).await
    }

    /// Finalized sales, newest first. This is the sales history view.
    pub async fn list_finalized(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let mut conn = self.pool.acquire().await?;

        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sale_time, total, finalized, customer_name, payment_method
            FROM sales
            WHERE finalized = 1
            ORDER BY sale_time DESC, rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        for sale in &mut sales {
            sale.items = fetch_items(&mut conn, &sale.id).await?;
        }

        debug!(count = sales.len(), "Listed finalized sales");
        Ok(sales)
    }

    /// The most recently opened sale that is not finalized, if any.
    pub async fn current_open(&self) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sale_time, total, finalized, customer_name, payment_method
            FROM sales
            WHERE finalized = 0
            ORDER BY sale_time DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *conn)
        .await?;

        match sale {
            Some(mut sale) => {
                sale.items = fetch_items(&mut conn, &sale.id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Discards every open sale (items included) and opens a fresh one.
    pub async fn reset_open(&self) -> DbResult<Sale> {
        let tz = self.sale_timezone;
        let sale = NewSale::default().open(|| clock::sale_time_now_in(tz))?;

        let mut tx = self.pool.begin().await?;

        let open_ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM sales WHERE finalized = 0")
                .fetch_all(&mut *tx)
                .await?;

        for id in &open_ids {
            delete_sale_rows(&mut tx, id).await?;
        }
        insert_sale(&mut tx, &sale).await?;

        commit(tx).await?;

        info!(discarded = open_ids.len(), id = %sale.id, "Reset open sale");
        Ok(sale)
    }

    /// Adds a line to a sale. Returns the sale with the new line last.
    pub async fn add_item(&self, sale_id: &str, draft: NewSaleItem) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        let mut sale = load_sale(&mut tx, sale_id).await?;

        let item = draft.into_item(&sale.id)?;
        debug!(
            sale_id = %sale.id,
            item_id = %item.id,
            product = %item.product_name,
            subtotal = item.subtotal,
            "Adding sale item"
        );

        insert_item(&mut tx, &item).await?;
        sale.push_item(item)?;
        let total = sale.recompute_total();
        write_total(&mut tx, &sale.id, total).await?;

        commit(tx).await?;
        Ok(sale)
    }

    /// Changes quantity and unit price of a line.
    pub async fn update_item(
        &self,
        sale_id: &str,
        item_id: &str,
        quantity: f64,
        unit_price: f64,
    ) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        let mut sale = load_sale(&mut tx, sale_id).await?;

        let item = sale.item_mut(item_id)?;
        let subtotal = item.reprice(quantity, unit_price)?;
        debug!(sale_id = %sale_id, item_id = %item_id, subtotal, "Updating sale item");

        sqlx::query(
            r#"
            UPDATE sale_items SET
                quantity = ?2,
                unit_price = ?3,
                subtotal = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal)
        .execute(&mut *tx)
        .await?;

        let total = sale.recompute_total();
        write_total(&mut tx, &sale.id, total).await?;

        commit(tx).await?;
        Ok(sale)
    }

    /// Removes a line from a sale.
    pub async fn remove_item(&self, sale_id: &str, item_id: &str) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        let mut sale = load_sale(&mut tx, sale_id).await?;

        let removed = sale.remove_item(item_id)?;
        debug!(sale_id = %sale_id, item_id = %removed.id, "Removing sale item");

        sqlx::query("DELETE FROM sale_items WHERE id = ?1 AND sale_id = ?2")
            .bind(&removed.id)
            .bind(&sale.id)
            .execute(&mut *tx)
            .await?;

        let total = sale.recompute_total();
        write_total(&mut tx, &sale.id, total).await?;

        commit(tx).await?;
        Ok(sale)
    }

    /// Removes every line of a sale, keeping the sale itself.
    pub async fn clear_items(&self, sale_id: &str) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        let mut sale = load_sale(&mut tx, sale_id).await?;

        let removed = sale.clear_items();
        debug!(sale_id = %sale_id, count = removed.len(), "Clearing sale items");

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(&sale.id)
            .execute(&mut *tx)
            .await?;

        let total = sale.recompute_total();
        write_total(&mut tx, &sale.id, total).await?;

        commit(tx).await?;
        Ok(sale)
    }

    /// Recomputes and stores the total from the stored item subtotals.
    pub async fn recompute_total(&self, sale_id: &str) -> DbResult<f64> {
        let mut tx = self.pool.begin().await?;
        let mut sale = load_sale(&mut tx, sale_id).await?;

        let total = sale.recompute_total();
        write_total(&mut tx, &sale.id, total).await?;

        commit(tx).await?;
        Ok(total)
    }

    /// Closes a sale, recording customer name and payment method if given.
    pub async fn finalize(&self, sale_id: &str, checkout: SaleCheckout) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        let mut sale = load_sale(&mut tx, sale_id).await?;

        sale.recompute_total();
        sale.finalize(checkout)?;
        write_header(&mut tx, &sale).await?;
        write_total(&mut tx, &sale.id, sale.total).await?;

        commit(tx).await?;

        info!(
            id = %sale.id,
            total = sale.total,
            items = sale.items.len(),
            payment_method = ?sale.payment_method,
            "Sale finalized"
        );
        Ok(sale)
    }

    /// Writes sale time, finalized flag, customer name and payment method
    /// as given. The total is derived and not written here.
    pub async fn update(&self, sale: &Sale) -> DbResult<()> {
        sale.validate()?;
        debug!(id = %sale.id, finalized = sale.finalized, "Updating sale");

        let mut conn = self.pool.acquire().await?;
        write_header(&mut conn, sale).await
    }

    /// Deletes a sale and all of its items in one transaction.
    ///
    /// Returns how many items were removed.
    pub async fn delete(&self, sale_id: &str) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let removed = delete_sale_rows(&mut tx, sale_id).await?;
        commit(tx).await?;

        info!(id = %sale_id, items = removed, "Sale deleted");
        Ok(removed)
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================
// These take a bare connection so the same statement runs on a pooled
// connection or inside a transaction.

async fn commit(tx: sqlx::Transaction<'_, sqlx::Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (id, sale_time, total, finalized, customer_name, payment_method)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&sale.id)
    .bind(sale.sale_time)
    .bind(sale.total)
    .bind(sale.finalized)
    .bind(&sale.customer_name)
    .bind(&sale.payment_method)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn fetch_sale(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, sale_time, total, finalized, customer_name, payment_method
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match sale {
        Some(mut sale) => {
            sale.items = fetch_items(conn, id).await?;
            Ok(Some(sale))
        }
        None => Ok(None),
    }
}

async fn load_sale(conn: &mut SqliteConnection, id: &str) -> DbResult<Sale> {
    fetch_sale(conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))
}

// rowid follows insertion order
async fn fetch_items(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleItem>> {
    let items = sqlx::query_as::<_, SaleItem>(
        r#"
        SELECT id, sale_id, product_name, quantity, quantity_kind, unit_price, subtotal
        FROM sale_items
        WHERE sale_id = ?1
        ORDER BY rowid
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

async fn insert_item(conn: &mut SqliteConnection, item: &SaleItem) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_items (
            id, sale_id, product_name,
            quantity, quantity_kind, unit_price, subtotal
        ) VALUES (
            ?1, ?2, ?3,
            ?4, ?5, ?6, ?7
        )
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.quantity_kind)
    .bind(item.unit_price)
    .bind(item.subtotal)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn write_total(conn: &mut SqliteConnection, sale_id: &str, total: f64) -> DbResult<()> {
    sqlx::query("UPDATE sales SET total = ?2 WHERE id = ?1")
        .bind(sale_id)
        .bind(total)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn write_header(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE sales SET
            sale_time = ?2,
            finalized = ?3,
            customer_name = ?4,
            payment_method = ?5
        WHERE id = ?1
        "#,
    )
    .bind(&sale.id)
    .bind(sale.sale_time)
    .bind(sale.finalized)
    .bind(&sale.customer_name)
    .bind(&sale.payment_method)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Sale", &sale.id));
    }

    Ok(())
}

/// Deletes the items of a sale, then the sale. Returns the item count.
async fn delete_sale_rows(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<u64> {
    let items = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
        .bind(sale_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let sales = sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(sale_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if sales == 0 {
        return Err(DbError::not_found("Sale", sale_id));
    }

    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use balcao_core::{CoreError, QuantityKind};
    use chrono::{NaiveDate, NaiveDateTime, Utc};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn unit(name: &str, quantity: f64, unit_price: f64) -> NewSaleItem {
        NewSaleItem::new(name, quantity, QuantityKind::Unit, unit_price)
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    async fn count_rows(db: &Database, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(db.pool()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();

        assert_eq!(sale.total, 0.0);
        assert!(!sale.finalized);
        assert!(sale.items.is_empty());

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched, sale);
    }

    #[tokio::test]
    async fn test_create_stamps_sao_paulo_wall_clock() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();

        let expected = clock::civil_time(Utc::now(), chrono_tz::America::Sao_Paulo);
        let stamped = sale.sale_time.unwrap();
        assert!((stamped - expected).num_seconds().abs() <= 5);

        // Brazil has no daylight saving since 2019: three hours behind UTC
        let behind_utc = Utc::now().naive_utc() - stamped;
        assert!((behind_utc.num_seconds() - 3 * 3600).abs() <= 5);
    }

    #[tokio::test]
    async fn test_create_uses_configured_zone() {
        let config = DbConfig::in_memory().sale_timezone(chrono_tz::UTC);
        let repo = Database::new(config).await.unwrap().sales();
        let sale = repo.create(NewSale::default()).await.unwrap();

        let drift = sale.sale_time.unwrap() - Utc::now().naive_utc();
        assert!(drift.num_seconds().abs() <= 5);
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_sale_time() {
        let repo = db().await.sales();
        let draft = NewSale {
            sale_time: Some(at(1, 8)),
            customer_name: Some("Carla".to_string()),
            payment_method: None,
        };
        let sale = repo.create(draft).await.unwrap();

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.sale_time, Some(at(1, 8)));
        assert_eq!(fetched.customer_name.as_deref(), Some("Carla"));
    }

    #[tokio::test]
    async fn test_add_item_recomputes_subtotal_and_total() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();

        repo.add_item(&sale.id, unit("Sabão", 3.0, 2.5)).await.unwrap();
        let sale = repo
            .add_item(
                &sale.id,
                NewSaleItem::new("Queijo", 0.35, QuantityKind::Kg, 42.9),
            )
            .await
            .unwrap();

        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].subtotal, 7.5);
        assert!((sale.total - (7.5 + 0.35 * 42.9)).abs() < 1e-9);

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched, sale);
        assert_eq!(fetched.items[1].quantity_kind, QuantityKind::Kg);
    }

    #[tokio::test]
    async fn test_total_matches_sum_of_lines() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        let lines = [(1.0, 4.99), (0.734, 12.99), (6.0, 0.1), (2.0, 0.2), (0.125, 48.0)];

        for (i, (quantity, price)) in lines.iter().enumerate() {
            repo.add_item(&sale.id, unit(&format!("p{i}"), *quantity, *price))
                .await
                .unwrap();
        }

        let expected: f64 = lines.iter().map(|(q, p)| q * p).sum();
        let stored = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert!((stored.total - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_items_keep_insertion_order() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();

        for name in ["Café", "Açúcar", "Biscoito", "Leite"] {
            repo.add_item(&sale.id, unit(name, 1.0, 1.0)).await.unwrap();
        }

        let names: Vec<String> = repo
            .get_items(&sale.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.product_name)
            .collect();
        assert_eq!(names, ["Café", "Açúcar", "Biscoito", "Leite"]);
    }

    #[tokio::test]
    async fn test_add_item_to_missing_sale() {
        let repo = db().await.sales();
        let missing = balcao_core::new_id();

        assert!(matches!(
            repo.add_item(&missing, unit("Pão", 1.0, 0.8)).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_invalid_item_leaves_sale_untouched() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();

        let err = repo.add_item(&sale.id, unit("  ", 1.0, 0.8)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert!(repo.get_items(&sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_item_recomputes() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        let sale = repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        let sale = repo.add_item(&sale.id, unit("Feijão", 2.0, 8.0)).await.unwrap();
        let arroz = sale.items[0].id.clone();

        let sale = repo.update_item(&sale.id, &arroz, 2.0, 24.5).await.unwrap();
        assert_eq!(sale.items[0].subtotal, 49.0);
        assert_eq!(sale.total, 65.0);

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.total, 65.0);
        assert_eq!(fetched.items[0].quantity, 2.0);
    }

    #[tokio::test]
    async fn test_remove_item_recomputes() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        let sale = repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        let sale = repo.add_item(&sale.id, unit("Feijão", 2.0, 8.0)).await.unwrap();
        let arroz = sale.items[0].id.clone();

        let sale = repo.remove_item(&sale.id, &arroz).await.unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.total, 16.0);

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.total, 16.0);
        assert_eq!(fetched.items.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_item_of_other_sale_fails() {
        let repo = db().await.sales();
        let first = repo.create(NewSale::default()).await.unwrap();
        let second = repo.create(NewSale::default()).await.unwrap();
        let second = repo.add_item(&second.id, unit("Arroz", 1.0, 25.0)).await.unwrap();

        let err = repo
            .remove_item(&first.id, &second.items[0].id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::SaleItemNotFound { .. })
        ));
        assert_eq!(repo.get_items(&second.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_items() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        repo.add_item(&sale.id, unit("Feijão", 2.0, 8.0)).await.unwrap();

        let sale = repo.clear_items(&sale.id).await.unwrap();
        assert!(sale.items.is_empty());
        assert_eq!(sale.total, 0.0);
        assert!(repo.get_by_id(&sale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_recompute_total_after_external_write() {
        let db = db().await;
        let repo = db.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        let sale = repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();

        sqlx::query("UPDATE sale_items SET subtotal = 30.0 WHERE id = ?1")
            .bind(&sale.items[0].id)
            .execute(db.pool())
            .await
            .unwrap();
        assert_eq!(repo.get_by_id(&sale.id).await.unwrap().unwrap().total, 25.0);

        assert_eq!(repo.recompute_total(&sale.id).await.unwrap(), 30.0);
        assert_eq!(repo.get_by_id(&sale.id).await.unwrap().unwrap().total, 30.0);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let db = db().await;
        let repo = db.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        repo.add_item(&sale.id, unit("Feijão", 2.0, 8.0)).await.unwrap();

        let keep = repo.create(NewSale::default()).await.unwrap();
        repo.add_item(&keep.id, unit("Leite", 1.0, 4.5)).await.unwrap();

        assert_eq!(repo.delete(&sale.id).await.unwrap(), 2);

        assert!(repo.get_by_id(&sale.id).await.unwrap().is_none());
        assert!(repo.get_items(&sale.id).await.unwrap().is_empty());
        assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM sale_items").await, 1);
        assert!(matches!(
            repo.delete(&sale.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_foreign_key_guards_orphans() {
        let db = db().await;
        let repo = db.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();

        let err: DbError = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(&sale.id)
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_finalize_and_history() {
        let repo = db().await.sales();
        let older = repo
            .create(NewSale {
                sale_time: Some(at(10, 9)),
                ..NewSale::default()
            })
            .await
            .unwrap();
        let newer = repo
            .create(NewSale {
                sale_time: Some(at(11, 9)),
                ..NewSale::default()
            })
            .await
            .unwrap();
        let open = repo.create(NewSale::default()).await.unwrap();

        repo.add_item(&older.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        let closed = repo
            .finalize(&older.id, SaleCheckout::new(Some("Dona Maria"), Some("dinheiro")))
            .await
            .unwrap();
        assert!(closed.finalized);
        assert_eq!(closed.total, 25.0);
        assert_eq!(closed.customer_name.as_deref(), Some("Dona Maria"));
        assert_eq!(closed.payment_method.as_deref(), Some("dinheiro"));

        repo.finalize(&newer.id, SaleCheckout::default()).await.unwrap();

        let history = repo.list_finalized(10).await.unwrap();
        let ids: Vec<&str> = history.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, [newer.id.as_str(), older.id.as_str()]);
        assert_eq!(history[1].items.len(), 1);
        assert!(history.iter().all(|s| s.id != open.id));

        assert_eq!(repo.list_finalized(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_current_open_and_reset() {
        let repo = db().await.sales();
        assert!(repo.current_open().await.unwrap().is_none());

        let stale = repo
            .create(NewSale {
                sale_time: Some(at(1, 8)),
                ..NewSale::default()
            })
            .await
            .unwrap();
        repo.add_item(&stale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        let done = repo.create(NewSale::default()).await.unwrap();
        repo.finalize(&done.id, SaleCheckout::default()).await.unwrap();
        let latest = repo.create(NewSale::default()).await.unwrap();

        assert_eq!(repo.current_open().await.unwrap().unwrap().id, latest.id);

        let fresh = repo.reset_open().await.unwrap();
        assert!(repo.get_by_id(&stale.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&latest.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&done.id).await.unwrap().is_some());

        let current = repo.current_open().await.unwrap().unwrap();
        assert_eq!(current.id, fresh.id);
        assert!(current.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_finalized_directly() {
        let repo = db().await.sales();
        let mut sale = repo.create(NewSale::default()).await.unwrap();

        sale.finalized = true;
        sale.payment_method = Some("pix".to_string());
        repo.update(&sale).await.unwrap();

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert!(fetched.finalized);
        assert_eq!(fetched.payment_method.as_deref(), Some("pix"));

        // reopening is not guarded either
        sale.finalized = false;
        repo.update(&sale).await.unwrap();
        assert!(repo.get_by_id(&sale.id).await.unwrap().unwrap().is_open());
    }

    #[tokio::test]
    async fn test_serialized_sale_lists_items() {
        let repo = db().await.sales();
        let sale = repo.create(NewSale::default()).await.unwrap();
        repo.add_item(&sale.id, unit("Arroz", 1.0, 25.0)).await.unwrap();
        let sale = repo.add_item(&sale.id, unit("Feijão", 2.0, 8.0)).await.unwrap();

        let value = serde_json::to_value(&sale).unwrap();
        assert_eq!(value["total"], 41.0);
        assert!(value["sale_time"].is_string());
        assert_eq!(value["items"][0]["product_name"], "Arroz");
        assert_eq!(value["items"][1]["subtotal"], 16.0);
    }
}
