//! Generic document access layer
//!
//! One typed CRUD and query surface over named collections. Everything
//! that talks to the database goes through here: the store owns timestamp
//! stamping (`created_at` / `updated_at` are never client-supplied), key
//! assignment, and query construction, so the per-entity repositories
//! only carry business rules.
//!
//! Field names are interpolated into SurrealQL after an identifier check;
//! all values travel as bound parameters.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use surrealdb::{RecordId, Surreal, engine::local::Db};
use uuid::Uuid;

use super::repository::{RepoError, RepoResult};
use crate::utils::time::now_millis;

/// Comparison operator for a query predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }
}

/// A bindable predicate value.
///
/// Documents persist record references in their string form
/// (`"collection:key"`, via the model serde helpers), so a [`RecordId`]
/// predicate binds that same string.
#[derive(Debug, Clone)]
pub struct FilterValue(Value);

impl From<RecordId> for FilterValue {
    fn from(id: RecordId) -> Self {
        Self(Value::from(id.to_string()))
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self(Value::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self(Value::from(value))
    }
}

/// An equality/range predicate; predicates compose conjunctively.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Lte, value)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A (field, direction) sort key
#[derive(Debug, Clone)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

impl Ordering {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// One page of a forward, cursor-based scan
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Order-field value of the last returned item; feed back as the next
    /// call's cursor.
    pub next_cursor: Option<Value>,
    pub has_more: bool,
}

/// Generic typed document store over the embedded database
#[derive(Clone, Debug)]
pub struct DocumentStore {
    db: Surreal<Db>,
}

impl DocumentStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Fetch a single document by key. `None` on not-found; engine and
    /// connectivity errors propagate.
    pub async fn get_one<T>(&self, collection: &str, key: &str) -> RepoResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        ensure_ident(collection)?;
        let key = strip_collection_prefix(collection, key);
        let record: Option<T> = self.db.select((collection, key)).await?;
        Ok(record)
    }

    /// Fetch every document matching the conjunction of `filters`, sorted
    /// by `ordering`, optionally capped at `limit`. An empty result is an
    /// empty Vec, never an error.
    pub async fn get_many<T>(
        &self,
        collection: &str,
        filters: &[Filter],
        ordering: &[Ordering],
        limit: Option<usize>,
    ) -> RepoResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let sql = build_select(collection, filters, ordering, limit.is_some())?;

        let mut query = self.db.query(sql).bind(("tb", collection.to_string()));
        for (i, filter) in filters.iter().enumerate() {
            query = query.bind((format!("p{i}"), filter.value.0.clone()));
        }
        if let Some(limit) = limit {
            query = query.bind(("limit", limit as i64));
        }

        let mut response = query.await?;
        let records: Vec<T> = response.take(0)?;
        Ok(records)
    }

    /// Create a document. The key is assigned here (UUID) unless the
    /// caller supplies a well-known one; `created_at`/`updated_at` are
    /// stamped server-side and any client-supplied values are discarded.
    pub async fn create<T, D>(&self, collection: &str, key: Option<&str>, data: &D) -> RepoResult<T>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        ensure_ident(collection)?;
        let key = match key {
            Some(k) => strip_collection_prefix(collection, k).to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };

        let mut doc = to_document(data)?;
        let now = now_millis();
        doc.remove("id");
        doc.insert("created_at".to_string(), Value::from(now));
        doc.insert("updated_at".to_string(), Value::from(now));

        let mut response = self
            .db
            .query("CREATE type::thing($tb, $key) CONTENT $doc")
            .bind(("tb", collection.to_string()))
            .bind(("key", key))
            .bind(("doc", Value::Object(doc)))
            .await?;
        let created: Vec<T> = response.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database(format!("create returned no record in {collection}")))
    }

    /// Merge `partial` into an existing document. Only the supplied fields
    /// change; `updated_at` is always bumped. Fails with `NotFound` when
    /// the key does not exist (a merge must never create).
    pub async fn update<T, D>(&self, collection: &str, key: &str, partial: &D) -> RepoResult<T>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        ensure_ident(collection)?;
        let key = strip_collection_prefix(collection, key).to_string();

        let existing: Option<Value> = self.db.select((collection, key.as_str())).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("{collection}:{key}")));
        }

        let mut doc = to_document(partial)?;
        doc.remove("id");
        doc.remove("created_at");
        doc.insert("updated_at".to_string(), Value::from(now_millis()));

        self.db
            .query("UPDATE type::thing($tb, $key) MERGE $doc")
            .bind(("tb", collection.to_string()))
            .bind(("key", key.clone()))
            .bind(("doc", Value::Object(doc)))
            .await?
            .check()?;

        let updated: Option<T> = self.db.select((collection, key.as_str())).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("{collection}:{key}")))
    }

    /// Delete a document by key. Deleting a missing key is not an error.
    /// Never cascades; callers orchestrate multi-entity deletes.
    pub async fn delete(&self, collection: &str, key: &str) -> RepoResult<()> {
        ensure_ident(collection)?;
        let key = strip_collection_prefix(collection, key).to_string();

        self.db
            .query("DELETE type::thing($tb, $key)")
            .bind(("tb", collection.to_string()))
            .bind(("key", key))
            .await?
            .check()?;
        Ok(())
    }

    /// Forward cursor pagination over one ordered collection.
    ///
    /// Fetches `page_size + 1` records; a full overfetch means another
    /// page exists and the extra record is trimmed. The cursor is the
    /// order-field value of the last returned record, applied as an
    /// exclusive bound on the next call — the order field must therefore
    /// be unique per record (`created_at` millis in practice).
    pub async fn get_page<T>(
        &self,
        collection: &str,
        filters: &[Filter],
        order_field: &str,
        direction: Direction,
        page_size: usize,
        cursor: Option<Value>,
    ) -> RepoResult<Page<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        if page_size == 0 {
            return Err(RepoError::Validation("page_size must be positive".into()));
        }

        let mut effective: Vec<Filter> = filters.to_vec();
        if let Some(cursor) = cursor {
            let op = match direction {
                Direction::Asc => FilterOp::Gt,
                Direction::Desc => FilterOp::Lt,
            };
            effective.push(Filter::new(order_field, op, cursor));
        }

        let ordering = [Ordering {
            field: order_field.to_string(),
            direction,
        }];

        let mut items: Vec<T> = self
            .get_many(collection, &effective, &ordering, Some(page_size + 1))
            .await?;

        let has_more = items.len() > page_size;
        if has_more {
            items.truncate(page_size);
        }

        let next_cursor = match items.last() {
            Some(last) if has_more => serde_json::to_value(last)
                .ok()
                .and_then(|v| v.get(order_field).cloned()),
            _ => None,
        };

        Ok(Page {
            items,
            next_cursor,
            has_more,
        })
    }
}

/// Serialize a DTO into a JSON object ready for stamping
fn to_document<D: Serialize>(data: &D) -> RepoResult<serde_json::Map<String, Value>> {
    match serde_json::to_value(data) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(RepoError::Validation(
            "document body must be a JSON object".to_string(),
        )),
        Err(e) => Err(RepoError::Validation(format!(
            "unserializable document body: {e}"
        ))),
    }
}

/// Reject anything that is not a plain identifier before it reaches a
/// query string. Values are always bound; this guards field and
/// collection names, which cannot be.
fn ensure_ident(name: &str) -> RepoResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(RepoError::Validation(format!("invalid identifier: {name}")));
    }
    Ok(())
}

/// Accept both bare keys and full "collection:key" ids
fn strip_collection_prefix<'a>(collection: &str, key: &'a str) -> &'a str {
    key.strip_prefix(collection)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(key)
}

fn build_select(
    collection: &str,
    filters: &[Filter],
    ordering: &[Ordering],
    has_limit: bool,
) -> RepoResult<String> {
    ensure_ident(collection)?;

    let mut sql = String::from("SELECT * FROM type::table($tb)");

    if !filters.is_empty() {
        sql.push_str(" WHERE ");
        for (i, filter) in filters.iter().enumerate() {
            ensure_ident(&filter.field)?;
            if i > 0 {
                sql.push_str(" AND ");
            }
            sql.push_str(&format!("{} {} $p{i}", filter.field, filter.op.sql()));
        }
    }

    if !ordering.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, order) in ordering.iter().enumerate() {
            ensure_ident(&order.field)?;
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&format!("{} {}", order.field, order.direction.sql()));
        }
    }

    if has_limit {
        sql.push_str(" LIMIT $limit");
    }

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_bare_select() {
        let sql = build_select("menu_item", &[], &[], false).unwrap();
        assert_eq!(sql, "SELECT * FROM type::table($tb)");
    }

    #[test]
    fn builds_conjunctive_where_and_order() {
        let filters = [
            Filter::eq("category", "drinks"),
            Filter::gte("created_at", 0i64),
        ];
        let ordering = [Ordering::desc("created_at"), Ordering::asc("name")];
        let sql = build_select("menu_item", &filters, &ordering, true).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM type::table($tb) WHERE category = $p0 AND created_at >= $p1 \
             ORDER BY created_at DESC, name ASC LIMIT $limit"
        );
    }

    #[test]
    fn rejects_hostile_identifiers() {
        assert!(build_select("menu_item; DELETE user", &[], &[], false).is_err());
        let filters = [Filter::eq("name = 'x' OR 1", "y")];
        assert!(build_select("menu_item", &filters, &[], false).is_err());
        assert!(ensure_ident("").is_err());
        assert!(ensure_ident("9lives").is_err());
        assert!(ensure_ident("created_at").is_ok());
    }

    #[test]
    fn strips_collection_prefix_only() {
        assert_eq!(strip_collection_prefix("booking", "booking:abc"), "abc");
        assert_eq!(strip_collection_prefix("booking", "abc"), "abc");
        assert_eq!(
            strip_collection_prefix("booking", "event:abc"),
            "event:abc"
        );
    }
}
