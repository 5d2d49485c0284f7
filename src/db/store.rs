//! Single-table item store.
//!
//! Every entity lives in the `items` table under a composite `(pk, sk)` key,
//! with up to three secondary index key pairs. The functions here are plain
//! get/put/update/delete/query/scan calls; consistency rules live in `core`.

use crate::errors::{AppError, AppResult};
use crate::utils::time::now_iso;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Sort key used by top-level entity records.
pub const METADATA: &str = "METADATA";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub pk: String,
    pub sk: String,
}

impl ItemKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// Secondary indexes of the item store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// UNIT#/INSPECTION# for inspections, INSPECTORS for inspectors
    Gsi1,
    /// STATUS#/DATE#
    Gsi2,
    /// INSPECTOR#/DATE#
    Gsi3,
}

impl Index {
    fn columns(&self) -> (&'static str, &'static str) {
        match self {
            Index::Gsi1 => ("gsi1pk", "gsi1sk"),
            Index::Gsi2 => ("gsi2pk", "gsi2sk"),
            Index::Gsi3 => ("gsi3pk", "gsi3sk"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexKeys {
    pub gsi1: Option<(String, String)>,
    pub gsi2: Option<(String, String)>,
    pub gsi3: Option<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct StoredItem {
    pub key: ItemKey,
    pub entity_type: String,
    pub index: IndexKeys,
    pub data: Value,
    pub updated_at: String,
}

/// A typed record persisted in the item store.
pub trait Entity: Serialize + DeserializeOwned {
    const ENTITY_TYPE: &'static str;

    fn key(&self) -> ItemKey;

    fn index_keys(&self) -> IndexKeys {
        IndexKeys::default()
    }

    fn to_item(&self) -> AppResult<StoredItem> {
        Ok(StoredItem {
            key: self.key(),
            entity_type: Self::ENTITY_TYPE.to_string(),
            index: self.index_keys(),
            data: serde_json::to_value(self)?,
            updated_at: now_iso(),
        })
    }

    fn from_item(item: &StoredItem) -> AppResult<Self> {
        if item.entity_type != Self::ENTITY_TYPE {
            return Err(AppError::Other(format!(
                "expected {} at {}/{}, found {}",
                Self::ENTITY_TYPE,
                item.key.pk,
                item.key.sk,
                item.entity_type
            )));
        }
        Ok(serde_json::from_value(item.data.clone())?)
    }
}

const SELECT_COLUMNS: &str = "pk, sk, entity_type, gsi1pk, gsi1sk, gsi2pk, gsi2sk, gsi3pk, gsi3sk, data, updated_at";

fn pair(pk: Option<String>, sk: Option<String>) -> Option<(String, String)> {
    pk.map(|p| (p, sk.unwrap_or_default()))
}

pub fn map_item(row: &Row) -> rusqlite::Result<StoredItem> {
    let raw: String = row.get("data")?;
    let data: Value = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StoredItem {
        key: ItemKey::new(row.get::<_, String>("pk")?, row.get::<_, String>("sk")?),
        entity_type: row.get("entity_type")?,
        index: IndexKeys {
            gsi1: pair(row.get("gsi1pk")?, row.get("gsi1sk")?),
            gsi2: pair(row.get("gsi2pk")?, row.get("gsi2sk")?),
            gsi3: pair(row.get("gsi3pk")?, row.get("gsi3sk")?),
        },
        data,
        updated_at: row.get("updated_at")?,
    })
}

fn collect(rows: impl Iterator<Item = rusqlite::Result<StoredItem>>) -> AppResult<Vec<StoredItem>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_item(conn: &Connection, key: &ItemKey) -> AppResult<Option<StoredItem>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM items WHERE pk = ?1 AND sk = ?2");
    let mut stmt = conn.prepare_cached(&sql)?;
    let item = stmt
        .query_row(params![key.pk, key.sk], map_item)
        .optional()?;
    Ok(item)
}

/// Insert or replace the item stored under its key.
pub fn put_item(conn: &Connection, item: &StoredItem) -> AppResult<()> {
    let (g1p, g1s) = split(&item.index.gsi1);
    let (g2p, g2s) = split(&item.index.gsi2);
    let (g3p, g3s) = split(&item.index.gsi3);

    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO items
            (pk, sk, entity_type, gsi1pk, gsi1sk, gsi2pk, gsi2sk, gsi3pk, gsi3sk, data, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    stmt.execute(params![
        item.key.pk,
        item.key.sk,
        item.entity_type,
        g1p,
        g1s,
        g2p,
        g2s,
        g3p,
        g3s,
        serde_json::to_string(&item.data)?,
        item.updated_at,
    ])?;
    Ok(())
}

fn split(p: &Option<(String, String)>) -> (Option<&str>, Option<&str>) {
    match p {
        Some((pk, sk)) => (Some(pk.as_str()), Some(sk.as_str())),
        None => (None, None),
    }
}

/// Merge `attrs` into the stored attributes (SET semantics) and return the
/// updated item. Returns `None` when nothing is stored under `key`.
pub fn update_item(
    conn: &Connection,
    key: &ItemKey,
    attrs: &Map<String, Value>,
) -> AppResult<Option<StoredItem>> {
    let Some(mut item) = get_item(conn, key)? else {
        return Ok(None);
    };

    let obj = item
        .data
        .as_object_mut()
        .ok_or_else(|| AppError::Other(format!("item {}/{} is not an object", key.pk, key.sk)))?;
    for (k, v) in attrs {
        obj.insert(k.clone(), v.clone());
    }
    item.updated_at = now_iso();

    conn.execute(
        "UPDATE items SET data = ?1, updated_at = ?2 WHERE pk = ?3 AND sk = ?4",
        params![
            serde_json::to_string(&item.data)?,
            item.updated_at,
            key.pk,
            key.sk
        ],
    )?;

    Ok(Some(item))
}

/// Delete the item (and any payload stored with it). Returns whether a row
/// was removed.
/// Delete an item and any blob stored under its key, in one transaction.
pub fn delete_item(conn: &Connection, key: &ItemKey) -> AppResult<bool> {
    let tx = conn.unchecked_transaction()?;
    let n = tx.execute(
        "DELETE FROM items WHERE pk = ?1 AND sk = ?2",
        params![key.pk, key.sk],
    )?;
    tx.execute(
        "DELETE FROM blobs WHERE pk = ?1 AND sk = ?2",
        params![key.pk, key.sk],
    )?;
    tx.commit()?;
    Ok(n > 0)
}

/// Items of one partition in sort-key order, optionally restricted to sort
/// keys beginning with `sk_prefix`.
pub fn query(conn: &Connection, pk: &str, sk_prefix: Option<&str>) -> AppResult<Vec<StoredItem>> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM items
         WHERE pk = ?1 AND substr(sk, 1, length(?2)) = ?2
         ORDER BY sk ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![pk, sk_prefix.unwrap_or("")], map_item)?;
    collect(rows)
}

/// Items whose index partition key equals `pk`, ordered by the index sort key.
pub fn query_index(conn: &Connection, index: Index, pk: &str) -> AppResult<Vec<StoredItem>> {
    let (pk_col, sk_col) = index.columns();
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM items
         WHERE {pk_col} = ?1
         ORDER BY {sk_col} ASC, pk ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([pk], map_item)?;
    collect(rows)
}

/// Every item of one entity type.
pub fn scan(conn: &Connection, entity_type: &str) -> AppResult<Vec<StoredItem>> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM items
         WHERE entity_type = ?1
         ORDER BY pk ASC, sk ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([entity_type], map_item)?;
    collect(rows)
}

pub fn count(conn: &Connection, entity_type: &str) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM items WHERE entity_type = ?1",
        [entity_type],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Atomically advance the named counter. The first call returns `seed + 1`.
pub fn next_sequence(conn: &Connection, name: &str, seed: i64) -> AppResult<i64> {
    let value = conn.query_row(
        "INSERT INTO counters (name, value) VALUES (?1, ?2 + 1)
         ON CONFLICT(name) DO UPDATE SET value = value + 1
         RETURNING value",
        params![name, seed],
        |row| row.get(0),
    )?;
    Ok(value)
}

pub fn put_blob(conn: &Connection, key: &ItemKey, data: &[u8]) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO blobs (pk, sk, data) VALUES (?1, ?2, ?3)",
        params![key.pk, key.sk, data],
    )?;
    Ok(())
}

pub fn get_blob(conn: &Connection, key: &ItemKey) -> AppResult<Option<Vec<u8>>> {
    let data = conn
        .query_row(
            "SELECT data FROM blobs WHERE pk = ?1 AND sk = ?2",
            params![key.pk, key.sk],
            |row| row.get(0),
        )
        .optional()?;
    Ok(data)
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

pub fn get<E: Entity>(conn: &Connection, key: &ItemKey) -> AppResult<Option<E>> {
    get_item(conn, key)?.map(|i| E::from_item(&i)).transpose()
}

pub fn put<E: Entity>(conn: &Connection, entity: &E) -> AppResult<()> {
    put_item(conn, &entity.to_item()?)
}

/// Write an entity and its payload together. Neither is stored if either fails.
pub fn put_with_blob<E: Entity>(conn: &Connection, entity: &E, data: &[u8]) -> AppResult<()> {
    let item = entity.to_item()?;
    let tx = conn.unchecked_transaction()?;
    put_item(&tx, &item)?;
    put_blob(&tx, &item.key, data)?;
    tx.commit()?;
    Ok(())
}

pub fn query_as<E: Entity>(conn: &Connection, pk: &str, sk_prefix: &str) -> AppResult<Vec<E>> {
    query(conn, pk, Some(sk_prefix))?
        .iter()
        .map(E::from_item)
        .collect()
}

pub fn query_index_as<E: Entity>(conn: &Connection, index: Index, pk: &str) -> AppResult<Vec<E>> {
    query_index(conn, index, pk)?
        .iter()
        .filter(|i| i.entity_type == E::ENTITY_TYPE)
        .map(E::from_item)
        .collect()
}

pub fn scan_as<E: Entity>(conn: &Connection) -> AppResult<Vec<E>> {
    scan(conn, E::ENTITY_TYPE)?.iter().map(E::from_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use serde_json::json;

    fn raw(pk: &str, sk: &str, data: Value) -> StoredItem {
        StoredItem {
            key: ItemKey::new(pk, sk),
            entity_type: "Test".into(),
            index: IndexKeys {
                gsi1: Some(("GROUP#a".into(), sk.into())),
                ..Default::default()
            },
            data,
            updated_at: now_iso(),
        }
    }

    #[test]
    fn put_overwrites_same_key() {
        let pool = DbPool::open_in_memory().unwrap();
        let key = ItemKey::new("P#1", "S#1");
        put_item(&pool.conn, &raw("P#1", "S#1", json!({"v": 1}))).unwrap();
        put_item(&pool.conn, &raw("P#1", "S#1", json!({"v": 2}))).unwrap();

        let got = get_item(&pool.conn, &key).unwrap().unwrap();
        assert_eq!(got.data["v"], 2);
        assert_eq!(query(&pool.conn, "P#1", None).unwrap().len(), 1);
    }

    #[test]
    fn query_filters_by_sort_key_prefix() {
        let pool = DbPool::open_in_memory().unwrap();
        put_item(&pool.conn, &raw("P#1", "RESPONSE#B", json!({}))).unwrap();
        put_item(&pool.conn, &raw("P#1", "RESPONSE#A", json!({}))).unwrap();
        put_item(&pool.conn, &raw("P#1", "PMI#A", json!({}))).unwrap();

        let responses = query(&pool.conn, "P#1", Some("RESPONSE#")).unwrap();
        let sks: Vec<_> = responses.iter().map(|i| i.key.sk.as_str()).collect();
        assert_eq!(sks, vec!["RESPONSE#A", "RESPONSE#B"]);
    }

    #[test]
    fn update_merges_attributes() {
        let pool = DbPool::open_in_memory().unwrap();
        put_item(&pool.conn, &raw("P#1", "S", json!({"a": 1, "b": 1}))).unwrap();

        let mut attrs = Map::new();
        attrs.insert("b".into(), json!(5));
        let updated = update_item(&pool.conn, &ItemKey::new("P#1", "S"), &attrs)
            .unwrap()
            .unwrap();
        assert_eq!(updated.data, json!({"a": 1, "b": 5}));

        let missing = update_item(&pool.conn, &ItemKey::new("P#2", "S"), &attrs).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn delete_reports_whether_row_existed() {
        let pool = DbPool::open_in_memory().unwrap();
        let key = ItemKey::new("P#1", "S");
        put_item(&pool.conn, &raw("P#1", "S", json!({}))).unwrap();
        put_blob(&pool.conn, &key, b"abc").unwrap();

        assert!(delete_item(&pool.conn, &key).unwrap());
        assert!(!delete_item(&pool.conn, &key).unwrap());
        assert!(get_blob(&pool.conn, &key).unwrap().is_none());
    }

    #[test]
    fn sequence_starts_after_seed() {
        let pool = DbPool::open_in_memory().unwrap();
        assert_eq!(next_sequence(&pool.conn, "so", 100).unwrap(), 101);
        assert_eq!(next_sequence(&pool.conn, "so", 100).unwrap(), 102);
    }

    #[test]
    fn index_query_uses_index_partition() {
        let pool = DbPool::open_in_memory().unwrap();
        put_item(&pool.conn, &raw("P#1", "S#2", json!({}))).unwrap();
        put_item(&pool.conn, &raw("P#2", "S#1", json!({}))).unwrap();

        let items = query_index(&pool.conn, Index::Gsi1, "GROUP#a").unwrap();
        let pks: Vec<_> = items.iter().map(|i| i.key.pk.as_str()).collect();
        assert_eq!(pks, vec!["P#2", "P#1"]);
        assert!(query_index(&pool.conn, Index::Gsi2, "GROUP#a").unwrap().is_empty());
    }

    fn sample_image() -> crate::models::attachment::InspectionImage {
        crate::models::attachment::InspectionImage {
            image_id: "IMG00000001".into(),
            so_number: "3184948".into(),
            item_id: None,
            caption: None,
            file_name: None,
            mime_type: "image/png".into(),
            file_size: 3,
            uploaded_at: now_iso(),
        }
    }

    #[test]
    fn put_with_blob_stores_both() {
        let pool = DbPool::open_in_memory().unwrap();
        let image = sample_image();
        put_with_blob(&pool.conn, &image, b"png").unwrap();

        assert!(get_item(&pool.conn, &image.key()).unwrap().is_some());
        assert_eq!(get_blob(&pool.conn, &image.key()).unwrap().unwrap(), b"png");
    }

    #[test]
    fn failed_blob_write_leaves_no_item() {
        let pool = DbPool::open_in_memory().unwrap();
        pool.conn.execute_batch("DROP TABLE blobs").unwrap();

        let image = sample_image();
        assert!(put_with_blob(&pool.conn, &image, b"png").is_err());
        assert!(get_item(&pool.conn, &image.key()).unwrap().is_none());
    }

    #[test]
    fn failed_blob_delete_keeps_item() {
        let pool = DbPool::open_in_memory().unwrap();
        let image = sample_image();
        put_with_blob(&pool.conn, &image, b"png").unwrap();
        pool.conn.execute_batch("DROP TABLE blobs").unwrap();

        assert!(delete_item(&pool.conn, &image.key()).is_err());
        assert!(get_item(&pool.conn, &image.key()).unwrap().is_some());
    }
}
