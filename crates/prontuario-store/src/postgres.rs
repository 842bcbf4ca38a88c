//! # PostgreSQL Backend
//!
//! Operates on the `sanzioni_violations` table, which is assumed to exist:
//!
//! ```sql
//! id UUID PRIMARY KEY, articolo TEXT NOT NULL, comma TEXT, categoria TEXT,
//! descrizione TEXT NOT NULL, pmr NUMERIC(10,2), sanzioni_accessorie TEXT,
//! altro TEXT, created_at TIMESTAMPTZ, updated_at TIMESTAMPTZ
//! ```
//!
//! `pmr` crosses the wire as integer cents (`BIGINT`) through SQL casts, so
//! no decimal type is needed on the Rust side. Queries are built at runtime
//! with `sqlx::query_as`; there are no compile-time checked macros.
//!
//! Other writers are picked up through `LISTEN sanzioni_violations`: any
//! notification on that channel becomes a `Reload` event.

use std::time::Duration;

use chrono::{DateTime, Utc};
use prontuario_core::{Pmr, PmrError, ValidationError, ViolationDraft, ViolationId, ViolationRecord};
use sqlx::postgres::{PgListener, PgPool, PgPoolOptions};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{ChangeEvent, ChangeFeed, ViolationStore};

/// Channel the listener subscribes to.
pub const NOTIFY_CHANNEL: &str = "sanzioni_violations";

const COLUMNS: &str = "id, articolo, comma, categoria, descrizione, \
     (pmr * 100)::BIGINT AS pmr_cents, sanzioni_accessorie, altro, created_at, updated_at";

/// Open a connection pool.
pub async fn connect(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;
    tracing::info!("connected to PostgreSQL");
    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    feed: ChangeFeed,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(),
        }
    }

    /// Connect and build a store in one step.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(connect(url).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Start forwarding `NOTIFY` messages as `Reload` events.
    ///
    /// The listener reconnects on its own after a dropped connection;
    /// notifications sent while disconnected are lost, so a reconnect is
    /// reported as a `Reload` too.
    pub async fn listen(&self) -> Result<JoinHandle<()>, StoreError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(NOTIFY_CHANNEL).await?;
        tracing::info!(channel = NOTIFY_CHANNEL, "listening for catalog changes");

        let feed = self.feed.clone();
        Ok(tokio::spawn(async move {
            loop {
                match listener.try_recv().await {
                    Ok(Some(notification)) => {
                        tracing::debug!(payload = notification.payload(), "catalog change notified");
                        feed.publish(ChangeEvent::reload());
                    }
                    Ok(None) => {
                        tracing::warn!("notification connection lost, reconnecting");
                        feed.publish(ChangeEvent::reload());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "notification listener failed");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }))
    }
}

fn cents_param(pmr: Pmr) -> Result<i64, StoreError> {
    i64::try_from(pmr.cents()).map_err(|_| {
        StoreError::Validation(ValidationError::Pmr(PmrError::OutOfRange(pmr.to_string())))
    })
}

impl ViolationStore for PgStore {
    async fn fetch_all(&self) -> Result<Vec<ViolationRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ViolationRow>(&format!(
            "SELECT {COLUMNS} FROM sanzioni_violations ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ViolationRow::into_record).collect())
    }

    async fn insert(&self, draft: ViolationDraft) -> Result<ViolationRecord, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let cents = cents_param(draft.pmr)?;
        let now = Utc::now();

        let row = sqlx::query_as::<_, ViolationRow>(&format!(
            "INSERT INTO sanzioni_violations
                 (id, articolo, comma, categoria, descrizione, pmr,
                  sanzioni_accessorie, altro, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6::BIGINT / 100.0, $7, $8, $9, $9)
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.articolo)
        .bind(&draft.comma)
        .bind(&draft.categoria)
        .bind(&draft.descrizione)
        .bind(cents)
        .bind(&draft.sanzioni_accessorie)
        .bind(&draft.altro)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let record = row.into_record();
        self.feed.publish(ChangeEvent::inserted(record.id));
        Ok(record)
    }

    async fn update(
        &self,
        id: ViolationId,
        draft: ViolationDraft,
    ) -> Result<ViolationRecord, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let cents = cents_param(draft.pmr)?;

        let row = sqlx::query_as::<_, ViolationRow>(&format!(
            "UPDATE sanzioni_violations
             SET articolo = $1, comma = $2, categoria = $3, descrizione = $4,
                 pmr = $5::BIGINT / 100.0, sanzioni_accessorie = $6, altro = $7,
                 updated_at = $8
             WHERE id = $9
             RETURNING {COLUMNS}"
        ))
        .bind(&draft.articolo)
        .bind(&draft.comma)
        .bind(&draft.categoria)
        .bind(&draft.descrizione)
        .bind(cents)
        .bind(&draft.sanzioni_accessorie)
        .bind(&draft.altro)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        let record = row.into_record();
        self.feed.publish(ChangeEvent::updated(id));
        Ok(record)
    }

    async fn delete(&self, id: ViolationId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sanzioni_violations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.feed.publish(ChangeEvent::deleted(id));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ViolationRow {
    id: Uuid,
    articolo: String,
    comma: Option<String>,
    categoria: Option<String>,
    descrizione: String,
    pmr_cents: Option<i64>,
    sanzioni_accessorie: Option<String>,
    altro: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ViolationRow {
    fn into_record(self) -> ViolationRecord {
        let pmr = match self.pmr_cents.map(u64::try_from) {
            Some(Ok(cents)) => Pmr::from_cents(cents),
            Some(Err(_)) => {
                tracing::warn!(id = %self.id, "negative pmr in database, reading as zero");
                Pmr::ZERO
            }
            None => Pmr::ZERO,
        };
        let created_at = self.created_at.unwrap_or_default();

        ViolationRecord {
            id: ViolationId(self.id),
            articolo: self.articolo,
            comma: self.comma,
            categoria: self.categoria.unwrap_or_default(),
            descrizione: self.descrizione,
            pmr,
            sanzioni_accessorie: self.sanzioni_accessorie,
            altro: self.altro,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}
