//! [`SqliteStore`] — the SQLite implementation of [`TemplateStore`],
//! [`SubjectDirectory`], and [`SubjectAdmin`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;
use veriprint_core::{
  store::{SubjectAdmin, SubjectDirectory, TemplateStore},
  subject::SubjectRecord,
  template::{Enrollment, FingerPosition, NewTemplate, Template},
};

use crate::{
  Error, Result,
  encode::{
    RawSubject, RawTemplate, encode_dt, encode_finger_position, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Veriprint template store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const TEMPLATE_COLUMNS: &str = "template_id, subject_id, finger_position, \
                                payload, quality_score, is_active, created_at";

fn template_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTemplate> {
  Ok(RawTemplate {
    template_id:     row.get(0)?,
    subject_id:      row.get(1)?,
    finger_position: row.get(2)?,
    payload:         row.get(3)?,
    quality_score:   row.get(4)?,
    is_active:       row.get(5)?,
    created_at:      row.get(6)?,
  })
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TemplateStore impl ──────────────────────────────────────────────────────

impl TemplateStore for SqliteStore {
  type Error = Error;

  async fn enroll_active(&self, input: NewTemplate) -> Result<Enrollment> {
    let template = Template {
      template_id:     Uuid::new_v4(),
      subject_id:      input.subject_id,
      finger_position: input.finger_position,
      payload:         input.payload,
      quality_score:   input.quality_score,
      is_active:       true,
      created_at:      Utc::now(),
    };

    let template_id_str = encode_uuid(template.template_id);
    let subject_id_str  = encode_uuid(template.subject_id);
    let position_str    = encode_finger_position(template.finger_position).to_owned();
    let payload         = template.payload.clone();
    let quality         = i64::from(template.quality_score);
    let created_at_str  = encode_dt(template.created_at);

    // One transaction per enrollment: the partial UNIQUE index on
    // (subject_id, finger_position) WHERE is_active = 1 rejects any
    // interleaving that would leave two rows active.
    let superseded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let superseded = tx.execute(
          "UPDATE templates SET is_active = 0
           WHERE subject_id = ?1 AND finger_position = ?2 AND is_active = 1",
          rusqlite::params![subject_id_str, position_str],
        )?;

        tx.execute(
          "INSERT INTO templates (
             template_id, subject_id, finger_position,
             payload, quality_score, is_active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
          rusqlite::params![
            template_id_str,
            subject_id_str,
            position_str,
            payload,
            quality,
            created_at_str,
          ],
        )?;

        tx.commit()?;
        Ok(superseded)
      })
      .await?;

    Ok(Enrollment { template, superseded })
  }

  async fn deactivate_active(
    &self,
    subject_id: Uuid,
    finger_position: FingerPosition,
  ) -> Result<usize> {
    let subject_id_str = encode_uuid(subject_id);
    let position_str   = encode_finger_position(finger_position).to_owned();

    let count = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE templates SET is_active = 0
           WHERE subject_id = ?1 AND finger_position = ?2 AND is_active = 1",
          rusqlite::params![subject_id_str, position_str],
        )?)
      })
      .await?;

    Ok(count)
  }

  async fn list_active(&self) -> Result<Vec<Template>> {
    let raws: Vec<RawTemplate> = self
      .conn
      .call(move |conn| {
        // Stable scan order so identification tie-breaking is deterministic.
        let mut stmt = conn.prepare(&format!(
          "SELECT {TEMPLATE_COLUMNS} FROM templates
           WHERE is_active = 1
           ORDER BY created_at, template_id"
        ))?;
        let rows = stmt
          .query_map([], template_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTemplate::into_template).collect()
  }

  async fn list_active_for_subject(
    &self,
    subject_id: Uuid,
  ) -> Result<Vec<Template>> {
    let subject_id_str = encode_uuid(subject_id);

    let raws: Vec<RawTemplate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TEMPLATE_COLUMNS} FROM templates
           WHERE subject_id = ?1 AND is_active = 1
           ORDER BY created_at, template_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![subject_id_str], template_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTemplate::into_template).collect()
  }

  async fn get_template(&self, template_id: Uuid) -> Result<Option<Template>> {
    let id_str = encode_uuid(template_id);

    let raw: Option<RawTemplate> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE template_id = ?1"
              ),
              rusqlite::params![id_str],
              template_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTemplate::into_template).transpose()
  }
}

// ─── SubjectDirectory impl ───────────────────────────────────────────────────

impl SubjectDirectory for SqliteStore {
  type Error = Error;

  async fn resolve_subject(
    &self,
    subject_id: Uuid,
  ) -> Result<Option<SubjectRecord>> {
    let id_str = encode_uuid(subject_id);

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT subject_id, external_id, display_name, created_at
               FROM subjects WHERE subject_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawSubject {
                  subject_id:   row.get(0)?,
                  external_id:  row.get(1)?,
                  display_name: row.get(2)?,
                  created_at:   row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }

  async fn resolve_subject_by_external_id(
    &self,
    external_id: &str,
  ) -> Result<Option<SubjectRecord>> {
    let external = external_id.to_owned();

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT subject_id, external_id, display_name, created_at
               FROM subjects WHERE external_id = ?1",
              rusqlite::params![external],
              |row| {
                Ok(RawSubject {
                  subject_id:   row.get(0)?,
                  external_id:  row.get(1)?,
                  display_name: row.get(2)?,
                  created_at:   row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }
}

// ─── SubjectAdmin impl ───────────────────────────────────────────────────────

impl SubjectAdmin for SqliteStore {
  type Error = Error;

  async fn add_subject(
    &self,
    external_id: String,
    display_name: String,
  ) -> Result<SubjectRecord> {
    if self
      .resolve_subject_by_external_id(&external_id)
      .await?
      .is_some()
    {
      return Err(Error::DuplicateExternalId(external_id));
    }

    let subject = SubjectRecord {
      subject_id: Uuid::new_v4(),
      external_id,
      display_name,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(subject.subject_id);
    let external = subject.external_id.clone();
    let name     = subject.display_name.clone();
    let at_str   = encode_dt(subject.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (subject_id, external_id, display_name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, external, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(subject)
  }
}
