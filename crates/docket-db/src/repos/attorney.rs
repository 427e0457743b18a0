//! Attorney profile repository — CRUD, filtered listing, bulk create.

use chrono::Utc;

use docket_core::entities::{AttorneyDraft, AttorneyProfile};
use docket_core::enums::Seniority;
use docket_core::ids::PREFIX_ATTORNEY;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_json, to_json, to_u32};
use crate::repos::{BulkOutcome, SkippedRecord};
use crate::service::DocketService;
use crate::updates::attorney::AttorneyUpdate;

const ATTORNEY_COLUMNS: &str = "id, name, email, seniority, years_of_experience, \
     practice_areas, major_cases, jurisdictions, created_at, updated_at";

fn row_to_attorney(row: &libsql::Row) -> Result<AttorneyProfile, DatabaseError> {
    Ok(AttorneyProfile {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        email: row.get::<String>(2)?,
        seniority: parse_enum(&row.get::<String>(3)?)?,
        years_of_experience: to_u32(row.get::<i64>(4)?)?,
        practice_areas: parse_json(&row.get::<String>(5)?)?,
        major_cases: parse_json(&row.get::<String>(6)?)?,
        jurisdictions: parse_json(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Optional filters for listing attorneys.
#[derive(Debug, Clone, Default)]
pub struct AttorneyFilter {
    pub practice_area: Option<String>,
    pub seniority: Option<Seniority>,
    pub min_experience: Option<u32>,
}

impl DocketService {
    /// Create a single attorney profile from a normalized draft.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Conflict`] when the email is already taken.
    pub async fn create_attorney(
        &self,
        draft: AttorneyDraft,
    ) -> Result<AttorneyProfile, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ATTORNEY).await?;
        let profile = AttorneyProfile::from_draft(draft, id, now);

        if self.email_exists(&profile.email).await? {
            return Err(DatabaseError::Conflict(format!(
                "email already exists: {}",
                profile.email
            )));
        }

        let practice_areas = to_json(&profile.practice_areas)?;
        let major_cases = to_json(&profile.major_cases)?;
        let jurisdictions = to_json(&profile.jurisdictions)?;
        self.db()
            .execute_with(
                "INSERT INTO attorneys (id, name, email, seniority, years_of_experience, \
                 practice_areas, major_cases, jurisdictions, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                || {
                    libsql::params![
                        profile.id.as_str(),
                        profile.name.as_str(),
                        profile.email.as_str(),
                        profile.seniority.as_str(),
                        i64::from(profile.years_of_experience),
                        practice_areas.as_str(),
                        major_cases.as_str(),
                        jurisdictions.as_str(),
                        now.to_rfc3339(),
                        now.to_rfc3339()
                    ]
                },
            )
            .await?;

        Ok(profile)
    }

    /// Check if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .query("SELECT 1 FROM attorneys WHERE email = ?1 LIMIT 1", [email])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Point read by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when no record matches.
    pub async fn get_attorney(&self, id: &str) -> Result<AttorneyProfile, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {ATTORNEY_COLUMNS} FROM attorneys WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "attorney",
            id: id.to_string(),
        })?;
        row_to_attorney(&row)
    }

    /// List attorneys, optionally narrowed by practice area, seniority, and
    /// minimum experience.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_attorneys(
        &self,
        filter: &AttorneyFilter,
    ) -> Result<Vec<AttorneyProfile>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(seniority) = filter.seniority {
            conditions.push(format!("seniority = ?{idx}"));
            params.push(seniority.as_str().into());
            idx += 1;
        }
        if let Some(min_experience) = filter.min_experience {
            conditions.push(format!("years_of_experience >= ?{idx}"));
            params.push(i64::from(min_experience).into());
            idx += 1;
        }
        if let Some(ref area) = filter.practice_area {
            // Nested lists live in a JSON column; match on the serialized key.
            conditions.push(format!("practice_areas LIKE ?{idx}"));
            params.push(format!("%\"area\":{}%", serde_json::Value::String(area.clone())).into());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {ATTORNEY_COLUMNS} FROM attorneys{where_clause} ORDER BY created_at DESC"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        let mut attorneys = Vec::new();
        while let Some(row) = rows.next().await? {
            attorneys.push(row_to_attorney(&row)?);
        }
        Ok(attorneys)
    }

    /// Partial update; bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when no record matches, or
    /// [`DatabaseError::Conflict`] when an email change collides.
    pub async fn update_attorney(
        &self,
        id: &str,
        update: AttorneyUpdate,
    ) -> Result<AttorneyProfile, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.as_str().into());
            idx += 1;
        }
        if let Some(ref email) = update.email {
            sets.push(format!("email = ?{idx}"));
            params.push(email.as_str().into());
            idx += 1;
        }
        if let Some(seniority) = update.seniority {
            sets.push(format!("seniority = ?{idx}"));
            params.push(seniority.as_str().into());
            idx += 1;
        }
        if let Some(years) = update.years_of_experience {
            sets.push(format!("years_of_experience = ?{idx}"));
            params.push(i64::from(years).into());
            idx += 1;
        }
        if let Some(ref areas) = update.practice_areas {
            sets.push(format!("practice_areas = ?{idx}"));
            params.push(to_json(areas)?.into());
            idx += 1;
        }
        if let Some(ref cases) = update.major_cases {
            sets.push(format!("major_cases = ?{idx}"));
            params.push(to_json(cases)?.into());
            idx += 1;
        }
        if let Some(ref jurisdictions) = update.jurisdictions {
            sets.push(format!("jurisdictions = ?{idx}"));
            params.push(to_json(jurisdictions)?.into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_attorney(id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE attorneys SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let affected = self
            .db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "attorney",
                id: id.to_string(),
            });
        }

        self.get_attorney(id).await
    }

    /// Partition-key-scoped delete.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when no record matches the id and
    /// partition key.
    pub async fn delete_attorney(
        &self,
        id: &str,
        seniority: Seniority,
    ) -> Result<(), DatabaseError> {
        let affected = self
            .db()
            .execute_with("DELETE FROM attorneys WHERE id = ?1 AND seniority = ?2", || {
                libsql::params![id, seniority.as_str()]
            })
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "attorney",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Create many attorneys; rows the store refuses (duplicate email, backend
    /// error) are reported and do not block the rest.
    ///
    /// # Errors
    ///
    /// Never fails on per-row problems; only infallible bookkeeping remains.
    pub async fn bulk_create_attorneys(
        &self,
        drafts: Vec<AttorneyDraft>,
    ) -> Result<BulkOutcome, DatabaseError> {
        let mut outcome = BulkOutcome::default();
        for draft in drafts {
            let label = draft.name.clone();
            match self.create_attorney(draft).await {
                Ok(profile) => outcome.created_ids.push(profile.id),
                Err(e) => {
                    tracing::warn!(row = %label, error = %e, "skipping attorney row");
                    outcome.skipped.push(SkippedRecord {
                        label,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(outcome)
    }
}
