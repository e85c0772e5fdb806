use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::core::{BindValue, CatalogQuery};
use crate::models::{
    ProfileInput, Profile, ProgramCard, ProgramSummary, Requirements, ScoreResult, ShortlistItem,
    University, UniversityLink,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

const PROFILE_COLUMNS: &str = "id, user_id, gpa, gpa_scale, ielts, toefl, sat, \
     budget_year, budget_currency, awards, achievements_summary";

/// PostgreSQL client backing the catalog, profiles, requirements and score history
///
/// One instance owns the connection pool and is shared behind an `Arc`.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect, then run embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Pool that connects on first use; migrations are not run
    pub fn connect_lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a catalog listing: a count over the predicates, then one ordered window
    ///
    /// The two statements are separate round-trips. Concurrent writes between
    /// them can make `total` and the window disagree.
    pub async fn list_programs(
        &self,
        query: &CatalogQuery,
    ) -> Result<(Vec<ProgramCard>, i64), PostgresError> {
        let count_sql = query.count_sql();
        let items_sql = query.items_sql();

        tracing::debug!("Catalog count: {}", count_sql);
        tracing::debug!("Catalog items: {}", items_sql);

        let total: i64 = bind_values(sqlx::query(&count_sql), query.params())
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        let rows = bind_values(sqlx::query(&items_sql), query.params())
            .bind(i64::from(query.window.limit))
            .bind(query.window.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(program_card_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total))
    }

    /// Admission thresholds for a program, `None` when the program has none on record
    pub async fn find_requirements(
        &self,
        program_id: Uuid,
    ) -> Result<Option<Requirements>, PostgresError> {
        let query = r#"
            SELECT min_gpa, min_ielts, min_toefl, min_sat
            FROM requirements
            WHERE program_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(program_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<Requirements, PostgresError> {
            Ok(Requirements {
                min_gpa: row.try_get("min_gpa")?,
                min_ielts: row.try_get("min_ielts")?,
                min_toefl: row.try_get("min_toefl")?,
                min_sat: row.try_get("min_sat")?,
            })
        })
        .transpose()
    }

    /// Append one score history row
    pub async fn record_score(
        &self,
        profile_id: Uuid,
        program_id: Uuid,
        result: &ScoreResult,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO scores (profile_id, program_id, score, reasons)
            VALUES ($1, $2, $3, $4)
        "#;

        sqlx::query(query)
            .bind(profile_id)
            .bind(program_id)
            .bind(i16::from(result.score))
            .bind(Json(result.reasons.clone()))
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded score {} for profile {} / program {}",
            result.score,
            profile_id,
            program_id
        );

        Ok(())
    }

    pub async fn get_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, PostgresError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    /// Replace the user's profile wholesale, creating it on first write
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> Result<Profile, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO profiles (user_id, gpa, gpa_scale, ielts, toefl, sat,
                                  budget_year, budget_currency, awards, achievements_summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                gpa = EXCLUDED.gpa,
                gpa_scale = EXCLUDED.gpa_scale,
                ielts = EXCLUDED.ielts,
                toefl = EXCLUDED.toefl,
                sat = EXCLUDED.sat,
                budget_year = EXCLUDED.budget_year,
                budget_currency = EXCLUDED.budget_currency,
                awards = EXCLUDED.awards,
                achievements_summary = EXCLUDED.achievements_summary,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(input.gpa)
            .bind(input.gpa_scale)
            .bind(input.ielts)
            .bind(input.toefl)
            .bind(input.sat)
            .bind(input.budget_year)
            .bind(input.budget_currency.as_deref())
            .bind(input.awards.as_deref())
            .bind(input.achievements_summary.as_deref())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Upserted profile for user {}", user_id);

        Ok(profile_from_row(&row)?)
    }

    /// University with its links and up to 50 programs
    pub async fn get_university(&self, id: Uuid) -> Result<Option<University>, PostgresError> {
        let query = r#"
            SELECT id, name, country_code, city, website, qs_rank, the_rank, data_updated_at
            FROM universities
            WHERE id = $1
        "#;

        let Some(row) = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let links_query = r#"
            SELECT id, link_type, url, title, is_official, priority, source_code, last_verified_at
            FROM university_links
            WHERE university_id = $1
            ORDER BY is_official DESC, priority ASC, link_type ASC
        "#;

        let links = sqlx::query(links_query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(UniversityLink {
                    id: row.try_get("id")?,
                    link_type: row.try_get("link_type")?,
                    url: row.try_get("url")?,
                    title: row.try_get("title")?,
                    is_official: row.try_get("is_official")?,
                    priority: row.try_get("priority")?,
                    source_code: row.try_get("source_code")?,
                    last_verified_at: row.try_get("last_verified_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let programs_query = r#"
            SELECT id, title, degree_level, field, language,
                   tuition_amount, tuition_currency, has_scholarship
            FROM programs
            WHERE university_id = $1
            ORDER BY degree_level ASC, title ASC
            LIMIT 50
        "#;

        let programs = sqlx::query(programs_query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(ProgramSummary {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    degree_level: row.try_get("degree_level")?,
                    field: row.try_get("field")?,
                    language: row.try_get("language")?,
                    tuition_amount: row.try_get("tuition_amount")?,
                    tuition_currency: row.try_get("tuition_currency")?,
                    has_scholarship: row.try_get("has_scholarship")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Some(University {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            country_code: row.try_get("country_code")?,
            city: row.try_get("city")?,
            website: row.try_get("website")?,
            qs_rank: row.try_get("qs_rank")?,
            the_rank: row.try_get("the_rank")?,
            data_updated_at: row.try_get("data_updated_at")?,
            links,
            programs,
        }))
    }

    /// The user's default shortlist, created on first use
    ///
    /// Concurrent first requests race on the partial unique index; the loser's
    /// insert is a no-op and both read back the same row.
    async fn ensure_default_shortlist(&self, user_id: Uuid) -> Result<Uuid, PostgresError> {
        let select = "SELECT id FROM shortlists WHERE user_id = $1 AND is_default";

        let existing: Option<Uuid> = sqlx::query_scalar(select)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let created = sqlx::query(
            r#"
            INSERT INTO shortlists (user_id, is_default) VALUES ($1, TRUE)
            ON CONFLICT (user_id) WHERE is_default DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let id: Uuid = sqlx::query_scalar(select)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        if created.rows_affected() > 0 {
            tracing::debug!("Created default shortlist {} for user {}", id, user_id);
        }

        Ok(id)
    }

    pub async fn add_to_shortlist(&self, user_id: Uuid, program_id: Uuid) -> Result<(), PostgresError> {
        let shortlist_id = self.ensure_default_shortlist(user_id).await?;

        let query = r#"
            INSERT INTO shortlist_items (shortlist_id, program_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(shortlist_id)
            .bind(program_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(PostgresError::NotFound(format!("program {}", program_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_from_shortlist(
        &self,
        user_id: Uuid,
        program_id: Uuid,
    ) -> Result<bool, PostgresError> {
        let shortlist_id = self.ensure_default_shortlist(user_id).await?;

        let result = sqlx::query(
            "DELETE FROM shortlist_items WHERE shortlist_id = $1 AND program_id = $2",
        )
        .bind(shortlist_id)
        .bind(program_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_shortlist(&self, user_id: Uuid) -> Result<Vec<ShortlistItem>, PostgresError> {
        let shortlist_id = self.ensure_default_shortlist(user_id).await?;

        let query = r#"
            SELECT p.id, p.title, u.name, u.country_code, p.degree_level, p.field,
                   p.tuition_amount, p.tuition_currency, p.has_scholarship,
                   u.qs_rank, u.the_rank
            FROM shortlist_items si
            JOIN programs p ON p.id = si.program_id
            JOIN universities u ON u.id = p.university_id
            WHERE si.shortlist_id = $1
            ORDER BY u.qs_rank ASC NULLS LAST, p.title ASC
        "#;

        let rows = sqlx::query(query)
            .bind(shortlist_id)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(|row| {
                Ok(ShortlistItem {
                    program_id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    university: row.try_get("name")?,
                    country: row.try_get("country_code")?,
                    degree: row.try_get("degree_level")?,
                    field: row.try_get("field")?,
                    tuition_amount: row.try_get("tuition_amount")?,
                    tuition_currency: row.try_get("tuition_currency")?,
                    has_scholarship: row.try_get("has_scholarship")?,
                    qs_rank: row.try_get("qs_rank")?,
                    the_rank: row.try_get("the_rank")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(items)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Bind predicate values in slot order
fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &[BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        query = match value {
            BindValue::Text(v) => query.bind(v.clone()),
            BindValue::TextList(v) => query.bind(v.clone()),
            BindValue::Float(v) => query.bind(*v),
            BindValue::Bool(v) => query.bind(*v),
        };
    }
    query
}

fn program_card_from_row(row: &PgRow) -> Result<ProgramCard, sqlx::Error> {
    Ok(ProgramCard {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        degree_level: row.try_get("degree_level")?,
        field: row.try_get("field")?,
        language: row.try_get("language")?,
        tuition_amount: row.try_get("tuition_amount")?,
        tuition_currency: row.try_get("tuition_currency")?,
        has_scholarship: row.try_get("has_scholarship")?,
        scholarship_type: row.try_get("scholarship_type")?,
        scholarship_percent_min: row.try_get("scholarship_percent_min")?,
        scholarship_percent_max: row.try_get("scholarship_percent_max")?,
        university_id: row.try_get("university_id")?,
        university_name: row.try_get("university_name")?,
        country_code: row.try_get("country_code")?,
        city: row.try_get("city")?,
        qs_rank: row.try_get("qs_rank")?,
        the_rank: row.try_get("the_rank")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        gpa: row.try_get("gpa")?,
        gpa_scale: row.try_get("gpa_scale")?,
        ielts: row.try_get("ielts")?,
        toefl: row.try_get("toefl")?,
        sat: row.try_get("sat")?,
        budget_year: row.try_get("budget_year")?,
        budget_currency: row.try_get("budget_currency")?,
        awards: row.try_get("awards")?,
        achievements_summary: row.try_get("achievements_summary")?,
    })
}
